// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Page assemblers, one per page type.
//!
//! Each assembler fills a [`PageContext`] with the values specific to its
//! page, runs the generic [`enrich`](crate::context::enrich) pipeline, then
//! expands content text against the finished context and renders the page
//! template.

pub mod commune;
pub mod home;
pub mod service;
pub mod static_pages;

use crate::config::{PageClass, PageKind};
use crate::content::FaqItem;
use crate::context::PageContext;
use crate::error::Result;
use crate::fragments::{Crumb, attr_escaped, breadcrumb_items, entity_href};
use crate::lang::{Language, Level};
use crate::render::Renderer;
use crate::schema_org::{self, Business};
use crate::store::SiteData;
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Sitemap class of a written page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OutputClass {
    Home,
    Index,
    Service,
    Commune,
    Utility,
    Legal,
}

impl From<PageClass> for OutputClass {
    fn from(class: PageClass) -> Self {
        match class {
            PageClass::Index => OutputClass::Index,
            PageClass::Utility => OutputClass::Utility,
            PageClass::Legal => OutputClass::Legal,
        }
    }
}

/// A finished page, ready to be written below its language directory.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// `None` for the homepage.
    pub slug: Option<String>,
    pub class: OutputClass,
    pub html: String,
}

impl RenderedPage {
    /// Path relative to the language directory.
    #[must_use]
    pub fn rel_path(&self) -> PathBuf {
        match &self.slug {
            Some(slug) => PathBuf::from(slug).join("index.html"),
            None => PathBuf::from("index.html"),
        }
    }
}

/// Sub-page prefix shared by every page except the homepage.
pub(crate) const SUBPAGE: &str = "../";

/// Card excerpts are cut to this many characters.
const EXCERPT_CHARS: usize = 120;

/// Shortened description for cards, marked with an ellipsis when cut.
pub(crate) fn excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(EXCERPT_CHARS).collect();
    format!("{}...", cut.trim_end())
}

#[derive(Serialize)]
pub(crate) struct Card {
    pub href: String,
    pub name: String,
    pub excerpt: String,
    pub icon: String,
}

#[derive(Serialize)]
struct CardsView<'a> {
    cards: &'a [Card],
    class: &'a str,
}

/// Service cards through the `service-cards` partial.
pub(crate) fn service_cards(
    renderer: &Renderer,
    services: &[&crate::model::Service],
    prefix: &str,
    class: &str,
) -> Result<String> {
    let cards: Vec<Card> = services
        .iter()
        .map(|s| Card {
            href: attr_escaped(&entity_href(prefix, &s.slug)),
            name: s.name.clone(),
            excerpt: excerpt(&s.meta_description),
            icon: if s.icon.is_empty() {
                String::new()
            } else {
                attr_escaped(&format!("{prefix}{}", s.icon))
            },
        })
        .collect();
    renderer.render_partial(
        "service-cards",
        &CardsView {
            cards: &cards,
            class,
        },
    )
}

/// Business identity used by every Schema.org block.
pub(crate) fn business(data: &SiteData) -> Business {
    let contact = &data.vars.contact;
    let telephone = if contact.phone.is_empty() {
        contact.phone_local.clone()
    } else {
        contact.phone.clone()
    };
    Business {
        name: data.site_name.clone(),
        telephone,
        email: contact.email.clone(),
        url: data.locale.absolute_url(&data.domain, None),
        lang: data.locale.lang,
        rating: Business::rating_from(&data.vars.google),
    }
}

/// Slug of a service in every language that has one.
pub(crate) fn service_slugs(data: &SiteData, id: i64) -> BTreeMap<Language, String> {
    data.languages
        .iter()
        .filter_map(|&lang| {
            data.alternates
                .service_slug(lang, id)
                .map(|slug| (lang, slug.to_string()))
        })
        .collect()
}

/// Slug of a commune in every language that has one.
pub(crate) fn commune_slugs(data: &SiteData, id: i64) -> BTreeMap<Language, String> {
    data.languages
        .iter()
        .filter_map(|&lang| {
            data.alternates
                .commune_slug(lang, id)
                .map(|slug| (lang, slug.to_string()))
        })
        .collect()
}

#[derive(Serialize)]
struct FaqView<'a> {
    title: &'a str,
    items: &'a [FaqItem],
}

/// FAQ block through the `faq-section` partial; empty for no questions.
pub(crate) fn faq_html(renderer: &Renderer, title: &str, items: &[FaqItem]) -> Result<String> {
    if items.is_empty() {
        return Ok(String::new());
    }
    renderer.render_partial("faq-section", &FaqView { title, items })
}

/// FAQPage JSON-LD, or an empty string without questions.
pub(crate) fn faq_schema(data: &SiteData, items: &[FaqItem]) -> String {
    schema_org::faq(data.locale.lang, items)
        .map(|schema| schema_org::to_json_ld(&schema))
        .unwrap_or_default()
}

/// FAQ items with their text expanded against the page context.
pub(crate) fn expand_faq(ctx: &PageContext, items: &[FaqItem]) -> Vec<FaqItem> {
    items
        .iter()
        .map(|item| FaqItem {
            question: crate::resolve::substitute(&item.question, ctx),
            answer: crate::resolve::substitute(&item.answer, ctx),
        })
        .collect()
}

/// Re-expand values that were set from content before the generic
/// variables were known.
pub(crate) fn expand_keys(ctx: &mut PageContext, keys: &[&str]) {
    for key in keys {
        if let Some(text) = ctx.get(key).map(|text| crate::resolve::substitute(text, &*ctx)) {
            ctx.set(*key, text);
        }
    }
}

/// WhatsApp number in international digits, falling back to the contact
/// phone.
pub(crate) fn whatsapp_number(data: &SiteData) -> String {
    let configured = &data.vars.whatsapp.phone_number;
    if configured.is_empty() {
        data.vars
            .contact
            .phone
            .chars()
            .filter(char::is_ascii_digit)
            .collect()
    } else {
        configured.clone()
    }
}

/// Settings handed to the WhatsApp widget script. Icon paths are made
/// relative to the page.
pub(crate) fn whatsapp_config(data: &SiteData, level: Level) -> String {
    let prefix = level.path_prefix();
    let services: Vec<Value> = data
        .vars
        .whatsapp
        .services
        .iter()
        .map(|entry| {
            let mut entry = entry.clone();
            if let Some(Value::String(icon)) = entry.get_mut("icon") {
                *icon = format!("{prefix}{icon}");
            }
            entry
        })
        .collect();
    json!({
        "phoneNumber": whatsapp_number(data),
        "services": services,
        "language": data.locale.lang.code()
    })
    .to_string()
}

/// Where a page sits in the breadcrumb trail below the home crumb.
pub(crate) enum Trail<'a> {
    Service(&'a str),
    Commune(&'a str),
    Index(PageKind),
    Page(&'a str),
}

impl Trail<'_> {
    fn crumbs(&self, data: &SiteData) -> Vec<Crumb> {
        let lang = data.locale.lang;
        let index_href = |key: &str| format!("{SUBPAGE}{}/index.html", data.page_slug(key, lang));
        let services = || data.ui.text("breadcrumb.services", "Services");
        let zones = || data.ui.text("breadcrumb.zones_index", "Zones d'Intervention");
        match self {
            Trail::Service(name) => vec![
                Crumb::link(services(), index_href("services")),
                Crumb::current(*name),
            ],
            Trail::Commune(name) => vec![
                Crumb::link(zones(), index_href("zones")),
                Crumb::current(*name),
            ],
            Trail::Index(PageKind::ServicesIndex) => vec![Crumb::current(
                data.ui.text("breadcrumb.services_index", "Nos Services"),
            )],
            Trail::Index(PageKind::ZonesIndex) => vec![Crumb::current(zones())],
            Trail::Index(PageKind::Generic) => Vec::new(),
            Trail::Page(name) => vec![Crumb::current(*name)],
        }
    }

    /// Microdata `<li>` items for `BREADCRUMB_ITEMS`.
    pub(crate) fn html(&self, data: &SiteData) -> String {
        breadcrumb_items(&self.crumbs(data))
    }
}

/// BreadcrumbList JSON-LD from `(name, absolute url)` steps after home.
pub(crate) fn breadcrumb_schema(data: &SiteData, steps: Vec<(String, String)>) -> String {
    let home = data.locale.absolute_url(&data.domain, None);
    let mut items = vec![(data.ui.text("nav.home", "Accueil"), home)];
    items.extend(steps);
    schema_org::to_json_ld(&schema_org::breadcrumb(&items))
}
