// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Fixed pages: the two index pages, pricing, contact, about and the
//! legal pages.
//!
//! Every static page reads `content/<lang>/pages/<file>.json` with the
//! same shape. The index pages additionally list every service grouped by
//! category or every commune grouped by zone.

use super::{
    RenderedPage, SUBPAGE, Trail, breadcrumb_schema, expand_faq, expand_keys, excerpt, faq_html,
    faq_schema, whatsapp_config,
};
use crate::config::{PageKind, StaticPageConfig};
use crate::content::StaticPageContent;
use crate::context::{PageContext, PageInfo, enrich};
use crate::error::Result;
use crate::fragments::{attr_escaped, entity_href};
use crate::lang::Level;
use crate::model::normalized_key;
use crate::render::Renderer;
use crate::resolve::{substitute, value_to_string};
use crate::store::SiteData;
use maud::{PreEscaped, html};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ServiceLink {
    href: String,
    name: String,
    excerpt: String,
}

#[derive(Debug, Serialize)]
struct Category {
    name: String,
    class: String,
    services: Vec<ServiceLink>,
}

#[derive(Serialize)]
struct CategoriesView<'a> {
    categories: &'a [Category],
}

#[derive(Debug, Serialize)]
struct CommuneLink {
    href: String,
    name: String,
    postal_code: String,
}

#[derive(Debug, Serialize)]
struct Zone {
    name: String,
    communes: Vec<CommuneLink>,
}

#[derive(Serialize)]
struct ZonesView<'a> {
    zones: &'a [Zone],
    cta: &'a str,
}

/// Groups in order of first appearance, keeping item order inside each.
fn group_by<T, K: PartialEq>(items: impl IntoIterator<Item = (K, T)>) -> Vec<(K, Vec<T>)> {
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();
    for (key, item) in items {
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(item),
            None => groups.push((key, vec![item])),
        }
    }
    groups
}

/// Every service in priority order, grouped by category.
fn categories(data: &SiteData) -> Vec<Category> {
    let links = data.services_by_priority().into_iter().map(|s| {
        (
            s.category.clone(),
            ServiceLink {
                href: attr_escaped(&entity_href(SUBPAGE, &s.slug)),
                name: s.name.clone(),
                excerpt: excerpt(&s.meta_description),
            },
        )
    });
    group_by(links)
        .into_iter()
        .map(|(name, services)| Category {
            class: format!("category-{}", normalized_key(&name).to_lowercase()),
            name,
            services,
        })
        .collect()
}

/// Every active commune in priority order, grouped by zone.
fn zones(data: &SiteData) -> Vec<Zone> {
    let links = data.communes_by_priority().into_iter().map(|c| {
        (
            c.zone.clone(),
            CommuneLink {
                href: attr_escaped(&entity_href(SUBPAGE, &c.slug)),
                name: c.name.clone(),
                postal_code: c.postal_code.clone(),
            },
        )
    });
    group_by(links)
        .into_iter()
        .map(|(name, communes)| Zone { name, communes })
        .collect()
}

/// `<h2>`/body pairs as one block, for templates without numbered slots.
fn sections_html(ctx: &PageContext, content: &StaticPageContent) -> String {
    html! {
        @for section in &content.sections {
            section class="page-section" {
                @if !section.h2.is_empty() { h2 { (substitute(&section.h2, ctx)) } }
                (PreEscaped(substitute(&section.content, ctx)))
            }
        }
    }
    .into_string()
}

/// Build one static page.
pub fn assemble(
    data: &SiteData,
    renderer: &Renderer,
    page: &StaticPageConfig,
) -> Result<RenderedPage> {
    let lang = data.locale.lang;
    let slug = page.slug(lang);
    diagnostics::log_debug!("assembling page {key} as {slug}", key: page.key.as_str(), slug: slug);
    let content = data.page_content(&page.content_file(lang));
    let mut ctx = PageContext::new();

    let title = content
        .hero
        .h1
        .clone()
        .unwrap_or_else(|| data.ui.text(&format!("pages.{}", page.key), &page.key));
    ctx.set("H1", title.as_str());
    ctx.set(
        "META_TITLE",
        content
            .meta
            .title
            .clone()
            .unwrap_or_else(|| format!("{title} | {}", data.site_name)),
    );
    ctx.set(
        "META_DESCRIPTION",
        content.meta.description.clone().unwrap_or_default(),
    );
    ctx.set(
        "HERO_SUBTITLE",
        content.hero.subtitle.clone().unwrap_or_default(),
    );
    ctx.set("LANGUAGE", lang.code());
    for (name, value) in &content.variables {
        ctx.set(name.to_uppercase(), value_to_string(value));
    }

    match page.kind {
        PageKind::ServicesIndex => {
            ctx.set(
                "SERVICES_CATEGORIES",
                renderer.render_partial(
                    "services-categories",
                    &CategoriesView {
                        categories: &categories(data),
                    },
                )?,
            );
        }
        PageKind::ZonesIndex => {
            let cta = data.ui.text("links.voir_services", "Voir les services →");
            ctx.set(
                "COMMUNES_GRID",
                renderer.render_partial(
                    "communes-grid",
                    &ZonesView {
                        zones: &zones(data),
                        cta: &cta,
                    },
                )?,
            );
        }
        PageKind::Generic => {}
    }

    let trail = match page.kind {
        PageKind::Generic => Trail::Page(&title),
        kind => Trail::Index(kind),
    };
    ctx.set("BREADCRUMB_ITEMS", trail.html(data));
    let canonical = data.locale.absolute_url(&data.domain, Some(slug));
    ctx.set(
        "SCHEMA_ORG_BREADCRUMB",
        breadcrumb_schema(data, vec![(title.clone(), canonical)]),
    );
    ctx.set("WHATSAPP_CONFIG_JSON", whatsapp_config(data, Level::Subpage));

    enrich(data, &PageInfo::subpage(page.slugs.clone()), &mut ctx);
    expand_keys(&mut ctx, &["META_TITLE", "META_DESCRIPTION", "H1", "HERO_SUBTITLE"]);

    let intro = substitute(&content.intro, &ctx);
    ctx.set("INTRO", intro);
    for (i, section) in content.sections.iter().enumerate() {
        let h2 = substitute(&section.h2, &ctx);
        let body = substitute(&section.content, &ctx);
        ctx.set(format!("H2_{}", i + 1), h2);
        ctx.set(format!("CONTENT_H2_{}", i + 1), body);
    }
    ctx.set("SECTIONS_HTML", sections_html(&ctx, &content));

    let cta = &content.cta;
    for (key, value) in [
        ("CTA_FINAL_TITRE", &cta.title),
        ("CTA_FINAL_SUBTITLE", &cta.subtitle),
        ("CTA_FINAL_BUTTON", &cta.button_text),
    ] {
        let text = value.as_deref().map(|v| substitute(v, &ctx)).unwrap_or_default();
        ctx.set(key, text);
    }

    let faq = expand_faq(&ctx, &content.faq);
    let faq_title = data
        .components
        .text("faq.section_title", "Questions Fréquentes");
    ctx.set("FAQ_SECTION", faq_html(renderer, &faq_title, &faq)?);
    ctx.set("SCHEMA_ORG_FAQ", faq_schema(data, &faq));

    let html = renderer.render_page(page.template_name(), &ctx)?;
    Ok(RenderedPage {
        slug: Some(slug.to_string()),
        class: page.class.into(),
        html,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn services_grouped_by_category_in_priority_order() {
        let data = SiteData::fixture();
        let groups = categories(&data);
        let names: Vec<&str> = groups.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Remorquage", "Dépannage"]);
        assert_eq!(groups[1].services.len(), 2);
        assert_eq!(groups[1].services[0].href, "../depannage-batterie/index.html");
        assert_eq!(groups[1].class, "category-dépannage");
    }

    #[test]
    fn communes_grouped_by_zone_skip_inactive() {
        let mut data = SiteData::fixture();
        data.communes[4].active = false;
        let groups = zones(&data);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Bruxelles");
        let first: Vec<&str> = groups[0].communes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(first, vec!["Uccle", "Ixelles", "Etterbeek"]);
        assert_eq!(groups[1].communes.len(), 1);
    }

    #[test]
    fn section_blocks_expand_placeholders() {
        let content: StaticPageContent = serde_json::from_value(serde_json::json!({
            "sections": [{"h2": "Prix", "content": "<p>{{PRIX_BASE}}</p>"}, {"content": "<p>x</p>"}]
        }))
        .expect("content");
        let mut ctx = PageContext::new();
        ctx.set("PRIX_BASE", "65 €");
        let html = sections_html(&ctx, &content);
        assert_eq!(
            html,
            r#"<section class="page-section"><h2>Prix</h2><p>65 €</p></section><section class="page-section"><p>x</p></section>"#
        );
    }
}
