// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Commune pages: `<slug>/index.html` for every active commune.
//!
//! Copy comes from `content/<lang>/locations/<slug>.json`. Version 1.0
//! files only override the first and third sections; version 2.0 files
//! add the local-knowledge block, a local FAQ and their own neighbour list.

use super::{
    OutputClass, RenderedPage, SUBPAGE, Trail, breadcrumb_schema, business, commune_slugs,
    expand_faq, faq_html, faq_schema, service_cards, whatsapp_config,
};
use crate::content::{CommuneContent, Quarter};
use crate::context::{PageContext, PageInfo, enrich};
use crate::error::Result;
use crate::fragments::{self, entity_href, tag_links};
use crate::lang::Level;
use crate::model::Commune;
use crate::render::Renderer;
use crate::resolve::substitute;
use crate::rotation::{
    COMMUNE_SERVICE_CARDS, COMMUNE_SERVICE_CARDS_LIMIT, COMMUNE_SIDEBAR_SERVICES,
    COMMUNE_SIDEBAR_SERVICES_LIMIT,
};
use crate::schema_org;
use crate::store::SiteData;
use maud::html;
use serde::{Deserialize, Serialize};

/// Neighbours linked from the sidebar and the tag list.
const NEIGHBOR_LINKS: usize = 5;

/// Phrase emphasised in hero taglines.
const HIGHLIGHT: &str = "Intervention rapide";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct WhyCard {
    icon: String,
    title: String,
    text: String,
}

#[derive(Serialize)]
struct WhyView<'a> {
    cards: &'a [WhyCard],
}

#[derive(Serialize)]
struct QuartersView<'a> {
    quarters: &'a [Quarter],
}

fn fill_commune(text: &str, commune: &Commune) -> String {
    text.replace("{{COMMUNE_NAME}}", &commune.name)
        .replace("{{COMMUNE}}", &commune.name)
        .replace("{{POSTAL_CODE}}", &commune.postal_code)
}

/// A `ui` string with the commune's name and postal code filled in.
fn commune_text(data: &SiteData, path: &str, default: &str, commune: &Commune) -> String {
    fill_commune(&data.ui.text(path, default), commune)
}

fn highlight(text: &str) -> String {
    text.replace(HIGHLIGHT, &format!("<strong>{HIGHLIGHT}</strong>"))
}

fn why_cards(data: &SiteData, commune: &Commune) -> Vec<WhyCard> {
    let mut cards: Vec<WhyCard> = data.components.section("why_cards.cards");
    for card in &mut cards {
        if card.icon.is_empty() {
            card.icon = "✓".to_string();
        }
        card.title = fill_commune(&card.title, commune);
        card.text = fill_commune(&card.text, commune);
    }
    cards
}

/// Build the page for `commune`.
pub fn assemble(data: &SiteData, renderer: &Renderer, commune: &Commune) -> Result<RenderedPage> {
    diagnostics::log_debug!("assembling commune {slug}", slug: commune.slug.as_str());
    let content = data.commune_content(&commune.slug);
    let ui = &data.ui;
    let text = |path: &str, default: &str| commune_text(data, path, default, commune);
    let mut ctx = PageContext::new();

    let seo = &commune.seo;
    ctx.set(
        "META_TITLE",
        seo.meta_title.clone().unwrap_or_else(|| {
            text(
                "communes.meta.title_default",
                "Dépannage Auto {{COMMUNE_NAME}} ({{POSTAL_CODE}}) | Service Professionnel",
            )
        }),
    );
    ctx.set(
        "META_DESCRIPTION",
        seo.meta_description.clone().unwrap_or_else(|| {
            text(
                "communes.meta.description_default",
                "Service de dépannage automobile à {{COMMUNE_NAME}}. Équipe professionnelle locale, intervention rapide. Devis gratuit.",
            )
        }),
    );
    ctx.set(
        "H1",
        seo.h1.clone().unwrap_or_else(|| {
            text("communes.seo.h1_default", "Dépannage Voiture à {{COMMUNE_NAME}}")
        }),
    );
    ctx.set(
        "H2_1",
        seo.h2.clone().unwrap_or_else(|| {
            text(
                "communes.seo.h2_1_default",
                "Service de Dépannage à {{COMMUNE_NAME}}",
            )
        }),
    );
    ctx.set(
        "H2_2",
        text("communes.seo.h2_2_default", "Nos Services à {{COMMUNE_NAME}}"),
    );
    ctx.set(
        "H2_3",
        text("communes.seo.h2_3_default", "Zones d'Intervention"),
    );
    ctx.set(
        "H2_4",
        text("communes.seo.h2_4_default", "Nos Tarifs à {{COMMUNE_NAME}}"),
    );
    ctx.set(
        "H2_5",
        text(
            "communes.seo.h2_5_default",
            "Pourquoi Nous Choisir à {{COMMUNE_NAME}}",
        ),
    );

    ctx.set("COMMUNE_NAME", commune.name.as_str());
    ctx.set("COMMUNE", commune.name.as_str());
    ctx.set("CODE_POSTAL", commune.postal_code.as_str());
    ctx.set("KEYWORDS", "");
    ctx.set("LANGUAGE", data.locale.lang.code());

    let accroche = seo.h2.clone().unwrap_or_else(|| {
        text(
            "communes.hero.accroche_template",
            "Notre équipe locale intervient rapidement à {{COMMUNE_NAME}} et alentours. Service de qualité disponible 24h/24.",
        )
    });
    ctx.set("ACCROCHE", highlight(&accroche));
    ctx.set(
        "CTA_PRIMARY",
        ui.text("communes.hero.cta_primary", "Nous Contacter"),
    );
    ctx.set(
        "CTA_FINAL_TITRE",
        text(
            "communes.cta_final.titre_template",
            "En Panne à {{COMMUNE_NAME}} ?",
        ),
    );
    ctx.set(
        "CTA_FINAL_BUTTON",
        ui.text("communes.cta_final.button", "Devis Gratuit Immédiat"),
    );

    let hero = |key: &str, default: &str| {
        data.components.text(&format!("commune_hero.{key}"), default)
    };
    ctx.set(
        "HERO_STAT_INTERVENTION_VALUE",
        hero("stat_intervention_value", "30 min"),
    );
    ctx.set(
        "HERO_STAT_INTERVENTION_LABEL",
        hero("stat_intervention_label", "Intervention rapide"),
    );
    ctx.set(
        "HERO_STAT_DISPONIBLE_VALUE",
        hero("stat_disponible_value", "24h/24 - 7j/7"),
    );
    ctx.set(
        "HERO_STAT_DISPONIBLE_LABEL",
        hero("stat_disponible_label", "Disponible"),
    );
    ctx.set(
        "HERO_BTN_VOIR_SERVICES",
        hero("btn_voir_services", "Voir les services"),
    );
    ctx.set(
        "HERO_DEVIS_TITRE",
        hero("devis_titre", "Obtenez Votre Tarif en 2 Minutes"),
    );
    ctx.set(
        "HERO_DEVIS_SUBTITLE",
        hero(
            "devis_subtitle",
            "Appelez-nous, décrivez votre panne, recevez un prix exact. Sans engagement.",
        ),
    );
    ctx.set(
        "SECTION_SERVICES_LABEL",
        hero("section_services_label", "NOS SERVICES"),
    );
    ctx.set(
        "SECTION_ZONES_LABEL",
        hero("section_zones_label", "ZONES VOISINES"),
    );
    ctx.set(
        "CTA_FINAL_SUBTITLE",
        hero(
            "cta_subtitle_template",
            "Intervention rapide à {{COMMUNE_NAME}} en moins de 30 minutes",
        )
        .replace("{{COMMUNE_NAME}}", &commune.name),
    );

    ctx.set(
        "SIDEBAR_SERVICES_TITLE",
        text("sidebar.services_title", "Nos Services à {{COMMUNE}}"),
    );
    ctx.set(
        "SIDEBAR_BREAKDOWN_BADGE",
        text("sidebar.breakdown_badge", "En panne à {{COMMUNE}} ?"),
    );
    ctx.set(
        "SIDEBAR_AVAILABILITY",
        ui.text("sidebar.availability", "Disponible 24h/24 - 7j/7"),
    );
    ctx.set(
        "SIDEBAR_NEARBY_TITLE",
        ui.text("sidebar.nearby_title", "Communes Voisines"),
    );

    let biz = business(data);
    let canonical = data.locale.absolute_url(&data.domain, Some(&commune.slug));
    let description = ctx.get("META_DESCRIPTION").unwrap_or_default().to_string();
    ctx.set(
        "SCHEMA_ORG_COMMUNE",
        schema_org::to_json_ld(&schema_org::commune(
            &biz,
            commune,
            &canonical,
            &description,
        )),
    );
    ctx.set(
        "SCHEMA_ORG_BREADCRUMB",
        breadcrumb_schema(
            data,
            vec![
                (ui.text("nav.zones", "Zones"), format!("{}#zones", biz.url)),
                (commune.name.clone(), canonical),
            ],
        ),
    );

    let services = data.services_by_priority();
    let active = data.active_communes();
    let neighbors: Vec<&Commune> = data
        .neighbors_of(commune)
        .into_iter()
        .take(NEIGHBOR_LINKS)
        .collect();
    ctx.set(
        "SIDEBAR_SERVICES",
        fragments::link_list(
            &COMMUNE_SIDEBAR_SERVICES.select(&services, commune.id, COMMUNE_SIDEBAR_SERVICES_LIMIT),
            SUBPAGE,
        ),
    );
    ctx.set(
        "SIDEBAR_VOISINES",
        fragments::link_list(&neighbors, SUBPAGE),
    );
    ctx.set(
        "SIDEBAR_SERVICES_ALL",
        ui.fill(
            "sidebar.services_all",
            "Voir tous les services ({{NOMBRE_SERVICES}}) →",
            "NOMBRE_SERVICES",
            &services.len().to_string(),
        ),
    );
    let nearby_all = ui.fill(
        "sidebar.nearby_all",
        "Voir toutes les zones ({{NOMBRE_COMMUNES}}) →",
        "NOMBRE_COMMUNES",
        &active.len().to_string(),
    );
    ctx.set("SIDEBAR_NEARBY_ALL", nearby_all);
    let lang = data.locale.lang;
    let services_url = format!("{SUBPAGE}{}/", data.page_slug("services", lang));
    ctx.set("SIDEBAR_SERVICES_URL", services_url.as_str());
    ctx.set(
        "SIDEBAR_AREAS_URL",
        format!("{SUBPAGE}{}/", data.page_slug("zones", lang)),
    );
    ctx.set(
        "ZONES_VIEW_ALL",
        ui.fill(
            "zones.view_all",
            "Voir toutes les zones ({{NOMBRE_COMMUNES}}) →",
            "NOMBRE_COMMUNES",
            &active.len().to_string(),
        ),
    );
    ctx.set(
        "ARIA_LABEL_GOOGLE_REVIEWS",
        ui.text("aria_labels.google_reviews", "Voir nos avis Google"),
    );
    ctx.set("WHATSAPP_CONFIG_JSON", whatsapp_config(data, Level::Subpage));

    ctx.set(
        "SERVICES_CARDS",
        service_cards(
            renderer,
            &COMMUNE_SERVICE_CARDS.select(&services, commune.id, COMMUNE_SERVICE_CARDS_LIMIT),
            SUBPAGE,
            "service-card-compact",
        )?,
    );
    ctx.set(
        "WHY_US_CARDS",
        renderer.render_partial("why-cards", &WhyView {
            cards: &why_cards(data, commune),
        })?,
    );
    ctx.set(
        "COMMUNES_VOISINES_TAGS",
        tag_links(&neighbors, SUBPAGE, "zone-tag"),
    );

    // Empty unless an enriched content file fills them.
    ctx.set("H2_ON_CONNAIT", "");
    ctx.set("INTRO_ON_CONNAIT", "");
    ctx.set("QUARTIERS_HTML", "");
    ctx.set("CONCLUSION_ON_CONNAIT", "");
    ctx.set("SHOW_ON_CONNAIT", "none");
    ctx.set("INTRO_SERVICES", "");
    ctx.set(
        "SERVICES_CTA_TEXT",
        ui.text("communes.services_cta", "Voir tous nos services"),
    );
    ctx.set("SERVICES_CTA_URL", services_url);
    ctx.set("FAQ_LOCALE_HTML", "");
    ctx.set("SCHEMA_ORG_FAQ", "");
    ctx.set("BREADCRUMB_ITEMS", Trail::Commune(&commune.name).html(data));

    enrich(
        data,
        &PageInfo::subpage(commune_slugs(data, commune.id)),
        &mut ctx,
    );

    if content.is_enriched() {
        apply_enriched(data, renderer, &content, &mut ctx)?;
    } else {
        apply_flat(&content, &mut ctx);
    }

    if ctx.get("CONTENT_H2_3").is_none_or(str::is_empty) {
        let body = text(
            "communes.content.h2_3_default",
            "Nous intervenons également dans les communes voisines de {{COMMUNE_NAME}}. Notre proximité nous permet une intervention rapide partout dans la région.",
        );
        ctx.set("CONTENT_H2_3", format!("<p>{body}</p>"));
    }
    if ctx.get("CONTENT_H2_1").is_none_or(str::is_empty) {
        let body = text(
            "communes.content.h2_1_default",
            "Service de dépannage professionnel à {{COMMUNE_NAME}}. Nous intervenons rapidement dans toute la commune et ses alentours.",
        );
        ctx.set("CONTENT_H2_1", format!("<p>{body}</p>"));
    }

    let html = renderer.render_page("commune", &ctx)?;
    Ok(RenderedPage {
        slug: Some(commune.slug.clone()),
        class: OutputClass::Commune,
        html,
    })
}

/// Version 1.0: optional titles and bodies for sections one and three.
fn apply_flat(content: &CommuneContent, ctx: &mut PageContext) {
    let sections = &content.content;
    let pairs = [
        ("H2_1", &sections.h2_1),
        ("CONTENT_H2_1", &sections.content_h2_1),
        ("H2_3", &sections.h2_3),
        ("CONTENT_H2_3", &sections.content_h2_3),
    ];
    for (key, value) in pairs {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            let expanded = substitute(value, &*ctx);
            ctx.set(key, expanded);
        }
    }
}

/// Version 2.0: hero and meta overrides plus the named blocks.
fn apply_enriched(
    data: &SiteData,
    renderer: &Renderer,
    content: &CommuneContent,
    ctx: &mut PageContext,
) -> Result<()> {
    let expand = |ctx: &PageContext, text: &str| substitute(text, ctx);

    if let Some(h1) = content.hero.h1.as_deref().filter(|s| !s.is_empty()) {
        ctx.set("H1", h1);
    }
    if let Some(accroche) = content.hero.accroche.as_deref().filter(|s| !s.is_empty()) {
        ctx.set("ACCROCHE", highlight(accroche));
    }
    if let Some(title) = content.seo.meta_title.as_deref().filter(|s| !s.is_empty()) {
        ctx.set("META_TITLE", title);
    }
    if let Some(desc) = content
        .seo
        .meta_description
        .as_deref()
        .filter(|s| !s.is_empty())
    {
        ctx.set("META_DESCRIPTION", desc);
    }

    let sections = &content.content;
    if let Some(intro) = &sections.intro_autorite {
        let p0 = expand(ctx, &intro.paragraphe_0);
        let p1 = expand(ctx, &intro.paragraphe_1);
        let p2 = expand(ctx, &intro.paragraphe_2);
        let markup = html! {
            @if !p0.is_empty() { p class="intro-kw" { (maud::PreEscaped(&p0)) } }
            @if !p1.is_empty() { p { (maud::PreEscaped(&p1)) } }
            @if !p2.is_empty() { p { (maud::PreEscaped(&p2)) } }
        };
        ctx.set("CONTENT_H2_1", markup.into_string());
    }

    if let Some(block) = sections
        .section_on_connait
        .as_ref()
        .filter(|b| !b.h2.is_empty())
    {
        let h2 = expand(ctx, &block.h2);
        let intro = expand(ctx, &block.intro);
        let conclusion = expand(ctx, &block.conclusion);
        let quarters = renderer.render_partial(
            "quarters-grid",
            &QuartersView {
                quarters: &block.quartiers,
            },
        )?;
        ctx.set("H2_ON_CONNAIT", h2);
        ctx.set("INTRO_ON_CONNAIT", intro);
        ctx.set("QUARTIERS_HTML", quarters);
        ctx.set("CONCLUSION_ON_CONNAIT", conclusion);
        ctx.set("SHOW_ON_CONNAIT", "block");
    }

    if let Some(block) = &sections.section_services {
        if let Some(h2) = &block.h2 {
            let h2 = expand(ctx, h2);
            ctx.set("H2_2", h2);
        }
        let intro = expand(ctx, &block.intro);
        if !intro.is_empty() {
            ctx.set(
                "INTRO_SERVICES",
                html! { p class="services-intro" { (maud::PreEscaped(&intro)) } }.into_string(),
            );
        }
        if let Some(cta) = &block.cta_text {
            let cta = expand(ctx, cta);
            ctx.set("SERVICES_CTA_TEXT", cta);
        }
        if let Some(url) = &block.cta_url {
            ctx.set("SERVICES_CTA_URL", url.as_str());
        }
    }

    if let Some(faq) = sections
        .faq_locale
        .as_ref()
        .filter(|f| !f.questions.is_empty())
    {
        let items = expand_faq(ctx, &faq.questions);
        let title = faq
            .h2
            .as_deref()
            .map(|h2| expand(ctx, h2))
            .unwrap_or_default();
        ctx.set("FAQ_LOCALE_HTML", faq_html(renderer, &title, &items)?);
        ctx.set("SCHEMA_ORG_FAQ", faq_schema(data, &items));
    }

    if let Some(block) = &sections.section_zones_voisines {
        if let Some(h2) = &block.h2 {
            let h2 = expand(ctx, h2);
            ctx.set("H2_3", h2);
        }
        let body = expand(ctx, &block.content);
        ctx.set("CONTENT_H2_3", body);
        if !block.communes_voisines.is_empty() {
            let tags = html! {
                @for neighbor in &block.communes_voisines {
                    a href=(entity_href(SUBPAGE, &neighbor.slug)) class="zone-tag" { (neighbor.name) }
                }
            };
            ctx.set("COMMUNES_VOISINES_TAGS", tags.into_string());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page_ctx() -> PageContext {
        let mut ctx = PageContext::new();
        ctx.set("COMMUNE_NAME", "Ixelles");
        ctx.set("SHOW_ON_CONNAIT", "none");
        ctx
    }

    #[test]
    fn commune_text_fills_tokens() {
        let data = SiteData::fixture();
        let ixelles = data.communes[0].clone();
        assert_eq!(
            commune_text(
                &data,
                "communes.meta.title_default",
                "Dépannage {{COMMUNE_NAME}} ({{POSTAL_CODE}})",
                &ixelles
            ),
            "Dépannage Ixelles (1050)"
        );
        assert_eq!(
            highlight("Intervention rapide garantie"),
            "<strong>Intervention rapide</strong> garantie"
        );
    }

    #[test]
    fn flat_content_overrides_sections() {
        let content: CommuneContent = serde_json::from_value(json!({
            "content": {"h2_1": "Titre", "content_h2_1": "<p>À {{COMMUNE_NAME}}</p>", "h2_3": ""}
        }))
        .expect("content");
        let mut ctx = page_ctx();
        ctx.set("H2_3", "Zones");
        apply_flat(&content, &mut ctx);
        assert_eq!(ctx.get("H2_1"), Some("Titre"));
        assert_eq!(ctx.get("CONTENT_H2_1"), Some("<p>À Ixelles</p>"));
        assert_eq!(ctx.get("H2_3"), Some("Zones"));
    }

    #[test]
    fn enriched_content_fills_named_blocks() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let renderer = Renderer::load(tmp.path()).expect("renderer");
        let data = SiteData::fixture();
        let content: CommuneContent = serde_json::from_value(json!({
            "version": "2.0",
            "hero": {"accroche": "Intervention rapide à Ixelles"},
            "content": {
                "intro_autorite": {"paragraphe_0": "Premier {{COMMUNE_NAME}}", "paragraphe_2": "Dernier"},
                "section_on_connait": {
                    "h2": "On connaît {{COMMUNE_NAME}}",
                    "quartiers": [{"nom": "Flagey", "description": "Place"}]
                },
                "faq_locale": {"h2": "FAQ {{COMMUNE_NAME}}", "questions": [{"question": "Q?", "reponse": "R."}]},
                "section_zones_voisines": {
                    "content": "<p>Voisines</p>",
                    "communes_voisines": [{"nom": "Uccle", "slug": "depannage-uccle"}]
                }
            }
        }))
        .expect("content");
        let mut ctx = page_ctx();
        apply_enriched(&data, &renderer, &content, &mut ctx).expect("apply");

        assert_eq!(
            ctx.get("ACCROCHE"),
            Some("<strong>Intervention rapide</strong> à Ixelles")
        );
        assert_eq!(
            ctx.get("CONTENT_H2_1"),
            Some(r#"<p class="intro-kw">Premier Ixelles</p><p>Dernier</p>"#)
        );
        assert_eq!(ctx.get("H2_ON_CONNAIT"), Some("On connaît Ixelles"));
        assert_eq!(ctx.get("SHOW_ON_CONNAIT"), Some("block"));
        assert!(ctx.get("QUARTIERS_HTML").is_some_and(|h| h.contains("Flagey")));
        assert!(ctx.get("FAQ_LOCALE_HTML").is_some_and(|h| h.contains("FAQ Ixelles")));
        assert!(ctx.get("SCHEMA_ORG_FAQ").is_some_and(|h| h.contains("FAQPage")));
        assert_eq!(ctx.get("CONTENT_H2_3"), Some("<p>Voisines</p>"));
        assert_eq!(
            ctx.get("COMMUNES_VOISINES_TAGS"),
            Some(r#"<a href="../depannage-uccle/index.html" class="zone-tag">Uccle</a>"#)
        );
    }
}
