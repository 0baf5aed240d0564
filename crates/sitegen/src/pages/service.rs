// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Service pages: `<slug>/index.html` for every service.

use super::{
    OutputClass, RenderedPage, SUBPAGE, Trail, breadcrumb_schema, business, expand_faq, faq_html,
    faq_schema, service_slugs, whatsapp_config,
};
use crate::context::{PageContext, PageInfo, enrich};
use crate::error::Result;
use crate::fragments::{self, inline_links, joined_links};
use crate::lang::Level;
use crate::model::{Commune, Service, ZONE_BRUSSELS, ZONE_PERIPHERY};
use crate::render::Renderer;
use crate::resolve::{format_phone_number, substitute};
use crate::rotation::{
    SERVICE_COMMUNE_LINKS, SERVICE_COMMUNE_LINKS_LIMIT, SERVICE_SIDEBAR_COMMUNES,
    SERVICE_SIDEBAR_COMMUNES_LIMIT, SERVICE_SIDEBAR_OTHER_CATEGORY,
    SERVICE_SIDEBAR_OTHER_CATEGORY_LIMIT, SERVICE_SIDEBAR_SAME_CATEGORY,
    SERVICE_SIDEBAR_SAME_CATEGORY_LIMIT, ZONES_BRUSSELS, ZONES_BRUSSELS_LIMIT, ZONES_PERIPHERY,
    ZONES_PERIPHERY_LIMIT, top_n,
};
use crate::schema_org;
use crate::store::SiteData;
use serde::Serialize;

/// Body sections every service page template has slots for.
const SECTION_SLOTS: usize = 6;

const ZONES_P1: &str = "Que vous soyez coincé à {{COMMUNES_BRUXELLES}} ou n'importe où dans les 19 communes de Bruxelles, on est là. Pareil pour la périphérie : {{COMMUNES_PERIPHERIE}}… En général, comptez <strong>30 minutes</strong> et on est sur place.";
const ZONES_P1_BRUSSELS_ONLY: &str = "Que vous soyez coincé à {{COMMUNES_BRUXELLES}} ou n'importe où dans les 19 communes de Bruxelles, on est là. En général, comptez <strong>30 minutes</strong> et on est sur place.";
const ZONES_P2: &str = "On se déplace aussi à {{COMMUNES_PERIPHERIE}}… bref, tout Bruxelles et les alentours. <strong>Disponible 24h/24, 7j/7</strong>, même les jours fériés.";
const ZONES_P2_DEFAULT: &str = "On se déplace dans tout Bruxelles et les alentours. <strong>Disponible 24h/24, 7j/7</strong>, même les jours fériés.";

/// Related services for the sidebar: rotated picks from the same category,
/// then from the other categories.
fn sidebar_services<'a>(data: &'a SiteData, service: &Service) -> Vec<&'a Service> {
    let sorted = data.services_by_priority();
    let same: Vec<&Service> = sorted
        .iter()
        .copied()
        .filter(|s| s.category == service.category && s.id != service.id)
        .collect();
    let other: Vec<&Service> = sorted
        .iter()
        .copied()
        .filter(|s| s.category != service.category)
        .collect();
    let mut picked =
        SERVICE_SIDEBAR_SAME_CATEGORY.select(&same, service.id, SERVICE_SIDEBAR_SAME_CATEGORY_LIMIT);
    picked.extend(SERVICE_SIDEBAR_OTHER_CATEGORY.select(
        &other,
        service.id,
        SERVICE_SIDEBAR_OTHER_CATEGORY_LIMIT,
    ));
    picked
}

/// Sidebar communes; small tables always show their top entries.
fn sidebar_communes<'a>(data: &'a SiteData, service: &Service) -> Vec<&'a Commune> {
    let sorted = data.communes_by_priority();
    if sorted.len() > SERVICE_SIDEBAR_COMMUNES_LIMIT {
        SERVICE_SIDEBAR_COMMUNES.select(&sorted, service.id, SERVICE_SIDEBAR_COMMUNES_LIMIT)
    } else {
        top_n(sorted, SERVICE_SIDEBAR_COMMUNES_LIMIT)
    }
}

/// The two "zones of intervention" paragraphs: three Brussels communes
/// and up to six periphery communes, rotated by `seed`.
fn zones_intervention(data: &SiteData, seed: i64) -> String {
    let sorted = data.communes_by_priority();
    let in_zone = |zone: &str| -> Vec<&Commune> {
        sorted.iter().copied().filter(|c| c.zone == zone).collect()
    };
    let brussels = ZONES_BRUSSELS.select(&in_zone(ZONE_BRUSSELS), seed, ZONES_BRUSSELS_LIMIT);
    let periphery = ZONES_PERIPHERY.select(&in_zone(ZONE_PERIPHERY), seed, ZONES_PERIPHERY_LIMIT);

    let links = |items: &[&Commune]| joined_links(items, SUBPAGE, Some("zone-link"), ", ");
    let brussels_links = if brussels.is_empty() {
        ZONE_BRUSSELS.to_string()
    } else {
        links(&brussels)
    };
    let first = if periphery.len() >= 3 { &periphery[..3] } else { &[][..] };
    let second = if periphery.len() >= 6 { &periphery[3..6] } else { &[][..] };

    let p1 = if first.is_empty() {
        data.ui
            .text("zones_intervention.paragraph_1_brussels_only", ZONES_P1_BRUSSELS_ONLY)
            .replace("{{COMMUNES_BRUXELLES}}", &brussels_links)
    } else {
        data.ui
            .text("zones_intervention.paragraph_1", ZONES_P1)
            .replace("{{COMMUNES_BRUXELLES}}", &brussels_links)
            .replace("{{COMMUNES_PERIPHERIE}}", &links(first))
    };
    let p2 = if second.is_empty() {
        data.ui.text("zones_intervention.paragraph_2_default", ZONES_P2_DEFAULT)
    } else {
        data.ui
            .text("zones_intervention.paragraph_2", ZONES_P2)
            .replace("{{COMMUNES_PERIPHERIE}}", &links(second))
    };
    format!("<p>{p1}</p>\n<p>{p2}</p>")
}

#[derive(Serialize)]
struct BadgesView {
    badges: Vec<String>,
}

/// Build the page for `service`.
pub fn assemble(data: &SiteData, renderer: &Renderer, service: &Service) -> Result<RenderedPage> {
    diagnostics::log_debug!("assembling service {slug}", slug: service.slug.as_str());
    let content = data.service_content(&service.slug);
    let seed = content.service_id.unwrap_or(1);
    let ui = &data.ui;
    let mut ctx = PageContext::new();

    ctx.set("META_TITLE", service.meta_title.as_str());
    ctx.set("META_DESCRIPTION", service.meta_description.as_str());
    ctx.set("KEYWORDS", service.seo_related_keywords.join(", "));
    ctx.set(
        "H1",
        content.hero.h1.clone().unwrap_or_else(|| service.name.clone()),
    );
    ctx.set("SERVICE_NAME", service.name.as_str());
    ctx.set("SERVICE_ICON", service.icon.as_str());
    ctx.set("LANGUAGE", data.locale.lang.code());

    let communes = data.communes_by_priority();
    ctx.set(
        "COMMUNES_LINKS",
        inline_links(
            &SERVICE_COMMUNE_LINKS.select(&communes, seed, SERVICE_COMMUNE_LINKS_LIMIT),
            SUBPAGE,
        ),
    );
    ctx.set("ZONES_INTERVENTION_CONTENT", zones_intervention(data, seed));

    let badges = content
        .hero
        .badges
        .iter()
        .map(|id| data.components.text(&format!("badges.{id}"), id))
        .collect();
    ctx.set(
        "AB_REASSURANCE_BADGES",
        renderer.render_partial("hero-badges", &BadgesView { badges })?,
    );

    let contact = &data.vars.contact;
    let phone_display = if contact.phone_local_display.is_empty() {
        contact.phone_local.as_str()
    } else {
        contact.phone_local_display.as_str()
    };
    ctx.set("CTA_PRIMARY", format_phone_number(phone_display));
    ctx.set("CTA_SECONDARY", ui.text("cta.devis_gratuit", "Devis gratuit"));

    let biz = business(data);
    let canonical = data.locale.absolute_url(&data.domain, Some(&service.slug));
    ctx.set(
        "SCHEMA_ORG_SERVICE",
        schema_org::to_json_ld(&schema_org::service(&biz, service)),
    );
    ctx.set(
        "SCHEMA_ORG_BREADCRUMB",
        breadcrumb_schema(
            data,
            vec![
                (
                    ui.text("nav.services", "Services"),
                    format!("{}#services", biz.url),
                ),
                (service.name.clone(), canonical),
            ],
        ),
    );

    ctx.set(
        "SIDEBAR_SERVICES",
        fragments::link_list(&sidebar_services(data, service), SUBPAGE),
    );
    ctx.set(
        "SIDEBAR_COMMUNES",
        fragments::link_list(&sidebar_communes(data, service), SUBPAGE),
    );
    ctx.set(
        "SIDEBAR_OTHER_SERVICES_TITLE",
        ui.text("sidebar.other_services_title", "Autres Services"),
    );
    ctx.set(
        "SIDEBAR_INTERVENTION_BADGE",
        ui.text("sidebar.intervention_badge", "Intervention en 30 minutes"),
    );
    ctx.set(
        "SIDEBAR_AVAILABILITY",
        ui.text("sidebar.availability", "Disponible 24h/24 - 7j/7"),
    );
    ctx.set(
        "SIDEBAR_SERVED_AREAS_TITLE",
        ui.text("sidebar.served_areas_title", "Communes Desservies"),
    );
    ctx.set(
        "SIDEBAR_SERVICES_ALL",
        ui.fill(
            "sidebar.services_all",
            "Voir tous les services ({{NOMBRE_SERVICES}}) →",
            "NOMBRE_SERVICES",
            &data.services.len().to_string(),
        ),
    );
    ctx.set(
        "SIDEBAR_NEARBY_ALL",
        ui.fill(
            "sidebar.nearby_all",
            "Voir toutes les zones ({{NOMBRE_COMMUNES}}) →",
            "NOMBRE_COMMUNES",
            &communes.len().to_string(),
        ),
    );
    let lang = data.locale.lang;
    ctx.set(
        "SIDEBAR_SERVICES_URL",
        format!("{SUBPAGE}{}/", data.page_slug("services", lang)),
    );
    ctx.set(
        "SIDEBAR_AREAS_URL",
        format!("{SUBPAGE}{}/", data.page_slug("zones", lang)),
    );
    ctx.set(
        "ARIA_LABEL_GOOGLE_REVIEWS",
        ui.text("aria_labels.google_reviews", "Voir nos avis Google"),
    );
    ctx.set("WHATSAPP_CONFIG_JSON", whatsapp_config(data, Level::Subpage));
    ctx.set("BREADCRUMB_ITEMS", Trail::Service(&service.name).html(data));

    enrich(
        data,
        &PageInfo::subpage(service_slugs(data, service.id)),
        &mut ctx,
    );

    // Copy from the content file may reference any context value.
    let placeholder = format!(
        "<p>{}</p>",
        ui.text("defaults.contenu_a_venir", "Contenu à venir...")
    );
    for slot in 1..=SECTION_SLOTS {
        let (h2, body) = match content.sections.get(slot - 1) {
            Some(section) => (section.h2.clone(), substitute(&section.content, &ctx)),
            None => (String::new(), placeholder.clone()),
        };
        ctx.set(format!("H2_{slot}"), h2);
        ctx.set(format!("CONTENT_H2_{slot}"), body);
    }

    let phone_button = ui.fill(
        "cta.appeler_template",
        "Appelez {{PHONE}}",
        "PHONE",
        phone_display,
    );
    let cta = &content.cta;
    let titre = cta
        .title
        .clone()
        .unwrap_or_else(|| ui.text("cta.besoin_aide", "Besoin d'aide ?"));
    let subtitle = cta
        .subtitle
        .clone()
        .unwrap_or_else(|| ui.text("cta.contactez_nous", "Contactez-nous maintenant"));
    let button = cta.button_text.clone().unwrap_or(phone_button);
    ctx.set("CTA_FINAL_TITRE", substitute(&titre, &ctx));
    ctx.set("CTA_FINAL_SUBTITLE", substitute(&subtitle, &ctx));
    ctx.set("CTA_FINAL_BUTTON", substitute(&button, &ctx));

    let faq = expand_faq(&ctx, &content.faq);
    let faq_title = data
        .components
        .text("faq.section_title", "Questions Fréquentes");
    ctx.set("FAQ_SECTION", faq_html(renderer, &faq_title, &faq)?);
    ctx.set("SCHEMA_ORG_FAQ", faq_schema(data, &faq));

    let html = renderer.render_page("service", &ctx)?;
    Ok(RenderedPage {
        slug: Some(service.slug.clone()),
        class: OutputClass::Service,
        html,
    })
}
