// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! The homepage of one language.

use super::{
    OutputClass, RenderedPage, business, expand_faq, expand_keys, faq_html, faq_schema,
    service_cards, whatsapp_config, whatsapp_number,
};
use crate::content::AlternatingSection;
use crate::context::{PageContext, PageInfo, enrich};
use crate::error::Result;
use crate::fragments::{attr_escaped, tag_links};
use crate::lang::Level;
use crate::render::Renderer;
use crate::resolve::{get_dimension_attrs, resolve_path, substitute};
use crate::rotation::top_n;
use crate::schema_org;
use crate::store::SiteData;
use serde::Serialize;

const HOME_SERVICES: usize = 6;
const HOME_ZONES: usize = 12;

/// `stats.*` in `variables.json`, with the values shown when unset.
const STATS: &[(&str, &str, &str)] = &[
    ("STATS_YEARS_EXPERIENCE", "stats.years_experience", "15"),
    ("STATS_YEARS_EXISTENCE", "stats.years_existence", "10"),
    ("STATS_ARRIVAL_TIME", "stats.arrival_time", "30 min"),
    ("STATS_SATISFACTION_RATE", "stats.satisfaction_rate", "98%"),
    ("STATS_LOCATIONS_BRUXELLES", "stats.locations_bruxelles", "19"),
    ("STATS_LOCATIONS_PERIPHERIE", "stats.locations_peripherie", "16"),
    ("STATS_SERVICES_REMORQUAGE", "stats.services_remorquage", "13"),
    ("STATS_SERVICES_DEPANNAGE", "stats.services_depannage", "9"),
];

#[derive(Serialize)]
struct SectionView {
    reverse: bool,
    /// Escaped `src`, empty without an image.
    src: String,
    image_alt: String,
    dimensions: String,
    label: String,
    titre: String,
    paragraphe: String,
    points: Vec<String>,
}

#[derive(Serialize)]
struct SectionsView<'a> {
    sections: &'a [SectionView],
}

fn section_view(
    data: &SiteData,
    ctx: &PageContext,
    section: &AlternatingSection,
    prefix: &str,
) -> SectionView {
    let src = if section.image.is_empty() {
        String::new()
    } else {
        attr_escaped(&format!("{prefix}{}", section.image))
    };
    SectionView {
        reverse: section.kind == "image-droite",
        src,
        image_alt: substitute(&section.image_alt, ctx),
        dimensions: get_dimension_attrs(&section.image, &data.dimensions),
        label: substitute(&section.label, ctx),
        titre: substitute(&section.titre, ctx),
        paragraphe: substitute(&section.paragraphe, ctx),
        points: section.points.iter().map(|p| substitute(p, ctx)).collect(),
    }
}

/// `https://wa.me/<number>?text=<message>`
fn whatsapp_link(phone: &str, message: &str) -> String {
    let base = format!("https://wa.me/{phone}");
    match url::Url::parse_with_params(&base, &[("text", message)]) {
        Ok(link) => link.to_string(),
        Err(e) => {
            diagnostics::log_warn!(
                "cannot build WhatsApp link for {phone}: {reason}",
                phone: phone,
                reason: e.to_string()
            );
            base
        }
    }
}

/// Build the homepage.
pub fn assemble(data: &SiteData, renderer: &Renderer) -> Result<RenderedPage> {
    diagnostics::log_debug!("assembling homepage for {lang}", lang: data.locale.lang.code());
    let content = data.homepage_content();
    let ui = &data.ui;
    let prefix = Level::Base.path_prefix();
    let mut ctx = PageContext::new();

    ctx.set("LANGUAGE", data.locale.lang.code());
    ctx.set(
        "META_TITLE",
        content
            .meta_title
            .clone()
            .unwrap_or_else(|| "Dépannage Auto Bruxelles 24/7".to_string()),
    );
    ctx.set(
        "META_DESCRIPTION",
        content
            .meta_description
            .clone()
            .unwrap_or_else(|| "Service de dépannage automobile à Bruxelles".to_string()),
    );
    ctx.set(
        "KEYWORDS",
        content.keywords.clone().unwrap_or_else(|| {
            "dépannage automobile bruxelles, remorquage voiture, panne batterie, assistance 24h"
                .to_string()
        }),
    );
    ctx.set(
        "H1",
        content
            .h1
            .clone()
            .unwrap_or_else(|| "Service de Dépannage Automobile à Bruxelles".to_string()),
    );
    ctx.set(
        "HERO_SUBTITLE",
        content
            .hero
            .h2
            .clone()
            .unwrap_or_else(|| "Intervention rapide 24h/24 et 7j/7".to_string()),
    );
    ctx.set(
        "CTA_PRIMARY",
        content
            .hero
            .cta_text
            .clone()
            .unwrap_or_else(|| "Appeler Maintenant".to_string()),
    );
    ctx.set("HERO_IMAGE", content.hero.image.clone().unwrap_or_default());

    for (key, path, default) in STATS {
        let value = resolve_path(path, &data.variables);
        ctx.set(*key, if value.is_empty() { (*default).to_string() } else { value });
    }

    ctx.set("WHATSAPP_CONFIG_JSON", whatsapp_config(data, Level::Base));
    ctx.set(
        "WHATSAPP_LINK",
        whatsapp_link(
            &whatsapp_number(data),
            &ui.text(
                "homepage.whatsapp_message",
                "Bonjour, j'aimerais obtenir un devis pour un dépannage à Bruxelles.",
            ),
        ),
    );

    let services = top_n(&data.services, HOME_SERVICES);
    ctx.set(
        "SERVICES_CARDS",
        service_cards(renderer, &services, prefix, "service-card")?,
    );
    ctx.set(
        "ZONES_TAGS",
        tag_links(&top_n(data.active_communes(), HOME_ZONES), prefix, "zone-tag"),
    );

    let biz = business(data);
    let description = ctx.get("META_DESCRIPTION").unwrap_or_default().to_string();
    ctx.set(
        "SCHEMA_ORG_LOCALBUSINESS",
        schema_org::to_json_ld(&schema_org::organization(
            &biz,
            &description,
            &data.services_by_priority(),
        )),
    );
    ctx.set(
        "ARIA_LABEL_GOOGLE_REVIEWS",
        ui.text("aria_labels.google_reviews", "Voir nos avis Google"),
    );

    let faq = &content.section_faq;
    ctx.set(
        "SECTION_FAQ_LABEL",
        faq.label.clone().unwrap_or_else(|| "FAQ".to_string()),
    );
    ctx.set(
        "SECTION_FAQ_TITRE",
        faq.titre
            .clone()
            .unwrap_or_else(|| "Questions Fréquentes".to_string()),
    );

    enrich(data, &PageInfo::home(), &mut ctx);
    expand_keys(
        &mut ctx,
        &["META_TITLE", "META_DESCRIPTION", "H1", "HERO_SUBTITLE", "CTA_PRIMARY"],
    );

    let cta = &content.cta_final;
    let titre = cta
        .titre
        .clone()
        .unwrap_or_else(|| "Besoin d'un Service de Dépannage ?".to_string());
    let sous_titre = cta
        .sous_titre
        .clone()
        .unwrap_or_else(|| "Contactez-nous pour une intervention rapide".to_string());
    let bouton = cta
        .bouton
        .clone()
        .unwrap_or_else(|| "Nous Contacter".to_string());
    ctx.set("CTA_FINAL_TITRE", substitute(&titre, &ctx));
    ctx.set("CTA_FINAL_SUBTITLE", substitute(&sous_titre, &ctx));
    ctx.set("CTA_FINAL_BUTTON", substitute(&bouton, &ctx));

    let sections: Vec<SectionView> = content
        .sections_alternees
        .iter()
        .map(|section| section_view(data, &ctx, section, prefix))
        .collect();
    ctx.set(
        "SECTIONS_ALTERNEES",
        renderer.render_partial(
            "sections-alternating",
            &SectionsView {
                sections: &sections,
            },
        )?,
    );

    let items = expand_faq(&ctx, &faq.questions);
    ctx.set("FAQ_ITEMS", faq_html(renderer, "", &items)?);
    ctx.set("SCHEMA_ORG_FAQ", faq_schema(data, &items));

    let html = renderer.render_page("home", &ctx)?;
    Ok(RenderedPage {
        slug: None,
        class: OutputClass::Home,
        html,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn whatsapp_link_encodes_the_message() {
        let link = whatsapp_link("32479890089", "Bonjour, un devis");
        assert!(link.starts_with("https://wa.me/32479890089?text="));
        assert!(!link.contains(' '));
        assert!(link.contains("Bonjour"));
    }

    #[test]
    fn sections_expand_and_measure_images() {
        let mut data = SiteData::fixture();
        data.dimensions = json!({"home/a.webp": {"width": 800, "height": 600}});
        let section: AlternatingSection = serde_json::from_value(json!({
            "type": "image-droite",
            "titre": "Appelez {{TELEPHONE}}",
            "image": "images/home/a.webp",
            "points": ["{{GOOGLE_RATING}}/5"]
        }))
        .expect("section");
        let mut ctx = PageContext::new();
        ctx.set("TELEPHONE", "0479 89 00 89");
        ctx.set("GOOGLE_RATING", "4.9");
        let view = section_view(&data, &ctx, &section, "");
        assert!(view.reverse);
        assert_eq!(view.titre, "Appelez 0479 89 00 89");
        assert_eq!(view.points, vec!["4.9/5".to_string()]);
        assert_eq!(view.dimensions, r#"width="800" height="600""#);
        assert_eq!(view.src, "images/home/a.webp");
    }
}
