// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Page contexts and the generic enrichment pipeline.
//!
//! A page assembler first sets the values specific to its page with
//! [`PageContext::set`], then runs [`enrich`]. Every pipeline step writes
//! with [`PageContext::set_default`], so a value set by the page is never
//! replaced by a generic one.

use crate::fragments::{self, hreflang_links};
use crate::lang::{Language, Level, absolute_url};
use crate::resolve::{Variables, format_phone_number, resolve_path};
use crate::rotation::top_n;
use crate::store::SiteData;
use std::collections::BTreeMap;

/// Communes linked from the footer.
const FOOTER_COMMUNES_LIMIT: usize = 6;

/// Flat placeholder map for one page render.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    vars: BTreeMap<String, String>,
}

impl PageContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a page-specific value, replacing any previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Set a value only when the key is absent. Returns whether it was set.
    pub fn set_default(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        match self.vars.entry(key.into()) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(value.into());
                true
            }
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Variables for PageContext {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name)
    }
}

/// Where the page sits and what it is called in each language.
#[derive(Debug, Clone)]
pub struct PageInfo {
    pub level: Level,
    /// Slug per language; empty for the homepage. Languages without an
    /// entry reuse the current language's slug.
    pub slugs: BTreeMap<Language, String>,
}

impl PageInfo {
    #[must_use]
    pub fn home() -> Self {
        Self {
            level: Level::Base,
            slugs: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn subpage(slugs: BTreeMap<Language, String>) -> Self {
        Self {
            level: Level::Subpage,
            slugs,
        }
    }

    fn slug(&self, lang: Language, current: Language) -> Option<&str> {
        self.slugs
            .get(&lang)
            .or_else(|| self.slugs.get(&current))
            .map(String::as_str)
    }
}

/// One stage of the generic enrichment pipeline.
pub trait ContextStep {
    fn name(&self) -> &'static str;
    fn apply(&self, data: &SiteData, page: &PageInfo, ctx: &mut PageContext);
}

/// Site identity and contact details.
///
/// Reads `variables.json` (`site`, `contact`, `google`, `social`,
/// `company.name_full`) and the entity counts. Writes `PATH_PREFIX`,
/// `SITE_NAME`, `DOMAIN`, `TELEPHONE`, `TELEPHONE_HREF`, `TELEPHONE_LINK`,
/// `EMAIL`, `ADDRESS`, `GOOGLE_RATING`, `GOOGLE_REVIEWS`,
/// `GOOGLE_MY_BUSINESS_URL`, `FACEBOOK_URL`, `INSTAGRAM_URL`,
/// `COMPANY_NAME`, `NOMBRE_SERVICES`, `NOMBRE_COMMUNES`, `CURRENT_YEAR`.
pub struct SiteStep;

impl ContextStep for SiteStep {
    fn name(&self) -> &'static str {
        "site"
    }

    fn apply(&self, data: &SiteData, page: &PageInfo, ctx: &mut PageContext) {
        let contact = &data.vars.contact;
        let display = if contact.phone_local_display.is_empty() {
            format_phone_number(&contact.phone_local)
        } else {
            contact.phone_local_display.clone()
        };
        let dial = if contact.phone.is_empty() {
            &contact.phone_local
        } else {
            &contact.phone
        };
        let company = resolve_path("company.name_full", &data.variables);

        ctx.set_default("PATH_PREFIX", page.level.path_prefix());
        ctx.set_default("SITE_NAME", data.site_name.as_str());
        ctx.set_default("DOMAIN", data.domain.as_str());
        ctx.set_default("TELEPHONE", display);
        ctx.set_default("TELEPHONE_HREF", contact.phone_local.as_str());
        ctx.set_default("TELEPHONE_LINK", format!("tel:{dial}"));
        ctx.set_default("EMAIL", contact.email.as_str());
        ctx.set_default("ADDRESS", contact.address.as_str());
        ctx.set_default("GOOGLE_RATING", data.vars.google.rating.as_str());
        ctx.set_default("GOOGLE_REVIEWS", data.vars.google.reviews_count.as_str());
        ctx.set_default(
            "GOOGLE_MY_BUSINESS_URL",
            data.vars.google.my_business_url.as_str(),
        );
        ctx.set_default("FACEBOOK_URL", data.vars.social.facebook_url.as_str());
        ctx.set_default("INSTAGRAM_URL", data.vars.social.instagram_url.as_str());
        ctx.set_default(
            "COMPANY_NAME",
            if company.is_empty() {
                data.site_name.clone()
            } else {
                company
            },
        );
        ctx.set_default("NOMBRE_SERVICES", data.services.len().to_string());
        ctx.set_default("NOMBRE_COMMUNES", data.active_communes().len().to_string());
        ctx.set_default("CURRENT_YEAR", chrono::Local::now().format("%Y").to_string());
    }
}

/// Language switcher and localized index links.
///
/// Reads the locale and the static page slugs. Writes `CURRENT_LANG`,
/// `LANG_CODE`, `LANG_PREFIX`, `LANG_URL_{FR,EN,NL}`,
/// `LANG_ACTIVE_{FR,EN,NL}`, `HOME_URL`, `SERVICES_INDEX_URL`,
/// `ZONES_INDEX_URL`, `TARIFS_INDEX_URL`, `CONTACT_URL`.
pub struct LanguageStep;

impl ContextStep for LanguageStep {
    fn name(&self) -> &'static str {
        "language"
    }

    fn apply(&self, data: &SiteData, page: &PageInfo, ctx: &mut PageContext) {
        let locale = data.locale;
        let prefix = page.level.path_prefix();
        ctx.set_default("CURRENT_LANG", locale.lang.upper());
        ctx.set_default("LANG_CODE", locale.lang.code());
        ctx.set_default("LANG_PREFIX", locale.prefix());
        for lang in Language::ALL {
            ctx.set_default(
                format!("LANG_URL_{}", lang.upper()),
                locale.switch_url(lang, page.level),
            );
            ctx.set_default(
                format!("LANG_ACTIVE_{}", lang.upper()),
                if lang == locale.lang { "active" } else { "" },
            );
        }
        let index = |key: &str| {
            fragments::entity_href(prefix, data.page_slug(key, locale.lang))
        };
        ctx.set_default("HOME_URL", format!("{prefix}index.html"));
        ctx.set_default("SERVICES_INDEX_URL", index("services"));
        ctx.set_default("ZONES_INDEX_URL", index("zones"));
        ctx.set_default("TARIFS_INDEX_URL", index("tarifs"));
        ctx.set_default("CONTACT_URL", index("contact"));
    }
}

/// Alternate-language URLs.
///
/// Reads the page slugs and the configured languages. Writes
/// `CANONICAL_URL`, `HREFLANG_{FR,EN,NL}`, `HREFLANG_X_DEFAULT` and
/// `COMPONENT_HREFLANG` (the rendered `<link rel="alternate">` tags).
pub struct HreflangStep;

impl ContextStep for HreflangStep {
    fn name(&self) -> &'static str {
        "hreflang"
    }

    fn apply(&self, data: &SiteData, page: &PageInfo, ctx: &mut PageContext) {
        let locale = data.locale;
        let url_for = |lang: Language| {
            absolute_url(
                &data.domain,
                lang,
                locale.default,
                page.slug(lang, locale.lang),
            )
        };
        ctx.set_default("CANONICAL_URL", url_for(locale.lang));
        for lang in Language::ALL {
            ctx.set_default(format!("HREFLANG_{}", lang.upper()), url_for(lang));
        }
        let x_default = url_for(locale.default);
        ctx.set_default("HREFLANG_X_DEFAULT", x_default.as_str());

        let alternates: Vec<(Language, String)> = data
            .languages
            .iter()
            .map(|&lang| (lang, url_for(lang)))
            .collect();
        ctx.set_default("COMPONENT_HREFLANG", hreflang_links(&alternates, &x_default));
    }
}

/// Header labels from `ui.header`.
///
/// Writes the `HEADER_*` keys; `{{count}}` in the "view all" labels is
/// replaced by the service or commune count.
pub struct HeaderStep;

const HEADER_LABELS: &[(&str, &str, &str)] = &[
    ("HEADER_SERVICES_MENU", "header.services_menu", "Nos Services"),
    ("HEADER_ZONES_MENU", "header.zones_menu", "Zones d'Intervention"),
    ("HEADER_TARIFS", "header.tarifs", "Tarifs"),
    ("HEADER_CONTACT", "header.contact", "Contact"),
    ("HEADER_PHONE_CALL", "header.phone_call", "Appelez-nous"),
    ("HEADER_PHONE_24_7", "header.phone_24_7", "24/7"),
    ("HEADER_MOBILE_MENU_OPEN", "header.mobile_menu_open", "Ouvrir le menu"),
    ("HEADER_MOBILE_CALL_NOW", "header.mobile_call_now", "Appelez Maintenant"),
    ("HEADER_SERVICE_TOWING", "header.service_towing", "Remorquage de voitures"),
    ("HEADER_SERVICE_BATTERY", "header.service_battery", "Dépannage batterie"),
    ("HEADER_SERVICE_TIRE", "header.service_tire", "Réparation pneu"),
    ("HEADER_SERVICE_FUEL", "header.service_fuel", "Panne d'essence"),
    ("HEADER_SERVICE_DOOR", "header.service_door", "Ouverture de porte"),
    ("HEADER_SERVICE_MOTO", "header.service_moto", "Remorquage de motos"),
    ("HEADER_LANG_SELECT", "header.lang_select", "Sélectionner la langue"),
];

impl ContextStep for HeaderStep {
    fn name(&self) -> &'static str {
        "header"
    }

    fn apply(&self, data: &SiteData, _page: &PageInfo, ctx: &mut PageContext) {
        for (key, path, default) in HEADER_LABELS {
            ctx.set_default(*key, data.ui.text(path, default));
        }
        ctx.set_default(
            "HEADER_VIEW_ALL_SERVICES",
            data.ui.fill(
                "header.view_all_services",
                "Voir tous les services ({{count}}) →",
                "count",
                &data.services.len().to_string(),
            ),
        );
        ctx.set_default(
            "HEADER_VIEW_ALL_ZONES",
            data.ui.fill(
                "header.view_all_zones",
                "Voir toutes les zones ({{count}}) →",
                "count",
                &data.active_communes().len().to_string(),
            ),
        );
    }
}

/// Footer labels, legal links and the top communes.
///
/// Writes `FOOTER_COMMUNES`, `URL_ABOUT`, `URL_LEGAL`, `URL_PRIVACY`,
/// `URL_ZONES` and the `FOOTER_*` labels from `ui.footer`.
pub struct FooterStep;

const FOOTER_LABELS: &[(&str, &str, &str)] = &[
    ("FOOTER_DESCRIPTION", "footer.description", ""),
    ("FOOTER_SOCIAL_TITLE", "footer.social_title", "Restons connectés"),
    ("FOOTER_SERVICES_TITLE", "footer.services_title", "Nos Services"),
    ("FOOTER_SERVICES_ALL", "footer.services_all", "Tous les services"),
    ("FOOTER_INFO_TITLE", "footer.info_title", "Informations"),
    ("FOOTER_INFO_ABOUT", "footer.info_about", "À propos de nous"),
    ("FOOTER_INFO_LEGAL", "footer.info_legal", "Mentions Légales"),
    ("FOOTER_INFO_PRIVACY", "footer.info_privacy", "Confidentialité"),
    ("FOOTER_ZONES_TITLE", "footer.zones_title", "Zones d'Intervention"),
    ("FOOTER_ZONES_ALL", "footer.zones_all", "Voir toutes les communes"),
    ("FOOTER_REVIEWS_TITLE", "footer.reviews_title", "Votre Avis Compte"),
    ("FOOTER_REVIEWS_DESCRIPTION", "footer.reviews_description", ""),
    ("FOOTER_REVIEWS_COUNT", "footer.reviews_count", "avis clients"),
    ("FOOTER_COPYRIGHT", "footer.copyright", "Tous droits réservés"),
    (
        "FOOTER_TAGLINE",
        "footer.tagline",
        "Dépannage automobile professionnel 24h/24",
    ),
];

impl ContextStep for FooterStep {
    fn name(&self) -> &'static str {
        "footer"
    }

    fn apply(&self, data: &SiteData, page: &PageInfo, ctx: &mut PageContext) {
        let prefix = page.level.path_prefix();
        let lang = data.locale.lang;
        let communes = top_n(data.active_communes(), FOOTER_COMMUNES_LIMIT);
        ctx.set_default("FOOTER_COMMUNES", fragments::link_list(&communes, prefix));
        ctx.set_default("URL_ABOUT", data.page_slug("a-propos", lang));
        ctx.set_default("URL_LEGAL", data.page_slug("mentions-legales", lang));
        ctx.set_default(
            "URL_PRIVACY",
            data.page_slug("politique-confidentialite", lang),
        );
        ctx.set_default("URL_ZONES", data.page_slug("zones", lang));
        for (key, path, default) in FOOTER_LABELS {
            ctx.set_default(*key, data.ui.text(path, default));
        }
    }
}

/// Named lookups declared in `variables.json`.
///
/// Reads `template_variables` (name to dotted path) and writes each name
/// with the value found at its path.
pub struct TemplateVariablesStep;

impl ContextStep for TemplateVariablesStep {
    fn name(&self) -> &'static str {
        "template_variables"
    }

    fn apply(&self, data: &SiteData, _page: &PageInfo, ctx: &mut PageContext) {
        for (name, path) in &data.vars.template_variables {
            if !ctx.contains(name) {
                ctx.set(name.as_str(), resolve_path(path, &data.variables));
            }
        }
    }
}

/// The generic steps in the order they run.
pub const PIPELINE: &[&dyn ContextStep] = &[
    &SiteStep,
    &LanguageStep,
    &HreflangStep,
    &HeaderStep,
    &FooterStep,
    &TemplateVariablesStep,
];

/// Run every generic step over `ctx`.
pub fn enrich(data: &SiteData, page: &PageInfo, ctx: &mut PageContext) {
    for step in PIPELINE {
        let before = ctx.len();
        step.apply(data, page, ctx);
        let added = ctx.len() - before;
        diagnostics::log_debug!(
            "context step {name} added {added} keys",
            name: step.name(),
            added: added
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::Locale;

    fn tarifs() -> PageInfo {
        PageInfo::subpage(
            [
                (Language::Fr, "tarifs".to_string()),
                (Language::En, "pricing".to_string()),
                (Language::Nl, "prijzen".to_string()),
            ]
            .into_iter()
            .collect(),
        )
    }

    #[test]
    fn explicit_values_win_over_generic_ones() {
        let mut data = SiteData::fixture();
        data.vars
            .template_variables
            .insert("URL".into(), "site.name".into());

        let mut ctx = PageContext::new();
        ctx.set("URL", "specific");
        enrich(&data, &PageInfo::home(), &mut ctx);
        assert_eq!(ctx.get("URL"), Some("specific"));

        let mut fresh = PageContext::new();
        enrich(&data, &PageInfo::home(), &mut fresh);
        assert_eq!(fresh.get("URL"), Some("Car Dépannage"));
    }

    #[test]
    fn template_variables_resolve_paths() {
        let data = SiteData::fixture();
        let mut ctx = PageContext::new();
        TemplateVariablesStep.apply(&data, &PageInfo::home(), &mut ctx);
        assert_eq!(ctx.get("PRIX_BASE"), Some("à partir de 65 €"));
    }

    #[test]
    fn language_urls_for_nested_language() {
        let mut data = SiteData::fixture();
        data.locale = Locale::new(Language::En, Language::Fr);
        let mut ctx = PageContext::new();
        enrich(&data, &tarifs(), &mut ctx);
        assert_eq!(ctx.get("CURRENT_LANG"), Some("EN"));
        assert_eq!(ctx.get("LANG_PREFIX"), Some("/en"));
        assert_eq!(ctx.get("LANG_URL_FR"), Some("../../"));
        assert_eq!(ctx.get("LANG_URL_EN"), Some("./"));
        assert_eq!(ctx.get("LANG_ACTIVE_EN"), Some("active"));
        assert_eq!(ctx.get("LANG_ACTIVE_FR"), Some(""));
        assert_eq!(ctx.get("ZONES_INDEX_URL"), Some("../areas/index.html"));
        assert_eq!(ctx.get("CANONICAL_URL"), Some("https://example.be/en/pricing/"));
        assert_eq!(ctx.get("HREFLANG_NL"), Some("https://example.be/nl/prijzen/"));
        assert_eq!(ctx.get("HREFLANG_X_DEFAULT"), Some("https://example.be/tarifs/"));
    }

    #[test]
    fn site_and_footer_values() {
        let data = SiteData::fixture();
        let mut ctx = PageContext::new();
        enrich(&data, &PageInfo::home(), &mut ctx);
        assert_eq!(ctx.get("PATH_PREFIX"), Some(""));
        assert_eq!(ctx.get("TELEPHONE"), Some("0479 89 00 89"));
        assert_eq!(ctx.get("TELEPHONE_LINK"), Some("tel:+32479890089"));
        assert_eq!(ctx.get("GOOGLE_RATING"), Some("4.9"));
        assert_eq!(ctx.get("NOMBRE_COMMUNES"), Some("5"));
        assert_eq!(
            ctx.get("HEADER_VIEW_ALL_SERVICES"),
            Some("Voir tous les services (3) →")
        );
        let footer = ctx.get("FOOTER_COMMUNES").expect("footer communes");
        assert!(footer.starts_with(r#"<li><a href="depannage-uccle/index.html">Uccle</a></li>"#));
        assert_eq!(ctx.get("URL_PRIVACY"), Some("politique-confidentialite"));
        assert!(ctx.get("COMPONENT_HREFLANG").is_some_and(|h| h.contains("x-default")));
    }

    #[test]
    fn set_default_keeps_first_writer() {
        let mut ctx = PageContext::new();
        assert!(ctx.set_default("A", "1"));
        assert!(!ctx.set_default("A", "2"));
        ctx.set("A", "3");
        assert_eq!(ctx.get("A"), Some("3"));
    }
}
