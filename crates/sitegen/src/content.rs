// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Typed views of the per-language content files.
//!
//! Every field has a default so a partial or missing file still yields a
//! usable value. Free-form translation tables stay as JSON trees behind
//! [`Strings`], read with an explicit fallback per lookup.

use crate::model::lenient;
use crate::resolve::{lookup_path, value_to_string};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A translation table (`ui.json`, `components.json`).
#[derive(Debug, Clone, Default)]
pub struct Strings(Value);

impl Strings {
    #[must_use]
    pub fn new(tree: Value) -> Self {
        Self(tree)
    }

    /// Text at a dotted path, or `default` when absent or null.
    #[must_use]
    pub fn text(&self, path: &str, default: &str) -> String {
        match lookup_path(path, &self.0) {
            Some(Value::Null) | None => default.to_string(),
            Some(value) => value_to_string(value),
        }
    }

    /// Like [`Strings::text`], then `{{token}}` replaced by `value`.
    #[must_use]
    pub fn fill(&self, path: &str, default: &str, token: &str, value: &str) -> String {
        self.text(path, default)
            .replace(&format!("{{{{{token}}}}}"), value)
    }

    /// Typed sub-tree, or its default when absent or mistyped.
    #[must_use]
    pub fn section<T: for<'de> Deserialize<'de> + Default>(&self, path: &str) -> T {
        lookup_path(path, &self.0)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn tree(&self) -> &Value {
        &self.0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Section {
    pub h2: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqItem {
    pub question: String,
    #[serde(alias = "reponse")]
    pub answer: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Cta {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub button_text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceHero {
    pub h1: Option<String>,
    pub subtitle: Option<String>,
    /// Badge ids, translated through `components.badges`.
    pub badges: Vec<String>,
}

/// `content/<lang>/services/<slug>.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceContent {
    /// Seed for the inline commune links; defaults to 1.
    pub service_id: Option<i64>,
    pub hero: ServiceHero,
    pub sections: Vec<Section>,
    pub cta: Cta,
    pub faq: Vec<FaqItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommuneHero {
    pub h1: Option<String>,
    pub accroche: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaOverride {
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorityIntro {
    pub paragraphe_0: String,
    pub paragraphe_1: String,
    pub paragraphe_2: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Quarter {
    #[serde(alias = "nom")]
    pub name: String,
    pub description: String,
}

/// "We know <commune>" block with its neighbourhood list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalKnowledge {
    pub h2: String,
    pub intro: String,
    pub conclusion: String,
    pub quartiers: Vec<Quarter>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesBlock {
    pub h2: Option<String>,
    pub intro: String,
    pub cta_text: Option<String>,
    pub cta_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalFaq {
    pub h2: Option<String>,
    pub questions: Vec<FaqItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NeighborRef {
    #[serde(alias = "nom")]
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NeighborsBlock {
    pub h2: Option<String>,
    pub content: String,
    pub communes_voisines: Vec<NeighborRef>,
}

/// The `content` object of a commune file. v1.0 files use the flat
/// `h2_n`/`content_h2_n` fields, v2.0 files the named blocks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommuneSections {
    pub h2_1: Option<String>,
    pub content_h2_1: Option<String>,
    pub h2_3: Option<String>,
    pub content_h2_3: Option<String>,
    pub intro_autorite: Option<AuthorityIntro>,
    pub section_on_connait: Option<LocalKnowledge>,
    pub section_services: Option<ServicesBlock>,
    pub faq_locale: Option<LocalFaq>,
    pub section_zones_voisines: Option<NeighborsBlock>,
}

/// `content/<lang>/locations/<slug>.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommuneContent {
    #[serde(deserialize_with = "lenient::string")]
    pub version: String,
    pub hero: CommuneHero,
    pub seo: MetaOverride,
    pub content: CommuneSections,
}

impl Default for CommuneContent {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            hero: CommuneHero::default(),
            seo: MetaOverride::default(),
            content: CommuneSections::default(),
        }
    }
}

impl CommuneContent {
    #[must_use]
    pub fn is_enriched(&self) -> bool {
        self.version.trim() == "2.0"
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeHero {
    pub h2: Option<String>,
    pub cta_text: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlternatingSection {
    /// `image-droite` puts the image on the right.
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub titre: String,
    pub paragraphe: String,
    pub points: Vec<String>,
    pub image: String,
    pub image_alt: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeFaq {
    pub label: Option<String>,
    pub titre: Option<String>,
    pub questions: Vec<FaqItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeCtaFinal {
    pub titre: Option<String>,
    pub sous_titre: Option<String>,
    pub bouton: Option<String>,
}

/// `content/<lang>/pages/homepage.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HomepageContent {
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub keywords: Option<String>,
    pub h1: Option<String>,
    pub hero: HomeHero,
    pub sections_alternees: Vec<AlternatingSection>,
    pub section_faq: HomeFaq,
    pub cta_final: HomeCtaFinal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageMeta {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageHero {
    pub h1: Option<String>,
    pub subtitle: Option<String>,
}

/// `content/<lang>/pages/<page>.json` for static pages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticPageContent {
    pub meta: PageMeta,
    pub hero: PageHero,
    pub intro: String,
    pub sections: Vec<Section>,
    pub faq: Vec<FaqItem>,
    pub cta: Cta,
    /// Extra page-specific placeholders, upper-cased on injection.
    pub variables: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfo {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub domain: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    /// International form, used in `tel:` links.
    #[serde(deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(deserialize_with = "lenient::string")]
    pub phone_local: String,
    #[serde(deserialize_with = "lenient::string")]
    pub phone_local_display: String,
    #[serde(deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(deserialize_with = "lenient::string")]
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Google {
    #[serde(deserialize_with = "lenient::string")]
    pub rating: String,
    #[serde(deserialize_with = "lenient::string")]
    pub reviews_count: String,
    #[serde(deserialize_with = "lenient::string")]
    pub my_business_url: String,
}

impl Default for Google {
    fn default() -> Self {
        Self {
            rating: String::new(),
            reviews_count: String::new(),
            my_business_url: "#".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Social {
    #[serde(deserialize_with = "lenient::string")]
    pub facebook_url: String,
    #[serde(deserialize_with = "lenient::string")]
    pub instagram_url: String,
}

impl Default for Social {
    fn default() -> Self {
        Self {
            facebook_url: "#".to_string(),
            instagram_url: "#".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatsApp {
    #[serde(deserialize_with = "lenient::string")]
    pub phone_number: String,
    /// Quick-reply entries handed to the browser script; `icon` paths are
    /// relative to the language root.
    #[serde(deserialize_with = "lenient::or_default")]
    pub services: Vec<Value>,
}

/// Typed view of `config/variables.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteVariables {
    #[serde(deserialize_with = "lenient::or_default")]
    pub site: SiteInfo,
    #[serde(deserialize_with = "lenient::or_default")]
    pub contact: Contact,
    #[serde(deserialize_with = "lenient::or_default")]
    pub google: Google,
    #[serde(deserialize_with = "lenient::or_default")]
    pub social: Social,
    #[serde(deserialize_with = "lenient::or_default")]
    pub whatsapp: WhatsApp,
    /// Placeholder name to dotted path into the variables tree.
    #[serde(deserialize_with = "lenient::string_map")]
    pub template_variables: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_fall_back_per_lookup() {
        let ui = Strings::new(json!({"header": {"tarifs": "Pricing", "none": null}}));
        assert_eq!(ui.text("header.tarifs", "Tarifs"), "Pricing");
        assert_eq!(ui.text("header.contact", "Contact"), "Contact");
        assert_eq!(ui.text("header.none", "x"), "x");
        assert_eq!(
            Strings::default().fill("a.b", "Voir ({{count}})", "count", "12"),
            "Voir (12)"
        );
    }

    #[test]
    fn commune_content_versions() {
        let v1: CommuneContent = serde_json::from_value(json!({
            "content": {"h2_1": "Titre", "content_h2_1": "<p>x</p>"}
        }))
        .expect("v1");
        assert!(!v1.is_enriched());
        assert_eq!(v1.content.h2_1.as_deref(), Some("Titre"));

        let v2: CommuneContent = serde_json::from_value(json!({
            "version": 2.0,
            "content": {
                "faq_locale": {"questions": [{"question": "Q?", "reponse": "R."}]},
                "section_zones_voisines": {"communes_voisines": [{"nom": "Uccle", "slug": "depannage-uccle"}]}
            }
        }))
        .expect("v2");
        assert!(v2.is_enriched());
        let faq = v2.content.faq_locale.expect("faq");
        assert_eq!(faq.questions[0].answer, "R.");
        let neighbors = v2.content.section_zones_voisines.expect("neighbors");
        assert_eq!(neighbors.communes_voisines[0].name, "Uccle");
    }

    #[test]
    fn site_variables_accept_numbers() {
        let vars: SiteVariables = serde_json::from_value(json!({
            "google": {"rating": 4.9, "reviews_count": 190},
            "contact": {"phone_local": "0479890089"},
            "template_variables": {"PRIX_BASE": "pricing.base.display"}
        }))
        .expect("variables");
        assert_eq!(vars.google.rating, "4.9");
        assert_eq!(vars.google.reviews_count, "190");
        assert_eq!(vars.google.my_business_url, "#");
        assert_eq!(vars.social.facebook_url, "#");
        assert_eq!(vars.template_variables.len(), 1);
    }

    #[test]
    fn site_variables_degrade_per_value() {
        let vars: SiteVariables = serde_json::from_value(json!({
            "site": {"name": "Car Dépannage", "domain": null},
            "contact": {"phone_local": "0479890089", "email": "a@b.be", "address": ["x"]},
            "social": {"facebook_url": null},
            "google": "not an object",
            "whatsapp": {"phone_number": 32479890089_i64, "services": {"bad": 1}},
            "template_variables": {"PRIX_BASE": "pricing.base.display", "BROKEN": null}
        }))
        .expect("variables");
        assert_eq!(vars.site.name, "Car Dépannage");
        assert_eq!(vars.site.domain, "");
        assert_eq!(vars.contact.phone_local, "0479890089");
        assert_eq!(vars.contact.email, "a@b.be");
        assert_eq!(vars.social.facebook_url, "");
        assert_eq!(vars.social.instagram_url, "#");
        assert_eq!(vars.google.my_business_url, "#");
        assert_eq!(vars.whatsapp.phone_number, "32479890089");
        assert!(vars.whatsapp.services.is_empty());
        assert_eq!(
            vars.template_variables.get("PRIX_BASE").map(String::as_str),
            Some("pricing.base.display")
        );
        assert!(!vars.template_variables.contains_key("BROKEN"));
    }
}
