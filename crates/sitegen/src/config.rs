// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Build configuration parsed from `site.yaml` at the project root.

use crate::error::{Error, Result};
use crate::lang::Language;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Top-level build configuration.
///
/// ```yaml
/// site:
///   name: "Bruxelles Car Dépannage"
///   domain: "https://www.bruxelles-car-depannage.be"
///
/// languages: [fr, en, nl]
/// default_language: fr
///
/// tables:
///   services: "config/core/services/services-{lang}.json"
///   communes: "config/core/locations/locations-{lang}.csv"
///
/// pages:
///   - key: tarifs
///     class: utility
///     slugs: { fr: tarifs, en: pricing, nl: prijzen }
/// ```
///
/// Every section is optional; a missing `site.yaml` yields the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site: SiteMeta,
    pub languages: Vec<Language>,
    pub default_language: Language,
    pub paths: Paths,
    pub tables: Tables,
    pub pages: Vec<StaticPageConfig>,
    /// Sub-directories of `paths.assets` copied into every language tree.
    pub assets: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteMeta::default(),
            languages: Language::ALL.to_vec(),
            default_language: Language::Fr,
            paths: Paths::default(),
            tables: Tables::default(),
            pages: default_pages(),
            assets: vec!["css".into(), "js".into(), "images".into()],
        }
    }
}

/// Site-wide identity. An empty `domain` falls back to `site.domain`
/// in `config/variables.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteMeta {
    pub name: String,
    pub domain: String,
}

/// Project layout, relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Paths {
    pub config: PathBuf,
    pub content: PathBuf,
    pub locales: PathBuf,
    pub templates: PathBuf,
    pub assets: PathBuf,
    pub output: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            config: "config".into(),
            content: "content".into(),
            locales: "locales".into(),
            templates: "templates".into(),
            assets: "public".into(),
            output: "build".into(),
        }
    }
}

/// Entity table locations. `{lang}` is replaced by the language code;
/// the extension picks the decoder (`.csv`, anything else is JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tables {
    pub services: String,
    pub communes: String,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            services: "config/core/services/services-{lang}.json".into(),
            communes: "config/core/locations/locations-{lang}.json".into(),
        }
    }
}

impl Tables {
    #[must_use]
    pub fn services_path(&self, root: &Path, lang: Language) -> PathBuf {
        root.join(self.services.replace("{lang}", lang.code()))
    }

    #[must_use]
    pub fn communes_path(&self, root: &Path, lang: Language) -> PathBuf {
        root.join(self.communes.replace("{lang}", lang.code()))
    }
}

/// Sitemap class of a static page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PageClass {
    Index,
    Utility,
    Legal,
}

/// Which assembler builds a static page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PageKind {
    ServicesIndex,
    ZonesIndex,
    #[default]
    Generic,
}

/// A fixed page outside the entity tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticPageConfig {
    /// Stable identifier shared by every language (e.g. `tarifs`).
    pub key: String,
    pub class: PageClass,
    #[serde(default)]
    pub kind: PageKind,
    /// Per-language URL slug; languages without an entry use `key`.
    #[serde(default)]
    pub slugs: BTreeMap<Language, String>,
    /// Content file under `content/<lang>/pages/`; defaults to `<slug>.json`.
    #[serde(default)]
    pub content: Option<String>,
    /// Page template under `templates/pages/`, without extension.
    #[serde(default)]
    pub template: Option<String>,
}

impl StaticPageConfig {
    #[must_use]
    pub fn slug(&self, lang: Language) -> &str {
        self.slugs.get(&lang).map_or(self.key.as_str(), String::as_str)
    }

    #[must_use]
    pub fn content_file(&self, lang: Language) -> String {
        match &self.content {
            Some(name) => name.clone(),
            None => format!("{}.json", self.slug(lang)),
        }
    }

    #[must_use]
    pub fn template_name(&self) -> &str {
        match (&self.template, self.kind) {
            (Some(name), _) => name,
            (None, PageKind::ServicesIndex) => "services-index",
            (None, PageKind::ZonesIndex) => "zones-index",
            (None, PageKind::Generic) => "static",
        }
    }
}

fn page(
    key: &str,
    class: PageClass,
    kind: PageKind,
    content: Option<&str>,
    slugs: [&str; 3],
) -> StaticPageConfig {
    StaticPageConfig {
        key: key.to_string(),
        class,
        kind,
        slugs: Language::ALL
            .into_iter()
            .zip(slugs)
            .map(|(lang, slug)| (lang, slug.to_string()))
            .collect(),
        content: content.map(str::to_string),
        template: None,
    }
}

/// The seven fixed pages every language gets.
#[must_use]
pub fn default_pages() -> Vec<StaticPageConfig> {
    use PageClass::{Index, Legal, Utility};
    use PageKind::{Generic, ServicesIndex, ZonesIndex};
    vec![
        page(
            "services",
            Index,
            ServicesIndex,
            Some("services-index.json"),
            ["services", "services", "services"],
        ),
        page(
            "zones",
            Index,
            ZonesIndex,
            Some("zones-index.json"),
            ["zones", "areas", "zones"],
        ),
        page("tarifs", Utility, Generic, None, ["tarifs", "pricing", "prijzen"]),
        page("contact", Utility, Generic, None, ["contact", "contact", "contact"]),
        page("a-propos", Utility, Generic, None, ["a-propos", "about-us", "over-ons"]),
        page(
            "mentions-legales",
            Legal,
            Generic,
            None,
            ["mentions-legales", "legal-notice", "juridische-kennisgeving"],
        ),
        page(
            "politique-confidentialite",
            Legal,
            Generic,
            None,
            ["politique-confidentialite", "privacy-policy", "privacybeleid"],
        ),
    ]
}

impl SiteConfig {
    /// Load `site.yaml`. A missing file yields the defaults; a present but
    /// unparsable file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            diagnostics::log_warn!(
                "site configuration {path} not found, using defaults",
                path: path.display().to_string()
            );
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: SiteConfig = serde_yaml_ng::from_str(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            return Err(Error::InvalidConfig("no languages configured".into()));
        }
        if !self.languages.contains(&self.default_language) {
            return Err(Error::InvalidConfig(format!(
                "default language {} is not in the language list",
                self.default_language
            )));
        }
        let mut keys: Vec<&str> = self.pages.iter().map(|p| p.key.as_str()).collect();
        keys.sort_unstable();
        if let Some(dup) = keys.windows(2).find(|w| w[0] == w[1]) {
            return Err(Error::InvalidConfig(format!("duplicate page key {}", dup[0])));
        }
        Ok(())
    }

    #[must_use]
    pub fn page(&self, key: &str) -> Option<&StaticPageConfig> {
        self.pages.iter().find(|p| p.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let yaml = r#"
site:
  name: "Test Site"
  domain: "https://example.be"

languages: [fr, en]

tables:
  communes: "data/communes-{lang}.csv"

pages:
  - key: tarifs
    class: utility
    slugs: { fr: tarifs, en: pricing }
  - key: zones
    class: index
    kind: zones-index
"#;
        let config: SiteConfig = serde_yaml_ng::from_str(yaml).expect("parse config");
        assert_eq!(config.site.name, "Test Site");
        assert_eq!(config.default_language, Language::Fr);
        assert_eq!(config.languages, vec![Language::Fr, Language::En]);
        assert_eq!(config.paths.output, PathBuf::from("build"));
        assert_eq!(config.pages.len(), 2);
        assert_eq!(config.pages[0].slug(Language::En), "pricing");
        assert_eq!(config.pages[0].slug(Language::Nl), "tarifs");
        assert_eq!(config.pages[0].content_file(Language::En), "pricing.json");
        assert_eq!(config.pages[1].template_name(), "zones-index");
        assert_eq!(
            config.tables.communes_path(Path::new("/site"), Language::En),
            PathBuf::from("/site/data/communes-en.csv")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_pages_cover_the_fixed_set() {
        let pages = default_pages();
        assert_eq!(pages.len(), 7);
        let legal: Vec<_> = pages
            .iter()
            .filter(|p| p.class == PageClass::Legal)
            .map(|p| p.slug(Language::Nl))
            .collect();
        assert_eq!(legal, vec!["juridische-kennisgeving", "privacybeleid"]);
        assert_eq!(pages[1].slug(Language::En), "areas");
        assert_eq!(pages[0].content_file(Language::En), "services-index.json");
    }

    #[test]
    fn default_language_must_be_built() {
        let config = SiteConfig {
            languages: vec![Language::En],
            ..SiteConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
