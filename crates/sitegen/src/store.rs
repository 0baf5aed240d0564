// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Content store: everything a build reads, loaded once per language.
//!
//! Entity tables are mandatory. Page copy, translation tables and global
//! variables are optional: a missing file logs a warning, a malformed one
//! logs an error, and both fall back to an empty default.

use crate::config::{SiteConfig, StaticPageConfig};
use crate::content::{
    CommuneContent, HomepageContent, ServiceContent, SiteVariables, StaticPageContent, Strings,
};
use crate::error::{Error, Result};
use crate::lang::{Language, Locale};
use crate::model::{Commune, Entity, Service};
use crate::rotation::by_priority;
use arrow_array::{Array, StringArray};
use arrow_csv::ReaderBuilder;
use arrow_csv::reader::Format;
use arrow_schema::{DataType, Field, Schema};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Communes shown when a commune has no neighbour list.
const NEIGHBOR_FALLBACK: usize = 5;

/// Read a JSON file, degrading to `T::default()` when it is missing or
/// malformed.
pub fn load_json_or_default<T: DeserializeOwned + Default>(path: &Path, what: &str) -> T {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            diagnostics::log_warn!(
                "{what} not found at {path}, using defaults",
                what: what,
                path: path.display().to_string()
            );
            return T::default();
        }
        Err(e) => {
            diagnostics::log_error!(
                "cannot read {what} at {path}: {reason}",
                what: what,
                path: path.display().to_string(),
                reason: e.to_string()
            );
            return T::default();
        }
    };
    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(e) => {
            diagnostics::log_error!(
                "malformed {what} at {path}: {reason}",
                what: what,
                path: path.display().to_string(),
                reason: e.to_string()
            );
            T::default()
        }
    }
}

fn load_tree(path: &Path, what: &str) -> Value {
    let tree: Option<Value> = load_json_or_default(path, what);
    match tree {
        Some(value @ Value::Object(_)) => value,
        _ => Value::Object(serde_json::Map::new()),
    }
}

/// Decode every row of a CSV file into a JSON object of strings. Empty
/// cells are omitted so field defaults apply.
fn read_csv_rows(path: &Path) -> Result<Vec<Value>> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    let csv_err = |source| Error::Csv {
        path: path.to_path_buf(),
        source,
    };

    let format = Format::default().with_header(true);
    let (inferred, _) = format
        .infer_schema(Cursor::new(&bytes), None)
        .map_err(csv_err)?;

    // Read every column as text; typing happens during deserialization.
    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|f| Field::new(f.name(), DataType::Utf8, true))
        .collect();
    let names: Vec<String> = fields.iter().map(|f| f.name().clone()).collect();
    let schema = Arc::new(Schema::new(fields));

    let reader = ReaderBuilder::new(schema)
        .with_header(true)
        .build(Cursor::new(&bytes))
        .map_err(csv_err)?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch.map_err(csv_err)?;
        let columns: Vec<(&str, &StringArray)> = names
            .iter()
            .zip(batch.columns())
            .filter_map(|(name, col)| {
                col.as_any()
                    .downcast_ref::<StringArray>()
                    .map(|array| (name.as_str(), array))
            })
            .collect();
        for row in 0..batch.num_rows() {
            let mut object = serde_json::Map::new();
            for (name, array) in &columns {
                if array.is_null(row) {
                    continue;
                }
                let cell = array.value(row).trim();
                if !cell.is_empty() {
                    object.insert((*name).to_string(), Value::String(cell.to_string()));
                }
            }
            rows.push(Value::Object(object));
        }
    }
    Ok(rows)
}

/// Load an entity table. A `.csv` file is decoded row by row; anything
/// else is JSON, either a bare array or an object holding the array under
/// one of `keys`.
pub fn load_table<T: DeserializeOwned>(
    path: &Path,
    kind: &'static str,
    keys: &[&str],
) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(Error::MissingTable {
            kind,
            path: path.to_path_buf(),
        });
    }
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let rows = if is_csv {
        read_csv_rows(path)?
    } else {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let value: Value = serde_json::from_str(&text).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        match value {
            Value::Array(items) => items,
            Value::Object(mut object) => keys
                .iter()
                .find_map(|key| object.remove(*key))
                .and_then(|v| match v {
                    Value::Array(items) => Some(items),
                    _ => None,
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    };
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(row).map_err(|source| Error::Json {
                path: path.to_path_buf(),
                source,
            })
        })
        .collect()
}

/// Slugs of the same entity in every configured language, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Alternates {
    services: BTreeMap<Language, BTreeMap<i64, String>>,
    communes: BTreeMap<Language, BTreeMap<i64, String>>,
}

impl Alternates {
    #[must_use]
    pub fn service_slug(&self, lang: Language, id: i64) -> Option<&str> {
        self.services.get(&lang)?.get(&id).map(String::as_str)
    }

    #[must_use]
    pub fn commune_slug(&self, lang: Language, id: i64) -> Option<&str> {
        self.communes.get(&lang)?.get(&id).map(String::as_str)
    }

    fn insert<T: Entity>(
        target: &mut BTreeMap<Language, BTreeMap<i64, String>>,
        lang: Language,
        items: &[T],
    ) {
        target.insert(
            lang,
            items
                .iter()
                .map(|e| (e.id(), e.slug().to_string()))
                .collect(),
        );
    }
}

/// Everything one language's build reads.
#[derive(Debug, Clone)]
pub struct SiteData {
    pub locale: Locale,
    /// Every language the site publishes, in configuration order.
    pub languages: Vec<Language>,
    pub pages: Vec<StaticPageConfig>,
    pub domain: String,
    pub site_name: String,
    pub services: Vec<Service>,
    /// All communes, inactive ones included.
    pub communes: Vec<Commune>,
    pub ui: Strings,
    pub components: Strings,
    /// Raw `config/variables.json` tree for dotted-path lookups.
    pub variables: Value,
    pub vars: SiteVariables,
    /// `images` object of `images-dimensions.json`.
    pub dimensions: Value,
    pub alternates: Alternates,
    content_dir: PathBuf,
}

impl SiteData {
    /// Load one language. `root` is the project root.
    pub fn load(config: &SiteConfig, root: &Path, locale: Locale) -> Result<Self> {
        let lang = locale.lang;
        let services: Vec<Service> = load_table(
            &config.tables.services_path(root, lang),
            "services",
            &["services"],
        )?;
        let communes: Vec<Commune> = load_table(
            &config.tables.communes_path(root, lang),
            "communes",
            &["locations", "communes"],
        )?;

        let mut alternates = Alternates::default();
        Alternates::insert(&mut alternates.services, lang, &services);
        Alternates::insert(&mut alternates.communes, lang, &communes);
        for other in config.languages.iter().copied().filter(|l| *l != lang) {
            let svc: Result<Vec<Service>> =
                load_table(&config.tables.services_path(root, other), "services", &["services"]);
            let com: Result<Vec<Commune>> = load_table(
                &config.tables.communes_path(root, other),
                "communes",
                &["locations", "communes"],
            );
            match (svc, com) {
                (Ok(svc), Ok(com)) => {
                    Alternates::insert(&mut alternates.services, other, &svc);
                    Alternates::insert(&mut alternates.communes, other, &com);
                }
                (Err(e), _) | (_, Err(e)) => {
                    diagnostics::log_debug!(
                        "no {other} tables for alternate links: {reason}",
                        other: other.code(),
                        reason: e.to_string()
                    );
                }
            }
        }

        let config_dir = root.join(&config.paths.config);
        let locales_dir = root.join(&config.paths.locales).join(lang.code());
        let content_dir = root.join(&config.paths.content).join(lang.code());

        let variables = load_tree(&config_dir.join("variables.json"), "variables.json");
        let vars: SiteVariables = match serde_json::from_value(variables.clone()) {
            Ok(vars) => vars,
            Err(e) => {
                diagnostics::log_error!(
                    "variables.json has unexpected shapes, using defaults: {reason}",
                    reason: e.to_string()
                );
                SiteVariables::default()
            }
        };

        let ui = Strings::new(load_tree(&locales_dir.join("ui.json"), "ui.json"));
        let components = Strings::new(load_tree(
            &locales_dir.join("components.json"),
            "components.json",
        ));
        let dimensions = load_tree(
            &content_dir.join("images-dimensions.json"),
            "images-dimensions.json",
        )
        .get("images")
        .cloned()
        .unwrap_or(Value::Null);

        let domain = if config.site.domain.is_empty() {
            vars.site.domain.clone()
        } else {
            config.site.domain.clone()
        };
        let site_name = if config.site.name.is_empty() {
            vars.site.name.clone()
        } else {
            config.site.name.clone()
        };

        diagnostics::log_info!(
            "loaded {lang}: {services} services, {communes} communes",
            lang: lang.code(),
            services: services.len(),
            communes: communes.len()
        );

        Ok(Self {
            locale,
            languages: config.languages.clone(),
            pages: config.pages.clone(),
            domain: domain.trim_end_matches('/').to_string(),
            site_name,
            services,
            communes,
            ui,
            components,
            variables,
            vars,
            dimensions,
            alternates,
            content_dir,
        })
    }

    /// Slug of a static page in `lang`; unknown keys map to themselves.
    #[must_use]
    pub fn page_slug<'a>(&'a self, key: &'a str, lang: Language) -> &'a str {
        self.pages
            .iter()
            .find(|p| p.key == key)
            .map_or(key, |p| p.slug(lang))
    }

    /// Active communes in table order.
    #[must_use]
    pub fn active_communes(&self) -> Vec<&Commune> {
        self.communes.iter().filter(|c| c.active).collect()
    }

    /// Communes linked as neighbours of `commune`: its named neighbours
    /// that are active, in list order, or the first active communes of the
    /// table when it declares none.
    #[must_use]
    pub fn neighbors_of(&self, commune: &Commune) -> Vec<&Commune> {
        let active = self.active_communes();
        match &commune.neighbors {
            None => active.into_iter().take(NEIGHBOR_FALLBACK).collect(),
            Some(names) => names
                .iter()
                .filter_map(|name| active.iter().copied().find(|c| &c.name == name))
                .collect(),
        }
    }

    /// Services in canonical (priority) order.
    #[must_use]
    pub fn services_by_priority(&self) -> Vec<&Service> {
        by_priority(&self.services)
    }

    /// Active communes in canonical (priority) order.
    #[must_use]
    pub fn communes_by_priority(&self) -> Vec<&Commune> {
        by_priority(self.active_communes())
    }

    #[must_use]
    pub fn service_content(&self, slug: &str) -> ServiceContent {
        load_json_or_default(
            &self.content_dir.join("services").join(format!("{slug}.json")),
            "service content",
        )
    }

    #[must_use]
    pub fn commune_content(&self, slug: &str) -> CommuneContent {
        let content: CommuneContent = load_json_or_default(
            &self.content_dir.join("locations").join(format!("{slug}.json")),
            "commune content",
        );
        diagnostics::log_debug!(
            "commune {slug} content v{version}",
            slug: slug,
            version: content.version.as_str()
        );
        content
    }

    #[must_use]
    pub fn homepage_content(&self) -> HomepageContent {
        load_json_or_default(
            &self.content_dir.join("pages").join("homepage.json"),
            "homepage content",
        )
    }

    #[must_use]
    pub fn page_content(&self, file: &str) -> StaticPageContent {
        load_json_or_default(&self.content_dir.join("pages").join(file), "page content")
    }
}

#[cfg(test)]
impl SiteData {
    /// In-memory French site with three services and five communes.
    pub(crate) fn fixture() -> Self {
        use serde_json::json;
        let services: Vec<Service> = serde_json::from_value(json!([
            {"id": 1, "slug": "remorquage-voiture", "name": "Remorquage voiture",
             "category": "Remorquage", "priority": 1, "serviceType": "Towing",
             "meta_description": "Remorquage 24/7"},
            {"id": 2, "slug": "depannage-batterie", "name": "Dépannage batterie",
             "category": "Dépannage", "priority": 2},
            {"id": 3, "slug": "reparation-pneu", "name": "Réparation pneu",
             "category": "Dépannage", "priority": 3}
        ]))
        .expect("services");
        let communes: Vec<Commune> = serde_json::from_value(json!([
            {"id": 1, "slug": "depannage-ixelles", "name": "Ixelles", "postal_code": "1050",
             "zone": "Bruxelles", "priority": 2, "neighbors": ["Uccle", "Etterbeek"]},
            {"id": 2, "slug": "depannage-uccle", "name": "Uccle", "postal_code": "1180",
             "zone": "Bruxelles", "priority": 1},
            {"id": 3, "slug": "depannage-etterbeek", "name": "Etterbeek", "postal_code": "1040",
             "zone": "Bruxelles", "priority": 3},
            {"id": 4, "slug": "depannage-zaventem", "name": "Zaventem", "postal_code": "1930",
             "zone": "Périphérie", "priority": 4},
            {"id": 5, "slug": "depannage-waterloo", "name": "Waterloo", "postal_code": "1410",
             "zone": "Périphérie", "priority": 5}
        ]))
        .expect("communes");
        let variables = json!({
            "site": {"name": "Car Dépannage", "domain": "https://example.be"},
            "contact": {"phone": "+32479890089", "phone_local": "0479890089"},
            "google": {"rating": 4.9, "reviews_count": 190},
            "pricing": {"base": {"display": "à partir de 65 €"}},
            "template_variables": {"PRIX_BASE": "pricing.base.display"}
        });
        let vars = serde_json::from_value(variables.clone()).expect("variables");
        let mut alternates = Alternates::default();
        Alternates::insert(&mut alternates.services, Language::Fr, &services);
        Alternates::insert(&mut alternates.communes, Language::Fr, &communes);
        Self {
            locale: Locale::new(Language::Fr, Language::Fr),
            languages: Language::ALL.to_vec(),
            pages: crate::config::default_pages(),
            domain: "https://example.be".into(),
            site_name: "Car Dépannage".into(),
            services,
            communes,
            ui: Strings::default(),
            components: Strings::default(),
            variables,
            vars,
            dimensions: Value::Null,
            alternates,
            content_dir: PathBuf::from("/nonexistent"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn write(path: &Path, text: &str) {
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, text).expect("write");
    }

    #[test]
    fn json_or_default_degrades() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let missing: ServiceContent = load_json_or_default(&tmp.path().join("nope.json"), "x");
        assert!(missing.sections.is_empty());

        let bad = tmp.path().join("bad.json");
        write(&bad, "{ not json");
        let malformed: ServiceContent = load_json_or_default(&bad, "x");
        assert!(malformed.faq.is_empty());
    }

    #[test]
    fn variables_with_null_leaves_keep_the_rest() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("variables.json");
        write(
            &path,
            &json!({
                "contact": {"phone_local": "0479890089", "email": null},
                "social": {"facebook_url": null, "instagram_url": 12},
                "template_variables": {"PRIX_BASE": "pricing.base.display"}
            })
            .to_string(),
        );
        let vars: SiteVariables = load_json_or_default(&path, "variables.json");
        assert_eq!(vars.contact.phone_local, "0479890089");
        assert_eq!(vars.contact.email, "");
        assert_eq!(vars.social.facebook_url, "");
        assert_eq!(vars.social.instagram_url, "12");
        assert_eq!(vars.template_variables.len(), 1);
    }

    #[test]
    fn tables_from_json_shapes() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let wrapped = tmp.path().join("services.json");
        write(
            &wrapped,
            &json!({"services": [{"id": 1, "slug": "a", "name": "A"}]}).to_string(),
        );
        let bare = tmp.path().join("bare.json");
        write(&bare, &json!([{"id": 2, "slug": "b", "name": "B"}]).to_string());

        let a: Vec<Service> = load_table(&wrapped, "services", &["services"]).expect("wrapped");
        let b: Vec<Service> = load_table(&bare, "services", &["services"]).expect("bare");
        assert_eq!(a[0].slug, "a");
        assert_eq!(b[0].id, 2);
    }

    #[test]
    fn missing_table_is_fatal() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let result: Result<Vec<Commune>> =
            load_table(&tmp.path().join("none.csv"), "communes", &["locations"]);
        assert!(matches!(result, Err(Error::MissingTable { kind: "communes", .. })));
    }

    #[test]
    fn neighbors_resolve_against_active_communes() {
        let mut data = SiteData::fixture();
        data.communes[2].active = false;
        let ixelles = data.communes[0].clone();
        let names: Vec<&str> = data
            .neighbors_of(&ixelles)
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Uccle"]);

        let uccle = data.communes[1].clone();
        let fallback: Vec<&str> = data
            .neighbors_of(&uccle)
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(fallback, vec!["Ixelles", "Uccle", "Zaventem", "Waterloo"]);
        assert_eq!(data.page_slug("zones", Language::En), "areas");
        assert_eq!(data.page_slug("unknown", Language::En), "unknown");
    }

    #[test]
    fn communes_from_csv() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("communes.csv");
        write(
            &path,
            "id,slug,name,postal_code,zone,priority,active,neighbors\n\
             1,depannage-ixelles,Ixelles,1050,Bruxelles,2,true,Uccle;Etterbeek\n\
             2,depannage-uccle,Uccle,1180,Bruxelles,1,false,\n",
        );
        let communes: Vec<Commune> =
            load_table(&path, "communes", &["locations"]).expect("csv");
        assert_eq!(communes.len(), 2);
        assert_eq!(communes[0].postal_code, "1050");
        assert_eq!(communes[0].priority, 2);
        assert_eq!(
            communes[0].neighbors.as_deref(),
            Some(&["Uccle".to_string(), "Etterbeek".to_string()][..])
        );
        assert!(!communes[1].active);
        assert!(communes[1].neighbors.is_none());
    }
}
