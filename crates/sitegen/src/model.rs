// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Entity records: services and communes.
//!
//! Both tables may come from JSON (typed values) or CSV (every cell a
//! string), so scalar fields accept either representation.

use serde::{Deserialize, Serialize};

/// Priority given to records that do not declare one.
pub const DEFAULT_PRIORITY: i64 = 999;

fn default_priority() -> i64 {
    DEFAULT_PRIORITY
}

fn default_true() -> bool {
    true
}

/// Anything that can be cross-linked from another page.
pub trait Entity {
    fn id(&self) -> i64;
    fn slug(&self) -> &str;
    fn name(&self) -> &str;
    /// Lower is more prominent.
    fn priority(&self) -> i64;
    /// Key under which the slug is published in `urls.<table>`.
    fn url_key(&self) -> String;
}

/// Upper-case identifier derived from a display name:
/// `Woluwe-Saint-Lambert` becomes `WOLUWE_SAINT_LAMBERT`.
#[must_use]
pub fn normalized_key(name: &str) -> String {
    name.to_uppercase()
        .chars()
        .map(|c| if matches!(c, '-' | ' ' | '\'') { '_' } else { c })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_priority", deserialize_with = "lenient::int")]
    pub priority: i64,
    #[serde(rename = "isGoogleAligned", default, deserialize_with = "lenient::boolean")]
    pub is_google_aligned: bool,
    #[serde(rename = "serviceType", default)]
    pub service_type: String,
    #[serde(default)]
    pub meta_title: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default, deserialize_with = "lenient::list")]
    pub seo_related_keywords: Vec<String>,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub url_key: Option<String>,
}

impl Entity for Service {
    fn id(&self) -> i64 {
        self.id
    }
    fn slug(&self) -> &str {
        &self.slug
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn priority(&self) -> i64 {
        self.priority
    }
    fn url_key(&self) -> String {
        self.url_key
            .clone()
            .unwrap_or_else(|| normalized_key(&self.name))
    }
}

/// SEO overrides carried directly on a commune record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommuneSeo {
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub h1: Option<String>,
    pub h2: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commune {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    pub slug: String,
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub postal_code: String,
    /// `Bruxelles` or `Périphérie`.
    #[serde(default)]
    pub zone: String,
    #[serde(default = "default_priority", deserialize_with = "lenient::int")]
    pub priority: i64,
    #[serde(default = "default_true", deserialize_with = "lenient::boolean")]
    pub active: bool,
    /// Neighbour display names; `None` when the record has no list at all.
    #[serde(default, deserialize_with = "lenient::opt_list")]
    pub neighbors: Option<Vec<String>>,
    #[serde(default)]
    pub seo: CommuneSeo,
    #[serde(default)]
    pub url_key: Option<String>,
}

impl Entity for Commune {
    fn id(&self) -> i64 {
        self.id
    }
    fn slug(&self) -> &str {
        &self.slug
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn priority(&self) -> i64 {
        self.priority
    }
    fn url_key(&self) -> String {
        self.url_key
            .clone()
            .unwrap_or_else(|| normalized_key(&self.name))
    }
}

/// Zone name for communes inside the Brussels region.
pub const ZONE_BRUSSELS: &str = "Bruxelles";
/// Zone name for communes around the region.
pub const ZONE_PERIPHERY: &str = "Périphérie";

pub(crate) mod lenient {
    //! Deserializers that accept JSON scalars or CSV strings.

    use serde::de::{DeserializeOwned, Deserializer, Error};
    use serde::Deserialize;
    use serde_json::Value;
    use std::collections::BTreeMap;

    pub fn int<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        match Value::deserialize(d)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .ok_or_else(|| D::Error::custom(format!("not an integer: {n}"))),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("not an integer: {s:?}"))),
            other => Err(D::Error::custom(format!("not an integer: {other}"))),
        }
    }

    pub fn boolean<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        match Value::deserialize(d)? {
            Value::Bool(b) => Ok(b),
            Value::Number(n) => Ok(n.as_i64() != Some(0)),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "oui" => Ok(true),
                "false" | "0" | "no" | "non" | "" => Ok(false),
                _ => Err(D::Error::custom(format!("not a boolean: {s:?}"))),
            },
            Value::Null => Ok(false),
            other => Err(D::Error::custom(format!("not a boolean: {other}"))),
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(crate::resolve::value_to_string(&Value::deserialize(d)?))
    }

    /// A string-valued object; null or non-scalar entries are dropped,
    /// anything other than an object is empty.
    pub fn string_map<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<BTreeMap<String, String>, D::Error> {
        let Value::Object(entries) = Value::deserialize(d)? else {
            return Ok(BTreeMap::new());
        };
        Ok(entries
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(s) => Some((key, s)),
                Value::Number(n) => Some((key, n.to_string())),
                _ => None,
            })
            .collect())
    }

    /// `T` when the value has its shape, else `T::default()`.
    pub fn or_default<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let value = Value::deserialize(d)?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    pub fn list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(opt_list(d)?.unwrap_or_default())
    }

    /// A JSON array, or a `;`-separated CSV cell.
    pub fn opt_list<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(None),
            Value::Array(items) => Ok(Some(
                items
                    .into_iter()
                    .map(|v| match v {
                        Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect(),
            )),
            Value::String(s) => Ok(Some(
                s.split(';')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
            other => Err(D::Error::custom(format!("not a list: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn service_from_typed_json() {
        let svc: Service = serde_json::from_value(json!({
            "id": 4,
            "slug": "reparation-pneu",
            "name": "Réparation pneu",
            "category": "Dépannage",
            "isGoogleAligned": true,
            "seo_related_keywords": ["pneu", "crevaison"]
        }))
        .expect("service");
        assert_eq!(svc.id, 4);
        assert_eq!(svc.priority, DEFAULT_PRIORITY);
        assert!(svc.is_google_aligned);
        assert_eq!(svc.seo_related_keywords.len(), 2);
        assert_eq!(svc.url_key(), "RÉPARATION_PNEU");
    }

    #[test]
    fn commune_from_csv_strings() {
        let commune: Commune = serde_json::from_value(json!({
            "id": "9",
            "slug": "depannage-ixelles",
            "name": "Ixelles",
            "postal_code": "1050",
            "priority": "3",
            "active": "false",
            "neighbors": "Etterbeek; Uccle;"
        }))
        .expect("commune");
        assert_eq!(commune.id, 9);
        assert_eq!(commune.priority, 3);
        assert!(!commune.active);
        assert_eq!(
            commune.neighbors,
            Some(vec!["Etterbeek".to_string(), "Uccle".to_string()])
        );
    }

    #[test]
    fn commune_defaults() {
        let commune: Commune = serde_json::from_value(json!({
            "id": 1, "slug": "a", "name": "Saint-Josse-ten-Noode", "postal_code": 1210
        }))
        .expect("commune");
        assert!(commune.active);
        assert!(commune.neighbors.is_none());
        assert_eq!(commune.postal_code, "1210");
        assert_eq!(commune.url_key(), "SAINT_JOSSE_TEN_NOODE");
    }

    #[test]
    fn normalized_key_replaces_separators() {
        assert_eq!(normalized_key("Braine-l'Alleud"), "BRAINE_L_ALLEUD");
        assert_eq!(normalized_key("La Hulpe"), "LA_HULPE");
    }
}
