// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Cross-checks between `urls.*` in `variables.json` and the entity
//! tables, and injection of the current language's slugs.
//!
//! Validation never stops a build: problems are logged and the report is
//! returned for the caller to inspect.

use crate::model::{Commune, Entity, Service};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlIssue {
    /// `urls.communes.<key>` disagrees with the commune table.
    CommuneSlugMismatch {
        key: String,
        configured: String,
        actual: String,
    },
    /// `urls.services.<key>` names a slug no service has.
    UnknownServiceSlug { key: String, configured: String },
}

impl fmt::Display for UrlIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlIssue::CommuneSlugMismatch {
                key,
                configured,
                actual,
            } => write!(
                f,
                "urls.communes.{key} is '{configured}' but the commune table says '{actual}'"
            ),
            UrlIssue::UnknownServiceSlug { key, configured } => write!(
                f,
                "urls.services.{key} is '{configured}', which no service uses"
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlReport {
    /// The `urls` section was incomplete and nothing was checked.
    pub skipped: bool,
    pub checked: usize,
    pub errors: Vec<UrlIssue>,
    pub warnings: Vec<UrlIssue>,
}

impl UrlReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Write every finding to the log.
    pub fn log(&self) {
        if self.skipped {
            diagnostics::log_warn!(
                "urls.communes or urls.services missing in variables.json, proceeding anyway"
            );
            return;
        }
        for issue in &self.errors {
            diagnostics::log_error!("URL validation: {issue}", issue: issue.to_string());
        }
        for issue in &self.warnings {
            diagnostics::log_warn!("URL validation: {issue}", issue: issue.to_string());
        }
        if self.is_clean() {
            diagnostics::log_info!("URL validation: {checked} entries OK", checked: self.checked);
        }
    }
}

fn string_map(value: Option<&Value>) -> BTreeMap<&str, &str> {
    value
        .and_then(Value::as_object)
        .map(|object| {
            object
                .iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.as_str(), s)))
                .collect()
        })
        .unwrap_or_default()
}

/// Compare `urls.communes` and `urls.services` with the tables. Commune
/// keys are matched against each active commune's URL key.
#[must_use]
pub fn validate_urls(variables: &Value, services: &[Service], communes: &[&Commune]) -> UrlReport {
    let urls = variables.get("urls");
    let configured_communes = string_map(urls.and_then(|u| u.get("communes")));
    let configured_services = string_map(urls.and_then(|u| u.get("services")));

    if configured_communes.is_empty() || configured_services.is_empty() {
        return UrlReport {
            skipped: true,
            ..UrlReport::default()
        };
    }

    let commune_slugs: BTreeMap<String, &str> = communes
        .iter()
        .map(|c| (c.url_key(), c.slug.as_str()))
        .collect();
    let service_slugs: BTreeSet<&str> = services.iter().map(|s| s.slug.as_str()).collect();

    let mut report = UrlReport {
        checked: configured_communes.len() + configured_services.len(),
        ..UrlReport::default()
    };
    for (key, configured) in &configured_communes {
        if let Some(actual) = commune_slugs.get(*key) {
            if actual != configured {
                report.errors.push(UrlIssue::CommuneSlugMismatch {
                    key: (*key).to_string(),
                    configured: (*configured).to_string(),
                    actual: (*actual).to_string(),
                });
            }
        }
    }
    for (key, configured) in &configured_services {
        if !service_slugs.contains(configured) {
            report.warnings.push(UrlIssue::UnknownServiceSlug {
                key: (*key).to_string(),
                configured: (*configured).to_string(),
            });
        }
    }
    report
}

/// `parent[key]` as an object, replacing any non-object value.
fn child_object<'a>(
    parent: &'a mut Map<String, Value>,
    key: &str,
) -> Option<&'a mut Map<String, Value>> {
    let slot = parent
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    slot.as_object_mut()
}

/// Publish the current language's slugs under `urls.services.<KEY>` and
/// `urls.communes.<KEY>`, creating the sections when needed.
pub fn inject_urls(variables: &mut Value, services: &[Service], communes: &[&Commune]) {
    if !variables.is_object() {
        *variables = Value::Object(Map::new());
    }
    let Some(urls) = variables
        .as_object_mut()
        .and_then(|root| child_object(root, "urls"))
    else {
        return;
    };
    if let Some(table) = child_object(urls, "services") {
        for service in services {
            table.insert(service.url_key(), Value::String(service.slug.clone()));
        }
    }
    if let Some(table) = child_object(urls, "communes") {
        for commune in communes {
            table.insert(commune.url_key(), Value::String(commune.slug.clone()));
        }
    }
}
