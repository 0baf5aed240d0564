// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Variable resolution: dotted-path lookups into the global variables
//! tree and `{{NAME}}` placeholder substitution.
//!
//! Everything here is total. Missing data degrades to an empty string or
//! an untouched placeholder so a page can always be produced.

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A source of placeholder values.
pub trait Variables {
    fn lookup(&self, name: &str) -> Option<&str>;
}

impl Variables for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl Variables for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<K: AsRef<str>, V: AsRef<str>> Variables for [(K, V)] {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_ref())
    }
}

impl<K: AsRef<str>, V: AsRef<str>, const N: usize> Variables for [(K, V); N] {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.as_slice().lookup(name)
    }
}

/// Render a JSON scalar the way it should appear in page text.
#[must_use]
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Walk `root` along the `.`-separated `path`. Returns an empty string
/// when a key is absent, an intermediate value is not an object, or the
/// terminal value is null.
#[must_use]
pub fn resolve_path(path: &str, root: &Value) -> String {
    lookup_path(path, root).map_or_else(String::new, value_to_string)
}

/// Like [`resolve_path`] but keeps the JSON value.
#[must_use]
pub fn lookup_path<'a>(path: &str, root: &'a Value) -> Option<&'a Value> {
    path.split('.')
        .try_fold(root, |node, key| node.as_object()?.get(key))
}

enum Segment<'a> {
    Text(&'a str),
    Placeholder { name: &'a str, raw: &'a str },
}

/// Split `text` into literal runs and `{{name}}` tokens. When braces are
/// stacked (`{{{X}}`) the innermost `{{` opens the token.
fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find("{{") {
        let Some(close) = rest[open + 2..].find("}}") else {
            break;
        };
        let name_end = open + 2 + close;
        let start = rest[..name_end].rfind("{{").unwrap_or(open);
        if start > 0 {
            out.push(Segment::Text(&rest[..start]));
        }
        out.push(Segment::Placeholder {
            name: &rest[start + 2..name_end],
            raw: &rest[start..name_end + 2],
        });
        rest = &rest[name_end + 2..];
    }
    if !rest.is_empty() {
        out.push(Segment::Text(rest));
    }
    out
}

/// Replace every `{{name}}` whose name is known. Unknown placeholders are
/// kept verbatim. Inserted values are never re-scanned.
#[must_use]
pub fn substitute<V: Variables + ?Sized>(text: &str, variables: &V) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in segments(text) {
        match segment {
            Segment::Text(t) => out.push_str(t),
            Segment::Placeholder { name, raw } => {
                out.push_str(variables.lookup(name).unwrap_or(raw));
            }
        }
    }
    out
}

fn is_variable_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
}

/// Sorted, de-duplicated names of `{{UPPER_CASE}}` placeholders left in
/// rendered output.
#[must_use]
pub fn check_missing_variables(html: &str) -> Vec<String> {
    segments(html)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Placeholder { name, .. } if is_variable_name(name) => Some(name.to_string()),
            _ => None,
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Names of `{{COMPONENT_X}}` placeholders in a page template, in order of
/// first appearance, without the `COMPONENT_` prefix.
#[must_use]
pub fn component_keys(template: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for segment in segments(template) {
        if let Segment::Placeholder { name, .. } = segment {
            if let Some(key) = name.strip_prefix("COMPONENT_") {
                let valid = !key.is_empty()
                    && key.bytes().all(|b| b.is_ascii_uppercase() || b == b'_');
                if valid && !keys.iter().any(|k| k == key) {
                    keys.push(key.to_string());
                }
            }
        }
    }
    keys
}

/// `width="W" height="H"` for an image listed in the dimensions table,
/// or an empty string. Leading `../` hops and the `images/` directory are
/// stripped before lookup.
#[must_use]
pub fn get_dimension_attrs(image_path: &str, dimensions: &Value) -> String {
    let mut clean = image_path;
    while let Some(rest) = clean.strip_prefix("../") {
        clean = rest;
    }
    let clean = clean.strip_prefix("images/").unwrap_or(clean);
    let Some(entry) = dimensions.get(clean) else {
        return String::new();
    };
    match (entry.get("width"), entry.get("height")) {
        (Some(w), Some(h)) if !w.is_null() && !h.is_null() => format!(
            "width=\"{}\" height=\"{}\"",
            value_to_string(w),
            value_to_string(h)
        ),
        _ => String::new(),
    }
}

/// Belgian phone display: `0XXX XX XX XX` for ten-digit local numbers,
/// `+32 XXX XX XX XX` for international ones. Anything else is returned
/// unchanged.
#[must_use]
pub fn format_phone_number(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 10 && digits.starts_with('0') {
        return format!(
            "{} {} {} {}",
            &digits[0..4],
            &digits[4..6],
            &digits[6..8],
            &digits[8..10]
        );
    }
    if digits.len() == 11 && digits.starts_with("32") {
        return format!(
            "+32 {} {} {} {}",
            &digits[2..5],
            &digits[5..7],
            &digits[7..9],
            &digits[9..11]
        );
    }
    phone.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolve_path_walks_objects() {
        let root = json!({"a": {"b": {"c": "x"}}});
        assert_eq!(resolve_path("a.b.c", &root), "x");
        assert_eq!(resolve_path("a.b.z", &root), "");
        assert_eq!(resolve_path("a.b.c", &json!({})), "");
        assert_eq!(resolve_path("a.b.c.d", &root), "");
    }

    #[test]
    fn resolve_path_formats_scalars() {
        let root = json!({"google": {"rating": 4.9, "reviews": 190, "open": true, "x": null}});
        assert_eq!(resolve_path("google.rating", &root), "4.9");
        assert_eq!(resolve_path("google.reviews", &root), "190");
        assert_eq!(resolve_path("google.open", &root), "True");
        assert_eq!(resolve_path("google.x", &root), "");
    }

    #[test]
    fn substitute_keeps_unknown_placeholders() {
        let empty: BTreeMap<String, String> = BTreeMap::new();
        assert_eq!(substitute("hello {{X}}", &empty), "hello {{X}}");
    }

    #[test]
    fn substitute_is_single_pass() {
        let vars = [("A", "{{B}}"), ("B", "final")];
        assert_eq!(substitute("{{A}}", &vars), "{{B}}");
        assert_eq!(substitute("{{B}} and {{A}}", &vars), "final and {{B}}");
    }

    #[test]
    fn substitute_replaces_every_occurrence() {
        let vars = [("N", "3")];
        assert_eq!(substitute("{{N}}/{{N}} {{M}}", &vars), "3/3 {{M}}");
        assert_eq!(substitute("{{{N}}}", &vars), "{3}");
        assert_eq!(substitute("no braces", &vars), "no braces");
        assert_eq!(substitute("open {{N", &vars), "open {{N");
    }

    #[test]
    fn check_missing_variables_is_sorted_and_unique() {
        let html = "<p>{{TITLE}} {{count}} {{H2_1}} {{TITLE}}</p>";
        assert_eq!(check_missing_variables(html), vec!["H2_1", "TITLE"]);
    }

    #[test]
    fn component_keys_in_order() {
        let tpl = "{{COMPONENT_HEADER}}<main>{{X}}</main>{{COMPONENT_FOOTER}}{{COMPONENT_HEADER}}";
        assert_eq!(component_keys(tpl), vec!["HEADER", "FOOTER"]);
    }

    #[test]
    fn dimension_attrs() {
        let table = json!({
            "logo.webp": {"width": 200, "height": 80},
            "hero/a.webp": {"width": "1200"}
        });
        assert_eq!(
            get_dimension_attrs("images/logo.webp", &table),
            r#"width="200" height="80""#
        );
        assert_eq!(
            get_dimension_attrs("../images/logo.webp", &table),
            r#"width="200" height="80""#
        );
        assert_eq!(get_dimension_attrs("hero/a.webp", &table), "");
        assert_eq!(get_dimension_attrs("missing.png", &table), "");
    }

    #[test]
    fn phone_formats() {
        assert_eq!(format_phone_number("0479890089"), "0479 89 00 89");
        assert_eq!(format_phone_number("0479 89 00 89"), "0479 89 00 89");
        assert_eq!(format_phone_number("+32479890089"), "+32 479 89 00 89");
        assert_eq!(format_phone_number("12345"), "12345");
    }
}
