// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Component renderer.
//!
//! Two template layers meet here. Fragments with loops and conditionals
//! (card grids, FAQ blocks) are Tera partials rendered against a typed
//! context. Page templates are plain HTML with `{{NAME}}` placeholders:
//! `{{COMPONENT_X}}` pulls in `components/x.html`, then every placeholder
//! is filled from the [`PageContext`].

use crate::context::PageContext;
use crate::error::{Error, Result};
use crate::resolve::{Variables, component_keys, substitute};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tera::Tera;

/// Partials shipped with the crate; `templates/partials/<name>.html` in a
/// project replaces the built-in of the same name.
const BUILTIN_PARTIALS: &[(&str, &str)] = &[
    (
        "communes-grid",
        include_str!("../templates/partials/communes-grid.html"),
    ),
    (
        "faq-section",
        include_str!("../templates/partials/faq-section.html"),
    ),
    (
        "hero-badges",
        include_str!("../templates/partials/hero-badges.html"),
    ),
    (
        "quarters-grid",
        include_str!("../templates/partials/quarters-grid.html"),
    ),
    (
        "sections-alternating",
        include_str!("../templates/partials/sections-alternating.html"),
    ),
    (
        "service-cards",
        include_str!("../templates/partials/service-cards.html"),
    ),
    (
        "services-categories",
        include_str!("../templates/partials/services-categories.html"),
    ),
    ("why-cards", include_str!("../templates/partials/why-cards.html")),
];

/// Tera registers templates by name; the `.html` suffix turns on
/// autoescaping.
fn partial_name(name: &str) -> String {
    format!("partials/{name}.html")
}

/// Every `*.html` file in `dir`, keyed by file stem. A missing directory
/// yields an empty map.
fn read_html_dir(dir: &Path) -> Result<BTreeMap<String, String>> {
    let mut files = BTreeMap::new();
    if !dir.is_dir() {
        diagnostics::log_debug!(
            "template directory {dir} not present",
            dir: dir.display().to_string()
        );
        return Ok(files);
    }
    let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    for entry in entries {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("html") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let text = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        files.insert(stem.to_string(), text);
    }
    Ok(files)
}

/// File stem of the component behind `{{COMPONENT_KEY}}`.
fn component_file(key: &str) -> String {
    key.to_lowercase().replace('_', "-")
}

/// Placeholder values: rendered components first, then the page context.
struct Layered<'a> {
    components: &'a BTreeMap<String, String>,
    page: &'a PageContext,
}

impl Variables for Layered<'_> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.components
            .get(name)
            .map(String::as_str)
            .or_else(|| self.page.get(name))
    }
}

pub struct Renderer {
    tera: Tera,
    templates_dir: PathBuf,
    pages: BTreeMap<String, String>,
    components: BTreeMap<String, String>,
}

impl Renderer {
    /// Load page templates, components and partials from `templates_dir`.
    pub fn load(templates_dir: &Path) -> Result<Self> {
        let mut tera = Tera::default();
        for (name, text) in BUILTIN_PARTIALS {
            tera.add_raw_template(&partial_name(name), text)?;
        }
        for (name, text) in read_html_dir(&templates_dir.join("partials"))? {
            diagnostics::log_debug!("partial {name} overridden by project", name: name.as_str());
            tera.add_raw_template(&partial_name(&name), &text)?;
        }

        let pages = read_html_dir(&templates_dir.join("pages"))?;
        let components = read_html_dir(&templates_dir.join("components"))?;
        diagnostics::log_debug!(
            "loaded {pages} page templates and {components} components",
            pages: pages.len(),
            components: components.len()
        );
        Ok(Self {
            tera,
            templates_dir: templates_dir.to_path_buf(),
            pages,
            components,
        })
    }

    /// Render a Tera partial with a single serializable context object
    /// whose fields become top-level template variables.
    pub fn render_partial<C: Serialize>(&self, name: &str, context: &C) -> Result<String> {
        let ctx = tera::Context::from_serialize(context)?;
        Ok(self.tera.render(&partial_name(name), &ctx)?)
    }

    #[must_use]
    pub fn has_page(&self, template: &str) -> bool {
        self.pages.contains_key(template)
    }

    /// Render a page template: inject components, then substitute the
    /// context in one pass.
    pub fn render_page(&self, template: &str, ctx: &PageContext) -> Result<String> {
        let raw = self.pages.get(template).ok_or_else(|| Error::MissingTemplate {
            path: self.templates_dir.join("pages").join(format!("{template}.html")),
        })?;

        let mut rendered: BTreeMap<String, String> = BTreeMap::new();
        for key in component_keys(raw) {
            let var = format!("COMPONENT_{key}");
            if ctx.contains(&var) {
                continue;
            }
            let file = component_file(&key);
            let html = match self.components.get(&file) {
                Some(text) => substitute(text, ctx),
                None => {
                    diagnostics::log_warn!(
                        "component {file} not found for page {template}",
                        file: file.as_str(),
                        template: template
                    );
                    format!("<!-- Component {file} not found -->")
                }
            };
            rendered.insert(var, html);
        }

        Ok(substitute(
            raw,
            &Layered {
                components: &rendered,
                page: ctx,
            },
        ))
    }
}
