// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! # Sitegen: multilingual static site builder
//!
//! Turns service and commune tables, per-language page copy and
//! translation strings into one HTML tree per language, plus
//! `sitemap.xml` and `robots.txt`.
//!
//! Pages are assembled from a flat [`PageContext`] of `{{NAME}}` values.
//! Repeated fragments (cards, FAQ blocks, grids) are Tera partials or Maud
//! markup; cross-link widgets pick their entries with the deterministic
//! [`rotation`] selector.
//!
//! ## Usage
//!
//! ```no_run
//! use sitegen::{BuildOptions, Language, SiteConfig, SiteGenerator};
//! use std::path::Path;
//!
//! let root = Path::new("site");
//! let config = SiteConfig::load(&root.join("site.yaml"))?;
//! let report = SiteGenerator::new(root, config).build(&[Language::Fr], &BuildOptions::default())?;
//! assert!(report.total_pages() > 0);
//! # Ok::<(), sitegen::Error>(())
//! ```

pub mod config;
pub mod content;
pub mod context;
mod error;
pub mod fragments;
pub mod generator;
pub mod lang;
pub mod model;
pub mod pages;
pub mod render;
pub mod resolve;
pub mod rotation;
pub mod schema_org;
pub mod sitemap;
pub mod store;
pub mod validate;

pub use config::SiteConfig;
pub use context::PageContext;
pub use error::{Error, Result};
pub use generator::{BuildOptions, BuildReport, BuildScope, LanguageReport, SiteGenerator};
pub use lang::Language;
pub use resolve::{check_missing_variables, get_dimension_attrs, resolve_path, substitute};
pub use store::SiteData;
