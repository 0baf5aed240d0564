// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! `sitemap.xml` and `robots.txt` for one language directory.

use crate::lang::Locale;
use crate::pages::{OutputClass, RenderedPage};
use maud::{Markup, html};

const XML_PROLOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

impl OutputClass {
    /// Sitemap `<priority>` weight.
    #[must_use]
    pub fn priority(self) -> &'static str {
        match self {
            OutputClass::Home => "1.0",
            OutputClass::Index => "0.9",
            OutputClass::Service => "0.8",
            OutputClass::Commune => "0.7",
            OutputClass::Utility => "0.6",
            OutputClass::Legal => "0.3",
        }
    }

    /// Sitemap `<changefreq>`.
    #[must_use]
    pub fn changefreq(self) -> &'static str {
        match self {
            OutputClass::Home | OutputClass::Index => "weekly",
            OutputClass::Service | OutputClass::Commune | OutputClass::Utility => "monthly",
            OutputClass::Legal => "yearly",
        }
    }
}

/// Today's date as written into `<lastmod>`.
#[must_use]
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Sitemap of the pages written for `locale`, grouped by class in
/// priority order and in build order within a class.
#[must_use]
pub fn sitemap_xml(locale: &Locale, domain: &str, pages: &[RenderedPage], lastmod: &str) -> String {
    let mut ordered: Vec<&RenderedPage> = pages.iter().collect();
    ordered.sort_by_key(|p| p.class);

    let body: Markup = html! {
        urlset xmlns=(SITEMAP_NS) {
            @for page in &ordered {
                url {
                    loc { (locale.absolute_url(domain, page.slug.as_deref())) }
                    lastmod { (lastmod) }
                    changefreq { (page.class.changefreq()) }
                    priority { (page.class.priority()) }
                }
            }
        }
    };
    format!("{XML_PROLOG}\n{}\n", body.into_string())
}

/// `robots.txt` allowing everything and pointing at this language's sitemap.
#[must_use]
pub fn robots_txt(locale: &Locale, domain: &str) -> String {
    let domain = domain.trim_end_matches('/');
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {domain}{}/sitemap.xml\n",
        locale.prefix()
    )
}
