// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Small fixed-shape HTML fragments built with Maud.
//!
//! Larger, site-overridable fragments (cards, grids, FAQ blocks) are Tera
//! partials; see [`crate::render`].

use crate::lang::Language;
use crate::model::Entity;
use maud::{Markup, html};

/// Relative link to an entity page from a page `prefix` below the
/// language root.
#[must_use]
pub fn entity_href(prefix: &str, slug: &str) -> String {
    format!("{prefix}{slug}/index.html")
}

/// `url` escaped for an HTML attribute, for partials that print it with
/// `| safe`.
#[must_use]
pub fn attr_escaped(url: &str) -> String {
    html! { (url) }.into_string()
}

/// `<li><a href=..>name</a></li>` per entity, as used by sidebars and the
/// footer.
#[must_use]
pub fn link_list<T: Entity>(items: &[&T], prefix: &str) -> String {
    let markup: Markup = html! {
        @for item in items {
            li { a href=(entity_href(prefix, item.slug())) { (item.name()) } }
        }
    };
    markup.into_string()
}

/// Inline anchors joined with ` | `.
#[must_use]
pub fn inline_links<T: Entity>(items: &[&T], prefix: &str) -> String {
    joined_links(items, prefix, None, " | ")
}

/// Anchors joined with `separator`, optionally carrying a class.
#[must_use]
pub fn joined_links<T: Entity>(
    items: &[&T],
    prefix: &str,
    class: Option<&str>,
    separator: &str,
) -> String {
    items
        .iter()
        .map(|item| {
            html! { a class=[class] href=(entity_href(prefix, item.slug())) { (item.name()) } }
                .into_string()
        })
        .collect::<Vec<_>>()
        .join(separator)
}

/// Pill-shaped links, used for neighbour and homepage zone lists.
#[must_use]
pub fn tag_links<T: Entity>(items: &[&T], prefix: &str, class: &str) -> String {
    let markup: Markup = html! {
        @for item in items {
            a class=(class) href=(entity_href(prefix, item.slug())) { (item.name()) }
        }
    };
    markup.into_string()
}

/// `<link rel="alternate">` tags for every language plus `x-default`.
#[must_use]
pub fn hreflang_links(alternates: &[(Language, String)], x_default: &str) -> String {
    let markup: Markup = html! {
        @for (lang, url) in alternates {
            link rel="alternate" hreflang=(lang.code()) href=(url);
        }
        link rel="alternate" hreflang="x-default" href=(x_default);
    };
    markup.into_string()
}

/// One breadcrumb step. `href` is `None` for the current page.
#[derive(Debug, Clone)]
pub struct Crumb {
    pub name: String,
    pub href: Option<String>,
}

impl Crumb {
    #[must_use]
    pub fn link(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            href: Some(href.into()),
        }
    }

    #[must_use]
    pub fn current(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            href: None,
        }
    }
}

/// Microdata breadcrumb items. Positions start at 2; the home crumb is
/// part of the page template.
#[must_use]
pub fn breadcrumb_items(crumbs: &[Crumb]) -> String {
    let markup: Markup = html! {
        @for (i, crumb) in crumbs.iter().enumerate() {
            li class="breadcrumb-item" itemprop="itemListElement" itemscope itemtype="https://schema.org/ListItem" {
                @if let Some(href) = &crumb.href {
                    a class="breadcrumb-link" itemprop="item" href=(href) {
                        span itemprop="name" { (crumb.name) }
                    }
                } @else {
                    span class="breadcrumb-link" aria-current="page" itemprop="name" { (crumb.name) }
                }
                meta itemprop="position" content=(i + 2);
            }
        }
    };
    markup.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Commune;
    use serde_json::json;

    fn commune(id: i64, slug: &str, name: &str) -> Commune {
        serde_json::from_value(json!({"id": id, "slug": slug, "name": name})).expect("commune")
    }

    #[test]
    fn attribute_escaping_leaves_paths_alone() {
        assert_eq!(attr_escaped("../depannage-uccle/index.html"), "../depannage-uccle/index.html");
        assert_eq!(attr_escaped(r#"a"b&c"#), "a&quot;b&amp;c");
    }

    #[test]
    fn link_list_escapes_names() {
        let a = commune(1, "depannage-ixelles", "Ixelles & Co");
        let html = link_list(&[&a], "../");
        assert_eq!(
            html,
            r#"<li><a href="../depannage-ixelles/index.html">Ixelles &amp; Co</a></li>"#
        );
    }

    #[test]
    fn inline_links_are_pipe_joined() {
        let a = commune(1, "a", "A");
        let b = commune(2, "b", "B");
        assert_eq!(
            inline_links(&[&a, &b], ""),
            r#"<a href="a/index.html">A</a> | <a href="b/index.html">B</a>"#
        );
    }

    #[test]
    fn hreflang_has_x_default() {
        let html = hreflang_links(
            &[
                (Language::Fr, "https://x.be/tarifs/".into()),
                (Language::En, "https://x.be/en/pricing/".into()),
            ],
            "https://x.be/tarifs/",
        );
        assert!(html.contains(r#"hreflang="en" href="https://x.be/en/pricing/""#));
        assert!(html.ends_with(r#"<link rel="alternate" hreflang="x-default" href="https://x.be/tarifs/">"#));
    }

    #[test]
    fn breadcrumb_marks_current_page() {
        let html = breadcrumb_items(&[
            Crumb::link("Services", "../services/index.html"),
            Crumb::current("Remorquage"),
        ]);
        assert!(html.contains(r#"href="../services/index.html""#));
        assert!(html.contains(r#"aria-current="page" itemprop="name">Remorquage</span>"#));
        assert!(html.contains(r#"content="3""#));
    }
}
