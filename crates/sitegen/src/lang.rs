// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Languages and the URL conventions that depend on them.
//!
//! The default language is written at the output root; every other
//! language lives under `<output>/<code>/`. Links between pages are
//! relative, so a page's depth below its language root matters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Fr,
    En,
    Nl,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Fr, Language::En, Language::Nl];

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
            Language::Nl => "nl",
        }
    }

    #[must_use]
    pub fn upper(self) -> &'static str {
        match self {
            Language::Fr => "FR",
            Language::En => "EN",
            Language::Nl => "NL",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fr" => Ok(Language::Fr),
            "en" => Ok(Language::En),
            "nl" => Ok(Language::Nl),
            other => Err(crate::Error::UnknownLanguage(other.to_string())),
        }
    }
}

/// Depth of a page below its language root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// The homepage (`index.html` at the language root).
    Base,
    /// Everything in a `<slug>/index.html` directory.
    Subpage,
}

impl Level {
    fn depth(self) -> usize {
        match self {
            Level::Base => 0,
            Level::Subpage => 1,
        }
    }

    /// Relative prefix from a page back to its language root.
    #[must_use]
    pub fn path_prefix(self) -> &'static str {
        match self {
            Level::Base => "",
            Level::Subpage => "../",
        }
    }
}

/// The language being built, paired with the site's default language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
    pub lang: Language,
    pub default: Language,
}

impl Locale {
    #[must_use]
    pub fn new(lang: Language, default: Language) -> Self {
        Self { lang, default }
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.lang == self.default
    }

    /// URL path prefix: empty for the default language, `/en` otherwise.
    #[must_use]
    pub fn prefix(&self) -> String {
        prefix_for(self.lang, self.default)
    }

    /// Directory this language is written to.
    #[must_use]
    pub fn output_dir(&self, root: &Path) -> PathBuf {
        if self.is_default() {
            root.to_path_buf()
        } else {
            root.join(self.lang.code())
        }
    }

    /// Relative link from a page in this language to the same level in
    /// `target`'s tree root. The current language always links to `./`.
    #[must_use]
    pub fn switch_url(&self, target: Language, level: Level) -> String {
        if target == self.lang {
            return "./".to_string();
        }
        let depth = level.depth() + usize::from(!self.is_default());
        let mut url = "../".repeat(depth);
        if target != self.default {
            url.push_str(target.code());
            url.push('/');
        }
        url
    }

    /// Absolute URL of a page in this language.
    #[must_use]
    pub fn absolute_url(&self, domain: &str, slug: Option<&str>) -> String {
        absolute_url(domain, self.lang, self.default, slug)
    }
}

fn prefix_for(lang: Language, default: Language) -> String {
    if lang == default {
        String::new()
    } else {
        format!("/{}", lang.code())
    }
}

/// `{domain}{prefix}/` for the homepage, `{domain}{prefix}/{slug}/` otherwise.
#[must_use]
pub fn absolute_url(domain: &str, lang: Language, default: Language, slug: Option<&str>) -> String {
    let domain = domain.trim_end_matches('/');
    let prefix = prefix_for(lang, default);
    match slug {
        Some(slug) if !slug.is_empty() => format!("{domain}{prefix}/{slug}/"),
        _ => format!("{domain}{prefix}/"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switcher_urls_from_default_language() {
        let fr = Locale::new(Language::Fr, Language::Fr);
        assert_eq!(fr.switch_url(Language::Fr, Level::Base), "./");
        assert_eq!(fr.switch_url(Language::En, Level::Base), "en/");
        assert_eq!(fr.switch_url(Language::Nl, Level::Subpage), "../nl/");
    }

    #[test]
    fn switcher_urls_from_nested_language() {
        let en = Locale::new(Language::En, Language::Fr);
        assert_eq!(en.switch_url(Language::Fr, Level::Base), "../");
        assert_eq!(en.switch_url(Language::Nl, Level::Base), "../nl/");
        assert_eq!(en.switch_url(Language::Fr, Level::Subpage), "../../");
        assert_eq!(en.switch_url(Language::Nl, Level::Subpage), "../../nl/");
        assert_eq!(en.switch_url(Language::En, Level::Subpage), "./");
    }

    #[test]
    fn output_dirs_and_urls() {
        let root = Path::new("/tmp/build");
        let fr = Locale::new(Language::Fr, Language::Fr);
        let nl = Locale::new(Language::Nl, Language::Fr);
        assert_eq!(fr.output_dir(root), PathBuf::from("/tmp/build"));
        assert_eq!(nl.output_dir(root), PathBuf::from("/tmp/build/nl"));
        assert_eq!(fr.absolute_url("https://x.be/", None), "https://x.be/");
        assert_eq!(
            nl.absolute_url("https://x.be", Some("prijzen")),
            "https://x.be/nl/prijzen/"
        );
    }

    #[test]
    fn parse_language_codes() {
        assert_eq!("EN".parse::<Language>().ok(), Some(Language::En));
        assert!("de".parse::<Language>().is_err());
    }
}
