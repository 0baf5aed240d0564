// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use clap::{Args, Parser};
use diagnostics::LogLevel;
use sitegen::{BuildScope, Language};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "sitebuild")]
/// Build the multilingual static site
pub struct Cli {
    /// Project root holding site.yaml, config/, content/ and templates/
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Site configuration file [default: <root>/site.yaml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output directory [default: paths.output from the configuration]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Language to build
    #[arg(long, value_enum, default_value_t = Language::Fr, conflicts_with = "all_langs")]
    pub lang: Language,

    /// Build every configured language
    #[arg(long)]
    pub all_langs: bool,

    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Report pages that still contain {{PLACEHOLDERS}}
    #[arg(long)]
    pub check: bool,

    /// Only show warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Partial builds; at most one may be given.
#[derive(Debug, Args)]
#[group(multiple = false)]
pub struct ScopeArgs {
    /// Only build service pages
    #[arg(long)]
    pub services_only: bool,

    /// Only build commune pages
    #[arg(long)]
    pub communes_only: bool,

    /// Only build the homepage
    #[arg(long)]
    pub homepage_only: bool,
}

impl Cli {
    #[must_use]
    pub fn build_scope(&self) -> BuildScope {
        let scope = &self.scope;
        if scope.services_only {
            BuildScope::ServicesOnly
        } else if scope.communes_only {
            BuildScope::CommunesOnly
        } else if scope.homepage_only {
            BuildScope::HomepageOnly
        } else {
            BuildScope::All
        }
    }

    /// `--quiet` keeps warnings and errors; otherwise `SITEGEN_LOG` decides.
    #[must_use]
    pub fn log_level(&self) -> Option<LogLevel> {
        self.quiet.then_some(LogLevel::Warn)
    }

    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.root.join("site.yaml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build_french_everything() {
        let cli = Cli::try_parse_from(["sitebuild"]).expect("parse");
        assert_eq!(cli.lang, Language::Fr);
        assert!(!cli.all_langs);
        assert_eq!(cli.build_scope(), BuildScope::All);
        assert_eq!(cli.config_path(), PathBuf::from("./site.yaml"));
        assert_eq!(cli.log_level(), None);
    }

    #[test]
    fn scoped_build_for_one_language() {
        let cli = Cli::try_parse_from([
            "sitebuild",
            "--lang",
            "nl",
            "--communes-only",
            "--quiet",
            "--root",
            "/srv/site",
        ])
        .expect("parse");
        assert_eq!(cli.lang, Language::Nl);
        assert_eq!(cli.build_scope(), BuildScope::CommunesOnly);
        assert_eq!(cli.log_level(), Some(LogLevel::Warn));
        assert_eq!(cli.config_path(), PathBuf::from("/srv/site/site.yaml"));
    }

    #[test]
    fn scopes_are_exclusive() {
        let err = Cli::try_parse_from(["sitebuild", "--services-only", "--homepage-only"]);
        assert!(err.is_err());
    }

    #[test]
    fn lang_conflicts_with_all_langs() {
        assert!(Cli::try_parse_from(["sitebuild", "--lang", "en", "--all-langs"]).is_err());
        let cli = Cli::try_parse_from(["sitebuild", "--all-langs"]).expect("parse");
        assert!(cli.all_langs);
    }

    #[test]
    fn unknown_language_is_rejected() {
        assert!(Cli::try_parse_from(["sitebuild", "--lang", "de"]).is_err());
    }
}
