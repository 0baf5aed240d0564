// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Build orchestration: one sequential pass per language that loads the
//! content store, assembles every page, writes it below the language
//! directory and finishes with assets, sitemap and robots.

use crate::config::SiteConfig;
use crate::error::{Error, Result};
use crate::lang::{Language, Locale};
use crate::pages::{self, OutputClass, RenderedPage};
use crate::render::Renderer;
use crate::resolve::check_missing_variables;
use crate::sitemap;
use crate::store::SiteData;
use crate::validate::{inject_urls, validate_urls};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Which pages a build writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildScope {
    #[default]
    All,
    ServicesOnly,
    CommunesOnly,
    HomepageOnly,
}

impl BuildScope {
    fn home(self) -> bool {
        matches!(self, BuildScope::All | BuildScope::HomepageOnly)
    }

    fn static_pages(self) -> bool {
        self == BuildScope::All
    }

    fn services(self) -> bool {
        matches!(self, BuildScope::All | BuildScope::ServicesOnly)
    }

    fn communes(self) -> bool {
        matches!(self, BuildScope::All | BuildScope::CommunesOnly)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub scope: BuildScope,
    /// Scan written pages for unresolved `{{NAME}}` placeholders.
    pub check: bool,
}

/// What one language's build produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageReport {
    pub lang: Language,
    pub output_dir: PathBuf,
    pub pages: BTreeMap<OutputClass, usize>,
    /// `<url>` entries in `sitemap.xml`; zero when no sitemap was written.
    pub sitemap_urls: usize,
    pub assets_copied: usize,
    /// Pages that still contain placeholders, when checking was requested.
    pub pages_with_placeholders: usize,
}

impl LanguageReport {
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.pages.values().sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub languages: Vec<LanguageReport>,
}

impl BuildReport {
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.languages.iter().map(LanguageReport::total_pages).sum()
    }
}

/// Builds a project rooted at `root` as described by its [`SiteConfig`].
pub struct SiteGenerator {
    root: PathBuf,
    config: SiteConfig,
    output: PathBuf,
}

impl SiteGenerator {
    /// Output goes to `paths.output` below the root unless overridden.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, config: SiteConfig) -> Self {
        let root = root.into();
        let output = root.join(&config.paths.output);
        Self {
            root,
            config,
            output,
        }
    }

    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Build `langs` one after the other. A language missing from the
    /// configuration is an error before anything is written.
    pub fn build(&self, langs: &[Language], options: &BuildOptions) -> Result<BuildReport> {
        if let Some(unknown) = langs.iter().find(|l| !self.config.languages.contains(l)) {
            return Err(Error::UnknownLanguage(unknown.code().to_string()));
        }

        let renderer = Renderer::load(&self.root.join(&self.config.paths.templates))?;
        let mut report = BuildReport::default();
        for &lang in langs {
            let locale = Locale::new(lang, self.config.default_language);
            report
                .languages
                .push(self.build_language(locale, &renderer, options)?);
        }

        diagnostics::log_info!(
            "build complete: {pages} pages in {langs} languages to {output}",
            pages: report.total_pages(),
            langs: report.languages.len(),
            output: self.output.display().to_string()
        );
        Ok(report)
    }

    fn build_language(
        &self,
        locale: Locale,
        renderer: &Renderer,
        options: &BuildOptions,
    ) -> Result<LanguageReport> {
        let lang = locale.lang;
        diagnostics::log_info!("building {lang}", lang: lang.code());
        let mut data = SiteData::load(&self.config, &self.root, locale)?;

        validate_urls(&data.variables, &data.services, &data.active_communes()).log();
        let mut variables = std::mem::take(&mut data.variables);
        inject_urls(&mut variables, &data.services, &data.active_communes());
        data.variables = variables;

        let scope = options.scope;
        let mut written: Vec<RenderedPage> = Vec::new();
        if scope.home() {
            written.push(pages::home::assemble(&data, renderer)?);
        }
        if scope.static_pages() {
            for page in &data.pages {
                written.push(pages::static_pages::assemble(&data, renderer, page)?);
            }
        }
        if scope.services() {
            for service in &data.services {
                written.push(pages::service::assemble(&data, renderer, service)?);
            }
        }
        if scope.communes() {
            for commune in data.active_communes() {
                written.push(pages::commune::assemble(&data, renderer, commune)?);
            }
        }

        let dir = locale.output_dir(&self.output);
        let mut pages: BTreeMap<OutputClass, usize> = BTreeMap::new();
        let mut pages_with_placeholders = 0;
        for page in &written {
            write_file(&dir.join(page.rel_path()), &page.html)?;
            *pages.entry(page.class).or_default() += 1;
            if options.check && report_placeholders(page) {
                pages_with_placeholders += 1;
            }
        }
        for (class, count) in &pages {
            diagnostics::log_info!(
                "wrote {count} {class} pages",
                count: *count,
                class: format!("{class:?}").to_lowercase()
            );
        }

        let assets_copied = self.copy_assets(&dir)?;

        let mut sitemap_urls = 0;
        if scope == BuildScope::All {
            let xml = sitemap::sitemap_xml(&locale, &data.domain, &written, &sitemap::today());
            write_file(&dir.join("sitemap.xml"), &xml)?;
            write_file(
                &dir.join("robots.txt"),
                &sitemap::robots_txt(&locale, &data.domain),
            )?;
            sitemap_urls = written.len();
            diagnostics::log_info!("sitemap.xml lists {urls} URLs", urls: sitemap_urls);
        }

        Ok(LanguageReport {
            lang,
            output_dir: dir,
            pages,
            sitemap_urls,
            assets_copied,
            pages_with_placeholders,
        })
    }

    /// Copy the configured asset directories into `dir`.
    fn copy_assets(&self, dir: &Path) -> Result<usize> {
        let source = self.root.join(&self.config.paths.assets);
        let mut copied = 0;
        for name in &self.config.assets {
            let from = source.join(name);
            if !from.is_dir() {
                diagnostics::log_debug!(
                    "asset directory {path} not found, skipping",
                    path: from.display().to_string()
                );
                continue;
            }
            copied += copy_dir(&from, &dir.join(name))?;
        }
        diagnostics::log_debug!("copied {count} asset files", count: copied);
        Ok(copied)
    }
}

/// Log leftover placeholders in a page; true when there were any.
fn report_placeholders(page: &RenderedPage) -> bool {
    let missing = check_missing_variables(&page.html);
    if missing.is_empty() {
        return false;
    }
    diagnostics::log_warn!(
        "{path} still contains {names}",
        path: page.rel_path().display().to_string(),
        names: missing.join(", ")
    );
    true
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    fs::write(path, text).map_err(|e| Error::io(path, e))?;
    diagnostics::log_debug!("wrote {path}", path: path.display().to_string());
    Ok(())
}

/// Recursive copy; returns the number of files copied.
fn copy_dir(from: &Path, to: &Path) -> Result<usize> {
    fs::create_dir_all(to).map_err(|e| Error::io(to, e))?;
    let mut copied = 0;
    for entry in fs::read_dir(from).map_err(|e| Error::io(from, e))? {
        let entry = entry.map_err(|e| Error::io(from, e))?;
        let path = entry.path();
        let target = to.join(entry.file_name());
        if path.is_dir() {
            copied += copy_dir(&path, &target)?;
        } else {
            fs::copy(&path, &target).map_err(|e| Error::io(&path, e))?;
            copied += 1;
        }
    }
    Ok(copied)
}
