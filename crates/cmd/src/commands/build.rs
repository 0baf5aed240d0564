// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Build command - loads the site configuration and runs the generator
//!
//! Example:
//!   sitebuild --root ./site --all-langs

use crate::cli::Cli;
use anyhow::{Context, Result};
use sitegen::{BuildOptions, BuildReport, SiteConfig, SiteGenerator};

/// Run one build as described by the command line.
pub fn build_command(cli: &Cli) -> Result<BuildReport> {
    let config_path = cli.config_path();
    let config = SiteConfig::load(&config_path)
        .with_context(|| format!("Failed to load configuration {}", config_path.display()))?;

    let langs = if cli.all_langs {
        config.languages.clone()
    } else {
        vec![cli.lang]
    };
    let options = BuildOptions {
        scope: cli.build_scope(),
        check: cli.check,
    };

    let mut generator = SiteGenerator::new(&cli.root, config);
    if let Some(output) = &cli.output {
        generator = generator.with_output(output);
    }
    diagnostics::log_debug!(
        "building into {output}",
        output: generator.output().display().to_string()
    );

    let report = generator
        .build(&langs, &options)
        .with_context(|| format!("Failed to build site from {}", cli.root.display()))?;

    for lang in &report.languages {
        diagnostics::log_info!(
            "{lang}: {pages} pages, {urls} sitemap URLs, {assets} asset files in {dir}",
            lang: lang.lang.code(),
            pages: lang.total_pages(),
            urls: lang.sitemap_urls,
            assets: lang.assets_copied,
            dir: lang.output_dir.display().to_string()
        );
        if lang.pages_with_placeholders > 0 {
            diagnostics::log_warn!(
                "{lang}: {count} pages still contain placeholders",
                lang: lang.lang.code(),
                count: lang.pages_with_placeholders
            );
        }
    }
    Ok(report)
}
