// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! End-to-end builds of the fixture project under `tests/fixtures/site`.

use regex::Regex;
use sitegen::generator::{BuildOptions, BuildScope};
use sitegen::pages::OutputClass;
use sitegen::{Language, SiteConfig, SiteGenerator};
use std::fs;
use std::path::{Path, PathBuf};

fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/site")
}

fn generator(output: &Path) -> SiteGenerator {
    let root = fixture_root();
    let config = SiteConfig::load(&root.join("site.yaml")).expect("site.yaml");
    SiteGenerator::new(root, config).with_output(output)
}

/// Every `*.html` below `dir`, skipping the nested language trees.
fn html_files(dir: &Path, skip: &[&str]) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current).expect("read_dir") {
            let path = entry.expect("entry").path();
            if path.is_dir() {
                let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
                if current == dir && skip.contains(&name) {
                    continue;
                }
                pending.push(path);
            } else if path.extension().is_some_and(|e| e == "html") {
                found.push(path);
            }
        }
    }
    found.sort();
    found
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

#[test]
fn full_french_build_writes_every_page() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let report = generator(tmp.path())
        .build(&[Language::Fr], &BuildOptions::default())
        .expect("build");

    // 1 home + 7 static pages + 3 services + 5 active communes.
    let fr = &report.languages[0];
    assert_eq!(fr.total_pages(), 16);
    assert_eq!(fr.pages.get(&OutputClass::Home), Some(&1));
    assert_eq!(fr.pages.get(&OutputClass::Index), Some(&2));
    assert_eq!(fr.pages.get(&OutputClass::Service), Some(&3));
    assert_eq!(fr.pages.get(&OutputClass::Commune), Some(&5));
    assert_eq!(fr.pages.get(&OutputClass::Utility), Some(&3));
    assert_eq!(fr.pages.get(&OutputClass::Legal), Some(&2));
    assert_eq!(html_files(tmp.path(), &[]).len(), 16);

    let sitemap = read(&tmp.path().join("sitemap.xml"));
    let urls = Regex::new(r"<url><loc>([^<]+)</loc>").expect("regex");
    let locs: Vec<&str> = urls
        .captures_iter(&sitemap)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    assert_eq!(locs.len(), 16);
    assert_eq!(fr.sitemap_urls, 16);
    assert_eq!(locs[0], "https://www.example-depannage.be/");
    assert!(locs.contains(&"https://www.example-depannage.be/depannage-uccle/"));
    assert!(!sitemap.contains("overijse"));

    let robots = read(&tmp.path().join("robots.txt"));
    assert!(robots.contains("Sitemap: https://www.example-depannage.be/sitemap.xml"));

    assert!(tmp.path().join("css/main.css").is_file());
    assert!(tmp.path().join("images/services/towing.svg").is_file());
    assert!(!tmp.path().join("depannage-overijse").exists());
}

#[test]
fn pages_carry_resolved_content() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let options = BuildOptions {
        check: true,
        ..BuildOptions::default()
    };
    let report = generator(tmp.path())
        .build(&[Language::Fr], &options)
        .expect("build");
    assert_eq!(report.languages[0].pages_with_placeholders, 0);

    let home = read(&tmp.path().join("index.html"));
    assert!(home.contains("<h1>Dépannage automobile à Bruxelles</h1>"));
    assert!(home.contains("Appeler le 0479 89 00 89"));
    assert!(home.contains("20 ans sur la route"));
    assert!(home.contains(r#"width="800" height="450""#));
    assert!(home.contains("https://wa.me/32479890089?text="));

    let pricing = read(&tmp.path().join("tarifs/index.html"));
    assert!(pricing.contains("Dépannage à partir de 65 €."));
    assert!(pricing.contains("Forfait 95 € la nuit."));
    assert!(pricing.contains(r#"href="https://www.example-depannage.be/tarifs/""#));

    let towing = read(&tmp.path().join("remorquage-voiture/index.html"));
    assert!(towing.contains("Dès à partir de 65 €."));
    assert!(towing.contains(r#"href="../depannage-ixelles/index.html""#));
    assert!(towing.contains(r#"hreflang="en""#));
    assert!(towing.contains("https://www.example-depannage.be/en/car-towing/"));

    let ixelles = read(&tmp.path().join("depannage-ixelles/index.html"));
    assert!(ixelles.contains("Dépannage à Ixelles"));
    assert!(ixelles.contains("Flagey"));
    assert!(ixelles.contains("Sur place en 30 minutes à Ixelles."));

    let services = read(&tmp.path().join("services/index.html"));
    assert!(services.find("Remorquage voiture") < services.find("Réparation pneu"));
}

#[test]
fn scoped_build_of_a_nested_language() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let options = BuildOptions {
        scope: BuildScope::HomepageOnly,
        ..BuildOptions::default()
    };
    let report = generator(tmp.path())
        .build(&[Language::En], &options)
        .expect("build");

    let en = &report.languages[0];
    assert_eq!(en.output_dir, tmp.path().join("en"));
    assert_eq!(en.total_pages(), 1);
    assert_eq!(en.sitemap_urls, 0);
    assert_eq!(html_files(tmp.path(), &[]).len(), 1);

    let home = read(&tmp.path().join("en/index.html"));
    assert!(home.contains("Car breakdown assistance in Brussels"));
    assert!(home.contains(r#"href="../css/main.css""#) || home.contains(r#"href="css/main.css""#));
    assert!(!tmp.path().join("en/sitemap.xml").exists());
    assert!(tmp.path().join("en/css/main.css").is_file());
}

#[test]
fn every_language_gets_its_own_sitemap() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let report = generator(tmp.path())
        .build(&[Language::Fr, Language::En], &BuildOptions::default())
        .expect("build");
    assert_eq!(report.total_pages(), 32);
    assert_eq!(html_files(tmp.path(), &["en"]).len(), 16);
    assert_eq!(html_files(&tmp.path().join("en"), &[]).len(), 16);

    let robots = read(&tmp.path().join("en/robots.txt"));
    assert!(robots.contains("Sitemap: https://www.example-depannage.be/en/sitemap.xml"));
    let sitemap = read(&tmp.path().join("en/sitemap.xml"));
    assert!(sitemap.contains("<loc>https://www.example-depannage.be/en/pricing/</loc>"));
}

#[test]
fn missing_table_fails_the_build() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = tmp.path().join("project");
    fs::create_dir_all(&root).expect("mkdir");
    let err = SiteGenerator::new(&root, SiteConfig::default())
        .build(&[Language::Fr], &BuildOptions::default())
        .expect_err("no tables");
    assert!(matches!(err, sitegen::Error::MissingTable { kind: "services", .. }));
}
