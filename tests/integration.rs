//! End-to-end builds over a small fixture corpus
//!
//! Each test lays out a base directory the way a real checkout looks: the
//! markdown corpus, both datasets under `node_modules/`, the package
//! descriptor and the README.

use compatdex::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const MARGIN: &str = r#"---
title: margin
slug: Web/CSS/margin
page-type: css-property
browser-compat: css.properties.margin
---

{{CSSRef}}

The **`margin`** [CSS](/en-US/docs/Web/CSS) property sets the margin area on all four sides of an element.

## Syntax
"#;

const PADDING: &str = r#"---
title: padding
slug: Web/CSS/padding
page-type: css-property
browser-compat: css.properties.padding
---

The **`padding`** property sets the padding area.
"#;

const ANCHOR: &str = r#"---
title: "<a>: The Anchor element"
slug: Web/HTML/Element/a
page-type: html-element
browser-compat: html.elements.a
---

{{HTMLSidebar}}

The **`<a>`** element creates a hyperlink
to web pages.
"#;

const GUIDE: &str = r#"---
title: CSS guide
slug: Web/CSS/Guide
page-type: guide
---

No compat data here.
"#;

fn write(base: &Path, relative: &str, content: &str) {
    let path = base.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    let base = dir.path();

    write(base, "content/files/en-us/web/css/margin/index.md", MARGIN);
    write(base, "content/files/en-us/web/css/padding/index.md", PADDING);
    write(base, "content/files/en-us/web/html/element/a/index.md", ANCHOR);
    write(base, "content/files/en-us/web/css/guide/index.md", GUIDE);
    write(
        base,
        "content/files/en-us/conflicting/web/css/margin/index.md",
        &MARGIN.replace("title: margin", "title: stale margin"),
    );
    write(
        base,
        "content/files/en-us/orphaned/web/css/margin/index.md",
        &MARGIN.replace("title: margin", "title: orphaned margin"),
    );
    write(base, "content/files/en-us/web/css/margin/notes.md", MARGIN);

    write(
        base,
        "node_modules/@mdn/browser-compat-data/data.json",
        &json!({
            "__meta": {"version": "5.0.0"},
            "css": {"properties": {
                "margin": {"__compat": {
                    "spec_url": "https://drafts.csswg.org/css-box/#margin-physical",
                    "status": {"experimental": false, "standard_track": true, "deprecated": false},
                    "support": {"firefox": {"version_added": "1"}},
                    "mdn_url": "https://developer.mozilla.org/docs/Web/CSS/margin"
                }},
                "padding": {"__compat": {
                    "spec_url": [
                        "https://drafts.csswg.org/css-box-3/#padding-physical",
                        "https://drafts.csswg.org/css-box-4/#padding-physical"
                    ],
                    "support": {"firefox": {"version_added": "1"}}
                }}
            }},
            "html": {"elements": {"a": {"__compat": {
                "status": {"deprecated": false},
                "support": {"chrome": {"version_added": "1"}}
            }}}}
        })
        .to_string(),
    );
    write(
        base,
        "node_modules/@webref/css/css.json",
        &json!({
            "css-box-3": {"properties": [
                {"name": "padding", "value": "<'padding-top'>{1,4}", "initial": "see individual properties"}
            ]},
            "css-box-4": {"properties": [
                {"name": "margin", "value": "<'margin-top'>{1,4}", "inherited": "no"},
                {"name": "padding", "value": "<'padding-top'>{1,4}", "initial": "0"}
            ]},
            "selectors-4": {"selectors": [{"name": ":hover"}]}
        })
        .to_string(),
    );

    write(
        base,
        "package.json",
        &json!({
            "name": "compat-index",
            "version": "1.4.0",
            "description": "Feature index",
            "license": "CC0-1.0",
            "scripts": {"build": "compatdex"},
            "devDependencies": {"@mdn/browser-compat-data": "^5.0.0"}
        })
        .to_string(),
    );
    write(base, "README.md", "# compat-index\n");

    dir
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_complete_build() {
    let dir = fixture();
    let config = BuildConfig::with_base_dir(dir.path());

    let report = Builder::new(config.clone()).run().unwrap();

    assert_eq!(report.documents, 4);
    assert_eq!(report.records, 3);
    assert_eq!(report.skipped.get("missing-key"), Some(&1));
    assert_eq!(report.skipped_total(), 1);

    assert_eq!(
        read_json(&config.artifact_path()),
        json!({
            "css": {"properties": {
                "margin": {
                    "path": "css.properties.margin",
                    "type": "css-property",
                    "title": "margin",
                    "mdnURL": "https://developer.mozilla.org/en-US/docs/Web/CSS/margin",
                    "summary": "The margin CSS property sets the margin area on all four sides of an element.",
                    "specURL": "https://drafts.csswg.org/css-box/#margin-physical",
                    "compat": {
                        "status": {"experimental": false, "standard_track": true, "deprecated": false},
                        "support": {"firefox": {"version_added": "1"}}
                    },
                    "specData": {
                        "spec": {"name": "css-box", "version": 4},
                        "syntax": "<'margin-top'>{1,4}",
                        "inherited": "no"
                    }
                },
                "padding": {
                    "path": "css.properties.padding",
                    "type": "css-property",
                    "title": "padding",
                    "mdnURL": "https://developer.mozilla.org/en-US/docs/Web/CSS/padding",
                    "summary": "The padding property sets the padding area.",
                    "specURL": [
                        "https://drafts.csswg.org/css-box-3/#padding-physical",
                        "https://drafts.csswg.org/css-box-4/#padding-physical"
                    ],
                    "compat": {"support": {"firefox": {"version_added": "1"}}},
                    "specData": {
                        "spec": {"name": "css-box", "version": 4},
                        "syntax": "<'padding-top'>{1,4}",
                        "initial": "0"
                    }
                }
            }},
            "html": {"elements": {"a": {
                "path": "html.elements.a",
                "type": "html-element",
                "title": "<a>: The Anchor element",
                "mdnURL": "https://developer.mozilla.org/en-US/docs/Web/HTML/Element/a",
                "summary": "The <a> element creates a hyperlink to web pages.",
                "compat": {
                    "status": {"deprecated": false},
                    "support": {"chrome": {"version_added": "1"}}
                }
            }}}
        })
    );
}

#[test]
fn test_artifact_is_compact_json() {
    let dir = fixture();
    let config = BuildConfig::with_base_dir(dir.path());
    Builder::new(config.clone()).run().unwrap();

    let content = fs::read_to_string(config.artifact_path()).unwrap();
    assert!(!content.contains('\n'));
    assert!(content.starts_with(r#"{"css":{"properties":{"margin":{"path":"css.properties.margin","#));
}

#[test]
fn test_rebuild_is_byte_identical() {
    let dir = fixture();
    let config = BuildConfig::with_base_dir(dir.path());

    let first_report = Builder::new(config.clone()).run().unwrap();
    let first = fs::read(config.artifact_path()).unwrap();
    let second_report = Builder::new(config.clone()).run().unwrap();
    let second = fs::read(config.artifact_path()).unwrap();

    assert_eq!(first_report, second_report);
    assert_eq!(first, second);
}

#[test]
fn test_descriptor_and_readme_are_mirrored() {
    let dir = fixture();
    let config = BuildConfig::with_base_dir(dir.path());
    write(
        dir.path(),
        "package/package.json",
        &json!({"name": "old-name", "version": "0.0.1", "main": "data.json"}).to_string(),
    );

    Builder::new(config.clone()).run().unwrap();

    assert_eq!(
        read_json(&config.artifact_dir().join("package.json")),
        json!({
            "name": "compat-index",
            "version": "1.4.0",
            "main": "data.json",
            "description": "Feature index",
            "license": "CC0-1.0"
        })
    );
    assert_eq!(
        fs::read_to_string(config.artifact_dir().join("README.md")).unwrap(),
        "# compat-index\n"
    );
}

#[test]
fn test_disallowed_page_types_are_skipped() {
    let dir = fixture();
    let config = BuildConfig {
        allowed_page_types: vec![PageType::CssProperty],
        ..BuildConfig::with_base_dir(dir.path())
    };

    let report = Builder::new(config.clone()).run().unwrap();

    assert_eq!(report.records, 2);
    assert_eq!(report.skipped.get("page-type-not-allowed"), Some(&1));
    let tree = read_json(&config.artifact_path());
    assert!(tree.get("html").is_none());
    assert!(tree.pointer("/css/properties/margin").is_some());
}

#[test]
fn test_skipped_documents_do_not_stop_the_build() {
    let dir = fixture();
    write(
        dir.path(),
        "content/files/en-us/web/css/broken/index.md",
        "no front matter at all\n",
    );
    write(
        dir.path(),
        "content/files/en-us/web/css/unknown/index.md",
        "---\npage-type: css-mystery\nbrowser-compat: css.properties.unknown\n---\n",
    );
    write(
        dir.path(),
        "content/files/en-us/web/css/dots/index.md",
        "---\npage-type: css-property\nbrowser-compat: css..dots\n---\n",
    );
    let config = BuildConfig::with_base_dir(dir.path());

    let report = Builder::new(config).run().unwrap();

    assert_eq!(report.documents, 7);
    assert_eq!(report.records, 3);
    assert_eq!(report.skipped.get("no-front-matter"), Some(&1));
    assert_eq!(report.skipped.get("unknown-page-type"), Some(&1));
    assert_eq!(report.skipped.get("unmergeable"), Some(&1));
    assert_eq!(report.skipped_total(), 4);
}

#[test]
fn test_malformed_dataset_leaves_artifact_untouched() {
    let dir = fixture();
    let config = BuildConfig::with_base_dir(dir.path());
    write(dir.path(), "package/data.json", "{\"previous\":true}");
    write(
        dir.path(),
        "node_modules/@mdn/browser-compat-data/data.json",
        "{ not json",
    );

    let result = Builder::new(config.clone()).run();

    assert!(matches!(result, Err(BuildError::MalformedJson { .. })));
    assert_eq!(
        fs::read_to_string(config.artifact_path()).unwrap(),
        "{\"previous\":true}"
    );
}

#[test]
fn test_missing_dataset_is_fatal() {
    let dir = fixture();
    fs::remove_file(dir.path().join("node_modules/@webref/css/css.json")).unwrap();

    let result = Builder::new(BuildConfig::with_base_dir(dir.path())).run();

    assert!(matches!(result, Err(BuildError::FileNotFound { .. })));
    assert!(!dir.path().join("package/data.json").exists());
}

#[test]
fn test_missing_content_root_is_fatal() {
    let dir = fixture();
    fs::remove_dir_all(dir.path().join("content")).unwrap();

    let result = Builder::new(BuildConfig::with_base_dir(dir.path())).run();

    assert!(result.is_err());
    assert!(!dir.path().join("package/data.json").exists());
}

#[test]
fn test_empty_corpus_writes_empty_object() {
    let dir = fixture();
    fs::remove_dir_all(dir.path().join("content/files/en-us/web")).unwrap();
    let config = BuildConfig::with_base_dir(dir.path());

    let report = Builder::new(config.clone()).run().unwrap();

    assert_eq!(report.documents, 0);
    assert_eq!(fs::read_to_string(config.artifact_path()).unwrap(), "{}");
}

#[test]
fn test_sub_feature_survives_parent_document() {
    let dir = fixture();
    write(
        dir.path(),
        "content/files/en-us/web/css/margin/auto/index.md",
        "---\ntitle: auto\npage-type: css-keyword\nbrowser-compat: css.properties.margin.auto\n---\n\nCenters the box.\n",
    );
    let config = BuildConfig::with_base_dir(dir.path());

    Builder::new(config.clone()).run().unwrap();

    let tree = read_json(&config.artifact_path());
    assert_eq!(
        tree.pointer("/css/properties/margin/title"),
        Some(&json!("margin"))
    );
    assert_eq!(
        tree.pointer("/css/properties/margin/auto"),
        Some(&json!({
            "path": "css.properties.margin.auto",
            "type": "css-keyword",
            "title": "auto",
            "summary": "Centers the box."
        }))
    );
}

#[cfg(unix)]
#[test]
fn test_published_files_are_world_readable() {
    use std::os::unix::fs::PermissionsExt;

    fn mode(path: &Path) -> u32 {
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    let dir = fixture();
    fs::set_permissions(
        dir.path().join("README.md"),
        fs::Permissions::from_mode(0o644),
    )
    .unwrap();
    let config = BuildConfig::with_base_dir(dir.path());

    Builder::new(config.clone()).run().unwrap();

    assert_eq!(mode(&config.artifact_path()), 0o644);
    assert_eq!(mode(&config.artifact_dir().join("package.json")), 0o644);
    assert_eq!(mode(&config.artifact_dir().join("README.md")), 0o644);
}
