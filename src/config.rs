//! Build configuration
//!
//! Every path the build touches is a fixed constant relative to a base
//! directory. [`BuildConfig::default`] carries those constants; the binary only
//! chooses the base.

use crate::core::PageType;
use std::path::{Path, PathBuf};

/// Root of the markdown corpus
pub const CONTENT_ROOT: &str = "content/files/en-us";
/// Documents that are considered at all
pub const INCLUDE_GLOB: &str = "**/index.md";
/// Subtrees of the corpus that never contribute records
pub const IGNORE_GLOBS: &[&str] = &["conflicting/**", "orphaned/**"];
/// Browser-compatibility dataset
pub const COMPAT_DATASET: &str = "node_modules/@mdn/browser-compat-data/data.json";
/// Specification-syntax dataset
pub const SPEC_DATASET: &str = "node_modules/@webref/css/css.json";
/// Artifact directory
pub const OUTPUT_DIR: &str = "package";
/// Name of the JSON artifact inside [`OUTPUT_DIR`]
pub const OUTPUT_FILE: &str = "data.json";
/// The build's own package descriptor, also the name of the mirrored one
pub const PACKAGE_DESCRIPTOR: &str = "package.json";
/// Files copied verbatim into the artifact directory
pub const COPIED_FILES: &[&str] = &["README.md"];
/// Descriptor fields overwritten in the mirrored descriptor
pub const MIRRORED_FIELDS: &[&str] = &[
    "name",
    "version",
    "description",
    "repository",
    "bugs",
    "homepage",
    "author",
    "license",
];
/// Prefix for documentation URLs built from a document's slug
pub const DOCS_BASE_URL: &str = "https://developer.mozilla.org/en-US/docs/";

/// Configuration for one build run
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory all other paths are relative to
    pub base_dir: PathBuf,
    /// Markdown corpus root
    pub content_root: PathBuf,
    /// Glob matched against paths relative to `content_root`
    pub include: String,
    /// Globs that exclude otherwise included documents
    pub ignore: Vec<String>,
    /// Browser-compatibility dataset
    pub compat_dataset: PathBuf,
    /// Specification-syntax dataset
    pub spec_dataset: PathBuf,
    /// Artifact directory
    pub output_dir: PathBuf,
    /// Artifact file name inside `output_dir`
    pub output_file: String,
    /// Package descriptor name (source at base, target in `output_dir`)
    pub package_descriptor: String,
    /// Descriptor fields mirrored into the target descriptor
    pub mirrored_fields: Vec<String>,
    /// Files copied into `output_dir`
    pub copied_files: Vec<PathBuf>,
    /// Page types that may produce a record
    pub allowed_page_types: Vec<PageType>,
    /// Prefix for `mdnURL`
    pub docs_base_url: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            content_root: PathBuf::from(CONTENT_ROOT),
            include: INCLUDE_GLOB.to_string(),
            ignore: IGNORE_GLOBS.iter().map(|s| s.to_string()).collect(),
            compat_dataset: PathBuf::from(COMPAT_DATASET),
            spec_dataset: PathBuf::from(SPEC_DATASET),
            output_dir: PathBuf::from(OUTPUT_DIR),
            output_file: OUTPUT_FILE.to_string(),
            package_descriptor: PACKAGE_DESCRIPTOR.to_string(),
            mirrored_fields: MIRRORED_FIELDS.iter().map(|s| s.to_string()).collect(),
            copied_files: COPIED_FILES.iter().map(PathBuf::from).collect(),
            allowed_page_types: PageType::ALL.to_vec(),
            docs_base_url: DOCS_BASE_URL.to_string(),
        }
    }
}

impl BuildConfig {
    /// Default configuration rooted at `base_dir`
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Default::default()
        }
    }

    /// Resolve a configured path against the base directory
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.base_dir.join(path)
    }

    /// Resolved markdown corpus root
    pub fn content_dir(&self) -> PathBuf {
        self.resolve(&self.content_root)
    }

    /// Resolved artifact directory
    pub fn artifact_dir(&self) -> PathBuf {
        self.resolve(&self.output_dir)
    }

    /// Full path of the JSON artifact
    pub fn artifact_path(&self) -> PathBuf {
        self.artifact_dir().join(&self.output_file)
    }

    /// Whether documents of this page type are turned into records
    pub fn allows(&self, page_type: PageType) -> bool {
        self.allowed_page_types.contains(&page_type)
    }

    /// Documentation URL for a slug
    pub fn docs_url(&self, slug: &str) -> String {
        format!("{}{}", self.docs_base_url, slug)
    }
}
