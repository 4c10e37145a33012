//! compatdex: a one-shot build step that turns a documentation corpus into a
//! feature index
//!
//! Every markdown document whose front matter names a `browser-compat` path
//! and a known `page-type` becomes one [`FeatureRecord`]. The record carries
//! the document's title, URL and first-paragraph summary, the trimmed
//! compatibility record found at that path, and, for CSS properties, the
//! formal syntax from the specification dataset. Records are folded into one
//! nested [`OutputTree`] keyed by the dotted path and written as a single
//! compact JSON file.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use compatdex::{BuildConfig, Builder, Result};
//!
//! fn main() -> Result<()> {
//!     let report = Builder::new(BuildConfig::with_base_dir(".")).run()?;
//!     println!("{} records", report.records);
//!     Ok(())
//! }
//! ```
//!
//! ## Single documents
//!
//! ```rust
//! use compatdex::core::{extract_summary, FrontMatter, PageType};
//!
//! let content = "---\nbrowser-compat: css.properties.margin\npage-type: css-property\ntitle: margin\n---\n\nSets the margin.\n";
//! let (front_matter, body_start) = FrontMatter::parse(content, &PageType::ALL).unwrap();
//! assert_eq!(front_matter.browser_compat, "css.properties.margin");
//! assert_eq!(extract_summary(content, body_start), "Sets the margin.");
//! ```
//!
//! # Architecture
//!
//! - [`core`]: parsing, normalization, lookups, the record and the tree
//! - [`io`]: corpus enumeration, dataset loading, atomic artifact writing
//! - [`build`]: the pipeline tying them together
//! - [`config`]: the fixed paths a build uses
//! - [`error`]: fatal errors

pub use build::{build_record, collect, BuildReport, Builder};
pub use config::BuildConfig;
pub use error::{BuildError, Result};

pub use core::{
    CompatData, CompatInfo, FeatureRecord, FrontMatter, OutputTree, PageType, ShortName,
    SkipReason, SpecDataset, SpecSyntax, SpecUrl,
};

pub use io::{Datasets, FileResolver, OutputWriter, WriteResult};

pub mod build;
pub mod config;
pub mod core;
pub mod error;
pub mod io;
