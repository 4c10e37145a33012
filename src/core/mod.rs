//! Core types and domain logic
//!
//! - front matter parsing and validation
//! - summary extraction and markdown normalization
//! - compatibility and specification lookups
//! - the feature record and the output tree it is merged into

pub mod compat;
pub mod front_matter;
pub mod normalize;
pub mod record;
pub mod spec_data;
pub mod summary;
pub mod tree;

pub use compat::{CompatData, CompatInfo, SpecUrl};
pub use front_matter::{FrontMatter, PageType, RawFrontMatter, SkipReason};
pub use normalize::normalize;
pub use record::FeatureRecord;
pub use spec_data::{ShortName, SpecDataset, SpecSyntax};
pub use summary::extract_summary;
pub use tree::OutputTree;
