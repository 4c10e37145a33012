//! Loading the external datasets
//!
//! Both datasets are read once per run and handed to the resolvers by
//! reference.

use crate::config::BuildConfig;
use crate::core::{CompatData, SpecDataset};
use crate::error::{BuildError, Result};
use crate::io::fs::read_to_string;
use log::info;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::path::Path;

/// Everything the resolvers consult
#[derive(Debug, Clone)]
pub struct Datasets {
    pub compat: CompatData,
    pub specs: SpecDataset,
}

impl Datasets {
    /// Bundle already loaded datasets
    pub fn new(compat: CompatData, specs: SpecDataset) -> Self {
        Self { compat, specs }
    }

    /// Load both datasets named by the configuration
    pub fn load(config: &BuildConfig) -> Result<Self> {
        let compat_path = config.resolve(&config.compat_dataset);
        let spec_path = config.resolve(&config.spec_dataset);

        let compat = load_compat(&compat_path)?;
        let specs: SpecDataset = load_json(&spec_path)?;
        info!(
            "loaded compat data from {} and {} specs from {}",
            compat_path.display(),
            specs.len(),
            spec_path.display()
        );

        Ok(Self::new(compat, specs))
    }
}

fn load_compat(path: &Path) -> Result<CompatData> {
    let root: JsonValue = load_json(path)?;
    if !root.is_object() {
        return Err(BuildError::unexpected_shape(path, "expected a JSON object"));
    }
    Ok(CompatData::new(root))
}

/// Read and deserialize a JSON file
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| BuildError::malformed_json(path, e))
}
