//! Browser-compatibility lookups
//!
//! The dataset is one nested JSON object addressed by dotted path. A node is a
//! compatibility record when it carries the `__compat` marker. Lookups run as
//! normalized JSONPath queries (`$['css']['properties']['margin']['__compat']`)
//! so a missing segment anywhere along the way simply yields no node.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use serde_json_path::JsonPath;

/// Key that marks a node as a compatibility record
pub const COMPAT_MARKER: &str = "__compat";

/// Trimmed projection of an upstream compatibility record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support: Option<JsonValue>,
}

/// Upstream `spec_url`, one URL or several
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecUrl {
    One(String),
    Many(Vec<String>),
}

/// The loaded compatibility dataset
#[derive(Debug, Clone)]
pub struct CompatData {
    root: JsonValue,
}

impl CompatData {
    /// Wrap the parsed dataset root
    pub fn new(root: JsonValue) -> Self {
        Self { root }
    }

    /// The `__compat` node for a dotted path, if there is one
    fn record(&self, dotted: &str) -> Option<&JsonValue> {
        let query = compat_query(dotted)?;
        let path = match JsonPath::parse(&query) {
            Ok(path) => path,
            Err(e) => {
                debug!("cannot build compat query for `{}`: {}", dotted, e);
                return None;
            }
        };
        path.query(&self.root).into_iter().next()
    }

    /// Resolve the trimmed compatibility record for a dotted path
    pub fn resolve(&self, dotted: &str) -> Option<CompatInfo> {
        let record = self.record(dotted)?;
        Some(CompatInfo {
            status: record.get("status").cloned(),
            support: record.get("support").cloned(),
        })
    }

    /// The record's `spec_url`, if present
    pub fn spec_url(&self, dotted: &str) -> Option<SpecUrl> {
        let raw = self.record(dotted)?.get("spec_url")?;
        match serde_json::from_value(raw.clone()) {
            Ok(url) => Some(url),
            Err(e) => {
                debug!("ignoring spec_url of `{}`: {}", dotted, e);
                None
            }
        }
    }
}

/// Normalized JSONPath for the marker node under a dotted path
fn compat_query(dotted: &str) -> Option<String> {
    if dotted.is_empty() {
        return None;
    }
    let mut query = String::from("$");
    for segment in dotted.split('.').chain(std::iter::once(COMPAT_MARKER)) {
        query.push_str("['");
        for c in segment.chars() {
            if c == '\'' || c == '\\' {
                query.push('\\');
            }
            query.push(c);
        }
        query.push_str("']");
    }
    Some(query)
}
