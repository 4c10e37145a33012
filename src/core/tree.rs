//! Nested output tree keyed by dotted feature path

use crate::core::record::FeatureRecord;
use crate::error::{BuildError, Result};
use log::warn;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

/// The accumulated index
///
/// Records sit at the end of their dotted path. A record inserted below an
/// existing record's path is nested inside that record's object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OutputTree {
    root: Map<String, JsonValue>,
}

impl OutputTree {
    /// An empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no record has been merged yet
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Fold a record into the tree, returning the tree
    ///
    /// A record already at the same path is replaced, but sub-features nested
    /// in it are carried over. A sub-feature named like a record field
    /// (`api.Event.type`) and that field overwrite each other in merge order;
    /// both directions are logged.
    pub fn merge(mut self, record: &FeatureRecord) -> Result<Self> {
        if let Some(field) = self.shadowed_field(&record.path) {
            warn!(
                "`{}` overwrites the `{}` field of its parent record",
                record.path, field
            );
        }

        let mut value = serde_json::to_value(record)?;
        if let (Some(JsonValue::Object(existing)), JsonValue::Object(fields)) =
            (self.get(&record.path), &mut value)
        {
            for (key, child) in existing {
                if !FeatureRecord::FIELDS.contains(&key.as_str()) {
                    if !fields.contains_key(key) {
                        fields.insert(key.clone(), child.clone());
                    }
                } else if is_record_at(child, &format!("{}.{}", record.path, key)) {
                    warn!(
                        "`{}.{}` is replaced by the `{}` field of `{}`",
                        record.path, key, key, record.path
                    );
                }
            }
        }
        self.insert(&record.path, value)?;
        Ok(self)
    }

    /// The parent record field that a record at `dotted` would land on, if any
    pub fn shadowed_field<'a>(&self, dotted: &'a str) -> Option<&'a str> {
        let (parent, last) = dotted.rsplit_once('.')?;
        if !FeatureRecord::FIELDS.contains(&last) {
            return None;
        }
        let parent_value = self.get(parent)?;
        (is_record_at(parent_value, parent) && parent_value.get(last).is_some()).then_some(last)
    }

    /// Whether `dotted` can be used as a tree path
    pub fn check_path(dotted: &str) -> Result<()> {
        if dotted.is_empty() {
            return Err(BuildError::invalid_path(dotted, "empty path"));
        }
        if dotted.split('.').any(str::is_empty) {
            return Err(BuildError::invalid_path(dotted, "empty path segment"));
        }
        Ok(())
    }

    /// Place `value` at `dotted`, creating intermediate objects; last write wins
    pub fn insert(&mut self, dotted: &str, value: JsonValue) -> Result<()> {
        Self::check_path(dotted)?;
        let segments: Vec<&str> = dotted.split('.').collect();

        let Some((last, parents)) = segments.split_last() else {
            return Err(BuildError::invalid_path(dotted, "empty path"));
        };

        let mut current = &mut self.root;
        for segment in parents {
            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| JsonValue::Object(Map::new()));
            if !entry.is_object() {
                *entry = JsonValue::Object(Map::new());
            }
            current = match entry {
                JsonValue::Object(map) => map,
                _ => return Err(BuildError::invalid_path(dotted, "intermediate is not an object")),
            };
        }

        current.insert(last.to_string(), value);
        Ok(())
    }

    /// The value at `dotted`, record or intermediate object
    pub fn get(&self, dotted: &str) -> Option<&JsonValue> {
        let mut segments = dotted.split('.');
        let mut current = self.root.get(segments.next()?)?;
        for segment in segments {
            current = current.get(segment)?;
        }
        Some(current)
    }

    /// Compact JSON, the artifact's exact bytes
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// The tree as one JSON object
    pub fn into_value(self) -> JsonValue {
        JsonValue::Object(self.root)
    }
}

/// Whether `value` is the serialized record for `dotted`
fn is_record_at(value: &JsonValue, dotted: &str) -> bool {
    value.get("path").and_then(JsonValue::as_str) == Some(dotted)
}
