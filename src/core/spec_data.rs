//! CSS syntax lookups in the per-specification dataset
//!
//! The dataset maps a specification short name (`css-overflow-4`) to the
//! properties and selectors it defines. The same property can be defined by
//! several levels of one specification, so a lookup collects every match and
//! then picks a winner.

use crate::core::front_matter::PageType;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

/// One specification's listing
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SpecEntry {
    #[serde(default)]
    pub properties: Vec<PropertyDef>,
    #[serde(default)]
    pub selectors: Vec<JsonValue>,
}

/// A property definition as published upstream
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDef {
    #[serde(default)]
    pub name: String,
    pub value: Option<JsonValue>,
    pub initial: Option<JsonValue>,
    pub applies_to: Option<JsonValue>,
    pub inherited: Option<JsonValue>,
    pub computed_value: Option<JsonValue>,
    pub animation_type: Option<JsonValue>,
    pub values: Option<JsonValue>,
}

/// Specification short name split into base name and level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortName {
    pub name: String,
    pub version: u32,
}

impl ShortName {
    /// `css-overflow-4` is `css-overflow` level 4, `css-overflow` is level 0
    pub fn parse(short_name: &str) -> Self {
        if let Some((base, last)) = short_name.rsplit_once('-') {
            if !last.is_empty() && last.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(version) = last.parse() {
                    return Self {
                        name: base.to_string(),
                        version,
                    };
                }
            }
        }
        Self {
            name: short_name.to_string(),
            version: 0,
        }
    }
}

impl fmt::Display for ShortName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version == 0 {
            f.write_str(&self.name)
        } else {
            write!(f, "{}-{}", self.name, self.version)
        }
    }
}

/// Syntax descriptor attached to a record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecSyntax {
    pub spec: ShortName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syntax: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applies_to: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherited: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computed_value: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_type: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<JsonValue>,
}

impl SpecSyntax {
    /// Descriptor for one property definition in specification `short_name`
    pub fn from_property(short_name: &str, def: &PropertyDef) -> Self {
        Self {
            spec: ShortName::parse(short_name),
            syntax: def.value.clone(),
            initial: def.initial.clone(),
            applies_to: def.applies_to.clone(),
            inherited: def.inherited.clone(),
            computed_value: def.computed_value.clone(),
            animation_type: def.animation_type.clone(),
            values: def.values.clone(),
        }
    }
}

/// The loaded specification-syntax dataset
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct SpecDataset {
    specs: BTreeMap<String, SpecEntry>,
}

impl SpecDataset {
    /// Dataset from listings keyed by short name
    pub fn new(specs: BTreeMap<String, SpecEntry>) -> Self {
        Self { specs }
    }

    /// Number of specifications
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the dataset lists no specification
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Syntax for the feature at `dotted`, for the page types that have one
    pub fn resolve(&self, dotted: &str, page_type: PageType) -> Option<SpecSyntax> {
        let name = dotted.rsplit('.').next().filter(|s| !s.is_empty())?;
        match page_type {
            PageType::CssProperty => self.resolve_property(name),
            PageType::CssSelector => self.resolve_selector(name),
            _ => None,
        }
    }

    /// Every specification's definition of property `name`, in short-name order
    pub fn property_matches(&self, name: &str) -> Vec<SpecSyntax> {
        self.specs
            .iter()
            .filter_map(|(short_name, entry)| {
                entry
                    .properties
                    .iter()
                    .find(|def| def.name == name)
                    .map(|def| SpecSyntax::from_property(short_name, def))
            })
            .collect()
    }

    /// The winning definition of property `name`, see [`pick_latest`]
    pub fn resolve_property(&self, name: &str) -> Option<SpecSyntax> {
        pick_latest(name, self.property_matches(name))
    }

    /// Selector syntax lookup: not implemented, always `None`
    pub fn resolve_selector(&self, name: &str) -> Option<SpecSyntax> {
        debug!("selector syntax lookup is not implemented (`{}`)", name);
        None
    }
}

/// Pick the winning definition among matches
///
/// A single match wins outright. Several matches from levels of one
/// specification resolve to the highest level. Matches from different
/// specifications are ambiguous and resolve to nothing.
pub fn pick_latest(name: &str, mut matches: Vec<SpecSyntax>) -> Option<SpecSyntax> {
    match matches.len() {
        0 => None,
        1 => matches.pop(),
        _ => {
            let base = matches[0].spec.name.clone();
            if matches.iter().any(|m| m.spec.name != base) {
                let specs: Vec<String> = matches.iter().map(|m| m.spec.to_string()).collect();
                debug!("`{}` is defined by unrelated specs {:?}, leaving it out", name, specs);
                return None;
            }
            matches.into_iter().max_by_key(|m| m.spec.version)
        }
    }
}
