//! The per-document feature record

use crate::core::compat::{CompatInfo, SpecUrl};
use crate::core::front_matter::PageType;
use crate::core::spec_data::SpecSyntax;
use serde::Serialize;

/// Everything the index knows about one feature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub path: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub page_type: Option<PageType>,
    pub title: String,
    #[serde(rename = "mdnURL", skip_serializing_if = "Option::is_none")]
    pub mdn_url: Option<String>,
    pub summary: String,
    #[serde(rename = "specURL", skip_serializing_if = "Option::is_none")]
    pub spec_url: Option<SpecUrl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compat: Option<CompatInfo>,
    #[serde(rename = "specData", skip_serializing_if = "Option::is_none")]
    pub spec_data: Option<SpecSyntax>,
}

impl FeatureRecord {
    /// Serialized field names; any other key in a record's object is a sub-feature
    pub const FIELDS: &'static [&'static str] = &[
        "path", "type", "title", "mdnURL", "summary", "specURL", "compat", "specData",
    ];

    /// A record with only the fields every document has
    pub fn new(path: impl Into<String>, title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            page_type: None,
            title: title.into(),
            mdn_url: None,
            summary: summary.into(),
            spec_url: None,
            compat: None,
            spec_data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_absent_fields_are_omitted() {
        let record = FeatureRecord::new("css.properties.margin", "margin", "Sets the margin.");
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "path": "css.properties.margin",
                "title": "margin",
                "summary": "Sets the margin."
            })
        );
    }

    #[test]
    fn test_field_names() {
        let record = FeatureRecord {
            page_type: Some(PageType::CssProperty),
            mdn_url: Some("https://developer.mozilla.org/en-US/docs/Web/CSS/margin".to_string()),
            spec_url: Some(SpecUrl::One("https://drafts.csswg.org/css-box/".to_string())),
            compat: Some(CompatInfo {
                status: None,
                support: Some(json!({})),
            }),
            ..FeatureRecord::new("css.properties.margin", "margin", "")
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], json!("css-property"));
        assert_eq!(
            value["mdnURL"],
            json!("https://developer.mozilla.org/en-US/docs/Web/CSS/margin")
        );
        assert_eq!(value["specURL"], json!("https://drafts.csswg.org/css-box/"));
        assert_eq!(value["compat"], json!({"support": {}}));
        assert!(value.get("specData").is_none());
    }

    #[test]
    fn test_fields_cover_every_serialized_key() {
        let record = FeatureRecord {
            page_type: Some(PageType::CssProperty),
            mdn_url: Some(String::new()),
            spec_url: Some(SpecUrl::Many(vec![])),
            compat: Some(CompatInfo {
                status: None,
                support: None,
            }),
            spec_data: Some(SpecSyntax {
                spec: crate::core::spec_data::ShortName::parse("css-box-4"),
                syntax: None,
                initial: None,
                applies_to: None,
                inherited: None,
                computed_value: None,
                animation_type: None,
                values: None,
            }),
            ..FeatureRecord::new("a", "", "")
        };
        let value = serde_json::to_value(&record).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, FeatureRecord::FIELDS);
    }
}
