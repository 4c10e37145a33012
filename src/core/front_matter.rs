//! Front matter parsing and validation
//!
//! Documents open with a `---` delimited block of `key: value` lines. Parsing
//! is two-step: [`RawFrontMatter::parse`] produces the flat string mapping and
//! the offset where the body starts, [`FrontMatter::from_raw`] turns that into
//! a validated record or a [`SkipReason`].

use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Line that opens and closes the header block
pub const DELIMITER: &str = "---";

/// Dotted path of the feature, required
pub const KEY_BROWSER_COMPAT: &str = "browser-compat";
/// Page-type tag, required
pub const KEY_PAGE_TYPE: &str = "page-type";
/// Record title
pub const KEY_TITLE: &str = "title";
/// Documentation slug, the tail of `mdnURL`
pub const KEY_SLUG: &str = "slug";

/// Keys that are understood but do not feed the record
const KNOWN_UNUSED_KEYS: &[&str] = &["short-title", "status", "spec-urls", "sidebar"];

/// Why a document did not produce a record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("no front matter block")]
    NoFrontMatter,

    #[error("missing or empty `{0}`")]
    MissingKey(&'static str),

    #[error("unknown page type `{0}`")]
    UnknownPageType(String),

    #[error("page type `{0}` is not in the allow-list")]
    PageTypeNotAllowed(PageType),

    #[error("cannot be merged: {0}")]
    Unmergeable(String),
}

impl SkipReason {
    /// Stable label used for counting skips
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoFrontMatter => "no-front-matter",
            Self::MissingKey(_) => "missing-key",
            Self::UnknownPageType(_) => "unknown-page-type",
            Self::PageTypeNotAllowed(_) => "page-type-not-allowed",
            Self::Unmergeable(_) => "unmergeable",
        }
    }
}

/// Page-type tags a document may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageType {
    CssProperty,
    CssShorthandProperty,
    CssSelector,
    CssAtRule,
    CssAtRuleDescriptor,
    CssFunction,
    CssType,
    CssKeyword,
    CssPseudoClass,
    CssPseudoElement,
    CssMediaFeature,
    HtmlElement,
    HtmlAttribute,
    HtmlAttributeValue,
    SvgElement,
    SvgAttribute,
    WebApiInterface,
    WebApiConstructor,
    WebApiInstanceMethod,
    WebApiInstanceProperty,
    WebApiStaticMethod,
    WebApiStaticProperty,
    WebApiEvent,
    JavascriptClass,
    JavascriptConstructor,
    JavascriptFunction,
    JavascriptGlobalProperty,
    JavascriptInstanceMethod,
    JavascriptInstanceAccessorProperty,
    JavascriptInstanceDataProperty,
    JavascriptStaticMethod,
    JavascriptStaticAccessorProperty,
    JavascriptStaticDataProperty,
    JavascriptOperator,
    JavascriptStatement,
    HttpHeader,
}

impl PageType {
    /// Every known tag, the default allow-list
    pub const ALL: [PageType; 36] = [
        Self::CssProperty,
        Self::CssShorthandProperty,
        Self::CssSelector,
        Self::CssAtRule,
        Self::CssAtRuleDescriptor,
        Self::CssFunction,
        Self::CssType,
        Self::CssKeyword,
        Self::CssPseudoClass,
        Self::CssPseudoElement,
        Self::CssMediaFeature,
        Self::HtmlElement,
        Self::HtmlAttribute,
        Self::HtmlAttributeValue,
        Self::SvgElement,
        Self::SvgAttribute,
        Self::WebApiInterface,
        Self::WebApiConstructor,
        Self::WebApiInstanceMethod,
        Self::WebApiInstanceProperty,
        Self::WebApiStaticMethod,
        Self::WebApiStaticProperty,
        Self::WebApiEvent,
        Self::JavascriptClass,
        Self::JavascriptConstructor,
        Self::JavascriptFunction,
        Self::JavascriptGlobalProperty,
        Self::JavascriptInstanceMethod,
        Self::JavascriptInstanceAccessorProperty,
        Self::JavascriptInstanceDataProperty,
        Self::JavascriptStaticMethod,
        Self::JavascriptStaticAccessorProperty,
        Self::JavascriptStaticDataProperty,
        Self::JavascriptOperator,
        Self::JavascriptStatement,
        Self::HttpHeader,
    ];

    /// The tag as written in front matter
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CssProperty => "css-property",
            Self::CssShorthandProperty => "css-shorthand-property",
            Self::CssSelector => "css-selector",
            Self::CssAtRule => "css-at-rule",
            Self::CssAtRuleDescriptor => "css-at-rule-descriptor",
            Self::CssFunction => "css-function",
            Self::CssType => "css-type",
            Self::CssKeyword => "css-keyword",
            Self::CssPseudoClass => "css-pseudo-class",
            Self::CssPseudoElement => "css-pseudo-element",
            Self::CssMediaFeature => "css-media-feature",
            Self::HtmlElement => "html-element",
            Self::HtmlAttribute => "html-attribute",
            Self::HtmlAttributeValue => "html-attribute-value",
            Self::SvgElement => "svg-element",
            Self::SvgAttribute => "svg-attribute",
            Self::WebApiInterface => "web-api-interface",
            Self::WebApiConstructor => "web-api-constructor",
            Self::WebApiInstanceMethod => "web-api-instance-method",
            Self::WebApiInstanceProperty => "web-api-instance-property",
            Self::WebApiStaticMethod => "web-api-static-method",
            Self::WebApiStaticProperty => "web-api-static-property",
            Self::WebApiEvent => "web-api-event",
            Self::JavascriptClass => "javascript-class",
            Self::JavascriptConstructor => "javascript-constructor",
            Self::JavascriptFunction => "javascript-function",
            Self::JavascriptGlobalProperty => "javascript-global-property",
            Self::JavascriptInstanceMethod => "javascript-instance-method",
            Self::JavascriptInstanceAccessorProperty => "javascript-instance-accessor-property",
            Self::JavascriptInstanceDataProperty => "javascript-instance-data-property",
            Self::JavascriptStaticMethod => "javascript-static-method",
            Self::JavascriptStaticAccessorProperty => "javascript-static-accessor-property",
            Self::JavascriptStaticDataProperty => "javascript-static-data-property",
            Self::JavascriptOperator => "javascript-operator",
            Self::JavascriptStatement => "javascript-statement",
            Self::HttpHeader => "http-header",
        }
    }
}

impl FromStr for PageType {
    type Err = SkipReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|page_type| page_type.as_str() == s)
            .ok_or_else(|| SkipReason::UnknownPageType(s.to_string()))
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The header block as flat strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrontMatter {
    pub fields: BTreeMap<String, String>,
    /// Byte offset just past the closing delimiter line
    pub end: usize,
}

impl RawFrontMatter {
    /// Parse the header block at the top of `content`
    ///
    /// Returns `None` when the document does not start with the delimiter or
    /// the block is never closed.
    pub fn parse(content: &str) -> Option<Self> {
        let mut lines = content.split_inclusive('\n');
        let first = lines.next()?;
        if !is_delimiter(first) {
            return None;
        }

        let mut offset = first.len();
        let mut fields = BTreeMap::new();

        for line in lines {
            offset += line.len();
            if is_delimiter(line) {
                return Some(Self {
                    fields,
                    end: offset,
                });
            }
            if let Some((key, value)) = line.split_once(':') {
                let key = key.trim();
                if key.is_empty() {
                    continue;
                }
                fields.insert(key.to_string(), unquote(value.trim()));
            }
        }

        None
    }

    /// Raw value of `key`, possibly empty
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Value of `key` when present and non-empty
    fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

/// Unquote a YAML-quoted scalar, leaving anything else as written
fn unquote(value: &str) -> String {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if !quoted {
        return value.to_string();
    }
    serde_yaml::from_str::<String>(value).unwrap_or_else(|_| value.to_string())
}

/// Validated front matter of a document that can produce a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub browser_compat: String,
    pub page_type: PageType,
    pub title: String,
    pub slug: Option<String>,
    /// Keys outside the known set, in key order
    pub unrecognized: Vec<String>,
}

impl FrontMatter {
    /// Validate a raw header against the required keys and page-type allow-list
    pub fn from_raw(raw: &RawFrontMatter, allowed: &[PageType]) -> Result<Self, SkipReason> {
        let browser_compat = raw
            .non_empty(KEY_BROWSER_COMPAT)
            .ok_or(SkipReason::MissingKey(KEY_BROWSER_COMPAT))?;
        let page_type: PageType = raw
            .non_empty(KEY_PAGE_TYPE)
            .ok_or(SkipReason::MissingKey(KEY_PAGE_TYPE))?
            .parse()?;
        if !allowed.contains(&page_type) {
            return Err(SkipReason::PageTypeNotAllowed(page_type));
        }

        let unrecognized: Vec<String> = raw
            .fields
            .keys()
            .filter(|key| !is_known_key(key))
            .cloned()
            .collect();
        if !unrecognized.is_empty() {
            debug!(
                "{}: unrecognized front matter keys {:?}",
                browser_compat, unrecognized
            );
        }

        Ok(Self {
            browser_compat: browser_compat.to_string(),
            page_type,
            title: raw.get(KEY_TITLE).unwrap_or_default().to_string(),
            slug: raw.non_empty(KEY_SLUG).map(str::to_string),
            unrecognized,
        })
    }

    /// Parse and validate in one step
    pub fn parse(content: &str, allowed: &[PageType]) -> Result<(Self, usize), SkipReason> {
        let raw = RawFrontMatter::parse(content).ok_or(SkipReason::NoFrontMatter)?;
        let front_matter = Self::from_raw(&raw, allowed)?;
        Ok((front_matter, raw.end))
    }
}

fn is_known_key(key: &str) -> bool {
    matches!(
        key,
        KEY_BROWSER_COMPAT | KEY_PAGE_TYPE | KEY_TITLE | KEY_SLUG
    ) || KNOWN_UNUSED_KEYS.contains(&key)
}
