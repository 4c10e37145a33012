//! Markdown to plain text
//!
//! Passes, in order:
//!
//! 1. macro placeholders (`{{Glossary("CSS")}}`) are resolved to their first
//!    quoted argument, or kept as written when they have none, and parked
//!    behind opaque tokens so the markdown parser never sees their text
//! 2. bold-wrapped inline code (`` **`<a>`** ``) loses its bold wrapper so
//!    the code literal survives as text rather than being read as raw HTML
//! 3. CommonMark markup is stripped by walking the `comrak` AST
//! 4. the tokens are swapped back and whitespace runs collapse to one space

use comrak::{
    nodes::{AstNode, NodeValue},
    options::Options,
    parse_document, Arena,
};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static RE_BOLD_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*`([^`]+)`\*\*").expect("bold code pattern"));
static RE_MACRO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{\{.*?\}\}").expect("macro pattern"));
static RE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)"|'([^']*)'"#).expect("quoted pattern"));
static RE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{E000}([0-9]+)\u{E001}").expect("token pattern"));

/// Private-use delimiters around a parked macro's index
const TOKEN_OPEN: char = '\u{E000}';
const TOKEN_CLOSE: char = '\u{E001}';

/// Convert a markdown fragment to a single line of plain text
pub fn normalize(markdown: &str) -> String {
    let (protected, macros) = protect_macros(markdown);
    let plain = strip_markdown(&unwrap_bold_code(&protected));
    collapse_whitespace(&restore_macros(&plain, &macros))
}

/// `**`x`**` becomes `` `x` ``
pub fn unwrap_bold_code(markdown: &str) -> String {
    RE_BOLD_CODE.replace_all(markdown, "`$1`").into_owned()
}

/// Keep text and code literals, drop everything else
pub fn strip_markdown(markdown: &str) -> String {
    let arena = Arena::new();
    let options = Options::default();
    let root = parse_document(&arena, markdown, &options);

    let mut text = String::new();
    collect_text(root, &mut text);
    collapse_whitespace(&text)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text<'a>(node: &'a AstNode<'a>, out: &mut String) {
    let is_block = {
        let data = node.data.borrow();
        match &data.value {
            NodeValue::Text(t) => out.push_str(t),
            NodeValue::Code(code) => out.push_str(&code.literal),
            NodeValue::SoftBreak | NodeValue::LineBreak => out.push(' '),
            NodeValue::HtmlInline(_) | NodeValue::HtmlBlock(_) | NodeValue::CodeBlock(_) => {
                return;
            }
            _ => {}
        }
        matches!(
            data.value,
            NodeValue::Paragraph | NodeValue::Heading(_) | NodeValue::Item(_)
        )
    };

    for child in node.children() {
        collect_text(child, out);
    }

    if is_block {
        out.push(' ');
    }
}

/// Replace each `{{...}}` with a token, returning the resolved text per token
pub fn protect_macros(markdown: &str) -> (String, Vec<String>) {
    let mut resolved = Vec::new();
    let text = RE_MACRO
        .replace_all(markdown, |caps: &Captures| {
            resolved.push(resolve_macro(&caps[0]));
            format!("{}{}{}", TOKEN_OPEN, resolved.len() - 1, TOKEN_CLOSE)
        })
        .into_owned();
    (text, resolved)
}

/// Swap tokens left by [`protect_macros`] for their resolved text
pub fn restore_macros(text: &str, resolved: &[String]) -> String {
    RE_TOKEN
        .replace_all(text, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| resolved.get(index))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// First quoted argument of a placeholder, or the placeholder itself
fn resolve_macro(placeholder: &str) -> String {
    first_quoted(placeholder).unwrap_or(placeholder).to_string()
}

fn first_quoted(placeholder: &str) -> Option<&str> {
    let caps = RE_QUOTED.captures(placeholder)?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}
