//! First-paragraph summary extraction

use crate::core::normalize::normalize;

/// Macro lines before the paragraph are skipped
pub const MACRO_OPEN: &str = "{{";
/// Raw markup lines before the paragraph are skipped
pub const RAW_MARKUP: &str = "<";
/// A heading line ends the paragraph
pub const HEADING_MARKER: &str = "#";

/// Extract the plain-text summary of a document
///
/// `body_start` is the offset just past the front matter's closing delimiter.
/// Blank lines, macro lines and raw markup lines before the paragraph are
/// skipped. The paragraph runs until a blank line or a heading, and a heading
/// reached before any prose means there is no summary.
pub fn extract_summary(content: &str, body_start: usize) -> String {
    let body = content.get(body_start..).unwrap_or_default();
    let paragraph = first_paragraph(body);
    if paragraph.is_empty() {
        return String::new();
    }
    normalize(&paragraph)
}

fn first_paragraph(body: &str) -> String {
    let mut collected: Vec<&str> = Vec::new();

    for line in body.lines() {
        let trimmed = line.trim();

        if collected.is_empty() {
            if trimmed.is_empty() || trimmed.starts_with(MACRO_OPEN) || trimmed.starts_with(RAW_MARKUP)
            {
                continue;
            }
            if trimmed.starts_with(HEADING_MARKER) {
                break;
            }
        } else if trimmed.is_empty() || trimmed.starts_with(HEADING_MARKER) {
            break;
        }

        collected.push(trimmed);
    }

    collected.join("\n")
}
