//! Normalization of raw engine output into displayable lines.
//!
//! An engine reports a turn's output in one of several shapes (see
//! [`UpdateRecord`]). [`process`] picks the first usable shape, splits it
//! into lines, and drops anything that would render as a blank line or a
//! bare `>` prompt.

use std::mem;
use std::sync::LazyLock;

use regex::Regex;
use wf_core::UpdateRecord;

/// Line breaks and preformatted block delimiters.
static MARKUP_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|<pre\b[^>]*>|</pre\s*>").expect("markup token pattern is valid")
});

/// Any markup tag.
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

/// The prompt glyph engines print after each turn.
const PROMPT: &str = ">";

enum Token {
    Break,
    PreOpen,
    PreClose,
}

impl Token {
    fn classify(raw: &str) -> Self {
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("<br") {
            Token::Break
        } else if lower.starts_with("</") {
            Token::PreClose
        } else {
            Token::PreOpen
        }
    }
}

/// Convert one update record into display lines.
///
/// Shapes are tried in order: pre-split `lines` (even if empty), non-empty
/// `text`, non-empty markup `output`, non-empty `message`. The result is
/// filtered with [`is_displayable`]; kept lines are not trimmed.
pub fn process(record: &UpdateRecord) -> Vec<String> {
    let raw: Vec<String> = if let Some(lines) = &record.lines {
        lines.clone()
    } else if let Some(text) = record.text.as_deref().filter(|t| !t.is_empty()) {
        text.split('\n').map(str::to_string).collect()
    } else if let Some(blob) = record.output.as_deref().filter(|o| !o.is_empty()) {
        split_markup(blob)
    } else if let Some(message) = record.message.as_deref().filter(|m| !m.is_empty()) {
        vec![message.to_string()]
    } else {
        Vec::new()
    };

    raw.into_iter().filter(|l| is_displayable(l)).collect()
}

/// Split a markup blob on line breaks, keeping `<pre>` blocks whole.
///
/// A break inside an open `<pre>` is kept in the current unit. A break
/// outside one ends the unit unless the unit is still whitespace-only, in
/// which case the break is dropped and the whitespace carries over.
pub fn split_markup(blob: &str) -> Vec<String> {
    let mut units = Vec::new();
    let mut current = String::new();
    let mut in_pre = false;
    let mut cursor = 0;

    for token in MARKUP_TOKEN.find_iter(blob) {
        current.push_str(&blob[cursor..token.start()]);
        cursor = token.end();

        match Token::classify(token.as_str()) {
            Token::Break if in_pre => current.push_str(token.as_str()),
            Token::Break => {
                if !current.trim().is_empty() {
                    units.push(mem::take(&mut current));
                }
            }
            Token::PreOpen => {
                in_pre = true;
                current.push_str(token.as_str());
            }
            Token::PreClose => {
                in_pre = false;
                current.push_str(token.as_str());
            }
        }
    }

    current.push_str(&blob[cursor..]);
    if !current.trim().is_empty() {
        units.push(current);
    }
    units
}

/// Whether a line carries visible content.
///
/// Blank lines are rejected, as are lines that reduce to nothing or to a
/// bare prompt once tags are stripped and `&gt;` is decoded.
pub fn is_displayable(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }
    let stripped = TAG.replace_all(trimmed, "");
    let decoded = stripped.trim().replace("&gt;", PROMPT);
    let visible = decoded.trim();
    !visible.is_empty() && visible != PROMPT
}
