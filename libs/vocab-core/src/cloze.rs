//! Blank extraction for cloze prompts.
//!
//! # Format
//! ```text
//! I ate an [[apple]] today.
//! She [[gave up]] smoking；He never [[gives up]].
//! ```
//!
//! Every `[[...]]` span becomes one blank. Spans may not nest and must be
//! closed; several sentences can share one example field, separated by
//! `；` or `;`.

use crate::error::{DrillError, Result};
use crate::normalize::{fold, fold_stemmed};
use serde::{Deserialize, Serialize};

/// What a blank looks like in `display_text`.
pub const PLACEHOLDER: &str = "___";

const OPEN: &str = "[[";
const CLOSE: &str = "]]";

/// One blank cut out of an example sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blank {
    /// The text that sat between the markers.
    pub literal: String,
    /// Case/punctuation/whitespace folded form.
    pub normalized: String,
    /// Folded and stemmed form.
    pub stemmed: String,
    /// Byte offset of the placeholder in `display_text`.
    pub offset: usize,
}

/// An example sentence with its blanks cut out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlankTemplate {
    pub display_text: String,
    pub blanks: Vec<Blank>,
}

impl BlankTemplate {
    /// The literal tokens, in blank order.
    pub fn expected_tokens(&self) -> Vec<&str> {
        self.blanks.iter().map(|blank| blank.literal.as_str()).collect()
    }

    /// Put the markup back: yields the sentence the template was extracted from.
    pub fn reconstruct(&self) -> String {
        let mut out = String::with_capacity(self.display_text.len() + self.blanks.len() * 8);
        let mut cursor = 0;
        for blank in &self.blanks {
            out.push_str(&self.display_text[cursor..blank.offset]);
            out.push_str(OPEN);
            out.push_str(&blank.literal);
            out.push_str(CLOSE);
            cursor = blank.offset + PLACEHOLDER.len();
        }
        out.push_str(&self.display_text[cursor..]);
        out
    }

    /// Render for display, optionally with each blank's first letter before it
    /// and a gloss after it.
    pub fn render(&self, first_letter: bool, gloss: Option<&str>) -> String {
        let mut out = String::with_capacity(self.display_text.len());
        let mut cursor = 0;
        for blank in &self.blanks {
            out.push_str(&self.display_text[cursor..blank.offset]);
            if first_letter {
                if let Some(letter) = blank.normalized.chars().next() {
                    out.push(letter);
                }
            }
            out.push_str(PLACEHOLDER);
            if let Some(gloss) = gloss {
                out.push('(');
                out.push_str(gloss);
                out.push(')');
            }
            cursor = blank.offset + PLACEHOLDER.len();
        }
        out.push_str(&self.display_text[cursor..]);
        out
    }
}

/// Cut the blanks out of one sentence.
///
/// Returns `Ok(None)` when the sentence carries no markup at all.
pub fn extract(sentence: &str) -> Result<Option<BlankTemplate>> {
    let mut display_text = String::with_capacity(sentence.len());
    let mut blanks = Vec::new();
    let mut rest = sentence;
    let mut consumed = 0;

    loop {
        let close = rest.find(CLOSE);
        let Some(open) = rest.find(OPEN) else {
            if let Some(close) = close {
                return Err(malformed(consumed + close, "closing marker without opening marker"));
            }
            display_text.push_str(rest);
            break;
        };
        if let Some(close) = close.filter(|&close| close < open) {
            return Err(malformed(consumed + close, "closing marker without opening marker"));
        }

        display_text.push_str(&rest[..open]);
        let inner_start = open + OPEN.len();
        let inner = &rest[inner_start..];
        let inner_end = inner
            .find(CLOSE)
            .ok_or_else(|| malformed(consumed + open, "unclosed marker"))?;
        let literal = &inner[..inner_end];
        if let Some(nested) = literal.find(OPEN) {
            return Err(malformed(consumed + inner_start + nested, "nested marker"));
        }
        if literal.trim().is_empty() {
            return Err(malformed(consumed + open, "empty blank"));
        }

        blanks.push(Blank {
            literal: literal.to_string(),
            normalized: fold(literal),
            stemmed: fold_stemmed(literal),
            offset: display_text.len(),
        });
        display_text.push_str(PLACEHOLDER);

        let advanced = inner_start + inner_end + CLOSE.len();
        consumed += advanced;
        rest = &rest[advanced..];
    }

    if blanks.is_empty() {
        return Ok(None);
    }
    Ok(Some(BlankTemplate { display_text, blanks }))
}

/// Split an example field into its sentences.
pub fn sentences(example: &str) -> Vec<&str> {
    example
        .split(['；', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Whether a sentence contains any blank markup.
pub fn has_markup(sentence: &str) -> bool {
    sentence.contains(OPEN)
}

/// The sentence with all markers removed, used when the markup cannot be parsed.
pub fn strip_markup(sentence: &str) -> String {
    sentence.replace(OPEN, "").replace(CLOSE, "")
}

fn malformed(position: usize, reason: &'static str) -> DrillError {
    DrillError::MalformedMarkup { position, reason }
}
