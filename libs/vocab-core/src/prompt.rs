//! What the presentation layer shows for one turn.

use crate::cloze::BlankTemplate;
use crate::entry::{Entry, EntryKey};
use crate::types::QuestionMode;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const GLOSS_FALLBACK_CHARS: usize = 20;

fn cjk_run() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[\u{4e00}-\u{9fa5}；，。（）]+").expect("valid gloss pattern"))
}

/// Pull the core meaning out of a noisy translation.
///
/// `"1) n. 演变 v. 逐步发展"` becomes `"演变 / 逐步发展"`. Translations with no
/// CJK text are cut to their first 20 characters.
pub fn gloss(translation: &str) -> String {
    let runs: Vec<&str> = cjk_run().find_iter(translation).map(|m| m.as_str()).collect();
    if !runs.is_empty() {
        return runs.join(" / ");
    }
    if translation.chars().count() > GLOSS_FALLBACK_CHARS {
        let head: String = translation.chars().take(GLOSS_FALLBACK_CHARS).collect();
        format!("{}...", head)
    } else {
        translation.to_string()
    }
}

/// Lower-cased first letter of the answer's first word.
pub fn first_letter(answer: &str) -> Option<char> {
    answer
        .split_whitespace()
        .next()
        .and_then(|word| word.chars().next())
        .map(|c| c.to_lowercase().next().unwrap_or(c))
}

/// Position in the current queue, 1-based for the entry on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

/// One rendered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub key: EntryKey,
    pub progress: Progress,
    /// The mode this entry is actually judged in.
    pub mode: QuestionMode,
    /// The line to show the user.
    pub text: String,
    pub gloss: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_letter: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<BlankTemplate>,
}

impl Prompt {
    pub fn translate(entry: &Entry, progress: Progress, hint: bool) -> Self {
        let gloss = gloss(&entry.translation);
        let first_letter = hint.then(|| first_letter(entry.answer())).flatten();
        let text = match first_letter {
            Some(letter) => format!("{} (first letter: {})", gloss, letter),
            None => gloss.clone(),
        };
        Self {
            key: entry.key(),
            progress,
            mode: QuestionMode::Translate,
            text,
            gloss,
            first_letter,
            template: None,
        }
    }

    pub fn cloze(entry: &Entry, template: BlankTemplate, progress: Progress, hint: bool) -> Self {
        let gloss = gloss(&entry.translation);
        let text = template.render(hint, Some(&gloss));
        Self {
            key: entry.key(),
            progress,
            mode: QuestionMode::Cloze,
            text,
            first_letter: hint.then(|| first_letter(entry.answer())).flatten(),
            gloss,
            template: Some(template),
        }
    }

    /// A sentence whose markup could not be parsed: show it whole, judge the term.
    pub fn unblanked(entry: &Entry, sentence: &str, progress: Progress, hint: bool) -> Self {
        let mut prompt = Self::translate(entry, progress, hint);
        prompt.text = format!("{}\n{}", sentence, prompt.text);
        prompt
    }
}
