//! Session settings and the small enums they are built from.

use serde::{Deserialize, Serialize};

/// Classification of an entry for content filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Word,
    Phrase,
}

impl Kind {
    /// Derive the kind from the term itself: anything with inner whitespace is a phrase.
    pub fn classify(term: &str) -> Self {
        if term.trim().contains(char::is_whitespace) {
            Self::Phrase
        } else {
            Self::Word
        }
    }
}

/// Which entries a session draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentFilter {
    All,
    Word,
    Phrase,
}

impl Default for ContentFilter {
    fn default() -> Self {
        Self::All
    }
}

impl ContentFilter {
    pub fn accepts(self, kind: Kind) -> bool {
        match self {
            Self::All => true,
            Self::Word => kind == Kind::Word,
            Self::Phrase => kind == Kind::Phrase,
        }
    }
}

/// Queue ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    Sequential,
    Random,
}

impl Default for Order {
    fn default() -> Self {
        Self::Sequential
    }
}

/// How an entry is asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionMode {
    /// Show the translation, expect the term.
    Translate,
    /// Show the example sentence with blanks, expect the blanked tokens.
    Cloze,
}

impl Default for QuestionMode {
    fn default() -> Self {
        Self::Translate
    }
}

/// What cloze mode does with an entry that has no blank markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClozeFallback {
    /// Leave the entry out of the cloze queue.
    Skip,
    /// Ask the entry in translate mode instead.
    Translate,
}

impl Default for ClozeFallback {
    fn default() -> Self {
        Self::Skip
    }
}

/// How forgiving cloze matching is about inflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tolerance {
    /// Case and punctuation folding only.
    Exact,
    /// Also fold `s`/`es`/`ed`/`ing` suffixes to a shared stem.
    Inflected,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::Inflected
    }
}

/// Settings for one drill session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub content: ContentFilter,
    pub order: Order,
    pub mode: QuestionMode,
    /// Reveal the first letter of the answer in the prompt.
    pub hint: bool,
    /// Seed for random ordering and sentence choice. `None` draws from the OS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Put a missed entry back at the head of the queue.
    pub retry_on_wrong: bool,
    pub cloze_fallback: ClozeFallback,
    /// Count an answer with some correct blanks as not-a-miss.
    pub partial_credit: bool,
    pub tolerance: Tolerance,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            content: ContentFilter::default(),
            order: Order::default(),
            mode: QuestionMode::default(),
            hint: false,
            seed: None,
            retry_on_wrong: false,
            cloze_fallback: ClozeFallback::default(),
            partial_credit: false,
            tolerance: Tolerance::default(),
        }
    }
}

impl Settings {
    /// Settings a review pass runs with: translate mode, first letter shown,
    /// random order. Seed and matching knobs carry over.
    pub fn for_review(&self) -> Self {
        Self {
            content: ContentFilter::All,
            order: Order::Random,
            mode: QuestionMode::Translate,
            hint: true,
            ..self.clone()
        }
    }
}
