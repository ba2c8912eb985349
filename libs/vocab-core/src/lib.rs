//! Quiz engine for vocabulary and phrase drills.
//!
//! Provides:
//! - Entry store with content filtering
//! - Cloze blank extraction from `[[...]]` markup
//! - Answer judging with case, punctuation and inflection folding
//! - Mistake ledger ("wrong words book") with pluggable persistence
//! - Quiz session state machine and keybinding actions

pub mod actions;
pub mod cloze;
pub mod entry;
pub mod error;
pub mod judge;
pub mod ledger;
pub mod normalize;
pub mod prompt;
pub mod session;
pub mod types;

pub use actions::{Action, Keybindings};
pub use cloze::{extract, Blank, BlankTemplate};
pub use entry::{Entry, EntryKey, EntryStore, RawRecord};
pub use error::{DrillError, Result};
pub use judge::{judge, judge_template, judge_with, BlankVerdict, Judgment, Outcome};
pub use ledger::{LedgerStore, MemoryLedgerStore, MistakeLedger, MistakeRecord};
pub use prompt::{Progress, Prompt};
pub use session::{ActionOutcome, Answered, Next, Notice, Phase, QuizSession};
pub use types::{ClozeFallback, ContentFilter, Kind, Order, QuestionMode, Settings, Tolerance};
