//! The drill loop: queue building, presentation, judging and ledger updates.
//!
//! ```text
//! Idle -> Presenting -> AwaitingJudgment -> Advancing | Reviewing -> (Presenting) -> AwaitingJudgment ...
//!                                                                 \-> Exhausted
//! ```
//!
//! `submit` and `skip` never advance on their own; the caller asks for the
//! next prompt once it has shown the result. `present_next` passes back
//! through `Presenting` and lands on `AwaitingJudgment` in the same call, so
//! `Presenting` is only observed between `start`/`start_review` and the
//! first prompt of a pass.

use crate::actions::Action;
use crate::cloze::{extract, has_markup, sentences, strip_markup};
use crate::entry::{Entry, EntryKey, EntryStore};
use crate::error::{DrillError, Result};
use crate::judge::{judge_template, judge_with, Judgment, Outcome};
use crate::ledger::MistakeLedger;
use crate::prompt::{Progress, Prompt};
use crate::types::{ClozeFallback, Order, QuestionMode, Settings};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::VecDeque;

/// Where the session is in its loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Presenting,
    AwaitingJudgment,
    /// Last answer judged in a regular pass.
    Advancing,
    /// Last answer judged in a review pass.
    Reviewing,
    Exhausted,
}

/// Something the caller may want to tell the user about. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Left out of a cloze pass because it has no blank markup.
    NoBlanks(EntryKey),
    /// Asked in translate mode because it has no blank markup.
    TranslateFallback(EntryKey),
    /// Blank markup could not be parsed; the sentence was shown whole.
    Malformed { key: EntryKey, error: DrillError },
    /// A ledger key that no loaded entry matches.
    UnknownEntry(DrillError),
}

/// Result of asking for the next prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Next {
    Prompt(Prompt),
    /// The queue is empty. A normal end, not an error.
    Exhausted,
}

/// Result of a judged answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answered {
    pub key: EntryKey,
    /// The answer to show back to the user.
    pub answer: String,
    pub judgment: Judgment,
    /// Whether the entry went back to the head of the queue.
    pub requeued: bool,
}

/// What a dispatched action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Skipped(EntryKey),
    LedgerCleared,
    /// Screen clearing is the presentation layer's business.
    ScreenCleared,
    ReviewStarted { queued: usize },
}

#[derive(Debug, Clone)]
struct Current {
    index: usize,
    prompt: Prompt,
}

/// One drill run over an entry store, owning the mistake ledger.
#[derive(Debug)]
pub struct QuizSession {
    store: EntryStore,
    ledger: MistakeLedger,
    settings: Settings,
    active: Settings,
    queue: VecDeque<usize>,
    current: Option<Current>,
    phase: Phase,
    review: bool,
    rng: StdRng,
    presented: usize,
    total: usize,
    notices: Vec<Notice>,
}

impl QuizSession {
    pub fn new(store: EntryStore, ledger: MistakeLedger) -> Self {
        let settings = Settings::default();
        Self {
            store,
            ledger,
            active: settings.clone(),
            rng: seeded(settings.seed),
            settings,
            queue: VecDeque::new(),
            current: None,
            phase: Phase::Idle,
            review: false,
            presented: 0,
            total: 0,
            notices: Vec::new(),
        }
    }

    /// Begin a regular pass over the store.
    pub fn start(&mut self, settings: Settings) {
        self.rng = seeded(settings.seed);
        self.settings = settings.clone();
        self.active = settings;
        self.review = false;
        self.current = None;
        self.notices.clear();

        let mut queue = Vec::new();
        for index in self.store.filter_indices(self.active.content) {
            let Some(entry) = self.store.get(index) else {
                continue;
            };
            if self.active.mode == QuestionMode::Cloze
                && self.active.cloze_fallback == ClozeFallback::Skip
                && !has_blank_markup(entry)
            {
                self.notices.push(Notice::NoBlanks(entry.key()));
                continue;
            }
            queue.push(index);
        }

        self.load_queue(queue);
        tracing::info!(
            "started {:?} pass with {} entries",
            self.active.mode,
            self.total
        );
    }

    /// Begin a review pass over the ledger's entries.
    ///
    /// Keys that no longer match a loaded entry are skipped and reported as
    /// notices. Returns the number of entries queued. When nothing resolves
    /// the pass in progress is left as it was.
    pub fn start_review(&mut self) -> usize {
        let mut queue = Vec::new();
        for key in self.ledger.snapshot() {
            match self.store.position(&key) {
                Some(index) => queue.push(index),
                None => {
                    tracing::warn!("skipping unknown ledger entry: {}", key);
                    self.notices
                        .push(Notice::UnknownEntry(DrillError::UnknownEntry(key.to_string())));
                }
            }
        }

        if queue.is_empty() {
            tracing::info!("no wrong words to review");
            return 0;
        }

        self.active = self.settings.for_review();
        self.review = true;
        self.current = None;
        self.load_queue(queue);
        tracing::info!("started review with {} entries", self.total);
        self.total
    }

    fn load_queue(&mut self, mut queue: Vec<usize>) {
        if self.active.order == Order::Random {
            queue.shuffle(&mut self.rng);
        }
        self.total = queue.len();
        self.presented = 0;
        self.queue = queue.into();
        self.phase = Phase::Presenting;
    }

    /// Move the head of the queue on screen.
    ///
    /// While an answer is pending the same prompt is returned again.
    pub fn present_next(&mut self) -> Next {
        if let Some(current) = &self.current {
            return Next::Prompt(current.prompt.clone());
        }
        if self.phase == Phase::Idle {
            return Next::Exhausted;
        }
        let Some(index) = self.queue.pop_front() else {
            if self.phase != Phase::Exhausted {
                tracing::info!("queue exhausted after {} entries", self.presented);
            }
            self.phase = Phase::Exhausted;
            return Next::Exhausted;
        };

        self.phase = Phase::Presenting;
        self.presented += 1;
        let progress = Progress {
            current: self.presented,
            total: self.total,
        };
        let prompt = self.build_prompt(index, progress);
        tracing::debug!("presenting {} ({}/{})", prompt.key, progress.current, progress.total);

        self.current = Some(Current {
            index,
            prompt: prompt.clone(),
        });
        self.phase = Phase::AwaitingJudgment;
        Next::Prompt(prompt)
    }

    fn build_prompt(&mut self, index: usize, progress: Progress) -> Prompt {
        let Some(entry) = self.store.get(index) else {
            unreachable!("queue only holds store indices");
        };
        let hint = self.active.hint;
        if self.active.mode == QuestionMode::Translate {
            return Prompt::translate(entry, progress, hint);
        }

        let candidates: Vec<&str> = sentences(&entry.example_raw)
            .into_iter()
            .filter(|sentence| has_markup(sentence))
            .collect();
        if candidates.is_empty() {
            self.notices.push(Notice::TranslateFallback(entry.key()));
            return Prompt::translate(entry, progress, hint);
        }
        let sentence = if candidates.len() == 1 {
            candidates[0]
        } else {
            candidates[self.rng.random_range(0..candidates.len())]
        };

        match extract(sentence) {
            Ok(Some(template)) => Prompt::cloze(entry, template, progress, hint),
            Ok(None) => {
                self.notices.push(Notice::TranslateFallback(entry.key()));
                Prompt::translate(entry, progress, hint)
            }
            Err(error) => {
                tracing::warn!("malformed example for {}: {}", entry.term, error);
                self.notices.push(Notice::Malformed {
                    key: entry.key(),
                    error,
                });
                Prompt::unblanked(entry, &strip_markup(sentence), progress, hint)
            }
        }
    }

    /// Judge `answer` against the entry on screen and update the ledger.
    pub fn submit(&mut self, answer: &str) -> Result<Answered> {
        let current = self.current.take().ok_or(DrillError::NoActiveEntry)?;
        let entry = self.entry_at(current.index);
        let key = entry.key();
        let expected = entry.answer().to_string();
        let tolerance = self.active.tolerance;

        let judgment = match &current.prompt.template {
            Some(template) => judge_template(template, answer, tolerance),
            None => judge_with(&expected, answer, QuestionMode::Translate, tolerance),
        };
        let answer = match &current.prompt.template {
            Some(template) => template.expected_tokens().join(", "),
            None => expected,
        };

        let mut requeued = false;
        match judgment.outcome {
            Outcome::Correct => {
                if self.review {
                    self.ledger.record_correct_in_review(&key);
                }
            }
            Outcome::Partial if self.active.partial_credit => {}
            Outcome::Partial | Outcome::Incorrect => {
                self.ledger.record_miss(key.clone());
                if self.active.retry_on_wrong {
                    self.queue.push_front(current.index);
                    self.presented -= 1;
                    requeued = true;
                }
            }
        }

        self.phase = self.after_turn();
        Ok(Answered {
            key,
            answer,
            judgment,
            requeued,
        })
    }

    /// Drop the entry on screen without judging it. A penalized skip counts as a miss.
    pub fn skip(&mut self, penalize: bool) -> Result<EntryKey> {
        let current = self.current.take().ok_or(DrillError::NoActiveEntry)?;
        let key = self.entry_at(current.index).key();
        if penalize {
            self.ledger.record_miss(key.clone());
        }
        tracing::debug!("skipped {} (penalize: {})", key, penalize);
        self.phase = self.after_turn();
        Ok(key)
    }

    /// Run a bound action.
    pub fn dispatch(&mut self, action: Action) -> Result<ActionOutcome> {
        match action {
            Action::SkipNoPenalty => self.skip(false).map(ActionOutcome::Skipped),
            Action::ClearCache => {
                self.ledger.clear();
                Ok(ActionOutcome::LedgerCleared)
            }
            Action::ClearScreen => Ok(ActionOutcome::ScreenCleared),
            Action::StartReview => {
                let queued = self.start_review();
                Ok(ActionOutcome::ReviewStarted { queued })
            }
        }
    }

    fn after_turn(&self) -> Phase {
        if self.review {
            Phase::Reviewing
        } else {
            Phase::Advancing
        }
    }

    fn entry_at(&self, index: usize) -> &Entry {
        match self.store.get(index) {
            Some(entry) => entry,
            None => unreachable!("queue only holds store indices"),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_review(&self) -> bool {
        self.review
    }

    /// Entries presented so far and the size of the pass.
    pub fn progress(&self) -> (usize, usize) {
        (self.presented, self.total)
    }

    /// Entries still waiting in the queue, excluding the one on screen.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn current_prompt(&self) -> Option<&Prompt> {
        self.current.as_ref().map(|current| &current.prompt)
    }

    /// Settings of the pass in progress (review passes override some).
    pub fn active_settings(&self) -> &Settings {
        &self.active
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn ledger(&self) -> &MistakeLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut MistakeLedger {
        &mut self.ledger
    }

    pub fn wrong_count(&self) -> usize {
        self.ledger.len()
    }

    /// Take the notices gathered since the last call.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

fn seeded(seed: Option<u64>) -> StdRng {
    StdRng::seed_from_u64(seed.unwrap_or_else(rand::random))
}

fn has_blank_markup(entry: &Entry) -> bool {
    sentences(&entry.example_raw)
        .into_iter()
        .any(has_markup)
}
