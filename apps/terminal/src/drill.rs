//! Line-oriented drill loop: one line in, one judged turn out.

use anyhow::Context;
use std::io::{BufRead, Write};
use vocab_core::{
    Action, ActionOutcome, Answered, Keybindings, LedgerStore, Next, Notice, QuestionMode,
    QuizSession,
};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Totals for one run of the loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub answered: usize,
    pub correct: usize,
    pub skipped: usize,
}

/// Drives a [`QuizSession`] from text input, persisting the ledger after
/// every change.
pub struct Drill<'a> {
    session: QuizSession,
    bindings: Keybindings,
    ledger_store: &'a dyn LedgerStore,
    awaiting: bool,
    summary: Summary,
}

impl<'a> Drill<'a> {
    pub fn new(session: QuizSession, bindings: Keybindings, ledger_store: &'a dyn LedgerStore) -> Self {
        Self {
            session,
            bindings,
            ledger_store,
            awaiting: false,
            summary: Summary::default(),
        }
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// Run until `input` is exhausted.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> anyhow::Result<Summary> {
        self.ask(out)?;
        for line in input.lines() {
            let line = line.context("failed to read input")?;
            self.handle_line(line.trim(), out)?;
            self.persist(out)?;
        }
        out.flush()?;
        Ok(self.summary)
    }

    fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> anyhow::Result<()> {
        if let Some(action) = self.bindings.resolve(line) {
            return self.handle_action(action, out);
        }
        if !self.awaiting || line.is_empty() {
            return Ok(());
        }

        let answered = self.session.submit(line)?;
        self.awaiting = false;
        self.report(&answered, line, out)?;
        if answered.requeued {
            writeln!(out, "  Try again!")?;
        }
        self.ask(out)
    }

    fn handle_action<W: Write>(&mut self, action: Action, out: &mut W) -> anyhow::Result<()> {
        if !self.awaiting && !action.available_when_idle() {
            writeln!(out, "No word on screen.")?;
            return Ok(());
        }

        match self.session.dispatch(action)? {
            ActionOutcome::Skipped(key) => {
                self.awaiting = false;
                self.summary.skipped += 1;
                let answer = self
                    .session
                    .store()
                    .resolve(&key)
                    .map(|entry| entry.answer().to_string())
                    .unwrap_or_default();
                writeln!(out, "  Skipped: {}", answer)?;
                self.ask(out)
            }
            ActionOutcome::LedgerCleared => {
                writeln!(out, "Wrong words cleared.")?;
                Ok(())
            }
            ActionOutcome::ScreenCleared => {
                write!(out, "{}", CLEAR_SCREEN)?;
                if let Some(prompt) = self.session.current_prompt().cloned() {
                    self.show(&prompt, out)?;
                }
                Ok(())
            }
            ActionOutcome::ReviewStarted { queued: 0 } => {
                self.flush_notices(out)?;
                writeln!(out, "No wrong words to review.")?;
                Ok(())
            }
            ActionOutcome::ReviewStarted { queued } => {
                self.awaiting = false;
                writeln!(out, "--- Review: {} words ---", queued)?;
                self.ask(out)
            }
        }
    }

    fn ask<W: Write>(&mut self, out: &mut W) -> anyhow::Result<()> {
        let next = self.session.present_next();
        self.flush_notices(out)?;
        match next {
            Next::Prompt(prompt) => {
                self.awaiting = true;
                self.show(&prompt, out)
            }
            Next::Exhausted => {
                self.awaiting = false;
                writeln!(out, "--- Round complete! ---")?;
                Ok(())
            }
        }
    }

    fn show<W: Write>(&self, prompt: &vocab_core::Prompt, out: &mut W) -> anyhow::Result<()> {
        let label = match prompt.mode {
            QuestionMode::Cloze => "Fill in the blank",
            QuestionMode::Translate => "Type the word",
        };
        writeln!(out, "({}/{}) {}:", prompt.progress.current, prompt.progress.total, label)?;
        for line in prompt.text.lines() {
            writeln!(out, "  {}", line)?;
        }
        Ok(())
    }

    fn report<W: Write>(&mut self, answered: &Answered, typed: &str, out: &mut W) -> anyhow::Result<()> {
        self.summary.answered += 1;
        if answered.judgment.correct {
            self.summary.correct += 1;
            writeln!(out, "  Correct: {}", answered.answer)?;
            return Ok(());
        }

        writeln!(out, "  Wrong!")?;
        writeln!(out, "    You typed: {}", typed)?;
        writeln!(out, "    Answer: {}", answered.answer)?;
        let failed = answered.judgment.failed_blanks();
        if answered.judgment.blanks.len() > 1 && !failed.is_empty() {
            let positions: Vec<String> = failed.iter().map(|i| (i + 1).to_string()).collect();
            writeln!(out, "    Wrong blanks: {}", positions.join(", "))?;
        }
        Ok(())
    }

    fn flush_notices<W: Write>(&mut self, out: &mut W) -> anyhow::Result<()> {
        for notice in self.session.drain_notices() {
            match notice {
                Notice::NoBlanks(key) => tracing::debug!("no blanks in example: {}", key),
                Notice::TranslateFallback(key) => tracing::debug!("asking {} in translate mode", key),
                Notice::Malformed { key, error } => {
                    writeln!(out, "Note: example for {} is malformed ({})", key, error)?
                }
                Notice::UnknownEntry(error) => writeln!(out, "Note: {}", error)?,
            }
        }
        Ok(())
    }

    fn persist<W: Write>(&mut self, out: &mut W) -> anyhow::Result<()> {
        if !self.session.ledger().is_dirty() {
            return Ok(());
        }
        if let Err(e) = self.session.ledger_mut().persist(self.ledger_store) {
            tracing::warn!("failed to save ledger: {}", e);
            writeln!(out, "Warning: {}", e)?;
        }
        Ok(())
    }
}
