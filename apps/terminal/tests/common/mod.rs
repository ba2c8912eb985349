//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext with a temporary data directory and ledger file
//! - Helpers for running a scripted drill

pub mod fixtures;

use std::path::PathBuf;

use tempfile::TempDir;
use vocab_core::{EntryStore, MistakeLedger, QuizSession, Settings};
use vocab_drill::drill::{Drill, Summary};
use vocab_drill::loader::DataLoader;
use vocab_drill::storage::JsonLedgerStore;
use vocab_core::Keybindings;

/// Temporary books directory plus a ledger file location.
pub struct TestContext {
    pub dir: TempDir,
    pub ledger_store: JsonLedgerStore,
}

impl TestContext {
    /// Create a context with one book holding the given units.
    pub fn new(book: &str, units: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let book_dir = dir.path().join("data").join(book);
        std::fs::create_dir_all(&book_dir).expect("book dir");
        for (name, content) in units {
            std::fs::write(book_dir.join(name), content).expect("unit file");
        }
        let ledger_store = JsonLedgerStore::new(dir.path().join("state").join("wrong_words.json"));
        Self { dir, ledger_store }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn loader(&self) -> DataLoader {
        DataLoader::new(self.data_dir())
    }

    /// Load a book, open the ledger and start a session.
    pub fn session(&self, book: &str, settings: Settings) -> QuizSession {
        let loader = self.loader();
        let units = loader.units(book).expect("units");
        let records = loader.load(book, &units).expect("records");
        let (store, _) = EntryStore::load(records);
        let (ledger, _) = MistakeLedger::open(&self.ledger_store);
        let mut session = QuizSession::new(store, ledger);
        session.start(settings);
        session
    }

    /// Feed `script` lines to a drill and return its output and totals.
    pub fn drill(&self, session: QuizSession, script: &[&str]) -> (String, Summary, usize) {
        let input = script.join("\n");
        let mut out = Vec::new();
        let mut drill = Drill::new(session, Keybindings::default(), &self.ledger_store);
        let summary = drill.run(input.as_bytes(), &mut out).expect("drill run");
        let wrong = drill.session().wrong_count();
        (String::from_utf8(out).expect("utf8 output"), summary, wrong)
    }
}
