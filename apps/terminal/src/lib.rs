pub mod config;
pub mod drill;
pub mod keybindings;
pub mod loader;
pub mod storage;

use anyhow::Context;
use std::io::{self, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vocab_core::{EntryStore, MistakeLedger, QuizSession};

use crate::config::AppConfig;
use crate::drill::Drill;
use crate::loader::DataLoader;
use crate::storage::{load_settings, save_settings, JsonLedgerStore};

/// Launcher entry point: `vocab-drill [book [unit.csv ...]]`.
///
/// Without a book, lists what is available. Without units, drills every
/// unit of the book.
pub fn run() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = AppConfig::from_env();
    let loader = DataLoader::new(&config.data_dir);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut args = std::env::args().skip(1);
    let Some(book) = args.next() else {
        return list_books(&loader, &mut out);
    };
    let mut units: Vec<String> = args.collect();
    if units.is_empty() {
        units = loader.units(&book)?;
    }

    let records = loader
        .load(&book, &units)
        .with_context(|| format!("failed to load book {}", book))?;
    let (store, rejected) = EntryStore::load(records);
    if !rejected.is_empty() {
        writeln!(out, "Skipped {} invalid rows.", rejected.len())?;
    }
    if store.is_empty() {
        writeln!(out, "No words found in {}.", book)?;
        return Ok(());
    }

    let ledger_store = JsonLedgerStore::new(&config.ledger_path);
    let (ledger, warning) = MistakeLedger::open(&ledger_store);
    if let Some(warning) = warning {
        writeln!(out, "Warning: {}. Starting with an empty wrong words book.", warning)?;
    }

    if !config.settings_path.exists() {
        if let Err(e) = save_settings(&config.settings_path, &Default::default()) {
            tracing::warn!("could not write default settings: {}", e);
        }
    }
    let settings = load_settings(&config.settings_path);
    let bindings = keybindings::load_or_create(&config.keybindings_path);

    let mut session = QuizSession::new(store, ledger);
    session.start(settings);
    tracing::info!("drilling {} with {} units", book, units.len());

    let mut drill = Drill::new(session, bindings, &ledger_store);
    let summary = drill.run(io::stdin().lock(), &mut out)?;
    writeln!(
        out,
        "Answered {}, correct {}, skipped {}. Wrong words: {}.",
        summary.answered,
        summary.correct,
        summary.skipped,
        drill.session().wrong_count()
    )?;
    Ok(())
}

fn list_books<W: Write>(loader: &DataLoader, out: &mut W) -> anyhow::Result<()> {
    let books = loader.books()?;
    if books.is_empty() {
        writeln!(out, "No books found.")?;
        return Ok(());
    }
    for book in books {
        writeln!(out, "{}", book)?;
        for unit in loader.units(&book)? {
            writeln!(out, "  {}", unit)?;
        }
    }
    Ok(())
}
