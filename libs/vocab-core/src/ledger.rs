//! The mistake ledger ("wrong words book").

use crate::entry::EntryKey;
use crate::error::{DrillError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

/// A previously missed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MistakeRecord {
    pub key: EntryKey,
    pub first_missed: DateTime<Utc>,
}

/// Load/save pair for persisting the ledger.
///
/// Implementations own encoding and file location and must write
/// all-or-nothing. `load` reports an unreadable payload as
/// [`DrillError::CorruptLedger`].
pub trait LedgerStore {
    fn load(&self) -> Result<Vec<MistakeRecord>>;

    fn save(&self, records: &[MistakeRecord]) -> Result<()>;
}

/// Set of missed entries, keyed by [`EntryKey`].
#[derive(Debug, Clone, Default)]
pub struct MistakeLedger {
    records: BTreeMap<EntryKey, MistakeRecord>,
    dirty: bool,
}

impl MistakeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `store`. A corrupt payload yields an empty ledger plus the
    /// error, so the caller can warn and carry on.
    pub fn open(store: &dyn LedgerStore) -> (Self, Option<DrillError>) {
        let mut ledger = Self::new();
        let result = store.load().and_then(|records| ledger.restore_records(records));
        match result {
            Ok(()) => {
                ledger.dirty = false;
                tracing::info!("loaded {} missed entries", ledger.len());
                (ledger, None)
            }
            Err(err) => {
                tracing::warn!("starting with an empty ledger: {}", err);
                (Self::new(), Some(err))
            }
        }
    }

    /// Write the ledger through `store` and mark it clean.
    pub fn persist(&mut self, store: &dyn LedgerStore) -> Result<()> {
        store.save(&self.records())?;
        self.dirty = false;
        Ok(())
    }

    /// Add `key`. Returns `false` when it was already present.
    pub fn record_miss(&mut self, key: EntryKey) -> bool {
        self.record_miss_at(key, Utc::now())
    }

    pub fn record_miss_at(&mut self, key: EntryKey, now: DateTime<Utc>) -> bool {
        if self.records.contains_key(&key) {
            return false;
        }
        tracing::debug!("recording miss: {}", key);
        self.records.insert(key.clone(), MistakeRecord { key, first_missed: now });
        self.dirty = true;
        true
    }

    /// Remove `key` after a correct review answer. Returns `false` when absent.
    pub fn record_correct_in_review(&mut self, key: &EntryKey) -> bool {
        let removed = self.records.remove(key).is_some();
        if removed {
            tracing::debug!("cleared from ledger: {}", key);
            self.dirty = true;
        }
        removed
    }

    /// Empty the ledger. Confirmation belongs to the caller.
    pub fn clear(&mut self) {
        if !self.records.is_empty() {
            self.dirty = true;
        }
        self.records.clear();
        tracing::info!("mistake ledger cleared");
    }

    pub fn snapshot(&self) -> BTreeSet<EntryKey> {
        self.records.keys().cloned().collect()
    }

    /// Replace the contents with `keys`.
    ///
    /// Fails with [`DrillError::CorruptLedger`] on an empty or duplicated key,
    /// leaving the ledger untouched.
    pub fn restore<I>(&mut self, keys: I) -> Result<()>
    where
        I: IntoIterator<Item = String>,
    {
        let now = Utc::now();
        let records = keys
            .into_iter()
            .map(|key| MistakeRecord {
                key: EntryKey::from(key),
                first_missed: now,
            })
            .collect();
        self.restore_records(records)
    }

    /// Replace the contents with full records. Same validation as [`restore`](Self::restore).
    pub fn restore_records(&mut self, records: Vec<MistakeRecord>) -> Result<()> {
        let mut restored = BTreeMap::new();
        for record in records {
            if record.key.as_str().trim().is_empty() {
                return Err(DrillError::CorruptLedger("empty entry key".to_string()));
            }
            if restored.contains_key(&record.key) {
                return Err(DrillError::CorruptLedger(format!(
                    "duplicate entry key: {}",
                    record.key
                )));
            }
            restored.insert(record.key.clone(), record);
        }
        self.records = restored;
        self.dirty = true;
        Ok(())
    }

    /// Records in key order.
    pub fn records(&self) -> Vec<MistakeRecord> {
        self.records.values().cloned().collect()
    }

    pub fn contains(&self, key: &EntryKey) -> bool {
        self.records.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether anything changed since the last load or persist.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Ledger store kept in memory, for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    records: RefCell<Vec<MistakeRecord>>,
    saves: Cell<usize>,
}

impl MemoryLedgerStore {
    pub fn new(records: Vec<MistakeRecord>) -> Self {
        Self {
            records: RefCell::new(records),
            saves: Cell::new(0),
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn load(&self) -> Result<Vec<MistakeRecord>> {
        Ok(self.records.borrow().clone())
    }

    fn save(&self, records: &[MistakeRecord]) -> Result<()> {
        *self.records.borrow_mut() = records.to_vec();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
