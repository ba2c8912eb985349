//! JSON file persistence for the mistake ledger and launcher settings.

use chrono::Utc;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use vocab_core::{DrillError, EntryKey, LedgerStore, MistakeRecord, Settings};

/// One item of a ledger file. Older files hold bare keys or whole entries.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredItem {
    Record(MistakeRecord),
    Key(String),
    Entry { english: String, chinese: String },
}

impl From<StoredItem> for MistakeRecord {
    fn from(item: StoredItem) -> Self {
        match item {
            StoredItem::Record(record) => record,
            StoredItem::Key(key) => MistakeRecord {
                key: EntryKey::from(key),
                first_missed: Utc::now(),
            },
            StoredItem::Entry { english, chinese } => MistakeRecord {
                key: EntryKey::new(&english, &chinese),
                first_missed: Utc::now(),
            },
        }
    }
}

/// Ledger stored as a pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonLedgerStore {
    path: PathBuf,
}

impl JsonLedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unreadable ledger is moved before it can be overwritten.
    pub fn corrupt_path(&self) -> PathBuf {
        let mut path = self.path.as_os_str().to_owned();
        path.push(".corrupt");
        PathBuf::from(path)
    }

    fn quarantine(&self) {
        let target = self.corrupt_path();
        match fs::rename(&self.path, &target) {
            Ok(()) => tracing::warn!("moved unreadable ledger to {}", target.display()),
            Err(e) => tracing::warn!("failed to move unreadable ledger {}: {}", self.path.display(), e),
        }
    }
}

impl LedgerStore for JsonLedgerStore {
    fn load(&self) -> vocab_core::Result<Vec<MistakeRecord>> {
        if !self.path.exists() {
            tracing::info!("no ledger at {}, starting fresh", self.path.display());
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| DrillError::Storage(format!("{}: {}", self.path.display(), e)))?;
        decode_ledger(&content).inspect_err(|_| self.quarantine())
    }

    fn save(&self, records: &[MistakeRecord]) -> vocab_core::Result<()> {
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| DrillError::Storage(e.to_string()))?;
        write_atomic(&self.path, &json)
            .map_err(|e| DrillError::Storage(format!("{}: {}", self.path.display(), e)))?;
        tracing::info!("saved {} missed entries to {}", records.len(), self.path.display());
        Ok(())
    }
}

/// Decode ledger file content. Anything but a JSON array of keys or records
/// is reported as [`DrillError::CorruptLedger`].
pub fn decode_ledger(content: &str) -> vocab_core::Result<Vec<MistakeRecord>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let items: Vec<StoredItem> =
        serde_json::from_str(content).map_err(|e| DrillError::CorruptLedger(e.to_string()))?;
    Ok(items.into_iter().map(MistakeRecord::from).collect())
}

/// Write to a sibling temp file, then rename over the target.
pub fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)
}

/// Read drill settings, falling back to defaults when missing or unreadable.
pub fn load_settings(path: &Path) -> Settings {
    if !path.exists() {
        return Settings::default();
    }
    match fs::read_to_string(path).map(|json| serde_json::from_str::<Settings>(&json)) {
        Ok(Ok(settings)) => settings,
        Ok(Err(e)) => {
            tracing::warn!("invalid settings in {}: {}. Using defaults.", path.display(), e);
            Settings::default()
        }
        Err(e) => {
            tracing::warn!("failed to read {}: {}. Using defaults.", path.display(), e);
            Settings::default()
        }
    }
}

/// Write drill settings.
pub fn save_settings(path: &Path, settings: &Settings) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    write_atomic(path, &json)?;
    Ok(())
}
