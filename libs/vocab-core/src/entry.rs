//! Vocabulary entries and the read-only store a session draws from.

use crate::error::{DrillError, Result};
use crate::types::{ContentFilter, Kind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A record as handed over by the data loader, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    pub english: String,
    pub chinese: String,
    #[serde(default)]
    pub examples: String,
    /// Explicit classification. When absent it is derived from `english`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Kind>,
}

/// Stable identifier of an entry across runs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryKey(String);

impl EntryKey {
    const SEPARATOR: &'static str = " | ";

    pub fn new(term: &str, translation: &str) -> Self {
        Self(format!("{}{}{}", term, Self::SEPARATOR, translation))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for EntryKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One vocabulary unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub term: String,
    pub translation: String,
    pub example_raw: String,
    pub kind: Kind,
}

impl Entry {
    pub fn new(term: &str, translation: &str, example_raw: &str, kind: Option<Kind>) -> Result<Self> {
        let term = sanitize(term);
        let translation = sanitize(translation);
        if term.is_empty() {
            return Err(DrillError::InvalidEntry("empty term".to_string()));
        }
        if translation.is_empty() {
            return Err(DrillError::InvalidEntry(format!("empty translation for {:?}", term)));
        }

        Ok(Self {
            kind: kind.unwrap_or_else(|| Kind::classify(&term)),
            example_raw: sanitize(example_raw),
            term,
            translation,
        })
    }

    pub fn key(&self) -> EntryKey {
        EntryKey::new(&self.term, &self.translation)
    }

    /// The answer expected in translate mode: the term up to its first comma.
    pub fn answer(&self) -> &str {
        self.term.split(',').next().unwrap_or(&self.term).trim()
    }
}

/// Strip zero-width spaces, turn non-breaking spaces into plain ones, trim.
pub fn sanitize(text: &str) -> String {
    text.replace('\u{200b}', "")
        .replace('\u{a0}', " ")
        .trim()
        .to_string()
}

/// Immutable collection of the entries loaded for a session.
#[derive(Debug, Clone, Default)]
pub struct EntryStore {
    entries: Vec<Entry>,
    by_key: HashMap<EntryKey, usize>,
}

impl EntryStore {
    /// Build a store from loader records, keeping load order.
    ///
    /// Records that violate the entry invariants are left out and returned
    /// alongside the store.
    pub fn load<I>(records: I) -> (Self, Vec<DrillError>)
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let mut rejected = Vec::new();
        let entries = records
            .into_iter()
            .filter_map(|record| {
                match Entry::new(&record.english, &record.chinese, &record.examples, record.kind) {
                    Ok(entry) => Some(entry),
                    Err(err) => {
                        tracing::warn!("skipping record: {}", err);
                        rejected.push(err);
                        None
                    }
                }
            })
            .collect();

        (Self::from_entries(entries), rejected)
    }

    pub fn from_entries(entries: Vec<Entry>) -> Self {
        let mut by_key = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            // First occurrence wins for duplicate keys.
            by_key.entry(entry.key()).or_insert(idx);
        }
        Self { entries, by_key }
    }

    /// Entries matching `content`, in load order.
    pub fn filter(&self, content: ContentFilter) -> Vec<&Entry> {
        self.entries
            .iter()
            .filter(|entry| content.accepts(entry.kind))
            .collect()
    }

    /// Indices of entries matching `content`, in load order.
    pub(crate) fn filter_indices(&self, content: ContentFilter) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| content.accepts(entry.kind))
            .map(|(idx, _)| idx)
            .collect()
    }

    pub(crate) fn position(&self, key: &EntryKey) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    pub fn resolve(&self, key: &EntryKey) -> Option<&Entry> {
        self.position(key).map(|idx| &self.entries[idx])
    }

    pub fn get(&self, idx: usize) -> Option<&Entry> {
        self.entries.get(idx)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(english: &str, chinese: &str, examples: &str) -> RawRecord {
        RawRecord {
            english: english.to_string(),
            chinese: chinese.to_string(),
            examples: examples.to_string(),
            kind: None,
        }
    }

    #[test]
    fn load_keeps_order_and_classifies() {
        let (store, rejected) = EntryStore::load(vec![
            record("apple", "苹果", ""),
            record("give up", "放弃", ""),
            record("run", "跑", ""),
        ]);
        assert!(rejected.is_empty());
        let terms: Vec<_> = store.filter(ContentFilter::All).iter().map(|e| e.term.as_str()).collect();
        assert_eq!(terms, vec!["apple", "give up", "run"]);
        assert_eq!(store.filter(ContentFilter::Phrase).len(), 1);
        assert_eq!(store.filter(ContentFilter::Word).len(), 2);
    }

    #[test]
    fn explicit_kind_wins() {
        let mut raw = record("ice-cream", "冰淇淋", "");
        raw.kind = Some(Kind::Phrase);
        let (store, _) = EntryStore::load(vec![raw]);
        assert_eq!(store.filter(ContentFilter::Phrase).len(), 1);
    }

    #[test]
    fn load_rejects_empty_fields() {
        let (store, rejected) = EntryStore::load(vec![
            record("", "空", ""),
            record("lonely", "\u{200b} ", ""),
            record("ok", "好", ""),
        ]);
        assert_eq!(store.len(), 1);
        assert_eq!(rejected.len(), 2);
        assert!(matches!(rejected[0], DrillError::InvalidEntry(_)));
    }

    #[test]
    fn sanitize_strips_invisible_characters() {
        assert_eq!(sanitize("\u{200b}hello\u{a0}world "), "hello world");
    }

    #[test]
    fn answer_drops_text_after_comma() {
        let entry = Entry::new("evolve, evolution", "演变", "", None).unwrap();
        assert_eq!(entry.answer(), "evolve");
    }

    #[test]
    fn resolve_by_key() {
        let (store, _) = EntryStore::load(vec![record("apple", "苹果", "")]);
        let key = EntryKey::new("apple", "苹果");
        assert_eq!(store.resolve(&key).map(|e| e.term.as_str()), Some("apple"));
        assert!(store.resolve(&EntryKey::new("pear", "梨")).is_none());
    }
}
