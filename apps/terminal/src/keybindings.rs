//! The user-editable keybindings file.

use crate::storage::write_atomic;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use vocab_core::Keybindings;

/// Load bindings from `path`, writing the defaults there first if the file
/// does not exist. An unreadable file falls back to the defaults.
pub fn load_or_create(path: &Path) -> Keybindings {
    if !path.exists() {
        let defaults = Keybindings::default_mapping();
        match serde_json::to_string_pretty(&defaults) {
            Ok(json) => {
                if let Err(e) = write_atomic(path, &json) {
                    tracing::warn!("could not create {}: {}", path.display(), e);
                }
            }
            Err(e) => tracing::warn!("could not encode default keybindings: {}", e),
        }
        return Keybindings::default();
    }

    let mapping = fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| {
            serde_json::from_str::<BTreeMap<String, String>>(&json).map_err(|e| e.to_string())
        });
    match mapping {
        Ok(mapping) => {
            let (bindings, unknown) = Keybindings::from_mapping(mapping);
            if !unknown.is_empty() {
                tracing::warn!("ignored {} unknown actions in {}", unknown.len(), path.display());
            }
            bindings
        }
        Err(e) => {
            tracing::warn!("failed to load {}: {}. Using defaults.", path.display(), e);
            Keybindings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocab_core::Action;

    #[test]
    fn creates_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keybindings.json");
        let bindings = load_or_create(&path);
        assert_eq!(bindings, Keybindings::default());
        let written: BTreeMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.get("/clc").map(String::as_str), Some("action_clear_cache"));
    }

    #[test]
    fn reads_custom_bindings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keybindings.json");
        fs::write(&path, r#"{"?": "action_start_review", "!": "action_nope"}"#).unwrap();
        let bindings = load_or_create(&path);
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings.resolve("?"), Some(Action::StartReview));
        assert_eq!(bindings.resolve("a"), None);
    }

    #[test]
    fn broken_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keybindings.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(load_or_create(&path), Keybindings::default());
    }
}
