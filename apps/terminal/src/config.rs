//! Launcher configuration.

use std::path::PathBuf;

const APP_DIR: &str = "vocab-drill";

/// File locations used by the launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Root holding one directory per book, each with `.csv` units.
    pub data_dir: PathBuf,
    pub ledger_path: PathBuf,
    pub keybindings_path: PathBuf,
    pub settings_path: PathBuf,
}

impl AppConfig {
    /// Resolve from `VOCAB_DATA_DIR`, `VOCAB_LEDGER`, `VOCAB_KEYBINDINGS` and
    /// `VOCAB_SETTINGS`, falling back to `./data` and the platform data dir.
    pub fn from_env() -> Self {
        Self::resolve(|name| std::env::var(name).ok())
    }

    pub fn resolve(var: impl Fn(&str) -> Option<String>) -> Self {
        let app_dir = app_data_dir();
        let path_or = |name: &str, fallback: PathBuf| var(name).map(PathBuf::from).unwrap_or(fallback);

        Self {
            data_dir: path_or("VOCAB_DATA_DIR", PathBuf::from("data")),
            ledger_path: path_or("VOCAB_LEDGER", app_dir.join("wrong_words.json")),
            keybindings_path: path_or("VOCAB_KEYBINDINGS", app_dir.join("keybindings.json")),
            settings_path: path_or("VOCAB_SETTINGS", app_dir.join("settings.json")),
        }
    }
}

fn app_data_dir() -> PathBuf {
    // Use app data directory when available, fallback to current dir
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}
