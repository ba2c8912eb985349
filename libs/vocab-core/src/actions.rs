//! Named user actions and the keybinding table that maps input to them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// The fixed set of commands a user can bind input strings to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "action_skip_no_penalty")]
    SkipNoPenalty,
    #[serde(rename = "action_clear_cache")]
    ClearCache,
    #[serde(rename = "action_clear_screen")]
    ClearScreen,
    #[serde(rename = "action_start_review")]
    StartReview,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Self::SkipNoPenalty,
        Self::ClearCache,
        Self::ClearScreen,
        Self::StartReview,
    ];

    /// Get the action name as written in a keybindings file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SkipNoPenalty => "action_skip_no_penalty",
            Self::ClearCache => "action_clear_cache",
            Self::ClearScreen => "action_clear_screen",
            Self::StartReview => "action_start_review",
        }
    }

    /// Parse from string.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == name)
    }

    /// Whether the action makes sense while no drill is running.
    pub fn available_when_idle(&self) -> bool {
        !matches!(self, Self::SkipNoPenalty)
    }
}

/// Lookup table from user input to action, built once from a name mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybindings {
    table: HashMap<String, Action>,
}

impl Default for Keybindings {
    fn default() -> Self {
        let table = Self::default_mapping()
            .into_iter()
            .filter_map(|(input, name)| Action::from_name(&name).map(|action| (input, action)))
            .collect();
        Self { table }
    }
}

impl Keybindings {
    /// The bindings written out when no keybindings file exists yet.
    pub fn default_mapping() -> BTreeMap<String, String> {
        [
            ("a", Action::SkipNoPenalty),
            ("/skip", Action::SkipNoPenalty),
            ("/clc", Action::ClearCache),
            ("/clear", Action::ClearScreen),
            ("/review", Action::StartReview),
        ]
        .into_iter()
        .map(|(input, action)| (input.to_string(), action.as_str().to_string()))
        .collect()
    }

    /// Build from an input -> action-name mapping. Unknown action names are
    /// returned instead of bound.
    pub fn from_mapping<I>(mapping: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut table = HashMap::new();
        let mut unknown = Vec::new();
        for (input, name) in mapping {
            match Action::from_name(&name) {
                Some(action) => {
                    table.insert(input, action);
                }
                None => {
                    tracing::warn!("unknown action {:?} bound to {:?}", name, input);
                    unknown.push(name);
                }
            }
        }
        (Self { table }, unknown)
    }

    /// Resolve trimmed user input to an action, if it is bound.
    pub fn resolve(&self, input: &str) -> Option<Action> {
        self.table.get(input.trim()).copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
