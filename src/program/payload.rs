//! Program record loading
//!
//! The program to trace arrives as a JSON record stored under a named slot:
//!
//! ```json
//! { "code": "int x = 1;", "title": "Warm-up", "language": "c",
//!   "levelIndex": 0, "challengeIndex": 2 }
//! ```
//!
//! Loading never fails. A missing slot, an unreadable slot and a blank
//! program each map to their own [`LoadOutcome`] so the front-end can tell
//! the user what happened.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Slot the front-end writes the record to
pub const PAYLOAD_SLOT: &str = "visualizer_payload";

/// What the tracer is constructed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgramRecord {
    pub code: String,
    pub title: String,
    /// Free-form label, displayed only
    pub language: String,
    pub level_index: u32,
    pub challenge_index: u32,
}

impl Default for ProgramRecord {
    fn default() -> Self {
        ProgramRecord {
            code: String::new(),
            title: "Code Visualizer".to_string(),
            language: "unknown".to_string(),
            level_index: 0,
            challenge_index: 0,
        }
    }
}

impl ProgramRecord {
    /// Record for source text that did not come through a slot
    pub fn from_code(
        code: impl Into<String>,
        title: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        ProgramRecord {
            code: code.into(),
            title: title.into(),
            language: language.into(),
            ..Default::default()
        }
    }

    /// Parse a record from its JSON text
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    /// One-line header: `lang: c · Level 1 · Q3`
    pub fn header(&self) -> String {
        format!(
            "lang: {} · Level {} · Q{}",
            self.language,
            self.level_index + 1,
            self.challenge_index + 1
        )
    }
}

/// Why a slot could not be turned into a record
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read slot: {0}")]
    Io(#[from] io::Error),

    #[error("malformed program record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result of looking up the program slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The slot holds nothing
    NothingLoaded,
    /// The slot holds something that is not a readable record
    Unreadable(String),
    /// The record parsed but its code is blank
    Empty(ProgramRecord),
    Ready(ProgramRecord),
}

impl LoadOutcome {
    /// Message shown in place of the current line when nothing can be traced
    pub fn status_message(&self) -> Option<String> {
        match self {
            LoadOutcome::NothingLoaded => Some(
                "No code loaded. Write some code in a challenge and open it in the visualizer."
                    .to_string(),
            ),
            LoadOutcome::Unreadable(reason) => {
                Some(format!("Error reading visualizer data ({}).", reason))
            }
            LoadOutcome::Empty(_) => {
                Some("Your code is empty. Add some code, then visualize again.".to_string())
            }
            LoadOutcome::Ready(_) => None,
        }
    }
}

/// Named persistent storage slots
pub trait SlotStore {
    /// Raw contents of `name`, or `None` when the slot was never written
    fn read_slot(&self, name: &str) -> io::Result<Option<String>>;
}

/// Slots stored as `<dir>/<name>.json`
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirStore { root: root.into() }
    }

    pub fn slot_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.json", name))
    }
}

impl SlotStore for DirStore {
    fn read_slot(&self, name: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.slot_path(name)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// In-memory slots
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: FxHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_slot(&mut self, name: &str, contents: impl Into<String>) {
        self.slots.insert(name.to_string(), contents.into());
    }
}

impl SlotStore for MemoryStore {
    fn read_slot(&self, name: &str) -> io::Result<Option<String>> {
        Ok(self.slots.get(name).cloned())
    }
}

/// Read the program record from [`PAYLOAD_SLOT`]
pub fn load_record(store: &dyn SlotStore) -> LoadOutcome {
    let raw = match store.read_slot(PAYLOAD_SLOT) {
        Ok(Some(raw)) => raw,
        Ok(None) => return LoadOutcome::NothingLoaded,
        Err(e) => return unreadable(LoadError::from(e)),
    };

    if raw.trim().is_empty() {
        return LoadOutcome::NothingLoaded;
    }

    match ProgramRecord::from_json(&raw) {
        Ok(record) if record.code.trim().is_empty() => LoadOutcome::Empty(record),
        Ok(record) => {
            tracing::info!(title = %record.title, language = %record.language, "program record loaded");
            LoadOutcome::Ready(record)
        }
        Err(e) => unreadable(e),
    }
}

fn unreadable(error: LoadError) -> LoadOutcome {
    tracing::warn!(%error, "program record unreadable");
    LoadOutcome::Unreadable(error.to_string())
}
