//! State/district reference table

use serde::Deserialize;
use thiserror::Error;

/// Bundled state → district document
const BUILTIN_TABLE: &str = include_str!("../../data/state_districts.json");

/// Errors raised while loading a reference table
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("failed to parse reference table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("state {0:?} is listed more than once")]
    DuplicateState(String),
    #[error("state {0:?} has no districts")]
    EmptyState(String),
}

#[derive(Debug, Clone, Deserialize)]
struct StateEntry {
    state: String,
    districts: Vec<String>,
}

/// Read-only mapping from state name to its ordered district list.
///
/// States keep the order of the source document, as do the districts of
/// each state.
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    entries: Vec<StateEntry>,
}

impl ReferenceTable {
    /// Load the table shipped with the binary
    pub fn builtin() -> Result<Self, ReferenceError> {
        Self::from_json(BUILTIN_TABLE)
    }

    /// Parse a table from a JSON array of `{ "state", "districts" }` objects
    pub fn from_json(json: &str) -> Result<Self, ReferenceError> {
        let entries: Vec<StateEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    fn from_entries(entries: Vec<StateEntry>) -> Result<Self, ReferenceError> {
        for (i, entry) in entries.iter().enumerate() {
            if entry.districts.is_empty() {
                return Err(ReferenceError::EmptyState(entry.state.clone()));
            }
            if entries[..i].iter().any(|e| e.state == entry.state) {
                return Err(ReferenceError::DuplicateState(entry.state.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// All state names in table order
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.state.as_str())
    }

    pub fn state_count(&self) -> usize {
        self.entries.len()
    }

    /// Districts of a state, or an empty slice when the state is unknown
    pub fn districts(&self, state: &str) -> &[String] {
        self.entries
            .iter()
            .find(|e| e.state == state)
            .map(|e| e.districts.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains_state(&self, state: &str) -> bool {
        self.entries.iter().any(|e| e.state == state)
    }

    pub fn contains_district(&self, state: &str, district: &str) -> bool {
        self.districts(state).iter().any(|d| d == district)
    }
}
