use std::path::PathBuf;

use thiserror::Error;

/// A slot index or stored record that does not fit the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("slot {index} is out of range (registry holds {capacity} slots)")]
    OutOfRange { index: i64, capacity: usize },

    #[error("slot {index} appears more than once")]
    Duplicate { index: usize },
}

/// Failures reading or writing the settings file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid slot data in {path}: {source}")]
    Invalid { path: PathBuf, source: SlotError },

    #[error("failed to encode slots: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl StoreError {
    /// True for errors raised while loading, false for errors raised while saving.
    pub fn is_read_error(&self) -> bool {
        matches!(
            self,
            StoreError::Read { .. } | StoreError::Parse { .. } | StoreError::Invalid { .. }
        )
    }
}

/// Failures of a slot command executed through the manager.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("nothing is selected")]
    MissingSelection,

    #[error(transparent)]
    Slot(#[from] SlotError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
