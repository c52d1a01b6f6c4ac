pub mod command;
pub mod manager;
pub mod registry;

use serde::{Deserialize, Serialize};

/// A numbered bookmark, optionally bound to an asset GUID.
/// An empty `guid` means the slot is unbound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub index: usize,
    pub guid: String,
}

impl Slot {
    pub fn empty(index: usize) -> Self {
        Self {
            index,
            guid: String::new(),
        }
    }

    pub fn is_bound(&self) -> bool {
        !self.guid.is_empty()
    }

    pub fn reset(&mut self) {
        self.guid.clear();
    }
}

/// On-disk shape of a slot. The index is signed so that a hand-edited or
/// foreign file with a negative number still parses and is judged by the load policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    pub number: i64,
    #[serde(rename = "GUID", default)]
    pub guid: String,
}

impl From<&Slot> for SlotRecord {
    fn from(slot: &Slot) -> Self {
        Self {
            number: slot.index as i64,
            guid: slot.guid.clone(),
        }
    }
}

/// Extension that marks a scene asset, which can be opened rather than only selected.
pub const SCENE_EXTENSION: &str = "unity";

/// Display row for one slot, with the identifier resolved through the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotView {
    pub index: usize,
    pub guid: String,
    pub path: String,
    pub file_name: String,
    pub label: String,
    pub is_scene: bool,
    pub is_empty: bool,
}

impl SlotView {
    /// `path` is the resolved asset path, or `None` when the GUID no longer resolves.
    pub fn new(slot: &Slot, path: Option<String>) -> Self {
        let path = if slot.is_bound() {
            path.unwrap_or_default()
        } else {
            String::new()
        };
        let file_name = file_name_of(&path).to_string();
        let is_scene = extension_of(&file_name) == Some(SCENE_EXTENSION);
        let label = if file_name.is_empty() {
            format!("[{}]Empty", slot.index)
        } else {
            format!("[{}]{}", slot.index, file_name)
        };

        Self {
            index: slot.index,
            guid: slot.guid.clone(),
            path,
            file_name,
            label,
            is_scene,
            is_empty: !slot.is_bound(),
        }
    }

    /// Bound and pointing at something that still exists.
    pub fn is_resolved(&self) -> bool {
        !self.is_empty && !self.path.is_empty()
    }
}

// Asset paths always use '/', whatever the platform.
fn file_name_of(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or("")
}

fn extension_of(file_name: &str) -> Option<&str> {
    match file_name.rfind('.') {
        Some(0) | None => None,
        Some(dot) => Some(&file_name[dot + 1..]),
    }
}
