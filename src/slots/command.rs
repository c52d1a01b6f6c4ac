use serde::{Deserialize, Serialize};

use super::SlotView;

/// Something the user can do with one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlotCommand {
    /// Bind the slot to the host's current selection.
    Bind { index: usize },
    /// Open the bookmarked scene.
    OpenScene { index: usize },
    /// Make the bookmarked asset the host's selection.
    Jump { index: usize },
    Clear { index: usize },
}

impl SlotCommand {
    pub fn index(&self) -> usize {
        match *self {
            SlotCommand::Bind { index }
            | SlotCommand::OpenScene { index }
            | SlotCommand::Jump { index }
            | SlotCommand::Clear { index } => index,
        }
    }
}

/// Host state that decides which commands are on offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostState {
    pub has_selection: bool,
    pub is_playing: bool,
}

/// Commands available for `view`, in display order.
pub fn available_commands(view: &SlotView, host: HostState) -> Vec<SlotCommand> {
    let index = view.index;

    if view.is_empty {
        return if host.has_selection {
            vec![SlotCommand::Bind { index }]
        } else {
            Vec::new()
        };
    }

    let mut commands = Vec::with_capacity(3);
    if view.is_scene && !host.is_playing {
        commands.push(SlotCommand::OpenScene { index });
    }
    if view.is_resolved() {
        commands.push(SlotCommand::Jump { index });
    }
    commands.push(SlotCommand::Clear { index });
    commands
}
