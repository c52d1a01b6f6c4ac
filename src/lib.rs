//! Numbered bookmarks for project assets.
//!
//! A project keeps ten slots, each optionally bound to an asset GUID, in
//! `Library/UserSelectionSetting.asset`. [`SettingsStore`] reads and writes
//! that file; [`BookmarkManager`] keeps a session's copy and drives the
//! editor through the traits in [`host`].

pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod slots;
pub mod storage;

pub use config::{Config, LoadPolicy, SLOT_COUNT};
pub use error::{ActionError, SlotError, StoreError};
pub use host::Host;
pub use slots::command::{available_commands, HostState, SlotCommand};
pub use slots::manager::{BookmarkManager, Outcome};
pub use slots::registry::Registry;
pub use slots::{Slot, SlotView};
pub use storage::settings_file::{LoadedRegistry, SettingsStore};

/// Open the bookmark session for the project rooted at `project_root`.
pub fn open<H: Host>(project_root: impl AsRef<std::path::Path>, host: H) -> BookmarkManager<H> {
    let config = Config::for_project(project_root);
    BookmarkManager::new(SettingsStore::new(&config), host)
}
