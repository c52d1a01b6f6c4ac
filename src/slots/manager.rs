use log::{info, warn};

use super::command::{available_commands, HostState, SlotCommand};
use super::registry::Registry;
use super::SlotView;
use crate::error::{ActionError, SlotError, StoreError};
use crate::host::Host;
use crate::storage::settings_file::SettingsStore;

/// What happened when a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The bookmarked GUID no longer resolves to an asset.
    Unresolved,
    /// The host refused, or the user backed out.
    Declined,
}

/// One bookmark session: the store, the host, and a cached copy of the
/// registry that is loaded on first use and reused until [`reload`](Self::reload).
pub struct BookmarkManager<H: Host> {
    store: SettingsStore,
    host: H,
    registry: Option<Registry>,
    load_error: Option<StoreError>,
    notification: Option<String>,
}

impl<H: Host> BookmarkManager<H> {
    pub fn new(store: SettingsStore, host: H) -> Self {
        Self {
            store,
            host,
            registry: None,
            load_error: None,
            notification: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    /// The cached registry, loading it first if needed. An unreadable
    /// settings file gives an empty registry; see [`take_load_error`](Self::take_load_error).
    pub fn registry(&mut self) -> &Registry {
        self.registry_mut()
    }

    fn registry_mut(&mut self) -> &mut Registry {
        let store = &self.store;
        let load_error = &mut self.load_error;
        self.registry.get_or_insert_with(|| {
            let loaded = store.load_or_default();
            if let Some(e) = loaded.load_error {
                warn!("Bookmarks could not be loaded and will be reset on next save: {}", e);
                *load_error = Some(e);
            }
            loaded.registry
        })
    }

    /// Error from the last load, if the settings file couldn't be read.
    pub fn take_load_error(&mut self) -> Option<StoreError> {
        self.load_error.take()
    }

    /// Forget the cached registry; the next access reads the file again.
    pub fn reload(&mut self) {
        self.registry = None;
    }

    pub fn host_state(&self) -> HostState {
        HostState {
            has_selection: self.host.current_selection().is_some(),
            is_playing: self.host.is_playing(),
        }
    }

    pub fn view(&mut self, index: usize) -> Option<SlotView> {
        let slot = self.registry().slot(index)?.clone();
        let path = if slot.is_bound() {
            self.host.resolve_path(&slot.guid)
        } else {
            None
        };
        Some(SlotView::new(&slot, path))
    }

    /// One display row per slot, in index order.
    pub fn rows(&mut self) -> Vec<SlotView> {
        let slots = self.registry().slots().to_vec();
        slots
            .iter()
            .map(|slot| {
                let path = if slot.is_bound() {
                    self.host.resolve_path(&slot.guid)
                } else {
                    None
                };
                SlotView::new(slot, path)
            })
            .collect()
    }

    /// Commands currently on offer for `index`; empty for a slot that doesn't exist.
    pub fn commands(&mut self, index: usize) -> Vec<SlotCommand> {
        let state = self.host_state();
        self.view(index)
            .map(|view| available_commands(&view, state))
            .unwrap_or_default()
    }

    pub fn execute(&mut self, command: SlotCommand) -> Result<Outcome, ActionError> {
        match command {
            SlotCommand::Bind { index } => self.bind_selection(index),
            SlotCommand::Clear { index } => self.clear(index),
            SlotCommand::Jump { index } => self.jump(index),
            SlotCommand::OpenScene { index } => self.open_scene(index),
        }
    }

    /// Reload from disk, then make the asset in slot `index` the host's selection.
    pub fn select(&mut self, index: usize) -> Result<Outcome, ActionError> {
        self.reload();
        self.jump(index)
    }

    /// Reload from disk, then bind slot `index` to the host's selection.
    pub fn save_selection(&mut self, index: usize) -> Result<Outcome, ActionError> {
        self.reload();
        self.bind_selection(index)
    }

    fn bind_selection(&mut self, index: usize) -> Result<Outcome, ActionError> {
        let guid = self
            .host
            .current_selection()
            .filter(|g| !g.is_empty())
            .ok_or(ActionError::MissingSelection)?;

        self.registry_mut().set(index, guid.as_str())?;
        self.save()?;
        info!("Slot {} bound to {}", index, guid);
        Ok(Outcome::Done)
    }

    fn clear(&mut self, index: usize) -> Result<Outcome, ActionError> {
        self.registry_mut().clear(index)?;
        self.save()?;
        info!("Slot {} cleared", index);
        Ok(Outcome::Done)
    }

    fn jump(&mut self, index: usize) -> Result<Outcome, ActionError> {
        let Some(view) = self.bound_view(index)? else {
            return Ok(Outcome::Unresolved);
        };
        let Some(handle) = self.host.resolve_handle(&view.guid) else {
            warn!("Slot {}: {} no longer resolves", index, view.guid);
            return Ok(Outcome::Unresolved);
        };

        self.host.set_selection(handle);
        self.queue_notification(format!("JUMP:{}", view.file_name));
        Ok(Outcome::Done)
    }

    fn open_scene(&mut self, index: usize) -> Result<Outcome, ActionError> {
        let Some(view) = self.bound_view(index)? else {
            return Ok(Outcome::Unresolved);
        };
        if !view.is_scene || self.host.is_playing() {
            return Ok(Outcome::Declined);
        }
        if !self.host.open_scene(&view.path) {
            info!("Opening {} was cancelled", view.path);
            return Ok(Outcome::Declined);
        }

        self.queue_notification(format!("Open:{}", view.file_name));
        Ok(Outcome::Done)
    }

    /// View of a bound slot; `None` if the slot is unbound or its GUID doesn't resolve.
    fn bound_view(&mut self, index: usize) -> Result<Option<SlotView>, SlotError> {
        let capacity = self.registry().capacity();
        let view = self.view(index).ok_or(SlotError::OutOfRange {
            index: index as i64,
            capacity,
        })?;
        Ok(view.is_resolved().then_some(view))
    }

    fn save(&mut self) -> Result<(), StoreError> {
        let registry = self.registry_mut().clone();
        self.store.save(&registry)
    }

    fn queue_notification(&mut self, message: String) {
        self.notification = Some(message);
    }

    /// The pending notification, without delivering it.
    pub fn take_notification(&mut self) -> Option<String> {
        self.notification.take()
    }

    /// Deliver the pending notification, if any, through the host.
    pub fn flush_notification(&mut self) -> bool {
        match self.notification.take() {
            Some(message) => {
                self.host.notify(&message);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::config::Config;
    use crate::host::{AssetResolver, Notifier, SceneOpener, SelectionContext};

    #[derive(Default)]
    struct FakeEditor {
        assets: HashMap<String, String>,
        selected: Option<String>,
        playing: bool,
        refuse_open: bool,
        opened: Vec<String>,
        notices: Vec<String>,
    }

    impl FakeEditor {
        fn with_asset(mut self, guid: &str, path: &str) -> Self {
            self.assets.insert(guid.to_string(), path.to_string());
            self
        }
    }

    impl AssetResolver for FakeEditor {
        type Handle = String;

        fn resolve_path(&self, guid: &str) -> Option<String> {
            self.assets.get(guid).cloned()
        }

        fn resolve_handle(&self, guid: &str) -> Option<String> {
            self.assets.contains_key(guid).then(|| guid.to_string())
        }
    }

    impl SelectionContext for FakeEditor {
        fn current_selection(&self) -> Option<String> {
            self.selected.clone()
        }

        fn set_selection(&mut self, handle: String) {
            self.selected = Some(handle);
        }
    }

    impl SceneOpener for FakeEditor {
        fn is_playing(&self) -> bool {
            self.playing
        }

        fn open_scene(&mut self, path: &str) -> bool {
            if self.refuse_open {
                return false;
            }
            self.opened.push(path.to_string());
            true
        }
    }

    impl Notifier for FakeEditor {
        fn notify(&mut self, message: &str) {
            self.notices.push(message.to_string());
        }
    }

    const PREFAB: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const SCENE: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    fn editor() -> FakeEditor {
        FakeEditor::default()
            .with_asset(PREFAB, "Assets/Prefabs/Enemy.prefab")
            .with_asset(SCENE, "Assets/Scenes/Level1.unity")
    }

    fn manager(dir: &tempfile::TempDir, host: FakeEditor) -> BookmarkManager<FakeEditor> {
        let store = SettingsStore::new(&Config::for_project(dir.path()));
        BookmarkManager::new(store, host)
    }

    #[test]
    fn test_rows_for_fresh_project() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager(&dir, editor());

        let rows = manager.rows();
        assert_eq!(rows.len(), 10);
        assert!(rows.iter().all(|r| r.is_empty));
        assert_eq!(rows[0].label, "[0]Empty");
        assert!(manager.take_load_error().is_none());
    }

    #[test]
    fn test_bind_selection_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut host = editor();
        host.selected = Some(PREFAB.to_string());
        let mut manager = manager(&dir, host);

        assert_eq!(manager.commands(2), vec![SlotCommand::Bind { index: 2 }]);
        let outcome = manager.execute(SlotCommand::Bind { index: 2 }).unwrap();
        assert_eq!(outcome, Outcome::Done);
        assert_eq!(manager.rows()[2].label, "[2]Enemy.prefab");

        assert_eq!(manager.store().get(2).unwrap(), PREFAB);
    }

    #[test]
    fn test_bind_without_selection_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager(&dir, editor());

        assert!(manager.commands(0).is_empty());
        let err = manager.execute(SlotCommand::Bind { index: 0 }).unwrap_err();
        assert!(matches!(err, ActionError::MissingSelection));
        assert!(!manager.store().exists());
    }

    #[test]
    fn test_bind_out_of_range_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut host = editor();
        host.selected = Some(PREFAB.to_string());
        let mut manager = manager(&dir, host);

        let err = manager.save_selection(10).unwrap_err();
        assert!(matches!(err, ActionError::Slot(SlotError::OutOfRange { .. })));
        assert!(manager.commands(10).is_empty());
    }

    #[test]
    fn test_jump_selects_and_notifies() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager(&dir, editor());
        manager.store().set(5, PREFAB).unwrap();

        let outcome = manager.execute(SlotCommand::Jump { index: 5 }).unwrap();
        assert_eq!(outcome, Outcome::Done);
        assert_eq!(manager.host().selected.as_deref(), Some(PREFAB));

        assert!(manager.flush_notification());
        assert!(!manager.flush_notification());
        assert_eq!(manager.host().notices, vec!["JUMP:Enemy.prefab"]);
    }

    #[test]
    fn test_jump_to_deleted_asset_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager(&dir, editor());
        manager.store().set(1, "ffffffffffffffffffffffffffffffff").unwrap();

        let rows = manager.rows();
        assert_eq!(rows[1].label, "[1]Empty");
        assert_eq!(manager.commands(1), vec![SlotCommand::Clear { index: 1 }]);

        let outcome = manager.execute(SlotCommand::Jump { index: 1 }).unwrap();
        assert_eq!(outcome, Outcome::Unresolved);
        assert!(manager.host().selected.is_none());
        assert!(manager.take_notification().is_none());
    }

    #[test]
    fn test_open_scene() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager(&dir, editor());
        manager.store().set(0, SCENE).unwrap();

        assert_eq!(
            manager.commands(0),
            vec![
                SlotCommand::OpenScene { index: 0 },
                SlotCommand::Jump { index: 0 },
                SlotCommand::Clear { index: 0 },
            ]
        );
        let outcome = manager.execute(SlotCommand::OpenScene { index: 0 }).unwrap();
        assert_eq!(outcome, Outcome::Done);
        assert_eq!(manager.host().opened, vec!["Assets/Scenes/Level1.unity"]);
        assert_eq!(
            manager.take_notification().as_deref(),
            Some("Open:Level1.unity")
        );
    }

    #[test]
    fn test_open_scene_declined() {
        let dir = tempfile::tempdir().unwrap();
        let mut host = editor();
        host.refuse_open = true;
        let mut manager = manager(&dir, host);
        manager.store().set(0, SCENE).unwrap();
        manager.store().set(1, PREFAB).unwrap();

        let outcome = manager.execute(SlotCommand::OpenScene { index: 0 }).unwrap();
        assert_eq!(outcome, Outcome::Declined);

        manager.host_mut().refuse_open = false;
        manager.host_mut().playing = true;
        let outcome = manager.execute(SlotCommand::OpenScene { index: 0 }).unwrap();
        assert_eq!(outcome, Outcome::Declined);

        let outcome = manager.execute(SlotCommand::OpenScene { index: 1 }).unwrap();
        assert_eq!(outcome, Outcome::Declined);
        assert!(manager.host().opened.is_empty());
        assert!(manager.take_notification().is_none());
    }

    #[test]
    fn test_clear_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager(&dir, editor());
        manager.store().set(4, PREFAB).unwrap();

        manager.execute(SlotCommand::Clear { index: 4 }).unwrap();
        assert!(manager.rows()[4].is_empty);
        assert_eq!(manager.store().get(4).unwrap(), "");
    }

    #[test]
    fn test_cache_reused_until_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager(&dir, editor());
        assert!(!manager.registry().is_bound(3));

        // Written behind the manager's back.
        manager.store().set(3, PREFAB).unwrap();
        assert!(!manager.registry().is_bound(3));

        manager.reload();
        assert!(manager.registry().is_bound(3));

        manager.store().clear(3).unwrap();
        manager.select(3).unwrap();
        assert!(manager.host().selected.is_none());
    }

    #[test]
    fn test_corrupt_settings_fall_back_and_get_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let mut host = editor();
        host.selected = Some(SCENE.to_string());
        let mut manager = manager(&dir, host);
        std::fs::create_dir_all(dir.path().join("Library")).unwrap();
        std::fs::write(manager.store().path(), "{ broken").unwrap();

        assert_eq!(manager.registry().bound_count(), 0);
        let err = manager.take_load_error().unwrap();
        assert!(err.is_read_error());

        manager.execute(SlotCommand::Bind { index: 9 }).unwrap();
        assert_eq!(manager.store().get(9).unwrap(), SCENE);
    }

    #[test]
    fn test_latest_notification_wins() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager(&dir, editor());
        manager.store().set(0, SCENE).unwrap();
        manager.store().set(1, PREFAB).unwrap();

        manager.execute(SlotCommand::Jump { index: 0 }).unwrap();
        manager.execute(SlotCommand::Jump { index: 1 }).unwrap();
        manager.flush_notification();
        assert_eq!(manager.host().notices, vec!["JUMP:Enemy.prefab"]);
    }
}
