//! Narrow interfaces to the editor that hosts the bookmarks.
//!
//! The registry only ever stores opaque GUIDs; turning them into paths or
//! selectable objects, and reporting what is selected, is the host's job.

/// Maps a GUID to something a user can read or select.
pub trait AssetResolver {
    /// Handle the host can make the active selection.
    type Handle;

    /// Project-relative path of the asset, or `None` if the GUID no longer resolves.
    fn resolve_path(&self, guid: &str) -> Option<String>;

    fn resolve_handle(&self, guid: &str) -> Option<Self::Handle>;
}

/// The host's current selection.
pub trait SelectionContext: AssetResolver {
    /// GUID of the selected asset, or `None` when nothing is selected.
    fn current_selection(&self) -> Option<String>;

    fn set_selection(&mut self, handle: Self::Handle);
}

pub trait SceneOpener {
    /// Scenes can't be switched while the game is running.
    fn is_playing(&self) -> bool;

    /// Open the scene at `path`. The host may first ask the user to save a
    /// modified scene; returns `false` if the user backed out.
    fn open_scene(&mut self, path: &str) -> bool;
}

/// Transient, best-effort message to the user.
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// Everything the bookmark manager needs from its host.
pub trait Host: SelectionContext + SceneOpener + Notifier {}

impl<T: SelectionContext + SceneOpener + Notifier> Host for T {}
