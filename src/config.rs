use std::path::{Path, PathBuf};

/// Number of bookmark slots a registry holds.
pub const SLOT_COUNT: usize = 10;

/// File name of the per-project settings file.
pub const SETTINGS_FILE_NAME: &str = "UserSelectionSetting.asset";

/// Build-artifact directory, relative to the project root, that holds the settings file.
pub const LIBRARY_DIR_NAME: &str = "Library";

/// What to do with a stored record whose index is outside `[0, capacity)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutOfRangePolicy {
    /// Discard the record and log a warning.
    #[default]
    Drop,
    /// Fail the load.
    Reject,
}

/// What to do when the stored file has more than one record for an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// The first record wins; later ones are discarded with a warning.
    #[default]
    KeepFirst,
    /// Fail the load.
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadPolicy {
    pub out_of_range: OutOfRangePolicy,
    pub duplicates: DuplicatePolicy,
}

impl LoadPolicy {
    /// Treat any out-of-range or duplicate record as a corrupt file.
    pub fn strict() -> Self {
        Self {
            out_of_range: OutOfRangePolicy::Reject,
            duplicates: DuplicatePolicy::Reject,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub settings_path: PathBuf,
    pub capacity: usize,
    pub load_policy: LoadPolicy,
}

impl Config {
    /// Settings live at `<project_root>/Library/UserSelectionSetting.asset`.
    pub fn for_project(project_root: impl AsRef<Path>) -> Self {
        let settings_path = project_root
            .as_ref()
            .join(LIBRARY_DIR_NAME)
            .join(SETTINGS_FILE_NAME);
        Self::with_settings_path(settings_path)
    }

    /// Same as [`Config::for_project`], starting from the project's `Assets` directory.
    /// The project root is its parent; a path without a parent is taken as the root itself.
    pub fn from_assets_dir(assets_dir: impl AsRef<Path>) -> Self {
        let assets_dir = assets_dir.as_ref();
        let root = assets_dir
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(assets_dir);
        Self::for_project(root)
    }

    pub fn with_settings_path(settings_path: impl Into<PathBuf>) -> Self {
        Self {
            settings_path: settings_path.into(),
            capacity: SLOT_COUNT,
            load_policy: LoadPolicy::default(),
        }
    }

    /// Capacity is clamped to at least one slot.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn with_load_policy(mut self, load_policy: LoadPolicy) -> Self {
        self.load_policy = load_policy;
        self
    }
}
