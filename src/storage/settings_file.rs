use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::config::{Config, LoadPolicy};
use crate::error::StoreError;
use crate::slots::registry::Registry;
use crate::slots::SlotRecord;

const UTF8_BOM: char = '\u{feff}';

/// Result of a lenient load.
#[derive(Debug)]
pub struct LoadedRegistry {
    pub registry: Registry,
    /// If `Some`, the settings file exists but couldn't be loaded, and
    /// saving `registry` will overwrite it.
    pub load_error: Option<StoreError>,
}

/// The settings file holding every slot of one project.
///
/// The per-slot operations each load the whole file, act, and save the
/// whole file again; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    capacity: usize,
    policy: LoadPolicy,
}

impl SettingsStore {
    pub fn new(config: &Config) -> Self {
        Self {
            path: config.settings_path.clone(),
            capacity: config.capacity,
            policy: config.load_policy,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the registry. A missing file gives a registry of unbound slots.
    pub fn load(&self) -> Result<Registry, StoreError> {
        if !self.exists() {
            debug!("No settings at {}, starting empty", self.path.display());
            return Ok(Registry::new(self.capacity));
        }

        let text = std::fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        let text = text.strip_prefix(UTF8_BOM).unwrap_or(&text);

        let records: Vec<SlotRecord> =
            serde_json::from_str(text).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;

        let registry = Registry::from_records(records, self.capacity, self.policy).map_err(
            |source| StoreError::Invalid {
                path: self.path.clone(),
                source,
            },
        )?;

        debug!(
            "Loaded {} bound slot(s) from {}",
            registry.bound_count(),
            self.path.display()
        );
        Ok(registry)
    }

    /// Like [`SettingsStore::load`], but an unreadable file yields an empty
    /// registry together with the error instead of failing.
    pub fn load_or_default(&self) -> LoadedRegistry {
        match self.load() {
            Ok(registry) => LoadedRegistry {
                registry,
                load_error: None,
            },
            Err(e) => {
                warn!("Falling back to empty bookmarks: {}", e);
                LoadedRegistry {
                    registry: Registry::new(self.capacity),
                    load_error: Some(e),
                }
            }
        }
    }

    /// Write every slot, overwriting the file. Output is UTF-8 without a BOM.
    pub fn save(&self, registry: &Registry) -> Result<(), StoreError> {
        let text =
            serde_json::to_string_pretty(&registry.to_records()).map_err(StoreError::Encode)?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        std::fs::write(&self.path, text).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        debug!("Saved {} slot(s) to {}", registry.capacity(), self.path.display());
        Ok(())
    }

    /// Bind `index` to `guid` and save.
    pub fn set(&self, index: usize, guid: &str) -> Result<(), StoreError> {
        let mut registry = self.load()?;
        registry.set(index, guid).map_err(|source| StoreError::Invalid {
            path: self.path.clone(),
            source,
        })?;
        self.save(&registry)?;
        info!("Slot {} bound to {}", index, guid);
        Ok(())
    }

    /// Unbind `index` and save.
    pub fn clear(&self, index: usize) -> Result<(), StoreError> {
        let mut registry = self.load()?;
        registry.clear(index).map_err(|source| StoreError::Invalid {
            path: self.path.clone(),
            source,
        })?;
        self.save(&registry)?;
        info!("Slot {} cleared", index);
        Ok(())
    }

    /// The GUID bound to `index`, or `""`.
    pub fn get(&self, index: usize) -> Result<String, StoreError> {
        Ok(self.load()?.get(index).to_string())
    }

    pub fn is_bound(&self, index: usize) -> Result<bool, StoreError> {
        Ok(self.load()?.is_bound(index))
    }
}
