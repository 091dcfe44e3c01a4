//! Settings Store: option id → enabled, persisted as one flat JSON object.
//!
//! No locking: two processes saving at once race and the last write wins.

use crate::error::SettingsError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub type Settings = BTreeMap<String, bool>;

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    read_only: bool,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            read_only: false,
        }
    }

    /// A store that loads normally but never writes or deletes (dry runs).
    pub fn read_only(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            read_only: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// An absent file is an empty map; an unreadable or corrupt one is an error.
    pub fn load(&self) -> Result<Settings, SettingsError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Settings::new()),
            Err(e) => {
                return Err(SettingsError::Read {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        let value: Value = serde_json::from_str(&content).map_err(|e| SettingsError::Json {
            path: self.path.clone(),
            source: e,
        })?;
        bool_entries(&value).ok_or_else(|| SettingsError::NotAnObject {
            path: self.path.clone(),
        })
    }

    /// `load`, with failures logged and replaced by an empty map.
    pub fn load_or_empty(&self) -> Settings {
        self.load().unwrap_or_else(|e| {
            log::warn!("Falling back to empty settings: {}", e);
            Settings::new()
        })
    }

    /// Overwrites the whole file.
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if self.read_only {
            log::info!(
                "dry-run: would save {} settings to {}",
                settings.len(),
                self.path.display()
            );
            return Ok(());
        }
        let write_err = |e: std::io::Error| SettingsError::Write {
            path: self.path.clone(),
            source: e,
        };
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir).map_err(write_err)?;
            }
        }
        let content = serde_json::to_string_pretty(settings).map_err(|e| SettingsError::Json {
            path: self.path.clone(),
            source: e,
        })?;
        std::fs::write(&self.path, content).map_err(write_err)?;
        log::debug!("Saved {} settings to {}", settings.len(), self.path.display());
        Ok(())
    }

    /// Removes the file. Succeeds if it is already gone.
    pub fn clear(&self) -> Result<(), SettingsError> {
        if self.read_only {
            log::info!("dry-run: would delete {}", self.path.display());
            return Ok(());
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SettingsError::Write {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}

/// Keeps the boolean entries of a JSON object; other keys are ignored.
fn bool_entries(value: &Value) -> Option<Settings> {
    let obj = value.as_object()?;
    Some(
        obj.iter()
            .filter_map(|(k, v)| v.as_bool().map(|b| (k.clone(), b)))
            .collect(),
    )
}

/// File name for an export made on `date`.
pub fn export_file_name(date: chrono::NaiveDate) -> String {
    format!("pc-tuner-settings-{}.json", date.format("%Y-%m-%d"))
}

/// Writes `value` verbatim into `dir` under a date-stamped name.
pub fn export_settings(value: &Value, dir: &Path) -> Result<PathBuf, SettingsError> {
    let path = dir.join(export_file_name(chrono::Local::now().date_naive()));
    let content = serde_json::to_string_pretty(value).map_err(|e| SettingsError::Json {
        path: path.clone(),
        source: e,
    })?;
    std::fs::write(&path, content).map_err(|e| SettingsError::Write {
        path: path.clone(),
        source: e,
    })?;
    log::info!("Exported settings to {}", path.display());
    Ok(path)
}

/// Reads an exported file back into a settings map.
pub fn import_settings(path: &Path) -> Result<Settings, SettingsError> {
    if !path.exists() {
        return Err(SettingsError::Read {
            path: path.to_path_buf(),
            source: std::io::Error::new(ErrorKind::NotFound, "file not found"),
        });
    }
    SettingsStore::new(path).load()
}
