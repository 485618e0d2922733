//! Privacy notice gate
//!
//! Shown on load until acknowledged once. The acknowledgement is a single
//! boolean flag kept in client storage.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::types::{AppError, AppResult};

pub const PRIVACY_FLAG: &str = "avisoPrivacidadAceptado";

/// Key/value flags that survive page reloads.
pub trait ClientStorage {
    fn get_flag(&self, key: &str) -> bool;
    fn set_flag(&mut self, key: &str, value: bool) -> AppResult<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    flags: HashMap<String, bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientStorage for MemoryStorage {
    fn get_flag(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    fn set_flag(&mut self, key: &str, value: bool) -> AppResult<()> {
        self.flags.insert(key.to_string(), value);
        Ok(())
    }
}

/// Flags stored as a JSON object on disk, rewritten on every change.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
    flags: BTreeMap<String, bool>,
}

impl JsonFileStorage {
    /// Open the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let flags = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Client storage is corrupt, starting empty");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, flags }
    }

    /// `<data dir>/edubot/client_storage.json`, falling back to the working directory.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("edubot")
            .join("client_storage.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ClientStorage for JsonFileStorage {
    fn get_flag(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    fn set_flag(&mut self, key: &str, value: bool) -> AppResult<()> {
        self.flags.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Internal(e.to_string()))?;
        }
        let content = serde_json::to_string_pretty(&self.flags)?;
        std::fs::write(&self.path, content).map_err(|e| AppError::Internal(e.to_string()))?;
        debug!(path = %self.path.display(), key, value, "Client flag saved");
        Ok(())
    }
}

#[derive(Debug)]
pub struct PrivacyNotice<S: ClientStorage> {
    storage: S,
    visible: bool,
    checked: bool,
}

impl<S: ClientStorage> PrivacyNotice<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            visible: false,
            checked: false,
        }
    }

    /// Page load: show the notice unless it was acknowledged before.
    pub fn on_load(&mut self) -> bool {
        self.visible = !self.storage.get_flag(PRIVACY_FLAG);
        self.checked = false;
        self.visible
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub fn confirm_enabled(&self) -> bool {
        self.visible && self.checked
    }

    /// Confirm click. Ignored (returns `false`) while the control is disabled.
    pub fn confirm(&mut self) -> AppResult<bool> {
        if !self.confirm_enabled() {
            return Ok(false);
        }
        self.storage.set_flag(PRIVACY_FLAG, true)?;
        self.visible = false;
        Ok(true)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}
