//! # Configuration Store
//!
//! A JSON object persisted in a single file, plus the typed database
//! connection settings stored inside it.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`CATALOG_DB_*`)
//! 2. Config file (`"database"` key)
//! 3. Defaults (this file)
//!
//! ## File Layout
//! ```json
//! {
//!   "database": {
//!     "address": "data/catalog.db",
//!     "username": "sa",
//!     "password": ""
//!   },
//!   "recent_searches": ["widget", "gadget"]
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::connection::{Credentials, DbConfig};

/// Key holding [`ConnectionSettings`].
pub const DATABASE_KEY: &str = "database";

/// Configuration store errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading or writing the file failed.
    #[error("Config I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid JSON, or a value didn't fit its type.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The store path names a directory.
    #[error("Cannot write config to a directory: {}", .0.display())]
    IsDirectory(PathBuf),

    /// The file holds JSON whose top level is not an object.
    #[error("Config root in {} is not a JSON object", .0.display())]
    NotAnObject(PathBuf),

    /// A stored value has the wrong shape for the accessor used.
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl ConfigError {
    fn io(path: &Path, source: io::Error) -> Self {
        ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn read_object(path: &Path) -> Result<Map<String, Value>, ConfigError> {
    if !path.is_file() {
        return Ok(Map::new());
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    match serde_json::from_str::<Value>(&content)? {
        Value::Object(map) => Ok(map),
        _ => Err(ConfigError::NotAnObject(path.to_path_buf())),
    }
}

// =============================================================================
// Store
// =============================================================================

/// JSON configuration backed by a file.
///
/// Changes stay in memory until [`ConfigStore::save`].
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl ConfigStore {
    /// Opens the store at `path`.
    ///
    /// A missing file, or a path naming a directory, starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let values = read_object(&path)?;
        debug!(path = %path.display(), keys = values.len(), "Config loaded");
        Ok(ConfigStore { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the store as pretty-printed JSON.
    pub fn save(&self) -> Result<(), ConfigError> {
        if self.path.is_dir() {
            return Err(ConfigError::IsDirectory(self.path.clone()));
        }

        let content = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, content).map_err(|e| ConfigError::io(&self.path, e))?;
        debug!(path = %self.path.display(), keys = self.values.len(), "Config saved");
        Ok(())
    }

    /// Discards in-memory changes and re-reads the file.
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        self.values = read_object(&self.path)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Removes `key`, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    // =========================================================================
    // String Arrays
    // =========================================================================

    pub fn set_string_array<S: AsRef<str>>(&mut self, key: impl Into<String>, elements: &[S]) {
        let array = elements
            .iter()
            .map(|e| Value::String(e.as_ref().to_string()))
            .collect();
        self.values.insert(key.into(), Value::Array(array));
    }

    /// Reads a string array. A missing key or a non-array value reads as empty.
    ///
    /// ## Returns
    /// * `Err(ConfigError::InvalidValue)` - The array holds a non-string element
    pub fn string_array(&self, key: &str) -> Result<Vec<String>, ConfigError> {
        let Some(Value::Array(array)) = self.values.get(key) else {
            return Ok(Vec::new());
        };

        array
            .iter()
            .map(|element| match element {
                Value::String(s) => Ok(s.clone()),
                other => Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("expected string element, found {other}"),
                }),
            })
            .collect()
    }

    /// Appends to a string array, creating it when the key holds no array.
    pub fn append_to_string_array(&mut self, key: &str, value: impl Into<String>) {
        let value = Value::String(value.into());
        match self.values.get_mut(key) {
            Some(Value::Array(array)) => array.push(value),
            _ => {
                self.values.insert(key.to_string(), Value::Array(vec![value]));
            }
        }
    }

    /// Removes every element equal to `value`. No-op when the key holds no array.
    pub fn remove_from_string_array(&mut self, key: &str, value: &str) {
        if let Some(Value::Array(array)) = self.values.get_mut(key) {
            array.retain(|element| element.as_str() != Some(value));
        }
    }
}

// =============================================================================
// Connection Settings
// =============================================================================

/// Database connection triple kept under the `"database"` key.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConnectionSettings {
    pub address: String,
    pub username: String,
    pub password: String,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        ConnectionSettings {
            address: "catalog.db".to_string(),
            username: String::new(),
            password: String::new(),
        }
    }
}

impl std::fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("address", &self.address)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl ConnectionSettings {
    /// Reads the settings from `store`, falling back to defaults when absent.
    pub fn load(store: &ConfigStore) -> Result<Self, ConfigError> {
        match store.get(DATABASE_KEY) {
            Some(value) => Ok(serde_json::from_value(value.clone())?),
            None => Ok(ConnectionSettings::default()),
        }
    }

    /// Writes the settings into `store`. Call [`ConfigStore::save`] to persist.
    pub fn store(&self, store: &mut ConfigStore) -> Result<(), ConfigError> {
        store.set(DATABASE_KEY, serde_json::to_value(self)?);
        Ok(())
    }

    /// Overrides fields from the environment.
    ///
    /// ## Environment Variables
    /// - `CATALOG_DB_ADDRESS`: Database address
    /// - `CATALOG_DB_USERNAME`: Username
    /// - `CATALOG_DB_PASSWORD`: Password
    pub fn apply_env(self) -> Self {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    fn apply_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(address) = lookup("CATALOG_DB_ADDRESS") {
            self.address = address;
        }
        if let Some(username) = lookup("CATALOG_DB_USERNAME") {
            self.username = username;
        }
        if let Some(password) = lookup("CATALOG_DB_PASSWORD") {
            self.password = password;
        }
        self
    }

    pub fn into_config(self) -> DbConfig {
        DbConfig::new(self.address, Credentials::new(self.username, self.password))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
