//! Durable storage for the user's explicit theme choice.
//!
//! A [`PreferenceStore`] is a tiny key-value collaborator: the controller reads
//! the preference once at mount and writes it on every toggle.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::theme::{ParseModeError, Preference};

/// Error raised by a [`PreferenceStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("preference store I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("preference file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("preference file {path} does not hold a JSON object")]
    NotAnObject { path: PathBuf },
    #[error("stored value for '{key}' is invalid: {source}")]
    InvalidValue {
        key: String,
        #[source]
        source: ParseModeError,
    },
    #[error("could not determine the user configuration directory")]
    NoConfigDir,
}

/// Key-value storage for persisted preferences.
pub trait PreferenceStore {
    /// Reads the value stored under `key`, `None` if nothing was stored.
    fn load(&self, key: &str) -> Result<Option<Preference>, StoreError>;

    /// Stores `value` under `key`.
    fn save(&mut self, key: &str, value: Preference) -> Result<(), StoreError>;
}

/// Reads `key`, defaulting to [`Preference::Unset`] when nothing usable is stored.
///
/// Read failures are logged and treated as unset.
pub fn load_or_unset(store: &dyn PreferenceStore, key: &str) -> Preference {
    match store.load(key) {
        Ok(Some(preference)) => preference,
        Ok(None) => Preference::Unset,
        Err(e) => {
            warn!("Failed to read theme preference '{key}': {e}. Treating it as unset.");
            Preference::Unset
        }
    }
}

/// In-memory store.
///
/// Clones share the same entries, so a caller can keep a clone to inspect
/// what the controller wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, Preference>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with `key` already set.
    pub fn with(key: &str, value: Preference) -> Self {
        let store = Self::new();
        store.entries.borrow_mut().insert(key.to_string(), value);
        store
    }

    pub fn get(&self, key: &str) -> Option<Preference> {
        self.entries.borrow().get(key).copied()
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Preference>, StoreError> {
        Ok(self.get(key))
    }

    fn save(&mut self, key: &str, value: Preference) -> Result<(), StoreError> {
        self.entries.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}

/// JSON file store.
///
/// The file holds one JSON object; the preference is stored as `"light"`,
/// `"dark"` or `"unset"` under its key. Other keys, whatever their value
/// type, are preserved on save.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Opens the store at the default location for `app`.
    pub fn for_app(app: &str) -> Result<Self, StoreError> {
        Self::default_path(app).map(Self::new)
    }

    /// `<config dir>/<app>/preferences.json`.
    pub fn default_path(app: &str) -> Result<PathBuf, StoreError> {
        let config_dir = dirs::config_dir().ok_or(StoreError::NoConfigDir)?;
        Ok(config_dir.join(app).join("preferences.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Map<String, Value>, StoreError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => return Err(self.io_error(source)),
        };
        let document: Value =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })?;
        match document {
            Value::Object(entries) => Ok(entries),
            _ => Err(StoreError::NotAnObject {
                path: self.path.clone(),
            }),
        }
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl PreferenceStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<Preference>, StoreError> {
        debug!("Loading theme preference from: {}", self.path.display());
        let entries = self.read_entries()?;
        entries
            .get(key)
            .map(|value| {
                let parsed = match value {
                    Value::String(text) => text.parse(),
                    other => other.to_string().parse(),
                };
                parsed.map_err(|source| StoreError::InvalidValue {
                    key: key.to_string(),
                    source,
                })
            })
            .transpose()
    }

    fn save(&mut self, key: &str, value: Preference) -> Result<(), StoreError> {
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(StoreError::Json { .. } | StoreError::NotAnObject { .. }) => {
                warn!(
                    "Preference file {} is corrupt, rewriting it",
                    self.path.display()
                );
                Map::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_string(), Value::String(value.to_string()));

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let file = fs::File::create(&self.path).map_err(|e| self.io_error(e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &entries).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        writer.flush().map_err(|e| self.io_error(e))?;

        debug!("Saved theme preference '{key}' = {value}");
        Ok(())
    }
}
