use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use serde_json::{Map, Value};

use crate::error::SeekError;
use crate::traits::SettingsStore;

/// In-process settings, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SeekError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Settings kept as a flat JSON object of strings in one file.
///
/// The file and its parent directories are created on first write. A missing
/// file reads as empty. A file that exists but is not a JSON object reads as
/// empty too, and is never overwritten: `set` fails instead.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, SeekError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(SeekError::Store(format!("failed to read settings file: {e}"))),
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(SeekError::Store(format!(
                "{} is not a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(SeekError::Store(format!(
                "{} is not valid JSON: {e}",
                self.path.display()
            ))),
        }
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable settings file");
                return None;
            }
        };
        match map.remove(key)? {
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SeekError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        // An unparseable file is left untouched.
        let mut map = self.read_map()?;
        map.insert(key.to_owned(), Value::String(value.to_owned()));

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SeekError::Store(format!("failed to create settings directory: {e}")))?;
        }

        let raw = serde_json::to_string_pretty(&Value::Object(map))
            .map_err(|e| SeekError::Store(format!("failed to serialize settings: {e}")))?;

        fs::write(&self.path, raw)
            .map_err(|e| SeekError::Store(format!("failed to write settings file: {e}")))
    }
}
