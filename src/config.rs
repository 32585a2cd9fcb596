//! Quick-search configuration and its persisted form.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SeekError;
use crate::traits::SettingsStore;

/// Key under which the serialized config lives in a [`SettingsStore`].
pub const CONFIG_KEY: &str = "search_config";

/// Process-wide quick-search settings.
///
/// Changed only through an explicit apply action. Every walk takes its own
/// snapshot at start, so a concurrent apply never splits one traversal
/// across two configurations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Levels below the starting directory to recurse into. `0` scores only
    /// the starting directory's own entries.
    pub quick_depth: u32,

    /// Upper bound on every quick-search result sequence.
    pub max_results: u32,

    /// List dot-files.
    pub include_hidden: bool,

    /// Quiet period after the last keystroke before a quick search fires.
    pub debounce_ms: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            quick_depth:    2,
            max_results:    1000,
            include_hidden: false,
            debounce_ms:    100,
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(u64::from(self.debounce_ms))
    }

    /// Parse a stored config, falling back to the default for every field
    /// that is missing or invalid. Never fails.
    pub fn from_stored(raw: &str) -> Self {
        let defaults = Self::default();

        let object = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                let err = SeekError::ConfigParse("stored config is not an object".into());
                tracing::warn!(error = %err, "using default search config");
                return defaults;
            }
            Err(e) => {
                let err = SeekError::ConfigParse(e.to_string());
                tracing::warn!(error = %err, "using default search config");
                return defaults;
            }
        };

        Self {
            quick_depth:    field(&object, "quick_depth", as_u32).unwrap_or(defaults.quick_depth),
            max_results:    field(&object, "max_results", as_u32).unwrap_or(defaults.max_results),
            include_hidden: field(&object, "include_hidden", Value::as_bool)
                .unwrap_or(defaults.include_hidden),
            debounce_ms:    field(&object, "debounce_ms", as_u32).unwrap_or(defaults.debounce_ms),
        }
    }

    /// Read the config from `store`, or defaults when nothing is stored.
    pub fn load(store: &dyn SettingsStore) -> Self {
        match store.get(CONFIG_KEY) {
            Some(raw) => Self::from_stored(&raw),
            None => Self::default(),
        }
    }

    /// Write the config to `store`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigParse` if serialization fails, or whatever the store
    /// reports for the write.
    pub fn save(&self, store: &dyn SettingsStore) -> Result<(), SeekError> {
        let raw = serde_json::to_string(self).map_err(|e| SeekError::ConfigParse(e.to_string()))?;
        store.set(CONFIG_KEY, &raw)
    }
}

/// Extract one field, logging a warning when it is present but unusable.
fn field<T>(object: &Map<String, Value>, key: &str, extract: impl Fn(&Value) -> Option<T>) -> Option<T> {
    let value = object.get(key)?;
    let parsed = extract(value);
    if parsed.is_none() {
        let err = SeekError::ConfigParse(format!("invalid value for `{key}`: {value}"));
        tracing::warn!(error = %err, "falling back to default");
    }
    parsed
}

fn as_u32(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|n| u32::try_from(n).ok())
}
