//! JSON persistence for state values.
//!
//! The canonical on-disk form is a single pretty-printed JSON document at a
//! fixed filename under the per-user data directory (or an explicit override
//! directory). Missing or malformed files degrade to the in-memory default;
//! nothing here is treated as fatal by the store.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{PersistError, PersistResult};

/// File name of the persisted state document.
pub const STATE_FILE_NAME: &str = "lodestone-state.json";

/// Directory component under the platform data directory.
const APP_DIR_NAME: &str = "lodestone";

/// Encode a state value as pretty-printed JSON.
pub fn to_json<S: Serialize>(state: &S) -> PersistResult<String> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// Decode a state value from JSON text.
pub fn from_json<S: DeserializeOwned>(json: &str) -> PersistResult<S> {
    Ok(serde_json::from_str(json)?)
}

/// Resolve the state file path, preferring an explicit directory override.
pub(crate) fn state_file_path(dir_override: Option<&Path>) -> PersistResult<PathBuf> {
    match dir_override {
        Some(dir) => Ok(dir.join(STATE_FILE_NAME)),
        None => dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(STATE_FILE_NAME))
            .ok_or(PersistError::NoDataDir),
    }
}

/// Write `json` to `path`, creating parent directories as needed.
/// Overwrites an existing file.
pub(crate) fn write_state_file(path: &Path, json: &str) -> PersistResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PersistError::io(parent, e))?;
    }
    fs::write(path, json).map_err(|e| PersistError::io(path, e))
}

/// Read the state file. `Ok(None)` when it does not exist.
pub(crate) fn read_state_file(path: &Path) -> PersistResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(PersistError::io(path, e)),
    }
}

/// Delete the state file. `Ok(false)` when there was nothing to delete.
pub(crate) fn remove_state_file(path: &Path) -> PersistResult<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(PersistError::io(path, e)),
    }
}
