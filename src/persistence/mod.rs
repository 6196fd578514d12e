//! JSON persistence for settings, high scores and profiles
//!
//! Features:
//! - Plain JSON files under a per-user data directory
//! - Atomic writes (tmp file, then rename over the target)
//! - Missing or corrupt files degrade to defaults with a warning

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

const APP_DIR: &str = "fruit-basket";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid json in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Default data directory: `$XDG_DATA_HOME/fruit-basket`, else
/// `~/.local/share/fruit-basket`, else `./fruit-basket`.
pub fn default_data_dir() -> PathBuf {
    let base = match std::env::var("XDG_DATA_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => std::env::var("HOME")
            .map(|h| PathBuf::from(h).join(".local").join("share"))
            .unwrap_or_else(|_| PathBuf::from(".")),
    };
    base.join(APP_DIR)
}

/// Read and parse a JSON file
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, PersistError> {
    let bytes = fs::read(path).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| PersistError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `value` as pretty JSON, creating parent directories
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistError> {
    let io_err = |source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_vec_pretty(value).map_err(|source| PersistError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    log::debug!("Saved {}", path.display());
    Ok(())
}

/// Load `path`, falling back to `T::default()` when it is missing or unreadable
pub fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match load_json(path) {
        Ok(value) => {
            log::info!("Loaded {}", path.display());
            value
        }
        Err(PersistError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            log::info!("No {} yet, using defaults", path.display());
            T::default()
        }
        Err(err) => {
            log::warn!("{}; using defaults", err);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");
        let mut value = BTreeMap::new();
        value.insert("apple".to_string(), 10u64);

        save_json(&path, &value).unwrap();
        let loaded: BTreeMap<String, u64> = load_json(&path).unwrap();
        assert_eq!(loaded, value);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_json::<Vec<u32>>(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, PersistError::Io { .. }));
        let fallback: Vec<u32> = load_or_default(&dir.path().join("nope.json"));
        assert!(fallback.is_empty());
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_json::<Vec<u32>>(&path), Err(PersistError::Json { .. })));
        let fallback: Vec<u32> = load_or_default(&path);
        assert!(fallback.is_empty());
    }
}
