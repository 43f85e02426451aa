//! Persistent key-value storage
//!
//! Thin wrappers over a directory of one-JSON-file-per-key entries, following
//! the XDG Base Directory specification for the default location
//! (`~/.local/share/valtree/`). The API degrades instead of erroring: reads
//! return `None` on missing or unreadable entries, writes and deletions log a
//! warning and carry on. Callers that need hard failures should not use this
//! layer.
//!
//! Writes are atomic: the entry is written to a temp file in the same
//! directory and renamed into place, so a crash never leaves a half-written
//! entry behind.
//!
//! # Example
//!
//! ```no_run
//! use valtree::storage::Storage;
//!
//! let store = Storage::open_default().expect("no usable data directory");
//! store.set("volume", &0.8_f64);
//! let volume: Option<f64> = store.get("volume");
//! ```

use directories::ProjectDirs;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::core::error::Result;

/// A directory-backed key-value store with degrade-don't-fail semantics.
#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    /// Opens the store in the XDG data directory, creating it if needed.
    /// Returns `None` when no home directory can be determined or the
    /// directory cannot be created.
    pub fn open_default() -> Option<Self> {
        let dir = ProjectDirs::from("com", "valtree", "valtree")
            .map(|pd| pd.data_dir().to_path_buf())?;
        if let Err(err) = fs::create_dir_all(&dir) {
            tracing::warn!("storage: cannot create {}: {err}", dir.display());
            return None;
        }
        Some(Self { dir })
    }

    /// Opens the store over an explicit directory (tests point this at a
    /// temporary directory).
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Reads and parses the entry for `key`; `None` on missing entry or
    /// parse failure. A corrupt entry is logged, not surfaced.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.entry_path(key);
        let text = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!("storage: unreadable entry {}: {err}", path.display());
                None
            }
        }
    }

    /// Serializes `value` and writes it atomically under `key`. Failures are
    /// logged and swallowed.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(err) = self.try_set(key, value) {
            tracing::warn!("storage: failed to write entry `{key}`: {err}");
        }
    }

    fn try_set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        fs::create_dir_all(&self.dir)?;

        // Temp file in the target directory so the rename stays on one
        // filesystem and is atomic.
        let mut temp = tempfile::NamedTempFile::new_in(&self.dir)?;
        temp.write_all(json.as_bytes())?;
        temp.persist(self.entry_path(key)).map_err(|e| e.error)?;
        Ok(())
    }

    /// Deletes the entry for `key`. Missing entries are a no-op; other
    /// failures are logged and swallowed.
    pub fn remove(&self, key: &str) {
        let path = self.entry_path(key);
        if let Err(err) = fs::remove_file(&path)
            && err.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!("storage: failed to remove {}: {err}", path.display());
        }
    }

    /// Deletes every entry in the store, leaving the directory in place.
    pub fn clear(&self) {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("storage: cannot list {}: {err}", self.dir.display());
                }
                return;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json")
                && let Err(err) = fs::remove_file(&path)
            {
                tracing::warn!("storage: failed to remove {}: {err}", path.display());
            }
        }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

/// Reduces a key to a safe filename stem.
///
/// Only ASCII alphanumerics, `-`, `_`, and `.` survive, capped at 64 bytes;
/// path separators and anything exotic are stripped so a key can never
/// escape the store directory. A key with nothing left maps to `"_"`.
pub fn sanitize_key(key: &str) -> String {
    let safe: String = key
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .take(64)
        .collect();
    if safe.is_empty() {
        "_".to_string()
    } else {
        safe
    }
}
