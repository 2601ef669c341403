//! # Credential Storage
//!
//! The session token is an opaque string owned by whoever performs login and
//! logout. The gateway only reads it. Storage is a capability passed into the
//! gateway, so tests can hand it an in-memory store while the CLI uses a JSON
//! file that survives between runs.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

/// Key under which the token is persisted.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Errors raised while persisting or clearing the token.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Reading or writing the backing file failed.
    #[error("I/O error occurred: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a JSON object.
    #[error("Credential file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read/write access to the session token.
pub trait CredentialStore: Send + Sync {
    /// Current token, or `None` when logged out.
    fn get(&self) -> Option<String>;
    /// Replaces the stored token.
    fn set(&self, token: &str) -> Result<(), CredentialError>;
    /// Removes the stored token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), CredentialError>;
}

/// Process-local store; nothing is written to disk.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set(&self, token: &str) -> Result<(), CredentialError> {
        *self.token.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        *self.token.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }
}

/// Token persisted as the `auth_token` key of a JSON object on disk.
///
/// Other keys in the file are preserved on write. The file is re-read on
/// every `get`, so a login performed by another process is picked up.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    write_lock: RwLock<()>,
}

impl FileCredentialStore {
    /// Creates a store backed by `path`. The file does not need to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: RwLock::new(()),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>, CredentialError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(Map::new()),
            Ok(contents) => match serde_json::from_str::<Value>(&contents)? {
                Value::Object(map) => Ok(map),
                _ => Ok(Map::new()),
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, map: &Map<String, Value>) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Option<String> {
        let _guard = self.write_lock.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        match self.load() {
            Ok(map) => map
                .get(AUTH_TOKEN_KEY)
                .and_then(Value::as_str)
                .map(str::to_string),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read credential file");
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<(), CredentialError> {
        let _guard = self.write_lock.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut map = self.load()?;
        map.insert(AUTH_TOKEN_KEY.to_string(), Value::String(token.to_string()));
        self.store(&map)
    }

    fn clear(&self) -> Result<(), CredentialError> {
        let _guard = self.write_lock.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut map = self.load()?;
        if map.remove(AUTH_TOKEN_KEY).is_none() {
            return Ok(());
        }
        self.store(&map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn memory_store_lifecycle() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.get(), None);

        store.set("t").unwrap();
        assert_eq!(store.get().as_deref(), Some("t"));

        store.clear().unwrap();
        assert_eq!(store.get(), None);
        store.clear().unwrap();
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("credentials.json");

        FileCredentialStore::new(&path).set("secret-token").unwrap();

        let reopened = FileCredentialStore::new(&path);
        assert_eq!(reopened.get().as_deref(), Some("secret-token"));

        reopened.clear().unwrap();
        assert_eq!(FileCredentialStore::new(&path).get(), None);
    }

    #[test]
    fn file_store_keeps_unrelated_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, r#"{"theme":"dark"}"#).unwrap();

        let store = FileCredentialStore::new(&path);
        store.set("abc").unwrap();
        store.clear().unwrap();

        let saved: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved, serde_json::json!({"theme": "dark"}));
    }

    #[test]
    fn missing_or_corrupt_file_reads_as_logged_out() {
        let dir = tempdir().unwrap();
        let missing = FileCredentialStore::new(dir.path().join("absent.json"));
        assert_eq!(missing.get(), None);
        missing.clear().unwrap();

        let corrupt_path = dir.path().join("corrupt.json");
        fs::write(&corrupt_path, "{not json").unwrap();
        let corrupt = FileCredentialStore::new(&corrupt_path);
        assert_eq!(corrupt.get(), None);
        assert!(matches!(corrupt.set("x"), Err(CredentialError::Json(_))));
    }
}
