use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::foundation::error::{WishlyError, WishlyResult};

/// Durable string slots addressed by key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> WishlyResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> WishlyResult<()>;
    fn remove(&mut self, key: &str) -> WishlyResult<()>;
}

/// Volatile store, for tests and ephemeral sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> WishlyResult<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> WishlyResult<()> {
        self.slots.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> WishlyResult<()> {
        self.slots.remove(key);
        Ok(())
    }
}

/// One JSON file per key under a directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> WishlyResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            WishlyError::storage(format!("create store dir '{}': {e}", dir.display()))
        })?;
        Ok(Self { dir })
    }

    /// Platform data directory for the app, e.g. `~/.local/share/wishly` on Linux.
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wishly")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> WishlyResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(WishlyError::validation(format!("invalid store key \"{key}\"")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> WishlyResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(WishlyError::storage(format!(
                "read '{}': {e}",
                path.display()
            ))),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> WishlyResult<()> {
        let path = self.path_for(key)?;
        // Atomic replace through a sibling temp file.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)
            .map_err(|e| WishlyError::storage(format!("write '{}': {e}", tmp.display())))?;
        std::fs::rename(&tmp, &path)
            .map_err(|e| WishlyError::storage(format!("rename to '{}': {e}", path.display())))?;
        tracing::debug!(key, bytes = value.len(), "store slot written");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> WishlyResult<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(WishlyError::storage(format!(
                "remove '{}': {e}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/persist/store.rs"]
mod tests;
