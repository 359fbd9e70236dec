use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::domain::error::StorageError;
use crate::domain::store::KeyValueStore;

/// File name used inside the configured data directory.
pub const LOCAL_STORAGE_FILE: &str = "local-storage.json";

/// Store persisted as one JSON object on disk.
///
/// The whole file is read once on open. Every mutation rewrites it through a
/// temporary file and a rename, so a crash leaves either the old or the new
/// contents. The in-memory map only changes once the write has landed.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, creating parent directories. A missing file
    /// is an empty store.
    ///
    /// # Errors
    /// I/O failures, or `StorageError::CorruptFile` when the file is not a
    /// JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
        }

        let entries = match fs::read(&path) {
            Ok(raw) if raw.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(raw) => serde_json::from_slice(&raw).map_err(|source| StorageError::CorruptFile {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(io_error(&path, e)),
        };
        debug!(path = %path.display(), keys = entries.len(), "opened local storage");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Open `<dir>/local-storage.json`.
    ///
    /// # Errors
    /// As [`open`](Self::open).
    pub fn in_dir(dir: &Path) -> Result<Self, StorageError> {
        Self::open(dir.join(LOCAL_STORAGE_FILE))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let raw = serde_json::to_vec_pretty(entries).map_err(|source| StorageError::Encode {
            key: "*".to_owned(),
            source,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw).map_err(|source| io_error(&tmp, source))?;
        fs::rename(&tmp, &self.path).map_err(|source| {
            warn!(path = %self.path.display(), error = %source, "failed to replace local storage file");
            io_error(&self.path, source)
        })
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write();
        let mut next = entries.clone();
        next.insert(key.to_owned(), value.to_owned());
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write();
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut entries = self.entries.write();
        self.persist(&BTreeMap::new())?;
        entries.clear();
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::domain::store::ProfileStore;
    use newsly_sdk::UserProfile;
    use std::sync::Arc;

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::in_dir(dir.path()).unwrap();
            store.set("newsly-token", "tok").unwrap();
            store.set("noozers-dark-mode", "true").unwrap();
            store.remove("noozers-dark-mode").unwrap();
        }

        let reopened = FileStore::in_dir(dir.path()).unwrap();
        assert_eq!(reopened.get("newsly-token").unwrap().as_deref(), Some("tok"));
        assert!(reopened.get("noozers-dark-mode").unwrap().is_none());
    }

    #[test]
    fn missing_file_and_parent_are_created_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        let store = FileStore::open(&path).unwrap();
        assert!(store.get("anything").unwrap().is_none());
        assert!(!path.exists());

        store.set("k", "v").unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOCAL_STORAGE_FILE);
        fs::write(&path, "[1, 2").unwrap();
        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, StorageError::CorruptFile { .. }));
    }

    #[test]
    fn clear_empties_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path()).unwrap();
        store.set("a", "1").unwrap();
        store.clear().unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw.trim(), "{}");
    }

    #[test]
    fn failed_write_leaves_memory_and_disk_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path()).unwrap();
        store.set("k", "old").unwrap();
        store.set("other", "kept").unwrap();
        fs::create_dir(dir.path().join("local-storage.json.tmp")).unwrap();

        assert!(matches!(store.set("k", "new"), Err(StorageError::Io { .. })));
        assert!(store.remove("other").is_err());
        assert!(store.clear().is_err());

        assert_eq!(store.get("k").unwrap().as_deref(), Some("old"));
        assert_eq!(store.get("other").unwrap().as_deref(), Some("kept"));
        let on_disk = FileStore::in_dir(dir.path()).unwrap();
        assert_eq!(on_disk.get("k").unwrap().as_deref(), Some("old"));
        assert_eq!(on_disk.get("other").unwrap().as_deref(), Some("kept"));
    }

    #[test]
    fn rejected_profile_save_is_not_visible() {
        let dir = tempfile::tempdir().unwrap();
        let profiles = ProfileStore::new(Arc::new(FileStore::in_dir(dir.path()).unwrap()));
        fs::create_dir(dir.path().join("local-storage.json.tmp")).unwrap();

        let profile = UserProfile {
            name: Some("Ada".to_owned()),
            ..UserProfile::default()
        };
        assert!(profiles.save(&profile).is_err());
        assert!(profiles.load().unwrap().is_none());
    }
}
