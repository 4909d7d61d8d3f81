//! Keyed text stores backing the persistence gateway.

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::PathBuf,
};

use crate::StorageError;

/// Durable mapping from string keys to text blobs.
pub trait StateStore {
    /// Reads the blob stored under `key`, if any.
    ///
    /// Content that is not valid text is reported as
    /// [`StorageError::Malformed`].
    fn read(&self, key: &'static str) -> Result<Option<String>, StorageError>;

    /// Replaces the blob stored under `key`.
    fn write(&mut self, key: &'static str, value: &str) -> Result<(), StorageError>;

    /// Deletes the blob stored under `key`. Missing keys are not an error.
    fn remove(&mut self, key: &'static str) -> Result<(), StorageError>;
}

/// Store that keeps blobs in memory for the lifetime of the value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn read(&self, key: &'static str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &'static str, value: &str) -> Result<(), StorageError> {
        let _ = self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &'static str) -> Result<(), StorageError> {
        let _ = self.entries.remove(key);
        Ok(())
    }
}

/// Store that keeps each blob in `<root>/<key>.json`.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous blob intact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at the provided directory.
    ///
    /// The directory is created lazily on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl StateStore for FileStore {
    fn read(&self, key: &'static str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Io {
                    action: "read",
                    path,
                    source,
                })
            }
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|error| StorageError::Malformed {
                key,
                reason: error.to_string(),
            })
    }

    fn write(&mut self, key: &'static str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).map_err(|source| StorageError::Io {
            action: "create directory",
            path: self.root.clone(),
            source,
        })?;
        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, value).map_err(|source| StorageError::Io {
            action: "write",
            path: temp_path.clone(),
            source,
        })?;
        fs::rename(&temp_path, &path).map_err(|source| StorageError::Io {
            action: "rename into",
            path,
            source,
        })
    }

    fn remove(&mut self, key: &'static str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                action: "remove",
                path,
                source,
            }),
        }
    }
}
