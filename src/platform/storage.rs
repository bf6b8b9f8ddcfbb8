use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::trace;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{PersistError, StorageError};

/// A durable key/value slot. Each `set` replaces the whole value under the
/// key as one unit.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(self.key_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let write_err = |source: std::io::Error| StorageError::Write {
            key: key.to_string(),
            source,
        };
        fs::create_dir_all(&self.data_dir).map_err(write_err)?;

        // Write beside the target and rename over it so a reader never sees
        // a half-written value.
        let path = self.key_path(key);
        let tmp_path = self.data_dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp_path, value).map_err(write_err)?;
        if let Err(source) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(write_err(source));
        }
        trace!(target: "storage", "Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }
}

/// In-memory storage. Clones share the same slots, so a test can keep a
/// handle to inspect or corrupt what the code under test wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Rc<RefCell<HashMap<String, Vec<u8>>>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail until switched back off.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.slots.borrow().get(key).cloned()
    }

    pub fn put_raw(&self, key: &str, value: impl Into<Vec<u8>>) {
        self.slots.borrow_mut().insert(key.to_string(), value.into());
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::Rejected(key.to_string()));
        }
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// Reads and decodes the JSON value under `key`, `None` when absent.
pub fn read_json<T: DeserializeOwned>(
    storage: &dyn Storage,
    key: &str,
) -> Result<Option<T>, PersistError> {
    let Some(contents) = storage.get(key).map_err(PersistError::Read)? else {
        return Ok(None);
    };
    serde_json::from_slice(&contents)
        .map(Some)
        .map_err(PersistError::Deserialization)
}

/// Encodes `value` as JSON and stores it under `key`, replacing the old value.
pub fn write_json<T: Serialize + ?Sized>(
    storage: &mut dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), PersistError> {
    let contents = serde_json::to_vec_pretty(value).map_err(PersistError::Serialization)?;
    storage
        .set(key, &contents)
        .map_err(PersistError::PersistenceWrite)
}
