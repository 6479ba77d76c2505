use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{error, trace};

use super::{Storage, StoreError};

mod kv;
use kv::KeyValues;

/// Keeps every key in a single `storage.txt` under `root`, re-read on each access so
/// edits made between operations are picked up.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(path: &Path) -> Self {
        Self {
            root: path.to_path_buf(),
        }
    }

    fn path(&self) -> PathBuf {
        self.root.join("storage.txt")
    }

    fn read(&self) -> Result<KeyValues, StoreError> {
        let path = self.path();
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace!("no store at {path:?} yet");
                return Ok(KeyValues::new());
            }
            Err(e) => {
                error!("open {path:?}: {e:?}");
                return Err(e.into());
            }
        };

        kv::read(file)
    }

    fn write(&self, keyvalues: &KeyValues) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(|e| {
            error!("create {:?}: {e:?}", self.root);
            e
        })?;

        // encode up front, a refused entry mustn't truncate what's on disk
        let mut encoded = vec![];
        kv::write(&mut encoded, keyvalues)?;

        let path = self.path();
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| {
                error!("open {path:?} for writing: {e:?}");
                e
            })?;

        file.write_all(&encoded).map_err(|e| {
            error!("write {path:?}: {e:?}");
            e.into()
        })
    }
}

impl Storage for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self.read()?.remove(key);
        trace!("get {key}: {}", if value.is_some() { "hit" } else { "miss" });
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut kv = self.read()?;
        kv.insert(key.into(), value.into());
        trace!("set {key}");
        self.write(&kv)
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        let mut kv = self.read()?;
        for (key, value) in entries {
            kv.insert((*key).into(), (*value).into());
        }
        trace!("set {} keys", entries.len());
        self.write(&kv)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let mut kv = self.read()?;
        if kv.remove(key).is_none() {
            return Ok(());
        }
        trace!("remove {key}");
        self.write(&kv)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(&dir.path().join("not-yet"));

        assert_eq!(store.get("users").unwrap(), None);
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("data");

        {
            let mut store = FileStore::new(&root);
            store.set("userName", "Alice").unwrap();
            store.set("joinedPrograms", r#"["Nutrition Guide"]"#).unwrap();
            store.set("userName", "Alice B").unwrap();
        }

        let mut store = FileStore::new(&root);
        assert_eq!(store.get("userName").unwrap().as_deref(), Some("Alice B"));
        assert_eq!(
            store.get("joinedPrograms").unwrap().as_deref(),
            Some(r#"["Nutrition Guide"]"#)
        );

        store.remove("userName").unwrap();
        assert_eq!(FileStore::new(&root).get("userName").unwrap(), None);
    }

    #[test]
    fn bad_write_leaves_store_alone() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());

        store.set("userAge", "20").unwrap();
        assert!(store.set("userName", "a\nb").is_err());

        assert_eq!(store.get("userAge").unwrap().as_deref(), Some("20"));
    }
}
