use std::fs;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::error::Result;

/// A single directory holding one JSON file per record (swap, tracked
/// HTLC, ...). Writes are atomic: serialize to a temp file in the same
/// directory, then rename over the target, so a crash mid-write never
/// leaves a half-written record.
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let target = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        let bytes = serde_json::to_vec_pretty(value)?;
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &target)?;
        debug!(key, path = %target.display(), "persisted record");
        Ok(())
    }

    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(path)?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Scan every persisted record. Used on startup recovery to re-derive
    /// which non-terminal swaps still need a watcher resumed.
    pub fn list_keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if let Some(key) = name.strip_suffix(".json") {
                if !key.starts_with('.') {
                    keys.push(key.to_string());
                }
            }
        }
        Ok(keys)
    }

    pub fn load_all<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let mut out = Vec::new();
        for key in self.list_keys()? {
            if let Some(value) = self.load(&key)? {
                out.push(value);
            }
        }
        Ok(out)
    }
}

/// Restrict a just-written key-material file to owner read/write only.
#[cfg(unix)]
pub fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o600);
    fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
pub fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Dummy {
        n: u32,
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        store.save("swap-1", &Dummy { n: 42 }).unwrap();
        let loaded: Option<Dummy> = store.load("swap-1").unwrap();
        assert_eq!(loaded, Some(Dummy { n: 42 }));
    }

    #[test]
    fn load_missing_key_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        let loaded: Option<Dummy> = store.load("missing").unwrap();
        assert_eq!(loaded, None);
    }

    #[test]
    fn list_keys_finds_saved_records_and_skips_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        store.save("a", &Dummy { n: 1 }).unwrap();
        store.save("b", &Dummy { n: 2 }).unwrap();
        let mut keys = store.list_keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn remove_deletes_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        store.save("a", &Dummy { n: 1 }).unwrap();
        store.remove("a").unwrap();
        let loaded: Option<Dummy> = store.load("a").unwrap();
        assert_eq!(loaded, None);
    }
}
