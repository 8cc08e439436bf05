use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Flat string-keyed blob storage every record lives in.
pub trait Store {
    /// Returns the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: Store + ?Sized> Store for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Returns the data directory.
///
/// The path is determined in the following order:
/// 1. `HOMEBOARD_DB` environment variable.
/// 2. `~/.local/share/homeboard` (on Linux).
/// 3. `./homeboard` (fallback).
pub fn data_dir() -> PathBuf {
    std::env::var("HOMEBOARD_DB").map(PathBuf::from).unwrap_or_else(|_| {
        let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("homeboard");
        p
    })
}

/// Keeps each key in its own `<key>.json` file inside one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens the store in `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(FileStore { dir })
    }

    /// Opens the store in [`data_dir`].
    pub fn open_default() -> Result<Self> {
        Self::open(data_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let mut p = self.dir.clone();
        p.push(format!("{}.json", key));
        p
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        if !path.exists() {
            return None;
        }
        let mut f = match OpenOptions::new().read(true).open(&path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot open stored record");
                return None;
            }
        };
        let mut s = String::new();
        if f.read_to_string(&mut s).is_err() {
            return None;
        }
        Some(s)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        f.write_all(value.as_bytes())?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Store backed by a map; nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Reads and decodes `key`, falling back to `T::default()` when the record is
/// missing or cannot be parsed.
pub fn load_json<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: Store + ?Sized,
{
    let raw = match store.get(key) {
        Some(raw) => raw,
        None => return T::default(),
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(key, error = %e, "ignoring malformed stored record");
        T::default()
    })
}

/// Reads a JSON array under `key`, skipping entries that cannot be decoded.
/// A missing or unparseable array reads as empty.
pub fn load_json_list<T, S>(store: &S, key: &str) -> Vec<T>
where
    T: DeserializeOwned,
    S: Store + ?Sized,
{
    let entries: Vec<serde_json::Value> = load_json(store, key);
    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(key, error = %e, "skipping malformed entry");
                None
            }
        })
        .collect()
}

/// Encodes `value` as JSON and writes it under `key`.
pub fn save_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: Store + ?Sized,
{
    let s = serde_json::to_string_pretty(value)?;
    store.set(key, &s)
}

/// Per-person and household keys, one per record category.
pub mod keys {
    pub fn tasks(person: &str) -> String {
        format!("tasks_{}", person)
    }

    pub fn recurring(person: &str) -> String {
        format!("recurring_{}", person)
    }

    pub fn dates(person: &str) -> String {
        format!("dates_{}", person)
    }

    pub fn completed_today(person: &str) -> String {
        format!("completedToday_{}", person)
    }

    pub fn chore(person: &str) -> String {
        format!("chore_{}", person)
    }

    pub fn media_time_usage(person: &str) -> String {
        format!("mediaTimeUsage_{}", person)
    }

    pub const SHOPPING_LIST: &str = "shoppingList";
    pub const SHOPPING_CATEGORIES: &str = "shoppingCategories";
    pub const TASKS_LIST: &str = "tasksList";
    pub const TASKS_CATEGORIES: &str = "tasksCategories";
}
