//! Durable key-value persistence for the gradebook session.
//!
//! The original tool kept its state in browser-local key-value storage; the
//! same logical keys are preserved here so a serialized gradebook round-trips
//! byte-compatible. Semesters are stored as a JSON document, the active
//! semester id and theme as raw strings, and the sidebar flag as a JSON
//! boolean.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

use super::domain::{Semester, Theme};
use super::store::GradebookState;

pub const SEMESTERS_KEY: &str = "grade-calculator-semesters";
pub const ACTIVE_SEMESTER_KEY: &str = "grade-calculator-active-semester";
pub const SIDEBAR_KEY: &str = "sidebar-collapsed";
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored value is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("storage mutex poisoned")]
    Poisoned,
}

/// Storage abstraction so state can be exercised against an in-memory map in
/// tests and a file on disk in production.
pub trait KeyValueStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Single-file JSON store: one object mapping logical keys to string values.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn store_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(self.load_map()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut map = self.load_map()?;
        map.insert(key.to_string(), value.to_string());
        self.store_map(&map)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut map = self.load_map()?;
        if map.remove(key).is_some() {
            self.store_map(&map)?;
        }
        Ok(())
    }
}

/// Map-backed store for tests and the CLI demo.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl KeyValueStore for InMemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// Restores a session from storage. The saved active semester wins when it
/// still exists; otherwise selection falls back to the first semester, as the
/// original load path did.
pub fn load_state(store: &dyn KeyValueStore) -> Result<GradebookState, StorageError> {
    let semesters: Vec<Semester> = match store.read(SEMESTERS_KEY)? {
        Some(raw) => serde_json::from_str(&raw)?,
        None => Vec::new(),
    };

    let saved_active = store.read(ACTIVE_SEMESTER_KEY)?;
    let active_semester_id = match saved_active {
        Some(id) if semesters.iter().any(|s| s.id == id) => Some(id),
        _ => semesters.first().map(|s| s.id.clone()),
    };

    let sidebar_collapsed = match store.read(SIDEBAR_KEY)? {
        Some(raw) => serde_json::from_str(&raw)?,
        None => false,
    };

    let theme = match store.read(THEME_KEY)?.as_deref() {
        Some("dark") => Theme::Dark,
        _ => Theme::Light,
    };

    Ok(GradebookState {
        semesters,
        active_semester_id,
        sidebar_collapsed,
        theme,
    })
}

/// Writes all four logical keys for the given session state.
pub fn save_state(store: &dyn KeyValueStore, state: &GradebookState) -> Result<(), StorageError> {
    store.write(SEMESTERS_KEY, &serde_json::to_string(&state.semesters)?)?;

    match &state.active_semester_id {
        Some(id) => store.write(ACTIVE_SEMESTER_KEY, id)?,
        None => store.remove(ACTIVE_SEMESTER_KEY)?,
    }

    store.write(SIDEBAR_KEY, &serde_json::to_string(&state.sidebar_collapsed)?)?;
    store.write(THEME_KEY, state.theme.label())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_load_an_empty_default_session() {
        let store = InMemoryStore::default();
        let state = load_state(&store).expect("empty store loads");

        assert!(state.semesters.is_empty());
        assert_eq!(state.active_semester_id, None);
        assert!(!state.sidebar_collapsed);
        assert_eq!(state.theme, Theme::Light);
    }

    #[test]
    fn stale_active_semester_falls_back_to_first() {
        let store = InMemoryStore::default();
        let mut state = GradebookState::default();
        let first = state.add_semester();
        state.add_semester();
        save_state(&store, &state).expect("state saves");

        // Simulate a saved selection pointing at a deleted semester.
        store
            .write(ACTIVE_SEMESTER_KEY, "gone")
            .expect("write succeeds");

        let loaded = load_state(&store).expect("state loads");
        assert_eq!(loaded.active_semester_id.as_deref(), Some(first.id.as_str()));
    }

    #[test]
    fn malformed_semesters_payload_is_an_error() {
        let store = InMemoryStore::default();
        store
            .write(SEMESTERS_KEY, "{not json")
            .expect("write succeeds");

        assert!(matches!(
            load_state(&store),
            Err(StorageError::Malformed(_))
        ));
    }

    #[test]
    fn file_store_round_trips_between_instances() {
        let path = std::env::temp_dir().join(format!(
            "coursegrade-store-{}.json",
            crate::grading::template::new_entity_id()
        ));

        {
            let store = JsonFileStore::new(&path);
            let mut state = GradebookState::default();
            state.add_semester();
            state.toggle_theme();
            state.set_sidebar_collapsed(true);
            save_state(&store, &state).expect("state saves");
        }

        let reopened = JsonFileStore::new(&path);
        let loaded = load_state(&reopened).expect("state loads");
        assert_eq!(loaded.semesters.len(), 1);
        assert_eq!(loaded.theme, Theme::Dark);
        assert!(loaded.sidebar_collapsed);

        std::fs::remove_file(&path).ok();
    }
}
