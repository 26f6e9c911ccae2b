use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{VoiceError, VoiceResult};

/// Durable key holding the selected locale code
pub const LOCALE_KEY: &str = "meditech-language";

/// Durable key owned by the authentication collaborator; never written here
pub const SESSION_MARKER_KEY: &str = "meditech-user";

/// Small synchronous key-value store that survives restarts
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> VoiceResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> VoiceResult<()>;
}

/// Preferences kept as one JSON object on disk
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> VoiceResult<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> VoiceResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Readers only ever see the old or the new file, never a partial one.
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> VoiceResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> VoiceResult<()> {
        let _guard = self.write_lock.lock();

        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(VoiceError::Serialization(e)) => {
                warn!(path = %self.path.display(), error = %e, "Discarding unreadable preference file");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };

        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)?;
        debug!(path = %self.path.display(), key, "Preference persisted");
        Ok(())
    }
}

/// In-process preferences for tests and kiosk devices without storage
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries.lock().insert(key.to_string(), value.to_string());
        self
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> VoiceResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> VoiceResult<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("prefs.json"));

        assert_eq!(store.get(LOCALE_KEY).unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        FilePreferenceStore::new(&path).set(LOCALE_KEY, "ta").unwrap();

        let reopened = FilePreferenceStore::new(&path);
        assert_eq!(reopened.get(LOCALE_KEY).unwrap().as_deref(), Some("ta"));
    }

    #[test]
    fn test_other_keys_are_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{"meditech-user": "opaque-marker"}"#).unwrap();

        let store = FilePreferenceStore::new(&path);
        store.set(LOCALE_KEY, "hi").unwrap();

        assert_eq!(store.get(SESSION_MARKER_KEY).unwrap().as_deref(), Some("opaque-marker"));
        assert_eq!(store.get(LOCALE_KEY).unwrap().as_deref(), Some("hi"));
    }

    #[test]
    fn test_corrupt_file_is_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json at all").unwrap();

        let store = FilePreferenceStore::new(&path);
        assert!(store.get(LOCALE_KEY).is_err());

        store.set(LOCALE_KEY, "ml").unwrap();
        assert_eq!(store.get(LOCALE_KEY).unwrap().as_deref(), Some("ml"));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryPreferenceStore::new().with_entry(LOCALE_KEY, "pa");
        assert_eq!(store.get(LOCALE_KEY).unwrap().as_deref(), Some("pa"));

        store.set(LOCALE_KEY, "en").unwrap();
        assert_eq!(store.get(LOCALE_KEY).unwrap().as_deref(), Some("en"));
    }
}
