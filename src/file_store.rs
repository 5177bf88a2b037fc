//! A [`PrefStore`] persisted as one TOML document.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use log::{debug, info, warn};
use once_cell::sync::Lazy;

use crate::storage::Storage;
use crate::store::{PrefStore, PrefValue};
use crate::PrefsError;

/// Name of the document inside the storage backend.
pub const PREFERENCES_FILENAME: &str = "package-manager-prefs.toml";

// Locations currently owned by a live FileStore in this process.
static OPEN_LOCATIONS: Lazy<Mutex<HashSet<String>>> = Lazy::new(|| Mutex::new(HashSet::new()));

/// Releases the location when the owning store is dropped.
#[derive(Debug)]
struct LocationClaim(String);

impl LocationClaim {
    fn acquire(location: String) -> Result<Self, PrefsError> {
        let mut open = OPEN_LOCATIONS.lock().unwrap_or_else(|e| e.into_inner());
        if !open.insert(location.clone()) {
            return Err(PrefsError::InstanceAlreadyLoaded(location));
        }
        Ok(Self(location))
    }
}

impl Drop for LocationClaim {
    fn drop(&mut self) {
        OPEN_LOCATIONS
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.0);
    }
}

/// Preference store cached in memory and rewritten in full after every change.
///
/// Only one `FileStore` can own a location at a time within a process.
#[derive(Debug)]
pub struct FileStore {
    values: BTreeMap<String, PrefValue>,
    storage: Box<dyn Storage>,
    claim: LocationClaim,
    #[cfg(not(target_arch = "wasm32"))]
    _scratch_dir: Option<tempfile::TempDir>,
}

impl FileStore {
    /// Opens the store kept by `storage`, loading any values already written.
    pub fn with_storage(storage: Box<dyn Storage>) -> Result<Self, PrefsError> {
        let location = storage.location(PREFERENCES_FILENAME);
        let claim = LocationClaim::acquire(location.clone())?;

        let values = match storage.read(PREFERENCES_FILENAME)? {
            Some(contents) => parse_document(&location, &contents)?,
            None => BTreeMap::new(),
        };
        info!("Loaded {} preferences from {}", values.len(), location);

        Ok(Self {
            values,
            storage,
            claim,
            #[cfg(not(target_arch = "wasm32"))]
            _scratch_dir: None,
        })
    }

    /// Opens the store in the platform config directory for `namespace`
    /// (for example `"com.example.App"`).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open(namespace: &str) -> Result<Self, PrefsError> {
        let dirs = directories::ProjectDirs::from(namespace, "", "")
            .ok_or_else(|| PrefsError::NoConfigDir(namespace.to_owned()))?;
        Self::open_in(dirs.config_dir())
    }

    /// Opens the store under localStorage for `app_id`.
    #[cfg(all(target_arch = "wasm32", feature = "wasm"))]
    pub fn open(app_id: &str) -> Result<Self, PrefsError> {
        Self::with_storage(crate::storage::create_storage(app_id))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_in(directory: impl AsRef<std::path::Path>) -> Result<Self, PrefsError> {
        let storage = crate::storage::native::DirStorage::new(directory.as_ref());
        Self::with_storage(Box::new(storage))
    }

    /// Opens an empty store in a fresh temporary directory removed on drop.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_testing() -> Result<Self, PrefsError> {
        let scratch = tempfile::Builder::new().prefix("package-prefs").tempdir()?;
        let mut store = Self::open_in(scratch.path())?;
        store._scratch_dir = Some(scratch);
        Ok(store)
    }

    /// Where the document is kept.
    pub fn location(&self) -> &str {
        &self.claim.0
    }

    /// The document as it is written to storage.
    pub fn to_toml_string(&self) -> Result<String, PrefsError> {
        Ok(toml::to_string(&self.values)?)
    }

    fn save(&self) -> Result<(), PrefsError> {
        let document = self.to_toml_string()?;
        self.storage.write(PREFERENCES_FILENAME, &document)?;
        Ok(())
    }
}

/// Reads the flat table of preferences. Entries of a type the store cannot
/// hold (floats, arrays, tables, datetimes) are skipped.
fn parse_document(location: &str, contents: &str) -> Result<BTreeMap<String, PrefValue>, PrefsError> {
    let table: toml::Table = toml::from_str(contents)
        .map_err(|e| PrefsError::Deserialization(location.to_owned(), e))?;

    let mut values = BTreeMap::new();
    for (key, value) in table {
        let value = match value {
            toml::Value::Boolean(value) => PrefValue::Bool(value),
            toml::Value::Integer(value) => PrefValue::Int(value),
            toml::Value::String(value) => PrefValue::String(value),
            other => {
                warn!(
                    "Skipping preference '{}' in {}: unsupported {} value",
                    key,
                    location,
                    other.type_str()
                );
                continue;
            }
        };
        values.insert(key, value);
    }
    Ok(values)
}

impl PrefStore for FileStore {
    fn value(&self, key: &str) -> Option<&PrefValue> {
        self.values.get(key)
    }

    fn put(&mut self, key: &str, value: PrefValue) -> Result<(), PrefsError> {
        if self.values.get(key) == Some(&value) {
            debug!("Preference '{}' unchanged, skipping save", key);
            return Ok(());
        }
        let previous = self.values.insert(key.to_owned(), value);
        if let Err(err) = self.save() {
            // Keep memory in line with what storage holds.
            match previous {
                Some(previous) => self.values.insert(key.to_owned(), previous),
                None => self.values.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PrefsError> {
        let Some(previous) = self.values.remove(key) else {
            return Ok(());
        };
        if let Err(err) = self.save() {
            self.values.insert(key.to_owned(), previous);
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::{PackageManagerPrefs, ProjectId};
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Counts writes, keeps nothing.
    #[derive(Debug)]
    struct CountingStorage {
        writes: Arc<AtomicUsize>,
        name: String,
    }

    impl Storage for CountingStorage {
        fn read(&self, _name: &str) -> io::Result<Option<String>> {
            Ok(None)
        }

        fn write(&self, _name: &str, _data: &str) -> io::Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn location(&self, name: &str) -> String {
            format!("counting::{}::{}", self.name, name)
        }
    }

    /// Serves a fixed document and rejects every write.
    #[derive(Debug)]
    struct ReadOnlyStorage {
        document: Option<String>,
        name: String,
    }

    impl Storage for ReadOnlyStorage {
        fn read(&self, _name: &str) -> io::Result<Option<String>> {
            Ok(self.document.clone())
        }

        fn write(&self, _name: &str, _data: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }

        fn location(&self, name: &str) -> String {
            format!("read-only::{}::{}", self.name, name)
        }
    }

    #[test]
    fn unchanged_writes_do_not_touch_storage() {
        let writes = Arc::new(AtomicUsize::new(0));
        let storage = CountingStorage {
            writes: Arc::clone(&writes),
            name: "unchanged".to_string(),
        };
        let mut store = FileStore::with_storage(Box::new(storage)).unwrap();

        store.set_bool("flag", true).unwrap();
        store.set_bool("flag", true).unwrap();
        assert_eq!(writes.load(Ordering::SeqCst), 1);

        store.delete_key("never-set").unwrap();
        assert_eq!(writes.load(Ordering::SeqCst), 1);

        store.set_bool("flag", false).unwrap();
        store.delete_key("flag").unwrap();
        assert_eq!(writes.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn failed_write_keeps_previous_value_and_stays_silent() {
        let storage = ReadOnlyStorage {
            document: None,
            name: "failed-write".to_string(),
        };
        let store = FileStore::with_storage(Box::new(storage)).unwrap();
        let mut prefs = PackageManagerPrefs::new(store, ProjectId::new("p").unwrap());
        prefs.set_show_preview_packages_from_installed(true);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        prefs.on_show_preview_packages_changed(move |v| sink.lock().unwrap().push(v));

        assert!(matches!(
            prefs.set_show_preview_packages(false),
            Err(PrefsError::Storage(_))
        ));
        assert!(prefs.show_preview_packages());
        assert!(!prefs.has_show_preview_packages_key());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn failed_remove_keeps_the_override() {
        let storage = ReadOnlyStorage {
            document: Some("\"PackageManager.ShowPreviewPackages_p\" = true\n".to_string()),
            name: "failed-remove".to_string(),
        };
        let store = FileStore::with_storage(Box::new(storage)).unwrap();
        let mut prefs = PackageManagerPrefs::new(store, ProjectId::new("p").unwrap());

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        prefs.on_show_preview_packages_changed(move |v| sink.lock().unwrap().push(v));

        assert!(prefs.clear_show_preview_packages().is_err());
        assert!(prefs.has_show_preview_packages_key());
        assert!(prefs.show_preview_packages());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn unsupported_entries_are_skipped_on_load() {
        let storage = ReadOnlyStorage {
            document: Some(
                "ratio = 0.5\nrecent = [\"a\"]\n\"PackageManager.Filter_p\" = \"All\"\n".to_string(),
            ),
            name: "unsupported".to_string(),
        };
        let store = FileStore::with_storage(Box::new(storage)).unwrap();

        assert!(!store.has_key("ratio"));
        assert!(!store.has_key("recent"));
        assert_eq!(store.get_string("PackageManager.Filter_p").as_deref(), Some("All"));
    }

    #[test]
    fn writes_are_persisted_and_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = FileStore::open_in(dir.path()).unwrap();
            store.set_bool("PackageManager.SkipRemoveConfirmation", true).unwrap();
            store.set_string("PackageManager.Filter_abc", "All").unwrap();
            store.set_int("count", 12).unwrap();
        }

        let store = FileStore::open_in(dir.path()).unwrap();
        assert!(store.get_bool("PackageManager.SkipRemoveConfirmation", false));
        assert_eq!(store.get_string("PackageManager.Filter_abc").as_deref(), Some("All"));
        assert_eq!(store.get_int("count", 0), 12);
    }

    #[test]
    fn document_is_a_flat_toml_table() {
        let mut store = FileStore::open_testing().unwrap();
        store.set_bool("PackageManager.ShowPackageDependencies", true).unwrap();

        let contents = std::fs::read_to_string(store.location()).unwrap();
        assert!(contents.contains("\"PackageManager.ShowPackageDependencies\" = true"));
        assert_eq!(contents, store.to_toml_string().unwrap());
    }

    #[test]
    fn second_open_of_same_location_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let first = FileStore::open_in(dir.path()).unwrap();

        match FileStore::open_in(dir.path()) {
            Err(PrefsError::InstanceAlreadyLoaded(location)) => {
                assert!(location.contains(PREFERENCES_FILENAME));
            }
            other => panic!("expected InstanceAlreadyLoaded, got {:?}", other),
        }

        drop(first);
        assert!(FileStore::open_in(dir.path()).is_ok());
    }

    #[test]
    fn removing_a_key_rewrites_the_document() {
        let mut store = FileStore::open_testing().unwrap();
        store.set_bool("flag", true).unwrap();
        store.delete_key("flag").unwrap();

        assert!(!store.has_key("flag"));
        let contents = std::fs::read_to_string(store.location()).unwrap();
        assert!(!contents.contains("flag"));
    }

    #[test]
    fn testing_stores_do_not_share_locations() {
        let a = FileStore::open_testing().unwrap();
        let b = FileStore::open_testing().unwrap();
        assert_ne!(a.location(), b.location());
    }
}
