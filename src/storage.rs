//! Blob persistence underneath [`FileStore`](crate::FileStore).
//!
//! A backend keeps whole preference documents under a short name: a file in
//! the config directory natively, a localStorage item in the browser.

use std::fmt::Debug;
use std::io;

/// Where a preferences document lives.
pub trait Storage: Send + Sync + Debug {
    /// The document stored under `name`, or `None` before the first write.
    fn read(&self, name: &str) -> io::Result<Option<String>>;

    /// Replaces the whole document stored under `name`.
    fn write(&self, name: &str, data: &str) -> io::Result<()>;

    /// Human readable location of `name`. Two backends that report the same
    /// location share a document, so it also keys the open-store registry.
    fn location(&self, name: &str) -> String;
}

#[cfg(not(target_arch = "wasm32"))]
pub mod native {
    use super::Storage;
    use std::io::{self, Write};
    use std::path::PathBuf;

    /// Preference documents kept as files in a config directory.
    #[derive(Debug)]
    pub struct DirStorage {
        config_dir: PathBuf,
    }

    impl DirStorage {
        pub fn new(config_dir: impl Into<PathBuf>) -> Self {
            Self {
                config_dir: config_dir.into(),
            }
        }
    }

    impl Storage for DirStorage {
        fn read(&self, name: &str) -> io::Result<Option<String>> {
            match std::fs::read_to_string(self.config_dir.join(name)) {
                Ok(document) => Ok(Some(document)),
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err),
            }
        }

        fn write(&self, name: &str, data: &str) -> io::Result<()> {
            std::fs::create_dir_all(&self.config_dir)?;

            // Readers see either the old document or the new one.
            let mut staged = tempfile::NamedTempFile::new_in(&self.config_dir)?;
            staged.write_all(data.as_bytes())?;
            staged.as_file().sync_all()?;
            staged.persist(self.config_dir.join(name)).map_err(|e| e.error)?;
            Ok(())
        }

        fn location(&self, name: &str) -> String {
            self.config_dir.join(name).display().to_string()
        }
    }
}

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub mod wasm {
    use super::Storage;
    use std::io;

    fn web_error(message: &str) -> io::Error {
        io::Error::new(io::ErrorKind::Other, message.to_owned())
    }

    /// Preference documents kept as localStorage items under an app prefix.
    #[derive(Debug)]
    pub struct LocalStorage {
        prefix: String,
    }

    impl LocalStorage {
        pub fn new(app_id: &str) -> Self {
            Self {
                prefix: format!("package_prefs_{}_", app_id.replace(['/', '.'], "_")),
            }
        }

        fn items(&self) -> io::Result<web_sys::Storage> {
            web_sys::window()
                .ok_or_else(|| web_error("window not available"))?
                .local_storage()
                .map_err(|_| web_error("localStorage not available"))?
                .ok_or_else(|| web_error("localStorage is null"))
        }

        fn item_key(&self, name: &str) -> String {
            format!("{}{}", self.prefix, name)
        }
    }

    impl Storage for LocalStorage {
        fn read(&self, name: &str) -> io::Result<Option<String>> {
            self.items()?
                .get_item(&self.item_key(name))
                .map_err(|_| web_error("failed to read preferences from localStorage"))
        }

        fn write(&self, name: &str, data: &str) -> io::Result<()> {
            self.items()?
                .set_item(&self.item_key(name), data)
                .map_err(|_| web_error("failed to write preferences to localStorage"))
        }

        fn location(&self, name: &str) -> String {
            format!("localStorage::{}", self.item_key(name))
        }
    }
}

/// Storage for the current platform: a config directory natively, a
/// localStorage prefix on wasm.
#[cfg(not(target_arch = "wasm32"))]
pub fn create_storage(config_dir: &str) -> Box<dyn Storage> {
    Box::new(native::DirStorage::new(config_dir))
}

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub fn create_storage(app_id: &str) -> Box<dyn Storage> {
    Box::new(wasm::LocalStorage::new(app_id))
}
