//! # package_prefs
//!
//! User preferences of a package manager window, kept in a key-value store.
//!
//! The crate covers the handful of settings such a window remembers between
//! sessions:
//!
//! - **Confirmations:** whether removing or disabling a package asks first.
//! - **Dependencies:** whether package dependencies are listed.
//! - **Preview packages:** whether preview packages are shown in this project.
//!   An explicit per-project choice wins; without one the value follows
//!   whether any installed package is already a preview.
//! - **Filter tab:** the tab last used in this project, stored by name.
//! - **Page size:** how many items to fetch for the first page.
//!
//! Changes to dependency and preview package visibility raise notifications.
//!
//! The store is pluggable through [`PrefStore`]. [`MemoryStore`] keeps values
//! in memory; [`FileStore`] writes them as one TOML file (or a localStorage
//! item on wasm), replacing it atomically on every change.
//!
//! **Note:** Per-project values are namespaced by a [`ProjectId`], so several
//! projects can share one user-level store without seeing each other's choices.
//!
//! ## Example
//!
//! ```rust
//! use package_prefs::{MemoryStore, PackageFilterTab, PackageManagerPrefs, ProjectId};
//!
//! let project = ProjectId::new("0b5e7c1a").unwrap();
//! let mut prefs = PackageManagerPrefs::new(MemoryStore::new(), project);
//!
//! prefs.on_show_preview_packages_changed(|shown| println!("preview packages shown: {}", shown));
//! prefs.set_show_preview_packages_from_installed(true);
//! assert!(prefs.show_preview_packages());
//!
//! prefs.set_last_used_package_filter(Some(PackageFilterTab::All)).unwrap();
//! assert_eq!(prefs.last_used_package_filter(), Some(PackageFilterTab::All));
//! ```

mod error;
pub mod events;
mod file_store;
pub mod filter;
pub mod prefs;
pub mod project;
pub mod storage;
pub mod store;

pub use error::PrefsError;
pub use events::{ChangeEvent, SubscriptionId};
pub use file_store::{FileStore, PREFERENCES_FILENAME};
pub use filter::{PackageFilterTab, ParseFilterTabError};
pub use prefs::{keys, PackageManagerPrefs, SessionState};
pub use project::ProjectId;
pub use store::{MemoryStore, PrefStore, PrefValue};
