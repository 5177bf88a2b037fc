//! Package manager preferences on top of a [`PrefStore`].

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::events::{ChangeEvent, SubscriptionId};
use crate::filter::PackageFilterTab;
use crate::project::ProjectId;
use crate::store::PrefStore;
use crate::PrefsError;

/// Keys under which preferences are stored.
pub mod keys {
    pub const SKIP_REMOVE_CONFIRMATION: &str = "PackageManager.SkipRemoveConfirmation";
    pub const SKIP_DISABLE_CONFIRMATION: &str = "PackageManager.SkipDisableConfirmation";
    pub const SHOW_PACKAGE_DEPENDENCIES: &str = "PackageManager.ShowPackageDependencies";
    pub const SHOW_PREVIEW_PACKAGES_WARNING: &str = "PackageManager.ShowPreviewPackagesWarning";

    /// Followed by the project identifier.
    pub const SHOW_PREVIEW_PACKAGES_PREFIX: &str = "PackageManager.ShowPreviewPackages_";
    /// Followed by the project identifier.
    pub const LAST_USED_FILTER_PREFIX: &str = "PackageManager.Filter_";
}

/// Generates a getter and a `set_` method for each plain bool preference.
macro_rules! bool_prefs {
    (
        $(
            $(#[$doc:meta])*
            $name:ident: $key:path = $default:expr;
        )*
    ) => {
        paste::paste! {
            impl<S: PrefStore> PackageManagerPrefs<S> {
                $(
                    $(#[$doc])*
                    pub fn $name(&self) -> bool {
                        self.store.get_bool($key, $default)
                    }

                    #[doc = "Stores `" $name "`."]
                    pub fn [<set_ $name>](&mut self, value: bool) -> Result<(), PrefsError> {
                        self.store.set_bool($key, value)
                    }
                )*
            }
        }
    };
}

/// State that lives with the preferences object rather than in the store.
///
/// Hosts that rebuild the object (for example after a reload) carry this
/// across with [`PackageManagerPrefs::session_state`] and
/// [`PackageManagerPrefs::restore_session_state`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    /// Zero or negative means unset.
    pub num_items_per_page: i32,
}

impl SessionState {
    pub fn to_toml(&self) -> Result<String, PrefsError> {
        Ok(toml::to_string(self)?)
    }

    pub fn from_toml(contents: &str) -> Result<Self, PrefsError> {
        toml::from_str(contents).map_err(|e| PrefsError::Deserialization("session state".to_owned(), e))
    }
}

/// User preferences of the package manager window for one project.
///
/// User-level flags are shared by every project using the same store;
/// preview package visibility and the last used filter tab are scoped to
/// the project.
#[derive(Debug)]
pub struct PackageManagerPrefs<S> {
    store: S,
    project: ProjectId,
    show_preview_packages_from_installed: bool,
    num_items_per_page: i32,
    show_dependencies_changed: ChangeEvent<bool>,
    show_preview_packages_changed: ChangeEvent<bool>,
}

bool_prefs! {
    /// Whether removing a package skips the confirmation dialog.
    skip_remove_confirmation: keys::SKIP_REMOVE_CONFIRMATION = false;
    /// Whether disabling a package skips the confirmation dialog.
    skip_disable_confirmation: keys::SKIP_DISABLE_CONFIRMATION = false;
    /// Whether the warning shown when enabling preview packages is displayed.
    show_preview_packages_warning: keys::SHOW_PREVIEW_PACKAGES_WARNING = true;
}

impl<S: PrefStore> PackageManagerPrefs<S> {
    pub fn new(store: S, project: ProjectId) -> Self {
        Self {
            store,
            project,
            show_preview_packages_from_installed: false,
            num_items_per_page: 0,
            show_dependencies_changed: ChangeEvent::new(),
            show_preview_packages_changed: ChangeEvent::new(),
        }
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn show_preview_packages_key(&self) -> String {
        self.project.scoped_key(keys::SHOW_PREVIEW_PACKAGES_PREFIX)
    }

    fn last_used_filter_key(&self) -> String {
        self.project.scoped_key(keys::LAST_USED_FILTER_PREFIX)
    }

    pub fn show_package_dependencies(&self) -> bool {
        self.store.get_bool(keys::SHOW_PACKAGE_DEPENDENCIES, false)
    }

    /// Notifies `on_show_dependencies_changed` subscribers when the value changes.
    pub fn set_show_package_dependencies(&mut self, value: bool) -> Result<(), PrefsError> {
        let old = self.show_package_dependencies();
        self.store.set_bool(keys::SHOW_PACKAGE_DEPENDENCIES, value)?;
        if old != value {
            debug!("Show package dependencies changed to {}", value);
            self.show_dependencies_changed.emit(value);
        }
        Ok(())
    }

    /// Whether the user explicitly chose to show or hide preview packages in this project.
    pub fn has_show_preview_packages_key(&self) -> bool {
        self.store.has_key(&self.show_preview_packages_key())
    }

    /// The explicit per-project choice if there is one, otherwise whether
    /// preview packages are already installed.
    pub fn show_preview_packages(&self) -> bool {
        let key = self.show_preview_packages_key();
        if self.store.has_key(&key) {
            return self.store.get_bool(&key, false);
        }
        self.show_preview_packages_from_installed
    }

    /// Records an explicit per-project choice.
    pub fn set_show_preview_packages(&mut self, value: bool) -> Result<(), PrefsError> {
        let old = self.show_preview_packages();
        let key = self.show_preview_packages_key();
        self.store.set_bool(&key, value)?;
        if old != value {
            self.notify_show_preview_packages(value);
        }
        Ok(())
    }

    /// Drops the explicit choice so the value follows installed packages again.
    pub fn clear_show_preview_packages(&mut self) -> Result<(), PrefsError> {
        let old = self.show_preview_packages();
        let key = self.show_preview_packages_key();
        self.store.delete_key(&key)?;
        let new = self.show_preview_packages();
        if old != new {
            self.notify_show_preview_packages(new);
        }
        Ok(())
    }

    pub fn show_preview_packages_from_installed(&self) -> bool {
        self.show_preview_packages_from_installed
    }

    /// Updates whether any installed package is a preview. Has no visible
    /// effect while an explicit per-project choice exists.
    pub fn set_show_preview_packages_from_installed(&mut self, value: bool) {
        if self.show_preview_packages_from_installed == value {
            return;
        }
        let old = self.show_preview_packages();
        self.show_preview_packages_from_installed = value;
        let new = self.show_preview_packages();
        if old != new {
            self.notify_show_preview_packages(new);
        }
    }

    fn notify_show_preview_packages(&self, value: bool) {
        debug!("Show preview packages changed to {} for project {}", value, self.project);
        self.show_preview_packages_changed.emit(value);
    }

    /// Last filter tab used in this project. Missing, malformed or retired
    /// names read as `None`.
    pub fn last_used_package_filter(&self) -> Option<PackageFilterTab> {
        let key = self.last_used_filter_key();
        let name = self.store.get_string(&key)?;
        match name.parse() {
            Ok(tab) => Some(tab),
            Err(err) => {
                warn!("Ignoring stored filter for project {}: {}", self.project, err);
                None
            }
        }
    }

    /// `None` forgets the stored tab.
    pub fn set_last_used_package_filter(
        &mut self,
        tab: Option<PackageFilterTab>,
    ) -> Result<(), PrefsError> {
        let key = self.last_used_filter_key();
        match tab {
            Some(tab) => self.store.set_string(&key, tab.name()),
            None => self.store.delete_key(&key),
        }
    }

    pub fn default_filter_tab(&self) -> PackageFilterTab {
        PackageFilterTab::InProject
    }

    /// How many items to fetch for the first page, if one was chosen.
    pub fn num_items_per_page(&self) -> Option<u32> {
        u32::try_from(self.num_items_per_page).ok().filter(|n| *n > 0)
    }

    /// `None` clears the value. Values beyond `i32::MAX` saturate.
    pub fn set_num_items_per_page(&mut self, value: Option<u32>) {
        self.num_items_per_page = value.map_or(0, |n| i32::try_from(n).unwrap_or(i32::MAX));
    }

    pub fn session_state(&self) -> SessionState {
        SessionState {
            num_items_per_page: self.num_items_per_page,
        }
    }

    pub fn restore_session_state(&mut self, state: SessionState) {
        self.num_items_per_page = state.num_items_per_page;
    }

    pub fn on_show_dependencies_changed<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.show_dependencies_changed.subscribe(callback)
    }

    pub fn on_show_preview_packages_changed<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.show_preview_packages_changed.subscribe(callback)
    }

    /// Removes a subscription made through either `on_*_changed` method.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.show_dependencies_changed.unsubscribe(id)
            || self.show_preview_packages_changed.unsubscribe(id)
    }
}
