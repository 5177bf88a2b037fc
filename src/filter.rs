use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tabs the package list can be filtered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackageFilterTab {
    #[default]
    InProject,
    All,
    BuiltIn,
    AssetStore,
    InDevelopment,
}

impl PackageFilterTab {
    pub const ALL: [PackageFilterTab; 5] = [
        PackageFilterTab::InProject,
        PackageFilterTab::All,
        PackageFilterTab::BuiltIn,
        PackageFilterTab::AssetStore,
        PackageFilterTab::InDevelopment,
    ];

    /// Name the tab is stored under.
    pub fn name(self) -> &'static str {
        match self {
            PackageFilterTab::InProject => "InProject",
            PackageFilterTab::All => "All",
            PackageFilterTab::BuiltIn => "BuiltIn",
            PackageFilterTab::AssetStore => "AssetStore",
            PackageFilterTab::InDevelopment => "InDevelopment",
        }
    }
}

impl fmt::Display for PackageFilterTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown package filter tab '{0}'")]
pub struct ParseFilterTabError(pub String);

impl FromStr for PackageFilterTab {
    type Err = ParseFilterTabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PackageFilterTab::ALL
            .into_iter()
            .find(|tab| tab.name() == s)
            .ok_or_else(|| ParseFilterTabError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back_to_their_tab() {
        for tab in PackageFilterTab::ALL {
            assert_eq!(tab.to_string().parse::<PackageFilterTab>(), Ok(tab));
        }
    }

    #[test]
    fn parsing_is_exact() {
        assert!("inproject".parse::<PackageFilterTab>().is_err());
        assert!(" All".parse::<PackageFilterTab>().is_err());
        assert!("".parse::<PackageFilterTab>().is_err());
        assert_eq!(
            "Modules".parse::<PackageFilterTab>(),
            Err(ParseFilterTabError("Modules".to_string()))
        );
    }

    #[test]
    fn default_is_in_project() {
        assert_eq!(PackageFilterTab::default(), PackageFilterTab::InProject);
    }
}
