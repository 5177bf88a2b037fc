use std::fmt;
use std::str::FromStr;

use crate::PrefsError;

/// Stable identifier of the project preferences are scoped to.
///
/// Several projects may share one user-level store; every per-project key is
/// suffixed with this identifier so their values never mix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Result<Self, PrefsError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(PrefsError::InvalidProjectId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `prefix` followed by this identifier.
    pub fn scoped_key(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.0)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProjectId {
    type Err = PrefsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ProjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_identifiers_are_rejected() {
        assert!(matches!(ProjectId::new(""), Err(PrefsError::InvalidProjectId)));
        assert!(matches!("  ".parse::<ProjectId>(), Err(PrefsError::InvalidProjectId)));
    }

    #[test]
    fn scoped_key_appends_identifier() {
        let id = ProjectId::new("6f1c2a").unwrap();
        assert_eq!(id.scoped_key("PackageManager.Filter_"), "PackageManager.Filter_6f1c2a");
        assert_eq!(id.to_string(), "6f1c2a");
    }
}
