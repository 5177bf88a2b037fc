use thiserror::Error;

/// Errors raised while opening, reading or writing preferences.
#[derive(Debug, Error)]
pub enum PrefsError {
    /// Another store already owns this location in the current process.
    #[error("preferences at '{0}' are already loaded")]
    InstanceAlreadyLoaded(String),

    /// The stored file exists but is not a valid preferences table.
    #[error("failed to parse preferences at '{0}': {1}")]
    Deserialization(String, #[source] toml::de::Error),

    #[error("failed to serialize preferences: {0}")]
    Serialization(#[from] toml::ser::Error),

    /// Underlying read or write failed.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// No platform configuration directory could be resolved for the namespace.
    #[error("no configuration directory for namespace '{0}'")]
    NoConfigDir(String),

    #[error("project identifier must not be empty")]
    InvalidProjectId,
}
