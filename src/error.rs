//! Error types for cnbkit
//!
//! All modules use `KitResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cnbkit operations
pub type KitResult<T> = Result<T, KitError>;

/// All errors that can occur in cnbkit
#[derive(Error, Debug)]
pub enum KitError {
    // Layer errors
    #[error("Invalid layer name '{name}': {reason}")]
    LayerNameInvalid { name: String, reason: String },

    #[error("Invalid layer descriptor at {path}: {reason}")]
    DescriptorInvalid { path: PathBuf, reason: String },

    // Dependency errors
    #[error("Invalid version '{version}': {reason}")]
    VersionInvalid { version: String, reason: String },

    #[error("Fixture not found: {0}")]
    FixtureNotFound(PathBuf),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("{0}")]
    User(String),
}

impl KitError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid layer name error
    pub fn layer_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LayerNameInvalid {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Whether the underlying cause is a missing file or directory
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            Self::FixtureNotFound(_) => true,
            _ => false,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::LayerNameInvalid { .. } => {
                Some("Layer names may not be empty, contain '/' or '..', or be 'launch'/'store'")
            }
            Self::FixtureNotFound(_) => {
                Some("Fixture paths are resolved relative to the test's working directory")
            }
            Self::ConfigInvalid { .. } => Some("Run: cnbkit config path  to locate the file"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = KitError::layer_name("../x", "must not contain '..'");
        assert_eq!(
            err.to_string(),
            "Invalid layer name '../x': must not contain '..'"
        );
    }

    #[test]
    fn error_hint() {
        let err = KitError::FixtureNotFound(PathBuf::from("missing.tgz"));
        assert!(err.hint().is_some());
        assert!(KitError::User("x".into()).hint().is_none());
    }

    #[test]
    fn not_found_detection() {
        let err = KitError::io(
            "reading descriptor",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.is_not_found());

        let err = KitError::io(
            "reading descriptor",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"),
        );
        assert!(!err.is_not_found());
    }
}
