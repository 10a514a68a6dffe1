//! DSW-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, DswError>;

/// Top-level error type for dirsweep.
#[derive(Debug, Error)]
pub enum DswError {
    #[error("[DSW-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[DSW-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[DSW-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[DSW-1004] no target roots configured")]
    NoTargetRoots,

    #[error("[DSW-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[DSW-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[DSW-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl DswError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "DSW-1001",
            Self::MissingConfig { .. } => "DSW-1002",
            Self::ConfigParse { .. } => "DSW-1003",
            Self::NoTargetRoots => "DSW-1004",
            Self::Serialization { .. } => "DSW-2101",
            Self::Io { .. } => "DSW-3002",
            Self::Runtime { .. } => "DSW-3900",
        }
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for DswError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for DswError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_unique() {
        let errors: Vec<DswError> = vec![
            DswError::InvalidConfig {
                details: String::new(),
            },
            DswError::MissingConfig {
                path: PathBuf::new(),
            },
            DswError::ConfigParse {
                context: "",
                details: String::new(),
            },
            DswError::NoTargetRoots,
            DswError::Serialization {
                context: "",
                details: String::new(),
            },
            DswError::Io {
                path: PathBuf::new(),
                source: std::io::Error::other("test"),
            },
            DswError::Runtime {
                details: String::new(),
            },
        ];

        let codes: Vec<&str> = errors.iter().map(DswError::code).collect();
        let unique: std::collections::HashSet<&&str> = codes.iter().collect();
        assert_eq!(
            codes.len(),
            unique.len(),
            "error codes must be unique: {codes:?}"
        );
    }

    #[test]
    fn error_display_includes_code() {
        let err = DswError::InvalidConfig {
            details: "bad value".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("DSW-1001"), "display missing code: {msg}");
        assert!(msg.contains("bad value"), "display missing details: {msg}");
    }

    #[test]
    fn io_convenience_constructor() {
        let err = DswError::io(
            "/tmp/test.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.code(), "DSW-3002");
        assert!(err.to_string().contains("/tmp/test.txt"));
    }

    #[test]
    fn from_toml_error() {
        let toml_err = toml::from_str::<toml::Value>("= invalid").unwrap_err();
        let err: DswError = toml_err.into();
        assert_eq!(err.code(), "DSW-1003");
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: DswError = json_err.into();
        assert_eq!(err.code(), "DSW-2101");
    }
}
