//! Selection policy: which entries the configured extension filter covers.

use std::collections::HashSet;
use std::path::Path;

use crate::core::errors::{DswError, Result};

/// The universal filter marker.
pub const WILDCARD: &str = "*";

/// Parsed extension filter.
///
/// Either the universal wildcard, or a non-empty set of lowercase,
/// dot-stripped extension strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionFilter {
    Wildcard,
    Extensions(HashSet<String>),
}

impl ExtensionFilter {
    /// Parse a raw filter string: `"*"` or a comma-separated list.
    ///
    /// Entries are trimmed, lowercased, and stripped of leading dots; empty
    /// entries are dropped. A list that normalizes to nothing is rejected —
    /// a filter that can never match would silently make every run a no-op.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed == WILDCARD {
            return Ok(Self::Wildcard);
        }

        let mut extensions = HashSet::new();
        for part in trimmed.split(',') {
            let normalized = part.trim().to_lowercase();
            let normalized = normalized.trim_start_matches('.');
            if normalized == WILDCARD {
                return Ok(Self::Wildcard);
            }
            if !normalized.is_empty() {
                extensions.insert(normalized.to_string());
            }
        }

        if extensions.is_empty() {
            return Err(DswError::InvalidConfig {
                details: format!("extension filter matches nothing: {raw:?}"),
            });
        }
        Ok(Self::Extensions(extensions))
    }

    /// Whether this is the universal filter.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }

    /// Whether the filter covers this path's extension.
    ///
    /// Matching is case-insensitive and uses only the final suffix;
    /// extensionless names normalize to the empty string and never match a
    /// specific filter.
    pub fn matches(&self, path: &Path) -> bool {
        match self {
            Self::Wildcard => true,
            Self::Extensions(set) => set.contains(&extension_of(path)),
        }
    }
}

/// Final-suffix extension of a path, lowercased, without the dot.
/// Paths without an extension yield the empty string.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
