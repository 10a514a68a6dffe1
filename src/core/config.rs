//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::errors::{DswError, Result};
use crate::sweep::filter::ExtensionFilter;

/// Default cutoff age in hours when the configured value is missing or unusable.
pub const DEFAULT_CUTOFF_HOURS: i64 = 24;

/// Full dirsweep configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
#[derive(Default)]
pub struct Config {
    pub sweep: SweepConfig,
    pub logging: LoggingConfig,
}

/// Sweep targets and the deletion policy knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SweepConfig {
    /// Target root directories, in reporting order. Duplicates are allowed.
    pub roots: Vec<PathBuf>,
    /// Extension filter: `"*"` or a comma-separated list (`"pdf, .TXT, jpg"`).
    pub extensions: String,
    /// Files modified strictly before `run start - cutoff_hours` are stale.
    #[serde(deserialize_with = "de_cutoff_hours")]
    pub cutoff_hours: i64,
    /// Whether wildcard mode still gates file deletion on age.
    pub wildcard_checks_age: bool,
    /// Report what would be deleted without touching the filesystem.
    pub dry_run: bool,
}

/// Activity log destination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub jsonl_path: PathBuf,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            extensions: "*".to_string(),
            cutoff_hours: DEFAULT_CUTOFF_HOURS,
            wildcard_checks_age: true,
            dry_run: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let home_dir = env::var_os("HOME").map_or_else(
            || {
                eprintln!("[DSW-CONFIG] WARNING: HOME not set, falling back to /tmp for log path");
                PathBuf::from("/tmp")
            },
            PathBuf::from,
        );
        Self {
            enabled: true,
            jsonl_path: home_dir
                .join(".local")
                .join("share")
                .join("dirsweep")
                .join("activity.jsonl"),
        }
    }
}

/// Accept an integer or a numeric string; anything else falls back to the
/// default with a warning rather than failing the whole config load.
fn de_cutoff_hours<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = toml::Value::deserialize(deserializer)?;
    Ok(cutoff_from_value(&value))
}

fn cutoff_from_value(value: &toml::Value) -> i64 {
    let parsed = match value {
        toml::Value::Integer(i) => Some(*i),
        toml::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        eprintln!(
            "[DSW-CONFIG] WARNING: cutoff_hours is not an integer ({value}), using default {DEFAULT_CUTOFF_HOURS}"
        );
        DEFAULT_CUTOFF_HOURS
    })
}

impl Config {
    /// Default configuration path (`~/.config/dirsweep/config.toml`).
    #[must_use]
    pub fn default_path() -> PathBuf {
        let home_dir = env::var_os("HOME").map_or_else(|| PathBuf::from("/tmp"), PathBuf::from);
        home_dir
            .join(".config")
            .join("dirsweep")
            .join("config.toml")
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from the default path;
    /// defaults are used. An explicitly requested path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw =
                fs::read_to_string(&path_buf).map_err(|source| DswError::io(&path_buf, source))?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(DswError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.apply_env_overrides();
        cfg.normalize();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Deterministic hash of the effective config for log correlation.
    ///
    /// FNV-1a over canonical JSON for cross-process-stable hashing.
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(raw) = env::var("DSW_ROOTS") {
            let roots: Vec<PathBuf> = env::split_paths(&raw).collect();
            if !roots.is_empty() {
                self.sweep.roots = roots;
            }
        }
        if let Ok(raw) = env::var("DSW_EXTENSIONS")
            && !raw.trim().is_empty()
        {
            self.sweep.extensions = raw;
        }
        if let Ok(raw) = env::var("DSW_CUTOFF_HOURS") {
            self.sweep.cutoff_hours = raw.trim().parse::<i64>().unwrap_or_else(|_| {
                eprintln!(
                    "[DSW-CONFIG] WARNING: DSW_CUTOFF_HOURS is not an integer ({raw}), using default {DEFAULT_CUTOFF_HOURS}"
                );
                DEFAULT_CUTOFF_HOURS
            });
        }
        set_env_bool("DSW_WILDCARD_CHECKS_AGE", &mut self.sweep.wildcard_checks_age);
        set_env_bool("DSW_DRY_RUN", &mut self.sweep.dry_run);
        set_env_bool("DSW_LOG_ENABLED", &mut self.logging.enabled);
        if let Ok(raw) = env::var("DSW_LOG_PATH")
            && !raw.trim().is_empty()
        {
            self.logging.jsonl_path = PathBuf::from(raw);
        }
    }

    /// Repair recoverable misconfiguration in place, warning as it goes.
    fn normalize(&mut self) {
        if self.sweep.cutoff_hours <= 0 {
            eprintln!(
                "[DSW-CONFIG] WARNING: cutoff_hours must be positive (got {}), using default {DEFAULT_CUTOFF_HOURS}",
                self.sweep.cutoff_hours
            );
            self.sweep.cutoff_hours = DEFAULT_CUTOFF_HOURS;
        }
    }

    /// Reject configuration the engine cannot act on safely.
    fn validate(&self) -> Result<()> {
        // Surfaces an empty or whitespace-only extension list as DSW-1001.
        let _ = ExtensionFilter::parse(&self.sweep.extensions)?;
        Ok(())
    }

    /// Parsed extension filter for the configured `extensions` string.
    pub fn extension_filter(&self) -> Result<ExtensionFilter> {
        ExtensionFilter::parse(&self.sweep.extensions)
    }
}

fn set_env_bool(key: &str, target: &mut bool) {
    if let Ok(raw) = env::var(key) {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => *target = true,
            "0" | "false" | "no" | "off" => *target = false,
            other => {
                eprintln!("[DSW-CONFIG] WARNING: {key} has non-boolean value ({other}), ignoring");
            }
        }
    }
}
