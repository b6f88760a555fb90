//! `DangConfig`: the ambient configuration layer every teacher crate that
//! touches user-facing behaviour carries (spec.md is silent on config, but
//! the expansion in SPEC_FULL.md adds it regardless). Shape follows
//! `codex_dashflow_core::config::Config` — a `serde`-derived struct with
//! per-field defaults, loaded from `~/.config/dang/config.toml` via
//! `dirs::config_dir` — except the error type is `thiserror`, not the
//! teacher's hand-written `Display`/`Error` impls, to stay consistent with
//! every other error enum in this workspace.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

fn default_too_fast_threshold_ms() -> u64 {
    50
}

fn default_gc_threshold_secs() -> u64 {
    300
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DangConfig {
    /// Spans faster than this are rendered with the "cached" glyph instead
    /// of a duration (spec.md §4.8's `TooFastThreshold`).
    #[serde(default = "default_too_fast_threshold_ms")]
    pub too_fast_threshold_ms: u64,

    /// Spans with no activity for this long are garbage-collected from the
    /// span DB (spec.md §4.8's `GcThreshold`).
    #[serde(default = "default_gc_threshold_secs")]
    pub gc_threshold_secs: u64,

    /// Overrides the directory the history file lives in (default
    /// `$XDG_DATA_HOME/dang`, so the file itself defaults to
    /// `~/.local/share/dang/history`).
    #[serde(default)]
    pub history_path: Option<PathBuf>,

    #[serde(default)]
    pub debug: bool,
}

impl Default for DangConfig {
    fn default() -> Self {
        Self {
            too_fast_threshold_ms: default_too_fast_threshold_ms(),
            gc_threshold_secs: default_gc_threshold_secs(),
            history_path: None,
            debug: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("failed to read config from {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl DangConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_config_path()?;
        if path.exists() {
            Self::load_from_path(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io { path: path.to_path_buf(), source: e })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("dang").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_spec_thresholds() {
        let config = DangConfig::default();
        assert_eq!(config.too_fast_threshold_ms, 50);
        assert_eq!(config.gc_threshold_secs, 300);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = DangConfig::from_toml("debug = true").unwrap();
        assert!(config.debug);
        assert_eq!(config.too_fast_threshold_ms, 50);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(DangConfig::from_toml("not valid = = toml"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_from_missing_path_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(DangConfig::load_from_path(&missing), Err(ConfigError::Io { .. })));
    }
}
