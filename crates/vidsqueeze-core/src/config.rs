// crates/vidsqueeze-core/src/config.rs
//
// CaptureConfig: knobs of the capture pipeline, loaded from JSON.
//
// Environment:
//   VIDSQUEEZE_CONFIG  path to a JSON file; unset → defaults
//
// Bitrate and output container are fixed (see media_types) and deliberately
// not part of the config.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::media_types::Dimensions;

pub const CONFIG_ENV: &str = "VIDSQUEEZE_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("failed to parse config file {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How fast the capture thread consumes decoded frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pacing {
    /// No faster than the source plays, like a real playback surface.
    #[default]
    Realtime,
    /// As fast as decoding allows. The output timeline is unchanged.
    Unthrottled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptureConfig {
    pub pacing:         Pacing,
    /// Seconds of playback between emitted chunks.
    pub timeslice_secs: f64,
    /// Output size override applied to every selected asset.
    pub target_size:    Option<Dimensions>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            pacing:         Pacing::Realtime,
            timeslice_secs: 1.0,
            target_size:    None,
        }
    }
}

impl CaptureConfig {
    /// Read and validate a JSON config file. Missing fields take defaults.
    ///
    /// ```json
    /// { "pacing": "unthrottled", "timeslice_secs": 0.5,
    ///   "target_size": { "width": 640, "height": 360 } }
    /// ```
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: CaptureConfig = serde_json::from_str(&text).map_err(|source| {
            ConfigError::Parse { path: path.to_path_buf(), source }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// `load($VIDSQUEEZE_CONFIG)`, or defaults when the variable is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::load(Path::new(&path)),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.timeslice_secs.is_finite() || self.timeslice_secs <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "timeslice_secs must be > 0 (got {})", self.timeslice_secs
            )));
        }
        if let Some(size) = self.target_size {
            if !size.is_valid() {
                return Err(ConfigError::Invalid(format!(
                    "target_size must be non-zero (got {size})"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(text: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(text.as_bytes()).unwrap();
        f
    }

    #[test]
    fn empty_object_gives_defaults() {
        let f = write_config("{}");
        assert_eq!(CaptureConfig::load(f.path()).unwrap(), CaptureConfig::default());
    }

    #[test]
    fn full_file_parses() {
        let f = write_config(
            r#"{ "pacing": "unthrottled", "timeslice_secs": 0.25,
                 "target_size": { "width": 640, "height": 360 } }"#,
        );
        let cfg = CaptureConfig::load(f.path()).unwrap();
        assert_eq!(cfg.pacing, Pacing::Unthrottled);
        assert_eq!(cfg.timeslice_secs, 0.25);
        assert_eq!(cfg.target_size, Some(Dimensions::new(640, 360)));
    }

    #[test]
    fn bad_values_are_rejected() {
        let f = write_config(r#"{ "timeslice_secs": 0 }"#);
        assert!(matches!(CaptureConfig::load(f.path()), Err(ConfigError::Invalid(_))));

        let f = write_config(r#"{ "target_size": { "width": 0, "height": 360 } }"#);
        assert!(matches!(CaptureConfig::load(f.path()), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn unknown_fields_and_bad_json_fail_to_parse() {
        let f = write_config(r#"{ "bitrate": 5000000 }"#);
        assert!(matches!(CaptureConfig::load(f.path()), Err(ConfigError::Parse { .. })));
        let f = write_config("not json");
        assert!(matches!(CaptureConfig::load(f.path()), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = CaptureConfig::load(Path::new("/nonexistent/vidsqueeze.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
