//! Configuration management for analysis parameters
//!
//! This module provides runtime configuration loading from JSON files so
//! the STFT geometry, rule thresholds, batch behaviour and HTTP service
//! settings can be adjusted without recompilation. Every section falls
//! back to the default analysis policy when the file is absent.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AnalysisError;

/// Environment variable naming an alternative config file
pub const CONFIG_ENV_VAR: &str = "DRUM_ANALYZER_CONFIG";

/// Default config location relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "assets/analyzer_config.json";

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub spectral: SpectralConfig,
    pub rules: RuleThresholds,
    pub batch: BatchConfig,
    pub server: ServerConfig,
}

/// Short-time Fourier transform parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectralConfig {
    /// FFT window size in samples (also the ZCR/RMS frame length)
    pub n_fft: usize,
    /// Hop size between consecutive frames
    pub hop_length: usize,
    /// Fraction of spectral magnitude used for the roll-off frequency
    pub rolloff_percent: f64,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            n_fft: 2048,
            hop_length: 512,
            rolloff_percent: 0.85,
        }
    }
}

/// Thresholds of the rule-based classifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleThresholds {
    /// Kick requires a spectral centroid strictly below this (Hz)
    pub kick_centroid_max_hz: f64,
    /// Kick requires a BASS share strictly above this (%)
    pub kick_bass_min_pct: f64,
    /// Snare requires a zero-crossing rate strictly above this
    pub snare_zcr_min: f64,
    /// Snare requires a MID share strictly above this (%)
    pub snare_mid_min_pct: f64,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            kick_centroid_max_hz: 800.0,
            kick_bass_min_pct: 40.0,
            snare_zcr_min: 0.1,
            snare_mid_min_pct: 35.0,
        }
    }
}

/// Folder scanning configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Recognized file extensions, compared case-insensitively
    pub extensions: Vec<String>,
    /// Worker threads for batch analysis (1 = sequential)
    pub jobs: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["wav".to_string(), "ogg".to_string(), "flac".to_string()],
            jobs: 1,
        }
    }
}

impl BatchConfig {
    /// Whether `path` carries one of the recognized extensions
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

/// HTTP service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory that `?path=` and `?folder=` queries are resolved against
    pub project_root: PathBuf,
    /// Maximum accepted multipart upload size in bytes
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            project_root: PathBuf::from("."),
            max_upload_bytes: 32 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// Missing sections or fields take their default values. If the file
    /// doesn't exist or the JSON is invalid, the default configuration is
    /// returned and a warning is logged.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from `$DRUM_ANALYZER_CONFIG` or the default path
    pub fn load() -> Self {
        let path = std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        if Path::new(&path).exists() {
            Self::load_from_file(path)
        } else {
            log::debug!("[Config] No config at {}, using defaults", path);
            Self::default()
        }
    }

    /// Reject parameter values the spectral front-end cannot work with
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.spectral.n_fft < 2 {
            return Err(AnalysisError::InvalidConfig {
                reason: format!("n_fft must be at least 2 (got {})", self.spectral.n_fft),
            });
        }
        if self.spectral.hop_length == 0 {
            return Err(AnalysisError::InvalidConfig {
                reason: "hop_length must be greater than 0".to_string(),
            });
        }
        let rolloff = self.spectral.rolloff_percent;
        if !(rolloff > 0.0 && rolloff <= 1.0) {
            return Err(AnalysisError::InvalidConfig {
                reason: format!("rolloff_percent must be in (0, 1] (got {})", rolloff),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.spectral.n_fft, 2048);
        assert_eq!(config.spectral.hop_length, 512);
        assert_eq!(config.spectral.rolloff_percent, 0.85);
        assert_eq!(config.rules.kick_centroid_max_hz, 800.0);
        assert_eq!(config.rules.snare_mid_min_pct, 35.0);
        assert_eq!(config.batch.jobs, 1);
        assert_eq!(config.server.port, 5000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{ "batch": { "jobs": 4 }, "rules": { "snare_zcr_min": 0.2 } }"#)
                .unwrap();

        assert_eq!(parsed.batch.jobs, 4);
        assert_eq!(parsed.batch.extensions, vec!["wav", "ogg", "flac"]);
        assert_eq!(parsed.rules.snare_zcr_min, 0.2);
        assert_eq!(parsed.rules.kick_bass_min_pct, 40.0);
        assert_eq!(parsed.spectral, SpectralConfig::default());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from_file("/definitely/not/here/config.json");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_invalid_json_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(AppConfig::load_from_file(&path), AppConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.spectral.hop_length = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.spectral.rolloff_percent = 1.5;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.spectral.n_fft = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_extension_filter_is_case_insensitive() {
        let batch = BatchConfig::default();
        assert!(batch.accepts(Path::new("kick.WAV")));
        assert!(batch.accepts(Path::new("snare.Flac")));
        assert!(batch.accepts(Path::new("hat.ogg")));
        assert!(!batch.accepts(Path::new("notes.txt")));
        assert!(!batch.accepts(Path::new("README")));
    }
}
