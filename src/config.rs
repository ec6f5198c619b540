//! Configuration management for the fraud report pipeline

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Classifier model configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the exported ONNX classifier
    #[serde(default = "default_model_path")]
    pub path: PathBuf,
    /// Fraud probability at or above which a row is labelled fraud
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_intra_threads")]
    pub intra_threads: usize,
}

fn default_model_path() -> PathBuf {
    PathBuf::from("models/fraud_detection.onnx")
}

fn default_threshold() -> f64 {
    0.5
}

fn default_intra_threads() -> usize {
    1
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            threshold: default_threshold(),
            intra_threads: default_intra_threads(),
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Heading printed on the first page
    #[serde(default = "default_title")]
    pub title: String,
    /// Suggested filename for single-transaction reports
    #[serde(default = "default_single_filename")]
    pub single_filename: String,
    /// Suggested filename for bulk reports
    #[serde(default = "default_batch_filename")]
    pub batch_filename: String,
    /// Labelled rows echoed to the terminal after a bulk run
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
    /// Print a generation timestamp under the title
    #[serde(default = "default_timestamp")]
    pub timestamp: bool,
}

fn default_title() -> String {
    "Fraud Detection Report".to_string()
}

fn default_single_filename() -> String {
    "fraud_report.pdf".to_string()
}

fn default_batch_filename() -> String {
    "fraud_predictions.pdf".to_string()
}

fn default_preview_rows() -> usize {
    20
}

fn default_timestamp() -> bool {
    true
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            single_filename: default_single_filename(),
            batch_filename: default_batch_filename(),
            preview_rows: default_preview_rows(),
            timestamp: default_timestamp(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_level")]
    pub level: String,
    /// Log format (json, pretty)
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

impl AppConfig {
    /// Default configuration file location
    pub const DEFAULT_PATH: &'static str = "config/config.toml";

    /// Load configuration from the default file
    pub fn load() -> Result<Self> {
        Self::load_from_path(Self::DEFAULT_PATH)
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Load `path` when it exists, otherwise fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        let path = path.as_ref();
        if path.exists() {
            Ok((Self::load_from_path(path)?, true))
        } else {
            Ok((Self::default(), false))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.model.threshold, 0.5);
        assert_eq!(config.model.intra_threads, 1);
        assert_eq!(config.report.title, "Fraud Detection Report");
        assert_eq!(config.report.single_filename, "fraud_report.pdf");
        assert_eq!(config.report.batch_filename, "fraud_predictions.pdf");
        assert_eq!(config.report.preview_rows, 20);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[model]\nthreshold = 0.61\n\n[report]\ntitle = \"Weekly Review\"").unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.model.threshold, 0.61);
        assert_eq!(config.model.intra_threads, 1);
        assert_eq!(config.report.title, "Weekly Review");
        assert_eq!(config.report.batch_filename, "fraud_predictions.pdf");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, loaded) = AppConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert!(!loaded);
        assert_eq!(config.report.preview_rows, 20);
    }
}
