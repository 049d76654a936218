#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for mhlcheck
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/mhlcheck/config.toml)
//! - Environment variables
//! - CLI flags

use mhlcheck_errors::{ConfigError, Error};
use mhlcheck_types::{ColorChoice, HashType, OutputFormat, ToolExitCode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub oracle: OracleConfig,

    #[serde(default)]
    pub exit_codes: ExitCodeConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    #[serde(default = "default_color_choice")]
    pub color: ColorChoice,
}

/// How verdicts are reached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    #[serde(default = "default_true")]
    pub strict_completeness: bool,
    #[serde(default = "default_true")]
    pub case_insensitive_hashtype: bool,
    /// Hash families the reference hasher computes when none are given
    #[serde(default = "default_hash_types")]
    pub default_hash_types: Vec<HashType>,
}

/// Exit codes of the tool under test that differ from the standard table
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ExitCodeConfig {
    pub size_mismatch: Option<i32>,
    pub hash_mismatch: Option<i32>,
    pub no_such_file: Option<i32>,
    pub invalid_sequence: Option<i32>,
    pub gap_in_sequence: Option<i32>,
}

impl ExitCodeConfig {
    /// Configured overrides as (standard code, replacement) pairs
    #[must_use]
    pub fn overrides(&self) -> Vec<(ToolExitCode, i32)> {
        [
            (ToolExitCode::FileSizeMismatch, self.size_mismatch),
            (ToolExitCode::HashMismatch, self.hash_mismatch),
            (ToolExitCode::NoSuchFile, self.no_such_file),
            (ToolExitCode::InvalidSequence, self.invalid_sequence),
            (ToolExitCode::GapInSequence, self.gap_in_sequence),
        ]
        .into_iter()
        .filter_map(|(code, value)| value.map(|v| (code, v)))
        .collect()
    }
}

// Default implementations

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: OutputFormat::Tty,
            color: ColorChoice::Auto,
        }
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            strict_completeness: true,
            case_insensitive_hashtype: true,
            default_hash_types: default_hash_types(),
        }
    }
}

// Default value functions for serde
fn default_output_format() -> OutputFormat {
    OutputFormat::Tty
}

fn default_color_choice() -> ColorChoice {
    ColorChoice::Auto
}

fn default_true() -> bool {
    true
}

fn default_hash_types() -> Vec<HashType> {
    vec![HashType::Md5]
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("mhlcheck").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML,
    /// or names the `null` hash type as a default.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Reject settings that parse but cannot be honored
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `default_hash_types` is
    /// empty or contains `null`.
    pub fn validate(&self) -> Result<(), Error> {
        let types = &self.oracle.default_hash_types;
        if types.is_empty() || types.contains(&HashType::Null) {
            let value = types
                .iter()
                .map(|t| t.manifest_tag())
                .collect::<Vec<_>>()
                .join(",");
            return Err(ConfigError::InvalidValue {
                field: "oracle.default_hash_types".to_string(),
                value,
            }
            .into());
        }
        Ok(())
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // MHLCHECK_OUTPUT
        if let Ok(output) = std::env::var("MHLCHECK_OUTPUT") {
            self.general.default_output = match output.as_str() {
                "plain" => OutputFormat::Plain,
                "tty" => OutputFormat::Tty,
                "json" => OutputFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "MHLCHECK_OUTPUT".to_string(),
                        value: output,
                    }
                    .into())
                }
            };
        }

        // MHLCHECK_COLOR
        if let Ok(color) = std::env::var("MHLCHECK_COLOR") {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "MHLCHECK_COLOR".to_string(),
                        value: color,
                    }
                    .into())
                }
            };
        }

        // MHLCHECK_STRICT_COMPLETENESS
        if let Ok(strict) = std::env::var("MHLCHECK_STRICT_COMPLETENESS") {
            self.oracle.strict_completeness = match strict.as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "MHLCHECK_STRICT_COMPLETENESS".to_string(),
                        value: strict,
                    }
                    .into())
                }
            };
        }

        Ok(())
    }
}
