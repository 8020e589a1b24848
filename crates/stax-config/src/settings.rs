//! Configuration file schema
//!
//! Both `stax.toml` and `~/.stax/config.toml` use this schema:
//!
//! ```toml
//! [run]
//! fatal-exit-code = 0
//! error-stream = "stdout"
//!
//! [log]
//! level = "warn"
//! ```

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Contents of one configuration file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Program execution settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<RunSettings>,

    /// Diagnostic logging settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<LogSettings>,
}

/// `[run]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct RunSettings {
    /// Process exit code after a fatal program error (default: 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fatal_exit_code: Option<i32>,

    /// Where the fatal error report is written (default: stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_stream: Option<ErrorStream>,
}

/// `[log]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct LogSettings {
    /// Filter directive, e.g. "debug" or "stax_runtime=trace"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

/// Output stream for the fatal error report
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ErrorStream {
    #[default]
    Stdout,
    Stderr,
}

impl FromStr for ErrorStream {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stdout" => Ok(ErrorStream::Stdout),
            "stderr" => Ok(ErrorStream::Stderr),
            other => Err(ConfigError::InvalidValue {
                field: "run.error-stream".to_string(),
                reason: format!("must be 'stdout' or 'stderr', got '{}'", other),
            }),
        }
    }
}

impl fmt::Display for ErrorStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorStream::Stdout => f.write_str("stdout"),
            ErrorStream::Stderr => f.write_str("stderr"),
        }
    }
}

impl Settings {
    /// Load settings from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let settings: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate setting values
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(code) = self.fatal_exit_code() {
            validate_exit_code("run.fatal-exit-code", code)?;
        }

        if let Some(level) = self.log_level() {
            if level.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "log.level".to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn fatal_exit_code(&self) -> Option<i32> {
        self.run.as_ref().and_then(|r| r.fatal_exit_code)
    }

    pub fn error_stream(&self) -> Option<ErrorStream> {
        self.run.as_ref().and_then(|r| r.error_stream)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.log.as_ref().and_then(|l| l.level.as_deref())
    }

    /// Merge another settings file into this one.
    /// Values set in `other` take precedence, key by key.
    pub fn merge(&mut self, other: &Settings) {
        if let Some(other_run) = &other.run {
            let run = self.run.get_or_insert_with(RunSettings::default);
            if other_run.fatal_exit_code.is_some() {
                run.fatal_exit_code = other_run.fatal_exit_code;
            }
            if other_run.error_stream.is_some() {
                run.error_stream = other_run.error_stream;
            }
        }
        if let Some(other_log) = &other.log {
            let log = self.log.get_or_insert_with(LogSettings::default);
            if other_log.level.is_some() {
                log.level = other_log.level.clone();
            }
        }
    }
}

/// Exit codes must fit the portable 0-255 range
pub(crate) fn validate_exit_code(field: &str, code: i32) -> ConfigResult<()> {
    if !(0..=255).contains(&code) {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("must be between 0 and 255, got {}", code),
        });
    }
    Ok(())
}
