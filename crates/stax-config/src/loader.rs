//! Configuration loader with hierarchy support
//!
//! Loads configuration from multiple sources and merges them by precedence:
//! global file, then project file, then `STAX_*` environment variables.
//! Command line flags are applied on top by the caller.

use crate::settings::{validate_exit_code, ErrorStream, LogSettings, RunSettings, Settings};
use crate::{ConfigError, ConfigResult, PROJECT_CONFIG_FILE};
use std::path::{Path, PathBuf};

/// Environment variable overriding `run.fatal-exit-code`
pub const ENV_FATAL_EXIT_CODE: &str = "STAX_FATAL_EXIT_CODE";
/// Environment variable overriding `run.error-stream`
pub const ENV_ERROR_STREAM: &str = "STAX_ERROR_STREAM";
/// Environment variable overriding `log.level`
pub const ENV_LOG: &str = "STAX_LOG";

/// Resolved configuration for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Merged settings from every source
    pub settings: Settings,

    /// Project config file that contributed, if one was found
    pub project_file: Option<PathBuf>,

    /// Global config file that contributed, if one was found
    pub global_file: Option<PathBuf>,
}

impl Config {
    /// Process exit code after a fatal program error
    pub fn fatal_exit_code(&self) -> i32 {
        self.settings.fatal_exit_code().unwrap_or(0)
    }

    /// Stream the fatal error report is written to
    pub fn error_stream(&self) -> ErrorStream {
        self.settings.error_stream().unwrap_or_default()
    }

    /// Log filter directive, if any source set one
    pub fn log_level(&self) -> Option<&str> {
        self.settings.log_level()
    }
}

/// Where the loader looks for the global config file
#[derive(Debug, Clone)]
enum GlobalSource {
    /// `~/.stax/config.toml`
    Home,
    /// An explicit path, used by tests and tooling
    Path(PathBuf),
    /// No global config
    Disabled,
}

/// Configuration loader
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    global: GlobalSource,
    read_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader reading the home-directory global config and the environment
    pub fn new() -> Self {
        Self {
            global: GlobalSource::Home,
            read_env: true,
        }
    }

    /// Use a specific global config path instead of `~/.stax/config.toml`
    pub fn with_global_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.global = GlobalSource::Path(path.into());
        self
    }

    /// Skip the global config entirely
    pub fn without_global_config(mut self) -> Self {
        self.global = GlobalSource::Disabled;
        self
    }

    /// Skip `STAX_*` environment overrides
    pub fn without_env(mut self) -> Self {
        self.read_env = false;
        self
    }

    /// Load configuration for a program living in `dir`.
    ///
    /// Walks up from `dir` looking for `stax.toml`; a missing project file
    /// is not an error.
    pub fn load_from_directory(&self, dir: &Path) -> ConfigResult<Config> {
        let project_file = find_project_config(dir);
        self.load(project_file)
    }

    /// Load configuration with an explicitly chosen project file.
    ///
    /// Unlike directory discovery, the file must exist.
    pub fn load_from_file(&self, path: &Path) -> ConfigResult<Config> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        self.load(Some(path.to_path_buf()))
    }

    fn load(&self, project_file: Option<PathBuf>) -> ConfigResult<Config> {
        let mut config = Config::default();

        if let Some(global_path) = self.global_config_path()? {
            if global_path.is_file() {
                config.settings = Settings::load_from_file(&global_path)?;
                config.global_file = Some(global_path);
            }
        }

        if let Some(path) = project_file {
            let project = Settings::load_from_file(&path)?;
            config.settings.merge(&project);
            config.project_file = Some(path);
        }

        if self.read_env {
            apply_env_overrides(&mut config.settings)?;
        }

        Ok(config)
    }

    fn global_config_path(&self) -> ConfigResult<Option<PathBuf>> {
        match &self.global {
            GlobalSource::Home => global_config_path().map(Some),
            GlobalSource::Path(path) => Ok(Some(path.clone())),
            GlobalSource::Disabled => Ok(None),
        }
    }
}

/// Get the global configuration file path (`~/.stax/config.toml`)
pub fn global_config_path() -> ConfigResult<PathBuf> {
    let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
    Ok(home.join(".stax").join("config.toml"))
}

/// Find `stax.toml` in `start` or any parent directory
pub fn find_project_config(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        let candidate = dir.join(PROJECT_CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        current = dir.parent();
    }
    None
}

/// Apply `STAX_*` environment variable overrides
fn apply_env_overrides(settings: &mut Settings) -> ConfigResult<()> {
    let mut overrides = Settings::default();

    if let Ok(raw) = std::env::var(ENV_FATAL_EXIT_CODE) {
        let code = raw
            .trim()
            .parse::<i32>()
            .map_err(|_| ConfigError::InvalidValue {
                field: ENV_FATAL_EXIT_CODE.to_string(),
                reason: format!("expected an integer, got '{}'", raw),
            })?;
        validate_exit_code(ENV_FATAL_EXIT_CODE, code)?;
        overrides
            .run
            .get_or_insert_with(RunSettings::default)
            .fatal_exit_code = Some(code);
    }

    if let Ok(raw) = std::env::var(ENV_ERROR_STREAM) {
        let stream = raw.trim().parse::<ErrorStream>()?;
        overrides
            .run
            .get_or_insert_with(RunSettings::default)
            .error_stream = Some(stream);
    }

    if let Ok(level) = std::env::var(ENV_LOG) {
        if !level.trim().is_empty() {
            overrides.log = Some(LogSettings { level: Some(level) });
        }
    }

    settings.merge(&overrides);
    Ok(())
}
