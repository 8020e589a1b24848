//! Diagnostic logging setup
//!
//! Logs go to stderr so program output on stdout stays byte-exact.

use anyhow::{Context, Result};
use std::sync::Once;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Pick the filter directive.
///
/// `STAX_LOG` wins, then `RUST_LOG`, then the config file, then `--verbose`.
/// `None` means no subscriber is installed.
pub fn filter_directive(config_level: Option<&str>, verbose: bool) -> Option<String> {
    let from_env = |name: &str| {
        std::env::var(name)
            .ok()
            .filter(|value| !value.trim().is_empty())
    };

    from_env(stax_config::loader::ENV_LOG)
        .or_else(|| from_env("RUST_LOG"))
        .or_else(|| config_level.map(str::to_string))
        .or_else(|| verbose.then(|| "debug".to_string()))
}

/// Install the stderr subscriber once per process
pub fn init(directive: Option<&str>) -> Result<()> {
    let Some(directive) = directive else {
        return Ok(());
    };
    let filter = EnvFilter::try_new(directive)
        .with_context(|| format!("Invalid log filter: {}", directive))?;

    INIT.call_once(|| {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(filter)
            .init();
    });
    Ok(())
}
