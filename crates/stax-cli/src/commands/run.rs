//! Run command - execute Stax program files

use crate::logging;
use anyhow::{Context, Result};
use stax_config::{Config, ConfigLoader, ErrorStream};
use stax_runtime::{report_fatal, FatalError, Interpreter, Program, Termination};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

/// Arguments for `stax run`
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub file: PathBuf,
    pub config: Option<PathBuf>,
    pub verbose: bool,
}

/// Run a Stax program file against the process stdin and stdout.
///
/// A fatal program error is reported, not returned: the report goes to the
/// configured stream and the process exits with the configured code.
pub fn run(args: &RunArgs) -> Result<ExitCode> {
    let source = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read program file: {}", args.file.display()))?;

    let config = load_config(args)?;
    let directive = logging::filter_directive(config.log_level(), args.verbose);
    logging::init(directive.as_deref())?;
    if let Some(path) = &config.project_file {
        tracing::debug!(config = %path.display(), "loaded project config");
    }

    let program = Program::from_source(&source);
    let lines = program.len();
    let start = Instant::now();

    let outcome = {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut interpreter = Interpreter::new(program, stdin.lock(), stdout.lock());
        interpreter.run()
    };
    let elapsed = start.elapsed();

    let code = match outcome {
        Ok(termination) => {
            if args.verbose {
                let how = match termination {
                    Termination::EndOfProgram => "Completed".to_string(),
                    Termination::Halted { line } => format!("Halted at line {}", line),
                };
                eprintln!(
                    "\n[stax] {} {} lines in {:.2}ms",
                    how,
                    lines,
                    elapsed.as_secs_f64() * 1000.0
                );
            }
            ExitCode::SUCCESS
        }
        Err(fatal) => {
            write_report(&fatal, config.error_stream())?;
            if args.verbose {
                eprintln!(
                    "\n[stax] Failed ({:?}) in {:.2}ms",
                    fatal.kind(),
                    elapsed.as_secs_f64() * 1000.0
                );
            }
            fatal_exit_code(&config)?
        }
    };

    Ok(code)
}

fn load_config(args: &RunArgs) -> Result<Config> {
    let loader = ConfigLoader::new();
    match &args.config {
        Some(path) => loader
            .load_from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => {
            let dir = program_dir(&args.file);
            loader
                .load_from_directory(&dir)
                .with_context(|| format!("Failed to load config for {}", args.file.display()))
        }
    }
}

/// Directory used as the starting point of the `stax.toml` search
fn program_dir(file: &Path) -> PathBuf {
    fs::canonicalize(file)
        .ok()
        .and_then(|path| path.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn write_report(fatal: &FatalError, stream: ErrorStream) -> Result<()> {
    let report = report_fatal(fatal);
    match stream {
        ErrorStream::Stdout => {
            let mut out = io::stdout().lock();
            out.write_all(report.as_bytes())
                .and_then(|_| out.flush())
                .context("Failed to write error report")?;
        }
        ErrorStream::Stderr => {
            io::stdout().flush().context("Failed to flush stdout")?;
            let mut err = io::stderr().lock();
            err.write_all(report.as_bytes())
                .context("Failed to write error report")?;
        }
    }
    Ok(())
}

fn fatal_exit_code(config: &Config) -> Result<ExitCode> {
    let code = u8::try_from(config.fatal_exit_code())
        .context("Fatal exit code must be between 0 and 255")?;
    Ok(ExitCode::from(code))
}
