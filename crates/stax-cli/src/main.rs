use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod logging;

/// Stax stack machine interpreter.
///
/// Runs line-oriented Stax programs: one instruction per line, operating on
/// a stack of integers and strings.
///
/// EXAMPLES:
///     stax run hello.stax                 Run a program
///     stax run calc.stax < numbers.txt    Feed ACQUIRE_INPUT from a file
///     stax completions bash               Print bash completions
///
/// ENVIRONMENT VARIABLES:
///     STAX_FATAL_EXIT_CODE  Exit code after a fatal program error (default 0)
///     STAX_ERROR_STREAM     'stdout' or 'stderr' for the error report
///     STAX_LOG              Log filter, e.g. 'debug' or 'stax_runtime=trace'
#[derive(Parser)]
#[command(name = "stax")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a Stax program file
    ///
    /// Executes the program against stdin and stdout. A fatal error prints
    /// "<message> at line <N>" after a blank line and stops the program.
    ///
    /// EXAMPLES:
    ///     stax run main.stax                   Run a program
    ///     stax run main.stax --verbose         Show timing and debug logs
    ///     stax run main.stax --config ci.toml  Use a specific config file
    #[command(visible_alias = "r")]
    Run {
        /// Path to the program file
        file: PathBuf,
        /// Configuration file to use instead of searching for stax.toml
        #[arg(long, short = 'c', env = "STAX_CONFIG")]
        config: Option<PathBuf>,
        /// Verbose output with timing information
        #[arg(long, short = 'v')]
        verbose: bool,
    },

    /// Generate shell completions
    ///
    /// EXAMPLES:
    ///     stax completions bash > ~/.bash_completions/stax.bash
    ///     stax completions zsh > ~/.zfunc/_stax
    ///     stax completions fish > ~/.config/fish/completions/stax.fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            file,
            config,
            verbose,
        } => {
            let args = commands::run::RunArgs {
                file,
                config,
                verbose,
            };
            commands::run::run(&args)
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    }
}
