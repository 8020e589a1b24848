//! Stax runtime API for embedding
//!
//! Runs a program held in memory against in-memory input and captures
//! everything it prints. The CLI drives [`Interpreter`] directly over the
//! process streams; this wrapper exists for hosts and tests that want the
//! output as a string.

use crate::interpreter::{FatalError, Interpreter, Termination};
use crate::program::Program;
use std::io::Cursor;

/// Format a fatal error the way the command line reports it: a leading
/// newline, the message with its line number, and a closing newline.
pub fn report_fatal(error: &FatalError) -> String {
    format!("\n{}\n", error)
}

/// Outcome of one captured run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// Everything the program wrote, including the end-of-program newline
    pub stdout: String,
    pub outcome: Result<Termination, FatalError>,
}

impl Execution {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Program output followed by the fatal report, if any
    pub fn transcript(&self) -> String {
        match &self.outcome {
            Ok(_) => self.stdout.clone(),
            Err(fatal) => format!("{}{}", self.stdout, report_fatal(fatal)),
        }
    }
}

/// Stax runtime instance
///
/// # Examples
///
/// ```
/// use stax_runtime::Stax;
///
/// let runtime = Stax::new();
/// let execution = runtime.eval("PUSH_NUM 5\nPUSH_NUM 3\nADD\nOUTPUT");
/// assert_eq!(execution.stdout, "8\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Stax {
    /// Text served to ACQUIRE_INPUT, one line per read
    input: String,
}

impl Stax {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provide the text ACQUIRE_INPUT will read from
    ///
    /// # Examples
    ///
    /// ```
    /// use stax_runtime::Stax;
    ///
    /// let execution = Stax::new()
    ///     .with_input("dlrow\n")
    ///     .eval("ACQUIRE_INPUT\nREVERSE\nOUTPUT");
    /// assert_eq!(execution.stdout, "world\n");
    /// ```
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self
    }

    /// Run program source text and capture its output
    pub fn eval(&self, source: &str) -> Execution {
        self.run(Program::from_source(source))
    }

    /// Run an already-loaded program and capture its output
    pub fn run(&self, program: Program) -> Execution {
        let mut buffer = Vec::new();
        let outcome = {
            let mut interpreter =
                Interpreter::new(program, Cursor::new(self.input.as_bytes()), &mut buffer);
            interpreter.run()
        };

        Execution {
            stdout: String::from_utf8_lossy(&buffer).into_owned(),
            outcome,
        }
    }
}
