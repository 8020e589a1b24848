//! Shared test utilities
//!
//! Helpers for running Stax programs from source text and asserting on
//! what they print.

#![allow(dead_code)]

use stax_runtime::{ErrorKind, Execution, Stax};

// Re-export testing utilities
pub use pretty_assertions::{assert_eq, assert_ne};

/// Join instruction lines into program source
pub fn program(lines: &[&str]) -> String {
    lines.join("\n")
}

/// Run a program with no input
pub fn run(lines: &[&str]) -> Execution {
    Stax::new().eval(&program(lines))
}

/// Run a program with the given stdin text
pub fn run_with_input(lines: &[&str], input: &str) -> Execution {
    Stax::new().with_input(input).eval(&program(lines))
}

/// Assert that a program completes and prints exactly `expected`
///
/// # Example
/// ```
/// assert_output(&["PUSH_NUM 1", "OUTPUT"], "1\n");
/// ```
pub fn assert_output(lines: &[&str], expected: &str) {
    let execution = run(lines);
    match &execution.outcome {
        Ok(_) => assert_eq!(execution.stdout, expected),
        Err(fatal) => panic!("Expected success, got fatal error: {}", fatal),
    }
}

/// Assert that a program fails with `message` on `line`
pub fn assert_fatal(lines: &[&str], message: &str, line: usize) -> Execution {
    let execution = run(lines);
    match &execution.outcome {
        Err(fatal) => {
            assert_eq!(fatal.error.to_string(), message);
            assert_eq!(fatal.line, line, "wrong line for {:?}", message);
        }
        Ok(termination) => panic!(
            "Expected fatal error {:?}, got {:?} with output {:?}",
            message, termination, execution.stdout
        ),
    }
    execution
}

/// Assert the category of a program's fatal error
pub fn assert_fatal_kind(lines: &[&str], kind: ErrorKind) {
    let execution = run(lines);
    match execution.outcome {
        Err(fatal) => assert_eq!(fatal.kind(), kind, "for error: {}", fatal),
        Ok(termination) => panic!("Expected {:?} error, got {:?}", kind, termination),
    }
}
