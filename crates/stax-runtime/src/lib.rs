//! Stax Runtime - line-oriented stack machine
//!
//! This library provides the Stax execution engine:
//! - Program loading (one instruction per line)
//! - Per-line instruction decoding
//! - The value stack and variable table
//! - The dispatch loop and its error model
//! - An embedding API that captures program output

/// Stax runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod instruction;
pub mod interpreter;
pub mod program;
pub mod runtime;
pub mod stack;
pub mod value;
pub mod variables;

// Re-export commonly used types
pub use instruction::{Instruction, Opcode};
pub use interpreter::{FatalError, Interpreter, Termination};
pub use program::Program;
pub use runtime::{report_fatal, Execution, Stax};
pub use stack::Stack;
pub use value::{ErrorKind, RuntimeError, Value};
pub use variables::Variables;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoke() {
        assert_eq!(VERSION, "0.1.0");
    }
}
