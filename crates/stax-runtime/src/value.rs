//! Runtime value representation
//!
//! Shared value representation for the stack and the variable table.
//! - Integers: immediate 32-bit values, wrapping arithmetic
//! - Text: heap-allocated, reference-counted (Arc<String>), immutable
//!
//! Every handler matches exhaustively over [`Value`]; there is no other
//! runtime type.

use crate::instruction::Opcode;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Runtime value type
#[derive(Clone, PartialEq, Eq)]
pub enum Value {
    /// Signed 32-bit integer
    Integer(i32),
    /// String value (reference-counted, immutable)
    Text(Arc<String>),
}

impl Value {
    /// Create a new text value
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(Arc::new(s.into()))
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Text(_) => "text",
        }
    }

    /// Coerce this value to an integer.
    ///
    /// Integers pass through; text must parse as a decimal integer literal.
    pub fn to_integer(&self) -> Result<i32, RuntimeError> {
        match self {
            Value::Integer(n) => Ok(*n),
            Value::Text(s) => s.parse::<i32>().map_err(|_| RuntimeError::NotANumber {
                text: s.as_ref().clone(),
            }),
        }
    }

    /// Borrow the text of a `Text` value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            Value::Integer(_) => None,
        }
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::text(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "Integer({})", n),
            Value::Text(s) => write!(f, "Text({:?})", s.as_str()),
        }
    }
}

/// Error category, used by callers that want to react to a class of failure
/// rather than a specific message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or invalid operand, unknown opcode
    MalformedInstruction,
    /// Pop attempted with too few values on the stack
    StackUnderflow,
    /// Value of the wrong kind for the operation
    TypeMismatch,
    /// Division by zero, negative repeat count
    Arithmetic,
    /// GET_VAR on a name that was never assigned
    UndefinedVariable,
    /// Text that does not parse as an integer
    Conversion,
    /// The output sink rejected a write
    Output,
}

/// Failure of a single instruction.
///
/// The `Display` text is the message reported to the user; the dispatch loop
/// attaches the line number (see [`crate::interpreter::FatalError`]).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Unknown instruction: {name}")]
    UnknownInstruction { name: String },

    #[error("Missing {} for {opcode}", .opcode.operand_name())]
    MissingOperand { opcode: Opcode },

    #[error("Invalid number for {opcode}")]
    InvalidNumber { opcode: Opcode },

    #[error("Stack underflow encountered")]
    StackUnderflow,

    #[error("Not enough elements on the stack for {opcode}")]
    NotEnoughOperands { opcode: Opcode },

    #[error("Stack is empty, unable to set variable {name}")]
    NothingToAssign { name: String },

    #[error("Variable {name} not found")]
    UndefinedVariable { name: String },

    #[error("COMBINE can only operate on two strings or two integers")]
    CombineMismatch { first: &'static str, second: &'static str },

    #[error("Not enough elements on the stack for REVERSE_STRING")]
    NothingToReverse,

    #[error("Item for REVERSE_STRING must be a string or variable holding a string")]
    ExpectedText { found: &'static str },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Repeat count must be a positive number")]
    NegativeRepeatCount { count: i32 },

    #[error("Cannot convert string to number: {text}")]
    NotANumber { text: String },

    #[error("Output error: {message}")]
    Output { message: String },
}

impl RuntimeError {
    /// Get the category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::UnknownInstruction { .. }
            | RuntimeError::MissingOperand { .. }
            | RuntimeError::InvalidNumber { .. } => ErrorKind::MalformedInstruction,
            RuntimeError::StackUnderflow
            | RuntimeError::NotEnoughOperands { .. }
            | RuntimeError::NothingToReverse
            | RuntimeError::NothingToAssign { .. } => ErrorKind::StackUnderflow,
            RuntimeError::CombineMismatch { .. } | RuntimeError::ExpectedText { .. } => {
                ErrorKind::TypeMismatch
            }
            RuntimeError::DivisionByZero | RuntimeError::NegativeRepeatCount { .. } => {
                ErrorKind::Arithmetic
            }
            RuntimeError::UndefinedVariable { .. } => ErrorKind::UndefinedVariable,
            RuntimeError::NotANumber { .. } => ErrorKind::Conversion,
            RuntimeError::Output { .. } => ErrorKind::Output,
        }
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(e: std::io::Error) -> Self {
        RuntimeError::Output {
            message: e.to_string(),
        }
    }
}
