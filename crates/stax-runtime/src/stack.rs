//! Operand stack
//!
//! Unbounded LIFO of [`Value`]s. Pops report underflow as a
//! [`RuntimeError`] instead of returning `Option`, so handlers can use `?`.

use crate::value::{RuntimeError, Value};

/// Value stack owned by one interpreter run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack {
    values: Vec<Value>,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            values: Vec::with_capacity(64),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Top of stack without removing it
    pub fn peek(&self) -> Option<&Value> {
        self.values.last()
    }

    /// Values from bottom to top
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.values.push(value.into());
    }

    /// Pop the top value
    pub fn pop(&mut self) -> Result<Value, RuntimeError> {
        self.values.pop().ok_or(RuntimeError::StackUnderflow)
    }

    /// Pop the top value and coerce it to an integer.
    ///
    /// Text is accepted when it parses as an integer literal.
    pub fn pop_integer(&mut self) -> Result<i32, RuntimeError> {
        self.pop()?.to_integer()
    }

    /// Pop `b` then `a`, returning `(a, b)` in push order
    pub fn pop_integer_pair(&mut self) -> Result<(i32, i32), RuntimeError> {
        let b = self.pop_integer()?;
        let a = self.pop_integer()?;
        Ok((a, b))
    }
}
