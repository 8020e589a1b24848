//! Opcode handlers

use super::Interpreter;
use crate::instruction::{Instruction, Opcode};
use crate::value::{RuntimeError, Value};
use std::io::{BufRead, Write};

impl<R: BufRead, W: Write> Interpreter<R, W> {
    pub(super) fn push_num(&mut self, instruction: Instruction<'_>) -> Result<(), RuntimeError> {
        let literal = instruction.require_operand()?;
        let n = literal
            .parse::<i32>()
            .map_err(|_| RuntimeError::InvalidNumber {
                opcode: instruction.opcode,
            })?;
        self.stack.push(n);
        Ok(())
    }

    pub(super) fn push_str(&mut self, instruction: Instruction<'_>) -> Result<(), RuntimeError> {
        let text = instruction.require_operand()?;
        self.stack.push(text);
        Ok(())
    }

    /// ADD, SUBTRACT, MUL: pop b, pop a, push `op(a, b)`
    pub(super) fn arithmetic(&mut self, op: fn(i32, i32) -> i32) -> Result<(), RuntimeError> {
        let (a, b) = self.stack.pop_integer_pair()?;
        self.stack.push(op(a, b));
        Ok(())
    }

    /// Pop b, pop a, push a / b truncated toward zero
    pub(super) fn divide(&mut self) -> Result<(), RuntimeError> {
        let (a, b) = self.stack.pop_integer_pair()?;
        if b == 0 {
            return Err(RuntimeError::DivisionByZero);
        }
        self.stack.push(a.wrapping_div(b));
        Ok(())
    }

    pub(super) fn output_value(&mut self) -> Result<(), RuntimeError> {
        let value = self.stack.pop()?;
        write!(self.output, "{}", value)?;
        Ok(())
    }

    /// Read one line of input. EOF, read errors and blank lines all push 0.
    pub(super) fn acquire_input(&mut self) -> Result<(), RuntimeError> {
        // Anything written so far may be a prompt for this read
        self.output.flush()?;

        let mut line = String::new();
        let value = match self.input.read_line(&mut line) {
            Ok(0) => Value::Integer(0),
            Ok(_) => {
                let line = line
                    .strip_suffix('\n')
                    .map(|l| l.strip_suffix('\r').unwrap_or(l))
                    .unwrap_or(line.as_str());
                if line.is_empty() {
                    Value::Integer(0)
                } else {
                    Value::text(line)
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "input read failed, substituting 0");
                Value::Integer(0)
            }
        };
        self.stack.push(value);
        Ok(())
    }

    pub(super) fn set_var(&mut self, instruction: Instruction<'_>) -> Result<(), RuntimeError> {
        let name = instruction.require_operand()?;
        let value = self
            .stack
            .pop()
            .map_err(|_| RuntimeError::NothingToAssign {
                name: name.to_string(),
            })?;
        self.variables.set(name, value);
        Ok(())
    }

    pub(super) fn get_var(&mut self, instruction: Instruction<'_>) -> Result<(), RuntimeError> {
        let name = instruction.require_operand()?;
        let value = self.variables.get(name)?.clone();
        self.stack.push(value);
        Ok(())
    }

    /// Pop second, pop first. Two texts concatenate, two integers add.
    pub(super) fn combine(&mut self) -> Result<(), RuntimeError> {
        if self.stack.len() < 2 {
            return Err(RuntimeError::NotEnoughOperands {
                opcode: Opcode::Combine,
            });
        }
        let second = self.stack.pop()?;
        let first = self.stack.pop()?;

        let combined = match (&first, &second) {
            (Value::Text(a), Value::Text(b)) => {
                let mut joined = String::with_capacity(a.len() + b.len());
                joined.push_str(a);
                joined.push_str(b);
                Value::text(joined)
            }
            (Value::Integer(a), Value::Integer(b)) => Value::Integer(a.wrapping_add(*b)),
            _ => {
                return Err(RuntimeError::CombineMismatch {
                    first: first.type_name(),
                    second: second.type_name(),
                })
            }
        };
        self.stack.push(combined);
        Ok(())
    }

    /// Pop item, pop count; write item `count` times with no separator
    pub(super) fn repeat(&mut self) -> Result<(), RuntimeError> {
        if self.stack.len() < 2 {
            return Err(RuntimeError::NotEnoughOperands {
                opcode: Opcode::Repeat,
            });
        }
        let item = self.stack.pop()?;
        let count = self.stack.pop_integer()?;
        if count < 0 {
            return Err(RuntimeError::NegativeRepeatCount { count });
        }

        let text = item.to_string();
        for _ in 0..count {
            self.output.write_all(text.as_bytes())?;
        }
        Ok(())
    }

    pub(super) fn reverse(&mut self) -> Result<(), RuntimeError> {
        let value = self
            .stack
            .pop()
            .map_err(|_| RuntimeError::NothingToReverse)?;
        match value {
            Value::Text(s) => {
                let reversed: String = s.chars().rev().collect();
                self.stack.push(reversed);
                Ok(())
            }
            other @ Value::Integer(_) => Err(RuntimeError::ExpectedText {
                found: other.type_name(),
            }),
        }
    }
}
