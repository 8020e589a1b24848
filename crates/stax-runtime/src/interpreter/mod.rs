//! Line interpreter
//!
//! Fetch-decode-execute loop over a [`Program`]. Each line is decoded when
//! the instruction pointer reaches it; the handler for its opcode mutates
//! the stack and variable table or writes to the output sink.
//!
//! Termination:
//! - falling off the end of the program writes one trailing newline
//! - HALT returns immediately and writes nothing
//! - a failing instruction aborts the loop with a [`FatalError`] carrying
//!   the 1-based line number; reporting it is left to the caller

mod handlers;

use crate::instruction::{Instruction, Opcode};
use crate::program::Program;
use crate::stack::Stack;
use crate::value::{ErrorKind, RuntimeError};
use crate::variables::Variables;
use std::io::{BufRead, Write};
use thiserror::Error;

/// How a run ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The instruction pointer moved past the last line
    EndOfProgram,
    /// A HALT instruction executed on this 1-based line
    Halted { line: usize },
}

/// An instruction failure, tagged with the line it happened on
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{error} at line {line}")]
pub struct FatalError {
    pub error: RuntimeError,
    /// 1-based line number of the failing instruction
    pub line: usize,
}

impl FatalError {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

/// What the loop does after an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Halt,
}

/// Interpreter state for one run of a program
pub struct Interpreter<R, W> {
    program: Program,
    stack: Stack,
    variables: Variables,
    /// Index of the line being executed; `program.len()` once finished
    ip: usize,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Interpreter<R, W> {
    /// Create an interpreter reading ACQUIRE_INPUT lines from `input` and
    /// writing OUTPUT/REPEAT text to `output`
    pub fn new(program: Program, input: R, output: W) -> Self {
        Self {
            program,
            stack: Stack::new(),
            variables: Variables::new(),
            ip: 0,
            input,
            output,
        }
    }

    /// Execute the program until it halts, runs off the end, or fails.
    ///
    /// Output is flushed before returning, on every path.
    #[tracing::instrument(level = "debug", skip_all, fields(lines = self.program.len()))]
    pub fn run(&mut self) -> Result<Termination, FatalError> {
        let result = self.execute_loop();
        let flushed = self.output.flush();

        match result {
            Ok(termination) => {
                flushed.map_err(|e| self.fatal(e.into()))?;
                tracing::debug!(?termination, "program finished");
                Ok(termination)
            }
            Err(fatal) => {
                tracing::debug!(line = fatal.line, kind = ?fatal.kind(), "program failed: {}", fatal.error);
                Err(fatal)
            }
        }
    }

    fn execute_loop(&mut self) -> Result<Termination, FatalError> {
        // Shares the lines so they stay borrowed across handler calls
        let program = self.program.clone();

        loop {
            let Some(line) = program.line(self.ip) else {
                self.output
                    .write_all(b"\n")
                    .map_err(|e| self.fatal(e.into()))?;
                return Ok(Termination::EndOfProgram);
            };

            let instruction = match Instruction::decode(line) {
                Ok(Some(instruction)) => instruction,
                Ok(None) => {
                    self.ip += 1;
                    continue;
                }
                Err(e) => return Err(self.fatal(e)),
            };

            tracing::trace!(
                line = self.ip + 1,
                opcode = %instruction.opcode,
                depth = self.stack.len(),
                "dispatch"
            );

            match self.execute(instruction) {
                Ok(Flow::Continue) => self.ip += 1,
                Ok(Flow::Halt) => return Ok(Termination::Halted { line: self.ip + 1 }),
                Err(e) => return Err(self.fatal(e)),
            }
        }
    }

    fn execute(&mut self, instruction: Instruction<'_>) -> Result<Flow, RuntimeError> {
        match instruction.opcode {
            Opcode::PushNum => self.push_num(instruction)?,
            Opcode::PushStr => self.push_str(instruction)?,
            Opcode::Increment => {
                let n = self.stack.pop_integer()?;
                self.stack.push(n.wrapping_add(1));
            }
            Opcode::Add => self.arithmetic(i32::wrapping_add)?,
            Opcode::Subtract => self.arithmetic(i32::wrapping_sub)?,
            Opcode::Mul => self.arithmetic(i32::wrapping_mul)?,
            Opcode::Div => self.divide()?,
            Opcode::Output => self.output_value()?,
            Opcode::AcquireInput => self.acquire_input()?,
            Opcode::SetVar => self.set_var(instruction)?,
            Opcode::GetVar => self.get_var(instruction)?,
            Opcode::Combine => self.combine()?,
            Opcode::Repeat => self.repeat()?,
            Opcode::Reverse => self.reverse()?,
            Opcode::Halt => return Ok(Flow::Halt),
        }
        Ok(Flow::Continue)
    }

    fn fatal(&self, error: RuntimeError) -> FatalError {
        FatalError {
            error,
            line: self.ip + 1,
        }
    }

    /// Current stack contents
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Current variable bindings
    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    /// Instruction pointer (0-based)
    pub fn ip(&self) -> usize {
        self.ip
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Give back the output sink
    pub fn into_output(self) -> W {
        self.output
    }
}
