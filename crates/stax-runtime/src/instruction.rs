//! Instruction set and per-line decoding
//!
//! A program line is decoded every time it executes: the text up to the
//! first space is the opcode mnemonic, everything after it is the raw
//! operand. There is no separate parse phase.

use crate::value::RuntimeError;
use std::fmt;

/// Instruction opcode (15 instructions)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // ===== Constants =====
    /// Push integer literal [operand: number]
    PushNum,
    /// Push text literal [operand: rest of line, verbatim]
    PushStr,

    // ===== Arithmetic =====
    /// Pop a, push a + 1
    Increment,
    /// Pop b, pop a, push a + b
    Add,
    /// Pop b, pop a, push a - b
    Subtract,
    /// Pop b, pop a, push a * b
    Mul,
    /// Pop b, pop a, push a / b (truncating)
    Div,

    // ===== I/O =====
    /// Pop a, write a
    Output,
    /// Read one line of input, push it (or 0)
    AcquireInput,

    // ===== Variables =====
    /// Pop a, store under name [operand: name]
    SetVar,
    /// Push the value stored under name [operand: name]
    GetVar,

    // ===== Text =====
    /// Pop second, pop first, push first ++ second (or first + second)
    Combine,
    /// Pop item, pop count, write item count times
    Repeat,
    /// Pop text, push it reversed
    Reverse,

    // ===== Special =====
    /// Stop execution
    Halt,
}

impl Opcode {
    /// Every opcode, in declaration order
    pub const ALL: [Opcode; 15] = [
        Opcode::PushNum,
        Opcode::PushStr,
        Opcode::Increment,
        Opcode::Add,
        Opcode::Subtract,
        Opcode::Mul,
        Opcode::Div,
        Opcode::Output,
        Opcode::AcquireInput,
        Opcode::SetVar,
        Opcode::GetVar,
        Opcode::Combine,
        Opcode::Repeat,
        Opcode::Reverse,
        Opcode::Halt,
    ];

    /// Source mnemonic for this opcode
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::PushNum => "PUSH_NUM",
            Opcode::PushStr => "PUSH_STR",
            Opcode::Increment => "INCREMENT",
            Opcode::Add => "ADD",
            Opcode::Subtract => "SUBTRACT",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Output => "OUTPUT",
            Opcode::AcquireInput => "ACQUIRE_INPUT",
            Opcode::SetVar => "SET_VAR",
            Opcode::GetVar => "GET_VAR",
            Opcode::Combine => "COMBINE",
            Opcode::Repeat => "REPEAT",
            Opcode::Reverse => "REVERSE",
            Opcode::Halt => "HALT",
        }
    }

    /// Look up an opcode by its mnemonic (case-sensitive)
    pub fn from_mnemonic(name: &str) -> Option<Opcode> {
        Opcode::ALL.into_iter().find(|op| op.mnemonic() == name)
    }

    /// Whether this opcode reads its operand
    pub fn takes_operand(self) -> bool {
        matches!(
            self,
            Opcode::PushNum | Opcode::PushStr | Opcode::SetVar | Opcode::GetVar
        )
    }

    /// Human-readable name of the operand, used in error messages
    pub fn operand_name(self) -> &'static str {
        match self {
            Opcode::PushNum => "number",
            Opcode::PushStr => "string",
            Opcode::SetVar | Opcode::GetVar => "variable name",
            _ => "operand",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// A decoded program line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction<'a> {
    pub opcode: Opcode,
    /// Everything after the first space, untouched. `None` when the line
    /// holds only the mnemonic.
    pub operand: Option<&'a str>,
}

impl<'a> Instruction<'a> {
    /// Decode one program line.
    ///
    /// Returns `Ok(None)` for blank lines. Trimming removes ASCII spaces and
    /// control characters (everything up to U+0020) from both ends; other
    /// Unicode whitespace such as U+00A0 is kept.
    pub fn decode(line: &'a str) -> Result<Option<Self>, RuntimeError> {
        let line = line.trim_matches(|c: char| c <= ' ');
        if line.is_empty() {
            return Ok(None);
        }

        let (name, operand) = match line.split_once(' ') {
            Some((name, rest)) => (name, Some(rest)),
            None => (line, None),
        };

        let opcode = Opcode::from_mnemonic(name).ok_or_else(|| RuntimeError::UnknownInstruction {
            name: name.to_string(),
        })?;

        Ok(Some(Instruction { opcode, operand }))
    }

    /// The operand, or a `MissingOperand` error for this opcode
    pub fn require_operand(&self) -> Result<&'a str, RuntimeError> {
        self.operand.ok_or(RuntimeError::MissingOperand {
            opcode: self.opcode,
        })
    }
}
