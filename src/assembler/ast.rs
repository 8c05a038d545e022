//! This AST describes a parsed program.
//!
//! A program is an ordered list of statements. Every statement is an
//! arithmetic opcode followed by a destination and a source register.
//! Statements are terminated by a semicolon or by one or more newlines,
//! and the two styles may be mixed freely.
//!
//! Supported Instructions:
//!
//! ```nasm
//! add RA RB ; RA <= RA + RB
//! sub RA RB ; RA <= RA - RB
//! mul RA RB ; RA <= RA * RB
//! div RA RB ; RA <= RA / RB
//! ```
//!
//! Supported Registers: `ax`, `bx`, `cx`, `dx`.
//!
//! Example source file:
//!
//! ```nasm
//! add ax bx; sub cx dx
//! mul ax ax
//!
//! div bx cx
//! ```
//!
//! Opcodes and register names are case-sensitive: `ADD AX BX` is rejected.

use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Opcode {
    Add,
    Sub,
    Mul,
    Div,
}

impl Opcode {
    pub const ALL: [Opcode; 4] = [Opcode::Add, Opcode::Sub, Opcode::Mul, Opcode::Div];

    /// Looks up an opcode by its exact source literal.
    pub fn from_literal(literal: &str) -> Option<Self> {
        use Opcode::*;
        match literal {
            "add" => Some(Add),
            "sub" => Some(Sub),
            "mul" => Some(Mul),
            "div" => Some(Div),
            _ => None,
        }
    }

    pub fn literal(&self) -> &'static str {
        use Opcode::*;
        match self {
            Add => "add",
            Sub => "sub",
            Mul => "mul",
            Div => "div",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Register {
    Ax,
    Bx,
    Cx,
    Dx,
}

impl Register {
    pub const ALL: [Register; 4] = [Register::Ax, Register::Bx, Register::Cx, Register::Dx];

    /// Looks up a register by its exact source literal.
    pub fn from_literal(literal: &str) -> Option<Self> {
        use Register::*;
        match literal {
            "ax" => Some(Ax),
            "bx" => Some(Bx),
            "cx" => Some(Cx),
            "dx" => Some(Dx),
            _ => None,
        }
    }

    pub fn literal(&self) -> &'static str {
        use Register::*;
        match self {
            Ax => "ax",
            Bx => "bx",
            Cx => "cx",
            Dx => "dx",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

/// Which operand of a statement a register occupies.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Slot {
    Destination,
    Source,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Destination => f.write_str("destination"),
            Slot::Source => f.write_str("source"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Statement {
    pub opcode: Opcode,
    pub dst: Register,
    pub src: Register,
}

impl Statement {
    pub fn new(opcode: Opcode, dst: Register, src: Register) -> Self {
        Statement { opcode, dst, src }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.opcode, self.dst, self.src)
    }
}

/// Statements in program order.
pub type Program = Vec<Statement>;

/// Prints a program in canonical form: statements joined with `"; "`.
/// Parsing the result yields the same program.
pub fn render(program: &[Statement]) -> String {
    program
        .iter()
        .map(|stmt| stmt.to_string())
        .collect::<Vec<String>>()
        .join("; ")
}
