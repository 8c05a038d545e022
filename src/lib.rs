#[macro_use] extern crate log;

pub mod assembler;

pub use assembler::ast::{render, Opcode, Program, Register, Slot, Statement};
pub use assembler::{parse_program, ParseError, ParseErrorKind};
