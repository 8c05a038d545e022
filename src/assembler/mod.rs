//! The Assembler module is in charge of taking source
//! text and producing a Program from the AST submodule.
//!
//! It does this by implementing a simple tokenizer
//! and a fail-fast statement parser.

pub mod ast;
pub mod lexer;
pub mod parser;

pub use parser::{parse_program, ParseError, ParseErrorKind};
