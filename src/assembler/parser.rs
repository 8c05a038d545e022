//! The Parser module takes a token stream from the lexer and groups the
//! words between statement terminators into validated statements.
//!
//! Parsing stops at the first malformed statement; no partial program
//! is ever returned.
use std::collections::VecDeque;
use std::error::Error;
use std::fmt;

use super::ast::*;
use super::lexer::{self, Location, Token, TokenKind};

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ParseErrorKind {
    MalformedStatement { word_count: usize },
    UnknownOpcode { literal: String },
    UnknownRegister { literal: String, slot: Slot },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ParseErrorKind::*;
        match self {
            MalformedStatement { word_count } => write!(
                f,
                "expected 3 words (opcode, destination, source) but found {}",
                word_count
            ),
            UnknownOpcode { literal } => write!(
                f,
                "unknown opcode `{}`, expected one of {}",
                literal,
                one_of(&Opcode::ALL)
            ),
            UnknownRegister { literal, slot } => write!(
                f,
                "unknown {} register `{}`, expected one of {}",
                slot,
                literal,
                one_of(&Register::ALL)
            ),
        }
    }
}

fn one_of<T: fmt::Display>(items: &[T]) -> String {
    items.iter().map(|item| item.to_string()).collect::<Vec<String>>().join(", ")
}

/// The first malformed statement in a program.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ParseError {
    /// 1-based, counting only non-empty statements.
    pub index: usize,
    pub position: Location,
    pub kind: ParseErrorKind,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "statement {} at {}: {}", self.index, self.position, self.kind)
    }
}

impl Error for ParseError {}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum State {
    ScanningWords,
    AtBoundary,
    Done,
    Failed,
}

pub struct Parser {
    tokens: VecDeque<Token>,
    ast:    Program,
    run:    Vec<(String, Location)>,
    index:  usize,
    state:  State,
}

impl Parser {
    pub fn new(tokens: VecDeque<Token>) -> Self {
        // Every statement takes at least three words and a terminator.
        let capacity = tokens.len() / 4 + 1;
        Parser {
            tokens,
            ast: Program::with_capacity(capacity),
            run: Vec::with_capacity(3),
            index: 0,
            state: State::ScanningWords,
        }
    }

    /// Run the parser, consuming itself and returning the program.
    pub fn run(mut self) -> Result<Program, ParseError> {
        while !self.is_finished() {
            self.step()?;
        }

        debug!("Parsed {} statement(s).", self.ast.len());
        Ok(self.ast)
    }

    fn is_finished(&self) -> bool {
        matches!(self.state, State::Done | State::Failed)
    }

    /// Consumes one token, or handles end of input.
    fn step(&mut self) -> Result<(), ParseError> {
        let result = match self.consume() {
            Some(Token { kind: TokenKind::Word(text), location }) => {
                self.run.push((text, location));
                self.state = State::ScanningWords;
                Ok(())
            }
            Some(Token { kind: TokenKind::StatementEnd, .. }) => {
                self.finish_run().map(|_| self.state = State::AtBoundary)
            }
            // End of input is an implicit statement boundary.
            None => self.finish_run().map(|_| self.state = State::Done),
        };

        if result.is_err() {
            self.state = State::Failed;
        }
        result
    }

    /// Turns the pending run of words into a statement. An empty run
    /// produces nothing.
    fn finish_run(&mut self) -> Result<(), ParseError> {
        if self.run.is_empty() {
            return Ok(());
        }

        self.index += 1;
        let words = std::mem::take(&mut self.run);
        let stmt = self.statement(&words)?;
        trace!("statement {}: {}", self.index, stmt);
        self.ast.push(stmt);
        Ok(())
    }

    fn statement(&self, words: &[(String, Location)]) -> Result<Statement, ParseError> {
        match words {
            [op, dst, src] => Ok(Statement::new(
                self.opcode(op)?,
                self.register(dst, Slot::Destination)?,
                self.register(src, Slot::Source)?,
            )),
            _ => {
                let position = words.first().map(|(_, loc)| *loc).unwrap_or_default();
                Err(self.error(position, ParseErrorKind::MalformedStatement { word_count: words.len() }))
            }
        }
    }

    fn opcode(&self, word: &(String, Location)) -> Result<Opcode, ParseError> {
        let (literal, location) = word;
        Opcode::from_literal(literal).ok_or_else(|| {
            self.error(*location, ParseErrorKind::UnknownOpcode { literal: literal.clone() })
        })
    }

    fn register(&self, word: &(String, Location), slot: Slot) -> Result<Register, ParseError> {
        let (literal, location) = word;
        Register::from_literal(literal).ok_or_else(|| {
            self.error(*location, ParseErrorKind::UnknownRegister { literal: literal.clone(), slot })
        })
    }

    fn error(&self, position: Location, kind: ParseErrorKind) -> ParseError {
        ParseError { index: self.index, position, kind }
    }

    /// Pops a token off the input stream and returns it.
    /// Returns None if no tokens are left.
    #[inline]
    fn consume(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }
}

/// Tokenizes and parses a whole program.
pub fn parse_program(text: &str) -> Result<Program, ParseError> {
    Parser::new(lexer::tokenize(text)).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn stmt(opcode: Opcode, dst: Register, src: Register) -> Statement {
        Statement::new(opcode, dst, src)
    }

    #[test]
    fn test_parse_program_semicolons() {
        assert_eq!(
            parse_program("add ax bx; sub cx dx"),
            Ok(vec![
                stmt(Opcode::Add, Register::Ax, Register::Bx),
                stmt(Opcode::Sub, Register::Cx, Register::Dx),
            ])
        );
    }

    #[test]
    fn test_parse_program_newlines() {
        assert_eq!(
            parse_program("mul ax ax\ndiv bx cx\n"),
            Ok(vec![
                stmt(Opcode::Mul, Register::Ax, Register::Ax),
                stmt(Opcode::Div, Register::Bx, Register::Cx),
            ])
        );
    }

    #[test]
    fn test_parse_program_empty() {
        assert_eq!(parse_program(""), Ok(vec![]));
        assert_eq!(parse_program("   \n\n  "), Ok(vec![]));
        assert_eq!(parse_program(";\n;;\n"), Ok(vec![]));
    }

    #[test]
    fn test_malformed_statement() {
        let err = parse_program("add ax bx bx").unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.position, Location::new(1, 1, 0));
        assert_eq!(err.kind, ParseErrorKind::MalformedStatement { word_count: 4 });

        let err = parse_program("add ax bx\n  sub cx").unwrap_err();
        assert_eq!(err.index, 2);
        assert_eq!(err.position, Location::new(2, 3, 12));
        assert_eq!(err.kind, ParseErrorKind::MalformedStatement { word_count: 2 });

        let err = parse_program("div").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MalformedStatement { word_count: 1 });
    }

    #[test]
    fn test_unknown_opcode() {
        let err = parse_program("mov ax bx").unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.position, Location::new(1, 1, 0));
        assert_eq!(err.kind, ParseErrorKind::UnknownOpcode { literal: "mov".to_string() });

        // Literals are case-sensitive.
        let err = parse_program("add ax bx; ADD ax bx").unwrap_err();
        assert_eq!(err.index, 2);
        assert_eq!(err.kind, ParseErrorKind::UnknownOpcode { literal: "ADD".to_string() });
    }

    #[test]
    fn test_unknown_register() {
        let err = parse_program("add ax ex").unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.position, Location::new(1, 8, 7));
        assert_eq!(
            err.kind,
            ParseErrorKind::UnknownRegister { literal: "ex".to_string(), slot: Slot::Source }
        );

        let err = parse_program("sub Bx cx").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnknownRegister { literal: "Bx".to_string(), slot: Slot::Destination }
        );
    }

    #[test]
    fn test_first_error_wins() {
        // The opcode is checked before the registers, and earlier statements
        // before later ones.
        let err = parse_program("mov ex fx\nadd ax").unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.kind, ParseErrorKind::UnknownOpcode { literal: "mov".to_string() });
    }

    #[test]
    fn test_error_display() {
        let err = parse_program("add ax bx\nadd ax ex").unwrap_err();
        assert_eq!(
            err.to_string(),
            "statement 2 at 2:8: unknown source register `ex`, expected one of ax, bx, cx, dx"
        );

        let err = parse_program("mov ax bx").unwrap_err();
        assert_eq!(
            err.to_string(),
            "statement 1 at 1:1: unknown opcode `mov`, expected one of add, sub, mul, div"
        );

        let err = parse_program("add ax bx bx").unwrap_err();
        assert_eq!(
            err.to_string(),
            "statement 1 at 1:1: expected 3 words (opcode, destination, source) but found 4"
        );
    }

    #[test]
    fn test_state_transitions() {
        let mut parser = Parser::new(lexer::tokenize("add ax bx; mul"));
        assert_eq!(parser.state, State::ScanningWords);

        for _ in 0..3 {
            assert_eq!(parser.step(), Ok(()));
            assert_eq!(parser.state, State::ScanningWords);
        }
        assert_eq!(parser.step(), Ok(()));
        assert_eq!(parser.state, State::AtBoundary);
        assert_eq!(parser.ast.len(), 1);

        assert_eq!(parser.step(), Ok(()));
        assert_eq!(parser.state, State::ScanningWords);

        assert!(parser.step().is_err());
        assert_eq!(parser.state, State::Failed);
        assert!(parser.is_finished());

        let mut parser = Parser::new(VecDeque::new());
        assert_eq!(parser.step(), Ok(()));
        assert_eq!(parser.state, State::Done);
    }

    #[test]
    fn test_statement_end_with_empty_run() {
        let tokens: VecDeque<Token> = VecDeque::from(vec![
            Token::statement_end(Location::default()),
            Token::statement_end(Location::default()),
        ]);
        assert_eq!(Parser::new(tokens).run(), Ok(vec![]));
    }

    fn statement_strategy() -> impl Strategy<Value = Statement> {
        (0..4usize, 0..4usize, 0..4usize)
            .prop_map(|(op, dst, src)| stmt(Opcode::ALL[op], Register::ALL[dst], Register::ALL[src]))
    }

    fn delimiter_strategy() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just(";"),
            Just("; "),
            Just("\n"),
            Just("\n\n\n"),
            Just(" ;\n\t"),
            Just("\r\n"),
            Just(";;"),
        ]
    }

    proptest! {
        #[test]
        fn prop_render_round_trips(program in prop::collection::vec(statement_strategy(), 0..20)) {
            prop_assert_eq!(parse_program(&render(&program)), Ok(program.clone()));
        }

        #[test]
        fn prop_any_delimiters(
            parts in prop::collection::vec((statement_strategy(), delimiter_strategy()), 0..20)
        ) {
            let mut source = String::new();
            for (stmt, delim) in parts.iter() {
                source.push_str(&stmt.to_string());
                source.push_str(delim);
            }
            let expected: Program = parts.iter().map(|(stmt, _)| *stmt).collect();
            prop_assert_eq!(parse_program(&source), Ok(expected));
        }

        #[test]
        fn prop_trailing_delimiter_is_ignored(
            program in prop::collection::vec(statement_strategy(), 0..10),
            trailing in delimiter_strategy(),
            padding in "[ \t\n]{0,4}",
        ) {
            let source = render(&program);
            let padded = format!("{}{}{}", source, trailing, padding);
            prop_assert_eq!(parse_program(&padded), parse_program(&source));
        }
    }
}
