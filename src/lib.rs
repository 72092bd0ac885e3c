#![allow(clippy::new_without_default)]

mod ast;
mod environment;
mod error;
mod func;
mod interpreter;
mod native;
mod object;
mod parser;
mod printer;
mod scanner;
mod token;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::environment::Environment;
    pub use crate::error::*;
    pub use crate::func::*;
    pub use crate::interpreter::*;
    pub use crate::object::*;
    pub use crate::parser::*;
    pub use crate::printer::AstPrinter;
    pub use crate::scanner::*;
    pub use crate::token::*;
    pub use crate::Shared;
}

use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::rc::Rc;

use prelude::{Interpreter, ParseError, Parser, RuntimeError, Scanner, TokenType};

pub type Shared<T> = Rc<RefCell<T>>;
pub type SharedErrorReporter = Shared<ErrorReporter>;

/// The embedding facade: wires scanner, parser and interpreter together
/// over a shared error reporter, for a script file or a REPL session.
pub struct Rill {
    interpreter: Interpreter,
    error_reporter: SharedErrorReporter,
}

impl Rill {
    pub fn new() -> Self {
        let error_reporter = Rc::new(RefCell::new(ErrorReporter::default()));

        Self {
            interpreter: Interpreter::new().with_error_reporting(error_reporter.clone()),
            error_reporter,
        }
    }

    pub fn run_file(&mut self, filename: &str) -> Result<(), anyhow::Error> {
        let content = std::fs::read_to_string(filename)?;
        self.run(content.as_ref());
        Ok(())
    }

    /// Read-eval-print loop on stdin. A bad line reports its error and the
    /// loop carries on; globals persist between lines.
    pub fn run_prompt(&mut self) -> Result<(), anyhow::Error> {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();

        write!(stdout, "> ")?;
        stdout.flush()?;

        for line in stdin.lock().lines() {
            self.run(&line?);
            self.error_reporter.borrow_mut().reset();

            write!(stdout, "> ")?;
            stdout.flush()?;
        }

        Ok(())
    }

    pub fn run(&mut self, input: &str) {
        let mut scanner = Scanner::new(input).with_error_reporting(self.error_reporter.clone());
        let tokens = scanner.scan_tokens();

        if self.error_reporter.borrow().had_error {
            return;
        }

        let mut parser = Parser::new(tokens);
        let (statements, errors) = parser.parse();

        if !errors.is_empty() {
            self.print_parser_errors(&errors);
            return;
        }

        self.interpreter.interpret(&statements);
    }

    pub fn had_error(&self) -> bool {
        self.error_reporter.borrow().had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.error_reporter.borrow().had_runtime_error
    }

    fn print_parser_errors(&mut self, errors: &[ParseError]) {
        let mut reporter = self.error_reporter.borrow_mut();

        for e in errors {
            if e.token.token_type == TokenType::EOF {
                reporter.report(e.token.line, "at end", &e.message);
            } else {
                reporter.report(e.token.line, &format!("at '{}'", e.token.lexeme), &e.message);
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct ErrorReporter {
    pub had_error: bool,
    pub had_runtime_error: bool,
}

impl ErrorReporter {
    pub fn error(&mut self, line: i32, message: &str) {
        self.report(line, "", message);
    }

    pub fn report(&mut self, line: i32, location: &str, message: &str) {
        if location.is_empty() {
            eprintln!("[line {line}] Error: {message}");
        } else {
            eprintln!("[line {line}] Error {location}: {message}");
        }

        self.had_error = true;
    }

    pub fn runtime_error(&mut self, e: &RuntimeError) {
        eprintln!("{e}");
        self.had_runtime_error = true;
    }

    pub fn reset(&mut self) {
        self.had_error = false;
        self.had_runtime_error = false;
    }
}
