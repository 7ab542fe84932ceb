//! Front end of the Argon compiler: tokens, include resolution, parsing,
//! and a structural lowering of the syntax tree.
//!
//! The pipeline is lexer -> include resolver -> parser -> visitor. Each
//! stage returns a `Result`; diagnostics are collected in an explicit
//! [`Diagnostics`] sink rather than a global.
//!
//! # Quick start
//!
//! ```
//! use argonc::{lower, parse_str};
//!
//! let program = parse_str("module M function F -> T { return 1 + 2; }").unwrap();
//! let lowered = lower(&program);
//! assert_eq!(
//!     lowered,
//!     "Program\nModule - M 1\nFunction F -> T\nBlock\nReturn\nBinary +\nLiteral 1\nLiteral 2\n"
//! );
//! ```
//!
//! ## Build a tree programmatically
//!
//! ```
//! use argonc::{Expr, Function, Module, Program, Stmt, lower};
//!
//! let program = Program::new().module(
//!     Module::new("app").function(Function::new("main", "Int").stmt(Stmt::ret(Expr::literal("0")))),
//! );
//! assert!(lower(&program).contains("Function main -> Int"));
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

use std::path::PathBuf;

pub mod ast;
pub mod builder;
pub mod config;
pub mod diagnostics;
pub mod driver;
pub mod include;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod visitor;

pub use ast::{Block, Expr, Function, Module, Program, Stmt};
pub use config::{BuildMode, Config};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use driver::{Outcome, Unit, compile_file, run};
pub use include::{IncludeError, IncludeErrorKind, IncludeResolver, SourceMap};
pub use lexer::{LexError, LexErrorKind, tokenize};
pub use parser::{MAX_NESTING, ParseError, ParseErrorKind, Parser, parse};
pub use token::{Span, Token, TokenKind};
pub use visitor::{Lowering, NodeKind, Visitor, lower};

/// Unified error type covering every front-end stage.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A lexer error.
    #[error("{0}")]
    Lex(#[from] LexError),
    /// An include resolver error that aborted loading.
    #[error("{0}")]
    Include(#[from] IncludeError),
    /// A parser error.
    #[error("{0}")]
    Parse(#[from] ParseError),
    /// Include errors recorded while loading `path` that did not stop loading.
    #[error("{}: {count} include error(s)", path.display())]
    IncludeFailures { path: PathBuf, count: usize },
    /// Reading a source file or writing output failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Tokenize and parse a single source string in one step.
///
/// Import directives are not resolved; use [`IncludeResolver::load`] for
/// files that import others.
pub fn parse_str(input: &str) -> Result<Program, Error> {
    let tokens = tokenize(input)?;
    Ok(parse(&tokens)?)
}
