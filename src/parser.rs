use std::fmt;
use std::path::Path;

use crate::ast::{Block, Expr, Function, Module, Program, Stmt};
use crate::diagnostics::{Diagnostics, Severity};
use crate::include::SourceMap;
use crate::token::{Span, Token, TokenKind};

/// Classifies a parser error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Found a token that is not valid at this grammar position.
    UnexpectedToken { expected: String, found: String },
    /// Ran out of tokens before completing a construct.
    PrematureEndOfFile { expected: String },
    /// Blocks, groupings, and negations nested past [`MAX_NESTING`].
    NestingTooDeep,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken { expected, found } => {
                write!(f, "expected {expected}, got '{found}'")
            }
            Self::PrematureEndOfFile { expected } => {
                write!(f, "expected {expected}, reached end of file")
            }
            Self::NestingTooDeep => {
                write!(f, "nesting exceeds {MAX_NESTING} levels")
            }
        }
    }
}

/// Error produced during parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

/// Parse a token stream into a `Program`.
///
/// # Errors
///
/// Returns `ParseError` at the first token that does not fit the grammar.
/// There is no recovery: one error aborts the whole parse.
pub fn parse(tokens: &[Token]) -> Result<Program, ParseError> {
    Parser::new(tokens).parse()
}

/// Deepest combined nesting of blocks, expressions, and unary operators
/// the parser accepts.
pub const MAX_NESTING: usize = 256;

/// Binding power of binary operators; higher binds tighter.
const fn binary_precedence(kind: TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Less | TokenKind::Greater => Some(1),
        TokenKind::Plus | TokenKind::Minus => Some(2),
        _ => None,
    }
}

/// Recursive-descent parser over a materialized token sequence.
///
/// Lookahead past the end of the sequence yields an end-of-file token at
/// [`Span::SENTINEL`], so the cursor never indexes out of bounds.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    sentinel: Token,
    depth: usize,
    diagnostics: Option<&'a Diagnostics>,
    file: Option<&'a Path>,
    sources: Option<&'a SourceMap>,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub const fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            sentinel: Token::eof_sentinel(),
            depth: 0,
            diagnostics: None,
            file: None,
            sources: None,
        }
    }

    /// Report the parse error, if any, to `diagnostics` as well as
    /// returning it.
    #[must_use]
    pub const fn with_diagnostics(mut self, diagnostics: &'a Diagnostics) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Name `file` as the location of reported errors.
    #[must_use]
    pub const fn in_file(mut self, file: &'a Path) -> Self {
        self.file = Some(file);
        self
    }

    /// Report errors in the file the offending token came from. Falls
    /// back to [`Self::in_file`] for tokens the map does not cover.
    #[must_use]
    pub const fn with_sources(mut self, sources: &'a SourceMap) -> Self {
        self.sources = Some(sources);
        self
    }

    /// Token `offset` places after the cursor, without consuming.
    #[must_use]
    pub fn peek(&self, offset: usize) -> &Token {
        self.pos
            .checked_add(offset)
            .and_then(|idx| self.tokens.get(idx))
            .unwrap_or(&self.sentinel)
    }

    fn current(&self) -> &Token {
        self.peek(0)
    }

    /// Consume the current token and return the new current one.
    /// At end of file this keeps returning the end-of-file token.
    pub fn advance(&mut self) -> &Token {
        if !self.current().is_eof() {
            self.pos += 1;
        }
        self.current()
    }

    /// Parse the whole sequence.
    ///
    /// # Errors
    ///
    /// Returns the first `ParseError` encountered.
    #[tracing::instrument(skip_all, fields(token_count = self.tokens.len()))]
    pub fn parse(mut self) -> Result<Program, ParseError> {
        let result = self.program();
        if let (Err(err), Some(diagnostics)) = (&result, self.diagnostics) {
            let file = self
                .sources
                .and_then(|sources| sources.file_at(self.pos))
                .or(self.file);
            diagnostics.record(
                Severity::Error,
                err.kind.to_string(),
                file.map(Path::to_path_buf),
                err.span,
            );
        }
        result
    }

    fn program(&mut self) -> Result<Program, ParseError> {
        let mut modules = Vec::new();
        while !self.current().is_eof() {
            modules.push(self.module()?);
        }
        tracing::debug!(modules = modules.len(), "parsed program");
        Ok(Program { modules })
    }

    fn module(&mut self) -> Result<Module, ParseError> {
        self.expect(TokenKind::Module, "'module'")?;
        let name = self.expect_name("module name")?;

        let mut functions = Vec::new();
        while self.check(TokenKind::Function) {
            functions.push(self.function()?);
        }

        Ok(Module { name, functions })
    }

    fn function(&mut self) -> Result<Function, ParseError> {
        self.expect(TokenKind::Function, "'function'")?;
        let name = self.expect_name("function name")?;
        self.expect(TokenKind::RightArrow, "'->'")?;
        let return_type = self.expect_name("return type")?;
        let body = self.block()?;

        Ok(Function {
            name,
            return_type,
            body,
        })
    }

    fn block(&mut self) -> Result<Block, ParseError> {
        self.nested(Self::block_body)
    }

    fn block_body(&mut self) -> Result<Block, ParseError> {
        self.expect(TokenKind::LeftBrace, "'{'")?;

        let mut stmts = Vec::new();
        loop {
            if self.check(TokenKind::RightBrace) {
                break;
            }
            if self.current().is_eof() {
                return Err(self.unexpected("'}'"));
            }
            stmts.push(self.statement()?);
        }

        self.expect(TokenKind::RightBrace, "'}'")?;
        Ok(Block { stmts })
    }

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        match self.current().kind {
            TokenKind::Return => self.return_stmt(),
            TokenKind::LeftBrace => Ok(Stmt::Block(self.block()?)),
            TokenKind::Identifier | TokenKind::TypeIdentifier => self.var_decl(),
            _ => Err(self.unexpected("statement")),
        }
    }

    fn return_stmt(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::Return, "'return'")?;
        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(Stmt::Return { value })
    }

    fn var_decl(&mut self) -> Result<Stmt, ParseError> {
        let name = self.expect_name("variable name")?;
        self.expect(TokenKind::Colon, "':'")?;
        let ty = self.expect_name("type")?;

        let value = if self.check(TokenKind::Equal) {
            self.advance();
            Some(self.expression()?)
        } else {
            None
        };

        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(Stmt::Var { name, ty, value })
    }

    fn expression(&mut self) -> Result<Expr, ParseError> {
        self.nested(Self::ternary)
    }

    fn ternary(&mut self) -> Result<Expr, ParseError> {
        let condition = self.binary(1)?;
        if !self.check(TokenKind::Question) {
            return Ok(condition);
        }

        self.advance(); // skip ?
        let lhs = self.expression()?;
        self.expect(TokenKind::Colon, "':' in ternary expression")?;
        let rhs = self.expression()?;

        Ok(Expr::Ternary {
            condition: Box::new(condition),
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    /// Precedence climbing over left-associative binary operators.
    fn binary(&mut self, min_precedence: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.unary()?;

        while let Some(precedence) = binary_precedence(self.current().kind) {
            if precedence < min_precedence {
                break;
            }
            let op = self.take();
            let rhs = self.binary(precedence + 1)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        if self.check(TokenKind::Minus) {
            let op = self.take();
            let operand = self.nested(Self::unary)?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let kind = self.current().kind;
        if kind.is_literal() {
            let value = self.take().lexeme;
            return Ok(Expr::Literal { value });
        }
        if kind == TokenKind::LeftParen {
            self.advance();
            let inner = self.expression()?;
            self.expect(TokenKind::RightParen, "')'")?;
            return Ok(Expr::Grouping {
                inner: Box::new(inner),
            });
        }
        Err(self.unexpected("expression"))
    }

    /// Run `parse` one nesting level deeper, failing at the current token
    /// once [`MAX_NESTING`] is reached.
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError {
                kind: ParseErrorKind::NestingTooDeep,
                span: self.current().span,
            });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn take(&mut self) -> Token {
        let token = self.current().clone();
        self.advance();
        token
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.take())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_name(&mut self, expected: &str) -> Result<String, ParseError> {
        match self.current().kind {
            TokenKind::Identifier | TokenKind::TypeIdentifier => Ok(self.take().lexeme),
            _ => Err(self.unexpected(expected)),
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.current();
        let kind = if token.is_eof() {
            ParseErrorKind::PrematureEndOfFile {
                expected: expected.to_string(),
            }
        } else {
            ParseErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                found: token.lexeme.clone(),
            }
        };
        ParseError {
            kind,
            span: token.span,
        }
    }
}
