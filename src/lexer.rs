use std::fmt;

use crate::token::{Span, Token, TokenKind};

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// Unterminated double-quoted string.
    UnterminatedString,
    /// Digits followed by a `.` with no fractional part.
    MalformedNumber(String),
    /// Byte that cannot start any token.
    UnexpectedCharacter(char),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedString => {
                write!(f, "unterminated string literal")
            }
            Self::MalformedNumber(text) => {
                write!(f, "malformed number literal: {text}")
            }
            Self::UnexpectedCharacter(ch) => {
                write!(f, "unexpected character: {ch}")
            }
        }
    }
}

/// Error produced during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

/// Tokenize Argon source text.
///
/// The returned sequence always ends with exactly one `EndOfFile`
/// token located just past the last character.
///
/// # Errors
///
/// Returns `LexError` on unterminated strings, malformed numbers,
/// or characters that cannot start a token.
#[tracing::instrument(skip_all, fields(source_len = input.len()))]
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize()
}

struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
    /// Characters consumed so far; `pos` counts bytes.
    offset: usize,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        let bytes = input.as_bytes();
        let start = if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
            3
        } else {
            0
        };
        Self {
            input: bytes,
            pos: start,
            offset: 0,
            line: 1,
            col: 1,
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.peek() {
            match ch {
                b' ' | b'\t' | b'\r' | b'\n' => self.advance(),
                b'/' if self.peek_at(1) == Some(b'/') => self.skip_comment(),
                b'"' => tokens.push(self.read_string()?),
                b'0'..=b'9' => tokens.push(self.read_number()?),
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => tokens.push(self.read_word()),
                _ => tokens.push(self.read_punctuation()?),
            }
        }

        tokens.push(Token::new(TokenKind::EndOfFile, "", self.span()));
        tracing::trace!(count = tokens.len(), "tokenized");
        Ok(tokens)
    }

    fn span(&self) -> Span {
        Span::new(self.line, self.col, to_index(self.offset))
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) {
        let Some(&byte) = self.input.get(self.pos) else {
            return;
        };
        self.pos += 1;
        if is_continuation(byte) {
            return;
        }
        self.offset += 1;
        if byte == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
    }

    fn text_from(&self, start: usize) -> String {
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    fn skip_comment(&mut self) {
        while self.peek().is_some_and(|c| c != b'\n') {
            self.advance();
        }
    }

    fn read_word(&mut self) -> Token {
        let span = self.span();
        let start = self.pos;

        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
        {
            self.advance();
        }

        let text = self.text_from(start);
        let kind = TokenKind::keyword(&text).unwrap_or_else(|| {
            if text.starts_with(|c: char| c.is_ascii_uppercase()) {
                TokenKind::TypeIdentifier
            } else {
                TokenKind::Identifier
            }
        });

        Token::new(kind, text, span)
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let span = self.span();
        let start = self.pos;

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() != Some(b'.') {
            return Ok(Token::new(TokenKind::Integer, self.text_from(start), span));
        }

        self.advance(); // skip .
        if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
            return Err(LexError {
                kind: LexErrorKind::MalformedNumber(self.text_from(start)),
                span,
            });
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        Ok(Token::new(TokenKind::Float, self.text_from(start), span))
    }

    fn read_string(&mut self) -> Result<Token, LexError> {
        let span = self.span();
        let start = self.pos;
        self.advance(); // skip opening quote

        loop {
            match self.peek() {
                None => {
                    return Err(LexError {
                        kind: LexErrorKind::UnterminatedString,
                        span,
                    });
                }
                Some(b'\\') => {
                    self.advance();
                    self.advance();
                }
                Some(b'"') => {
                    self.advance();
                    break;
                }
                Some(_) => self.advance(),
            }
        }

        Ok(Token::new(TokenKind::String, self.text_from(start), span))
    }

    fn read_punctuation(&mut self) -> Result<Token, LexError> {
        let span = self.span();
        let start = self.pos;
        let ch = self.input[self.pos];

        let kind = match (ch, self.peek_at(1)) {
            (b'-', Some(b'>')) => {
                self.advance();
                TokenKind::RightArrow
            }
            (b'<', Some(b'-')) => {
                self.advance();
                TokenKind::LeftArrow
            }
            (b'-', _) => TokenKind::Minus,
            (b'<', _) => TokenKind::Less,
            (b'+', _) => TokenKind::Plus,
            (b'>', _) => TokenKind::Greater,
            (b'?', _) => TokenKind::Question,
            (b'=', _) => TokenKind::Equal,
            (b':', _) => TokenKind::Colon,
            (b';', _) => TokenKind::Semicolon,
            (b',', _) => TokenKind::Comma,
            (b'[', _) => TokenKind::LeftBracket,
            (b']', _) => TokenKind::RightBracket,
            (b'{', _) => TokenKind::LeftBrace,
            (b'}', _) => TokenKind::RightBrace,
            (b'(', _) => TokenKind::LeftParen,
            (b')', _) => TokenKind::RightParen,
            _ => {
                let ch = std::str::from_utf8(&self.input[self.pos..])
                    .ok()
                    .and_then(|rest| rest.chars().next())
                    .unwrap_or_else(|| char::from(ch));
                return Err(LexError {
                    kind: LexErrorKind::UnexpectedCharacter(ch),
                    span,
                });
            }
        };

        self.advance();
        Ok(Token::new(kind, self.text_from(start), span))
    }
}

/// Trailing byte of a multi-byte UTF-8 sequence.
const fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

fn to_index(offset: usize) -> isize {
    isize::try_from(offset).unwrap_or(isize::MAX)
}
