use std::fmt;

/// Source location of a token.
///
/// `column` and `index` count characters, not bytes. `index` is the
/// absolute character offset into the file the token was read from, so
/// it only increases within one file. It is signed so the synthesized
/// end-of-file sentinel can carry `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub line: usize,
    pub column: usize,
    pub index: isize,
}

impl Span {
    /// Location of the end-of-file token manufactured when lookahead
    /// runs past the end of a token sequence.
    pub const SENTINEL: Self = Self {
        line: 0,
        column: 0,
        index: -1,
    };

    /// First character of a file.
    pub const START: Self = Self {
        line: 1,
        column: 1,
        index: 0,
    };

    #[must_use]
    pub const fn new(line: usize, column: usize, index: isize) -> Self {
        Self {
            line,
            column,
            index,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Invalid,

    /// Lower-case identifier.
    Identifier,
    /// Identifier starting with an upper-case letter.
    TypeIdentifier,

    Integer,
    Float,
    /// Double-quoted string; the lexeme keeps its quotes.
    String,

    /// `->`
    RightArrow,
    /// `<-`
    LeftArrow,

    Colon,
    Semicolon,
    Comma,

    Plus,
    Minus,
    Greater,
    Less,
    /// `?`
    Question,
    /// `=`
    Equal,

    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,

    Return,
    Function,
    Module,
    Import,

    EndOfLine,
    EndOfFile,
}

impl TokenKind {
    /// Upper-snake name used in token dumps.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Invalid => "INVALID",
            Self::Identifier => "IDENTIFIER",
            Self::TypeIdentifier => "TYPE_IDENTIFIER",
            Self::Integer => "INTEGER",
            Self::Float => "FLOAT",
            Self::String => "STRING",
            Self::RightArrow => "RIGHT_ARROW",
            Self::LeftArrow => "LEFT_ARROW",
            Self::Colon => "COLON",
            Self::Semicolon => "SEMICOLON",
            Self::Comma => "COMMA",
            Self::Plus => "PLUS",
            Self::Minus => "MINUS",
            Self::Greater => "GREATER",
            Self::Less => "LESS",
            Self::Question => "QUESTION",
            Self::Equal => "EQUAL",
            Self::LeftBracket => "LEFT_BRACKET",
            Self::RightBracket => "RIGHT_BRACKET",
            Self::LeftBrace => "LEFT_BRACE",
            Self::RightBrace => "RIGHT_BRACE",
            Self::LeftParen => "LEFT_PAREN",
            Self::RightParen => "RIGHT_PAREN",
            Self::Return => "RETURN",
            Self::Function => "FUNCTION",
            Self::Module => "MODULE",
            Self::Import => "IMPORT",
            Self::EndOfLine => "END_OF_LINE",
            Self::EndOfFile => "END_OF_FILE",
        }
    }

    /// Keyword kind for a reserved spelling.
    #[must_use]
    pub fn keyword(text: &str) -> Option<Self> {
        match text {
            "return" => Some(Self::Return),
            "function" => Some(Self::Function),
            "module" => Some(Self::Module),
            "import" => Some(Self::Import),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(self, Self::Integer | Self::Float | Self::String)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single token with its kind, text, and source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    /// End-of-file token at the `(0, 0, -1)` sentinel location.
    #[must_use]
    pub const fn eof_sentinel() -> Self {
        Self {
            kind: TokenKind::EndOfFile,
            lexeme: String::new(),
            span: Span::SENTINEL,
        }
    }

    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfFile
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "( {}, {}, {} )", self.kind, self.lexeme, self.span)
    }
}
