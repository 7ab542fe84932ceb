use crate::ast::{Block, Expr, Function, Module, Program, Stmt};
use crate::token::{Span, Token, TokenKind};

impl Program {
    /// Create a new empty program.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// Add a module.
    #[must_use]
    pub fn module(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

impl Module {
    /// Create a module with no functions.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            functions: Vec::new(),
        }
    }

    /// Add a function.
    #[must_use]
    pub fn function(mut self, function: Function) -> Self {
        self.functions.push(function);
        self
    }
}

impl Function {
    /// Create a function with an empty body.
    #[must_use]
    pub fn new(name: &str, return_type: &str) -> Self {
        Self {
            name: name.to_string(),
            return_type: return_type.to_string(),
            body: Block::new(),
        }
    }

    /// Append a statement to the body.
    #[must_use]
    pub fn stmt(mut self, stmt: Stmt) -> Self {
        self.body.stmts.push(stmt);
        self
    }
}

impl Block {
    #[must_use]
    pub const fn new() -> Self {
        Self { stmts: Vec::new() }
    }

    #[must_use]
    pub fn stmt(mut self, stmt: Stmt) -> Self {
        self.stmts.push(stmt);
        self
    }
}

impl Default for Block {
    fn default() -> Self {
        Self::new()
    }
}

impl Stmt {
    /// `name: ty;`
    #[must_use]
    pub fn var(name: &str, ty: &str) -> Self {
        Self::Var {
            name: name.to_string(),
            ty: ty.to_string(),
            value: None,
        }
    }

    /// `name: ty = value;`
    #[must_use]
    pub fn var_init(name: &str, ty: &str, value: Expr) -> Self {
        Self::Var {
            name: name.to_string(),
            ty: ty.to_string(),
            value: Some(value),
        }
    }

    /// `return value;`
    #[must_use]
    pub const fn ret(value: Expr) -> Self {
        Self::Return { value: Some(value) }
    }

    /// `return;`
    #[must_use]
    pub const fn ret_void() -> Self {
        Self::Return { value: None }
    }
}

impl Expr {
    #[must_use]
    pub fn literal(value: &str) -> Self {
        Self::Literal {
            value: value.to_string(),
        }
    }

    /// Unary minus.
    #[must_use]
    pub fn neg(operand: Self) -> Self {
        Self::Unary {
            op: operator(TokenKind::Minus),
            operand: Box::new(operand),
        }
    }

    /// Binary expression; `op` is one of `Plus`, `Minus`, `Less`,
    /// `Greater`.
    #[must_use]
    pub fn binary(op: TokenKind, lhs: Self, rhs: Self) -> Self {
        Self::Binary {
            op: operator(op),
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    #[must_use]
    pub fn ternary(condition: Self, lhs: Self, rhs: Self) -> Self {
        Self::Ternary {
            condition: Box::new(condition),
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    #[must_use]
    pub fn group(inner: Self) -> Self {
        Self::Grouping {
            inner: Box::new(inner),
        }
    }
}

/// Operator token with no source position.
fn operator(kind: TokenKind) -> Token {
    let lexeme = match kind {
        TokenKind::Plus => "+",
        TokenKind::Minus => "-",
        TokenKind::Less => "<",
        TokenKind::Greater => ">",
        _ => "",
    };
    Token::new(kind, lexeme, Span::START)
}
