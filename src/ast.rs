//! Syntax tree produced by the parser.
//!
//! Every node exclusively owns its children. Each node type has an
//! `accept` method that calls the [`Visitor`] method for its concrete
//! variant.

use crate::token::Token;
use crate::visitor::Visitor;

/// Complete parse result for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub modules: Vec<Module>,
}

/// `module <name>` followed by its functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub functions: Vec<Function>,
}

/// `function <name> -> <type> { ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub return_type: String,
    pub body: Block,
}

/// Brace-delimited statement list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `name: Type (= value)?;`
    Var {
        name: String,
        ty: String,
        value: Option<Expr>,
    },
    /// `return value?;`
    Return { value: Option<Expr> },
    Block(Block),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Raw lexeme of an integer, float, or string token.
    Literal { value: String },
    Unary { op: Token, operand: Box<Self> },
    Binary {
        op: Token,
        lhs: Box<Self>,
        rhs: Box<Self>,
    },
    Ternary {
        condition: Box<Self>,
        lhs: Box<Self>,
        rhs: Box<Self>,
    },
    Grouping { inner: Box<Self> },
}

impl Program {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_program(self);
    }
}

impl Module {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_module(self);
    }
}

impl Function {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_function(self);
    }
}

impl Block {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_block(self);
    }
}

impl Stmt {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Self::Var { name, ty, value } => visitor.visit_var(name, ty, value.as_ref()),
            Self::Return { value } => visitor.visit_return(value.as_ref()),
            Self::Block(block) => block.accept(visitor),
        }
    }
}

impl Expr {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Self::Literal { value } => visitor.visit_literal(value),
            Self::Unary { op, operand } => visitor.visit_unary(op, operand),
            Self::Binary { op, lhs, rhs } => visitor.visit_binary(op, lhs, rhs),
            Self::Ternary {
                condition,
                lhs,
                rhs,
            } => visitor.visit_ternary(condition, lhs, rhs),
            Self::Grouping { inner } => visitor.visit_grouping(inner),
        }
    }
}
