//! Double-dispatch traversal over the syntax tree and the textual lowering
//! built on top of it.
//!
//! [`Visitor`] has one method per node variant. The provided methods call
//! [`Visitor::visit_default`] with the variant's [`NodeKind`] and then walk
//! the children in source order, so an implementor only overrides the
//! variants it has a specific rule for. The `walk_*` functions expose the
//! child traversal to overriding methods.

use crate::ast::{Block, Expr, Function, Module, Program};
use crate::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Program,
    Module,
    Function,
    Block,
    Var,
    Return,
    Literal,
    Unary,
    Binary,
    Ternary,
    Grouping,
}

impl NodeKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Program => "Program",
            Self::Module => "Module",
            Self::Function => "Function",
            Self::Block => "Block",
            Self::Var => "Var",
            Self::Return => "Return",
            Self::Literal => "Literal",
            Self::Unary => "Unary",
            Self::Binary => "Binary",
            Self::Ternary => "Ternary",
            Self::Grouping => "Grouping",
        }
    }
}

pub trait Visitor {
    /// Called by every provided `visit_*` method before walking children.
    fn visit_default(&mut self, _kind: NodeKind) {}

    fn visit_program(&mut self, program: &Program) {
        self.visit_default(NodeKind::Program);
        walk_program(self, program);
    }

    fn visit_module(&mut self, module: &Module) {
        self.visit_default(NodeKind::Module);
        walk_module(self, module);
    }

    fn visit_function(&mut self, function: &Function) {
        self.visit_default(NodeKind::Function);
        walk_function(self, function);
    }

    fn visit_block(&mut self, block: &Block) {
        self.visit_default(NodeKind::Block);
        walk_block(self, block);
    }

    fn visit_var(&mut self, _name: &str, _ty: &str, value: Option<&Expr>) {
        self.visit_default(NodeKind::Var);
        walk_optional(self, value);
    }

    fn visit_return(&mut self, value: Option<&Expr>) {
        self.visit_default(NodeKind::Return);
        walk_optional(self, value);
    }

    fn visit_literal(&mut self, _value: &str) {
        self.visit_default(NodeKind::Literal);
    }

    fn visit_unary(&mut self, _op: &Token, operand: &Expr) {
        self.visit_default(NodeKind::Unary);
        operand.accept(self);
    }

    fn visit_binary(&mut self, _op: &Token, lhs: &Expr, rhs: &Expr) {
        self.visit_default(NodeKind::Binary);
        lhs.accept(self);
        rhs.accept(self);
    }

    fn visit_ternary(&mut self, condition: &Expr, lhs: &Expr, rhs: &Expr) {
        self.visit_default(NodeKind::Ternary);
        condition.accept(self);
        lhs.accept(self);
        rhs.accept(self);
    }

    fn visit_grouping(&mut self, inner: &Expr) {
        self.visit_default(NodeKind::Grouping);
        inner.accept(self);
    }
}

pub fn walk_program<V: Visitor + ?Sized>(visitor: &mut V, program: &Program) {
    for module in &program.modules {
        module.accept(visitor);
    }
}

pub fn walk_module<V: Visitor + ?Sized>(visitor: &mut V, module: &Module) {
    for function in &module.functions {
        function.accept(visitor);
    }
}

pub fn walk_function<V: Visitor + ?Sized>(visitor: &mut V, function: &Function) {
    function.body.accept(visitor);
}

pub fn walk_block<V: Visitor + ?Sized>(visitor: &mut V, block: &Block) {
    for stmt in &block.stmts {
        stmt.accept(visitor);
    }
}

pub fn walk_optional<V: Visitor + ?Sized>(visitor: &mut V, expr: Option<&Expr>) {
    if let Some(expr) = expr {
        expr.accept(visitor);
    }
}

/// Structural lowering: one line per node, pre-order.
///
/// Nothing is folded, checked, or resolved. Variants without a dedicated
/// rule (`Program`, `Block`, `Return`, `Ternary`, `Grouping`) lower to a
/// line holding just the variant name. The buffer belongs to this
/// instance: visiting a second tree with the same `Lowering` appends to
/// the first tree's output.
#[derive(Debug, Default)]
pub struct Lowering {
    output: String,
}

impl Lowering {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    #[must_use]
    pub fn into_output(self) -> String {
        self.output
    }

    fn emit(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

impl Visitor for Lowering {
    fn visit_default(&mut self, kind: NodeKind) {
        self.emit(kind.name());
    }

    fn visit_module(&mut self, module: &Module) {
        self.emit(&format!(
            "Module - {} {}",
            module.name,
            module.functions.len()
        ));
        walk_module(self, module);
    }

    fn visit_function(&mut self, function: &Function) {
        self.emit(&format!(
            "Function {} -> {}",
            function.name, function.return_type
        ));
        walk_function(self, function);
    }

    fn visit_var(&mut self, name: &str, ty: &str, value: Option<&Expr>) {
        self.emit(&format!("Var {name} : {ty}"));
        walk_optional(self, value);
    }

    fn visit_literal(&mut self, value: &str) {
        self.emit(&format!("Literal {value}"));
    }

    fn visit_unary(&mut self, op: &Token, operand: &Expr) {
        self.emit(&format!("Unary {}", op.lexeme));
        operand.accept(self);
    }

    fn visit_binary(&mut self, op: &Token, lhs: &Expr, rhs: &Expr) {
        self.emit(&format!("Binary {}", op.lexeme));
        lhs.accept(self);
        rhs.accept(self);
    }
}

/// Lower a whole program with a fresh [`Lowering`].
#[must_use]
#[tracing::instrument(skip_all, fields(module_count = program.modules.len()))]
pub fn lower(program: &Program) -> String {
    let mut lowering = Lowering::new();
    program.accept(&mut lowering);
    lowering.into_output()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Span, TokenKind};

    fn op(kind: TokenKind, text: &str) -> Token {
        Token::new(kind, text, Span::START)
    }

    fn lit(value: &str) -> Expr {
        Expr::Literal {
            value: value.to_string(),
        }
    }

    #[derive(Default)]
    struct Counter {
        kinds: Vec<NodeKind>,
    }

    impl Visitor for Counter {
        fn visit_default(&mut self, kind: NodeKind) {
            self.kinds.push(kind);
        }
    }

    #[test]
    fn default_walk_is_pre_order() {
        let expr = Expr::Binary {
            op: op(TokenKind::Plus, "+"),
            lhs: Box::new(lit("1")),
            rhs: Box::new(Expr::Grouping {
                inner: Box::new(lit("2")),
            }),
        };
        let mut counter = Counter::default();
        expr.accept(&mut counter);
        assert_eq!(
            counter.kinds,
            vec![
                NodeKind::Binary,
                NodeKind::Literal,
                NodeKind::Grouping,
                NodeKind::Literal,
            ]
        );
    }

    #[test]
    fn placeholder_lines_for_ternary_and_grouping() {
        let expr = Expr::Ternary {
            condition: Box::new(lit("1")),
            lhs: Box::new(Expr::Grouping {
                inner: Box::new(lit("2")),
            }),
            rhs: Box::new(Expr::Unary {
                op: op(TokenKind::Minus, "-"),
                operand: Box::new(lit("3")),
            }),
        };
        let mut lowering = Lowering::new();
        expr.accept(&mut lowering);
        assert_eq!(
            lowering.output(),
            "Ternary\nLiteral 1\nGrouping\nLiteral 2\nUnary -\nLiteral 3\n"
        );
    }

    #[test]
    fn reused_lowering_concatenates() {
        let program = Program {
            modules: Vec::new(),
        };
        let mut lowering = Lowering::new();
        program.accept(&mut lowering);
        program.accept(&mut lowering);
        assert_eq!(lowering.output(), "Program\nProgram\n");
    }
}
