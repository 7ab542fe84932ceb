//! Property-based tests with proptest.
//!
//! Generate random trees, render them as source, parse them back, and
//! check the parsed tree matches the generated one. Operator tokens carry
//! positions after parsing, so both sides are compared with spans reset.
//!
//! Binary operands are restricted to literals, negations, and groupings.
//! A nested binary on either side would need parentheses to survive
//! precedence climbing, and the generator adds those explicitly.

mod common;

use argonc::{
    Block, Expr, Function, Module, Program, Stmt, Token, TokenKind, lower, parse, tokenize,
};
use common::{declared_names, lowered_names, normalize, parse_normalized, render};
use proptest::prelude::*;

// -- Leaf strategies --

/// Lowercase identifier that is not a keyword.
fn ident() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}".prop_filter("keyword", |s| TokenKind::keyword(s).is_none())
}

/// Capitalised type name; keywords are all lowercase.
fn type_name() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z0-9]{0,8}".prop_map(|s| s)
}

fn literal() -> impl Strategy<Value = Expr> {
    prop_oneof![
        "[0-9]{1,6}",
        "[0-9]{1,3}\\.[0-9]{1,3}",
        "\"[a-z ]{0,10}\"",
    ]
    .prop_map(|value| Expr::literal(&value))
}

fn binary_op() -> impl Strategy<Value = TokenKind> {
    prop_oneof![
        Just(TokenKind::Plus),
        Just(TokenKind::Minus),
        Just(TokenKind::Less),
        Just(TokenKind::Greater),
    ]
}

// -- Expressions --

/// Literal, negation, or parenthesised expression.
fn operand(depth: u32) -> BoxedStrategy<Expr> {
    if depth == 0 {
        return literal().boxed();
    }
    prop_oneof![
        3 => literal(),
        1 => operand(depth - 1).prop_map(Expr::neg),
        1 => expr(depth - 1).prop_map(Expr::group),
    ]
    .boxed()
}

/// Expression at a given depth (limits recursion).
fn expr(depth: u32) -> BoxedStrategy<Expr> {
    if depth == 0 {
        return literal().boxed();
    }
    prop_oneof![
        2 => operand(depth),
        2 => (binary_op(), operand(depth - 1), operand(depth - 1))
            .prop_map(|(op, lhs, rhs)| Expr::binary(op, lhs, rhs)),
        1 => (operand(depth - 1), expr(depth - 1), expr(depth - 1))
            .prop_map(|(condition, lhs, rhs)| Expr::ternary(condition, lhs, rhs)),
    ]
    .boxed()
}

// -- Statements and declarations --

fn stmt(depth: u32) -> BoxedStrategy<Stmt> {
    let var = (ident(), type_name(), prop::option::of(expr(2)))
        .prop_map(|(name, ty, value)| Stmt::Var { name, ty, value });
    let ret = prop::option::of(expr(2)).prop_map(|value| Stmt::Return { value });

    if depth == 0 {
        return prop_oneof![var, ret].boxed();
    }
    prop_oneof![
        3 => var,
        2 => ret,
        1 => prop::collection::vec(stmt(depth - 1), 0..=3)
            .prop_map(|stmts| Stmt::Block(Block { stmts })),
    ]
    .boxed()
}

fn function() -> impl Strategy<Value = Function> {
    (ident(), type_name(), prop::collection::vec(stmt(2), 0..=4)).prop_map(
        |(name, return_type, stmts)| Function {
            name,
            return_type,
            body: Block { stmts },
        },
    )
}

fn module() -> impl Strategy<Value = Module> {
    (ident(), prop::collection::vec(function(), 0..=3))
        .prop_map(|(name, functions)| Module { name, functions })
}

fn program() -> impl Strategy<Value = Program> {
    prop::collection::vec(module(), 0..=3).prop_map(|modules| Program { modules })
}

// -- Property tests --

proptest! {
    /// Rendering then parsing reproduces the generated tree.
    #[test]
    fn render_parse_roundtrip(program in program()) {
        let source = render(&program);
        let parsed = parse_normalized(&source);
        let mut expected = program;
        normalize(&mut expected);
        prop_assert_eq!(parsed, expected, "source:\n{}", source);
    }

    /// Lowering the same tree twice gives identical text.
    #[test]
    fn lowering_is_idempotent(program in program()) {
        prop_assert_eq!(lower(&program), lower(&program));
    }

    /// Declaration lines appear in source pre-order.
    #[test]
    fn lowering_names_follow_pre_order(program in program()) {
        let parsed = parse_normalized(&render(&program));
        prop_assert_eq!(lowered_names(&lower(&parsed)), declared_names(&program));
    }

    /// Every module contributes exactly one module line with its function count.
    #[test]
    fn lowering_module_lines(program in program()) {
        let lowered = lower(&program);
        let module_lines: Vec<_> = lowered
            .lines()
            .filter(|line| line.starts_with("Module - "))
            .collect();
        prop_assert_eq!(module_lines.len(), program.modules.len());
        for (line, module) in module_lines.iter().zip(&program.modules) {
            let expected = std::format!("Module - {} {}", module.name, module.functions.len());
            prop_assert_eq!(*line, expected.as_str());
        }
    }

    /// Successful lexing ends in exactly one end-of-file token and never
    /// moves backwards.
    #[test]
    fn lexer_stream_contract(input in "[ -~\n\t]{0,80}") {
        if let Ok(tokens) = tokenize(&input) {
            prop_assert_eq!(tokens.iter().filter(|t| t.is_eof()).count(), 1);
            prop_assert!(tokens.last().is_some_and(Token::is_eof));
            for pair in tokens.windows(2) {
                prop_assert!(pair[0].span.index <= pair[1].span.index);
            }
        }
    }

    /// The parser never panics, whatever the token sequence.
    #[test]
    fn parser_total_on_lexed_input(input in "[a-zA-Z0-9 (){};:?=<>+-]{0,60}") {
        if let Ok(tokens) = tokenize(&input) {
            let _ = parse(&tokens);
            let without_eof = &tokens[..tokens.len() - 1];
            let _ = parse(without_eof);
        }
    }
}
