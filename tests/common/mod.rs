#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use argonc::{Block, Expr, Function, Program, Span, Stmt, parse_str};

/// Render a program back into Argon source that parses to the same tree.
pub fn render(program: &Program) -> String {
    let mut out = String::new();
    for module in &program.modules {
        let _ = writeln!(out, "module {}", module.name);
        for function in &module.functions {
            render_function(&mut out, function);
        }
    }
    out
}

fn render_function(out: &mut String, function: &Function) {
    let _ = write!(
        out,
        "function {} -> {} ",
        function.name, function.return_type
    );
    render_block(out, &function.body, 0);
}

fn render_block(out: &mut String, block: &Block, indent: usize) {
    out.push_str("{\n");
    for stmt in &block.stmts {
        out.push_str(&"\t".repeat(indent + 1));
        render_stmt(out, stmt, indent + 1);
    }
    out.push_str(&"\t".repeat(indent));
    out.push_str("}\n");
}

fn render_stmt(out: &mut String, stmt: &Stmt, indent: usize) {
    match stmt {
        Stmt::Var { name, ty, value } => {
            let _ = write!(out, "{name}: {ty}");
            if let Some(value) = value {
                out.push_str(" = ");
                render_expr(out, value);
            }
            out.push_str(";\n");
        }
        Stmt::Return { value } => {
            out.push_str("return");
            if let Some(value) = value {
                out.push(' ');
                render_expr(out, value);
            }
            out.push_str(";\n");
        }
        Stmt::Block(block) => render_block(out, block, indent),
    }
}

fn render_expr(out: &mut String, expr: &Expr) {
    match expr {
        Expr::Literal { value } => out.push_str(value),
        Expr::Unary { op, operand } => {
            let _ = write!(out, "{} ", op.lexeme);
            render_expr(out, operand);
        }
        Expr::Binary { op, lhs, rhs } => {
            render_expr(out, lhs);
            let _ = write!(out, " {} ", op.lexeme);
            render_expr(out, rhs);
        }
        Expr::Ternary {
            condition,
            lhs,
            rhs,
        } => {
            render_expr(out, condition);
            out.push_str(" ? ");
            render_expr(out, lhs);
            out.push_str(" : ");
            render_expr(out, rhs);
        }
        Expr::Grouping { inner } => {
            out.push('(');
            render_expr(out, inner);
            out.push(')');
        }
    }
}

/// Reset operator token spans so parsed trees compare equal to built ones.
pub fn normalize(program: &mut Program) {
    for module in &mut program.modules {
        for function in &mut module.functions {
            normalize_block(&mut function.body);
        }
    }
}

fn normalize_block(block: &mut Block) {
    for stmt in &mut block.stmts {
        match stmt {
            Stmt::Var { value, .. } | Stmt::Return { value } => {
                if let Some(expr) = value {
                    normalize_expr(expr);
                }
            }
            Stmt::Block(inner) => normalize_block(inner),
        }
    }
}

fn normalize_expr(expr: &mut Expr) {
    match expr {
        Expr::Literal { .. } => {}
        Expr::Unary { op, operand } => {
            op.span = Span::START;
            normalize_expr(operand);
        }
        Expr::Binary { op, lhs, rhs } => {
            op.span = Span::START;
            normalize_expr(lhs);
            normalize_expr(rhs);
        }
        Expr::Ternary {
            condition,
            lhs,
            rhs,
        } => {
            normalize_expr(condition);
            normalize_expr(lhs);
            normalize_expr(rhs);
        }
        Expr::Grouping { inner } => normalize_expr(inner),
    }
}

/// Parse source and normalize spans.
pub fn parse_normalized(input: &str) -> Program {
    let mut program = parse_str(input).unwrap_or_else(|e| {
        panic!("parse failed: {e}\n--- source ---\n{input}");
    });
    normalize(&mut program);
    program
}

/// Module, function, and variable names in pre-order.
pub fn declared_names(program: &Program) -> Vec<String> {
    let mut names = Vec::new();
    for module in &program.modules {
        names.push(module.name.clone());
        for function in &module.functions {
            names.push(function.name.clone());
            block_names(&function.body, &mut names);
        }
    }
    names
}

fn block_names(block: &Block, names: &mut Vec<String>) {
    for stmt in &block.stmts {
        match stmt {
            Stmt::Var { name, .. } => names.push(name.clone()),
            Stmt::Return { .. } => {}
            Stmt::Block(inner) => block_names(inner, names),
        }
    }
}

/// Names on the declaration lines of a lowering, in output order.
pub fn lowered_names(lowered: &str) -> Vec<String> {
    lowered
        .lines()
        .filter_map(|line| {
            if let Some(rest) = line.strip_prefix("Module - ") {
                rest.split(' ').next()
            } else if let Some(rest) = line.strip_prefix("Function ") {
                rest.split(' ').next()
            } else if let Some(rest) = line.strip_prefix("Var ") {
                rest.split(' ').next()
            } else {
                None
            }
        })
        .map(str::to_string)
        .collect()
}

/// Write `files` (name, contents) into `dir`, returning their paths.
pub fn write_files(dir: &Path, files: &[(&str, &str)]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|(name, contents)| {
            let path = dir.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("create dir");
            }
            fs::write(&path, contents).expect("write source");
            path
        })
        .collect()
}
