//! Finds the most specific AST node enclosing a cursor position, used by
//! hover and definition (spec.md §4.7). Containment is a simple same-line,
//! column-range test — good enough for this grammar's single-line tokens
//! and member chains, not a full tree-sitter CST walk.

use dang_syntax::{Block, Expr, Form, Module, SourceLocation};

fn contains(loc: &SourceLocation, line: u32, col: u32) -> bool {
    loc.line == line && col >= loc.column && col < loc.column + loc.length.max(1)
}

/// Walks into the most deeply nested `Expr` containing `(line, col)`
/// (both 1-based, matching [`SourceLocation`]).
pub fn find_expr_at(expr: &Expr, line: u32, col: u32) -> Option<&Expr> {
    if !contains(expr.loc(), line, col) {
        return None;
    }
    let deeper = match expr {
        Expr::Member(m) => find_expr_at(&m.receiver, line, col),
        Expr::Call(c) => c
            .args
            .iter()
            .find_map(|a| find_expr_at(&a.value, line, col))
            .or_else(|| find_expr_at(&c.callee, line, col)),
        Expr::Object(o) => o.fields.iter().find_map(|(_, v)| find_expr_at(v, line, col)),
        Expr::Block(b) => find_expr_in_block(b, line, col),
        _ => None,
    };
    deeper.or(Some(expr))
}

fn find_expr_in_block(block: &Block, line: u32, col: u32) -> Option<&Expr> {
    block.forms.iter().find_map(|form| find_expr_in_form(form, line, col))
}

fn find_expr_in_form(form: &Form, line: u32, col: u32) -> Option<&Expr> {
    match form {
        Form::Let(l) => find_expr_at(&l.value, line, col),
        Form::Expr(e) => find_expr_at(&e.expr, line, col),
        _ => None,
    }
}

/// Top-level search across every form in a module.
pub fn find_expr_in_module(module: &Module, line: u32, col: u32) -> Option<&Expr> {
    module.forms.iter().find_map(|form| find_expr_in_form(form, line, col))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dang_syntax::Form;

    #[test]
    fn finds_identifier_in_simple_let() {
        let module = dang_syntax::parse_module("t", "let a = 1").unwrap();
        let Form::Let(l) = &module.forms[0] else { panic!() };
        let (line, col) = (l.value.loc().line, l.value.loc().column);
        let found = find_expr_in_module(&module, line, col).unwrap();
        assert!(matches!(found, Expr::Int(_)));
    }

    #[test]
    fn finds_member_receiver_not_just_outer_member() {
        let module = dang_syntax::parse_module("t", "let a = x.y").unwrap();
        let Form::Let(l) = &module.forms[0] else { panic!() };
        let Expr::Member(m) = &l.value else { panic!() };
        let (line, col) = (m.receiver.loc().line, m.receiver.loc().column);
        let found = find_expr_in_module(&module, line, col).unwrap();
        assert!(matches!(found, Expr::Ident(i) if i.name == "x"));
    }
}
