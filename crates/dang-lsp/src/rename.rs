//! `textDocument/rename` (spec.md §4.7): single-file only, since the
//! language has no cross-module imports of bindings to chase (imports
//! bring in whole runtime modules, per spec.md §4.2, not individual
//! names). Finds every identifier occurrence with the old name plus the
//! declaration site itself and rewrites them in one `WorkspaceEdit`.

use dang_syntax::{Block, Expr, Form, Module, SourceLocation};
use lsp_types::{TextEdit, Url, WorkspaceEdit};
use std::collections::HashMap;

use crate::document::OpenDocument;
use crate::locate::find_expr_in_module;

pub fn rename_at(doc: &OpenDocument, uri: &Url, line: u32, col: u32, new_name: &str) -> Option<WorkspaceEdit> {
    let module = doc.module.as_ref()?;
    let Expr::Ident(ident) = find_expr_in_module(module, line, col)? else { return None };
    let name = ident.name.clone();

    let mut locs = Vec::new();
    collect_declaration_loc(module, &name, &mut locs);
    collect_ident_occurrences(module, &name, &mut locs);

    if locs.is_empty() {
        return None;
    }

    let edits: Vec<TextEdit> =
        locs.into_iter().map(|loc| TextEdit { range: crate::diagnostics::range_for(&loc), new_text: new_name.to_string() }).collect();

    let mut changes = HashMap::new();
    changes.insert(uri.clone(), edits);
    Some(WorkspaceEdit { changes: Some(changes), document_changes: None, change_annotations: None })
}

fn collect_declaration_loc(module: &Module, name: &str, out: &mut Vec<SourceLocation>) {
    for form in &module.forms {
        if let Form::Let(l) = form {
            if l.name == name {
                out.push(decl_name_loc(&l.loc, name));
            }
        }
    }
}

/// `LetForm::loc` spans the whole `let name = value` form; the name token
/// itself starts right after `"let "`. Good enough for this grammar, which
/// never puts the bound name anywhere else on the line.
fn decl_name_loc(form_loc: &SourceLocation, name: &str) -> SourceLocation {
    let mut loc = form_loc.clone();
    loc.column += "let ".len() as u32;
    loc.length = name.len() as u32;
    loc.end = None;
    loc
}

fn collect_ident_occurrences(module: &Module, name: &str, out: &mut Vec<SourceLocation>) {
    for form in &module.forms {
        match form {
            Form::Let(l) => collect_in_expr(&l.value, name, out),
            Form::Expr(e) => collect_in_expr(&e.expr, name, out),
            _ => {}
        }
    }
}

fn collect_in_expr(expr: &Expr, name: &str, out: &mut Vec<SourceLocation>) {
    match expr {
        Expr::Ident(i) if i.name == name => out.push(i.loc.clone()),
        Expr::Member(m) => collect_in_expr(&m.receiver, name, out),
        Expr::Call(c) => {
            collect_in_expr(&c.callee, name, out);
            for a in &c.args {
                collect_in_expr(&a.value, name, out);
            }
        }
        Expr::Object(o) => {
            for (_, v) in &o.fields {
                collect_in_expr(v, name, out);
            }
        }
        Expr::Block(b) => collect_in_block(b, name, out),
        _ => {}
    }
}

fn collect_in_block(block: &Block, name: &str, out: &mut Vec<SourceLocation>) {
    for form in &block.forms {
        match form {
            Form::Let(l) => collect_in_expr(&l.value, name, out),
            Form::Expr(e) => collect_in_expr(&e.expr, name, out),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("file:///tmp/a.dang").unwrap()
    }

    #[test]
    fn renames_declaration_and_every_use() {
        let doc = OpenDocument::new("let a = 1\nlet b = a".to_string(), 1);
        let module = doc.module.as_ref().unwrap();
        let Form::Let(b) = &module.forms[1] else { panic!() };
        let (line, col) = (b.value.loc().line, b.value.loc().column);
        let edit = rename_at(&doc, &url(), line, col, "renamed").unwrap();
        let edits = &edit.changes.unwrap()[&url()];
        assert_eq!(edits.len(), 2);
        assert!(edits.iter().all(|e| e.new_text == "renamed"));
    }

    #[test]
    fn renaming_a_non_identifier_is_none() {
        let doc = OpenDocument::new("let a = 1".to_string(), 1);
        assert!(rename_at(&doc, &url(), 99, 99, "x").is_none());
    }
}
