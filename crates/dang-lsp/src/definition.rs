//! `textDocument/definition` (spec.md §4.7): symbol-table lookup scoped by
//! an enclosing-env walk. Resolves an identifier to the `SourceLocation`
//! of its declaring form, searched directly in the module's top-level
//! forms (this grammar has no nested function declarations to walk into).

use dang_syntax::{Expr, Form, SourceLocation};

use crate::document::OpenDocument;
use crate::locate::find_expr_in_module;

pub fn definition_at(doc: &OpenDocument, line: u32, col: u32) -> Option<SourceLocation> {
    let module = doc.module.as_ref()?;
    let Expr::Ident(ident) = find_expr_in_module(module, line, col)? else { return None };
    find_declaration(module, &ident.name)
}

fn find_declaration(module: &dang_syntax::Module, name: &str) -> Option<SourceLocation> {
    module.forms.iter().find_map(|form| match form {
        Form::Let(l) if l.name == name => Some(l.loc.clone()),
        Form::FnDecl(f) if f.name == name => Some(f.loc.clone()),
        Form::TypeDecl(t) if t.name == name => Some(t.loc.clone()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_identifier_to_its_let_declaration() {
        let doc = OpenDocument::new("let a = 1\nlet b = a".to_string(), 1);
        let module = doc.module.as_ref().unwrap();
        let dang_syntax::Form::Let(b) = &module.forms[1] else { panic!() };
        let (line, col) = (b.value.loc().line, b.value.loc().column);
        let loc = definition_at(&doc, line, col).unwrap();
        assert_eq!(loc.line, 1);
    }

    #[test]
    fn undeclared_identifier_has_no_definition() {
        let doc = OpenDocument::new("let a = undeclared_name".to_string(), 1);
        let module = doc.module.as_ref().unwrap();
        let dang_syntax::Form::Let(a) = &module.forms[0] else { panic!() };
        let (line, col) = (a.value.loc().line, a.value.loc().column);
        assert!(definition_at(&doc, line, col).is_none());
    }
}
