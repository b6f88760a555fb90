//! `textDocument/hover` (spec.md §4.7): find the most specific node under
//! the cursor, emit a markdown block with its inferred type and any
//! docstring found in the receiver env (member access) or an enclosing
//! scope (identifiers).

use dang_syntax::Expr;
use lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind};

use crate::document::OpenDocument;
use crate::locate::find_expr_in_module;

pub fn hover_at(doc: &OpenDocument, line: u32, col: u32) -> Option<Hover> {
    let module = doc.module.as_ref()?;
    let expr = find_expr_in_module(module, line, col)?;

    let ty = doc.annotations.inferred_type(expr.id());
    // Docstrings are only tracked on `Env` bindings (spec.md §4.3), so only
    // identifiers resolve one here; module fields (the member-access case)
    // have no per-field doc channel in this data model.
    let doc_string = match expr {
        Expr::Ident(ident) => doc.env.doc_string(&ident.name),
        _ => None,
    };

    let mut text = String::new();
    if let Some(ty) = ty {
        text.push_str(&format!("```\n{ty}\n```"));
    }
    if let Some(d) = doc_string {
        text.push_str("\n\n");
        text.push_str(&d);
    }
    if text.is_empty() {
        return None;
    }

    Some(Hover {
        contents: HoverContents::Markup(MarkupContent { kind: MarkupKind::Markdown, value: text }),
        range: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dang_syntax::Form;

    #[test]
    fn hover_on_identifier_shows_inferred_type() {
        let doc = OpenDocument::new("let a = 1\nlet b = a".to_string(), 1);
        let module = doc.module.as_ref().unwrap();
        let Form::Let(b) = &module.forms[1] else { panic!() };
        let (line, col) = (b.value.loc().line, b.value.loc().column);
        let hover = hover_at(&doc, line, col).unwrap();
        let HoverContents::Markup(content) = hover.contents else { panic!() };
        assert!(content.value.contains("Int"));
    }

    #[test]
    fn hover_outside_any_node_is_none() {
        let doc = OpenDocument::new("let a = 1".to_string(), 1);
        assert!(hover_at(&doc, 99, 99).is_none());
    }
}
