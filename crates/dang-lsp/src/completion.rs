//! `textDocument/completion` (spec.md §4.7): bridges `dang-completion`'s
//! pure-text classifier and candidate builders into `lsp_types`. Context
//! classification always runs on the raw text (completion fires mid-typing,
//! when the document often doesn't parse at all); member/arg candidates
//! additionally resolve a type from the last successful inference pass and
//! fall back to lexical candidates whenever that resolution misses.

use dang_completion::{arg_candidates, lexical_candidates, member_candidates, rank, classify, CompletionContext};
use dang_types::{ModuleArena, Type};
use lsp_types::{CompletionItem as LspItem, CompletionItemKind, CompletionResponse};

use crate::document::OpenDocument;

pub fn completions_at(doc: &OpenDocument, line: u32, character: u32) -> CompletionResponse {
    let offset = line_col_to_offset(&doc.text, line, character);
    let ctx = classify(&doc.text, offset);

    let items = match &ctx {
        CompletionContext::Member { receiver, prefix } => match doc.env.scheme_of(receiver) {
            Some(scheme) => rank(member_candidates(&scheme.ty, &doc.arena), prefix),
            None => rank(lexical_candidates(&doc.env), prefix),
        },
        CompletionContext::Arg { already_supplied, prefix } => {
            match callee_fn_type(doc, offset, &doc.text) {
                Some(Type::Function(ft)) => rank(arg_candidates(&ft, already_supplied), prefix),
                _ => rank(lexical_candidates(&doc.env), prefix),
            }
        }
        CompletionContext::Lexical { prefix } => rank(lexical_candidates(&doc.env), prefix),
    };

    CompletionResponse::Array(items.into_iter().map(to_lsp_item).collect())
}

fn to_lsp_item(item: dang_completion::CompletionItem) -> LspItem {
    LspItem {
        label: item.label,
        kind: Some(match item.kind {
            dang_completion::CompletionKind::Variable => CompletionItemKind::VARIABLE,
            dang_completion::CompletionKind::Function => CompletionItemKind::FUNCTION,
            dang_completion::CompletionKind::Method => CompletionItemKind::METHOD,
            dang_completion::CompletionKind::Field => CompletionItemKind::FIELD,
            dang_completion::CompletionKind::Module => CompletionItemKind::MODULE,
            dang_completion::CompletionKind::Type => CompletionItemKind::CLASS,
            dang_completion::CompletionKind::Command => CompletionItemKind::KEYWORD,
        }),
        detail: Some(item.detail),
        documentation: item.documentation.map(|d| {
            lsp_types::Documentation::MarkupContent(lsp_types::MarkupContent {
                kind: lsp_types::MarkupKind::Markdown,
                value: d,
            })
        }),
        insert_text: item.insert_text,
        ..Default::default()
    }
}

fn line_col_to_offset(text: &str, line: u32, character: u32) -> usize {
    let mut offset = 0usize;
    for (i, l) in text.split('\n').enumerate() {
        if i as u32 == line {
            let char_offset: usize = l.chars().take(character as usize).map(|c| c.len_utf8()).sum();
            return offset + char_offset;
        }
        offset += l.len() + 1;
    }
    text.len()
}

/// Locates the call this `Arg` context's cursor is inside of and resolves
/// its callee's type, supporting both plain calls (`f(`) and single-level
/// method calls (`recv.method(`). Deeper chains (`a.b.c(`) fall back to
/// lexical candidates in [`completions_at`] — the same scope limitation
/// `dang-completion::context::classify` itself accepts for its `Member`
/// receiver (a single preceding identifier, not a full chain).
fn callee_fn_type(doc: &OpenDocument, cursor: usize, text: &str) -> Option<Type> {
    let open_paren = find_enclosing_open_paren(&text[..cursor])?;
    let before = text[..open_paren].trim_end();
    let (name_start, name) = scan_ident(before, before.len());
    if name.is_empty() {
        return None;
    }
    if name_start > 0 && before[..name_start].ends_with('.') {
        let dot_at = name_start - 1;
        let (_, receiver) = scan_ident(before, dot_at);
        let recv_ty = doc.env.scheme_of(&receiver)?.ty;
        field_type(&recv_ty, &name, &doc.arena)
    } else {
        doc.env.scheme_of(&name).map(|s| s.ty)
    }
}

fn scan_ident(text: &str, end: usize) -> (usize, String) {
    let mut i = end;
    while i > 0 {
        let c = text[..i].chars().last().unwrap();
        if c.is_alphanumeric() || c == '_' {
            i -= c.len_utf8();
        } else {
            break;
        }
    }
    (i, text[i..end].to_string())
}

fn find_enclosing_open_paren(before: &str) -> Option<usize> {
    let mut depth = 0i32;
    for (i, c) in before.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' => {
                if depth == 0 {
                    return Some(i);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

fn field_type(ty: &Type, field: &str, arena: &ModuleArena) -> Option<Type> {
    let stripped = match ty {
        Type::NonNull(inner) => inner.as_ref(),
        other => other,
    };
    match stripped {
        Type::Record(r) => r.fields.iter().find(|f| f.name == field).map(|f| f.ty.clone()),
        Type::Module(id) => arena.get(*id).fields.get(field).map(|s| s.ty.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexical_completion_offers_env_bindings() {
        let doc = OpenDocument::new("let a = 1\nlet b = a".to_string(), 1);
        let resp = completions_at(&doc, 1, 9);
        let CompletionResponse::Array(items) = resp else { panic!() };
        assert!(items.iter().any(|i| i.label == "a"));
    }

    #[test]
    fn member_completion_falls_back_to_lexical_when_receiver_unresolved() {
        let doc = OpenDocument::new("let a = unknown.".to_string(), 1);
        let resp = completions_at(&doc, 0, 16);
        let CompletionResponse::Array(items) = resp else { panic!() };
        // empty prefix after the dot: an unresolved receiver falls back to
        // every lexical binding, including "a" itself.
        assert!(items.iter().any(|i| i.label == "a"));
    }
}
