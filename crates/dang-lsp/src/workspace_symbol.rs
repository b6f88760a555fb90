//! `workspace/symbol` (spec.md §4.7): case-insensitive substring search
//! over the top-level declarations of every currently open document. No
//! project-wide indexing — the running server only ever knows about files
//! the client has opened, consistent with this language having no module
//! resolution across files to crawl (spec.md §4.2).

use dang_syntax::{Form, Module};
use lsp_types::{Location, SymbolKind, Url, WorkspaceSymbolResponse};

use crate::document::DocumentStore;

pub fn workspace_symbols(store: &DocumentStore, query: &str) -> WorkspaceSymbolResponse {
    let query = query.to_lowercase();
    let mut out = Vec::new();
    for (uri, doc) in store.iter() {
        let Some(module) = doc.module.as_ref() else { continue };
        collect_symbols(module, uri, &query, &mut out);
    }
    WorkspaceSymbolResponse::Flat(out.into_iter().map(to_symbol_information).collect())
}

struct Found {
    name: String,
    kind: SymbolKind,
    uri: Url,
    loc: dang_syntax::SourceLocation,
}

fn collect_symbols(module: &Module, uri: &Url, query: &str, out: &mut Vec<Found>) {
    for form in &module.forms {
        let (name, kind, loc) = match form {
            Form::Let(l) => (&l.name, SymbolKind::VARIABLE, &l.loc),
            Form::FnDecl(f) => (&f.name, SymbolKind::FUNCTION, &f.loc),
            Form::TypeDecl(t) => (&t.name, SymbolKind::CLASS, &t.loc),
            _ => continue,
        };
        if query.is_empty() || name.to_lowercase().contains(query) {
            out.push(Found { name: name.clone(), kind, uri: uri.clone(), loc: loc.clone() });
        }
    }
}

fn to_symbol_information(found: Found) -> lsp_types::SymbolInformation {
    let range = crate::diagnostics::range_for(&found.loc);
    #[allow(deprecated)]
    lsp_types::SymbolInformation {
        name: found.name,
        kind: found.kind,
        tags: None,
        deprecated: None,
        location: Location { uri: found.uri, range },
        container_name: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentStore;

    fn url(name: &str) -> Url {
        Url::parse(&format!("file:///tmp/{name}.dang")).unwrap()
    }

    #[test]
    fn finds_matching_symbols_case_insensitively_across_files() {
        let mut store = DocumentStore::new();
        store.open(url("a"), "let fooBar = 1".to_string(), 1);
        store.open(url("b"), "let other = 2".to_string(), 1);
        let WorkspaceSymbolResponse::Flat(syms) = workspace_symbols(&store, "foobar") else { panic!() };
        assert_eq!(syms.len(), 1);
        assert_eq!(syms[0].name, "fooBar");
    }

    #[test]
    fn empty_query_returns_every_symbol() {
        let mut store = DocumentStore::new();
        store.open(url("a"), "let a = 1\nlet b = 2".to_string(), 1);
        let WorkspaceSymbolResponse::Flat(syms) = workspace_symbols(&store, "") else { panic!() };
        assert_eq!(syms.len(), 2);
    }
}
