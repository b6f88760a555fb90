//! In-memory state for every file the client has open: its text, version,
//! the last successful parse, and the last (always resilient, spec.md
//! §4.7) inference pass against it.

use std::collections::HashMap;

use dang_env::{new_prelude_env, Env};
use dang_infer::{Annotations, InferContext, InferenceErrors};
use dang_syntax::{Module, ParseError};
use dang_types::ModuleArena;
use lsp_types::Url;

pub struct OpenDocument {
    pub text: String,
    pub version: i32,
    pub module: Option<Module>,
    pub parse_errors: Vec<ParseError>,
    pub env: Env,
    pub infer_errors: InferenceErrors,
    pub annotations: Annotations,
    pub arena: ModuleArena,
}

impl OpenDocument {
    pub fn new(text: String, version: i32) -> Self {
        let mut doc = Self {
            text,
            version,
            module: None,
            parse_errors: Vec::new(),
            env: new_prelude_env(),
            infer_errors: InferenceErrors::default(),
            annotations: Annotations::new(),
            arena: ModuleArena::new(),
        };
        doc.reanalyze();
        doc
    }

    /// Re-parses and re-infers the whole document. LSP always runs
    /// inference in resilient mode (spec.md §4.7) so a single syntax error
    /// elsewhere in the file doesn't blank out diagnostics/completions for
    /// everything else.
    pub fn reanalyze(&mut self) {
        match dang_syntax::parse_module("<lsp>", &self.text) {
            Ok(module) => {
                let base_env = new_prelude_env();
                let mut ctx = InferContext::resilient();
                let _ = dang_infer::infer_module(&mut ctx, &base_env, &module);
                self.infer_errors = ctx.errors;
                self.annotations = ctx.annotations;
                self.arena = ctx.arena;
                self.module = Some(module);
                self.parse_errors = Vec::new();
                self.env = base_env;
            }
            Err(errors) => {
                self.parse_errors = errors;
                self.module = None;
                self.infer_errors = InferenceErrors::default();
                self.annotations = Annotations::new();
                self.arena = ModuleArena::new();
            }
        }
    }
}

#[derive(Default)]
pub struct DocumentStore {
    docs: HashMap<Url, OpenDocument>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, uri: Url, text: String, version: i32) {
        self.docs.insert(uri, OpenDocument::new(text, version));
    }

    pub fn change(&mut self, uri: &Url, text: String, version: i32) {
        if let Some(doc) = self.docs.get_mut(uri) {
            doc.text = text;
            doc.version = version;
            doc.reanalyze();
        }
    }

    pub fn close(&mut self, uri: &Url) {
        self.docs.remove(uri);
    }

    pub fn get(&self, uri: &Url) -> Option<&OpenDocument> {
        self.docs.get(uri)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Url, &OpenDocument)> {
        self.docs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("file:///tmp/a.dang").unwrap()
    }

    #[test]
    fn open_then_get_round_trips() {
        let mut store = DocumentStore::new();
        store.open(url(), "let a = 1".to_string(), 1);
        assert!(store.get(&url()).unwrap().module.is_some());
    }

    #[test]
    fn change_reanalyzes_and_bumps_version() {
        let mut store = DocumentStore::new();
        store.open(url(), "let a = 1".to_string(), 1);
        store.change(&url(), "let a = 1\nlet b = a".to_string(), 2);
        let doc = store.get(&url()).unwrap();
        assert_eq!(doc.version, 2);
        assert_eq!(doc.module.as_ref().unwrap().forms.len(), 2);
    }

    #[test]
    fn parse_error_clears_module_but_keeps_doc_open() {
        let mut store = DocumentStore::new();
        store.open(url(), "let a = )".to_string(), 1);
        let doc = store.get(&url()).unwrap();
        assert!(doc.module.is_none());
        assert!(!doc.parse_errors.is_empty());
    }

    #[test]
    fn close_removes_document() {
        let mut store = DocumentStore::new();
        store.open(url(), "let a = 1".to_string(), 1);
        store.close(&url());
        assert!(store.get(&url()).is_none());
    }
}
