//! Builds candidate lists for each [`crate::context::CompletionContext`]
//! variant out of an `Env`/`Type`, independent of ranking.

use dang_env::Env;
use dang_types::{FunctionType, ModuleArena, Type};

use crate::item::{CompletionItem, CompletionKind};

const KEYWORDS: &[&str] = &["let", "fn", "class", "record", "enum", "import", "true", "false"];

/// All visible bindings, keywords, and named types — the Lexical
/// candidate set. Excludes bindings whose scheme type is the synthetic
/// fresh-variable fallback resilient mode installs for a failed
/// declaration (those aren't real candidates, just placeholders so
/// references still resolve).
pub fn lexical_candidates(env: &Env) -> Vec<CompletionItem> {
    let mut out = Vec::new();
    for (name, scheme) in env.bindings(false, true) {
        if matches!(scheme.ty, Type::Var(_)) && scheme.is_monomorphic() {
            continue;
        }
        let doc = env.doc_string(&name);
        let kind = match &scheme.ty {
            Type::Function(_) => CompletionKind::Function,
            _ => CompletionKind::Variable,
        };
        let mut item = CompletionItem::new(name.clone(), kind, scheme.ty.to_string());
        if let Some(d) = doc {
            item = item.with_doc(d);
        }
        out.push(item);
    }
    for kw in KEYWORDS {
        out.push(CompletionItem::new(*kw, CompletionKind::Command, ""));
    }
    out
}

/// Fields of `receiver_ty`, unwrapping `NonNull`. Returns an empty list
/// (not an error) if the receiver isn't a record or module type — the
/// caller (LSP/REPL) decides whether an empty list is worth surfacing.
pub fn member_candidates(receiver_ty: &Type, arena: &ModuleArena) -> Vec<CompletionItem> {
    let stripped = match receiver_ty {
        Type::NonNull(inner) => inner.as_ref(),
        other => other,
    };
    match stripped {
        Type::Record(r) => r
            .fields
            .iter()
            .map(|f| {
                let mut item = CompletionItem::new(f.name.clone(), CompletionKind::Field, f.ty.to_string());
                if let Some(doc) = &f.doc {
                    item = item.with_doc(doc.clone());
                }
                item
            })
            .collect(),
        Type::Module(id) => {
            let module = arena.get(*id);
            module
                .fields
                .iter()
                .map(|(name, scheme)| {
                    let kind = match &scheme.ty {
                        Type::Function(_) => CompletionKind::Method,
                        _ => CompletionKind::Field,
                    };
                    CompletionItem::new(name.clone(), kind, scheme.ty.to_string())
                })
                .collect(),
        }
        _ => Vec::new(),
    }
}

/// Named parameters of `fn_ty`, minus any already supplied by name.
pub fn arg_candidates(fn_ty: &FunctionType, already_supplied: &[String]) -> Vec<CompletionItem> {
    fn_ty
        .args
        .fields
        .iter()
        .filter(|f| !already_supplied.iter().any(|s| s == &f.name))
        .map(|f| {
            CompletionItem::new(f.name.clone(), CompletionKind::Field, f.ty.to_string())
                .with_insert_text(format!("{}: ", f.name))
                .with_display_label(format!("{}: {}", f.name, f.ty))
        })
        .collect()
}

/// Single-match policy: the REPL suppresses the dropdown for exactly one
/// match but still shows the detail bubble for it.
pub fn should_show_dropdown(items: &[CompletionItem]) -> bool {
    items.len() > 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use dang_types::{RecordField, RecordType};

    #[test]
    fn member_candidates_unwraps_non_null() {
        let ty = Type::NonNull(Box::new(Type::Record(RecordType {
            fields: vec![RecordField { name: "stdout".into(), ty: Type::Const("String".into()), doc: None }],
        })));
        let arena = ModuleArena::new();
        let items = member_candidates(&ty, &arena);
        assert_eq!(items[0].label, "stdout");
    }

    #[test]
    fn arg_candidates_excludes_supplied_names() {
        let ft = FunctionType {
            args: RecordType {
                fields: vec![
                    RecordField { name: "args".into(), ty: Type::Const("String".into()), doc: None },
                    RecordField { name: "stdin".into(), ty: Type::Const("String".into()), doc: None },
                ],
            },
            ret: Type::unit(),
            block: None,
        };
        let items = arg_candidates(&ft, &["args".to_string()]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "stdin");
    }

    #[test]
    fn arg_candidates_set_insert_text_and_display_label() {
        let ft = FunctionType {
            args: RecordType {
                fields: vec![RecordField { name: "stdin".into(), ty: Type::Const("String".into()), doc: None }],
            },
            ret: Type::unit(),
            block: None,
        };
        let items = arg_candidates(&ft, &[]);
        assert_eq!(items[0].insert_text.as_deref(), Some("stdin: "));
        assert_eq!(items[0].display_label.as_deref(), Some("stdin: String"));
    }

    #[test]
    fn single_match_suppresses_dropdown() {
        assert!(!should_show_dropdown(&[CompletionItem::new("x", CompletionKind::Variable, "Int")]));
        assert!(should_show_dropdown(&[
            CompletionItem::new("x", CompletionKind::Variable, "Int"),
            CompletionItem::new("y", CompletionKind::Variable, "Int"),
        ]));
    }
}
