//! The root environment every module env descends from.

use dang_types::{Fresher, RecordField, RecordType, Scheme, Type};

use crate::env::Env;
use crate::frame::Visibility;

/// Primitive type-constant names resolvable without a `named_types` lookup.
/// Type-reference resolution checks `Env::named_type` first and falls back
/// to this list, so a user `class Int { .. }` declaration can still shadow
/// a primitive inside its own module.
pub const PRIMITIVE_CONSTS: &[&str] = &["Int", "Bool", "String", "Unit"];

pub fn resolve_primitive(name: &str) -> Option<Type> {
    PRIMITIVE_CONSTS
        .iter()
        .find(|&&p| p == name)
        .map(|&p| Type::Const(p.into()))
}

/// Builds the root env: primitive names plus a polymorphic `print`.
pub fn new_prelude_env() -> Env {
    let env = Env::root();
    let fresher = Fresher::new();
    let a = fresher.fresh();
    let print_scheme = Scheme {
        vars: vec![a],
        ty: Type::Function(Box::new(dang_types::FunctionType {
            args: RecordType {
                fields: vec![RecordField {
                    name: "value".into(),
                    ty: Type::Var(a),
                    doc: None,
                }],
            },
            ret: Type::unit(),
            block: None,
        })),
    };
    env.add("print", print_scheme, Visibility::Public);
    env.set_doc_string("print", "Writes a value to the REPL's log region.");
    env
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prelude_exposes_print() {
        let env = new_prelude_env();
        let scheme = env.scheme_of("print").expect("print bound");
        assert_eq!(scheme.vars.len(), 1);
    }

    #[test]
    fn primitive_consts_are_resolvable() {
        assert_eq!(resolve_primitive("Int"), Some(Type::Const("Int".into())));
        assert_eq!(resolve_primitive("Container"), None);
    }
}
