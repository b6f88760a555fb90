//! The phased, resilient inference engine: walks a parsed [`dang_syntax::Module`]
//! and decorates it (via `NodeId`-keyed side tables) with inferred types and
//! scopes. Neither strict nor resilient mode mutates AST nodes directly.

pub mod annotations;
pub mod context;
pub mod error;
pub mod infer;
pub mod resolve;

pub use annotations::Annotations;
pub use context::InferContext;
pub use error::{InferError, InferenceErrors};
pub use infer::{infer_block, infer_expr, infer_module};
pub use resolve::resolve_type_ref;

#[cfg(test)]
mod tests {
    use super::*;
    use dang_env::new_prelude_env;
    use dang_syntax::parse_module;

    fn infer(src: &str, resilient: bool) -> (InferContext, dang_syntax::Module) {
        let module = parse_module("test.dang", src).expect("parse ok");
        let env = new_prelude_env();
        let mut ctx = if resilient { InferContext::resilient() } else { InferContext::strict() };
        let result = infer_module(&mut ctx, &env, &module);
        if !resilient {
            result.expect("strict inference ok");
        }
        (ctx, module)
    }

    #[test]
    fn infers_literal_let_binding() {
        let (ctx, module) = infer("let a = 1", false);
        let dang_syntax::Form::Let(l) = &module.forms[0] else { panic!() };
        let ty = ctx.annotations.inferred_type(l.value.id()).unwrap();
        assert_eq!(*ty, dang_types::Type::Const("Int".into()));
    }

    #[test]
    fn resilient_mode_continues_past_member_error() {
        // E3: `a` references a missing field; `b` is independent and
        // should still type-check and be annotated.
        let src = r#"
            fn container(): Unit { 1 }
            let a = container().missing
            let b = 2
        "#;
        let (ctx, module) = infer(src, true);
        assert!(!ctx.errors.is_empty());

        let dang_syntax::Form::Let(b) = module
            .forms
            .iter()
            .find_map(|f| match f {
                dang_syntax::Form::Let(l) if l.name == "b" => Some(f),
                _ => None,
            })
            .unwrap()
        else {
            panic!()
        };
        assert_eq!(
            *ctx.annotations.inferred_type(b.value.id()).unwrap(),
            dang_types::Type::Const("Int".into())
        );
    }

    #[test]
    fn strict_mode_short_circuits_on_first_error() {
        let module = parse_module("test.dang", "let a = undefined_name").unwrap();
        let env = new_prelude_env();
        let mut ctx = InferContext::strict();
        assert!(infer_module(&mut ctx, &env, &module).is_err());
    }

    #[test]
    fn idempotent_across_two_fresh_engines() {
        let src = "let a = 1\nlet b = a";
        let module = parse_module("test.dang", src).unwrap();

        let run = || {
            let env = new_prelude_env();
            let mut ctx = InferContext::strict();
            infer_module(&mut ctx, &env, &module).unwrap();
            let dang_syntax::Form::Let(b) = module.forms.iter().find_map(|f| match f {
                dang_syntax::Form::Let(l) if l.name == "b" => Some(f),
                _ => None,
            }).unwrap() else { panic!() };
            ctx.annotations.inferred_type(b.value.id()).unwrap().clone()
        };

        assert_eq!(run(), run());
    }
}
