//! Unification.

use thiserror::Error;

use crate::module::ModuleArena;
use crate::subst::{Substitutable, Substitution};
use crate::ty::{FunctionType, RecordType, Type, TypeVar};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum UnifyError {
    #[error("type mismatch: expected {expected}, found {found}")]
    Mismatch { expected: Type, found: Type },
    #[error("occurs check failed: {var} occurs in {ty}")]
    OccursCheck { var: TypeVar, ty: Type },
    #[error("arity mismatch: expected {expected} argument(s), found {found}")]
    Arity { expected: usize, found: usize },
    #[error("missing field `{name}`")]
    MissingField { name: String },
}

/// Unifies `a` and `b`, returning the substitution that makes them equal.
/// Symmetric: callers should not rely on which side is "expected" beyond
/// the error message's field order.
pub fn unify(a: &Type, b: &Type, arena: &ModuleArena) -> Result<Substitution, UnifyError> {
    match (a, b) {
        (Type::Var(v), other) | (other, Type::Var(v)) => bind(*v, other),
        (Type::Const(x), Type::Const(y)) if x == y => Ok(Substitution::new()),
        (Type::Const(_), Type::Const(_)) => Err(UnifyError::Mismatch {
            expected: a.clone(),
            found: b.clone(),
        }),
        (Type::List(x), Type::List(y)) => unify(x, y, arena),
        (Type::NonNull(x), Type::NonNull(y)) => unify(x, y, arena),
        // `a` is always the actual/found side, `b` the expected/declared
        // side (every caller in dang-infer passes them in that order). A
        // `NonNull(T)` actual may flow to a nullable `T` expected, so
        // unify its inner type directly; the reverse (nullable actual
        // against a `NonNull` expected) is never allowed.
        (Type::NonNull(x), other) => unify(x, other, arena),
        (other, Type::NonNull(_)) => Err(UnifyError::Mismatch {
            expected: b.clone(),
            found: other.clone(),
        }),
        (Type::Function(x), Type::Function(y)) => unify_function(x, y, arena),
        (Type::Record(x), Type::Record(y)) => unify_record(x, y, arena),
        (Type::Module(x), Type::Module(y)) => {
            if x == y || arena.is_subtype(*x, *y) || arena.is_subtype(*y, *x) {
                Ok(Substitution::new())
            } else {
                Err(UnifyError::Mismatch {
                    expected: a.clone(),
                    found: b.clone(),
                })
            }
        }
        _ => Err(UnifyError::Mismatch {
            expected: a.clone(),
            found: b.clone(),
        }),
    }
}

fn bind(v: TypeVar, ty: &Type) -> Result<Substitution, UnifyError> {
    if let Type::Var(other) = ty {
        if *other == v {
            return Ok(Substitution::new());
        }
    }
    if ty.free_vars().contains(&v) {
        return Err(UnifyError::OccursCheck { var: v, ty: ty.clone() });
    }
    Ok(Substitution::singleton(v, ty.clone()))
}

fn unify_function(
    x: &FunctionType,
    y: &FunctionType,
    arena: &ModuleArena,
) -> Result<Substitution, UnifyError> {
    let s1 = unify(&Type::Record(x.args.clone()), &Type::Record(y.args.clone()), arena)?;
    let s2 = unify(&x.ret.apply(&s1), &y.ret.apply(&s1), arena)?;
    let s2 = s2.compose(&s1);
    match (&x.block, &y.block) {
        (None, None) => Ok(s2),
        (Some(bx), Some(by)) => {
            let s3 = unify_function(bx, by, arena)?;
            Ok(s3.compose(&s2))
        }
        _ => Err(UnifyError::Arity {
            expected: x.block.is_some() as usize,
            found: y.block.is_some() as usize,
        }),
    }
}

fn unify_record(x: &RecordType, y: &RecordType, arena: &ModuleArena) -> Result<Substitution, UnifyError> {
    if x.fields.len() != y.fields.len() {
        return Err(UnifyError::Arity {
            expected: x.fields.len(),
            found: y.fields.len(),
        });
    }
    let mut sub = Substitution::new();
    for xf in &x.fields {
        let yf = y.field(&xf.name).ok_or_else(|| UnifyError::MissingField {
            name: xf.name.clone(),
        })?;
        let s = unify(&xf.ty.apply(&sub), &yf.ty.apply(&sub), arena)?;
        sub = s.compose(&sub);
    }
    Ok(sub)
}

/// `true` if a value of type `from` may be used where `to` is expected,
/// via `NonNull` stripping, declared module supertypes, or a module's
/// declared coercion sources.
pub fn coerces(from: &Type, to: &Type, arena: &ModuleArena) -> bool {
    if from == to {
        return true;
    }
    match (from, to) {
        (Type::NonNull(inner), _) => coerces(inner, to, arena),
        (Type::Module(f), Type::Module(t)) => arena.is_subtype(*f, *t),
        (Type::List(f), Type::List(t)) => coerces(f, t, arena),
        _ => {
            if let Type::Module(t) = to {
                arena.get(*t).coercion_sources.iter().any(|src| src == from)
            } else {
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::{RecordField, RecordType};

    #[test]
    fn unifies_equal_consts() {
        let arena = ModuleArena::new();
        let s = unify(&Type::Const("Int".into()), &Type::Const("Int".into()), &arena).unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn mismatched_consts_error() {
        let arena = ModuleArena::new();
        let err = unify(&Type::Const("Int".into()), &Type::Const("Bool".into()), &arena).unwrap_err();
        assert!(matches!(err, UnifyError::Mismatch { .. }));
    }

    #[test]
    fn occurs_check_rejects_self_reference() {
        let arena = ModuleArena::new();
        let v = TypeVar(0);
        let t = Type::List(Box::new(Type::Var(v)));
        let err = unify(&Type::Var(v), &t, &arena).unwrap_err();
        assert!(matches!(err, UnifyError::OccursCheck { .. }));
    }

    #[test]
    fn record_width_subtyping_disabled() {
        let arena = ModuleArena::new();
        let x = RecordType {
            fields: vec![RecordField { name: "a".into(), ty: Type::Const("Int".into()), doc: None }],
        };
        let y = RecordType {
            fields: vec![
                RecordField { name: "a".into(), ty: Type::Const("Int".into()), doc: None },
                RecordField { name: "b".into(), ty: Type::Const("Int".into()), doc: None },
            ],
        };
        let err = unify(&Type::Record(x), &Type::Record(y), &arena).unwrap_err();
        assert!(matches!(err, UnifyError::Arity { .. }));
    }

    #[test]
    fn non_null_coerces_to_nullable_but_not_reverse() {
        let arena = ModuleArena::new();
        let non_null = Type::NonNull(Box::new(Type::Const("String".into())));
        let nullable = Type::Const("String".into());
        assert!(coerces(&non_null, &nullable, &arena));
        assert!(!coerces(&nullable, &non_null, &arena));
    }

    #[test]
    fn unify_allows_non_null_actual_against_nullable_expected() {
        let arena = ModuleArena::new();
        let actual = Type::NonNull(Box::new(Type::Const("String".into())));
        let expected = Type::Const("String".into());
        assert!(unify(&actual, &expected, &arena).is_ok());
    }

    #[test]
    fn unify_rejects_nullable_actual_against_non_null_expected() {
        let arena = ModuleArena::new();
        let actual = Type::Const("String".into());
        let expected = Type::NonNull(Box::new(Type::Const("String".into())));
        let err = unify(&actual, &expected, &arena).unwrap_err();
        assert!(matches!(err, UnifyError::Mismatch { .. }));
    }

    #[test]
    fn unify_record_accepts_non_null_argument_for_nullable_parameter() {
        let arena = ModuleArena::new();
        let call_args = RecordType {
            fields: vec![RecordField {
                name: "stdin".into(),
                ty: Type::NonNull(Box::new(Type::Const("String".into()))),
                doc: None,
            }],
        };
        let params = RecordType {
            fields: vec![RecordField { name: "stdin".into(), ty: Type::Const("String".into()), doc: None }],
        };
        assert!(unify(&Type::Record(call_args), &Type::Record(params), &arena).is_ok());
    }
}
