//! Type schemes: `∀ v₁..vₙ. T`.

use std::collections::BTreeSet;

use crate::fresher::Fresher;
use crate::subst::{Substitutable, Substitution};
use crate::ty::{Type, TypeVar};

#[derive(Clone, Debug, PartialEq)]
pub struct Scheme {
    pub vars: Vec<TypeVar>,
    pub ty: Type,
}

impl Scheme {
    /// A monomorphic scheme: zero quantified variables.
    pub fn mono(ty: Type) -> Self {
        Self { vars: Vec::new(), ty }
    }

    pub fn is_monomorphic(&self) -> bool {
        self.vars.is_empty()
    }
}

impl Substitutable for Scheme {
    fn apply(&self, sub: &Substitution) -> Scheme {
        // Quantified vars are bound by this scheme; don't let an outer
        // substitution reach through them.
        let mut inner = sub.clone();
        for v in &self.vars {
            inner.remove(v);
        }
        Scheme {
            vars: self.vars.clone(),
            ty: self.ty.apply(&inner),
        }
    }

    fn free_vars(&self) -> BTreeSet<TypeVar> {
        let mut vars = self.ty.free_vars();
        for v in &self.vars {
            vars.remove(v);
        }
        vars
    }
}

/// Replaces each quantified variable with a fresh one.
pub fn instantiate(scheme: &Scheme, fresher: &Fresher) -> Type {
    let mut sub = Substitution::new();
    for v in &scheme.vars {
        sub.insert(*v, Type::Var(fresher.fresh()));
    }
    scheme.ty.apply(&sub)
}

/// Quantifies every free variable of `t` that is not free in the
/// surrounding environment.
pub fn generalize(env_free_vars: &BTreeSet<TypeVar>, t: &Type) -> Scheme {
    let mut vars: Vec<TypeVar> = t
        .free_vars()
        .into_iter()
        .filter(|v| !env_free_vars.contains(v))
        .collect();
    vars.sort();
    Scheme { vars, ty: t.clone() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instantiate_produces_fresh_vars_each_call() {
        let scheme = Scheme {
            vars: vec![TypeVar(0)],
            ty: Type::List(Box::new(Type::Var(TypeVar(0)))),
        };
        let fresher = Fresher::new();
        let a = instantiate(&scheme, &fresher);
        let b = instantiate(&scheme, &fresher);
        assert_ne!(a, b);
    }

    #[test]
    fn generalize_only_quantifies_vars_free_in_env() {
        let env_free = BTreeSet::from([TypeVar(1)]);
        let t = Type::Record(crate::ty::RecordType {
            fields: vec![
                crate::ty::RecordField { name: "a".into(), ty: Type::Var(TypeVar(0)), doc: None },
                crate::ty::RecordField { name: "b".into(), ty: Type::Var(TypeVar(1)), doc: None },
            ],
        });
        let scheme = generalize(&env_free, &t);
        assert_eq!(scheme.vars, vec![TypeVar(0)]);
    }

    #[test]
    fn monomorphic_scheme_has_no_vars() {
        assert!(Scheme::mono(Type::Const("Int".into())).is_monomorphic());
    }
}
