//! Substitutions and the `Substitutable` capability.

use std::collections::{BTreeSet, HashMap};

use crate::ty::{FunctionType, RecordField, RecordType, Type, TypeVar};

/// A total mapping from type variables to types. Composition is
/// capture-avoiding: `a.compose(b)` applies `a` through every binding in
/// `b`, then adds whatever of `a` `b` didn't already cover.
#[derive(Clone, Debug, Default)]
pub struct Substitution(HashMap<TypeVar, Type>);

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn singleton(var: TypeVar, ty: Type) -> Self {
        let mut map = HashMap::new();
        map.insert(var, ty);
        Self(map)
    }

    pub fn get(&self, var: &TypeVar) -> Option<&Type> {
        self.0.get(var)
    }

    pub fn insert(&mut self, var: TypeVar, ty: Type) {
        self.0.insert(var, ty);
    }

    pub fn remove(&mut self, var: &TypeVar) {
        self.0.remove(var);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn compose(&self, other: &Substitution) -> Substitution {
        let mut out: HashMap<TypeVar, Type> =
            other.0.iter().map(|(v, t)| (*v, t.apply(self))).collect();
        for (v, t) in &self.0 {
            out.entry(*v).or_insert_with(|| t.clone());
        }
        Substitution(out)
    }
}

/// Anything a substitution can walk: types, schemes, record fields, and
/// collections of those.
pub trait Substitutable {
    fn apply(&self, sub: &Substitution) -> Self;
    fn free_vars(&self) -> BTreeSet<TypeVar>;
}

impl Substitutable for Type {
    fn apply(&self, sub: &Substitution) -> Type {
        match self {
            Type::Var(v) => match sub.get(v) {
                Some(replacement) => replacement.apply(sub),
                None => Type::Var(*v),
            },
            Type::Const(name) => Type::Const(name.clone()),
            Type::Module(id) => Type::Module(*id),
            Type::List(inner) => Type::List(Box::new(inner.apply(sub))),
            Type::NonNull(inner) => Type::NonNull(Box::new(inner.apply(sub))),
            Type::Function(ft) => Type::Function(Box::new(FunctionType {
                args: ft.args.apply(sub),
                ret: ft.ret.apply(sub),
                block: ft
                    .block
                    .as_ref()
                    .map(|b| Box::new(FunctionType {
                        args: b.args.apply(sub),
                        ret: b.ret.apply(sub),
                        block: None,
                    })),
            })),
            Type::Record(r) => Type::Record(r.apply(sub)),
        }
    }

    fn free_vars(&self) -> BTreeSet<TypeVar> {
        Type::free_vars(self)
    }
}

impl Substitutable for RecordType {
    fn apply(&self, sub: &Substitution) -> RecordType {
        RecordType {
            fields: self
                .fields
                .iter()
                .map(|f| RecordField {
                    name: f.name.clone(),
                    ty: f.ty.apply(sub),
                    doc: f.doc.clone(),
                })
                .collect(),
        }
    }

    fn free_vars(&self) -> BTreeSet<TypeVar> {
        let mut out = BTreeSet::new();
        for f in &self.fields {
            out.extend(f.ty.free_vars());
        }
        out
    }
}

impl<T: Substitutable> Substitutable for Vec<T> {
    fn apply(&self, sub: &Substitution) -> Vec<T> {
        self.iter().map(|x| x.apply(sub)).collect()
    }

    fn free_vars(&self) -> BTreeSet<TypeVar> {
        let mut out = BTreeSet::new();
        for x in self {
            out.extend(x.free_vars());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_applies_left_through_right() {
        let mut s1 = Substitution::new();
        s1.insert(TypeVar(0), Type::Var(TypeVar(1)));
        let mut s2 = Substitution::new();
        s2.insert(TypeVar(1), Type::Const("Int".into()));

        let composed = s2.compose(&s1);
        assert_eq!(
            Type::Var(TypeVar(0)).apply(&composed),
            Type::Const("Int".into())
        );
    }

    #[test]
    fn apply_is_idempotent_on_fully_resolved_type() {
        let sub = Substitution::singleton(TypeVar(0), Type::Const("Int".into()));
        let t = Type::Const("Int".into());
        assert_eq!(t.apply(&sub), t);
    }
}
