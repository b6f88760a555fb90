//! The closed type algebra.
//!
//! `Type` is matched on, not dispatched through a trait object — a tagged
//! variant plus a switch, per the module graph's need to stay cheap to
//! clone and compare. Adding a new type variant means adding a match arm
//! here and in `unify`/`apply`/`free_vars`, not a new trait impl scattered
//! across the crate.

use std::collections::BTreeSet;
use std::fmt;

use crate::module::ModuleTypeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVar(pub u32);

impl fmt::Display for TypeVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    Var(TypeVar),
    Const(String),
    Function(Box<FunctionType>),
    Record(RecordType),
    List(Box<Type>),
    NonNull(Box<Type>),
    Module(ModuleTypeId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionType {
    pub args: RecordType,
    pub ret: Type,
    /// Trailing optional `Block` argument, itself shaped like a function.
    pub block: Option<Box<FunctionType>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordType {
    /// Declaration order preserved for printing and positional-call mapping.
    pub fields: Vec<RecordField>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordField {
    pub name: String,
    pub ty: Type,
    pub doc: Option<String>,
}

impl RecordType {
    pub fn field(&self, name: &str) -> Option<&RecordField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_at(&self, index: usize) -> Option<&RecordField> {
        self.fields.get(index)
    }
}

impl Type {
    pub fn unit() -> Type {
        Type::Const("Unit".into())
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, Type::NonNull(_))
    }

    /// Declared supertypes for coercion purposes. Only `NonNull(T)` has a
    /// static supertype (`T`); module supertypes are resolved through the
    /// arena since they need access to the declared chain.
    pub fn supertypes(&self) -> Vec<Type> {
        match self {
            Type::NonNull(inner) => vec![(**inner).clone()],
            _ => Vec::new(),
        }
    }

    pub fn free_vars(&self) -> BTreeSet<TypeVar> {
        let mut out = BTreeSet::new();
        self.collect_free_vars(&mut out);
        out
    }

    fn collect_free_vars(&self, out: &mut BTreeSet<TypeVar>) {
        match self {
            Type::Var(v) => {
                out.insert(*v);
            }
            Type::Const(_) | Type::Module(_) => {}
            Type::Function(f) => {
                f.args.collect_free_vars(out);
                f.ret.collect_free_vars(out);
                if let Some(block) = &f.block {
                    block.args.collect_free_vars(out);
                    block.ret.collect_free_vars(out);
                }
            }
            Type::Record(r) => {
                for field in &r.fields {
                    field.ty.collect_free_vars(out);
                }
            }
            Type::List(inner) | Type::NonNull(inner) => inner.collect_free_vars(out),
        }
    }
}

impl RecordType {
    fn collect_free_vars(&self, out: &mut BTreeSet<TypeVar>) {
        for field in &self.fields {
            field.ty.collect_free_vars(out);
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Var(v) => write!(f, "{v}"),
            Type::Const(name) => write!(f, "{name}"),
            Type::Function(ft) => {
                write!(f, "{}: {}", ft.args, ft.ret)?;
                if let Some(block) = &ft.block {
                    write!(f, " {{{}: {}}}", block.args, block.ret)?;
                }
                Ok(())
            }
            Type::Record(r) => write!(f, "{r}"),
            Type::List(inner) => write!(f, "[{inner}]"),
            Type::NonNull(inner) => write!(f, "{inner}!"),
            Type::Module(id) => write!(f, "#module{}", id.0),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", field.name, field.ty)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_vars_collects_from_nested_function() {
        let t = Type::Function(Box::new(FunctionType {
            args: RecordType {
                fields: vec![RecordField {
                    name: "x".into(),
                    ty: Type::Var(TypeVar(1)),
                    doc: None,
                }],
            },
            ret: Type::List(Box::new(Type::Var(TypeVar(2)))),
            block: None,
        }));
        let vars: Vec<_> = t.free_vars().into_iter().collect();
        assert_eq!(vars, vec![TypeVar(1), TypeVar(2)]);
    }

    #[test]
    fn display_is_structural() {
        let t = Type::NonNull(Box::new(Type::List(Box::new(Type::Const("String".into())))));
        assert_eq!(t.to_string(), "[String]!");
    }
}
