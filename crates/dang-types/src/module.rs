//! Module types: named environments that also act as types (GraphQL object,
//! interface, enum, scalar, union, input, and `class` declarations).
//!
//! Bodies live in an arena indexed by a plain integer id rather than being
//! embedded in [`crate::ty::Type`] directly, so module-to-module references
//! (which are routinely cyclic — a `Container` field can return `Container`)
//! are just `u32`s and `Type` stays a cheap, `Copy`-friendly closed enum.

use indexmap::IndexMap;

use crate::scheme::Scheme;
use crate::ty::Type;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleTypeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModuleKind {
    Object,
    Interface,
    Enum,
    Scalar,
    Union,
    Input,
    Class,
}

#[derive(Clone, Debug)]
pub struct ModuleType {
    pub name: String,
    pub kind: ModuleKind,
    /// Fields/methods this module exposes, in declaration order.
    pub fields: IndexMap<String, Scheme>,
    /// Declared supertypes admitting coercion (spec: "ModuleType equal-by-
    /// identity unless a declared-supertypes chain admits coercion").
    pub supertypes: Vec<ModuleTypeId>,
    /// Types a scalar module accepts coercion from, e.g. a `Platform`
    /// scalar accepting bare `String` literals.
    pub coercion_sources: Vec<Type>,
}

impl ModuleType {
    pub fn new(name: impl Into<String>, kind: ModuleKind) -> Self {
        Self {
            name: name.into(),
            kind,
            fields: IndexMap::new(),
            supertypes: Vec::new(),
            coercion_sources: Vec::new(),
        }
    }
}

/// Interning arena for [`ModuleType`]s, keyed by [`ModuleTypeId`].
#[derive(Default, Clone, Debug)]
pub struct ModuleArena {
    modules: Vec<ModuleType>,
}

impl ModuleArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, module: ModuleType) -> ModuleTypeId {
        let id = ModuleTypeId(self.modules.len() as u32);
        self.modules.push(module);
        id
    }

    pub fn get(&self, id: ModuleTypeId) -> &ModuleType {
        &self.modules[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: ModuleTypeId) -> &mut ModuleType {
        &mut self.modules[id.0 as usize]
    }

    /// Walks `from`'s supertype chain looking for `to`, per the coercion
    /// rule for module-to-module subtyping.
    pub fn is_subtype(&self, from: ModuleTypeId, to: ModuleTypeId) -> bool {
        if from == to {
            return true;
        }
        let mut stack = self.get(from).supertypes.clone();
        let mut seen = std::collections::HashSet::new();
        while let Some(next) = stack.pop() {
            if next == to {
                return true;
            }
            if !seen.insert(next) {
                continue;
            }
            stack.extend(self.get(next).supertypes.iter().copied());
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtype_chain_transitive() {
        let mut arena = ModuleArena::new();
        let a = arena.insert(ModuleType::new("A", ModuleKind::Object));
        let mut b = ModuleType::new("B", ModuleKind::Object);
        b.supertypes.push(a);
        let b = arena.insert(b);
        let mut c = ModuleType::new("C", ModuleKind::Object);
        c.supertypes.push(b);
        let c = arena.insert(c);

        assert!(arena.is_subtype(c, a));
        assert!(!arena.is_subtype(a, c));
    }
}
