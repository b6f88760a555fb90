use std::collections::HashMap;

use dang_types::{ModuleKind, ModuleTypeId, Scheme};
use indexmap::IndexMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// Mutable contents of one environment level. Bindings preserve insertion
/// order so completion listings are deterministic.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    pub bindings: IndexMap<String, (Scheme, Visibility)>,
    pub docstrings: HashMap<String, String>,
    pub named_types: HashMap<String, ModuleTypeId>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }
}

/// What kind of scope a frame represents; mirrors GraphQL's own type-kind
/// vocabulary plus `class` for user-declared dang types and `Block` for
/// plain lexical scopes with no module semantics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvKind {
    Root,
    Block,
    Module(ModuleKind),
}
