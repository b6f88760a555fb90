//! `NodeId`-keyed side tables: the only channel between inference and its
//! consumers (completion, LSP, hover). `dang-syntax` nodes never carry
//! these fields directly.

use std::collections::HashMap;

use dang_syntax::NodeId;
use dang_types::Type;

use dang_env::Env;

#[derive(Default)]
pub struct Annotations {
    types: HashMap<NodeId, Type>,
    scopes: HashMap<NodeId, Env>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_type(&mut self, node: NodeId, ty: Type) {
        self.types.insert(node, ty);
    }

    pub fn inferred_type(&self, node: NodeId) -> Option<&Type> {
        self.types.get(&node)
    }

    pub fn is_typed(&self, node: NodeId) -> bool {
        self.types.contains_key(&node)
    }

    pub fn set_scope(&mut self, node: NodeId, env: Env) {
        self.scopes.insert(node, env);
    }

    pub fn inferred_scope(&self, node: NodeId) -> Option<&Env> {
        self.scopes.get(&node)
    }
}
