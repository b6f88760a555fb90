use dang_env::{resolve_primitive, Env};
use dang_syntax::{SourceLocation, TypeRef};
use dang_types::Type;

use crate::error::InferError;

/// Resolves a syntactic [`TypeRef`] against `env`: named types first (so a
/// user `class Int { .. }` can shadow the primitive inside its own
/// module), then the primitive table, erroring if neither matches.
pub fn resolve_type_ref(tref: &TypeRef, env: &Env, loc: &SourceLocation) -> Result<Type, InferError> {
    let base = if let Some(list_of) = &tref.list_of {
        Type::List(Box::new(resolve_type_ref(list_of, env, loc)?))
    } else if let Some(id) = env.named_type(&tref.name) {
        Type::Module(id)
    } else if let Some(prim) = resolve_primitive(&tref.name) {
        prim
    } else {
        return Err(InferError::new(
            loc.clone(),
            format!("unknown type `{}`", tref.name),
        ));
    };
    Ok(if tref.non_null {
        Type::NonNull(Box::new(base))
    } else {
        base
    })
}
