//! Type values, substitution, schemes, and unification for the dang type
//! system. No dependency on `dang-syntax`: this crate only knows about
//! types, never about AST nodes.

pub mod fresher;
pub mod module;
pub mod scheme;
pub mod subst;
pub mod ty;
pub mod unify;

pub use fresher::Fresher;
pub use module::{ModuleArena, ModuleKind, ModuleType, ModuleTypeId};
pub use scheme::{generalize, instantiate, Scheme};
pub use subst::{Substitutable, Substitution};
pub use ty::{FunctionType, RecordField, RecordType, Type, TypeVar};
pub use unify::{coerces, unify, UnifyError};
