//! Hierarchical environment frames: name and type resolution shared by
//! inference, completion, and the LSP's scope overlay.

pub mod env;
pub mod frame;
pub mod prelude;

pub use env::Env;
pub use frame::{EnvKind, Frame, Visibility};
pub use prelude::{new_prelude_env, resolve_primitive, PRIMITIVE_CONSTS};
