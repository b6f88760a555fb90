//! Completion context classification and candidate ranking, per spec.md
//! §4.4. Pure functions over `Env`/`Type`/`&str` — no I/O, no AST
//! dependency, so it's equally usable from the REPL and the LSP adapter.

pub mod candidates;
pub mod context;
pub mod item;

pub use candidates::{arg_candidates, lexical_candidates, member_candidates, should_show_dropdown};
pub use context::{classify, enclosing_callee_name, CompletionContext};
pub use item::{rank, CompletionItem, CompletionKind};
