//! Language Server Protocol adapter (spec.md §4.7): a document store kept
//! resiliently analyzed on every edit, plus thin translations from that
//! analysis into `lsp_types` diagnostics, completion, hover, definition,
//! rename, formatting, and workspace-symbol responses.

pub mod capabilities;
pub mod completion;
pub mod definition;
pub mod diagnostics;
pub mod document;
pub mod formatter;
pub mod hover;
pub mod locate;
pub mod rename;
pub mod server;
pub mod workspace_symbol;

pub use capabilities::server_capabilities;
pub use document::{DocumentStore, OpenDocument};
pub use formatter::{Formatter, TrimTrailingWhitespaceFormatter};
pub use server::run;
