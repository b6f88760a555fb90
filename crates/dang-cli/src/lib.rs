//! The `dang` binary's library half (spec.md §6): argument parsing,
//! process wiring, config loading, logging setup, and every subcommand's
//! implementation, split out so it can be unit-tested without going
//! through `main`'s process-exit boundary — the same split the teacher
//! draws between `crates/cli/src/lib.rs` and `crates/cli/src/main.rs`.

pub mod app;
pub mod args;
pub mod batch;
pub mod cache;
pub mod completions_cmd;
pub mod config;
pub mod fmt_cmd;
pub mod logging;
pub mod render_debug;
pub mod render_stress;

pub use args::{Args, Command};
pub use config::DangConfig;
