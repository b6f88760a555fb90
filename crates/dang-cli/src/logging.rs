//! Logging setup (SPEC_FULL.md's Ambient stack / Logging section):
//! `tracing` + `tracing-subscriber` + `tracing-appender`, same pairing
//! `codex_dashflow_mcp_server::run_mcp_server` uses for its own stderr
//! subscriber and `freddiehaddad-oxidized`'s `ox-bin` uses for its
//! rotating file appender. REPL/TUI mode never writes to stdout (the
//! alternate screen owns it) so logs go to a file under the config
//! directory; `--lsp` mode writes to stderr, or to `--lsp-log-file` if
//! given, since LSP's own JSON-RPC framing owns stdout/stdin.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Must be kept alive for the lifetime of the process; dropping it stops
/// the non-blocking writer's background flush thread.
pub struct LogGuard(#[allow(dead_code)] Option<WorkerGuard>);

fn env_filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::from_default_env().add_directive("debug".parse().unwrap())
    } else {
        EnvFilter::from_default_env()
    }
}

/// REPL/TUI mode: rotating file appender under `log_dir`, since stdout is
/// the terminal's alternate screen.
pub fn init_file_logging(log_dir: &Path, debug: bool) -> std::io::Result<LogGuard> {
    std::fs::create_dir_all(log_dir)?;
    let appender = tracing_appender::rolling::daily(log_dir, "dang.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = tracing_subscriber::fmt().with_env_filter(env_filter(debug)).with_writer(writer).try_init();
    Ok(LogGuard(Some(guard)))
}

/// `--lsp` mode: stderr by default, or a file at `log_file` if given
/// (spec.md §6's `--lsp-log-file <path>`).
pub fn init_lsp_logging(log_file: Option<&PathBuf>, debug: bool) -> std::io::Result<LogGuard> {
    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let _ = tracing_subscriber::fmt().with_env_filter(env_filter(debug)).with_writer(writer).try_init();
            Ok(LogGuard(Some(guard)))
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter(debug))
                .with_writer(std::io::stderr)
                .try_init();
            Ok(LogGuard(None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_filter_adds_debug_directive() {
        let filter = env_filter(true);
        assert!(filter.to_string().contains("debug"));
    }
}
