//! `dang` — entry point. Mirrors `codex_dashflow_cli`'s `main.rs` shape:
//! parse `Args`, dispatch subcommands first, otherwise fall through to the
//! root flags and the default (batch run / REPL) behaviour. `anyhow::Result<()>`
//! at the top level, `std::process::exit` on any non-zero exit code.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use dang_repl::{HistoryStore, MockEvaluator};

use dang_cli::args::{Args, Command};
use dang_cli::{app, batch, cache, completions_cmd, fmt_cmd, logging, render_debug, render_stress, DangConfig};

fn history_dir() -> PathBuf {
    let data_home = std::env::var_os("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_home.join("dang")
}

fn log_dir() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("dang").join("logs")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.clear_cache {
        return match cache::clear_cache() {
            Ok(()) => Ok(()),
            Err(e) => {
                eprintln!("{}", format!("Error: failed to clear schema cache: {e}").red());
                std::process::exit(1);
            }
        };
    }

    if let Some(command) = &args.command {
        let exit_code = match command {
            Command::Fmt(fmt_args) => fmt_cmd::run(fmt_args),
            Command::RenderDebug(rd_args) => match render_debug::run(rd_args) {
                Ok(()) => 0,
                Err(e) => {
                    eprintln!("{}", format!("Error: {e}").red());
                    1
                }
            },
            Command::RenderStress(rs_args) => match render_stress::run(rs_args) {
                Ok(()) => 0,
                Err(e) => {
                    eprintln!("{}", format!("Error: {e}").red());
                    1
                }
            },
            Command::Completions(c_args) => {
                completions_cmd::run(c_args);
                0
            }
        };
        if exit_code != 0 {
            std::process::exit(exit_code);
        }
        return Ok(());
    }

    let config = DangConfig::load().unwrap_or_else(|e| {
        eprintln!("{}", format!("warning: failed to load config: {e}").yellow());
        DangConfig::default()
    });
    let debug = args.debug || config.debug;

    if args.lsp {
        let _guard = logging::init_lsp_logging(args.lsp_log_file.as_ref(), debug)?;
        let formatter = Arc::new(dang_lsp::TrimTrailingWhitespaceFormatter);
        if let Err(e) = dang_lsp::run(formatter) {
            eprintln!("{}", format!("Error: {e}").red());
            std::process::exit(1);
        }
        return Ok(());
    }

    let _guard = logging::init_file_logging(&log_dir(), debug)?;

    // `Evaluator` is an external-collaborator seam (spec.md §1 excludes the
    // GraphQL transport and the Dagger SDK's connection logic); production
    // wiring reuses the same `MockEvaluator` the REPL's own tests exercise,
    // since no in-scope component implements that connection. See DESIGN.md.
    let evaluator = Arc::new(MockEvaluator);

    if let Some(path) = &args.path {
        let exit_code = batch::run(path, evaluator).await;
        if exit_code != 0 {
            std::process::exit(exit_code);
        }
        return Ok(());
    }

    let history_dir = config.history_path.clone().unwrap_or_else(history_dir);
    let history = HistoryStore::load(&history_dir);
    app::run(history, evaluator).await
}
