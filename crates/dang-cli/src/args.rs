//! `clap` derive `Args`/`Command`, mirroring `codex_dashflow_cli::Args`'s
//! shape: a flat struct of root flags plus an optional `#[command(subcommand)]`,
//! each subcommand wrapping its own small args struct. Exactly the flags
//! and subcommands spec.md §6 lists, no more.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// The dang interactive environment: REPL, TUI, Language Server, and batch runner.
#[derive(Parser, Debug, Clone)]
#[command(name = "dang")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// A `.dang` file or directory to run; if omitted, starts the REPL.
    pub path: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub debug: bool,

    /// Delete the on-disk GraphQL schema cache and exit.
    #[arg(long)]
    pub clear_cache: bool,

    /// Speak LSP over stdio instead of starting the REPL.
    #[arg(long)]
    pub lsp: bool,

    /// Redirect LSP logs to this file instead of stderr.
    #[arg(long)]
    pub lsp_log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Format `.dang` files or directories.
    Fmt(FmtArgs),
    /// Start a local SSE web dashboard tailing a JSONL render-perf log.
    RenderDebug(RenderDebugArgs),
    /// Interactive stress harness for the TUI render loop.
    RenderStress(RenderStressArgs),
    /// Generate shell completions for the CLI.
    Completions(CompletionsArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct FmtArgs {
    /// Files or directories of `.dang` source to format.
    pub paths: Vec<PathBuf>,

    /// Write formatted output back to each file in place.
    #[arg(short = 'w', long = "write")]
    pub write: bool,

    /// List files that would change, without writing or printing them.
    #[arg(short = 'l', long = "list")]
    pub list: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RenderDebugArgs {
    /// Address to bind the dashboard's HTTP server to.
    #[arg(long, default_value = "127.0.0.1:0")]
    pub addr: String,

    /// JSONL render-perf log to tail (default: `/tmp/dang_render_debug.log`).
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Open the dashboard in the default browser once it's listening.
    #[arg(long)]
    pub open: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RenderStressArgs {
    /// Number of synthetic entries to generate.
    #[arg(long, default_value_t = 200)]
    pub lines: usize,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CompletionsArgs {
    #[arg(value_enum)]
    pub shell: CliShell,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliShell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

impl From<CliShell> for clap_complete::Shell {
    fn from(shell: CliShell) -> Self {
        match shell {
            CliShell::Bash => clap_complete::Shell::Bash,
            CliShell::Zsh => clap_complete::Shell::Zsh,
            CliShell::Fish => clap_complete::Shell::Fish,
            CliShell::PowerShell => clap_complete::Shell::PowerShell,
            CliShell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_path_with_no_subcommand() {
        let args = Args::parse_from(["dang", "script.dang"]);
        assert_eq!(args.path, Some(PathBuf::from("script.dang")));
        assert!(args.command.is_none());
    }

    #[test]
    fn parses_fmt_subcommand_with_write_flag() {
        let args = Args::parse_from(["dang", "fmt", "-w", "a.dang", "b.dang"]);
        let Some(Command::Fmt(fmt)) = args.command else { panic!("expected Fmt") };
        assert!(fmt.write);
        assert_eq!(fmt.paths, vec![PathBuf::from("a.dang"), PathBuf::from("b.dang")]);
    }

    #[test]
    fn parses_lsp_flag_with_log_file() {
        let args = Args::parse_from(["dang", "--lsp", "--lsp-log-file", "/tmp/dang-lsp.log"]);
        assert!(args.lsp);
        assert_eq!(args.lsp_log_file, Some(PathBuf::from("/tmp/dang-lsp.log")));
    }
}
