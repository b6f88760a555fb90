//! `dang completions <shell>` (SPEC_FULL.md's Supplemented features),
//! matching `codex_dashflow_cli::run_completions_command` exactly: generate
//! the shell's completion script for the derived `Args` onto stdout.

use clap::CommandFactory;
use clap_complete::generate;

use crate::args::{Args, CompletionsArgs};

pub fn run(args: &CompletionsArgs) {
    let mut cmd = Args::command();
    let shell: clap_complete::Shell = args.shell.into();
    generate(shell, &mut cmd, "dang", &mut std::io::stdout());
}
