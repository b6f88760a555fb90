//! The batch runner (spec.md §6's `<file|dir>` positional argument): parse,
//! strict-mode type-check, then evaluate — the same pipeline `ReplState::start_eval`
//! drives interactively, minus the TUI. Non-zero exit on any error, per
//! spec.md §7's "non-zero exit on batch mode".

use std::path::{Path, PathBuf};
use std::sync::Arc;

use colored::Colorize;
use dang_env::new_prelude_env;
use dang_infer::InferContext;
use dang_repl::{EvalLine, EvalOutcome, Evaluator, MockEvaluator};
use tokio_util::sync::CancellationToken;

fn collect_dang_files(path: &Path) -> std::io::Result<Vec<PathBuf>> {
    if path.is_dir() {
        let mut entries: Vec<PathBuf> = std::fs::read_dir(path)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().map(|ext| ext == "dang").unwrap_or(false))
            .collect();
        entries.sort();
        Ok(entries)
    } else {
        Ok(vec![path.to_path_buf()])
    }
}

/// Runs every `.dang` file under `path` in order, stopping at the first
/// error in each file's forms (spec.md §7's "eval loop stops at the first
/// error in a multi-form submission"). Returns the process exit code.
pub async fn run(path: &Path, evaluator: Arc<dyn Evaluator>) -> i32 {
    let files = match collect_dang_files(path) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("{}", format!("failed to read {}: {e}", path.display()).red());
            return 1;
        }
    };

    let mut exit_code = 0;
    for file in &files {
        if !run_file(file, evaluator.clone()).await {
            exit_code = 1;
        }
    }
    exit_code
}

async fn run_file(path: &Path, evaluator: Arc<dyn Evaluator>) -> bool {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", format!("Error: {}: {e}", path.display()).red());
            return false;
        }
    };

    let module = match dang_syntax::parse_module(&path.display().to_string(), &source) {
        Ok(m) => m,
        Err(errors) => {
            for e in errors {
                eprintln!("{}", format!("Error: {e}").red());
            }
            return false;
        }
    };

    let env = new_prelude_env();
    let mut ctx = InferContext::strict();
    if let Err(e) = dang_infer::infer_module(&mut ctx, &env, &module) {
        eprintln!("{}", format!("Error: {e}").red());
        return false;
    }

    let cancel = CancellationToken::new();
    let mut ok = true;
    let emit = |line: EvalLine| match line {
        EvalLine::Stdout(s) => println!("{s}"),
        EvalLine::Stderr(s) => eprintln!("{s}"),
        EvalLine::Result(s) => println!("{s}"),
    };
    match evaluator.eval(&source, cancel, &emit).await {
        EvalOutcome::Completed => {}
        EvalOutcome::Cancelled => {
            eprintln!("{}", "cancelled".red());
            ok = false;
        }
        EvalOutcome::Failed(e) => {
            eprintln!("{}", format!("Error: {e}").red());
            ok = false;
        }
    }
    ok
}
