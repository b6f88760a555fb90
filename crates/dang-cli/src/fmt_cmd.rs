//! `dang fmt` (spec.md §6): format `.dang` files or directories, reusing
//! `dang_lsp::Formatter` so formatting logic lives in exactly one place —
//! the LSP's `textDocument/formatting` handler and this subcommand both
//! call the same trait object.

use std::path::{Path, PathBuf};

use colored::Colorize;
use dang_lsp::{Formatter, TrimTrailingWhitespaceFormatter};

use crate::args::FmtArgs;

/// Walks `paths`, expanding directories to their `.dang` files, non-recursively
/// sorted for deterministic output.
fn collect_dang_files(paths: &[PathBuf]) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(path)?
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.extension().map(|ext| ext == "dang").unwrap_or(false))
                .collect();
            entries.sort();
            files.extend(entries);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

/// Returns the process exit code: 0 if every file formatted cleanly (and,
/// under `-l`, none would change), 1 otherwise.
pub fn run(args: &FmtArgs) -> i32 {
    let formatter = TrimTrailingWhitespaceFormatter;
    let files = match collect_dang_files(&args.paths) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("{}", format!("failed to list input paths: {e}").red());
            return 1;
        }
    };

    let mut exit_code = 0;
    for path in &files {
        if !format_one(&formatter, path, args.write, args.list) {
            exit_code = 1;
        }
    }
    exit_code
}

fn format_one(formatter: &dyn Formatter, path: &Path, write: bool, list: bool) -> bool {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", format!("{}: {e}", path.display()).red());
            return false;
        }
    };
    let Some(formatted) = formatter.format(&source) else {
        eprintln!("{}", format!("{}: parse error", path.display()).red());
        return false;
    };
    let changed = formatted != source;

    if list {
        if changed {
            println!("{}", path.display());
        }
        return true;
    }
    if write {
        if changed {
            if let Err(e) = std::fs::write(path, &formatted) {
                eprintln!("{}", format!("{}: failed to write: {e}", path.display()).red());
                return false;
            }
        }
        return true;
    }
    print!("{formatted}");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_flag_rewrites_only_changed_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.dang");
        std::fs::write(&path, "let a = 1   \n").unwrap();
        let args = FmtArgs { paths: vec![path.clone()], write: true, list: false };
        assert_eq!(run(&args), 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "let a = 1\n");
    }

    #[test]
    fn parse_error_yields_nonzero_exit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.dang");
        std::fs::write(&path, "let a = )").unwrap();
        let args = FmtArgs { paths: vec![path], write: false, list: false };
        assert_eq!(run(&args), 1);
    }

    #[test]
    fn directories_expand_to_their_dang_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.dang"), "let a = 1\n").unwrap();
        std::fs::write(dir.path().join("b.txt"), "not dang\n").unwrap();
        let files = collect_dang_files(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(files, vec![dir.path().join("a.dang")]);
    }
}
