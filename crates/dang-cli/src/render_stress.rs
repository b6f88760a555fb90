//! `dang render-stress` (spec.md §6): drives `dang_repl::Entry`'s real
//! render-cache path over a large number of synthetic entries, timing each
//! render, so regressions in `dang-tui`'s `RenderCache` or `dang-repl`'s
//! entry layout show up as a number instead of "the TUI feels slow". When
//! `DANG_DEBUG_RENDER` is set, each measurement is appended as a JSONL
//! record to the same log `dang render-debug` tails (spec.md §6).

use std::io::Write;
use std::time::Instant;

use dang_repl::Entry;

use crate::args::RenderStressArgs;

const WIDTH: u16 = 100;

#[derive(serde::Serialize)]
struct RenderPerfRecord {
    entry: usize,
    width: u16,
    micros: u128,
    cached: bool,
}

fn render_perf_log_path() -> Option<std::path::PathBuf> {
    std::env::var_os("DANG_DEBUG_RENDER").map(|_| std::path::PathBuf::from("/tmp/dang_render_debug.log"))
}

fn append_record(path: &std::path::Path, record: &RenderPerfRecord) -> std::io::Result<()> {
    let mut file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", serde_json::to_string(record).unwrap())
}

/// Builds `args.lines` synthetic entries, rendering each twice (first pass
/// populates the cache, second pass should hit it), and prints a summary.
pub fn run(args: &RenderStressArgs) -> std::io::Result<()> {
    let log_path = render_perf_log_path();
    let mut total_micros: u128 = 0;
    let mut max_micros: u128 = 0;

    for i in 0..args.lines {
        let mut entry = Entry::new(&format!("stress_entry_{i}"));
        entry.result.push(format!("=> synthetic result {i}"));
        entry.finish();

        for cached in [false, true] {
            let start = Instant::now();
            entry.render(WIDTH);
            let micros = start.elapsed().as_micros();
            total_micros += micros;
            max_micros = max_micros.max(micros);

            if let Some(path) = &log_path {
                append_record(path, &RenderPerfRecord { entry: i, width: WIDTH, micros, cached })?;
            }
        }
    }

    let renders = args.lines * 2;
    println!(
        "render-stress: {} entries, {} renders, avg {}us, max {}us",
        args.lines,
        renders,
        total_micros.checked_div(renders as u128).unwrap_or(0),
        max_micros
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_without_error_for_a_small_batch() {
        let args = RenderStressArgs { lines: 5 };
        assert!(run(&args).is_ok());
    }
}
