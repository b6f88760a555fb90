//! A single REPL entry: the echoed input, a streaming log region, and a
//! result region, appended to in that order. Entries become immutable once
//! the evaluation that produced them finishes (spec.md's REPL Entries
//! section), which is what lets the TUI cache their rendered form instead
//! of re-laying-out 200+ past entries every frame.

use dang_tui::RenderCache;

#[derive(Debug, Clone, Default)]
pub struct EntryRegion {
    lines: Vec<String>,
}

impl EntryRegion {
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

pub struct Entry {
    pub echo: EntryRegion,
    pub logs: EntryRegion,
    pub result: EntryRegion,
    finished: bool,
    cache: RenderCache,
}

impl Entry {
    /// Starts a new entry with its echo region already populated; `logs`
    /// and `result` fill in as the evaluation runs.
    pub fn new(input: &str) -> Self {
        let mut echo = EntryRegion::default();
        for (i, line) in input.lines().enumerate() {
            if i == 0 {
                echo.push(format!("dang> {line}"));
            } else {
                echo.push(format!("  ... {line}"));
            }
        }
        Self {
            echo,
            logs: EntryRegion::default(),
            result: EntryRegion::default(),
            finished: false,
            cache: RenderCache::new(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Marks the entry immutable. Once finished, mutating `logs`/`result`
    /// further is a caller bug, not something this type prevents directly —
    /// the REPL state machine only ever writes to the live entry.
    pub fn finish(&mut self) {
        self.finished = true;
        self.cache.invalidate();
    }

    /// Unfinished entries bypass the cache outright: `logs`/`result` are
    /// still being pushed to by the in-flight evaluation and nothing marks
    /// individual pushes dirty, so the only correct cache key for a live
    /// entry is "not finished yet" -> always recompute. Once `finish()`
    /// runs, the content is frozen and the cache takes over for good.
    pub fn render(&mut self, width: u16) -> Vec<String> {
        if let Some(cached) = self.cache.get(width, !self.finished) {
            return cached.to_vec();
        }
        let mut lines = Vec::new();
        lines.extend(self.echo.lines().iter().cloned());
        lines.extend(self.logs.lines().iter().cloned());
        lines.extend(self.result.lines().iter().cloned());
        self.cache.store(width, lines.clone());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_prefixes_first_and_continuation_lines() {
        let entry = Entry::new("a +\nb");
        assert_eq!(entry.echo.lines(), &["dang> a +".to_string(), "  ... b".to_string()]);
    }

    #[test]
    fn render_concatenates_regions_in_order() {
        let mut entry = Entry::new("1 + 1");
        entry.logs.push("log line");
        entry.result.push("=> 2");
        let rendered = entry.render(80);
        assert_eq!(rendered, vec!["dang> 1 + 1".to_string(), "log line".to_string(), "=> 2".to_string()]);
    }

    #[test]
    fn finished_entry_renders_identically_on_repeat_calls() {
        let mut entry = Entry::new("1");
        entry.result.push("=> 1");
        entry.finish();
        let first = entry.render(80);
        let second = entry.render(80);
        assert_eq!(first, second);
    }
}
