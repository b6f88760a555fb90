//! Append-only REPL history, persisted one entry per line with `\`→`\\`,
//! newline→`\n` escaping so a multi-line entry still occupies exactly one
//! line on disk. Grounded on the teacher's `crates/tui/src/history.rs`
//! (file-backed, capped, loaded at startup) but adds the escaping scheme
//! spec.md §4.6 requires, since the teacher's history is always
//! single-line shell commands.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

const MAX_HISTORY_ENTRIES: usize = 1000;
const HISTORY_FILE: &str = "history";

pub fn history_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(HISTORY_FILE)
}

fn escape(entry: &str) -> String {
    let mut out = String::with_capacity(entry.len());
    for ch in entry.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out
}

fn unescape(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('\\') => out.push('\\'),
                Some('n') => out.push('\n'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// In-memory history plus the file it's backed by. Navigation index `-1`
/// means "live buffer" (not browsing history); any other value is an
/// index into `entries`, most-recent last.
pub struct HistoryStore {
    path: Option<PathBuf>,
    entries: Vec<String>,
    nav_index: i64,
}

impl HistoryStore {
    pub fn load(config_dir: &Path) -> Self {
        let path = history_file_path(config_dir);
        let mut entries = match File::open(&path) {
            Ok(file) => BufReader::new(file)
                .lines()
                .map_while(Result::ok)
                .filter(|line| !line.is_empty())
                .map(|line| unescape(&line))
                .collect(),
            Err(_) => Vec::new(),
        };
        if entries.len() > MAX_HISTORY_ENTRIES {
            entries = entries.split_off(entries.len() - MAX_HISTORY_ENTRIES);
        }
        Self { path: Some(path), entries, nav_index: -1 }
    }

    pub fn in_memory() -> Self {
        Self { path: None, entries: Vec::new(), nav_index: -1 }
    }

    /// Appends `entry` unless it equals the immediately preceding one
    /// (consecutive-duplicate suppression only, per spec.md §4.6).
    pub fn append(&mut self, entry: &str) {
        if entry.trim().is_empty() {
            return;
        }
        if self.entries.last().map(|last| last == entry).unwrap_or(false) {
            self.nav_index = -1;
            return;
        }
        self.entries.push(entry.to_string());
        if self.entries.len() > MAX_HISTORY_ENTRIES {
            self.entries.remove(0);
        }
        self.nav_index = -1;

        let Some(path) = &self.path else { return };
        let file = OpenOptions::new().create(true).append(true).open(path);
        match file {
            Ok(mut f) => {
                if let Err(e) = writeln!(f, "{}", escape(entry)) {
                    tracing::warn!(error = %e, "failed to append to history file");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to open history file for append"),
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn nav_index(&self) -> i64 {
        self.nav_index
    }

    /// Moves one entry further back into history; returns the text to show,
    /// or `None` if already at the oldest entry.
    pub fn nav_up(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let next = if self.nav_index == -1 {
            self.entries.len() as i64 - 1
        } else {
            (self.nav_index - 1).max(0)
        };
        self.nav_index = next;
        self.entries.get(next as usize).map(|s| s.as_str())
    }

    /// Moves one entry forward; returns `Some("")`/live-buffer marker when
    /// navigating past the newest entry back to the live buffer.
    pub fn nav_down(&mut self) -> Option<&str> {
        if self.nav_index == -1 {
            return None;
        }
        if self.nav_index as usize + 1 >= self.entries.len() {
            self.nav_index = -1;
            return Some("");
        }
        self.nav_index += 1;
        self.entries.get(self.nav_index as usize).map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn escape_round_trips_backslash_and_newline() {
        let original = "a\\b\nc";
        assert_eq!(unescape(&escape(original)), original);
    }

    #[test]
    fn consecutive_duplicates_are_suppressed() {
        let mut store = HistoryStore::in_memory();
        store.append("1 + 1");
        store.append("1 + 1");
        assert_eq!(store.entries().len(), 1);
    }

    #[test]
    fn non_consecutive_duplicates_are_kept() {
        let mut store = HistoryStore::in_memory();
        store.append("1 + 1");
        store.append("2 + 2");
        store.append("1 + 1");
        assert_eq!(store.entries().len(), 3);
    }

    #[test]
    fn persists_and_reloads_multiline_entries() {
        let dir = TempDir::new().unwrap();
        let mut store = HistoryStore::load(dir.path());
        store.append("line one\nline two");
        let reloaded = HistoryStore::load(dir.path());
        assert_eq!(reloaded.entries(), &["line one\nline two".to_string()]);
    }

    #[test]
    fn reload_truncates_to_last_1000() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = HistoryStore::load(dir.path());
            for i in 0..1100 {
                store.append(&format!("entry {i}"));
            }
        }
        let reloaded = HistoryStore::load(dir.path());
        assert_eq!(reloaded.entries().len(), 1000);
        assert_eq!(reloaded.entries()[0], "entry 100");
    }

    #[test]
    fn nav_up_then_down_returns_to_live_buffer() {
        let mut store = HistoryStore::in_memory();
        store.append("first");
        store.append("second");
        assert_eq!(store.nav_up(), Some("second"));
        assert_eq!(store.nav_up(), Some("first"));
        assert_eq!(store.nav_down(), Some("second"));
        assert_eq!(store.nav_down(), Some(""));
        assert_eq!(store.nav_index(), -1);
    }
}
