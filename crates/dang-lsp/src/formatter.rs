//! Formatting is an external-collaborator seam (spec.md §4.7's
//! `textDocument/formatting`): the LSP adapter only knows how to turn a
//! formatter's whole-document output into a single `TextEdit`, not how to
//! format dang source itself.

pub trait Formatter: Send + Sync {
    /// Returns the fully formatted document, or `None` if `text` doesn't
    /// parse (the adapter reports an empty edit list in that case —
    /// formatting never surfaces its own diagnostics).
    fn format(&self, text: &str) -> Option<String>;
}

/// Stand-in used until a real formatter crate is wired in: normalizes
/// trailing whitespace only, so tests can exercise the edit-shape without
/// a full pretty-printer.
pub struct TrimTrailingWhitespaceFormatter;

impl Formatter for TrimTrailingWhitespaceFormatter {
    fn format(&self, text: &str) -> Option<String> {
        if dang_syntax::parse_module("<fmt>", text).is_err() {
            return None;
        }
        Some(text.lines().map(|l| l.trim_end()).collect::<Vec<_>>().join("\n") + "\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_whitespace_on_valid_input() {
        let formatter = TrimTrailingWhitespaceFormatter;
        let out = formatter.format("let a = 1   \n").unwrap();
        assert_eq!(out, "let a = 1\n");
    }

    #[test]
    fn returns_none_on_parse_error() {
        let formatter = TrimTrailingWhitespaceFormatter;
        assert!(formatter.format("let a = )").is_none());
    }
}
