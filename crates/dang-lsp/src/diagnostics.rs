//! Diagnostics are derived from parse errors plus the accumulated
//! `InferenceErrors` of a resiliently-analyzed document (spec.md §4.7).
//! Every diagnostic carries a precise range where the node has one,
//! falling back to a zero-length range at the line start otherwise.

use dang_syntax::{ParseError, SourceLocation};
use lsp_types::{Diagnostic, DiagnosticSeverity, Position, Range};

use crate::document::OpenDocument;

pub(crate) fn range_for(loc: &SourceLocation) -> Range {
    let (line, col) = loc.lsp_position();
    let start = Position::new(line, col);
    let end = match loc.end {
        Some((end_line, end_col)) => Position::new(end_line.saturating_sub(1), end_col.saturating_sub(1)),
        None if loc.length > 0 => Position::new(line, col + loc.length),
        None => start,
    };
    Range::new(start, end)
}

pub fn parse_error_diagnostic(err: &ParseError) -> Diagnostic {
    Diagnostic {
        range: range_for(&err.loc),
        severity: Some(DiagnosticSeverity::ERROR),
        message: err.message.clone(),
        ..Default::default()
    }
}

pub fn document_diagnostics(doc: &OpenDocument) -> Vec<Diagnostic> {
    let mut out: Vec<Diagnostic> = doc.parse_errors.iter().map(parse_error_diagnostic).collect();
    out.extend(doc.infer_errors.iter().map(|e| Diagnostic {
        range: range_for(&e.loc),
        severity: Some(DiagnosticSeverity::ERROR),
        message: e.message.clone(),
        ..Default::default()
    }));
    out
}
