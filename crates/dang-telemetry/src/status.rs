//! Derived tree status: spec.md's Span DB section gives an explicit
//! precedence order, which this module implements as a straight `if`
//! chain rather than a scored enum — the order in the prose *is* the
//! precedence (see DESIGN.md's Open Question decision for the
//! cached-vs-failed case).

use crate::span::{ReportedStatus, Span};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DerivedStatus {
    Running,
    Cached,
    Failed,
    Pending,
    Ok,
}

impl DerivedStatus {
    pub fn symbol(self) -> char {
        match self {
            DerivedStatus::Running => '●',
            DerivedStatus::Cached => '$',
            DerivedStatus::Failed => '✘',
            DerivedStatus::Pending => '○',
            DerivedStatus::Ok => '✔',
        }
    }
}

/// `has_live_child` / `has_failed_descendant` are computed by the caller
/// (`SpanDb`, which owns the parent/child index) since a single span has
/// no way to know about its descendants on its own.
pub fn derive_status(
    span: &Span,
    has_live_child: bool,
    has_failed_descendant: bool,
    logical_dependency_pending: bool,
) -> DerivedStatus {
    if span.is_open() || has_live_child {
        DerivedStatus::Running
    } else if span.cached() {
        DerivedStatus::Cached
    } else if span.reported_status == ReportedStatus::Error || has_failed_descendant {
        DerivedStatus::Failed
    } else if logical_dependency_pending {
        DerivedStatus::Pending
    } else {
        DerivedStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::SpanId;
    use std::collections::HashMap;
    use std::time::SystemTime;

    fn span(reported: ReportedStatus, open: bool) -> Span {
        Span {
            id: SpanId("a".into()),
            parent_id: None,
            name: "x".into(),
            start: SystemTime::now(),
            end: if open { None } else { Some(SystemTime::now()) },
            reported_status: reported,
            attributes: HashMap::new(),
        }
    }

    #[test]
    fn open_span_is_running() {
        let s = span(ReportedStatus::Unset, true);
        assert_eq!(derive_status(&s, false, false, false), DerivedStatus::Running);
    }

    #[test]
    fn failed_descendant_propagates() {
        let s = span(ReportedStatus::Ok, false);
        assert_eq!(derive_status(&s, false, true, false), DerivedStatus::Failed);
    }

    #[test]
    fn cached_takes_precedence_over_descendant_failure() {
        let mut s = span(ReportedStatus::Ok, false);
        s.attributes.insert("cached".into(), crate::span::AttributeValue::Bool(true));
        assert_eq!(derive_status(&s, false, true, false), DerivedStatus::Cached);
    }
}
