//! The span database. Callers hold this behind a `std::sync::Mutex` —
//! the OTLP HTTP server writes from a request-handling thread, the TUI
//! reads it from the UI thread via a dispatch-queue closure, never both
//! at once.

use std::collections::HashMap;
use std::time::SystemTime;

use crate::span::{LogRecord, Span, SpanId};
use crate::status::{derive_status, DerivedStatus};
use crate::thresholds::{GcThreshold, TooFastThreshold};

#[derive(Default)]
pub struct SpanDb {
    spans: HashMap<SpanId, Span>,
    children: HashMap<SpanId, Vec<SpanId>>,
    roots: Vec<SpanId>,
    logs: Vec<LogRecord>,
}

impl SpanDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_span(&mut self, span: Span) {
        if let Some(parent) = &span.parent_id {
            let siblings = self.children.entry(parent.clone()).or_default();
            if !siblings.contains(&span.id) {
                siblings.push(span.id.clone());
            }
        } else if !self.roots.contains(&span.id) {
            self.roots.push(span.id.clone());
        }
        self.spans.insert(span.id.clone(), span);
    }

    pub fn append_log(&mut self, log: LogRecord) {
        self.logs.push(log);
    }

    pub fn logs(&self) -> &[LogRecord] {
        &self.logs
    }

    pub fn span(&self, id: &SpanId) -> Option<&Span> {
        self.spans.get(id)
    }

    fn has_failed_descendant(&self, id: &SpanId) -> bool {
        self.children.get(id).into_iter().flatten().any(|c| {
            let child = &self.spans[c];
            child.reported_status == crate::span::ReportedStatus::Error
                || self.has_failed_descendant(c)
        })
    }

    fn has_live_child(&self, id: &SpanId) -> bool {
        self.children.get(id).into_iter().flatten().any(|c| {
            let child = &self.spans[c];
            child.is_open() || child.effect_running() || self.has_live_child(c)
        })
    }

    pub fn status_of(&self, id: &SpanId) -> DerivedStatus {
        let span = &self.spans[id];
        derive_status(span, self.has_live_child(id), self.has_failed_descendant(id), false)
    }

    /// Evicts completed root subtrees whose root ended more than
    /// `threshold` ago.
    pub fn gc(&mut self, now: SystemTime, threshold: GcThreshold) {
        let stale: Vec<SpanId> = self
            .roots
            .iter()
            .filter(|id| {
                self.spans
                    .get(*id)
                    .and_then(|s| s.end)
                    .map(|end| now.duration_since(end).unwrap_or_default() > threshold.0)
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        for root in stale {
            self.evict_subtree(&root);
            self.roots.retain(|r| r != &root);
        }
    }

    fn evict_subtree(&mut self, id: &SpanId) {
        if let Some(kids) = self.children.remove(id) {
            for kid in &kids {
                self.evict_subtree(kid);
            }
        }
        self.spans.remove(id);
    }

    /// Builds the ordered row sequence consumers render, suppressing
    /// spans under `too_fast`.
    pub fn rows_view(&self, too_fast: TooFastThreshold) -> Vec<TraceRow> {
        let mut rows = Vec::new();
        for (i, root) in self.roots.iter().enumerate() {
            self.collect_rows(root, 0, i + 1 == self.roots.len(), too_fast, &mut rows);
        }
        rows
    }

    fn collect_rows(
        &self,
        id: &SpanId,
        depth: usize,
        is_last: bool,
        too_fast: TooFastThreshold,
        out: &mut Vec<TraceRow>,
    ) {
        let Some(span) = self.spans.get(id) else { return };
        if let Some(dur) = span.duration() {
            if dur < too_fast.0 {
                return;
            }
        }
        out.push(TraceRow {
            span_id: id.clone(),
            depth,
            has_next_sibling: !is_last,
            name: span.name.clone(),
            status: self.status_of(id),
            duration: span.duration(),
        });
        let empty = Vec::new();
        let kids = self.children.get(id).unwrap_or(&empty);
        for (i, kid) in kids.iter().enumerate() {
            self.collect_rows(kid, depth + 1, i + 1 == kids.len(), too_fast, out);
        }
    }
}

#[derive(Clone, Debug)]
pub struct TraceRow {
    pub span_id: SpanId,
    pub depth: usize,
    pub has_next_sibling: bool,
    pub name: String,
    pub status: DerivedStatus,
    pub duration: Option<std::time::Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::{AttributeValue, ReportedStatus};
    use std::time::Duration;

    fn span(id: &str, parent: Option<&str>, dur_ms: u64, status: ReportedStatus) -> Span {
        let start = SystemTime::UNIX_EPOCH;
        Span {
            id: SpanId(id.into()),
            parent_id: parent.map(|p| SpanId(p.into())),
            name: id.into(),
            start,
            end: Some(start + Duration::from_millis(dur_ms)),
            reported_status: status,
            attributes: HashMap::new(),
        }
    }

    #[test]
    fn rows_view_orders_depth_first_with_sibling_flag() {
        let mut db = SpanDb::new();
        db.upsert_span(span("root", None, 100, ReportedStatus::Ok));
        db.upsert_span(span("a", Some("root"), 100, ReportedStatus::Ok));
        db.upsert_span(span("b", Some("root"), 100, ReportedStatus::Ok));

        let rows = db.rows_view(TooFastThreshold(Duration::from_millis(0)));
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].span_id, SpanId("a".into()));
        assert!(rows[1].has_next_sibling);
        assert_eq!(rows[2].span_id, SpanId("b".into()));
        assert!(!rows[2].has_next_sibling);
    }

    #[test]
    fn too_fast_spans_are_suppressed() {
        let mut db = SpanDb::new();
        db.upsert_span(span("root", None, 1, ReportedStatus::Ok));
        let rows = db.rows_view(TooFastThreshold(Duration::from_millis(50)));
        assert!(rows.is_empty());
    }

    #[test]
    fn failed_descendant_marks_ancestor_failed() {
        let mut db = SpanDb::new();
        db.upsert_span(span("root", None, 100, ReportedStatus::Ok));
        db.upsert_span(span("child", Some("root"), 100, ReportedStatus::Error));
        assert_eq!(db.status_of(&SpanId("root".into())), crate::status::DerivedStatus::Failed);
    }

    #[test]
    fn gc_evicts_stale_completed_subtree() {
        let mut db = SpanDb::new();
        db.upsert_span(span("root", None, 100, ReportedStatus::Ok));
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1000);
        db.gc(now, GcThreshold(Duration::from_secs(1)));
        assert!(db.span(&SpanId("root".into())).is_none());
    }

    #[test]
    fn cached_attribute_reported() {
        let mut s = span("root", None, 100, ReportedStatus::Ok);
        s.attributes.insert("cached".into(), AttributeValue::Bool(true));
        let mut db = SpanDb::new();
        db.upsert_span(s);
        assert_eq!(db.status_of(&SpanId("root".into())), crate::status::DerivedStatus::Cached);
    }
}
