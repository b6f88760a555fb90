//! Internal span representation, independent of the OTLP wire format.

use std::collections::HashMap;
use std::time::{Duration, SystemTime};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpanId(pub String);

impl SpanId {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }
}

/// Status as reported directly on the span by whatever emitted it — not
/// the *derived* tree status ([`crate::status::DerivedStatus`]), which
/// additionally considers descendants and the `cached` attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportedStatus {
    Unset,
    Ok,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    Bool(bool),
    Str(String),
    Int(i64),
}

#[derive(Clone, Debug)]
pub struct Span {
    pub id: SpanId,
    pub parent_id: Option<SpanId>,
    pub name: String,
    pub start: SystemTime,
    pub end: Option<SystemTime>,
    pub reported_status: ReportedStatus,
    pub attributes: HashMap<String, AttributeValue>,
}

impl Span {
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.end.and_then(|e| e.duration_since(self.start).ok())
    }

    pub fn attr_bool(&self, key: &str) -> bool {
        matches!(self.attributes.get(key), Some(AttributeValue::Bool(true)))
    }

    pub fn cached(&self) -> bool {
        self.attr_bool("cached")
    }

    pub fn effect_running(&self) -> bool {
        self.attr_bool("effect-running")
    }
}

#[derive(Clone, Debug)]
pub struct LogRecord {
    pub span_id: Option<SpanId>,
    pub body: String,
    pub timestamp: SystemTime,
}
