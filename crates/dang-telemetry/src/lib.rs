//! OTLP ingestion, the span database, and tree-text rendering for the
//! telemetry frontend (spec.md §4.8).

pub mod db;
pub mod ingest;
pub mod render;
pub mod server;
pub mod span;
pub mod status;
pub mod thresholds;

pub use db::{SpanDb, TraceRow};
pub use render::{ancestor_has_next_flags, render_tree};
pub use server::{spawn, TelemetryServer};
pub use span::{AttributeValue, LogRecord, ReportedStatus, Span, SpanId};
pub use status::DerivedStatus;
pub use thresholds::{GcThreshold, TooFastThreshold};
