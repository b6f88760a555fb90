//! OTLP protobuf decoding: wire types in, internal [`Span`]/[`LogRecord`]
//! values out.

use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use opentelemetry_proto::tonic::collector::logs::v1::ExportLogsServiceRequest;
use opentelemetry_proto::tonic::collector::trace::v1::ExportTraceServiceRequest;
use opentelemetry_proto::tonic::common::v1::{any_value::Value as AnyValueKind, AnyValue, KeyValue};
use opentelemetry_proto::tonic::trace::v1::status::StatusCode;
use prost::Message;

use crate::span::{AttributeValue, LogRecord, ReportedStatus, Span, SpanId};

fn unix_nanos_to_system_time(nanos: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_nanos(nanos)
}

fn any_value_to_attribute(value: &AnyValue) -> Option<AttributeValue> {
    match value.value.as_ref()? {
        AnyValueKind::BoolValue(b) => Some(AttributeValue::Bool(*b)),
        AnyValueKind::StringValue(s) => Some(AttributeValue::Str(s.clone())),
        AnyValueKind::IntValue(i) => Some(AttributeValue::Int(*i)),
        _ => None,
    }
}

fn attributes_map(kvs: &[KeyValue]) -> HashMap<String, AttributeValue> {
    kvs.iter()
        .filter_map(|kv| {
            let value = kv.value.as_ref()?;
            any_value_to_attribute(value).map(|v| (kv.key.clone(), v))
        })
        .collect()
}

/// Decodes a raw `POST /v1/traces` body into internal spans.
pub fn decode_trace_request(body: &[u8]) -> Result<Vec<Span>, prost::DecodeError> {
    let req = ExportTraceServiceRequest::decode(body)?;
    let mut out = Vec::new();
    for rs in req.resource_spans {
        for ss in rs.scope_spans {
            for span in ss.spans {
                let reported_status = match span.status.as_ref().map(|s| s.code) {
                    Some(code) if code == StatusCode::Error as i32 => ReportedStatus::Error,
                    Some(code) if code == StatusCode::Ok as i32 => ReportedStatus::Ok,
                    _ => ReportedStatus::Unset,
                };
                out.push(Span {
                    id: SpanId::from_bytes(&span.span_id),
                    parent_id: if span.parent_span_id.is_empty() {
                        None
                    } else {
                        Some(SpanId::from_bytes(&span.parent_span_id))
                    },
                    name: span.name,
                    start: unix_nanos_to_system_time(span.start_time_unix_nano),
                    end: if span.end_time_unix_nano == 0 {
                        None
                    } else {
                        Some(unix_nanos_to_system_time(span.end_time_unix_nano))
                    },
                    reported_status,
                    attributes: attributes_map(&span.attributes),
                });
            }
        }
    }
    Ok(out)
}

/// Decodes a raw `POST /v1/logs` body into internal log records.
pub fn decode_logs_request(body: &[u8]) -> Result<Vec<LogRecord>, prost::DecodeError> {
    let req = ExportLogsServiceRequest::decode(body)?;
    let mut out = Vec::new();
    for rl in req.resource_logs {
        for sl in rl.scope_logs {
            for record in sl.log_records {
                let span_id = if record.span_id.is_empty() {
                    None
                } else {
                    Some(SpanId::from_bytes(&record.span_id))
                };
                let body = record
                    .body
                    .as_ref()
                    .and_then(any_value_to_attribute)
                    .map(|v| match v {
                        AttributeValue::Str(s) => s,
                        other => format!("{other:?}"),
                    })
                    .unwrap_or_default();
                out.push(LogRecord {
                    span_id,
                    body,
                    timestamp: unix_nanos_to_system_time(record.time_unix_nano),
                });
            }
        }
    }
    Ok(out)
}
