//! HTTP listener on an ephemeral port for OTLP ingestion. Unlike the
//! teacher's OAuth callback server (which bridges `tiny_http`'s blocking
//! `recv()` loop into an async channel because it needs to hand a single
//! request back to an awaiting future), ingestion has no caller waiting
//! on a particular request — each POST is ingest-and-forget — so this
//! runs the blocking loop directly on its own thread.

use std::io::Read;
use std::sync::{Arc, Mutex};

use tiny_http::{Response, Server};
use tracing::{debug, warn};

use crate::db::SpanDb;
use crate::ingest::{decode_logs_request, decode_trace_request};

pub struct TelemetryServer {
    pub addr: std::net::SocketAddr,
    handle: std::thread::JoinHandle<()>,
}

/// Starts the listener on an OS-assigned ephemeral port and returns
/// immediately; `on_ingest` is called (on the listener's thread, so it
/// must itself be cheap and thread-safe — typically just a dispatch-queue
/// enqueue) after every successful trace/log ingest.
pub fn spawn(db: Arc<Mutex<SpanDb>>, on_ingest: impl Fn() + Send + 'static) -> std::io::Result<TelemetryServer> {
    let server = Server::http("127.0.0.1:0").map_err(|e| std::io::Error::other(e.to_string()))?;
    let addr = server
        .server_addr()
        .to_ip()
        .ok_or_else(|| std::io::Error::other("tiny_http server has no IP address"))?;

    let handle = std::thread::spawn(move || {
        for mut request in server.incoming_requests() {
            let mut body = Vec::new();
            if let Err(e) = request.as_reader().read_to_end(&mut body) {
                warn!(error = %e, "failed to read OTLP request body");
                let _ = request.respond(Response::empty(400));
                continue;
            }
            let status = handle_request(&db, request.url(), &body);
            debug!(path = request.url(), status, "ingested OTLP request");
            let _ = request.respond(Response::empty(status));
            if status == 200 {
                on_ingest();
            }
        }
    });

    Ok(TelemetryServer { addr, handle })
}

impl TelemetryServer {
    pub fn join(self) -> std::thread::Result<()> {
        self.handle.join()
    }
}

fn handle_request(db: &Arc<Mutex<SpanDb>>, path: &str, body: &[u8]) -> u16 {
    match path {
        "/v1/traces" => match decode_trace_request(body) {
            Ok(spans) => {
                let mut db = db.lock().unwrap();
                for span in spans {
                    db.upsert_span(span);
                }
                200
            }
            Err(e) => {
                warn!(error = %e, "malformed OTLP trace payload");
                400
            }
        },
        "/v1/logs" => match decode_logs_request(body) {
            Ok(records) => {
                let mut db = db.lock().unwrap();
                for record in records {
                    db.append_log(record);
                }
                200
            }
            Err(e) => {
                warn!(error = %e, "malformed OTLP logs payload");
                400
            }
        },
        "/v1/metrics" => 200,
        _ => 404,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn unknown_metrics_path_returns_200() {
        let db = Arc::new(Mutex::new(SpanDb::new()));
        assert_eq!(handle_request(&db, "/v1/metrics", b""), 200);
    }

    #[test]
    fn unknown_path_returns_404() {
        let db = Arc::new(Mutex::new(SpanDb::new()));
        assert_eq!(handle_request(&db, "/v1/unknown", b""), 404);
    }

    #[test]
    fn malformed_trace_body_returns_400() {
        let db = Arc::new(Mutex::new(SpanDb::new()));
        assert_eq!(handle_request(&db, "/v1/traces", b"not-a-protobuf-message-\xff\xff"), 400);
    }
}
