//! `dang render-debug` (spec.md §6): a local SSE dashboard tailing the
//! JSONL render-perf log `DANG_DEBUG_RENDER` writes to. Grounded on
//! `dang_telemetry::server::spawn`'s `tiny_http`-on-its-own-thread shape;
//! unlike OTLP ingestion this server only ever answers GET requests, and
//! each `/events` request replies with every line currently in the log
//! formatted as SSE `data:` frames before closing — the browser's
//! `EventSource` auto-reconnects, so the dashboard re-polls the file every
//! few seconds without this server needing to hold connections open.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tiny_http::{Header, Response, Server};
use tracing::{info, warn};

use crate::args::RenderDebugArgs;

const INDEX_HTML: &str = r#"<!doctype html>
<html>
<head><title>dang render-debug</title></head>
<body style="font-family: monospace; background: #111; color: #eee;">
<h1>dang render-debug</h1>
<pre id="log"></pre>
<script>
const log = document.getElementById('log');
const es = new EventSource('/events');
es.onmessage = (e) => { log.textContent += e.data + "\n"; window.scrollTo(0, document.body.scrollHeight); };
</script>
</body>
</html>"#;

fn default_log_path() -> PathBuf {
    PathBuf::from("/tmp/dang_render_debug.log")
}

fn read_lines(path: &Path) -> Vec<String> {
    let Ok(file) = std::fs::File::open(path) else { return Vec::new() };
    BufReader::new(file).lines().map_while(Result::ok).collect()
}

fn sse_body(lines: &[String]) -> String {
    lines.iter().map(|l| format!("data: {l}\n\n")).collect()
}

/// Blocks serving the dashboard until the process is killed.
pub fn run(args: &RenderDebugArgs) -> std::io::Result<()> {
    let log_path = args.file.clone().unwrap_or_else(default_log_path);
    let server = Server::http(&args.addr).map_err(std::io::Error::other)?;
    let addr = server.server_addr().to_ip().ok_or_else(|| std::io::Error::other("no IP address"))?;
    let url = format!("http://{addr}/");
    info!(%url, log = %log_path.display(), "render-debug dashboard listening");
    println!("render-debug dashboard: {url}");

    if args.open {
        if let Err(e) = webbrowser::open(&url) {
            warn!(error = %e, "failed to open browser");
        }
    }

    for request in server.incoming_requests() {
        let (status, content_type, body): (u16, &str, String) = match request.url() {
            "/" => (200, "text/html; charset=utf-8", INDEX_HTML.to_string()),
            "/events" => (200, "text/event-stream", sse_body(&read_lines(&log_path))),
            _ => (404, "text/plain", String::new()),
        };
        let header = Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()).unwrap();
        let response = Response::from_string(body).with_status_code(status).with_header(header);
        let _ = request.respond(response);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn sse_body_formats_each_line_as_a_data_frame() {
        let body = sse_body(&["a".to_string(), "b".to_string()]);
        assert_eq!(body, "data: a\n\ndata: b\n\n");
    }

    #[test]
    fn read_lines_returns_empty_for_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(read_lines(&dir.path().join("nope.log")).is_empty());
    }

    #[test]
    fn read_lines_reads_every_line_in_an_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("render.log");
        std::fs::write(&path, "{\"a\":1}\n{\"b\":2}\n").unwrap();
        assert_eq!(read_lines(&path), vec!["{\"a\":1}".to_string(), "{\"b\":2}".to_string()]);
    }
}
