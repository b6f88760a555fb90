//! The `lsp-server`/`lsp-types` main loop (spec.md §4.7): a synchronous
//! stdio `Connection`, dispatching each request/notification to the
//! adapter module that knows how to answer it. Grounded directly on the
//! crates' own documented usage shape (`Connection::stdio`, `initialize`,
//! then a blocking read loop over `connection.receiver`) since no example
//! source in this pack carries a complete `lsp-server` main loop to copy.

use anyhow::Result;
use lsp_server::{Connection, ErrorCode, Message, Notification as RawNotification, Request as RawRequest, RequestId, Response};
use lsp_types::notification::{
    DidChangeTextDocument, DidCloseTextDocument, DidOpenTextDocument, DidSaveTextDocument, Notification,
};
use lsp_types::request::{
    Completion, Formatting, GotoDefinition, HoverRequest, Rename, Request as _, WorkspaceSymbolRequest,
};
use lsp_types::{
    CompletionParams, DidChangeTextDocumentParams, DidCloseTextDocumentParams, DidOpenTextDocumentParams,
    DidSaveTextDocumentParams, DocumentFormattingParams, GotoDefinitionParams, GotoDefinitionResponse,
    HoverParams, PublishDiagnosticsParams, RenameParams, TextEdit, Url, WorkspaceSymbolParams,
};
use std::sync::Arc;

use crate::capabilities::server_capabilities;
use crate::document::DocumentStore;
use crate::formatter::Formatter;
use crate::{completion, definition, diagnostics, hover, rename, workspace_symbol};

pub fn run(formatter: Arc<dyn Formatter>) -> Result<()> {
    let (connection, io_threads) = Connection::stdio();
    let server_capabilities = serde_json::to_value(server_capabilities())?;
    let init_params = connection.initialize(server_capabilities)?;
    main_loop(&connection, init_params, formatter)?;
    io_threads.join()?;
    Ok(())
}

fn main_loop(connection: &Connection, _init_params: serde_json::Value, formatter: Arc<dyn Formatter>) -> Result<()> {
    let mut docs = DocumentStore::new();
    for msg in &connection.receiver {
        match msg {
            Message::Request(req) => {
                if connection.handle_shutdown(&req)? {
                    return Ok(());
                }
                let resp = handle_request(&docs, formatter.as_ref(), req);
                connection.sender.send(Message::Response(resp))?;
            }
            Message::Notification(not) => {
                handle_notification(connection, &mut docs, not)?;
            }
            Message::Response(_) => {}
        }
    }
    Ok(())
}

fn handle_request(docs: &DocumentStore, formatter: &dyn Formatter, req: RawRequest) -> Response {
    let id = req.id.clone();
    match req.method.as_str() {
        Completion::METHOD => respond(id, req, |p: CompletionParams| {
            let uri = &p.text_document_position.text_document.uri;
            let pos = p.text_document_position.position;
            docs.get(uri).map(|doc| completion::completions_at(doc, pos.line, pos.character))
        }),
        HoverRequest::METHOD => respond(id, req, |p: HoverParams| {
            let uri = &p.text_document_position_params.text_document.uri;
            let pos = p.text_document_position_params.position;
            docs.get(uri).and_then(|doc| hover::hover_at(doc, pos.line + 1, pos.character + 1))
        }),
        GotoDefinition::METHOD => respond(id, req, |p: GotoDefinitionParams| {
            let uri = &p.text_document_position_params.text_document.uri;
            let pos = p.text_document_position_params.position;
            docs.get(uri).and_then(|doc| definition::definition_at(doc, pos.line + 1, pos.character + 1)).map(|loc| {
                GotoDefinitionResponse::Scalar(lsp_types::Location { uri: uri.clone(), range: lsp_range(&loc) })
            })
        }),
        Rename::METHOD => respond(id, req, |p: RenameParams| {
            let uri = &p.text_document_position.text_document.uri;
            let pos = p.text_document_position.position;
            docs.get(uri)
                .and_then(|doc| rename::rename_at(doc, uri, pos.line + 1, pos.character + 1, &p.new_name))
        }),
        Formatting::METHOD => respond(id, req, |p: DocumentFormattingParams| {
            let doc = docs.get(&p.text_document.uri)?;
            let formatted = formatter.format(&doc.text)?;
            Some(vec![TextEdit { range: whole_document_range(&doc.text), new_text: formatted }])
        }),
        WorkspaceSymbolRequest::METHOD => respond(id, req, |p: WorkspaceSymbolParams| {
            Some(workspace_symbol::workspace_symbols(docs, &p.query))
        }),
        other => Response::new_err(id, ErrorCode::MethodNotFound as i32, format!("unhandled method: {other}")),
    }
}

fn respond<P, R>(id: RequestId, req: RawRequest, f: impl FnOnce(P) -> Option<R>) -> Response
where
    P: serde::de::DeserializeOwned,
    R: serde::Serialize,
{
    match serde_json::from_value::<P>(req.params) {
        Ok(params) => match f(params) {
            Some(result) => Response::new_ok(id, result),
            None => Response::new_ok(id, serde_json::Value::Null),
        },
        Err(e) => Response::new_err(id, ErrorCode::InvalidParams as i32, e.to_string()),
    }
}

fn handle_notification(connection: &Connection, docs: &mut DocumentStore, not: RawNotification) -> Result<()> {
    match not.method.as_str() {
        DidOpenTextDocument::METHOD => {
            let p: DidOpenTextDocumentParams = serde_json::from_value(not.params)?;
            docs.open(p.text_document.uri.clone(), p.text_document.text, p.text_document.version);
            publish_diagnostics(connection, docs, &p.text_document.uri)?;
        }
        DidChangeTextDocument::METHOD => {
            let p: DidChangeTextDocumentParams = serde_json::from_value(not.params)?;
            if let Some(change) = p.content_changes.into_iter().last() {
                docs.change(&p.text_document.uri, change.text, p.text_document.version);
                publish_diagnostics(connection, docs, &p.text_document.uri)?;
            }
        }
        DidSaveTextDocument::METHOD => {
            let _p: DidSaveTextDocumentParams = serde_json::from_value(not.params)?;
        }
        DidCloseTextDocument::METHOD => {
            let p: DidCloseTextDocumentParams = serde_json::from_value(not.params)?;
            docs.close(&p.text_document.uri);
        }
        _ => {}
    }
    Ok(())
}

fn publish_diagnostics(connection: &Connection, docs: &DocumentStore, uri: &Url) -> Result<()> {
    let Some(doc) = docs.get(uri) else { return Ok(()) };
    let params = PublishDiagnosticsParams {
        uri: uri.clone(),
        diagnostics: diagnostics::document_diagnostics(doc),
        version: Some(doc.version),
    };
    connection.sender.send(Message::Notification(RawNotification::new(
        "textDocument/publishDiagnostics".to_string(),
        params,
    )))?;
    Ok(())
}

fn lsp_range(loc: &dang_syntax::SourceLocation) -> lsp_types::Range {
    let (line, col) = loc.lsp_position();
    lsp_types::Range::new(lsp_types::Position::new(line, col), lsp_types::Position::new(line, col + loc.length))
}

fn whole_document_range(text: &str) -> lsp_types::Range {
    let lines: Vec<&str> = text.split('\n').collect();
    let last_len = lines.last().map(|l| l.chars().count()).unwrap_or(0) as u32;
    lsp_types::Range::new(
        lsp_types::Position::new(0, 0),
        lsp_types::Position::new(lines.len().saturating_sub(1) as u32, last_len),
    )
}
