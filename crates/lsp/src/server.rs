//! LSP server main loop with request/notification dispatch.
//!
//! Uses `lsp-server` (synchronous, crossbeam-based) for the transport.
//! Every request re-parses the current document text; nothing is cached
//! between requests apart from the open documents themselves.

use lsp_server::{Connection, Message, Notification, Response};
use lsp_types::notification::{
    DidChangeTextDocument, DidCloseTextDocument, DidOpenTextDocument, DidSaveTextDocument,
    Notification as _, PublishDiagnostics,
};
use lsp_types::request::CodeActionRequest;
use lsp_types::{
    CodeActionKind, CodeActionOptions, CodeActionProviderCapability, PublishDiagnosticsParams,
    SaveOptions, ServerCapabilities, TextDocumentSyncCapability, TextDocumentSyncKind,
    TextDocumentSyncOptions, TextDocumentSyncSaveOptions, Uri,
};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::code_action;
use crate::config::ServerConfig;
use crate::diagnostics;
use crate::document::DocumentState;

/// Run the LSP server over stdio until shutdown.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (connection, io_threads) = Connection::stdio();

    // ── Initialize handshake ──────────────────────────────────────────
    let server_capabilities = build_capabilities();
    let init_json = serde_json::to_value(&server_capabilities)?;
    let init_params: lsp_types::InitializeParams =
        serde_json::from_value(connection.initialize(init_json)?)?;
    let config = ServerConfig::from_initialization_options(init_params.initialization_options);
    info!(prefix = %config.namespace_prefix, "language server initialized");

    // ── Main loop ─────────────────────────────────────────────────────
    let mut doc_state = DocumentState::new();

    for msg in &connection.receiver {
        match msg {
            Message::Request(req) => {
                if connection.handle_shutdown(&req)? {
                    break;
                }
                handle_request(&connection, &doc_state, &config, req)?;
            }
            Message::Notification(not) => {
                handle_notification(&connection, &mut doc_state, not)?;
            }
            Message::Response(_) => {
                // Ignore responses (we don't send requests to the client)
            }
        }
    }

    io_threads.join()?;
    info!("language server stopped");
    Ok(())
}

pub fn build_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Options(
            TextDocumentSyncOptions {
                open_close: Some(true),
                change: Some(TextDocumentSyncKind::FULL),
                save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                    include_text: Some(false),
                })),
                ..Default::default()
            },
        )),
        code_action_provider: Some(CodeActionProviderCapability::Options(CodeActionOptions {
            code_action_kinds: Some(vec![CodeActionKind::QUICKFIX]),
            resolve_provider: Some(false),
            ..Default::default()
        })),
        ..Default::default()
    }
}

fn handle_request(
    connection: &Connection,
    doc_state: &DocumentState,
    config: &ServerConfig,
    req: lsp_server::Request,
) -> Result<(), Box<dyn std::error::Error>> {
    use lsp_types::request::Request as _;

    if req.method == CodeActionRequest::METHOD {
        let params: lsp_types::CodeActionParams = serde_json::from_value(req.params.clone())?;
        let uri = &params.text_document.uri;
        let content = get_document_content(doc_state, uri);
        let actions = code_action::compute_code_actions(
            uri,
            &content,
            &params.context.diagnostics,
            config,
        );
        debug!(uri = uri.as_str(), actions = actions.len(), "code actions");
        let result: Option<lsp_types::CodeActionResponse> =
            if actions.is_empty() { None } else { Some(actions) };
        let resp = Response::new_ok(req.id, serde_json::to_value(result)?);
        connection.sender.send(Message::Response(resp))?;
    } else {
        // Unknown request -- method not found
        let resp = Response::new_err(
            req.id,
            lsp_server::ErrorCode::MethodNotFound as i32,
            format!("method not found: {}", req.method),
        );
        connection.sender.send(Message::Response(resp))?;
    }
    Ok(())
}

/// Get document content either from open documents or from disk.
fn get_document_content(doc_state: &DocumentState, uri: &Uri) -> String {
    if let Some(doc) = doc_state.get(uri.as_str()) {
        doc.content.clone()
    } else {
        let path = uri_to_path(uri);
        std::fs::read_to_string(&path).unwrap_or_default()
    }
}

fn handle_notification(
    connection: &Connection,
    doc_state: &mut DocumentState,
    not: Notification,
) -> Result<(), Box<dyn std::error::Error>> {
    match not.method.as_str() {
        m if m == DidOpenTextDocument::METHOD => {
            let params: lsp_types::DidOpenTextDocumentParams = serde_json::from_value(not.params)?;
            let uri_str = params.text_document.uri.as_str().to_string();
            doc_state.open(
                &uri_str,
                params.text_document.version,
                params.text_document.text,
            );
            let published = document_diagnostics(doc_state, params.text_document.uri);
            publish_diagnostics(connection, published)?;
        }
        m if m == DidChangeTextDocument::METHOD => {
            let params: lsp_types::DidChangeTextDocumentParams =
                serde_json::from_value(not.params)?;
            let uri_str = params.text_document.uri.as_str().to_string();
            // FULL sync: last content change has the entire document
            if let Some(change) = params.content_changes.into_iter().last() {
                doc_state.change(&uri_str, params.text_document.version, change.text);
            }
            if doc_state.get(&uri_str).is_some() {
                let published = document_diagnostics(doc_state, params.text_document.uri);
                publish_diagnostics(connection, published)?;
            }
        }
        m if m == DidSaveTextDocument::METHOD => {
            let params: lsp_types::DidSaveTextDocumentParams = serde_json::from_value(not.params)?;
            let published = document_diagnostics(doc_state, params.text_document.uri);
            publish_diagnostics(connection, published)?;
        }
        m if m == DidCloseTextDocument::METHOD => {
            let params: lsp_types::DidCloseTextDocumentParams = serde_json::from_value(not.params)?;
            let uri_str = params.text_document.uri.as_str().to_string();
            doc_state.close(&uri_str);
            // Clear diagnostics for closed file
            let cleared = PublishDiagnosticsParams {
                uri: params.text_document.uri,
                diagnostics: Vec::new(),
                version: None,
            };
            publish_diagnostics(connection, cleared)?;
        }
        _ => {
            // Unknown notification -- ignore
        }
    }
    Ok(())
}

/// Diagnostics for `uri`, tagged with the version of the open document
/// they were computed from. Unopened documents are read from disk and
/// carry no version.
fn document_diagnostics(doc_state: &DocumentState, uri: Uri) -> PublishDiagnosticsParams {
    let (diagnostics, version) = match doc_state.get(uri.as_str()) {
        Some(doc) => (
            diagnostics::compute_diagnostics(&doc.content),
            Some(doc.version),
        ),
        None => (
            diagnostics::compute_diagnostics(&get_document_content(doc_state, &uri)),
            None,
        ),
    };
    PublishDiagnosticsParams {
        uri,
        diagnostics,
        version,
    }
}

/// Send `textDocument/publishDiagnostics` notification to the client.
fn publish_diagnostics(
    connection: &Connection,
    params: PublishDiagnosticsParams,
) -> Result<(), Box<dyn std::error::Error>> {
    debug!(
        uri = params.uri.as_str(),
        version = ?params.version,
        count = params.diagnostics.len(),
        "publishing diagnostics"
    );
    let not = Notification::new(PublishDiagnostics::METHOD.to_string(), params);
    connection.sender.send(Message::Notification(not))?;
    Ok(())
}

/// Convert an LSP URI to a file system path.
///
/// Handles `file:///path/to/file` URIs by stripping the scheme and authority
/// and percent-decoding (e.g. `%20` → ` `).
pub fn uri_to_path(uri: &Uri) -> PathBuf {
    let s = uri.as_str();
    if let Some(path) = s.strip_prefix("file://") {
        let decoded = percent_decode(path);
        // On Unix: file:///foo/bar -> /foo/bar
        // On Windows: file:///C:/foo -> C:/foo (strip leading /)
        #[cfg(windows)]
        {
            let decoded = decoded.strip_prefix('/').unwrap_or(&decoded);
            PathBuf::from(decoded)
        }
        #[cfg(not(windows))]
        {
            PathBuf::from(decoded)
        }
    } else {
        PathBuf::from(s)
    }
}

/// Decode percent-encoded bytes in a URI path. Multi-byte UTF-8 sequences
/// are decoded as a whole; invalid sequences are replaced.
fn percent_decode(input: &str) -> String {
    let mut bytes = Vec::with_capacity(input.len());
    let mut iter = input.bytes();
    while let Some(b) = iter.next() {
        if b == b'%' {
            let hi = iter.next();
            let lo = iter.next();
            match (hi, lo) {
                (Some(hi), Some(lo)) => match (hex_val(hi), hex_val(lo)) {
                    (Some(h), Some(l)) => bytes.push(h << 4 | l),
                    // Malformed percent encoding -- pass through
                    _ => bytes.extend_from_slice(&[b'%', hi, lo]),
                },
                (Some(hi), None) => bytes.extend_from_slice(&[b'%', hi]),
                _ => bytes.push(b'%'),
            }
        } else {
            bytes.push(b);
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_decoding() {
        assert_eq!(percent_decode("/a%20b/c.sol"), "/a b/c.sol");
        assert_eq!(percent_decode("/caf%C3%A9.sol"), "/caf\u{e9}.sol");
        assert_eq!(percent_decode("/bad%zz"), "/bad%zz");
        assert_eq!(percent_decode("/end%4"), "/end%4");
    }

    #[cfg(not(windows))]
    #[test]
    fn file_uri_to_path() {
        let uri: Uri = "file:///tmp/my%20box.sol".parse().unwrap();
        assert_eq!(uri_to_path(&uri), PathBuf::from("/tmp/my box.sol"));
    }

    #[test]
    fn diagnostics_carry_the_open_document_version() {
        let uri: Uri = "file:///box.sol".parse().unwrap();
        let mut state = DocumentState::new();
        state.open(uri.as_str(), 3, "contract Box { uint256 a; }".into());
        let params = document_diagnostics(&state, uri.clone());
        assert_eq!(params.version, Some(3));
        assert_eq!(params.diagnostics.len(), 1);

        state.change(uri.as_str(), 4, "contract Box {}".into());
        let params = document_diagnostics(&state, uri);
        assert_eq!(params.version, Some(4));
        assert!(params.diagnostics.is_empty());
    }

    #[test]
    fn advertises_quickfix_actions() {
        let caps = serde_json::to_value(build_capabilities()).unwrap();
        assert_eq!(caps["codeActionProvider"]["codeActionKinds"][0], "quickfix");
        assert_eq!(caps["textDocumentSync"]["change"], 1);
    }
}
