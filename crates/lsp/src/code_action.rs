//! The namespaced-storage quick fix.

use std::collections::HashMap;

use lsp_types::{CodeAction, CodeActionKind, CodeActionOrCommand, Diagnostic, TextEdit, Uri, WorkspaceEdit};
use namespacer_core::{parse, LineIndex, ParseKind};
use namespacer_refactor::{candidates_for, DocumentSnapshot, FixRequest, NamespaceFix, FIX_TITLE};
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::diagnostics::{diagnostic_contract, lsp_range};

/// One quick fix per contract named by our diagnostics in `context`.
///
/// The document is re-parsed and the contract's candidates collected again,
/// so the fix always matches the current text even if the diagnostics are
/// stale.
pub fn compute_code_actions(
    uri: &Uri,
    content: &str,
    context: &[Diagnostic],
    config: &ServerConfig,
) -> Vec<CodeActionOrCommand> {
    let mut contracts: Vec<&str> = Vec::new();
    for diagnostic in context {
        if let Some(contract) = diagnostic_contract(diagnostic) {
            if !contracts.contains(&contract) {
                contracts.push(contract);
            }
        }
    }
    if contracts.is_empty() {
        return Vec::new();
    }

    let output = parse(ParseKind::SourceUnit, content);
    let index = LineIndex::new(content);
    let fixer = NamespaceFix::erc7201();

    let mut actions = Vec::new();
    for contract in contracts {
        let request = FixRequest {
            diagnostics: context
                .iter()
                .filter(|d| diagnostic_contract(d) == Some(contract))
                .cloned()
                .collect(),
            title: FIX_TITLE.to_string(),
            prefix: &config.namespace_prefix,
            contract_name: contract,
            variables: candidates_for(&output.tree, contract),
            document: DocumentSnapshot {
                id: uri.as_str(),
                text: content,
            },
        };
        let fix = match fixer.compute_fix(request) {
            Ok(Some(fix)) => fix,
            Ok(None) => {
                debug!(contract, "nothing to migrate");
                continue;
            }
            Err(e) => {
                warn!(contract, error = %e, "cannot compute namespaced storage fix");
                continue;
            }
        };

        let edits: Vec<TextEdit> = fix
            .edits_for(uri.as_str())
            .iter()
            .map(|edit| TextEdit {
                range: lsp_range(&index, edit.range),
                new_text: edit.replacement.clone(),
            })
            .collect();
        let mut changes = HashMap::new();
        changes.insert(uri.clone(), edits);

        actions.push(CodeActionOrCommand::CodeAction(CodeAction {
            title: fix.title,
            kind: Some(CodeActionKind::QUICKFIX),
            diagnostics: Some(fix.diagnostics),
            edit: Some(WorkspaceEdit {
                changes: Some(changes),
                ..Default::default()
            }),
            is_preferred: Some(true),
            ..Default::default()
        }));
    }
    actions
}
