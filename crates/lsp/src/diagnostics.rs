//! Candidate-variable detection to diagnostic conversion.
//!
//! Every state variable that could move into namespaced storage gets one
//! warning. Only contracts the quick fix can actually handle are reported:
//! a contract that does not parse on its own, or whose name is shared by
//! another contract in the file, gets no diagnostics.

use lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Position, Range};
use namespacer_core::{parse, LineIndex, ParseKind, TextRange};
use namespacer_refactor::collect_candidates;
use namespacer_refactor::locate::locate_contract;
use tracing::debug;

/// `Diagnostic.source` of everything this server publishes.
pub const SOURCE: &str = "namespacer";
/// `Diagnostic.code` of the unmigrated-variable warning.
pub const CODE: &str = "namespaced-storage";

pub fn compute_diagnostics(content: &str) -> Vec<Diagnostic> {
    let output = parse(ParseKind::SourceUnit, content);
    let index = LineIndex::new(content);

    let mut diagnostics = Vec::new();
    for contract in collect_candidates(&output.tree) {
        match locate_contract(&output.tree, &contract.contract_name) {
            Ok(Some(_)) => {}
            Ok(None) => {
                debug!(contract = %contract.contract_name, "contract cannot be migrated");
                continue;
            }
            Err(e) => {
                debug!(contract = %contract.contract_name, error = %e, "skipping contract");
                continue;
            }
        }
        for variable in &contract.variables {
            // point at the declaration itself, not the widened line
            let range = declaration_range(content, variable.range);
            diagnostics.push(Diagnostic {
                range: lsp_range(&index, range),
                severity: Some(DiagnosticSeverity::WARNING),
                code: Some(NumberOrString::String(CODE.to_string())),
                source: Some(SOURCE.to_string()),
                message: format!(
                    "state variable `{}` of contract {} is not in namespaced storage",
                    variable.name, contract.contract_name
                ),
                data: Some(serde_json::json!({ "contract": contract.contract_name })),
                ..Default::default()
            });
        }
    }
    diagnostics
}

/// Contract a diagnostic of ours was raised for.
pub fn diagnostic_contract(diagnostic: &Diagnostic) -> Option<&str> {
    if diagnostic.source.as_deref() != Some(SOURCE) {
        return None;
    }
    diagnostic.data.as_ref()?.get("contract")?.as_str()
}

/// Byte range to LSP range.
pub fn lsp_range(index: &LineIndex<'_>, range: TextRange) -> Range {
    let (start, end) = index.range(range);
    Range::new(
        Position::new(start.line, start.character),
        Position::new(end.line, end.character),
    )
}

fn declaration_range(content: &str, range: TextRange) -> TextRange {
    let text = range.slice(content);
    let leading = text.len() - text.trim_start().len();
    let trailing = text.len() - text.trim_end().len();
    TextRange::new(range.start + leading, range.end - trailing)
}
