//! Detecting a container the contract already declares.

use namespacer_core::{Cursor, NonterminalKind, TerminalKind, TextRange};
use tracing::debug;

use crate::catalog::NamespaceCatalog;
use crate::error::RefactorError;
use crate::locate::expect_contract;

/// Range of the closing `}` of the struct tagged with this contract's
/// namespace id, or `None` when no such struct exists. A tag with a
/// different id counts as no container.
pub fn detect_existing_container(
    contract: &Cursor<'_>,
    prefix: &str,
    contract_name: &str,
    catalog: &dyn NamespaceCatalog,
) -> Result<Option<TextRange>, RefactorError> {
    expect_contract(contract)?;
    let id = catalog.namespace_id(prefix, contract_name);

    let mut cursor = contract.spawn();
    while cursor.go_to_next_terminal_with_kind(TerminalKind::SingleLineNatSpecComment) {
        if !tags_namespace(cursor.node().text(), &id) {
            continue;
        }
        if !cursor.go_to_next_nonterminal_with_kind(NonterminalKind::StructDefinition) {
            debug!(namespace = %id, "storage tag is not followed by a struct");
            return Ok(None);
        }
        let mut inside = cursor.spawn();
        let mut closing = None;
        while inside.go_to_next_terminal_with_kind(TerminalKind::CloseBrace) {
            closing = Some(inside.text_range());
        }
        debug!(namespace = %id, ?closing, "found existing container");
        return Ok(closing);
    }
    Ok(None)
}

/// True if `comment` carries the storage-location tag for exactly `id`,
/// not for an id that merely starts with it.
fn tags_namespace(comment: &str, id: &str) -> bool {
    let tag = format!("@custom:storage-location erc7201:{id}");
    comment.match_indices(&tag).any(|(at, _)| {
        comment[at + tag.len()..]
            .chars()
            .next()
            .is_none_or(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '$' | '-')))
    })
}
