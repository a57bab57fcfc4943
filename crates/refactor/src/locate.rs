//! Finding the contract a fix targets.

use namespacer_core::{parse, Cursor, NonterminalKind, ParseKind, SyntaxTree};
use tracing::{debug, warn};

use crate::error::RefactorError;

/// Cursor on the one well-formed contract named `contract_name`.
///
/// Every contract node is re-parsed on its own; one that does not parse
/// cleanly in isolation is skipped. Two well-formed contracts with the same
/// name are an error rather than a guess.
pub fn locate_contract<'t>(
    tree: &'t SyntaxTree,
    contract_name: &str,
) -> Result<Option<Cursor<'t>>, RefactorError> {
    let mut found: Option<Cursor<'t>> = None;
    let mut count = 0usize;

    let mut cursor = tree.cursor();
    while cursor.go_to_next_nonterminal_with_kind(NonterminalKind::ContractDefinition) {
        let contract = cursor.node();
        if contract.name() != Some(contract_name) {
            continue;
        }
        let fragment = parse(ParseKind::ContractDefinition, contract.text());
        if !fragment.is_valid() {
            debug!(
                contract = contract_name,
                start = contract.range().start,
                errors = fragment.errors.len(),
                "skipping contract that does not parse in isolation"
            );
            continue;
        }
        count += 1;
        if found.is_none() {
            found = Some(cursor.clone());
        }
    }

    if count > 1 {
        warn!(contract = contract_name, count, "contract name is ambiguous");
        return Err(RefactorError::AmbiguousContract {
            name: contract_name.to_owned(),
            count,
        });
    }
    Ok(found)
}

/// Fail unless `cursor` sits on a contract definition.
pub(crate) fn expect_contract(cursor: &Cursor<'_>) -> Result<(), RefactorError> {
    let node = cursor.node();
    if node.is_nonterminal_with_kind(NonterminalKind::ContractDefinition) {
        Ok(())
    } else {
        warn!(found = ?node.kind(), "cursor is not on a contract definition");
        Err(RefactorError::UnexpectedNode {
            expected: NonterminalKind::ContractDefinition,
            found: node.kind(),
            range: node.range(),
        })
    }
}
