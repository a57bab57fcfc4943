//! Which state variables can move into namespaced storage.

use namespacer_core::text::line_start;
use namespacer_core::{NodeRef, NonterminalKind, SyntaxTree, TextRange};
use serde::Serialize;

use crate::model::Variable;

/// Attributes that keep a variable out of contract storage, or that a struct
/// field cannot carry.
const EXCLUDING_ATTRIBUTES: &[&str] = &["constant", "immutable", "transient"];

/// The migratable variables of one contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractCandidates {
    pub contract_name: String,
    pub contract_range: TextRange,
    pub variables: Vec<Variable>,
}

/// Every contract with at least one migratable state variable, in source
/// order. Interfaces and libraries own no storage and are never listed.
pub fn collect_candidates(tree: &SyntaxTree) -> Vec<ContractCandidates> {
    let mut found = Vec::new();
    let mut cursor = tree.cursor();
    while cursor.go_to_next_nonterminal_with_kind(NonterminalKind::ContractDefinition) {
        let contract = cursor.node();
        let Some(contract_name) = contract.name() else {
            continue;
        };
        let variables: Vec<Variable> = contract
            .children()
            .filter(|member| member.is_nonterminal_with_kind(NonterminalKind::StateVariableDefinition))
            .filter_map(|member| candidate(tree.text(), member))
            .collect();
        if variables.is_empty() {
            continue;
        }
        found.push(ContractCandidates {
            contract_name: contract_name.to_owned(),
            contract_range: contract.range(),
            variables,
        });
    }
    found
}

/// Candidates for one named contract, or an empty list.
pub fn candidates_for(tree: &SyntaxTree, contract_name: &str) -> Vec<Variable> {
    collect_candidates(tree)
        .into_iter()
        .find(|c| c.contract_name == contract_name)
        .map(|c| c.variables)
        .unwrap_or_default()
}

fn candidate(text: &str, declaration: NodeRef<'_>) -> Option<Variable> {
    let name = declaration.name()?;
    if declaration
        .child_with_kind(NonterminalKind::StateVariableInitializer)
        .is_some()
    {
        return None;
    }
    if let Some(attributes) = declaration.child_with_kind(NonterminalKind::StateVariableAttributes) {
        let excluded = attributes
            .significant_terminals()
            .any(|word| EXCLUDING_ATTRIBUTES.contains(&word.text()));
        if excluded {
            return None;
        }
    }
    let type_name = declaration.child_with_kind(NonterminalKind::TypeName)?;
    let type_text = type_name.text().trim();
    if type_text.is_empty() {
        return None;
    }

    Some(Variable {
        name: name.to_owned(),
        content: format!("{type_text} {name};"),
        range: line_range(text, declaration.range()),
    })
}

/// Widen `range` to its whole line, newline included, when nothing but
/// whitespace shares the line with it.
fn line_range(text: &str, range: TextRange) -> TextRange {
    let start = line_start(text, range.start);
    if !text[start..range.start].trim().is_empty() {
        return range;
    }
    let rest = &text[range.end..];
    let line_end = rest.find('\n').map(|i| range.end + i + 1).unwrap_or(text.len());
    if !text[range.end..line_end].trim().is_empty() {
        return range;
    }
    TextRange::new(start, line_end)
}
