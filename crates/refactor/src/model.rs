//! Plain value types exchanged between the engine and its hosts.
//!
//! Nothing here knows about editors: the language server and the CLI
//! translate [`Fix`] into their own representations.

use std::collections::BTreeMap;

use namespacer_core::TextRange;
use serde::{Deserialize, Serialize};

/// A state variable selected for migration, captured before any edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    /// The struct field declaration, e.g. `mapping(address => uint256) balances;`.
    pub content: String,
    /// Span of the original declaration in the host document.
    pub range: TextRange,
}

/// Everything the catalog needs to print a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub contract_name: String,
    pub prefix: String,
    /// Declaration order; it becomes the container's field order.
    pub variables: Vec<Variable>,
}

/// Replace `range` of the original document with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditOperation {
    pub range: TextRange,
    pub replacement: String,
}

impl EditOperation {
    pub fn replace(range: TextRange, replacement: impl Into<String>) -> Self {
        EditOperation {
            range,
            replacement: replacement.into(),
        }
    }

    pub fn delete(range: TextRange) -> Self {
        EditOperation::replace(range, String::new())
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        EditOperation::replace(TextRange::empty(at), text)
    }
}

/// An atomic batch of edits, accepted or rejected as a whole.
///
/// `D` is whatever diagnostic type the host attaches to the fix.
#[derive(Debug, Clone, PartialEq)]
pub struct Fix<D> {
    pub title: String,
    /// Document id to edits, each list computed against that document's
    /// original text.
    pub edits: BTreeMap<String, Vec<EditOperation>>,
    pub diagnostics: Vec<D>,
}

impl<D> Fix<D> {
    pub fn edits_for(&self, document_id: &str) -> &[EditOperation] {
        self.edits
            .get(document_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// One immutable snapshot of a host document.
#[derive(Debug, Clone, Copy)]
pub struct DocumentSnapshot<'a> {
    pub id: &'a str,
    pub text: &'a str,
}

/// Input to [`crate::NamespaceFix::compute_fix`].
#[derive(Debug, Clone)]
pub struct FixRequest<'a, D> {
    pub diagnostics: Vec<D>,
    pub title: String,
    pub prefix: &'a str,
    pub contract_name: &'a str,
    pub variables: Vec<Variable>,
    pub document: DocumentSnapshot<'a>,
}
