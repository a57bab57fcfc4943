use namespacer_core::{NodeKind, NonterminalKind, TextRange};

/// Failures of the migration engine. Absent structure (no such contract, no
/// variables, no existing container) is not an error: those paths return
/// `Ok(None)` or an empty edit list instead.
#[derive(Debug, thiserror::Error)]
pub enum RefactorError {
    /// More than one well-formed contract carries the requested name.
    #[error("contract {name} is defined {count} times in the document; refusing to guess which one to migrate")]
    AmbiguousContract { name: String, count: usize },

    /// A traversal landed on a node of the wrong kind. This is a bug in the
    /// caller or the traversal, never a property of the input.
    #[error("expected a {expected:?} node at {}..{}, found {found:?}", .range.start, .range.end)]
    UnexpectedNode {
        expected: NonterminalKind,
        found: NodeKind,
        range: TextRange,
    },

    /// Two edits of one batch touch the same text.
    #[error("edit at {}..{} overlaps edit at {}..{}", .first.start, .first.end, .second.start, .second.end)]
    OverlappingEdits { first: TextRange, second: TextRange },

    /// An edit points outside the document or into the middle of a character.
    #[error("edit at {}..{} does not fit a {len}-byte document", .range.start, .range.end)]
    EditOutOfBounds { range: TextRange, len: usize },
}
