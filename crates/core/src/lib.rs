//! namespacer-core: full-fidelity Solidity syntax trees.
//!
//! Parses Solidity source into an immutable concrete syntax tree in which
//! every byte of the input, trivia included, belongs to exactly one leaf.
//! Refactoring tools walk the tree with independent [`Cursor`]s and
//! translate byte ranges to editor coordinates with [`LineIndex`].
//!
//! # Public API
//!
//! - [`parse()`] -- parse a whole file or a standalone contract fragment
//! - [`SyntaxTree`], [`NodeRef`] -- the tree and borrowed node views
//! - [`Cursor`] -- forward-only, cloneable traversal handle
//! - [`TextRange`], [`LineIndex`] -- byte ranges and position mapping
//! - [`ParseError`] -- syntax error reported next to the tree

pub mod cursor;
pub mod error;
pub mod kinds;
pub mod lexer;
pub mod parser;
pub mod text;
pub mod tree;

// ── Convenience re-exports ───────────────────────────────────────────

pub use cursor::Cursor;
pub use error::ParseError;
pub use kinds::{NodeKind, NonterminalKind, TerminalKind};
pub use parser::{parse, ParseKind, ParseOutput};
pub use text::{LineIndex, LinePosition, TextRange};
pub use tree::{NodeRef, SyntaxTree};
