//! Forward-only traversal handles over a [`SyntaxTree`].
//!
//! A cursor is three indices and a reference to the shared, immutable tree,
//! so cloning one is free and advancing a clone never disturbs the original.
//! Each cursor is bounded by the subtree it was created for: searches never
//! escape past the end of that subtree.

use crate::kinds::{NodeKind, NonterminalKind, TerminalKind};
use crate::text::TextRange;
use crate::tree::{NodeRef, SyntaxTree};

#[derive(Clone)]
pub struct Cursor<'t> {
    tree: &'t SyntaxTree,
    index: usize,
    end: usize,
    completed: bool,
}

impl<'t> Cursor<'t> {
    pub(crate) fn new(tree: &'t SyntaxTree, index: usize) -> Self {
        let end = if index < tree.len() {
            tree.data(index).subtree_end
        } else {
            index
        };
        Cursor {
            tree,
            index,
            end,
            completed: index >= tree.len(),
        }
    }

    /// The node the cursor is on. After a failed search the cursor stays
    /// on its last node and reports [`Cursor::is_completed`].
    pub fn node(&self) -> NodeRef<'t> {
        self.tree.node(self.index)
    }

    pub fn text_range(&self) -> TextRange {
        self.node().range()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// A new cursor over just the current node's subtree.
    pub fn spawn(&self) -> Cursor<'t> {
        Cursor::new(self.tree, self.index)
    }

    pub fn go_to_next_nonterminal_with_kind(&mut self, kind: NonterminalKind) -> bool {
        self.advance_to(|k| k == NodeKind::Nonterminal(kind))
    }

    pub fn go_to_next_terminal_with_kind(&mut self, kind: TerminalKind) -> bool {
        self.advance_to(|k| k == NodeKind::Terminal(kind))
    }

    pub fn go_to_next_terminal(&mut self) -> bool {
        self.advance_to(|k| matches!(k, NodeKind::Terminal(_)))
    }

    fn advance_to(&mut self, wanted: impl Fn(NodeKind) -> bool) -> bool {
        if self.completed {
            return false;
        }
        let found = (self.index + 1..self.end).find(|&i| wanted(self.tree.data(i).kind));
        match found {
            Some(index) => {
                self.index = index;
                true
            }
            None => {
                self.completed = true;
                false
            }
        }
    }
}

impl std::fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("node", &self.node())
            .field("completed", &self.completed)
            .finish()
    }
}
