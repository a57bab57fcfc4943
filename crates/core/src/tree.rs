//! Immutable concrete syntax tree.
//!
//! Nodes live in one vector in pre-order. A node's descendants are exactly
//! the contiguous slice after it, up to its `subtree_end`, which makes
//! forward traversal a plain index walk and lets any number of cursors share
//! the tree without interfering with each other.

use crate::cursor::Cursor;
use crate::kinds::{NodeKind, NonterminalKind, TerminalKind};
use crate::text::TextRange;

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) range: TextRange,
    /// Exclusive index one past the last descendant.
    pub(crate) subtree_end: usize,
    pub(crate) parent: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct SyntaxTree {
    text: String,
    nodes: Vec<NodeData>,
}

impl SyntaxTree {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            index: 0,
        }
    }

    /// A traversal handle over the whole tree, positioned on the root.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(self, 0)
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn data(&self, index: usize) -> &NodeData {
        &self.nodes[index]
    }

    pub(crate) fn node(&self, index: usize) -> NodeRef<'_> {
        NodeRef { tree: self, index }
    }
}

/// Borrowed view of one node.
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    tree: &'t SyntaxTree,
    index: usize,
}

impl<'t> NodeRef<'t> {
    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    pub fn nonterminal_kind(&self) -> Option<NonterminalKind> {
        match self.kind() {
            NodeKind::Nonterminal(kind) => Some(kind),
            NodeKind::Terminal(_) => None,
        }
    }

    pub fn terminal_kind(&self) -> Option<TerminalKind> {
        match self.kind() {
            NodeKind::Terminal(kind) => Some(kind),
            NodeKind::Nonterminal(_) => None,
        }
    }

    pub fn is_nonterminal_with_kind(&self, kind: NonterminalKind) -> bool {
        self.nonterminal_kind() == Some(kind)
    }

    pub fn is_terminal_with_kind(&self, kind: TerminalKind) -> bool {
        self.terminal_kind() == Some(kind)
    }

    pub fn range(&self) -> TextRange {
        self.data().range
    }

    /// The node's source text, trivia included.
    pub fn text(&self) -> &'t str {
        self.range().slice(&self.tree.text)
    }

    pub fn parent(&self) -> Option<NodeRef<'t>> {
        self.data().parent.map(|index| self.tree.node(index))
    }

    pub fn children(&self) -> Children<'t> {
        Children {
            tree: self.tree,
            next: self.index + 1,
            end: self.data().subtree_end,
        }
    }

    pub fn child_with_kind(&self, kind: NonterminalKind) -> Option<NodeRef<'t>> {
        self.children().find(|c| c.is_nonterminal_with_kind(kind))
    }

    /// All leaves below this node, in source order.
    pub fn terminals(&self) -> impl Iterator<Item = NodeRef<'t>> + 't {
        let tree = self.tree;
        (self.index..self.data().subtree_end)
            .map(move |index| tree.node(index))
            .filter(|node| node.terminal_kind().is_some())
    }

    /// Leaves below this node that are not trivia.
    pub fn significant_terminals(&self) -> impl Iterator<Item = NodeRef<'t>> + 't {
        self.terminals()
            .filter(|node| node.terminal_kind().is_some_and(|k| !k.is_trivia()))
    }

    /// Text of the identifier wrapped by this node's `Name` child, if any.
    pub fn name(&self) -> Option<&'t str> {
        let name = self.child_with_kind(NonterminalKind::Name)?;
        name.significant_terminals()
            .next()
            .map(|identifier| identifier.text())
    }

    /// A cursor limited to this node's subtree, positioned on the node.
    pub fn cursor(&self) -> Cursor<'t> {
        Cursor::new(self.tree, self.index)
    }

    fn data(&self) -> &'t NodeData {
        self.tree.data(self.index)
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}@{}..{}", self.kind(), self.range().start, self.range().end)
    }
}

pub struct Children<'t> {
    tree: &'t SyntaxTree,
    next: usize,
    end: usize,
}

impl<'t> Iterator for Children<'t> {
    type Item = NodeRef<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let node = self.tree.node(self.next);
        self.next = self.tree.data(self.next).subtree_end;
        Some(node)
    }
}

/// Builds a [`SyntaxTree`] from a stream of leaf and node boundaries.
pub(crate) struct TreeBuilder {
    text: String,
    nodes: Vec<NodeData>,
    open: Vec<usize>,
    offset: usize,
}

impl TreeBuilder {
    pub(crate) fn new(text: &str) -> Self {
        TreeBuilder {
            text: text.to_owned(),
            nodes: Vec::new(),
            open: Vec::new(),
            offset: 0,
        }
    }

    pub(crate) fn start_node(&mut self, kind: NonterminalKind) {
        let index = self.nodes.len();
        self.nodes.push(NodeData {
            kind: NodeKind::Nonterminal(kind),
            range: TextRange::empty(self.offset),
            subtree_end: index + 1,
            parent: self.open.last().copied(),
        });
        self.open.push(index);
    }

    pub(crate) fn token(&mut self, kind: TerminalKind, range: TextRange) {
        debug_assert_eq!(range.start, self.offset, "tokens must be contiguous");
        let index = self.nodes.len();
        self.nodes.push(NodeData {
            kind: NodeKind::Terminal(kind),
            range,
            subtree_end: index + 1,
            parent: self.open.last().copied(),
        });
        self.offset = range.end;
    }

    pub(crate) fn finish_node(&mut self) {
        if let Some(index) = self.open.pop() {
            let end = self.nodes.len();
            let node = &mut self.nodes[index];
            node.range.end = self.offset;
            node.subtree_end = end;
        }
    }

    pub(crate) fn finish(mut self) -> SyntaxTree {
        while !self.open.is_empty() {
            self.finish_node();
        }
        SyntaxTree {
            text: self.text,
            nodes: self.nodes,
        }
    }
}
