//! # Host Tree Access
//!
//! The anchoring core never owns the document. It reads it through the
//! [`DocumentTree`] capability trait, which a host implements over its own
//! node representation (a browser DOM binding, a parsed HTML tree, the
//! in-memory [`dom::Document`] shipped here, ...).
//!
//! Node handles (`DocumentTree::Node`) are only held for the duration of one
//! `describe`/`anchor` call. Selectors are what survive between calls.

pub mod dom;

use std::fmt::Debug;
use std::hash::Hash;

pub use dom::{Document, NodeId};

/// Classification of a node, borrowed from the host tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind<'a> {
    Element { tag: &'a str },
    Text(&'a str),
}

/// Read-only traversal over a host document tree.
pub trait DocumentTree {
    type Node: Clone + Eq + Hash + Debug;

    fn kind(&self, node: &Self::Node) -> NodeKind<'_>;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Number of children. Always zero for Text nodes.
    fn child_count(&self, node: &Self::Node) -> usize;

    fn child(&self, node: &Self::Node, index: usize) -> Option<Self::Node>;

    fn children(&self, node: Self::Node) -> impl Iterator<Item = Self::Node> {
        (0..self.child_count(&node)).filter_map(move |i| self.child(&node, i))
    }

    fn is_text(&self, node: &Self::Node) -> bool {
        matches!(self.kind(node), NodeKind::Text(_))
    }

    /// Length of a node in position units: characters for Text nodes,
    /// children for Elements.
    fn boundary_len(&self, node: &Self::Node) -> usize {
        match self.kind(node) {
            NodeKind::Text(text) => text.chars().count(),
            NodeKind::Element { .. } => self.child_count(node),
        }
    }
}

/// A point in the tree: a character index inside a Text node, or a child
/// index ("between children") inside an Element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position<N> {
    pub node: N,
    pub offset: usize,
}

impl<N> Position<N> {
    pub fn new(node: N, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// An ordered `(start, end)` pair of positions under one root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selection<N> {
    pub start: Position<N>,
    pub end: Position<N>,
}

impl<N> Selection<N> {
    pub fn new(start: Position<N>, end: Position<N>) -> Self {
        Self { start, end }
    }
}

/// Which side of a selection a position is on.
///
/// Decides where a position lands when it sits exactly on the seam between
/// two Text leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    /// Prefer the start of the following leaf (selection starts).
    Forward,
    /// Prefer the end of the preceding leaf (selection ends).
    Backward,
}
