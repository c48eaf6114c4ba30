use std::collections::HashMap;

use crate::error::{AnchorError, Result};
use crate::tree::{Bias, DocumentTree, NodeKind, Position};

use super::span::Span;

/// One Text leaf of the flattened text.
#[derive(Debug, Clone)]
struct Leaf<N> {
    node: N,
    /// Character range in the flattened text.
    span: Span,
    /// Byte offset of the leaf inside `TextIndex::text`.
    byte_start: usize,
    byte_len: usize,
}

/// Flattened view of the text under a root node.
///
/// Built by a pre-order walk: Text leaves are concatenated in document order
/// and every visited node records the character span it covers. Offsets
/// exposed by the index are in characters (Unicode scalar values).
///
/// The index is a snapshot of the tree at build time. Build a fresh one for
/// every `describe`/`anchor` call.
#[derive(Debug, Clone)]
pub struct TextIndex<N> {
    text: String,
    char_len: usize,
    leaves: Vec<Leaf<N>>,
    spans: HashMap<N, Span>,
}

impl<N> TextIndex<N>
where
    N: Clone + Eq + std::hash::Hash + std::fmt::Debug,
{
    pub fn build<T>(tree: &T, root: &N) -> Self
    where
        T: DocumentTree<Node = N>,
    {
        let mut index = Self {
            text: String::new(),
            char_len: 0,
            leaves: Vec::new(),
            spans: HashMap::new(),
        };

        // (element, next child to visit)
        let mut stack: Vec<(N, usize)> = Vec::new();
        index.enter(tree, root.clone(), &mut stack);

        while let Some((node, next)) = stack.last_mut() {
            let child = tree.child(node, *next);
            *next += 1;
            match child {
                Some(child) => index.enter(tree, child, &mut stack),
                None => {
                    if let Some((node, _)) = stack.pop()
                        && let Some(span) = index.spans.get_mut(&node)
                    {
                        span.end = index.char_len;
                    }
                }
            }
        }

        index
    }

    fn enter<T>(&mut self, tree: &T, node: N, stack: &mut Vec<(N, usize)>)
    where
        T: DocumentTree<Node = N>,
    {
        let start = self.char_len;
        match tree.kind(&node) {
            NodeKind::Text(content) => {
                let len = content.chars().count();
                let span = Span {
                    start,
                    end: start + len,
                };
                self.leaves.push(Leaf {
                    node: node.clone(),
                    span,
                    byte_start: self.text.len(),
                    byte_len: content.len(),
                });
                self.text.push_str(content);
                self.char_len += len;
                self.spans.insert(node, span);
            }
            NodeKind::Element { .. } => {
                self.spans.insert(node.clone(), Span { start, end: start });
                stack.push((node, 0));
            }
        }
    }

    /// The flattened text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the flattened text in characters.
    pub fn len(&self) -> usize {
        self.char_len
    }

    pub fn is_empty(&self) -> bool {
        self.char_len == 0
    }

    /// Text leaves in document order.
    pub fn text_nodes(&self) -> impl Iterator<Item = &N> {
        self.leaves.iter().map(|leaf| &leaf.node)
    }

    /// Character span covered by `node`, if it is under the indexed root.
    pub fn span_of(&self, node: &N) -> Option<Span> {
        self.spans.get(node).copied()
    }

    /// Flattened offset of a tree position.
    ///
    /// For a Text position this is the leaf start plus the character offset.
    /// For an Element position `(el, i)` it is the amount of text before child
    /// `i` (or before the end of `el` when `i` is the child count).
    pub fn offset_of<T>(&self, tree: &T, position: &Position<N>) -> Result<usize>
    where
        T: DocumentTree<Node = N>,
    {
        let span = self.span_of(&position.node).ok_or(AnchorError::NodeOutsideRoot)?;
        let offset = position.offset;

        match tree.kind(&position.node) {
            NodeKind::Text(_) => {
                if offset > span.len() {
                    return Err(AnchorError::PositionOutOfRange {
                        offset,
                        len: span.len(),
                    });
                }
                Ok(span.start + offset)
            }
            NodeKind::Element { .. } => {
                let count = tree.child_count(&position.node);
                if offset > count {
                    return Err(AnchorError::PositionOutOfRange { offset, len: count });
                }
                if offset == count {
                    return Ok(span.end);
                }
                let child = tree
                    .child(&position.node, offset)
                    .ok_or(AnchorError::PositionOutOfRange { offset, len: count })?;
                self.span_of(&child)
                    .map(|s| s.start)
                    .ok_or(AnchorError::NodeOutsideRoot)
            }
        }
    }

    /// Like [`Self::offset_of`], but refuses Element boundaries that do not
    /// touch any text.
    ///
    /// `(el, i)` is accepted when child `i` contains text, or, for
    /// `i == child_count`, when `el` itself contains text. Boundaries next to
    /// empty elements or runs of text-less elements (line breaks, images) have
    /// no stable counterpart in the flattened text and fail with
    /// `BoundaryNotTextual`.
    pub fn text_offset_of<T>(&self, tree: &T, position: &Position<N>) -> Result<usize>
    where
        T: DocumentTree<Node = N>,
    {
        let offset = self.offset_of(tree, position)?;
        if tree.is_text(&position.node) {
            return Ok(offset);
        }

        let touched = match tree.child(&position.node, position.offset) {
            Some(child) => self.span_of(&child),
            None => self.span_of(&position.node),
        };
        match touched {
            Some(span) if !span.is_empty() => Ok(offset),
            _ => Err(AnchorError::BoundaryNotTextual),
        }
    }

    /// Inverse of [`Self::offset_of`]: the Text leaf position at a flattened
    /// offset.
    ///
    /// When `offset` falls on the seam between two leaves, `bias` picks the
    /// start of the following leaf (`Forward`) or the end of the preceding
    /// one (`Backward`). Empty leaves are never returned unless the whole
    /// text is empty.
    pub fn position_at(&self, offset: usize, bias: Bias) -> Result<Position<N>> {
        let out_of_range = AnchorError::OffsetOutOfRange {
            offset,
            len: self.char_len,
        };
        if offset > self.char_len || self.leaves.is_empty() {
            return Err(out_of_range);
        }

        let forward = || {
            let idx = self.leaves.partition_point(|l| l.span.end <= offset);
            self.leaves.get(idx)
        };
        let backward = || {
            let idx = self.leaves.partition_point(|l| l.span.end < offset);
            self.leaves[idx..].iter().find(|l| !l.span.is_empty())
        };

        let leaf = match bias {
            Bias::Forward => forward().or_else(backward),
            Bias::Backward if offset == 0 => forward(),
            Bias::Backward => backward(),
        };

        match leaf {
            Some(leaf) => Ok(Position::new(leaf.node.clone(), offset - leaf.span.start)),
            // only empty leaves: the text is empty and offset is 0
            None => Ok(Position::new(self.leaves[0].node.clone(), 0)),
        }
    }

    /// Byte offset into [`Self::text`] for a character offset, clamped to the
    /// text length.
    pub fn byte_offset(&self, offset: usize) -> usize {
        let idx = self.leaves.partition_point(|l| l.span.end <= offset);
        match self.leaves.get(idx) {
            Some(leaf) => {
                let content = &self.text[leaf.byte_start..leaf.byte_start + leaf.byte_len];
                let intra = offset - leaf.span.start;
                leaf.byte_start
                    + content
                        .char_indices()
                        .nth(intra)
                        .map_or(content.len(), |(b, _)| b)
            }
            None => self.text.len(),
        }
    }

    /// Flattened text between two character offsets (clamped).
    pub fn slice(&self, start: usize, end: usize) -> &str {
        let start = self.byte_offset(start);
        let end = self.byte_offset(end).max(start);
        &self.text[start..end]
    }

    /// Up to `window` characters immediately before `offset`.
    pub fn prefix(&self, offset: usize, window: usize) -> &str {
        self.chars_before(self.byte_offset(offset), window)
    }

    /// Up to `window` characters immediately after `offset`.
    pub fn suffix(&self, offset: usize, window: usize) -> &str {
        self.chars_after(self.byte_offset(offset), window)
    }

    /// Up to `window` characters ending at byte `byte` of [`Self::text`].
    ///
    /// Only the window itself is walked, so this is cheap anywhere in a long
    /// leaf. Empty when `byte` is not a char boundary.
    pub fn chars_before(&self, byte: usize, window: usize) -> &str {
        let head = self.text.get(..byte).unwrap_or_default();
        let start = match window {
            0 => head.len(),
            _ => head
                .char_indices()
                .rev()
                .nth(window - 1)
                .map_or(0, |(b, _)| b),
        };
        &head[start..]
    }

    /// Up to `window` characters starting at byte `byte` of [`Self::text`].
    pub fn chars_after(&self, byte: usize, window: usize) -> &str {
        let tail = self.text.get(byte..).unwrap_or_default();
        let end = tail.char_indices().nth(window).map_or(tail.len(), |(b, _)| b);
        &tail[..end]
    }
}
