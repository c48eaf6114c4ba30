//! # Flattened Text
//!
//! The text-based selectors address a document by its *flattened text*: the
//! concatenation, in document order, of every Text leaf under the root.
//! [`TextIndex`] builds that string and maps in both directions between tree
//! [`Position`]s and character offsets into it.

pub mod index;
pub mod span;

pub use index::TextIndex;
pub use span::Span;

use crate::error::{AnchorError, Result};
use crate::tree::{DocumentTree, Position, Selection};

/// Flattened text strictly between the two endpoints of `selection`.
pub fn selection_text<T: DocumentTree>(
    tree: &T,
    root: &T::Node,
    selection: &Selection<T::Node>,
) -> Result<String> {
    let index = TextIndex::build(tree, root);
    let (start, end) = flat_range(&index, tree, &selection.start, &selection.end)?;
    Ok(index.slice(start, end).to_string())
}

/// Flattened offsets of two endpoints, rejecting inverted ranges.
pub(crate) fn flat_range<T: DocumentTree>(
    index: &TextIndex<T::Node>,
    tree: &T,
    start: &Position<T::Node>,
    end: &Position<T::Node>,
) -> Result<(usize, usize)> {
    let start = index.offset_of(tree, start)?;
    let end = index.offset_of(tree, end)?;
    if start > end {
        return Err(AnchorError::InvertedSelection { start, end });
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Document;

    #[test]
    fn selection_text_spans_nodes() {
        let mut doc = Document::new("div");
        let root = doc.root();
        let a = doc.append_text(root, "Hello ");
        let em = doc.append_element(root, "em");
        doc.append_text(em, "brave");
        let c = doc.append_text(root, " world");

        let sel = Selection::new(Position::new(a, 3), Position::new(c, 3));
        assert_eq!(selection_text(&doc, &root, &sel).unwrap(), "lo brave w");

        let whole = Selection::new(Position::new(root, 0), Position::new(root, 3));
        assert_eq!(
            selection_text(&doc, &root, &whole).unwrap(),
            "Hello brave world"
        );
    }

    #[test]
    fn inverted_selection_is_rejected() {
        let mut doc = Document::new("div");
        let root = doc.root();
        let a = doc.append_text(root, "abcdef");

        let sel = Selection::new(Position::new(a, 4), Position::new(a, 1));
        assert_eq!(
            selection_text(&doc, &root, &sel),
            Err(AnchorError::InvertedSelection { start: 4, end: 1 })
        );
    }
}
