//! Selection ↔ [`TextPositionSelector`].

use crate::error::{AnchorError, Result};
use crate::text::TextIndex;
use crate::tree::{Bias, DocumentTree, Selection};

use super::TextPositionSelector;

/// Describe `selection` by flattened-text offsets.
///
/// Declines (`BoundaryNotTextual`) when an endpoint is an Element boundary
/// that touches no text, since such an offset would not decode back to the
/// same structural point.
pub fn encode<T: DocumentTree>(
    tree: &T,
    root: &T::Node,
    selection: &Selection<T::Node>,
) -> Result<TextPositionSelector> {
    let index = TextIndex::build(tree, root);
    encode_with(&index, tree, selection)
}

pub(crate) fn encode_with<T: DocumentTree>(
    index: &TextIndex<T::Node>,
    tree: &T,
    selection: &Selection<T::Node>,
) -> Result<TextPositionSelector> {
    let start = index.text_offset_of(tree, &selection.start)?;
    let end = index.text_offset_of(tree, &selection.end)?;
    if start > end {
        return Err(AnchorError::InvertedSelection { start, end });
    }
    Ok(TextPositionSelector { start, end })
}

pub fn decode<T: DocumentTree>(
    tree: &T,
    root: &T::Node,
    selector: &TextPositionSelector,
) -> Result<Selection<T::Node>> {
    let index = TextIndex::build(tree, root);
    decode_with(&index, selector)
}

pub(crate) fn decode_with<N>(index: &TextIndex<N>, selector: &TextPositionSelector) -> Result<Selection<N>>
where
    N: Clone + Eq + std::hash::Hash + std::fmt::Debug,
{
    let TextPositionSelector { start, end } = *selector;
    if start > end {
        return Err(AnchorError::InvertedSelection { start, end });
    }
    let start_position = index.position_at(start, Bias::Forward)?;
    // a collapsed selection on a leaf seam must not end before it starts
    let end_position = if start == end {
        start_position.clone()
    } else {
        index.position_at(end, Bias::Backward)?
    };
    Ok(Selection::new(start_position, end_position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::text::selection_text;
    use crate::tree::{Document, NodeId, Position};
    use pretty_assertions::assert_eq;

    /// `<div>Pellentesque <em>habitant</em> morbi<br/><br/>tristique</div>`
    fn sample() -> (Document, Vec<NodeId>) {
        let mut doc = Document::new("div");
        let root = doc.root();
        let a = doc.append_text(root, "Pellentesque ");
        let em = doc.append_element(root, "em");
        let b = doc.append_text(em, "habitant");
        let c = doc.append_text(root, " morbi");
        doc.append_element(root, "br");
        doc.append_element(root, "br");
        let d = doc.append_text(root, "tristique");
        (doc, vec![root, a, em, b, c, d])
    }

    #[test]
    fn encodes_flat_offsets() {
        let (doc, n) = sample();
        let sel = Selection::new(Position::new(n[1], 13), Position::new(n[4], 6));
        assert_eq!(
            encode(&doc, &n[0], &sel),
            Ok(TextPositionSelector { start: 13, end: 27 })
        );
    }

    #[test]
    fn element_boundaries_before_text_encode() {
        let (doc, n) = sample();
        let sel = Selection::new(Position::new(n[0], 1), Position::new(n[2], 1));
        assert_eq!(
            encode(&doc, &n[0], &sel),
            Ok(TextPositionSelector { start: 13, end: 21 })
        );
    }

    #[test]
    fn boundary_before_line_breaks_declines() {
        let (doc, n) = sample();
        let sel = Selection::new(Position::new(n[4], 0), Position::new(n[0], 3));
        assert_eq!(
            encode(&doc, &n[0], &sel).unwrap_err().kind(),
            ErrorKind::BoundaryNotTextual
        );
    }

    #[test]
    fn decode_round_trips_text() {
        let (doc, n) = sample();
        let sel = Selection::new(Position::new(n[3], 2), Position::new(n[5], 4));
        let encoded = encode(&doc, &n[0], &sel).unwrap();
        let decoded = decode(&doc, &n[0], &encoded).unwrap();

        assert_eq!(
            selection_text(&doc, &n[0], &decoded).unwrap(),
            selection_text(&doc, &n[0], &sel).unwrap()
        );
        assert_eq!(decoded, sel);
    }

    #[test]
    fn decode_uses_leaf_seams_inwards() {
        let (doc, n) = sample();
        let decoded = decode(&doc, &n[0], &TextPositionSelector { start: 13, end: 21 }).unwrap();
        assert_eq!(decoded.start, Position::new(n[3], 0));
        assert_eq!(decoded.end, Position::new(n[3], 8));
    }

    #[test]
    fn collapsed_offset_on_seam_stays_ordered() {
        let mut doc = Document::new("div");
        let root = doc.root();
        doc.append_text(root, "ab");
        let cd = doc.append_text(root, "cd");

        let decoded = decode(&doc, &root, &TextPositionSelector { start: 2, end: 2 }).unwrap();
        assert_eq!(decoded, Selection::new(Position::new(cd, 0), Position::new(cd, 0)));
        assert_eq!(selection_text(&doc, &root, &decoded).unwrap(), "");
    }

    #[test]
    fn decode_past_end_fails() {
        let (doc, n) = sample();
        assert_eq!(
            decode(&doc, &n[0], &TextPositionSelector { start: 10, end: 99 }),
            Err(AnchorError::OffsetOutOfRange { offset: 99, len: 36 })
        );
    }

    #[test]
    fn decode_rejects_inverted_offsets() {
        let (doc, n) = sample();
        assert_eq!(
            decode(&doc, &n[0], &TextPositionSelector { start: 5, end: 2 }),
            Err(AnchorError::InvertedSelection { start: 5, end: 2 })
        );
    }
}
