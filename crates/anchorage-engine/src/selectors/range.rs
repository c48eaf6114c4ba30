//! Selection ↔ [`RangeSelector`].

use crate::error::{AnchorError, Result};
use crate::path::{path_to, resolve};
use crate::text::{TextIndex, flat_range};
use crate::tree::{DocumentTree, Position, Selection};

use super::RangeSelector;

/// Describe `selection` by the paths of its two containers.
///
/// Fails only when an endpoint's node is not under `root`.
pub fn encode<T: DocumentTree>(
    tree: &T,
    root: &T::Node,
    selection: &Selection<T::Node>,
) -> Result<RangeSelector> {
    Ok(RangeSelector {
        start_container: path_to(tree, root, &selection.start.node)?,
        start_offset: selection.start.offset,
        end_container: path_to(tree, root, &selection.end.node)?,
        end_offset: selection.end.offset,
    })
}

pub fn decode<T: DocumentTree>(
    tree: &T,
    root: &T::Node,
    selector: &RangeSelector,
) -> Result<Selection<T::Node>> {
    let index = TextIndex::build(tree, root);
    decode_with(&index, tree, root, selector)
}

pub(crate) fn decode_with<T: DocumentTree>(
    index: &TextIndex<T::Node>,
    tree: &T,
    root: &T::Node,
    selector: &RangeSelector,
) -> Result<Selection<T::Node>> {
    let start_node = resolve(tree, root, &selector.start_container)
        .map_err(|e| AnchorError::SelectorUnresolvable(Box::new(e)))?;
    let end_node = resolve(tree, root, &selector.end_container)
        .map_err(|e| AnchorError::SelectorUnresolvable(Box::new(e)))?;

    let start = bounded(tree, start_node, selector.start_offset)?;
    let end = bounded(tree, end_node, selector.end_offset)?;
    flat_range(index, tree, &start, &end)?;

    Ok(Selection::new(start, end))
}

fn bounded<T: DocumentTree>(tree: &T, node: T::Node, offset: usize) -> Result<Position<T::Node>> {
    let len = tree.boundary_len(&node);
    if offset > len {
        return Err(AnchorError::PositionOutOfRange { offset, len });
    }
    Ok(Position::new(node, offset))
}
