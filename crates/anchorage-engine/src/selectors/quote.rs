//! Selection ↔ [`TextQuoteSelector`].

use tokio_util::sync::CancellationToken;

use crate::error::{AnchorError, Result};
use crate::options::AnchorOptions;
use crate::text::TextIndex;
use crate::tree::{DocumentTree, Selection};

use super::matching::{choose, find_occurrences, score_occurrences};
use super::{TextPositionSelector, TextQuoteSelector, position};

/// Quote the text of `selection` with up to `context_window` characters of
/// context either side.
///
/// Declines whenever the position encoder declines, and for collapsed
/// selections (`EmptyQuote`).
pub fn encode<T: DocumentTree>(
    tree: &T,
    root: &T::Node,
    selection: &Selection<T::Node>,
    context_window: usize,
) -> Result<TextQuoteSelector> {
    let index = TextIndex::build(tree, root);
    encode_with(&index, tree, selection, context_window)
}

pub(crate) fn encode_with<T: DocumentTree>(
    index: &TextIndex<T::Node>,
    tree: &T,
    selection: &Selection<T::Node>,
    context_window: usize,
) -> Result<TextQuoteSelector> {
    let TextPositionSelector { start, end } = position::encode_with(index, tree, selection)?;
    if start == end {
        return Err(AnchorError::EmptyQuote);
    }

    Ok(TextQuoteSelector {
        exact: index.slice(start, end).to_string(),
        prefix: index.prefix(start, context_window).to_string(),
        suffix: index.suffix(end, context_window).to_string(),
    })
}

/// Search the current text under `root` for the quote.
///
/// `hint` is the flattened offset where the quote is expected to start; it
/// only matters when several occurrences score the same.
pub async fn decode<T: DocumentTree>(
    tree: &T,
    root: &T::Node,
    selector: &TextQuoteSelector,
    hint: Option<usize>,
    options: &AnchorOptions,
    cancel: &CancellationToken,
) -> Result<Selection<T::Node>> {
    let index = TextIndex::build(tree, root);
    decode_with(&index, selector, hint, options, cancel).await
}

pub(crate) async fn decode_with<N>(
    index: &TextIndex<N>,
    selector: &TextQuoteSelector,
    hint: Option<usize>,
    options: &AnchorOptions,
    cancel: &CancellationToken,
) -> Result<Selection<N>>
where
    N: Clone + Eq + std::hash::Hash + std::fmt::Debug,
{
    if selector.exact.is_empty() {
        return Err(AnchorError::NoMatchFound);
    }

    let occurrences =
        find_occurrences(index, &selector.exact, options.search_chunk_bytes, cancel).await?;
    let candidates = score_occurrences(index, &occurrences, selector, cancel).await?;

    let chosen = choose(candidates, hint, options)?;
    position::decode_with(
        index,
        &TextPositionSelector {
            start: chosen.start,
            end: chosen.end,
        },
    )
}
