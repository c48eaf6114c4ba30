//! # Anchoring
//!
//! [`Anchorer::describe`] turns a live selection into every selector that can
//! represent it; [`Anchorer::anchor`] turns a stored selector set back into a
//! selection, trying range selectors first, then text positions, then quotes.
//!
//! Each call builds its own [`TextIndex`]; nothing about the tree is retained
//! between calls.

use std::time::Duration;

use log::debug;
use tokio_util::sync::CancellationToken;

use crate::error::{AnchorError, AttemptFailure, Result};
use crate::options::AnchorOptions;
use crate::selectors::{Selector, SelectorType, TextQuoteSelector, position, quote, range};
use crate::text::{TextIndex, flat_range};
use crate::tree::{DocumentTree, Selection};

#[derive(Debug, Clone, Default)]
pub struct Anchorer {
    options: AnchorOptions,
}

impl Anchorer {
    pub fn new(options: AnchorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AnchorOptions {
        &self.options
    }

    /// All selectors that can describe `selection`, in the order range,
    /// position, quote. Encoders that decline are left out.
    pub fn describe<T: DocumentTree>(
        &self,
        tree: &T,
        root: &T::Node,
        selection: &Selection<T::Node>,
    ) -> Vec<Selector> {
        let index = TextIndex::build(tree, root);

        SelectorType::ALL
            .into_iter()
            .filter_map(|ty| {
                let encoded = match ty {
                    SelectorType::Range => range::encode(tree, root, selection).map(Selector::Range),
                    SelectorType::TextPosition => {
                        position::encode_with(&index, tree, selection).map(Selector::TextPosition)
                    }
                    SelectorType::TextQuote => {
                        quote::encode_with(&index, tree, selection, self.options.context_window)
                            .map(Selector::TextQuote)
                    }
                };
                encoded
                    .inspect_err(|e| debug!("describe: omitting {ty}: {e}"))
                    .ok()
            })
            .collect()
    }

    /// Resolve `selectors` against the current tree.
    ///
    /// Fails with `Unanchorable` when every selector fails, listing each
    /// attempt in the order it was made.
    pub async fn anchor<T: DocumentTree>(
        &self,
        tree: &T,
        root: &T::Node,
        selectors: &[Selector],
    ) -> Result<Selection<T::Node>> {
        self.anchor_with_cancel(tree, root, selectors, &CancellationToken::new())
            .await
    }

    /// [`Self::anchor`] that gives up with `Cancelled` once `cancel` fires.
    pub async fn anchor_with_cancel<T: DocumentTree>(
        &self,
        tree: &T,
        root: &T::Node,
        selectors: &[Selector],
        cancel: &CancellationToken,
    ) -> Result<Selection<T::Node>> {
        let attempts = self.attempt_all(tree, root, selectors, cancel);
        match self.options.search_timeout_ms {
            Some(ms) => tokio::time::timeout(Duration::from_millis(ms), attempts)
                .await
                .map_err(|_| AnchorError::TimedOut(ms))?,
            None => attempts.await,
        }
    }

    async fn attempt_all<T: DocumentTree>(
        &self,
        tree: &T,
        root: &T::Node,
        selectors: &[Selector],
        cancel: &CancellationToken,
    ) -> Result<Selection<T::Node>> {
        let index = TextIndex::build(tree, root);
        let recorded_quote = selectors.iter().find_map(|s| match s {
            Selector::TextQuote(q) => Some(q),
            _ => None,
        });
        let hint = selectors.iter().find_map(|s| match s {
            Selector::TextPosition(p) => Some(p.start),
            _ => None,
        });

        let mut attempts = Vec::new();
        for ty in SelectorType::ALL {
            for selector in selectors.iter().filter(|s| s.selector_type() == ty) {
                if cancel.is_cancelled() {
                    return Err(AnchorError::Cancelled);
                }

                let decoded = match selector {
                    Selector::Range(s) => range::decode_with(&index, tree, root, s),
                    Selector::TextPosition(s) => position::decode_with(&index, s),
                    Selector::TextQuote(s) => {
                        quote::decode_with(&index, s, hint, &self.options, cancel).await
                    }
                };
                let checked = decoded.and_then(|selection| {
                    self.verify(&index, tree, &selection, ty, recorded_quote)?;
                    Ok(selection)
                });

                match checked {
                    Ok(selection) => return Ok(selection),
                    Err(AnchorError::Cancelled) => return Err(AnchorError::Cancelled),
                    Err(error) => {
                        debug!("anchor: {ty} failed: {error}");
                        attempts.push(AttemptFailure { selector: ty, error });
                    }
                }
            }
        }

        Err(AnchorError::Unanchorable { attempts })
    }

    /// Reject a range/position result whose text disagrees with the quote
    /// recorded alongside it.
    fn verify<T: DocumentTree>(
        &self,
        index: &TextIndex<T::Node>,
        tree: &T,
        selection: &Selection<T::Node>,
        ty: SelectorType,
        recorded_quote: Option<&TextQuoteSelector>,
    ) -> Result<()> {
        let Some(quote) = recorded_quote else {
            return Ok(());
        };
        if !self.options.verify_quote || ty == SelectorType::TextQuote {
            return Ok(());
        }

        let (start, end) = flat_range(index, tree, &selection.start, &selection.end)?;
        let found = index.slice(start, end);
        if found == quote.exact {
            Ok(())
        } else {
            Err(AnchorError::QuoteMismatch {
                found: found.to_string(),
            })
        }
    }
}

/// [`Anchorer::describe`] with default options.
pub fn describe<T: DocumentTree>(tree: &T, root: &T::Node, selection: &Selection<T::Node>) -> Vec<Selector> {
    Anchorer::default().describe(tree, root, selection)
}

/// [`Anchorer::anchor`] with default options.
pub async fn anchor<T: DocumentTree>(
    tree: &T,
    root: &T::Node,
    selectors: &[Selector],
) -> Result<Selection<T::Node>> {
    Anchorer::default().anchor(tree, root, selectors).await
}
