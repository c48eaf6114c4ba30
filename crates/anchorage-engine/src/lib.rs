//! Selection anchoring.
//!
//! `describe` records a selection as a set of redundant selectors, `anchor`
//! resolves such a set against a (possibly changed) document. The document
//! is reached through [`tree::DocumentTree`], so any host tree can be
//! anchored against.

pub mod anchoring;
pub mod error;
pub mod options;
pub mod path;
pub mod selectors;
pub mod text;
pub mod tree;

// Re-export key types for easier usage
pub use anchoring::{Anchorer, anchor, describe};
pub use error::{AnchorError, AttemptFailure, ErrorKind, Result};
pub use options::AnchorOptions;
pub use path::NodePath;
pub use selectors::{RangeSelector, Selector, SelectorType, TextPositionSelector, TextQuoteSelector};
pub use text::{TextIndex, selection_text};
pub use tree::{Bias, Document, DocumentTree, NodeId, NodeKind, Position, Selection};
pub use tokio_util::sync::CancellationToken;
