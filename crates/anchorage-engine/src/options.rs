use serde::{Deserialize, Serialize};

/// Characters of context recorded either side of a quote.
pub const DEFAULT_CONTEXT_WINDOW: usize = 32;

/// Minimum context similarity (0..=1) for a repeated quote to be accepted.
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.5;

/// Candidates scoring within this distance of the best one count as a tie.
pub const DEFAULT_TIE_MARGIN: f64 = 0.05;

/// Bytes of flattened text scanned between two yields of the quote search.
pub const DEFAULT_SEARCH_CHUNK_BYTES: usize = 64 * 1024;

/// Tunables for `describe` and `anchor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorOptions {
    /// Length, in characters, of the quote selector's prefix and suffix.
    pub context_window: usize,
    /// Acceptance threshold for the best-scoring quote occurrence when the
    /// quote occurs more than once.
    pub min_similarity: f64,
    /// Score distance under which two quote occurrences are indistinguishable.
    pub tie_margin: f64,
    pub search_chunk_bytes: usize,
    /// Reject range/position anchors whose text disagrees with a quote
    /// selector from the same set.
    pub verify_quote: bool,
    /// Upper bound for one `anchor` call. `None` waits indefinitely.
    pub search_timeout_ms: Option<u64>,
}

impl Default for AnchorOptions {
    fn default() -> Self {
        Self {
            context_window: DEFAULT_CONTEXT_WINDOW,
            min_similarity: DEFAULT_MIN_SIMILARITY,
            tie_margin: DEFAULT_TIE_MARGIN,
            search_chunk_bytes: DEFAULT_SEARCH_CHUNK_BYTES,
            verify_quote: true,
            search_timeout_ms: None,
        }
    }
}
