/// A character range `[start, end)` into the flattened text.
///
/// Every node under the indexed root gets one: Text leaves cover their own
/// characters, Elements cover the characters of all their descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    /// Inclusive start offset, in characters.
    pub start: usize,
    /// Exclusive end offset, in characters.
    pub end: usize,
}

impl Span {
    /// Number of characters covered; an inverted span counts as empty.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True for the spans of empty leaves and text-less elements.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}
