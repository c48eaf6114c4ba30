use std::fmt;

use crate::selectors::SelectorType;

/// Failure of a single anchoring step.
///
/// Encoders and decoders return these; the orchestrator collects them when it
/// has to move on to the next fallback candidate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnchorError {
    #[error("offset {offset} is outside the node bounds (0..={len})")]
    PositionOutOfRange { offset: usize, len: usize },

    #[error("text offset {offset} is outside the flattened text (0..={len})")]
    OffsetOutOfRange { offset: usize, len: usize },

    #[error("node is not a descendant of the anchoring root")]
    NodeOutsideRoot,

    #[error("malformed node path {path:?}: {reason}")]
    MalformedPath { path: String, reason: String },

    #[error("path {path:?} does not resolve: no match for step {step:?}")]
    PathUnresolvable { path: String, step: String },

    #[error("range selector does not resolve: {0}")]
    SelectorUnresolvable(Box<AnchorError>),

    #[error("boundary does not touch any text")]
    BoundaryNotTextual,

    #[error("selection start ({start}) lies after its end ({end})")]
    InvertedSelection { start: usize, end: usize },

    #[error("cannot quote an empty selection")]
    EmptyQuote,

    #[error("quoted text not found in document")]
    NoMatchFound,

    #[error("quote matches {candidates} places and none is clearly best (score {best_score:.3})")]
    AmbiguousMatch { candidates: usize, best_score: f64 },

    #[error("selected text {found:?} does not match the recorded quote")]
    QuoteMismatch { found: String },

    #[error("anchoring was cancelled")]
    Cancelled,

    #[error("anchoring timed out after {0} ms")]
    TimedOut(u64),

    #[error("no selector could be anchored ({} attempts)", .attempts.len())]
    Unanchorable { attempts: Vec<AttemptFailure> },
}

/// Field-less tag for [`AnchorError`], convenient for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    PositionOutOfRange,
    OffsetOutOfRange,
    NodeOutsideRoot,
    MalformedPath,
    PathUnresolvable,
    SelectorUnresolvable,
    BoundaryNotTextual,
    InvertedSelection,
    EmptyQuote,
    NoMatchFound,
    AmbiguousMatch,
    QuoteMismatch,
    Cancelled,
    TimedOut,
    Unanchorable,
}

impl AnchorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnchorError::PositionOutOfRange { .. } => ErrorKind::PositionOutOfRange,
            AnchorError::OffsetOutOfRange { .. } => ErrorKind::OffsetOutOfRange,
            AnchorError::NodeOutsideRoot => ErrorKind::NodeOutsideRoot,
            AnchorError::MalformedPath { .. } => ErrorKind::MalformedPath,
            AnchorError::PathUnresolvable { .. } => ErrorKind::PathUnresolvable,
            AnchorError::SelectorUnresolvable(_) => ErrorKind::SelectorUnresolvable,
            AnchorError::BoundaryNotTextual => ErrorKind::BoundaryNotTextual,
            AnchorError::InvertedSelection { .. } => ErrorKind::InvertedSelection,
            AnchorError::EmptyQuote => ErrorKind::EmptyQuote,
            AnchorError::NoMatchFound => ErrorKind::NoMatchFound,
            AnchorError::AmbiguousMatch { .. } => ErrorKind::AmbiguousMatch,
            AnchorError::QuoteMismatch { .. } => ErrorKind::QuoteMismatch,
            AnchorError::Cancelled => ErrorKind::Cancelled,
            AnchorError::TimedOut(_) => ErrorKind::TimedOut,
            AnchorError::Unanchorable { .. } => ErrorKind::Unanchorable,
        }
    }

    /// Per-attempt failure kinds of an `Unanchorable` error, empty otherwise.
    pub fn attempt_kinds(&self) -> Vec<ErrorKind> {
        match self {
            AnchorError::Unanchorable { attempts } => {
                attempts.iter().map(|a| a.error.kind()).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// One failed decode inside [`crate::anchor`].
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptFailure {
    pub selector: SelectorType,
    pub error: AnchorError,
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.selector, self.error)
    }
}

pub type Result<T, E = AnchorError> = std::result::Result<T, E>;
