//! # Parser Events
//!
//! The parser describes the tree as a flat event sequence which the
//! [`Sink`](super::sink::Sink) replays into a document:
//!
//! ```text
//! <p>Hi <em>there</em></p>
//!
//! Start("p")
//!   Text("Hi ")
//!   Start("em")
//!     Text("there")
//!   Finish
//! Finish
//! ```
//!
//! Events are always balanced: the parser closes whatever is still open at
//! the end of input.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Open a child element of the current node.
    Start { tag: String },

    /// Append a Text node with entity-decoded content.
    Text(String),

    /// Close the current element.
    Finish,
}

impl Event {
    pub fn start(tag: impl Into<String>) -> Self {
        Event::Start { tag: tag.into() }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Event::Text(text.into())
    }
}
