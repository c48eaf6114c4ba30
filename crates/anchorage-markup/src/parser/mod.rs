//! # Parser
//!
//! Turns the token stream into balanced [`Event`]s. The parser is lenient in
//! the way browsers are for the markup anchoring cares about:
//!
//! - void elements (`<br>`, `<img>`, ...) and `<x/>` never take children
//! - an end tag closes the nearest open element with that name, and every
//!   element opened after it
//! - an end tag with no open counterpart is dropped
//! - declarations and comments produce nothing
//! - adjacent text runs merge into one Text node; entities are decoded
//!
//! Whitespace-only text is kept: it is part of the flattened text that
//! selectors address.

pub mod event;
pub mod sink;

use log::debug;

use crate::lexer::{Token, TokenKind};
use event::Event;

/// Elements that cannot have content.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    events: Vec<Event>,
    open: Vec<String>,
    pending_text: String,
}

impl<'t, 'input> Parser<'t, 'input> {
    pub fn new(tokens: &'t [Token<'input>]) -> Self {
        Self {
            tokens,
            events: Vec::new(),
            open: Vec::new(),
            pending_text: String::new(),
        }
    }

    pub fn parse(mut self) -> Vec<Event> {
        let tokens = self.tokens;
        for token in tokens {
            match token.kind {
                TokenKind::Text => self.pending_text.push_str(token.text),
                TokenKind::Declaration => {}
                TokenKind::StartTag => self.start_tag(token),
                TokenKind::EndTag => self.end_tag(token),
            }
        }

        self.flush_text();
        for _ in self.open.drain(..) {
            self.events.push(Event::Finish);
        }
        self.events
    }

    fn start_tag(&mut self, token: &Token<'_>) {
        let Some(tag) = token.tag_name() else {
            return;
        };
        self.flush_text();

        self.events.push(Event::start(tag.as_str()));
        if token.is_self_closing() || VOID_ELEMENTS.contains(&tag.as_str()) {
            self.events.push(Event::Finish);
        } else {
            self.open.push(tag);
        }
    }

    fn end_tag(&mut self, token: &Token<'_>) {
        let Some(tag) = token.tag_name() else {
            return;
        };
        let Some(depth) = self.open.iter().rposition(|open| *open == tag) else {
            debug!("dropping unmatched end tag {}", token.text);
            return;
        };
        self.flush_text();

        for _ in self.open.drain(depth..) {
            self.events.push(Event::Finish);
        }
    }

    fn flush_text(&mut self) {
        if self.pending_text.is_empty() {
            return;
        }
        let raw = std::mem::take(&mut self.pending_text);
        let decoded = html_escape::decode_html_entities(&raw);
        self.events.push(Event::text(decoded.into_owned()));
    }
}
