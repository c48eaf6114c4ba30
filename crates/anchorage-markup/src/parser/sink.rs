//! Sink for replaying parser events into a [`Document`].

use anchorage_engine::tree::{Document, NodeId};

use crate::parser::event::Event;

pub struct Sink {
    document: Document,
    events: Vec<Event>,
}

impl Sink {
    /// Events will be attached below a fresh `root_tag` element.
    pub fn new(root_tag: &str, events: Vec<Event>) -> Self {
        Self {
            document: Document::new(root_tag),
            events,
        }
    }

    pub fn finish(mut self) -> Document {
        let mut open: Vec<NodeId> = vec![self.document.root()];

        for event in std::mem::take(&mut self.events) {
            let parent = open.last().copied().unwrap_or(self.document.root());
            match event {
                Event::Start { tag } => {
                    let element = self.document.append_element(parent, tag);
                    open.push(element);
                }
                Event::Text(text) => {
                    self.document.append_text(parent, text);
                }
                Event::Finish => {
                    // the root itself is never closed by markup
                    if open.len() > 1 {
                        open.pop();
                    }
                }
            }
        }

        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sink_builds_nested_elements() {
        let events = vec![
            Event::start("p"),
            Event::text("Hi "),
            Event::start("em"),
            Event::text("there"),
            Event::Finish,
            Event::Finish,
            Event::text("!"),
        ];

        let doc = Sink::new("section", events).finish();
        let root = doc.root();

        assert_eq!(doc.tag(root), Some("section"));
        assert_eq!(doc.text_content(root), "Hi there!");
    }

    #[test]
    fn extra_finish_events_are_ignored() {
        let events = vec![Event::Finish, Event::text("a"), Event::Finish];
        let doc = Sink::new("div", events).finish();
        assert_eq!(doc.text_content(doc.root()), "a");
    }
}
