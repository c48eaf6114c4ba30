//! # anchorage-markup
//!
//! Reads HTML-like markup into an [`anchorage_engine::Document`] so that
//! selections in real pages can be described and anchored outside a
//! browser.
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → Document
//!               (Logos)                            (arena tree)
//! ```
//!
//! Reading never fails. Malformed markup produces a best-effort tree, the
//! same way a browser would render it rather than reject it. Attributes are
//! not kept and tag names are lower-cased.
//!
//! ```
//! use anchorage_markup::parse;
//!
//! let doc = parse("section", "<p>Hello <b>world</b></p>");
//! assert_eq!(doc.text_content(doc.root()), "Hello world");
//! ```

pub mod lexer;
pub mod parser;

use anchorage_engine::Document;

use lexer::lex;
use parser::Parser;
use parser::sink::Sink;

/// Parse `input` as the content of a new `root_tag` element.
pub fn parse(root_tag: &str, input: &str) -> Document {
    let tokens = lex(input);
    let events = Parser::new(&tokens).parse();
    Sink::new(root_tag, events).finish()
}
