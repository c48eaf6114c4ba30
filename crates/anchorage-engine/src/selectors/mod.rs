//! # Selectors
//!
//! A selector is a serializable, independently resolvable description of a
//! selection. Three encodings exist, from most precise to most resilient:
//!
//! - [`RangeSelector`]: structural paths to both endpoints plus offsets
//! - [`TextPositionSelector`]: character offsets into the flattened text
//! - [`TextQuoteSelector`]: the quoted text with some context either side
//!
//! Each encoding has an `encode` (selection → selector) and a `decode`
//! (selector → selection) in its own module. The persisted JSON shape is
//! fixed for compatibility with stored annotations:
//!
//! ```json
//! { "type": "RangeSelector", "startContainer": "/p[1]", "startOffset": 0,
//!   "endContainer": "/p[1]", "endOffset": 1 }
//! { "type": "TextPositionSelector", "start": 13, "end": 27 }
//! { "type": "TextQuoteSelector", "exact": "habitant morbi",
//!   "prefix": "Pellentesque ", "suffix": " tristique" }
//! ```

pub mod matching;
pub mod position;
pub mod quote;
pub mod range;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path::NodePath;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Selector {
    #[serde(rename = "RangeSelector")]
    Range(RangeSelector),
    #[serde(rename = "TextPositionSelector")]
    TextPosition(TextPositionSelector),
    #[serde(rename = "TextQuoteSelector")]
    TextQuote(TextQuoteSelector),
}

impl Selector {
    pub fn selector_type(&self) -> SelectorType {
        match self {
            Selector::Range(_) => SelectorType::Range,
            Selector::TextPosition(_) => SelectorType::TextPosition,
            Selector::TextQuote(_) => SelectorType::TextQuote,
        }
    }
}

/// Structural paths to both endpoints; offsets are copied through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeSelector {
    pub start_container: NodePath,
    pub start_offset: usize,
    pub end_container: NodePath,
    pub end_offset: usize,
}

/// Character offsets `[start, end)` into the root's flattened text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextPositionSelector {
    pub start: usize,
    pub end: usize,
}

/// The selected text plus bounded context before and after it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextQuoteSelector {
    pub exact: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
}

/// Selector variants in fallback priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SelectorType {
    Range,
    TextPosition,
    TextQuote,
}

impl SelectorType {
    pub const ALL: [SelectorType; 3] = [
        SelectorType::Range,
        SelectorType::TextPosition,
        SelectorType::TextQuote,
    ];
}

impl fmt::Display for SelectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SelectorType::Range => "RangeSelector",
            SelectorType::TextPosition => "TextPositionSelector",
            SelectorType::TextQuote => "TextQuoteSelector",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn range_selector_wire_format() {
        let sel = Selector::Range(RangeSelector {
            start_container: "/p[1]/strong[1]".parse().unwrap(),
            start_offset: 0,
            end_container: "/p[1]/text()[1]".parse().unwrap(),
            end_offset: 12,
        });
        insta::assert_json_snapshot!(sel, @r#"
        {
          "type": "RangeSelector",
          "startContainer": "/p[1]/strong[1]",
          "startOffset": 0,
          "endContainer": "/p[1]/text()[1]",
          "endOffset": 12
        }
        "#);
    }

    #[test]
    fn quote_selector_wire_format() {
        let sel = Selector::TextQuote(TextQuoteSelector {
            exact: "habitant morbi".into(),
            prefix: "Pellentesque ".into(),
            suffix: " tristique".into(),
        });
        insta::assert_json_snapshot!(sel, @r#"
        {
          "type": "TextQuoteSelector",
          "exact": "habitant morbi",
          "prefix": "Pellentesque ",
          "suffix": " tristique"
        }
        "#);
    }

    #[test]
    fn reads_persisted_selectors() {
        let json = r#"[
            {"type": "RangeSelector", "startContainer": "/p/strong", "startOffset": 0,
             "endContainer": "/p/strong", "endOffset": 1},
            {"type": "TextPositionSelector", "start": 13, "end": 27},
            {"type": "TextQuoteSelector", "exact": "habitant morbi"}
        ]"#;

        let selectors: Vec<Selector> = serde_json::from_str(json).unwrap();
        assert_eq!(
            selectors
                .iter()
                .map(Selector::selector_type)
                .collect::<Vec<_>>(),
            SelectorType::ALL.to_vec()
        );
        assert_eq!(
            selectors[1],
            Selector::TextPosition(TextPositionSelector { start: 13, end: 27 })
        );
        match &selectors[0] {
            Selector::Range(range) => {
                assert_eq!(range.start_container.to_string(), "/p[1]/strong[1]")
            }
            other => panic!("expected range selector, got {other:?}"),
        }
        match &selectors[2] {
            Selector::TextQuote(quote) => {
                assert_eq!(quote.prefix, "");
                assert_eq!(quote.suffix, "");
            }
            other => panic!("expected quote selector, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_type_and_bad_paths() {
        assert!(serde_json::from_str::<Selector>(r#"{"type": "CssSelector", "value": "p"}"#).is_err());
        assert!(
            serde_json::from_str::<Selector>(
                r#"{"type": "RangeSelector", "startContainer": "p", "startOffset": 0,
                    "endContainer": "/p", "endOffset": 1}"#
            )
            .is_err()
        );
    }
}
