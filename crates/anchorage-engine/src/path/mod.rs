//! # Node Paths
//!
//! Root-relative structural addresses in an XPath-like grammar:
//!
//! ```text
//! path := '/' | ( '/' step )+
//! step := tagName '[' positiveInt ']' | 'text()' '[' positiveInt ']'
//! ```
//!
//! Element steps count among siblings with the same tag name, `text()`
//! steps count among Text siblings only. Indices are 1-based. This string
//! form is what range selectors persist, so it must stay stable.
//!
//! Reading is lenient in one way: a step without an index (`/p/strong`)
//! means index 1. Writing always emits explicit indices.

mod resolve;

pub use resolve::{path_to, resolve};

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AnchorError;
use crate::tree::NodeKind;

/// One step of a [`NodePath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    Element { tag: String, index: usize },
    Text { index: usize },
}

impl Step {
    pub fn index(&self) -> usize {
        match self {
            Step::Element { index, .. } | Step::Text { index } => *index,
        }
    }

    /// True if `kind` belongs to the sibling category this step counts in.
    pub fn matches(&self, kind: NodeKind<'_>) -> bool {
        match (self, kind) {
            (Step::Element { tag, .. }, NodeKind::Element { tag: other }) => tag == other,
            (Step::Text { .. }, NodeKind::Text(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Element { tag, index } => write!(f, "{tag}[{index}]"),
            Step::Text { index } => write!(f, "text()[{index}]"),
        }
    }
}

fn step_regex() -> &'static Regex {
    static STEP_REGEX: OnceLock<Regex> = OnceLock::new();
    STEP_REGEX.get_or_init(|| {
        Regex::new(r"^(?:(text\(\))|([^\[\]/()\s]+))(?:\[(\d+)\])?$").expect("Invalid step regex")
    })
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = step_regex()
            .captures(s)
            .ok_or_else(|| format!("invalid step {s:?}"))?;

        let index = match caps.get(3) {
            Some(m) => m
                .as_str()
                .parse::<usize>()
                .map_err(|e| format!("invalid index in step {s:?}: {e}"))?,
            None => 1,
        };
        if index == 0 {
            return Err(format!("step {s:?} has index 0, indices are 1-based"));
        }

        match caps.get(2) {
            Some(tag) => Ok(Step::Element {
                tag: tag.as_str().to_string(),
                index,
            }),
            None => Ok(Step::Text { index }),
        }
    }
}

/// Structural address of a node relative to an anchoring root.
///
/// The empty path (written `/`) addresses the root itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodePath {
    steps: Vec<Step>,
}

impl NodePath {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return f.write_str("/");
        }
        for step in &self.steps {
            write!(f, "/{step}")?;
        }
        Ok(())
    }
}

impl FromStr for NodePath {
    type Err = AnchorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: String| AnchorError::MalformedPath {
            path: s.to_string(),
            reason,
        };

        let rest = s
            .strip_prefix('/')
            .ok_or_else(|| malformed("path must start with '/'".into()))?;
        if rest.is_empty() {
            return Ok(Self::default());
        }

        let steps = rest
            .split('/')
            .map(|segment| {
                if segment.is_empty() {
                    Err(malformed("empty step".into()))
                } else {
                    segment.parse::<Step>().map_err(malformed)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { steps })
    }
}

impl TryFrom<String> for NodePath {
    type Error = AnchorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NodePath> for String {
    fn from(path: NodePath) -> Self {
        path.to_string()
    }
}
