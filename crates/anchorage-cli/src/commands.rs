use std::path::Path;

use anchorage_config::Config;
use anchorage_engine::{
    AnchorError, Anchorer, CancellationToken, Document, NodeId, Position, Selection, Selector,
    path, selection_text,
};
use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::Endpoint;

/// Where an anchored selection ended up.
#[derive(Debug, Serialize, PartialEq)]
pub struct Anchored {
    pub start: Located,
    pub end: Located,
    pub text: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Located {
    pub path: String,
    pub offset: usize,
}

pub fn load_document(config: &Config, file: &Path) -> Result<Document> {
    let markup = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    Ok(anchorage_markup::parse(&config.root_tag, &markup))
}

pub fn describe(
    config: &Config,
    doc: &Document,
    start: &Endpoint,
    end: &Endpoint,
) -> Result<Vec<Selector>> {
    let root = doc.root();
    let selection = Selection::new(position(doc, start)?, position(doc, end)?);

    let text = selection_text(doc, &root, &selection)?;
    log::info!("selected text: {text:?}");

    Ok(Anchorer::new(config.anchoring.clone()).describe(doc, &root, &selection))
}

fn position(doc: &Document, endpoint: &Endpoint) -> Result<Position<NodeId>> {
    let node = path::resolve(doc, &doc.root(), &endpoint.path)
        .with_context(|| format!("No node at {}", endpoint.path))?;
    Ok(Position::new(node, endpoint.offset))
}

pub fn read_selectors(file: &Path) -> Result<Vec<Selector>> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Invalid selectors in {}", file.display()))
}

/// Anchor `selectors`, keeping the engine error so callers can tell an
/// orphaned annotation apart from other failures.
pub async fn anchor(
    config: &Config,
    doc: &Document,
    selectors: &[Selector],
    cancel: &CancellationToken,
) -> Result<Anchored, AnchorError> {
    let root = doc.root();
    let anchorer = Anchorer::new(config.anchoring.clone());
    let selection = anchorer
        .anchor_with_cancel(doc, &root, selectors, cancel)
        .await?;

    Ok(Anchored {
        start: locate(doc, &selection.start)?,
        end: locate(doc, &selection.end)?,
        text: selection_text(doc, &root, &selection)?,
    })
}

fn locate(doc: &Document, position: &Position<NodeId>) -> Result<Located, AnchorError> {
    Ok(Located {
        path: path::path_to(doc, &doc.root(), &position.node)?.to_string(),
        offset: position.offset,
    })
}
