//! In-memory arena tree implementing [`DocumentTree`].
//!
//! Used by the markup reader, the CLI and tests. Detached nodes stay in the
//! arena (their ids remain valid) but are no longer reachable from the root.
//! Ids that do not belong to the document read as detached empty elements.

use super::{DocumentTree, NodeKind};

/// Handle to a node inside one [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeData {
    Element { tag: String, children: Vec<NodeId> },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeEntry {
    parent: Option<NodeId>,
    data: NodeData,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeEntry>,
    root: NodeId,
}

impl Document {
    /// Create a document consisting of a single empty root element.
    pub fn new(root_tag: impl Into<String>) -> Self {
        Self {
            nodes: vec![NodeEntry {
                parent: None,
                data: NodeData::Element {
                    tag: root_tag.into(),
                    children: Vec::new(),
                },
            }],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn append_element(&mut self, parent: NodeId, tag: impl Into<String>) -> NodeId {
        let index = self.child_count(&parent);
        self.insert_element(parent, index, tag)
    }

    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let index = self.child_count(&parent);
        self.insert_text(parent, index, text)
    }

    /// Insert a new element as child `index` of `parent`.
    ///
    /// If `parent` is a Text node the new node is left detached.
    pub fn insert_element(&mut self, parent: NodeId, index: usize, tag: impl Into<String>) -> NodeId {
        self.insert(
            parent,
            index,
            NodeData::Element {
                tag: tag.into(),
                children: Vec::new(),
            },
        )
    }

    /// Insert a new Text node as child `index` of `parent`.
    pub fn insert_text(&mut self, parent: NodeId, index: usize, text: impl Into<String>) -> NodeId {
        self.insert(parent, index, NodeData::Text(text.into()))
    }

    fn insert(&mut self, parent: NodeId, index: usize, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeEntry { parent: None, data });

        let Some(NodeData::Element { children, .. }) = self.data_mut(parent) else {
            return id;
        };
        let index = index.min(children.len());
        children.insert(index, id);
        if let Some(entry) = self.nodes.get_mut(id.0) {
            entry.parent = Some(parent);
        }
        id
    }

    /// Replace the content of a Text node. No-op for elements.
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) {
        if let Some(NodeData::Text(content)) = self.data_mut(node) {
            *content = text.into();
        }
    }

    /// Detach `node` (and its subtree) from its parent.
    pub fn remove(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get_mut(node.0).and_then(|e| e.parent.take()) else {
            return;
        };
        if let Some(NodeData::Element { children, .. }) = self.data_mut(parent) {
            children.retain(|&c| c != node);
        }
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match self.data(node)? {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Text(_) => None,
        }
    }

    /// Concatenated text of all Text descendants of `node`, in document order.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            match self.data(id) {
                Some(NodeData::Text(text)) => out.push_str(text),
                Some(NodeData::Element { children, .. }) => stack.extend(children.iter().rev()),
                None => {}
            }
        }
        out
    }

    fn data(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(node.0).map(|entry| &entry.data)
    }

    fn data_mut(&mut self, node: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(node.0).map(|entry| &mut entry.data)
    }
}

impl DocumentTree for Document {
    type Node = NodeId;

    fn kind(&self, node: &NodeId) -> NodeKind<'_> {
        match self.data(*node) {
            Some(NodeData::Element { tag, .. }) => NodeKind::Element { tag },
            Some(NodeData::Text(text)) => NodeKind::Text(text),
            None => NodeKind::Element { tag: "" },
        }
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    fn child_count(&self, node: &NodeId) -> usize {
        match self.data(*node) {
            Some(NodeData::Element { children, .. }) => children.len(),
            _ => 0,
        }
    }

    fn child(&self, node: &NodeId, index: usize) -> Option<NodeId> {
        match self.data(*node)? {
            NodeData::Element { children, .. } => children.get(index).copied(),
            NodeData::Text(_) => None,
        }
    }
}
