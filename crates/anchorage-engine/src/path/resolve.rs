use crate::error::{AnchorError, Result};
use crate::tree::{DocumentTree, NodeKind};

use super::{NodePath, Step};

/// Path from `root` down to `node`.
///
/// Walks parent links from `node` up to (excluding) `root` and reverses the
/// collected steps. Fails with `NodeOutsideRoot` when the walk runs out of
/// parents before reaching `root`.
pub fn path_to<T: DocumentTree>(tree: &T, root: &T::Node, node: &T::Node) -> Result<NodePath> {
    let mut steps = Vec::new();
    let mut current = node.clone();

    while current != *root {
        let parent = tree.parent(&current).ok_or(AnchorError::NodeOutsideRoot)?;
        steps.push(step_for(tree, &parent, &current)?);
        current = parent;
    }

    steps.reverse();
    Ok(NodePath::new(steps))
}

fn step_for<T: DocumentTree>(tree: &T, parent: &T::Node, node: &T::Node) -> Result<Step> {
    let wanted = match tree.kind(node) {
        NodeKind::Element { tag } => Step::Element {
            tag: tag.to_string(),
            index: 0,
        },
        NodeKind::Text(_) => Step::Text { index: 0 },
    };

    let mut index = 0;
    for sibling in tree.children(parent.clone()) {
        if wanted.matches(tree.kind(&sibling)) {
            index += 1;
        }
        if sibling == *node {
            return Ok(match wanted {
                Step::Element { tag, .. } => Step::Element { tag, index },
                Step::Text { .. } => Step::Text { index },
            });
        }
    }

    // the parent link points somewhere that does not list us as a child
    Err(AnchorError::NodeOutsideRoot)
}

/// Node addressed by `path`, starting from `root`.
pub fn resolve<T: DocumentTree>(tree: &T, root: &T::Node, path: &NodePath) -> Result<T::Node> {
    let mut current = root.clone();

    for step in path.steps() {
        let mut seen = 0;
        let found = tree.children(current.clone()).find(|child| {
            step.matches(tree.kind(child)) && {
                seen += 1;
                seen == step.index()
            }
        });

        current = found.ok_or_else(|| AnchorError::PathUnresolvable {
            path: path.to_string(),
            step: step.to_string(),
        })?;
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Document, NodeId};
    use pretty_assertions::assert_eq;

    /// `<section><p>a<br/>b</p><div><p>c</p></div><p>d<br/><br/>e</p></section>`
    fn sample() -> (Document, Vec<NodeId>) {
        let mut doc = Document::new("section");
        let root = doc.root();
        let p1 = doc.append_element(root, "p");
        let a = doc.append_text(p1, "a");
        doc.append_element(p1, "br");
        let b = doc.append_text(p1, "b");
        let div = doc.append_element(root, "div");
        let inner = doc.append_element(div, "p");
        let c = doc.append_text(inner, "c");
        let p2 = doc.append_element(root, "p");
        doc.append_text(p2, "d");
        doc.append_element(p2, "br");
        let br2 = doc.append_element(p2, "br");
        let e = doc.append_text(p2, "e");
        (doc, vec![root, p1, a, b, div, inner, c, p2, br2, e])
    }

    #[test]
    fn paths_count_same_category_siblings() {
        let (doc, n) = sample();
        let root = n[0];
        let expect = [
            (n[1], "/p[1]"),
            (n[2], "/p[1]/text()[1]"),
            (n[3], "/p[1]/text()[2]"),
            (n[5], "/div[1]/p[1]"),
            (n[6], "/div[1]/p[1]/text()[1]"),
            (n[7], "/p[2]"),
            (n[8], "/p[2]/br[2]"),
            (n[9], "/p[2]/text()[2]"),
            (root, "/"),
        ];
        for (node, path) in expect {
            assert_eq!(path_to(&doc, &root, &node).unwrap().to_string(), path);
        }
    }

    #[test]
    fn resolve_inverts_path_to() {
        let (doc, n) = sample();
        let root = n[0];
        for node in &n {
            let path = path_to(&doc, &root, node).unwrap();
            assert_eq!(resolve(&doc, &root, &path).unwrap(), *node, "{path}");
        }
    }

    #[test]
    fn paths_are_relative_to_the_given_root() {
        let (doc, n) = sample();
        let path = path_to(&doc, &n[4], &n[6]).unwrap();
        assert_eq!(path.to_string(), "/p[1]/text()[1]");
        assert_eq!(path_to(&doc, &n[4], &n[2]), Err(AnchorError::NodeOutsideRoot));
    }

    #[test]
    fn unresolvable_step_is_reported() {
        let (doc, n) = sample();
        let path: NodePath = "/p[2]/em[1]".parse().unwrap();
        assert_eq!(
            resolve(&doc, &n[0], &path),
            Err(AnchorError::PathUnresolvable {
                path: "/p[2]/em[1]".into(),
                step: "em[1]".into(),
            })
        );

        let too_far: NodePath = "/p[3]".parse().unwrap();
        assert!(resolve(&doc, &n[0], &too_far).is_err());

        let through_text: NodePath = "/p[1]/text()[1]/b[1]".parse().unwrap();
        assert!(resolve(&doc, &n[0], &through_text).is_err());
    }

    #[test]
    fn detached_node_has_no_path() {
        let (mut doc, n) = sample();
        doc.remove(n[4]);
        assert_eq!(
            path_to(&doc, &n[0], &n[6]),
            Err(AnchorError::NodeOutsideRoot)
        );
    }
}
