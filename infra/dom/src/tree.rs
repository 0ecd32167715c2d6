use crate::error::DomError;

/// Index of a node in a document's arena.
///
/// Ids stay valid after the node is removed from the tree; the node is only detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The document node itself.
    pub const ROOT: Self = Self(0);

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Document,
    Doctype(String),
    Element(ElementData),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
pub(crate) struct ElementData {
    /// Lowercase tag name.
    pub(crate) tag: String,
    /// Attributes in source order; `class` and `style` live here too.
    pub(crate) attrs: Vec<(String, String)>,
    /// Value edited through the `value` property; `None` until first set.
    pub(crate) dirty_value: Option<String>,
}

impl ElementData {
    pub(crate) fn new(tag: &str) -> Self {
        Self { tag: tag.to_ascii_lowercase(), attrs: Vec::new(), dirty_value: None }
    }

    pub(crate) fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }

    pub(crate) fn set_attr(&mut self, name: &str, value: String) {
        if let Some(slot) = self.attrs.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            slot.1 = value;
        } else {
            self.attrs.push((name.to_ascii_lowercase(), value));
        }
    }

    pub(crate) fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attrs.len();
        self.attrs.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        before != self.attrs.len()
    }

    pub(crate) fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_ascii_whitespace()
    }

    pub(crate) fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) kind: NodeKind,
}

/// Arena backing a document. Node 0 is always the document node.
#[derive(Debug, Clone)]
pub(crate) struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub(crate) fn new() -> Self {
        Self { nodes: vec![Node { parent: None, children: Vec::new(), kind: NodeKind::Document }] }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Adds a detached node to the arena.
    pub(crate) fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { parent: None, children: Vec::new(), kind });
        id
    }

    pub(crate) fn get(&self, id: NodeId) -> Result<&Node, DomError> {
        self.nodes.get(id.0).ok_or_else(|| DomError::UnknownNode {
            message: format!("node #{} is not part of this document", id.0).into(),
            context: None,
        })
    }

    pub(crate) fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes.get(id.0)?.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(id.0)?.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0)?.parent
    }

    pub(crate) fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0).map_or(&[], |n| n.children.as_slice())
    }

    /// Moves `child` under `parent`, detaching it from its previous position first.
    pub(crate) fn append(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.get(parent)?;
        self.get(child)?;

        if child == NodeId::ROOT {
            return Err(DomError::HierarchyRequest {
                message: "the document node cannot be inserted".into(),
                context: None,
            });
        }
        if matches!(self.nodes[parent.0].kind, NodeKind::Text(_) | NodeKind::Comment(_)) {
            return Err(DomError::HierarchyRequest {
                message: format!("node #{} cannot have children", parent.0).into(),
                context: None,
            });
        }
        if self.ancestors_inclusive(parent).any(|n| n == child) {
            return Err(DomError::HierarchyRequest {
                message: format!("node #{} would become its own ancestor", child.0).into(),
                context: None,
            });
        }

        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    /// Unlinks the node from its parent. Returns `false` if it had none.
    pub(crate) fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.nodes.get(id.0).and_then(|n| n.parent) else {
            return false;
        };
        self.nodes[parent.0].children.retain(|c| *c != id);
        self.nodes[id.0].parent = None;
        true
    }

    pub(crate) fn ancestors_inclusive(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), |n| self.parent(*n))
    }

    pub(crate) fn is_connected(&self, id: NodeId) -> bool {
        self.ancestors_inclusive(id).last() == Some(NodeId::ROOT)
    }

    /// Descendants of `id` in document (pre-)order, excluding `id` itself.
    pub(crate) fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev());
        }
        out
    }

    /// Concatenated text of all descendant text nodes.
    pub(crate) fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|n| match &self.nodes[n.0].kind {
                NodeKind::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tree: &mut Tree, tag: &str) -> NodeId {
        tree.push(NodeKind::Element(ElementData::new(tag)))
    }

    #[test]
    fn append_moves_node_between_parents() {
        let mut tree = Tree::new();
        let a = element(&mut tree, "div");
        let b = element(&mut tree, "div");
        let leaf = element(&mut tree, "span");
        tree.append(NodeId::ROOT, a).unwrap();
        tree.append(NodeId::ROOT, b).unwrap();

        tree.append(a, leaf).unwrap();
        tree.append(b, leaf).unwrap();

        assert!(tree.children(a).is_empty());
        assert_eq!(tree.children(b), &[leaf]);
        assert_eq!(tree.parent(leaf), Some(b));
    }

    #[test]
    fn append_rejects_cycles() {
        let mut tree = Tree::new();
        let outer = element(&mut tree, "div");
        let inner = element(&mut tree, "div");
        tree.append(outer, inner).unwrap();

        let err = tree.append(inner, outer).unwrap_err();
        assert!(matches!(err, DomError::HierarchyRequest { .. }));
    }

    #[test]
    fn detached_subtree_is_not_connected() {
        let mut tree = Tree::new();
        let outer = element(&mut tree, "div");
        let inner = element(&mut tree, "p");
        tree.append(NodeId::ROOT, outer).unwrap();
        tree.append(outer, inner).unwrap();
        assert!(tree.is_connected(inner));

        assert!(tree.detach(outer));
        assert!(!tree.is_connected(inner));
        assert!(!tree.detach(outer));
    }

    #[test]
    fn descendants_are_in_document_order() {
        let mut tree = Tree::new();
        let root = element(&mut tree, "div");
        let first = element(&mut tree, "p");
        let nested = element(&mut tree, "em");
        let second = element(&mut tree, "p");
        tree.append(NodeId::ROOT, root).unwrap();
        tree.append(root, first).unwrap();
        tree.append(first, nested).unwrap();
        tree.append(root, second).unwrap();

        assert_eq!(tree.descendants(root), vec![first, nested, second]);
    }

    #[test]
    fn class_attribute_is_tokenized() {
        let mut data = ElementData::new("DIV");
        data.set_attr("class", "alert  alert-success\tfade".to_owned());
        assert_eq!(data.tag, "div");
        assert!(data.has_class("alert-success"));
        assert!(!data.has_class("alert-"));
        assert_eq!(data.classes().count(), 3);
    }
}
