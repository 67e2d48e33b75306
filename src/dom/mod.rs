//! In-memory element tree implementing [`Surface`].
//!
//! Elements carry a tag, ordered attributes, a class list, children and
//! registered input listeners. Text nodes carry text only. Unknown node ids
//! are tolerated everywhere: reads return nothing and writes are dropped.

use crate::model::{ListenerKind, NodeId};
use crate::surface::{Combinator, Complex, Compound, Selector, Surface};
use std::collections::BTreeSet;

const CLASS_ATTRIBUTE: &str = "class";

#[derive(Debug, Clone)]
enum NodeKind {
    Element { tag: String },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
    listeners: BTreeSet<ListenerKind>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            attributes: Vec::new(),
            classes: Vec::new(),
            listeners: BTreeSet::new(),
        }
    }

    fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }
}

/// An element tree rooted at a `body` element.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::new(NodeKind::Element {
                tag: "body".to_string(),
            })],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    /// Move `child` to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.node(parent).is_none() || self.node(child).is_none() {
            return;
        }
        if self.ancestors(parent).any(|a| a == child) {
            return;
        }
        self.detach(child);
        if let Some(data) = self.node_mut(child) {
            data.parent = Some(parent);
        }
        if let Some(data) = self.node_mut(parent) {
            data.children.push(child);
        }
    }

    /// Create an element with `attributes` and append it to `parent`.
    ///
    /// A `class` attribute is split into the element's class list.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        attributes: &[(&str, &str)],
    ) -> NodeId {
        let node = self.create_element(tag);
        for (name, value) in attributes {
            self.set_attribute(node, name, value);
        }
        self.append_child(parent, node);
        node
    }

    /// Create a text node and append it to `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let node = self.create_text(text);
        self.append_child(parent, node);
        node
    }

    /// Remove `node` from its parent. The subtree stays alive and can be re-appended.
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.node(node).and_then(|data| data.parent) else {
            return;
        };
        if let Some(data) = self.node_mut(parent) {
            data.children.retain(|c| *c != node);
        }
        if let Some(data) = self.node_mut(node) {
            data.parent = None;
        }
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.node(node)?.kind {
            NodeKind::Element { tag } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map_or(&[][..], |data| data.children.as_slice())
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        self.node(node).map_or(&[][..], |data| data.classes.as_slice())
    }

    /// Registered listener kinds, in a stable order.
    pub fn listeners(&self, node: NodeId) -> Vec<ListenerKind> {
        self.node(node)
            .map(|data| data.listeners.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Concatenated text of `node` and its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        for id in std::iter::once(node).chain(self.descendants(node)) {
            if let Some(NodeKind::Text(text)) = self.node(id).map(|data| &data.kind) {
                out.push_str(text);
            }
        }
        out
    }

    /// Descendants of `node` in document (pre-)order, excluding `node`.
    pub fn descendants(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(self.children(next).iter().rev().copied());
            Some(next)
        })
    }

    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(node), move |n| self.parent(*n))
    }

    /// Whether `node` is an element matching `selector`.
    pub fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        selector
            .alternatives()
            .iter()
            .any(|complex| self.matches_complex(node, complex, complex.compounds.len() - 1))
    }

    fn matches_complex(&self, node: NodeId, complex: &Complex, index: usize) -> bool {
        if !self.matches_compound(node, &complex.compounds[index]) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match complex.combinators[index - 1] {
            Combinator::Child => self
                .parent(node)
                .is_some_and(|parent| self.matches_complex(parent, complex, index - 1)),
            Combinator::Descendant => self
                .ancestors(node)
                .any(|ancestor| self.matches_complex(ancestor, complex, index - 1)),
        }
    }

    fn matches_compound(&self, node: NodeId, compound: &Compound) -> bool {
        let Some(data) = self.node(node) else {
            return false;
        };
        let NodeKind::Element { tag } = &data.kind else {
            return false;
        };

        if compound.tag.as_ref().is_some_and(|t| t != tag) {
            return false;
        }
        if let Some(id) = &compound.id {
            if self.attribute(node, "id").as_ref() != Some(id) {
                return false;
            }
        }
        if !compound.classes.iter().all(|c| data.classes.contains(c)) {
            return false;
        }
        compound.attributes.iter().all(|condition| {
            match (self.attribute(node, &condition.name), &condition.value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == *expected,
                (None, _) => false,
            }
        })
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(NodeData::new(kind));
        NodeId::new(self.nodes.len() - 1)
    }

    fn node(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(node.get())
    }

    fn node_mut(&mut self, node: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(node.get())
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut NodeData> {
        self.node_mut(node).filter(|data| data.is_element())
    }
}

impl Surface for Document {
    fn query_all(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(root)
            .filter(|node| self.matches(*node, selector))
            .collect()
    }

    fn first_element_child(&self, node: NodeId) -> Option<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .find(|child| self.node(*child).is_some_and(NodeData::is_element))
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        let data = self.node(node)?;
        if name.eq_ignore_ascii_case(CLASS_ATTRIBUTE) {
            return (!data.classes.is_empty()).then(|| data.classes.join(" "));
        }
        data.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(data) = self.element_mut(node) else {
            return;
        };
        let name = name.to_ascii_lowercase();
        if name == CLASS_ATTRIBUTE {
            data.classes = Vec::new();
            for class in value.split_whitespace() {
                if !data.classes.iter().any(|c| c == class) {
                    data.classes.push(class.to_string());
                }
            }
            return;
        }
        match data.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => data.attributes.push((name, value.to_string())),
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        let Some(data) = self.element_mut(node) else {
            return;
        };
        if name.eq_ignore_ascii_case(CLASS_ATTRIBUTE) {
            data.classes.clear();
            return;
        }
        data.attributes.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(data) = self.element_mut(node) {
            if !data.classes.iter().any(|c| c == class) {
                data.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(data) = self.element_mut(node) {
            data.classes.retain(|c| c != class);
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).iter().any(|c| c == class)
    }

    fn listen(&mut self, node: NodeId, kind: ListenerKind) {
        if let Some(data) = self.element_mut(node) {
            data.listeners.insert(kind);
        }
    }

    fn unlisten(&mut self, node: NodeId, kind: ListenerKind) {
        if let Some(data) = self.element_mut(node) {
            data.listeners.remove(&kind);
        }
    }

    fn is_listening(&self, node: NodeId, kind: ListenerKind) -> bool {
        self.node(node)
            .is_some_and(|data| data.listeners.contains(&kind))
    }
}

#[cfg(test)]
#[path = "dom_tests.rs"]
mod tests;
