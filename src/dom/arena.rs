//! Arena-allocated DOM that the restructuring pass mutates in place.
//!
//! Nodes live in one contiguous vector and link to each other by index.
//! Detached nodes stay in the arena; they are simply unreachable from the
//! document root until re-attached.

use html5ever::{LocalName, Namespace, QualName, ns};

/// Index of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel for a missing link.
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Payload of a node.
#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
        /// Cached `id` attribute, kept in sync by [`Dom::set_attr`].
        id: Option<String>,
        /// Cached `class` tokens, kept in sync by [`Dom::set_attr`].
        classes: Vec<String>,
    },
    Text(String),
    Comment(String),
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
}

/// Element attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

impl Attribute {
    /// Attribute in the null namespace, which is where HTML puts them.
    pub fn new(local: &str, value: impl Into<String>) -> Self {
        Self {
            name: QualName::new(None, ns!(), LocalName::from(local)),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// Arena DOM tree with a single document root.
#[derive(Debug, Clone)]
pub struct Dom {
    nodes: Vec<Node>,
    document: NodeId,
}

impl Dom {
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: NodeId::NONE,
        };
        dom.document = dom.alloc(Node::new(NodeData::Document));
        dom
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn document(&self) -> NodeId {
        self.document
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Number of allocated nodes, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the document root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        let id = find_attr(&attrs, "id").map(str::to_string);
        let classes = find_attr(&attrs, "class")
            .map(split_classes)
            .unwrap_or_default();

        self.alloc(Node::new(NodeData::Element {
            name,
            attrs,
            id,
            classes,
        }))
    }

    /// Create an element in the HTML namespace.
    pub fn create_html_element(&mut self, tag: &str, attrs: Vec<Attribute>) -> NodeId {
        let name = QualName::new(None, ns!(html), LocalName::from(tag));
        self.create_element(name, attrs)
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(Node::new(NodeData::Text(text.into())))
    }

    pub fn create_comment(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Comment(text)))
    }

    pub fn create_doctype(&mut self, name: String, public_id: String, system_id: String) -> NodeId {
        self.alloc(Node::new(NodeData::Doctype {
            name,
            public_id,
            system_id,
        }))
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);

        let last_child = self.get(parent).map_or(NodeId::NONE, |n| n.last_child);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
        }

        if let Some(last_node) = self.get_mut(last_child) {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert `new_node` immediately before `sibling`, detaching it first.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        self.detach(new_node);

        let Some((parent, prev)) = self.get(sibling).map(|n| (n.parent, n.prev_sibling)) else {
            return;
        };

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Append text to `parent`, merging into a trailing text node if present.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        let last_child = self.get(parent).map_or(NodeId::NONE, |n| n.last_child);

        if let Some(last) = self.get_mut(last_child)
            && let NodeData::Text(existing) = &mut last.data
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.create_text(text);
        self.append(parent, text_node);
    }

    /// Unlink a node from its parent and siblings. Its subtree stays intact.
    pub fn detach(&mut self, id: NodeId) {
        let Some((parent, prev, next)) = self
            .get(id)
            .map(|n| (n.parent, n.prev_sibling, n.next_sibling))
        else {
            return;
        };

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }

        if let Some(node) = self.get_mut(id) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    /// Move every child of `node` to the end of `new_parent`, in order.
    pub fn reparent_children(&mut self, node: NodeId, new_parent: NodeId) {
        let children: Vec<_> = self.children(node).collect();
        for child in children {
            self.append(new_parent, child);
        }
    }

    /// Deep-copy a subtree. The copy is detached.
    pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
        let Some(data) = self.get(id).map(|n| n.data.clone()) else {
            return NodeId::NONE;
        };
        let copy = self.alloc(Node::new(data));

        // (source, parent of its copy); children pushed in reverse so they
        // pop in document order.
        let mut stack: Vec<(NodeId, NodeId)> = Vec::new();
        let first = stack.len();
        stack.extend(self.children(id).map(|c| (c, copy)));
        stack[first..].reverse();

        while let Some((src, dst_parent)) = stack.pop() {
            let Some(data) = self.get(src).map(|n| n.data.clone()) else {
                continue;
            };
            let dst = self.alloc(Node::new(data));
            self.append(dst_parent, dst);

            let first = stack.len();
            stack.extend(self.children(src).map(|c| (c, dst)));
            stack[first..].reverse();
        }
        copy
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(NodeId::is_some)
    }

    pub fn children(&self, parent: NodeId) -> Siblings<'_> {
        let first = self.get(parent).map_or(NodeId::NONE, |n| n.first_child);
        Siblings {
            dom: self,
            current: first,
        }
    }

    /// Siblings after `id`, in document order.
    pub fn following_siblings(&self, id: NodeId) -> Siblings<'_> {
        let next = self.get(id).map_or(NodeId::NONE, |n| n.next_sibling);
        Siblings {
            dom: self,
            current: next,
        }
    }

    /// Strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |&p| self.parent(p))
    }

    /// Descendants of `root` in document (pre-)order, excluding `root`.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let mut stack: Vec<_> = self.children(root).collect();
        stack.reverse();
        Descendants {
            dom: self,
            stack,
            skip_templates: false,
        }
    }

    /// Like [`descendants`](Self::descendants), but without the contents of
    /// `<template>` elements. These are the nodes a document query sees.
    pub fn live_descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants {
            skip_templates: true,
            ..self.descendants(root)
        }
    }

    /// First node in document order satisfying the predicate.
    pub fn find<F>(&self, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        self.descendants(self.document)
            .find(|&id| self.get(id).is_some_and(&predicate))
    }

    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.find(|node| match &node.data {
            NodeData::Element { name, .. } => name.local.as_ref() == tag,
            _ => false,
        })
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a run of siblings.
pub struct Siblings<'a> {
    dom: &'a Dom,
    current: NodeId,
}

impl Iterator for Siblings<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self.dom.get(id).map_or(NodeId::NONE, |n| n.next_sibling);
        Some(id)
    }
}

/// Pre-order traversal of a subtree.
pub struct Descendants<'a> {
    dom: &'a Dom,
    stack: Vec<NodeId>,
    skip_templates: bool,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        if self.skip_templates && self.dom.is_tag(id, "template") {
            return Some(id);
        }
        let first = self.stack.len();
        self.stack.extend(self.dom.children(id));
        self.stack[first..].reverse();
        Some(id)
    }
}

/// Element accessors.
impl Dom {
    pub fn element_name(&self, id: NodeId) -> Option<&LocalName> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(&name.local),
            _ => None,
        })
    }

    pub fn element_namespace(&self, id: NodeId) -> Option<&Namespace> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(&name.ns),
            _ => None,
        })
    }

    pub fn get_attr(&self, id: NodeId, attr_name: &str) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { attrs, .. } => find_attr(attrs, attr_name),
            _ => None,
        })
    }

    /// Set (or replace) an attribute in the null namespace.
    pub fn set_attr(&mut self, id: NodeId, attr_name: &str, value: &str) {
        let Some(NodeData::Element {
            attrs, id: cached_id, classes, ..
        }) = self.get_mut(id).map(|n| &mut n.data)
        else {
            return;
        };

        match attrs
            .iter_mut()
            .find(|a| a.name.ns == ns!() && a.name.local.as_ref() == attr_name)
        {
            Some(existing) => existing.value = value.to_string(),
            None => attrs.push(Attribute::new(attr_name, value)),
        }

        match attr_name {
            "id" => *cached_id = Some(value.to_string()),
            "class" => *classes = split_classes(value),
            _ => {}
        }
    }

    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { id, .. } => id.as_deref(),
            _ => None,
        })
    }

    pub fn element_classes(&self, id: NodeId) -> &[String] {
        static EMPTY: &[String] = &[];
        self.get(id)
            .and_then(|n| match &n.data {
                NodeData::Element { classes, .. } => Some(classes.as_slice()),
                _ => None,
            })
            .unwrap_or(EMPTY)
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element_classes(id).iter().any(|c| c == class)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Element { .. }))
    }

    /// Is `id` an HTML element with the given local name?
    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.element_name(id).is_some_and(|n| n.as_ref() == tag)
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| matches!(n.data, NodeData::Text(_)))
    }

    /// Contents of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Concatenated text of every descendant text node, like DOM `textContent`.
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.text(id) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|d| self.text(d))
            .collect()
    }
}

fn find_attr<'a>(attrs: &'a [Attribute], local: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|a| a.name.local.as_ref() == local)
        .map(|a| a.value.as_str())
}

fn split_classes(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(dom: &mut Dom, tag: &str) -> NodeId {
        dom.create_html_element(tag, vec![])
    }

    #[test]
    fn test_append_children() {
        let mut dom = Dom::new();
        let parent = element(&mut dom, "div");
        let child1 = element(&mut dom, "p");
        let child2 = element(&mut dom, "p");

        dom.append(dom.document(), parent);
        dom.append(parent, child1);
        dom.append(parent, child2);

        let children: Vec<_> = dom.children(parent).collect();
        assert_eq!(children, vec![child1, child2]);
    }

    #[test]
    fn test_append_moves_node() {
        let mut dom = Dom::new();
        let a = element(&mut dom, "div");
        let b = element(&mut dom, "div");
        let p = element(&mut dom, "p");
        dom.append(a, p);
        dom.append(b, p);

        assert_eq!(dom.children(a).count(), 0);
        assert_eq!(dom.children(b).collect::<Vec<_>>(), vec![p]);
        assert_eq!(dom.parent(p), Some(b));
    }

    #[test]
    fn test_detach_middle_child() {
        let mut dom = Dom::new();
        let parent = element(&mut dom, "div");
        let kids: Vec<_> = (0..3).map(|_| element(&mut dom, "p")).collect();
        for &k in &kids {
            dom.append(parent, k);
        }

        dom.detach(kids[1]);

        assert_eq!(dom.children(parent).collect::<Vec<_>>(), vec![kids[0], kids[2]]);
        assert_eq!(dom.parent(kids[1]), None);
        assert_eq!(dom.following_siblings(kids[0]).collect::<Vec<_>>(), vec![kids[2]]);
    }

    #[test]
    fn test_insert_before_first() {
        let mut dom = Dom::new();
        let parent = element(&mut dom, "div");
        let second = element(&mut dom, "p");
        let first = element(&mut dom, "p");
        dom.append(parent, second);
        dom.insert_before(second, first);

        assert_eq!(dom.children(parent).collect::<Vec<_>>(), vec![first, second]);
    }

    #[test]
    fn test_text_merging() {
        let mut dom = Dom::new();
        let p = element(&mut dom, "p");
        dom.append(dom.document(), p);

        dom.append_text(p, "Hello, ");
        dom.append_text(p, "World!");

        let children: Vec<_> = dom.children(p).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(dom.text(children[0]), Some("Hello, World!"));
    }

    #[test]
    fn test_deep_clone_is_detached_copy() {
        let mut dom = Dom::new();
        let h1 = dom.create_html_element("h1", vec![Attribute::new("class", "title")]);
        dom.append(dom.document(), h1);
        dom.append_text(h1, "Intro");

        let copy = dom.deep_clone(h1);

        assert_ne!(copy, h1);
        assert_eq!(dom.parent(copy), None);
        assert_eq!(dom.text_content(copy), "Intro");
        assert!(dom.has_class(copy, "title"));

        dom.set_attr(copy, "id", "intro");
        assert_eq!(dom.element_id(copy), Some("intro"));
        assert_eq!(dom.element_id(h1), None);
    }

    #[test]
    fn test_live_descendants_skip_template_contents() {
        let mut dom = Dom::new();
        let template = element(&mut dom, "template");
        let hidden = element(&mut dom, "h1");
        let shown = element(&mut dom, "h1");
        dom.append(dom.document(), template);
        dom.append(template, hidden);
        dom.append(dom.document(), shown);

        let all: Vec<_> = dom.descendants(dom.document()).collect();
        assert_eq!(all, [template, hidden, shown]);

        let live: Vec<_> = dom.live_descendants(dom.document()).collect();
        assert_eq!(live, [template, shown]);
    }

    #[test]
    fn test_deep_clone_keeps_child_order() {
        let mut dom = Dom::new();
        let ul = element(&mut dom, "ul");
        for label in ["a", "b", "c"] {
            let li = element(&mut dom, "li");
            dom.append(ul, li);
            dom.append_text(li, label);
        }

        let copy = dom.deep_clone(ul);

        let labels: Vec<_> = dom.children(copy).map(|li| dom.text_content(li)).collect();
        assert_eq!(labels, ["a", "b", "c"]);
        assert_eq!(dom.text_content(copy), "abc");
    }

    #[test]
    fn test_deep_clone_deeply_nested_heading() {
        const DEPTH: usize = 100_000;

        let mut dom = Dom::new();
        let h1 = element(&mut dom, "h1");
        dom.append(dom.document(), h1);
        let mut parent = h1;
        for _ in 0..DEPTH {
            let span = element(&mut dom, "span");
            dom.append(parent, span);
            parent = span;
        }
        dom.append_text(parent, "x");

        let copy = dom.deep_clone(h1);

        assert_eq!(dom.descendants(copy).count(), DEPTH + 1);
        assert_eq!(dom.text_content(copy), "x");
        assert_eq!(dom.len(), 2 * (DEPTH + 2) + 1);
    }

    #[test]
    fn test_descendants_document_order() {
        let mut dom = Dom::new();
        let div = element(&mut dom, "div");
        let span = element(&mut dom, "span");
        let em = element(&mut dom, "em");
        let p = element(&mut dom, "p");
        dom.append(dom.document(), div);
        dom.append(div, span);
        dom.append(span, em);
        dom.append(div, p);

        let order: Vec<_> = dom.descendants(dom.document()).collect();
        assert_eq!(order, vec![div, span, em, p]);
        assert_eq!(dom.ancestors(em).collect::<Vec<_>>(), vec![span, div, dom.document()]);
    }

    #[test]
    fn test_set_attr_updates_classes() {
        let mut dom = Dom::new();
        let div = element(&mut dom, "div");
        dom.set_attr(div, "class", "block  wide");
        assert_eq!(dom.element_classes(div), ["block", "wide"]);
        dom.set_attr(div, "class", "narrow");
        assert_eq!(dom.element_classes(div), ["narrow"]);
        assert_eq!(dom.get_attr(div, "class"), Some("narrow"));
    }

    #[test]
    fn test_text_content_nested() {
        let mut dom = Dom::new();
        let h3 = element(&mut dom, "h3");
        let code = element(&mut dom, "code");
        dom.append_text(h3, "Use ");
        dom.append(h3, code);
        dom.append_text(code, "auth");
        dom.append_text(h3, ":");

        assert_eq!(dom.text_content(h3), "Use auth:");
    }
}
