//! HTML serialization of a [`Dom`] through html5ever's serializer.

use std::io;

use html5ever::QualName;
use html5ever::serialize::{Serialize, SerializeOpts, Serializer, TraversalScope};

use super::arena::{Dom, NodeData, NodeId};

/// A node paired with the DOM that owns it, ready for html5ever to walk.
pub struct SerializableNode<'a> {
    dom: &'a Dom,
    id: NodeId,
}

impl<'a> SerializableNode<'a> {
    pub fn new(dom: &'a Dom, id: NodeId) -> Self {
        Self { dom, id }
    }
}

enum Op {
    Open(NodeId),
    Close(QualName),
}

impl Serialize for SerializableNode<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        // Explicit stack so deeply nested documents cannot overflow.
        let mut ops: Vec<Op> = match traversal_scope {
            TraversalScope::IncludeNode => vec![Op::Open(self.id)],
            TraversalScope::ChildrenOnly(_) => {
                let mut children: Vec<_> = self.dom.children(self.id).map(Op::Open).collect();
                children.reverse();
                children
            }
        };

        while let Some(op) = ops.pop() {
            let id = match op {
                Op::Open(id) => id,
                Op::Close(name) => {
                    serializer.end_elem(name)?;
                    continue;
                }
            };
            let Some(node) = self.dom.get(id) else {
                continue;
            };

            match &node.data {
                NodeData::Element { name, attrs, .. } => {
                    serializer.start_elem(
                        name.clone(),
                        attrs.iter().map(|a| (&a.name, a.value.as_str())),
                    )?;
                    ops.push(Op::Close(name.clone()));
                    let first = ops.len();
                    ops.extend(self.dom.children(id).map(Op::Open));
                    ops[first..].reverse();
                }
                NodeData::Text(text) => serializer.write_text(text)?,
                NodeData::Comment(text) => serializer.write_comment(text)?,
                NodeData::Doctype { name, .. } => serializer.write_doctype(name)?,
                NodeData::Document => {
                    let first = ops.len();
                    ops.extend(self.dom.children(id).map(Op::Open));
                    ops[first..].reverse();
                }
            }
        }
        Ok(())
    }
}

/// Serialize the whole document as HTML5.
pub fn serialize_document(dom: &Dom) -> io::Result<String> {
    serialize_children(dom, dom.document())
}

/// Serialize the children of `id` (its "inner HTML").
pub fn serialize_children(dom: &Dom, id: NodeId) -> io::Result<String> {
    write_html(dom, id, TraversalScope::ChildrenOnly(None))
}

/// Serialize `id` itself, including its own tags ("outer HTML").
pub fn serialize_node(dom: &Dom, id: NodeId) -> io::Result<String> {
    write_html(dom, id, TraversalScope::IncludeNode)
}

fn write_html(dom: &Dom, id: NodeId, traversal_scope: TraversalScope) -> io::Result<String> {
    let mut out = Vec::new();
    let opts = SerializeOpts {
        traversal_scope,
        ..Default::default()
    };
    html5ever::serialize::serialize(&mut out, &SerializableNode::new(dom, id), opts)?;
    String::from_utf8(out).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
