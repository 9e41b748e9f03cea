//! In-memory document tree.
//!
//! The parser produces this tree and the serializer renders it back. Every
//! mapping entry and sequence element may carry the comment lines that
//! immediately preceded it in the source text.

use crate::core::key_path::{KeyPath, Segment};

/// A resolved scalar value.
///
/// Numbers keep their source spelling so that re-emitting a document does
/// not reformat them.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(String),
    Float(String),
    Str(String),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Raw comment lines, each with its leading `#` removed but otherwise untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadingComment {
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappingEntry {
    pub key: String,
    pub value: DocumentNode,
    pub comment: Option<LeadingComment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequenceEntry {
    pub value: DocumentNode,
    pub comment: Option<LeadingComment>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentNode {
    Scalar(Scalar),
    Mapping(Vec<MappingEntry>),
    Sequence(Vec<SequenceEntry>),
}

impl Default for DocumentNode {
    fn default() -> Self {
        DocumentNode::Mapping(Vec::new())
    }
}

/// Callback for [`DocumentNode::walk`].
///
/// Only leaves are reported; containers are always descended into.
pub trait Visitor {
    /// Called for each scalar with its path and the comment of the entry that
    /// directly holds it. Comments of enclosing entries are not passed down.
    fn visit_scalar(&mut self, path: &KeyPath, scalar: &Scalar, comment: Option<&LeadingComment>);
}

impl DocumentNode {
    /// Visit every scalar leaf in document order.
    pub fn walk<V: Visitor>(&self, visitor: &mut V) {
        let mut path = KeyPath::new();
        walk_node(self, &mut path, None, visitor);
    }

    pub fn is_empty(&self) -> bool {
        match self {
            DocumentNode::Scalar(Scalar::Null) => true,
            DocumentNode::Scalar(_) => false,
            DocumentNode::Mapping(entries) => entries.is_empty(),
            DocumentNode::Sequence(items) => items.is_empty(),
        }
    }
}

fn walk_node<V: Visitor>(
    node: &DocumentNode,
    path: &mut KeyPath,
    comment: Option<&LeadingComment>,
    visitor: &mut V,
) {
    match node {
        DocumentNode::Scalar(scalar) => visitor.visit_scalar(path, scalar, comment),
        DocumentNode::Mapping(entries) => {
            for entry in entries {
                path.push(Segment::Key(entry.key.clone()));
                walk_node(&entry.value, path, entry.comment.as_ref(), visitor);
                path.pop();
            }
        }
        DocumentNode::Sequence(items) => {
            for (index, item) in items.iter().enumerate() {
                path.push(Segment::Index(index));
                walk_node(&item.value, path, item.comment.as_ref(), visitor);
                path.pop();
            }
        }
    }
}
