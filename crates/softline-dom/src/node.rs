//! Node handles and node storage.

use std::collections::BTreeMap;
use std::fmt;

/// Generational handle to a node in a [`crate::Dom`].
///
/// The handle identifies a physical node, not its text: two nodes with the
/// same content have different handles, and a handle to a freed node stays
/// invalid even after its slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub(crate) fn index(&self) -> usize {
        self.index as usize
    }

    pub(crate) fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
}

#[derive(Debug, Clone)]
pub(crate) enum NodeContent {
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) content: NodeContent,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl NodeData {
    pub(crate) fn element(tag: &str) -> Self {
        Self {
            content: NodeContent::Element {
                tag: tag.to_ascii_lowercase(),
                attributes: BTreeMap::new(),
            },
            parent: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn text(text: &str) -> Self {
        Self {
            content: NodeContent::Text(text.to_string()),
            parent: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn kind(&self) -> NodeKind {
        match self.content {
            NodeContent::Element { .. } => NodeKind::Element,
            NodeContent::Text(_) => NodeKind::Text,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Slot {
    pub(crate) generation: u32,
    pub(crate) data: Option<NodeData>,
}
