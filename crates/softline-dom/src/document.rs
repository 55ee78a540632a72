//! Node arena, tree mutation and the observer queue.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::error::DomError;
use crate::mutation::{MutationKind, MutationOrigin, MutationRecord};
use crate::node::{NodeContent, NodeData, NodeId, NodeKind, Slot};

/// A document tree rooted at a `body` element.
///
/// Mutations to connected nodes are queued as [`MutationRecord`]s while the
/// observer is attached. Detached subtrees can be built freely without
/// producing records.
#[derive(Debug)]
pub struct Dom {
    slots: Vec<Slot>,
    free: Vec<u32>,
    body: NodeId,
    observing: bool,
    records: Vec<MutationRecord>,
    origin: MutationOrigin,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    pub fn new() -> Self {
        let mut dom = Self {
            slots: Vec::new(),
            free: Vec::new(),
            body: NodeId::new(0, 0),
            observing: false,
            records: Vec::new(),
            origin: MutationOrigin::External,
        };
        dom.body = dom.alloc(NodeData::element("body"));
        dom
    }

    /// Build a document with one `<p>` per non-blank line of `text`.
    pub fn from_paragraphs(text: &str) -> Self {
        let mut dom = Self::new();
        let body = dom.body;
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let p = dom.create_element("p");
            let t = dom.create_text(line);
            // Freshly created nodes, both calls are infallible here.
            let _ = dom.append_child(p, t);
            let _ = dom.append_child(body, p);
        }
        dom
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Number of allocated nodes, body included.
    pub fn live_nodes(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    // ---- allocation ---------------------------------------------------------

    fn alloc(&mut self, data: NodeData) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.data = Some(data);
            NodeId::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                data: Some(data),
            });
            NodeId::new(index, 0)
        }
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::element(tag))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeData::text(text))
    }

    /// Detach `id` and release its whole subtree. Outstanding handles to any
    /// freed node become stale.
    pub fn free(&mut self, id: NodeId) -> Result<(), DomError> {
        if id == self.body {
            return Err(DomError::BodyRemoval);
        }
        self.node(id)?;
        self.detach(id);
        for node in self.descendants(id) {
            let slot = &mut self.slots[node.index()];
            slot.data = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(node.index() as u32);
        }
        Ok(())
    }

    // ---- lookup -------------------------------------------------------------

    fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.data.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.data.as_mut())
    }

    fn node(&self, id: NodeId) -> Result<&NodeData, DomError> {
        self.get(id).ok_or(DomError::StaleNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData, DomError> {
        self.get_mut(id).ok_or(DomError::StaleNode(id))
    }

    /// Whether `id` still refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get(id).map(NodeData::kind)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.kind(id) == Some(NodeKind::Element)
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        self.kind(id) == Some(NodeKind::Text)
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.content {
            NodeContent::Element { tag, .. } => Some(tag),
            NodeContent::Text(_) => None,
        }
    }

    /// Data of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.content {
            NodeContent::Text(text) => Some(text),
            NodeContent::Element { .. } => None,
        }
    }

    /// Concatenated text of `id` and all its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };
        match &node.content {
            NodeContent::Text(text) => out.push_str(text),
            NodeContent::Element { .. } => {
                for child in &node.children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Whether `id` is live and reachable from the body.
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if !self.contains(current) {
                return false;
            }
            if current == self.body {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    // ---- attributes ---------------------------------------------------------

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.get(id)?.content {
            NodeContent::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            NodeContent::Text(_) => None,
        }
    }

    pub fn attributes(&self, id: NodeId) -> Vec<(&str, &str)> {
        match self.get(id).map(|n| &n.content) {
            Some(NodeContent::Element { attributes, .. }) => attributes
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        match &mut self.node_mut(id)?.content {
            NodeContent::Element { attributes, .. } => {
                attributes.insert(name.to_string(), value.to_string());
                Ok(())
            }
            NodeContent::Text(_) => Err(DomError::NotAnElement(id)),
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<(), DomError> {
        match &mut self.node_mut(id)?.content {
            NodeContent::Element { attributes, .. } => {
                attributes.remove(name);
                Ok(())
            }
            NodeContent::Text(_) => Err(DomError::NotAnElement(id)),
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attribute(id, "class")
            .is_some_and(|value| value.split_whitespace().any(|c| c == class))
    }

    // ---- tree mutation ------------------------------------------------------

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check_insertion(parent, child)?;
        self.detach(child);
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        self.record(MutationKind::ChildList, parent, vec![child], Vec::new());
        Ok(())
    }

    /// Insert `new` into `parent` immediately before `reference`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        new: NodeId,
        reference: NodeId,
    ) -> Result<(), DomError> {
        self.check_insertion(parent, new)?;
        if self.parent(reference) != Some(parent) || new == reference {
            return Err(DomError::NotAChild {
                parent,
                child: reference,
            });
        }
        self.detach(new);
        let siblings = &mut self.node_mut(parent)?.children;
        let position = siblings
            .iter()
            .position(|c| *c == reference)
            .ok_or(DomError::NotAChild {
                parent,
                child: reference,
            })?;
        siblings.insert(position, new);
        self.node_mut(new)?.parent = Some(parent);
        self.record(MutationKind::ChildList, parent, vec![new], Vec::new());
        Ok(())
    }

    /// Detach `id` from its parent. The node stays alive and can be
    /// re-inserted.
    pub fn remove(&mut self, id: NodeId) -> Result<(), DomError> {
        if id == self.body {
            return Err(DomError::BodyRemoval);
        }
        self.node(id)?;
        self.detach(id);
        Ok(())
    }

    /// Put `new` where `old` is under `parent`, recording one mutation.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new: NodeId,
        old: NodeId,
    ) -> Result<(), DomError> {
        self.check_insertion(parent, new)?;
        if self.parent(old) != Some(parent) || new == old {
            return Err(DomError::NotAChild { parent, child: old });
        }
        self.detach(new);
        let siblings = &mut self.node_mut(parent)?.children;
        let position = siblings
            .iter()
            .position(|c| *c == old)
            .ok_or(DomError::NotAChild { parent, child: old })?;
        siblings[position] = new;
        self.node_mut(old)?.parent = None;
        self.node_mut(new)?.parent = Some(parent);
        self.record(MutationKind::ChildList, parent, vec![new], vec![old]);
        Ok(())
    }

    /// Change the data of a text node in place.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        match &mut self.node_mut(id)?.content {
            NodeContent::Text(data) => {
                *data = text.to_string();
            }
            NodeContent::Element { .. } => return Err(DomError::NotAText(id)),
        }
        self.record(MutationKind::CharacterData, id, Vec::new(), Vec::new());
        Ok(())
    }

    /// Replace every child of `id` with a single text node. On a text node
    /// this is equivalent to [`Dom::set_text`].
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        if self.node(id)?.kind() == NodeKind::Text {
            return self.set_text(id, text);
        }
        let text_node = self.create_text(text);
        let removed = std::mem::replace(&mut self.node_mut(id)?.children, vec![text_node]);
        for child in &removed {
            if let Some(node) = self.get_mut(*child) {
                node.parent = None;
            }
        }
        self.node_mut(text_node)?.parent = Some(id);
        self.record(MutationKind::ChildList, id, vec![text_node], removed);
        Ok(())
    }

    fn check_insertion(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.node(parent)?.kind() != NodeKind::Element {
            return Err(DomError::NotAnElement(parent));
        }
        self.node(child)?;
        if child == self.body {
            return Err(DomError::HierarchyRequest(child));
        }
        let mut current = Some(parent);
        while let Some(node) = current {
            if node == child {
                return Err(DomError::HierarchyRequest(child));
            }
            current = self.parent(node);
        }
        Ok(())
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(node) = self.get_mut(parent) {
            node.children.retain(|c| *c != id);
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = None;
        }
        self.record(MutationKind::ChildList, parent, Vec::new(), vec![id]);
    }

    // ---- traversal ----------------------------------------------------------

    /// `root` and all its descendants in document order.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            out.push(id);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Text nodes under `root` in document order. Subtrees for which `skip`
    /// returns true are not entered.
    pub fn text_nodes<F>(&self, root: NodeId, skip: F) -> Vec<NodeId>
    where
        F: Fn(&Dom, NodeId) -> bool,
    {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            if skip(self, id) {
                continue;
            }
            match node.content {
                NodeContent::Text(_) => out.push(id),
                NodeContent::Element { .. } => stack.extend(node.children.iter().rev()),
            }
        }
        out
    }

    /// Nearest inclusive ancestor of `id` satisfying `predicate`.
    pub fn closest<F>(&self, id: NodeId, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Dom, NodeId) -> bool,
    {
        let mut current = Some(id);
        while let Some(node) = current {
            if !self.contains(node) {
                return None;
            }
            if predicate(self, node) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// Connected elements carrying `class`, in document order.
    pub fn query_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .filter(|id| self.has_class(*id, class))
            .collect()
    }

    // ---- observer -----------------------------------------------------------

    /// Start queueing mutation records for the body subtree.
    pub fn observe(&mut self) {
        self.observing = true;
    }

    /// Stop observing and drop queued records.
    pub fn disconnect(&mut self) {
        self.observing = false;
        self.records.clear();
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }

    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }

    pub fn pending_records(&self) -> usize {
        self.records.len()
    }

    /// Run `f` with every mutation it causes tagged [`MutationOrigin::Internal`].
    pub fn as_internal<R>(&mut self, f: impl FnOnce(&mut Dom) -> R) -> R {
        let previous = std::mem::replace(&mut self.origin, MutationOrigin::Internal);
        let result = f(self);
        self.origin = previous;
        result
    }

    fn record(&mut self, kind: MutationKind, target: NodeId, added: Vec<NodeId>, removed: Vec<NodeId>) {
        if !self.observing || !self.is_connected(target) {
            return;
        }
        self.records.push(MutationRecord {
            kind,
            target,
            added,
            removed,
            origin: self.origin,
        });
    }
}

/// Shared handle to a [`Dom`].
///
/// The lock is synchronous; callers must not hold the guard across an
/// `.await`.
#[derive(Debug, Clone, Default)]
pub struct Document {
    inner: Arc<Mutex<Dom>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dom(dom: Dom) -> Self {
        Self {
            inner: Arc::new(Mutex::new(dom)),
        }
    }

    pub fn from_paragraphs(text: &str) -> Self {
        Self::from_dom(Dom::from_paragraphs(text))
    }

    pub fn lock(&self) -> MutexGuard<'_, Dom> {
        self.inner.lock()
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
