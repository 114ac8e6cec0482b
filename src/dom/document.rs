//! In-memory document - the crate's reference [`Host`].
//!
//! Nodes live in an id-keyed arena. Ids only grow, so a node removed by a
//! swap can never be confused with one created later.
//!
//! Listener dispatch goes through the free functions at the bottom of this
//! module ([`fire_click`], [`fire_input`], [`type_text`], ...). They take the
//! shared `Rc<RefCell<Document>>`, copy the listeners out and release the
//! borrow before calling them, because a listener usually ends in a setter
//! that re-renders into this same document.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::host::{Host, Listener};
use crate::error::{HostError, HostResult};
use crate::primitives::{ClickCallback, InputCallback};
use crate::types::{ElementFlags, NodeId, Selection};

/// A document shared between the driver and event sources.
pub type SharedDocument = Rc<RefCell<Document>>;

// =============================================================================
// Node Storage
// =============================================================================

struct NodeData {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Default)]
struct ElementData {
    tag: String,
    id: Option<String>,
    attributes: Vec<(String, String)>,
    value: String,
    selection: Selection,
    flags: ElementFlags,
    click_listeners: Vec<ClickCallback>,
    input_listeners: Vec<InputCallback>,
}

impl ElementData {
    fn value_len(&self) -> usize {
        self.value.chars().count()
    }
}

/// Byte offset of the `chars`-th character (or the end of `s`).
fn byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(offset, _)| offset)
}

// =============================================================================
// Document
// =============================================================================

/// Tree of elements and text with a single focus target.
pub struct Document {
    nodes: HashMap<NodeId, NodeData>,
    next_id: usize,
    body: NodeId,
    active: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("body", &self.body)
            .field("active", &self.active)
            .finish()
    }
}

impl Document {
    /// Create a document containing only a `body` element.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: HashMap::new(),
            next_id: 0,
            body: NodeId(0),
            active: None,
        };
        doc.body = doc.create_element("body", ElementFlags::NONE);
        doc
    }

    /// Create a document wrapped for sharing with the driver.
    pub fn shared() -> SharedDocument {
        Rc::new(RefCell::new(Self::new()))
    }

    /// The document root.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create a `div` with identifier `id` under the body, for use as a
    /// mount container.
    pub fn create_container(&mut self, id: &str) -> HostResult<NodeId> {
        let container = self.create_element("div", ElementFlags::NONE);
        self.set_element_id(container, id)?;
        self.append_child(self.body, container)?;
        Ok(container)
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            NodeData {
                parent: None,
                children: Vec::new(),
                kind,
            },
        );
        id
    }

    fn data(&self, node: NodeId) -> HostResult<&NodeData> {
        self.nodes.get(&node).ok_or(HostError::UnknownNode(node))
    }

    fn element(&self, node: NodeId) -> HostResult<&ElementData> {
        match &self.data(node)?.kind {
            NodeKind::Element(element) => Ok(element),
            NodeKind::Text(_) => Err(HostError::NotAnElement(node)),
        }
    }

    fn element_mut(&mut self, node: NodeId) -> HostResult<&mut ElementData> {
        let data = self
            .nodes
            .get_mut(&node)
            .ok_or(HostError::UnknownNode(node))?;
        match &mut data.kind {
            NodeKind::Element(element) => Ok(element),
            NodeKind::Text(_) => Err(HostError::NotAnElement(node)),
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Whether `node` is alive.
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Whether `node` is reachable from the body.
    pub fn is_connected(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.body {
                return true;
            }
            current = self.nodes.get(&id).and_then(|data| data.parent);
        }
        false
    }

    /// Number of live nodes, including the body.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|data| data.parent)
    }

    /// Children of `node` (empty for unknown nodes).
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(&node)
            .map(|data| data.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).ok().map(|element| element.tag.as_str())
    }

    /// Content of a text node.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(&node)?.kind {
            NodeKind::Text(content) => Some(content.as_str()),
            NodeKind::Element(_) => None,
        }
    }

    pub fn value(&self, node: NodeId) -> Option<&str> {
        self.element(node).ok().map(|element| element.value.as_str())
    }

    pub fn flags(&self, node: NodeId) -> Option<ElementFlags> {
        self.element(node).ok().map(|element| element.flags)
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).ok().and_then(|element| {
            element
                .attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        })
    }

    /// Concatenated text of every descendant text node, in tree order.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(data) = self.nodes.get(&node) else { return };
        if let NodeKind::Text(content) = &data.kind {
            out.push_str(content);
        }
        for &child in &data.children {
            self.collect_text(child, out);
        }
    }

    /// `node` and its descendants, pre-order.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let Some(data) = self.nodes.get(&id) else { continue };
            out.push(id);
            stack.extend(data.children.iter().rev().copied());
        }
        out
    }

    // -------------------------------------------------------------------------
    // Focus Navigation
    // -------------------------------------------------------------------------

    /// Elements that can take focus, in tree order.
    pub fn focusable_elements(&self) -> Vec<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .filter(|&id| self.flags(id).is_some_and(ElementFlags::accepts_focus))
            .collect()
    }

    /// Move focus forward in tree order, wrapping. Returns the new target.
    pub fn focus_next(&mut self) -> Option<NodeId> {
        self.cycle_focus(1)
    }

    /// Move focus backward in tree order, wrapping.
    pub fn focus_previous(&mut self) -> Option<NodeId> {
        self.cycle_focus(-1)
    }

    fn cycle_focus(&mut self, direction: isize) -> Option<NodeId> {
        let focusables = self.focusable_elements();
        if focusables.is_empty() {
            return None;
        }
        let len = focusables.len() as isize;
        let current = self
            .active_element()
            .and_then(|active| focusables.iter().position(|&id| id == active));
        let next = match current {
            None if direction > 0 => 0,
            None => len - 1,
            Some(pos) => ((pos as isize + direction) % len + len) % len,
        };
        let target = focusables[next as usize];
        self.active = Some(target);
        Some(target)
    }

    /// Move the caret of a text field by `delta` characters, collapsing any
    /// selection.
    pub fn move_caret(&mut self, node: NodeId, delta: isize) -> HostResult<()> {
        let element = self.element_mut(node)?;
        if !element.flags.contains(ElementFlags::SELECTABLE) {
            return Ok(());
        }
        let from = if delta < 0 {
            element.selection.start
        } else {
            element.selection.end
        };
        let to = from.saturating_add_signed(delta).min(element.value_len());
        element.selection = Selection::caret(to);
        Ok(())
    }

    fn remove_subtree(&mut self, node: NodeId) {
        let Some(data) = self.nodes.remove(&node) else { return };
        if self.active == Some(node) {
            self.active = None;
        }
        for child in data.children {
            self.remove_subtree(child);
        }
    }

    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }
}

// =============================================================================
// Host Implementation
// =============================================================================

impl Host for Document {
    fn create_element(&mut self, tag: &str, flags: ElementFlags) -> NodeId {
        self.alloc(NodeKind::Element(ElementData {
            tag: tag.to_string(),
            flags,
            ..Default::default()
        }))
    }

    fn create_text(&mut self, content: &str) -> NodeId {
        self.alloc(NodeKind::Text(content.to_string()))
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> HostResult<()> {
        let element = self.element_mut(node)?;
        match element.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => element.attributes.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn set_element_id(&mut self, node: NodeId, id: &str) -> HostResult<()> {
        self.element_mut(node)?.id = Some(id.to_string());
        Ok(())
    }

    fn set_value(&mut self, node: NodeId, value: &str) -> HostResult<()> {
        let element = self.element_mut(node)?;
        element.value = value.to_string();
        element.selection = Selection::caret(element.value_len());
        Ok(())
    }

    fn add_listener(&mut self, node: NodeId, listener: Listener) -> HostResult<()> {
        let element = self.element_mut(node)?;
        match listener {
            Listener::Click(callback) => element.click_listeners.push(callback),
            Listener::Input(callback) => element.input_listeners.push(callback),
        }
        Ok(())
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> HostResult<()> {
        self.element(parent)?;
        self.data(child)?;
        if self.is_ancestor(child, parent) {
            return Err(HostError::InvalidHierarchy { parent, child });
        }
        if let Some(old_parent) = self.parent(child) {
            if let Some(data) = self.nodes.get_mut(&old_parent) {
                data.children.retain(|&id| id != child);
            }
        }
        if let Some(data) = self.nodes.get_mut(&child) {
            data.parent = Some(parent);
        }
        if let Some(data) = self.nodes.get_mut(&parent) {
            data.children.push(child);
        }
        Ok(())
    }

    fn clear_children(&mut self, parent: NodeId) -> HostResult<()> {
        let children = match self.nodes.get_mut(&parent) {
            Some(data) => std::mem::take(&mut data.children),
            None => return Err(HostError::UnknownNode(parent)),
        };
        for child in children {
            self.remove_subtree(child);
        }
        Ok(())
    }

    fn active_element(&self) -> Option<NodeId> {
        self.active.filter(|&id| self.contains(id))
    }

    fn element_id(&self, node: NodeId) -> Option<String> {
        self.element(node)
            .ok()
            .and_then(|element| element.id.clone())
            .filter(|id| !id.is_empty())
    }

    fn selection(&self, node: NodeId) -> Option<Selection> {
        let element = self.element(node).ok()?;
        element
            .flags
            .contains(ElementFlags::SELECTABLE)
            .then_some(element.selection)
    }

    fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .find(|&node| self.element(node).is_ok_and(|element| element.id.as_deref() == Some(id)))
    }

    fn focus(&mut self, node: NodeId) -> HostResult<()> {
        let flags = self.element(node)?.flags;
        if flags.accepts_focus() && self.is_connected(node) {
            self.active = Some(node);
        }
        Ok(())
    }

    fn set_selection(&mut self, node: NodeId, selection: Selection) -> HostResult<()> {
        let element = self.element_mut(node)?;
        if element.flags.contains(ElementFlags::SELECTABLE) {
            element.selection = selection.clamped(element.value_len());
        }
        Ok(())
    }
}

// =============================================================================
// Event Dispatch
// =============================================================================

/// Activate `node` (mouse click or Enter). Disabled elements ignore it.
///
/// Returns whether any listener ran.
pub fn fire_click(doc: &SharedDocument, node: NodeId) -> HostResult<bool> {
    let listeners = {
        let doc = doc.borrow();
        let element = doc.element(node)?;
        if element.flags.contains(ElementFlags::DISABLED) {
            return Ok(false);
        }
        element.click_listeners.clone()
    };
    for listener in &listeners {
        listener();
    }
    Ok(!listeners.is_empty())
}

/// Replace a text field's value (caret at the end) and notify its input
/// listeners.
pub fn fire_input(doc: &SharedDocument, node: NodeId, value: &str) -> HostResult<bool> {
    let listeners = {
        let mut doc = doc.borrow_mut();
        if doc.element(node)?.flags.contains(ElementFlags::DISABLED) {
            return Ok(false);
        }
        doc.set_value(node, value)?;
        doc.element(node)?.input_listeners.clone()
    };
    notify_input(&listeners, value);
    Ok(!listeners.is_empty())
}

/// Insert `text` over the current selection of a text field, as typing does,
/// and notify its input listeners.
pub fn type_text(doc: &SharedDocument, node: NodeId, text: &str) -> HostResult<bool> {
    edit_value(doc, node, |value, selection| {
        let start = byte_offset(value, selection.start);
        let end = byte_offset(value, selection.end);
        value.replace_range(start..end, text);
        Selection::caret(selection.start + text.chars().count())
    })
}

/// Delete the selection, or the character before the caret.
pub fn delete_backward(doc: &SharedDocument, node: NodeId) -> HostResult<bool> {
    edit_value(doc, node, |value, selection| {
        let from = if selection.is_collapsed() {
            selection.start.saturating_sub(1)
        } else {
            selection.start
        };
        let start = byte_offset(value, from);
        let end = byte_offset(value, selection.end);
        value.replace_range(start..end, "");
        Selection::caret(from)
    })
}

fn edit_value(
    doc: &SharedDocument,
    node: NodeId,
    edit: impl FnOnce(&mut String, Selection) -> Selection,
) -> HostResult<bool> {
    let (listeners, value) = {
        let mut doc = doc.borrow_mut();
        let element = doc.element_mut(node)?;
        let editable = element.flags.contains(ElementFlags::SELECTABLE)
            && !element.flags.contains(ElementFlags::DISABLED);
        if !editable {
            return Ok(false);
        }
        let selection = element.selection.clamped(element.value_len());
        element.selection = edit(&mut element.value, selection);
        (element.input_listeners.clone(), element.value.clone())
    };
    notify_input(&listeners, &value);
    Ok(true)
}

fn notify_input(listeners: &[InputCallback], value: &str) {
    for listener in listeners {
        listener(value);
    }
}
