//! Host capability consumed by the render driver.

use crate::error::HostResult;
use crate::primitives::{ClickCallback, InputCallback};
use crate::types::{ElementFlags, NodeId, Selection};

/// Event listener attached to a materialized element.
#[derive(Clone)]
pub enum Listener {
    Click(ClickCallback),
    Input(InputCallback),
}

/// A document-like environment the driver renders into.
///
/// The driver only needs element creation, tree insertion/removal, an
/// addressable focus target with an identifier, and an optional selection
/// range. Lookups that can legitimately miss return `Option`; operations on
/// dead handles return [`HostError`](crate::error::HostError).
pub trait Host {
    fn create_element(&mut self, tag: &str, flags: ElementFlags) -> NodeId;

    fn create_text(&mut self, content: &str) -> NodeId;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> HostResult<()>;

    /// Set the identifier attribute.
    fn set_element_id(&mut self, node: NodeId, id: &str) -> HostResult<()>;

    /// Set a text field's value. The caret moves to the end of the value.
    fn set_value(&mut self, node: NodeId, value: &str) -> HostResult<()>;

    fn add_listener(&mut self, node: NodeId, listener: Listener) -> HostResult<()>;

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> HostResult<()>;

    /// Remove and free every child of `parent`.
    fn clear_children(&mut self, parent: NodeId) -> HostResult<()>;

    /// The element holding focus, if any.
    fn active_element(&self) -> Option<NodeId>;

    /// Identifier attribute of `node`, if it has a non-empty one.
    fn element_id(&self, node: NodeId) -> Option<String>;

    /// Selection of `node`; `None` unless the element supports selection.
    fn selection(&self, node: NodeId) -> Option<Selection>;

    /// First element in tree order whose identifier equals `id`.
    fn get_element_by_id(&self, id: &str) -> Option<NodeId>;

    /// Give `node` focus. Elements that cannot take focus are left alone.
    fn focus(&mut self, node: NodeId) -> HostResult<()>;

    /// Apply a selection. Ignored by elements without selection support.
    fn set_selection(&mut self, node: NodeId, selection: Selection) -> HostResult<()>;
}
