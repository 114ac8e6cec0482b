//! Host model - where rendered trees end up.
//!
//! - [`Host`] - the capability the render driver consumes
//! - [`Document`] - in-memory implementation with focus and selection
//! - [`materialize`] - turns a [`Node`] value into host nodes

mod document;
mod host;

pub use document::{
    Document, SharedDocument, delete_backward, fire_click, fire_input, type_text,
};
pub use host::{Host, Listener};

use crate::error::HostResult;
use crate::primitives::Node;
use crate::types::NodeId;

/// Create host nodes for `node` and its descendants.
///
/// The returned root is detached; the caller appends it.
pub fn materialize(host: &mut dyn Host, node: &Node) -> HostResult<NodeId> {
    let element = match node {
        Node::Text(content) => return Ok(host.create_text(content)),
        Node::Element(element) => element,
    };

    let id = host.create_element(&element.tag, element.flags);
    if let Some(ident) = &element.id {
        host.set_element_id(id, ident)?;
    }
    for (name, value) in &element.attributes {
        host.set_attribute(id, name, value)?;
    }
    if let Some(value) = &element.value {
        host.set_value(id, value)?;
    }
    if let Some(callback) = &element.on_click {
        host.add_listener(id, Listener::Click(callback.clone()))?;
    }
    if let Some(callback) = &element.on_input {
        host.add_listener(id, Listener::Input(callback.clone()))?;
    }
    for child in &element.children {
        let child_id = materialize(host, child)?;
        host.append_child(id, child_id)?;
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{button, div, input, p};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_materialize_tree() {
        let clicks = Rc::new(Cell::new(0));
        let clicks_clone = clicks.clone();
        let tree: Node = div()
            .id("app")
            .child(p("hello"))
            .child(input().id("input").value("abc"))
            .child(button("go").on_click(move || clicks_clone.set(clicks_clone.get() + 1)))
            .into();

        let doc = Document::shared();
        let root = materialize(&mut *doc.borrow_mut(), &tree).unwrap();
        let body = doc.borrow().body();
        doc.borrow_mut().append_child(body, root).unwrap();

        let d = doc.borrow();
        assert_eq!(d.get_element_by_id("app"), Some(root));
        assert_eq!(d.text_content(root), "hellogo");
        let field = d.get_element_by_id("input").unwrap();
        assert_eq!(d.value(field), Some("abc"));
        let go = d.children(root)[2];
        drop(d);

        fire_click(&doc, go).unwrap();
        assert_eq!(clicks.get(), 1);
    }
}
