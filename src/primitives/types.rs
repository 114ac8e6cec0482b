//! Primitive types - Renderable nodes and callbacks.
//!
//! A render function returns a [`Node`]: an immutable value tree. The driver
//! materializes it into the host on every cycle; nothing in it is reused
//! across renders.

use std::fmt;
use std::rc::Rc;

use crate::types::ElementFlags;

// =============================================================================
// Callback Types
// =============================================================================

/// Click / activation callback.
///
/// Using `Rc<dyn Fn>` lets the same callback be cloned into the host
/// listener table and into other closures of the same render.
pub type ClickCallback = Rc<dyn Fn()>;

/// Text field change callback, called with the field's new value.
pub type InputCallback = Rc<dyn Fn(&str)>;

// =============================================================================
// Node
// =============================================================================

/// A renderable node tree.
#[derive(Clone, Debug)]
pub enum Node {
    /// An element with attributes, listeners and children.
    Element(Element),
    /// A text leaf.
    Text(String),
}

impl Node {
    /// Text leaf.
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(content.into())
    }

    /// Number of nodes in this tree, including itself.
    pub fn count(&self) -> usize {
        match self {
            Node::Element(element) => 1 + element.children.iter().map(Node::count).sum::<usize>(),
            Node::Text(_) => 1,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<&str> for Node {
    fn from(content: &str) -> Self {
        Node::Text(content.to_string())
    }
}

impl From<String> for Node {
    fn from(content: String) -> Self {
        Node::Text(content)
    }
}

// =============================================================================
// Element
// =============================================================================

/// Element description produced by a component.
#[derive(Clone, Default)]
pub struct Element {
    pub tag: String,
    /// Identifier attribute, used for lookup and focus restoration.
    pub id: Option<String>,
    pub attributes: Vec<(String, String)>,
    /// Current value of a text field.
    pub value: Option<String>,
    pub flags: ElementFlags,
    pub children: Vec<Node>,
    pub on_click: Option<ClickCallback>,
    pub on_input: Option<InputCallback>,
}

impl Element {
    /// Create an element with the default flags for `tag`.
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let flags = ElementFlags::for_tag(&tag);
        Self {
            tag,
            flags,
            ..Default::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn flags(mut self, flags: ElementFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set or clear [`ElementFlags::DISABLED`].
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.flags.set(ElementFlags::DISABLED, disabled);
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Append a text leaf.
    pub fn text(self, content: impl Into<String>) -> Self {
        self.child(Node::Text(content.into()))
    }

    pub fn on_click(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_click = Some(Rc::new(callback));
        self
    }

    pub fn on_input(mut self, callback: impl Fn(&str) + 'static) -> Self {
        self.on_input = Some(Rc::new(callback));
        self
    }

    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag)
            .field("id", &self.id)
            .field("attributes", &self.attributes)
            .field("value", &self.value)
            .field("flags", &self.flags)
            .field("children", &self.children)
            .field("on_click", &self.on_click.is_some())
            .field("on_input", &self.on_input.is_some())
            .finish()
    }
}
