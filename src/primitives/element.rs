//! Element builders for common tags.
//!
//! # Example
//!
//! ```ignore
//! use spark_hooks::primitives::{button, div, p};
//!
//! let node = div()
//!     .child(p("Welcome"))
//!     .child(button("Submit").on_click(|| submit()));
//! ```

use super::types::Element;

/// Block container.
pub fn div() -> Element {
    Element::new("div")
}

/// Paragraph with text content.
pub fn p(content: impl Into<String>) -> Element {
    Element::new("p").text(content)
}

/// Focusable button with a label.
pub fn button(label: impl Into<String>) -> Element {
    Element::new("button").text(label)
}

/// Focusable, selectable single-line text field.
pub fn input() -> Element {
    Element::new("input").value("")
}

/// Focusable link.
pub fn link(href: impl Into<String>, label: impl Into<String>) -> Element {
    Element::new("a").attr("href", href).text(label)
}
