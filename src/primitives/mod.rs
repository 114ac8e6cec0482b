//! Primitives - Component building blocks.
//!
//! Components are plain functions returning a [`Node`]:
//! - [`Element`] - tag, identifier, attributes, value, flags, listeners
//! - builders such as [`div`], [`p`], [`button`], [`input`], [`link`]
//!
//! The tree is a value. The driver throws the previous materialization away
//! on every cycle, so builders never need to worry about reuse.
//!
//! ```ignore
//! fn counter() -> Node {
//!     let (count, set_count) = use_state(0);
//!     div()
//!         .child(p(count.to_string()).id("count"))
//!         .child(button("+1").on_click(move || set_count.update(|v| v + 1)))
//!         .into()
//! }
//! ```

mod element;
mod types;

pub use element::{button, div, input, link, p};
pub use types::*;
