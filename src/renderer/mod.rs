//! Renderer Module - Terminal output for the document
//!
//! - [`layout`] - turns a subtree into styled lines
//! - [`TerminalRenderer`] - writes lines with crossterm, skipping unchanged rows
//! - [`render_plain`] - unstyled text, handy for assertions and logs

mod layout;
mod terminal;

pub use layout::{Line, Span, SpanStyle, layout, render_plain};
pub use terminal::{TerminalRenderer, TerminalSession};
