//! State Module - Terminal input
//!
//! - **Keyboard** - key event types
//! - **Input** - crossterm conversion, polling, routing keys into a document

pub mod input;
mod keyboard;

pub use input::{InputEvent, KeyOutcome, convert_key_event, poll_event, read_event, route_key};
pub use keyboard::*;
