//! # spark-hooks
//!
//! Hook-based UI runtime with whole-tree re-rendering.
//!
//! Components are plain functions that return a [`Node`] tree and keep their
//! local state in hooks. Any state change re-renders the entire tree
//! synchronously and replaces what the host shows, while keyboard focus and
//! the text selection survive the swap.
//!
//! ## Architecture
//!
//! ```text
//! event → setter / dispatch → update() → render_root → materialize → swap → refocus
//! ```
//!
//! ## Modules
//!
//! - [`hooks`] - slot store, `use_state`, `use_reducer`, `use_effect`
//! - [`pipeline`] - `mount`, `update`, focus snapshot, driver config
//! - [`primitives`] - node values and element builders
//! - [`dom`] - host trait and the in-memory [`Document`]
//! - [`renderer`] - terminal output via crossterm
//! - [`state`] - keyboard input and key routing
//!
//! ## Example
//!
//! ```ignore
//! use spark_hooks::{button, div, mount, p, use_state, Document, Node};
//!
//! fn counter() -> Node {
//!     let (count, set_count) = use_state(0);
//!     div()
//!         .child(p(count.to_string()))
//!         .child(button("+1").on_click(move || set_count.update(|c| c + 1)))
//!         .into()
//! }
//!
//! let doc = Document::shared();
//! let container = doc.borrow_mut().create_container("root")?;
//! mount(doc.clone(), container, counter)?;
//! ```

pub mod dom;
pub mod error;
pub mod hooks;
pub mod pipeline;
pub mod primitives;
pub mod renderer;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{HostError, HostResult, RuntimeError, RuntimeResult};

pub use dom::{Document, Host, SharedDocument, materialize};

pub use hooks::{Deps, Dispatch, Setter, reset_hooks, use_effect, use_reducer, use_state};

pub use pipeline::{
    DriverConfig, RenderStats, is_mounted, mount, render_stats, set_driver_config, unmount, update,
};

pub use primitives::{Element, Node, button, div, input, link, p};

pub use renderer::{TerminalRenderer, render_plain};

pub use state::{KeyOutcome, KeyboardEvent, route_key};
