//! Hook engine - component-local state without component identity.
//!
//! Three primitives, all bound to slots by call order:
//!
//! - [`use_state`] - value plus [`Setter`]
//! - [`use_reducer`] - value plus [`Dispatch`] through a pure reducer
//! - [`use_effect`] - synchronous side effect gated by a [`Deps`] list
//!
//! Every setter and dispatch call writes its slot and immediately runs one
//! full render-and-swap cycle through [`crate::pipeline::update`]. Calls are
//! never queued or batched.
//!
//! # Rules
//!
//! Call primitives only inside a render pass, and make the same calls in the
//! same order on every pass. Neither rule is checked.

mod effect;
mod reducer;
mod state;
mod store;

pub use effect::{Dep, DepValue, Deps, use_effect};
pub use reducer::{Dispatch, Reducer, use_reducer};
pub use state::{Setter, use_state};
pub use store::{HookStore, SlotKind, hook_count, render_root, reset_hooks};
