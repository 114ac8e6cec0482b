//! Render Pipeline
//!
//! Drives the synchronous render-and-swap cycle that connects the hook engine
//! to the host.
//!
//! # Pipeline Architecture
//!
//! ```text
//! setter / dispatch → update() → capture focus → render_root → swap → refocus
//! ```
//!
//! ## Key Design Principles
//!
//! - **No diffing**: the container's children are replaced wholesale
//! - **One cycle per mutation**: nothing is queued or batched
//! - **Focus by identifier**: node identity is never tracked

pub mod config;
pub mod focus;
pub mod mount;

pub use config::{DriverConfig, driver_config, set_driver_config};
pub use focus::FocusSnapshot;
pub use mount::{
    RenderStats, RootFn, is_mounted, mount, render_stats, reset_render_stats, unmount, update,
};

pub(crate) use mount::request_update;
