//! Mount API - the render-and-swap cycle.
//!
//! One cycle, always in this order:
//!
//! 1. capture a [`FocusSnapshot`] from the host
//! 2. run the root through [`render_root`]
//! 3. clear the container and append the freshly materialized tree
//! 4. refocus by identifier and reapply the selection
//!
//! # Example
//!
//! ```ignore
//! use spark_hooks::dom::Document;
//! use spark_hooks::pipeline::mount;
//!
//! let doc = Document::shared();
//! let container = doc.borrow_mut().create_container("root")?;
//! mount(doc.clone(), container, app)?;
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::config::driver_config;
use super::focus::FocusSnapshot;
use crate::dom::{Host, materialize};
use crate::error::{RuntimeError, RuntimeResult};
use crate::hooks::render_root;
use crate::primitives::Node;
use crate::types::NodeId;

// =============================================================================
// Mount State
// =============================================================================

/// Root render function as stored by the driver.
pub type RootFn = Rc<dyn Fn() -> Node>;

struct Mounted {
    host: Rc<RefCell<dyn Host>>,
    container: NodeId,
    root: RootFn,
}

/// Counters describing the cycles run on this thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Cycles started (each one is one render pass).
    pub started: u64,
    /// Cycles that swapped their tree into the container.
    pub committed: u64,
    /// Cycles whose tree was dropped because a nested cycle committed first.
    pub superseded: u64,
    /// Cycles that put focus back on an element.
    pub focus_restored: u64,
    /// Generation of the newest committed cycle.
    pub last_generation: u64,
    /// Node count of the newest committed tree.
    pub last_node_count: usize,
}

thread_local! {
    static MOUNTED: RefCell<Option<Mounted>> = const { RefCell::new(None) };
    static STATS: Cell<RenderStats> = Cell::new(RenderStats::default());
}

fn update_stats(f: impl FnOnce(&mut RenderStats)) -> RenderStats {
    STATS.with(|cell| {
        let mut stats = cell.get();
        f(&mut stats);
        cell.set(stats);
        stats
    })
}

/// Counters for this thread.
pub fn render_stats() -> RenderStats {
    STATS.with(Cell::get)
}

/// Zero the counters.
pub fn reset_render_stats() {
    STATS.with(|cell| cell.set(RenderStats::default()));
}

/// Whether a root is mounted on this thread.
pub fn is_mounted() -> bool {
    MOUNTED.with(|mounted| mounted.borrow().is_some())
}

// =============================================================================
// Mount / Update / Unmount
// =============================================================================

/// Record `container` and `root` as the mount target and run one cycle.
///
/// Mounting again replaces the previous target. The hook store is kept.
pub fn mount<R>(host: Rc<RefCell<dyn Host>>, container: NodeId, root: R) -> RuntimeResult<()>
where
    R: Fn() -> Node + 'static,
{
    MOUNTED.with(|mounted| {
        *mounted.borrow_mut() = Some(Mounted {
            host,
            container,
            root: Rc::new(root),
        });
    });
    tracing::debug!(%container, "root mounted");
    render_cycle()
}

/// Re-run the cycle against the recorded target and root.
pub fn update() -> RuntimeResult<()> {
    render_cycle()
}

/// Forget the mount target and clear its children.
///
/// Returns `false` if nothing was mounted. Later setter calls find nothing to
/// render and are ignored.
pub fn unmount() -> RuntimeResult<bool> {
    let Some(mounted) = MOUNTED.with(|mounted| mounted.borrow_mut().take()) else {
        return Ok(false);
    };
    mounted
        .host
        .try_borrow_mut()
        .map_err(|_| RuntimeError::HostBusy)?
        .clear_children(mounted.container)?;
    tracing::debug!(container = %mounted.container, "root unmounted");
    Ok(true)
}

/// Entry point for setters and dispatchers.
///
/// Errors cannot travel back through an event listener, so they are logged.
pub(crate) fn request_update() {
    match update() {
        Ok(()) => {}
        Err(RuntimeError::NotMounted) => {
            tracing::debug!("state changed with nothing mounted, render skipped");
        }
        Err(err) => tracing::warn!(error = %err, "render cycle failed"),
    }
}

fn render_cycle() -> RuntimeResult<()> {
    let (host, container, root) = MOUNTED
        .with(|mounted| {
            mounted
                .borrow()
                .as_ref()
                .map(|m| (m.host.clone(), m.container, m.root.clone()))
        })
        .ok_or(RuntimeError::NotMounted)?;

    let generation = update_stats(|stats| stats.started += 1).started;
    let span = tracing::debug_span!("render_cycle", generation);
    let _enter = span.enter();
    let config = driver_config();

    // 1. Capture
    let snapshot = {
        let host = host.try_borrow().map_err(|_| RuntimeError::HostBusy)?;
        FocusSnapshot::capture(&*host)
    };

    // 2. Render (no host borrow held: effects may start nested cycles)
    let tree = render_root(&*root);

    if render_stats().last_generation > generation {
        update_stats(|stats| stats.superseded += 1);
        tracing::debug!("newer cycle committed during render, tree dropped");
        return Ok(());
    }

    // 3. Swap
    let mut host = host.try_borrow_mut().map_err(|_| RuntimeError::HostBusy)?;
    host.clear_children(container)?;
    let new_root = materialize(&mut *host, &tree)?;
    host.append_child(container, new_root)?;

    // 4. Refocus
    let restored = snapshot.restore(&mut *host, &config)?;

    let node_count = tree.count();
    update_stats(|stats| {
        stats.committed += 1;
        stats.last_generation = generation;
        stats.last_node_count = node_count;
        if restored {
            stats.focus_restored += 1;
        }
    });
    tracing::debug!(nodes = node_count, restored, "render cycle committed");
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
