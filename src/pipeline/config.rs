//! Driver configuration.

use std::cell::Cell;

/// Options for the render-and-swap cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Refocus the element whose identifier held focus before the swap.
    pub restore_focus: bool,
    /// Reapply the captured selection range after refocusing.
    pub restore_selection: bool,
}

impl DriverConfig {
    pub const fn new() -> Self {
        Self {
            restore_focus: true,
            restore_selection: true,
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    static DRIVER_CONFIG: Cell<DriverConfig> = const { Cell::new(DriverConfig::new()) };
}

/// Current driver configuration.
pub fn driver_config() -> DriverConfig {
    DRIVER_CONFIG.with(Cell::get)
}

/// Replace the driver configuration. Takes effect on the next cycle.
pub fn set_driver_config(config: DriverConfig) {
    DRIVER_CONFIG.with(|c| c.set(config));
}
