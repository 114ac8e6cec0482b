//! Core types for spark-hooks.
//!
//! These types are shared by the host model, the node builders and the
//! render driver.

use std::fmt;

// =============================================================================
// NodeId
// =============================================================================

/// Handle to a node owned by a [`Host`](crate::dom::Host).
///
/// Handles are never reused: once a subtree is removed its ids stay dead,
/// so a stale handle can be told apart from a freshly rendered node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Element Flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Interaction capabilities of an element.
    ///
    /// Combine with bitwise OR: `ElementFlags::FOCUSABLE | ElementFlags::SELECTABLE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ElementFlags: u8 {
        const NONE = 0;
        /// Can hold keyboard focus.
        const FOCUSABLE = 1 << 0;
        /// Has an editable value with a selection range (text fields).
        const SELECTABLE = 1 << 1;
        /// Ignores focus and activation.
        const DISABLED = 1 << 2;
    }
}

impl ElementFlags {
    /// Flags the builders assign by default for a tag name.
    pub fn for_tag(tag: &str) -> Self {
        match tag {
            "input" | "textarea" => Self::FOCUSABLE | Self::SELECTABLE,
            "button" | "a" => Self::FOCUSABLE,
            _ => Self::NONE,
        }
    }

    /// Whether focus can currently land on an element with these flags.
    pub fn accepts_focus(self) -> bool {
        self.contains(Self::FOCUSABLE) && !self.contains(Self::DISABLED)
    }
}

// =============================================================================
// Selection
// =============================================================================

/// Text selection range in characters. `start == end` is a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Create a selection.
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Collapsed selection at `at`.
    pub const fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }

    /// Whether this is a caret rather than a range.
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Clamp both ends to `len` and collapse a reversed range onto `end`.
    pub fn clamped(self, len: usize) -> Self {
        let end = self.end.min(len);
        let start = self.start.min(end);
        Self { start, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_for_tag() {
        assert!(ElementFlags::for_tag("input").contains(ElementFlags::SELECTABLE));
        assert!(ElementFlags::for_tag("button").accepts_focus());
        assert_eq!(ElementFlags::for_tag("div"), ElementFlags::NONE);
    }

    #[test]
    fn test_disabled_rejects_focus() {
        let flags = ElementFlags::FOCUSABLE | ElementFlags::DISABLED;
        assert!(!flags.accepts_focus());
    }

    #[test]
    fn test_selection_clamp() {
        assert_eq!(Selection::new(2, 10).clamped(6), Selection::new(2, 6));
        assert_eq!(Selection::new(5, 3).clamped(6), Selection::new(3, 3));
        assert!(Selection::caret(4).is_collapsed());
    }
}
