//! Focus snapshot - carries focus and selection across a swap.
//!
//! Focus is matched by identifier only. The element focused after the swap
//! is a brand new node; it counts as "the same" element because it carries
//! the same identifier.

use super::config::DriverConfig;
use crate::dom::Host;
use crate::error::HostResult;
use crate::types::Selection;

/// Focus state captured right before a render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusSnapshot {
    /// Identifier of the focused element, if it had a non-empty one.
    pub id: Option<String>,
    /// Selection of the focused element, if it supports selection.
    pub selection: Option<Selection>,
}

impl FocusSnapshot {
    /// Read the host's focused element. Missing focus gives an empty snapshot.
    pub fn capture(host: &dyn Host) -> Self {
        let Some(active) = host.active_element() else {
            return Self::default();
        };
        Self {
            id: host.element_id(active),
            selection: host.selection(active),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none()
    }

    /// Refocus by identifier and reapply the selection.
    ///
    /// Returns whether focus ended up on the looked-up element. A missing
    /// identifier or a vanished element is not an error.
    pub fn restore(self, host: &mut dyn Host, config: &DriverConfig) -> HostResult<bool> {
        if !config.restore_focus {
            return Ok(false);
        }
        let Some(id) = self.id.as_deref().filter(|id| !id.is_empty()) else {
            return Ok(false);
        };
        let Some(target) = host.get_element_by_id(id) else {
            tracing::trace!(id, "focused element not in new tree, focus dropped");
            return Ok(false);
        };

        host.focus(target)?;
        if config.restore_selection {
            if let Some(selection) = self.selection {
                host.set_selection(target, selection)?;
            }
        }
        Ok(host.active_element() == Some(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::types::ElementFlags;

    fn input(doc: &mut Document, id: &str, value: &str) -> crate::types::NodeId {
        let node = doc.create_element("input", ElementFlags::FOCUSABLE | ElementFlags::SELECTABLE);
        doc.set_element_id(node, id).unwrap();
        doc.set_value(node, value).unwrap();
        let body = doc.body();
        doc.append_child(body, node).unwrap();
        node
    }

    #[test]
    fn test_capture_without_focus() {
        let doc = Document::new();
        let snapshot = FocusSnapshot::capture(&doc);
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.selection, None);
    }

    #[test]
    fn test_capture_button_has_no_selection() {
        let mut doc = Document::new();
        let button = doc.create_element("button", ElementFlags::FOCUSABLE);
        doc.set_element_id(button, "go").unwrap();
        let body = doc.body();
        doc.append_child(body, button).unwrap();
        doc.focus(button).unwrap();

        let snapshot = FocusSnapshot::capture(&doc);
        assert_eq!(snapshot.id.as_deref(), Some("go"));
        assert_eq!(snapshot.selection, None);
    }

    #[test]
    fn test_restore_onto_new_element() {
        let mut doc = Document::new();
        let old = input(&mut doc, "input", "abcdef");
        doc.focus(old).unwrap();
        doc.set_selection(old, Selection::new(2, 4)).unwrap();
        let snapshot = FocusSnapshot::capture(&doc);

        let body = doc.body();
        doc.clear_children(body).unwrap();
        let fresh = input(&mut doc, "input", "abcdef");

        assert!(snapshot.restore(&mut doc, &DriverConfig::default()).unwrap());
        assert_eq!(doc.active_element(), Some(fresh));
        assert_eq!(doc.selection(fresh), Some(Selection::new(2, 4)));
    }

    #[test]
    fn test_restore_missing_id_is_silent() {
        let mut doc = Document::new();
        let snapshot = FocusSnapshot {
            id: Some("gone".into()),
            selection: Some(Selection::caret(1)),
        };
        assert!(!snapshot.restore(&mut doc, &DriverConfig::default()).unwrap());
        assert_eq!(doc.active_element(), None);
    }

    #[test]
    fn test_restore_respects_config() {
        let mut doc = Document::new();
        let node = input(&mut doc, "input", "abcdef");
        let snapshot = FocusSnapshot {
            id: Some("input".into()),
            selection: Some(Selection::new(1, 2)),
        };
        let config = DriverConfig {
            restore_focus: true,
            restore_selection: false,
        };
        assert!(snapshot.restore(&mut doc, &config).unwrap());
        assert_eq!(doc.selection(node), Some(Selection::caret(6)));
    }
}
