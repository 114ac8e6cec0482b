//! Input Module - Event conversion, polling and key routing
//!
//! Bridges crossterm's event system with the document. Keys are converted to
//! [`KeyboardEvent`]s and then routed to the focused element, standing in
//! for what a browser does with real keyboard input.
//!
//! # Routing
//!
//! | Key                  | Effect                                        |
//! |----------------------|-----------------------------------------------|
//! | Tab / Shift+Tab      | cycle focus through focusable elements        |
//! | Enter                | click the focused element                     |
//! | printable character  | replace the selection in the focused field    |
//! | Backspace            | delete the selection or the previous char     |
//! | ArrowLeft/ArrowRight | move the caret                                |
//! | Home / End           | caret to the start or end                     |
//! | Escape / Ctrl+C      | quit                                          |
//!
//! # Example
//!
//! ```ignore
//! use spark_hooks::state::input::{poll_event, route_key, InputEvent, KeyOutcome};
//! use std::time::Duration;
//!
//! loop {
//!     if let Some(InputEvent::Key(key)) = poll_event(Duration::from_millis(16))? {
//!         if route_key(&doc, &key)? == KeyOutcome::Quit {
//!             break;
//!         }
//!     }
//! }
//! ```

use crossterm::event::{
    Event as CrosstermEvent, KeyCode, KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyModifiers,
    poll, read,
};
use std::time::Duration;

use super::keyboard::{KeyState, KeyboardEvent, Modifiers};
use crate::dom::{Host, SharedDocument, delete_backward, fire_click, type_text};
use crate::error::HostResult;

// =============================================================================
// INPUT EVENT ENUM
// =============================================================================

/// Unified event type for the event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyboardEvent),
    /// Terminal resize event (new width, height)
    Resize(u16, u16),
    /// No event or unhandled event type
    None,
}

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert crossterm KeyEvent to our KeyboardEvent
pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyboardEvent {
    let mut modifiers = convert_modifiers(event.modifiers);
    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => {
            modifiers.shift = true;
            "Tab".to_string()
        }
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => String::new(),
    };

    let state = match event.kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    };

    KeyboardEvent {
        key,
        modifiers,
        state,
    }
}

/// Convert crossterm KeyModifiers to our Modifiers
fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
        meta: mods.contains(KeyModifiers::META) || mods.contains(KeyModifiers::SUPER),
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(Some(read_event()?))
    } else {
        Ok(None)
    }
}

/// Read the next event (blocking).
pub fn read_event() -> std::io::Result<InputEvent> {
    match read()? {
        CrosstermEvent::Key(key) => Ok(InputEvent::Key(convert_key_event(key))),
        CrosstermEvent::Resize(w, h) => Ok(InputEvent::Resize(w, h)),
        _ => Ok(InputEvent::None),
    }
}

// =============================================================================
// KEY ROUTING
// =============================================================================

/// What routing a key did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key changed focus, edited a field or clicked something.
    Handled,
    /// Nothing reacted to the key.
    Ignored,
    /// The user asked to leave the event loop.
    Quit,
}

impl KeyOutcome {
    fn from_handled(handled: bool) -> Self {
        if handled { Self::Handled } else { Self::Ignored }
    }
}

/// Route a key to the focused element of `doc`.
///
/// No document borrow is held while listeners run, so listeners are free to
/// change state and trigger a render into the same document.
pub fn route_key(doc: &SharedDocument, event: &KeyboardEvent) -> HostResult<KeyOutcome> {
    if !event.is_press() {
        return Ok(KeyOutcome::Ignored);
    }
    if event.key == "Escape" || (event.modifiers.ctrl && event.key.eq_ignore_ascii_case("c")) {
        return Ok(KeyOutcome::Quit);
    }
    if event.key == "Tab" {
        let mut doc = doc.borrow_mut();
        let target = if event.modifiers.shift {
            doc.focus_previous()
        } else {
            doc.focus_next()
        };
        tracing::trace!(?target, "focus moved");
        return Ok(KeyOutcome::from_handled(target.is_some()));
    }

    let Some(active) = doc.borrow().active_element() else {
        return Ok(KeyOutcome::Ignored);
    };

    let handled = match event.key.as_str() {
        "Enter" => fire_click(doc, active)?,
        "Backspace" => delete_backward(doc, active)?,
        "ArrowLeft" => move_caret(doc, active, -1)?,
        "ArrowRight" => move_caret(doc, active, 1)?,
        "Home" => move_caret(doc, active, isize::MIN)?,
        "End" => move_caret(doc, active, isize::MAX)?,
        _ => match event.printable() {
            Some(c) => type_text(doc, active, c.encode_utf8(&mut [0; 4]))?,
            None => false,
        },
    };
    Ok(KeyOutcome::from_handled(handled))
}

fn move_caret(doc: &SharedDocument, node: crate::types::NodeId, delta: isize) -> HostResult<bool> {
    let mut doc = doc.borrow_mut();
    if doc.selection(node).is_none() {
        return Ok(false);
    }
    doc.move_caret(node, delta)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, materialize};
    use crate::primitives::{Node, button, div, input};
    use crate::types::Selection;
    use crossterm::event::KeyEventState;
    use std::cell::Cell;
    use std::rc::Rc;

    fn setup(tree: Node) -> SharedDocument {
        let doc = Document::shared();
        {
            let mut d = doc.borrow_mut();
            let root = materialize(&mut *d, &tree).unwrap();
            let body = d.body();
            d.append_child(body, root).unwrap();
        }
        doc
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyboardEvent {
        convert_key_event(CrosstermKeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_convert_key_event() {
        let event = key(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(event.key, "x");
        assert!(event.is_press());

        let event = key(KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(event.key, "ArrowLeft");

        let event = key(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(event.modifiers.ctrl);
    }

    #[test]
    fn test_back_tab_is_shift_tab() {
        let event = key(KeyCode::BackTab, KeyModifiers::NONE);
        assert_eq!(event.key, "Tab");
        assert!(event.modifiers.shift);
    }

    #[test]
    fn test_tab_cycles_focus() {
        let doc = setup(
            div()
                .child(input().id("input"))
                .child(button("Submit").id("submit"))
                .into(),
        );

        route_key(&doc, &KeyboardEvent::new("Tab")).unwrap();
        let first = doc.borrow().active_element().unwrap();
        assert_eq!(doc.borrow().element_id(first).as_deref(), Some("input"));

        route_key(&doc, &KeyboardEvent::new("Tab")).unwrap();
        let second = doc.borrow().active_element().unwrap();
        assert_eq!(doc.borrow().element_id(second).as_deref(), Some("submit"));

        route_key(&doc, &KeyboardEvent::with_modifiers("Tab", Modifiers::shift())).unwrap();
        assert_eq!(doc.borrow().active_element(), Some(first));
    }

    #[test]
    fn test_typing_edits_focused_field() {
        let seen = Rc::new(std::cell::RefCell::new(String::new()));
        let sink = seen.clone();
        let doc = setup(
            input()
                .id("input")
                .on_input(move |value| *sink.borrow_mut() = value.to_string())
                .into(),
        );
        route_key(&doc, &KeyboardEvent::new("Tab")).unwrap();

        for c in ["a", "b", "c"] {
            assert_eq!(
                route_key(&doc, &KeyboardEvent::new(c)).unwrap(),
                KeyOutcome::Handled
            );
        }
        route_key(&doc, &KeyboardEvent::new("ArrowLeft")).unwrap();
        route_key(&doc, &KeyboardEvent::new("Backspace")).unwrap();

        assert_eq!(*seen.borrow(), "ac");
        let field = doc.borrow().get_element_by_id("input").unwrap();
        assert_eq!(doc.borrow().selection(field), Some(Selection::caret(1)));
    }

    #[test]
    fn test_enter_clicks_focused_button() {
        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        let doc = setup(
            button("Go")
                .id("go")
                .on_click(move || counter.set(counter.get() + 1))
                .into(),
        );

        assert_eq!(
            route_key(&doc, &KeyboardEvent::new("Enter")).unwrap(),
            KeyOutcome::Ignored
        );
        route_key(&doc, &KeyboardEvent::new("Tab")).unwrap();
        assert_eq!(
            route_key(&doc, &KeyboardEvent::new("Enter")).unwrap(),
            KeyOutcome::Handled
        );
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_quit_keys() {
        let doc = setup(div().into());
        assert_eq!(
            route_key(&doc, &KeyboardEvent::new("Escape")).unwrap(),
            KeyOutcome::Quit
        );
        assert_eq!(
            route_key(&doc, &KeyboardEvent::with_modifiers("c", Modifiers::ctrl())).unwrap(),
            KeyOutcome::Quit
        );
    }

    #[test]
    fn test_release_is_ignored() {
        let doc = setup(input().id("input").into());
        route_key(&doc, &KeyboardEvent::new("Tab")).unwrap();
        let mut event = KeyboardEvent::new("a");
        event.state = KeyState::Release;
        assert_eq!(route_key(&doc, &event).unwrap(), KeyOutcome::Ignored);
    }
}
