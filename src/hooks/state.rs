//! `use_state` - a single value with a setter.

use std::fmt;
use std::marker::PhantomData;

use super::store::{SlotKind, with_hooks};
use crate::pipeline::request_update;

/// Writes a `use_state` slot and re-renders.
///
/// Setters are plain slot addresses, so they can be copied into any number of
/// listeners and stay valid across renders.
pub struct Setter<T> {
    index: usize,
    _marker: PhantomData<fn(T) -> T>,
}

impl<T> Clone for Setter<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Setter<T> {}

impl<T> fmt::Debug for Setter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setter").field("index", &self.index).finish()
    }
}

impl<T: Clone + 'static> Setter<T> {
    /// Slot this setter writes to.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Replace the value and run a full render-and-swap cycle.
    ///
    /// There is no equality check: setting the current value re-renders too.
    pub fn set(&self, value: T) {
        let during_render = with_hooks(|hooks| {
            hooks.write(self.index, SlotKind::State, value);
            hooks.is_rendering()
        });
        if during_render {
            tracing::debug!(index = self.index, "state set during render, nested cycle");
        }
        request_update();
    }

    /// Store `f(current)` and re-render.
    ///
    /// `f` sees the slot's value at call time, not the value captured by the
    /// render that created this setter.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let Some(current) = with_hooks(|hooks| hooks.value::<T>(self.index, SlotKind::State)) else {
            tracing::warn!(index = self.index, "state slot missing or retyped, update dropped");
            return;
        };
        self.set(f(&current));
    }
}

/// Declare a piece of state.
///
/// The first call at this position seeds the slot with `initial`; later
/// renders ignore `initial` and return the stored value.
///
/// # Example
///
/// ```ignore
/// let (count, set_count) = use_state(0);
/// button("+1").on_click(move || set_count.update(|v| v + 1));
/// ```
pub fn use_state<T: Clone + 'static>(initial: T) -> (T, Setter<T>) {
    let (index, value) = with_hooks(|hooks| {
        let index = hooks.claim();
        (index, hooks.seed(index, SlotKind::State, initial))
    });
    (
        value,
        Setter {
            index,
            _marker: PhantomData,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::{hook_count, reset_hooks, render_root};
    use crate::primitives::{Node, div};
    use std::cell::{Cell, RefCell};

    fn setup() {
        reset_hooks();
    }

    #[test]
    fn test_initial_value_seeds_once() {
        setup();
        let seen = RefCell::new(Vec::new());
        let initial = Cell::new(1);
        let root = || {
            let (value, _) = use_state(initial.get());
            seen.borrow_mut().push(value);
            Node::from(div())
        };
        render_root(&root);
        initial.set(2);
        render_root(&root);
        assert_eq!(*seen.borrow(), vec![1, 1]);
    }

    #[test]
    fn test_slots_are_independent() {
        setup();
        let setters = RefCell::new(None);
        let values = RefCell::new((0, String::new()));
        let root = || {
            let (count, set_count) = use_state(0);
            let (name, set_name) = use_state(String::from("a"));
            *setters.borrow_mut() = Some((set_count, set_name));
            *values.borrow_mut() = (count, name);
            Node::from(div())
        };

        render_root(&root);
        let (set_count, _) = setters.borrow().clone().unwrap();
        // Not mounted: the write lands, the re-render request is a logged no-op.
        set_count.set(7);
        render_root(&root);
        assert_eq!(*values.borrow(), (7, "a".to_string()));
        assert_eq!(hook_count(), 2);
    }

    #[test]
    fn test_update_uses_current_slot_value() {
        setup();
        let setter = Cell::new(None);
        let value = Cell::new(0);
        let root = || {
            let (v, set) = use_state(10);
            setter.set(Some(set));
            value.set(v);
            Node::from(div())
        };
        render_root(&root);
        let set = setter.get().unwrap();
        set.update(|v| v + 1);
        set.update(|v| v * 2);
        render_root(&root);
        assert_eq!(value.get(), 22);
    }
}
