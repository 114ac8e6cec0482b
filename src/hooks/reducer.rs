//! `use_reducer` - state driven by actions through a pure reducer.

use std::fmt;
use std::rc::Rc;

use super::store::{SlotKind, with_hooks};
use crate::pipeline::request_update;

/// Reducer stored by a [`Dispatch`].
pub type Reducer<S, A> = Rc<dyn Fn(S, A) -> S>;

/// Sends actions to a `use_reducer` slot.
pub struct Dispatch<S, A> {
    index: usize,
    reducer: Reducer<S, A>,
}

impl<S, A> Clone for Dispatch<S, A> {
    fn clone(&self) -> Self {
        Self {
            index: self.index,
            reducer: self.reducer.clone(),
        }
    }
}

impl<S, A> fmt::Debug for Dispatch<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatch").field("index", &self.index).finish()
    }
}

impl<S: Clone + 'static, A> Dispatch<S, A> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Store `reducer(current, action)` and run a full render-and-swap cycle.
    ///
    /// This is the only place the reducer is ever called.
    pub fn dispatch(&self, action: A) {
        let Some(current) = with_hooks(|hooks| hooks.value::<S>(self.index, SlotKind::Reducer)) else {
            tracing::warn!(index = self.index, "reducer slot missing or retyped, action dropped");
            return;
        };
        let next = (self.reducer)(current, action);
        with_hooks(|hooks| hooks.write(self.index, SlotKind::Reducer, next));
        request_update();
    }
}

/// Declare reducer-managed state.
///
/// Seeds like [`use_state`](super::use_state). The returned [`Dispatch`]
/// carries the reducer passed in this render.
///
/// # Example
///
/// ```ignore
/// let (state, send) = use_reducer(reducer, SearchState::default());
/// button("Submit").on_click(move || send.dispatch(Action::Fetch));
/// ```
pub fn use_reducer<S, A, R>(reducer: R, initial: S) -> (S, Dispatch<S, A>)
where
    S: Clone + 'static,
    R: Fn(S, A) -> S + 'static,
{
    let (index, state) = with_hooks(|hooks| {
        let index = hooks.claim();
        (index, hooks.seed(index, SlotKind::Reducer, initial))
    });
    (
        state,
        Dispatch {
            index,
            reducer: Rc::new(reducer),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::{reset_hooks, render_root};
    use crate::primitives::{Node, div};
    use std::cell::{Cell, RefCell};

    #[derive(Clone, Debug, PartialEq)]
    enum Action {
        Add(i32),
        Reset,
    }

    fn setup() {
        reset_hooks();
    }

    #[test]
    fn test_dispatch_applies_reducer_once() {
        setup();
        let calls = Rc::new(Cell::new(0));
        let dispatch = RefCell::new(None);
        let state = Cell::new(0);
        let root = || {
            let calls = calls.clone();
            let (s, send) = use_reducer(
                move |s: i32, action: Action| {
                    calls.set(calls.get() + 1);
                    match action {
                        Action::Add(n) => s + n,
                        Action::Reset => 0,
                    }
                },
                0,
            );
            state.set(s);
            *dispatch.borrow_mut() = Some(send);
            Node::from(div())
        };

        render_root(&root);
        render_root(&root);
        assert_eq!(calls.get(), 0, "renders never call the reducer");

        let send = dispatch.borrow().clone().unwrap();
        send.dispatch(Action::Add(3));
        send.dispatch(Action::Add(4));
        render_root(&root);
        assert_eq!(state.get(), 7);
        assert_eq!(calls.get(), 2);

        send.dispatch(Action::Reset);
        render_root(&root);
        assert_eq!(state.get(), 0);
    }
}
