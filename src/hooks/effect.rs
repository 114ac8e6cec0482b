//! `use_effect` and dependency lists.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use super::store::with_hooks;

// =============================================================================
// Dependency Values
// =============================================================================

/// A value that can sit in a dependency list.
///
/// Implemented for every `PartialEq + Debug + 'static` type. Values of
/// different types never compare equal.
pub trait DepValue: Any + fmt::Debug {
    fn as_any(&self) -> &dyn Any;

    fn dep_eq(&self, other: &dyn DepValue) -> bool;
}

impl<T: PartialEq + fmt::Debug + 'static> DepValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dep_eq(&self, other: &dyn DepValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }
}

/// One element of a dependency list.
#[derive(Clone, Debug)]
pub struct Dep(Rc<dyn DepValue>);

impl Dep {
    pub fn new<T: PartialEq + fmt::Debug + 'static>(value: T) -> Self {
        Self(Rc::new(value))
    }
}

impl PartialEq for Dep {
    fn eq(&self, other: &Self) -> bool {
        (*self.0).dep_eq(&*other.0)
    }
}

/// Ordered dependency list of an effect. Build one with [`deps!`](crate::deps).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Deps(Vec<Dep>);

impl Deps {
    /// The empty list: the effect runs on its first render only.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Append a value.
    pub fn with<T: PartialEq + fmt::Debug + 'static>(mut self, value: T) -> Self {
        self.0.push(Dep::new(value));
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether some position of `self` has no counterpart in `previous` or
    /// differs from it. Trailing positions that only `previous` has are not
    /// compared.
    pub fn changed_since(&self, previous: &Deps) -> bool {
        self.0
            .iter()
            .enumerate()
            .any(|(i, dep)| !matches!(previous.0.get(i), Some(prev) if prev == dep))
    }
}

impl FromIterator<Dep> for Deps {
    fn from_iter<I: IntoIterator<Item = Dep>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Build a [`Deps`] list from heterogeneous values.
///
/// ```ignore
/// use_effect(move || save(&query), Some(deps![query.clone(), page]));
/// ```
#[macro_export]
macro_rules! deps {
    () => {
        $crate::hooks::Deps::empty()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::hooks::Deps::empty()$(.with($value))+
    };
}

// =============================================================================
// use_effect
// =============================================================================

/// Run `callback` synchronously during render when its dependencies change.
///
/// The callback runs when:
/// - `deps` is `None` (every render),
/// - this is the slot's first render,
/// - the previous render had no list,
/// - some position of the new list differs from the stored one.
///
/// The new list is stored before the callback runs, whether or not it runs,
/// so a setter called from the callback re-renders without re-triggering it.
/// Once that nested render has run, the rest of the outer render neither
/// compares, stores nor runs effects.
/// Anything the callback returns is dropped; there is no cleanup phase.
pub fn use_effect<F>(callback: F, deps: Option<Deps>)
where
    F: FnOnce(),
{
    let (index, should_run) = with_hooks(|hooks| {
        let index = hooks.claim();
        if hooks.is_overtaken() {
            // A newer pass already compared and stored this slot.
            tracing::trace!(index, "effect skipped in overtaken pass");
            return (index, false);
        }
        let should_run = match (&deps, hooks.effect_deps(index)) {
            (None, _) => true,
            (Some(next), Some(Some(previous))) => next.changed_since(previous),
            (Some(_), _) => true,
        };
        hooks.store_deps(index, deps);
        (index, should_run)
    });

    if should_run {
        tracing::trace!(index, "running effect");
        callback();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::{reset_hooks, render_root};
    use crate::primitives::{Node, div};
    use std::cell::{Cell, RefCell};

    fn setup() {
        reset_hooks();
    }

    #[test]
    fn test_dep_equality_is_typed() {
        assert_eq!(Dep::new(1_i32), Dep::new(1_i32));
        assert_ne!(Dep::new(1_i32), Dep::new(2_i32));
        assert_ne!(Dep::new(1_i32), Dep::new(1_i64));
        assert_eq!(Dep::new("a".to_string()), Dep::new("a".to_string()));
    }

    #[test]
    fn test_changed_since_positional() {
        let previous = deps![1, "x"];
        assert!(!deps![1, "x"].changed_since(&previous));
        assert!(deps![2, "x"].changed_since(&previous));
        assert!(deps![1, "x", 3].changed_since(&previous));
        assert!(!deps![1].changed_since(&previous));
        assert!(!deps![].changed_since(&previous));
    }

    #[test]
    fn test_effect_runs_when_deps_change() {
        setup();
        let runs = Cell::new(0);
        let a = Cell::new(1);
        let b = Cell::new("x");
        let root = || {
            use_effect(|| runs.set(runs.get() + 1), Some(deps![a.get(), b.get()]));
            Node::from(div())
        };

        render_root(&root);
        assert_eq!(runs.get(), 1, "first render always runs");
        render_root(&root);
        assert_eq!(runs.get(), 1, "unchanged deps skip");
        b.set("y");
        render_root(&root);
        assert_eq!(runs.get(), 2);
        a.set(5);
        render_root(&root);
        assert_eq!(runs.get(), 3);
        render_root(&root);
        assert_eq!(runs.get(), 3);
    }

    #[test]
    fn test_effect_without_deps_runs_every_render() {
        setup();
        let runs = Cell::new(0);
        let root = || {
            use_effect(|| runs.set(runs.get() + 1), None);
            Node::from(div())
        };
        for _ in 0..4 {
            render_root(&root);
        }
        assert_eq!(runs.get(), 4);
    }

    #[test]
    fn test_effect_with_empty_deps_runs_once() {
        setup();
        let runs = Cell::new(0);
        let root = || {
            use_effect(|| runs.set(runs.get() + 1), Some(deps![]));
            Node::from(div())
        };
        for _ in 0..3 {
            render_root(&root);
        }
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_effects_run_in_call_order() {
        setup();
        let log = RefCell::new(Vec::new());
        let root = || {
            use_effect(|| log.borrow_mut().push("first"), None);
            use_effect(|| log.borrow_mut().push("second"), None);
            Node::from(div())
        };
        render_root(&root);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_switching_from_no_deps_runs() {
        setup();
        let runs = Cell::new(0);
        let with_deps = Cell::new(false);
        let root = || {
            let deps = with_deps.get().then(|| deps![1]);
            use_effect(|| runs.set(runs.get() + 1), deps);
            Node::from(div())
        };
        render_root(&root);
        with_deps.set(true);
        render_root(&root);
        assert_eq!(runs.get(), 2);
        render_root(&root);
        assert_eq!(runs.get(), 2);
    }
}
