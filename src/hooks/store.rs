//! Hook slot store - order-indexed storage that survives re-renders.
//!
//! One slot per primitive call site, addressed purely by call order:
//!
//! ```text
//! pass k:   use_state  use_effect  use_reducer  use_effect
//! slot:         0           1           2           3
//! cursor:   0 -> 1     1 -> 2      2 -> 3       3 -> 4
//! ```
//!
//! The cursor goes back to 0 at the start of every pass. Nothing checks that
//! pass k+1 makes the same calls in the same order as pass k; when it does
//! not, slots get bound to the wrong call. A slot whose stored type does not
//! match what the caller asks for is re-seeded with the caller's initial
//! value.

use std::any::Any;
use std::cell::RefCell;

use super::effect::Deps;
use crate::primitives::Node;

// =============================================================================
// Slots
// =============================================================================

/// What a slot was created by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotKind {
    State,
    Reducer,
    Effect,
}

enum Slot {
    State(Box<dyn Any>),
    Reducer(Box<dyn Any>),
    /// Last dependency list; `None` when the effect ran without one.
    Effect(Option<Deps>),
}

impl Slot {
    fn kind(&self) -> SlotKind {
        match self {
            Slot::State(_) => SlotKind::State,
            Slot::Reducer(_) => SlotKind::Reducer,
            Slot::Effect(_) => SlotKind::Effect,
        }
    }

    fn value(kind: SlotKind, value: Box<dyn Any>) -> Self {
        match kind {
            SlotKind::Reducer => Slot::Reducer(value),
            _ => Slot::State(value),
        }
    }

    fn as_value<T: 'static>(&self, kind: SlotKind) -> Option<&T> {
        match self {
            Slot::State(value) if kind == SlotKind::State => value.downcast_ref(),
            Slot::Reducer(value) if kind == SlotKind::Reducer => value.downcast_ref(),
            _ => None,
        }
    }
}

// =============================================================================
// HookStore
// =============================================================================

/// Bookkeeping for one active render pass.
#[derive(Debug, Clone, Copy)]
struct PassFrame {
    /// Cursor of the enclosing pass, restored when this one ends.
    saved_cursor: usize,
    /// A pass started after this one, so this pass reads stale values.
    overtaken: bool,
}

/// Ordered slot arena plus the render cursor.
#[derive(Default)]
pub struct HookStore {
    slots: Vec<Option<Slot>>,
    cursor: usize,
    frames: Vec<PassFrame>,
}

impl HookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the next primitive call will bind to.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of slots ever bound.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether a render pass is in progress.
    pub fn is_rendering(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Whether the innermost pass was overtaken by a pass started from
    /// inside it. Such a pass must leave every slot alone.
    pub fn is_overtaken(&self) -> bool {
        self.frames.last().is_some_and(|frame| frame.overtaken)
    }

    fn kind(&self, index: usize) -> Option<SlotKind> {
        self.slots.get(index)?.as_ref().map(Slot::kind)
    }

    /// Start a pass. Every pass already running is now overtaken.
    fn begin_pass(&mut self) {
        for frame in &mut self.frames {
            frame.overtaken = true;
        }
        self.frames.push(PassFrame {
            saved_cursor: self.cursor,
            overtaken: false,
        });
        self.cursor = 0;
    }

    fn end_pass(&mut self) {
        if let Some(frame) = self.frames.pop() {
            if !self.frames.is_empty() {
                self.cursor = frame.saved_cursor;
            }
        }
    }

    /// Bind the next slot index and advance the cursor.
    pub(crate) fn claim(&mut self) -> usize {
        let index = self.cursor;
        self.cursor += 1;
        index
    }

    fn put(&mut self, index: usize, slot: Slot) {
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        self.slots[index] = Some(slot);
    }

    /// Clone of the value stored at `index`, if it has the right kind and type.
    pub(crate) fn value<T: Clone + 'static>(&self, index: usize, kind: SlotKind) -> Option<T> {
        self.slots
            .get(index)?
            .as_ref()?
            .as_value::<T>(kind)
            .cloned()
    }

    /// Current value at `index`, seeding it with `initial` if the slot is
    /// empty or holds something else. An overtaken pass never seeds.
    pub(crate) fn seed<T: Clone + 'static>(&mut self, index: usize, kind: SlotKind, initial: T) -> T {
        if let Some(current) = self.value::<T>(index, kind) {
            return current;
        }
        if self.is_overtaken() {
            return initial;
        }
        if let Some(found) = self.kind(index) {
            tracing::trace!(index, ?found, expected = ?kind, "re-seeding mismatched hook slot");
        }
        self.put(index, Slot::value(kind, Box::new(initial.clone())));
        initial
    }

    pub(crate) fn write<T: 'static>(&mut self, index: usize, kind: SlotKind, value: T) {
        self.put(index, Slot::value(kind, Box::new(value)));
    }

    /// Stored dependency list: `None` if the slot is not an effect slot yet,
    /// `Some(None)` if the effect last ran without a list.
    pub(crate) fn effect_deps(&self, index: usize) -> Option<Option<&Deps>> {
        match self.slots.get(index)?.as_ref()? {
            Slot::Effect(deps) => Some(deps.as_ref()),
            _ => None,
        }
    }

    pub(crate) fn store_deps(&mut self, index: usize, deps: Option<Deps>) {
        self.put(index, Slot::Effect(deps));
    }
}

// =============================================================================
// Thread-local Store
// =============================================================================

thread_local! {
    static HOOKS: RefCell<HookStore> = RefCell::new(HookStore::new());
}

/// Run `f` against this thread's store.
///
/// Never call user code from inside `f`: user code may re-enter the store.
pub(crate) fn with_hooks<R>(f: impl FnOnce(&mut HookStore) -> R) -> R {
    HOOKS.with(|hooks| f(&mut hooks.borrow_mut()))
}

/// Drop every slot and reset the cursor.
pub fn reset_hooks() {
    with_hooks(|hooks| *hooks = HookStore::new());
}

/// Number of slots in this thread's store.
pub fn hook_count() -> usize {
    with_hooks(|hooks| hooks.len())
}

/// Ends the pass even if the render function panics.
struct PassGuard;

impl Drop for PassGuard {
    fn drop(&mut self) {
        HOOKS.with(|hooks| {
            if let Ok(mut hooks) = hooks.try_borrow_mut() {
                hooks.end_pass();
            }
        });
    }
}

/// Run one render pass: reset the cursor to 0 and invoke `root`.
///
/// A pass started while another is running (a setter called from an effect)
/// gets its own cursor; the outer cursor is restored when it finishes. The
/// outer pass is overtaken from then on: its remaining primitives return
/// what the store holds without seeding slots or running effects.
pub fn render_root<F>(root: &F) -> Node
where
    F: Fn() -> Node + ?Sized,
{
    with_hooks(HookStore::begin_pass);
    let _guard = PassGuard;
    root()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_advances_cursor() {
        let mut store = HookStore::new();
        store.begin_pass();
        assert_eq!(store.claim(), 0);
        assert_eq!(store.claim(), 1);
        assert_eq!(store.cursor(), 2);
        store.end_pass();
        store.begin_pass();
        assert_eq!(store.cursor(), 0);
    }

    #[test]
    fn test_seed_only_once() {
        let mut store = HookStore::new();
        assert_eq!(store.seed(0, SlotKind::State, 5), 5);
        store.write(0, SlotKind::State, 9);
        assert_eq!(store.seed(0, SlotKind::State, 5), 9);
    }

    #[test]
    fn test_mismatched_slot_is_reseeded() {
        let mut store = HookStore::new();
        store.write(0, SlotKind::State, "text".to_string());
        assert_eq!(store.seed(0, SlotKind::State, 1_u32), 1);
        assert_eq!(store.kind(0), Some(SlotKind::State));

        store.store_deps(1, None);
        assert_eq!(store.seed(1, SlotKind::Reducer, 7_i64), 7);
        assert_eq!(store.kind(1), Some(SlotKind::Reducer));
    }

    #[test]
    fn test_nested_pass_restores_cursor() {
        let mut store = HookStore::new();
        store.begin_pass();
        store.claim();
        store.claim();
        store.begin_pass();
        assert_eq!(store.cursor(), 0);
        store.claim();
        store.end_pass();
        assert_eq!(store.cursor(), 2);
        assert!(store.is_rendering());
        store.end_pass();
        assert!(!store.is_rendering());
    }

    #[test]
    fn test_overtaken_pass_never_seeds() {
        let mut store = HookStore::new();
        store.begin_pass();
        assert!(!store.is_overtaken());
        store.begin_pass();
        store.end_pass();
        assert!(store.is_overtaken());

        assert_eq!(store.seed(0, SlotKind::State, 3), 3);
        assert_eq!(store.kind(0), None);

        store.end_pass();
        store.begin_pass();
        assert!(!store.is_overtaken());
        assert_eq!(store.seed(0, SlotKind::State, 3), 3);
        assert_eq!(store.kind(0), Some(SlotKind::State));
    }

    #[test]
    fn test_effect_deps_states() {
        let mut store = HookStore::new();
        assert!(store.effect_deps(0).is_none());
        store.store_deps(0, None);
        assert_eq!(store.effect_deps(0).map(|d| d.is_none()), Some(true));
        store.store_deps(0, Some(Deps::empty()));
        assert!(matches!(store.effect_deps(0), Some(Some(_))));
    }
}
