use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to a state owned by the embedding application.  The machine never
/// constructs or destroys states; it only holds handles to them.
pub type StateRef = Rc<RefCell<dyn State>>;

/// Shared handle to a transition.  Ownership of the edge (which source it hangs off,
/// where it leads) belongs to the machine once attached.
pub type TransitionRef = Rc<RefCell<dyn Transition>>;

/// The unit of behaviour the machine can be "in".  Implemented by the embedding
/// application; all methods are invoked synchronously by the machine.
pub trait State {
    fn debug_name(&self) -> &str {
        "<state>"
    }

    /// Called once per tick while this state is current.
    fn on_update(&mut self, delta_time: f32) -> anyhow::Result<()> {
        let _ = delta_time;
        Ok(())
    }

    /// Called exactly once per change into this state, including the implicit entry
    /// of the first registered state.
    fn on_enter(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called exactly once per change out of this state.
    fn on_exit(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// A guarded edge between two states, evaluated only while its source is current.
pub trait Transition {
    fn debug_name(&self) -> &str {
        "<transition>"
    }

    /// Called once per tick for every outgoing transition of the current state,
    /// before the guard is polled for that tick.
    fn on_update(&mut self, delta_time: f32) -> anyhow::Result<()> {
        let _ = delta_time;
        Ok(())
    }

    /// The guard: returning true asks the machine to fire this transition now.
    fn should_fire(&mut self) -> anyhow::Result<bool>;

    /// Called when the transition becomes live: its source state just became
    /// current, or it was just attached to the source that already is.
    fn on_enter(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called when the transition's source state stops being current.
    fn on_exit(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Identity of registered states is handle identity, not value equality: the same
/// allocation may only be registered once, while structurally identical but distinct
/// instances are unrelated.  Compares the data address only; fat-pointer comparison
/// would also compare vtables, which are not unique per type.
pub(crate) fn same_state(a: &StateRef, b: &StateRef) -> bool {
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}

pub(crate) fn same_transition(a: &TransitionRef, b: &TransitionRef) -> bool {
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}
