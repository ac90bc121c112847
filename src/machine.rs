use std::rc::Rc;

use log::{debug, trace};

use crate::error::MachineError;
use crate::state::{same_state, StateRef, TransitionRef};

/// An attached edge: the user transition plus the target the machine resolved for
/// it at attach time.  The target is assigned exactly once, by `add_transition`,
/// and is read-only everywhere else so embedding code cannot corrupt the adjacency
/// after attachment.
#[derive(Clone)]
pub struct TransitionEdge {
    transition: TransitionRef,
    target: StateRef,
}

impl TransitionEdge {
    pub fn transition(&self) -> &TransitionRef {
        &self.transition
    }

    /// Where this edge leads.
    pub fn target(&self) -> &StateRef {
        &self.target
    }
}

/// A directed graph of states and guarded transitions, advanced once per external
/// tick.  Single-threaded and synchronous: every operation, including all user
/// callbacks it triggers, completes within the caller's stack frame.
pub struct StateMachine {
    debug_name: &'static str,

    /// Registration order; uniqueness by handle identity.
    states: Vec<StateRef>,

    /// Outgoing edges per state, parallel to `states`.  Order within a list is
    /// attach order, which is also evaluation order during a tick.
    outgoing: Vec<Vec<TransitionEdge>>,

    current: Option<usize>,

    /// The most recent transition whose guard caused a state change.  Inspection
    /// only; never consulted for control decisions.
    last_fired: Option<TransitionRef>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::named("StateMachine")
    }

    pub fn named(debug_name: &'static str) -> Self {
        Self {
            debug_name,
            states: Vec::new(),
            outgoing: Vec::new(),
            current: None,
            last_fired: None,
        }
    }

    /// Registers a state.  The first state ever registered becomes current
    /// immediately and its `on_enter` fires before this call returns.
    pub fn add_state(&mut self, state: StateRef) -> anyhow::Result<()> {
        if self.index_of(&state).is_some() {
            return Err(MachineError::StateAlreadyAdded.into());
        }
        self.states.push(Rc::clone(&state));
        self.outgoing.push(Vec::new());
        if self.current.is_none() {
            self.current = Some(self.states.len() - 1);
            debug!(
                "{}: entering initial [{}]",
                self.debug_name,
                state.borrow().debug_name()
            );
            state.borrow_mut().on_enter()?;
        }
        Ok(())
    }

    /// Attaches `transition` as an edge from `source` to `target`.  Both endpoints
    /// must already be registered and at most one edge may exist per ordered
    /// (source, target) pair.  An edge attached to the currently active source is
    /// live immediately: its `on_enter` fires within this call.
    pub fn add_transition(
        &mut self,
        source: &StateRef,
        transition: TransitionRef,
        target: &StateRef,
    ) -> anyhow::Result<()> {
        let source_index = self.index_of(source).ok_or(MachineError::StateNotAdded)?;
        self.index_of(target).ok_or(MachineError::StateNotAdded)?;
        let duplicate = self.outgoing[source_index]
            .iter()
            .any(|edge| same_state(&edge.target, target));
        if duplicate {
            return Err(MachineError::SourceAndTargetAlreadyConnected.into());
        }
        self.outgoing[source_index].push(TransitionEdge {
            transition: Rc::clone(&transition),
            target: Rc::clone(target),
        });
        if self.current == Some(source_index) {
            transition.borrow_mut().on_enter()?;
        }
        Ok(())
    }

    /// Moves the machine to `new_state`.  Changing to the current state is a
    /// strict no-op.  Otherwise the old state and its outgoing transitions are
    /// exited (in attach order) before the new state and its outgoing transitions
    /// are entered (in attach order).  Callback errors propagate immediately with
    /// no rollback of the steps already applied.
    pub fn change_state(&mut self, new_state: &StateRef) -> anyhow::Result<()> {
        let new_index = self.index_of(new_state).ok_or(MachineError::StateNotAdded)?;
        if self.current == Some(new_index) {
            return Ok(());
        }
        if let Some(old_index) = self.current {
            debug!(
                "{}: [{}] => [{}]",
                self.debug_name,
                self.states[old_index].borrow().debug_name(),
                new_state.borrow().debug_name()
            );
            let old_state = Rc::clone(&self.states[old_index]);
            old_state.borrow_mut().on_exit()?;
            for edge in &self.outgoing[old_index] {
                edge.transition.borrow_mut().on_exit()?;
            }
        }
        self.current = Some(new_index);
        self.states[new_index].borrow_mut().on_enter()?;
        for edge in &self.outgoing[new_index] {
            edge.transition.borrow_mut().on_enter()?;
        }
        Ok(())
    }

    /// Advances the machine one tick.  No-op when nothing is registered yet.
    ///
    /// The current state is updated first, then a snapshot of its outgoing edges
    /// is walked in attach order: each transition gets `on_update` and then its
    /// guard is polled.  The first satisfied guard fires a state change; the rest
    /// of the snapshot is still updated and polled but cannot fire again this
    /// tick.  Edges attached mid-walk by a callback are not part of the snapshot
    /// and wait for the next tick.
    pub fn on_update(&mut self, delta_time: f32) -> anyhow::Result<()> {
        let current_index = match self.current {
            Some(index) => index,
            None => return Ok(()),
        };
        trace!("{}: tick dt={}", self.debug_name, delta_time);

        let current_state = Rc::clone(&self.states[current_index]);
        current_state.borrow_mut().on_update(delta_time)?;

        let snapshot = self.outgoing[current_index].clone();
        let mut fired = false;
        for edge in snapshot {
            edge.transition.borrow_mut().on_update(delta_time)?;
            let satisfied = edge.transition.borrow_mut().should_fire()?;
            if satisfied && !fired {
                fired = true;
                self.last_fired = Some(Rc::clone(&edge.transition));
                self.change_state(&edge.target)?;
            }
        }
        Ok(())
    }

    pub fn debug_name(&self) -> &'static str {
        self.debug_name
    }

    /// All registered states, in registration order.
    pub fn states(&self) -> &[StateRef] {
        &self.states
    }

    pub fn current_state(&self) -> Option<StateRef> {
        self.current.map(|index| Rc::clone(&self.states[index]))
    }

    /// Outgoing edges of `state` in attach order; empty for unregistered states
    /// and for states with no edges.
    pub fn outgoing_transitions(&self, state: &StateRef) -> &[TransitionEdge] {
        match self.index_of(state) {
            Some(index) => &self.outgoing[index],
            None => &[],
        }
    }

    /// The most recent transition whose guard caused a state change, if any.
    pub fn last_fired(&self) -> Option<TransitionRef> {
        self.last_fired.clone()
    }

    fn index_of(&self, state: &StateRef) -> Option<usize> {
        self.states.iter().position(|known| same_state(known, state))
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
