pub mod error;
pub mod graph_printer;
pub mod machine;
pub mod state;
pub mod state_mock;

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::machine::StateMachine;
    use crate::state::{same_state, same_transition, StateRef, TransitionRef};
    use crate::state_mock::{new_journal, Journal, MockState, MockTransition};

    fn state(label: &'static str, journal: &Journal) -> StateRef {
        Rc::new(RefCell::new(MockState::new(label, Rc::clone(journal))))
    }

    fn transition(
        label: &'static str,
        journal: &Journal,
        armed: bool,
    ) -> Rc<RefCell<MockTransition>> {
        Rc::new(RefCell::new(MockTransition::new(label, Rc::clone(journal), armed)))
    }

    #[test]
    fn work_loop_round_trip() {
        let journal = new_journal();
        let mut machine = StateMachine::named("Worker");
        let idle = state("Idle", &journal);
        let working = state("Working", &journal);
        machine.add_state(Rc::clone(&idle)).unwrap();
        machine.add_state(Rc::clone(&working)).unwrap();

        let start = transition("start", &journal, false);
        let finish = transition("finish", &journal, false);
        machine
            .add_transition(&idle, start.clone(), &working)
            .unwrap();
        machine
            .add_transition(&working, finish.clone(), &idle)
            .unwrap();

        // Quiet tick, then the embedder arms the guards one leg at a time.
        machine.on_update(1.0).unwrap();
        start.borrow_mut().set_armed(true);
        machine.on_update(1.0).unwrap();
        start.borrow_mut().set_armed(false);
        finish.borrow_mut().set_armed(true);
        machine.on_update(1.0).unwrap();

        assert_eq!(
            *journal.borrow(),
            vec![
                "Idle: enter",
                "start: enter",
                "Idle: update",
                "start: update",
                "start: check",
                "Idle: update",
                "start: update",
                "start: check",
                "Idle: exit",
                "start: exit",
                "Working: enter",
                "finish: enter",
                "Working: update",
                "finish: update",
                "finish: check",
                "Working: exit",
                "finish: exit",
                "Idle: enter",
                "start: enter",
            ]
        );
        assert!(same_state(&machine.current_state().unwrap(), &idle));
        let last: TransitionRef = finish;
        assert!(same_transition(&machine.last_fired().unwrap(), &last));
    }

    #[test]
    fn manual_changes_and_guard_fires_coexist() {
        let journal = new_journal();
        let mut machine = StateMachine::named("Mixed");
        let a = state("A", &journal);
        let b = state("B", &journal);
        let c = state("C", &journal);
        machine.add_state(Rc::clone(&a)).unwrap();
        machine.add_state(Rc::clone(&b)).unwrap();
        machine.add_state(Rc::clone(&c)).unwrap();
        let hop = transition("b->c", &journal, true);
        machine.add_transition(&b, hop.clone(), &c).unwrap();

        // A driver-forced change is not a "fired" transition.
        machine.change_state(&b).unwrap();
        assert!(machine.last_fired().is_none());

        machine.on_update(1.0).unwrap();

        assert!(same_state(&machine.current_state().unwrap(), &c));
        let last: TransitionRef = hop;
        assert!(same_transition(&machine.last_fired().unwrap(), &last));
    }
}
