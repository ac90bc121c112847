use crate::machine::StateMachine;
use crate::state::same_state;

/// Read-only renderer for a machine's graph.  Consumes nothing but the public
/// accessors and never mutates the machine, so it can be pointed at a live one
/// between ticks.
pub struct MachineGraphPrinter;

impl MachineGraphPrinter {
    /// # Example output:
    ///
    /// ```text
    /// TrafficLight {
    /// * Red => Green
    ///   Green => [Yellow, Red]
    ///   Yellow => Red
    ///   last fired: YellowDone
    /// }
    /// ```
    ///
    /// `*` marks the current state.
    pub fn pretty_print(machine: &StateMachine) {
        print!("{}", Self::format(machine));
    }

    pub fn format(machine: &StateMachine) -> String {
        let mut out = String::new();
        out.push_str(&format!("{} {{\n", machine.debug_name()));

        let current = machine.current_state();
        for state in machine.states() {
            let marker = match &current {
                Some(active) if same_state(active, state) => "*",
                _ => " ",
            };
            out.push_str(&format!("{} {}", marker, state.borrow().debug_name()));

            let targets: Vec<String> = machine
                .outgoing_transitions(state)
                .iter()
                .map(|edge| edge.target().borrow().debug_name().to_string())
                .collect();
            match targets.len() {
                0 => {}
                1 => out.push_str(&format!(" => {}", targets[0])),
                _ => out.push_str(&format!(" => [{}]", targets.join(", "))),
            }
            out.push('\n');
        }

        if let Some(last) = machine.last_fired() {
            out.push_str(&format!("  last fired: {}\n", last.borrow().debug_name()));
        }
        out.push_str("}\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::machine::StateMachine;
    use crate::state::StateRef;
    use crate::state_mock::{new_journal, MockState, MockTransition};

    use super::MachineGraphPrinter;

    fn state(label: &'static str) -> StateRef {
        Rc::new(RefCell::new(MockState::new(label, new_journal())))
    }

    fn transition(label: &'static str, armed: bool) -> Rc<RefCell<MockTransition>> {
        Rc::new(RefCell::new(MockTransition::new(label, new_journal(), armed)))
    }

    #[test]
    fn renders_an_empty_machine() {
        let machine = StateMachine::new();
        assert_eq!(MachineGraphPrinter::format(&machine), "StateMachine {\n}\n");
    }

    #[test]
    fn renders_states_edges_and_the_current_marker() {
        let mut machine = StateMachine::named("TrafficLight");
        let red = state("Red");
        let green = state("Green");
        let yellow = state("Yellow");
        machine.add_state(Rc::clone(&red)).unwrap();
        machine.add_state(Rc::clone(&green)).unwrap();
        machine.add_state(Rc::clone(&yellow)).unwrap();
        machine
            .add_transition(&red, transition("RedDone", false), &green)
            .unwrap();
        machine
            .add_transition(&green, transition("GreenDone", false), &yellow)
            .unwrap();
        machine
            .add_transition(&green, transition("WalkRequested", false), &red)
            .unwrap();
        machine
            .add_transition(&yellow, transition("YellowDone", false), &red)
            .unwrap();

        assert_eq!(
            MachineGraphPrinter::format(&machine),
            "TrafficLight {\n\
             * Red => Green\n\
             \x20 Green => [Yellow, Red]\n\
             \x20 Yellow => Red\n\
             }\n"
        );
    }

    #[test]
    fn renders_the_last_fired_footer() {
        let mut machine = StateMachine::named("Loop");
        let a = state("A");
        let b = state("B");
        machine.add_state(Rc::clone(&a)).unwrap();
        machine.add_state(Rc::clone(&b)).unwrap();
        machine
            .add_transition(&a, transition("hop", true), &b)
            .unwrap();

        machine.on_update(0.5).unwrap();

        assert_eq!(
            MachineGraphPrinter::format(&machine),
            "Loop {\n\
             \x20 A => B\n\
             * B\n\
             \x20 last fired: hop\n\
             }\n"
        );
    }
}
