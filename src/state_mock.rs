use std::cell::RefCell;
use std::rc::Rc;

use derive_new::new;

use crate::state::{State, Transition};

/// Shared record of every capability call, in the order the machine made them.
/// Suites assert against the whole journal at once.
pub type Journal = Rc<RefCell<Vec<String>>>;

pub fn new_journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

/// A state that does nothing but write down what happens to it.
#[derive(new)]
pub struct MockState {
    label: &'static str,
    journal: Journal,
}

impl MockState {
    fn record(&self, event: &str) {
        self.journal
            .borrow_mut()
            .push(format!("{}: {}", self.label, event));
    }
}

impl State for MockState {
    fn debug_name(&self) -> &str {
        self.label
    }

    fn on_update(&mut self, _delta_time: f32) -> anyhow::Result<()> {
        self.record("update");
        Ok(())
    }

    fn on_enter(&mut self) -> anyhow::Result<()> {
        self.record("enter");
        Ok(())
    }

    fn on_exit(&mut self) -> anyhow::Result<()> {
        self.record("exit");
        Ok(())
    }
}

/// A journaling transition whose guard answer is controlled from outside.
#[derive(new)]
pub struct MockTransition {
    label: &'static str,
    journal: Journal,
    armed: bool,
}

impl MockTransition {
    pub fn set_armed(&mut self, armed: bool) {
        self.armed = armed;
    }

    fn record(&self, event: &str) {
        self.journal
            .borrow_mut()
            .push(format!("{}: {}", self.label, event));
    }
}

impl Transition for MockTransition {
    fn debug_name(&self) -> &str {
        self.label
    }

    fn on_update(&mut self, _delta_time: f32) -> anyhow::Result<()> {
        self.record("update");
        Ok(())
    }

    fn should_fire(&mut self) -> anyhow::Result<bool> {
        self.record("check");
        Ok(self.armed)
    }

    fn on_enter(&mut self) -> anyhow::Result<()> {
        self.record("enter");
        Ok(())
    }

    fn on_exit(&mut self) -> anyhow::Result<()> {
        self.record("exit");
        Ok(())
    }
}
