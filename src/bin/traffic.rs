//! Drives a little traffic light through its cycle:
//!
//! 1. Red holds for a few seconds, then goes Green
//! 2. Green holds until its timer runs out, or until a pedestrian presses the
//!    button (simulated as a random per-tick event), which jumps straight to Red
//! 3. Yellow bridges Green back to Red
//!
//! Run with RUST_LOG=debug to watch the machine change states.

use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use log::info;
use rand::Rng;

use tick_fsm::graph_printer::MachineGraphPrinter;
use tick_fsm::machine::StateMachine;
use tick_fsm::state::{State, StateRef, Transition, TransitionRef};

#[derive(Parser, Debug)]
#[clap(name = "traffic")]
struct Opts {
    #[clap(short = 'n', long, default_value = "500")]
    ticks: u32,

    /// Chance per tick that a pedestrian presses the crossing button.
    #[clap(long, default_value = "0.01")]
    walk_chance: f64,
}

const TICK_INTERVAL: Duration = Duration::from_millis(20);

struct Light {
    label: &'static str,
}

impl State for Light {
    fn debug_name(&self) -> &str {
        self.label
    }

    fn on_enter(&mut self) -> anyhow::Result<()> {
        info!("{} light on", self.label);
        Ok(())
    }
}

/// Fires after its source has been lit for `hold_secs`.  The elapsed counter
/// resets whenever the edge goes live again.
struct TimerElapsed {
    label: &'static str,
    hold_secs: f32,
    elapsed: f32,
}

impl TimerElapsed {
    fn new_ref(label: &'static str, hold_secs: f32) -> TransitionRef {
        Rc::new(RefCell::new(Self {
            label,
            hold_secs,
            elapsed: 0.0,
        }))
    }
}

impl Transition for TimerElapsed {
    fn debug_name(&self) -> &str {
        self.label
    }

    fn on_update(&mut self, delta_time: f32) -> anyhow::Result<()> {
        self.elapsed += delta_time;
        Ok(())
    }

    fn should_fire(&mut self) -> anyhow::Result<bool> {
        Ok(self.elapsed >= self.hold_secs)
    }

    fn on_enter(&mut self) -> anyhow::Result<()> {
        self.elapsed = 0.0;
        Ok(())
    }
}

/// A pedestrian might press the button on any tick while the light is green.
struct WalkRequested {
    chance_per_tick: f64,
    requested: bool,
}

impl Transition for WalkRequested {
    fn debug_name(&self) -> &str {
        "WalkRequested"
    }

    fn on_update(&mut self, _delta_time: f32) -> anyhow::Result<()> {
        if !self.requested && rand::thread_rng().gen_bool(self.chance_per_tick) {
            info!("pedestrian pressed the button");
            self.requested = true;
        }
        Ok(())
    }

    fn should_fire(&mut self) -> anyhow::Result<bool> {
        Ok(self.requested)
    }

    fn on_exit(&mut self) -> anyhow::Result<()> {
        self.requested = false;
        Ok(())
    }
}

fn light(label: &'static str) -> StateRef {
    Rc::new(RefCell::new(Light { label }))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opts: Opts = Opts::parse();

    let red = light("Red");
    let green = light("Green");
    let yellow = light("Yellow");

    let mut machine = StateMachine::named("TrafficLight");
    machine.add_state(Rc::clone(&red))?;
    machine.add_state(Rc::clone(&green))?;
    machine.add_state(Rc::clone(&yellow))?;

    machine.add_transition(&red, TimerElapsed::new_ref("RedDone", 3.0), &green)?;
    let walk: TransitionRef = Rc::new(RefCell::new(WalkRequested {
        chance_per_tick: opts.walk_chance,
        requested: false,
    }));
    machine.add_transition(&green, walk, &red)?;
    machine.add_transition(&green, TimerElapsed::new_ref("GreenDone", 4.0), &yellow)?;
    machine.add_transition(&yellow, TimerElapsed::new_ref("YellowDone", 1.0), &red)?;

    MachineGraphPrinter::pretty_print(&machine);

    let mut dt = 0.0f32;
    for _ in 0..opts.ticks {
        let start = Instant::now();
        machine.on_update(dt)?;
        thread::sleep(TICK_INTERVAL);
        dt = start.elapsed().as_secs_f32();
    }

    MachineGraphPrinter::pretty_print(&machine);
    Ok(())
}
