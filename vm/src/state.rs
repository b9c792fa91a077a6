//! The memories of the controller.
use std::fmt;

use serde::Serialize;

use dsl::core::{BOOLEANS, COUNTERS, INPUTS, OUTPUTS, TIMERS};
use dsl::token::Address;

use crate::config::PlcConfig;
use crate::counter::{Counter, CounterKind};
use crate::timer::{Timer, TimerKind};

/// The operating mode of the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Mode {
    /// Scan cycles do nothing.
    #[default]
    Stop,
    /// Scan cycles execute the program.
    Run,
    /// The program is being edited.
    Program,
}

impl Mode {
    /// True if the controller may move from this mode to `to`. Staying in
    /// the same mode is always allowed.
    pub fn can_transition_to(self, to: Mode) -> bool {
        matches!(
            (self, to),
            (Mode::Stop | Mode::Run, _) | (Mode::Program, Mode::Stop | Mode::Program)
        )
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Stop => f.write_str("STOP"),
            Mode::Run => f.write_str("RUN"),
            Mode::Program => f.write_str("PROGRAM"),
        }
    }
}

fn timers(kind: TimerKind, config: &PlcConfig) -> Vec<Timer> {
    (1..=TIMERS as Address)
        .map(|address| Timer::new(kind, address, config.timer_preset(address).unwrap_or(0)))
        .collect()
}

fn counters(kind: CounterKind, config: &PlcConfig) -> Vec<Counter> {
    (1..=COUNTERS as Address)
        .map(|address| {
            Counter::new(kind, address, config.counter_preset(address).unwrap_or(0))
        })
        .collect()
}

/// Everything the scan cycle reads and writes.
///
/// Inputs are written by the host into `inputs_raw` and copied to
/// `input_image` once per cycle. Statements write `output_image`, which is
/// copied to `outputs` at the end of the cycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScanCycleState {
    pub inputs_raw: [bool; INPUTS],
    pub input_image: [bool; INPUTS],
    pub output_image: [bool; OUTPUTS],
    pub outputs: [bool; OUTPUTS],
    pub booleans: [bool; BOOLEANS],
    pub on_delay_timers: Vec<Timer>,
    pub off_delay_timers: Vec<Timer>,
    pub up_counters: Vec<Counter>,
    pub down_counters: Vec<Counter>,
    pub mode: Mode,
}

impl ScanCycleState {
    pub fn new(config: &PlcConfig) -> Self {
        ScanCycleState {
            inputs_raw: [false; INPUTS],
            input_image: [false; INPUTS],
            output_image: [false; OUTPUTS],
            outputs: [false; OUTPUTS],
            booleans: [false; BOOLEANS],
            on_delay_timers: timers(TimerKind::OnDelay, config),
            off_delay_timers: timers(TimerKind::OffDelay, config),
            up_counters: counters(CounterKind::Up, config),
            down_counters: counters(CounterKind::Down, config),
            mode: Mode::default(),
        }
    }

    /// Clears the image memories and the boolean memories and zeroes the
    /// runtime fields of every timer and counter. Presets, raw inputs and
    /// the mode are kept.
    pub fn reset(&mut self) {
        self.input_image = [false; INPUTS];
        self.output_image = [false; OUTPUTS];
        self.outputs = [false; OUTPUTS];
        self.booleans = [false; BOOLEANS];
        self.timers_mut().for_each(Timer::clear);
        self.counters_mut().for_each(Counter::reset);
    }

    pub fn timers(&self) -> impl Iterator<Item = &Timer> {
        self.on_delay_timers.iter().chain(self.off_delay_timers.iter())
    }

    pub fn timers_mut(&mut self) -> impl Iterator<Item = &mut Timer> {
        self.on_delay_timers
            .iter_mut()
            .chain(self.off_delay_timers.iter_mut())
    }

    pub fn counters(&self) -> impl Iterator<Item = &Counter> {
        self.up_counters.iter().chain(self.down_counters.iter())
    }

    pub fn counters_mut(&mut self) -> impl Iterator<Item = &mut Counter> {
        self.up_counters
            .iter_mut()
            .chain(self.down_counters.iter_mut())
    }

    /// Applies new presets to every timer and counter and zeroes their
    /// runtime fields.
    pub fn apply_config(&mut self, config: &PlcConfig) {
        for timer in self.timers_mut() {
            timer.set_preset(config.timer_preset(timer.address).unwrap_or(0));
        }
        for counter in self.counters_mut() {
            counter.set_preset(config.counter_preset(counter.address).unwrap_or(0));
        }
    }
}
