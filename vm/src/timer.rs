//! On-delay and off-delay timers counted in scan cycles.
use log::trace;
use serde::Serialize;

use dsl::token::Address;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TimerKind {
    OnDelay,
    OffDelay,
}

/// A timer. The preset and the remaining time are counted in ticks, one
/// tick per scan cycle.
///
/// `0 <= remaining <= preset` always holds. A new or cleared timer has
/// nothing remaining; a timer returned to idle by its coil is reloaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Timer {
    pub kind: TimerKind,
    pub address: Address,
    preset: u32,
    remaining: u32,
    active: bool,
    triggered: bool,
}

impl Timer {
    pub fn new(kind: TimerKind, address: Address, preset: u32) -> Self {
        Timer {
            kind,
            address,
            preset,
            remaining: 0,
            active: false,
            triggered: false,
        }
    }

    /// The label of the timer coil, for example `TON3`.
    pub fn name(&self) -> String {
        match self.kind {
            TimerKind::OnDelay => format!("TON{}", self.address),
            TimerKind::OffDelay => format!("TOF{}", self.address),
        }
    }

    pub fn preset(&self) -> u32 {
        self.preset
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The contact value of the timer.
    pub fn triggered(&self) -> bool {
        self.triggered
    }

    /// Changes the preset and clears the timer.
    pub fn set_preset(&mut self, preset: u32) {
        self.preset = preset;
        self.clear();
    }

    /// Zeroes the runtime fields, keeping the preset.
    pub fn clear(&mut self) {
        self.remaining = 0;
        self.active = false;
        self.triggered = false;
    }

    /// Returns the timer to idle and reloads the preset.
    pub fn reset(&mut self) {
        self.remaining = self.preset;
        self.active = false;
        self.triggered = false;
    }

    /// Advances a running timer by one tick. A timer that reaches zero stops
    /// and sets its contact: true for on-delay, false for off-delay.
    pub fn tick(&mut self) {
        if !self.active {
            return;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.active = false;
            self.triggered = self.kind == TimerKind::OnDelay;
            trace!("{} expired, contact {}", self.name(), self.triggered);
        }
    }

    /// Applies the value assigned to the timer coil in a scan cycle.
    ///
    /// An energized coil starts an idle timer. A de-energized coil returns an
    /// on-delay timer to idle; a running off-delay timer keeps counting.
    pub fn energize(&mut self, coil: bool) {
        if coil {
            if !self.active && !self.triggered {
                self.remaining = self.preset;
                self.active = true;
                if self.kind == TimerKind::OffDelay {
                    self.triggered = true;
                }
                trace!("{} started with {} ticks", self.name(), self.preset);
            }
        } else if self.kind == TimerKind::OnDelay {
            self.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(timer: &mut Timer, coils: &[bool]) -> Vec<bool> {
        coils
            .iter()
            .map(|coil| {
                timer.tick();
                timer.energize(*coil);
                timer.triggered()
            })
            .collect()
    }

    #[test]
    fn on_delay_when_held_then_triggers_after_preset_ticks() {
        let mut timer = Timer::new(TimerKind::OnDelay, 1, 3);
        let contacts = run(&mut timer, &[true; 6]);
        assert_eq!(contacts, vec![false, false, false, true, true, true]);
        assert!(!timer.is_active());
    }

    #[test]
    fn on_delay_when_dropped_before_expiry_then_idle() {
        let mut timer = Timer::new(TimerKind::OnDelay, 1, 3);
        run(&mut timer, &[true, true]);
        assert_eq!(timer.remaining(), 2);

        timer.energize(false);

        assert_eq!(timer.remaining(), 3);
        assert!(!timer.is_active());
        assert!(!timer.triggered());
    }

    #[test]
    fn on_delay_when_dropped_after_expiry_then_contact_clears() {
        let mut timer = Timer::new(TimerKind::OnDelay, 1, 1);
        let contacts = run(&mut timer, &[true, true, false]);
        assert_eq!(contacts, vec![false, true, false]);
    }

    #[test]
    fn off_delay_when_started_then_contact_set_until_expiry() {
        let mut timer = Timer::new(TimerKind::OffDelay, 2, 2);
        let contacts = run(&mut timer, &[true, false, false, false]);
        assert_eq!(contacts, vec![true, true, false, false]);
    }

    #[test]
    fn off_delay_when_coil_drops_then_countdown_continues() {
        let mut timer = Timer::new(TimerKind::OffDelay, 2, 3);
        run(&mut timer, &[true]);
        timer.energize(false);
        assert!(timer.is_active());
        assert_eq!(timer.remaining(), 3);
    }

    #[test]
    fn tick_when_preset_zero_then_expires_on_next_tick() {
        let mut timer = Timer::new(TimerKind::OnDelay, 1, 0);
        let contacts = run(&mut timer, &[true, true]);
        assert_eq!(contacts, vec![false, true]);
        assert_eq!(timer.remaining(), 0);
    }

    #[test]
    fn set_preset_when_running_then_cleared_with_new_preset() {
        let mut timer = Timer::new(TimerKind::OnDelay, 1, 3);
        run(&mut timer, &[true, true]);
        timer.set_preset(5);
        assert_eq!(timer.preset(), 5);
        assert_eq!(timer.remaining(), 0);
        assert!(!timer.is_active());
    }

    #[test]
    fn clear_when_expired_then_runtime_fields_zeroed() {
        let mut timer = Timer::new(TimerKind::OnDelay, 1, 1);
        run(&mut timer, &[true, true]);
        assert!(timer.triggered());

        timer.clear();

        assert_eq!(timer.remaining(), 0);
        assert!(!timer.is_active());
        assert!(!timer.triggered());
        assert_eq!(timer.preset(), 1);
    }

    #[test]
    fn energize_when_cleared_then_starts_with_preset() {
        let mut timer = Timer::new(TimerKind::OnDelay, 1, 4);
        timer.energize(true);
        assert_eq!(timer.remaining(), 4);
        assert!(timer.is_active());
    }

    #[test]
    fn name_when_off_delay_then_tof_label() {
        assert_eq!(Timer::new(TimerKind::OffDelay, 7, 0).name(), "TOF7");
    }
}
