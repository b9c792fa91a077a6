//! Up and down counters driven by rising edges of their coils.
use log::trace;
use serde::Serialize;

use dsl::token::Address;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CounterKind {
    Up,
    Down,
}

/// A counter. The count changes only on a rising edge of the coil and is
/// not clamped to the preset. Both kinds start at zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Counter {
    pub kind: CounterKind,
    pub address: Address,
    preset: i32,
    count: i32,
    /// Coil value assigned during the current cycle, if any.
    #[serde(skip)]
    coil: Option<bool>,
    /// Coil value recorded in the last cycle that assigned one.
    #[serde(skip)]
    previous: bool,
}

impl Counter {
    pub fn new(kind: CounterKind, address: Address, preset: i32) -> Self {
        Counter {
            kind,
            address,
            preset,
            count: 0,
            coil: None,
            previous: false,
        }
    }

    /// The label of the counter coil, for example `CUP2`.
    pub fn name(&self) -> String {
        match self.kind {
            CounterKind::Up => format!("CUP{}", self.address),
            CounterKind::Down => format!("CDN{}", self.address),
        }
    }

    pub fn preset(&self) -> i32 {
        self.preset
    }

    pub fn count(&self) -> i32 {
        self.count
    }

    /// The contact value of the counter.
    pub fn contact(&self) -> bool {
        self.count > 0
    }

    /// True when an up counter has counted to or past its preset, or a down
    /// counter has counted to or below it.
    pub fn reached_preset(&self) -> bool {
        match self.kind {
            CounterKind::Up => self.count >= self.preset,
            CounterKind::Down => self.count <= self.preset,
        }
    }

    pub fn set_preset(&mut self, preset: i32) {
        self.preset = preset;
        self.reset();
    }

    /// Clears the count and forgets the coil history.
    pub fn reset(&mut self) {
        self.count = 0;
        self.coil = None;
        self.previous = false;
    }

    /// Records the value assigned to the coil in the current cycle. The last
    /// assignment in a cycle wins.
    pub fn record(&mut self, coil: bool) {
        self.coil = Some(coil);
    }

    /// Drops the coil recorded in the current cycle without counting it.
    /// The edge history of earlier cycles is kept.
    pub fn discard_pending(&mut self) {
        self.coil = None;
    }

    /// Compares the coil recorded in this cycle with the previous one and
    /// counts on a rising edge. Counters whose coil was not assigned in this
    /// cycle are left alone.
    pub fn detect_edge(&mut self) {
        let Some(coil) = self.coil.take() else {
            return;
        };
        if coil && !self.previous {
            self.count = match self.kind {
                CounterKind::Up => self.count.wrapping_add(1),
                CounterKind::Down => self.count.wrapping_sub(1),
            };
            trace!("{} counted to {}", self.name(), self.count);
        }
        self.previous = coil;
    }
}
