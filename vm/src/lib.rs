//! Scan-cycle interpreter for compiled PLC logic programs.
//!
//! The interpreter owns the controller memories (input and output images,
//! boolean memories, timers and counters) and executes a
//! [`CompiledProgram`](dsl::program::CompiledProgram) once per scan cycle.
extern crate scanplc_dsl as dsl;

pub mod config;
pub mod counter;
pub mod error;
pub(crate) mod stack;
pub mod state;
pub mod timer;
mod vm;

pub use config::{ConfigError, PlcConfig};
pub use counter::{Counter, CounterKind};
pub use error::{FaultContext, Trap, VmError};
pub use state::{Mode, ScanCycleState};
pub use timer::{Timer, TimerKind};
pub use vm::{ScanStatus, StopHandle, Vm};
