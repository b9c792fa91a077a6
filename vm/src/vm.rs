use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, error, info, trace};

use dsl::core::{BOOLEANS, INPUTS, OUTPUTS};
use dsl::program::{CompiledProgram, CompiledStatement};
use dsl::token::{Address, Token};

use crate::config::PlcConfig;
use crate::counter::{Counter, CounterKind};
use crate::error::{FaultContext, Trap, VmError};
use crate::stack::OperandStack;
use crate::state::{Mode, ScanCycleState};
use crate::timer::{Timer, TimerKind};

/// A cloneable handle for requesting the host loop to stop.
/// Used by signal handlers to stop scanning from another context.
#[derive(Clone)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    /// Requests the host to stop after the current scan cycle.
    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

/// What a call to [`Vm::scan_once`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanStatus {
    /// The controller is not in run mode; nothing changed.
    Idle,
    /// A full scan cycle executed.
    Executed,
}

/// The scan-cycle interpreter. Owns the controller state, the configuration
/// and the program being executed.
pub struct Vm {
    state: ScanCycleState,
    config: PlcConfig,
    program: CompiledProgram,
    stack: OperandStack,
    scan_count: u64,
    stop_flag: Arc<AtomicBool>,
}

impl Default for Vm {
    fn default() -> Self {
        Self::new(PlcConfig::default())
    }
}

impl Vm {
    /// Creates a controller in stop mode with an empty program.
    pub fn new(config: PlcConfig) -> Self {
        Vm {
            state: ScanCycleState::new(&config),
            config,
            program: CompiledProgram::default(),
            stack: OperandStack::new(0),
            scan_count: 0,
            stop_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replaces the whole program. Takes effect at the next scan cycle.
    pub fn load_program(&mut self, program: CompiledProgram) {
        debug!(
            "Loading program with {} statements (stack depth {})",
            program.len(),
            program.max_stack_depth()
        );
        self.stack = OperandStack::new(program.max_stack_depth());
        self.program = program;
        self.state
            .counters_mut()
            .for_each(Counter::discard_pending);
    }

    pub fn program(&self) -> &CompiledProgram {
        &self.program
    }

    /// Replaces the presets. The runtime fields of every timer and counter
    /// are zeroed.
    pub fn set_config(&mut self, config: PlcConfig) {
        self.state.apply_config(&config);
        self.config = config;
    }

    pub fn config(&self) -> &PlcConfig {
        &self.config
    }

    /// Clears the memories and zeroes the runtime fields of every timer and
    /// counter. Presets are kept. Calling this again has no further
    /// effect.
    pub fn initialize_system(&mut self) {
        self.state.reset();
        self.scan_count = 0;
        info!("System initialized");
    }

    /// Changes the operating mode. Requesting the current mode does nothing.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), VmError> {
        let from = self.state.mode;
        if !from.can_transition_to(mode) {
            return Err(VmError::InvalidModeTransition { from, to: mode });
        }
        if from != mode {
            info!("Mode changed from {} to {}", from, mode);
            self.state.mode = mode;
        }
        Ok(())
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    /// Sets one raw input. The value is read at the start of the next scan
    /// cycle.
    pub fn set_input(&mut self, address: Address, value: bool) -> Result<(), VmError> {
        let token = Token::Input(address);
        let input = lookup_mut(&mut self.state.inputs_raw, &token)
            .map_err(|_| VmError::InvalidAddress(token))?;
        *input = value;
        Ok(())
    }

    /// Sets every raw input at once.
    pub fn set_inputs(&mut self, inputs: [bool; INPUTS]) {
        self.state.inputs_raw = inputs;
    }

    pub fn inputs(&self) -> &[bool; INPUTS] {
        &self.state.inputs_raw
    }

    /// The outputs committed by the last scan cycle.
    pub fn outputs(&self) -> &[bool; OUTPUTS] {
        &self.state.outputs
    }

    pub fn booleans(&self) -> &[bool; BOOLEANS] {
        &self.state.booleans
    }

    pub fn timer(&self, kind: TimerKind, address: Address) -> Option<&Timer> {
        let timers = match kind {
            TimerKind::OnDelay => &self.state.on_delay_timers,
            TimerKind::OffDelay => &self.state.off_delay_timers,
        };
        usize::from(address)
            .checked_sub(1)
            .and_then(|index| timers.get(index))
    }

    pub fn counter(&self, kind: CounterKind, address: Address) -> Option<&Counter> {
        let counters = match kind {
            CounterKind::Up => &self.state.up_counters,
            CounterKind::Down => &self.state.down_counters,
        };
        usize::from(address)
            .checked_sub(1)
            .and_then(|index| counters.get(index))
    }

    /// Whether the counter has reached its preset, for display.
    pub fn counter_reached_preset(&self, kind: CounterKind, address: Address) -> Option<bool> {
        self.counter(kind, address).map(Counter::reached_preset)
    }

    pub fn state(&self) -> &ScanCycleState {
        &self.state
    }

    /// Returns the number of completed scan cycles since the system was
    /// initialized.
    pub fn scan_count(&self) -> u64 {
        self.scan_count
    }

    /// Returns a cloneable handle that can request the host to stop.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            flag: self.stop_flag.clone(),
        }
    }

    /// Returns true if a stop has been requested.
    pub fn stop_requested(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }

    /// Executes one scan cycle: read inputs, age timers, evaluate the
    /// program, detect counter edges and commit outputs.
    ///
    /// Returns `Ok(ScanStatus::Idle)` without changing anything when not in
    /// run mode. If a statement traps, the statement writes nothing, the
    /// writes of earlier statements are kept and the remaining statements
    /// and phases are skipped. Counter coils recorded before the trap are
    /// dropped so that they are never counted.
    pub fn scan_once(&mut self) -> Result<ScanStatus, VmError> {
        if self.state.mode != Mode::Run {
            return Ok(ScanStatus::Idle);
        }

        self.state.input_image = self.state.inputs_raw;

        self.state.timers_mut().for_each(Timer::tick);

        for (index, statement) in self.program.iter().enumerate() {
            let result = evaluate(statement, &self.state, &mut self.stack)
                .and_then(|value| assign(&statement.destination, value, &mut self.state));
            if let Err(trap) = result {
                error!("Trap in statement {} ({}): {}", index, statement, trap);
                self.state
                    .counters_mut()
                    .for_each(Counter::discard_pending);
                return Err(VmError::Fault(FaultContext {
                    trap,
                    statement: index,
                    line: statement.line,
                }));
            }
        }

        self.state.counters_mut().for_each(Counter::detect_edge);

        self.state.outputs = self.state.output_image;

        self.scan_count += 1;
        trace!("Scan {} outputs {:?}", self.scan_count, self.state.outputs);
        Ok(ScanStatus::Executed)
    }
}

fn lookup<'a, T>(items: &'a [T], token: &Token) -> Result<&'a T, Trap> {
    token
        .index()
        .and_then(|index| items.get(index))
        .ok_or(Trap::AddressOutOfRange(*token))
}

fn lookup_mut<'a, T>(items: &'a mut [T], token: &Token) -> Result<&'a mut T, Trap> {
    token
        .index()
        .and_then(|index| items.get_mut(index))
        .ok_or(Trap::AddressOutOfRange(*token))
}

/// Reads the value of an operand from the state.
fn read(token: &Token, state: &ScanCycleState) -> Result<bool, Trap> {
    match token {
        Token::Input(_) => lookup(&state.input_image, token).copied(),
        Token::Output(_) => lookup(&state.output_image, token).copied(),
        Token::Bool(_) => lookup(&state.booleans, token).copied(),
        Token::TimerOnContact(_) => lookup(&state.on_delay_timers, token).map(Timer::triggered),
        Token::TimerOffContact(_) => lookup(&state.off_delay_timers, token).map(Timer::triggered),
        Token::CounterUpContact(_) => lookup(&state.up_counters, token).map(Counter::contact),
        Token::CounterDownContact(_) => lookup(&state.down_counters, token).map(Counter::contact),
        _ => Err(Trap::InvalidToken(*token)),
    }
}

/// Evaluates the postfix program of a statement.
///
/// This is a free function so that the borrow checker can see independent
/// borrows of the program (immutable) and the state and stack (mutable).
fn evaluate(
    statement: &CompiledStatement,
    state: &ScanCycleState,
    stack: &mut OperandStack,
) -> Result<bool, Trap> {
    stack.clear();

    for token in &statement.postfix {
        match token {
            Token::Not => {
                let value = stack.pop()?;
                stack.push(!value)?;
            }
            Token::And => {
                let right = stack.pop()?;
                let left = stack.pop()?;
                stack.push(left && right)?;
            }
            Token::Or => {
                let right = stack.pop()?;
                let left = stack.pop()?;
                stack.push(left || right)?;
            }
            operand => {
                let value = read(operand, state)?;
                stack.push(value)?;
            }
        }
    }

    match stack.len() {
        1 => stack.pop(),
        n => Err(Trap::UnbalancedResult(n)),
    }
}

/// Writes the result of a statement to its destination.
fn assign(destination: &Token, value: bool, state: &mut ScanCycleState) -> Result<(), Trap> {
    trace!("{} := {}", destination, value);
    match destination {
        Token::Output(_) => *lookup_mut(&mut state.output_image, destination)? = value,
        Token::Bool(_) => *lookup_mut(&mut state.booleans, destination)? = value,
        Token::TimerOnCoil(_) => {
            lookup_mut(&mut state.on_delay_timers, destination)?.energize(value)
        }
        Token::TimerOffCoil(_) => {
            lookup_mut(&mut state.off_delay_timers, destination)?.energize(value)
        }
        Token::CounterUpCoil(_) => lookup_mut(&mut state.up_counters, destination)?.record(value),
        Token::CounterDownCoil(_) => {
            lookup_mut(&mut state.down_counters, destination)?.record(value)
        }
        _ => return Err(Trap::InvalidDestination(*destination)),
    }
    Ok(())
}
