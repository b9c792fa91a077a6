use std::fmt;

use dsl::diagnostic::ErrorKind;
use dsl::token::Token;

use crate::state::Mode;

/// Runtime traps that abort the evaluation of a statement.
///
/// A trap means the compiled program does not match what the interpreter
/// can execute. Compiled programs from the parser never trap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Trap {
    StackOverflow,
    StackUnderflow,
    /// The token's address is outside its family's limits.
    AddressOutOfRange(Token),
    /// The token cannot appear in a postfix program.
    InvalidToken(Token),
    /// The token cannot receive the result of a statement.
    InvalidDestination(Token),
    /// The postfix program left this many values instead of one.
    UnbalancedResult(usize),
}

impl fmt::Display for Trap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trap::StackOverflow => write!(f, "stack overflow"),
            Trap::StackUnderflow => write!(f, "stack underflow"),
            Trap::AddressOutOfRange(token) => write!(f, "address out of range: {token}"),
            Trap::InvalidToken(token) => write!(f, "invalid token in program: {token}"),
            Trap::InvalidDestination(token) => write!(f, "invalid destination: {token}"),
            Trap::UnbalancedResult(n) => write!(f, "program left {n} values on the stack"),
        }
    }
}

/// Context for a trap that occurred while evaluating the program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaultContext {
    pub trap: Trap,
    /// Index of the statement in the compiled program.
    pub statement: usize,
    /// Line of program text the statement came from.
    pub line: usize,
}

impl fmt::Display for FaultContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (statement {}, line {})",
            self.trap, self.statement, self.line
        )
    }
}

/// Errors produced by interpreter operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VmError {
    /// A runtime trap occurred during a scan cycle.
    Fault(FaultContext),
    /// The controller cannot move from one mode to the other.
    InvalidModeTransition { from: Mode, to: Mode },
    /// The host referred to an address outside the controller's limits.
    InvalidAddress(Token),
}

impl VmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VmError::Fault(_) | VmError::InvalidAddress(_) => ErrorKind::RuntimeTokenError,
            VmError::InvalidModeTransition { .. } => ErrorKind::InvalidModeTransition,
        }
    }
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VmError::Fault(ctx) => write!(f, "trap: {ctx}"),
            VmError::InvalidModeTransition { from, to } => {
                write!(f, "invalid mode transition: {from} to {to}")
            }
            VmError::InvalidAddress(token) => write!(f, "invalid address: {token}"),
        }
    }
}

impl std::error::Error for VmError {}

impl From<FaultContext> for VmError {
    fn from(ctx: FaultContext) -> Self {
        VmError::Fault(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_when_fault_then_runtime_token_error() {
        let err = VmError::Fault(FaultContext {
            trap: Trap::StackUnderflow,
            statement: 0,
            line: 1,
        });
        assert_eq!(err.kind(), ErrorKind::RuntimeTokenError);
        assert_eq!(err.to_string(), "trap: stack underflow (statement 0, line 1)");
    }

    #[test]
    fn kind_when_mode_transition_then_invalid_mode_transition() {
        let err = VmError::InvalidModeTransition {
            from: Mode::Program,
            to: Mode::Run,
        };
        assert_eq!(err.kind(), ErrorKind::InvalidModeTransition);
        assert_eq!(err.to_string(), "invalid mode transition: PROGRAM to RUN");
    }
}
