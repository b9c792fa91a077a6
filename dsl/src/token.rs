//! Provides the tagged tokens of a PLC logic statement.
//!
//! Labels are classified once, when the statement is normalized. Every later
//! stage (validation, compilation and evaluation) works with these tokens and
//! never inspects label text again.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{BOOLEANS, COUNTERS, INPUTS, OUTPUTS, TIMERS};

/// A 1-based address of an input, output, memory, timer or counter.
pub type Address = u16;

/// A single token of a statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    /// Digital input contact (`I#`).
    Input(Address),
    /// Digital output (`O#`). Usable both as a destination and as a contact.
    Output(Address),
    /// Boolean memory (`B#`). Usable both as a destination and as a contact.
    Bool(Address),
    /// On-delay timer coil (`TON#`).
    TimerOnCoil(Address),
    /// On-delay timer contact (`TONO#`).
    TimerOnContact(Address),
    /// Off-delay timer coil (`TOF#`).
    TimerOffCoil(Address),
    /// Off-delay timer contact (`TOFO#`).
    TimerOffContact(Address),
    /// Up counter coil (`CUP#`).
    CounterUpCoil(Address),
    /// Up counter contact (`CUPO#`).
    CounterUpContact(Address),
    /// Down counter coil (`CDN#`).
    CounterDownCoil(Address),
    /// Down counter contact (`CDNO#`).
    CounterDownContact(Address),
    /// Conjunction (`^`).
    And,
    /// Disjunction (`|`).
    Or,
    /// Negation (`!`).
    Not,
    LParen,
    RParen,
}

/// How operators of equal precedence group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

impl Token {
    /// Returns the address for tokens that refer to a memory area.
    pub fn address(&self) -> Option<Address> {
        match self {
            Token::Input(n)
            | Token::Output(n)
            | Token::Bool(n)
            | Token::TimerOnCoil(n)
            | Token::TimerOnContact(n)
            | Token::TimerOffCoil(n)
            | Token::TimerOffContact(n)
            | Token::CounterUpCoil(n)
            | Token::CounterUpContact(n)
            | Token::CounterDownCoil(n)
            | Token::CounterDownContact(n) => Some(*n),
            Token::And | Token::Or | Token::Not | Token::LParen | Token::RParen => None,
        }
    }

    /// Returns the number of addresses available to this token's family.
    pub fn limit(&self) -> Option<usize> {
        match self {
            Token::Input(_) => Some(INPUTS),
            Token::Output(_) => Some(OUTPUTS),
            Token::Bool(_) => Some(BOOLEANS),
            Token::TimerOnCoil(_)
            | Token::TimerOnContact(_)
            | Token::TimerOffCoil(_)
            | Token::TimerOffContact(_) => Some(TIMERS),
            Token::CounterUpCoil(_)
            | Token::CounterUpContact(_)
            | Token::CounterDownCoil(_)
            | Token::CounterDownContact(_) => Some(COUNTERS),
            Token::And | Token::Or | Token::Not | Token::LParen | Token::RParen => None,
        }
    }

    /// True when the token's address lies within its family's limits.
    /// Tokens without an address are always in range.
    pub fn in_range(&self) -> bool {
        match (self.address(), self.limit()) {
            (Some(n), Some(limit)) => n >= 1 && (n as usize) <= limit,
            _ => true,
        }
    }

    /// Returns the zero-based index of the token's address.
    pub fn index(&self) -> Option<usize> {
        self.address()
            .and_then(|n| (n as usize).checked_sub(1))
    }

    /// True for tokens whose value can be read inside an expression.
    pub fn is_operand(&self) -> bool {
        matches!(
            self,
            Token::Input(_)
                | Token::Output(_)
                | Token::Bool(_)
                | Token::TimerOnContact(_)
                | Token::TimerOffContact(_)
                | Token::CounterUpContact(_)
                | Token::CounterDownContact(_)
        )
    }

    /// True for tokens that can receive the result of a statement.
    pub fn is_destination(&self) -> bool {
        matches!(
            self,
            Token::Output(_)
                | Token::Bool(_)
                | Token::TimerOnCoil(_)
                | Token::TimerOffCoil(_)
                | Token::CounterUpCoil(_)
                | Token::CounterDownCoil(_)
        )
    }

    /// Binding strength of an operator. Higher binds tighter.
    pub fn precedence(&self) -> Option<u8> {
        match self {
            Token::Not => Some(3),
            Token::And => Some(2),
            Token::Or => Some(1),
            _ => None,
        }
    }

    pub fn associativity(&self) -> Option<Associativity> {
        match self {
            Token::Not => Some(Associativity::Right),
            Token::And | Token::Or => Some(Associativity::Left),
            _ => None,
        }
    }

    /// The label text that introduces this token in program source.
    pub fn label(&self) -> &'static str {
        match self {
            Token::Input(_) => "I",
            Token::Output(_) => "O",
            Token::Bool(_) => "B",
            Token::TimerOnCoil(_) => "TON",
            Token::TimerOnContact(_) => "TONO",
            Token::TimerOffCoil(_) => "TOF",
            Token::TimerOffContact(_) => "TOFO",
            Token::CounterUpCoil(_) => "CUP",
            Token::CounterUpContact(_) => "CUPO",
            Token::CounterDownCoil(_) => "CDN",
            Token::CounterDownContact(_) => "CDNO",
            Token::And => "^",
            Token::Or => "|",
            Token::Not => "!",
            Token::LParen => "(",
            Token::RParen => ")",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.address() {
            Some(n) => write!(f, "{}{}", self.label(), n),
            None => f.write_str(self.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_when_timer_contact_then_label_and_address() {
        assert_eq!(Token::TimerOnContact(3).to_string(), "TONO3");
        assert_eq!(Token::CounterDownCoil(8).to_string(), "CDN8");
        assert_eq!(Token::Not.to_string(), "!");
    }

    #[test]
    fn in_range_when_address_zero_then_false() {
        assert!(!Token::Input(0).in_range());
    }

    #[test]
    fn in_range_when_boolean_at_limit_then_true() {
        assert!(Token::Bool(32).in_range());
        assert!(!Token::Bool(33).in_range());
    }

    #[test]
    fn in_range_when_output_nine_then_false() {
        assert!(!Token::Output(9).in_range());
    }

    #[test]
    fn index_when_first_address_then_zero() {
        assert_eq!(Token::Input(1).index(), Some(0));
        assert_eq!(Token::Input(0).index(), None);
        assert_eq!(Token::And.index(), None);
    }

    #[test]
    fn is_destination_when_contact_then_false() {
        assert!(Token::TimerOnCoil(1).is_destination());
        assert!(!Token::TimerOnContact(1).is_destination());
        assert!(!Token::Input(1).is_destination());
    }

    #[test]
    fn precedence_when_not_then_binds_tightest() {
        assert!(Token::Not.precedence() > Token::And.precedence());
        assert!(Token::And.precedence() > Token::Or.precedence());
        assert_eq!(Token::Not.associativity(), Some(Associativity::Right));
    }
}
