//! The alphabet of the sentence validator.
//!
//! Each label family collapses to one canonical marker (every input label
//! becomes `i`, every on-delay contact becomes `tono`, and so on). The
//! address is kept next to the marker so that the compiler can rebuild the
//! tagged token without looking at text again.
use std::fmt;

use dsl::core::SourceSpan;
use dsl::token::{Address, Token};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    Input,
    Output,
    Bool,
    TimerOnCoil,
    TimerOnContact,
    TimerOffCoil,
    TimerOffContact,
    CounterUpCoil,
    CounterUpContact,
    CounterDownCoil,
    CounterDownContact,
    Assign,
    Not,
    And,
    Or,
    LeftParen,
    RightParen,
}

impl Symbol {
    /// The canonical marker for the symbol.
    pub fn marker(&self) -> &'static str {
        match self {
            Symbol::Input => "i",
            Symbol::Output => "o",
            Symbol::Bool => "b",
            Symbol::TimerOnCoil => "ton",
            Symbol::TimerOnContact => "tono",
            Symbol::TimerOffCoil => "tof",
            Symbol::TimerOffContact => "tofo",
            Symbol::CounterUpCoil => "cup",
            Symbol::CounterUpContact => "cupo",
            Symbol::CounterDownCoil => "cdn",
            Symbol::CounterDownContact => "cdno",
            Symbol::Assign => "=",
            Symbol::Not => "!",
            Symbol::And => "^",
            Symbol::Or => "|",
            Symbol::LeftParen => "(",
            Symbol::RightParen => ")",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// One recognized symbol of a line together with its address (for labels)
/// and its position in the original line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lexeme {
    pub symbol: Symbol,
    pub address: Option<Address>,
    pub span: SourceSpan,
}

impl Lexeme {
    /// Rebuilds the tagged token. Returns `None` for the assignment sign,
    /// which is structure rather than part of either side of a statement.
    pub fn token(&self) -> Option<Token> {
        let address = || self.address.unwrap_or_default();
        let token = match self.symbol {
            Symbol::Input => Token::Input(address()),
            Symbol::Output => Token::Output(address()),
            Symbol::Bool => Token::Bool(address()),
            Symbol::TimerOnCoil => Token::TimerOnCoil(address()),
            Symbol::TimerOnContact => Token::TimerOnContact(address()),
            Symbol::TimerOffCoil => Token::TimerOffCoil(address()),
            Symbol::TimerOffContact => Token::TimerOffContact(address()),
            Symbol::CounterUpCoil => Token::CounterUpCoil(address()),
            Symbol::CounterUpContact => Token::CounterUpContact(address()),
            Symbol::CounterDownCoil => Token::CounterDownCoil(address()),
            Symbol::CounterDownContact => Token::CounterDownContact(address()),
            Symbol::Not => Token::Not,
            Symbol::And => Token::And,
            Symbol::Or => Token::Or,
            Symbol::LeftParen => Token::LParen,
            Symbol::RightParen => Token::RParen,
            Symbol::Assign => return None,
        };
        Some(token)
    }
}
