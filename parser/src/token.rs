//! Provides definitions of the lexical tokens of a statement.
//!
//! The lexer runs on preprocessed text (no whitespace, upper case). Label
//! families that share a prefix (`TON` and `TONO`, `CUP` and `CUPO`) are told
//! apart by the lexer's longest-match rule, so a contact is never split into
//! a coil followed by stray text.
use logos::{Lexer, Logos};

/// Reads the numeric suffix of a label. Suffixes too large to represent
/// saturate so that they are reported as out of range rather than as
/// unrecognized text.
fn address_callback(lex: &mut Lexer<TokenType>) -> u32 {
    lex.slice()
        .trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .parse()
        .unwrap_or(u32::MAX)
}

#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenType {
    #[token("=")]
    Assign,
    #[token("!")]
    Not,
    #[token("^")]
    And,
    #[token("|")]
    Or,
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,

    // Inputs, outputs and boolean memories
    #[regex("I[0-9]+", address_callback)]
    Input(u32),
    #[regex("O[0-9]+", address_callback)]
    Output(u32),
    #[regex("B[0-9]+", address_callback)]
    Bool(u32),

    // Timers
    #[regex("TON[0-9]+", address_callback)]
    TimerOnCoil(u32),
    #[regex("TONO[0-9]+", address_callback)]
    TimerOnContact(u32),
    #[regex("TOF[0-9]+", address_callback)]
    TimerOffCoil(u32),
    #[regex("TOFO[0-9]+", address_callback)]
    TimerOffContact(u32),

    // Counters
    #[regex("CUP[0-9]+", address_callback)]
    CounterUpCoil(u32),
    #[regex("CUPO[0-9]+", address_callback)]
    CounterUpContact(u32),
    #[regex("CDN[0-9]+", address_callback)]
    CounterDownCoil(u32),
    #[regex("CDNO[0-9]+", address_callback)]
    CounterDownContact(u32),
}
