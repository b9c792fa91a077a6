//! Label normalizer. The normalizer transforms one line of program text into
//! canonical symbols (the input to the sentence validator).
//!
//! Normalization is pure: the same line always gives the same symbols and
//! the same diagnostics. Text that does not decompose exactly into labels
//! and operators is never dropped silently; it is kept in the canonical text
//! and reported as a label error.
use std::ops::Range;

use dsl::diagnostic::{Diagnostic, Label};
use dsl::token::Address;
use logos::Logos;
use scanplc_problems::Problem;

use crate::preprocessor::{preprocess, Compacted};
use crate::symbol::{Lexeme, Symbol};
use crate::token::TokenType;

/// The result of normalizing one line.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Normalized {
    /// The canonical marker text, for example `o=(!i^(o|b))`.
    pub text: String,
    /// The recognized symbols in order.
    pub lexemes: Vec<Lexeme>,
    /// Label problems found in the line.
    pub diagnostics: Vec<Diagnostic>,
}

impl Normalized {
    /// True if some part of the line is not a recognized label or operator
    /// or refers to an address outside the controller's limits.
    pub fn label_error(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn symbols(&self) -> Vec<Symbol> {
        self.lexemes.iter().map(|lexeme| lexeme.symbol).collect()
    }

    /// True if the line has no symbols and no unrecognized text.
    pub fn is_empty(&self) -> bool {
        self.lexemes.is_empty() && self.diagnostics.is_empty()
    }
}

fn classify(token_type: TokenType) -> (Symbol, Option<u32>) {
    match token_type {
        TokenType::Assign => (Symbol::Assign, None),
        TokenType::Not => (Symbol::Not, None),
        TokenType::And => (Symbol::And, None),
        TokenType::Or => (Symbol::Or, None),
        TokenType::LeftParen => (Symbol::LeftParen, None),
        TokenType::RightParen => (Symbol::RightParen, None),
        TokenType::Input(n) => (Symbol::Input, Some(n)),
        TokenType::Output(n) => (Symbol::Output, Some(n)),
        TokenType::Bool(n) => (Symbol::Bool, Some(n)),
        TokenType::TimerOnCoil(n) => (Symbol::TimerOnCoil, Some(n)),
        TokenType::TimerOnContact(n) => (Symbol::TimerOnContact, Some(n)),
        TokenType::TimerOffCoil(n) => (Symbol::TimerOffCoil, Some(n)),
        TokenType::TimerOffContact(n) => (Symbol::TimerOffContact, Some(n)),
        TokenType::CounterUpCoil(n) => (Symbol::CounterUpCoil, Some(n)),
        TokenType::CounterUpContact(n) => (Symbol::CounterUpContact, Some(n)),
        TokenType::CounterDownCoil(n) => (Symbol::CounterDownCoil, Some(n)),
        TokenType::CounterDownContact(n) => (Symbol::CounterDownContact, Some(n)),
    }
}

fn unrecognized(compacted: &Compacted, range: Range<usize>, line_number: usize) -> Diagnostic {
    let text = &compacted.text[range.clone()];
    Diagnostic::problem(
        Problem::UnrecognizedLabel,
        line_number,
        Label::span(
            compacted.original_range(range.start, range.end),
            format!("The text '{}' is not a label or operator.", text),
        ),
    )
    .with_context("text", text)
}

/// Normalizes one line of program text.
///
/// `line_number` is 1-based and only used for diagnostics.
pub fn normalize(line: &str, line_number: usize) -> Normalized {
    let compacted = preprocess(line);
    let mut normalized = Normalized::default();

    // Consecutive unrecognized characters are reported as one problem.
    let mut pending: Option<Range<usize>> = None;

    let mut lexer = TokenType::lexer(&compacted.text);
    while let Some(token) = lexer.next() {
        let span = lexer.span();
        match token {
            Ok(token_type) => {
                if let Some(range) = pending.take() {
                    normalized
                        .diagnostics
                        .push(unrecognized(&compacted, range, line_number));
                }

                let (symbol, address) = classify(token_type);
                let address: Option<Address> =
                    address.map(|n| Address::try_from(n).unwrap_or(Address::MAX));
                let lexeme = Lexeme {
                    symbol,
                    address,
                    span: compacted.original_range(span.start, span.end).into(),
                };

                if let Some(token) = lexeme.token().filter(|token| !token.in_range()) {
                    normalized.diagnostics.push(
                        Diagnostic::problem(
                            Problem::AddressOutOfRange,
                            line_number,
                            Label::span(
                                lexeme.span.clone(),
                                format!(
                                    "Label '{}' must have an address from 1 to {}.",
                                    lexer.slice(),
                                    token.limit().unwrap_or_default()
                                ),
                            ),
                        )
                        .with_context("label", lexer.slice()),
                    );
                }

                normalized.text.push_str(symbol.marker());
                normalized.lexemes.push(lexeme);
            }
            Err(_) => {
                normalized.text.push_str(lexer.slice());
                pending = match pending {
                    Some(range) if range.end == span.start => Some(range.start..span.end),
                    Some(range) => {
                        normalized
                            .diagnostics
                            .push(unrecognized(&compacted, range, line_number));
                        Some(span)
                    }
                    None => Some(span),
                };
            }
        }
    }

    if let Some(range) = pending.take() {
        normalized
            .diagnostics
            .push(unrecognized(&compacted, range, line_number));
    }

    normalized
}
