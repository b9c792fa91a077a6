//! Compiles PLC logic statements into postfix programs.
//!
//! Each line of program text goes through three stages: the label normalizer
//! (see [`lexer`]), the sentence validator (see [`automaton`]) and the
//! expression compiler (see [`postfix`]).
extern crate scanplc_dsl as dsl;

pub mod automaton;
pub mod lexer;
pub mod postfix;
mod preprocessor;
pub mod symbol;
mod token;


use dsl::diagnostic::{Diagnostic, Label};
use dsl::program::{CompiledProgram, CompiledStatement, Statement};
use log::debug;
use scanplc_problems::Problem;

use crate::automaton::{validate, Rejection, State};
use crate::lexer::{normalize, Normalized};
use crate::postfix::compile_statement;

/// Builds the diagnostic for a sentence the automaton rejected.
fn rejection_diagnostic(
    rejection: Rejection,
    normalized: &Normalized,
    line_number: usize,
) -> Diagnostic {
    let span_at = |index: usize| {
        normalized
            .lexemes
            .get(index)
            .map(|lexeme| lexeme.span.clone())
            .unwrap_or_default()
    };
    let last = || {
        normalized
            .lexemes
            .last()
            .map(|lexeme| lexeme.span.clone())
            .unwrap_or_default()
    };

    match rejection {
        Rejection::NoTransition {
            index,
            state: State::Start,
        } => {
            let symbol = normalized.lexemes[index].symbol;
            Diagnostic::problem(
                Problem::InvalidDestination,
                line_number,
                Label::span(
                    span_at(index),
                    format!("'{}' cannot be assigned to.", symbol),
                ),
            )
            .with_context("symbol", symbol.marker())
        }
        Rejection::NoTransition { index, state } => {
            let symbol = normalized.lexemes[index].symbol;
            Diagnostic::problem(
                Problem::UnexpectedSymbol,
                line_number,
                Label::span(span_at(index), format!("Unexpected '{}'.", symbol)),
            )
            .with_context("symbol", symbol.marker())
            .with_context("state", &format!("{:?}", state))
        }
        Rejection::UnmatchedParen { index } => Diagnostic::problem(
            Problem::UnmatchedRightParen,
            line_number,
            Label::span(span_at(index), "No '(' to close."),
        ),
        Rejection::NotAccepting { state } => Diagnostic::problem(
            Problem::IncompleteStatement,
            line_number,
            Label::span(last(), "The statement ends here."),
        )
        .with_context("state", &format!("{:?}", state)),
        Rejection::Unbalanced { index } => Diagnostic::problem(
            Problem::UnclosedParen,
            line_number,
            Label::span(span_at(index), "This '(' is never closed."),
        ),
    }
}

/// Normalizes and validates one line, returning the statement in source
/// order.
///
/// Returns `Ok(None)` for a blank line. Label errors are reported before any
/// grammar check; if a line has a label error, the validator does not run.
pub fn parse_statement(
    line: &str,
    line_number: usize,
) -> Result<Option<Statement>, Vec<Diagnostic>> {
    let normalized = normalize(line, line_number);
    if normalized.is_empty() {
        return Ok(None);
    }
    if normalized.label_error() {
        debug!("Line {} has label errors: {}", line_number, normalized.text);
        return Err(normalized.diagnostics);
    }

    if let Err(rejection) = validate(&normalized.symbols()) {
        debug!(
            "Line {} rejected as {:?}: {}",
            line_number, rejection, normalized.text
        );
        return Err(vec![rejection_diagnostic(
            rejection,
            &normalized,
            line_number,
        )]);
    }

    let mut tokens = normalized.lexemes.iter().filter_map(|lexeme| lexeme.token());
    let Some(destination) = tokens.next() else {
        return Err(vec![rejection_diagnostic(
            Rejection::NotAccepting {
                state: State::Start,
            },
            &normalized,
            line_number,
        )]);
    };

    Ok(Some(Statement {
        destination,
        expression: tokens.collect(),
    }))
}

/// Compiles one line of program text.
///
/// `line_number` is 1-based. Returns `Ok(None)` for a blank line.
pub fn compile_line(
    line: &str,
    line_number: usize,
) -> Result<Option<CompiledStatement>, Vec<Diagnostic>> {
    Ok(parse_statement(line, line_number)?
        .map(|statement| compile_statement(&statement, line_number)))
}

/// Compiles program text given as lines.
///
/// Every line is checked before a result is produced. If any line has a
/// problem, returns the diagnostics of all lines and no program. Blank lines
/// are skipped but still count for line numbers.
pub fn compile<I>(lines: I) -> Result<CompiledProgram, Vec<Diagnostic>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut statements = vec![];
    let mut diagnostics = vec![];

    for (index, line) in lines.into_iter().enumerate() {
        match compile_line(line.as_ref(), index + 1) {
            Ok(Some(statement)) => statements.push(statement),
            Ok(None) => {}
            Err(mut errors) => diagnostics.append(&mut errors),
        }
    }

    if !diagnostics.is_empty() {
        debug!("Compile failed with {} diagnostics", diagnostics.len());
        return Err(diagnostics);
    }

    debug!("Compiled {} statements", statements.len());
    Ok(CompiledProgram::new(statements))
}

/// Compiles newline separated program text.
pub fn compile_source(source: &str) -> Result<CompiledProgram, Vec<Diagnostic>> {
    compile(source.lines())
}
