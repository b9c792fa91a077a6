//! Provides definition for diagnostics, which are the errors reported while
//! compiling program text, and the error kinds shared with the interpreter.
use std::fmt;

use scanplc_problems::Problem;
use thiserror::Error;

use crate::core::SourceSpan;

/// The outward-facing category of every error the core can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum ErrorKind {
    /// An unrecognized or malformed label in program text.
    #[error("label error")]
    LabelError,
    /// A statement whose labels are valid but whose grammar is not.
    #[error("syntax error")]
    SyntaxError,
    /// A compiled program referenced an address or token the interpreter
    /// cannot execute. This is a defect rather than a user input problem.
    #[error("runtime token error")]
    RuntimeTokenError,
    /// The controller cannot move between the requested modes.
    #[error("invalid mode transition")]
    InvalidModeTransition,
}

impl From<Problem> for ErrorKind {
    fn from(problem: Problem) -> Self {
        match problem {
            Problem::UnrecognizedLabel | Problem::AddressOutOfRange => ErrorKind::LabelError,
            Problem::InvalidDestination
            | Problem::UnexpectedSymbol
            | Problem::UnmatchedRightParen
            | Problem::UnclosedParen
            | Problem::IncompleteStatement => ErrorKind::SyntaxError,
        }
    }
}

/// A label that refers to some range in a line and a message related to
/// that range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    /// The position of the label within the line.
    pub span: SourceSpan,

    /// A message describing this label.
    pub message: String,
}

impl Label {
    pub fn span(span: impl Into<SourceSpan>, message: impl Into<String>) -> Self {
        Self {
            span: span.into(),
            message: message.into(),
        }
    }
}

/// A diagnostic for one line of program text. Diagnostics have a code that
/// is indicative of the category and a primary location in the line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// A normally unique value describing the type of diagnostic.
    pub code: String,

    description: String,

    /// Whether this is a label or a syntax problem.
    pub kind: ErrorKind,

    /// The line (1-indexed) of the program text with the problem.
    pub line: usize,

    /// The position within the line.
    pub primary: Label,

    /// Additional descriptions to the constant description.
    pub described: Vec<String>,
}

impl Diagnostic {
    /// Creates a diagnostic from the problem code for a line of program text.
    pub fn problem(problem: Problem, line: usize, primary: Label) -> Self {
        Self {
            code: problem.code().to_string(),
            description: problem.message().to_string(),
            kind: problem.into(),
            line,
            primary,
            described: vec![],
        }
    }

    /// Adds to the problem description additional context about the problem.
    pub fn with_context(mut self, description: &str, item: &str) -> Self {
        self.described.push(format!("{}={}", description, item));
        self
    }

    /// Returns the description for the diagnostic, including any added
    /// context.
    pub fn description(&self) -> String {
        if self.described.is_empty() {
            self.description.clone()
        } else {
            format!("{} ({})", self.description, self.described.join(", "))
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: {} {}: {}",
            self.line,
            self.kind,
            self.code,
            self.description()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_when_address_out_of_range_then_label_error() {
        let diagnostic = Diagnostic::problem(
            Problem::AddressOutOfRange,
            3,
            Label::span(0..2, "I9"),
        );
        assert_eq!(diagnostic.kind, ErrorKind::LabelError);
        assert_eq!(diagnostic.line, 3);
        assert_eq!(diagnostic.code, "P0002");
    }

    #[test]
    fn problem_when_unclosed_paren_then_syntax_error() {
        let diagnostic =
            Diagnostic::problem(Problem::UnclosedParen, 1, Label::span(3..4, "opened here"));
        assert_eq!(diagnostic.kind, ErrorKind::SyntaxError);
    }

    #[test]
    fn description_when_context_then_appended() {
        let diagnostic =
            Diagnostic::problem(Problem::UnrecognizedLabel, 2, Label::span(0..1, "X"))
                .with_context("text", "X");
        assert!(diagnostic.description().ends_with("(text=X)"));
        assert!(diagnostic.to_string().starts_with("line 2: label error P0001"));
    }
}
