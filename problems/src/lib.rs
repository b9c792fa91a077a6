//! Problem codes for diagnostics produced while compiling PLC statements.
//!
//! The enumeration is generated by the build script from
//! `resources/problem-codes.csv` so that the codes stay stable and
//! documented in one place.
include!(concat!(env!("OUT_DIR"), "/problems.rs"));

#[cfg(test)]
mod tests {
    use super::Problem;

    #[test]
    fn code_when_unrecognized_label_then_first_code() {
        assert_eq!(Problem::UnrecognizedLabel.code(), "P0001");
    }

    #[test]
    fn message_when_unclosed_paren_then_describes_paren() {
        assert!(Problem::UnclosedParen.message().contains("parenthesis"));
    }
}
