//! Statements and the compiled program executed by the scan cycle.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::token::Token;

/// An assignment `DEST = EXPR` as written by the user, after labels are
/// tokenized. The expression is in source (infix) order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statement {
    pub destination: Token,
    pub expression: Vec<Token>,
}

/// One compiled statement: where the result goes and the postfix program
/// that computes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledStatement {
    /// The line (1-indexed) of the program text the statement came from.
    pub line: usize,
    pub destination: Token,
    pub postfix: Vec<Token>,
}

impl CompiledStatement {
    /// Returns the deepest operand stack the postfix program reaches.
    pub fn max_stack_depth(&self) -> usize {
        let mut depth: usize = 0;
        let mut max = 0;
        for token in &self.postfix {
            match token {
                Token::And | Token::Or => depth = depth.saturating_sub(1),
                Token::Not => {}
                _ => depth += 1,
            }
            max = max.max(depth);
        }
        max
    }
}

impl fmt::Display for CompiledStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} :=", self.destination)?;
        for token in &self.postfix {
            write!(f, " {}", token)?;
        }
        Ok(())
    }
}

/// An ordered list of compiled statements. Statements execute top to bottom
/// within each scan cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledProgram {
    statements: Vec<CompiledStatement>,
}

impl CompiledProgram {
    pub fn new(statements: Vec<CompiledStatement>) -> Self {
        CompiledProgram { statements }
    }

    pub fn statements(&self) -> &[CompiledStatement] {
        &self.statements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompiledStatement> {
        self.statements.iter()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Returns the operand stack capacity needed to run every statement.
    pub fn max_stack_depth(&self) -> usize {
        self.statements
            .iter()
            .map(CompiledStatement::max_stack_depth)
            .max()
            .unwrap_or(0)
    }
}

impl<'a> IntoIterator for &'a CompiledProgram {
    type Item = &'a CompiledStatement;
    type IntoIter = std::slice::Iter<'a, CompiledStatement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement(postfix: Vec<Token>) -> CompiledStatement {
        CompiledStatement {
            line: 1,
            destination: Token::Output(1),
            postfix,
        }
    }

    #[test]
    fn max_stack_depth_when_nested_expression_then_counts_pending_operands() {
        // I1 O2 B3 | ^
        let s = statement(vec![
            Token::Input(1),
            Token::Output(2),
            Token::Bool(3),
            Token::Or,
            Token::And,
        ]);
        assert_eq!(s.max_stack_depth(), 3);
    }

    #[test]
    fn max_stack_depth_when_empty_program_then_zero() {
        assert_eq!(CompiledProgram::default().max_stack_depth(), 0);
    }

    #[test]
    fn display_when_statement_then_destination_and_postfix() {
        let s = statement(vec![Token::Input(1), Token::Not]);
        assert_eq!(s.to_string(), "O1 := I1 !");
    }

    #[test]
    fn serialize_when_program_then_tagged_tokens() {
        let program = CompiledProgram::new(vec![statement(vec![Token::Input(2)])]);
        let json = serde_json::to_string(&program).unwrap();
        assert!(json.contains("\"Input\":2"));
        let back: CompiledProgram = serde_json::from_str(&json).unwrap();
        assert_eq!(back, program);
    }
}
