//! Expression compiler. Converts the right hand side of a validated
//! statement from infix to postfix order with the shunting-yard algorithm.
//!
//! Tokens are atomic: a multi-character label such as `TONO3` is one token
//! and is never split. The input must already be accepted by the sentence
//! validator, so no errors are detected here.
use dsl::program::{CompiledStatement, Statement};
use dsl::token::{Associativity, Token};

/// True if the operator on top of the stack must be emitted before
/// `incoming` is pushed.
fn pops_before(top: &Token, incoming: &Token) -> bool {
    let (Some(top_precedence), Some(incoming_precedence)) =
        (top.precedence(), incoming.precedence())
    else {
        // Parentheses on the stack stop the popping.
        return false;
    };
    match incoming.associativity() {
        Some(Associativity::Right) => top_precedence > incoming_precedence,
        _ => top_precedence >= incoming_precedence,
    }
}

/// Converts an infix expression into postfix order.
pub fn to_postfix(expression: &[Token]) -> Vec<Token> {
    let mut output = Vec::with_capacity(expression.len());
    let mut operators: Vec<Token> = vec![];

    for token in expression {
        match token {
            Token::LParen => operators.push(*token),
            Token::RParen => {
                while let Some(top) = operators.pop() {
                    if top == Token::LParen {
                        break;
                    }
                    output.push(top);
                }
            }
            Token::Not | Token::And | Token::Or => {
                while let Some(top) = operators.last() {
                    if !pops_before(top, token) {
                        break;
                    }
                    output.push(*top);
                    operators.pop();
                }
                operators.push(*token);
            }
            operand => output.push(*operand),
        }
    }

    while let Some(top) = operators.pop() {
        if top != Token::LParen {
            output.push(top);
        }
    }

    output
}

/// Compiles a validated statement that came from `line`.
pub fn compile_statement(statement: &Statement, line: usize) -> CompiledStatement {
    CompiledStatement {
        line,
        destination: statement.destination,
        postfix: to_postfix(&statement.expression),
    }
}
