//! Property tests of the compiler over generated statements.
use proptest::prelude::*;
use scanplc_dsl::diagnostic::ErrorKind;
use scanplc_dsl::token::Token;
use scanplc_parser::compile_line;

prop_compose! {
    fn arb_operand()(
        (label, limit) in prop_oneof![
            Just(("I", 8u16)),
            Just(("O", 8)),
            Just(("B", 32)),
            Just(("TONO", 32)),
            Just(("TOFO", 32)),
            Just(("CUPO", 8)),
            Just(("CDNO", 8)),
        ],
        seed in 0u16..32,
    ) -> String {
        format!("{}{}", label, seed % limit + 1)
    }
}

prop_compose! {
    fn arb_destination()(
        (label, limit) in prop_oneof![
            Just(("O", 8u16)),
            Just(("B", 32)),
            Just(("TON", 32)),
            Just(("TOF", 32)),
            Just(("CUP", 8)),
            Just(("CDN", 8)),
        ],
        seed in 0u16..32,
    ) -> String {
        format!("{}{}", label, seed % limit + 1)
    }
}

/// Well formed expressions with balanced parentheses.
fn arb_expression() -> impl Strategy<Value = String> {
    arb_operand().prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|e| format!("!{}", e)),
            inner.clone().prop_map(|e| format!("({})", e)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("{} ^ {}", l, r)),
            (inner.clone(), inner).prop_map(|(l, r)| format!("{} | {}", l, r)),
        ]
    })
}

proptest! {
    #[test]
    fn compile_line_when_balanced_then_accepted(
        destination in arb_destination(),
        expression in arb_expression(),
    ) {
        let line = format!("{} = {}", destination, expression);
        let compiled = compile_line(&line, 1);
        prop_assert!(matches!(compiled, Ok(Some(_))), "{}: {:?}", line, compiled);
    }

    #[test]
    fn compile_line_when_balanced_then_postfix_is_well_formed(
        destination in arb_destination(),
        expression in arb_expression(),
    ) {
        let line = format!("{} = {}", destination, expression);
        let statement = compile_line(&line, 1).unwrap().unwrap();

        prop_assert!(!statement
            .postfix
            .iter()
            .any(|token| matches!(token, Token::LParen | Token::RParen)));

        let operands = statement.postfix.iter().filter(|t| t.is_operand()).count();
        let binary = statement
            .postfix
            .iter()
            .filter(|t| matches!(t, Token::And | Token::Or))
            .count();
        prop_assert_eq!(operands, binary + 1);
    }

    #[test]
    fn compile_line_when_extra_open_paren_then_syntax_error(
        destination in arb_destination(),
        expression in arb_expression(),
    ) {
        let line = format!("{} = ({}", destination, expression);
        let diagnostics = compile_line(&line, 1).unwrap_err();
        prop_assert_eq!(diagnostics[0].kind, ErrorKind::SyntaxError);
    }

    #[test]
    fn compile_line_when_extra_close_paren_then_syntax_error(
        destination in arb_destination(),
        expression in arb_expression(),
    ) {
        let line = format!("{} = {})", destination, expression);
        let diagnostics = compile_line(&line, 1).unwrap_err();
        prop_assert_eq!(diagnostics[0].kind, ErrorKind::SyntaxError);
    }

    #[test]
    fn compile_line_when_unknown_label_then_label_error(
        destination in arb_destination(),
        expression in arb_expression(),
        junk in "[QXZ#@]{1,3}",
        unbalanced in any::<bool>(),
    ) {
        let open = if unbalanced { "(" } else { "" };
        let line = format!("{} = {}{}{}", destination, open, junk, expression);
        let diagnostics = compile_line(&line, 1).unwrap_err();
        prop_assert!(diagnostics
            .iter()
            .all(|diagnostic| diagnostic.kind == ErrorKind::LabelError));
    }
}
