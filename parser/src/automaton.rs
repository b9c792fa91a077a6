//! Sentence validator. A pushdown automaton that decides whether a sequence
//! of canonical symbols forms a well-formed assignment `DEST = EXPR`.
//!
//! The control states are finite; the stack only tracks open parentheses so
//! that arbitrarily deep nesting is matched exactly. The transition table is
//! deterministic: for a given state there is at most one transition per
//! input symbol and at most one empty (epsilon) transition, so the input is
//! consumed left to right without backtracking.
use log::trace;

use crate::symbol::Symbol;

/// Whether a control state may end a sentence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acceptance {
    Accepting,
    NonAccepting,
}

/// The control states of the automaton.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// Nothing read yet; a destination is required.
    Start,
    /// Destination read; `=` is required.
    AfterDestination,
    /// `=` read. Continues to [`State::ExpectOperand`] without reading input.
    AfterEquals,
    /// An operand, `!` or `(` is required.
    ExpectOperand,
    /// An operand was just read.
    AfterOperand,
    /// An operator, `)` or the end of the statement is required.
    ExpectOperator,
}

impl State {
    pub fn acceptance(self) -> Acceptance {
        match self {
            State::AfterOperand | State::ExpectOperator => Acceptance::Accepting,
            State::Start
            | State::AfterDestination
            | State::AfterEquals
            | State::ExpectOperand => Acceptance::NonAccepting,
        }
    }

    pub fn is_accepting(self) -> bool {
        self.acceptance() == Acceptance::Accepting
    }
}

/// Markers kept on the automaton stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackSymbol {
    /// The bottom of the stack, standing for the end of the statement.
    Sentinel,
    /// An open parenthesis.
    Paren,
}

/// What a transition reads from the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum On {
    Symbol(Symbol),
    /// Reads nothing (an empty transition).
    Empty,
}

#[derive(Debug)]
pub struct Transition {
    pub from: State,
    pub on: On,
    /// The marker that must be on top of the stack and is removed.
    pub pop: Option<StackSymbol>,
    /// The marker added to the stack.
    pub push: Option<StackSymbol>,
    pub to: State,
}

const fn read(from: State, symbol: Symbol, to: State) -> Transition {
    Transition {
        from,
        on: On::Symbol(symbol),
        pop: None,
        push: None,
        to,
    }
}

const fn empty(from: State, to: State) -> Transition {
    Transition {
        from,
        on: On::Empty,
        pop: None,
        push: None,
        to,
    }
}

#[rustfmt::skip]
pub static TRANSITIONS: &[Transition] = &[
    // Destinations
    read(State::Start, Symbol::Output, State::AfterDestination),
    read(State::Start, Symbol::Bool, State::AfterDestination),
    read(State::Start, Symbol::TimerOnCoil, State::AfterDestination),
    read(State::Start, Symbol::TimerOffCoil, State::AfterDestination),
    read(State::Start, Symbol::CounterUpCoil, State::AfterDestination),
    read(State::Start, Symbol::CounterDownCoil, State::AfterDestination),

    read(State::AfterDestination, Symbol::Assign, State::AfterEquals),
    empty(State::AfterEquals, State::ExpectOperand),

    // Operands
    read(State::ExpectOperand, Symbol::Input, State::AfterOperand),
    read(State::ExpectOperand, Symbol::Output, State::AfterOperand),
    read(State::ExpectOperand, Symbol::Bool, State::AfterOperand),
    read(State::ExpectOperand, Symbol::TimerOnContact, State::AfterOperand),
    read(State::ExpectOperand, Symbol::TimerOffContact, State::AfterOperand),
    read(State::ExpectOperand, Symbol::CounterUpContact, State::AfterOperand),
    read(State::ExpectOperand, Symbol::CounterDownContact, State::AfterOperand),
    read(State::ExpectOperand, Symbol::Not, State::ExpectOperand),
    Transition {
        from: State::ExpectOperand,
        on: On::Symbol(Symbol::LeftParen),
        pop: None,
        push: Some(StackSymbol::Paren),
        to: State::ExpectOperand,
    },

    // Operators and closing parentheses
    empty(State::AfterOperand, State::ExpectOperator),
    read(State::ExpectOperator, Symbol::And, State::ExpectOperand),
    read(State::ExpectOperator, Symbol::Or, State::ExpectOperand),
    Transition {
        from: State::ExpectOperator,
        on: On::Symbol(Symbol::RightParen),
        pop: Some(StackSymbol::Paren),
        push: None,
        to: State::ExpectOperator,
    },
];

/// Why the automaton rejected a sentence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// No transition reads the symbol at `index` in `state`.
    NoTransition { index: usize, state: State },
    /// The `)` at `index` has no open parenthesis to close.
    UnmatchedParen { index: usize },
    /// The input ended in a state that cannot end a statement.
    NotAccepting { state: State },
    /// The input ended with the parenthesis opened at `index` still open.
    Unbalanced { index: usize },
}

/// A pushdown automaton run over one sentence.
#[derive(Debug)]
pub struct Automaton {
    state: State,
    /// Stack markers with the input index that pushed them.
    stack: Vec<(StackSymbol, usize)>,
}

impl Default for Automaton {
    fn default() -> Self {
        Self::new()
    }
}

impl Automaton {
    pub fn new() -> Self {
        Automaton {
            state: State::Start,
            stack: vec![(StackSymbol::Sentinel, 0)],
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    fn find(&self, on: On) -> Option<&'static Transition> {
        TRANSITIONS
            .iter()
            .find(|transition| transition.from == self.state && transition.on == on)
    }

    /// Applies the stack effect and state change of a transition. Returns
    /// false if the transition needs a marker that is not on top of the
    /// stack.
    fn apply(&mut self, transition: &Transition, index: usize) -> bool {
        if let Some(expected) = transition.pop {
            match self.stack.last() {
                Some((top, _)) if *top == expected => {
                    self.stack.pop();
                }
                _ => return false,
            }
        }
        if let Some(marker) = transition.push {
            self.stack.push((marker, index));
        }
        trace!("{:?} -> {:?}", self.state, transition.to);
        self.state = transition.to;
        true
    }

    /// Runs the automaton over the whole input.
    pub fn run(mut self, symbols: &[Symbol]) -> Result<(), Rejection> {
        let mut index = 0;
        while index < symbols.len() {
            let symbol = symbols[index];
            if let Some(transition) = self.find(On::Symbol(symbol)) {
                if !self.apply(transition, index) {
                    return Err(Rejection::UnmatchedParen { index });
                }
                index += 1;
            } else if let Some(transition) = self.find(On::Empty) {
                if !self.apply(transition, index) {
                    return Err(Rejection::NoTransition {
                        index,
                        state: self.state,
                    });
                }
            } else {
                return Err(Rejection::NoTransition {
                    index,
                    state: self.state,
                });
            }
        }

        if !self.state.is_accepting() {
            return Err(Rejection::NotAccepting { state: self.state });
        }

        match self.stack.pop() {
            Some((StackSymbol::Sentinel, _)) if self.stack.is_empty() => Ok(()),
            Some((_, index)) => Err(Rejection::Unbalanced { index }),
            None => Err(Rejection::NotAccepting { state: self.state }),
        }
    }
}

/// Validates one sentence of canonical symbols.
pub fn validate(symbols: &[Symbol]) -> Result<(), Rejection> {
    Automaton::new().run(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::normalize;

    fn check(line: &str) -> Result<(), Rejection> {
        let normalized = normalize(line, 1);
        assert!(!normalized.label_error(), "{}", line);
        validate(&normalized.symbols())
    }

    #[test]
    fn transitions_when_listed_then_deterministic() {
        for (i, a) in TRANSITIONS.iter().enumerate() {
            for b in TRANSITIONS.iter().skip(i + 1) {
                assert!(
                    !(a.from == b.from && a.on == b.on),
                    "duplicate transition {:?} {:?}",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn transitions_when_empty_then_never_return_to_same_state() {
        for transition in TRANSITIONS.iter().filter(|t| t.on == On::Empty) {
            assert_ne!(transition.from, transition.to);
            let next = TRANSITIONS
                .iter()
                .find(|t| t.from == transition.to && t.on == On::Empty);
            assert!(next.is_none(), "chained empty transitions");
        }
    }

    #[test]
    fn validate_when_simple_assignment_then_accepts() {
        assert_eq!(check("O1=I1"), Ok(()));
    }

    #[test]
    fn validate_when_nested_parentheses_then_accepts() {
        assert_eq!(check("O1=(!I1^(O2|B3))"), Ok(()));
        assert_eq!(check("B2=((((I1))))"), Ok(()));
    }

    #[test]
    fn validate_when_repeated_not_then_accepts() {
        assert_eq!(check("O1=!!I1"), Ok(()));
        assert_eq!(check("O1=!(I1|!I2)"), Ok(()));
    }

    #[test]
    fn validate_when_timer_and_counter_coils_then_accepts() {
        assert_eq!(check("TON1=I1"), Ok(()));
        assert_eq!(check("TOF2=TONO1^I2"), Ok(()));
        assert_eq!(check("CUP3=I3"), Ok(()));
        assert_eq!(check("CDN4=CUPO3|CDNO4"), Ok(()));
    }

    #[test]
    fn validate_when_input_destination_then_no_transition_at_start() {
        assert_eq!(
            check("I1=I2"),
            Err(Rejection::NoTransition {
                index: 0,
                state: State::Start
            })
        );
    }

    #[test]
    fn validate_when_contact_destination_then_rejects() {
        assert!(check("TONO1=I2").is_err());
    }

    #[test]
    fn validate_when_missing_equals_then_rejects() {
        assert!(check("O1I2").is_err());
    }

    #[test]
    fn validate_when_extra_right_paren_then_unmatched() {
        assert_eq!(check("O1=I1)"), Err(Rejection::UnmatchedParen { index: 3 }));
    }

    #[test]
    fn validate_when_unclosed_paren_then_unbalanced() {
        assert_eq!(check("O1=(I1^(I2)"), Err(Rejection::Unbalanced { index: 2 }));
    }

    #[test]
    fn validate_when_trailing_operator_then_not_accepting() {
        assert_eq!(
            check("O1=I1^"),
            Err(Rejection::NotAccepting {
                state: State::ExpectOperand
            })
        );
    }

    #[test]
    fn validate_when_only_destination_and_equals_then_not_accepting() {
        assert_eq!(
            check("O1="),
            Err(Rejection::NotAccepting {
                state: State::AfterEquals
            })
        );
    }

    #[test]
    fn validate_when_adjacent_operands_then_rejects() {
        assert!(check("O1=I1I2").is_err());
    }

    #[test]
    fn validate_when_empty_parentheses_then_rejects() {
        assert!(check("O1=()").is_err());
    }

    #[test]
    fn validate_when_second_assignment_then_rejects() {
        assert!(check("O1=I1=I2").is_err());
    }

    #[test]
    fn validate_when_not_after_operand_then_rejects() {
        assert!(check("O1=I1!I2").is_err());
    }
}
