//! Property-based tests for the two execution engines.
//!
//! These tests use proptest to check that the batch recognizer and the interactive stepper agree
//! where their contracts overlap, and that stepper runs are reproducible.

use pda::{
    Automaton, InputSymbol, Outcome, StackAction, StackTop, State, Step, Symbol, TransitionEntry,
    TransitionTable,
};
use proptest::prelude::*;

const STATES: [&str; 3] = ["q0", "q1", "q2"];
const INPUTS: [char; 2] = ['a', 'b'];
const TOPS: [Option<char>; 3] = [Some('Z'), Some('A'), None];

fn action_for(index: usize) -> StackAction {
    match index {
        0 => StackAction::Push(Symbol::from('A')),
        1 => StackAction::Push(Symbol::from('Z')),
        2 => StackAction::Pop,
        _ => StackAction::NoOp,
    }
}

/// Builds an automaton with at most one effect per key and no epsilon moves. `rules` holds one
/// optional `(target, action)` choice per key.
fn build(
    rules: Vec<Option<(usize, usize)>>,
    accept: Vec<bool>,
    require_empty_stack: bool,
) -> Automaton {
    let keys = STATES.iter().flat_map(|state| {
        INPUTS
            .iter()
            .flat_map(move |input| TOPS.iter().map(move |top| (*state, *input, *top)))
    });

    let entries = keys
        .zip(rules)
        .filter_map(|((state, input, top), rule)| {
            let (target, action) = rule?;
            let stack_top = top.map_or(StackTop::Empty, |c| StackTop::Symbol(Symbol::from(c)));
            let mut stack_action = action_for(action);
            if stack_top == StackTop::Empty && stack_action == StackAction::Pop {
                stack_action = StackAction::NoOp;
            }

            Some(TransitionEntry::new(
                state,
                InputSymbol::Symbol(Symbol::from(input)),
                stack_top,
                STATES[target],
                stack_action,
            ))
        })
        .collect::<Vec<_>>();

    let table = TransitionTable::new(entries);
    let accept_states = STATES
        .iter()
        .zip(accept)
        .filter(|(_, accepting)| *accepting)
        .map(|(state, _)| State::from(*state));

    Automaton::new(
        table,
        State::from("q0"),
        Symbol::from('Z'),
        accept_states,
        require_empty_stack,
    )
}

prop_compose! {
    fn arbitrary_automaton()(
        rules in prop::collection::vec(prop::option::of((0..3usize, 0..4usize)), 18),
        accept in prop::collection::vec(any::<bool>(), 3),
        require_empty_stack in any::<bool>(),
    ) -> Automaton {
        build(rules, accept, require_empty_stack)
    }
}

proptest! {
    #[test]
    fn engines_agree_on_deterministic_tables(
        automaton in arbitrary_automaton(),
        word in "[ab]{0,6}",
    ) {
        let input = Symbol::word(&word);

        let outcome = automaton.recognizer().accepts(&input);
        prop_assert_ne!(outcome, Outcome::Exhausted);

        let mut stepper = automaton.stepper();
        stepper.load(input);
        let run = stepper.run().unwrap();

        prop_assert_eq!(outcome.is_accepted(), run.accepted);
    }

    #[test]
    fn runs_are_reproducible(
        automaton in arbitrary_automaton(),
        word in "[ab]{0,6}",
    ) {
        let input = Symbol::word(&word);
        let mut stepper = automaton.stepper();

        stepper.load(input.clone());
        let first = serde_json::to_string(&stepper.run().unwrap().trace).unwrap();

        stepper.reset();
        stepper.load(input);
        let second = serde_json::to_string(&stepper.run().unwrap().trace).unwrap();

        prop_assert_eq!(first, second);
    }

    #[test]
    fn acceptance_query_is_idempotent(
        automaton in arbitrary_automaton(),
        word in "[ab]{0,6}",
        steps in 0..8usize,
    ) {
        let mut stepper = automaton.stepper();
        stepper.load(Symbol::word(&word));
        for _ in 0..steps {
            stepper.step().unwrap();
        }

        prop_assert_eq!(stepper.is_accepted(), stepper.is_accepted());
        if !stepper.is_finished() {
            prop_assert!(!stepper.is_accepted());
        }
    }

    #[test]
    fn step_after_finish_changes_nothing(
        automaton in arbitrary_automaton(),
        word in "[ab]{0,6}",
    ) {
        let mut stepper = automaton.stepper();
        stepper.load(Symbol::word(&word));
        stepper.run().unwrap();

        if stepper.is_finished() {
            let before = stepper.configuration().clone();
            prop_assert_eq!(stepper.step().unwrap(), Step::EndOfInput);
            prop_assert_eq!(stepper.configuration(), &before);
        }
    }
}
