//! This module defines the `TransitionTable`, an immutable multimap from transition keys to the
//! set of effects registered under each key.
//!
//! Effects under one key keep their registration order. The batch recognizer treats them as an
//! unordered set; the interactive stepper always fires the first one registered.

use crate::types::{
    InputSymbol, StackAction, StackTop, State, TransitionEffect, TransitionEntry, TransitionKey,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// A validated, queryable transition relation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionTable {
    rules: HashMap<TransitionKey, Vec<TransitionEffect>>,
    // Keys in the order they were first registered.
    order: Vec<TransitionKey>,
}

impl TransitionTable {
    /// Builds a table from a collection of entries, in order.
    ///
    /// Identical entries registered twice collapse into one. An entry that pops under the
    /// `Empty` stack-top key is kept: the recognizer prunes it and the stepper reports it as an
    /// undefined transition.
    pub fn new(entries: impl IntoIterator<Item = TransitionEntry>) -> Self {
        let mut table = Self::default();
        for entry in entries {
            table.insert(entry);
        }

        table
    }

    /// Registers one entry.
    ///
    /// Returns `false` when the exact same entry was already present.
    fn insert(&mut self, entry: TransitionEntry) -> bool {
        let (key, effect) = entry.into_parts();

        if key.stack_top == StackTop::Empty && effect.stack_action == StackAction::Pop {
            warn!(%key, "transition pops an empty stack and can never fire");
        }

        match self.rules.get_mut(&key) {
            Some(effects) if effects.contains(&effect) => {
                debug!(%key, "ignoring duplicate transition");
                false
            }
            Some(effects) => {
                effects.push(effect);
                true
            }
            None => {
                self.order.push(key.clone());
                self.rules.insert(key, vec![effect]);
                true
            }
        }
    }

    /// Returns every effect registered under the exact key, in registration order.
    ///
    /// An empty slice means there is no move via that key; stack tops are never matched by
    /// wildcard.
    pub fn lookup(
        &self,
        state: &State,
        input: &InputSymbol,
        stack_top: &StackTop,
    ) -> &[TransitionEffect] {
        let key = TransitionKey::new(state.clone(), input.clone(), stack_top.clone());
        self.get(&key)
    }

    pub fn get(&self, key: &TransitionKey) -> &[TransitionEffect] {
        self.rules.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The number of distinct entries in the table.
    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates over all entries in registration order, grouped by key.
    pub fn entries(&self) -> impl Iterator<Item = TransitionEntry> + '_ {
        self.order.iter().flat_map(move |key| {
            self.get(key)
                .iter()
                .map(move |effect| TransitionEntry::from_parts(key, effect))
        })
    }

    /// Keys with more than one registered effect, in registration order.
    pub fn nondeterministic_keys(&self) -> Vec<&TransitionKey> {
        self.order
            .iter()
            .filter(|key| self.get(key).len() > 1)
            .collect()
    }

    /// Returns `true` if no key carries more than one effect.
    pub fn is_deterministic(&self) -> bool {
        self.rules.values().all(|effects| effects.len() <= 1)
    }

    pub fn has_epsilon_moves(&self) -> bool {
        self.order.iter().any(|key| key.input.is_epsilon())
    }

    /// Every state mentioned as a source or a target of some rule.
    pub fn states(&self) -> HashSet<&State> {
        self.rules
            .iter()
            .flat_map(|(key, effects)| {
                std::iter::once(&key.state).chain(effects.iter().map(|e| &e.next_state))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Symbol;

    fn sym(c: char) -> Symbol {
        Symbol::from(c)
    }

    fn entry(from: &str, input: char, top: char, to: &str, action: StackAction) -> TransitionEntry {
        TransitionEntry::new(
            from,
            InputSymbol::Symbol(sym(input)),
            StackTop::Symbol(sym(top)),
            to,
            action,
        )
    }

    #[test]
    fn test_lookup_exact_key() {
        let table = TransitionTable::new([
            entry("q0", 'a', 'Z', "q0", StackAction::Push(sym('A'))),
            entry("q0", 'b', 'A', "q1", StackAction::Pop),
        ]);

        let effects = table.lookup(
            &State::from("q0"),
            &InputSymbol::Symbol(sym('a')),
            &StackTop::Symbol(sym('Z')),
        );
        assert_eq!(
            effects,
            &[TransitionEffect::new(
                State::from("q0"),
                StackAction::Push(sym('A'))
            )]
        );

        // No wildcard matching on the stack top.
        let missing = table.lookup(
            &State::from("q0"),
            &InputSymbol::Symbol(sym('a')),
            &StackTop::Symbol(sym('A')),
        );
        assert!(missing.is_empty());
    }

    #[test]
    fn test_nondeterministic_keys_keep_registration_order() {
        let table = TransitionTable::new([
            entry("q0", 'a', 'Z', "q1", StackAction::NoOp),
            entry("q0", 'a', 'Z', "q2", StackAction::Push(sym('A'))),
            entry("q1", 'a', 'Z', "q1", StackAction::NoOp),
        ]);

        assert!(!table.is_deterministic());
        let keys = table.nondeterministic_keys();
        assert_eq!(keys.len(), 1);

        let effects = table.get(keys[0]);
        assert_eq!(effects[0].next_state, State::from("q1"));
        assert_eq!(effects[1].next_state, State::from("q2"));
    }

    #[test]
    fn test_duplicate_entries_collapse() {
        let mut table = TransitionTable::default();
        let rule = entry("q0", 'a', 'Z', "q0", StackAction::NoOp);

        assert!(table.insert(rule.clone()));
        assert!(!table.insert(rule));
        assert_eq!(table.len(), 1);
        assert!(table.is_deterministic());
    }

    #[test]
    fn test_pop_under_empty_key_is_kept() {
        let table = TransitionTable::new([
            entry("q0", 'a', 'Z', "q1", StackAction::Pop),
            TransitionEntry::new(
                "q1",
                InputSymbol::Symbol(sym('b')),
                StackTop::Empty,
                "q2",
                StackAction::Pop,
            ),
        ]);

        assert_eq!(table.len(), 2);
        let effects = table.lookup(
            &State::from("q1"),
            &InputSymbol::Symbol(sym('b')),
            &StackTop::Empty,
        );
        assert_eq!(effects[0].stack_action, StackAction::Pop);
    }

    #[test]
    fn test_entries_round_trip_in_order() {
        let rules = vec![
            entry("q0", 'a', 'Z', "q0", StackAction::Push(sym('A'))),
            TransitionEntry::new(
                "q0",
                InputSymbol::Epsilon,
                StackTop::Symbol(sym('A')),
                "q1",
                StackAction::NoOp,
            ),
            entry("q1", 'b', 'A', "q1", StackAction::Pop),
        ];
        let table = TransitionTable::new(rules.clone());

        assert_eq!(table.entries().collect::<Vec<_>>(), rules);
        assert!(table.has_epsilon_moves());
        assert_eq!(table.states().len(), 2);
    }
}
