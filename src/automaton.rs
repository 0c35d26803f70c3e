//! This module defines the `Automaton`, the shared construction value both execution engines
//! are built from: a transition table, a start state, a start stack symbol and an acceptance
//! policy.

use crate::analyzer::analyze;
use crate::recognizer::Recognizer;
use crate::stepper::Stepper;
use crate::table::TransitionTable;
use crate::types::{AcceptanceSpec, Configuration, Definition, PdaError, State, Symbol};
use std::sync::Arc;

/// A pushdown automaton.
///
/// The table is shared behind an `Arc`, so cloning an automaton to hand it to another engine
/// does not copy the rules.
#[derive(Debug, Clone)]
pub struct Automaton {
    table: Arc<TransitionTable>,
    start_state: State,
    start_stack_symbol: Symbol,
    acceptance: AcceptanceSpec,
}

impl Automaton {
    /// Creates an automaton from its parts without running any definition analysis.
    pub fn new(
        table: TransitionTable,
        start_state: State,
        start_stack_symbol: Symbol,
        accept_states: impl IntoIterator<Item = State>,
        require_empty_stack: bool,
    ) -> Self {
        Self {
            table: Arc::new(table),
            start_state,
            start_stack_symbol,
            acceptance: AcceptanceSpec::new(accept_states, require_empty_stack),
        }
    }

    /// Builds an automaton from a `Definition`.
    ///
    /// The definition is analyzed before the table is built.
    ///
    /// # Returns
    ///
    /// * `Ok(Automaton)` if the definition is consistent.
    /// * `Err(PdaError::ValidationError)` if the analysis finds a problem.
    pub fn from_definition(definition: &Definition) -> Result<Self, PdaError> {
        analyze(definition)?;

        let table = TransitionTable::new(definition.transitions.iter().cloned());

        Ok(Self::new(
            table,
            definition.start_state.clone(),
            definition.start_stack_symbol.clone(),
            definition.accept_states.iter().cloned(),
            definition.require_empty_stack,
        ))
    }

    /// Converts the automaton back into its persisted form.
    ///
    /// Accept states are sorted by name so the output is stable.
    pub fn to_definition(&self, name: impl Into<String>) -> Definition {
        let mut accept_states = self
            .acceptance
            .accept_states
            .iter()
            .cloned()
            .collect::<Vec<_>>();
        accept_states.sort_by(|a, b| a.as_str().cmp(b.as_str()));

        Definition {
            name: name.into(),
            start_state: self.start_state.clone(),
            start_stack_symbol: self.start_stack_symbol.clone(),
            accept_states,
            require_empty_stack: self.acceptance.require_empty_stack,
            transitions: self.table.entries().collect(),
        }
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    pub fn start_state(&self) -> &State {
        &self.start_state
    }

    pub fn start_stack_symbol(&self) -> &Symbol {
        &self.start_stack_symbol
    }

    pub fn acceptance(&self) -> &AcceptanceSpec {
        &self.acceptance
    }

    /// The configuration every run starts from.
    pub fn initial_configuration(&self) -> Configuration {
        Configuration::initial(self.start_state.clone(), self.start_stack_symbol.clone())
    }

    /// Returns `true` if `config` is accepting for an input of `input_len` symbols.
    pub fn is_accepting(&self, config: &Configuration, input_len: usize) -> bool {
        self.acceptance.is_satisfied_by(config, input_len)
    }

    /// Creates a batch recognizer over this automaton with the default budget.
    pub fn recognizer(&self) -> Recognizer {
        Recognizer::new(self.clone())
    }

    /// Creates an idle interactive stepper over this automaton.
    pub fn stepper(&self) -> Stepper {
        Stepper::new(self.clone())
    }
}
