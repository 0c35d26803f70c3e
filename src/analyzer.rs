//! This module provides functions for analyzing automaton definitions to detect common errors
//! and inconsistencies before execution. This includes checks for empty identifiers, accept
//! states no rule can enter, unreachable states, and rules keyed on stack symbols that can never
//! be on top of the stack.

use crate::types::{Definition, InputSymbol, PdaError, StackAction, StackTop, State, Symbol};
use std::collections::HashSet;

/// Represents various errors that can be found during the analysis of an automaton definition.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// Indicates structural problems with the definition (empty identifiers).
    StructuralError(String),
    /// Indicates accept states that are neither the start state nor the target of any rule.
    UnknownAcceptStates(Vec<String>),
    /// Indicates states that have rules but cannot be reached from the start state.
    UnreachableStates(Vec<String>),
    /// Indicates stack symbols that rules expect on top of the stack but that are never pushed
    /// and are not the start stack symbol.
    UnmatchedStackSymbols(Vec<String>),
}

impl From<AnalysisError> for PdaError {
    /// Converts an `AnalysisError` into a `PdaError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::StructuralError(msg) => PdaError::ValidationError(msg),
            AnalysisError::UnknownAcceptStates(states) => PdaError::ValidationError(format!(
                "Accept states not entered by any transition: {:?}",
                states
            )),
            AnalysisError::UnreachableStates(states) => PdaError::ValidationError(format!(
                "Unreachable states detected: {:?}",
                states
            )),
            AnalysisError::UnmatchedStackSymbols(symbols) => {
                PdaError::ValidationError(format!(
                    "Rules expect stack symbols that are never pushed: {:?}",
                    symbols
                ))
            }
        }
    }
}

/// Analyzes a given `Definition` for structural and logical errors.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(PdaError::ValidationError)` describing the first problem found.
pub fn analyze(definition: &Definition) -> Result<(), PdaError> {
    let errors = [
        check_structure,
        check_accept_states,
        check_unreachable_states,
        check_stack_symbols,
    ]
    .iter()
    .filter_map(|f| f(definition).err())
    .collect::<Vec<_>>();

    match errors.into_iter().next() {
        Some(first_error) => Err(first_error.into()),
        None => Ok(()),
    }
}

/// Checks that no state or symbol identifier is empty.
fn check_structure(definition: &Definition) -> Result<(), AnalysisError> {
    if definition.start_state.as_str().is_empty() {
        return Err(AnalysisError::StructuralError(
            "Start state is empty".to_string(),
        ));
    }

    if definition.start_stack_symbol.as_str().is_empty() {
        return Err(AnalysisError::StructuralError(
            "Start stack symbol is empty".to_string(),
        ));
    }

    for (i, entry) in definition.transitions.iter().enumerate() {
        let mut symbols = Vec::new();
        if let InputSymbol::Symbol(s) = &entry.input {
            symbols.push(s);
        }
        if let StackTop::Symbol(s) = &entry.stack_top {
            symbols.push(s);
        }
        if let StackAction::Push(s) = &entry.stack_action {
            symbols.push(s);
        }

        if entry.from_state.as_str().is_empty()
            || entry.to_state.as_str().is_empty()
            || symbols.iter().any(|s| s.as_str().is_empty())
        {
            return Err(AnalysisError::StructuralError(format!(
                "Transition {} has an empty state or symbol",
                i
            )));
        }
    }

    Ok(())
}

/// Checks that every accept state can actually be occupied: it is either the start state or the
/// target of at least one rule.
fn check_accept_states(definition: &Definition) -> Result<(), AnalysisError> {
    let entered: HashSet<&State> = definition
        .transitions
        .iter()
        .map(|entry| &entry.to_state)
        .chain(std::iter::once(&definition.start_state))
        .collect();

    let mut unknown: Vec<String> = definition
        .accept_states
        .iter()
        .filter(|state| !entered.contains(state))
        .map(|state| state.to_string())
        .collect();

    if !unknown.is_empty() {
        unknown.sort();
        unknown.dedup();
        return Err(AnalysisError::UnknownAcceptStates(unknown));
    }

    Ok(())
}

/// Checks for unreachable states by traversing the state graph from the start state.
///
/// Stack contents are ignored, so a state reported here is unreachable under any run.
fn check_unreachable_states(definition: &Definition) -> Result<(), AnalysisError> {
    let mut visited = HashSet::new();
    let mut queue = vec![&definition.start_state];

    while let Some(state) = queue.pop() {
        if !visited.insert(state) {
            continue;
        }

        for entry in &definition.transitions {
            if &entry.from_state == state && !visited.contains(&entry.to_state) {
                queue.push(&entry.to_state);
            }
        }
    }

    let mut unreachable: Vec<String> = definition
        .transitions
        .iter()
        .map(|entry| &entry.from_state)
        .filter(|state| !visited.contains(state))
        .map(|state| state.to_string())
        .collect();

    if !unreachable.is_empty() {
        unreachable.sort(); // Sort for deterministic output
        unreachable.dedup();
        return Err(AnalysisError::UnreachableStates(unreachable));
    }

    Ok(())
}

/// Checks that every stack symbol a rule expects on top can get there: it is the start stack
/// symbol or some rule pushes it.
fn check_stack_symbols(definition: &Definition) -> Result<(), AnalysisError> {
    let available: HashSet<&Symbol> = definition
        .transitions
        .iter()
        .filter_map(|entry| match &entry.stack_action {
            StackAction::Push(symbol) => Some(symbol),
            _ => None,
        })
        .chain(std::iter::once(&definition.start_stack_symbol))
        .collect();

    let mut unmatched: Vec<String> = definition
        .transitions
        .iter()
        .filter_map(|entry| match &entry.stack_top {
            StackTop::Symbol(symbol) if !available.contains(symbol) => Some(symbol.to_string()),
            _ => None,
        })
        .collect();

    if !unmatched.is_empty() {
        unmatched.sort();
        unmatched.dedup();
        return Err(AnalysisError::UnmatchedStackSymbols(unmatched));
    }

    Ok(())
}
