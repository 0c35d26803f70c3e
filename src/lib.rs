//! This crate provides the core logic for a pushdown automaton simulator.
//! It includes a validated transition table, a batch recognizer that decides membership by
//! searching the nondeterministic configuration space, an interactive stepper that executes one
//! deterministic run for inspection, definition analysis and loading, and a catalog of
//! predefined automata.

pub mod analyzer;
pub mod automaton;
pub mod loader;
pub mod programs;
pub mod recognizer;
pub mod stepper;
pub mod table;
pub mod types;

/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the `Automaton` struct from the automaton module.
pub use automaton::Automaton;
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the batch recognizer and its search report.
pub use recognizer::{Recognizer, Search};
/// Re-exports the interactive stepper and its run types.
pub use stepper::{Halt, Phase, Run, Stepper};
/// Re-exports the `TransitionTable` struct from the table module.
pub use table::TransitionTable;
/// Re-exports the data model, outcomes and error types from the types module.
pub use types::{
    AcceptanceSpec, Configuration, Definition, InputSymbol, LogEntry, Outcome, PdaError,
    SearchBudget, StackAction, StackTop, State, Step, Symbol, TransitionEffect, TransitionEntry,
    TransitionKey,
};
