//! This module defines the core data structures and types shared by both execution engines:
//! states, symbols, stack actions, transition keys and effects, configurations, acceptance
//! policies, execution outcomes and error types.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// The default number of configurations the batch recognizer may expand before giving up.
pub const DEFAULT_MAX_STEPS: usize = 100_000;
/// The default number of configurations the batch recognizer may hold in its frontier.
pub const DEFAULT_MAX_FRONTIER: usize = 100_000;

/// An opaque automaton state identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(String);

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for State {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for State {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An opaque symbol identifier, used for both the input and the stack alphabet.
///
/// Control markers such as epsilon or an empty stack are never symbols; they are separate
/// variants of [`InputSymbol`] and [`StackTop`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits a string into one symbol per character.
    ///
    /// ```
    /// use pda::Symbol;
    ///
    /// let word = Symbol::word("ab");
    /// assert_eq!(word, vec![Symbol::from('a'), Symbol::from('b')]);
    /// ```
    pub fn word(text: &str) -> Vec<Symbol> {
        text.chars().map(Symbol::from).collect()
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Self(c.to_string())
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The input component of a transition key: a real symbol, or an epsilon move.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputSymbol {
    /// Consumes one occurrence of the symbol from the input.
    Symbol(Symbol),
    /// Consumes no input.
    Epsilon,
}

impl InputSymbol {
    pub fn is_epsilon(&self) -> bool {
        matches!(self, InputSymbol::Epsilon)
    }
}

impl From<Symbol> for InputSymbol {
    fn from(symbol: Symbol) -> Self {
        InputSymbol::Symbol(symbol)
    }
}

impl fmt::Display for InputSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSymbol::Symbol(s) => write!(f, "{s}"),
            InputSymbol::Epsilon => f.write_str("ε"),
        }
    }
}

/// The stack-top component of a transition key: a real symbol, or an empty stack.
///
/// `Empty` is distinct from any bottom-marker symbol a table might use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StackTop {
    Symbol(Symbol),
    Empty,
}

impl StackTop {
    /// Returns the top of the given stack (last element), or `Empty`.
    pub fn of(stack: &[Symbol]) -> Self {
        stack
            .last()
            .map_or(StackTop::Empty, |s| StackTop::Symbol(s.clone()))
    }
}

impl From<Symbol> for StackTop {
    fn from(symbol: Symbol) -> Self {
        StackTop::Symbol(symbol)
    }
}

impl fmt::Display for StackTop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackTop::Symbol(s) => write!(f, "{s}"),
            StackTop::Empty => f.write_str("∅"),
        }
    }
}

/// What a transition does to the stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StackAction {
    /// Push the symbol on top of the stack.
    Push(Symbol),
    /// Remove the top of the stack.
    Pop,
    /// Leave the stack unchanged.
    NoOp,
}

impl StackAction {
    /// Applies the action to a stack. Returns `false`, leaving the stack untouched, when a
    /// `Pop` is applied to an empty stack.
    pub fn apply(&self, stack: &mut Vec<Symbol>) -> bool {
        match self {
            StackAction::Push(symbol) => stack.push(symbol.clone()),
            StackAction::Pop => return stack.pop().is_some(),
            StackAction::NoOp => {}
        }
        true
    }
}

impl fmt::Display for StackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackAction::Push(s) => write!(f, "push {s}"),
            StackAction::Pop => f.write_str("pop"),
            StackAction::NoOp => f.write_str("no-op"),
        }
    }
}

/// The lookup key of a transition table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransitionKey {
    pub state: State,
    pub input: InputSymbol,
    pub stack_top: StackTop,
}

impl TransitionKey {
    pub fn new(state: State, input: InputSymbol, stack_top: StackTop) -> Self {
        Self {
            state,
            input,
            stack_top,
        }
    }
}

impl fmt::Display for TransitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.state, self.input, self.stack_top)
    }
}

/// The result of firing a transition: the next state and the stack action to apply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionEffect {
    pub next_state: State,
    pub stack_action: StackAction,
}

impl TransitionEffect {
    pub fn new(next_state: State, stack_action: StackAction) -> Self {
        Self {
            next_state,
            stack_action,
        }
    }
}

/// A single transition rule in its persisted, interchangeable form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionEntry {
    pub from_state: State,
    pub input: InputSymbol,
    pub stack_top: StackTop,
    pub to_state: State,
    pub stack_action: StackAction,
}

impl TransitionEntry {
    pub fn new(
        from_state: impl Into<State>,
        input: InputSymbol,
        stack_top: StackTop,
        to_state: impl Into<State>,
        stack_action: StackAction,
    ) -> Self {
        Self {
            from_state: from_state.into(),
            input,
            stack_top,
            to_state: to_state.into(),
            stack_action,
        }
    }

    /// Splits the entry into its lookup key and its effect.
    pub fn into_parts(self) -> (TransitionKey, TransitionEffect) {
        (
            TransitionKey::new(self.from_state, self.input, self.stack_top),
            TransitionEffect::new(self.to_state, self.stack_action),
        )
    }

    pub fn from_parts(key: &TransitionKey, effect: &TransitionEffect) -> Self {
        Self {
            from_state: key.state.clone(),
            input: key.input.clone(),
            stack_top: key.stack_top.clone(),
            to_state: effect.next_state.clone(),
            stack_action: effect.stack_action.clone(),
        }
    }
}

/// A complete, serializable automaton definition.
///
/// This is the configuration value collaborators load from files or the built-in catalog and
/// hand to [`crate::Automaton::from_definition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    /// A human-readable name for the automaton.
    pub name: String,
    pub start_state: State,
    /// The single symbol the stack holds when a run starts.
    pub start_stack_symbol: Symbol,
    pub accept_states: Vec<State>,
    #[serde(default)]
    pub require_empty_stack: bool,
    /// Transition rules in registration order.
    pub transitions: Vec<TransitionEntry>,
}

/// A snapshot of one point in a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Configuration {
    pub state: State,
    /// Number of input symbols consumed so far.
    pub position: usize,
    /// Stack contents, bottom first. The top is the last element.
    pub stack: Vec<Symbol>,
}

impl Configuration {
    pub fn initial(state: State, bottom: Symbol) -> Self {
        Self {
            state,
            position: 0,
            stack: vec![bottom],
        }
    }

    pub fn stack_top(&self) -> StackTop {
        StackTop::of(&self.stack)
    }

    /// Builds the successor configuration reached by firing `effect`.
    ///
    /// Returns `None` when the effect pops an empty stack, which prunes the branch.
    pub fn successor(&self, effect: &TransitionEffect, consumes: bool) -> Option<Configuration> {
        let mut stack = self.stack.clone();
        if !effect.stack_action.apply(&mut stack) {
            return None;
        }

        Some(Configuration {
            state: effect.next_state.clone(),
            position: self.position + usize::from(consumes),
            stack,
        })
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stack = self
            .stack
            .iter()
            .map(Symbol::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "({}, {}, [{}])", self.state, self.position, stack)
    }
}

/// The acceptance policy of an automaton.
///
/// Acceptance always requires the whole input to be consumed and the current state to be an
/// accept state. When `require_empty_stack` is set, the stack must additionally be empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AcceptanceSpec {
    pub accept_states: HashSet<State>,
    pub require_empty_stack: bool,
}

impl AcceptanceSpec {
    pub fn new(accept_states: impl IntoIterator<Item = State>, require_empty_stack: bool) -> Self {
        Self {
            accept_states: accept_states.into_iter().collect(),
            require_empty_stack,
        }
    }

    pub fn is_satisfied_by(&self, config: &Configuration, input_len: usize) -> bool {
        config.position == input_len
            && self.accept_states.contains(&config.state)
            && (!self.require_empty_stack || config.stack.is_empty())
    }
}

/// Search limits for the batch recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBudget {
    /// Maximum number of configurations dequeued and expanded.
    pub max_steps: usize,
    /// Maximum number of configurations waiting in the frontier.
    pub max_frontier: usize,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            max_frontier: DEFAULT_MAX_FRONTIER,
        }
    }
}

/// The verdict of the batch recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// An accepting configuration was reached.
    Accepted,
    /// The configuration space was exhausted without reaching an accepting configuration.
    Rejected,
    /// The search budget ran out before a verdict was reached. Counts as non-acceptance.
    Exhausted,
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Accepted => f.write_str("accepted"),
            Outcome::Rejected => f.write_str("rejected"),
            Outcome::Exhausted => f.write_str("exhausted"),
        }
    }
}

/// A record of one consuming step of the interactive stepper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// The input position the symbol was read from.
    pub position: usize,
    pub symbol: Symbol,
    pub from: State,
    pub stack_top: StackTop,
    pub to: State,
    pub action: StackAction,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "read '{}' at {}: {} -> {} on top {}, {}",
            self.symbol, self.position, self.from, self.to, self.stack_top, self.action
        )
    }
}

/// The outcome of a single stepper step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// One input symbol was consumed.
    Consumed(LogEntry),
    /// All input has been consumed. Nothing was changed.
    EndOfInput,
    /// No rule matches the current configuration. Nothing was changed.
    UndefinedTransition {
        state: State,
        symbol: Symbol,
        stack_top: StackTop,
    },
}

/// Represents various errors that can occur while building or driving an automaton.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PdaError {
    /// The stepper was driven before any input was loaded.
    #[error("No input loaded")]
    NotLoaded,
    /// Indicates an error during the parsing of an automaton definition.
    #[error("Definition parsing error: {0}")]
    ParseError(String),
    /// Indicates an error during the validation of an automaton definition.
    #[error("Definition validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
}
