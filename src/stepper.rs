//! This module defines the interactive `Stepper`, which advances one deterministic run of an
//! automaton, one consumed input symbol at a time, and keeps a trace of what it did.
//!
//! The stepper never explores alternatives. When a key carries several effects it fires the
//! first one registered in the table, which may diverge from the batch recognizer on
//! nondeterministic automata. It also never takes epsilon moves.

use crate::automaton::Automaton;
use crate::types::{
    Configuration, InputSymbol, LogEntry, PdaError, StackAction, State, Step, Symbol,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The lifecycle phase of a stepper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No input is loaded.
    Idle,
    /// Input is loaded and no step has been taken.
    Loaded,
    /// At least one step has been taken.
    Stepping,
    /// A step reported the end of the input.
    Finished,
}

/// Why a call to [`Stepper::run`] stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Halt {
    EndOfInput,
    /// The run got stuck. Carries the `Step::UndefinedTransition` that stopped it.
    Stuck(Step),
}

/// The result of driving a stepper to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// Every log entry since the input was loaded.
    pub trace: Vec<LogEntry>,
    pub halt: Halt,
    pub accepted: bool,
}

/// A single-path executor for inspection and visualization.
///
/// Exactly one caller drives a stepper; operations complete before the next one starts.
#[derive(Debug, Clone)]
pub struct Stepper {
    automaton: Automaton,
    phase: Phase,
    input: Vec<Symbol>,
    config: Configuration,
    log: Vec<LogEntry>,
}

impl Stepper {
    /// Creates an idle stepper.
    ///
    /// Over a nondeterministic table only the first registered effect of each key will ever fire.
    pub fn new(automaton: Automaton) -> Self {
        let ambiguous = automaton.table().nondeterministic_keys();
        if !ambiguous.is_empty() {
            debug!(
                keys = ambiguous.len(),
                "stepper over a nondeterministic table fires the first registered effect"
            );
        }

        let config = automaton.initial_configuration();
        Self {
            automaton,
            phase: Phase::Idle,
            input: Vec::new(),
            config,
            log: Vec::new(),
        }
    }

    /// Loads a new input, restarting the run from the initial configuration.
    pub fn load(&mut self, input: impl Into<Vec<Symbol>>) {
        self.config = self.automaton.initial_configuration();
        self.input = input.into();
        self.log.clear();
        self.phase = Phase::Loaded;
    }

    /// Returns the stepper to `Idle`, discarding the input and the trace.
    pub fn reset(&mut self) {
        self.config = self.automaton.initial_configuration();
        self.input.clear();
        self.log.clear();
        self.phase = Phase::Idle;
    }

    /// Executes a single step.
    ///
    /// # Returns
    ///
    /// * `Ok(Step::Consumed(_))` if the next symbol was read and a transition fired.
    /// * `Ok(Step::EndOfInput)` if the input is consumed. Nothing changes.
    /// * `Ok(Step::UndefinedTransition { .. })` if no rule matches. Nothing changes.
    /// * `Err(PdaError::NotLoaded)` if no input is loaded.
    pub fn step(&mut self) -> Result<Step, PdaError> {
        if self.phase == Phase::Idle {
            return Err(PdaError::NotLoaded);
        }

        let Some(symbol) = self.input.get(self.config.position).cloned() else {
            self.phase = Phase::Finished;
            return Ok(Step::EndOfInput);
        };

        let stack_top = self.config.stack_top();
        let read = InputSymbol::Symbol(symbol.clone());
        let effect = self
            .automaton
            .table()
            .lookup(&self.config.state, &read, &stack_top)
            .first()
            .cloned();

        let undefined = || Step::UndefinedTransition {
            state: self.config.state.clone(),
            symbol: symbol.clone(),
            stack_top: stack_top.clone(),
        };

        let Some(effect) = effect else {
            let step = undefined();
            debug!(?step, "no transition");
            self.phase = Phase::Stepping;
            return Ok(step);
        };

        // A pop registered under the `Empty` key blocks the run.
        let mut stack = self.config.stack.clone();
        if !effect.stack_action.apply(&mut stack) {
            let step = undefined();
            self.phase = Phase::Stepping;
            return Ok(step);
        }

        let entry = LogEntry {
            position: self.config.position,
            symbol,
            from: self.config.state.clone(),
            stack_top,
            to: effect.next_state.clone(),
            action: effect.stack_action,
        };
        debug!(%entry, "step");

        self.config = Configuration {
            state: effect.next_state,
            position: self.config.position + 1,
            stack,
        };
        self.log.push(entry.clone());
        self.phase = Phase::Stepping;

        Ok(Step::Consumed(entry))
    }

    /// Steps until the input ends or the run gets stuck.
    pub fn run(&mut self) -> Result<Run, PdaError> {
        let halt = loop {
            match self.step()? {
                Step::Consumed(_) => continue,
                Step::EndOfInput => break Halt::EndOfInput,
                stuck => break Halt::Stuck(stuck),
            }
        };

        Ok(Run {
            trace: self.log.clone(),
            halt,
            accepted: self.is_accepted(),
        })
    }

    /// Returns `true` once every input symbol has been consumed. Always `false` while idle.
    pub fn is_finished(&self) -> bool {
        self.phase != Phase::Idle && self.config.position == self.input.len()
    }

    /// Returns `true` if the run is finished in an accepting configuration.
    ///
    /// Never `true` before the input is fully consumed.
    pub fn is_accepted(&self) -> bool {
        self.is_finished() && self.automaton.is_accepting(&self.config, self.input.len())
    }

    /// Returns `true` if the next symbol has no rule that can fire.
    pub fn is_stuck(&self) -> bool {
        let Some(symbol) = self.input.get(self.config.position) else {
            return false;
        };
        if self.phase == Phase::Idle {
            return false;
        }

        let effects = self.automaton.table().lookup(
            &self.config.state,
            &InputSymbol::Symbol(symbol.clone()),
            &self.config.stack_top(),
        );
        match effects.first() {
            Some(effect) => {
                effect.stack_action == StackAction::Pop && self.config.stack.is_empty()
            }
            None => true,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &State {
        &self.config.state
    }

    /// Stack contents, bottom first.
    pub fn stack(&self) -> &[Symbol] {
        &self.config.stack
    }

    pub fn position(&self) -> usize {
        self.config.position
    }

    pub fn input(&self) -> &[Symbol] {
        &self.input
    }

    /// The input symbols not consumed yet.
    pub fn remaining(&self) -> &[Symbol] {
        &self.input[self.config.position..]
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }
}
