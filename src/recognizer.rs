//! This module defines the batch `Recognizer`, which decides membership of an input in the
//! language of an automaton by a breadth-first search over the configuration graph.
//!
//! Every call to [`Recognizer::accepts`] is an independent search that owns its own frontier and
//! visited set, so one recognizer can be shared between threads.

use crate::automaton::Automaton;
use crate::types::{Configuration, InputSymbol, Outcome, SearchBudget, Symbol};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info};

/// A configuration discovered during the search, with a link to the one it was reached from.
struct Node {
    config: Configuration,
    parent: Option<usize>,
}

/// The full result of a search, for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Search {
    pub outcome: Outcome,
    /// Number of configurations dequeued and expanded.
    pub explored: usize,
    /// The largest size the frontier reached.
    pub peak_frontier: usize,
    /// For an accepted input, the configurations from the start to the accepting one.
    pub witness: Option<Vec<Configuration>>,
}

/// A nondeterministic membership decider.
#[derive(Debug, Clone)]
pub struct Recognizer {
    automaton: Automaton,
    budget: SearchBudget,
}

impl Recognizer {
    pub fn new(automaton: Automaton) -> Self {
        Self {
            automaton,
            budget: SearchBudget::default(),
        }
    }

    /// Replaces the search budget.
    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn budget(&self) -> SearchBudget {
        self.budget
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// Decides whether the automaton accepts `input`.
    ///
    /// # Returns
    ///
    /// * `Outcome::Accepted` as soon as an accepting configuration is discovered.
    /// * `Outcome::Rejected` if the frontier empties first.
    /// * `Outcome::Exhausted` if the budget runs out first.
    pub fn accepts(&self, input: &[Symbol]) -> Outcome {
        self.search(input).outcome
    }

    /// Boolean form of [`Recognizer::accepts`]. `Exhausted` counts as non-acceptance.
    pub fn is_member(&self, input: &[Symbol]) -> bool {
        self.accepts(input).is_accepted()
    }

    /// Runs the search and returns the verdict together with search statistics and, when the
    /// input is accepted, a witness path.
    pub fn search(&self, input: &[Symbol]) -> Search {
        let table = self.automaton.table();
        let initial = self.automaton.initial_configuration();

        let mut nodes = vec![Node {
            config: initial.clone(),
            parent: None,
        }];
        let mut visited = HashSet::from([initial]);
        let mut frontier = VecDeque::from([0usize]);
        let mut explored = 0;
        let mut peak_frontier = 1;

        let finish = |outcome: Outcome, explored: usize, peak_frontier: usize, witness| {
            info!(%outcome, explored, peak_frontier, "search finished");
            Search {
                outcome,
                explored,
                peak_frontier,
                witness,
            }
        };

        while let Some(index) = frontier.pop_front() {
            if explored >= self.budget.max_steps {
                return finish(Outcome::Exhausted, explored, peak_frontier, None);
            }
            explored += 1;

            let config = &nodes[index].config;
            if self.automaton.is_accepting(config, input.len()) {
                let witness = Self::path(&nodes, index);
                return finish(Outcome::Accepted, explored, peak_frontier, Some(witness));
            }

            let stack_top = config.stack_top();
            let mut moves = Vec::with_capacity(2);
            if let Some(symbol) = input.get(config.position) {
                moves.push((InputSymbol::Symbol(symbol.clone()), true));
            }
            moves.push((InputSymbol::Epsilon, false));

            let mut successors = Vec::new();
            for (read, consumes) in moves {
                for effect in table.lookup(&config.state, &read, &stack_top) {
                    // A pop on an empty stack yields no successor.
                    if let Some(next) = config.successor(effect, consumes) {
                        successors.push(next);
                    }
                }
            }

            debug!(%config, successors = successors.len(), "expanded configuration");

            for next in successors {
                if !visited.insert(next.clone()) {
                    continue;
                }

                let accepting = self.automaton.is_accepting(&next, input.len());
                nodes.push(Node {
                    config: next,
                    parent: Some(index),
                });
                let discovered = nodes.len() - 1;

                if accepting {
                    let witness = Self::path(&nodes, discovered);
                    return finish(Outcome::Accepted, explored, peak_frontier, Some(witness));
                }
                frontier.push_back(discovered);
            }

            peak_frontier = peak_frontier.max(frontier.len());
            if frontier.len() > self.budget.max_frontier {
                return finish(Outcome::Exhausted, explored, peak_frontier, None);
            }
        }

        finish(Outcome::Rejected, explored, peak_frontier, None)
    }

    fn path(nodes: &[Node], mut index: usize) -> Vec<Configuration> {
        let mut path = vec![nodes[index].config.clone()];
        while let Some(parent) = nodes[index].parent {
            path.push(nodes[parent].config.clone());
            index = parent;
        }

        path.reverse();
        path
    }
}
