//! A catalog of built-in example automata.
//!
//! The catalog is immutable. Its definitions are values that callers pass to
//! [`crate::Automaton::from_definition`]; nothing here holds a running automaton.

use crate::loader::ProgramLoader;
use crate::types::{Definition, PdaError};
use std::collections::HashSet;
use tracing::warn;

// Embedded example definitions
const PROGRAM_TEXTS: [&str; 5] = [
    include_str!("../programs/anbn.json"),
    include_str!("../programs/anbn-empty-stack.json"),
    include_str!("../programs/balanced-parentheses.json"),
    include_str!("../programs/wcwr.json"),
    include_str!("../programs/even-palindromes.json"),
];

lazy_static::lazy_static! {
    /// Every embedded definition that parsed, in catalog order.
    pub static ref PROGRAMS: Vec<(&'static str, Definition)> = PROGRAM_TEXTS
        .iter()
        .filter_map(|text| match ProgramLoader::load_program_from_string(text) {
            Ok(definition) => Some((*text, definition)),
            Err(e) => {
                warn!(error = %e, "failed to parse built-in program");
                None
            }
        })
        .collect();
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        PROGRAMS.len()
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<Definition, PdaError> {
        PROGRAMS
            .get(index)
            .map(|(_, definition)| definition.clone())
            .ok_or_else(|| {
                PdaError::ValidationError(format!("Program index {} out of range", index))
            })
    }

    /// Get a program by its name, ignoring case
    pub fn get_program_by_name(name: &str) -> Result<Definition, PdaError> {
        PROGRAMS
            .iter()
            .find(|(_, definition)| definition.name.eq_ignore_ascii_case(name))
            .map(|(_, definition)| definition.clone())
            .ok_or_else(|| PdaError::ValidationError(format!("Program '{}' not found", name)))
    }

    /// List all program names
    pub fn list_program_names() -> Vec<String> {
        PROGRAMS
            .iter()
            .map(|(_, definition)| definition.name.clone())
            .collect()
    }

    /// Search for programs by name
    pub fn search_programs(query: &str) -> Vec<usize> {
        let query = query.to_lowercase();

        PROGRAMS
            .iter()
            .enumerate()
            .filter(|(_, (_, definition))| definition.name.to_lowercase().contains(&query))
            .map(|(index, _)| index)
            .collect()
    }

    /// Get the original JSON text of a program by its index
    pub fn get_program_text_by_index(index: usize) -> Result<&'static str, PdaError> {
        PROGRAMS.get(index).map(|(text, _)| *text).ok_or_else(|| {
            PdaError::ValidationError(format!("Program text index {} out of range", index))
        })
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, PdaError> {
        let definition = Self::get_program_by_index(index)?;

        let states: HashSet<_> = definition
            .transitions
            .iter()
            .flat_map(|entry| [&entry.from_state, &entry.to_state])
            .chain(std::iter::once(&definition.start_state))
            .collect();

        // Deterministic: keys are unique, and no (state, stack top) pair has both an epsilon
        // rule and a rule consuming input.
        let mut keys = HashSet::new();
        let mut epsilon_guards = HashSet::new();
        let mut input_guards = HashSet::new();
        let mut unique_keys = true;
        for entry in &definition.transitions {
            unique_keys &= keys.insert((&entry.from_state, &entry.input, &entry.stack_top));

            let guard = (&entry.from_state, &entry.stack_top);
            if entry.input.is_epsilon() {
                epsilon_guards.insert(guard);
            } else {
                input_guards.insert(guard);
            }
        }
        let deterministic = unique_keys && epsilon_guards.is_disjoint(&input_guards);

        Ok(ProgramInfo {
            index,
            name: definition.name.clone(),
            start_state: definition.start_state.to_string(),
            state_count: states.len(),
            transition_count: definition.transitions.len(),
            deterministic,
            epsilon_moves: definition
                .transitions
                .iter()
                .any(|entry| entry.input.is_epsilon()),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub start_state: String,
    pub state_count: usize,
    pub transition_count: usize,
    pub deterministic: bool,
    pub epsilon_moves: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Automaton;
    use crate::types::{Outcome, Symbol};

    fn recognize(name: &str, word: &str) -> Outcome {
        let definition = ProgramManager::get_program_by_name(name).unwrap();
        let automaton = Automaton::from_definition(&definition).unwrap();
        automaton.recognizer().accepts(&Symbol::word(word))
    }

    #[test]
    fn test_all_programs_are_loaded() {
        assert_eq!(ProgramManager::get_program_count(), PROGRAM_TEXTS.len());
    }

    #[test]
    fn test_all_programs_are_valid() {
        for i in 0..ProgramManager::get_program_count() {
            let definition = ProgramManager::get_program_by_index(i).unwrap();
            assert!(
                Automaton::from_definition(&definition).is_ok(),
                "Program '{}' is invalid",
                definition.name
            );
        }
    }

    #[test]
    fn test_program_names() {
        let names = ProgramManager::list_program_names();
        assert!(names.contains(&"a^n b^n".to_string()));
        assert!(names.contains(&"Balanced parentheses".to_string()));
        assert!(names.contains(&"Even palindromes".to_string()));
    }

    #[test]
    fn test_anbn() {
        for name in ["a^n b^n", "a^n b^n (empty stack)"] {
            assert_eq!(recognize(name, "ab"), Outcome::Accepted);
            assert_eq!(recognize(name, "aaabbb"), Outcome::Accepted);
            assert_eq!(recognize(name, "aabbb"), Outcome::Rejected);
            assert_eq!(recognize(name, ""), Outcome::Rejected);
        }
    }

    #[test]
    fn test_balanced_parentheses() {
        let name = "Balanced parentheses";
        assert_eq!(recognize(name, ""), Outcome::Accepted);
        assert_eq!(recognize(name, "(()())"), Outcome::Accepted);
        assert_eq!(recognize(name, "(()"), Outcome::Rejected);
        assert_eq!(recognize(name, ")("), Outcome::Rejected);
    }

    #[test]
    fn test_wcwr() {
        let name = "w c w^R";
        assert_eq!(recognize(name, "c"), Outcome::Accepted);
        assert_eq!(recognize(name, "abcba"), Outcome::Accepted);
        assert_eq!(recognize(name, "abcab"), Outcome::Rejected);
        assert_eq!(recognize(name, "abba"), Outcome::Rejected);
    }

    #[test]
    fn test_even_palindromes() {
        let name = "Even palindromes";
        assert_eq!(recognize(name, ""), Outcome::Accepted);
        assert_eq!(recognize(name, "abba"), Outcome::Accepted);
        assert_eq!(recognize(name, "baabbaab"), Outcome::Accepted);
        assert_eq!(recognize(name, "aba"), Outcome::Rejected);
        assert_eq!(recognize(name, "abab"), Outcome::Rejected);
    }

    #[test]
    fn test_program_manager_get_program_by_index() {
        assert!(ProgramManager::get_program_by_index(0).is_ok());
        assert!(ProgramManager::get_program_by_index(999).is_err());
        assert!(ProgramManager::get_program_text_by_index(0)
            .unwrap()
            .contains("startState"));
    }

    #[test]
    fn test_program_manager_get_program_by_name() {
        assert!(ProgramManager::get_program_by_name("balanced PARENTHESES").is_ok());
        assert!(ProgramManager::get_program_by_name("Nonexistent").is_err());
    }

    #[test]
    fn test_program_manager_get_program_info() {
        let info = ProgramManager::get_program_info(0).unwrap();
        assert_eq!(info.index, 0);
        assert_eq!(info.name, "a^n b^n");
        assert_eq!(info.start_state, "q0");
        assert_eq!(info.state_count, 3);
        assert_eq!(info.transition_count, 7);
        assert!(info.deterministic);
        assert!(!info.epsilon_moves);

        let palindromes = ProgramManager::search_programs("palindromes")[0];
        let info = ProgramManager::get_program_info(palindromes).unwrap();
        assert!(!info.deterministic);
        assert!(info.epsilon_moves);

        assert!(ProgramManager::get_program_info(999).is_err());
    }

    #[test]
    fn test_program_manager_search_programs() {
        assert_eq!(ProgramManager::search_programs("a^n").len(), 2);
        assert!(ProgramManager::search_programs("nonexistent").is_empty());
    }
}
