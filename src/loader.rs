//! This module provides the `ProgramLoader` struct, responsible for loading automaton
//! definitions from JSON files and strings.

use crate::types::{Definition, PdaError};
use std::fs;
use std::path::{Path, PathBuf};

/// The file extension of persisted automaton definitions.
pub const DEFINITION_EXTENSION: &str = "json";

/// `ProgramLoader` is a utility struct for loading automaton definitions.
/// It provides methods to load definitions from individual files, from string content,
/// and to discover and load all `.json` files within a specified directory.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single definition from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Definition)` if the file is successfully read and parsed.
    /// * `Err(PdaError::FileError)` if the file cannot be read.
    /// * `Err(PdaError::ParseError)` if the file content is not a valid definition.
    pub fn load_program(path: &Path) -> Result<Definition, PdaError> {
        let content = fs::read_to_string(path).map_err(|e| {
            PdaError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Self::load_program_from_string(&content)
    }

    /// Loads a single definition from the provided JSON content.
    pub fn load_program_from_string(content: &str) -> Result<Definition, PdaError> {
        serde_json::from_str(content).map_err(|e| PdaError::ParseError(e.to_string()))
    }

    /// Loads all definition files (`.json` extension) from a given directory.
    ///
    /// Directories and files with other extensions are skipped. Every remaining file yields one
    /// result, so a broken file does not hide the others.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Definition), PdaError>> {
        if !directory.exists() {
            return vec![Err(PdaError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(PdaError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut results: Vec<_> = entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(PdaError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                if path.is_dir()
                    || path
                        .extension()
                        .is_none_or(|ext| ext != DEFINITION_EXTENSION)
                {
                    return None;
                }

                Some(Self::load_program(&path).map(|definition| (path, definition)))
            })
            .collect();

        // Directory iteration order is platform dependent.
        results.sort_by_key(|result| match result {
            Ok((path, _)) => Some(path.clone()),
            Err(_) => None,
        });

        results
    }

    /// Serializes a definition as pretty-printed JSON and writes it to `path`.
    pub fn save_program(path: &Path, definition: &Definition) -> Result<(), PdaError> {
        let content = serde_json::to_string_pretty(definition)
            .map_err(|e| PdaError::ParseError(e.to_string()))?;

        fs::write(path, content).map_err(|e| {
            PdaError::FileError(format!("Failed to write file {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{State, Symbol};
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const VALID_CONTENT: &str = r#"{
        "name": "Single a",
        "startState": "q0",
        "startStackSymbol": "Z",
        "acceptStates": ["q1"],
        "transitions": [
            {
                "fromState": "q0",
                "input": {"Symbol": "a"},
                "stackTop": {"Symbol": "Z"},
                "toState": "q1",
                "stackAction": "NoOp"
            }
        ]
    }"#;

    #[test]
    fn test_load_valid_program() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("single.json");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(VALID_CONTENT.as_bytes()).unwrap();

        let definition = ProgramLoader::load_program(&file_path).unwrap();
        assert_eq!(definition.name, "Single a");
        assert_eq!(definition.start_state, State::from("q0"));
        assert_eq!(definition.start_stack_symbol, Symbol::from('Z'));
        assert!(!definition.require_empty_stack);
        assert_eq!(definition.transitions.len(), 1);
    }

    #[test]
    fn test_load_invalid_program() {
        let result = ProgramLoader::load_program_from_string("This is not a valid definition");
        assert!(matches!(result, Err(PdaError::ParseError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = ProgramLoader::load_program(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(PdaError::FileError(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("saved.json");
        let definition = ProgramLoader::load_program_from_string(VALID_CONTENT).unwrap();

        ProgramLoader::save_program(&file_path, &definition).unwrap();
        assert_eq!(ProgramLoader::load_program(&file_path).unwrap(), definition);
    }

    #[test]
    fn test_load_programs_from_directory() {
        let dir = tempdir().unwrap();

        let valid_path = dir.path().join("valid.json");
        let mut valid_file = File::create(&valid_path).unwrap();
        valid_file.write_all(VALID_CONTENT.as_bytes()).unwrap();

        let invalid_path = dir.path().join("invalid.json");
        let mut invalid_file = File::create(&invalid_path).unwrap();
        invalid_file.write_all(b"{}").unwrap();

        // A non-.json file that should be ignored
        let ignored_path = dir.path().join("ignored.txt");
        let mut ignored_file = File::create(&ignored_path).unwrap();
        ignored_file.write_all(b"This file should be ignored").unwrap();

        let results = ProgramLoader::load_programs(dir.path());
        assert_eq!(results.len(), 2);

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(success_count, 1);
    }

    #[test]
    fn test_load_programs_missing_directory() {
        let dir = tempdir().unwrap();
        let results = ProgramLoader::load_programs(&dir.path().join("nope"));

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(PdaError::FileError(_))));
    }
}
