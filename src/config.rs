//! Resolved compiler configuration handed to the driver.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// How far the driver takes each input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Parse and lower every input.
    #[default]
    Lower,
    /// Stop after parsing.
    SyntaxOnly,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub input_files: Vec<PathBuf>,
    pub include_paths: Vec<PathBuf>,
    /// Macro definitions; carried through for the tokenizer, never
    /// interpreted by the front end.
    pub macros: BTreeMap<String, String>,
    pub output: Option<PathBuf>,
    pub build_mode: BuildMode,
    pub verbose: bool,
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a `NAME` or `NAME=VALUE` definition. A bare name is defined
    /// as `"1"`; a later definition of the same name wins.
    pub fn define(&mut self, definition: &str) {
        let (name, value) = split_definition(definition);
        self.macros.insert(name.to_string(), value.to_string());
    }
}

fn split_definition(definition: &str) -> (&str, &str) {
    definition.split_once('=').unwrap_or((definition, "1"))
}
