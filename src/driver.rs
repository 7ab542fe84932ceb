//! Per-file compilation: load with includes, parse, lower.
//!
//! Every input is compiled independently. A failure in one file is
//! reported and the remaining files are still attempted.

use std::path::{Path, PathBuf};

use crate::Error;
use crate::ast::Program;
use crate::config::{BuildMode, Config};
use crate::diagnostics::Diagnostics;
use crate::include::IncludeResolver;
use crate::parser::Parser;
use crate::token::Span;
use crate::visitor::lower;

/// Extensions recognised as Argon sources.
pub const SOURCE_EXTENSIONS: [&str; 3] = ["ar", "arg", "argon"];

/// Result of compiling one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub path: PathBuf,
    pub program: Program,
    /// `None` in [`BuildMode::SyntaxOnly`].
    pub lowered: Option<String>,
}

#[derive(Debug, Default)]
pub struct Outcome {
    pub units: Vec<Unit>,
    pub failed: Vec<PathBuf>,
}

impl Outcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Lowered text of every successful unit, in input order.
    #[must_use]
    pub fn lowered(&self) -> String {
        self.units
            .iter()
            .filter_map(|unit| unit.lowered.as_deref())
            .collect()
    }
}

/// Compile a single file.
///
/// # Errors
///
/// Returns the first lexer, include, or parser error. Failed imports and
/// duplicate module declarations do not stop loading; they surface as
/// `Error::IncludeFailures` once the rest of the file has parsed.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn compile_file(path: &Path, config: &Config, diagnostics: &Diagnostics) -> Result<Unit, Error> {
    let mut resolver =
        IncludeResolver::new(diagnostics).with_include_paths(config.include_paths.iter().cloned());
    let tokens = resolver.load(path)?;

    let program = Parser::new(&tokens)
        .with_diagnostics(diagnostics)
        .in_file(path)
        .with_sources(resolver.sources())
        .parse()?;

    if resolver.error_count() > 0 {
        return Err(Error::IncludeFailures {
            path: path.to_path_buf(),
            count: resolver.error_count(),
        });
    }

    let lowered = match config.build_mode {
        BuildMode::Lower => Some(lower(&program)),
        BuildMode::SyntaxOnly => None,
    };

    Ok(Unit {
        path: path.to_path_buf(),
        program,
        lowered,
    })
}

/// Compile every input in `config`.
#[must_use]
pub fn run(config: &Config, diagnostics: &Diagnostics) -> Outcome {
    tracing::debug!(
        inputs = config.input_files.len(),
        macros = config.macros.len(),
        mode = ?config.build_mode,
        "starting compilation"
    );

    let mut outcome = Outcome::default();
    for path in &config.input_files {
        if !has_source_extension(path) {
            diagnostics.warning_in(path, "unrecognised source file extension", Span::START);
        }

        match compile_file(path, config, diagnostics) {
            Ok(unit) => outcome.units.push(unit),
            Err(e) => {
                if matches!(e, Error::Io { .. }) {
                    diagnostics.error_in(path, e.to_string(), Span::START);
                }
                outcome.failed.push(path.clone());
            }
        }
    }

    outcome
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}
