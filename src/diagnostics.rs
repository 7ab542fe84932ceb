//! Append-only diagnostic sink shared by the include resolver, the parser,
//! and the driver.
//!
//! Recording a diagnostic never aborts anything: callers decide whether an
//! error is fatal. The sink is `Sync`, so a single instance may be shared by
//! compilations running on different threads. Ordering between diagnostics
//! from concurrent writers is unspecified.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::token::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// A single reported message with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub file: Option<PathBuf>,
    pub span: Span,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:", file.display())?;
        }
        write!(f, "{}: {}: {}", self.span, self.severity, self.message)
    }
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Mutex<Vec<Diagnostic>>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error at `span`.
    pub fn error(&self, message: impl Into<String>, span: Span) {
        self.record(Severity::Error, message.into(), None, span);
    }

    /// Record an error located in `file`.
    pub fn error_in(&self, file: &Path, message: impl Into<String>, span: Span) {
        self.record(Severity::Error, message.into(), Some(file.to_path_buf()), span);
    }

    /// Record a warning located in `file`.
    pub fn warning_in(&self, file: &Path, message: impl Into<String>, span: Span) {
        self.record(Severity::Warning, message.into(), Some(file.to_path_buf()), span);
    }

    /// Record a diagnostic with an optional file.
    pub fn record(&self, severity: Severity, message: String, file: Option<PathBuf>, span: Span) {
        let diagnostic = Diagnostic {
            severity,
            message,
            file,
            span,
        };
        tracing::debug!(%diagnostic, "recorded diagnostic");
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }

    /// Snapshot of everything recorded so far, in recording order.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}
