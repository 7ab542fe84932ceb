//! Include resolution: the stack of open files and circular-include
//! detection.
//!
//! [`IncludeResolver::enter`] and [`IncludeResolver::exit`] maintain a
//! stack of open files together with the set of absolute paths on that
//! stack. The two are always mutated together. [`IncludeResolver::load`]
//! builds on them to flatten a root file and everything it imports into a
//! single token stream for the parser, and records in a [`SourceMap`]
//! which file each token of that stream was read from.

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::Read as _;
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::Error;
use crate::diagnostics::Diagnostics;
use crate::lexer::tokenize;
use crate::token::{Span, Token, TokenKind};

/// Classifies an include error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncludeErrorKind {
    /// The target is already on the stack of files being processed.
    CircularInclude { requested: String },
    /// The target could not be opened.
    FileNotFound { requested: String, reason: String },
    /// `import` not followed by a string literal and `;`.
    MalformedImport,
    /// A second `module` declaration in the same file.
    DuplicateModule { name: String },
}

impl fmt::Display for IncludeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CircularInclude { requested } => {
                write!(f, "circular include detected: {requested}")
            }
            Self::FileNotFound { requested, reason } => {
                write!(f, "could not open include file: {requested} ({reason})")
            }
            Self::MalformedImport => {
                write!(f, "expected string literal and ';' after 'import'")
            }
            Self::DuplicateModule { name } => {
                write!(f, "module '{name}' declared in a file that already declares a module")
            }
        }
    }
}

/// Error produced while entering or flattening a file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {}:{}:{}", file.display(), span.line, span.column)]
pub struct IncludeError {
    pub kind: IncludeErrorKind,
    /// Absolute path of the file the error is located in.
    pub file: PathBuf,
    pub span: Span,
}

/// Origin of each token in a flattened stream.
///
/// Segments are contiguous token ranges in stream order. A file that
/// imports others contributes one segment before each import and one
/// after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMap {
    segments: Vec<(Range<usize>, PathBuf)>,
}

impl SourceMap {
    /// File the token at `index` was read from. `None` past the end of
    /// the stream.
    #[must_use]
    pub fn file_at(&self, index: usize) -> Option<&Path> {
        let at = self.segments.partition_point(|(range, _)| range.end <= index);
        self.segments
            .get(at)
            .filter(|(range, _)| range.contains(&index))
            .map(|(_, path)| path.as_path())
    }

    /// Segments in stream order.
    pub fn segments(&self) -> impl Iterator<Item = (&Range<usize>, &Path)> {
        self.segments.iter().map(|(range, path)| (range, path.as_path()))
    }

    fn record(&mut self, range: Range<usize>, path: &Path) {
        if !range.is_empty() {
            self.segments.push((range, path.to_path_buf()));
        }
    }
}

struct FileInfo {
    path: PathBuf,
    handle: File,
    line: usize,
    module_declared: bool,
}

pub struct IncludeResolver<'a> {
    stack: Vec<FileInfo>,
    processing: HashSet<PathBuf>,
    include_paths: Vec<PathBuf>,
    diagnostics: &'a Diagnostics,
    errors: usize,
    sources: SourceMap,
}

impl<'a> IncludeResolver<'a> {
    #[must_use]
    pub fn new(diagnostics: &'a Diagnostics) -> Self {
        Self {
            stack: Vec::new(),
            processing: HashSet::new(),
            include_paths: Vec::new(),
            diagnostics,
            errors: 0,
            sources: SourceMap::default(),
        }
    }

    /// Directories searched, in order, for imports not found next to the
    /// importing file.
    #[must_use]
    pub fn with_include_paths(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.include_paths.extend(paths);
        self
    }

    /// Open `path` and push it onto the stack.
    ///
    /// # Errors
    ///
    /// `CircularInclude` when the file is already being processed and
    /// `FileNotFound` when it cannot be opened. Both are reported to the
    /// diagnostics sink at line 1, column 1 of the target file. Nothing is
    /// pushed on failure.
    pub fn enter(&mut self, path: &Path) -> Result<(), IncludeError> {
        let absolute = absolute_path(path);

        if self.processing.contains(&absolute) {
            return Err(self.report(
                IncludeErrorKind::CircularInclude {
                    requested: path.display().to_string(),
                },
                absolute,
            ));
        }

        let handle = match File::open(&absolute) {
            Ok(handle) => handle,
            Err(e) => {
                return Err(self.report(
                    IncludeErrorKind::FileNotFound {
                        requested: path.display().to_string(),
                        reason: e.to_string(),
                    },
                    absolute,
                ));
            }
        };

        tracing::debug!(
            path = %absolute.display(),
            from_line = self.current_line(),
            depth = self.stack.len() + 1,
            "entering file"
        );
        self.processing.insert(absolute.clone());
        self.stack.push(FileInfo {
            path: absolute,
            handle,
            line: 1,
            module_declared: false,
        });
        Ok(())
    }

    /// Pop the current file, releasing its handle.
    ///
    /// Returns whether a parent file is still open.
    pub fn exit(&mut self) -> bool {
        let Some(info) = self.stack.pop() else {
            return false;
        };
        self.processing.remove(&info.path);
        tracing::debug!(path = %info.path.display(), depth = self.stack.len(), "leaving file");
        !self.stack.is_empty()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn current_file(&self) -> Option<&Path> {
        self.stack.last().map(|info| info.path.as_path())
    }

    #[must_use]
    pub fn current_line(&self) -> Option<usize> {
        self.stack.last().map(|info| info.line)
    }

    /// Number of errors this resolver has reported.
    #[must_use]
    pub const fn error_count(&self) -> usize {
        self.errors
    }

    /// Origins of the tokens returned by the last [`Self::load`].
    #[must_use]
    pub const fn sources(&self) -> &SourceMap {
        &self.sources
    }

    #[must_use]
    pub fn is_processing(&self, path: &Path) -> bool {
        self.processing.contains(&absolute_path(path))
    }

    /// Tokenize `path` with every `import "file";` directive replaced by
    /// the tokens of the imported file.
    ///
    /// Failed imports are reported and skipped. The result ends with
    /// exactly one end-of-file token, taken from the root file. The origin
    /// of every returned token is available from [`Self::sources`].
    ///
    /// # Errors
    ///
    /// Returns an error if the root file cannot be entered or read, if any
    /// file fails to tokenize, or on a malformed import directive.
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn load(&mut self, path: &Path) -> Result<Vec<Token>, Error> {
        self.sources = SourceMap::default();
        self.enter(path)?;
        let root = self.current_file().map(Path::to_path_buf);
        let mut tokens = Vec::new();
        let result = self.flatten_current(&mut tokens);
        self.exit();

        let start = tokens.len();
        tokens.push(result?);
        if let Some(root) = root {
            self.sources.record(start..tokens.len(), &root);
        }
        Ok(tokens)
    }

    /// Splice the current top-of-stack file into `out`, returning its
    /// end-of-file token.
    fn flatten_current(&mut self, out: &mut Vec<Token>) -> Result<Token, Error> {
        let (path, source) = self.read_current()?;

        let tokens = tokenize(&source).map_err(|e| {
            self.diagnostics.error_in(&path, e.kind.to_string(), e.span);
            Error::from(e)
        })?;

        let mut segment_start = out.len();
        let mut iter = tokens.into_iter();
        while let Some(token) = iter.next() {
            match token.kind {
                TokenKind::EndOfFile => {
                    self.sources.record(segment_start..out.len(), &path);
                    return Ok(token);
                }
                TokenKind::Import => {
                    let target = match (iter.next(), iter.next()) {
                        (Some(target), Some(semi))
                            if target.kind == TokenKind::String
                                && semi.kind == TokenKind::Semicolon =>
                        {
                            target
                        }
                        _ => {
                            return Err(self
                                .report_at(IncludeErrorKind::MalformedImport, path.clone(), token.span)
                                .into());
                        }
                    };
                    self.sources.record(segment_start..out.len(), &path);
                    self.import(&target, out)?;
                    segment_start = out.len();
                }
                TokenKind::Module => {
                    self.declare_module(&path, &token, iter.as_slice().first());
                    out.push(token);
                }
                _ => out.push(token),
            }
        }

        self.sources.record(segment_start..out.len(), &path);
        Ok(Token::new(TokenKind::EndOfFile, "", Span::START))
    }

    fn read_current(&mut self) -> Result<(PathBuf, String), Error> {
        let Some(info) = self.stack.last_mut() else {
            return Err(Error::Io {
                path: PathBuf::new(),
                source: std::io::Error::other("no file open"),
            });
        };
        let mut source = String::new();
        info.handle
            .read_to_string(&mut source)
            .map_err(|e| Error::Io {
                path: info.path.clone(),
                source: e,
            })?;
        Ok((info.path.clone(), source))
    }

    fn import(&mut self, target: &Token, out: &mut Vec<Token>) -> Result<(), Error> {
        if let Some(info) = self.stack.last_mut() {
            info.line = target.span.line;
        }

        let requested = unquote(&target.lexeme);
        let resolved = self.resolve(requested);
        if self.enter(&resolved).is_err() {
            // already reported; the importing file carries on
            return Ok(());
        }

        let result = self.flatten_current(out);
        self.exit();
        result.map(|_| ())
    }

    fn declare_module(&mut self, path: &Path, keyword: &Token, name: Option<&Token>) {
        let Some(info) = self.stack.last_mut() else {
            return;
        };
        if !info.module_declared {
            info.module_declared = true;
            return;
        }
        let name = name.map(|t| t.lexeme.clone()).unwrap_or_default();
        self.report_at(
            IncludeErrorKind::DuplicateModule { name },
            path.to_path_buf(),
            keyword.span,
        );
    }

    /// Next to the importing file first, then each include path. Falls
    /// back to the importing file's directory so a miss is reported there.
    fn resolve(&self, requested: &str) -> PathBuf {
        let requested = Path::new(requested);
        if requested.is_absolute() {
            return requested.to_path_buf();
        }

        let local = self
            .current_file()
            .and_then(Path::parent)
            .map_or_else(|| requested.to_path_buf(), |dir| dir.join(requested));
        if local.exists() {
            return local;
        }

        self.include_paths
            .iter()
            .map(|dir| dir.join(requested))
            .find(|candidate| candidate.exists())
            .unwrap_or(local)
    }

    fn report(&mut self, kind: IncludeErrorKind, file: PathBuf) -> IncludeError {
        self.report_at(kind, file, Span::START)
    }

    fn report_at(&mut self, kind: IncludeErrorKind, file: PathBuf, span: Span) -> IncludeError {
        self.errors += 1;
        self.diagnostics.error_in(&file, kind.to_string(), span);
        IncludeError { kind, file, span }
    }
}

/// Canonical form when the file exists, lexical absolute form otherwise.
fn absolute_path(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn unquote(lexeme: &str) -> &str {
    lexeme
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(lexeme)
}
