//! Error wrapping with call-site frame capture
//!
//! `TracedError` wraps any error with an optional context message and a
//! backtrace recorded at wrap time. The report builder walks an entry's
//! error chain looking for one of these to turn its frames into the
//! packet's stack trace.

use backtrace::Backtrace;
use std::error::Error;
use std::fmt;
use std::fmt::Write as _;
use std::path::PathBuf;

/// A resolved call-site frame from a captured backtrace.
#[derive(Debug, Clone, PartialEq)]
pub struct CallFrame {
    /// Short function name, without the module path.
    pub function: String,
    /// Module path owning the function.
    pub module: String,
    /// Source file name, without directories.
    pub filename: String,
    /// Absolute path to the source file.
    pub abs_path: PathBuf,
    /// 1-based source line.
    pub lineno: u32,
}

/// An error wrapped with a context message and a recorded backtrace.
pub struct TracedError {
    message: Option<String>,
    source: Box<dyn Error + Send + Sync>,
    backtrace: Backtrace,
}

impl TracedError {
    /// Wrap `source` with a context message, recording the current call
    /// stack.
    pub fn wrap(
        source: impl Error + Send + Sync + 'static,
        message: impl Into<String>,
    ) -> Self {
        Self {
            message: Some(message.into()),
            source: Box::new(source),
            backtrace: Backtrace::new(),
        }
    }

    /// Wrap `source` without a message, recording the current call stack.
    pub fn new(source: impl Error + Send + Sync + 'static) -> Self {
        Self {
            message: None,
            source: Box::new(source),
            backtrace: Backtrace::new(),
        }
    }

    /// Resolved call-site frames, innermost first.
    ///
    /// Frames belonging to the capture machinery itself and frames the
    /// symbolizer could not fully resolve are skipped.
    pub fn frames(&self) -> Vec<CallFrame> {
        let mut frames = Vec::new();
        for frame in self.backtrace.frames() {
            for symbol in frame.symbols() {
                let (name, file, line) = match (symbol.name(), symbol.filename(), symbol.lineno())
                {
                    (Some(name), Some(file), Some(line)) => (name.to_string(), file, line),
                    _ => continue,
                };
                let path = strip_symbol_hash(&name);
                if is_capture_machinery(path) {
                    continue;
                }
                let (module, function) = split_function_path(path);
                frames.push(CallFrame {
                    function,
                    module,
                    filename: file
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    abs_path: file.to_path_buf(),
                    lineno: line,
                });
            }
        }
        frames
    }

    /// Fully-expanded display: the causal chain innermost first, followed
    /// by the recorded frames.
    pub fn verbose(&self) -> String {
        let mut out = String::new();
        if let Some(traced) = self.source.downcast_ref::<TracedError>() {
            out.push_str(&traced.verbose());
        } else {
            let _ = writeln!(out, "{}", self.source);
        }
        if let Some(message) = &self.message {
            let _ = writeln!(out, "{}", message);
        }
        for frame in self.frames() {
            let _ = writeln!(
                out,
                "{}::{}\n\t{}:{}",
                frame.module,
                frame.function,
                frame.abs_path.display(),
                frame.lineno
            );
        }
        out
    }
}

impl fmt::Display for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", message, self.source),
            None => write!(f, "{}", self.source),
        }
    }
}

impl fmt::Debug for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.verbose())
    }
}

impl Error for TracedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Drop the trailing `::h0123456789abcdef` disambiguator rustc appends to
/// mangled symbol names.
fn strip_symbol_hash(name: &str) -> &str {
    if let Some(idx) = name.rfind("::h") {
        let hash = &name[idx + 3..];
        if hash.len() == 16 && hash.bytes().all(|b| b.is_ascii_hexdigit()) {
            return &name[..idx];
        }
    }
    name
}

fn is_capture_machinery(path: &str) -> bool {
    path.starts_with("backtrace::") || path.contains("TracedError")
}

/// Split a demangled symbol path into (module, function).
fn split_function_path(path: &str) -> (String, String) {
    match path.rfind("::") {
        Some(idx) => (path[..idx].to_string(), path[idx + 2..].to_string()),
        None => (String::new(), path.to_string()),
    }
}
