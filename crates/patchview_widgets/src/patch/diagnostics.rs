//! Decode diagnostics
//!
//! Decoding is best effort: problems are collected here instead of aborting.

use std::fmt;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::widget::PatchWidget;

/// How bad a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Nothing could be decoded from the source
    Error,
    /// A line or field was skipped or defaulted
    Warning,
    /// Informational, e.g. a decorative object that was left out
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// One problem found while decoding
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// File the line came from; `None` for text decoded directly
    pub path: Option<PathBuf>,
    /// Line number (1-indexed); 0 when the problem concerns the whole source
    pub line: usize,
    pub message: String,
    /// The offending statement, if any
    pub source_line: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, line: usize, message: impl Into<String>) -> Self {
        Self {
            severity,
            path: None,
            line,
            message: message.into(),
            source_line: String::new(),
        }
    }

    pub fn warning(line: usize, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, line, message)
    }

    pub fn with_path(mut self, path: Option<PathBuf>) -> Self {
        self.path = path;
        self
    }

    pub fn with_source_line(mut self, source_line: impl Into<String>) -> Self {
        self.source_line = source_line.into();
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        match (&self.path, self.line) {
            (Some(path), 0) => write!(f, "[{}]", path.display())?,
            (Some(path), line) => write!(f, "[{}:{}]", path.display(), line)?,
            (None, 0) => {}
            (None, line) => write!(f, "[line {}]", line)?,
        }
        write!(f, ": {}", self.message)?;
        if !self.source_line.is_empty() && self.source_line.len() < 80 {
            write!(f, "\n  Near: \"{}\"", self.source_line)?;
        }
        Ok(())
    }
}

/// Widgets plus everything noticed while decoding them
#[derive(Debug, Default)]
pub struct DecodeOutput {
    pub widgets: Vec<PatchWidget>,
    pub diagnostics: Vec<Diagnostic>,
}

impl DecodeOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// Number of widgets including those nested in include groups
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        for widget in &self.widgets {
            widget.for_each_leaf(&mut |_| count += 1);
        }
        count
    }

    /// Log all diagnostics via tracing
    pub fn log_diagnostics(&self) {
        for d in &self.diagnostics {
            let path = d.path.as_ref().map(|p| p.display().to_string());
            match d.severity {
                Severity::Error | Severity::Warning => warn!(
                    severity = %d.severity,
                    path = ?path,
                    line = d.line,
                    message = %d.message,
                    "patch diagnostic"
                ),
                Severity::Info => debug!(
                    path = ?path,
                    line = d.line,
                    message = %d.message,
                    "patch diagnostic"
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let d = Diagnostic::warning(3, "too few tokens")
            .with_path(Some(PathBuf::from("main.pd")))
            .with_source_line("#X obj 1 2 tgl");
        assert_eq!(
            d.to_string(),
            "warning[main.pd:3]: too few tokens\n  Near: \"#X obj 1 2 tgl\""
        );

        let d = Diagnostic::new(Severity::Error, 0, "empty");
        assert_eq!(d.to_string(), "error: empty");
    }

    #[test]
    fn test_output_queries() {
        let output = DecodeOutput {
            widgets: Vec::new(),
            diagnostics: vec![
                Diagnostic::new(Severity::Info, 1, "decorative"),
                Diagnostic::warning(2, "bad"),
            ],
        };
        assert!(!output.has_errors());
        assert!(output.has_warnings());
        assert_eq!(output.warnings().count(), 1);
        assert_eq!(output.leaf_count(), 0);
    }
}
