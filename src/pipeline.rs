use std::path::Path;

use crate::analyzers::cst;
use crate::analyzers::line::LineScanner;
use crate::analyzers::LineRule;
use crate::error::CheckError;
use crate::report::Diagnostic;

/// Orchestrates the two checking phases for one file.
///
/// The line scan runs over every raw line first; the syntax walk runs over
/// the parsed structure second. Both phases append to the same sink, so all
/// line-scan diagnostics precede all tree-walk diagnostics for a file.
pub struct Checker {
    scanner: LineScanner,
}

impl Checker {
    pub fn new(line_rules: Vec<Box<dyn LineRule>>) -> Self {
        Checker {
            scanner: LineScanner::new(line_rules),
        }
    }

    pub fn with_defaults() -> Self {
        Checker {
            scanner: LineScanner::with_defaults(),
        }
    }

    /// Check one file's text, labelled with `path` in every diagnostic.
    ///
    /// Parsing happens before the line scan so a malformed file yields a
    /// [`CheckError::Parse`] and no partial diagnostics.
    pub fn check(&self, source: &str, path: &Path) -> Result<Vec<Diagnostic>, CheckError> {
        let nodes = cst::parse(source, path)?;

        let mut diagnostics = self.scanner.scan(source, path);
        diagnostics.extend(cst::walk(&nodes, path));
        Ok(diagnostics)
    }
}
