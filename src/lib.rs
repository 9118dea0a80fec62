pub mod analyzers;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod report;

use std::path::Path;

use error::CheckError;
use pipeline::Checker;
use report::Diagnostic;

/// Check a source string, labelling diagnostics with `path`.
pub fn check(source: &str, path: &Path) -> Result<Vec<Diagnostic>, CheckError> {
    let checker = Checker::with_defaults();
    checker.check(source, path)
}

/// Check the file at the given path and return its diagnostics.
pub fn check_file(path: &Path) -> Result<Vec<Diagnostic>, CheckError> {
    let source = std::fs::read_to_string(path).map_err(|source| CheckError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let checker = Checker::with_defaults();
    checker.check(&source, path)
}
