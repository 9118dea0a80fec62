use std::path::PathBuf;

use thiserror::Error;

/// Fatal per-file failures.
///
/// Rule violations are never errors — they are [`crate::report::Diagnostic`]s.
/// A `CheckError` means the file could not be analyzed at all and produced no
/// diagnostics.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} could not be parsed as Python")]
    Parse { path: PathBuf },
}

impl CheckError {
    /// The file the failure refers to.
    pub fn path(&self) -> &PathBuf {
        match self {
            CheckError::Io { path, .. } => path,
            CheckError::Parse { path } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_names_the_file() {
        let err = CheckError::Parse {
            path: PathBuf::from("bad.py"),
        };
        assert_eq!(err.to_string(), "bad.py could not be parsed as Python");
        assert_eq!(err.path(), &PathBuf::from("bad.py"));
    }

    #[test]
    fn io_error_keeps_source() {
        use std::error::Error;
        let err = CheckError::Io {
            path: PathBuf::from("gone.py"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().contains("gone.py"));
        assert!(err.source().is_some());
    }
}
