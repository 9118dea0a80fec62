use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The closed set of rule codes the checker can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleCode {
    S001,
    S002,
    S003,
    S004,
    S005,
    S006,
    S007,
    S008,
    S009,
    S010,
    S011,
    S012,
    S013,
}

impl RuleCode {
    pub fn all() -> &'static [RuleCode] {
        &[
            RuleCode::S001,
            RuleCode::S002,
            RuleCode::S003,
            RuleCode::S004,
            RuleCode::S005,
            RuleCode::S006,
            RuleCode::S007,
            RuleCode::S008,
            RuleCode::S009,
            RuleCode::S010,
            RuleCode::S011,
            RuleCode::S012,
            RuleCode::S013,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCode::S001 => "S001",
            RuleCode::S002 => "S002",
            RuleCode::S003 => "S003",
            RuleCode::S004 => "S004",
            RuleCode::S005 => "S005",
            RuleCode::S006 => "S006",
            RuleCode::S007 => "S007",
            RuleCode::S008 => "S008",
            RuleCode::S009 => "S009",
            RuleCode::S010 => "S010",
            RuleCode::S011 => "S011",
            RuleCode::S012 => "S012",
            RuleCode::S013 => "S013",
        }
    }
}

impl std::fmt::Display for RuleCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single reported rule violation.
///
/// Diagnostics are append-only and never deduplicated; their order in the
/// sink is the order they were discovered in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Path of the file the violation was found in.
    pub path: PathBuf,
    /// 1-based line number in the original file.
    pub line: usize,
    /// Which rule fired.
    pub code: RuleCode,
    /// Human-readable description of the violation.
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        path: impl Into<PathBuf>,
        line: usize,
        code: RuleCode,
        message: impl Into<String>,
    ) -> Self {
        Diagnostic {
            path: path.into(),
            line,
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: Line {}: {} {}",
            self.path.display(),
            self.line,
            self.code,
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_line_format() {
        let diag = Diagnostic::new("test.py", 3, RuleCode::S002, "Indentation is not a multiple of four");
        assert_eq!(
            diag.to_string(),
            "test.py: Line 3: S002 Indentation is not a multiple of four"
        );
    }

    #[test]
    fn code_set_is_closed_and_distinct() {
        let codes = RuleCode::all();
        assert_eq!(codes.len(), 13);
        let mut strings: Vec<&str> = codes.iter().map(|c| c.as_str()).collect();
        strings.dedup();
        assert_eq!(strings.len(), 13);
        assert_eq!(codes[0].as_str(), "S001");
        assert_eq!(codes[12].as_str(), "S013");
    }

    #[test]
    fn diagnostic_serializes_with_code_string() {
        let diag = Diagnostic::new("a.py", 1, RuleCode::S005, "TODO found");
        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"S005\""));
        assert!(json.contains("\"TODO found\""));
    }
}
