use crate::report::Diagnostic;

/// Output format for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Text,
    Json,
}

/// Format diagnostics as JSON.
pub fn format_json(diagnostics: &[Diagnostic]) -> String {
    serde_json::to_string_pretty(diagnostics).expect("diagnostics should be serializable")
}

/// Format diagnostics as plain text: one canonical
/// `<path>: Line <line>: <code> <message>` line per violation, in
/// discovery order.
pub fn format_text(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format diagnostics with terminal colors. Same lines as [`format_text`],
/// with the path, code, and message highlighted.
#[cfg(feature = "cli")]
pub fn format_pretty(diagnostics: &[Diagnostic]) -> String {
    use colored::Colorize;

    diagnostics
        .iter()
        .map(|d| {
            format!(
                "{}: {} {}: {} {}",
                d.path.display().to_string().bold(),
                "Line".dimmed(),
                d.line,
                d.code.to_string().yellow(),
                d.message
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
