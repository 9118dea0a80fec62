pub mod cst;
pub mod line;

use crate::report::Diagnostic;
use self::line::LineContext;

/// Trait for per-line textual style rules.
///
/// Every rule sees every non-blank line; a rule decides from the line's own
/// text (plus the preceding blank-line count) whether to report. Rules never
/// look at other lines.
pub trait LineRule: Send + Sync {
    /// A short name identifying this rule.
    fn name(&self) -> &str;

    /// Inspect one non-blank line and return any violations found on it.
    fn check(&self, ctx: &LineContext<'_>) -> Vec<Diagnostic>;
}

/// Returns the default set of line rules, in emission-priority order.
///
/// The order here is the order diagnostics appear in for a single line, so
/// it is part of the output contract.
pub fn default_line_rules() -> Vec<Box<dyn LineRule>> {
    vec![
        Box::new(line::LineLength),
        Box::new(line::Indentation),
        Box::new(line::Semicolon),
        Box::new(line::CommentSpacing),
        Box::new(line::TodoComment),
        Box::new(line::BlankLineRun),
        Box::new(line::DeclarationSpacing),
    ]
}
