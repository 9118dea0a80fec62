use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::analyzers::{default_line_rules, LineRule};
use crate::report::{Diagnostic, RuleCode};

pub const MAX_LINE_LENGTH: usize = 79;
pub const INDENT_WIDTH: usize = 4;
pub const MAX_BLANK_RUN: usize = 2;

/// Transient state for one non-blank line, recreated per line.
///
/// The distinct-character set is a cheap existence pre-check so rules can
/// skip substring scans on lines that cannot possibly match.
pub struct LineContext<'a> {
    pub path: &'a Path,
    /// 1-based index in the original file.
    pub line_num: usize,
    pub text: &'a str,
    /// Count of immediately preceding blank lines.
    pub blank_before: usize,
    chars: HashSet<char>,
}

impl<'a> LineContext<'a> {
    pub fn new(path: &'a Path, line_num: usize, text: &'a str, blank_before: usize) -> Self {
        LineContext {
            path,
            line_num,
            text,
            blank_before,
            chars: text.chars().collect(),
        }
    }

    pub fn contains_char(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    /// Number of leading whitespace characters.
    pub fn indent_width(&self) -> usize {
        self.text.chars().take_while(|c| c.is_whitespace()).count()
    }

    /// Number of whitespace characters immediately before byte index `end`.
    pub fn whitespace_before(&self, end: usize) -> usize {
        self.text[..end]
            .chars()
            .rev()
            .take_while(|c| c.is_whitespace())
            .count()
    }

    fn diagnostic(&self, code: RuleCode, message: impl Into<String>) -> Diagnostic {
        Diagnostic::new(self.path, self.line_num, code, message)
    }
}

/// S001: line longer than 79 characters.
pub struct LineLength;

impl LineRule for LineLength {
    fn name(&self) -> &str {
        "line_length"
    }

    fn check(&self, ctx: &LineContext<'_>) -> Vec<Diagnostic> {
        if ctx.text.chars().count() > MAX_LINE_LENGTH {
            vec![ctx.diagnostic(RuleCode::S001, "is contrary to the requirements of PEP8")]
        } else {
            vec![]
        }
    }
}

/// S002: leading whitespace not a multiple of four.
pub struct Indentation;

impl LineRule for Indentation {
    fn name(&self) -> &str {
        "indentation"
    }

    fn check(&self, ctx: &LineContext<'_>) -> Vec<Diagnostic> {
        let starts_with_whitespace = ctx.text.chars().next().is_some_and(|c| c.is_whitespace());
        if starts_with_whitespace && ctx.indent_width() % INDENT_WIDTH != 0 {
            vec![ctx.diagnostic(RuleCode::S002, "Indentation is not a multiple of four")]
        } else {
            vec![]
        }
    }
}

/// S003: statement terminated with a semicolon.
///
/// With a comment on the line, only a `;` ending the code portion before the
/// first `#` counts; without one, only a `;` ending the raw line counts.
pub struct Semicolon;

impl LineRule for Semicolon {
    fn name(&self) -> &str {
        "semicolon"
    }

    fn check(&self, ctx: &LineContext<'_>) -> Vec<Diagnostic> {
        if !ctx.contains_char(';') {
            return vec![];
        }
        let fires = if ctx.contains_char('#') {
            let hash = ctx.text.find('#').unwrap_or(0);
            ctx.text[..hash].trim_end().ends_with(';')
        } else {
            ctx.text.ends_with(';')
        };
        if fires {
            vec![ctx.diagnostic(RuleCode::S003, "Unnecessary semicolon")]
        } else {
            vec![]
        }
    }
}

/// S004: inline comment not preceded by exactly two spaces.
///
/// Fires on more than two as well; the message wording is kept as-is.
pub struct CommentSpacing;

impl LineRule for CommentSpacing {
    fn name(&self) -> &str {
        "comment_spacing"
    }

    fn check(&self, ctx: &LineContext<'_>) -> Vec<Diagnostic> {
        if !ctx.contains_char('#') || ctx.text.starts_with('#') {
            return vec![];
        }
        let hash = ctx.text.find('#').unwrap_or(0);
        if ctx.whitespace_before(hash) != 2 {
            vec![ctx.diagnostic(
                RuleCode::S004,
                "Less than two spaces before inline comments",
            )]
        } else {
            vec![]
        }
    }
}

/// S005: TODO marker inside a comment.
pub struct TodoComment;

impl LineRule for TodoComment {
    fn name(&self) -> &str {
        "todo_comment"
    }

    fn check(&self, ctx: &LineContext<'_>) -> Vec<Diagnostic> {
        if !ctx.text.to_lowercase().contains("todo") || !ctx.contains_char('#') {
            return vec![];
        }
        let hash = ctx.text.find('#').unwrap_or(0);
        if ctx.text[hash..].to_lowercase().contains("todo") {
            vec![ctx.diagnostic(RuleCode::S005, "TODO found")]
        } else {
            vec![]
        }
    }
}

/// S006: more than two blank lines before this line.
pub struct BlankLineRun;

impl LineRule for BlankLineRun {
    fn name(&self) -> &str {
        "blank_line_run"
    }

    fn check(&self, ctx: &LineContext<'_>) -> Vec<Diagnostic> {
        if ctx.blank_before > MAX_BLANK_RUN {
            vec![ctx.diagnostic(
                RuleCode::S006,
                "More than two blank lines used before this line",
            )]
        } else {
            vec![]
        }
    }
}

/// Exactly one whitespace character between the keyword and the name.
static DECL_SPACING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(class|def)\s\w").expect("declaration pattern is valid"));

/// S007/S013: spacing around `class`/`def` declarations.
///
/// Two checks per keyword present in the line: the keyword must be followed
/// by exactly one whitespace character (S007), and the declared name must
/// not be followed by whitespace before `(` (S013) or, failing a `(`,
/// before `:` (S007). The S007/S013 split is part of the output contract.
pub struct DeclarationSpacing;

impl DeclarationSpacing {
    fn check_mode(&self, ctx: &LineContext<'_>, mode: &str, out: &mut Vec<Diagnostic>) {
        if !DECL_SPACING.is_match(ctx.text) {
            out.push(ctx.diagnostic(RuleCode::S007, format!("Too many spaces after '{mode}'")));
        }
        if ctx.contains_char('(') {
            let open = ctx.text.find('(').unwrap_or(0);
            if last_char_is_whitespace(&ctx.text[..open]) {
                out.push(ctx.diagnostic(
                    RuleCode::S013,
                    format!("Too many spaces after {mode} name"),
                ));
            }
        } else if ctx.contains_char(':') {
            let colon = ctx.text.find(':').unwrap_or(0);
            if last_char_is_whitespace(&ctx.text[..colon]) {
                out.push(ctx.diagnostic(
                    RuleCode::S007,
                    format!("Too many spaces after {mode} name"),
                ));
            }
        }
    }
}

fn last_char_is_whitespace(prefix: &str) -> bool {
    prefix.chars().next_back().is_some_and(|c| c.is_whitespace())
}

impl LineRule for DeclarationSpacing {
    fn name(&self) -> &str {
        "declaration_spacing"
    }

    fn check(&self, ctx: &LineContext<'_>) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        if ctx.text.contains("class") {
            self.check_mode(ctx, "class", &mut out);
        }
        if ctx.text.contains("def") {
            self.check_mode(ctx, "def", &mut out);
        }
        out
    }
}

/// Runs every line rule over each non-blank line of a file, tracking the
/// blank-line run across lines.
pub struct LineScanner {
    rules: Vec<Box<dyn LineRule>>,
}

impl LineScanner {
    pub fn new(rules: Vec<Box<dyn LineRule>>) -> Self {
        LineScanner { rules }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_line_rules())
    }

    /// Scan all lines in order. Diagnostics come out in line order and, per
    /// line, in rule-priority order.
    pub fn scan(&self, source: &str, path: &Path) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut blank_run = 0usize;

        for (idx, raw) in source.lines().enumerate() {
            if raw.is_empty() {
                blank_run += 1;
                continue;
            }
            let ctx = LineContext::new(path, idx + 1, raw, blank_run);
            for rule in &self.rules {
                diagnostics.extend(rule.check(&ctx));
            }
            blank_run = 0;
        }

        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> Vec<Diagnostic> {
        LineScanner::with_defaults().scan(source, Path::new("test.py"))
    }

    fn codes(source: &str) -> Vec<RuleCode> {
        scan(source).into_iter().map(|d| d.code).collect()
    }

    #[test]
    fn short_line_no_length_violation() {
        let source = "x = 1";
        assert!(!codes(source).contains(&RuleCode::S001));
    }

    #[test]
    fn line_at_limit_is_fine_but_one_over_fires() {
        let at_limit = "x".repeat(MAX_LINE_LENGTH);
        assert!(!codes(&at_limit).contains(&RuleCode::S001));

        let over = "x".repeat(MAX_LINE_LENGTH + 1);
        let found = codes(&over);
        assert_eq!(
            found.iter().filter(|c| **c == RuleCode::S001).count(),
            1,
            "expected exactly one S001; got {found:?}"
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 79 two-byte characters stay under the limit.
        let source = "é".repeat(MAX_LINE_LENGTH);
        assert!(!codes(&source).contains(&RuleCode::S001));
    }

    #[test]
    fn indentation_multiple_of_four_ok() {
        for indent in [0, 4, 8, 12] {
            let source = format!("{}pass", " ".repeat(indent));
            assert!(
                !codes(&source).contains(&RuleCode::S002),
                "indent {indent} should not fire"
            );
        }
    }

    #[test]
    fn odd_indentation_fires() {
        for indent in [1, 2, 3, 5, 7] {
            let source = format!("{}pass", " ".repeat(indent));
            assert!(
                codes(&source).contains(&RuleCode::S002),
                "indent {indent} should fire"
            );
        }
    }

    #[test]
    fn semicolon_at_end_fires() {
        assert!(codes("x = 1;").contains(&RuleCode::S003));
    }

    #[test]
    fn semicolon_inside_string_mid_line_ignored() {
        // No comment and the raw line does not end with ';'.
        assert!(!codes("greeting = \"hello; world\"").contains(&RuleCode::S003));
    }

    #[test]
    fn semicolon_before_comment_fires() {
        assert!(codes("x = 1;  # assign").contains(&RuleCode::S003));
        assert!(codes("x = 1 ;  # spaced").contains(&RuleCode::S003));
    }

    #[test]
    fn semicolon_only_in_comment_ignored() {
        assert!(!codes("x = 1  # this; that").contains(&RuleCode::S003));
    }

    #[test]
    fn comment_with_two_spaces_ok() {
        assert!(!codes("x = 1  # fine").contains(&RuleCode::S004));
    }

    #[test]
    fn comment_with_one_space_fires() {
        assert!(codes("x = 1 # tight").contains(&RuleCode::S004));
    }

    #[test]
    fn comment_with_three_spaces_also_fires() {
        assert!(codes("x = 1   # loose").contains(&RuleCode::S004));
    }

    #[test]
    fn block_comment_exempt_from_spacing() {
        assert!(!codes("# block comment").contains(&RuleCode::S004));
    }

    #[test]
    fn todo_in_comment_fires_case_insensitively() {
        assert!(codes("x = 1  # ToDo: later").contains(&RuleCode::S005));
        assert!(codes("# todo cleanup").contains(&RuleCode::S005));
    }

    #[test]
    fn todo_in_code_only_ignored() {
        assert!(!codes("todo_list = []").contains(&RuleCode::S005));
        // "todo" left of the comment, not inside it
        assert!(!codes("todo_list = []  # items").contains(&RuleCode::S005));
    }

    #[test]
    fn two_blank_lines_ok_three_fires_once() {
        assert!(!codes("x = 1\n\n\ny = 2").contains(&RuleCode::S006));

        let found = scan("x = 1\n\n\n\ny = 2");
        let s006: Vec<_> = found.iter().filter(|d| d.code == RuleCode::S006).collect();
        assert_eq!(s006.len(), 1);
        assert_eq!(s006[0].line, 5);
    }

    #[test]
    fn blank_run_resets_after_code_line() {
        // Two separate 2-blank runs never fire.
        assert!(!codes("a = 1\n\n\nb = 2\n\n\nc = 3").contains(&RuleCode::S006));
    }

    #[test]
    fn blank_run_at_start_of_file_counts() {
        let found = scan("\n\n\nx = 1");
        assert!(found.iter().any(|d| d.code == RuleCode::S006 && d.line == 4));
    }

    #[test]
    fn single_space_after_keyword_ok() {
        assert!(!codes("class Foo:").contains(&RuleCode::S007));
        assert!(!codes("def foo():").contains(&RuleCode::S007));
    }

    #[test]
    fn double_space_after_keyword_fires() {
        let found = scan("class  Foo:");
        assert!(found
            .iter()
            .any(|d| d.code == RuleCode::S007 && d.message == "Too many spaces after 'class'"));

        let found = scan("def  foo():");
        assert!(found
            .iter()
            .any(|d| d.code == RuleCode::S007 && d.message == "Too many spaces after 'def'"));
    }

    #[test]
    fn space_before_paren_is_s013() {
        let found = scan("def foo ():");
        assert!(found
            .iter()
            .any(|d| d.code == RuleCode::S013 && d.message == "Too many spaces after def name"));
        assert!(!found.iter().any(|d| d.code == RuleCode::S007));
    }

    #[test]
    fn space_before_colon_without_paren_is_s007() {
        let found = scan("class Foo :");
        assert!(found
            .iter()
            .any(|d| d.code == RuleCode::S007 && d.message == "Too many spaces after class name"));
        assert!(!found.iter().any(|d| d.code == RuleCode::S013));
    }

    #[test]
    fn method_line_checks_def_not_class() {
        let found = scan("    def  run(self):");
        assert!(found
            .iter()
            .any(|d| d.code == RuleCode::S007 && d.message == "Too many spaces after 'def'"));
    }

    #[test]
    fn diagnostics_per_line_follow_rule_priority() {
        // One line violating length, indentation, and comment spacing at once.
        let body = "y".repeat(MAX_LINE_LENGTH);
        let source = format!("   x = {body} # c");
        let found = scan(&source);
        let found_codes: Vec<RuleCode> = found.iter().map(|d| d.code).collect();
        assert_eq!(
            found_codes,
            vec![RuleCode::S001, RuleCode::S002, RuleCode::S004]
        );
    }

    #[test]
    fn blank_lines_have_no_context_of_their_own() {
        // Diagnostics only ever cite non-blank lines.
        let found = scan("\n\n\n\nx = 1 # c\n");
        assert!(found.iter().all(|d| d.line == 5));
    }
}
