use std::path::Path;

use tree_sitter::{Node, Parser};

use crate::error::CheckError;
use crate::report::{Diagnostic, RuleCode};

/// Coarse classification of a default-value expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultKind {
    Literal,
    MutableContainer,
    Other,
}

/// A structural node relevant to the naming checks, lowered from the
/// tree-sitter CST in document (pre-)order.
///
/// Any parser able to produce these variants could feed the walker; nothing
/// below [`walk`] depends on tree-sitter.
#[derive(Debug, Clone)]
pub enum SyntaxNode {
    ClassDecl {
        line: usize,
        name: String,
    },
    FunctionDecl {
        line: usize,
        name: String,
        /// Positional parameter identifiers, in declaration order.
        /// Keyword-only parameters and splats are not included.
        params: Vec<String>,
        /// Default values of positional parameters, in declaration order.
        defaults: Vec<DefaultKind>,
    },
    NameBinding {
        line: usize,
        name: String,
    },
}

/// Parse `source` as Python and lower it to a flat pre-order node list.
///
/// A tree containing syntax errors is a fatal per-file failure; no partial
/// node list is returned.
pub fn parse(source: &str, path: &Path) -> Result<Vec<SyntaxNode>, CheckError> {
    let parse_failure = || CheckError::Parse {
        path: path.to_path_buf(),
    };

    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|_| parse_failure())?;
    let tree = parser
        .parse(source.as_bytes(), None)
        .ok_or_else(parse_failure)?;
    if tree.root_node().has_error() {
        return Err(parse_failure());
    }

    let mut nodes = Vec::new();
    lower(tree.root_node(), source.as_bytes(), &mut nodes);
    Ok(nodes)
}

/// Recursive descent over the CST. Every construct is entered
/// unconditionally; nested classes, functions, and blocks are not pruned.
fn lower(node: Node<'_>, src: &[u8], out: &mut Vec<SyntaxNode>) {
    match node.kind() {
        "class_definition" => {
            if let Some(name) = field_text(node, "name", src) {
                out.push(SyntaxNode::ClassDecl {
                    line: node.start_position().row + 1,
                    name,
                });
            }
        }
        "function_definition" => {
            if let Some(name) = field_text(node, "name", src) {
                let (params, defaults) = lower_parameters(node, src);
                out.push(SyntaxNode::FunctionDecl {
                    line: node.start_position().row + 1,
                    name,
                    params,
                    defaults,
                });
            }
        }
        "assignment" | "augmented_assignment" | "for_statement" => {
            if let Some(left) = node.child_by_field_name("left") {
                collect_targets(left, src, out);
            }
        }
        "named_expression" => {
            if let Some(target) = node.child_by_field_name("name") {
                collect_targets(target, src, out);
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        lower(child, src, out);
    }
}

/// Identifiers bound by an assignment-like target, in source order.
///
/// Attribute and subscript targets bind no plain name and are skipped.
fn collect_targets(node: Node<'_>, src: &[u8], out: &mut Vec<SyntaxNode>) {
    match node.kind() {
        "identifier" => {
            if let Ok(name) = node.utf8_text(src) {
                out.push(SyntaxNode::NameBinding {
                    line: node.start_position().row + 1,
                    name: name.to_string(),
                });
            }
        }
        "pattern_list" | "tuple_pattern" | "list_pattern" | "list_splat_pattern" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                collect_targets(child, src, out);
            }
        }
        _ => {}
    }
}

/// Extract positional parameter names and default kinds from a
/// `function_definition`.
///
/// Collection stops at the first `*`, `*args`, or `**kwargs`: parameters
/// after it are keyword-only and outside the positional checks, mirroring
/// how defaults align with positional parameters.
fn lower_parameters(func: Node<'_>, src: &[u8]) -> (Vec<String>, Vec<DefaultKind>) {
    let mut params = Vec::new();
    let mut defaults = Vec::new();

    let Some(parameters) = func.child_by_field_name("parameters") else {
        return (params, defaults);
    };

    let mut cursor = parameters.walk();
    for param in parameters.named_children(&mut cursor) {
        match param.kind() {
            "identifier" => {
                if let Ok(name) = param.utf8_text(src) {
                    params.push(name.to_string());
                }
            }
            "typed_parameter" => {
                let mut inner = param.walk();
                let Some(pattern) = param.named_children(&mut inner).next() else {
                    continue;
                };
                match pattern.kind() {
                    "identifier" => {
                        if let Ok(name) = pattern.utf8_text(src) {
                            params.push(name.to_string());
                        }
                    }
                    // A typed splat still ends the positional section.
                    "list_splat_pattern" | "dictionary_splat_pattern" => break,
                    _ => {}
                }
            }
            "default_parameter" | "typed_default_parameter" => {
                if let Some(name) = field_text(param, "name", src) {
                    params.push(name);
                }
                if let Some(value) = param.child_by_field_name("value") {
                    defaults.push(classify_default(value));
                }
            }
            "list_splat_pattern" | "dictionary_splat_pattern" | "keyword_separator" => break,
            _ => {}
        }
    }

    (params, defaults)
}

fn classify_default(value: Node<'_>) -> DefaultKind {
    match value.kind() {
        "list" => DefaultKind::MutableContainer,
        "string" | "concatenated_string" | "integer" | "float" | "true" | "false" | "none" => {
            DefaultKind::Literal
        }
        _ => DefaultKind::Other,
    }
}

fn field_text(node: Node<'_>, field: &str, src: &[u8]) -> Option<String> {
    node.child_by_field_name(field)
        .and_then(|n| n.utf8_text(src).ok())
        .map(str::to_string)
}

/// CamelCase: an uppercase ASCII first letter and no underscores.
fn is_camel_case(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase()) && !name.contains('_')
}

/// The snake_case checks only reject an uppercase first letter.
fn starts_uppercase(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Visit every lowered node and emit naming diagnostics in traversal order.
pub fn walk(nodes: &[SyntaxNode], path: &Path) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for node in nodes {
        match node {
            SyntaxNode::ClassDecl { line, name } => {
                if !is_camel_case(name) {
                    diagnostics.push(Diagnostic::new(
                        path,
                        *line,
                        RuleCode::S008,
                        format!("Class name '{name}' should use CamelCase"),
                    ));
                }
            }
            SyntaxNode::FunctionDecl {
                line,
                name,
                params,
                defaults,
            } => {
                if starts_uppercase(name) {
                    diagnostics.push(Diagnostic::new(
                        path,
                        *line,
                        RuleCode::S009,
                        format!("Function name '{name}' should use snake_case"),
                    ));
                }
                for param in params {
                    if starts_uppercase(param) {
                        diagnostics.push(Diagnostic::new(
                            path,
                            *line,
                            RuleCode::S010,
                            format!("Argument name {param} should be written in snake_case"),
                        ));
                    }
                }
                for default in defaults {
                    if *default == DefaultKind::MutableContainer {
                        diagnostics.push(Diagnostic::new(
                            path,
                            *line,
                            RuleCode::S012,
                            "Default argument value is mutable",
                        ));
                    }
                }
            }
            SyntaxNode::NameBinding { line, name } => {
                if starts_uppercase(name) {
                    diagnostics.push(Diagnostic::new(
                        path,
                        *line,
                        RuleCode::S011,
                        format!("Variable {name} should be snake_case"),
                    ));
                }
            }
        }
    }

    diagnostics
}
