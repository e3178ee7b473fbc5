//! Content checks on individual catalog values.
//!
//! - interpolation variables (`{{name}}`) must match the default language
//! - markup tags must be balanced
//! - values must not be empty
//!
//! The checks are independent; one value can fail several at once.

use std::fmt::Display;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::{
    catalog::Catalog,
    finding::{Finding, FindingKind, Report},
    keypath,
};

lazy_static! {
    static ref VARIABLE_REGEX: Regex =
        Regex::new(r"\{\{\s*-?\s*([A-Za-z_$][\w$]*(?:\.[\w$]+)*)\s*(?:,[^}]*)?\}\}")
            .expect("valid interpolation regex");
    static ref TAG_REGEX: Regex =
        Regex::new(r"<(/?)([A-Za-z0-9][\w-]*)((?:\s[^<>]*?)?)(/?)>").expect("valid tag regex");
}

/// Elements that never take a closing tag.
pub const VOID_ELEMENTS: [&str; 4] = ["br", "hr", "img", "input"];

/// Distinct interpolation variable names in `value`, in first-occurrence order.
pub fn extract_variables(value: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for captures in VARIABLE_REGEX.captures_iter(value) {
        let name = &captures[1];
        if !out.iter().any(|v| v == name) {
            out.push(name.to_string());
        }
    }
    out
}

/// Why a value's markup does not balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    /// `</found>` closed while `<expected>` was innermost.
    Mismatched { expected: String, found: String },
    /// `</name>` with nothing open.
    UnexpectedClose(String),
    /// `<name>` never closed.
    Unclosed(String),
}

impl Display for MarkupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkupError::Mismatched { expected, found } => {
                write!(f, "closing tag </{}> does not match open <{}>", found, expected)
            }
            MarkupError::UnexpectedClose(name) => write!(f, "closing tag </{}> has no opening tag", name),
            MarkupError::Unclosed(name) => write!(f, "tag <{}> is never closed", name),
        }
    }
}

/// Checks that tags in `value` nest properly.
///
/// Void elements and self-closed tags (`<x/>`) are ignored. Tag names are
/// compared case-sensitively.
pub fn check_markup(value: &str) -> Result<(), MarkupError> {
    let mut stack: Vec<&str> = Vec::new();
    for captures in TAG_REGEX.captures_iter(value) {
        let closing = !captures[1].is_empty();
        let self_closing = !captures[4].is_empty();
        let name = captures.get(2).map_or("", |m| m.as_str());
        if VOID_ELEMENTS.contains(&name) || (self_closing && !closing) {
            continue;
        }
        if !closing {
            stack.push(name);
            continue;
        }
        match stack.pop() {
            Some(open) if open == name => {}
            Some(open) => {
                return Err(MarkupError::Mismatched {
                    expected: open.to_string(),
                    found: name.to_string(),
                });
            }
            None => return Err(MarkupError::UnexpectedClose(name.to_string())),
        }
    }
    match stack.pop() {
        Some(open) => Err(MarkupError::Unclosed(open.to_string())),
        None => Ok(()),
    }
}

/// True for `null` and the empty string.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Compares the variables of one language value with its default-language counterpart.
pub fn check_variables(
    namespace: &str,
    language: &str,
    path: &str,
    default_value: &str,
    value: &str,
) -> Report {
    let expected = extract_variables(default_value);
    let actual = extract_variables(value);
    let mut report = Report::new();
    for name in expected.iter().filter(|n| !actual.contains(n)) {
        report.push(
            Finding::new(
                FindingKind::MissingVariable,
                namespace,
                language,
                path,
                format!("variable `{{{{{}}}}}` is missing", name),
            )
            .with_value(value)
            .with_variable(name.clone()),
        );
    }
    for name in actual.iter().filter(|n| !expected.contains(n)) {
        report.push(
            Finding::new(
                FindingKind::ExtraVariable,
                namespace,
                language,
                path,
                format!("variable `{{{{{}}}}}` is not in the default language", name),
            )
            .with_value(value)
            .with_variable(name.clone()),
        );
    }
    report
}

/// Runs every content check on `catalog`.
///
/// `default` is the default-language catalog of the same namespace; when it is
/// absent, or when `catalog` is the default itself, variables are not compared.
pub fn validate_catalog(catalog: &Catalog, default: Option<&Catalog>) -> Report {
    let mut report = Report::new();
    let reference = default.filter(|d| d.language != catalog.language);
    for (path, value) in keypath::leaves(&catalog.tree) {
        if is_empty_value(value) {
            report.push(Finding::new(
                FindingKind::EmptyValue,
                &catalog.namespace,
                &catalog.language,
                &path,
                "value is empty",
            ));
        }
        let Value::String(text) = value else {
            continue;
        };
        if let Err(e) = check_markup(text) {
            report.push(
                Finding::new(
                    FindingKind::UnbalancedMarkup,
                    &catalog.namespace,
                    &catalog.language,
                    &path,
                    e.to_string(),
                )
                .with_value(text.clone()),
            );
        }
        if let Some(Value::String(default_text)) = reference.and_then(|d| d.get(&path)) {
            report.merge(check_variables(
                &catalog.namespace,
                &catalog.language,
                &path,
                default_text,
                text,
            ));
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_variables() {
        assert_eq!(extract_variables("Hello {{name}}"), vec!["name"]);
        assert_eq!(
            extract_variables("{{ count }} items, {{date, short}} by {{user.name}} {{count}}"),
            vec!["count", "date", "user.name"]
        );
        assert!(extract_variables("{single} {{}} {{ 1bad }}").is_empty());
    }

    #[test]
    fn test_markup_balance() {
        assert_eq!(check_markup("<b>text</b>"), Ok(()));
        assert_eq!(check_markup("<br/>text"), Ok(()));
        assert_eq!(check_markup("<br>line<hr>"), Ok(()));
        assert_eq!(check_markup("<a href=\"/x\">link</a> and <0>zero</0>"), Ok(()));
        assert_eq!(check_markup("<Icon /> label"), Ok(()));
        assert_eq!(check_markup("plain 3 < 5 > 1"), Ok(()));
        assert_eq!(
            check_markup("<b>text"),
            Err(MarkupError::Unclosed("b".to_string()))
        );
        assert_eq!(
            check_markup("<b>text</i>"),
            Err(MarkupError::Mismatched {
                expected: "b".to_string(),
                found: "i".to_string()
            })
        );
        assert_eq!(
            check_markup("<B>text</b>"),
            Err(MarkupError::Mismatched {
                expected: "B".to_string(),
                found: "b".to_string()
            })
        );
        assert_eq!(
            check_markup("text</b>"),
            Err(MarkupError::UnexpectedClose("b".to_string()))
        );
    }

    #[test]
    fn test_missing_variable_exactly_once() {
        let report = check_variables("common", "uk", "greeting", "Hello {{name}}", "Привіт");
        assert_eq!(report.len(), 1);
        let finding = &report.findings()[0];
        assert_eq!(finding.kind, FindingKind::MissingVariable);
        assert_eq!(finding.variable.as_deref(), Some("name"));
        assert_eq!(finding.message, "variable `{{name}}` is missing");
    }

    #[test]
    fn test_extra_variable_is_warning() {
        let report = check_variables("common", "uk", "a", "Hello", "Привіт {{name}}");
        assert_eq!(report.count(FindingKind::ExtraVariable), 1);
        assert!(!report.has_errors());
    }

    #[test]
    fn test_validate_catalog_multiple_findings_per_leaf() {
        let en = Catalog::parse("en", "common", r#"{"a": "<b>{{name}}</b>", "e": "E"}"#).unwrap();
        let uk = Catalog::parse("uk", "common", r#"{"a": "<b>Привіт", "e": "", "n": null}"#).unwrap();
        let report = validate_catalog(&uk, Some(&en));
        assert_eq!(report.count(FindingKind::UnbalancedMarkup), 1);
        assert_eq!(report.count(FindingKind::MissingVariable), 1);
        assert_eq!(report.count(FindingKind::EmptyValue), 2);
        assert!(report.findings().iter().filter(|f| f.path == "a").count() == 2);
    }

    #[test]
    fn test_default_catalog_skips_variable_comparison() {
        let en = Catalog::parse("en", "common", r#"{"a": "Hello {{name}}"}"#).unwrap();
        assert!(validate_catalog(&en, Some(&en)).is_empty());
        assert!(validate_catalog(&en, None).is_empty());
    }
}
