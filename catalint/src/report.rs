//! Rendering a [`Report`] for people and for machines, and deciding the run outcome.

use serde::Serialize;
use serde_json::json;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{
    error::Error,
    finding::{Finding, FindingKind, Report, Severity},
};

/// Column budget for values shown in the detailed listing.
const VALUE_WIDTH: usize = 60;

/// Context about the run shown in the report header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub namespaces: usize,
    pub languages: usize,
    pub files_scanned: usize,
    pub keys_referenced: usize,
}

/// Process exit code for a finished run: 1 if any error-severity finding exists.
pub fn exit_code(report: &Report) -> i32 {
    if report.has_errors() { 1 } else { 0 }
}

/// Shortens `value` to at most `width` display columns, appending `...` when cut.
pub fn truncate_display(value: &str, width: usize) -> String {
    let flat = value.replace('\n', "\\n");
    if flat.width() <= width {
        return flat;
    }
    let budget = width.saturating_sub(3);
    let mut used = 0;
    let mut out = String::new();
    for ch in flat.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push_str("...");
    out
}

fn render_finding(finding: &Finding) -> String {
    let mut line = format!("    {:<18} {}: {}", finding.kind.as_str(), finding.path, finding.message);
    if let Some(value) = &finding.value {
        line.push_str(&format!(" (\"{}\")", truncate_display(value, VALUE_WIDTH)));
    }
    line
}

fn render_groups(lines: &mut Vec<String>, report: &Report, severity: Severity, max_items: usize) {
    let label = match severity {
        Severity::Error => "Errors",
        Severity::Warning => "Warnings",
    };
    for ((namespace, language), items) in report.grouped(severity) {
        lines.push(format!("\n{} in {} / {} ({}):", label, namespace, language, items.len()));
        for finding in items.iter().take(max_items) {
            lines.push(render_finding(finding));
        }
        if items.len() > max_items {
            lines.push(format!("    ... and {} more", items.len() - max_items));
        }
    }
}

/// Human-readable report: header, per-category counts, then grouped details.
///
/// The output depends only on the report contents and order.
pub fn render_human(report: &Report, summary: &RunSummary, max_items: usize) -> String {
    let error_count = report.errors().count();
    let warning_count = report.warnings().count();

    let mut lines = Vec::new();
    lines.push("=== Translation check ===".to_string());
    lines.push(format!(
        "Namespaces: {}, Languages: {}, Source files: {}, Referenced keys: {}",
        summary.namespaces, summary.languages, summary.files_scanned, summary.keys_referenced
    ));
    lines.push(format!("Errors: {}, Warnings: {}", error_count, warning_count));
    for kind in FindingKind::ALL {
        let count = report.count(kind);
        if count > 0 {
            lines.push(format!("  {} ({}): {}", kind, kind.severity(), count));
        }
    }

    render_groups(&mut lines, report, Severity::Error, max_items);
    render_groups(&mut lines, report, Severity::Warning, max_items);

    lines.push(String::new());
    if error_count > 0 {
        lines.push(format!("❌ FAILED: {} error(s), {} warning(s)", error_count, warning_count));
    } else {
        lines.push(format!("✅ PASSED: 0 errors, {} warning(s)", warning_count));
    }
    lines.join("\n")
}

/// JSON report with the same content as [`render_human`], uncapped.
pub fn render_json(report: &Report, summary: &RunSummary) -> Result<String, Error> {
    let counts: serde_json::Map<String, serde_json::Value> = FindingKind::ALL
        .iter()
        .map(|kind| (kind.as_str().to_string(), json!(report.count(*kind))))
        .collect();
    let errors: Vec<&Finding> = report.errors().collect();
    let warnings: Vec<&Finding> = report.warnings().collect();
    let body = json!({
        "summary": summary,
        "passed": !report.has_errors(),
        "counts": counts,
        "errors": errors,
        "warnings": warnings,
    });
    Ok(serde_json::to_string_pretty(&body)?)
}
