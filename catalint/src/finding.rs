//! Findings and the report that accumulates them.

use std::{collections::HashSet, fmt::Display};

use serde::{Deserialize, Serialize};

/// How much a finding matters to CI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    MissingKey,
    ExtraKey,
    MissingVariable,
    ExtraVariable,
    UnbalancedMarkup,
    EmptyValue,
    Untranslated,
    FileError,
}

impl FindingKind {
    /// Every kind, in reporting order.
    pub const ALL: [FindingKind; 8] = [
        FindingKind::FileError,
        FindingKind::MissingKey,
        FindingKind::MissingVariable,
        FindingKind::UnbalancedMarkup,
        FindingKind::ExtraKey,
        FindingKind::ExtraVariable,
        FindingKind::EmptyValue,
        FindingKind::Untranslated,
    ];

    pub fn severity(self) -> Severity {
        match self {
            FindingKind::MissingKey
            | FindingKind::MissingVariable
            | FindingKind::UnbalancedMarkup
            | FindingKind::FileError => Severity::Error,
            FindingKind::ExtraKey
            | FindingKind::ExtraVariable
            | FindingKind::EmptyValue
            | FindingKind::Untranslated => Severity::Warning,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FindingKind::MissingKey => "missing_key",
            FindingKind::ExtraKey => "extra_key",
            FindingKind::MissingVariable => "missing_variable",
            FindingKind::ExtraVariable => "extra_variable",
            FindingKind::UnbalancedMarkup => "unbalanced_markup",
            FindingKind::EmptyValue => "empty_value",
            FindingKind::Untranslated => "untranslated",
            FindingKind::FileError => "file_error",
        }
    }
}

impl Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One diff or validation result tied to a (namespace, language, path).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub namespace: String,
    pub language: String,
    /// Leaf path, or the document path for [`FindingKind::FileError`].
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub variable: Option<String>,
}

impl Finding {
    pub fn new(
        kind: FindingKind,
        namespace: impl Into<String>,
        language: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Finding {
            kind,
            namespace: namespace.into(),
            language: language.into(),
            path: path.into(),
            message: message.into(),
            value: None,
            variable: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_variable(mut self, variable: impl Into<String>) -> Self {
        self.variable = Some(variable.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

type FindingId = (FindingKind, String, String, String, Option<String>);

fn identity(finding: &Finding) -> FindingId {
    (
        finding.kind,
        finding.namespace.clone(),
        finding.language.clone(),
        finding.path.clone(),
        finding.variable.clone(),
    )
}

/// An ordered accumulator of findings.
///
/// Insertion order is preserved. A finding equal in kind, namespace,
/// language, path and variable to one already recorded is dropped, so two
/// stages reporting the same problem count it once.
#[derive(Debug, Clone, Default)]
pub struct Report {
    findings: Vec<Finding>,
    seen: HashSet<FindingId>,
}

impl PartialEq for Report {
    fn eq(&self, other: &Self) -> bool {
        self.findings == other.findings
    }
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finding. Returns false if an identical one was already present.
    pub fn push(&mut self, finding: Finding) -> bool {
        if !self.seen.insert(identity(&finding)) {
            return false;
        }
        self.findings.push(finding);
        true
    }

    /// Appends every finding from `other`, in order.
    pub fn merge(&mut self, other: Report) {
        for finding in other.findings {
            self.push(finding);
        }
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.is_error())
    }

    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(Finding::is_error)
    }

    pub fn of_kind(&self, kind: FindingKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }

    pub fn count(&self, kind: FindingKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Findings of one severity grouped by (namespace, language), groups in
    /// first-seen order and findings in insertion order.
    pub fn grouped(&self, severity: Severity) -> Vec<((&str, &str), Vec<&Finding>)> {
        let mut groups: Vec<((&str, &str), Vec<&Finding>)> = Vec::new();
        for finding in self.findings.iter().filter(|f| f.severity() == severity) {
            let key = (finding.namespace.as_str(), finding.language.as_str());
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, items)) => items.push(finding),
                None => groups.push((key, vec![finding])),
            }
        }
        groups
    }
}

impl FromIterator<Finding> for Report {
    fn from_iter<T: IntoIterator<Item = Finding>>(iter: T) -> Self {
        let mut report = Report::new();
        for finding in iter {
            report.push(finding);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing(lang: &str, path: &str) -> Finding {
        Finding::new(FindingKind::MissingKey, "common", lang, path, "missing")
    }

    #[test]
    fn test_severity_partition() {
        let errors: Vec<_> = FindingKind::ALL
            .iter()
            .filter(|k| k.severity() == Severity::Error)
            .map(|k| k.as_str())
            .collect();
        assert_eq!(
            errors,
            vec!["file_error", "missing_key", "missing_variable", "unbalanced_markup"]
        );
    }

    #[test]
    fn test_push_deduplicates() {
        let mut report = Report::new();
        assert!(report.push(missing("uk", "a")));
        assert!(!report.push(missing("uk", "a")));
        assert!(report.push(missing("de", "a")));
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_variable_distinguishes_findings() {
        let mut report = Report::new();
        let base = Finding::new(FindingKind::MissingVariable, "common", "uk", "a", "m");
        report.push(base.clone().with_variable("name"));
        report.push(base.with_variable("count"));
        assert_eq!(report.count(FindingKind::MissingVariable), 2);
    }

    #[test]
    fn test_grouped_preserves_first_seen_order() {
        let report: Report = vec![
            missing("uk", "a"),
            Finding::new(FindingKind::ExtraKey, "common", "uk", "z", "extra"),
            missing("de", "a"),
            missing("uk", "b"),
        ]
        .into_iter()
        .collect();
        let groups = report.grouped(Severity::Error);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, ("common", "uk"));
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, ("common", "de"));
        assert!(report.has_errors());
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_warnings_only_report_has_no_errors() {
        let report: Report = vec![Finding::new(FindingKind::EmptyValue, "common", "uk", "a", "empty")]
            .into_iter()
            .collect();
        assert!(!report.has_errors());
    }

    #[test]
    fn test_finding_serializes_snake_case() {
        let finding = missing("uk", "a").with_value("v");
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["kind"], "missing_key");
        assert_eq!(json["value"], "v");
        assert!(json.get("variable").is_none());
    }
}
