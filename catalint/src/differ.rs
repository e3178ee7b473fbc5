//! Structural comparison of catalogs against the default language and against
//! the keys referenced in source.
//!
//! Every function here is pure: it reads catalogs and returns a [`Report`].
//! Findings come out in leaf traversal order, so identical inputs always give
//! identical reports.

use std::collections::HashSet;

use serde_json::Value;

use crate::{
    catalog::Catalog,
    extract::SourceScan,
    finding::{Finding, FindingKind, Report},
    keypath,
    marker::Marker,
};

fn leaf_set(catalog: &Catalog) -> HashSet<String> {
    keypath::leaves(&catalog.tree).map(|(path, _)| path).collect()
}

/// Paths present in `default` but absent from `target`, in `default` traversal order.
pub fn missing_paths(default: &Catalog, target: &Catalog) -> Vec<String> {
    let present = leaf_set(target);
    keypath::leaves(&default.tree)
        .map(|(path, _)| path)
        .filter(|path| !present.contains(path))
        .collect()
}

/// Paths present in `target` but absent from `default`, in `target` traversal order.
pub fn extra_paths(default: &Catalog, target: &Catalog) -> Vec<String> {
    let schema = leaf_set(default);
    keypath::leaves(&target.tree)
        .map(|(path, _)| path)
        .filter(|path| !schema.contains(path))
        .collect()
}

/// Compares a language catalog with the default-language catalog of the same namespace.
///
/// Missing leaves are errors, extra leaves are warnings.
pub fn diff_catalogs(default: &Catalog, target: &Catalog) -> Report {
    let mut report = Report::new();
    for path in missing_paths(default, target) {
        let value = default.get(&path).and_then(Value::as_str).map(str::to_string);
        let mut finding = Finding::new(
            FindingKind::MissingKey,
            &target.namespace,
            &target.language,
            path,
            format!("missing in `{}`, present in `{}`", target.language, default.language),
        );
        if let Some(value) = value {
            finding = finding.with_value(value);
        }
        report.push(finding);
    }
    for path in extra_paths(default, target) {
        report.push(Finding::new(
            FindingKind::ExtraKey,
            &target.namespace,
            &target.language,
            path,
            format!("not present in default language `{}`", default.language),
        ));
    }
    report
}

/// Reports keys referenced in source that `catalog` does not define.
///
/// Only references in the catalog's own namespace are considered.
pub fn diff_references(scan: &SourceScan, catalog: &Catalog) -> Report {
    let present = leaf_set(catalog);
    scan.references(&catalog.namespace)
        .filter(|key| !present.contains(&key.path))
        .map(|key| {
            Finding::new(
                FindingKind::MissingKey,
                &catalog.namespace,
                &catalog.language,
                &key.path,
                "referenced in source but missing",
            )
        })
        .collect()
}

/// Reports references into namespaces that have no catalog at all.
pub fn unknown_namespace_references(
    scan: &SourceScan,
    namespaces: &[String],
    languages: &[String],
) -> Report {
    let mut report = Report::new();
    for key in &scan.keys {
        if namespaces.contains(&key.namespace) {
            continue;
        }
        for language in languages {
            report.push(Finding::new(
                FindingKind::MissingKey,
                &key.namespace,
                language,
                &key.path,
                format!("referenced in source but namespace `{}` does not exist", key.namespace),
            ));
        }
    }
    report
}

/// Reports default-language leaves that no source file references.
pub fn unused_keys(scan: &SourceScan, default: &Catalog) -> Report {
    keypath::leaves(&default.tree)
        .filter(|(path, _)| !scan.is_referenced(&default.namespace, path))
        .map(|(path, _)| {
            Finding::new(
                FindingKind::ExtraKey,
                &default.namespace,
                &default.language,
                path,
                "not referenced in source",
            )
        })
        .collect()
}

/// Reports values in a non-default catalog that still carry the placeholder marker.
pub fn find_untranslated(catalog: &Catalog, default_language: &str, marker: &Marker) -> Report {
    let prefix = marker.render(default_language, &catalog.language);
    keypath::leaves(&catalog.tree)
        .filter_map(|(path, value)| match value {
            Value::String(s) if marker.is_marked(s, default_language, &catalog.language) => {
                Some(
                    Finding::new(
                        FindingKind::Untranslated,
                        &catalog.namespace,
                        &catalog.language,
                        path,
                        format!("value still carries marker `{}`", prefix.trim_end()),
                    )
                    .with_value(s.clone()),
                )
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ResolvedKey;

    fn catalog(language: &str, namespace: &str, json: &str) -> Catalog {
        Catalog::parse(language, namespace, json).unwrap()
    }

    #[test]
    fn test_missing_and_extra() {
        let en = catalog("en", "common", r#"{"a": "A", "nav": {"home": "Home", "about": "About"}}"#);
        let uk = catalog("uk", "common", r#"{"nav": {"home": "Головна", "old": "Старе"}}"#);
        let report = diff_catalogs(&en, &uk);

        let missing: Vec<_> = report.of_kind(FindingKind::MissingKey).map(|f| f.path.as_str()).collect();
        assert_eq!(missing, vec!["a", "nav.about"]);
        let extra: Vec<_> = report.of_kind(FindingKind::ExtraKey).map(|f| f.path.as_str()).collect();
        assert_eq!(extra, vec!["nav.old"]);
        assert_eq!(report.findings()[0].value.as_deref(), Some("A"));
    }

    #[test]
    fn test_identical_catalogs_have_no_findings() {
        let en = catalog("en", "common", r#"{"a": "A", "b": {"c": "C"}}"#);
        let uk = catalog("uk", "common", r#"{"b": {"c": "Ц"}, "a": "А"}"#);
        assert!(diff_catalogs(&en, &uk).is_empty());
    }

    #[test]
    fn test_scalar_where_object_expected_is_missing() {
        let en = catalog("en", "common", r#"{"profile": {"bio": "Bio"}}"#);
        let uk = catalog("uk", "common", r#"{"profile": "Профіль"}"#);
        let report = diff_catalogs(&en, &uk);
        assert_eq!(report.count(FindingKind::MissingKey), 1);
        assert_eq!(report.count(FindingKind::ExtraKey), 1);
    }

    #[test]
    fn test_namespace_isolation() {
        let mut scan = SourceScan::default();
        scan.keys.insert(ResolvedKey::new("common", "profile.bio"));
        let pages = catalog("en", "pages", r#"{"profile": {"bio": "Bio"}}"#);
        let common = catalog("en", "common", r#"{}"#);

        assert!(diff_references(&scan, &pages).is_empty());
        let report = diff_references(&scan, &common);
        assert_eq!(report.len(), 1);
        assert_eq!(report.findings()[0].namespace, "common");
        assert_eq!(report.findings()[0].path, "profile.bio");
    }

    #[test]
    fn test_unknown_namespace_reported_for_each_language() {
        let mut scan = SourceScan::default();
        scan.keys.insert(ResolvedKey::new("ghost", "title"));
        scan.keys.insert(ResolvedKey::new("common", "title"));
        let report = unknown_namespace_references(
            &scan,
            &["common".to_string()],
            &["en".to_string(), "uk".to_string()],
        );
        assert_eq!(report.len(), 2);
        assert!(report.findings().iter().all(|f| f.namespace == "ghost"));
    }

    #[test]
    fn test_unused_keys() {
        let mut scan = SourceScan::default();
        scan.keys.insert(ResolvedKey::new("common", "used"));
        let en = catalog("en", "common", r#"{"used": "U", "stale": "S"}"#);
        let report = unused_keys(&scan, &en);
        assert_eq!(report.len(), 1);
        assert_eq!(report.findings()[0].path, "stale");
        assert!(!report.has_errors());
    }

    #[test]
    fn test_find_untranslated() {
        let uk = catalog(
            "uk",
            "common",
            r#"{"a": "[EN] Hello", "b": "Привіт", "c": ["[EN] in array"]}"#,
        );
        let report = find_untranslated(&uk, "en", &Marker::default());
        assert_eq!(report.len(), 1);
        let finding = &report.findings()[0];
        assert_eq!(finding.path, "a");
        assert_eq!(finding.message, "value still carries marker `[EN]`");
    }
}
