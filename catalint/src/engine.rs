//! One run over a project: load catalogs, scan sources, then check, reconcile
//! or export.
//!
//! Problems with individual documents or source files are collected and the
//! run carries on; only configuration-level problems (no catalog root, no
//! default-language directory) abort with an [`Error`].

use std::path::PathBuf;

use crate::{
    catalog::{Catalog, CatalogStore},
    config::{Config, validate_language_code},
    differ,
    error::Error,
    export::ExportTable,
    extract::{Extractor, SourceScan, SourceWalker, scan_files},
    finding::{Finding, FindingKind, Report},
    literals::{LiteralHit, scan_literals},
    marker::Marker,
    reconcile::{ReconcileOutcome, Reconciler},
    report::RunSummary,
    validate,
};

/// Every catalog of a run, indexed by language then namespace.
#[derive(Debug, Clone, Default)]
pub struct CatalogSet {
    /// Default language first.
    pub languages: Vec<String>,
    /// Namespaces of the default language, sorted.
    pub namespaces: Vec<String>,
    loaded: Vec<Catalog>,
    /// `FileError` findings for documents that failed to load.
    pub failures: Report,
}

impl CatalogSet {
    pub fn get(&self, language: &str, namespace: &str) -> Option<&Catalog> {
        self.loaded
            .iter()
            .find(|c| c.language == language && c.namespace == namespace)
    }

    pub fn namespace(&self, namespace: &str) -> Vec<&Catalog> {
        self.loaded.iter().filter(|c| c.namespace == namespace).collect()
    }

    pub fn default_language(&self) -> &str {
        self.languages.first().map(String::as_str).unwrap_or_default()
    }
}

/// Result of a check run.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub report: Report,
    pub summary: RunSummary,
}

/// Result of a reconciliation run.
#[derive(Debug, Clone, Default)]
pub struct SyncOutcome {
    pub outcomes: Vec<ReconcileOutcome>,
    /// Documents written (empty in a dry run).
    pub written: Vec<PathBuf>,
    pub failures: Report,
}

impl SyncOutcome {
    pub fn added(&self) -> usize {
        self.outcomes.iter().map(|o| o.added.len()).sum()
    }

    pub fn conflicts(&self) -> usize {
        self.outcomes.iter().map(|o| o.conflicts.len()).sum()
    }
}

pub struct Engine {
    config: Config,
    store: CatalogStore,
    extractor: Extractor,
    marker: Marker,
}

impl Engine {
    pub fn new(config: Config) -> Result<Self, Error> {
        config.validate()?;
        let store = CatalogStore::new(&config.catalog_dir, &config.extension);
        let extractor = Extractor::new(&config.helpers)?;
        let marker = config.marker()?;
        Ok(Engine {
            config,
            store,
            extractor,
            marker,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// The run's languages, default first.
    pub fn languages(&self) -> Result<Vec<String>, Error> {
        let configured = if self.config.languages.is_empty() {
            self.store.list_languages().map_err(|e| {
                Error::config_error(format!(
                    "cannot list languages in {}: {}",
                    self.store.root().display(),
                    e
                ))
            })?
            .into_iter()
            .filter(|name| {
                let valid = validate_language_code(name).is_ok();
                if !valid {
                    tracing::warn!(language = %name, "skipping directory that is not a language code");
                }
                valid
            })
            .collect()
        } else {
            self.config.languages.clone()
        };
        let default = &self.config.default_language;
        let mut languages = vec![default.clone()];
        languages.extend(configured.into_iter().filter(|l| l != default));
        Ok(languages)
    }

    /// Namespaces defined by the default language.
    pub fn namespaces(&self) -> Result<Vec<String>, Error> {
        let default = &self.config.default_language;
        self.store.list_namespaces(default).map_err(|e| {
            Error::config_error(format!(
                "cannot list namespaces for default language `{}` in {}: {}",
                default,
                self.store.root().display(),
                e
            ))
        })
    }

    fn file_error(&self, language: &str, namespace: &str, error: &Error) -> Finding {
        Finding::new(
            FindingKind::FileError,
            namespace,
            language,
            self.store.display_path(language, namespace),
            error.to_string(),
        )
    }

    /// Loads every (language, namespace) document, recording failures as findings.
    pub fn load_catalogs(&self) -> Result<CatalogSet, Error> {
        let mut set = CatalogSet {
            languages: self.languages()?,
            namespaces: self.namespaces()?,
            ..CatalogSet::default()
        };
        for namespace in &set.namespaces {
            for language in &set.languages {
                match self.store.load(language, namespace) {
                    Ok(catalog) => set.loaded.push(catalog),
                    Err(e) => {
                        tracing::warn!(language = %language, namespace = %namespace, error = %e, "cannot load catalog");
                        set.failures.push(self.file_error(language, namespace, &e));
                    }
                }
            }
        }
        tracing::info!(
            languages = set.languages.len(),
            namespaces = set.namespaces.len(),
            failed = set.failures.len(),
            "catalogs loaded"
        );
        Ok(set)
    }

    /// Source files selected by the configuration.
    pub fn source_files(&self) -> Result<Vec<PathBuf>, Error> {
        SourceWalker::new(
            &self.config.source_dir,
            &self.config.include,
            &self.config.exclude_dirs,
        )?
        .files()
    }

    /// Extracts key references from all source files.
    pub fn scan_sources(&self) -> Result<SourceScan, Error> {
        let files = self.source_files()?;
        let scan = scan_files(&self.extractor, &files, &self.config.default_namespace);
        tracing::info!(
            files = scan.files_scanned,
            skipped = scan.skipped.len(),
            keys = scan.keys.len(),
            "sources scanned"
        );
        Ok(scan)
    }

    /// Diffs and validates already-loaded catalogs.
    ///
    /// `scan` enables the source cross-check; pass `None` to compare catalogs only.
    pub fn check_catalogs(&self, set: &CatalogSet, scan: Option<&SourceScan>) -> Report {
        let mut report = Report::new();
        report.merge(set.failures.clone());
        let default_language = set.default_language();

        for namespace in &set.namespaces {
            let default = set.get(default_language, namespace);
            for language in &set.languages {
                let Some(catalog) = set.get(language, namespace) else {
                    continue;
                };
                let is_default = language == default_language;
                if let Some(default) = default.filter(|_| !is_default) {
                    report.merge(differ::diff_catalogs(default, catalog));
                }
                if let Some(scan) = scan.filter(|_| self.config.check_references) {
                    report.merge(differ::diff_references(scan, catalog));
                }
                if is_default {
                    if let Some(scan) = scan.filter(|_| self.config.report_unused) {
                        report.merge(differ::unused_keys(scan, catalog));
                    }
                } else {
                    report.merge(differ::find_untranslated(catalog, default_language, &self.marker));
                }
                report.merge(validate::validate_catalog(catalog, default));
            }
        }

        if let Some(scan) = scan.filter(|_| self.config.check_references) {
            report.merge(differ::unknown_namespace_references(
                scan,
                &set.namespaces,
                &set.languages,
            ));
        }
        report
    }

    /// Full check: load catalogs, scan sources, diff and validate.
    pub fn check(&self) -> Result<CheckOutcome, Error> {
        let set = self.load_catalogs()?;
        let scan = if self.config.check_references || self.config.report_unused {
            Some(self.scan_sources()?)
        } else {
            None
        };
        let report = self.check_catalogs(&set, scan.as_ref());
        tracing::info!(
            errors = report.errors().count(),
            warnings = report.warnings().count(),
            "check finished"
        );
        Ok(CheckOutcome {
            report,
            summary: RunSummary {
                namespaces: set.namespaces.len(),
                languages: set.languages.len(),
                files_scanned: scan.as_ref().map_or(0, |s| s.files_scanned),
                keys_referenced: scan.as_ref().map_or(0, |s| s.keys.len()),
            },
        })
    }

    /// Adds marked placeholders for missing keys in every non-default catalog.
    ///
    /// A language without a document for a namespace starts from an empty
    /// catalog. Only modified catalogs are saved, and nothing is saved when
    /// `dry_run` is set.
    pub fn reconcile(&self, dry_run: bool) -> Result<SyncOutcome, Error> {
        let languages = self.languages()?;
        let namespaces = self.namespaces()?;
        let default_language = &self.config.default_language;
        let reconciler = Reconciler::new(&self.marker, self.config.conflict_policy());
        let mut result = SyncOutcome::default();

        for namespace in &namespaces {
            let default = match self.store.load(default_language, namespace) {
                Ok(catalog) => catalog,
                Err(e) => {
                    tracing::warn!(namespace = %namespace, error = %e, "cannot load default catalog, skipping namespace");
                    result.failures.push(self.file_error(default_language, namespace, &e));
                    continue;
                }
            };
            for language in languages.iter().filter(|l| *l != default_language) {
                let mut catalog = match self.store.load_or_empty(language, namespace) {
                    Ok(catalog) => catalog,
                    Err(e) => {
                        tracing::warn!(language = %language, namespace = %namespace, error = %e, "cannot load catalog, skipping");
                        result.failures.push(self.file_error(language, namespace, &e));
                        continue;
                    }
                };
                let outcome = reconciler.reconcile(&default, &mut catalog);
                if outcome.is_modified() {
                    tracing::info!(
                        language = %language,
                        namespace = %namespace,
                        added = outcome.added.len(),
                        dry_run,
                        "placeholders added"
                    );
                    if !dry_run {
                        match self.store.save(&catalog) {
                            Ok(()) => result.written.push(self.store.path_for(language, namespace)),
                            Err(e) => {
                                result.failures.push(self.file_error(language, namespace, &e));
                            }
                        }
                    }
                }
                result.outcomes.push(outcome);
            }
        }
        Ok(result)
    }

    /// Flattens every namespace into a table with one column per language.
    pub fn export(&self) -> Result<(ExportTable, Report), Error> {
        let set = self.load_catalogs()?;
        let mut table = ExportTable::new(set.languages.clone());
        for namespace in &set.namespaces {
            table.add_namespace(namespace, &set.namespace(namespace));
        }
        Ok((table, set.failures))
    }

    /// Advisory scan for hard-coded text in source files.
    pub fn scan_literals(&self) -> Result<Vec<LiteralHit>, Error> {
        let files = self.source_files()?;
        Ok(scan_literals(&self.extractor, &files))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        for (path, content) in files {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        let config = Config {
            source_dir: dir.path().join("src"),
            catalog_dir: dir.path().join("locales"),
            ..Config::default()
        };
        (dir, config)
    }

    #[test]
    fn test_languages_default_first() {
        let (_dir, config) = project(&[
            ("locales/de/common.json", "{}"),
            ("locales/en/common.json", "{}"),
            ("locales/uk/common.json", "{}"),
        ]);
        let engine = Engine::new(config).unwrap();
        assert_eq!(engine.languages().unwrap(), vec!["en", "de", "uk"]);
    }

    #[test]
    fn test_discovered_languages_skip_non_language_dirs() {
        let (_dir, config) = project(&[
            ("locales/en/common.json", "{}"),
            ("locales/uk/common.json", "{}"),
            ("locales/_drafts/common.json", "{}"),
            ("locales/icons@2x/logo.json", "{}"),
        ]);
        let engine = Engine::new(config).unwrap();
        assert_eq!(engine.languages().unwrap(), vec!["en", "uk"]);
    }

    #[test]
    fn test_broken_document_is_isolated() {
        let (_dir, config) = project(&[
            ("src/app.js", "t('a')"),
            ("locales/en/common.json", r#"{"a": "A"}"#),
            ("locales/en/pages.json", r#"{"p": "P"}"#),
            ("locales/uk/common.json", r#"{"a": "#),
            ("locales/uk/pages.json", r#"{}"#),
        ]);
        let engine = Engine::new(config).unwrap();
        let outcome = engine.check().unwrap();
        let report = &outcome.report;

        let file_errors: Vec<_> = report.of_kind(FindingKind::FileError).collect();
        assert_eq!(file_errors.len(), 1);
        assert_eq!(file_errors[0].path, "uk/common.json");

        let missing: Vec<_> = report
            .of_kind(FindingKind::MissingKey)
            .map(|f| (f.namespace.as_str(), f.language.as_str(), f.path.as_str()))
            .collect();
        assert_eq!(missing, vec![("pages", "uk", "p")]);
        assert_eq!(outcome.summary.files_scanned, 1);
    }

    #[test]
    fn test_missing_default_directory_is_fatal() {
        let (_dir, config) = project(&[("locales/uk/common.json", "{}")]);
        let engine = Engine::new(config).unwrap();
        assert!(matches!(engine.load_catalogs(), Err(Error::Config(_))));
    }

    #[test]
    fn test_reconcile_creates_missing_document() {
        let (dir, mut config) = project(&[("locales/en/common.json", "{\n  \"a\": \"A\"\n}\n")]);
        config.languages = vec!["en".to_string(), "fr".to_string()];
        let engine = Engine::new(config).unwrap();

        let dry = engine.reconcile(true).unwrap();
        assert_eq!(dry.added(), 1);
        assert!(dry.written.is_empty());
        assert!(!dir.path().join("locales/fr/common.json").exists());

        let wet = engine.reconcile(false).unwrap();
        assert_eq!(wet.written.len(), 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("locales/fr/common.json")).unwrap(),
            "{\n  \"a\": \"[EN] A\"\n}\n"
        );
    }
}
