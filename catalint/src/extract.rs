//! Translation key extraction from source text.
//!
//! Several independent grammars are matched against the whole text of a file:
//!
//! - translation calls: `t('key')`, `i18n.t("key")`, `` $t(`key`) ``
//! - attributes: `i18nKey="key"`, `i18nKey={'key'}`
//! - helper calls: `translate('key', ...)` for configured helper names
//!
//! Each grammar is a [`KeyMatcher`]; results are unioned as a set so the
//! order of the grammars never changes the outcome.

use std::{
    collections::BTreeSet,
    fmt::Display,
    path::PathBuf,
};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{catalog::read_text, config::is_identifier, error::Error, keypath::split_path};

lazy_static! {
    static ref CALL_REGEX: Regex =
        Regex::new(r#"(?:^|[^\w$])\$?t\(\s*(?:'([^'\n]+)'|"([^"\n]+)"|`([^`\n]+)`)"#)
            .expect("valid translation call regex");
    static ref ATTRIBUTE_REGEX: Regex = Regex::new(
        r#"\bi18nKey\s*=\s*(?:"([^"\n]+)"|'([^'\n]+)'|\{\s*(?:"([^"\n]+)"|'([^'\n]+)'|`([^`\n]+)`)\s*\})"#
    )
    .expect("valid i18nKey attribute regex");
}

/// A key reference as written in source.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyRef {
    /// `namespace:path`
    Qualified { namespace: String, path: String },
    /// `path`, resolved against the default namespace.
    Unqualified { path: String },
}

impl KeyRef {
    /// Parses a raw key string.
    ///
    /// Returns `None` for strings that cannot be keys: more than one `:`,
    /// an empty or non-identifier namespace, whitespace, or a malformed path.
    pub fn parse(raw: &str) -> Option<KeyRef> {
        if raw.is_empty() || raw.chars().any(char::is_whitespace) {
            return None;
        }
        let (namespace, path) = match raw.split_once(':') {
            Some((namespace, path)) => {
                if path.contains(':') || !is_identifier(namespace) {
                    return None;
                }
                (Some(namespace), path)
            }
            None => (None, raw),
        };
        split_path(path).ok()?;
        Some(match namespace {
            Some(namespace) => KeyRef::Qualified {
                namespace: namespace.to_string(),
                path: path.to_string(),
            },
            None => KeyRef::Unqualified {
                path: path.to_string(),
            },
        })
    }

    pub fn path(&self) -> &str {
        match self {
            KeyRef::Qualified { path, .. } | KeyRef::Unqualified { path } => path,
        }
    }

    /// Resolves the reference to a concrete (namespace, path) pair.
    pub fn resolve(&self, default_namespace: &str) -> ResolvedKey {
        match self {
            KeyRef::Qualified { namespace, path } => ResolvedKey::new(namespace, path),
            KeyRef::Unqualified { path } => ResolvedKey::new(default_namespace, path),
        }
    }
}

impl Display for KeyRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyRef::Qualified { namespace, path } => write!(f, "{}:{}", namespace, path),
            KeyRef::Unqualified { path } => write!(f, "{}", path),
        }
    }
}

/// A key reference with its namespace decided.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResolvedKey {
    pub namespace: String,
    pub path: String,
}

impl ResolvedKey {
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        ResolvedKey {
            namespace: namespace.into(),
            path: path.into(),
        }
    }
}

impl Display for ResolvedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

/// One extraction grammar.
pub trait KeyMatcher {
    fn name(&self) -> &str;

    /// Raw key strings matched in `text`, in match order, duplicates included.
    fn find_keys(&self, text: &str) -> Vec<String>;
}

fn first_group(captures: &regex::Captures<'_>) -> Option<String> {
    captures
        .iter()
        .skip(1)
        .flatten()
        .next()
        .map(|m| m.as_str().to_string())
}

fn collect_captures(regex: &Regex, text: &str) -> Vec<String> {
    regex
        .captures_iter(text)
        .filter_map(|c| first_group(&c))
        .filter(|key| !key.contains("${"))
        .collect()
}

/// `t("key")` and its method/`$t` variants.
pub struct CallMatcher;

impl KeyMatcher for CallMatcher {
    fn name(&self) -> &str {
        "call"
    }

    fn find_keys(&self, text: &str) -> Vec<String> {
        collect_captures(&CALL_REGEX, text)
    }
}

/// `i18nKey="key"` attributes.
pub struct AttributeMatcher;

impl KeyMatcher for AttributeMatcher {
    fn name(&self) -> &str {
        "attribute"
    }

    fn find_keys(&self, text: &str) -> Vec<String> {
        collect_captures(&ATTRIBUTE_REGEX, text)
    }
}

/// Calls to named helpers whose first string argument is a key.
pub struct HelperMatcher {
    regex: Regex,
}

impl HelperMatcher {
    pub fn new(names: &[String]) -> Result<Self, Error> {
        let alternatives: Vec<String> = names
            .iter()
            .filter(|n| !n.trim().is_empty())
            .map(|n| regex::escape(n.trim()))
            .collect();
        if alternatives.is_empty() {
            return Err(Error::config_error("helper matcher needs at least one name"));
        }
        let pattern = format!(
            r#"(?:^|[^\w$.])(?:{})\(\s*(?:'([^'\n]+)'|"([^"\n]+)"|`([^`\n]+)`)"#,
            alternatives.join("|")
        );
        Ok(HelperMatcher {
            regex: Regex::new(&pattern)?,
        })
    }
}

impl KeyMatcher for HelperMatcher {
    fn name(&self) -> &str {
        "helper"
    }

    fn find_keys(&self, text: &str) -> Vec<String> {
        collect_captures(&self.regex, text)
    }
}

/// The ordered set of grammars applied to every file.
pub struct Extractor {
    matchers: Vec<Box<dyn KeyMatcher>>,
}

impl Default for Extractor {
    fn default() -> Self {
        Extractor {
            matchers: vec![Box::new(CallMatcher), Box::new(AttributeMatcher)],
        }
    }
}

impl Extractor {
    /// Builds the standard grammars plus a helper grammar for `helpers`.
    pub fn new(helpers: &[String]) -> Result<Self, Error> {
        let mut extractor = Extractor::default();
        if helpers.iter().any(|h| !h.trim().is_empty()) {
            extractor.push(Box::new(HelperMatcher::new(helpers)?));
        }
        Ok(extractor)
    }

    pub fn push(&mut self, matcher: Box<dyn KeyMatcher>) {
        self.matchers.push(matcher);
    }

    pub fn matcher_names(&self) -> Vec<&str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }

    /// Distinct, well-formed key references in `text`.
    pub fn extract(&self, text: &str) -> BTreeSet<KeyRef> {
        self.matchers
            .iter()
            .flat_map(|m| m.find_keys(text))
            .filter_map(|raw| KeyRef::parse(&raw))
            .collect()
    }

    /// Total number of grammar matches in `text`, duplicates included.
    pub fn match_count(&self, text: &str) -> usize {
        self.matchers.iter().map(|m| m.find_keys(text).len()).sum()
    }

    /// True if more than a third of the lines of `text` carry a key usage.
    pub fn is_fully_instrumented(&self, text: &str) -> bool {
        let lines = text.lines().count();
        lines > 0 && self.match_count(text) * 3 > lines
    }
}

/// Finds the source files under `root` selected by `include` globs.
pub struct SourceWalker {
    root: PathBuf,
    include: GlobSet,
    exclude_dirs: Vec<String>,
}

impl SourceWalker {
    pub fn new(
        root: impl Into<PathBuf>,
        include: &[String],
        exclude_dirs: &[String],
    ) -> Result<Self, Error> {
        let mut builder = GlobSetBuilder::new();
        for pattern in include {
            builder.add(GlobBuilder::new(pattern).literal_separator(true).build()?);
        }
        Ok(SourceWalker {
            root: root.into(),
            include: builder.build()?,
            exclude_dirs: exclude_dirs.to_vec(),
        })
    }

    /// Matching files, sorted by path.
    pub fn files(&self) -> Result<Vec<PathBuf>, Error> {
        if !self.root.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("source directory not found: {}", self.root.display()),
            )));
        }
        let excluded = self.exclude_dirs.clone();
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .git_exclude(true)
            .git_global(false)
            .require_git(false)
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                !(is_dir && entry.depth() > 0 && excluded.iter().any(|d| entry.file_name() == d.as_str()))
            })
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable path");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
            if self.include.is_match(relative) {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Keys referenced across a source tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceScan {
    pub keys: BTreeSet<ResolvedKey>,
    pub files_scanned: usize,
    /// Files that could not be read, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
}

impl SourceScan {
    pub fn references(&self, namespace: &str) -> impl Iterator<Item = &ResolvedKey> {
        self.keys.iter().filter(move |k| k.namespace == namespace)
    }

    pub fn is_referenced(&self, namespace: &str, path: &str) -> bool {
        self.keys.contains(&ResolvedKey::new(namespace, path))
    }
}

/// Extracts keys from every file in `files`, aggregating into one set.
pub fn scan_files(extractor: &Extractor, files: &[PathBuf], default_namespace: &str) -> SourceScan {
    let mut scan = SourceScan::default();
    for file in files {
        match read_text(file) {
            Ok(text) => {
                let refs = extractor.extract(&text);
                tracing::debug!(file = %file.display(), keys = refs.len(), "extracted keys");
                scan.keys
                    .extend(refs.iter().map(|r| r.resolve(default_namespace)));
                scan.files_scanned += 1;
            }
            Err(e) => {
                tracing::warn!(file = %file.display(), error = %e, "skipping source file");
                scan.skipped.push((file.clone(), e.to_string()));
            }
        }
    }
    scan
}
