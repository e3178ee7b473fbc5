//! Run configuration, usually read from `catalint.toml`.

use std::{fs, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

use crate::{
    error::Error,
    keypath::ConflictPolicy,
    marker::{DEFAULT_MARKER, Marker},
};

pub const DEFAULT_CONFIG_FILE: &str = "catalint.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root of the source tree scanned for key usages.
    pub source_dir: PathBuf,
    /// Root holding `<language>/<namespace>.<extension>` documents.
    pub catalog_dir: PathBuf,
    pub default_language: String,
    /// Languages to check. Empty means every directory under `catalog_dir`.
    pub languages: Vec<String>,
    /// Namespace assumed for references without a `namespace:` prefix.
    pub default_namespace: String,
    pub extension: String,
    pub marker: String,
    /// Glob patterns, relative to `source_dir`, selecting source files.
    pub include: Vec<String>,
    /// Directory names never descended into.
    pub exclude_dirs: Vec<String>,
    /// Extra function names whose first string argument is a key.
    pub helpers: Vec<String>,
    pub max_items_per_group: usize,
    /// Report keys referenced in source but absent from catalogs.
    pub check_references: bool,
    /// Report default-language keys that no source file references.
    pub report_unused: bool,
    /// Let reconciliation replace scalar values that block a missing path.
    pub overwrite_conflicts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_dir: PathBuf::from("src"),
            catalog_dir: PathBuf::from("locales"),
            default_language: "en".to_string(),
            languages: Vec::new(),
            default_namespace: "common".to_string(),
            extension: "json".to_string(),
            marker: DEFAULT_MARKER.to_string(),
            include: vec!["**/*.{js,jsx,ts,tsx,vue,svelte,html}".to_string()],
            exclude_dirs: [
                "node_modules",
                "dist",
                "build",
                ".next",
                "out",
                "coverage",
                "target",
                ".git",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            helpers: vec!["translate".to_string(), "getTranslation".to_string()],
            max_items_per_group: 20,
            check_references: true,
            report_unused: false,
            overwrite_conflicts: false,
        }
    }
}

impl Config {
    /// Reads and validates a TOML configuration file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let data = fs::read_to_string(path)?;
        Self::from_toml_str(&data)
    }

    /// Parses and validates TOML configuration text.
    pub fn from_toml_str(data: &str) -> Result<Self, Error> {
        let config: Config = toml::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        validate_language_code(&self.default_language)?;
        for lang in &self.languages {
            validate_language_code(lang)?;
        }
        if !self.languages.is_empty() && !self.languages.contains(&self.default_language) {
            return Err(Error::config_error(format!(
                "default language `{}` is not listed in `languages`",
                self.default_language
            )));
        }
        if !is_identifier(&self.default_namespace) {
            return Err(Error::config_error(format!(
                "invalid default namespace `{}`",
                self.default_namespace
            )));
        }
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(Error::config_error("catalog extension cannot be empty"));
        }
        if self.max_items_per_group == 0 {
            return Err(Error::config_error("max_items_per_group must be at least 1"));
        }
        Marker::new(self.marker.clone())?;
        Ok(())
    }

    pub fn marker(&self) -> Result<Marker, Error> {
        Marker::new(self.marker.clone())
    }

    pub fn conflict_policy(&self) -> ConflictPolicy {
        if self.overwrite_conflicts {
            ConflictPolicy::Overwrite
        } else {
            ConflictPolicy::Fail
        }
    }
}

/// Checks that `lang` parses as a BCP 47 language identifier.
pub fn validate_language_code(lang: &str) -> Result<(), Error> {
    if lang.trim().is_empty() {
        return Err(Error::config_error("language code cannot be empty"));
    }
    lang.parse::<LanguageIdentifier>().map(|_| ()).map_err(|_| {
        Error::config_error(format!(
            "invalid language code `{}`: expected a BCP 47 language identifier",
            lang
        ))
    })
}

/// Namespace names: letters, digits, `_` and `-`.
pub(crate) fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}
