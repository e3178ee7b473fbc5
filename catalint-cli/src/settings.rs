//! Turning `catalint.toml` plus command-line flags into one [`Config`].
//!
//! Paths inside a config file are relative to the file's directory; paths
//! given as flags are relative to the working directory. Flags win.

use std::path::{Path, PathBuf};

use catalint::{Config, config::DEFAULT_CONFIG_FILE};
use clap::Args;

use crate::validation::{validate_config_path, validate_language_code};

/// Flags shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Config file (defaults to ./catalint.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Root of the source tree to scan
    #[arg(long, global = true, value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Root holding <lang>/<namespace>.json catalogs
    #[arg(long, global = true, value_name = "DIR")]
    pub catalog_dir: Option<PathBuf>,

    /// Default (reference) language
    #[arg(long = "default-lang", global = true, value_name = "LANG")]
    pub default_lang: Option<String>,

    /// Language to include; repeat for several (default: every catalog directory)
    #[arg(long = "lang", global = true, value_name = "LANG")]
    pub langs: Vec<String>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

fn anchor(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Loads the config file (if any) and applies flag overrides.
pub fn resolve_config(opts: &GlobalOptions) -> Result<Config, String> {
    let cwd = std::env::current_dir()
        .map_err(|e| format!("Cannot determine working directory: {}", e))?;
    resolve_config_in(opts, &cwd)
}

/// Like [`resolve_config`], with relative paths taken from `cwd`.
pub fn resolve_config_in(opts: &GlobalOptions, cwd: &Path) -> Result<Config, String> {
    let config_path = match &opts.config {
        Some(path) => {
            let path = anchor(cwd, path.clone());
            validate_config_path(&path)?;
            Some(path)
        }
        None => Some(cwd.join(DEFAULT_CONFIG_FILE)).filter(|p| p.is_file()),
    };

    let mut config = match &config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let mut config = Config::load_from_file(path)
                .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?;
            let base = path.parent().unwrap_or(cwd);
            config.source_dir = anchor(base, config.source_dir);
            config.catalog_dir = anchor(base, config.catalog_dir);
            config
        }
        None => {
            let mut config = Config::default();
            config.source_dir = anchor(cwd, config.source_dir);
            config.catalog_dir = anchor(cwd, config.catalog_dir);
            config
        }
    };

    if let Some(dir) = &opts.source_dir {
        config.source_dir = anchor(cwd, dir.clone());
    }
    if let Some(dir) = &opts.catalog_dir {
        config.catalog_dir = anchor(cwd, dir.clone());
    }
    if let Some(lang) = &opts.default_lang {
        validate_language_code(lang)?;
        config.default_language = lang.clone();
        if !config.languages.is_empty() && !config.languages.contains(lang) {
            config.languages.insert(0, lang.clone());
        }
    }
    if !opts.langs.is_empty() {
        for lang in &opts.langs {
            validate_language_code(lang)?;
        }
        let mut langs = opts.langs.clone();
        if !langs.contains(&config.default_language) {
            langs.insert(0, config.default_language.clone());
        }
        config.languages = langs;
    }

    config
        .validate()
        .map_err(|e| format!("Invalid configuration: {}", e))?;
    Ok(config)
}
