#![forbid(unsafe_code)]
//! Translation catalog consistency engine.
//!
//! Extracts translation keys from source code, compares per-language JSON
//! catalogs against the default language, validates interpolation variables
//! and markup, and fills gaps with marked placeholder values.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use catalint::{Config, Engine, report};
//!
//! let engine = Engine::new(Config::load_from_file("catalint.toml")?)?;
//! let outcome = engine.check()?;
//! println!("{}", report::render_human(&outcome.report, &outcome.summary, 20));
//! std::process::exit(report::exit_code(&outcome.report));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Layout
//!
//! - [`keypath`]: dotted paths over nested trees
//! - [`catalog`]: `<root>/<language>/<namespace>.json` documents
//! - [`extract`] and [`literals`]: source scanning
//! - [`differ`] and [`validate`]: findings
//! - [`reconcile`]: placeholder synthesis
//! - [`report`]: rendering and exit codes

pub mod catalog;
pub mod config;
pub mod differ;
pub mod engine;
pub mod error;
pub mod export;
pub mod extract;
pub mod finding;
pub mod keypath;
pub mod literals;
pub mod marker;
pub mod reconcile;
pub mod report;
pub mod validate;

// Re-export most used types for easy consumption
pub use crate::{
    catalog::{Catalog, CatalogStore},
    config::Config,
    engine::{CatalogSet, CheckOutcome, Engine, SyncOutcome},
    error::Error,
    extract::{Extractor, KeyRef, ResolvedKey, SourceScan},
    finding::{Finding, FindingKind, Report, Severity},
    keypath::ConflictPolicy,
    marker::Marker,
    reconcile::{ReconcileOutcome, Reconciler},
};
