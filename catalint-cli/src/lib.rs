//! CLI library for testing purposes

pub mod settings;
pub mod validation;

pub use catalint::Config;
pub use settings::{GlobalOptions, resolve_config};
