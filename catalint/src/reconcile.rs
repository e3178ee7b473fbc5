//! Filling gaps in non-default catalogs with marked placeholder values.
//!
//! For every leaf the default language has and a language lacks, the
//! reconciler writes the default value prefixed with the marker. Existing
//! values are never touched, so running it again adds nothing.

use serde::Serialize;
use serde_json::Value;

use crate::{
    catalog::Catalog,
    differ::missing_paths,
    keypath::{self, ConflictPolicy},
    marker::Marker,
};

/// A path the reconciler could not fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub path: String,
    pub reason: String,
}

/// What reconciling one catalog did (or, in a dry run, would do).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileOutcome {
    pub namespace: String,
    pub language: String,
    pub added: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<Conflict>,
}

impl ReconcileOutcome {
    pub fn is_modified(&self) -> bool {
        !self.added.is_empty()
    }
}

pub struct Reconciler<'a> {
    marker: &'a Marker,
    policy: ConflictPolicy,
}

impl<'a> Reconciler<'a> {
    pub fn new(marker: &'a Marker, policy: ConflictPolicy) -> Self {
        Reconciler { marker, policy }
    }

    /// The value synthesized for a missing path.
    ///
    /// Strings get the marker prefix; other leaves are copied as they are.
    pub fn placeholder(&self, default_value: &Value, source: &str, target: &str) -> Value {
        match default_value {
            Value::String(s) => Value::String(self.marker.apply(s, source, target)),
            other => other.clone(),
        }
    }

    /// Adds every missing default leaf to `target`.
    pub fn reconcile(&self, default: &Catalog, target: &mut Catalog) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome {
            namespace: target.namespace.clone(),
            language: target.language.clone(),
            ..ReconcileOutcome::default()
        };
        if default.language == target.language {
            return outcome;
        }

        for path in missing_paths(default, target) {
            let Some(default_value) = default.get(&path) else {
                tracing::warn!(
                    namespace = %target.namespace,
                    language = %target.language,
                    path = %path,
                    "default value is not addressable by its path"
                );
                outcome.conflicts.push(Conflict {
                    path,
                    reason: "key is not addressable by a dotted path".to_string(),
                });
                continue;
            };
            let value = self.placeholder(default_value, &default.language, &target.language);
            match keypath::set(&mut target.tree, &path, value, self.policy) {
                Ok(()) => outcome.added.push(path),
                Err(e) => {
                    tracing::warn!(
                        namespace = %target.namespace,
                        language = %target.language,
                        path = %path,
                        error = %e,
                        "cannot add placeholder"
                    );
                    outcome.conflicts.push(Conflict {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }
        outcome
    }
}
