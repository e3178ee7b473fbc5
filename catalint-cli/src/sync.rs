use catalint::{CatalogStore, Config, Engine, SyncOutcome};
use serde_json::json;

use catalint_cli::validation::validate_directory;

#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub dry_run: bool,
    pub overwrite_conflicts: bool,
    pub json: bool,
}

/// Lines describing what a reconciliation changed (or would change).
pub fn describe_sync(store: &CatalogStore, outcome: &SyncOutcome, dry_run: bool) -> Vec<String> {
    let verb = if dry_run { "would add" } else { "added" };
    let mut lines = Vec::new();
    for item in &outcome.outcomes {
        if !item.added.is_empty() {
            lines.push(format!(
                "{}: {} {} placeholder(s)",
                store.display_path(&item.language, &item.namespace),
                verb,
                item.added.len()
            ));
        }
        for conflict in &item.conflicts {
            lines.push(format!(
                "{}: skipped {}: {}",
                store.display_path(&item.language, &item.namespace),
                conflict.path,
                conflict.reason
            ));
        }
    }
    for failure in outcome.failures.findings() {
        lines.push(format!("{}: {}", failure.path, failure.message));
    }
    lines.push(format!(
        "{} placeholder(s) {}, {} conflict(s), {} file(s) written",
        outcome.added(),
        if dry_run { "pending" } else { "added" },
        outcome.conflicts(),
        outcome.written.len()
    ));
    lines
}

fn sync_json(outcome: &SyncOutcome, dry_run: bool) -> Result<String, String> {
    let written: Vec<String> = outcome
        .written
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    let body = json!({
        "dry_run": dry_run,
        "summary": {
            "added": outcome.added(),
            "conflicts": outcome.conflicts(),
            "written": outcome.written.len(),
            "failures": outcome.failures.len(),
        },
        "catalogs": outcome.outcomes,
        "written": written,
        "failures": outcome.failures.findings(),
    });
    serde_json::to_string_pretty(&body).map_err(|e| format!("Failed to serialize sync report: {}", e))
}

/// Runs reconciliation. Exit code 1 when any document could not be read or written.
pub fn run_sync_command(mut config: Config, opts: SyncOptions) -> Result<i32, String> {
    validate_directory(&config.catalog_dir, "Catalog directory")?;
    config.overwrite_conflicts |= opts.overwrite_conflicts;

    let engine = Engine::new(config).map_err(|e| format!("Invalid configuration: {}", e))?;
    let outcome = engine
        .reconcile(opts.dry_run)
        .map_err(|e| format!("Sync failed: {}", e))?;

    if opts.json {
        println!("{}", sync_json(&outcome, opts.dry_run)?);
    } else {
        for line in describe_sync(engine.store(), &outcome, opts.dry_run) {
            println!("{}", line);
        }
    }

    Ok(if outcome.failures.has_errors() { 1 } else { 0 })
}
