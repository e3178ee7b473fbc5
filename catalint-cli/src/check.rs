use catalint::{Config, Engine, report};

use crate::sync::describe_sync;
use catalint_cli::validation::{validate_directory, validate_max_items};

#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Reconcile missing keys before checking.
    pub fix: bool,
    /// With `fix`, report what would be added without writing.
    pub dry_run: bool,
    pub json: bool,
    pub max_items: Option<usize>,
}

pub fn run_check_command(config: Config, opts: CheckOptions) -> Result<i32, String> {
    validate_directory(&config.catalog_dir, "Catalog directory")?;
    if config.check_references || config.report_unused {
        validate_directory(&config.source_dir, "Source directory")?;
    }
    let max_items = opts.max_items.unwrap_or(config.max_items_per_group);
    validate_max_items(max_items)?;

    let engine = Engine::new(config).map_err(|e| format!("Invalid configuration: {}", e))?;

    if opts.fix {
        let outcome = engine
            .reconcile(opts.dry_run)
            .map_err(|e| format!("Fix failed: {}", e))?;
        // stdout stays pure JSON with --json
        for line in describe_sync(engine.store(), &outcome, opts.dry_run) {
            if opts.json {
                eprintln!("{}", line);
            } else {
                println!("{}", line);
            }
        }
        if !opts.json {
            println!();
        }
    } else if opts.dry_run {
        tracing::warn!("--dry-run has no effect without --fix");
    }

    let outcome = engine.check().map_err(|e| format!("Check failed: {}", e))?;
    if opts.json {
        let text = report::render_json(&outcome.report, &outcome.summary)
            .map_err(|e| format!("Failed to serialize report: {}", e))?;
        println!("{}", text);
    } else {
        println!(
            "{}",
            report::render_human(&outcome.report, &outcome.summary, max_items)
        );
    }
    Ok(report::exit_code(&outcome.report))
}
