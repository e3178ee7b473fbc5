use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use catalint::{Config, Engine};

use catalint_cli::validation::{validate_directory, validate_output_path};

#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Destination file; stdout when absent.
    pub output: Option<PathBuf>,
    pub tsv: bool,
}

/// Writes the flattened table. Documents that fail to load are reported on
/// stderr, left out of the table, and make the exit code 1.
pub fn run_export_command(config: Config, opts: ExportOptions) -> Result<i32, String> {
    validate_directory(&config.catalog_dir, "Catalog directory")?;
    if let Some(output) = &opts.output {
        validate_output_path(output)?;
    }

    let engine = Engine::new(config).map_err(|e| format!("Invalid configuration: {}", e))?;
    let (table, failures) = engine.export().map_err(|e| format!("Export failed: {}", e))?;
    let delimiter = if opts.tsv { b'\t' } else { b',' };

    match &opts.output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| format!("Cannot create {}: {}", path.display(), e))?;
            table
                .to_writer(BufWriter::new(file), delimiter)
                .map_err(|e| format!("Error writing output: {}", e))?;
            println!(
                "✅ Exported {} row(s) for {} language(s) to {}",
                table.rows.len(),
                table.languages.len(),
                path.display()
            );
        }
        None => {
            table
                .to_writer(io::stdout().lock(), delimiter)
                .map_err(|e| format!("Error writing output: {}", e))?;
        }
    }

    for failure in failures.findings() {
        eprintln!("Skipped {}: {}", failure.path, failure.message);
    }
    Ok(if failures.has_errors() { 1 } else { 0 })
}
