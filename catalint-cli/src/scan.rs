use catalint::{Config, Engine, report::truncate_display};

use catalint_cli::validation::validate_directory;

const TEXT_WIDTH: usize = 70;

/// Lists probable hard-coded user-facing text. Advisory: always exits 0.
pub fn run_scan_command(config: Config) -> Result<i32, String> {
    validate_directory(&config.source_dir, "Source directory")?;
    let source_dir = config.source_dir.clone();

    let engine = Engine::new(config).map_err(|e| format!("Invalid configuration: {}", e))?;
    let hits = engine
        .scan_literals()
        .map_err(|e| format!("Scan failed: {}", e))?;

    if hits.is_empty() {
        println!("✅ No hard-coded text found");
        return Ok(0);
    }

    println!("=== Possible hard-coded text ({}) ===", hits.len());
    for hit in &hits {
        let file = hit.file.strip_prefix(&source_dir).unwrap_or(hit.file.as_path());
        println!(
            "{}:{}: {}",
            file.display(),
            hit.line,
            truncate_display(&hit.text, TEXT_WIDTH)
        );
    }
    Ok(0)
}
