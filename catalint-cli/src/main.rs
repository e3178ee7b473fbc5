mod check;
mod export;
mod scan;
mod sync;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

use catalint_cli::{GlobalOptions, resolve_config};

use crate::check::{CheckOptions, run_check_command};
use crate::export::{ExportOptions, run_export_command};
use crate::scan::run_scan_command;
use crate::sync::{SyncOptions, run_sync_command};

/// Exit code for bad flags, config or unreadable inputs.
const USAGE_ERROR: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "catalint", author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Check catalogs against the default language and the source code.
    Check {
        /// Add marked placeholders for missing keys before checking
        #[arg(long)]
        fix: bool,

        /// With --fix, show what would be added without writing
        #[arg(long)]
        dry_run: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Findings listed per namespace/language group
        #[arg(long, value_name = "N")]
        max_items: Option<usize>,
    },

    /// Add marked placeholders for keys missing from non-default languages.
    Sync {
        /// Show what would be added without writing
        #[arg(long)]
        dry_run: bool,

        /// Replace values that block a missing path
        #[arg(long)]
        overwrite_conflicts: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export every key as rows of namespace, path and one column per language.
    Export {
        /// The output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Tab-separated instead of comma-separated
        #[arg(long)]
        tsv: bool,
    },

    /// List probable hard-coded user-facing text in source files.
    Scan,

    /// Print a shell completion script.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing(global: &GlobalOptions) {
    let level = if global.quiet {
        "error"
    } else {
        match global.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_env("CATALINT_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(args: Args) -> Result<i32, String> {
    if let Commands::Completions { shell } = args.commands {
        let mut command = Args::command();
        clap_complete::generate(shell, &mut command, "catalint", &mut std::io::stdout());
        return Ok(0);
    }

    let config = resolve_config(&args.global)?;
    match args.commands {
        Commands::Check {
            fix,
            dry_run,
            json,
            max_items,
        } => run_check_command(
            config,
            CheckOptions {
                fix,
                dry_run,
                json,
                max_items,
            },
        ),
        Commands::Sync {
            dry_run,
            overwrite_conflicts,
            json,
        } => run_sync_command(
            config,
            SyncOptions {
                dry_run,
                overwrite_conflicts,
                json,
            },
        ),
        Commands::Export { output, tsv } => run_export_command(config, ExportOptions { output, tsv }),
        Commands::Scan => run_scan_command(config),
        Commands::Completions { .. } => Ok(0),
    }
}

fn main() {
    let args = Args::parse();
    init_tracing(&args.global);

    let code = match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            USAGE_ERROR
        }
    };
    std::process::exit(code);
}
