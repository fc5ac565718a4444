//! API Field Finder CLI
//!
//! Command-line interface for finding fields by name in Swagger/OpenAPI documents.

use std::path::PathBuf;
use std::process::ExitCode;

use api_field_finder::{
    load_document_auto, render_json, render_markdown, scan, ScanOptions, ScanReport,
};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "api-field-finder")]
#[command(about = "Find fields matching name patterns in Swagger 2.0 / OpenAPI 3.x documents")]
#[command(version)]
struct Cli {
    /// API description document: file path or URL (http:// or https://)
    spec: String,

    /// Field name pattern (case-insensitive regex, repeatable; default: time)
    #[arg(long, short = 'p', value_name = "REGEX")]
    pattern: Vec<String>,

    /// Output format: markdown (default) or json
    #[arg(long, default_value = "markdown")]
    format: String,

    /// Output file (stdout if not specified)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Only print the report, without the summary lines
    #[arg(long, short)]
    quiet: bool,

    /// Log level when RUST_LOG is not set (logs go to stderr)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), u8> {
    let json_output = match cli.format.as_str() {
        "markdown" => false,
        "json" => true,
        other => {
            eprintln!("Error: unknown format \"{}\": expected markdown or json", other);
            return Err(2);
        }
    };

    // Patterns are compiled before the document is touched.
    let options = ScanOptions::new(cli.pattern);
    let matcher = options.matcher().map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    info!(source = %cli.spec, "loading document");
    let document = load_document_auto(&cli.spec).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let report = scan(&document, &matcher).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;
    debug!(
        records = report.records.len(),
        matches = report.match_count(),
        "scanned document"
    );

    let rendered = if json_output {
        render_json(&report).map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?
    } else {
        render_markdown(&report)
    };

    match cli.output {
        Some(path) => {
            std::fs::write(&path, &rendered).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
            info!(path = %path.display(), "report written");
        }
        None => {
            if !json_output && !cli.quiet {
                print_summary(&options, &report);
            }
            println!("{}", rendered);
        }
    }

    Ok(())
}

fn print_summary(options: &ScanOptions, report: &ScanReport) {
    println!("Search patterns: {}", options.patterns.join(", "));
    println!("Detected format: {}", report.dialect);
    println!(
        "Found {} API(s) with matching fields ({} operations scanned)\n",
        report.records.len(),
        report.operations_scanned
    );
}
