use std::{io, path::PathBuf, process};

use clap::{Parser, ValueEnum};
use log::error;

use manifest_auditor::{
    initialize_logger,
    results::report::{Generator, Json, Text},
    run_analysis, Severity,
};

/// Output format of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Color-coded console report.
    Text,
    /// Machine-readable JSON report.
    Json,
}

/// Audits an Android application manifest for security findings.
#[derive(Debug, Parser)]
#[command(name = "manifest-auditor", version, about)]
struct Cli {
    /// Path to the AndroidManifest.xml file
    #[arg(short, long, value_name = "PATH")]
    manifest: PathBuf,

    /// Path to the string resource file; a missing file disables
    /// symbolic string resolution
    #[arg(
        short,
        long,
        value_name = "PATH",
        default_value = "res/values/strings.xml"
    )]
    strings: PathBuf,

    /// Report output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Lowest severity kept in the findings list
    #[arg(short = 'l', long, value_parser = parse_severity, default_value = "info")]
    min_severity: Severity,

    /// Enables verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_severity(raw: &str) -> Result<Severity, String> {
    raw.parse::<Severity>().map_err(|e| e.to_string())
}

fn main() {
    let cli = Cli::parse();
    initialize_logger(cli.verbose);

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let report = run_analysis(&cli.manifest, &cli.strings, cli.min_severity)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut generator: Box<dyn Generator> = match cli.format {
        Format::Text => Box::new(Text::new()),
        Format::Json => Box::new(Json::new()),
    };

    generator.generate(&report, &mut out)
}
