//! Android manifest security auditor.
//!
//! Statically analyzes an Android application manifest and surfaces
//! security-relevant findings: components unsafely exposed to other
//! applications, use of dangerous permissions and declared deep-link
//! URI schemes. The analysis is a single, read-only pass over the
//! parsed document; the structured [`Report`] it produces is consumed
//! by a console or JSON renderer.

pub mod analysis;
pub mod error;
pub mod manifest;
pub mod results;
pub mod severity;

use std::{env, io::Write, path::Path};

use colored::Colorize;
use log::{debug, Level, LevelFilter};

pub use crate::analysis::analyze;
pub use crate::error::ParseError;
pub use crate::manifest::{ManifestDocument, StringTable};
pub use crate::results::{Finding, FindingCategory, Report};
pub use crate::severity::Severity;

/// Loads both input documents and runs the full analysis.
///
/// A missing strings file yields an empty string table; a missing or
/// malformed manifest is fatal and no partial report is produced.
pub fn run_analysis(
    manifest_path: &Path,
    strings_path: &Path,
    min_severity: Severity,
) -> Result<Report, ParseError> {
    let strings = StringTable::load(strings_path)?;
    debug!("string table holds {} entries", strings.len());

    let document = ManifestDocument::load(manifest_path)?;

    Ok(analysis::analyze(&document, &strings, min_severity))
}

/// Initializes the logger used across the crate.
///
/// `RUST_LOG` overrides the default filter when set.
pub fn initialize_logger(is_verbose: bool) {
    let log_level = if is_verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.format(|buf, record| match record.level() {
        Level::Warn => writeln!(
            buf,
            "{}{}",
            "Warning: ".bold().yellow(),
            record.args().to_string().yellow()
        ),
        Level::Error => writeln!(
            buf,
            "{}{}",
            "Error: ".bold().red(),
            record.args().to_string().red()
        ),
        Level::Debug => writeln!(
            buf,
            "{}{}",
            "Debug: ".bold(),
            record.args().to_string().bold()
        ),
        _ => writeln!(buf, "{}", record.args()),
    });

    if let Ok(env_log) = env::var("RUST_LOG") {
        builder.parse_filters(&env_log);
    } else {
        builder.filter(Some("manifest_auditor"), log_level);
    }

    if let Err(e) = builder.try_init() {
        eprintln!("could not initialize the logger: {}", e);
    }
}
