//! JSON report generation module.

use std::io::Write;

use anyhow::Result;

use super::Generator;
use crate::results::Report;

/// JSON report generator.
#[derive(Debug, Default)]
pub struct Json;

impl Json {
    /// Creates a new JSON report generator.
    pub fn new() -> Self {
        Self
    }
}

impl Generator for Json {
    fn generate(&mut self, report: &Report, out: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, report)?;
        writeln!(out)?;
        Ok(())
    }
}
