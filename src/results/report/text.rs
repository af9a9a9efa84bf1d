//! Color-coded console report generation module.

use std::io::Write;

use anyhow::Result;
use colored::{ColoredString, Colorize};

use super::Generator;
use crate::{
    analysis::{
        components::Component,
        permissions::RiskTier,
    },
    manifest::{ComponentKind, DataSpec},
    results::{Finding, Report},
    severity::Severity,
};

/// Console report generator.
#[derive(Debug, Default)]
pub struct Text;

impl Text {
    /// Creates a new console report generator.
    pub fn new() -> Self {
        Self
    }
}

impl Generator for Text {
    fn generate(&mut self, report: &Report, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "{}", "Android Manifest Analysis Report".bold())?;
        writeln!(out, "Package: {}", report.package().bold().blue())?;

        writeln!(out)?;
        writeln!(out, "{}", "Components".bold().underline())?;
        for component in report.components() {
            write_component(out, component)?;
        }

        writeln!(out)?;
        writeln!(out, "{}", "Deep Links".bold().underline())?;
        for link in report.deep_links() {
            writeln!(
                out,
                "  {} {}",
                link.uri().green(),
                format!("({})", link.component()).dimmed()
            )?;
        }

        writeln!(out)?;
        writeln!(out, "{}", "Security Findings".bold().underline())?;
        if report.findings().is_empty() {
            writeln!(out, "  {}", "No findings.".green())?;
        } else {
            for finding in report.findings() {
                write_finding(out, finding)?;
            }
        }

        writeln!(out)?;
        writeln!(out, "{}", "Permissions".bold().underline())?;
        for permission in report.permissions() {
            writeln!(
                out,
                "  {} {}",
                tier_label(permission.tier()),
                permission.name()
            )?;
        }

        writeln!(out)?;
        writeln!(out, "{}", "Summary".bold().underline())?;
        for severity in [Severity::High, Severity::Medium, Severity::Low, Severity::Info] {
            writeln!(
                out,
                "  {}: {}",
                severity_label(severity),
                report.count(severity)
            )?;
        }

        Ok(())
    }
}

fn write_component(out: &mut dyn Write, component: &Component) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{} {}", kind_tag(component.kind()), component.name())?;

    let exported = if component.is_exported() {
        "yes".yellow()
    } else {
        "no".green()
    };
    writeln!(out, "  Exported: {}", exported)?;

    if !component.permissions().is_empty() {
        writeln!(out, "  Permissions: {}", component.permissions().join(", "))?;
    }

    for (i, filter) in component.intent_filters().iter().enumerate() {
        writeln!(
            out,
            "  Filter {}: actions [{}]",
            i + 1,
            filter.actions.join(", ")
        )?;
        if !filter.categories.is_empty() {
            writeln!(out, "    categories [{}]", filter.categories.join(", "))?;
        }
        for data in &filter.data {
            writeln!(out, "    data {}", describe_data(data))?;
        }
    }

    Ok(())
}

fn write_finding(out: &mut dyn Write, finding: &Finding) -> Result<()> {
    writeln!(
        out,
        "  {} {} {}",
        severity_label(finding.severity()),
        finding.message(),
        format!("({})", finding.category()).dimmed()
    )?;
    Ok(())
}

fn describe_data(data: &DataSpec) -> String {
    let mut parts = Vec::new();
    if let Some(value) = &data.scheme {
        parts.push(format!("scheme={}", value));
    }
    if let Some(value) = &data.host {
        parts.push(format!("host={}", value));
    }
    if let Some(value) = &data.port {
        parts.push(format!("port={}", value));
    }
    if let Some(value) = &data.path {
        parts.push(format!("path={}", value));
    }
    if let Some(value) = &data.path_prefix {
        parts.push(format!("pathPrefix={}", value));
    }
    if let Some(value) = &data.path_pattern {
        parts.push(format!("pathPattern={}", value));
    }
    if let Some(value) = &data.mime_type {
        parts.push(format!("mimeType={}", value));
    }
    parts.join(" ")
}

fn kind_tag(kind: ComponentKind) -> ColoredString {
    let tag = format!("[{}]", kind.as_str().to_uppercase());
    match kind {
        ComponentKind::Activity => tag.yellow().bold(),
        ComponentKind::Service => tag.blue().bold(),
        ComponentKind::Receiver => tag.green().bold(),
        ComponentKind::Provider => tag.magenta().bold(),
    }
}

fn severity_label(severity: Severity) -> ColoredString {
    let label = format!("[{}]", severity);
    match severity {
        Severity::High => label.red().bold(),
        Severity::Medium => label.yellow().bold(),
        Severity::Low => label.cyan(),
        Severity::Info => label.dimmed(),
    }
}

fn tier_label(tier: RiskTier) -> ColoredString {
    match tier {
        RiskTier::Dangerous => tier.as_str().red().bold(),
        RiskTier::Signature => tier.as_str().yellow(),
        RiskTier::Normal => tier.as_str().green(),
        RiskTier::Unknown => tier.as_str().cyan(),
    }
}
