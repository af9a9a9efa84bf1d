//! Module containing the manifest analysis stages.
//!
//! The three stages (component classification, permission analysis and
//! deep-link extraction) read the same immutable document and write to
//! disjoint outputs; [`analyze`] runs them and merges the results.

pub mod components;
pub mod deep_links;
pub mod permissions;

use crate::{
    manifest::{ManifestDocument, StringTable},
    results::Report,
    severity::Severity,
};

/// Runs the full analysis over a loaded document.
///
/// Findings are ordered component findings first, then permission
/// findings, then deep-link findings, stable within each group in
/// declaration order. Findings below `min_severity` are dropped before
/// aggregation; `Severity::Info` keeps everything.
pub fn analyze(
    document: &ManifestDocument,
    strings: &StringTable,
    min_severity: Severity,
) -> Report {
    let (components, mut findings) = components::classify(document, strings);
    let (permissions, permission_findings) = permissions::analyze(document, strings);
    let (deep_links, deep_link_findings) = deep_links::extract(document, strings);

    findings.extend(permission_findings);
    findings.extend(deep_link_findings);
    findings.retain(|finding| finding.severity() >= min_severity);

    Report::new(
        document.package().to_owned(),
        components,
        permissions,
        deep_links,
        findings,
    )
}
