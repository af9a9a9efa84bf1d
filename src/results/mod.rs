//! Structured findings report handed to the presentation layer.

pub mod report;

use std::{collections::BTreeMap, fmt};

use serde::Serialize;

use crate::{
    analysis::{components::Component, deep_links::DeepLink, permissions::PermissionUsage},
    severity::Severity,
};

/// Category of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingCategory {
    ExportedComponent,
    DangerousPermission,
    DeepLink,
    Informational,
}

impl FindingCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExportedComponent => "exported-component",
            Self::DangerousPermission => "dangerous-permission",
            Self::DeepLink => "deep-link",
            Self::Informational => "informational",
        }
    }
}

impl fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One security-relevant observation. Immutable value record.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    severity: Severity,
    category: FindingCategory,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl Finding {
    /// Creates a new finding. `source` references the originating
    /// component or permission name.
    pub fn new(
        severity: Severity,
        category: FindingCategory,
        message: impl Into<String>,
        source: Option<String>,
    ) -> Self {
        Self {
            severity,
            category,
            message: message.into(),
            source,
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn category(&self) -> FindingCategory {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

/// Final analysis report.
///
/// Built once by the aggregation step and read-only afterwards.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    package: String,
    components: Vec<Component>,
    permissions: Vec<PermissionUsage>,
    deep_links: Vec<DeepLink>,
    findings: Vec<Finding>,
    summary: BTreeMap<Severity, usize>,
}

impl Report {
    /// Builds the report, computing the per-severity summary from the
    /// final findings list.
    pub fn new(
        package: String,
        components: Vec<Component>,
        permissions: Vec<PermissionUsage>,
        deep_links: Vec<DeepLink>,
        findings: Vec<Finding>,
    ) -> Self {
        let mut summary = BTreeMap::new();
        for severity in [Severity::Info, Severity::Low, Severity::Medium, Severity::High] {
            summary.insert(severity, 0);
        }
        for finding in &findings {
            *summary.entry(finding.severity).or_insert(0) += 1;
        }

        Self {
            package,
            components,
            permissions,
            deep_links,
            findings,
            summary,
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn permissions(&self) -> &[PermissionUsage] {
        &self.permissions
    }

    pub fn deep_links(&self) -> &[DeepLink] {
        &self.deep_links
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn summary(&self) -> &BTreeMap<Severity, usize> {
        &self.summary
    }

    /// Number of findings recorded at the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.summary.get(&severity).copied().unwrap_or(0)
    }
}
