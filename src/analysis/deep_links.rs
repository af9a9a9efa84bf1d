//! Deep-link extraction from intent filters.

use serde::Serialize;

use crate::{
    analysis::components::{qualify_name, ACTION_VIEW, CATEGORY_BROWSABLE},
    manifest::{IntentFilter, ManifestDocument, StringTable},
    results::{Finding, FindingCategory},
    severity::Severity,
};

/// A URI pattern a component registered itself for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeepLink {
    scheme: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    component: String,
}

impl DeepLink {
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Name of the component owning the filter.
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Formats the link back into a URI.
    pub fn uri(&self) -> String {
        let mut uri = format!("{}://", self.scheme);
        if let Some(host) = &self.host {
            uri.push_str(host);
            if let Some(port) = &self.port {
                uri.push(':');
                uri.push_str(port);
            }
            if let Some(path) = &self.path {
                uri.push_str(path);
            }
        }
        uri
    }

    /// Web scheme plus a concrete host makes the link an App-Links
    /// association candidate.
    fn is_web_association(&self) -> bool {
        (self.scheme == "http" || self.scheme == "https") && self.host.is_some()
    }
}

/// Extracts deep-link candidates from every browsable VIEW filter.
///
/// Each data element of an eligible filter contributes independently;
/// duplicate (scheme, host, path) combinations within one filter
/// collapse into a single entry. Extraction is idempotent.
pub fn extract(
    document: &ManifestDocument,
    strings: &StringTable,
) -> (Vec<DeepLink>, Vec<Finding>) {
    let mut links: Vec<DeepLink> = Vec::new();
    let mut findings = Vec::new();

    for decl in document.components() {
        let component = qualify_name(strings.resolve(&decl.name), document.package());
        for filter in &decl.intent_filters {
            if !is_eligible(strings, filter) {
                continue;
            }

            let filter_start = links.len();
            for data in &filter.data {
                let scheme = match data.scheme.as_deref() {
                    Some(raw) => strings.resolve(raw).to_owned(),
                    None => continue,
                };
                let host = data
                    .host
                    .as_deref()
                    .map(|raw| strings.resolve(raw).to_owned());
                let port = data
                    .port
                    .as_deref()
                    .map(|raw| strings.resolve(raw).to_owned());
                let path = data
                    .path
                    .as_deref()
                    .or(data.path_prefix.as_deref())
                    .or(data.path_pattern.as_deref())
                    .map(|raw| strings.resolve(raw).to_owned());

                let duplicate = links[filter_start..]
                    .iter()
                    .any(|link| link.scheme == scheme && link.host == host && link.path == path);
                if duplicate {
                    continue;
                }

                let link = DeepLink {
                    scheme,
                    host,
                    port,
                    path,
                    component: component.clone(),
                };
                findings.push(link_finding(&link));
                links.push(link);
            }
        }
    }

    (links, findings)
}

/// Deep-link eligibility: a VIEW action, a BROWSABLE category and at
/// least one data element carrying a scheme.
fn is_eligible(strings: &StringTable, filter: &IntentFilter) -> bool {
    filter
        .actions
        .iter()
        .any(|action| strings.resolve(action) == ACTION_VIEW)
        && filter
            .categories
            .iter()
            .any(|category| strings.resolve(category) == CATEGORY_BROWSABLE)
        && filter.data.iter().any(|data| data.scheme.is_some())
}

fn link_finding(link: &DeepLink) -> Finding {
    if link.is_web_association() {
        Finding::new(
            Severity::Info,
            FindingCategory::DeepLink,
            format!(
                "`{}` is a web association candidate (App Links). Verify ownership of the \
                 domain.",
                link.uri()
            ),
            Some(link.component.clone()),
        )
    } else {
        Finding::new(
            Severity::Low,
            FindingCategory::DeepLink,
            format!(
                "Custom scheme deep link `{}` is reachable from browsers and other \
                 applications.",
                link.uri()
            ),
            Some(link.component.clone()),
        )
    }
}
