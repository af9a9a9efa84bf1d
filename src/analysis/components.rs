//! Component classification.

use log::warn;
use serde::Serialize;

use crate::{
    manifest::{ComponentDecl, ComponentKind, DataSpec, IntentFilter, ManifestDocument, StringTable},
    results::{Finding, FindingCategory},
    severity::Severity,
};

/// Intent action fired by browsers and link resolution.
pub(crate) const ACTION_VIEW: &str = "android.intent.action.VIEW";
/// Intent action used to hand external data to a component.
pub(crate) const ACTION_SEND: &str = "android.intent.action.SEND";
/// Category marking a filter as reachable from a browser.
pub(crate) const CATEGORY_BROWSABLE: &str = "android.intent.category.BROWSABLE";

/// A classified application component.
#[derive(Debug, Clone, Serialize)]
pub struct Component {
    kind: ComponentKind,
    name: String,
    exported: bool,
    permissions: Vec<String>,
    #[serde(rename = "intentFilters")]
    intent_filters: Vec<IntentFilter>,
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// Fully qualified component name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Effective exported state after applying the platform default.
    pub fn is_exported(&self) -> bool {
        self.exported
    }

    /// Permissions required to interact with the component.
    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }

    pub fn intent_filters(&self) -> &[IntentFilter] {
        &self.intent_filters
    }
}

/// Classifies every component declaration and emits exposure findings.
///
/// Components are independent; classifying one never affects another.
pub fn classify(
    document: &ManifestDocument,
    strings: &StringTable,
) -> (Vec<Component>, Vec<Finding>) {
    let mut components = Vec::with_capacity(document.components().len());
    let mut findings = Vec::new();

    for decl in document.components() {
        let component = classify_decl(document, strings, decl);
        check_exposure(document, strings, decl, &component, &mut findings);
        components.push(component);
    }

    (components, findings)
}

fn classify_decl(
    document: &ManifestDocument,
    strings: &StringTable,
    decl: &ComponentDecl,
) -> Component {
    let name = qualify_name(strings.resolve(&decl.name), document.package());
    let exported = effective_exported(strings, decl, &name);
    let permissions = required_permissions(strings, decl);
    let intent_filters = decl
        .intent_filters
        .iter()
        .map(|filter| resolve_filter(strings, filter))
        .collect();

    Component {
        kind: decl.kind,
        name,
        exported,
        permissions,
        intent_filters,
    }
}

/// Resolves the effective exported state.
///
/// An explicit `true`/`false` wins; without the attribute the platform
/// exports any component declaring at least one intent filter.
fn effective_exported(strings: &StringTable, decl: &ComponentDecl, name: &str) -> bool {
    match decl.exported.as_deref() {
        Some(raw) => match strings.resolve(raw).parse::<bool>() {
            Ok(explicit) => explicit,
            Err(_) => {
                warn!(
                    "`{}` carries an unparseable exported value `{}`, treating it as unset",
                    name, raw
                );
                !decl.intent_filters.is_empty()
            }
        },
        None => !decl.intent_filters.is_empty(),
    }
}

fn required_permissions(strings: &StringTable, decl: &ComponentDecl) -> Vec<String> {
    let mut permissions = Vec::new();
    let raw_values = [
        decl.permission.as_deref(),
        decl.read_permission.as_deref(),
        decl.write_permission.as_deref(),
    ];
    for raw in raw_values.into_iter().flatten() {
        let resolved = strings.resolve(raw).to_owned();
        if !permissions.contains(&resolved) {
            permissions.push(resolved);
        }
    }
    permissions
}

fn resolve_filter(strings: &StringTable, filter: &IntentFilter) -> IntentFilter {
    IntentFilter {
        actions: filter
            .actions
            .iter()
            .map(|action| strings.resolve(action).to_owned())
            .collect(),
        categories: filter
            .categories
            .iter()
            .map(|category| strings.resolve(category).to_owned())
            .collect(),
        data: filter
            .data
            .iter()
            .map(|data| resolve_data(strings, data))
            .collect(),
    }
}

fn resolve_data(strings: &StringTable, data: &DataSpec) -> DataSpec {
    let resolve = |value: &Option<String>| {
        value
            .as_deref()
            .map(|raw| strings.resolve(raw).to_owned())
    };
    DataSpec {
        scheme: resolve(&data.scheme),
        host: resolve(&data.host),
        port: resolve(&data.port),
        path: resolve(&data.path),
        path_prefix: resolve(&data.path_prefix),
        path_pattern: resolve(&data.path_pattern),
        mime_type: resolve(&data.mime_type),
    }
}

fn check_exposure(
    document: &ManifestDocument,
    strings: &StringTable,
    decl: &ComponentDecl,
    component: &Component,
    findings: &mut Vec<Finding>,
) {
    if !component.exported {
        return;
    }

    if component.permissions.is_empty() {
        findings.push(Finding::new(
            Severity::High,
            FindingCategory::ExportedComponent,
            format!(
                "Exported {} `{}` declares no access permission. It can be invoked by any \
                 application on the device.",
                component.kind, component.name
            ),
            Some(component.name.clone()),
        ));
    } else if !component
        .permissions
        .iter()
        .any(|permission| document.is_signature_protected(permission))
        && component.intent_filters.iter().any(accepts_arbitrary_data)
    {
        findings.push(Finding::new(
            Severity::Medium,
            FindingCategory::ExportedComponent,
            format!(
                "Exported {} `{}` is permission-protected but accepts VIEW/SEND intents \
                 without a data scheme restriction.",
                component.kind, component.name
            ),
            Some(component.name.clone()),
        ));
    }

    if component.kind == ComponentKind::Provider && grants_uri_permissions(strings, decl) {
        findings.push(Finding::new(
            Severity::Medium,
            FindingCategory::ExportedComponent,
            format!(
                "Exported provider `{}` grants URI permissions. Other applications may obtain \
                 access to protected content.",
                component.name
            ),
            Some(component.name.clone()),
        ));
    }
}

/// A filter taking VIEW or SEND with no data scheme accepts arbitrary
/// external data.
fn accepts_arbitrary_data(filter: &IntentFilter) -> bool {
    filter
        .actions
        .iter()
        .any(|action| action == ACTION_VIEW || action == ACTION_SEND)
        && !filter.data.iter().any(|data| data.scheme.is_some())
}

fn grants_uri_permissions(strings: &StringTable, decl: &ComponentDecl) -> bool {
    decl.grant_uri_permissions
        .as_deref()
        .map_or(false, |raw| {
            strings.resolve(raw).parse::<bool>().unwrap_or(false)
        })
}

/// Qualifies a component name against the package, handling relative
/// names like `.MainActivity`.
pub(crate) fn qualify_name(name: &str, package: &str) -> String {
    if package.is_empty() {
        return name.trim_start_matches('.').to_owned();
    }
    if let Some(rest) = name.strip_prefix('.') {
        format!("{}.{}", package, rest)
    } else if !name.is_empty() && !name.contains('.') {
        format!("{}.{}", package, name)
    } else {
        name.to_owned()
    }
}
