//! Module containing the manifest document model and its loader.

mod strings;
#[cfg(test)]
mod tests;

pub use strings::StringTable;

use std::{fmt, fs, path::Path};

use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;

use crate::error::ParseError;

/// Kind of an application component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Activity,
    Service,
    Receiver,
    Provider,
}

impl ComponentKind {
    /// Gets the manifest tag name of the component kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activity => "activity",
            Self::Service => "service",
            Self::Receiver => "receiver",
            Self::Provider => "provider",
        }
    }

    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"activity" => Some(Self::Activity),
            b"service" => Some(Self::Service),
            b"receiver" => Some(Self::Receiver),
            b"provider" => Some(Self::Provider),
            _ => None,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `data` element of an intent filter.
///
/// Values are kept as written in the document and may still carry
/// `@string/` references; they are resolved by the analysis stages.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct DataSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(rename = "pathPrefix", skip_serializing_if = "Option::is_none")]
    pub path_prefix: Option<String>,
    #[serde(rename = "pathPattern", skip_serializing_if = "Option::is_none")]
    pub path_pattern: Option<String>,
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Ordered actions, categories and data specifications of one intent
/// filter. A filter belongs to exactly one component.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct IntentFilter {
    pub actions: Vec<String>,
    pub categories: Vec<String>,
    pub data: Vec<DataSpec>,
}

/// Raw component declaration as found in the manifest.
#[derive(Debug, Clone)]
pub struct ComponentDecl {
    pub kind: ComponentKind,
    pub name: String,
    pub exported: Option<String>,
    pub permission: Option<String>,
    pub read_permission: Option<String>,
    pub write_permission: Option<String>,
    pub grant_uri_permissions: Option<String>,
    pub intent_filters: Vec<IntentFilter>,
}

impl ComponentDecl {
    fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            name: String::new(),
            exported: None,
            permission: None,
            read_permission: None,
            write_permission: None,
            grant_uri_permissions: None,
            intent_filters: Vec::new(),
        }
    }
}

/// A `<permission>` declaration with its protection level.
#[derive(Debug, Clone)]
pub struct PermissionDecl {
    pub name: String,
    pub protection_level: Option<String>,
}

/// Parsed manifest document. Immutable once loaded.
#[derive(Debug, Default)]
pub struct ManifestDocument {
    package: String,
    uses_permissions: Vec<String>,
    permission_decls: Vec<PermissionDecl>,
    components: Vec<ComponentDecl>,
}

impl ManifestDocument {
    /// Loads and parses the manifest at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let code = fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let document = Self::parse(&code).map_err(|source| ParseError::Xml {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            "loaded manifest for `{}`: {} components, {} requested permissions",
            document.package,
            document.components.len(),
            document.uses_permissions.len()
        );

        Ok(document)
    }

    /// Parses a manifest document from its XML source.
    pub(crate) fn parse(code: &str) -> Result<Self, quick_xml::Error> {
        let mut reader = Reader::from_str(code);
        let mut buf = Vec::new();
        let mut document = Self::default();
        let mut component: Option<ComponentDecl> = None;
        let mut filter: Option<IntentFilter> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => {
                    document.open_element(e, &mut component, &mut filter)?;
                }
                Event::Empty(ref e) => {
                    document.open_element(e, &mut component, &mut filter)?;
                    document.close_element(e.local_name().as_ref(), &mut component, &mut filter);
                }
                Event::End(ref e) => {
                    document.close_element(e.local_name().as_ref(), &mut component, &mut filter);
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(document)
    }

    /// Package name declared on the manifest root.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Requested permissions, in declaration order.
    pub fn uses_permissions(&self) -> &[String] {
        &self.uses_permissions
    }

    /// Custom `<permission>` declarations.
    pub fn permission_decls(&self) -> &[PermissionDecl] {
        &self.permission_decls
    }

    /// Component declarations, in document order.
    pub fn components(&self) -> &[ComponentDecl] {
        &self.components
    }

    /// Tells whether `permission` is declared in this manifest with a
    /// signature protection level.
    pub fn is_signature_protected(&self, permission: &str) -> bool {
        self.permission_decls.iter().any(|decl| {
            decl.name == permission
                && decl
                    .protection_level
                    .as_deref()
                    .map_or(false, |level| level.contains("signature"))
        })
    }

    fn open_element(
        &mut self,
        e: &BytesStart<'_>,
        component: &mut Option<ComponentDecl>,
        filter: &mut Option<IntentFilter>,
    ) -> Result<(), quick_xml::Error> {
        match e.local_name().as_ref() {
            b"manifest" => {
                if let Some(package) = attribute(e, b"package")? {
                    self.package = package;
                }
            }
            b"uses-permission" => {
                if let Some(name) = attribute(e, b"name")? {
                    self.uses_permissions.push(name);
                }
            }
            b"permission" => {
                let mut name = None;
                let mut protection_level = None;
                for attr in e.attributes() {
                    let attr = attr?;
                    match attr.key.local_name().as_ref() {
                        b"name" => name = Some(attr.unescape_value()?.into_owned()),
                        b"protectionLevel" => {
                            protection_level = Some(attr.unescape_value()?.into_owned());
                        }
                        _ => {}
                    }
                }
                if let Some(name) = name {
                    self.permission_decls.push(PermissionDecl {
                        name,
                        protection_level,
                    });
                }
            }
            b"intent-filter" => {
                if component.is_some() {
                    *filter = Some(IntentFilter::default());
                }
            }
            b"action" => {
                if let (Some(filter), Some(name)) = (filter.as_mut(), attribute(e, b"name")?) {
                    filter.actions.push(name);
                }
            }
            b"category" => {
                if let (Some(filter), Some(name)) = (filter.as_mut(), attribute(e, b"name")?) {
                    filter.categories.push(name);
                }
            }
            b"data" => {
                if let Some(filter) = filter.as_mut() {
                    filter.data.push(parse_data_attributes(e)?);
                }
            }
            tag => {
                if let Some(kind) = ComponentKind::from_tag(tag) {
                    *component = Some(parse_component_attributes(kind, e)?);
                }
            }
        }

        Ok(())
    }

    fn close_element(
        &mut self,
        tag: &[u8],
        component: &mut Option<ComponentDecl>,
        filter: &mut Option<IntentFilter>,
    ) {
        if tag == b"intent-filter" {
            if let (Some(filter), Some(component)) = (filter.take(), component.as_mut()) {
                component.intent_filters.push(filter);
            }
        } else if ComponentKind::from_tag(tag).is_some() {
            if let Some(component) = component.take() {
                self.components.push(component);
            }
        }
    }
}

fn parse_component_attributes(
    kind: ComponentKind,
    e: &BytesStart<'_>,
) -> Result<ComponentDecl, quick_xml::Error> {
    let mut decl = ComponentDecl::new(kind);
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.local_name().as_ref() {
            b"name" => decl.name = value,
            b"exported" => decl.exported = Some(value),
            b"permission" => decl.permission = Some(value),
            b"readPermission" => decl.read_permission = Some(value),
            b"writePermission" => decl.write_permission = Some(value),
            b"grantUriPermissions" => decl.grant_uri_permissions = Some(value),
            _ => {}
        }
    }
    Ok(decl)
}

fn parse_data_attributes(e: &BytesStart<'_>) -> Result<DataSpec, quick_xml::Error> {
    let mut data = DataSpec::default();
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.local_name().as_ref() {
            b"scheme" => data.scheme = Some(value),
            b"host" => data.host = Some(value),
            b"port" => data.port = Some(value),
            b"path" => data.path = Some(value),
            b"pathPrefix" => data.path_prefix = Some(value),
            b"pathPattern" => data.path_pattern = Some(value),
            b"mimeType" => data.mime_type = Some(value),
            _ => {}
        }
    }
    Ok(data)
}

/// Looks an attribute up by its local name, ignoring the namespace
/// prefix.
fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, quick_xml::Error> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}
