//! String resource table and symbolic reference resolution.

use std::{collections::HashMap, fs, io, path::Path};

use log::debug;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::ParseError;

/// Prefix marking a symbolic string resource reference.
const STRING_REF_PREFIX: &str = "@string/";

/// Table of string resources loaded from a `strings.xml` document.
#[derive(Debug, Default)]
pub struct StringTable {
    entries: HashMap<String, String>,
}

impl StringTable {
    /// Loads the string table at `path`.
    ///
    /// A missing file yields an empty table: string resources are
    /// best-effort and analysis proceeds without them.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let code = match fs::read_to_string(path) {
            Ok(code) => code,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no string resources found at `{}`", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ParseError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        Self::parse(&code).map_err(|source| ParseError::Xml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses a string resource document from its XML source.
    pub(crate) fn parse(code: &str) -> Result<Self, quick_xml::Error> {
        let mut reader = Reader::from_str(code);
        let mut buf = Vec::new();
        let mut entries = HashMap::new();
        let mut current: Option<String> = None;
        let mut value = String::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) if e.local_name().as_ref() == b"string" => {
                    for attr in e.attributes() {
                        let attr = attr?;
                        if attr.key.local_name().as_ref() == b"name" {
                            current = Some(attr.unescape_value()?.into_owned());
                        }
                    }
                    value.clear();
                }
                Event::Text(ref e) => {
                    if current.is_some() {
                        value.push_str(&e.unescape()?);
                    }
                }
                Event::CData(e) => {
                    if current.is_some() {
                        value.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Event::End(ref e) if e.local_name().as_ref() == b"string" => {
                    if let Some(name) = current.take() {
                        entries.insert(name, value.trim().to_owned());
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { entries })
    }

    /// Resolves a raw attribute value against the table.
    ///
    /// `@string/<name>` references become the table value when present
    /// and pass through unchanged when the table has no such entry. Any
    /// other value is returned as-is. Resolution never fails.
    pub fn resolve<'a>(&'a self, raw: &'a str) -> &'a str {
        match raw.strip_prefix(STRING_REF_PREFIX) {
            Some(name) => match self.entries.get(name) {
                Some(value) => value,
                None => {
                    debug!("unresolved string reference `{}`", raw);
                    raw
                }
            },
            None => raw,
        }
    }

    /// Looks a resource up by bare name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
