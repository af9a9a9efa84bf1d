//! Module containing the definition of error types.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Fatal error raised while loading an input document.
///
/// Everything else the analysis runs into (missing string resources,
/// unknown permissions, a missing strings file) degrades gracefully and
/// stays visible in the report instead of failing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file could not be opened or read.
    #[error("could not read `{}`: {source}", path.display())]
    Io {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The document is not well-formed XML.
    #[error("malformed XML in `{}`: {source}", path.display())]
    Xml {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying parser error.
        #[source]
        source: quick_xml::Error,
    },
}
