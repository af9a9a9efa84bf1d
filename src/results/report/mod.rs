//! Report rendering for the presentation layer.

mod json;
mod text;

pub use self::json::Json;
pub use self::text::Text;

use std::io::Write;

use anyhow::Result;

use crate::results::Report;

/// Trait implemented by every report renderer.
///
/// The report handed in is identical regardless of the renderer; only
/// the output representation differs.
pub trait Generator {
    /// Renders `report` to the given writer.
    fn generate(&mut self, report: &Report, out: &mut dyn Write) -> Result<()>;
}
