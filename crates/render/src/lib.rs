//! Deterministic PDF output for certificate page plans.
//!
//! [`PdfRenderer::render`] serializes the pages produced by layout into a
//! PDF whose bytes depend only on its inputs: fixed object numbering, sorted
//! dictionaries, fixed metadata and a trailer `/ID` taken from the record's
//! content hash. Each page can carry a verification code of that hash, and
//! documents can be produced in PDF/A-2b archival form when an ICC profile
//! is available and every font is embedded.

pub mod archival;
pub mod content;
pub mod error;
pub mod fonts;
pub mod glyph;
pub mod images;
pub mod renderer;
pub mod writer;

pub use error::{RenderError, RenderWarning};
pub use renderer::{DocumentSettings, PdfRenderer, RenderedDocument};

#[cfg(test)]
mod render_test;
