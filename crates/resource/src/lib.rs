//! Scoped loading of everything a render reads from outside the record:
//! font programs and their aliases, templates, the archival ICC profile and
//! image assets.
//!
//! Loaders read each file once (open, read, close) and hand back immutable
//! values that are shared between renders.

pub mod error;
pub mod filesystem;
pub mod fonts;
pub mod provider;
pub mod templates;

pub use error::ResourceError;
pub use filesystem::FilesystemResourceProvider;
pub use fonts::{FontMap, FontMapEntry, load_font_directory, parse_font_map};
pub use provider::{InMemoryResourceProvider, ResourceProvider, SharedResourceData};
pub use templates::{load_icc_profile, load_template, load_template_directory};
