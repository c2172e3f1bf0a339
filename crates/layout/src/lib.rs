//! Page layout for bound certificate templates.
//!
//! [`LayoutEngine::layout`] turns a [`BoundTemplate`](titlepress_template::BoundTemplate)
//! into a list of [`PagePlan`]s: text wrapped and snapped to the baseline
//! grid, tables split over continuation pages with widow control, and
//! images and rules clipped to the page. Fonts come from a read-only
//! [`FontRegistry`] that is shared with the renderer.

pub mod algorithms;
pub mod config;
pub(crate) mod engine;
pub mod error;
pub mod fonts;
pub mod interface;
pub mod nodes;
pub mod output;
pub mod standard_fonts;
pub mod text;

pub use self::config::LayoutConfig;
pub use self::engine::LayoutEngine;
pub use self::error::LayoutError;
pub use self::fonts::{
    FontError, FontFace, FontProgram, FontRegistry, FontRegistryBuilder, TrueTypeProgram,
};
pub use self::output::{
    GlyphRun, ImagePlacement, LayoutOutput, LayoutWarning, PagePlan, PlacedGlyph, Primitive,
    RowPlan, RulePlacement,
};
pub use self::standard_fonts::StandardFont;

#[cfg(test)]
mod test_utils;
