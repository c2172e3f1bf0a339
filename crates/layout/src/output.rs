//! The page plan produced by layout and consumed by the renderer.
//!
//! All coordinates are in points in top-left page space: `y` grows downward
//! from the top edge of the page.

use serde::Serialize;
use titlepress_types::{ElementRef, Point, Rect, Size};

/// One glyph with its placed advance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacedGlyph {
    pub id: u16,
    pub advance: f32,
    /// The character the glyph was shaped from.
    pub ch: char,
}

/// A line of glyphs in one font at one size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlyphRun {
    pub font: String,
    pub size: f32,
    /// Start of the baseline.
    pub origin: Point,
    /// Grid-aligned top of the line box.
    pub line_top: f32,
    pub text: String,
    pub glyphs: Vec<PlacedGlyph>,
    pub width: f32,
    pub element: ElementRef,
}

/// A table row fragment: the header or one body row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowPlan {
    pub element: ElementRef,
    /// `None` for the header row.
    pub row_index: Option<usize>,
    pub rect: Rect,
    pub runs: Vec<GlyphRun>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagePlacement {
    pub asset: String,
    /// The declared placement.
    pub rect: Rect,
    /// Set when the declared placement extends past the page.
    pub clip: Option<Rect>,
    pub element: ElementRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RulePlacement {
    pub from: Point,
    pub to: Point,
    pub width: f32,
    pub element: ElementRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Text(GlyphRun),
    TableRow(RowPlan),
    Image(ImagePlacement),
    Rule(RulePlacement),
}

impl Primitive {
    pub fn element(&self) -> ElementRef {
        match self {
            Primitive::Text(run) => run.element,
            Primitive::TableRow(row) => row.element,
            Primitive::Image(img) => img.element,
            Primitive::Rule(rule) => rule.element,
        }
    }

    /// Every glyph run the primitive draws.
    pub fn runs(&self) -> &[GlyphRun] {
        match self {
            Primitive::Text(run) => std::slice::from_ref(run),
            Primitive::TableRow(row) => &row.runs,
            Primitive::Image(_) | Primitive::Rule(_) => &[],
        }
    }
}

/// One output page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagePlan {
    /// Position in the output document.
    pub index: usize,
    /// The template page definition this page was produced from.
    pub page_def: usize,
    pub continuation: bool,
    pub size: Size,
    pub primitives: Vec<Primitive>,
}

impl PagePlan {
    pub fn runs(&self) -> impl Iterator<Item = &GlyphRun> {
        self.primitives.iter().flat_map(|p| p.runs())
    }

    /// The rows drawn on this page for one table element, header excluded.
    pub fn table_rows(&self, element: ElementRef) -> Vec<usize> {
        self.primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::TableRow(row) if row.element == element => row.row_index,
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutWarning {
    /// Part of the element lies outside the page and is not drawn.
    Clipped { element: ElementRef },
    /// The element lies entirely outside the page and is dropped.
    OutsidePage { element: ElementRef },
    /// The font has no glyph for `ch`; standard fonts draw `?` in its place
    /// and TrueType fonts draw `.notdef`.
    GlyphSubstituted {
        element: ElementRef,
        ch: char,
        font: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutOutput {
    pub pages: Vec<PagePlan>,
    pub warnings: Vec<LayoutWarning>,
}
