use crate::LayoutError;
use crate::fonts::{FontFace, FontRegistry};
use crate::output::{LayoutWarning, Primitive};
use std::collections::BTreeSet;
use std::sync::Arc;
use titlepress_template::{BaselineGrid, PageDef};
use titlepress_types::ElementRef;

/// Everything an element needs while it is laid out on its page definition.
pub struct LayoutContext<'a> {
    pub fonts: &'a FontRegistry,
    pub page: &'a PageDef,
    pub grid: Option<BaselineGrid>,
    pub element: ElementRef,
    pub min_rows: usize,
    pub ellipsis: &'a str,
    pub warnings: &'a mut Vec<LayoutWarning>,
}

impl LayoutContext<'_> {
    pub fn face(&self, alias: &str) -> Result<&Arc<FontFace>, LayoutError> {
        self.fonts
            .get(alias)
            .ok_or_else(|| LayoutError::FontAliasUnresolved {
                alias: alias.to_string(),
                element: self.element,
            })
    }

    /// `y` moved down to the next grid line, or unchanged without a grid.
    pub fn snap(&self, y: f32) -> f32 {
        self.grid.map_or(y, |g| g.snap_up(y))
    }

    /// Distance between consecutive line tops.
    pub fn step(&self, leading: f32) -> f32 {
        self.grid.map_or(leading, |g| g.step(leading))
    }

    /// `height` rounded up to whole grid increments.
    pub fn round_up(&self, height: f32) -> f32 {
        self.grid.map_or(height, |g| {
            (height / g.increment - 1e-4).ceil().max(0.0) * g.increment
        })
    }

    /// Lowest y that flowing content may reach.
    pub fn flow_limit(&self) -> f32 {
        self.page.size.height - self.page.margins.bottom
    }

    pub fn warn(&mut self, warning: LayoutWarning) {
        log::warn!("{:?}", warning);
        self.warnings.push(warning);
    }

    /// Warns once per font and character the element's text cannot draw.
    pub fn check_glyphs(&mut self, layout: &ElementLayout) {
        let fonts = self.fonts;
        let mut missing = BTreeSet::new();
        let runs = layout
            .primary
            .iter()
            .chain(layout.continuations.iter().flatten())
            .flat_map(|p| p.runs());
        for run in runs {
            let Some(face) = fonts.get(&run.font) else {
                continue;
            };
            for ch in face.missing_chars(&run.text) {
                if missing.insert((run.font.clone(), ch)) {
                    self.warn(LayoutWarning::GlyphSubstituted {
                        element: self.element,
                        ch,
                        font: run.font.clone(),
                    });
                }
            }
        }
    }
}

/// The primitives one element produces: those on its own page and, for
/// flowing elements, one list per continuation page.
#[derive(Debug, Default)]
pub struct ElementLayout {
    pub primary: Vec<Primitive>,
    pub continuations: Vec<Vec<Primitive>>,
}

impl ElementLayout {
    pub fn fixed(primary: Vec<Primitive>) -> Self {
        Self {
            primary,
            continuations: Vec::new(),
        }
    }
}
