//! Content stream operations for one page.
//!
//! Page plans use top-left coordinates; PDF user space has its origin at
//! the bottom-left, so every y is flipped against the page height here.

use crate::error::RenderError;
use crate::fonts::FontTable;
use lopdf::Object;
use lopdf::content::Operation;
use titlepress_layout::{GlyphRun, ImagePlacement, RulePlacement};
use titlepress_types::Rect;

/// Placed advances closer than this to the natural advance need no `TJ` adjustment.
const ADJUST_EPSILON: f32 = 1e-3;

pub struct PageContent<'a> {
    fonts: &'a FontTable,
    page_height: f32,
    ops: Vec<Operation>,
}

impl<'a> PageContent<'a> {
    pub fn new(fonts: &'a FontTable, page_height: f32) -> Self {
        Self {
            fonts,
            page_height,
            ops: Vec::new(),
        }
    }

    fn flip_y(&self, y: f32) -> f32 {
        self.page_height - y
    }

    pub fn text_run(&mut self, run: &GlyphRun) -> Result<(), RenderError> {
        if run.glyphs.is_empty() {
            return Ok(());
        }
        let font = self
            .fonts
            .get(&run.font)
            .ok_or_else(|| RenderError::FontAliasUnresolved {
                alias: run.font.clone(),
                element: run.element,
            })?;
        let format = font.string_format();

        let mut parts: Vec<Object> = Vec::new();
        let mut current = Vec::new();
        for glyph in &run.glyphs {
            font.encode_glyph(glyph.id, &mut current);
            let natural = font.natural_width(glyph.id) * run.size / 1000.0;
            let delta = glyph.advance - natural;
            if delta.abs() > ADJUST_EPSILON {
                parts.push(Object::String(std::mem::take(&mut current), format));
                parts.push(Object::Real(-delta * 1000.0 / run.size));
            }
        }
        if !current.is_empty() {
            parts.push(Object::String(current, format));
        }

        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new(
            "Tf",
            vec![Object::Name(font.name.as_bytes().to_vec()), Object::Real(run.size)],
        ));
        self.ops.push(Operation::new(
            "Td",
            vec![
                Object::Real(run.origin.x),
                Object::Real(self.flip_y(run.origin.y)),
            ],
        ));
        match parts.as_slice() {
            [single @ Object::String(..)] => {
                self.ops.push(Operation::new("Tj", vec![single.clone()]));
            }
            _ => self.ops.push(Operation::new("TJ", vec![Object::Array(parts)])),
        }
        self.ops.push(Operation::new("ET", vec![]));
        Ok(())
    }

    pub fn rule(&mut self, rule: &RulePlacement) {
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new("w", vec![Object::Real(rule.width)]));
        self.ops.push(Operation::new(
            "m",
            vec![Object::Real(rule.from.x), Object::Real(self.flip_y(rule.from.y))],
        ));
        self.ops.push(Operation::new(
            "l",
            vec![Object::Real(rule.to.x), Object::Real(self.flip_y(rule.to.y))],
        ));
        self.ops.push(Operation::new("S", vec![]));
        self.ops.push(Operation::new("Q", vec![]));
    }

    /// Draws image XObject `name` scaled to fit its placement with the aspect
    /// ratio kept, centered, and clipped when the placement has a clip.
    pub fn image(&mut self, name: &str, placement: &ImagePlacement, pixels: (u32, u32)) {
        let drawn = fit_centered(placement.rect, pixels);
        self.ops.push(Operation::new("q", vec![]));
        if let Some(clip) = placement.clip {
            self.ops.push(Operation::new(
                "re",
                vec![
                    Object::Real(clip.x),
                    Object::Real(self.flip_y(clip.bottom())),
                    Object::Real(clip.width),
                    Object::Real(clip.height),
                ],
            ));
            self.ops.push(Operation::new("W", vec![]));
            self.ops.push(Operation::new("n", vec![]));
        }
        self.ops.push(Operation::new(
            "cm",
            vec![
                Object::Real(drawn.width),
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(drawn.height),
                Object::Real(drawn.x),
                Object::Real(self.flip_y(drawn.bottom())),
            ],
        ));
        self.ops.push(Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]));
        self.ops.push(Operation::new("Q", vec![]));
    }

    pub fn ops_mut(&mut self) -> &mut Vec<Operation> {
        &mut self.ops
    }

    pub fn into_operations(self) -> Vec<Operation> {
        self.ops
    }
}

fn fit_centered(rect: Rect, (px_width, px_height): (u32, u32)) -> Rect {
    let scale = (rect.width / px_width as f32).min(rect.height / px_height as f32);
    let width = px_width as f32 * scale;
    let height = px_height as f32 * scale;
    Rect::new(
        rect.x + (rect.width - width) / 2.0,
        rect.y + (rect.height - height) / 2.0,
        width,
        height,
    )
}
