//! Turns wrapped lines into placed glyph runs.
use crate::fonts::FontFace;
use crate::output::GlyphRun;
use titlepress_template::Align;
use titlepress_types::{ElementRef, Point};

/// Horizontal frame a line is aligned in.
#[derive(Debug, Clone, Copy)]
pub enum LineFrame {
    /// A box starting at `x` with the given width.
    Box { x: f32, width: f32 },
    /// An anchor with no width: left text starts at `x`, right text ends at
    /// `x`, centered text is centered on `x`.
    Anchor { x: f32 },
}

pub struct LineSpec<'a> {
    pub face: &'a FontFace,
    pub size: f32,
    pub frame: LineFrame,
    pub align: Align,
    /// Set on the last line of a paragraph, which is never stretched.
    pub paragraph_end: bool,
    pub line_top: f32,
    pub element: ElementRef,
}

/// Shapes and positions one line. Empty lines produce no run.
pub fn build_line(text: &str, spec: &LineSpec<'_>) -> Option<GlyphRun> {
    if text.is_empty() {
        return None;
    }
    let mut glyphs = spec.face.shape(text, spec.size);
    let natural: f32 = glyphs.iter().map(|g| g.advance).sum();

    let (x, width) = match spec.frame {
        LineFrame::Box { x, width } => {
            let free = (width - natural).max(0.0);
            match spec.align {
                Align::Left => (x, natural),
                Align::Center => (x + free / 2.0, natural),
                Align::Right => (x + free, natural),
                Align::Justify => {
                    let spaces = glyphs.iter().filter(|g| g.ch == ' ').count();
                    if spec.paragraph_end || spaces == 0 || free <= 0.0 {
                        (x, natural)
                    } else {
                        let extra = free / spaces as f32;
                        for glyph in glyphs.iter_mut().filter(|g| g.ch == ' ') {
                            glyph.advance += extra;
                        }
                        (x, width)
                    }
                }
            }
        }
        LineFrame::Anchor { x } => match spec.align {
            Align::Center => (x - natural / 2.0, natural),
            Align::Right => (x - natural, natural),
            Align::Left | Align::Justify => (x, natural),
        },
    };

    let baseline = spec.line_top + spec.face.ascent(spec.size);
    Some(GlyphRun {
        font: spec.face.alias.clone(),
        size: spec.size,
        origin: Point::new(x, baseline),
        line_top: spec.line_top,
        text: text.to_string(),
        glyphs,
        width,
        element: spec.element,
    })
}

/// Repeats `leader` after a run so that it ends at or before `to_x`.
pub fn build_leader(
    run: &GlyphRun,
    face: &FontFace,
    leader: &str,
    to_x: f32,
) -> Option<GlyphRun> {
    let start = run.origin.x + run.width;
    let unit = face.measure(leader, run.size);
    if unit <= 0.0 || start + unit > to_x + titlepress_types::EPSILON {
        return None;
    }
    let count = ((to_x - start) / unit + 1e-4).floor() as usize;
    let text = leader.repeat(count);
    let glyphs = face.shape(&text, run.size);
    let width = glyphs.iter().map(|g| g.advance).sum();
    Some(GlyphRun {
        font: run.font.clone(),
        size: run.size,
        origin: Point::new(start, run.origin.y),
        line_top: run.line_top,
        text,
        glyphs,
        width,
        element: run.element,
    })
}
