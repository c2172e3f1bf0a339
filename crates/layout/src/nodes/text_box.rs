use crate::LayoutError;
use crate::interface::{ElementLayout, LayoutContext};
use crate::output::Primitive;
use crate::text::builder::{LineFrame, LineSpec, build_line};
use crate::text::wrapper::{apply_ellipsis, wrap_paragraphs};
use titlepress_template::{Overflow, TextBoxElement};

/// Wraps text inside the box and places one line per grid step.
///
/// Lines that do not fit are handled per the element's `overflow`: an error,
/// an ellipsis on the last visible line, or continuation pages that reuse
/// the same box.
pub fn layout_text_box(
    ctx: &mut LayoutContext<'_>,
    el: &TextBoxElement,
    text: &str,
) -> Result<ElementLayout, LayoutError> {
    let face = ctx.face(&el.font)?.clone();
    let element = ctx.element;
    let measure = |s: &str| face.measure(s, el.size);

    let inner_x = el.x + el.padding.left;
    let inner_width = el.width - el.padding.horizontal();
    let inner_bottom = el.y + el.height - el.padding.bottom;
    let first_top = ctx.snap(el.y + el.padding.top);
    let step = ctx.step(el.leading());

    let mut lines = wrap_paragraphs(text, inner_width, el.hyphenate, &measure);
    let available = inner_bottom - first_top;
    let capacity = ((available / step) + 1e-3).floor().max(0.0) as usize;

    let pages: Vec<Vec<(String, bool)>> = if lines.len() <= capacity {
        vec![lines]
    } else {
        let needed = lines.len() as f32 * step;
        match el.overflow {
            Overflow::Error => {
                return Err(LayoutError::TextOverflow {
                    element,
                    overflow: needed - available.max(0.0),
                });
            }
            Overflow::Ellipsis => {
                lines.truncate(capacity);
                if let Some((last, end)) = lines.last_mut() {
                    *last = apply_ellipsis(last, inner_width, ctx.ellipsis, &measure);
                    *end = true;
                }
                vec![lines]
            }
            Overflow::Flow => {
                if capacity == 0 {
                    return Err(LayoutError::ElementTooLarge {
                        element,
                        height: step,
                        available: available.max(0.0),
                    });
                }
                log::debug!(
                    "{} flows {} lines over {} pages",
                    element,
                    lines.len(),
                    lines.len().div_ceil(capacity)
                );
                lines.chunks(capacity).map(<[_]>::to_vec).collect()
            }
        }
    };

    let mut fragments = pages.into_iter().map(|page_lines| {
        page_lines
            .iter()
            .enumerate()
            .filter_map(|(i, (line, paragraph_end))| {
                let spec = LineSpec {
                    face: &face,
                    size: el.size,
                    frame: LineFrame::Box {
                        x: inner_x,
                        width: inner_width,
                    },
                    align: el.align,
                    paragraph_end: *paragraph_end,
                    line_top: first_top + i as f32 * step,
                    element,
                };
                build_line(line, &spec).map(Primitive::Text)
            })
            .collect::<Vec<_>>()
    });

    let primary = fragments.next().unwrap_or_default();
    Ok(ElementLayout {
        primary,
        continuations: fragments.collect(),
    })
}
