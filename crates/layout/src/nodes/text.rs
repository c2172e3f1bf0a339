use crate::LayoutError;
use crate::interface::{ElementLayout, LayoutContext};
use crate::output::Primitive;
use crate::text::builder::{LineFrame, LineSpec, build_leader, build_line};
use crate::text::wrapper::apply_ellipsis;
use titlepress_template::TextElement;

/// Lays out a single-line text element. Its top snaps to the grid; embedded
/// newlines are set as spaces.
pub fn layout_text(
    ctx: &mut LayoutContext<'_>,
    el: &TextElement,
    text: &str,
) -> Result<ElementLayout, LayoutError> {
    let face = ctx.face(&el.font)?.clone();
    let measure = |s: &str| face.measure(s, el.size);

    let mut line = text.replace(['\r', '\n'], " ");
    if let Some(max_width) = el.max_width
        && measure(&line) > max_width
    {
        line = apply_ellipsis(&line, max_width, ctx.ellipsis, &measure);
    }

    let frame = match el.width {
        Some(width) => LineFrame::Box { x: el.x, width },
        None => LineFrame::Anchor { x: el.x },
    };
    let spec = LineSpec {
        face: &face,
        size: el.size,
        frame,
        align: el.align,
        paragraph_end: false,
        line_top: ctx.snap(el.y),
        element: ctx.element,
    };

    let mut primitives = Vec::new();
    if let Some(run) = build_line(&line, &spec) {
        let leader = el
            .leader
            .as_ref()
            .and_then(|leader| build_leader(&run, &face, &leader.text, leader.to_x));
        primitives.push(Primitive::Text(run));
        primitives.extend(leader.map(Primitive::Text));
    }
    Ok(ElementLayout::fixed(primitives))
}
