//! Images and rules placed at fixed page coordinates.
use crate::interface::{ElementLayout, LayoutContext};
use crate::output::{ImagePlacement, LayoutWarning, Primitive, RulePlacement};
use titlepress_template::{ImageElement, RuleElement};
use titlepress_types::{Point, Rect, clip_segment};

pub fn layout_image(ctx: &mut LayoutContext<'_>, el: &ImageElement) -> ElementLayout {
    let page = Rect::from_size(ctx.page.size);
    let rect = Rect::new(el.x, el.y, el.width, el.height);
    let element = ctx.element;

    if page.contains_rect(&rect) {
        return ElementLayout::fixed(vec![Primitive::Image(ImagePlacement {
            asset: el.asset.clone(),
            rect,
            clip: None,
            element,
        })]);
    }
    match page.intersect(&rect) {
        Some(visible) => {
            ctx.warn(LayoutWarning::Clipped { element });
            ElementLayout::fixed(vec![Primitive::Image(ImagePlacement {
                asset: el.asset.clone(),
                rect,
                clip: Some(visible),
                element,
            })])
        }
        None => {
            ctx.warn(LayoutWarning::OutsidePage { element });
            ElementLayout::default()
        }
    }
}

pub fn layout_rule(ctx: &mut LayoutContext<'_>, el: &RuleElement) -> ElementLayout {
    let page = Rect::from_size(ctx.page.size);
    let from = Point::new(el.x1, el.y1);
    let to = Point::new(el.x2, el.y2);
    let element = ctx.element;

    match clip_segment(from, to, &page) {
        Some((a, b)) => {
            if a != from || b != to {
                ctx.warn(LayoutWarning::Clipped { element });
            }
            ElementLayout::fixed(vec![Primitive::Rule(RulePlacement {
                from: a,
                to: b,
                width: el.width,
                element,
            })])
        }
        None => {
            ctx.warn(LayoutWarning::OutsidePage { element });
            ElementLayout::default()
        }
    }
}
