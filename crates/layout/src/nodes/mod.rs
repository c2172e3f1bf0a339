pub mod absolute;
pub mod table;
pub mod text;
pub mod text_box;

use crate::LayoutError;
use crate::interface::{ElementLayout, LayoutContext};
use titlepress_template::{BoundContent, Element};

/// Lays out one element against its bound content.
pub fn layout_element(
    ctx: &mut LayoutContext<'_>,
    element: &Element,
    content: &BoundContent,
) -> Result<ElementLayout, LayoutError> {
    match (element, content) {
        (Element::Text(el), BoundContent::Text(text)) => text::layout_text(ctx, el, text),
        (Element::TextBox(el), BoundContent::Text(text)) => {
            text_box::layout_text_box(ctx, el, text)
        }
        (Element::Table(el), BoundContent::Table { rows }) => table::layout_table(ctx, el, rows),
        (Element::Image(el), _) => Ok(absolute::layout_image(ctx, el)),
        (Element::Rule(el), _) => Ok(absolute::layout_rule(ctx, el)),
        _ => Err(LayoutError::MissingContent(ctx.element)),
    }
}
