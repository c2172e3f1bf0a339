use crate::LayoutError;
use crate::config::LayoutConfig;
use crate::fonts::FontRegistry;
use crate::interface::{ElementLayout, LayoutContext};
use crate::nodes::layout_element;
use crate::output::{LayoutOutput, PagePlan, Primitive};
use titlepress_template::{BoundTemplate, Element, Template};
use titlepress_types::ElementRef;

/// Turns bound templates into page plans.
///
/// The engine borrows the font registry and holds no other state, so one
/// engine can lay out any number of records, from any number of threads.
pub struct LayoutEngine<'f> {
    fonts: &'f FontRegistry,
    config: LayoutConfig,
}

impl<'f> LayoutEngine<'f> {
    pub fn new(fonts: &'f FontRegistry, config: LayoutConfig) -> Self {
        Self { fonts, config }
    }

    pub fn fonts(&self) -> &'f FontRegistry {
        self.fonts
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Fails on the first element (in page, then element order) whose font
    /// alias is not registered.
    pub fn check_fonts(&self, template: &Template) -> Result<(), LayoutError> {
        for (element, el) in template.elements() {
            for alias in el.font_aliases() {
                if self.fonts.get(alias).is_none() {
                    return Err(LayoutError::FontAliasUnresolved {
                        alias: alias.to_string(),
                        element,
                    });
                }
            }
        }
        Ok(())
    }

    /// Lays out every page definition in order.
    ///
    /// Each page definition produces its own page followed by the
    /// continuation pages of its flowing elements, taken in declaration
    /// order. A continuation page draws the elements marked `repeat` plus the
    /// flowing fragment, all in declaration order.
    pub fn layout(&self, bound: &BoundTemplate<'_>) -> Result<LayoutOutput, LayoutError> {
        let template = bound.template();
        self.check_fonts(template)?;

        let min_rows = template
            .min_rows()
            .unwrap_or(self.config.default_min_rows);
        let mut output = LayoutOutput::default();

        for (p, page) in template.pages().iter().enumerate() {
            let mut layouts: Vec<ElementLayout> = Vec::with_capacity(page.elements().len());
            for (e, el) in page.elements().iter().enumerate() {
                let element = ElementRef::new(p, e);
                let content = bound
                    .content(element)
                    .ok_or(LayoutError::MissingContent(element))?;
                let element_min_rows = match el {
                    Element::Table(t) => t.min_rows.unwrap_or(min_rows),
                    _ => min_rows,
                };
                let mut ctx = LayoutContext {
                    fonts: self.fonts,
                    page,
                    grid: template.grid_for(p),
                    element,
                    min_rows: element_min_rows,
                    ellipsis: &self.config.ellipsis,
                    warnings: &mut output.warnings,
                };
                let layout = layout_element(&mut ctx, el, content)?;
                ctx.check_glyphs(&layout);
                layouts.push(layout);
            }

            let primary: Vec<Primitive> = layouts
                .iter()
                .flat_map(|l| l.primary.iter().cloned())
                .collect();
            output.pages.push(PagePlan {
                index: output.pages.len(),
                page_def: p,
                continuation: false,
                size: page.size,
                primitives: primary,
            });

            for (flowing, layout) in layouts.iter().enumerate() {
                for fragment in &layout.continuations {
                    let primitives = page
                        .elements()
                        .iter()
                        .zip(&layouts)
                        .enumerate()
                        .flat_map(|(e, (el, l))| {
                            let items: &[Primitive] = if e == flowing {
                                fragment
                            } else if el.repeats() {
                                &l.primary
                            } else {
                                &[]
                            };
                            items.iter().cloned()
                        })
                        .collect();
                    log::debug!(
                        "Continuation page {} for {}",
                        output.pages.len(),
                        ElementRef::new(p, flowing)
                    );
                    output.pages.push(PagePlan {
                        index: output.pages.len(),
                        page_def: p,
                        continuation: true,
                        size: page.size,
                        primitives,
                    });
                }
            }
        }

        log::debug!(
            "Laid out template '{}' into {} pages",
            template.id(),
            output.pages.len()
        );
        Ok(output)
    }
}
