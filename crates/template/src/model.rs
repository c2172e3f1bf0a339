//! The validated, read-only template model.
use crate::element::Element;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use titlepress_bindpath::{BindingKind, BindingPath, Coercion};
use titlepress_types::{ElementRef, Margins, Rect, Size};

/// Vertical grid that line tops snap to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaselineGrid {
    pub increment: f32,
    #[serde(default)]
    pub offset: f32,
}

impl BaselineGrid {
    /// The first grid line at or below `y`.
    pub fn snap_up(&self, y: f32) -> f32 {
        if y <= self.offset {
            return self.offset;
        }
        let steps = ((y - self.offset) / self.increment - 1e-4).ceil();
        self.offset + steps * self.increment
    }

    /// `leading` rounded up to a whole number of increments.
    pub fn step(&self, leading: f32) -> f32 {
        let steps = (leading / self.increment - 1e-4).ceil().max(1.0);
        steps * self.increment
    }
}

/// Where the verification code is drawn on each page.
///
/// Without explicit `x`/`y` the square sits `margin_x` from the right page
/// edge and `margin_y` above the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerificationRegion {
    pub enabled: bool,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub size: f32,
    pub margin_x: f32,
    pub margin_y: f32,
}

impl Default for VerificationRegion {
    fn default() -> Self {
        Self {
            enabled: true,
            x: None,
            y: None,
            size: 0.9 * 72.0,
            margin_x: 1.4 * 72.0,
            margin_y: 0.6 * 72.0,
        }
    }
}

impl VerificationRegion {
    pub fn rect(&self, page: Size) -> Rect {
        let x = self.x.unwrap_or(page.width - self.margin_x);
        let y = self.y.unwrap_or(page.height - self.margin_y - self.size);
        Rect::new(x, y, self.size, self.size)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
}

/// A declared, compiled binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub path: BindingPath,
    pub kind: BindingKind,
    pub optional: bool,
    pub coerce: Coercion,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageDef {
    pub size: Size,
    pub margins: Margins,
    pub baseline_grid: Option<BaselineGrid>,
    pub(crate) elements: Vec<Element>,
}

impl PageDef {
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn content_rect(&self) -> Rect {
        self.margins.content_rect(self.size)
    }
}

/// A parsed and structurally validated template.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub(crate) id: String,
    pub(crate) version: u32,
    pub(crate) fonts: Vec<String>,
    pub(crate) metadata: DocumentMetadata,
    pub(crate) baseline_grid: Option<BaselineGrid>,
    pub(crate) verification: VerificationRegion,
    pub(crate) min_rows: Option<usize>,
    pub(crate) bindings: BTreeMap<String, Binding>,
    pub(crate) pages: Vec<PageDef>,
}

impl Template {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn pages(&self) -> &[PageDef] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&PageDef> {
        self.pages.get(index)
    }

    pub fn element(&self, r: ElementRef) -> Option<&Element> {
        self.pages.get(r.page).and_then(|p| p.elements.get(r.element))
    }

    /// Declared bindings ordered by name.
    pub fn declared_bindings(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.values()
    }

    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn declared_fonts(&self) -> &[String] {
        &self.fonts
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    pub fn verification(&self) -> &VerificationRegion {
        &self.verification
    }

    pub fn baseline_grid(&self) -> Option<&BaselineGrid> {
        self.baseline_grid.as_ref()
    }

    /// The grid in effect on a page: the page override, else the template grid.
    pub fn grid_for(&self, page: usize) -> Option<BaselineGrid> {
        self.pages
            .get(page)
            .and_then(|p| p.baseline_grid)
            .or(self.baseline_grid)
    }

    pub fn min_rows(&self) -> Option<usize> {
        self.min_rows
    }

    /// Every element in page, then element order.
    pub fn elements(&self) -> impl Iterator<Item = (ElementRef, &Element)> {
        self.pages.iter().enumerate().flat_map(|(p, page)| {
            page.elements
                .iter()
                .enumerate()
                .map(move |(e, el)| (ElementRef::new(p, e), el))
        })
    }

    /// The first element that reads the binding `name`.
    pub fn first_reference(&self, name: &str) -> Option<ElementRef> {
        self.elements()
            .find(|(_, el)| el.binding_name() == Some(name))
            .map(|(r, _)| r)
    }
}
