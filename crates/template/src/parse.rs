//! Template parsing and structural validation.
//!
//! Parsing happens in layers (template, page, element) so that a serde
//! failure can be reported with the page and element it occurred in.
use crate::element::{Align, Element, TextBoxElement, TextElement};
use crate::error::{Locator, TemplateError};
use crate::model::{BaselineGrid, Binding, DocumentMetadata, PageDef, Template, VerificationRegion};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use titlepress_bindpath::{BindingKind, Coercion, parse_path};
use titlepress_types::{Margins, Size};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTemplate {
    id: String,
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    fonts: Vec<String>,
    #[serde(default)]
    metadata: DocumentMetadata,
    #[serde(default)]
    baseline_grid: Option<BaselineGrid>,
    #[serde(default)]
    verification: VerificationRegion,
    #[serde(default)]
    min_rows: Option<usize>,
    #[serde(default)]
    bindings: BTreeMap<String, RawBinding>,
    pages: Vec<Value>,
}

fn default_version() -> u32 {
    1
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBinding {
    path: String,
    #[serde(default)]
    kind: BindingKind,
    #[serde(default)]
    optional: bool,
    #[serde(default)]
    coerce: Coercion,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPage {
    #[serde(default = "Size::letter")]
    size: Size,
    #[serde(default)]
    margins: Margins,
    #[serde(default)]
    baseline_grid: Option<BaselineGrid>,
    #[serde(default)]
    elements: Vec<Value>,
}

/// Extracts the field name from serde's "missing field `x`" / "unknown field `x`" messages.
fn field_from_message(message: &str) -> Option<String> {
    ["missing field `", "unknown field `"].iter().find_map(|marker| {
        let start = message.find(marker)? + marker.len();
        let rest = &message[start..];
        rest.find('`').map(|end| rest[..end].to_string())
    })
}

fn decode<T: DeserializeOwned>(value: Value, locator: Locator) -> Result<T, TemplateError> {
    serde_json::from_value(value).map_err(|e| {
        let message = e.to_string();
        let locator = match (locator.field.is_none(), field_from_message(&message)) {
            (true, Some(field)) => locator.with_field(field),
            _ => locator,
        };
        TemplateError::parse(locator, message)
    })
}

impl Template {
    pub fn from_json_str(input: &str) -> Result<Self, TemplateError> {
        let value: Value = serde_json::from_str(input)
            .map_err(|e| TemplateError::parse(Locator::root(), e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, TemplateError> {
        let raw: RawTemplate = decode(value, Locator::root())?;

        let mut pages = Vec::with_capacity(raw.pages.len());
        for (p, page_value) in raw.pages.into_iter().enumerate() {
            let page: RawPage = decode(page_value, Locator::page(p))?;
            let mut elements = Vec::with_capacity(page.elements.len());
            for (e, element_value) in page.elements.into_iter().enumerate() {
                elements.push(decode::<Element>(element_value, Locator::element(p, e))?);
            }
            pages.push(PageDef {
                size: page.size,
                margins: page.margins,
                baseline_grid: page.baseline_grid,
                elements,
            });
        }

        let mut bindings = BTreeMap::new();
        for (name, raw_binding) in raw.bindings {
            let locator = Locator::root().with_field(format!("bindings.{}.path", name));
            let path = parse_path(&raw_binding.path)
                .map_err(|e| TemplateError::parse(locator.clone(), e.to_string()))?;
            if !path.absolute {
                return Err(TemplateError::parse(
                    locator,
                    format!("binding path '{}' must be absolute", raw_binding.path),
                ));
            }
            raw_binding.coerce.validate().map_err(|m| {
                TemplateError::parse(
                    Locator::root().with_field(format!("bindings.{}.coerce", name)),
                    m,
                )
            })?;
            bindings.insert(
                name.clone(),
                Binding {
                    name,
                    path,
                    kind: raw_binding.kind,
                    optional: raw_binding.optional,
                    coerce: raw_binding.coerce,
                },
            );
        }

        let mut template = Template {
            id: raw.id,
            version: raw.version,
            fonts: raw.fonts,
            metadata: raw.metadata,
            baseline_grid: raw.baseline_grid,
            verification: raw.verification,
            min_rows: raw.min_rows,
            bindings,
            pages,
        };
        validate(&mut template)?;
        log::debug!(
            "Parsed template '{}' v{} ({} pages, {} bindings)",
            template.id,
            template.version,
            template.pages.len(),
            template.bindings.len()
        );
        Ok(template)
    }
}

fn positive(value: f32, locator: Locator, what: &str) -> Result<(), TemplateError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(TemplateError::parse(
            locator,
            format!("{} must be positive, got {}", what, value),
        ))
    }
}

fn check_grid(grid: &Option<BaselineGrid>, locator: Locator) -> Result<(), TemplateError> {
    match grid {
        Some(g) => positive(g.increment, locator, "baseline grid increment"),
        None => Ok(()),
    }
}

fn validate(template: &mut Template) -> Result<(), TemplateError> {
    if template.id.trim().is_empty() {
        return Err(TemplateError::parse(
            Locator::root().with_field("id"),
            "template id must not be empty",
        ));
    }
    if template.pages.is_empty() {
        return Err(TemplateError::parse(
            Locator::root().with_field("pages"),
            "template must declare at least one page",
        ));
    }
    check_grid(&template.baseline_grid, Locator::root().with_field("baseline_grid"))?;
    if template.verification.enabled {
        positive(
            template.verification.size,
            Locator::root().with_field("verification.size"),
            "verification size",
        )?;
    }
    if template.min_rows == Some(0) {
        return Err(TemplateError::parse(
            Locator::root().with_field("min_rows"),
            "min_rows must be at least 1",
        ));
    }

    let fonts = template.fonts.clone();
    let bindings = template.bindings.clone();

    for (p, page) in template.pages.iter_mut().enumerate() {
        validate_page(page, p)?;
        for (e, element) in page.elements.iter_mut().enumerate() {
            validate_element(element, Locator::element(p, e), &fonts, &bindings)?;
        }
    }
    Ok(())
}

fn validate_page(page: &PageDef, p: usize) -> Result<(), TemplateError> {
    positive(page.size.width, Locator::page(p).with_field("size.width"), "page width")?;
    positive(page.size.height, Locator::page(p).with_field("size.height"), "page height")?;
    let m = &page.margins;
    if [m.top, m.right, m.bottom, m.left].iter().any(|v| *v < 0.0) {
        return Err(TemplateError::parse(
            Locator::page(p).with_field("margins"),
            "margins must not be negative",
        ));
    }
    if m.left + m.right >= page.size.width || m.top + m.bottom >= page.size.height {
        return Err(TemplateError::parse(
            Locator::page(p).with_field("margins"),
            "margins leave no content area",
        ));
    }
    check_grid(&page.baseline_grid, Locator::page(p).with_field("baseline_grid"))
}

fn check_font(alias: &str, fonts: &[String], locator: Locator) -> Result<(), TemplateError> {
    if fonts.iter().any(|f| f == alias) {
        Ok(())
    } else {
        Err(TemplateError::parse(
            locator,
            format!("font alias '{}' is not declared in fonts", alias),
        ))
    }
}

fn check_binding<'b>(
    name: &str,
    bindings: &'b BTreeMap<String, Binding>,
    locator: Locator,
    allowed: &[BindingKind],
) -> Result<&'b Binding, TemplateError> {
    let binding = bindings.get(name).ok_or_else(|| {
        TemplateError::parse(
            locator.clone(),
            format!("binding '{}' is not declared in bindings", name),
        )
    })?;
    if !allowed.contains(&binding.kind) {
        return Err(TemplateError::parse(
            locator,
            format!(
                "binding '{}' has kind {:?}, expected one of {:?}",
                name, binding.kind, allowed
            ),
        ));
    }
    Ok(binding)
}

fn check_text_source(
    text: &Option<String>,
    binding: &Option<String>,
    locator: &Locator,
    bindings: &BTreeMap<String, Binding>,
) -> Result<(), TemplateError> {
    match (text, binding) {
        (Some(_), None) => Ok(()),
        (None, Some(name)) => check_binding(
            name,
            bindings,
            locator.clone().with_field("binding"),
            &[BindingKind::Scalar, BindingKind::List],
        )
        .map(|_| ()),
        _ => Err(TemplateError::parse(
            locator.clone(),
            "exactly one of 'text' or 'binding' is required",
        )),
    }
}

fn validate_text(
    t: &TextElement,
    locator: &Locator,
    fonts: &[String],
    bindings: &BTreeMap<String, Binding>,
) -> Result<(), TemplateError> {
    check_text_source(&t.text, &t.binding, locator, bindings)?;
    check_font(&t.font, fonts, locator.clone().with_field("font"))?;
    positive(t.size, locator.clone().with_field("size"), "size")?;
    if let Some(w) = t.width {
        positive(w, locator.clone().with_field("width"), "width")?;
    }
    if let Some(w) = t.max_width {
        positive(w, locator.clone().with_field("max_width"), "max_width")?;
    }
    if t.align == Align::Justify && t.width.is_none() {
        return Err(TemplateError::parse(
            locator.clone().with_field("align"),
            "justified text needs a width",
        ));
    }
    if let Some(leader) = &t.leader {
        if leader.text.is_empty() {
            return Err(TemplateError::parse(
                locator.clone().with_field("leader.text"),
                "leader text must not be empty",
            ));
        }
    }
    Ok(())
}

fn validate_text_box(
    t: &TextBoxElement,
    locator: &Locator,
    fonts: &[String],
    bindings: &BTreeMap<String, Binding>,
) -> Result<(), TemplateError> {
    check_text_source(&t.text, &t.binding, locator, bindings)?;
    check_font(&t.font, fonts, locator.clone().with_field("font"))?;
    positive(t.size, locator.clone().with_field("size"), "size")?;
    positive(t.width, locator.clone().with_field("width"), "width")?;
    positive(t.height, locator.clone().with_field("height"), "height")?;
    positive(t.leading(), locator.clone().with_field("leading"), "leading")?;
    if t.padding.horizontal() >= t.width || t.padding.vertical() >= t.height {
        return Err(TemplateError::parse(
            locator.clone().with_field("padding"),
            "padding leaves no room for text",
        ));
    }
    if t.repeat && t.overflow == crate::element::Overflow::Flow {
        return Err(TemplateError::parse(
            locator.clone().with_field("repeat"),
            "flowing text boxes cannot repeat",
        ));
    }
    Ok(())
}

fn validate_element(
    element: &mut Element,
    locator: Locator,
    fonts: &[String],
    bindings: &BTreeMap<String, Binding>,
) -> Result<(), TemplateError> {
    match element {
        Element::Text(t) => validate_text(t, &locator, fonts, bindings),
        Element::TextBox(t) => validate_text_box(t, &locator, fonts, bindings),
        Element::Table(t) => {
            check_binding(
                &t.binding,
                bindings,
                locator.clone().with_field("binding"),
                &[BindingKind::Nodes],
            )?;
            check_font(&t.font, fonts, locator.clone().with_field("font"))?;
            if let Some(header_font) = &t.header_font {
                check_font(header_font, fonts, locator.clone().with_field("header_font"))?;
            }
            positive(t.size, locator.clone().with_field("size"), "size")?;
            positive(t.leading(), locator.clone().with_field("leading"), "leading")?;
            positive(t.header_size(), locator.clone().with_field("header_size"), "header_size")?;
            positive(
                t.header_leading(),
                locator.clone().with_field("header_leading"),
                "header_leading",
            )?;
            if t.min_rows == Some(0) {
                return Err(TemplateError::parse(
                    locator.with_field("min_rows"),
                    "min_rows must be at least 1",
                ));
            }
            if t.columns.is_empty() {
                return Err(TemplateError::parse(
                    locator.with_field("columns"),
                    "table needs at least one column",
                ));
            }
            for (c, column) in t.columns.iter_mut().enumerate() {
                let col_locator = locator.clone().with_field(format!("columns[{}]", c));
                positive(column.width, col_locator.clone(), "column width")?;
                if column.width <= t.padding.horizontal() {
                    return Err(TemplateError::parse(
                        col_locator,
                        "column is narrower than its padding",
                    ));
                }
                let path = parse_path(&column.path)
                    .map_err(|e| TemplateError::parse(col_locator.clone(), e.to_string()))?;
                if path.absolute {
                    return Err(TemplateError::parse(
                        col_locator,
                        format!("column path '{}' must be relative to the row", column.path),
                    ));
                }
                column
                    .coerce
                    .validate()
                    .map_err(|m| TemplateError::parse(col_locator.clone(), m))?;
                column.compiled = Some(path);
            }
            Ok(())
        }
        Element::Image(i) => {
            positive(i.width, locator.clone().with_field("width"), "width")?;
            positive(i.height, locator.clone().with_field("height"), "height")?;
            if i.asset.trim().is_empty() {
                return Err(TemplateError::parse(
                    locator.with_field("asset"),
                    "image asset name must not be empty",
                ));
            }
            Ok(())
        }
        Element::Rule(r) => positive(r.width, locator.with_field("width"), "width"),
    }
}
