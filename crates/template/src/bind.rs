//! Attaches record values to a template.
use crate::element::{Element, TableElement};
use crate::error::BindError;
use crate::model::Template;
use std::collections::HashMap;
use titlepress_bindpath::{BindingError, BindingKind, Resolved};
use titlepress_record::{Record, RecordNode};
use titlepress_types::ElementRef;

/// The values an element draws, resolved against one record.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundContent {
    /// Images and rules carry no record data.
    Fixed,
    Text(String),
    Table { rows: Vec<Vec<String>> },
}

/// A template together with the record values for each of its elements.
#[derive(Debug, Clone)]
pub struct BoundTemplate<'t> {
    template: &'t Template,
    content: Vec<Vec<BoundContent>>,
}

impl<'t> BoundTemplate<'t> {
    pub fn template(&self) -> &'t Template {
        self.template
    }

    pub fn content(&self, r: ElementRef) -> Option<&BoundContent> {
        self.content.get(r.page).and_then(|p| p.get(r.element))
    }
}

fn into_bind_error(err: BindingError, element: Option<ElementRef>) -> BindError {
    match err {
        BindingError::NotFound { path } => BindError::BindingNotFound { path, element },
        BindingError::TypeMismatch {
            path,
            expected,
            found,
        } => BindError::TypeMismatch {
            path,
            element,
            expected,
            found,
        },
    }
}

/// Resolves every declared binding (in name order), then every element (in
/// page and element order).
///
/// A missing required binding fails with the binding's path and the first
/// element that reads it.
pub fn bind<'t>(template: &'t Template, record: &Record) -> Result<BoundTemplate<'t>, BindError> {
    let root = record.root();
    let mut resolved: HashMap<&str, Resolved<'_>> = HashMap::new();

    for binding in template.declared_bindings() {
        let value = match binding.path.resolve(binding.kind, root, &binding.coerce) {
            Ok(v) => v,
            Err(BindingError::NotFound { .. }) if binding.optional => {
                log::debug!("Optional binding '{}' is absent", binding.name);
                Resolved::empty(binding.kind)
            }
            Err(BindingError::NotFound { .. }) => {
                return Err(BindError::BindingNotFound {
                    path: binding.path.to_string(),
                    element: template.first_reference(&binding.name),
                });
            }
            Err(e) => return Err(into_bind_error(e, template.first_reference(&binding.name))),
        };
        resolved.insert(binding.name.as_str(), value);
    }

    let mut content = Vec::with_capacity(template.pages().len());
    for (p, page) in template.pages().iter().enumerate() {
        let mut page_content = Vec::with_capacity(page.elements().len());
        for (e, element) in page.elements().iter().enumerate() {
            let r = ElementRef::new(p, e);
            let bound = match element {
                Element::Text(t) => BoundContent::Text(text_value(
                    &t.text,
                    &t.binding,
                    t.separator.as_deref(),
                    &resolved,
                )),
                Element::TextBox(t) => BoundContent::Text(text_value(
                    &t.text,
                    &t.binding,
                    t.separator.as_deref(),
                    &resolved,
                )),
                Element::Table(t) => {
                    let nodes: &[&RecordNode] = match resolved.get(t.binding.as_str()) {
                        Some(Resolved::Nodes(nodes)) => nodes.as_slice(),
                        _ => &[],
                    };
                    let table_path = template
                        .binding(&t.binding)
                        .map(|b| b.path.to_string())
                        .unwrap_or_default();
                    BoundContent::Table {
                        rows: bind_rows(t, nodes, &table_path, r)?,
                    }
                }
                Element::Image(_) | Element::Rule(_) => BoundContent::Fixed,
            };
            page_content.push(bound);
        }
        content.push(page_content);
    }

    log::debug!(
        "Bound template '{}' ({} bindings)",
        template.id(),
        resolved.len()
    );
    Ok(BoundTemplate { template, content })
}

fn text_value(
    literal: &Option<String>,
    binding: &Option<String>,
    separator: Option<&str>,
    resolved: &HashMap<&str, Resolved<'_>>,
) -> String {
    if let Some(text) = literal {
        return text.clone();
    }
    match binding.as_deref().and_then(|name| resolved.get(name)) {
        Some(Resolved::Scalar(s)) => s.clone(),
        Some(Resolved::List(items)) => items.join(separator.unwrap_or(", ")),
        _ => String::new(),
    }
}

fn bind_rows(
    table: &TableElement,
    nodes: &[&RecordNode],
    table_path: &str,
    element: ElementRef,
) -> Result<Vec<Vec<String>>, BindError> {
    let mut rows = Vec::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        let mut cells = Vec::with_capacity(table.columns.len());
        for column in &table.columns {
            let Some(path) = column.compiled_path() else {
                cells.push(String::new());
                continue;
            };
            let kind = if path.fans_out() {
                BindingKind::List
            } else {
                BindingKind::Scalar
            };
            let cell = match path.resolve(kind, node, &column.coerce) {
                Ok(Resolved::Scalar(s)) => s,
                Ok(Resolved::List(items)) => items.join(" "),
                Ok(Resolved::Nodes(_)) => String::new(),
                Err(BindingError::NotFound { .. }) if column.optional => String::new(),
                Err(err) => {
                    let row_path = format!("{}[{}]/{}", table_path.trim_end_matches("[*]"), i, path);
                    let err = match err {
                        BindingError::NotFound { .. } => BindingError::NotFound { path: row_path },
                        BindingError::TypeMismatch {
                            expected, found, ..
                        } => BindingError::TypeMismatch {
                            path: row_path,
                            expected,
                            found,
                        },
                    };
                    return Err(into_bind_error(err, Some(element)));
                }
            };
            cells.push(cell);
        }
        rows.push(cells);
    }
    Ok(rows)
}
