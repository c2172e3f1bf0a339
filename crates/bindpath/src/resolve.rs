//! Evaluation of compiled paths against a record tree.
use crate::ast::{BindingPath, Selector};
use crate::coerce::Coercion;
use crate::error::BindingError;
use serde::{Deserialize, Serialize};
use titlepress_record::{RecordNode, Scalar};

/// The shape a binding is declared to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingKind {
    #[default]
    Scalar,
    List,
    Nodes,
}

/// A resolved binding value.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'r> {
    Scalar(String),
    List(Vec<String>),
    Nodes(Vec<&'r RecordNode>),
}

impl<'r> Resolved<'r> {
    pub fn empty(kind: BindingKind) -> Self {
        match kind {
            BindingKind::Scalar => Resolved::Scalar(String::new()),
            BindingKind::List => Resolved::List(Vec::new()),
            BindingKind::Nodes => Resolved::Nodes(Vec::new()),
        }
    }
}

fn is_blank(node: &RecordNode) -> bool {
    match node {
        RecordNode::Scalar(Scalar::Null) => true,
        RecordNode::Scalar(Scalar::Text(s)) => s.is_empty(),
        _ => false,
    }
}

impl BindingPath {
    fn not_found(&self) -> BindingError {
        BindingError::NotFound {
            path: self.to_string(),
        }
    }

    fn mismatch(&self, expected: &str, found: &RecordNode) -> BindingError {
        BindingError::TypeMismatch {
            path: self.to_string(),
            expected: expected.to_string(),
            found: found.kind_name().to_string(),
        }
    }

    /// Walks the path from `scope`, returning the frontier in document order.
    ///
    /// Named lookups require sections. A `null` field counts as missing.
    /// `[*]` and `[0]` applied to a non-repeated node treat it as a
    /// one-entry repetition, which is how a lone XML sibling arrives.
    pub fn select<'r>(&self, scope: &'r RecordNode) -> Result<Vec<&'r RecordNode>, BindingError> {
        let mut frontier = vec![scope];
        for segment in &self.segments {
            let mut next = Vec::with_capacity(frontier.len());
            for node in frontier {
                let child = match node {
                    RecordNode::Section(_) => node.field(&segment.name),
                    _ if is_blank(node) => None,
                    RecordNode::Scalar(_) => return Err(self.mismatch("section", node)),
                    RecordNode::Repeated(_) => return Err(self.mismatch("section", node)),
                };
                let child = match child {
                    Some(c) if !matches!(c, RecordNode::Scalar(Scalar::Null)) => c,
                    _ => return Err(self.not_found()),
                };
                match (segment.selector, child) {
                    (None, c) => next.push(c),
                    (Some(Selector::All), RecordNode::Repeated(items)) => next.extend(items.iter()),
                    (Some(Selector::All), c) => next.push(c),
                    (Some(Selector::Index(i)), RecordNode::Repeated(items)) => {
                        next.push(items.get(i).ok_or_else(|| self.not_found())?)
                    }
                    (Some(Selector::Index(0)), c) => next.push(c),
                    (Some(Selector::Index(_)), _) => return Err(self.not_found()),
                }
            }
            frontier = next;
        }
        Ok(frontier)
    }

    pub fn resolve_scalar<'r>(&self, scope: &'r RecordNode) -> Result<&'r Scalar, BindingError> {
        let frontier = self.select(scope)?;
        if frontier.len() > 1 {
            return Err(BindingError::TypeMismatch {
                path: self.to_string(),
                expected: "scalar".to_string(),
                found: format!("{} values", frontier.len()),
            });
        }
        match frontier.first().copied() {
            None => Err(self.not_found()),
            Some(RecordNode::Scalar(s)) => Ok(s),
            Some(other) => Err(self.mismatch("scalar", other)),
        }
    }

    pub fn resolve_list<'r>(&self, scope: &'r RecordNode) -> Result<Vec<&'r Scalar>, BindingError> {
        let mut out = Vec::new();
        for node in self.select(scope)? {
            match node {
                RecordNode::Scalar(Scalar::Null) => {}
                RecordNode::Scalar(s) => out.push(s),
                RecordNode::Repeated(items) => {
                    for item in items {
                        match item {
                            RecordNode::Scalar(Scalar::Null) => {}
                            RecordNode::Scalar(s) => out.push(s),
                            other => return Err(self.mismatch("list of scalars", other)),
                        }
                    }
                }
                other => return Err(self.mismatch("list of scalars", other)),
            }
        }
        Ok(out)
    }

    pub fn resolve_nodes<'r>(
        &self,
        scope: &'r RecordNode,
    ) -> Result<Vec<&'r RecordNode>, BindingError> {
        let mut out = Vec::new();
        for node in self.select(scope)? {
            match node {
                RecordNode::Section(_) => out.push(node),
                RecordNode::Repeated(items) => {
                    for item in items {
                        if !item.is_section() {
                            return Err(self.mismatch("section", item));
                        }
                        out.push(item);
                    }
                }
                blank if is_blank(blank) => {}
                other => return Err(self.mismatch("sections", other)),
            }
        }
        Ok(out)
    }

    /// Resolves the path as `kind`, applying `coercion` to every scalar produced.
    pub fn resolve<'r>(
        &self,
        kind: BindingKind,
        scope: &'r RecordNode,
        coercion: &Coercion,
    ) -> Result<Resolved<'r>, BindingError> {
        match kind {
            BindingKind::Scalar => {
                let value = self.resolve_scalar(scope)?;
                Ok(Resolved::Scalar(coercion.apply(value, self)?))
            }
            BindingKind::List => {
                let values = self
                    .resolve_list(scope)?
                    .into_iter()
                    .map(|v| coercion.apply(v, self))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Resolved::List(values))
            }
            BindingKind::Nodes => Ok(Resolved::Nodes(self.resolve_nodes(scope)?)),
        }
    }
}
