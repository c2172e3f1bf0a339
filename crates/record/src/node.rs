use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

/// A leaf value of a structured record.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    Null,
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// The textual form used when the value is placed on a page.
    pub fn as_text(&self) -> String {
        match self {
            Scalar::Text(s) => s.clone(),
            Scalar::Number(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Null => String::new(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

/// One node of the record tree.
///
/// Sections keep their fields in document order; that order is part of the
/// canonical serialization and therefore of the content hash.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordNode {
    Scalar(Scalar),
    Section(Vec<(String, RecordNode)>),
    Repeated(Vec<RecordNode>),
}

impl RecordNode {
    pub fn text(value: impl Into<String>) -> Self {
        RecordNode::Scalar(Scalar::Text(value.into()))
    }

    /// Looks up a named field of a section. Non-sections have no fields.
    pub fn field(&self, name: &str) -> Option<&RecordNode> {
        match self {
            RecordNode::Section(fields) => fields.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            RecordNode::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn entries(&self) -> Option<&[RecordNode]> {
        match self {
            RecordNode::Repeated(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(self, RecordNode::Section(_))
    }

    /// A short name for the node's shape, used in type-mismatch diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            RecordNode::Scalar(Scalar::Null) => "null",
            RecordNode::Scalar(_) => "scalar",
            RecordNode::Section(_) => "section",
            RecordNode::Repeated(_) => "repeated section",
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Text(s) => serializer.serialize_str(s),
            Scalar::Number(n) => n.serialize(serializer),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Null => serializer.serialize_unit(),
        }
    }
}

impl Serialize for RecordNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RecordNode::Scalar(s) => s.serialize(serializer),
            RecordNode::Section(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            RecordNode::Repeated(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}
