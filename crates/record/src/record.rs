use crate::error::RecordError;
use crate::hash::ContentHash;
use crate::node::{RecordNode, Scalar};
use serde_json::Value;

/// An immutable certificate record.
///
/// The canonical serialization and its digest are computed once when the
/// record is built, so every later hash request returns the same value.
#[derive(Debug, Clone)]
pub struct Record {
    root: RecordNode,
    canonical: Vec<u8>,
    hash: ContentHash,
}

impl Record {
    /// Builds a record from an already-constructed tree. The root must be a section.
    pub fn from_node(root: RecordNode) -> Result<Self, RecordError> {
        if !root.is_section() {
            return Err(RecordError::RootNotObject(root.kind_name()));
        }
        let canonical = serde_json::to_vec(&root)?;
        let hash = ContentHash::of(&canonical);
        log::debug!("Built record ({} canonical bytes, hash {})", canonical.len(), hash);
        Ok(Self {
            root,
            canonical,
            hash,
        })
    }

    pub fn from_json(value: &Value) -> Result<Self, RecordError> {
        Self::from_node(json_to_node(value))
    }

    pub fn from_json_str(input: &str) -> Result<Self, RecordError> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_json(&value)
    }

    /// Builds a record from an XML document.
    ///
    /// The document element becomes the single field of the root section.
    /// Sibling elements sharing a tag name are grouped into a repeated section
    /// at the position of their first occurrence, and attributes become fields
    /// named `@attr`.
    pub fn from_xml_str(input: &str) -> Result<Self, RecordError> {
        let doc = roxmltree::Document::parse(input)?;
        let root_el = doc.root_element();
        let root = RecordNode::Section(vec![(
            root_el.tag_name().name().to_string(),
            element_to_node(root_el),
        )]);
        Self::from_node(root)
    }

    pub fn root(&self) -> &RecordNode {
        &self.root
    }

    /// Compact JSON, sections in document order.
    pub fn canonical_bytes(&self) -> &[u8] {
        &self.canonical
    }

    pub fn content_hash(&self) -> ContentHash {
        self.hash
    }
}

fn json_to_node(value: &Value) -> RecordNode {
    match value {
        Value::Null => RecordNode::Scalar(Scalar::Null),
        Value::Bool(b) => RecordNode::Scalar(Scalar::Bool(*b)),
        Value::Number(n) => RecordNode::Scalar(Scalar::Number(n.clone())),
        Value::String(s) => RecordNode::Scalar(Scalar::Text(s.clone())),
        Value::Array(items) => RecordNode::Repeated(items.iter().map(json_to_node).collect()),
        Value::Object(map) => RecordNode::Section(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_node(v)))
                .collect(),
        ),
    }
}

fn element_to_node(el: roxmltree::Node<'_, '_>) -> RecordNode {
    let has_children = el.children().any(|c| c.is_element());
    let has_attributes = el.attributes().next().is_some();

    if !has_children && !has_attributes {
        let text: String = el
            .children()
            .filter(|c| c.is_text())
            .filter_map(|c| c.text())
            .collect();
        return RecordNode::text(text.trim());
    }

    let mut fields: Vec<(String, RecordNode)> = el
        .attributes()
        .map(|a| (format!("@{}", a.name()), RecordNode::text(a.value())))
        .collect();

    let mut groups: Vec<(String, Vec<RecordNode>)> = Vec::new();
    for child in el.children().filter(|c| c.is_element()) {
        let name = child.tag_name().name();
        let node = element_to_node(child);
        match groups.iter_mut().find(|(n, _)| n == name) {
            Some((_, nodes)) => nodes.push(node),
            None => groups.push((name.to_string(), vec![node])),
        }
    }

    for (name, mut nodes) in groups {
        let node = if nodes.len() == 1 {
            nodes.remove(0)
        } else {
            RecordNode::Repeated(nodes)
        };
        fields.push((name, node));
    }

    RecordNode::Section(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_keeps_document_order() {
        let record = Record::from_json_str(r#"{"title":{"number":"T-1","area":12.5,"owners":[{"name":"A"}]}}"#).unwrap();
        assert_eq!(
            record.canonical_bytes(),
            br#"{"title":{"number":"T-1","area":12.5,"owners":[{"name":"A"}]}}"#
        );
    }

    #[test]
    fn test_canonical_form_is_compact() {
        let a = Record::from_json_str("{ \"a\" : 1 ,\n \"b\" : [ 1, 2 ] }").unwrap();
        let b = Record::from_json_str(r#"{"a":1,"b":[1,2]}"#).unwrap();
        assert_eq!(a.canonical_bytes(), b.canonical_bytes());
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn test_hash_changes_with_content() {
        let a = Record::from_json_str(r#"{"a":"1"}"#).unwrap();
        let b = Record::from_json_str(r#"{"a":"2"}"#).unwrap();
        assert_ne!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn test_hash_matches_digest_of_canonical_bytes() {
        let record = Record::from_json_str(r#"{"title":{"number":"T-2024-0001"}}"#).unwrap();
        assert_eq!(record.content_hash(), ContentHash::of(record.canonical_bytes()));
    }

    #[test]
    fn test_root_must_be_object() {
        let err = Record::from_json_str("[1,2]").unwrap_err();
        assert!(matches!(err, RecordError::RootNotObject("repeated section")));
    }

    #[test]
    fn test_from_xml_groups_repeated_siblings() {
        let xml = r#"<Title number="T-9">
            <Owner>Ann</Owner>
            <Area>5</Area>
            <Owner>Bob</Owner>
        </Title>"#;
        let record = Record::from_xml_str(xml).unwrap();
        let title = record.root().field("Title").unwrap();
        assert_eq!(title.field("@number"), Some(&RecordNode::text("T-9")));
        let owners = title.field("Owner").and_then(RecordNode::entries).unwrap();
        assert_eq!(owners, &[RecordNode::text("Ann"), RecordNode::text("Bob")]);
        assert_eq!(
            record.canonical_bytes(),
            br#"{"Title":{"@number":"T-9","Owner":["Ann","Bob"],"Area":"5"}}"#
        );
    }

    #[test]
    fn test_from_xml_empty_element_is_empty_text() {
        let record = Record::from_xml_str("<Title><Remarks/></Title>").unwrap();
        let remarks = record.root().field("Title").and_then(|t| t.field("Remarks"));
        assert_eq!(remarks, Some(&RecordNode::text("")));
    }
}
