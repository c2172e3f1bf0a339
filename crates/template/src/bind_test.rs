#![cfg(test)]

use crate::test_utils::{cert_record_json, cert_template_value};
use crate::{BindError, BoundContent, Template, bind};
use serde_json::json;
use titlepress_record::Record;
use titlepress_types::ElementRef;

#[test]
fn test_bind_cert_template() {
    let template = Template::from_value(cert_template_value()).unwrap();
    let record = Record::from_json_str(cert_record_json()).unwrap();
    let bound = bind(&template, &record).unwrap();

    assert_eq!(
        bound.content(ElementRef::new(0, 0)),
        Some(&BoundContent::Text("CERTIFICATE OF TITLE".into()))
    );
    assert_eq!(
        bound.content(ElementRef::new(0, 1)),
        Some(&BoundContent::Text("T-2024-0001".into()))
    );
    assert_eq!(
        bound.content(ElementRef::new(0, 2)),
        Some(&BoundContent::Text("Ann Smith & Bob Jones".into()))
    );
    // optional and absent
    assert_eq!(
        bound.content(ElementRef::new(0, 3)),
        Some(&BoundContent::Text(String::new()))
    );
    match bound.content(ElementRef::new(0, 4)) {
        Some(BoundContent::Table { rows }) => {
            assert_eq!(rows.len(), 3);
            assert_eq!(rows[2], vec!["I-3".to_string(), "EASEMENT".to_string()]);
        }
        other => panic!("unexpected content {other:?}"),
    }
    assert_eq!(bound.content(ElementRef::new(0, 5)), Some(&BoundContent::Fixed));
}

#[test]
fn test_missing_required_binding_names_path_and_element() {
    let template = Template::from_value(cert_template_value()).unwrap();
    let record = Record::from_json_str(r#"{"title":{"owners":[],"instruments":[]}}"#).unwrap();
    let err = bind(&template, &record).unwrap_err();
    assert_eq!(
        err,
        BindError::BindingNotFound {
            path: "/title/number".into(),
            element: Some(ElementRef::new(0, 1)),
        }
    );
}

#[test]
fn test_unreferenced_binding_reports_no_element() {
    let mut value = cert_template_value();
    value["bindings"]["parcel"] = json!({ "path": "/title/parcel" });
    let template = Template::from_value(value).unwrap();
    let record = Record::from_json_str(cert_record_json()).unwrap();
    let err = bind(&template, &record).unwrap_err();
    assert_eq!(
        err,
        BindError::BindingNotFound {
            path: "/title/parcel".into(),
            element: None,
        }
    );
}

#[test]
fn test_missing_column_reports_row_path() {
    let template = Template::from_value(cert_template_value()).unwrap();
    let record = Record::from_json_str(
        r#"{"title":{"number":"T-1","owners":[],"instruments":[
            {"number":"I-1","kind":"Mortgage"},
            {"kind":"Caveat"}
        ]}}"#,
    )
    .unwrap();
    let err = bind(&template, &record).unwrap_err();
    assert_eq!(
        err,
        BindError::BindingNotFound {
            path: "/title/instruments[1]/number".into(),
            element: Some(ElementRef::new(0, 4)),
        }
    );
}

#[test]
fn test_optional_column_is_blank() {
    let mut value = cert_template_value();
    value["pages"][0]["elements"][4]["columns"][0]["optional"] = json!(true);
    let template = Template::from_value(value).unwrap();
    let record = Record::from_json_str(
        r#"{"title":{"number":"T-1","owners":[],"instruments":[{"kind":"Caveat"}]}}"#,
    )
    .unwrap();
    let bound = bind(&template, &record).unwrap();
    assert_eq!(
        bound.content(ElementRef::new(0, 4)),
        Some(&BoundContent::Table {
            rows: vec![vec![String::new(), "CAVEAT".into()]]
        })
    );
}

#[test]
fn test_type_mismatch_is_reported() {
    let template = Template::from_value(cert_template_value()).unwrap();
    let record = Record::from_json_str(
        r#"{"title":{"number":{"part":"x"},"owners":[],"instruments":[]}}"#,
    )
    .unwrap();
    let err = bind(&template, &record).unwrap_err();
    assert!(matches!(err, BindError::TypeMismatch { ref path, .. } if path == "/title/number"));
}

#[test]
fn test_bind_is_repeatable() {
    let template = Template::from_value(cert_template_value()).unwrap();
    let record = Record::from_json_str(cert_record_json()).unwrap();
    let a = bind(&template, &record).unwrap();
    let b = bind(&template, &record).unwrap();
    for (r, _) in template.elements() {
        assert_eq!(a.content(r), b.content(r));
    }
}
