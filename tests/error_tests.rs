mod common;

use common::fixtures::{
    cert_v1, overflowing_box, owner_line, title_record, unknown_font, with_parcel_binding,
};
use common::{engine_with, render};
use serde_json::json;
use titlepress::{
    ElementRef, Record, RenderFailure, RenderOptions, Template, ValidatedRecord,
    ValidationVerdict, Warning,
};

#[test]
fn test_missing_binding_names_path_and_element() {
    let engine = engine_with(&[with_parcel_binding()]);
    let err = render(&engine, &title_record(1), "cert_parcel", &RenderOptions::default())
        .unwrap_err();
    match err {
        RenderFailure::BindingNotFound { path, element } => {
            assert_eq!(path, "/title/parcel/description");
            assert_eq!(element, Some(ElementRef::new(0, 1)));
        }
        other => panic!("unexpected failure: {other:?}"),
    }
}

#[test]
fn test_binding_shape_mismatch() {
    let engine = engine_with(&[cert_v1()]);
    let record = json!({ "title": { "number": { "prefix": "T" }, "instruments": [] } });
    let err = render(&engine, &record, "cert_v1", &RenderOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        RenderFailure::BindingTypeMismatch { ref path, .. } if path == "/title/number"
    ));
}

#[test]
fn test_text_overflow_is_fatal() {
    let engine = engine_with(&[overflowing_box()]);
    let err = render(&engine, &title_record(0), "cert_overflow", &RenderOptions::default())
        .unwrap_err();
    match err {
        RenderFailure::TextOverflow { element, overflow } => {
            assert_eq!(element, ElementRef::new(0, 0));
            assert!(overflow > 0.0);
        }
        other => panic!("unexpected failure: {other:?}"),
    }
}

#[test]
fn test_unregistered_font_is_never_substituted() {
    let engine = engine_with(&[unknown_font()]);
    let err = render(&engine, &title_record(0), "cert_seal", &RenderOptions::default())
        .unwrap_err();
    match err {
        RenderFailure::FontAliasUnresolved { alias, element } => {
            assert_eq!(alias, "Seal");
            assert_eq!(element, ElementRef::new(0, 1));
        }
        other => panic!("unexpected failure: {other:?}"),
    }
}

#[test]
fn test_missing_glyph_is_reported_not_fatal() {
    let engine = engine_with(&[owner_line()]);
    let mut record = title_record(0);
    record["title"]["owner"] = json!("Łukasz Nowak");
    let options = RenderOptions {
        archival: false,
        ..RenderOptions::default()
    };
    let output = render(&engine, &record, "cert_owner", &options).unwrap();
    assert_eq!(output.page_count, 1);
    assert_eq!(
        output.warnings,
        vec![Warning::GlyphSubstituted {
            element: ElementRef::new(0, 1),
            ch: 'Ł',
            font: "Body".to_string(),
        }]
    );
}

#[test]
fn test_unknown_template_version() {
    let engine = engine_with(&[cert_v1()]);
    let options = RenderOptions {
        template_version: Some(7),
        ..RenderOptions::default()
    };
    let err = render(&engine, &title_record(1), "cert_v1", &options).unwrap_err();
    assert!(matches!(
        err,
        RenderFailure::TemplateNotFound { ref id, version: Some(7) } if id == "cert_v1"
    ));
}

#[test]
fn test_template_defect_carries_locator() {
    let err = Template::from_value(json!({
        "id": "broken",
        "fonts": ["Body"],
        "pages": [{ "elements": [
            { "type": "text", "text": "ok", "x": 36, "y": 36, "font": "Body" },
            { "type": "text", "text": "bad", "x": 36, "y": 60, "font": "Undeclared" }
        ] }]
    }))
    .unwrap_err();
    match RenderFailure::from(err) {
        RenderFailure::TemplateParse { locator, .. } => {
            assert_eq!(locator.page, Some(0));
            assert_eq!(locator.element, Some(1));
        }
        other => panic!("unexpected failure: {other:?}"),
    }
}

#[test]
fn test_rejected_verdict_never_reaches_engine() {
    let record = Record::from_json(&title_record(1)).unwrap();
    let verdict = ValidationVerdict::invalid(vec!["title.number is required".into()]);
    let err = ValidatedRecord::accept(record, &verdict).unwrap_err();
    let failure = RenderFailure::from(err);
    assert!(failure.to_string().contains("title.number is required"));
}
