use serde_json::{Value, json};

pub const TITLE_NUMBER: &str = "T-2024-0001";

/// The `cert_v1` certificate on a short page: the title number in a text box
/// and an instruments table whose rows are 12pt, two of which fit above the
/// bottom margin.
pub fn cert_v1() -> Value {
    json!({
        "id": "cert_v1",
        "version": 1,
        "fonts": ["Body", "BodyBold"],
        "metadata": { "title": "Certificate of Title", "author": "Land Titles Office" },
        "baseline_grid": { "increment": 12, "offset": 0 },
        "verification": { "size": 40, "margin_x": 80, "margin_y": 20 },
        "bindings": {
            "titleNumber": { "path": "/title/number" },
            "instruments": { "path": "/title/instruments", "kind": "nodes" }
        },
        "pages": [{
            "size": { "width": 400, "height": 200 },
            "margins": { "top": 36, "right": 36, "bottom": 36, "left": 36 },
            "elements": [
                { "type": "text_box", "binding": "titleNumber", "x": 36, "y": 36, "width": 200,
                  "height": 24, "font": "BodyBold", "repeat": true },
                { "type": "table", "binding": "instruments", "x": 36, "y": 132, "continue_at": 132,
                  "font": "Body",
                  "padding": { "top": 0, "right": 2, "bottom": 0, "left": 2 },
                  "columns": [
                      { "header": "", "path": "number", "width": 80 },
                      { "header": "", "path": "kind", "width": 200 }
                  ] }
            ]
        }]
    })
}

/// A template that uses no fonts, so archival output depends only on the
/// ICC profile.
pub fn rules_only() -> Value {
    json!({
        "id": "rules_only",
        "verification": { "enabled": false },
        "pages": [{ "elements": [
            { "type": "rule", "x1": 36, "y1": 100, "x2": 576, "y2": 100 },
            { "type": "rule", "x1": 36, "y1": 700, "x2": 576, "y2": 700, "width": 2 }
        ] }]
    })
}

/// Reads a field that `cert_v1` does not bind, to test missing paths.
pub fn with_parcel_binding() -> Value {
    json!({
        "id": "cert_parcel",
        "fonts": ["Body"],
        "bindings": { "parcel": { "path": "/title/parcel/description" } },
        "pages": [{ "elements": [
            { "type": "text", "text": "Parcel", "x": 36, "y": 36, "font": "Body" },
            { "type": "text", "binding": "parcel", "x": 36, "y": 60, "font": "Body" }
        ] }]
    })
}

/// A non-flowing box too small for its text.
pub fn overflowing_box() -> Value {
    json!({
        "id": "cert_overflow",
        "fonts": ["Body"],
        "pages": [{ "elements": [
            { "type": "text_box", "text": "one\ntwo\nthree\nfour", "x": 36, "y": 36,
              "width": 200, "height": 24, "font": "Body", "overflow": "error" }
        ] }]
    })
}

/// Uses an alias the test font registry does not provide.
pub fn unknown_font() -> Value {
    json!({
        "id": "cert_seal",
        "fonts": ["Body", "Seal"],
        "pages": [{ "elements": [
            { "type": "text", "text": "Registrar", "x": 36, "y": 36, "font": "Body" },
            { "type": "text", "text": "SEAL", "x": 36, "y": 60, "font": "Seal" }
        ] }]
    })
}

/// The registered proprietor's name on a single line.
pub fn owner_line() -> Value {
    json!({
        "id": "cert_owner",
        "fonts": ["Body"],
        "bindings": { "owner": { "path": "/title/owner" } },
        "pages": [{ "elements": [
            { "type": "text", "text": "Registered proprietor", "x": 36, "y": 36, "font": "Body" },
            { "type": "text", "binding": "owner", "x": 36, "y": 60, "font": "Body" }
        ] }]
    })
}

pub fn instruments(count: usize) -> Vec<Value> {
    (1..=count)
        .map(|i| json!({ "number": format!("I-{}", i), "kind": "Mortgage" }))
        .collect()
}

pub fn title_record(instrument_count: usize) -> Value {
    json!({
        "title": {
            "number": TITLE_NUMBER,
            "owner": "Jane Smith",
            "instruments": instruments(instrument_count)
        }
    })
}
