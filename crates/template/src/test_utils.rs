use serde_json::{Value, json};

/// A small `cert_v1`-style template exercising every element kind.
pub fn cert_template_value() -> Value {
    json!({
        "id": "cert_v1",
        "version": 1,
        "fonts": ["Body", "BodyBold"],
        "baseline_grid": { "increment": 12, "offset": 36 },
        "bindings": {
            "titleNumber": { "path": "/title/number" },
            "owners": { "path": "/title/owners[*]/name", "kind": "list" },
            "instruments": { "path": "/title/instruments", "kind": "nodes" },
            "remarks": { "path": "/title/remarks", "optional": true }
        },
        "pages": [{
            "size": { "width": 612, "height": 792 },
            "elements": [
                { "type": "text", "text": "CERTIFICATE OF TITLE", "x": 36, "y": 36, "width": 540,
                  "font": "BodyBold", "size": 14, "align": "center", "repeat": true },
                { "type": "text", "binding": "titleNumber", "x": 36, "y": 60, "font": "Body" },
                { "type": "text", "binding": "owners", "x": 36, "y": 72, "font": "Body", "separator": " & " },
                { "type": "text_box", "binding": "remarks", "x": 36, "y": 90, "width": 540, "height": 120,
                  "font": "Body", "overflow": "flow" },
                { "type": "table", "binding": "instruments", "x": 36, "y": 220, "font": "Body",
                  "header_font": "BodyBold",
                  "columns": [
                      { "header": "No.", "path": "number", "width": 80 },
                      { "header": "Type", "path": "kind", "width": 200, "coerce": "upper" }
                  ] },
                { "type": "rule", "x1": 36, "y1": 80, "x2": 576, "y2": 80 }
            ]
        }]
    })
}

pub fn cert_record_json() -> &'static str {
    r#"{
        "title": {
            "number": "T-2024-0001",
            "owners": [ { "name": "Ann Smith" }, { "name": "Bob Jones" } ],
            "instruments": [
                { "number": "I-1", "kind": "Mortgage" },
                { "number": "I-2", "kind": "Caveat" },
                { "number": "I-3", "kind": "Easement" }
            ]
        }
    }"#
}
