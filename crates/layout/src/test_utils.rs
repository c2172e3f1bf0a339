use crate::{FontRegistry, LayoutConfig, LayoutEngine, LayoutError, LayoutOutput, StandardFont};
use serde_json::Value;
use titlepress_record::Record;
use titlepress_template::{Template, bind};

/// `Body` and `BodyBold` mapped to the Helvetica standard fonts.
pub fn create_test_fonts() -> FontRegistry {
    FontRegistry::builder()
        .standard("Body", StandardFont::Helvetica)
        .standard("BodyBold", StandardFont::HelveticaBold)
        .build()
}

/// Parses, binds and lays out a template against a JSON record.
pub fn layout_test_template(
    template: Value,
    record: &str,
    fonts: &FontRegistry,
) -> Result<LayoutOutput, LayoutError> {
    let _ = env_logger::builder().is_test(true).try_init();
    let template = Template::from_value(template).expect("template should parse");
    let record = Record::from_json_str(record).expect("record should parse");
    let bound = bind(&template, &record).expect("bindings should resolve");
    LayoutEngine::new(fonts, LayoutConfig::default()).layout(&bound)
}

pub fn instruments_record(count: usize) -> String {
    let rows: Vec<Value> = (1..=count)
        .map(|i| serde_json::json!({ "number": format!("I-{}", i), "kind": "Mortgage" }))
        .collect();
    serde_json::json!({
        "title": { "number": "T-2024-0001", "instruments": rows }
    })
    .to_string()
}
