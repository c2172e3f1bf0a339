#![allow(dead_code)]

pub mod fixtures;
pub mod pdf_assertions;

use lopdf::Document as LopdfDocument;
use serde_json::Value;
use titlepress::{
    Engine, FontRegistry, Record, RenderFailure, RenderOptions, RenderOutput, StandardFont,
    Template, ValidatedRecord, ValidationVerdict,
};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a rendered certificate with helper methods
pub struct GeneratedPdf {
    pub output: RenderOutput,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn from_output(output: RenderOutput) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&output.document)?;
        Ok(Self { output, doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Save PDF to a file for manual debugging
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.output.document)
    }
}

/// `Body` and `BodyBold` mapped to the Helvetica standard fonts.
pub fn test_fonts() -> FontRegistry {
    FontRegistry::builder()
        .standard("Body", StandardFont::Helvetica)
        .standard("BodyBold", StandardFont::HelveticaBold)
        .build()
}

/// An engine holding the given templates and the test fonts.
pub fn engine_with(templates: &[Value]) -> Engine {
    let _ = env_logger::builder().is_test(true).try_init();
    templates
        .iter()
        .fold(Engine::builder().with_fonts(test_fonts()), |builder, t| {
            builder.with_template(Template::from_value(t.clone()).expect("template should parse"))
        })
        .build()
}

pub fn validated(record: &Value) -> ValidatedRecord {
    let record = Record::from_json(record).expect("record should build");
    ValidatedRecord::accept(record, &ValidationVerdict::valid()).expect("verdict is valid")
}

pub fn render(
    engine: &Engine,
    record: &Value,
    template_id: &str,
    options: &RenderOptions,
) -> Result<RenderOutput, RenderFailure> {
    engine.render(&validated(record), template_id, options)
}

pub fn render_pdf(
    engine: &Engine,
    record: &Value,
    template_id: &str,
    options: &RenderOptions,
) -> Result<GeneratedPdf, Box<dyn std::error::Error>> {
    GeneratedPdf::from_output(render(engine, record, template_id, options)?)
}
