//! Land-title certificates as byte-deterministic PDF documents.
//!
//! An [`Engine`] holds the fonts, templates and archival resources loaded at
//! start-up. [`Engine::render`] binds a validated record to a template, lays
//! it out on the baseline grid and serializes the pages, returning the PDF
//! together with the record's content hash:
//!
//! ```ignore
//! let config = EngineConfig::from_file(Path::new("titlepress.json"))?;
//! let engine = EngineBuilder::from_config(&config)?.build();
//! let output = engine.render(&record, "cert_v1", &RenderOptions::default())?;
//! std::fs::write("T-2024-0001.pdf", &output.document)?;
//! ```

pub mod config;
pub mod engine;
pub mod error;

pub use config::EngineConfig;
pub use engine::{Engine, EngineBuilder, RenderOptions, RenderOutput, RenderRequest};
pub use error::{RenderFailure, Warning};

pub use titlepress_layout::{FontRegistry, LayoutConfig, StandardFont};
pub use titlepress_record::{
    Acceptance, AcceptancePolicy, ContentHash, Provenance, Record, ValidatedRecord,
    ValidationVerdict,
};
pub use titlepress_template::{DocumentMetadata, Template, TemplateRegistry};
pub use titlepress_types::ElementRef;

/// Binding path expressions, for callers that check record coverage up front.
pub use titlepress_bindpath as bindpath;
