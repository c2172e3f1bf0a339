use crate::config::EngineConfig;
use crate::error::{RenderFailure, Warning};
use std::sync::Arc;
use titlepress_layout::{FontRegistry, LayoutConfig, LayoutEngine};
use titlepress_record::{Acceptance, AcceptancePolicy, ValidatedRecord};
use titlepress_render::{DocumentSettings, PdfRenderer};
use titlepress_resource::{
    FilesystemResourceProvider, InMemoryResourceProvider, ResourceProvider, load_font_directory,
    load_icc_profile, load_template_directory,
};
use titlepress_template::{DocumentMetadata, Template, TemplateRegistry, bind};

/// Per-request switches.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Request PDF/A-2b output. Falls back to a plain PDF with a warning when
    /// the ICC profile or an embeddable font is missing.
    pub archival: bool,
    /// Draw the verification code on every page. The template must also
    /// enable its verification region.
    pub verification_glyph: bool,
    /// Render this version of the template instead of the newest.
    pub template_version: Option<u32>,
    /// Fields set here replace the template's document metadata.
    pub metadata: DocumentMetadata,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            archival: true,
            verification_glyph: true,
            template_version: None,
            metadata: DocumentMetadata::default(),
        }
    }
}

/// A rendered certificate.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub document: Vec<u8>,
    /// Hex SHA-256 of the record's canonical serialization.
    pub content_hash: String,
    pub page_count: usize,
    pub archival: bool,
    pub warnings: Vec<Warning>,
}

/// One entry of a batch.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub record: ValidatedRecord,
    pub template_id: String,
    pub options: RenderOptions,
}

/// Renders validated records against registered templates.
///
/// Fonts, templates, the ICC profile and the asset provider are loaded once
/// and never change afterwards, so an `Engine` can be shared across threads
/// and every render is a pure function of its record and options.
#[derive(Debug, Clone)]
pub struct Engine {
    fonts: Arc<FontRegistry>,
    templates: Arc<TemplateRegistry>,
    icc_profile: Option<Arc<Vec<u8>>>,
    assets: Arc<dyn ResourceProvider>,
    layout: LayoutConfig,
    acceptance: AcceptancePolicy,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    /// Whether `record` may be rendered without manual review.
    pub fn acceptance(&self, record: &ValidatedRecord) -> Acceptance {
        self.acceptance.decide(record.provenance())
    }

    pub fn render(
        &self,
        record: &ValidatedRecord,
        template_id: &str,
        options: &RenderOptions,
    ) -> Result<RenderOutput, RenderFailure> {
        let template = self.templates.resolve(template_id, options.template_version)?;
        log::debug!(
            "Rendering with template '{}' version {}",
            template.id(),
            template.version()
        );

        let layout_engine = LayoutEngine::new(&self.fonts, self.layout.clone());
        layout_engine.check_fonts(&template)?;
        let bound = bind(&template, record.record())?;
        let layout = layout_engine.layout(&bound)?;
        log::debug!("Layout produced {} page(s)", layout.pages.len());

        let content_hash = record.record().content_hash();
        let settings = DocumentSettings {
            content_hash,
            metadata: merge_metadata(template.metadata(), &options.metadata),
            verification: verification_region(&template, options),
            archival: options.archival,
            icc_profile: self.icc_profile.clone(),
        };
        let document =
            PdfRenderer::new(&self.fonts).render(&layout.pages, &settings, self.assets.as_ref())?;

        let warnings: Vec<Warning> = layout
            .warnings
            .into_iter()
            .map(Warning::from)
            .chain(document.warnings.into_iter().map(Warning::from))
            .collect();

        Ok(RenderOutput {
            document: document.bytes,
            content_hash: content_hash.to_hex(),
            page_count: document.page_count,
            archival: document.archival,
            warnings,
        })
    }

    /// Renders every request; results are in request order.
    #[cfg(feature = "rayon-executor")]
    pub fn render_batch(&self, requests: &[RenderRequest]) -> Vec<Result<RenderOutput, RenderFailure>> {
        use rayon::prelude::*;
        log::debug!(
            "Rendering batch of {} on {} thread(s)",
            requests.len(),
            rayon::current_num_threads()
        );
        requests
            .par_iter()
            .map(|req| self.render(&req.record, &req.template_id, &req.options))
            .collect()
    }

    /// Renders every request; results are in request order.
    #[cfg(not(feature = "rayon-executor"))]
    pub fn render_batch(&self, requests: &[RenderRequest]) -> Vec<Result<RenderOutput, RenderFailure>> {
        requests
            .iter()
            .map(|req| self.render(&req.record, &req.template_id, &req.options))
            .collect()
    }
}

fn verification_region(
    template: &Template,
    options: &RenderOptions,
) -> Option<titlepress_template::VerificationRegion> {
    let region = *template.verification();
    (options.verification_glyph && region.enabled).then_some(region)
}

fn merge_metadata(template: &DocumentMetadata, overrides: &DocumentMetadata) -> DocumentMetadata {
    let pick = |o: &Option<String>, t: &Option<String>| o.clone().or_else(|| t.clone());
    DocumentMetadata {
        title: pick(&overrides.title, &template.title),
        author: pick(&overrides.author, &template.author),
        subject: pick(&overrides.subject, &template.subject),
        keywords: pick(&overrides.keywords, &template.keywords),
    }
}

/// A builder for creating an [`Engine`].
#[derive(Debug, Default)]
pub struct EngineBuilder {
    fonts: Option<FontRegistry>,
    templates: TemplateRegistry,
    icc_profile: Option<Arc<Vec<u8>>>,
    assets: Option<Arc<dyn ResourceProvider>>,
    layout: LayoutConfig,
    acceptance: AcceptancePolicy,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every resource named by `config`.
    ///
    /// A missing ICC profile is not an error here; archival renders report
    /// it as a warning instead.
    pub fn from_config(config: &EngineConfig) -> Result<Self, RenderFailure> {
        let fonts = load_font_directory(&config.fonts_dir, config.font_map.as_deref())?;
        log::debug!(
            "Loaded {} font alias(es) from {}",
            fonts.len(),
            config.fonts_dir.display()
        );
        let templates = load_template_directory(&config.templates_dir)?;
        log::debug!(
            "Loaded {} template(s) from {}",
            templates.len(),
            config.templates_dir.display()
        );
        let icc_profile = match &config.icc_profile {
            Some(path) => load_icc_profile(path)?,
            None => None,
        };

        let mut builder = Self::new()
            .with_fonts(fonts)
            .with_templates(templates)
            .with_layout_config(config.layout.clone())
            .with_acceptance_policy(config.acceptance);
        builder.icc_profile = icc_profile;
        if let Some(dir) = &config.assets_dir {
            builder = builder.with_assets(FilesystemResourceProvider::new(dir));
        }
        Ok(builder)
    }

    pub fn with_fonts(mut self, fonts: FontRegistry) -> Self {
        self.fonts = Some(fonts);
        self
    }

    pub fn with_templates(mut self, templates: TemplateRegistry) -> Self {
        self.templates = templates;
        self
    }

    /// Adds one template, replacing any with the same id and version.
    pub fn with_template(mut self, template: Template) -> Self {
        self.templates.insert(template);
        self
    }

    pub fn with_icc_profile(mut self, profile: Vec<u8>) -> Self {
        self.icc_profile = Some(Arc::new(profile));
        self
    }

    pub fn with_assets<P: ResourceProvider + 'static>(mut self, provider: P) -> Self {
        self.assets = Some(Arc::new(provider));
        self
    }

    pub fn with_layout_config(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_acceptance_policy(mut self, policy: AcceptancePolicy) -> Self {
        self.acceptance = policy;
        self
    }

    pub fn build(self) -> Engine {
        let fonts = self.fonts.unwrap_or_else(|| {
            log::warn!("No fonts configured; every font alias will be unresolved");
            FontRegistry::default()
        });
        let assets = self
            .assets
            .unwrap_or_else(|| Arc::new(InMemoryResourceProvider::new()));
        Engine {
            fonts: Arc::new(fonts),
            templates: Arc::new(self.templates),
            icc_profile: self.icc_profile,
            assets,
            layout: self.layout,
            acceptance: self.acceptance,
        }
    }
}
