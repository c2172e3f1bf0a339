use crate::archival::{ResolvedMetadata, output_intent};
use crate::content::PageContent;
use crate::error::{RenderError, RenderWarning};
use crate::fonts::FontTable;
use crate::glyph::VerificationCode;
use crate::images::decode_image;
use crate::writer::PdfWriter;
use lopdf::{Dictionary, Object, ObjectId, Stream, dictionary};
use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::Arc;
use titlepress_layout::{FontRegistry, ImagePlacement, PagePlan, Primitive};
use titlepress_record::ContentHash;
use titlepress_resource::ResourceProvider;
use titlepress_template::{DocumentMetadata, VerificationRegion};

/// Everything about the output document that is not in the page plans.
#[derive(Debug, Clone)]
pub struct DocumentSettings {
    pub content_hash: ContentHash,
    pub metadata: DocumentMetadata,
    /// Where to draw the verification code; `None` draws none.
    pub verification: Option<VerificationRegion>,
    /// Request PDF/A-2b output.
    pub archival: bool,
    pub icc_profile: Option<Arc<Vec<u8>>>,
}

#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// True when the document carries the archival output intent and metadata.
    pub archival: bool,
    pub warnings: Vec<RenderWarning>,
}

struct ImageResource {
    name: String,
    id: ObjectId,
    pixels: (u32, u32),
}

/// Serializes page plans to PDF.
///
/// Object ids are assigned in a fixed order: catalog, page tree, info and
/// shared resources first, then fonts in first-use order, then each page
/// with its content stream and any images it introduces, then the archival
/// objects. Together with the fixed metadata this makes the output a pure
/// function of its inputs.
pub struct PdfRenderer<'f> {
    fonts: &'f FontRegistry,
}

impl<'f> PdfRenderer<'f> {
    pub fn new(fonts: &'f FontRegistry) -> Self {
        Self { fonts }
    }

    pub fn render(
        &self,
        pages: &[PagePlan],
        settings: &DocumentSettings,
        assets: &dyn ResourceProvider,
    ) -> Result<RenderedDocument, RenderError> {
        let fonts = FontTable::collect(pages, self.fonts)?;
        let mut warnings = Vec::new();
        let archival = settings.archival && archival_possible(&fonts, settings, &mut warnings);

        let hash_hex = settings.content_hash.to_hex();
        let code = settings
            .verification
            .map(|region| VerificationCode::encode(&hash_hex).map(|code| (region, code)))
            .transpose()?;

        let mut writer = PdfWriter::new(Cursor::new(Vec::new()))?;
        let font_resources = fonts.write(&mut writer)?;

        let mut images: BTreeMap<String, Result<ImageResource, String>> = BTreeMap::new();
        for page in pages {
            let mut content = PageContent::new(&fonts, page.size.height);
            for primitive in &page.primitives {
                match primitive {
                    Primitive::Text(run) => content.text_run(run)?,
                    Primitive::TableRow(row) => {
                        for run in &row.runs {
                            content.text_run(run)?;
                        }
                    }
                    Primitive::Rule(rule) => content.rule(rule),
                    Primitive::Image(placement) => {
                        let resource =
                            image_resource(&mut images, &mut writer, placement, assets, &mut warnings);
                        if let Some(image) = resource {
                            content.image(&image.name, placement, image.pixels);
                        }
                    }
                }
            }
            if let Some((region, code)) = &code {
                code.draw(region.rect(page.size), page.size.height, content.ops_mut());
            }

            let content_id = writer.buffer_content_stream(&content.into_operations());
            let page_dict = dictionary! {
                "Type" => "Page",
                "Parent" => writer.pages_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(page.size.width),
                    Object::Real(page.size.height),
                ],
                "Contents" => content_id,
                "Resources" => writer.resources_id,
            };
            let page_id = writer.buffer_object(page_dict.into());
            writer.push_page_id(page_id);
        }

        let mut resources = dictionary! { "Font" => font_resources };
        let mut xobjects = Dictionary::new();
        for image in images.values().filter_map(|i| i.as_ref().ok()) {
            xobjects.set(image.name.as_bytes(), Object::Reference(image.id));
        }
        if !xobjects.is_empty() {
            resources.set("XObject", xobjects);
        }

        let metadata = ResolvedMetadata::from_template(&settings.metadata);
        let mut catalog_extra = Dictionary::new();
        if archival && let Some(icc) = &settings.icc_profile {
            let icc_stream = Stream::new(dictionary! { "N" => 3 }, icc.to_vec());
            let icc_id = writer.buffer_object(Object::Stream(icc_stream));
            catalog_extra.set("OutputIntents", vec![Object::Dictionary(output_intent(icc_id))]);

            let xmp = Stream::new(
                dictionary! { "Type" => "Metadata", "Subtype" => "XML" },
                metadata.xmp_packet().into_bytes(),
            );
            catalog_extra.set("Metadata", writer.buffer_object(Object::Stream(xmp)));
        }

        let page_count = writer.page_count();
        let bytes = writer
            .finish(
                resources,
                metadata.info_dictionary(),
                catalog_extra,
                settings.content_hash.as_bytes(),
            )?
            .into_inner();
        log::debug!(
            "Rendered {} pages ({} bytes, {} fonts, archival: {})",
            page_count,
            bytes.len(),
            fonts.len(),
            archival
        );

        Ok(RenderedDocument {
            bytes,
            page_count,
            archival,
            warnings,
        })
    }
}

/// Checks the archival prerequisites, recording a warning for the first
/// one that is missing.
fn archival_possible(
    fonts: &FontTable,
    settings: &DocumentSettings,
    warnings: &mut Vec<RenderWarning>,
) -> bool {
    let missing = if settings.icc_profile.is_none() {
        Some(RenderWarning::ResourceUnavailable {
            resource: "ICC profile".to_string(),
            reason: "no output intent profile is configured".to_string(),
        })
    } else {
        fonts
            .iter()
            .find(|font| !font.face.embeddable())
            .map(|font| RenderWarning::ResourceUnavailable {
                resource: format!("font '{}'", font.alias()),
                reason: "standard fonts are not embedded".to_string(),
            })
    };
    match missing {
        Some(warning) => {
            log::warn!("Producing non-archival output: {}", warning);
            warnings.push(warning);
            false
        }
        None => true,
    }
}

/// Loads and embeds an asset on first use. An asset that cannot be loaded
/// is remembered with its reason and warned about at every placement.
fn image_resource<'a>(
    images: &'a mut BTreeMap<String, Result<ImageResource, String>>,
    writer: &mut PdfWriter<Cursor<Vec<u8>>>,
    placement: &ImagePlacement,
    assets: &dyn ResourceProvider,
    warnings: &mut Vec<RenderWarning>,
) -> Option<&'a ImageResource> {
    if !images.contains_key(&placement.asset) {
        let name = format!("Im{}", images.values().filter(|i| i.is_ok()).count() + 1);
        let loaded = assets
            .load(&placement.asset)
            .map_err(|e| e.to_string())
            .and_then(|data| decode_image(&data))
            .map(|image| ImageResource {
                name,
                pixels: (image.width, image.height),
                id: writer.buffer_object(Object::Stream(image.stream)),
            });
        images.insert(placement.asset.clone(), loaded);
    }

    match images.get(&placement.asset) {
        Some(Ok(image)) => Some(image),
        Some(Err(reason)) => {
            warn_image(placement, reason.clone(), warnings);
            None
        }
        None => None,
    }
}

fn warn_image(placement: &ImagePlacement, reason: String, warnings: &mut Vec<RenderWarning>) {
    let warning = RenderWarning::ImageUnavailable {
        asset: placement.asset.clone(),
        element: placement.element,
        reason,
    };
    log::warn!("{}", warning);
    warnings.push(warning);
}
