use crate::{DocumentSettings, PdfRenderer, RenderError, RenderWarning};
use image::{ImageBuffer, ImageFormat, Rgb};
use lopdf::Document;
use std::io::Cursor;
use std::sync::Arc;
use titlepress_layout::{
    FontRegistry, ImagePlacement, LayoutConfig, LayoutEngine, PagePlan, Primitive, RulePlacement,
    StandardFont,
};
use titlepress_record::Record;
use titlepress_resource::InMemoryResourceProvider;
use titlepress_template::{DocumentMetadata, Template, VerificationRegion, bind};
use titlepress_types::{ElementRef, Point, Rect, Size};

const RECORD: &str = r#"{ "title": { "number": "T-2024-0001", "owner": "Jane Smith" } }"#;

fn fonts() -> FontRegistry {
    FontRegistry::builder()
        .standard("Body", StandardFont::Helvetica)
        .standard("BodyBold", StandardFont::HelveticaBold)
        .build()
}

fn pages(fonts: &FontRegistry) -> Vec<PagePlan> {
    let _ = env_logger::builder().is_test(true).try_init();
    let template = Template::from_value(serde_json::json!({
        "id": "render_test",
        "fonts": ["Body", "BodyBold"],
        "bindings": {
            "titleNumber": { "path": "/title/number" },
            "owner": { "path": "/title/owner" }
        },
        "pages": [{ "elements": [
            { "type": "text", "text": "CERTIFICATE OF TITLE", "x": 36, "y": 36, "font": "BodyBold", "size": 14 },
            { "type": "text", "binding": "titleNumber", "x": 36, "y": 60, "font": "Body" },
            { "type": "text", "binding": "owner", "x": 36, "y": 80, "font": "Body" },
            { "type": "rule", "x1": 36, "y1": 100, "x2": 576, "y2": 100 }
        ] }]
    }))
    .unwrap();
    let record = Record::from_json_str(RECORD).unwrap();
    let bound = bind(&template, &record).unwrap();
    LayoutEngine::new(fonts, LayoutConfig::default())
        .layout(&bound)
        .unwrap()
        .pages
}

fn settings(glyph: bool, archival: bool) -> DocumentSettings {
    DocumentSettings {
        content_hash: Record::from_json_str(RECORD).unwrap().content_hash(),
        metadata: DocumentMetadata::default(),
        verification: glyph.then(VerificationRegion::default),
        archival,
        icc_profile: None,
    }
}

fn rule_only_page() -> PagePlan {
    PagePlan {
        index: 0,
        page_def: 0,
        continuation: false,
        size: Size::new(612.0, 792.0),
        primitives: vec![Primitive::Rule(RulePlacement {
            from: Point::new(36.0, 100.0),
            to: Point::new(576.0, 100.0),
            width: 0.5,
            element: ElementRef::new(0, 0),
        })],
    }
}

fn page_content(doc: &Document) -> String {
    let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
    String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned()
}

#[test]
fn test_output_is_byte_identical() {
    let fonts = fonts();
    let assets = InMemoryResourceProvider::new();
    let renderer = PdfRenderer::new(&fonts);
    let first = renderer.render(&pages(&fonts), &settings(true, false), &assets).unwrap();
    let second = renderer.render(&pages(&fonts), &settings(true, false), &assets).unwrap();
    assert_eq!(first.bytes, second.bytes);
}

#[test]
fn test_document_structure() {
    let fonts = fonts();
    let assets = InMemoryResourceProvider::new();
    let settings = settings(true, false);
    let out = PdfRenderer::new(&fonts)
        .render(&pages(&fonts), &settings, &assets)
        .unwrap();
    assert_eq!(out.page_count, 1);
    assert!(!out.archival);

    let doc = Document::load_mem(&out.bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);

    let id = doc.trailer.get(b"ID").unwrap().as_array().unwrap();
    assert_eq!(id[0].as_str().unwrap(), settings.content_hash.as_bytes());

    let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
    let info = doc.get_dictionary(info_id).unwrap();
    assert_eq!(info.get(b"Producer").unwrap().as_str().unwrap(), b"titlepress");
    assert_eq!(info.get(b"Title").unwrap().as_str().unwrap(), b"Certificate of Title");
    assert_eq!(info.get(b"ModDate").unwrap().as_str().unwrap(), b"D:20240101000000Z");

    let content = page_content(&doc);
    assert!(content.contains("/F1 14 Tf"));
    assert!(content.contains("(CERTIFICATE OF TITLE) Tj"));
    assert!(content.contains("(T-2024-0001) Tj"));
}

#[test]
fn test_fonts_named_in_first_use_order() {
    let fonts = fonts();
    let out = PdfRenderer::new(&fonts)
        .render(&pages(&fonts), &settings(false, false), &InMemoryResourceProvider::new())
        .unwrap();
    let doc = Document::load_mem(&out.bytes).unwrap();
    let resources = doc.get_dictionary((4, 0)).unwrap();
    let font_dict = resources.get(b"Font").unwrap().as_dict().unwrap();
    let base_font = |name: &[u8]| {
        let id = font_dict.get(name).unwrap().as_reference().unwrap();
        doc.get_dictionary(id)
            .unwrap()
            .get(b"BaseFont")
            .unwrap()
            .as_name()
            .unwrap()
            .to_vec()
    };
    assert_eq!(base_font(b"F1"), b"Helvetica-Bold");
    assert_eq!(base_font(b"F2"), b"Helvetica");
}

#[test]
fn test_verification_code_changes_bytes_not_hash() {
    let fonts = fonts();
    let assets = InMemoryResourceProvider::new();
    let renderer = PdfRenderer::new(&fonts);
    let with = renderer.render(&pages(&fonts), &settings(true, false), &assets).unwrap();
    let without = renderer.render(&pages(&fonts), &settings(false, false), &assets).unwrap();
    assert!(with.bytes.len() > without.bytes.len());

    let doc = Document::load_mem(&without.bytes).unwrap();
    let id = doc.trailer.get(b"ID").unwrap().as_array().unwrap();
    assert_eq!(
        id[0].as_str().unwrap(),
        settings(true, false).content_hash.as_bytes()
    );
    assert!(!page_content(&doc).contains(" re\n"));
}

#[test]
fn test_unregistered_alias_is_not_substituted() {
    let fonts = fonts();
    let plans = pages(&fonts);
    let only_body = FontRegistry::builder()
        .standard("Body", StandardFont::Helvetica)
        .build();
    let err = PdfRenderer::new(&only_body)
        .render(&plans, &settings(false, false), &InMemoryResourceProvider::new())
        .unwrap_err();
    match err {
        RenderError::FontAliasUnresolved { alias, element } => {
            assert_eq!(alias, "BodyBold");
            assert_eq!(element, ElementRef::new(0, 0));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_archival_downgrades_without_icc() {
    let fonts = fonts();
    let out = PdfRenderer::new(&fonts)
        .render(&pages(&fonts), &settings(false, true), &InMemoryResourceProvider::new())
        .unwrap();
    assert!(!out.archival);
    assert!(matches!(
        out.warnings.as_slice(),
        [RenderWarning::ResourceUnavailable { resource, .. }] if resource == "ICC profile"
    ));
    let doc = Document::load_mem(&out.bytes).unwrap();
    assert!(doc.catalog().unwrap().get(b"OutputIntents").is_err());
}

#[test]
fn test_archival_downgrades_for_standard_fonts() {
    let fonts = fonts();
    let mut settings = settings(false, true);
    settings.icc_profile = Some(Arc::new(b"icc profile".to_vec()));
    let out = PdfRenderer::new(&fonts)
        .render(&pages(&fonts), &settings, &InMemoryResourceProvider::new())
        .unwrap();
    assert!(!out.archival);
    assert!(matches!(
        out.warnings.as_slice(),
        [RenderWarning::ResourceUnavailable { resource, .. }] if resource == "font 'BodyBold'"
    ));
}

#[test]
fn test_archival_output_intent_and_metadata() {
    let fonts = fonts();
    let mut settings = settings(false, true);
    settings.icc_profile = Some(Arc::new(b"icc profile".to_vec()));
    let out = PdfRenderer::new(&fonts)
        .render(&[rule_only_page()], &settings, &InMemoryResourceProvider::new())
        .unwrap();
    assert!(out.archival);
    assert!(out.warnings.is_empty());

    let doc = Document::load_mem(&out.bytes).unwrap();
    let catalog = doc.catalog().unwrap();
    let intents = catalog.get(b"OutputIntents").unwrap().as_array().unwrap();
    let intent = intents[0].as_dict().unwrap();
    assert_eq!(intent.get(b"S").unwrap().as_name().unwrap(), b"GTS_PDFA1");
    let icc_id = intent.get(b"DestOutputProfile").unwrap().as_reference().unwrap();
    let icc = doc.get_object(icc_id).unwrap().as_stream().unwrap();
    assert_eq!(icc.dict.get(b"N").unwrap().as_i64().unwrap(), 3);

    let metadata_id = catalog.get(b"Metadata").unwrap().as_reference().unwrap();
    let xmp = doc.get_object(metadata_id).unwrap().as_stream().unwrap();
    let xmp = String::from_utf8_lossy(&xmp.content);
    assert!(xmp.contains("<pdfaid:part>2</pdfaid:part>"));
}

/// DejaVu Sans Mono, covering Latin Extended-A.
const MONO: &[u8] = include_bytes!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fonts/DejaVuSansMono.ttf"
));

fn embedded_fonts() -> FontRegistry {
    FontRegistry::builder()
        .truetype("Body", MONO.to_vec())
        .unwrap()
        .build()
}

fn owner_pages(fonts: &FontRegistry, owner: &str) -> Vec<PagePlan> {
    let template = Template::from_value(serde_json::json!({
        "id": "owner",
        "fonts": ["Body"],
        "bindings": { "owner": { "path": "/title/owner" } },
        "pages": [{ "elements": [
            { "type": "text", "binding": "owner", "x": 36, "y": 80, "font": "Body" }
        ] }]
    }))
    .unwrap();
    let record = Record::from_json(&serde_json::json!({ "title": { "owner": owner } })).unwrap();
    let bound = bind(&template, &record).unwrap();
    let output = LayoutEngine::new(fonts, LayoutConfig::default())
        .layout(&bound)
        .unwrap();
    assert!(output.warnings.is_empty(), "{:?}", output.warnings);
    output.pages
}

#[test]
fn test_embedded_font_is_archival() {
    let fonts = embedded_fonts();
    let pages = owner_pages(&fonts, "Łukasz Nowak");
    let mut settings = settings(false, true);
    settings.icc_profile = Some(Arc::new(b"icc profile".to_vec()));
    let assets = InMemoryResourceProvider::new();
    let renderer = PdfRenderer::new(&fonts);

    let out = renderer.render(&pages, &settings, &assets).unwrap();
    assert!(out.archival);
    assert!(out.warnings.is_empty());
    let again = renderer.render(&pages, &settings, &assets).unwrap();
    assert_eq!(out.bytes, again.bytes);

    let doc = Document::load_mem(&out.bytes).unwrap();
    let resources = doc.get_dictionary((4, 0)).unwrap();
    let font_dict = resources.get(b"Font").unwrap().as_dict().unwrap();
    let type0_id = font_dict.get(b"F1").unwrap().as_reference().unwrap();
    let type0 = doc.get_dictionary(type0_id).unwrap();
    assert_eq!(type0.get(b"Subtype").unwrap().as_name().unwrap(), b"Type0");
    assert_eq!(type0.get(b"Encoding").unwrap().as_name().unwrap(), b"Identity-H");
    let base_font = type0.get(b"BaseFont").unwrap().as_name().unwrap();
    assert!(base_font.ends_with(b"+DejaVuSansMono"));
    assert_eq!(base_font[6], b'+');

    let descendants = type0.get(b"DescendantFonts").unwrap().as_array().unwrap();
    let cid_font = doc
        .get_dictionary(descendants[0].as_reference().unwrap())
        .unwrap();
    assert_eq!(cid_font.get(b"Subtype").unwrap().as_name().unwrap(), b"CIDFontType2");
    let descriptor_id = cid_font.get(b"FontDescriptor").unwrap().as_reference().unwrap();
    let descriptor = doc.get_dictionary(descriptor_id).unwrap();
    assert_eq!(descriptor.get(b"Flags").unwrap().as_i64().unwrap() & 1, 1);
    let font_file_id = descriptor.get(b"FontFile2").unwrap().as_reference().unwrap();
    let font_file = doc.get_object(font_file_id).unwrap().as_stream().unwrap();
    let program = font_file.decompressed_content().unwrap();
    assert!(program.len() < MONO.len());
    assert!(ttf_parser::Face::parse(&program, 0).is_ok());

    let to_unicode_id = type0.get(b"ToUnicode").unwrap().as_reference().unwrap();
    let cmap = doc.get_object(to_unicode_id).unwrap().as_stream().unwrap();
    assert!(String::from_utf8_lossy(&cmap.content).contains("<0141>"));
    assert!(doc.extract_text(&[1]).unwrap().contains("Łukasz Nowak"));
}

#[test]
fn test_truetype_reports_notdef_glyphs() {
    let fonts = embedded_fonts();
    let face = fonts.resolve("Body").unwrap();
    assert!(face.missing_chars("Łukasz Nowak").is_empty());
    assert_eq!(face.missing_chars("王 Wang"), vec!['王']);
    assert_eq!(face.shape("王", 10.0)[0].id, 0);
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(width, height, Rgb([200, 0, 0]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn image_page(assets: &[&str]) -> PagePlan {
    let mut page = rule_only_page();
    page.primitives = assets
        .iter()
        .enumerate()
        .map(|(i, asset)| {
            Primitive::Image(ImagePlacement {
                asset: asset.to_string(),
                rect: Rect::new(36.0, 36.0 + 70.0 * i as f32, 60.0, 60.0),
                clip: None,
                element: ElementRef::new(0, i),
            })
        })
        .collect();
    page
}

#[test]
fn test_images_are_embedded_once() {
    let fonts = fonts();
    let assets = InMemoryResourceProvider::new().with("seal", png(4, 4));
    let out = PdfRenderer::new(&fonts)
        .render(&[image_page(&["seal", "seal"])], &settings(false, false), &assets)
        .unwrap();
    assert!(out.warnings.is_empty());

    let doc = Document::load_mem(&out.bytes).unwrap();
    let resources = doc.get_dictionary((4, 0)).unwrap();
    let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
    assert_eq!(xobjects.len(), 1);
    assert_eq!(page_content(&doc).matches("/Im1 Do").count(), 2);
}

#[test]
fn test_missing_image_is_skipped_with_warning() {
    let fonts = fonts();
    let assets = InMemoryResourceProvider::new().with("seal", png(4, 4));
    let out = PdfRenderer::new(&fonts)
        .render(&[image_page(&["crest", "seal"])], &settings(false, false), &assets)
        .unwrap();
    assert_eq!(
        out.warnings,
        vec![RenderWarning::ImageUnavailable {
            asset: "crest".into(),
            element: ElementRef::new(0, 0),
            reason: "Resource not found: crest".into(),
        }]
    );
    let doc = Document::load_mem(&out.bytes).unwrap();
    assert_eq!(page_content(&doc).matches(" Do").count(), 1);
}
