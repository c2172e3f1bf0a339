//! Font resources for one document.
//!
//! Fonts are named `F1`, `F2`, ... in the order the page plans first use
//! them. Standard fonts are referenced as Type1 fonts with WinAnsiEncoding.
//! TrueType fonts are embedded as Identity-H Type0 fonts over a subset of
//! the glyphs the document actually draws.

use crate::error::RenderError;
use crate::writer::PdfWriter;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::{Dictionary, Object, ObjectId, Stream, StringFormat, dictionary};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::io::{Seek, Write};
use std::sync::Arc;
use titlepress_layout::{FontFace, FontProgram, FontRegistry, PagePlan, TrueTypeProgram};

/// A font drawn somewhere in the document.
#[derive(Debug)]
pub struct UsedFont {
    /// Resource name, e.g. `F1`.
    pub name: String,
    pub face: Arc<FontFace>,
    /// Glyph id to the character it was shaped from.
    pub glyphs: BTreeMap<u16, char>,
    /// Natural TrueType advances in thousandths of an em.
    widths: BTreeMap<u16, f32>,
}

impl UsedFont {
    pub fn alias(&self) -> &str {
        &self.face.alias
    }

    /// The unadjusted advance of a glyph in thousandths of an em.
    pub fn natural_width(&self, id: u16) -> f32 {
        match &self.face.program {
            FontProgram::Standard(font) => font.width(id as u8) as f32,
            FontProgram::TrueType(_) => self.widths.get(&id).copied().unwrap_or(0.0),
        }
    }

    /// Appends the string bytes that select glyph `id`.
    pub fn encode_glyph(&self, id: u16, out: &mut Vec<u8>) {
        match &self.face.program {
            FontProgram::Standard(_) => out.push(id as u8),
            FontProgram::TrueType(_) => out.extend_from_slice(&id.to_be_bytes()),
        }
    }

    pub fn string_format(&self) -> StringFormat {
        match &self.face.program {
            FontProgram::Standard(_) => StringFormat::Literal,
            FontProgram::TrueType(_) => StringFormat::Hexadecimal,
        }
    }
}

#[derive(Debug, Default)]
pub struct FontTable {
    fonts: Vec<UsedFont>,
    index: BTreeMap<String, usize>,
}

impl FontTable {
    /// Walks every glyph run in page order, registering fonts on first use.
    pub fn collect(pages: &[PagePlan], registry: &FontRegistry) -> Result<Self, RenderError> {
        let mut table = FontTable::default();
        for run in pages.iter().flat_map(|page| page.runs()) {
            let idx = match table.index.get(&run.font).copied() {
                Some(idx) => idx,
                None => {
                    let face = registry.get(&run.font).ok_or_else(|| {
                        RenderError::FontAliasUnresolved {
                            alias: run.font.clone(),
                            element: run.element,
                        }
                    })?;
                    table.push(face.clone())
                }
            };
            let used = &mut table.fonts[idx];
            for glyph in &run.glyphs {
                used.glyphs.entry(glyph.id).or_insert(glyph.ch);
            }
        }

        for used in &mut table.fonts {
            if let FontProgram::TrueType(program) = &used.face.program {
                used.widths = natural_widths(&used.face.alias, program, &used.glyphs)?;
            }
        }
        Ok(table)
    }

    fn push(&mut self, face: Arc<FontFace>) -> usize {
        let idx = self.fonts.len();
        self.index.insert(face.alias.clone(), idx);
        self.fonts.push(UsedFont {
            name: format!("F{}", idx + 1),
            face,
            glyphs: BTreeMap::new(),
            widths: BTreeMap::new(),
        });
        idx
    }

    pub fn get(&self, alias: &str) -> Option<&UsedFont> {
        self.index.get(alias).map(|idx| &self.fonts[*idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &UsedFont> {
        self.fonts.iter()
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Writes every font and returns the `/Font` resource dictionary.
    pub fn write<W: Write + Seek>(&self, writer: &mut PdfWriter<W>) -> Result<Dictionary, RenderError> {
        let mut resources = Dictionary::new();
        for used in &self.fonts {
            let id = match &used.face.program {
                FontProgram::Standard(font) => writer.buffer_object(
                    dictionary! {
                        "Type" => "Font",
                        "Subtype" => "Type1",
                        "BaseFont" => font.base_font(),
                        "Encoding" => "WinAnsiEncoding",
                    }
                    .into(),
                ),
                FontProgram::TrueType(program) => write_truetype(writer, used, program)?,
            };
            resources.set(used.name.as_bytes(), Object::Reference(id));
        }
        Ok(resources)
    }
}

fn embedding_error(alias: &str, reason: impl ToString) -> RenderError {
    RenderError::FontEmbedding {
        alias: alias.to_string(),
        reason: reason.to_string(),
    }
}

fn natural_widths(
    alias: &str,
    program: &TrueTypeProgram,
    glyphs: &BTreeMap<u16, char>,
) -> Result<BTreeMap<u16, f32>, RenderError> {
    let face = ttf_parser::Face::parse(&program.data, 0).map_err(|e| embedding_error(alias, e))?;
    let scale = 1000.0 / face.units_per_em() as f32;
    Ok(glyphs
        .keys()
        .map(|&id| {
            let advance = face
                .glyph_hor_advance(ttf_parser::GlyphId(id))
                .unwrap_or(0);
            (id, advance as f32 * scale)
        })
        .collect())
}

fn write_truetype<W: Write + Seek>(
    writer: &mut PdfWriter<W>,
    used: &UsedFont,
    program: &TrueTypeProgram,
) -> Result<ObjectId, RenderError> {
    let alias = used.alias();
    let face = ttf_parser::Face::parse(&program.data, 0).map_err(|e| embedding_error(alias, e))?;
    let scale = 1000.0 / face.units_per_em() as f32;
    let scaled = |v: i16| (v as f32 * scale).round() as i64;

    let mut gids: Vec<u16> = std::iter::once(0).chain(used.glyphs.keys().copied()).collect();
    gids.dedup();
    let subset = subsetter::subset(&program.data, 0, subsetter::Profile::pdf(&gids))
        .map_err(|e| embedding_error(alias, format!("{:?}", e)))?;
    let ps_name = sanitize_font_name(&program.postscript_name);
    let base_font = format!("{}+{}", subset_tag(&ps_name, &gids), ps_name);
    log::debug!(
        "Embedding {} glyphs of '{}' as {}",
        used.glyphs.len(),
        alias,
        base_font
    );

    let type0_id = writer.new_object_id();
    let cid_font_id = writer.new_object_id();
    let descriptor_id = writer.new_object_id();
    let font_file_id = writer.new_object_id();
    let to_unicode_id = writer.new_object_id();

    let font_file = Stream::new(
        dictionary! { "Length1" => subset.len() as i64, "Filter" => "FlateDecode" },
        flate_compress(&subset)?,
    );
    writer.buffer_object_at_id(font_file_id, Object::Stream(font_file));

    let bbox = face.global_bounding_box();
    let mut flags: i64 = 4;
    if face.is_monospaced() {
        flags |= 1;
    }
    let descriptor = dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => Object::Name(base_font.clone().into_bytes()),
        "Flags" => flags,
        "FontBBox" => vec![
            Object::Integer(scaled(bbox.x_min)),
            Object::Integer(scaled(bbox.y_min)),
            Object::Integer(scaled(bbox.x_max)),
            Object::Integer(scaled(bbox.y_max)),
        ],
        "ItalicAngle" => Object::Real(face.italic_angle()),
        "Ascent" => scaled(face.ascender()),
        "Descent" => scaled(face.descender()),
        "CapHeight" => scaled(face.capital_height().unwrap_or(face.ascender())),
        "StemV" => 80,
        "FontFile2" => font_file_id,
    };
    writer.buffer_object_at_id(descriptor_id, descriptor.into());

    let widths: Vec<Object> = used
        .glyphs
        .keys()
        .flat_map(|&id| {
            let width = used.natural_width(id).round() as i64;
            [
                Object::Integer(id as i64),
                Object::Array(vec![Object::Integer(width)]),
            ]
        })
        .collect();
    let cid_font = dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => Object::Name(base_font.clone().into_bytes()),
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "FontDescriptor" => descriptor_id,
        "W" => widths,
        "CIDToGIDMap" => "Identity",
    };
    writer.buffer_object_at_id(cid_font_id, cid_font.into());

    let to_unicode = Stream::new(Dictionary::new(), to_unicode_cmap(&used.glyphs).into_bytes());
    writer.buffer_object_at_id(to_unicode_id, Object::Stream(to_unicode));

    let type0 = dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => Object::Name(base_font.into_bytes()),
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(cid_font_id)],
        "ToUnicode" => to_unicode_id,
    };
    writer.buffer_object_at_id(type0_id, type0.into());
    Ok(type0_id)
}

pub(crate) fn flate_compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Six uppercase letters derived from the font name and glyph set.
fn subset_tag(ps_name: &str, gids: &[u16]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ps_name.as_bytes());
    for gid in gids {
        hasher.update(gid.to_be_bytes());
    }
    hasher
        .finalize()
        .iter()
        .take(6)
        .map(|b| (b'A' + b % 26) as char)
        .collect()
}

fn sanitize_font_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if cleaned.is_empty() {
        "Embedded".to_string()
    } else {
        cleaned
    }
}

fn to_unicode_cmap(glyphs: &BTreeMap<u16, char>) -> String {
    let entries: Vec<(&u16, &char)> = glyphs.iter().collect();

    let mut out = String::new();
    out.push_str("/CIDInit /ProcSet findresource begin\n");
    out.push_str("12 dict begin\n");
    out.push_str("begincmap\n");
    out.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (Identity) /Supplement 0 >> def\n");
    out.push_str("/CMapName /Adobe-Identity-UCS def\n");
    out.push_str("/CMapType 2 def\n");
    out.push_str("1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n");

    for chunk in entries.chunks(100) {
        out.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for (gid, ch) in chunk {
            let mut units = [0u16; 2];
            let hex: String = ch
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{:04X}", u))
                .collect();
            out.push_str(&format!("<{:04X}> <{}>\n", gid, hex));
        }
        out.push_str("endbfchar\n");
    }

    out.push_str("endcmap\n");
    out.push_str("CMapName currentdict /CMap defineresource pop\n");
    out.push_str("end\nend\n");
    out
}
