//! Font registry for the layout engine.
//!
//! Templates refer to fonts by alias. The registry maps each alias to a
//! [`FontFace`], which is either one of the built-in standard fonts or a
//! TrueType program that is shaped with rustybuzz and embedded by the
//! renderer.

use crate::output::PlacedGlyph;
use crate::standard_fonts::{REPLACEMENT_CODE, StandardFont};
use rustybuzz::{Feature, UnicodeBuffer};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use ttf_parser::Tag;

thread_local! {
    static SCRATCH_BUFFER: RefCell<Option<UnicodeBuffer>> = RefCell::new(Some(UnicodeBuffer::new()));
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FontError {
    #[error("Font '{alias}' could not be parsed: {reason}")]
    InvalidFont { alias: String, reason: String },

    #[error("Unknown standard font '{0}'")]
    UnknownStandardFont(String),

    #[error("Font alias '{0}' is not registered")]
    AliasUnresolved(String),
}

/// A parsed TrueType font program.
#[derive(Clone)]
pub struct TrueTypeProgram {
    pub data: Arc<Vec<u8>>,
    pub postscript_name: String,
    pub units_per_em: u16,
    pub ascender: i16,
    pub descender: i16,
}

impl std::fmt::Debug for TrueTypeProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrueTypeProgram")
            .field("postscript_name", &self.postscript_name)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl TrueTypeProgram {
    pub fn parse(alias: &str, data: Vec<u8>) -> Result<Self, FontError> {
        let face = ttf_parser::Face::parse(&data, 0).map_err(|e| FontError::InvalidFont {
            alias: alias.to_string(),
            reason: e.to_string(),
        })?;
        let postscript_name = extract_postscript_name(&face).unwrap_or_else(|| alias.to_string());
        let units_per_em = face.units_per_em();
        let ascender = face.ascender();
        let descender = face.descender();
        Ok(Self {
            data: Arc::new(data),
            postscript_name,
            units_per_em,
            ascender,
            descender,
        })
    }

    /// Creates a rustybuzz face over the font data.
    pub fn as_face(&self) -> Option<rustybuzz::Face<'_>> {
        rustybuzz::Face::from_slice(&self.data, 0)
    }
}

fn extract_postscript_name(face: &ttf_parser::Face<'_>) -> Option<String> {
    let lookup = |id: u16| {
        face.names()
            .into_iter()
            .find(|n| n.name_id == id)
            .and_then(|n| n.to_string())
    };
    lookup(ttf_parser::name_id::POST_SCRIPT_NAME)
        .or_else(|| lookup(ttf_parser::name_id::FULL_NAME))
        .or_else(|| lookup(ttf_parser::name_id::FAMILY))
        .map(|name| name.replace(' ', ""))
}

#[derive(Debug, Clone)]
pub enum FontProgram {
    Standard(StandardFont),
    TrueType(TrueTypeProgram),
}

/// A font bound to the alias templates use for it.
#[derive(Debug, Clone)]
pub struct FontFace {
    pub alias: String,
    pub program: FontProgram,
}

impl FontFace {
    /// True when the renderer embeds a font program for this face.
    pub fn embeddable(&self) -> bool {
        matches!(self.program, FontProgram::TrueType(_))
    }

    pub fn ascent(&self, size: f32) -> f32 {
        match &self.program {
            FontProgram::Standard(font) => font.ascent() * size / 1000.0,
            FontProgram::TrueType(tt) => tt.ascender as f32 * size / tt.units_per_em as f32,
        }
    }

    /// Descent below the baseline, as a positive distance.
    pub fn descent(&self, size: f32) -> f32 {
        match &self.program {
            FontProgram::Standard(font) => -font.descent() * size / 1000.0,
            FontProgram::TrueType(tt) => -(tt.descender as f32) * size / tt.units_per_em as f32,
        }
    }

    /// Width of `text` set at `size` points.
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        match &self.program {
            FontProgram::Standard(font) => text
                .chars()
                .map(|ch| {
                    let code = StandardFont::encode(ch).unwrap_or(REPLACEMENT_CODE);
                    font.width(code) as f32 * size / 1000.0
                })
                .sum(),
            FontProgram::TrueType(_) => self.shape(text, size).iter().map(|g| g.advance).sum(),
        }
    }

    /// Converts text into positioned glyphs.
    ///
    /// Standard fonts use their WinAnsi code as the glyph id. TrueType text is
    /// shaped with kerning only, so each glyph keeps the character it came from.
    pub fn shape(&self, text: &str, size: f32) -> Vec<PlacedGlyph> {
        match &self.program {
            FontProgram::Standard(font) => text
                .chars()
                .map(|ch| {
                    let code = StandardFont::encode(ch).unwrap_or_else(|| {
                        log::debug!(
                            "Character {:?} is not in WinAnsiEncoding; font '{}' draws '?'",
                            ch,
                            self.alias
                        );
                        REPLACEMENT_CODE
                    });
                    PlacedGlyph {
                        id: code as u16,
                        advance: font.width(code) as f32 * size / 1000.0,
                        ch: if code == REPLACEMENT_CODE { '?' } else { ch },
                    }
                })
                .collect(),
            FontProgram::TrueType(tt) => shape_truetype(tt, &self.alias, text, size),
        }
    }

    /// Characters of `text` this face has no glyph for, in order of first use.
    ///
    /// Standard fonts draw `?` for these, TrueType fonts draw `.notdef`.
    pub fn missing_chars(&self, text: &str) -> Vec<char> {
        let mut missing: Vec<char> = match &self.program {
            FontProgram::Standard(_) => text
                .chars()
                .filter(|ch| !ch.is_control() && StandardFont::encode(*ch).is_none())
                .collect(),
            FontProgram::TrueType(tt) => match tt.as_face() {
                Some(face) => text
                    .chars()
                    .filter(|ch| !ch.is_control() && face.glyph_index(*ch).is_none())
                    .collect(),
                None => Vec::new(),
            },
        };
        let mut seen = std::collections::BTreeSet::new();
        missing.retain(|ch| seen.insert(*ch));
        missing
    }
}

fn shape_truetype(program: &TrueTypeProgram, alias: &str, text: &str, size: f32) -> Vec<PlacedGlyph> {
    static FEATURES: OnceLock<Vec<Feature>> = OnceLock::new();
    let features = FEATURES.get_or_init(|| {
        vec![
            Feature::new(Tag::from_bytes(b"kern"), 1, ..),
            Feature::new(Tag::from_bytes(b"liga"), 0, ..),
            Feature::new(Tag::from_bytes(b"clig"), 0, ..),
        ]
    });

    let Some(face) = program.as_face() else {
        log::warn!("Font '{}' could not be opened for shaping", alias);
        return Vec::new();
    };
    let scale = size / face.units_per_em() as f32;

    let mut buffer =
        SCRATCH_BUFFER.with(|b| b.borrow_mut().take().unwrap_or_else(UnicodeBuffer::new));
    buffer.push_str(text);
    buffer.guess_segment_properties();

    let glyph_buffer = rustybuzz::shape(&face, features, buffer);
    let glyphs = glyph_buffer
        .glyph_infos()
        .iter()
        .zip(glyph_buffer.glyph_positions())
        .map(|(info, pos)| {
            let ch = text
                .get(info.cluster as usize..)
                .and_then(|rest| rest.chars().next())
                .unwrap_or('\u{FFFD}');
            PlacedGlyph {
                id: info.glyph_id as u16,
                advance: pos.x_advance as f32 * scale,
                ch,
            }
        })
        .collect();

    let recycled = glyph_buffer.clear();
    SCRATCH_BUFFER.with(|b| *b.borrow_mut() = Some(recycled));
    glyphs
}

/// Immutable alias-to-face map shared by layout and rendering.
#[derive(Debug, Clone, Default)]
pub struct FontRegistry {
    faces: BTreeMap<String, Arc<FontFace>>,
}

impl FontRegistry {
    pub fn builder() -> FontRegistryBuilder {
        FontRegistryBuilder::default()
    }

    pub fn get(&self, alias: &str) -> Option<&Arc<FontFace>> {
        self.faces.get(alias)
    }

    pub fn resolve(&self, alias: &str) -> Result<&Arc<FontFace>, FontError> {
        self.get(alias)
            .ok_or_else(|| FontError::AliasUnresolved(alias.to_string()))
    }

    /// Registered aliases in sorted order.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.faces.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct FontRegistryBuilder {
    faces: BTreeMap<String, Arc<FontFace>>,
}

impl FontRegistryBuilder {
    fn insert(&mut self, alias: &str, program: FontProgram) {
        let face = Arc::new(FontFace {
            alias: alias.to_string(),
            program,
        });
        if self.faces.insert(alias.to_string(), face).is_some() {
            log::warn!("Font alias '{}' registered twice; keeping the last", alias);
        }
    }

    pub fn standard(mut self, alias: &str, font: StandardFont) -> Self {
        self.insert(alias, FontProgram::Standard(font));
        self
    }

    /// Registers a standard font by its PDF name (`Helvetica`, `Helvetica-Bold`, `Courier`).
    pub fn standard_named(self, alias: &str, name: &str) -> Result<Self, FontError> {
        let font = StandardFont::from_name(name)
            .ok_or_else(|| FontError::UnknownStandardFont(name.to_string()))?;
        Ok(self.standard(alias, font))
    }

    pub fn truetype(self, alias: &str, data: Vec<u8>) -> Result<Self, FontError> {
        let program = TrueTypeProgram::parse(alias, data)?;
        log::debug!(
            "Registered font '{}' as {}",
            alias,
            program.postscript_name
        );
        Ok(self.truetype_program(alias, program))
    }

    /// Registers an already parsed program; one program may back several aliases.
    pub fn truetype_program(mut self, alias: &str, program: TrueTypeProgram) -> Self {
        self.insert(alias, FontProgram::TrueType(program));
        self
    }

    pub fn build(self) -> FontRegistry {
        FontRegistry { faces: self.faces }
    }
}
