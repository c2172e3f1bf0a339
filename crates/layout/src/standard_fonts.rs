//! Built-in metrics for the PDF standard fonts the engine can use without
//! embedding a font program.
//!
//! Widths are in thousandths of an em, taken from the Adobe AFM files, and
//! indexed by WinAnsiEncoding code.

/// Advance widths for codes 0x20..=0x7E.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

/// Advance widths for codes 0xA0..=0xFF.
const HELVETICA_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

const HELVETICA_BOLD_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

/// WinAnsi codes in 0x80..=0x9F that the engine maps, with their
/// (Helvetica, Helvetica-Bold) widths.
const WIN_ANSI_EXTRAS: [(char, u8, u16, u16); 9] = [
    ('€', 0x80, 556, 556),
    ('…', 0x85, 1000, 1000),
    ('\u{2018}', 0x91, 222, 278),
    ('\u{2019}', 0x92, 222, 278),
    ('\u{201C}', 0x93, 333, 500),
    ('\u{201D}', 0x94, 333, 500),
    ('•', 0x95, 350, 350),
    ('–', 0x96, 556, 556),
    ('—', 0x97, 1000, 1000),
];

/// Code used for characters WinAnsiEncoding cannot represent.
pub const REPLACEMENT_CODE: u8 = b'?';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    Courier,
}

impl StandardFont {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Helvetica" => Some(StandardFont::Helvetica),
            "Helvetica-Bold" => Some(StandardFont::HelveticaBold),
            "Courier" => Some(StandardFont::Courier),
            _ => None,
        }
    }

    /// The PDF `/BaseFont` name.
    pub fn base_font(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::Courier => "Courier",
        }
    }

    pub fn ascent(&self) -> f32 {
        match self {
            StandardFont::Helvetica | StandardFont::HelveticaBold => 718.0,
            StandardFont::Courier => 629.0,
        }
    }

    pub fn descent(&self) -> f32 {
        match self {
            StandardFont::Helvetica | StandardFont::HelveticaBold => -207.0,
            StandardFont::Courier => -157.0,
        }
    }

    /// Maps a character to its WinAnsiEncoding code.
    pub fn encode(ch: char) -> Option<u8> {
        let cp = ch as u32;
        match cp {
            0x20..=0x7E | 0xA0..=0xFF => Some(cp as u8),
            _ => WIN_ANSI_EXTRAS
                .iter()
                .find(|(c, ..)| *c == ch)
                .map(|(_, code, ..)| *code),
        }
    }

    /// Advance width of a WinAnsi code in thousandths of an em.
    pub fn width(&self, code: u8) -> u16 {
        if *self == StandardFont::Courier {
            return 600;
        }
        let bold = *self == StandardFont::HelveticaBold;
        match code {
            0x20..=0x7E => {
                let i = (code - 0x20) as usize;
                if bold {
                    HELVETICA_BOLD_ASCII[i]
                } else {
                    HELVETICA_ASCII[i]
                }
            }
            0xA0..=0xFF => {
                let i = (code - 0xA0) as usize;
                if bold {
                    HELVETICA_BOLD_LATIN1[i]
                } else {
                    HELVETICA_LATIN1[i]
                }
            }
            _ => WIN_ANSI_EXTRAS
                .iter()
                .find(|(_, c, ..)| *c == code)
                .map(|(_, _, regular, bold_width)| if bold { *bold_width } else { *regular })
                .unwrap_or(0),
        }
    }
}
