use pdf_writer::{Name, Pdf, Ref};

/// The two base-14 faces the report uses. Neither is embedded; viewers
/// supply Helvetica, so metrics below come from the standard AFM files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum FontFace {
    Regular,
    Bold,
}

impl FontFace {
    pub(crate) const ALL: [FontFace; 2] = [FontFace::Regular, FontFace::Bold];

    pub(crate) fn pdf_name(&self) -> &'static str {
        match self {
            FontFace::Regular => "F1",
            FontFace::Bold => "F2",
        }
    }

    fn base_font(&self) -> &'static [u8] {
        match self {
            FontFace::Regular => b"Helvetica",
            FontFace::Bold => b"Helvetica-Bold",
        }
    }

    fn ascii_widths(&self) -> &'static [u16; 95] {
        match self {
            FontFace::Regular => &HELVETICA_ASCII,
            FontFace::Bold => &HELVETICA_BOLD_ASCII,
        }
    }

    /// Width of a single WinAnsi byte in 1000-units.
    fn byte_width_1000(&self, byte: u8) -> f32 {
        match byte {
            32..=126 => self.ascii_widths()[(byte - 32) as usize] as f32,
            0x95 => 350.0, // bullet
            0x96 => 556.0, // en dash
            0x97 => 1000.0, // em dash
            0x91..=0x94 => 333.0,
            // Latin-1 letters: roughly the width of an average lowercase glyph
            _ if byte >= 0xA0 => 556.0,
            _ => 0.0,
        }
    }

    pub(crate) fn text_width(&self, text: &str, font_size: f32) -> f32 {
        to_winansi_bytes(text)
            .iter()
            .map(|&b| self.byte_width_1000(b) * font_size / 1000.0)
            .sum()
    }

    pub(crate) fn space_width(&self, font_size: f32) -> f32 {
        self.byte_width_1000(b' ') * font_size / 1000.0
    }
}

/// Helvetica advance widths for ASCII 32..=126.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
    334, 260, 334, 584, // {..~
];

/// Helvetica-Bold advance widths for ASCII 32..=126.
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    333, 333, 584, 584, 584, 611, 975, // :..@
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    333, 278, 333, 584, 556, 333, // [..`
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a-m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n-z
    389, 280, 389, 584, // {..~
];

/// Map a single Unicode char to its WinAnsi byte, or `None` if unmappable.
fn char_to_winansi(c: char) -> Option<u8> {
    let b = match c as u32 {
        0x0020..=0x007E => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x2026 => 0x85,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x2122 => 0x99,
        // Tabs and newlines never reach a content stream; render as space.
        0x0009 | 0x000A | 0x000D => b' ',
        _ => return None,
    };
    Some(b)
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Characters outside the code page are replaced with `?`.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| char_to_winansi(c).unwrap_or(b'?'))
        .collect()
}

/// Write the Type1 font dictionaries and return the resource pairs.
pub(crate) fn register_fonts(
    pdf: &mut Pdf,
    alloc: &mut impl FnMut() -> Ref,
) -> Vec<(&'static str, Ref)> {
    FontFace::ALL
        .iter()
        .map(|face| {
            let font_ref = alloc();
            pdf.type1_font(font_ref)
                .base_font(Name(face.base_font()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            log::debug!(
                "register_font: {} as {}",
                String::from_utf8_lossy(face.base_font()),
                face.pdf_name()
            );
            (face.pdf_name(), font_ref)
        })
        .collect()
}
