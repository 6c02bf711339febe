use pdf_writer::{Name, Pdf, Ref};

/// The two base-14 faces the manifest uses. Neither is embedded; viewers
/// supply them, so text is limited to the WinAnsi character set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    pub const ALL: [Font; 2] = [Font::Regular, Font::Bold];

    pub(crate) fn base_font(self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
        }
    }

    /// Resource name used inside content streams.
    pub(crate) fn pdf_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }

    /// Advance width of `ch` in 1000-units.
    pub fn char_width_1000(self, ch: char) -> f32 {
        let byte = char_to_winansi(ch);
        if byte < 32 {
            return 0.0;
        }
        match self {
            Font::Regular => helvetica_width(byte),
            Font::Bold => helvetica_bold_width(byte),
        }
    }

    pub fn text_width(self, text: &str, font_size: f32) -> f32 {
        text.chars()
            .map(|ch| self.char_width_1000(ch) * font_size / 1000.0)
            .sum()
    }

    pub fn space_width(self, font_size: f32) -> f32 {
        self.char_width_1000(' ') * font_size / 1000.0
    }
}

/// Ascender of Helvetica as a fraction of the font size (AFM: 718).
pub const ASCENDER_RATIO: f32 = 0.718;

pub(crate) struct FontEntry {
    pub(crate) font: Font,
    pub(crate) font_ref: Ref,
}

pub(crate) fn register_font(pdf: &mut Pdf, font: Font, alloc: &mut impl FnMut() -> Ref) -> FontEntry {
    let font_ref = alloc();
    pdf.type1_font(font_ref)
        .base_font(Name(font.base_font().as_bytes()))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    log::debug!("register_font: {} as /{}", font.base_font(), font.pdf_name());
    FontEntry { font, font_ref }
}

/// True when the character has a WinAnsi code point, i.e. can be shown by
/// the base-14 fonts without embedding.
pub fn is_encodable(c: char) -> bool {
    char_to_winansi(c) >= 32
}

fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007E => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(char_to_winansi)
        .filter(|&b| b >= 32)
        .collect()
}

/// Base letter of an accented Latin-1 letter, used to borrow its width.
fn latin1_base(byte: u8) -> Option<u8> {
    Some(match byte {
        0xC0..=0xC5 => b'A',
        0xC7 => b'C',
        0xC8..=0xCB => b'E',
        0xCC..=0xCF => b'I',
        0xD1 => b'N',
        0xD2..=0xD6 | 0xD8 => b'O',
        0xD9..=0xDC => b'U',
        0xDD => b'Y',
        0xE0..=0xE5 => b'a',
        0xE7 => b'c',
        0xE8..=0xEB => b'e',
        0xF1 => b'n',
        0xF2..=0xF6 | 0xF8 => b'o',
        0xF9..=0xFC => b'u',
        0xFD | 0xFF => b'y',
        _ => return None,
    })
}

// AFM advance widths for printable ASCII (32..=126).
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // sp..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
    334, 260, 334, 584, // '{'..'~'
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

fn width_from_table(table: &[u16; 95], byte: u8) -> f32 {
    match byte {
        32..=126 => table[(byte - 32) as usize] as f32,
        // Accented i uses the dotless i advance in both faces.
        0xEC..=0xEF => 278.0,
        0x85 | 0x89 | 0x97 => 1000.0,
        0x91 | 0x92 | 0x82 => 222.0,
        0x93 | 0x94 | 0x84 => 333.0,
        0x95 => 350.0,
        0x96 => 556.0,
        0xA0 => 278.0,
        0xA1 => 333.0,
        0xB0 => 400.0,
        0xBF => 611.0,
        _ => latin1_base(byte)
            .map(|b| table[(b - 32) as usize] as f32)
            .unwrap_or(556.0),
    }
}

fn helvetica_width(byte: u8) -> f32 {
    width_from_table(&HELVETICA_ASCII, byte)
}

fn helvetica_bold_width(byte: u8) -> f32 {
    width_from_table(&HELVETICA_BOLD_ASCII, byte)
}
