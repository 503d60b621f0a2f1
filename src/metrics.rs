//! Advance widths for the PDF standard fonts, taken from the Adobe AFM files.

/// Measures rendered text width in points.
pub trait TextMeasure {
    fn text_width(&self, text: &str, size: f32) -> f32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    Courier,
}

// ASCII 0x20..=0x7E, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

// Latin-1 0xA0..=0xFF, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

#[rustfmt::skip]
const HELVETICA_BOLD_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

/// WinAnsi 0x80..=0x9F characters: (char, Helvetica, Helvetica-Bold).
#[rustfmt::skip]
const WIN_ANSI_EXTRA_WIDTHS: [(char, u16, u16); 27] = [
    ('\u{20AC}', 556, 556), ('\u{201A}', 222, 278), ('\u{0192}', 556, 556),
    ('\u{201E}', 333, 500), ('\u{2026}', 1000, 1000), ('\u{2020}', 556, 556),
    ('\u{2021}', 556, 556), ('\u{02C6}', 333, 333), ('\u{2030}', 1000, 1000),
    ('\u{0160}', 667, 667), ('\u{2039}', 333, 333), ('\u{0152}', 1000, 1000),
    ('\u{017D}', 611, 611), ('\u{2018}', 222, 278), ('\u{2019}', 222, 278),
    ('\u{201C}', 333, 500), ('\u{201D}', 333, 500), ('\u{2022}', 350, 350),
    ('\u{2013}', 556, 556), ('\u{2014}', 1000, 1000), ('\u{02DC}', 333, 333),
    ('\u{2122}', 1000, 1000), ('\u{0161}', 500, 556), ('\u{203A}', 333, 333),
    ('\u{0153}', 944, 944), ('\u{017E}', 500, 500), ('\u{0178}', 667, 667),
];

const COURIER_WIDTH: u16 = 600;
/// Used for characters outside WinAnsi; sanitized text never reaches it.
const FALLBACK_WIDTH: u16 = 1000;

impl StandardFont {
    /// AFM advance width, or `None` when the font cannot encode `c`.
    pub fn afm_width(&self, c: char) -> Option<u16> {
        let bold = match self {
            StandardFont::Courier => return Some(COURIER_WIDTH),
            StandardFont::Helvetica => false,
            StandardFont::HelveticaBold => true,
        };
        let (ascii, latin1) = if bold {
            (&HELVETICA_BOLD, &HELVETICA_BOLD_LATIN1)
        } else {
            (&HELVETICA, &HELVETICA_LATIN1)
        };
        match c {
            ' '..='~' => Some(ascii[c as usize - 0x20]),
            '\u{00A0}'..='\u{00FF}' => Some(latin1[c as usize - 0xA0]),
            _ => WIN_ANSI_EXTRA_WIDTHS
                .iter()
                .find(|(ch, _, _)| *ch == c)
                .map(|&(_, regular, heavy)| if bold { heavy } else { regular }),
        }
    }

    pub fn char_width(&self, c: char) -> u16 {
        self.afm_width(c).unwrap_or(FALLBACK_WIDTH)
    }

    /// Courier width of one character at `size`.
    pub fn monospace_advance(size: f32) -> f32 {
        COURIER_WIDTH as f32 * size / 1000.0
    }
}

impl TextMeasure for StandardFont {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.char_width(c) as u32).sum();
        units as f32 * size / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helvetica_widths() {
        assert_eq!(StandardFont::Helvetica.char_width(' '), 278);
        assert_eq!(StandardFont::Helvetica.char_width('W'), 944);
        assert_eq!(StandardFont::Helvetica.char_width('i'), 222);
        assert_eq!(StandardFont::Helvetica.char_width('~'), 584);
    }

    #[test]
    fn test_bold_is_wider() {
        let regular = StandardFont::Helvetica.text_width("minutes", 12.0);
        let bold = StandardFont::HelveticaBold.text_width("minutes", 12.0);
        assert!(bold > regular);
    }

    #[test]
    fn test_courier_fixed() {
        let w = StandardFont::Courier.text_width("abcd", 10.0);
        assert!((w - 24.0).abs() < 1e-4);
        assert!((StandardFont::monospace_advance(10.0) - 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_width_scales_with_size() {
        let a = StandardFont::Helvetica.text_width("Title", 10.0);
        let b = StandardFont::Helvetica.text_width("Title", 20.0);
        assert!((b - 2.0 * a).abs() < 1e-3);
    }

    #[test]
    fn test_win_ansi_extra_widths() {
        let regular = StandardFont::Helvetica;
        assert_eq!(regular.char_width('\u{2014}'), 1000);
        assert_eq!(regular.char_width('\u{2026}'), 1000);
        assert_eq!(regular.char_width('\u{2122}'), 1000);
        assert_eq!(regular.char_width('\u{2030}'), 1000);
        assert_eq!(regular.char_width('\u{2013}'), 556);
        assert_eq!(regular.char_width('\u{2022}'), 350);
        assert_eq!(StandardFont::HelveticaBold.char_width('\u{201C}'), 500);
    }

    #[test]
    fn test_latin1_widths() {
        assert_eq!(StandardFont::Helvetica.char_width('Æ'), 1000);
        assert_eq!(StandardFont::Helvetica.char_width('æ'), 889);
        assert_eq!(StandardFont::Helvetica.char_width('é'), 556);
        assert_eq!(StandardFont::Helvetica.char_width('©'), 737);
        assert_eq!(StandardFont::HelveticaBold.char_width('ñ'), 611);
        assert_eq!(StandardFont::HelveticaBold.char_width('\u{00A0}'), 278);
    }

    #[test]
    fn test_every_drawable_char_has_afm_width() {
        let latin = (0x20u32..=0xFF).filter_map(char::from_u32);
        let extras = WIN_ANSI_EXTRA_WIDTHS.iter().map(|(c, _, _)| *c);
        for c in latin.chain(extras).filter(|c| crate::sanitize::is_supported(*c)) {
            for font in [StandardFont::Helvetica, StandardFont::HelveticaBold] {
                assert!(font.afm_width(c).is_some(), "{:?} missing {:?}", font, c);
            }
        }
    }

    #[test]
    fn test_unencodable_char_uses_fallback() {
        assert_eq!(StandardFont::Helvetica.afm_width('\u{4F1A}'), None);
        assert_eq!(StandardFont::Helvetica.char_width('\u{4F1A}'), 1000);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(StandardFont::HelveticaBold.text_width("", 18.0), 0.0);
    }
}
