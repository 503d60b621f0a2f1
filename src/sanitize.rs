use unicode_normalization::UnicodeNormalization;

/// Characters WinAnsiEncoding places in 0x80..=0x9F.
const WIN_ANSI_EXTRAS: &[char] = &[
    '\u{20AC}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}', '\u{02C6}',
    '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{017D}', '\u{2018}', '\u{2019}', '\u{201C}',
    '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}', '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}',
    '\u{0153}', '\u{017E}', '\u{0178}',
];

/// Whether the standard PDF fonts can encode and draw `c`.
pub fn is_supported(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{00A0}'..='\u{00FF}') || WIN_ANSI_EXTRAS.contains(&c)
}

/// Strips everything the PDF standard fonts cannot draw.
///
/// Must run before width measurement so wrapping matches what is painted.
pub fn sanitize_for_pdf(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.nfc() {
        if is_supported(c) {
            out.push(c);
        } else if c == '\t' {
            out.push_str("    ");
        } else {
            let compat: String = c.to_string().nfkc().collect();
            if compat != c.to_string() && compat.chars().all(is_supported) {
                out.push_str(&compat);
            }
        }
    }
    out
}
