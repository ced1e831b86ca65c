use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use log::info;

use crate::config::FontConfig;
use crate::error::InvoiceError;

// ============================================================================
// Faces
// ============================================================================

/// The three faces every invoice is set in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum FontFace {
    Regular,
    Medium,
    Bold,
}

impl FontFace {
    pub const ALL: [FontFace; 3] = [FontFace::Regular, FontFace::Medium, FontFace::Bold];

    pub(crate) fn index(self) -> usize {
        match self {
            FontFace::Regular => 0,
            FontFace::Medium => 1,
            FontFace::Bold => 2,
        }
    }
}

/// Standard PDF fonts used when no TrueType file is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFace {
    Helvetica,
    HelveticaBold,
}

/// Line height as a multiple of the font size for the standard fonts.
const BUILTIN_LINE_HEIGHT: f32 = 1.2;
/// Helvetica ascender, 1/1000 em.
const BUILTIN_ASCENT: f32 = 0.718;
/// Width for characters outside the mapped range, 1/1000 em.
const DEFAULT_WIDTH: u16 = 278;

/// Helvetica widths for ASCII 32..=126, 1/1000 em (Adobe AFM).
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold widths for ASCII 32..=126, 1/1000 em (Adobe AFM).
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

impl BuiltinFace {
    fn char_width(self, ch: char) -> u16 {
        let code = ch as u32;
        if !(32..=126).contains(&code) {
            return DEFAULT_WIDTH;
        }
        let index = (code - 32) as usize;
        match self {
            BuiltinFace::Helvetica => HELVETICA_WIDTHS[index],
            BuiltinFace::HelveticaBold => HELVETICA_BOLD_WIDTHS[index],
        }
    }
}

/// Advance widths and vertical metrics pulled from a TrueType file.
pub struct TrueTypeMetrics {
    data: Vec<u8>,
    units_per_em: f32,
    ascender: f32,
    descender: f32,
    line_gap: f32,
    /// Unicode codepoint -> advance width in font units
    advances: BTreeMap<u32, u16>,
    default_advance: u16,
}

impl TrueTypeMetrics {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, InvoiceError> {
        // The parsed face borrows `data`; keep it scoped so the bytes can
        // move into the result.
        let (units_per_em, ascender, descender, line_gap, advances, default_advance) = {
            let face = ttf_parser::Face::parse(&data, 0)
                .map_err(|e| InvoiceError::Font(format!("Failed to parse TTF: {}", e)))?;

            let units_per_em = face.units_per_em() as f32;
            if units_per_em <= 0.0 {
                return Err(InvoiceError::Font("Font reports zero units per em".to_string()));
            }

            let mut advances = BTreeMap::new();
            let subtables = face
                .tables()
                .cmap
                .ok_or_else(|| InvoiceError::Font("Font has no cmap table".to_string()))?;
            for subtable in subtables.subtables {
                if !subtable.is_unicode() {
                    continue;
                }
                subtable.codepoints(|cp| {
                    if let Some(gid) = subtable.glyph_index(cp) {
                        let width = face.glyph_hor_advance(gid).unwrap_or(0);
                        advances.entry(cp).or_insert(width);
                    }
                });
            }
            let default_advance = face.glyph_hor_advance(ttf_parser::GlyphId(0)).unwrap_or(0);

            (
                units_per_em,
                face.ascender() as f32,
                face.descender() as f32,
                face.line_gap() as f32,
                advances,
                default_advance,
            )
        };

        Ok(TrueTypeMetrics {
            data,
            units_per_em,
            ascender,
            descender,
            line_gap,
            advances,
            default_advance,
        })
    }

    fn advance(&self, ch: char) -> u16 {
        self.advances
            .get(&(ch as u32))
            .copied()
            .unwrap_or(self.default_advance)
    }
}

pub enum FaceMetrics {
    Builtin(BuiltinFace),
    TrueType(TrueTypeMetrics),
}

// ============================================================================
// Font Book
// ============================================================================

/// Metrics for the regular, medium and bold faces of one render.
///
/// Both sinks measure through the same book, so wrapping decisions made while
/// laying out always match what ends up on the page.
pub struct FontBook {
    faces: [FaceMetrics; 3],
}

impl Default for FontBook {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FontBook {
    /// Helvetica for regular text, Helvetica-Bold for medium and bold.
    pub fn builtin() -> Self {
        FontBook {
            faces: [
                FaceMetrics::Builtin(BuiltinFace::Helvetica),
                FaceMetrics::Builtin(BuiltinFace::HelveticaBold),
                FaceMetrics::Builtin(BuiltinFace::HelveticaBold),
            ],
        }
    }

    /// Load configured TrueType files; faces without a file stay built-in.
    pub fn load(config: &FontConfig) -> Result<Self, InvoiceError> {
        let mut book = Self::builtin();
        for face in FontFace::ALL {
            if let Some(path) = config.path_for(face) {
                book.faces[face.index()] = FaceMetrics::TrueType(load_ttf(path)?);
                info!("Registered {:?} face from {}", face, path.display());
            }
        }
        Ok(book)
    }

    pub fn metrics(&self, face: FontFace) -> &FaceMetrics {
        &self.faces[face.index()]
    }

    /// Raw TrueType bytes for embedding, `None` for standard fonts.
    pub fn font_data(&self, face: FontFace) -> Option<&[u8]> {
        match self.metrics(face) {
            FaceMetrics::TrueType(ttf) => Some(&ttf.data),
            FaceMetrics::Builtin(_) => None,
        }
    }

    /// Text as it will be drawn. The standard fonts only cover Latin-1, so
    /// the rupee sign is spelled out and anything else outside that range
    /// becomes '?'.
    pub fn encodable<'a>(&self, face: FontFace, text: &'a str) -> Cow<'a, str> {
        match self.metrics(face) {
            FaceMetrics::TrueType(_) => Cow::Borrowed(text),
            FaceMetrics::Builtin(_) => {
                if text.chars().all(|c| (c as u32) < 256) {
                    return Cow::Borrowed(text);
                }
                let mut out = String::with_capacity(text.len());
                for ch in text.chars() {
                    match ch {
                        '₹' => out.push_str("Rs."),
                        c if (c as u32) < 256 => out.push(c),
                        _ => out.push('?'),
                    }
                }
                Cow::Owned(out)
            }
        }
    }

    /// Width of a single line of text in points.
    pub fn width_of(&self, face: FontFace, text: &str, size: f32) -> f32 {
        let text = self.encodable(face, text);
        match self.metrics(face) {
            FaceMetrics::Builtin(builtin) => {
                let units: u32 = text.chars().map(|c| builtin.char_width(c) as u32).sum();
                units as f32 * size / 1000.0
            }
            FaceMetrics::TrueType(ttf) => {
                let units: u32 = text.chars().map(|c| ttf.advance(c) as u32).sum();
                units as f32 / ttf.units_per_em * size
            }
        }
    }

    pub fn line_height(&self, face: FontFace, size: f32) -> f32 {
        match self.metrics(face) {
            FaceMetrics::Builtin(_) => size * BUILTIN_LINE_HEIGHT,
            FaceMetrics::TrueType(ttf) => {
                (ttf.ascender - ttf.descender + ttf.line_gap) / ttf.units_per_em * size
            }
        }
    }

    /// Distance from the top of a line box to its baseline.
    pub fn ascent(&self, face: FontFace, size: f32) -> f32 {
        match self.metrics(face) {
            FaceMetrics::Builtin(_) => size * BUILTIN_ASCENT,
            FaceMetrics::TrueType(ttf) => ttf.ascender / ttf.units_per_em * size,
        }
    }

    /// Greedy word wrap. Words wider than `width` are broken between
    /// characters; explicit newlines always start a new line.
    pub fn wrap(&self, face: FontFace, text: &str, size: f32, width: f32) -> Vec<String> {
        let space = self.width_of(face, " ", size);
        let mut lines = Vec::new();

        for paragraph in text.split('\n') {
            let mut current = String::new();
            let mut current_width = 0.0;

            for word in paragraph.split_whitespace() {
                let word_width = self.width_of(face, word, size);
                let needed = if current.is_empty() {
                    word_width
                } else {
                    current_width + space + word_width
                };

                if needed <= width {
                    if !current.is_empty() {
                        current.push(' ');
                    }
                    current.push_str(word);
                    current_width = needed;
                    continue;
                }

                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }

                if word_width <= width {
                    current.push_str(word);
                    current_width = word_width;
                } else {
                    for piece in self.break_word(face, word, size, width) {
                        if !current.is_empty() {
                            lines.push(std::mem::take(&mut current));
                        }
                        current_width = self.width_of(face, &piece, size);
                        current = piece;
                    }
                }
            }

            if !current.is_empty() {
                lines.push(current);
            }
        }
        lines
    }

    fn break_word(&self, face: FontFace, word: &str, size: f32, width: f32) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut current = String::new();
        for ch in word.chars() {
            current.push(ch);
            if self.width_of(face, &current, size) > width && current.chars().count() > 1 {
                current.pop();
                pieces.push(std::mem::take(&mut current));
                current.push(ch);
            }
        }
        if !current.is_empty() {
            pieces.push(current);
        }
        pieces
    }

    /// Cut text to one line of at most `width`, ending in "..." when cut.
    ///
    /// Widths are additive per character, so the cut point is found in one
    /// pass with a running width.
    pub fn ellipsize(&self, face: FontFace, text: &str, size: f32, width: f32) -> String {
        let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if self.width_of(face, &single_line, size) <= width {
            return single_line;
        }
        let budget = width - self.width_of(face, "...", size);
        let mut buf = [0u8; 4];
        let mut running = 0.0;
        // End of the longest prefix that fits with its trailing space trimmed.
        let mut cut = 0;
        for (i, ch) in single_line.char_indices() {
            running += self.width_of(face, ch.encode_utf8(&mut buf), size);
            if ch == ' ' {
                continue;
            }
            if running > budget {
                break;
            }
            cut = i + ch.len_utf8();
        }
        if cut == 0 && budget < 0.0 {
            return String::new();
        }
        format!("{}...", &single_line[..cut])
    }
}

fn load_ttf(path: &Path) -> Result<TrueTypeMetrics, InvoiceError> {
    let data = std::fs::read(path)
        .map_err(|e| InvoiceError::Font(format!("{}: {}", path.display(), e)))?;
    TrueTypeMetrics::from_bytes(data)
        .map_err(|e| InvoiceError::Font(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_widths_follow_afm() {
        let book = FontBook::builtin();
        // "Hi" = 722 + 222 in Helvetica
        assert!((book.width_of(FontFace::Regular, "Hi", 10.0) - 9.44).abs() < 1e-4);
        assert!(book.width_of(FontFace::Bold, "Hi", 10.0) > book.width_of(FontFace::Regular, "Hi", 10.0));
    }

    #[test]
    fn rupee_sign_is_spelled_out_for_builtin_fonts() {
        let book = FontBook::builtin();
        assert_eq!(book.encodable(FontFace::Regular, "Rate (₹)"), "Rate (Rs.)");
        assert_eq!(book.encodable(FontFace::Regular, "plain"), "plain");
    }

    #[test]
    fn wrap_keeps_lines_within_width() {
        let book = FontBook::builtin();
        let text = "Bangalore, Karnataka, India Bangalore, Karnataka, India";
        let lines = book.wrap(FontFace::Regular, text, 8.0, 100.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(book.width_of(FontFace::Regular, line, 8.0) <= 100.0);
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn long_words_are_broken() {
        let book = FontBook::builtin();
        let lines = book.wrap(FontFace::Regular, "WWWWWWWWWWWWWWWWWWWW", 10.0, 40.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "WWWWWWWWWWWWWWWWWWWW");
    }

    #[test]
    fn empty_text_has_no_lines() {
        let book = FontBook::builtin();
        assert!(book.wrap(FontFace::Regular, "", 10.0, 100.0).is_empty());
    }

    #[test]
    fn ellipsize_fits_width() {
        let book = FontBook::builtin();
        let cut = book.ellipsize(FontFace::Medium, "Business Counter Private Limited", 10.0, 60.0);
        assert!(cut.ends_with("..."));
        assert!(book.width_of(FontFace::Medium, &cut, 10.0) <= 60.0);
        assert_eq!(book.ellipsize(FontFace::Medium, "Short", 10.0, 60.0), "Short");
    }

    #[test]
    fn ellipsize_trims_space_before_the_dots() {
        let book = FontBook::builtin();
        // "ab" + "..." fits in 25pt at 10pt, "ab c" + "..." does not
        let cut = book.ellipsize(FontFace::Regular, "ab cdefgh", 10.0, 25.0);
        assert_eq!(cut, "ab...");
        assert_eq!(book.ellipsize(FontFace::Regular, "abc", 10.0, 1.0), "");
    }

    #[test]
    fn ellipsize_handles_very_long_text() {
        let book = FontBook::builtin();
        let name = "Business Counter ".repeat(5000);
        let cut = book.ellipsize(FontFace::Medium, &name, 10.0, 184.0);
        assert!(cut.starts_with("Business Counter"));
        assert!(cut.ends_with("..."));
        assert!(book.width_of(FontFace::Medium, &cut, 10.0) <= 184.0);
    }

    #[test]
    fn missing_font_file_is_an_error() {
        let config = FontConfig {
            regular: Some("does/not/exist.ttf".into()),
            ..FontConfig::default()
        };
        assert!(matches!(FontBook::load(&config), Err(InvoiceError::Font(_))));
    }
}
