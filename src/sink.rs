use serde::Serialize;

use crate::error::InvoiceError;
use crate::fonts::{FontBook, FontFace};
use crate::images::RasterImage;
use crate::page::paper_dimensions;

// ============================================================================
// Text Styles
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// What happens to text wider than its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    /// Break into as many lines as needed.
    Wrap,
    /// Stay on one line, cut with "...".
    Ellipsis,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub face: FontFace,
    pub size: f32,
    /// Box width. Without one, text is neither wrapped nor aligned.
    pub width: Option<f32>,
    pub align: Align,
    pub overflow: Overflow,
}

impl TextStyle {
    pub fn new(face: FontFace, size: f32) -> Self {
        TextStyle {
            face,
            size,
            width: None,
            align: Align::Left,
            overflow: Overflow::Wrap,
        }
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn ellipsis(mut self) -> Self {
        self.overflow = Overflow::Ellipsis;
        self
    }
}

// ============================================================================
// Sink Trait
// ============================================================================

/// A page-based drawing surface. Coordinates are points from the top-left
/// corner of the current page; text `y` is the top of the line box.
///
/// Implementors provide the primitives. Wrapped, aligned and ellipsized text
/// along with string measurement come for free on top of [`FontBook`].
pub trait DocumentSink {
    fn fonts(&self) -> &FontBook;

    /// Current page width and height in points.
    fn page_size(&self) -> (f32, f32);

    fn page_count(&self) -> usize;

    /// Start a new page of the same size. Drawing continues on it.
    fn add_page(&mut self) -> Result<(), InvoiceError>;

    /// Draw a single line of text, no wrapping.
    fn put_text(&mut self, text: &str, x: f32, y: f32, face: FontFace, size: f32);

    /// Stroke a 1pt black line.
    fn stroke_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32);

    /// Stroke a 1pt black rectangle outline.
    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Place an image scaled to `width`; returns the height it took.
    fn place_image(
        &mut self,
        image: &RasterImage,
        x: f32,
        y: f32,
        width: f32,
    ) -> Result<f32, InvoiceError>;

    fn width_of_string(&self, text: &str, face: FontFace, size: f32) -> f32 {
        self.fonts().width_of(face, text, size)
    }

    /// Height `text` takes when wrapped at `width`.
    fn height_of_string(&self, text: &str, width: f32, face: FontFace, size: f32) -> f32 {
        let fonts = self.fonts();
        fonts.wrap(face, text, size, width).len() as f32 * fonts.line_height(face, size)
    }

    /// Draw text in a box and return the height used.
    fn text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) -> f32 {
        let (placed, line_height) = {
            let fonts = self.fonts();
            let lines = match (style.width, style.overflow) {
                (None, _) => text.lines().map(str::to_string).collect(),
                (Some(width), Overflow::Wrap) => fonts.wrap(style.face, text, style.size, width),
                (Some(width), Overflow::Ellipsis) => {
                    let line = fonts.ellipsize(style.face, text, style.size, width);
                    if line.is_empty() {
                        Vec::new()
                    } else {
                        vec![line]
                    }
                }
            };
            let placed: Vec<(String, f32)> = lines
                .into_iter()
                .map(|line| {
                    let offset = match (style.width, style.align) {
                        (Some(width), Align::Center) => {
                            (width - fonts.width_of(style.face, &line, style.size)) / 2.0
                        }
                        (Some(width), Align::Right) => {
                            width - fonts.width_of(style.face, &line, style.size)
                        }
                        _ => 0.0,
                    };
                    (line, offset)
                })
                .collect();
            (placed, fonts.line_height(style.face, style.size))
        };

        let mut line_y = y;
        for (line, offset) in &placed {
            self.put_text(line, x + offset, line_y, style.face, style.size);
            line_y += line_height;
        }
        placed.len() as f32 * line_height
    }
}

// ============================================================================
// Recording Sink
// ============================================================================

/// One drawing operation as the renderer issued it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Text {
        text: String,
        x: f32,
        y: f32,
        face: FontFace,
        size: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// Keeps every operation in memory, page by page. Used for layout dumps and
/// for checking layout decisions without decoding a PDF.
pub struct RecordingSink {
    fonts: FontBook,
    width: f32,
    height: f32,
    pages: Vec<Vec<DrawOp>>,
}

#[derive(Serialize)]
struct LayoutDump<'a> {
    width: f32,
    height: f32,
    pages: &'a [Vec<DrawOp>],
}

impl RecordingSink {
    /// A sink sized for `paper_size`, measuring with the standard fonts.
    pub fn new(paper_size: &str) -> Self {
        Self::with_fonts(paper_size, FontBook::builtin())
    }

    pub fn with_fonts(paper_size: &str, fonts: FontBook) -> Self {
        let (width, height) = paper_dimensions(paper_size);
        RecordingSink {
            fonts,
            width,
            height,
            pages: vec![Vec::new()],
        }
    }

    pub fn pages(&self) -> &[Vec<DrawOp>] {
        &self.pages
    }

    /// Text strings drawn on one page, in drawing order.
    pub fn texts_on(&self, page: usize) -> Vec<&str> {
        self.pages
            .get(page)
            .map(|ops| {
                ops.iter()
                    .filter_map(|op| match op {
                        DrawOp::Text { text, .. } => Some(text.as_str()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn to_json(&self) -> Result<String, InvoiceError> {
        let dump = LayoutDump {
            width: self.width,
            height: self.height,
            pages: &self.pages,
        };
        serde_json::to_string_pretty(&dump).map_err(|e| InvoiceError::Pdf(e.to_string()))
    }

    fn current(&mut self) -> &mut Vec<DrawOp> {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}

impl DocumentSink for RecordingSink {
    fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    fn page_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn add_page(&mut self) -> Result<(), InvoiceError> {
        self.pages.push(Vec::new());
        Ok(())
    }

    fn put_text(&mut self, text: &str, x: f32, y: f32, face: FontFace, size: f32) {
        self.current().push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            face,
            size,
        });
    }

    fn stroke_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.current().push(DrawOp::Line { x1, y1, x2, y2 });
    }

    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.current().push(DrawOp::Rect {
            x,
            y,
            width,
            height,
        });
    }

    fn place_image(
        &mut self,
        image: &RasterImage,
        x: f32,
        y: f32,
        width: f32,
    ) -> Result<f32, InvoiceError> {
        let height = image.height_for_width(width);
        self.current().push(DrawOp::Image {
            x,
            y,
            width,
            height,
        });
        Ok(height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_text_reports_its_height() {
        let mut sink = RecordingSink::new("A4");
        let style = TextStyle::new(FontFace::Regular, 10.0).width(60.0);
        let height = sink.text("one two three four five six seven", 10.0, 20.0, &style);
        let lines = sink.texts_on(0).len();
        assert!(lines > 1);
        assert!((height - lines as f32 * 12.0).abs() < 1e-4);
        assert_eq!(
            height,
            sink.height_of_string("one two three four five six seven", 60.0, FontFace::Regular, 10.0)
        );
    }

    #[test]
    fn right_alignment_ends_at_box_edge() {
        let mut sink = RecordingSink::new("A4");
        let style = TextStyle::new(FontFace::Regular, 10.0).width(100.0).align(Align::Right);
        sink.text("42.00", 50.0, 0.0, &style);
        let width = sink.width_of_string("42.00", FontFace::Regular, 10.0);
        match &sink.pages()[0][0] {
            DrawOp::Text { x, .. } => assert!((x + width - 150.0).abs() < 1e-3),
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn ellipsis_stays_on_one_line() {
        let mut sink = RecordingSink::new("A4");
        let style = TextStyle::new(FontFace::Medium, 10.0).width(50.0).ellipsis();
        let height = sink.text("A very long company name indeed", 0.0, 0.0, &style);
        assert_eq!(sink.texts_on(0).len(), 1);
        assert!((height - 12.0).abs() < 1e-4);
    }

    #[test]
    fn pages_are_recorded_separately() {
        let mut sink = RecordingSink::new("A5");
        sink.stroke_line(0.0, 0.0, 1.0, 1.0);
        sink.add_page().unwrap();
        sink.stroke_rect(1.0, 1.0, 2.0, 2.0);
        assert_eq!(sink.page_count(), 2);
        assert_eq!(sink.pages()[1].len(), 1);
        assert!(sink.to_json().unwrap().contains("\"op\": \"rect\""));
    }
}
