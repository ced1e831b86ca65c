use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

use log::debug;
use printpdf::{
    BuiltinFont, Color, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject,
    IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Point, Px,
    Rgb,
};

use crate::error::InvoiceError;
use crate::fonts::{FaceMetrics, FontBook, FontFace};
use crate::images::RasterImage;
use crate::page::paper_dimensions;
use crate::sink::DocumentSink;

/// Points to millimeters.
const PT_TO_MM: f32 = 25.4 / 72.0;

/// Stroke width for borders, rules and grid lines, in points.
const LINE_THICKNESS: f32 = 1.0;

fn mm(points: f32) -> Mm {
    Mm(points * PT_TO_MM)
}

/// Writes pages into a printpdf document.
///
/// printpdf measures from the bottom-left in millimeters; the flip from the
/// renderer's top-left points happens here and nowhere else.
pub struct PdfSink {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    fonts: FontBook,
    /// Registered fonts, indexed like `FontFace::ALL`.
    font_refs: Vec<IndirectFontRef>,
    width: f32,
    height: f32,
    pages: usize,
}

impl PdfSink {
    /// Open a one-page document sized for `paper_size` and register the
    /// three faces from `fonts`.
    pub fn new(title: &str, paper_size: &str, fonts: FontBook) -> Result<Self, InvoiceError> {
        let (width, height) = paper_dimensions(paper_size);
        let (doc, page1, layer1) = PdfDocument::new(title, mm(width), mm(height), "Layer 1");

        let mut font_refs = Vec::with_capacity(FontFace::ALL.len());
        for face in FontFace::ALL {
            let font_ref = match fonts.metrics(face) {
                FaceMetrics::TrueType(_) => {
                    let data = fonts.font_data(face).unwrap_or_default();
                    doc.add_external_font(Cursor::new(data))
                }
                FaceMetrics::Builtin(_) => doc.add_builtin_font(builtin_for(face)),
            }
            .map_err(|e| InvoiceError::Pdf(e.to_string()))?;
            font_refs.push(font_ref);
        }

        let layer = doc.get_page(page1).get_layer(layer1);
        let sink = PdfSink {
            doc,
            layer,
            fonts,
            font_refs,
            width,
            height,
            pages: 1,
        };
        sink.prepare_layer();
        Ok(sink)
    }

    fn prepare_layer(&self) {
        self.layer
            .set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        self.layer.set_outline_thickness(LINE_THICKNESS);
    }

    fn font_ref(&self, face: FontFace) -> &IndirectFontRef {
        &self.font_refs[face.index()]
    }

    /// Page-space point from renderer coordinates.
    fn point(&self, x: f32, y: f32) -> Point {
        Point::new(mm(x), mm(self.height - y))
    }

    pub fn save<W: Write>(self, writer: &mut BufWriter<W>) -> Result<(), InvoiceError> {
        self.doc
            .save(writer)
            .map_err(|e| InvoiceError::Pdf(e.to_string()))
    }

    pub fn save_to_file<P: AsRef<Path>>(self, path: P) -> Result<(), InvoiceError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.save(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn into_bytes(self) -> Result<Vec<u8>, InvoiceError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| InvoiceError::Pdf(e.to_string()))
    }
}

/// Medium has no standard-font counterpart; it falls back to bold.
fn builtin_for(face: FontFace) -> BuiltinFont {
    match face {
        FontFace::Regular => BuiltinFont::Helvetica,
        FontFace::Medium | FontFace::Bold => BuiltinFont::HelveticaBold,
    }
}

impl DocumentSink for PdfSink {
    fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    fn page_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn add_page(&mut self) -> Result<(), InvoiceError> {
        let (page, layer) = self.doc.add_page(mm(self.width), mm(self.height), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.pages += 1;
        self.prepare_layer();
        debug!("Started PDF page {}", self.pages);
        Ok(())
    }

    fn put_text(&mut self, text: &str, x: f32, y: f32, face: FontFace, size: f32) {
        if text.is_empty() {
            return;
        }
        let baseline = y + self.fonts.ascent(face, size);
        let encoded = self.fonts.encodable(face, text).into_owned();
        self.layer.use_text(
            encoded,
            size,
            mm(x),
            mm(self.height - baseline),
            self.font_ref(face),
        );
    }

    fn stroke_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let points = vec![(self.point(x1, y1), false), (self.point(x2, y2), false)];
        self.layer.add_line(Line {
            points,
            is_closed: false,
        });
    }

    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let points = vec![
            (self.point(x, y), false),
            (self.point(x + width, y), false),
            (self.point(x + width, y + height), false),
            (self.point(x, y + height), false),
        ];
        self.layer.add_line(Line {
            points,
            is_closed: true,
        });
    }

    fn place_image(
        &mut self,
        image: &RasterImage,
        x: f32,
        y: f32,
        width: f32,
    ) -> Result<f32, InvoiceError> {
        let rgb_image = image.rgb_on_white();
        let (width_px, height_px) = rgb_image.dimensions();
        if width_px == 0 || height_px == 0 || width <= 0.0 {
            return Err(InvoiceError::Logo("Image has no pixels".to_string()));
        }
        let height = image.height_for_width(width);

        let pdf_image = Image::from(ImageXObject {
            width: Px(width_px as usize),
            height: Px(height_px as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: rgb_image.into_raw(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        });

        // DPI = pixels / inches
        let dpi = width_px as f32 / (width / 72.0);

        pdf_image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(mm(x)),
                translate_y: Some(mm(self.height - (y + height))),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
        Ok(height)
    }
}
