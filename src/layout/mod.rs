//! Invoice page layout.
//!
//! Phases run top to bottom in a fixed order, each drawing one block and
//! moving the shared cursor in [`LayoutContext`] below it. All offsets are
//! A4 points multiplied by the paper's scale factor.

mod address;
mod bank;
mod header;
mod items;
mod summary;
mod tax;

use log::{debug, info};

pub use items::{fit_columns, ColumnLayout, COLUMN_COUNT};

use crate::config::RenderConfig;
use crate::error::InvoiceError;
use crate::fonts::FontFace;
use crate::images::RasterImage;
use crate::model::Invoice;
use crate::page::{resolve_scale, PageGeometry};
use crate::sink::{Align, DocumentSink, TextStyle};

/// "Tax Invoice" stamp baseline offset from the page top.
const TITLE_Y: f32 = 20.0;
const TITLE_SIZE: f32 = 12.0;
const COPY_LABEL_Y: f32 = 24.0;
const COPY_LABEL_SIZE: f32 = 8.0;
/// Right inset of the "ORIGINAL FOR RECIPIENT" label.
const COPY_LABEL_INSET: f32 = 35.0;

/// Images and other loaded resources a render draws from.
#[derive(Debug, Clone, Default)]
pub struct RenderAssets {
    pub logo: Option<RasterImage>,
}

impl RenderAssets {
    /// Load everything `config` points at. A logo that cannot be loaded
    /// fails the whole render.
    pub fn load(config: &RenderConfig) -> Result<Self, InvoiceError> {
        let logo = config.logo.as_deref().map(RasterImage::load).transpose()?;
        Ok(RenderAssets { logo })
    }
}

/// Everything a layout phase reads or moves: the sink, page geometry, and
/// the running cursor.
pub struct LayoutContext<'a, S: DocumentSink> {
    pub sink: &'a mut S,
    pub geometry: PageGeometry,
    /// Top of the next block, in points from the page top.
    pub y: f32,
    pub config: &'a RenderConfig,
    pub assets: &'a RenderAssets,
}

impl<'a, S: DocumentSink> LayoutContext<'a, S> {
    pub fn new(
        sink: &'a mut S,
        scale: f32,
        config: &'a RenderConfig,
        assets: &'a RenderAssets,
    ) -> Self {
        let (width, height) = sink.page_size();
        let geometry = PageGeometry::new(scale, width, height);
        LayoutContext {
            sink,
            geometry,
            y: geometry.top_margin,
            config,
            assets,
        }
    }

    /// Scale a layout constant.
    pub fn s(&self, value: f32) -> f32 {
        self.geometry.s(value)
    }

    /// Text of an optional field, or the configured placeholder.
    pub fn field<'b>(&'b self, value: &'b Option<String>) -> &'b str {
        value.as_deref().unwrap_or(&self.config.placeholder)
    }

    pub fn text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) -> f32 {
        self.sink.text(text, x, y, style)
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.sink.stroke_line(x1, y1, x2, y2);
    }

    /// Full-width horizontal rule between the border's side edges.
    pub fn rule(&mut self, y: f32) {
        let (left, right) = (self.geometry.left(), self.geometry.right());
        self.sink.stroke_line(left, y, right, y);
    }

    /// Border and header stamp. Runs for the first page and for every page
    /// started through [`LayoutContext::new_page`].
    pub fn decorate_page(&mut self) {
        let g = self.geometry;
        self.sink.stroke_rect(
            g.left(),
            g.top_margin,
            g.right() - g.left(),
            g.bottom() - g.top_margin,
        );

        let title = TextStyle::new(FontFace::Medium, g.s(TITLE_SIZE))
            .width(g.width)
            .align(Align::Center);
        self.sink.text("Tax Invoice", 0.0, g.s(TITLE_Y), &title);

        let copy_label = TextStyle::new(FontFace::Regular, g.s(COPY_LABEL_SIZE))
            .width(g.width - g.s(COPY_LABEL_INSET))
            .align(Align::Right);
        self.sink
            .text("ORIGINAL FOR RECIPIENT", 0.0, g.s(COPY_LABEL_Y), &copy_label);
    }

    pub fn new_page(&mut self) -> Result<(), InvoiceError> {
        self.sink.add_page()?;
        info!("Page break, now on page {}", self.sink.page_count());
        self.decorate_page();
        self.y = self.geometry.top_margin;
        Ok(())
    }

    /// Start a new page unless a block of `required` height fits between the
    /// cursor and `reserve` above the page bottom. After a break the cursor
    /// sits at `resume_y`. Returns whether a page was started.
    pub fn ensure_space(
        &mut self,
        required: f32,
        reserve: f32,
        resume_y: f32,
    ) -> Result<bool, InvoiceError> {
        if self.y + required <= self.geometry.height - reserve {
            return Ok(false);
        }
        debug!(
            "Block of {:.1}pt at y={:.1} overflows page {}",
            required,
            self.y,
            self.sink.page_count()
        );
        self.new_page()?;
        self.y = resume_y;
        Ok(true)
    }
}

// ============================================================================
// Entry Point
// ============================================================================

/// Lay out `invoice` on `sink`, starting on the sink's current page.
///
/// The sink must already be sized for `paper_size`; the name only selects
/// the scale factor here.
pub fn render<S: DocumentSink>(
    sink: &mut S,
    invoice: &Invoice,
    paper_size: &str,
    assets: &RenderAssets,
    config: &RenderConfig,
) -> Result<(), InvoiceError> {
    let scale = resolve_scale(paper_size);
    info!(
        "Rendering invoice {} on {} (scale {}), {} items",
        invoice.invoice_number.as_deref().unwrap_or("<none>"),
        paper_size,
        scale,
        invoice.items.len()
    );

    let mut ctx = LayoutContext::new(sink, scale, config, assets);
    ctx.decorate_page();

    header::draw_header(&mut ctx, invoice)?;
    address::draw_addresses(&mut ctx, invoice);
    items::draw_item_table(&mut ctx, &invoice.items)?;
    summary::draw_summary(&mut ctx, &invoice.items)?;
    tax::draw_tax_breakdown(&mut ctx, &invoice.items)?;
    bank::draw_bank_details(&mut ctx, invoice)?;

    info!("Invoice laid out on {} page(s)", ctx.sink.page_count());
    Ok(())
}
