// invoice-pdf: Render GST tax invoices as paginated PDF documents

pub mod config;
pub mod error;
pub mod fonts;
pub mod format;
pub mod images;
pub mod layout;
pub mod model;
pub mod page;
pub mod pdf;
pub mod sink;
pub mod totals;

pub use config::RenderConfig;
pub use error::InvoiceError;
pub use layout::{render, RenderAssets};
pub use model::{Invoice, LineItem};
pub use pdf::PdfSink;
pub use sink::{DocumentSink, RecordingSink};

use fonts::FontBook;

/// Render `invoice` into a fresh PDF sized for `paper_size`, with fonts and
/// logo taken from `config`. The caller saves the returned sink.
pub fn render_pdf(
    invoice: &Invoice,
    paper_size: &str,
    config: &RenderConfig,
) -> Result<PdfSink, InvoiceError> {
    let fonts = FontBook::load(&config.fonts)?;
    let assets = RenderAssets::load(config)?;
    let title = match invoice.invoice_number.as_deref() {
        Some(number) => format!("Invoice INV-{}", number),
        None => "Invoice".to_string(),
    };
    let mut sink = PdfSink::new(&title, paper_size, fonts)?;
    render(&mut sink, invoice, paper_size, &assets, config)?;
    Ok(sink)
}

/// Lay out `invoice` without producing a PDF. Measures with the same fonts
/// `render_pdf` would use.
pub fn render_layout(
    invoice: &Invoice,
    paper_size: &str,
    config: &RenderConfig,
) -> Result<RecordingSink, InvoiceError> {
    let fonts = FontBook::load(&config.fonts)?;
    let assets = RenderAssets::load(config)?;
    let mut sink = RecordingSink::with_fonts(paper_size, fonts);
    render(&mut sink, invoice, paper_size, &assets, config)?;
    Ok(sink)
}
