// invoice-pdf: Render GST tax invoices as paginated PDF documents

use std::fs;

use chrono::Local;
use clap::Parser;
use log::info;

use invoice_pdf::{render_layout, render_pdf, DocumentSink, Invoice, InvoiceError, RenderConfig};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(author, version, about = "Render GST tax invoices as PDF")]
struct Args {
    /// Invoice JSON file (uses the built-in sample invoice when omitted)
    #[arg(short, long)]
    invoice: Option<String>,

    /// Paper size: A3, A4 or A5 (other sizes print at A4 scale)
    #[arg(short, long, default_value = "A4")]
    size: String,

    /// Output filename (defaults to invoice-{number}-{date}.pdf)
    #[arg(short, long)]
    output: Option<String>,

    /// Logo image (file path or URL), overrides the config file
    #[arg(short, long)]
    logo: Option<String>,

    /// Render configuration (TOML)
    #[arg(short, long)]
    config: Option<String>,

    /// Write the laid-out drawing operations as JSON instead of a PDF
    #[arg(long)]
    layout_json: Option<String>,

    /// Draw a payment QR code next to the bank details
    #[arg(long)]
    payment_qr: bool,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), InvoiceError> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    if args.logo.is_some() {
        config.logo = args.logo.clone();
    }
    if args.payment_qr {
        config.payment_qr = true;
    }

    let invoice = match &args.invoice {
        Some(path) => {
            info!("Reading invoice from {}", path);
            Invoice::from_json_file(path)?
        }
        None => Invoice::sample(),
    };

    if let Some(json_path) = &args.layout_json {
        let layout = render_layout(&invoice, &args.size, &config)?;
        fs::write(json_path, layout.to_json()?)?;
        println!("✓ Layout written: {}", json_path);
        println!("  Pages: {}", layout.pages().len());
        return Ok(());
    }

    let output_file = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_name(&invoice));

    let sink = render_pdf(&invoice, &args.size, &config)?;
    let pages = sink.page_count();
    sink.save_to_file(&output_file)?;

    println!("✓ Generated: {}", output_file);
    println!("  Size: {}", args.size);
    println!("  Items: {}", invoice.items.len());
    println!("  Pages: {}", pages);

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn default_output_name(invoice: &Invoice) -> String {
    let number = invoice
        .invoice_number
        .as_deref()
        .unwrap_or("draft")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect::<String>();
    format!("invoice-{}-{}.pdf", number, Local::now().format("%Y-%m-%d"))
}
