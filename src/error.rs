use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvoiceError {
    #[error("Failed to create PDF: {0}")]
    Pdf(String),
    #[error("Failed to read invoice: {0}")]
    Invoice(String),
    #[error("Failed to read config: {0}")]
    Config(String),
    #[error("Failed to load logo: {0}")]
    Logo(String),
    #[error("Failed to load font: {0}")]
    Font(String),
    #[error("Failed to generate QR code: {0}")]
    Qr(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
