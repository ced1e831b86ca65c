use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::InvoiceError;
use crate::fonts::FontFace;

/// Render settings, read from a TOML file. Every field has a default, so an
/// empty file (or no file) renders exactly like the stock invoice.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Printed for optional invoice fields that are absent.
    pub placeholder: String,
    /// Draw a payment QR code next to the bank details.
    pub payment_qr: bool,
    /// Logo file path or http(s) URL.
    pub logo: Option<String>,
    pub summary: SummaryPlaceholders,
    pub fonts: FontConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            placeholder: String::new(),
            payment_qr: false,
            logo: None,
            summary: SummaryPlaceholders::default(),
            fonts: FontConfig::default(),
        }
    }
}

/// Fixed figures in the totals summary block.
///
/// TODO: read these from the invoice record (`paidToDate`, `balance`, and a
/// shipping charge field the invoice API does not have yet) once billing
/// stores them.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SummaryPlaceholders {
    pub shipping_cost: f64,
    pub received_amount: f64,
    pub balance_due: f64,
}

impl Default for SummaryPlaceholders {
    fn default() -> Self {
        SummaryPlaceholders {
            shipping_cost: 500.0,
            received_amount: 40.0,
            balance_due: 10000.0,
        }
    }
}

/// TrueType files for each face. Unset faces use the standard PDF fonts.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    pub regular: Option<PathBuf>,
    pub bold: Option<PathBuf>,
    pub medium: Option<PathBuf>,
}

impl FontConfig {
    pub fn path_for(&self, face: FontFace) -> Option<&Path> {
        match face {
            FontFace::Regular => self.regular.as_deref(),
            FontFace::Bold => self.bold.as_deref(),
            FontFace::Medium => self.medium.as_deref(),
        }
    }
}

impl RenderConfig {
    pub fn from_toml(content: &str) -> Result<Self, InvoiceError> {
        toml::from_str(content).map_err(|e| InvoiceError::Config(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, InvoiceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| InvoiceError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = RenderConfig::from_toml("").unwrap();
        assert_eq!(config, RenderConfig::default());
        assert_eq!(config.summary.shipping_cost, 500.0);
        assert_eq!(config.summary.received_amount, 40.0);
        assert_eq!(config.summary.balance_due, 10000.0);
    }

    #[test]
    fn overrides_are_read() {
        let config = RenderConfig::from_toml(
            r#"
placeholder = "-"
payment_qr = true
logo = "public/logo.png"

[summary]
shipping_cost = 0.0

[fonts]
bold = "fonts/Roboto-Bold.ttf"
"#,
        )
        .unwrap();
        assert_eq!(config.placeholder, "-");
        assert!(config.payment_qr);
        assert_eq!(config.logo.as_deref(), Some("public/logo.png"));
        assert_eq!(config.summary.shipping_cost, 0.0);
        assert_eq!(config.summary.balance_due, 10000.0);
        assert_eq!(
            config.fonts.path_for(FontFace::Bold),
            Some(Path::new("fonts/Roboto-Bold.ttf"))
        );
        assert!(config.fonts.path_for(FontFace::Regular).is_none());
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        assert!(matches!(
            RenderConfig::from_toml("summary = ["),
            Err(InvoiceError::Config(_))
        ));
    }
}
