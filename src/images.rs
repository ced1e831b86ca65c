use std::io::Read;

use ::image::{DynamicImage, Luma, Rgba, RgbImage};
use log::info;
use qrcode::QrCode;
use serde::Serialize;

use crate::error::InvoiceError;

/// A decoded raster image ready for placement on a page.
#[derive(Debug, Clone)]
pub struct RasterImage {
    image: DynamicImage,
}

impl RasterImage {
    pub fn from_dynamic(image: DynamicImage) -> Self {
        RasterImage { image }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, InvoiceError> {
        let image = ::image::load_from_memory(bytes)
            .map_err(|e| InvoiceError::Logo(format!("Failed to decode image: {}", e)))?;
        Ok(RasterImage { image })
    }

    /// Load from a file path or an http(s) URL.
    pub fn load(source: &str) -> Result<Self, InvoiceError> {
        let image_bytes = if source.starts_with("http://") || source.starts_with("https://") {
            let response = ureq::get(source)
                .call()
                .map_err(|e| InvoiceError::Logo(format!("Failed to fetch URL: {}", e)))?;

            let mut bytes = Vec::new();
            response
                .into_reader()
                .read_to_end(&mut bytes)
                .map_err(|e| InvoiceError::Logo(format!("Failed to read response: {}", e)))?;
            bytes
        } else {
            std::fs::read(source).map_err(|e| InvoiceError::Logo(format!("{}: {}", source, e)))?
        };

        let image = Self::from_bytes(&image_bytes)?;
        info!(
            "Loaded logo {} ({}x{} px)",
            source,
            image.width_px(),
            image.height_px()
        );
        Ok(image)
    }

    pub fn width_px(&self) -> u32 {
        self.image.width()
    }

    pub fn height_px(&self) -> u32 {
        self.image.height()
    }

    /// Height for a given display width, preserving aspect ratio.
    pub fn height_for_width(&self, width: f32) -> f32 {
        if self.width_px() == 0 {
            return 0.0;
        }
        width * self.height_px() as f32 / self.width_px() as f32
    }

    /// RGB pixels with transparency flattened against white.
    pub fn rgb_on_white(&self) -> RgbImage {
        let rgba_image = self.image.to_rgba8();
        let (width_px, height_px) = rgba_image.dimensions();

        let mut rgb_image = RgbImage::new(width_px, height_px);
        for (x, y, pixel) in rgba_image.enumerate_pixels() {
            let Rgba([r, g, b, a]) = *pixel;
            let alpha = a as f32 / 255.0;
            let bg = 255.0;
            let out_r = (r as f32 * alpha + bg * (1.0 - alpha)) as u8;
            let out_g = (g as f32 * alpha + bg * (1.0 - alpha)) as u8;
            let out_b = (b as f32 * alpha + bg * (1.0 - alpha)) as u8;
            rgb_image.put_pixel(x, y, ::image::Rgb([out_r, out_g, out_b]));
        }
        rgb_image
    }
}

// ============================================================================
// Payment QR Code
// ============================================================================

/// What a phone banking app reads off the printed invoice.
#[derive(Debug, Serialize)]
pub struct PaymentPayload {
    pub invoice: String,
    pub amount: String,
    pub account_number: String,
    pub ifsc: String,
}

pub fn payment_qr(payload: &PaymentPayload) -> Result<RasterImage, InvoiceError> {
    let json = serde_json::to_string(payload).map_err(|e| InvoiceError::Qr(e.to_string()))?;

    let code = QrCode::new(json.as_bytes()).map_err(|e| InvoiceError::Qr(e.to_string()))?;

    let image = code.render::<Luma<u8>>().build();
    Ok(RasterImage::from_dynamic(DynamicImage::ImageLuma8(image)))
}
