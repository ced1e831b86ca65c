use crate::error::InvoiceError;
use crate::fonts::FontFace;
use crate::format::format_currency;
use crate::images::{payment_qr, PaymentPayload};
use crate::model::Invoice;
use crate::sink::{DocumentSink, TextStyle};
use crate::totals::summary_totals;

use super::LayoutContext;

const BLOCK_X: f32 = 36.0;
const TOP_PAD: f32 = 10.0;
const BLOCK_HEIGHT: f32 = 95.0;
const RESERVE: f32 = 40.0;
const TEXT_SIZE: f32 = 10.0;
const FIRST_FIELD: f32 = 20.0;
const FIELD_PITCH: f32 = 15.0;
const TEXT_GAP: f32 = 8.0;

const DIVIDER_X: f32 = 400.0;
const DIVIDER_RISE: f32 = 6.0;
const SIGNATURE_X: f32 = 420.0;
const SIGNATURE_LOGO_DX: f32 = 35.0;
const SIGNATURE_LOGO_DY: f32 = 15.0;
const SIGNATURE_LOGO_WIDTH: f32 = 50.0;
/// Tallest the signature logo may be before it would cover the label.
const SIGNATURE_LOGO_MAX_HEIGHT: f32 = 60.0;
const SIGNATURE_LABEL_DX: f32 = 15.0;
const SIGNATURE_LABEL_DY: f32 = 78.0;

const QR_SIZE: f32 = 80.0;
const QR_TOP: f32 = 5.0;

/// Bank account details, the optional payment QR code and the signature box.
pub(super) fn draw_bank_details<S: DocumentSink>(
    ctx: &mut LayoutContext<'_, S>,
    invoice: &Invoice,
) -> Result<(), InvoiceError> {
    let top_margin = ctx.geometry.top_margin;
    ctx.ensure_space(ctx.s(TOP_PAD + BLOCK_HEIGHT), ctx.s(RESERVE), top_margin)?;

    let x = ctx.s(BLOCK_X);
    let top = ctx.y + ctx.s(TOP_PAD);
    let divider_x = ctx.s(DIVIDER_X);
    let size = ctx.s(TEXT_SIZE);

    let mut text_right = divider_x - ctx.s(TEXT_GAP);
    if ctx.config.payment_qr {
        let qr_x = divider_x - ctx.s(TEXT_GAP) - ctx.s(QR_SIZE);
        draw_payment_qr(ctx, invoice, qr_x, top + ctx.s(QR_TOP))?;
        text_right = qr_x - ctx.s(TEXT_GAP);
    }

    ctx.text(
        "Bank Details:",
        x,
        top,
        &TextStyle::new(FontFace::Bold, size),
    );
    let bank = &invoice.bank_details;
    let fields = [
        format!("Bank Name: {}", ctx.field(&bank.bank_name)),
        format!("Account Name: {}", ctx.field(&bank.account_name)),
        format!("Account Number: {}", ctx.field(&bank.account_number)),
        format!("IFSC Code: {}", ctx.field(&bank.ifsc_code)),
    ];
    let field_style = TextStyle::new(FontFace::Regular, size)
        .width((text_right - x).max(0.0))
        .ellipsis();
    for (i, field) in fields.iter().enumerate() {
        let y = top + ctx.s(FIRST_FIELD) + i as f32 * ctx.s(FIELD_PITCH);
        ctx.text(field, x, y, &field_style);
    }

    let signature_x = ctx.s(SIGNATURE_X);
    let company = format!("For {}", ctx.field(&invoice.company_name));
    let company_style = TextStyle::new(FontFace::Regular, size)
        .width((ctx.geometry.right() - signature_x - ctx.s(TEXT_GAP / 2.0)).max(0.0))
        .ellipsis();
    ctx.text(&company, signature_x, top, &company_style);

    if let Some(logo) = ctx.assets.logo.as_ref() {
        let mut width = ctx.s(SIGNATURE_LOGO_WIDTH);
        let max_height = ctx.s(SIGNATURE_LOGO_MAX_HEIGHT);
        if logo.height_for_width(width) > max_height {
            width *= max_height / logo.height_for_width(width);
        }
        let logo_x = signature_x + ctx.s(SIGNATURE_LOGO_DX);
        let logo_y = top + ctx.s(SIGNATURE_LOGO_DY);
        ctx.sink.place_image(logo, logo_x, logo_y, width)?;
    }

    ctx.text(
        "Authorized Signature:",
        signature_x + ctx.s(SIGNATURE_LABEL_DX),
        top + ctx.s(SIGNATURE_LABEL_DY),
        &TextStyle::new(FontFace::Bold, size),
    );

    let bottom = top + ctx.s(BLOCK_HEIGHT);
    ctx.line(divider_x, top - ctx.s(DIVIDER_RISE), divider_x, bottom);
    ctx.rule(bottom);
    ctx.y = bottom;
    Ok(())
}

fn draw_payment_qr<S: DocumentSink>(
    ctx: &mut LayoutContext<'_, S>,
    invoice: &Invoice,
    x: f32,
    y: f32,
) -> Result<(), InvoiceError> {
    let payload = PaymentPayload {
        invoice: invoice
            .invoice_number
            .as_deref()
            .map(|n| format!("INV-{}", n))
            .unwrap_or_default(),
        amount: format_currency(summary_totals(&invoice.items).amount),
        account_number: invoice.bank_details.account_number.clone().unwrap_or_default(),
        ifsc: invoice.bank_details.ifsc_code.clone().unwrap_or_default(),
    };
    let qr = payment_qr(&payload)?;
    let size = ctx.s(QR_SIZE);
    ctx.sink.place_image(&qr, x, y, size)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::layout::RenderAssets;
    use crate::sink::{DrawOp, RecordingSink};

    fn render(config: &RenderConfig, start_y: f32) -> RecordingSink {
        let mut sink = RecordingSink::new("A4");
        let assets = RenderAssets::default();
        let mut ctx = LayoutContext::new(&mut sink, 1.0, config, &assets);
        ctx.y = start_y;
        draw_bank_details(&mut ctx, &Invoice::sample()).unwrap();
        sink
    }

    fn images_on(sink: &RecordingSink, page: usize) -> usize {
        sink.pages()[page]
            .iter()
            .filter(|op| matches!(op, DrawOp::Image { .. }))
            .count()
    }

    #[test]
    fn lists_bank_fields_and_signature() {
        let sink = render(&RenderConfig::default(), 500.0);
        let texts = sink.texts_on(0);
        assert!(texts.contains(&"Bank Name: National Bank of India"));
        assert!(texts.contains(&"IFSC Code: NBIN0001234"));
        assert!(texts.contains(&"Authorized Signature:"));
        assert_eq!(images_on(&sink, 0), 0);
    }

    #[test]
    fn payment_qr_is_drawn_when_enabled() {
        let config = RenderConfig {
            payment_qr: true,
            ..RenderConfig::default()
        };
        let sink = render(&config, 500.0);
        assert_eq!(images_on(&sink, 0), 1);
    }

    #[test]
    fn block_moves_to_new_page_when_short_of_room() {
        let sink = render(&RenderConfig::default(), 720.0);
        assert_eq!(sink.page_count(), 2);
        assert!(sink.texts_on(1).contains(&"Bank Details:"));
    }
}
