use crate::error::InvoiceError;
use crate::fonts::FontFace;
use crate::format::{amount_in_words, format_currency};
use crate::model::LineItem;
use crate::sink::{Align, DocumentSink, TextStyle};
use crate::totals::summary_totals;

use super::LayoutContext;

const BLOCK_X: f32 = 36.0;
const GRID_OFFSET: f32 = 265.0;
const ROW_PITCH: f32 = 18.0;
const LABEL_OFFSET: f32 = 270.0;
const LABEL_RISE: f32 = 3.0;
const VALUE_OFFSET: f32 = 460.0;
const VALUE_WIDTH: f32 = 64.0;
const TEXT_SIZE: f32 = 10.0;

const WORDS_LABEL_Y: f32 = 21.0;
const WORDS_Y: f32 = 36.0;
const WORDS_WIDTH: f32 = 250.0;
const WORDS_PAD: f32 = 6.0;

const MIN_BLOCK_HEIGHT: f32 = 91.0;
const RESERVE: f32 = 40.0;

const LABELS: [&str; 5] = [
    "Shipping Cost",
    "Additional Discount",
    "Payable Amount",
    "Received Amount",
    "Balance Due",
];

/// Amount in words on the left, the five-row totals grid on the right.
pub(super) fn draw_summary<S: DocumentSink>(
    ctx: &mut LayoutContext<'_, S>,
    items: &[LineItem],
) -> Result<(), InvoiceError> {
    let totals = summary_totals(items);
    let placeholders = &ctx.config.summary;
    let values = [
        format_currency(placeholders.shipping_cost),
        format_currency(totals.discount),
        format_currency(totals.amount),
        format_currency(placeholders.received_amount),
        format_currency(placeholders.balance_due),
    ];
    let words = amount_in_words(totals.amount);

    let size = ctx.s(TEXT_SIZE);
    let words_height = ctx
        .sink
        .height_of_string(&words, ctx.s(WORDS_WIDTH), FontFace::Regular, size);
    let block_height = ctx
        .s(MIN_BLOCK_HEIGHT)
        .max(ctx.s(WORDS_Y) + words_height + ctx.s(WORDS_PAD));

    let top_margin = ctx.geometry.top_margin;
    ctx.ensure_space(block_height, ctx.s(RESERVE), top_margin)?;
    let top = ctx.y;
    let x = ctx.s(BLOCK_X);

    ctx.text(
        "Amount in Words:",
        x,
        top + ctx.s(WORDS_LABEL_Y),
        &TextStyle::new(FontFace::Bold, size),
    );
    ctx.text(
        &words,
        x,
        top + ctx.s(WORDS_Y),
        &TextStyle::new(FontFace::Regular, size).width(ctx.s(WORDS_WIDTH)),
    );

    let label_style = TextStyle::new(FontFace::Regular, size);
    let value_style = TextStyle::new(FontFace::Regular, size)
        .width(ctx.s(VALUE_WIDTH))
        .align(Align::Right)
        .ellipsis();
    for (row, (label, value)) in LABELS.iter().zip(values.iter()).enumerate() {
        let row_y = top + ctx.s(LABEL_RISE) + row as f32 * ctx.s(ROW_PITCH);
        ctx.text(label, x + ctx.s(LABEL_OFFSET), row_y, &label_style);
        ctx.text(value, x + ctx.s(VALUE_OFFSET), row_y, &value_style);
    }

    let grid_x = x + ctx.s(GRID_OFFSET);
    let right = ctx.geometry.right();
    let bottom = top + block_height;
    ctx.line(grid_x, top, grid_x, bottom);
    for row in 1..LABELS.len() {
        let y = top + row as f32 * ctx.s(ROW_PITCH);
        ctx.line(grid_x, y, right, y);
    }
    ctx.rule(bottom);
    ctx.y = bottom;
    Ok(())
}
