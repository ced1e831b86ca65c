use crate::error::InvoiceError;
use crate::fonts::FontFace;
use crate::model::Invoice;
use crate::sink::{DocumentSink, TextStyle};

use super::LayoutContext;

const LOGO_X: f32 = 36.0;
const LOGO_Y: f32 = 46.0;
const LOGO_WIDTH: f32 = 70.0;

const HEADER_X: f32 = 110.0;
const HEADER_Y: f32 = 50.0;
const NAME_RISE: f32 = 7.0;
const NAME_SIZE: f32 = 10.0;
const NAME_WIDTH: f32 = 184.0;

const FIELD_TOP: f32 = 4.0;
const FIELD_SIZE: f32 = 8.0;
const FIELD_WIDTH: f32 = 200.0;
/// Unscaled gap between stacked fields.
const FIELD_GAP: f32 = 2.0;
const STACK_PAD: f32 = 10.0;

/// Metadata grid, relative to the header origin.
const GRID_OFFSET_X: f32 = 190.0;
const GRID_RISE: f32 = 9.0;
const GRID_WIDTH: f32 = 266.0;
const GRID_MIDDLE: f32 = 132.0;
const GRID_ROWS: [f32; 3] = [18.0, 36.0, 70.0];
const GRID_SIZE: f32 = 10.0;
const CELL_INSET: f32 = 8.0;
const LABEL_GAP: f32 = 3.0;

/// One cell of the metadata grid.
struct GridCell<'a> {
    label: &'a str,
    value: String,
    /// Column offset of the label from the grid's left edge.
    x: f32,
    label_y: f32,
    value_y: f32,
    /// Where the value starts unless the label runs past it.
    value_x: f32,
}

/// Logo, company identity and the invoice metadata grid.
pub(super) fn draw_header<S: DocumentSink>(
    ctx: &mut LayoutContext<'_, S>,
    invoice: &Invoice,
) -> Result<(), InvoiceError> {
    if let Some(logo) = ctx.assets.logo.as_ref() {
        let (x, y, width) = (ctx.s(LOGO_X), ctx.s(LOGO_Y), ctx.s(LOGO_WIDTH));
        ctx.sink.place_image(logo, x, y, width)?;
    }

    let header_x = ctx.s(HEADER_X);
    let header_y = ctx.s(HEADER_Y);

    let name = ctx.field(&invoice.company_name).to_string();
    let name_style = TextStyle::new(FontFace::Medium, ctx.s(NAME_SIZE))
        .width(ctx.s(NAME_WIDTH))
        .ellipsis();
    ctx.text(&name, header_x, header_y - ctx.s(NAME_RISE), &name_style);

    let fields = [
        format!("Website: {}", ctx.field(&invoice.company_website)),
        format!("Email: {}", ctx.field(&invoice.company_email)),
        format!("Address: {}", ctx.field(&invoice.company_address)),
        format!("GST No: {}", ctx.field(&invoice.gstin)),
        format!("Phone: {}", ctx.field(&invoice.company_phone)),
    ];
    let field_style = TextStyle::new(FontFace::Regular, ctx.s(FIELD_SIZE)).width(ctx.s(FIELD_WIDTH));
    let mut current_y = header_y + ctx.s(FIELD_TOP);
    for field in &fields {
        let height = ctx.text(field, header_x, current_y, &field_style);
        current_y += height + FIELD_GAP;
    }
    let stack_end = current_y + ctx.s(STACK_PAD);

    let grid_x = header_x + ctx.s(GRID_OFFSET_X);
    let grid_y = header_y - ctx.s(GRID_RISE);
    draw_metadata_grid(ctx, invoice, grid_x, grid_y);

    let rule_y = stack_end.max(grid_y + ctx.s(GRID_ROWS[2]));
    ctx.line(grid_x, grid_y, grid_x, rule_y);
    ctx.rule(rule_y);
    ctx.y = rule_y;
    Ok(())
}

fn draw_metadata_grid<S: DocumentSink>(
    ctx: &mut LayoutContext<'_, S>,
    invoice: &Invoice,
    grid_x: f32,
    grid_y: f32,
) {
    let invoice_number = match invoice.invoice_number.as_deref() {
        Some(number) => format!("INV-{}", number),
        None => ctx.config.placeholder.clone(),
    };
    let cells = [
        GridCell {
            label: "Invoice #:",
            value: invoice_number,
            x: CELL_INSET,
            label_y: 3.0,
            value_y: 4.0,
            value_x: 54.0,
        },
        GridCell {
            label: "Invoice Date:",
            value: ctx.field(&invoice.issue_date).to_string(),
            x: GRID_MIDDLE + 6.0,
            label_y: 3.0,
            value_y: 4.0,
            value_x: 200.0,
        },
        GridCell {
            label: "Supply Place:",
            value: ctx.field(&invoice.supply_place).to_string(),
            x: CELL_INSET,
            label_y: 22.0,
            value_y: 22.0,
            value_x: 70.0,
        },
        GridCell {
            label: "Due Date:",
            value: ctx.field(&invoice.due_date).to_string(),
            x: GRID_MIDDLE + 6.0,
            label_y: 22.0,
            value_y: 22.0,
            value_x: 185.0,
        },
        GridCell {
            label: "E-way Bill #:",
            value: ctx.field(&invoice.ewaybill_no).to_string(),
            x: CELL_INSET,
            label_y: 42.0,
            value_y: 56.0,
            value_x: CELL_INSET,
        },
        GridCell {
            label: "Vehicle Number:",
            value: ctx.field(&invoice.vehicle_no).to_string(),
            x: GRID_MIDDLE + 6.0,
            label_y: 42.0,
            value_y: 56.0,
            value_x: GRID_MIDDLE + 6.0,
        },
    ];

    let size = ctx.s(GRID_SIZE);
    let label_style = TextStyle::new(FontFace::Bold, size);
    for cell in &cells {
        let label_x = grid_x + ctx.s(cell.x);
        let label_y = grid_y + ctx.s(cell.label_y);
        ctx.text(cell.label, label_x, label_y, &label_style);

        let value_y = grid_y + ctx.s(cell.value_y);
        let mut value_x = grid_x + ctx.s(cell.value_x);
        if (cell.value_y - cell.label_y).abs() < 2.0 {
            // Same line as the label: never start inside it.
            let label_end = label_x + ctx.sink.width_of_string(cell.label, FontFace::Bold, size);
            value_x = value_x.max(label_end + ctx.s(LABEL_GAP));
        }
        let cell_right = if cell.x < GRID_MIDDLE {
            grid_x + ctx.s(GRID_MIDDLE)
        } else {
            grid_x + ctx.s(GRID_WIDTH)
        };
        let value_style = TextStyle::new(FontFace::Regular, size)
            .width((cell_right - value_x - ctx.s(LABEL_GAP)).max(0.0))
            .ellipsis();
        ctx.text(&cell.value, value_x, value_y, &value_style);
    }

    let middle_x = grid_x + ctx.s(GRID_MIDDLE);
    let grid_right = grid_x + ctx.s(GRID_WIDTH);
    let grid_bottom = grid_y + ctx.s(GRID_ROWS[2]);
    ctx.line(middle_x, grid_y, middle_x, grid_bottom);
    for row in GRID_ROWS {
        let y = grid_y + ctx.s(row);
        ctx.line(grid_x, y, grid_right, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::layout::RenderAssets;
    use crate::sink::RecordingSink;

    fn header_texts(invoice: &Invoice) -> Vec<String> {
        let mut sink = RecordingSink::new("A4");
        let config = RenderConfig::default();
        let assets = RenderAssets::default();
        let mut ctx = LayoutContext::new(&mut sink, 1.0, &config, &assets);
        draw_header(&mut ctx, invoice).unwrap();
        assert!(ctx.y > 100.0);
        sink.texts_on(0).into_iter().map(str::to_string).collect()
    }

    #[test]
    fn prints_prefixed_invoice_number() {
        let texts = header_texts(&Invoice::sample());
        assert!(texts.iter().any(|t| t.starts_with("INV-")));
        assert!(texts.contains(&"Vehicle Number:".to_string()));
    }

    #[test]
    fn empty_invoice_still_draws_labels() {
        let texts = header_texts(&Invoice::default());
        assert!(texts.contains(&"Website:".to_string()));
        assert!(texts.contains(&"Invoice #:".to_string()));
        assert!(!texts.iter().any(|t| t.starts_with("INV-")));
    }
}
