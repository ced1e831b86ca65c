//! Tax breakdown grouped by rate, split into the central and state halves.

use crate::error::InvoiceError;
use crate::fonts::FontFace;
use crate::format::format_currency;
use crate::model::LineItem;
use crate::sink::{Align, DocumentSink, TextStyle};
use crate::totals::{group_by_tax_rate, tax_totals, TaxGroup};

use super::LayoutContext;

const COLUMN_WIDTHS: [f32; 7] = [80.0, 100.0, 60.0, 50.0, 60.0, 50.0, 130.0];
const TABLE_X: f32 = 36.0;
const TEXT_SIZE: f32 = 8.0;

const TOP_GAP: f32 = 10.0;
const SUBHEADER_GAP: f32 = 20.0;
const HEADER_RULE: f32 = 15.0;
const HEADER_ADVANCE: f32 = 20.0;
const DIVIDER_RISE: f32 = 5.0;
const ROW_PADDING: f32 = 5.0;
const TOTAL_ROW_HEIGHT: f32 = 20.0;

const HEADER_RESERVE: f32 = 60.0;
const ROW_RESERVE: f32 = 40.0;
const RESUME_GAP: f32 = 5.0;

const HEADERS: [&str; 5] = ["HSN/SAC", "Taxable Amount(₹)", "CGST", "SGST", "Total Tax Amount(₹)"];

/// Column spans of the top header labels.
const HEADER_SPANS: [(usize, usize); 5] = [(0, 1), (1, 2), (2, 4), (4, 6), (6, 7)];

const SUBHEADERS: [(usize, &str); 4] = [(2, "Rate"), (3, "Amount"), (4, "Rate"), (5, "Amount")];

struct TaxGrid {
    /// Column boundaries, one more than the column count.
    edges: [f32; 8],
}

impl TaxGrid {
    /// Scaled columns; the last one is clipped at `right_limit`.
    fn new(scale: f32, right_limit: f32) -> Self {
        let mut edges = [TABLE_X * scale; 8];
        for i in 0..COLUMN_WIDTHS.len() {
            edges[i + 1] = edges[i] + COLUMN_WIDTHS[i] * scale;
        }
        let last = COLUMN_WIDTHS.len();
        edges[last] = edges[last].min(right_limit);
        TaxGrid { edges }
    }

    fn span(&self, from: usize, to: usize) -> (f32, f32) {
        (self.edges[from], self.edges[to] - self.edges[from])
    }

    fn right(&self) -> f32 {
        self.edges[COLUMN_WIDTHS.len()]
    }
}

fn group_cells(group: &TaxGroup) -> [String; 7] {
    // Both heads print the group's full rate; only the amounts are split.
    let rate = format!("{}%", group.rate_key);
    [
        group.hsn_codes.join(", "),
        format_currency(group.taxable_amount),
        rate.clone(),
        format_currency(group.cgst_amount),
        rate,
        format_currency(group.sgst_amount),
        format_currency(group.total_tax()),
    ]
}

/// Two header lines and their grid; returns where the first row starts.
fn draw_tax_header<S: DocumentSink>(ctx: &mut LayoutContext<'_, S>, grid: &TaxGrid, y: f32) -> f32 {
    let size = ctx.s(TEXT_SIZE);
    for (label, (from, to)) in HEADERS.iter().zip(HEADER_SPANS.iter()) {
        let (x, width) = grid.span(*from, *to);
        let style = TextStyle::new(FontFace::Bold, size).width(width).align(Align::Center);
        ctx.text(label, x, y, &style);
    }

    let sub_y = y + ctx.s(SUBHEADER_GAP);
    for (column, label) in SUBHEADERS {
        let (x, width) = grid.span(column, column + 1);
        let style = TextStyle::new(FontFace::Regular, size).width(width).align(Align::Center);
        ctx.text(label, x, sub_y, &style);
    }

    let rise = ctx.s(DIVIDER_RISE);
    let rule_y = sub_y + ctx.s(HEADER_RULE);
    // Full-height dividers around the spanning headers.
    for edge in [1, 2, 4, 6] {
        let x = grid.edges[edge];
        ctx.line(x, y - rise, x, rule_y);
    }
    // Rate/amount splits under CGST and SGST.
    for edge in [3, 5] {
        let x = grid.edges[edge];
        ctx.line(x, sub_y - rise, x, rule_y);
    }
    ctx.line(grid.edges[2], sub_y - rise, grid.edges[6], sub_y - rise);
    ctx.line(ctx.geometry.left(), rule_y, grid.right(), rule_y);

    sub_y + ctx.s(HEADER_ADVANCE)
}

fn draw_tax_row<S: DocumentSink>(
    ctx: &mut LayoutContext<'_, S>,
    grid: &TaxGrid,
    y: f32,
    cells: &[String; 7],
    height: f32,
    face: FontFace,
) {
    let size = ctx.s(TEXT_SIZE);
    for (i, cell) in cells.iter().enumerate() {
        let (x, width) = grid.span(i, i + 1);
        let style = TextStyle::new(face, size).width(width).align(Align::Center);
        ctx.text(cell, x, y, &style);
    }
    let top = y - ctx.s(DIVIDER_RISE);
    for edge in 1..COLUMN_WIDTHS.len() {
        let x = grid.edges[edge];
        ctx.line(x, top, x, y + height);
    }
    ctx.line(ctx.geometry.left(), y + height, grid.right(), y + height);
}

/// Start a page when `height` does not fit; returns the row top, below a
/// repeated header when a page was started.
fn make_room<S: DocumentSink>(
    ctx: &mut LayoutContext<'_, S>,
    grid: &TaxGrid,
    y: f32,
    height: f32,
) -> Result<f32, InvoiceError> {
    ctx.y = y;
    let resume = ctx.geometry.top_margin + ctx.s(RESUME_GAP);
    if ctx.ensure_space(height, ctx.s(ROW_RESERVE), resume)? {
        let header_y = ctx.y;
        return Ok(draw_tax_header(ctx, grid, header_y));
    }
    Ok(y)
}

pub(super) fn draw_tax_breakdown<S: DocumentSink>(
    ctx: &mut LayoutContext<'_, S>,
    items: &[LineItem],
) -> Result<(), InvoiceError> {
    let groups = group_by_tax_rate(items);
    let totals = tax_totals(&groups);
    let grid = TaxGrid::new(ctx.geometry.scale, ctx.geometry.right());
    let size = ctx.s(TEXT_SIZE);

    ctx.y += ctx.s(TOP_GAP);
    let header_height = ctx.s(SUBHEADER_GAP + HEADER_ADVANCE + TOTAL_ROW_HEIGHT);
    let resume = ctx.geometry.top_margin + ctx.s(RESUME_GAP);
    ctx.ensure_space(header_height, ctx.s(HEADER_RESERVE), resume)?;
    let header_y = ctx.y;
    let mut y = draw_tax_header(ctx, &grid, header_y);

    for group in &groups {
        let cells = group_cells(group);
        let text_height = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let (_, width) = grid.span(i, i + 1);
                ctx.sink.height_of_string(cell, width, FontFace::Regular, size)
            })
            .fold(0.0, f32::max);
        let height = text_height + ctx.s(ROW_PADDING);

        y = make_room(ctx, &grid, y, height)?;
        draw_tax_row(ctx, &grid, y, &cells, height, FontFace::Regular);
        y += height + ctx.s(ROW_PADDING);
    }

    let total_cells = [
        "Total".to_string(),
        format_currency(totals.taxable_amount),
        String::new(),
        format_currency(totals.cgst_amount),
        String::new(),
        format_currency(totals.sgst_amount),
        format_currency(totals.tax_amount),
    ];
    let height = ctx.s(TOTAL_ROW_HEIGHT);
    y = make_room(ctx, &grid, y, height)?;
    draw_tax_row(ctx, &grid, y, &total_cells, height, FontFace::Bold);
    ctx.y = y + height;
    Ok(())
}
