//! The line-item table.
//!
//! Row heights follow the item column only; every other body cell stays on
//! one line. Before each row the table checks for room and, after a page
//! break, repeats its header row.

use log::debug;

use crate::error::InvoiceError;
use crate::fonts::FontFace;
use crate::format::{format_currency, format_number};
use crate::model::LineItem;
use crate::sink::{Align, DocumentSink, TextStyle};
use crate::totals::{total_row, RowFigures};

use super::LayoutContext;

pub const COLUMN_COUNT: usize = 8;

const BASE_WIDTHS: [f32; COLUMN_COUNT] = [20.0, 135.0, 50.0, 45.0, 65.0, 40.0, 60.0, 100.0];
const WIDTH_ADJUSTMENTS: [f32; COLUMN_COUNT] = [0.0, 5.0, -5.0, 5.0, -6.0, 12.0, 32.0, -10.0];
/// Horizontal nudge of each divider from its column boundary.
const DIVIDER_NUDGES: [f32; COLUMN_COUNT - 1] = [-5.0, -4.0, 5.0, 5.0, 7.0, 5.0, 1.0];
const ALIGNMENTS: [Align; COLUMN_COUNT] = [
    Align::Left,
    Align::Left,
    Align::Left,
    Align::Right,
    Align::Right,
    Align::Right,
    Align::Right,
    Align::Right,
];
const HEADER_LABELS: [&str; COLUMN_COUNT] = [
    "#",
    "Item",
    "HSN/SAC",
    "Qty",
    "Rate/Item (₹)",
    "Discount (₹)",
    "Tax Amount (₹)",
    "Amount",
];

const TABLE_X: f32 = 36.0;
/// Left plus right inset of the printable table width.
const TABLE_INSETS: f32 = 72.0;
const TOP_GAP: f32 = 5.0;

/// Small enough that "HSN/SAC" never breaks mid-word on A4.
const HEADER_SIZE: f32 = 8.0;
const BODY_SIZE: f32 = 9.0;
const MIN_ROW_HEIGHT: f32 = 20.0;
const ITEM_LINE_HEIGHT: f32 = 12.0;
const ROW_PADDING: f32 = 8.0;
const ROW_GAP: f32 = 5.0;
const TOTAL_ROW_TRIM: f32 = 8.0;
const TEXT_INSET: f32 = 2.0;
const DIVIDER_RISE: f32 = 4.0;
const HEADER_DIVIDER_EXTRA: f32 = 5.0;
const HEADER_RULE: f32 = 25.0;
const HEADER_ADVANCE: f32 = 30.0;
const TOTAL_RULE: f32 = 20.0;

const ROW_RESERVE: f32 = 30.0;
const CONTINUED_HEADER_Y: f32 = 44.0;
const TOTAL_RESERVE: f32 = 100.0;
const TOTAL_HEADER_Y: f32 = 50.0;

// ============================================================================
// Column Model
// ============================================================================

/// Shrink `widths` proportionally when their sum exceeds `allowed`. Widths
/// are never grown. Returns whether anything changed.
pub fn fit_columns(widths: &mut [f32], allowed: f32) -> bool {
    let total: f32 = widths.iter().sum();
    if total <= allowed || total <= 0.0 {
        return false;
    }
    let ratio = allowed / total;
    for width in widths.iter_mut() {
        *width *= ratio;
    }
    true
}

/// Scaled and fitted column widths for one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnLayout {
    pub x: f32,
    pub widths: [f32; COLUMN_COUNT],
    scale: f32,
}

impl ColumnLayout {
    pub fn new(scale: f32, page_width: f32) -> Self {
        let mut widths = [0.0; COLUMN_COUNT];
        for (i, width) in widths.iter_mut().enumerate() {
            *width = (BASE_WIDTHS[i] + WIDTH_ADJUSTMENTS[i]) * scale;
        }
        let allowed = page_width - TABLE_INSETS * scale;
        if fit_columns(&mut widths, allowed) {
            debug!("Item columns shrunk to fit {:.1}pt", allowed);
        }
        ColumnLayout {
            x: TABLE_X * scale,
            widths,
            scale,
        }
    }

    /// Left edge of column `index`.
    pub fn start(&self, index: usize) -> f32 {
        self.x + self.widths[..index].iter().sum::<f32>()
    }

    /// Divider x positions after each column but the last.
    pub fn dividers(&self) -> [f32; COLUMN_COUNT - 1] {
        let mut dividers = [0.0; COLUMN_COUNT - 1];
        for (i, divider) in dividers.iter_mut().enumerate() {
            *divider = self.start(i + 1) + DIVIDER_NUDGES[i] * self.scale;
        }
        dividers
    }
}

// ============================================================================
// Rows
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowKind {
    Header,
    Body,
    Total,
}

impl RowKind {
    fn face(self) -> FontFace {
        match self {
            RowKind::Header => FontFace::Medium,
            RowKind::Body | RowKind::Total => FontFace::Regular,
        }
    }

    fn size(self) -> f32 {
        match self {
            RowKind::Header => HEADER_SIZE,
            RowKind::Body | RowKind::Total => BODY_SIZE,
        }
    }
}

fn body_cells(index: usize, item: &LineItem) -> [String; COLUMN_COUNT] {
    let figures = RowFigures::for_item(item);
    [
        (index + 1).to_string(),
        item.item.clone(),
        item.hsn_sac.clone(),
        format_number(item.qty),
        format_currency(item.rate_item),
        format_currency(item.discount),
        format!(
            "{} ({}%)",
            format_currency(figures.tax_amount),
            format_number(item.tax)
        ),
        format_currency(figures.amount),
    ]
}

fn total_cells(items: &[LineItem]) -> [String; COLUMN_COUNT] {
    let totals = total_row(items);
    [
        String::new(),
        "Total".to_string(),
        String::new(),
        format_number(totals.qty),
        String::new(),
        format_currency(totals.discount),
        format_currency(totals.tax_amount),
        format_currency(totals.amount),
    ]
}

fn row_height<S: DocumentSink>(
    ctx: &LayoutContext<'_, S>,
    columns: &ColumnLayout,
    cells: &[String; COLUMN_COUNT],
    kind: RowKind,
) -> f32 {
    let size = ctx.s(kind.size());
    let lines = match kind {
        RowKind::Header => cells
            .iter()
            .zip(columns.widths.iter())
            .map(|(cell, width)| ctx.sink.fonts().wrap(kind.face(), cell, size, *width).len())
            .max()
            .unwrap_or(1),
        _ => ctx
            .sink
            .fonts()
            .wrap(kind.face(), &cells[1], size, columns.widths[1])
            .len(),
    };
    let height = ctx.s(MIN_ROW_HEIGHT).max(lines as f32 * ctx.s(ITEM_LINE_HEIGHT));
    match kind {
        RowKind::Total => height - ctx.s(TOTAL_ROW_TRIM),
        _ => height,
    }
}

/// Draw one row with its dividers at `y`; returns the row height.
fn draw_row<S: DocumentSink>(
    ctx: &mut LayoutContext<'_, S>,
    columns: &ColumnLayout,
    y: f32,
    cells: &[String; COLUMN_COUNT],
    kind: RowKind,
) -> f32 {
    let height = row_height(ctx, columns, cells, kind);
    let size = ctx.s(kind.size());

    for (i, cell) in cells.iter().enumerate() {
        let mut style = TextStyle::new(kind.face(), size)
            .width(columns.widths[i])
            .align(ALIGNMENTS[i]);
        if kind != RowKind::Header && i != 1 {
            style = style.ellipsis();
        }
        ctx.text(cell, columns.start(i), y + ctx.s(TEXT_INSET), &style);
    }

    let mut bottom = y + height + ctx.s(ROW_PADDING);
    if kind == RowKind::Header {
        bottom += ctx.s(HEADER_DIVIDER_EXTRA);
    }
    let top = y - ctx.s(DIVIDER_RISE);
    for x in columns.dividers() {
        ctx.line(x, top, x, bottom);
    }
    height
}

/// Header row at `y`; returns where the first body row starts.
fn draw_header_row<S: DocumentSink>(
    ctx: &mut LayoutContext<'_, S>,
    columns: &ColumnLayout,
    y: f32,
) -> f32 {
    let labels = HEADER_LABELS.map(str::to_string);
    draw_row(ctx, columns, y, &labels, RowKind::Header);
    ctx.rule(y + ctx.s(HEADER_RULE));
    y + ctx.s(HEADER_ADVANCE)
}

// ============================================================================
// Table
// ============================================================================

pub(super) fn draw_item_table<S: DocumentSink>(
    ctx: &mut LayoutContext<'_, S>,
    items: &[LineItem],
) -> Result<(), InvoiceError> {
    let columns = ColumnLayout::new(ctx.geometry.scale, ctx.geometry.width);

    let start = ctx.y - ctx.s(TOP_GAP);
    let mut y = draw_header_row(ctx, &columns, start);

    for (index, item) in items.iter().enumerate() {
        let cells = body_cells(index, item);
        let advance = row_height(ctx, &columns, &cells, RowKind::Body) + ctx.s(ROW_PADDING);

        ctx.y = y;
        if ctx.ensure_space(advance, ctx.s(ROW_RESERVE), ctx.s(CONTINUED_HEADER_Y))? {
            let resume = ctx.y;
            y = draw_header_row(ctx, &columns, resume);
        }

        let height = draw_row(ctx, &columns, y, &cells, RowKind::Body);
        let rule_y = y + height + ctx.s(ROW_PADDING);
        ctx.rule(rule_y);
        y = rule_y + ctx.s(ROW_GAP);
    }

    let cells = total_cells(items);
    let advance = row_height(ctx, &columns, &cells, RowKind::Total) + ctx.s(ROW_PADDING);
    ctx.y = y;
    if ctx.ensure_space(advance, ctx.s(TOTAL_RESERVE), ctx.s(TOTAL_HEADER_Y))? {
        let resume = ctx.y;
        y = draw_header_row(ctx, &columns, resume);
    }
    draw_row(ctx, &columns, y, &cells, RowKind::Total);
    let rule_y = y + ctx.s(TOTAL_RULE);
    ctx.rule(rule_y);
    ctx.y = rule_y;
    Ok(())
}
