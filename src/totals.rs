//! Invoice arithmetic.
//!
//! Four computations live here and they do not agree with each other:
//!
//! * [`RowFigures`] applies the per-unit discount before tax.
//! * [`total_row`] (the table footer) taxes the undiscounted rate and
//!   subtracts the discount once per line, not per unit.
//! * [`summary_totals`] (the totals block) repeats the footer formula.
//! * [`group_by_tax_rate`] ignores discounts entirely.
//!
//! Which of these is authoritative is an open product question, so each is
//! kept exactly as the printed invoice has always shown it.

use crate::format::format_rate;
use crate::model::LineItem;

/// Per-row figures printed in the line-item table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowFigures {
    /// Unit price after the per-unit discount.
    pub taxable_amount: f64,
    pub tax_amount: f64,
    pub amount: f64,
}

impl RowFigures {
    pub fn for_item(item: &LineItem) -> Self {
        let taxable_amount = item.rate_item - item.discount;
        let tax_amount = item.qty * taxable_amount * (item.tax / 100.0);
        let amount = item.qty * taxable_amount + tax_amount;
        RowFigures {
            taxable_amount,
            tax_amount,
            amount,
        }
    }
}

/// Column sums shown in the table's Total row and in the summary block.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColumnTotals {
    pub qty: f64,
    pub discount: f64,
    pub tax_amount: f64,
    pub amount: f64,
}

/// Footer row of the line-item table.
pub fn total_row(items: &[LineItem]) -> ColumnTotals {
    items.iter().fold(ColumnTotals::default(), |acc, item| {
        let gross = item.qty * item.rate_item;
        let tax = gross * (item.tax / 100.0);
        ColumnTotals {
            qty: acc.qty + item.qty,
            discount: acc.discount + item.discount,
            tax_amount: acc.tax_amount + tax,
            amount: acc.amount + (gross + tax - item.discount),
        }
    })
}

/// Figures behind the totals summary block.
pub fn summary_totals(items: &[LineItem]) -> ColumnTotals {
    let mut totals = ColumnTotals::default();
    for item in items {
        totals.qty += item.qty;
        totals.discount += item.discount;
        totals.tax_amount += item.qty * item.rate_item * (item.tax / 100.0);
        totals.amount += item.qty * item.rate_item
            + item.qty * item.rate_item * (item.tax / 100.0)
            - item.discount;
    }
    totals
}

// ============================================================================
// Tax Breakdown
// ============================================================================

/// Items sharing one tax rate, split into equal CGST and SGST halves.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxGroup {
    /// The rate as printed, two decimals. Items group on this exact text.
    pub rate_key: String,
    pub rate: f64,
    /// Distinct HSN/SAC codes, first-seen order.
    pub hsn_codes: Vec<String>,
    pub taxable_amount: f64,
    pub cgst_amount: f64,
    pub sgst_amount: f64,
}

impl TaxGroup {
    pub fn total_tax(&self) -> f64 {
        self.cgst_amount + self.sgst_amount
    }
}

/// Sums across all tax groups, for the breakdown table's last row.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TaxTotals {
    pub taxable_amount: f64,
    pub cgst_amount: f64,
    pub sgst_amount: f64,
    pub tax_amount: f64,
}

/// Group items by tax rate in first-seen order.
pub fn group_by_tax_rate(items: &[LineItem]) -> Vec<TaxGroup> {
    let mut groups: Vec<TaxGroup> = Vec::new();
    for item in items {
        let rate_key = format_rate(item.tax);
        let index = match groups.iter().position(|g| g.rate_key == rate_key) {
            Some(index) => index,
            None => {
                groups.push(TaxGroup {
                    rate_key,
                    rate: item.tax,
                    hsn_codes: Vec::new(),
                    taxable_amount: 0.0,
                    cgst_amount: 0.0,
                    sgst_amount: 0.0,
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[index];

        let code = if item.hsn_sac.trim().is_empty() {
            "N/A".to_string()
        } else {
            item.hsn_sac.clone()
        };
        if !group.hsn_codes.contains(&code) {
            group.hsn_codes.push(code);
        }

        let taxable_amount = item.qty * item.rate_item;
        let half_tax = taxable_amount * (item.tax / 2.0) / 100.0;
        group.taxable_amount += taxable_amount;
        group.cgst_amount += half_tax;
        group.sgst_amount += half_tax;
    }
    groups
}

pub fn tax_totals(groups: &[TaxGroup]) -> TaxTotals {
    groups.iter().fold(TaxTotals::default(), |acc, g| TaxTotals {
        taxable_amount: acc.taxable_amount + g.taxable_amount,
        cgst_amount: acc.cgst_amount + g.cgst_amount,
        sgst_amount: acc.sgst_amount + g.sgst_amount,
        tax_amount: acc.tax_amount + g.total_tax(),
    })
}
