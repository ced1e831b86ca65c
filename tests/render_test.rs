use invoice_pdf::fonts::FontFace;
use invoice_pdf::format::FALLBACK_AMOUNT;
use invoice_pdf::layout::{fit_columns, ColumnLayout};
use invoice_pdf::sink::DrawOp;
use invoice_pdf::{
    render, render_layout, render_pdf, DocumentSink, Invoice, LineItem, RecordingSink,
    RenderAssets, RenderConfig,
};

fn layout(invoice: &Invoice, paper: &str) -> RecordingSink {
    render_layout(invoice, paper, &RenderConfig::default()).expect("render failed")
}

fn with_items(items: Vec<LineItem>) -> Invoice {
    Invoice {
        items,
        ..Invoice::sample()
    }
}

fn border_on(sink: &RecordingSink, page: usize) -> Option<(f32, f32, f32, f32)> {
    sink.pages()[page].iter().find_map(|op| match op {
        DrawOp::Rect {
            x,
            y,
            width,
            height,
        } => Some((*x, *y, *width, *height)),
        _ => None,
    })
}

fn text_size(sink: &RecordingSink, wanted: &str) -> Option<f32> {
    sink.pages()[0].iter().find_map(|op| match op {
        DrawOp::Text { text, size, .. } if text == wanted => Some(*size),
        _ => None,
    })
}

#[test]
fn test_widget_row_figures() {
    let invoice = with_items(vec![LineItem::new("Widget", "8302", 2.0, 100.0, 10.0, 18.0)]);
    let sink = layout(&invoice, "A4");
    let texts = sink.texts_on(0);

    assert!(texts.contains(&"Widget"));
    assert!(texts.contains(&"32.40 (18%)"));
    assert!(texts.contains(&"212.40"));

    // Total row: qty, tax on the undiscounted rate, amount less one discount
    assert!(texts.contains(&"2"));
    assert!(texts.contains(&"36.00"));
    assert!(texts.contains(&"226.00"));
    assert!(texts.contains(&"two hundred twenty-six"));
}

#[test]
fn test_zero_items_draws_only_total_row() {
    let sink = layout(&with_items(Vec::new()), "A4");
    assert_eq!(sink.page_count(), 1);

    let texts = sink.texts_on(0);
    // item table footer plus tax table footer
    assert_eq!(texts.iter().filter(|t| **t == "Total").count(), 2);
    assert!(!texts.contains(&"1"));
    assert!(texts.contains(&"zero"));
}

#[test]
fn test_long_item_list_paginates() {
    let items: Vec<LineItem> = (1..=45)
        .map(|i| LineItem::new(&format!("Part {}", i), "8481", 1.0, 10.0 * i as f64, 0.0, 12.0))
        .collect();
    let sink = layout(&with_items(items), "A4");
    assert!(sink.page_count() >= 2, "expected a page break");

    for page in 0..sink.page_count() {
        let texts = sink.texts_on(page);
        assert!(border_on(&sink, page).is_some(), "page {} has no border", page);
        assert!(texts.contains(&"Tax Invoice"));
        assert!(texts.contains(&"ORIGINAL FOR RECIPIENT"));
        if texts.iter().any(|t| t.starts_with("Part ")) {
            assert!(texts.contains(&"Qty"), "page {} is missing the table header", page);
        }
    }

    let all: Vec<&str> = (0..sink.page_count()).flat_map(|p| sink.texts_on(p)).collect();
    for i in 1..=45 {
        let name = format!("Part {}", i);
        assert!(all.contains(&name.as_str()), "{} was dropped", name);
    }
}

#[test]
fn test_rows_stay_in_order() {
    let items: Vec<LineItem> = ["Alpha", "Bravo", "Charlie"]
        .iter()
        .map(|name| LineItem::new(name, "1", 1.0, 1.0, 0.0, 0.0))
        .collect();
    let sink = layout(&with_items(items), "A4");
    let texts = sink.texts_on(0);
    let position = |name: &str| texts.iter().position(|t| *t == name).unwrap();
    assert!(position("Alpha") < position("Bravo"));
    assert!(position("Bravo") < position("Charlie"));
}

#[test]
fn test_paper_sizes_scale_layout() {
    let invoice = Invoice::sample();
    let a3 = layout(&invoice, "A3");
    let a4 = layout(&invoice, "A4");
    let a5 = layout(&invoice, "A5");

    assert_eq!(a3.page_size(), (841.89, 1190.55));
    assert_eq!(text_size(&a3, "Tax Invoice"), Some(12.0 * 1.4));
    assert_eq!(text_size(&a4, "Tax Invoice"), Some(12.0));
    assert_eq!(text_size(&a5, "Tax Invoice"), Some(12.0 * 0.7));

    let (x, y, _, _) = border_on(&a5, 0).unwrap();
    assert!((x - 21.0).abs() < 1e-3);
    assert!((y - 28.0).abs() < 1e-3);
}

#[test]
fn test_unrecognized_sizes_use_a4_scale() {
    let invoice = Invoice::sample();

    let unknown = layout(&invoice, "B5");
    assert_eq!(unknown.page_size(), (595.28, 841.89));
    assert_eq!(text_size(&unknown, "Tax Invoice"), Some(12.0));

    // lowercase gets A3 paper but keeps the A4 scale
    let lowercase = layout(&invoice, "a3");
    assert_eq!(lowercase.page_size(), (841.89, 1190.55));
    assert_eq!(text_size(&lowercase, "Tax Invoice"), Some(12.0));
}

#[test]
fn test_tax_table_groups_by_rate() {
    let invoice = with_items(vec![
        LineItem::new("Pipe", "7306", 4.0, 250.0, 0.0, 18.0),
        LineItem::new("Elbow", "7307", 10.0, 40.0, 2.0, 18.0),
        LineItem::new("Cement", "2523", 1.0, 390.0, 0.0, 28.0),
    ]);
    let sink = layout(&invoice, "A4");
    let texts = sink.texts_on(0);

    assert!(texts.contains(&"7306, 7307"));
    assert!(texts.contains(&"2523"));
    assert!(texts.contains(&"18.00%"));
    assert!(texts.contains(&"28.00%"));
    // (1000 + 400) * 9%
    assert_eq!(texts.iter().filter(|t| **t == "126.00").count(), 2);
}

#[test]
fn test_non_numeric_amounts_print_fallback() {
    let invoice = Invoice::from_json(
        r#"{"items":[{"item":"Widget","hsnSac":1,"qty":2,"rateItem":"abc","discount":10,"tax":18}]}"#,
    )
    .expect("invoice should load");
    let sink = layout(&invoice, "A4");
    let all: Vec<&str> = (0..sink.page_count()).flat_map(|p| sink.texts_on(p)).collect();

    assert!(all.contains(&"Widget"));
    assert!(all.contains(&FALLBACK_AMOUNT));
    assert!(all.contains(&"10.00"));
    assert!(all.iter().all(|t| !t.contains("NaN")), "NaN was drawn");
}

#[test]
fn test_missing_fields_render() {
    let invoice = Invoice {
        items: vec![LineItem::new("Widget", "", 1.0, 1.0, 0.0, 0.0)],
        ..Invoice::default()
    };
    let config = RenderConfig {
        placeholder: "N/A".to_string(),
        ..RenderConfig::default()
    };
    let sink = render_layout(&invoice, "A4", &config).expect("render failed");
    let texts = sink.texts_on(0);
    assert!(texts.contains(&"Website: N/A"));
    assert!(texts.contains(&"Bank Name: N/A"));
}

#[test]
fn test_render_into_custom_sink() {
    let mut sink = RecordingSink::new("A4");
    let config = RenderConfig::default();
    render(
        &mut sink,
        &Invoice::sample(),
        "A4",
        &RenderAssets::default(),
        &config,
    )
    .expect("render failed");

    let faces: Vec<FontFace> = sink.pages()[0]
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { face, .. } => Some(*face),
            _ => None,
        })
        .collect();
    assert!(faces.contains(&FontFace::Regular));
    assert!(faces.contains(&FontFace::Medium));
    assert!(faces.contains(&FontFace::Bold));
}

#[test]
fn test_pdf_bytes() {
    let sink = render_pdf(&Invoice::sample(), "A4", &RenderConfig::default()).expect("render failed");
    let bytes = sink.into_bytes().expect("save failed");
    assert!(bytes.starts_with(b"%PDF"));
    assert!(bytes.len() > 1000);
}

#[test]
fn test_column_fit_never_exceeds_allowed() {
    for allowed in [100.0_f32, 300.0, 523.28, 547.9] {
        let mut widths = [20.0, 140.0, 45.0, 50.0, 59.0, 52.0, 92.0, 90.0];
        fit_columns(&mut widths, allowed);
        let sum: f32 = widths.iter().sum();
        assert!(sum <= allowed + 1e-3, "{} > {}", sum, allowed);
    }

    for (scale, width) in [(1.4, 841.89), (1.0, 595.28), (0.7, 419.53), (1.0, 612.0)] {
        let columns = ColumnLayout::new(scale, width);
        let sum: f32 = columns.widths.iter().sum();
        assert!(sum <= width - 72.0 * scale + 1e-3);
    }
}
