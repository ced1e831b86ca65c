use crate::fonts::FontFace;
use crate::model::{Invoice, Party};
use crate::sink::{DocumentSink, TextStyle};

use super::LayoutContext;

const BLOCK_X: f32 = 36.0;
const TOP_PAD: f32 = 8.0;
const SHIPPING_OFFSET: f32 = 270.0;
const DIVIDER_OFFSET: f32 = 264.0;
const TITLE_SIZE: f32 = 10.0;
const TITLE_GAP: f32 = 15.0;
const FIELD_SIZE: f32 = 8.0;
const STACK_WIDTH: f32 = 200.0;
/// Unscaled gap between stacked fields.
const FIELD_GAP: f32 = 1.0;
const SECTION_PAD: f32 = 10.0;

/// Billing and shipping stacks side by side.
pub(super) fn draw_addresses<S: DocumentSink>(ctx: &mut LayoutContext<'_, S>, invoice: &Invoice) {
    let top = ctx.y;
    let x = ctx.s(BLOCK_X);
    let title_y = top + ctx.s(TOP_PAD);

    let billing_end = draw_party(ctx, "Billing address:", &invoice.bill_to, x, title_y);
    let shipping_end = draw_party(
        ctx,
        "Shipping address:",
        &invoice.ship_to,
        x + ctx.s(SHIPPING_OFFSET),
        title_y,
    );

    let divider_y = billing_end.max(shipping_end) + ctx.s(SECTION_PAD);
    let divider_x = x + ctx.s(DIVIDER_OFFSET);
    ctx.line(divider_x, top, divider_x, divider_y);
    ctx.rule(divider_y);
    ctx.y = divider_y + ctx.s(SECTION_PAD);
}

/// Draw one stack and return where it ends.
fn draw_party<S: DocumentSink>(
    ctx: &mut LayoutContext<'_, S>,
    title: &str,
    party: &Party,
    x: f32,
    y: f32,
) -> f32 {
    let title_style = TextStyle::new(FontFace::Bold, ctx.s(TITLE_SIZE));
    ctx.text(title, x, y, &title_style);

    let mut lines = vec![
        ctx.field(&party.name).to_string(),
        ctx.field(&party.address).to_string(),
    ];
    // City is optional in the record; the line is skipped rather than blank.
    if let Some(city) = party.city.as_deref().filter(|c| !c.trim().is_empty()) {
        lines.push(city.to_string());
    }
    lines.push(ctx.field(&party.phone).to_string());

    let style = TextStyle::new(FontFace::Regular, ctx.s(FIELD_SIZE)).width(ctx.s(STACK_WIDTH));
    let mut current_y = y + ctx.s(TITLE_GAP);
    for line in &lines {
        let height = ctx.text(line, x, current_y, &style);
        current_y += height + FIELD_GAP;
    }
    current_y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::layout::RenderAssets;
    use crate::sink::RecordingSink;

    fn render_party(party: Party) -> (Vec<String>, f32) {
        let invoice = Invoice {
            bill_to: party.clone(),
            ship_to: party,
            ..Invoice::default()
        };
        let mut sink = RecordingSink::new("A4");
        let config = RenderConfig::default();
        let assets = RenderAssets::default();
        let mut ctx = LayoutContext::new(&mut sink, 1.0, &config, &assets);
        ctx.y = 150.0;
        draw_addresses(&mut ctx, &invoice);
        let end = ctx.y;
        (sink.texts_on(0).into_iter().map(str::to_string).collect(), end)
    }

    #[test]
    fn city_is_drawn_when_present() {
        let (texts, _) = render_party(Party {
            name: Some("Acme".to_string()),
            address: Some("1 Road".to_string()),
            city: Some("Pune".to_string()),
            phone: Some("99".to_string()),
        });
        assert_eq!(texts.iter().filter(|t| t.as_str() == "Pune").count(), 2);
    }

    #[test]
    fn absent_city_takes_no_space() {
        let with_city = Party {
            name: Some("Acme".to_string()),
            address: Some("1 Road".to_string()),
            city: Some("Pune".to_string()),
            phone: Some("99".to_string()),
        };
        let without_city = Party {
            city: None,
            ..with_city.clone()
        };
        let (_, tall) = render_party(with_city);
        let (texts, short) = render_party(without_city);
        assert!(short < tall);
        assert!(texts.contains(&"99".to_string()));
        assert!(!texts.iter().any(|t| t.starts_with("Phone")));
    }
}
