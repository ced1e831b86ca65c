use std::path::Path;

use log::warn;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::InvoiceError;

// ============================================================================
// Invoice Record
// ============================================================================

/// Invoice input as posted by the billing frontend (camelCase JSON).
///
/// Identifying fields are opaque: dates and numbers are carried as text and
/// never parsed. Only `items` drives any arithmetic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Invoice {
    #[serde(deserialize_with = "opaque_text")]
    pub invoice_number: Option<String>,
    #[serde(deserialize_with = "opaque_text")]
    pub issue_date: Option<String>,
    #[serde(deserialize_with = "opaque_text")]
    pub due_date: Option<String>,
    #[serde(deserialize_with = "opaque_text")]
    pub supply_place: Option<String>,
    #[serde(deserialize_with = "opaque_text")]
    pub ewaybill_no: Option<String>,
    #[serde(deserialize_with = "opaque_text")]
    pub vehicle_no: Option<String>,

    pub company_name: Option<String>,
    pub company_website: Option<String>,
    pub company_email: Option<String>,
    pub company_address: Option<String>,
    pub gstin: Option<String>,
    #[serde(deserialize_with = "opaque_text")]
    pub company_phone: Option<String>,

    pub bill_to: Party,
    pub ship_to: Party,
    pub items: Vec<LineItem>,
    pub bank_details: BankDetails,

    /// Caller-side summary figures. Not drawn; the summary block recomputes
    /// its totals from `items`.
    pub sub_total: Option<f64>,
    pub paid_to_date: Option<f64>,
    pub balance: Option<f64>,

    pub authorized_signatory: Option<String>,
    pub notes: Option<String>,
    pub terms_and_conditions: Vec<String>,
}

/// Billing or shipping recipient.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Party {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    #[serde(deserialize_with = "opaque_text")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineItem {
    pub item: String,
    #[serde(deserialize_with = "opaque_code")]
    pub hsn_sac: String,
    #[serde(deserialize_with = "lenient_number")]
    pub qty: f64,
    /// Unit price before discount.
    #[serde(deserialize_with = "lenient_number")]
    pub rate_item: f64,
    /// Per-unit discount, in currency.
    #[serde(deserialize_with = "lenient_number")]
    pub discount: f64,
    /// Tax rate in percent.
    #[serde(deserialize_with = "lenient_number")]
    pub tax: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BankDetails {
    pub bank_name: Option<String>,
    pub account_name: Option<String>,
    #[serde(deserialize_with = "opaque_text")]
    pub account_number: Option<String>,
    pub ifsc_code: Option<String>,
}

impl LineItem {
    pub fn new(item: &str, hsn_sac: &str, qty: f64, rate_item: f64, discount: f64, tax: f64) -> Self {
        LineItem {
            item: item.to_string(),
            hsn_sac: hsn_sac.to_string(),
            qty,
            rate_item,
            discount,
            tax,
        }
    }
}

impl Invoice {
    pub fn from_json(json: &str) -> Result<Self, InvoiceError> {
        serde_json::from_str(json).map_err(|e| InvoiceError::Invoice(format!("Invalid JSON: {}", e)))
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, InvoiceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| InvoiceError::Invoice(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// The demo invoice served by the billing backend's generate endpoint
    /// when no request body is supplied.
    pub fn sample() -> Self {
        let some = |s: &str| Some(s.to_string());
        Invoice {
            invoice_number: some("12345"),
            issue_date: some("2025-12-25"),
            due_date: some("2025-01-10"),
            supply_place: some("Bangalore"),
            ewaybill_no: some("123456789012"),
            vehicle_no: some("KA01AB1234"),
            company_name: some("Business Counter Pvt Ltd"),
            company_website: some("www.businesscounter.com"),
            company_email: some("accounts@businesscounter.com"),
            company_address: some(
                "Bangalore, Karnataka, India Bangalore, Karnataka, India Bangalore, Karnataka, India",
            ),
            gstin: some("09AABCU1234F1Z5"),
            company_phone: some("123456789"),
            bill_to: Party {
                name: some("JohnDoe"),
                address: some(
                    "123, MainStreet Bangalore, Karnataka, India, 123, MainStreet Bangalore, Karnataka, India",
                ),
                city: None,
                phone: some("123456789"),
            },
            ship_to: Party {
                name: some("JohnDoe"),
                address: some(
                    "123, MainStreet Bangalore, Karnataka, India, 123, MainStreet Bangalore,123, MainStreet Bangalore",
                ),
                city: None,
                phone: some("123456789"),
            },
            items: vec![
                LineItem::new("Widget", "13216543100", 2000.0, 1000000000.0, 10.0, 18.0),
                LineItem::new(
                    "Wifsdf dgethgj hjkh jkhjh jkhjkh jkhklh jjjhg kjhkjh bkjhk df sfdsdfd sfsdgsdgf dgf asdfdf adadfdsa",
                    "132165431",
                    25.0,
                    100.0,
                    10.0,
                    18.0,
                ),
                LineItem::new("Widget", "1321654311", 25.0, 10.0, 10.0, 18.0),
                LineItem::new("Widget", "1321654311", 25.0, 100.0, 10.0, 18.0),
                LineItem::new("Widget", "1321654311", 25.0, 1000.0, 10.0, 18.0),
            ],
            bank_details: BankDetails {
                bank_name: some("National Bank of India"),
                account_name: some("ABC Enterprises"),
                account_number: some("123456789012"),
                ifsc_code: some("NBIN0001234"),
            },
            sub_total: Some(250.0),
            paid_to_date: Some(0.0),
            balance: Some(250.0),
            authorized_signatory: some("John Doe"),
            notes: some("Thank you for your business! Please make the payment within 30 days."),
            terms_and_conditions: vec![
                "Payment is due within 30 days from the invoice date.".to_string(),
                "Late payments will incur an interest charge of 1.5% per month.".to_string(),
                "Goods are non-returnable unless defective.".to_string(),
            ],
        }
    }
}

// ============================================================================
// Opaque Field Deserialization
// ============================================================================

/// Identifiers (phone numbers, HSN codes, invoice numbers) arrive as either
/// JSON strings or JSON numbers depending on the client.
#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl From<TextOrNumber> for String {
    fn from(value: TextOrNumber) -> Self {
        match value {
            TextOrNumber::Text(s) => s,
            TextOrNumber::Int(n) => n.to_string(),
            TextOrNumber::UInt(n) => n.to_string(),
            TextOrNumber::Float(n) => n.to_string(),
        }
    }
}

fn opaque_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TextOrNumber>::deserialize(deserializer)?.map(String::from))
}

fn opaque_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opaque_text(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Lenient Amount Deserialization
// ============================================================================

/// Item figures sent by the client. Numeric text is parsed; anything else
/// becomes NaN and prints as the fallback amount.
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<LenientNumber>::deserialize(deserializer)? {
        None => 0.0,
        Some(LenientNumber::Number(n)) => n,
        Some(LenientNumber::Text(text)) => text.trim().parse::<f64>().unwrap_or_else(|_| {
            warn!("Non-numeric item value {:?}", text);
            f64::NAN
        }),
        Some(LenientNumber::Other(_)) => {
            warn!("Non-numeric item value");
            f64::NAN
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_codes_are_carried_as_text() {
        let invoice = Invoice::from_json(
            r#"{"invoiceNumber": 12345, "items": [{"item": "Widget", "hsnSac": 13216543100, "qty": 2, "rateItem": 100, "discount": 10, "tax": 18}]}"#,
        )
        .unwrap();
        assert_eq!(invoice.invoice_number.as_deref(), Some("12345"));
        assert_eq!(invoice.items[0].hsn_sac, "13216543100");
        assert_eq!(invoice.items[0].rate_item, 100.0);
    }

    #[test]
    fn absent_fields_default() {
        let invoice = Invoice::from_json("{}").unwrap();
        assert!(invoice.items.is_empty());
        assert!(invoice.bill_to.city.is_none());
        assert!(invoice.company_name.is_none());
    }

    #[test]
    fn numeric_text_amounts_are_parsed() {
        let invoice = Invoice::from_json(
            r#"{"items": [{"item": "Widget", "qty": "2", "rateItem": " 100.5 ", "discount": null, "tax": 18}]}"#,
        )
        .unwrap();
        let item = &invoice.items[0];
        assert_eq!(item.qty, 2.0);
        assert_eq!(item.rate_item, 100.5);
        assert_eq!(item.discount, 0.0);
    }

    #[test]
    fn non_numeric_amounts_load_as_nan() {
        let invoice = Invoice::from_json(
            r#"{"items": [{"item": "Widget", "qty": 2, "rateItem": "abc", "discount": true, "tax": 18}]}"#,
        )
        .unwrap();
        let item = &invoice.items[0];
        assert!(item.rate_item.is_nan());
        assert!(item.discount.is_nan());
        assert_eq!(item.tax, 18.0);
    }

    #[test]
    fn sample_has_items() {
        let invoice = Invoice::sample();
        assert_eq!(invoice.items.len(), 5);
        assert_eq!(invoice.items[0].tax, 18.0);
    }
}
