use log::warn;

/// Printed in place of any amount that is not a finite number.
pub const FALLBACK_AMOUNT: &str = "₹0.00";

/// Format an amount with two decimals, or the fallback literal when the
/// amount is NaN or infinite. Item figures that arrived as non-numeric
/// text are NaN by the time they get here.
pub fn format_currency(amount: f64) -> String {
    if amount.is_finite() {
        format!("{:.2}", amount)
    } else {
        warn!("Invalid amount: {}", amount);
        FALLBACK_AMOUNT.to_string()
    }
}

/// Tax rate with two decimals, as items are grouped and printed by it.
/// A rate that is not a number reads as zero.
pub fn format_rate(rate: f64) -> String {
    if rate.is_finite() {
        format!("{:.2}", rate)
    } else {
        warn!("Invalid tax rate: {}", rate);
        "0.00".to_string()
    }
}

/// Plain decimal text for quantities and rates: `2` not `2.00`, `2.5` as is.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// ============================================================================
// Amount in Words
// ============================================================================

const ONES: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const SCALES: [&str; 7] = [
    "",
    "thousand",
    "million",
    "billion",
    "trillion",
    "quadrillion",
    "quintillion",
];

/// English cardinal words for the integer part of `amount`.
///
/// Thousand groups are joined with ", " and tens are hyphenated, so 2564
/// reads "two thousand, five hundred sixty-four". The fraction is dropped.
pub fn amount_in_words(amount: f64) -> String {
    if !amount.is_finite() {
        warn!("Invalid amount for words: {}", amount);
        return ONES[0].to_string();
    }
    let whole = amount.trunc();
    let magnitude = whole.abs().min(u64::MAX as f64) as u64;
    if magnitude == 0 {
        return ONES[0].to_string();
    }

    let mut groups = Vec::new();
    let mut rest = magnitude;
    let mut scale = 0;
    while rest > 0 {
        let chunk = (rest % 1000) as u32;
        if chunk > 0 {
            let words = chunk_words(chunk);
            groups.push(if SCALES[scale].is_empty() {
                words
            } else {
                format!("{} {}", words, SCALES[scale])
            });
        }
        rest /= 1000;
        scale += 1;
    }
    groups.reverse();

    let words = groups.join(", ");
    if whole < 0.0 {
        format!("minus {}", words)
    } else {
        words
    }
}

/// Words for 1..=999.
fn chunk_words(n: u32) -> String {
    let hundreds = n / 100;
    let rest = n % 100;
    let mut parts = Vec::new();
    if hundreds > 0 {
        parts.push(format!("{} hundred", ONES[hundreds as usize]));
    }
    if rest > 0 {
        parts.push(below_hundred(rest));
    }
    parts.join(" ")
}

fn below_hundred(n: u32) -> String {
    if n < 20 {
        return ONES[n as usize].to_string();
    }
    let tens = TENS[(n / 10) as usize];
    match n % 10 {
        0 => tens.to_string(),
        ones => format!("{}-{}", tens, ONES[ones as usize]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_two_decimals() {
        assert_eq!(format_currency(212.4), "212.40");
        assert_eq!(format_currency(0.0), "0.00");
        assert_eq!(format_currency(-5.5), "-5.50");
    }

    #[test]
    fn rates_keep_two_decimals() {
        assert_eq!(format_rate(18.0), "18.00");
        assert_eq!(format_rate(12.5), "12.50");
        assert_eq!(format_rate(f64::NAN), "0.00");
    }

    #[test]
    fn nan_and_infinity_fall_back() {
        assert_eq!(format_currency(f64::NAN), FALLBACK_AMOUNT);
        assert_eq!(format_currency(f64::INFINITY), FALLBACK_AMOUNT);
        assert!(!format_currency(f64::NAN).contains("NaN"));
    }

    #[test]
    fn plain_numbers_drop_trailing_zeros() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(18.0), "18");
        assert_eq!(format_number(f64::NAN), "0");
    }

    #[test]
    fn small_numbers_in_words() {
        assert_eq!(amount_in_words(0.0), "zero");
        assert_eq!(amount_in_words(13.0), "thirteen");
        assert_eq!(amount_in_words(40.0), "forty");
        assert_eq!(amount_in_words(99.0), "ninety-nine");
    }

    #[test]
    fn fraction_is_dropped() {
        assert_eq!(amount_in_words(212.4), "two hundred twelve");
        assert_eq!(amount_in_words(0.99), "zero");
    }

    #[test]
    fn thousand_groups_are_comma_separated() {
        assert_eq!(
            amount_in_words(2564.0),
            "two thousand, five hundred sixty-four"
        );
        assert_eq!(amount_in_words(1_000_000.0), "one million");
        assert_eq!(
            amount_in_words(3_000_042.0),
            "three million, forty-two"
        );
    }

    #[test]
    fn negatives_and_non_finite() {
        assert_eq!(amount_in_words(-7.0), "minus seven");
        assert_eq!(amount_in_words(f64::NAN), "zero");
    }
}
