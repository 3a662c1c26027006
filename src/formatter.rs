use crate::models::{CurrencyCode, PriceQuote};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeClass {
    Positive,
    Negative,
}

impl ChangeClass {
    /// Only strictly positive changes count as positive; zero is negative.
    pub fn classify(change_24h: f64) -> Self {
        if change_24h > 0.0 {
            ChangeClass::Positive
        } else {
            ChangeClass::Negative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeClass::Positive => "positive",
            ChangeClass::Negative => "negative",
        }
    }
}

/// One display-ready price card.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedQuote {
    pub label: String,
    pub price: String,
    pub change_24h: String,
    pub change_class: ChangeClass,
}

/// Formats every currency in `currencies` that the quote carries, in order.
pub fn format_quote(quote: &PriceQuote, currencies: &[CurrencyCode]) -> Vec<FormattedQuote> {
    currencies
        .iter()
        .filter_map(|&code| {
            quote.get(code).map(|q| FormattedQuote {
                label: code.label(),
                price: format_price(code, q.price),
                change_24h: format_change(q.change_24h),
                change_class: ChangeClass::classify(q.change_24h),
            })
        })
        .collect()
}

pub fn format_price(code: CurrencyCode, price: f64) -> String {
    if code == CurrencyCode::Rub {
        group_thousands(&format!("{:.0}", price), ' ')
    } else if price > 1.0 {
        group_thousands(&format!("{:.2}", price), ',')
    } else {
        format!("{:.6}", price)
    }
}

pub fn format_change(change_24h: f64) -> String {
    format!("{:.2}%", change_24h)
}

fn group_thousands(formatted: &str, separator: char) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let mut grouped = String::from(sign);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(digit);
    }
    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CurrencyQuote;

    #[test]
    fn formats_regular_prices_with_grouping() {
        assert_eq!(format_price(CurrencyCode::Usd, 1234.5), "1,234.50");
        assert_eq!(format_price(CurrencyCode::Jpy, 10_123_456.789), "10,123,456.79");
        assert_eq!(format_price(CurrencyCode::Eur, 999.99), "999.99");
    }

    #[test]
    fn formats_sub_unit_prices_with_six_digits() {
        assert_eq!(format_price(CurrencyCode::Usd, 0.0000123), "0.000012");
        assert_eq!(format_price(CurrencyCode::Gbp, 1.0), "1.000000");
    }

    #[test]
    fn formats_rubles_as_space_grouped_integer() {
        assert_eq!(format_price(CurrencyCode::Rub, 3_512_345.0), "3 512 345");
        assert_eq!(format_price(CurrencyCode::Rub, 512.4), "512");
        assert_eq!(format_price(CurrencyCode::Rub, 0.4), "0");
    }

    #[test]
    fn zero_change_is_classified_negative() {
        assert_eq!(format_change(0.0), "0.00%");
        assert_eq!(ChangeClass::classify(0.0), ChangeClass::Negative);
        assert_eq!(ChangeClass::classify(-3.1), ChangeClass::Negative);
    }

    #[test]
    fn positive_change_is_classified_positive() {
        assert_eq!(format_change(2.5), "2.50%");
        assert_eq!(ChangeClass::classify(2.5), ChangeClass::Positive);
        assert_eq!(ChangeClass::Positive.as_str(), "positive");
    }

    #[test]
    fn negative_values_keep_sign_before_grouping() {
        assert_eq!(group_thousands("-1234567.00", ','), "-1,234,567.00");
        assert_eq!(group_thousands("123", ' '), "123");
    }

    #[test]
    fn format_quote_follows_currency_order_and_skips_missing() {
        let mut quote = PriceQuote::default();
        quote.entries.insert(
            CurrencyCode::Usd,
            CurrencyQuote { price: 65_000.0, change_24h: 1.0 },
        );
        quote.entries.insert(
            CurrencyCode::Rub,
            CurrencyQuote { price: 6_000_000.0, change_24h: 0.0 },
        );

        let cards = format_quote(&quote, &[CurrencyCode::Rub, CurrencyCode::Eur, CurrencyCode::Usd]);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].label, "RUB");
        assert_eq!(cards[0].price, "6 000 000");
        assert_eq!(cards[0].change_class, ChangeClass::Negative);
        assert_eq!(cards[1].label, "USD");
        assert_eq!(cards[1].price, "65,000.00");
        assert_eq!(cards[1].change_24h, "1.00%");
    }
}
