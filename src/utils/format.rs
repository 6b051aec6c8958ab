//! Human-readable rendering of exchange amounts.

use rust_decimal::{Decimal, RoundingStrategy};

/// Symbols quoted with cent precision instead of the default eight decimals.
const CENT_QUOTED_SYMBOLS: &[&str] = &["BTCUSDT", "ETHUSDT"];

const DEFAULT_PRETTY_DP: u32 = 8;

/// Fixed `dp` decimals, half-even rounding, thousands separators.
pub fn grouped(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven);
    group_thousands(&format!("{:.*}", dp as usize, rounded))
}

/// Truncates to `dp` decimals, drops trailing zeros and groups thousands.
pub fn pretty(value: Decimal, dp: u32) -> String {
    let truncated = value
        .round_dp_with_strategy(dp, RoundingStrategy::ToZero)
        .normalize();
    group_thousands(&truncated.to_string())
}

pub fn price(value: Decimal, symbol: &str) -> String {
    if CENT_QUOTED_SYMBOLS.contains(&symbol) {
        pretty(value, 2)
    } else {
        pretty(value, DEFAULT_PRETTY_DP)
    }
}

fn group_thousands(text: &str) -> String {
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits, None),
    };

    let mut out = String::with_capacity(text.len() + integer.len() / 3);
    out.push_str(sign);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_grouped_pads_and_groups() {
        assert_eq!(grouped(dec("1234567.891234"), 4), "1,234,567.8912");
        assert_eq!(grouped(dec("0.5"), 4), "0.5000");
        assert_eq!(grouped(dec("999"), 2), "999.00");
        assert_eq!(grouped(dec("1000"), 2), "1,000.00");
        assert_eq!(grouped(dec("-1234.5"), 2), "-1,234.50");
    }

    #[test]
    fn test_grouped_rounds_half_to_even() {
        assert_eq!(grouped(dec("0.00005"), 4), "0.0000");
        assert_eq!(grouped(dec("0.00015"), 4), "0.0002");
        assert_eq!(grouped(dec("2.345"), 2), "2.34");
        assert_eq!(grouped(dec("2.3451"), 2), "2.35");
    }

    #[test]
    fn test_pretty_truncates_and_strips_zeros() {
        assert_eq!(pretty(dec("10.123456789"), 8), "10.12345678");
        assert_eq!(pretty(dec("10.5"), 8), "10.5");
        assert_eq!(pretty(dec("10.00000000"), 8), "10");
        assert_eq!(pretty(dec("1234567"), 8), "1,234,567");
        assert_eq!(pretty(dec("0.999"), 2), "0.99");
    }

    #[test]
    fn test_price_precision_depends_on_symbol() {
        assert_eq!(price(dec("65432.129"), "BTCUSDT"), "65,432.12");
        assert_eq!(price(dec("3210.5"), "ETHUSDT"), "3,210.5");
        assert_eq!(price(dec("0.123456789"), "DOGEUSDT"), "0.12345678");
    }
}
