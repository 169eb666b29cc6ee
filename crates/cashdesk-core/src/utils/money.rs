use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    Invalid(String),
}

pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn format_money(symbol: &str, amount: Decimal) -> String {
    let mut rounded = round_money(amount.abs());
    rounded.rescale(2);
    if amount.is_sign_negative() && !rounded.is_zero() {
        format!("-{symbol}{rounded}")
    } else {
        format!("{symbol}{rounded}")
    }
}

/// Parses an amount typed at the till. One leading currency symbol is
/// ignored, the sign may sit on either side of it, and an empty field
/// counts as zero.
pub fn parse_money(text: &str) -> Result<Decimal, MoneyError> {
    let invalid = || MoneyError::Invalid(text.to_string());

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let (mut negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };

    let rest = match rest.chars().next() {
        Some(symbol) if !(symbol.is_ascii_digit() || symbol == '-' || symbol == '.') => {
            rest[symbol.len_utf8()..].trim_start()
        }
        _ => rest,
    };

    let digits = match rest.strip_prefix('-') {
        Some(_) if negative => return Err(invalid()),
        Some(digits) => {
            negative = true;
            digits.trim_start()
        }
        None => rest,
    };

    if !digits.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return Err(invalid());
    }

    let amount = Decimal::from_str(digits).map_err(|_| invalid())?;
    Ok(if negative { -amount } else { amount })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_money(dec!(179.995)), dec!(180.00));
        assert_eq!(round_money(dec!(323.9964)), dec!(324.00));
        assert_eq!(round_money(dec!(-0.125)), dec!(-0.13));
    }

    #[test]
    fn formats_with_symbol_and_two_places() {
        assert_eq!(format_money("₹", dec!(1943.9784)), "₹1943.98");
        assert_eq!(format_money("₹", dec!(450)), "₹450.00");
        assert_eq!(format_money("$", dec!(-180)), "-$180.00");
        assert_eq!(format_money("₹", dec!(-0.001)), "₹0.00");
    }

    #[test]
    fn parses_operator_input() {
        assert_eq!(parse_money("1000"), Ok(dec!(1000)));
        assert_eq!(parse_money(" ₹899.99 "), Ok(dec!(899.99)));
        assert_eq!(parse_money(""), Ok(Decimal::ZERO));
        assert_eq!(parse_money("-5"), Ok(dec!(-5)));
        assert!(matches!(parse_money("ten"), Err(MoneyError::Invalid(_))));
        assert!(matches!(parse_money("12.3.4"), Err(MoneyError::Invalid(_))));
    }

    #[test]
    fn keeps_sign_written_after_the_symbol() {
        assert_eq!(parse_money("₹-50"), Ok(dec!(-50)));
        assert_eq!(parse_money("$-5"), Ok(dec!(-5)));
        assert_eq!(parse_money("-₹5"), Ok(dec!(-5)));
        assert_eq!(parse_money("₹ 20"), Ok(dec!(20)));
    }

    #[test]
    fn rejects_text_around_the_number() {
        for bad in ["abc100", "-", "₹", "-₹-5", "--5", "₹+5", "100abc"] {
            assert_eq!(parse_money(bad), Err(MoneyError::Invalid(bad.to_string())));
        }
    }
}
