use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid amount: '{0}'")]
pub struct AmountError(pub String);

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Money(Decimal);

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::from(cents) / Decimal::from(100))
    }

    /// Saturates instead of panicking on amounts outside the i64 cent range.
    pub fn to_cents(self) -> i64 {
        let cents = (self.0 * Decimal::from(100)).round();
        cents.to_i64().unwrap_or(if cents.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        })
    }

    pub fn from_decimal(decimal: Decimal) -> Self {
        Money(decimal.round_dp(2))
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(self) -> Self {
        Money(self.0.abs())
    }

    /// Parses amounts the way documents and statements write them:
    /// `$1,234.50`, `₹ 999`, `(75.25)`. Anything unparseable becomes zero.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for Money {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, body) = match trimmed.strip_prefix('(').and_then(|b| b.strip_suffix(')')) {
            Some(inner) => (true, inner),
            None => (false, trimmed),
        };
        let cleaned: String = strip_currency_prefix(body)
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect();
        if cleaned.is_empty() {
            return Err(AmountError(s.to_string()));
        }
        let mut dec = Decimal::from_str(&cleaned).map_err(|_| AmountError(s.to_string()))?;
        if negative {
            dec = -dec;
        }
        Ok(Money::from_decimal(dec))
    }
}

/// Drops a leading currency marker such as `$`, `USD`, `Rs.` or `₹`.
/// The dot after a lettered marker is an abbreviation, not a decimal point.
fn strip_currency_prefix(s: &str) -> &str {
    let rest = s.trim_start_matches(|c: char| !(c.is_ascii_digit() || matches!(c, '-' | '+' | '.')));
    let marker = &s[..s.len() - rest.len()];
    if marker.trim_end().chars().last().is_some_and(char::is_alphabetic) {
        rest.strip_prefix('.').unwrap_or(rest)
    } else {
        rest
    }
}

impl From<Decimal> for Money {
    fn from(decimal: Decimal) -> Self {
        Money::from_decimal(decimal)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Money(self.0 - rhs.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |a, b| a + b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cents_roundtrip() {
        assert_eq!(Money::from_cents(97_500).to_cents(), 97_500);
        assert_eq!(Money::from_cents(-1).to_cents(), -1);
    }

    #[test]
    fn parse_plain_and_decorated() {
        assert_eq!("1000".parse::<Money>().unwrap(), Money::from_cents(100_000));
        assert_eq!("$1,234.56".parse::<Money>().unwrap(), Money::from_cents(123_456));
        assert_eq!("₹ 999.90".parse::<Money>().unwrap(), Money::from_cents(99_990));
        assert_eq!("(75.25)".parse::<Money>().unwrap(), Money::from_cents(-7_525));
        assert_eq!("USD 2,000".parse::<Money>().unwrap(), Money::from_cents(200_000));
        assert_eq!(".50".parse::<Money>().unwrap(), Money::from_cents(50));
    }

    #[test]
    fn abbreviated_currency_dot_is_not_a_decimal_point() {
        assert_eq!("Rs. 1,500".parse::<Money>().unwrap(), Money::from_cents(150_000));
        assert_eq!("Rs.1,500".parse::<Money>().unwrap(), Money::from_cents(150_000));
        assert_eq!("Rs. 99.50".parse::<Money>().unwrap(), Money::from_cents(9_950));
        assert_eq!(Money::parse_lenient("Rs. 1,500"), Money::from_cents(150_000));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("N/A".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
    }

    #[test]
    fn parse_lenient_falls_back_to_zero() {
        assert_eq!(Money::parse_lenient("N/A"), Money::zero());
        assert_eq!(Money::parse_lenient("  42.10 "), Money::from_cents(4_210));
    }

    #[test]
    fn display_has_two_places() {
        assert_eq!(Money::from_cents(34_250).to_string(), "$342.50");
    }

    #[test]
    fn sum_of_amounts() {
        let total: Money = [1_000, 250, -50].into_iter().map(Money::from_cents).sum();
        assert_eq!(total.to_cents(), 1_200);
    }
}
