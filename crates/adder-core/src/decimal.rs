//! Precision-safe decimal types for trading.
//!
//! Uses `rust_decimal` for exact decimal arithmetic, avoiding
//! floating-point rounding errors critical in financial calculations.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};
use std::str::FromStr;

/// Significant digits the exchange accepts on quote prices.
pub const QUOTE_SIG_FIGS: u32 = 5;

/// Price with exact decimal precision.
///
/// Wraps `Decimal` to provide type safety and prevent mixing
/// prices with sizes in calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Absolute distance to another price.
    #[inline]
    pub fn distance(&self, other: Price) -> Decimal {
        (self.0 - other.0).abs()
    }

    /// Round to the exchange's quote precision (significant digits, not
    /// decimal places).
    #[inline]
    pub fn round_to_quote_precision(&self) -> Self {
        Self(round_sig_figs(self.0, QUOTE_SIG_FIGS))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Price {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul<Decimal> for Price {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Div<Decimal> for Price {
    type Output = Self;

    fn div(self, rhs: Decimal) -> Self::Output {
        Self(self.0 / rhs)
    }
}

/// Size/quantity with exact decimal precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Size(pub Decimal);

impl Size {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Calculate notional value: size * price.
    #[inline]
    pub fn notional(&self, price: Price) -> Decimal {
        self.0 * price.0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Size {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Size {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

impl Add for Size {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Size {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul<Decimal> for Size {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0 * rhs)
    }
}

/// Round a decimal to `figs` significant digits (banker's rounding, matching
/// the exchange's quote formatting).
pub fn round_sig_figs(value: Decimal, figs: u32) -> Decimal {
    if value.is_zero() || figs == 0 {
        return Decimal::ZERO;
    }

    let magnitude = calculate_magnitude(value);
    // How many decimal places keep exactly `figs` significant digits.
    let scale = figs as i32 - magnitude - 1;

    if scale >= 0 {
        value.round_dp_with_strategy(scale as u32, RoundingStrategy::MidpointNearestEven)
    } else {
        // More integer digits than significant digits: shift, round, shift back.
        let factor = Decimal::from(10u64.pow((-scale) as u32));
        (value / factor).round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven) * factor
    }
}

/// Calculate the order of magnitude of a decimal.
/// 12345 -> 4, 1234.5 -> 3, 123.45 -> 2, 0.123 -> -1, 0.00123 -> -3
fn calculate_magnitude(value: Decimal) -> i32 {
    if value.is_zero() {
        return 0;
    }

    let abs_value = value.abs();
    let int_part = abs_value.trunc();

    if !int_part.is_zero() {
        let int_str = int_part.to_string();
        (int_str.len() as i32) - 1
    } else {
        // Value is < 1, find first non-zero decimal digit
        let s = abs_value.to_string();
        let mut magnitude: i32 = 0;
        let mut after_decimal = false;

        for c in s.chars() {
            if c == '.' {
                after_decimal = true;
                continue;
            }
            if after_decimal {
                magnitude -= 1;
                if c != '0' {
                    break;
                }
            }
        }
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_distance() {
        let p1 = Price::new(dec!(999.0));
        let p2 = Price::new(dec!(998.4));
        assert_eq!(p1.distance(p2), dec!(0.6));
        assert_eq!(p2.distance(p1), dec!(0.6));
    }

    #[test]
    fn test_notional_calculation() {
        let size = Size::new(dec!(0.5));
        let price = Price::new(dec!(50000));
        assert_eq!(size.notional(price), dec!(25000));
    }

    #[test]
    fn test_sig_figs_fractional() {
        assert_eq!(round_sig_figs(dec!(0.0012345678), 5), dec!(0.0012346));
        assert_eq!(round_sig_figs(dec!(1.23449), 5), dec!(1.2345));
    }

    #[test]
    fn test_sig_figs_integer_range() {
        assert_eq!(round_sig_figs(dec!(123456), 5), dec!(123460));
        assert_eq!(round_sig_figs(dec!(999.004), 5), dec!(999.00));
    }

    #[test]
    fn test_sig_figs_exact_width_unchanged() {
        assert_eq!(round_sig_figs(dec!(12345), 5), dec!(12345));
        assert_eq!(round_sig_figs(dec!(1000.4), 5), dec!(1000.4));
    }

    #[test]
    fn test_quote_precision_rounding() {
        let px = Price::new(dec!(1001.2345));
        assert_eq!(px.round_to_quote_precision().inner(), dec!(1001.2));
    }

    #[test]
    fn test_magnitude() {
        assert_eq!(calculate_magnitude(dec!(12345)), 4);
        assert_eq!(calculate_magnitude(dec!(1234.5)), 3);
        assert_eq!(calculate_magnitude(dec!(0.123)), -1);
        assert_eq!(calculate_magnitude(dec!(0.00123)), -3);
    }
}
