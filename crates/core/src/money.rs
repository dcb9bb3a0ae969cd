//! Fixed-point monetary amounts.
//!
//! A single implicit currency with two minor-unit digits. Arithmetic is exact
//! decimal arithmetic; rounding only happens where a split policy asks for it.

use core::iter::Sum;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// Number of minor-unit digits in the currency.
pub const CURRENCY_SCALE: u32 = 2;

/// Largest accepted expense or share amount, `1000000000000.00`.
///
/// Ledger sums over any realistic number of expenses stay far inside the
/// `Decimal` range below this bound.
pub const MAX_AMOUNT: Money = Money(Decimal::from_parts(276_447_232, 23_283, 0, false, 2));

/// Signed monetary amount.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Build from an integer mantissa and scale, e.g. `Money::new(9000, 2)` is `90.00`.
    pub fn new(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Round to currency precision, half-up (midpoints move away from zero).
    ///
    /// The result always carries exactly two decimal places (`6` becomes `6.00`).
    pub fn round_currency(self) -> Self {
        let mut rounded = self
            .0
            .round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(CURRENCY_SCALE);
        Self(rounded)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// True when the amount has no digits beyond the minor unit (`10.50`, `10.500`, not `10.505`).
    pub fn has_currency_scale(&self) -> bool {
        self.0.normalize().scale() <= CURRENCY_SCALE
    }

    /// True when the magnitude is above [`MAX_AMOUNT`].
    pub fn exceeds_limit(&self) -> bool {
        self.0.abs() > MAX_AMOUNT.0
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Self)
            .map_err(|e| DomainError::validation(format!("malformed amount '{s}': {e}")))
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up_to_cents() {
        assert_eq!(Money::new(3335, 3).round_currency(), Money::new(334, 2));
        assert_eq!(Money::new(3334, 3).round_currency(), Money::new(333, 2));
        assert_eq!(Money::new(-3335, 3).round_currency(), Money::new(-334, 2));
        assert_eq!(Money::new(6, 0).round_currency().to_string(), "6.00");
    }

    #[test]
    fn max_amount_is_one_trillion() {
        assert_eq!(MAX_AMOUNT, Money::new(100_000_000_000_000, 2));
        assert_eq!(MAX_AMOUNT.to_string(), "1000000000000.00");
        assert!(!MAX_AMOUNT.exceeds_limit());
        assert!((-MAX_AMOUNT).abs() == MAX_AMOUNT);
        assert!(Money::new(100_000_000_000_001, 2).exceeds_limit());
        assert!(Money::new(-100_000_000_000_001, 2).exceeds_limit());
    }

    #[test]
    fn currency_scale_ignores_trailing_zeros() {
        assert!(Money::new(1050, 2).has_currency_scale());
        assert!(Money::new(10500, 3).has_currency_scale());
        assert!(Money::new(7, 0).has_currency_scale());
        assert!(!Money::new(10005, 3).has_currency_scale());
    }

    #[test]
    fn equality_ignores_scale() {
        assert_eq!(Money::new(3000, 2), Money::new(30, 0));
    }

    #[test]
    fn parses_and_displays_with_scale() {
        let m: Money = "90.00".parse().unwrap();
        assert_eq!(m.to_string(), "90.00");
        assert!("ninety".parse::<Money>().is_err());
    }

    #[test]
    fn sums_and_signs() {
        let total: Money = [Money::new(333, 2), Money::new(333, 2), Money::new(333, 2)]
            .iter()
            .sum();
        assert_eq!(total, Money::new(999, 2));
        assert!((-total).is_negative());
        assert_eq!((-total).abs(), total);
        assert_eq!(total.min(Money::new(5, 0)), Money::new(5, 0));
    }
}
