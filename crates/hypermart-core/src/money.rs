//! # Integer Cents
//!
//! Every amount in the system is an `i64` count of cents wrapped in
//! [`Money`]. Splitting $10.00 three ways as floats smears an unknowable
//! error across the results; splitting 1000 cents three ways loses
//! exactly one cent, and that cent is visible and accountable. Storage,
//! totals, and the UI boundary all stay in cents; only display code
//! renders decimal strings.
//!
//! ## Usage
//! ```rust
//! use hypermart_core::money::Money;
//!
//! let bananas = Money::from_cents(299);
//! let line: Money = bananas * 4;
//! assert_eq!(line.cents(), 1196);
//! assert_eq!(line.to_string(), "$11.96");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

/// A monetary value in the smallest currency unit.
///
/// Signed so refunds and corrections can go negative. The wrapper is
/// zero-cost over `i64` and serializes as a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Wraps a cent count.
    ///
    /// ```rust
    /// use hypermart_core::money::Money;
    /// assert_eq!(Money::from_cents(1099).cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Builds an amount from dollars and cents.
    ///
    /// For negative amounts put the sign on the major unit only:
    /// `from_major_minor(-5, 50)` is -$5.50.
    ///
    /// ```rust
    /// use hypermart_core::money::Money;
    /// assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        // The minor unit moves away from zero in the major's direction.
        let minor = if major < 0 { -minor } else { minor };
        Money(major * 100 + minor)
    }

    /// Parses a decimal amount as entered in a payment field.
    ///
    /// Accepts an optional `$` prefix and at most two decimal places.
    /// Returns `None` for anything else; payment input comes from free
    /// text, so the caller treats `None` as a validation failure.
    ///
    /// ```rust
    /// use hypermart_core::money::Money;
    /// assert_eq!(Money::parse("20"), Some(Money::from_cents(2000)));
    /// assert_eq!(Money::parse("20.5"), Some(Money::from_cents(2050)));
    /// assert_eq!(Money::parse("$20.00"), Some(Money::from_cents(2000)));
    /// assert_eq!(Money::parse("twenty"), None);
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim();
        let s = s.strip_prefix('$').unwrap_or(s);
        let (sign, s) = match s.strip_prefix('-') {
            Some(rest) => (-1i64, rest),
            None => (1i64, s),
        };
        if s.is_empty() {
            return None;
        }
        let (major, minor) = match s.split_once('.') {
            Some((maj, min)) => (maj, Some(min)),
            None => (s, None),
        };
        let major_cents = if major.is_empty() {
            // ".50" style input needs a fractional part to mean anything
            minor?;
            0
        } else {
            if !major.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            major.parse::<i64>().ok()? * 100
        };
        let minor_cents = match minor {
            None => 0,
            Some("") => 0,
            Some(m) => {
                if m.len() > 2 || !m.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                let v = m.parse::<i64>().ok()?;
                if m.len() == 1 {
                    v * 10
                } else {
                    v
                }
            }
        };
        Some(Money(sign * (major_cents + minor_cents)))
    }

    /// The raw cent count.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// The whole-dollar portion, truncated toward zero.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// The sub-dollar portion as a value in `0..=99`.
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Line total for `qty` units at this unit price.
    ///
    /// ```rust
    /// use hypermart_core::money::Money;
    /// let milk = Money::from_cents(349);
    /// assert_eq!(milk.multiply_quantity(2).cents(), 698);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Applies a fixed ratio expressed in basis points (6000 = 60%).
    ///
    /// Used by the profit estimate, which assumes cost is a fixed
    /// fraction of list price. Rounds half up.
    ///
    /// ```rust
    /// use hypermart_core::money::Money;
    /// let price = Money::from_cents(1000);
    /// assert_eq!(price.apply_ratio_bps(6000).cents(), 600);
    /// ```
    pub fn apply_ratio_bps(&self, ratio_bps: u32) -> Money {
        // i128 intermediate prevents overflow on large amounts
        let scaled = (self.0 as i128 * ratio_bps as i128 + 5000) / 10000;
        Money::from_cents(scaled as i64)
    }
}

// Receipt-style rendering ("-$5.50"). Locale-aware formatting belongs
// to the UI; this is for receipts, logs, and tests.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.abs();
        write!(f, "{}${}.{:02}", sign, cents / 100, cents % 100)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// Plain integer arithmetic under the hood. Mul takes both integer
// widths so `price * 2` works without casts at call sites.

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_accessors() {
        let price = Money::from_cents(349);
        assert_eq!(price.cents(), 349);
        assert_eq!(price.dollars(), 3);
        assert_eq!(price.cents_part(), 49);

        let refund = Money::from_cents(-550);
        assert_eq!(refund.dollars(), -5);
        assert_eq!(refund.cents_part(), 50);
        assert_eq!(refund.abs().cents(), 550);
    }

    #[test]
    fn test_major_minor_sign_handling() {
        assert_eq!(Money::from_major_minor(12, 34).cents(), 1234);
        assert_eq!(Money::from_major_minor(-12, 34).cents(), -1234);
        assert_eq!(Money::from_major_minor(0, 75).cents(), 75);
    }

    #[test]
    fn test_display_formats_sign_and_padding() {
        assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
        assert_eq!(Money::from_cents(500).to_string(), "$5.00");
        assert_eq!(Money::from_cents(7).to_string(), "$0.07");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::from_cents(0).to_string(), "$0.00");
    }

    #[test]
    fn test_operators() {
        let mut running = Money::from_cents(1000);
        running += Money::from_cents(250);
        assert_eq!(running.cents(), 1250);

        running -= Money::from_cents(50);
        assert_eq!(running.cents(), 1200);

        assert_eq!((running - Money::from_cents(1200)).cents(), 0);
        assert_eq!((Money::from_cents(299) * 3i32).cents(), 897);
        assert_eq!((Money::from_cents(299) * 3i64).cents(), 897);
    }

    #[test]
    fn test_parse_whole_and_fractional() {
        assert_eq!(Money::parse("20"), Some(Money::from_cents(2000)));
        assert_eq!(Money::parse("20.00"), Some(Money::from_cents(2000)));
        assert_eq!(Money::parse("20.5"), Some(Money::from_cents(2050)));
        assert_eq!(Money::parse("0.99"), Some(Money::from_cents(99)));
        assert_eq!(Money::parse(".75"), Some(Money::from_cents(75)));
        assert_eq!(Money::parse(" $12.34 "), Some(Money::from_cents(1234)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Money::parse(""), None);
        assert_eq!(Money::parse("twenty"), None);
        assert_eq!(Money::parse("20.999"), None);
        assert_eq!(Money::parse("20.x"), None);
        assert_eq!(Money::parse("$"), None);
        assert_eq!(Money::parse("1 2"), None);
    }

    #[test]
    fn test_apply_ratio() {
        assert_eq!(Money::from_cents(1000).apply_ratio_bps(6000).cents(), 600);
        // 999 * 0.6 = 599.4 rounds down to 599
        assert_eq!(Money::from_cents(999).apply_ratio_bps(6000).cents(), 599);
        assert_eq!(Money::zero().apply_ratio_bps(6000).cents(), 0);
    }

    #[test]
    fn test_sign_predicates() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_cents(1).is_positive());
        assert!(Money::from_cents(-1).is_negative());
        assert!(!Money::from_cents(-1).is_positive());
        assert!(!Money::zero().is_negative());
        assert_eq!(Money::default(), Money::zero());
    }

    /// Splitting $20.00 across three ways drops two whole cents. Integer
    /// cents make the shortfall exact instead of a float rounding haze.
    #[test]
    fn test_even_split_remainder_is_exact() {
        let pot = Money::from_cents(2000);
        let share = Money::from_cents(2000 / 3); // 666
        let regrouped: Money = share * 3; // 1998

        assert_eq!(regrouped.cents(), 1998);
        assert_eq!((pot - regrouped).cents(), 2);
    }
}
