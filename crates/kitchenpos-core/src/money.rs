//! # Money Module
//!
//! Provides the `Money` type used for product and menu prices.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  MENU PRICE CHECK                                                       │
//! │                                                                         │
//! │  Set menu "Fried + Seasoned"  price 19000                               │
//! │     ├── Fried chicken   16000 × 1 = 16000                               │
//! │     └── Seasoned chicken 16000 × 1 = 16000                              │
//! │                                    ─────                                │
//! │                             sum =  32000   → 19000 <= 32000 ✓           │
//! │                                                                         │
//! │  With floats the comparison could flip on rounding noise.              │
//! │  With integer minor units it is exact.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kitchenpos_core::money::Money;
//!
//! let fried = Money::from_minor(16000);
//! let set_menu = fried
//!     .checked_mul(2)
//!     .and_then(|two| two.checked_add(Money::from_minor(500)));
//! assert_eq!(set_menu, Some(Money::from_minor(32500)));
//!
//! // Quantities come from callers, so overflow is a value, not a panic
//! assert_eq!(fried.checked_mul(i64::MAX), None);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: a negative value can be *represented* so that
///   validation can reject it with a precise error instead of failing to
///   deserialize
/// - **Transparent serde**: serializes as a bare integer
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(transparent))]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_minor(amount: i64) -> Self {
        Money(amount)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(amount) => Some(Money(amount)),
            None => None,
        }
    }

    /// Multiplies a unit price by a quantity, returning `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use kitchenpos_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(16000);
    /// assert_eq!(unit_price.checked_mul(3), Some(Money::from_minor(48000)));
    /// ```
    #[inline]
    pub const fn checked_mul(self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(amount) => Some(Money(amount)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Displays the raw minor-unit amount; currency formatting belongs to the UI.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(16000);
        assert_eq!(money.minor(), 16000);
        assert!(!money.is_negative());
        assert!(Money::from_minor(-1).is_negative());
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!(a.checked_add(b), Some(Money::from_minor(1500)));
        assert_eq!(a.checked_mul(3), Some(Money::from_minor(3000)));
        assert_eq!(a.checked_mul(-2), Some(Money::from_minor(-2000)));
        assert_eq!(Money::zero().checked_mul(i64::MAX), Some(Money::zero()));
    }

    #[test]
    fn test_overflow_is_none() {
        let price = Money::from_minor(16000);

        assert_eq!(price.checked_mul(i64::MAX / 1000), None);
        assert_eq!(Money::from_minor(i64::MAX).checked_add(Money::from_minor(1)), None);
        assert_eq!(Money::from_minor(i64::MIN).checked_mul(-1), None);
    }

    #[test]
    fn test_serializes_as_integer() {
        let json = serde_json::to_string(&Money::from_minor(19000)).unwrap();
        assert_eq!(json, "19000");

        let parsed: Money = serde_json::from_str("-5").unwrap();
        assert!(parsed.is_negative());
    }
}
