//! Fixed-precision monetary values with strict same-currency arithmetic.

use core::cmp::Ordering;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MoneyError;

/// Currency of a monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// United States dollar.
    Usd,
    /// Euro.
    Eur,
    /// Pound sterling.
    Gbp,
    /// Japanese yen.
    Jpy,
}

impl Currency {
    /// Returns the ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Jpy => "JPY",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Rounding mode for fractional payouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundingMode {
    /// Round up.
    Up,
    /// Round down.
    Down,
    /// Round to nearest.
    Nearest,
}

/// A monetary amount with fixed 2-decimal precision.
///
/// Amounts are stored in minor units (cents), so arithmetic round-trips
/// exactly at 2 decimals. Every binary operation between two amounts of
/// different currencies fails. Values are immutable; arithmetic produces
/// new values.
///
/// # Example
///
/// ```
/// use twentyone::{Currency, Money};
///
/// let bet = Money::from_cents(1050, Currency::Usd);
/// let doubled = bet.try_add(bet).unwrap();
/// assert_eq!(doubled.cents(), 2100);
/// assert_eq!(doubled.to_string(), "21.00 USD");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    cents: i64,
    currency: Currency,
}

impl Money {
    /// Creates an amount from minor units (cents).
    #[must_use]
    pub const fn from_cents(cents: i64, currency: Currency) -> Self {
        Self { cents, currency }
    }

    /// Creates an amount from whole major units.
    #[must_use]
    pub const fn from_major(major: i64, currency: Currency) -> Self {
        Self {
            cents: major * 100,
            currency,
        }
    }

    /// Returns a zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self { cents: 0, currency }
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the currency.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns whether the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Returns whether the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.cents > 0
    }

    fn ensure_same_currency(&self, other: &Self) -> Result<(), MoneyError> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(MoneyError::CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            })
        }
    }

    /// Adds two amounts of the same currency.
    pub fn try_add(self, other: Self) -> Result<Self, MoneyError> {
        self.ensure_same_currency(&other)?;
        Ok(Self {
            cents: self.cents.saturating_add(other.cents),
            currency: self.currency,
        })
    }

    /// Subtracts an amount of the same currency.
    pub fn try_sub(self, other: Self) -> Result<Self, MoneyError> {
        self.ensure_same_currency(&other)?;
        Ok(Self {
            cents: self.cents.saturating_sub(other.cents),
            currency: self.currency,
        })
    }

    /// Compares two amounts of the same currency.
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering, MoneyError> {
        self.ensure_same_currency(other)?;
        Ok(self.cents.cmp(&other.cents))
    }

    /// Multiplies the amount by a small integer factor.
    #[must_use]
    pub const fn times(self, factor: i64) -> Self {
        Self {
            cents: self.cents.saturating_mul(factor),
            currency: self.currency,
        }
    }

    /// Multiplies the amount by a ratio, rounding to whole cents.
    ///
    /// Used for the blackjack bonus (e.g. a 3:2 table passes `1.5`).
    #[must_use]
    pub fn mul_ratio(self, ratio: f64, rounding: RoundingMode) -> Self {
        let raw = self.cents as f64 * ratio;
        let cents = match rounding {
            RoundingMode::Up => raw.ceil(),
            RoundingMode::Down => raw.floor(),
            RoundingMode::Nearest => raw.round(),
        };
        Self {
            cents: cents as i64,
            currency: self.currency,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        write!(
            f,
            "{sign}{}.{:02} {}",
            abs / 100,
            abs % 100,
            self.currency
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_round_trips_at_two_decimals() {
        let a = Money::from_cents(1005, Currency::Usd);
        let b = Money::from_cents(95, Currency::Usd);
        let sum = a.try_add(b).unwrap();
        assert_eq!(sum.cents(), 1100);
        assert_eq!(sum.try_sub(b).unwrap(), a);
        assert_eq!(sum.to_string(), "11.00 USD");
    }

    #[test]
    fn mixed_currency_operations_fail() {
        let usd = Money::from_major(10, Currency::Usd);
        let eur = Money::from_major(10, Currency::Eur);
        assert!(matches!(
            usd.try_add(eur),
            Err(MoneyError::CurrencyMismatch { .. })
        ));
        assert!(usd.try_sub(eur).is_err());
        assert!(usd.try_cmp(&eur).is_err());
    }

    #[test]
    fn ratio_rounding_modes() {
        let bet = Money::from_cents(1001, Currency::Usd);
        assert_eq!(bet.mul_ratio(1.5, RoundingMode::Down).cents(), 1501);
        assert_eq!(bet.mul_ratio(1.5, RoundingMode::Up).cents(), 1502);
        assert_eq!(bet.mul_ratio(1.5, RoundingMode::Nearest).cents(), 1502);
    }

    #[test]
    fn display_includes_sign_and_code() {
        let owed = Money::from_cents(-250, Currency::Gbp);
        assert_eq!(owed.to_string(), "-2.50 GBP");
    }
}
