//! A monetary amount bound to a currency.

use std::fmt;

use eyre::{bail, Result};

use crate::currency::Currency;

/// An amount of one specific currency. Arithmetic is only defined between
/// balances of the same currency; anything else is a currency mismatch.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Balance {
    /// Signed amount
    pub amount: f64,
    /// The currency the amount is denominated in
    pub currency: Currency,
}

impl Balance {
    /// Create a balance of `amount` units of `currency`.
    #[must_use]
    pub const fn new(amount: f64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Fail unless `other` is denominated in the same currency.
    fn ensure_same_currency(&self, other: &Self) -> Result<()> {
        if self.currency != other.currency {
            bail!(
                "currency mismatch: {} vs {}",
                self.currency,
                other.currency
            );
        }
        Ok(())
    }

    /// Sum of two balances of the same currency.
    ///
    /// # Errors
    ///
    /// Returns a currency-mismatch error when the currencies differ.
    pub fn try_add(&self, other: &Self) -> Result<Self> {
        self.ensure_same_currency(other)?;
        Ok(Self::new(self.amount + other.amount, self.currency))
    }

    /// Difference of two balances of the same currency.
    ///
    /// # Errors
    ///
    /// Returns a currency-mismatch error when the currencies differ.
    pub fn try_sub(&self, other: &Self) -> Result<Self> {
        self.ensure_same_currency(other)?;
        Ok(Self::new(self.amount - other.amount, self.currency))
    }

    /// Dimensionless ratio of two balances of the same currency.
    ///
    /// # Errors
    ///
    /// Returns a currency-mismatch error when the currencies differ.
    pub fn ratio(&self, other: &Self) -> Result<f64> {
        self.ensure_same_currency(other)?;
        Ok(self.amount / other.amount)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_currency_arithmetic() {
        let a = Balance::new(100.0, Currency::Usd);
        let b = Balance::new(40.0, Currency::Usd);

        let sum = a.try_add(&b).unwrap();
        assert_eq!(sum, Balance::new(140.0, Currency::Usd));

        let diff = a.try_sub(&b).unwrap();
        assert_eq!(diff, Balance::new(60.0, Currency::Usd));
        assert_eq!(diff.currency, Currency::Usd);

        let ratio = a.ratio(&b).unwrap();
        assert!((ratio - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_cross_currency_fails() {
        let usd = Balance::new(100.0, Currency::Usd);
        let eur = Balance::new(100.0, Currency::Eur);

        for err in [
            usd.try_add(&eur).err().unwrap(),
            usd.try_sub(&eur).err().unwrap(),
            usd.ratio(&eur).err().unwrap(),
        ] {
            assert!(err.to_string().contains("currency mismatch"));
        }
    }

    #[test]
    fn test_venue_fiat_is_not_bank_fiat() {
        let bank = Balance::new(1.0, Currency::Rub);
        let venue = Balance::new(1.0, Currency::BinanceRub);
        assert!(bank.try_add(&venue).is_err());
    }

    #[test]
    fn test_display() {
        let b = Balance::new(98.5, Currency::Usdt);
        assert_eq!(b.to_string(), "98.5 USDT");
    }
}
