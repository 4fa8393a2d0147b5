//! Money arithmetic for checkout totals
//!
//! All amounts are integers in the currency's smallest unit (centavos).
//! Fee computation never touches floating point: percentage surcharges are
//! expressed in basis points and rounded half-up with integer arithmetic,
//! so repeated computation of the same total cannot drift.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Monetary amount in the currency's smallest unit
pub type Centavos = i64;

/// Surcharge rule a payment method applies to a base price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FeePolicy {
    /// Fixed surcharge in centavos (0 for methods with no fee)
    Flat { amount: Centavos },
    /// Percentage surcharge in basis points (350 = 3.5%)
    Percentage { basis_points: u32 },
}

impl FeePolicy {
    /// Compute the surcharge for `base`.
    ///
    /// Percentage fees round half-up on the smallest unit. Negative base
    /// prices are invalid input, not a discount.
    pub fn fee(&self, base: Centavos) -> Result<Centavos> {
        if base < 0 {
            return Err(Error::InvalidAmount(format!(
                "Base price must be non-negative, got {}",
                base
            )));
        }

        match self {
            FeePolicy::Flat { amount } => Ok(*amount),
            FeePolicy::Percentage { basis_points } => {
                // Half-up rounding: numerator + half the denominator, then
                // integer divide. Denominator is fixed at 10_000 (basis points).
                let bp = i64::from(*basis_points);
                Ok((base * bp + 5_000) / 10_000)
            }
        }
    }

    /// Base price plus surcharge
    pub fn total(&self, base: Centavos) -> Result<Centavos> {
        Ok(base + self.fee(base)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYPAL: FeePolicy = FeePolicy::Percentage { basis_points: 350 };
    const MPESA: FeePolicy = FeePolicy::Flat { amount: 0 };

    #[test]
    fn flat_zero_adds_nothing() {
        assert_eq!(MPESA.fee(1000).unwrap(), 0);
        assert_eq!(MPESA.total(1000).unwrap(), 1000);
    }

    #[test]
    fn percentage_rounds_half_up() {
        // 3.5% of 1000 = 35 exactly
        assert_eq!(PAYPAL.fee(1000).unwrap(), 35);
        assert_eq!(PAYPAL.total(1000).unwrap(), 1035);

        // 3.5% of 10 = 0.35 -> rounds down to 0
        assert_eq!(PAYPAL.fee(10).unwrap(), 0);
        // 3.5% of 15 = 0.525 -> rounds up to 1
        assert_eq!(PAYPAL.fee(15).unwrap(), 1);
        // 3.5% of 100 = 3.5 -> exactly half, rounds up to 4
        assert_eq!(PAYPAL.fee(100).unwrap(), 4);
    }

    #[test]
    fn zero_base_is_valid() {
        assert_eq!(PAYPAL.total(0).unwrap(), 0);
        assert_eq!(MPESA.total(0).unwrap(), 0);
    }

    #[test]
    fn negative_base_is_invalid() {
        assert!(matches!(MPESA.fee(-1), Err(Error::InvalidAmount(_))));
        assert!(matches!(PAYPAL.total(-500), Err(Error::InvalidAmount(_))));
    }
}
