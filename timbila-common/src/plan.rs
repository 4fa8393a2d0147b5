//! Plan catalog and payment-method definitions
//!
//! The purchasable plans (premium, vip) and the payment methods that can
//! settle them. Fee policies live on the method; price lives on the offer.

use crate::money::{Centavos, FeePolicy};
use crate::tier::Tier;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a purchasable plan
///
/// Free is not an offer; it is the absence of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanId {
    Premium,
    Vip,
}

impl PlanId {
    /// The tier a subscriber on this plan holds
    pub fn tier(self) -> Tier {
        match self {
            PlanId::Premium => Tier::Premium,
            PlanId::Vip => Tier::Vip,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlanId::Premium => "premium",
            PlanId::Vip => "vip",
        }
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "premium" => Ok(PlanId::Premium),
            "vip" => Ok(PlanId::Vip),
            other => Err(Error::InvalidInput(format!("Unknown plan: {}", other))),
        }
    }
}

/// A purchasable subscription offer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanOffer {
    pub id: PlanId,
    pub display_name: String,
    /// Monthly price in centavos
    pub monthly_price: Centavos,
    pub description: String,
}

/// Identifier of a supported payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethodId {
    Mpesa,
    Paypal,
}

impl PaymentMethodId {
    /// Surcharge rule this method applies at checkout
    pub fn fee_policy(self) -> FeePolicy {
        match self {
            PaymentMethodId::Mpesa => FeePolicy::Flat { amount: 0 },
            PaymentMethodId::Paypal => FeePolicy::Percentage { basis_points: 350 },
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PaymentMethodId::Mpesa => "M-Pesa",
            PaymentMethodId::Paypal => "PayPal",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethodId::Mpesa => "mpesa",
            PaymentMethodId::Paypal => "paypal",
        }
    }
}

impl fmt::Display for PaymentMethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethodId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mpesa" => Ok(PaymentMethodId::Mpesa),
            "paypal" => Ok(PaymentMethodId::Paypal),
            other => Err(Error::UnknownPaymentMethod(other.to_string())),
        }
    }
}

/// Surcharge for `base` when paid via `method`
pub fn compute_fee(base: Centavos, method: PaymentMethodId) -> Result<Centavos> {
    method.fee_policy().fee(base)
}

/// Total charge for `base` when paid via `method`
pub fn compute_total(base: Centavos, method: PaymentMethodId) -> Result<Centavos> {
    method.fee_policy().total(base)
}

/// Plan catalog seeded into a fresh database
///
/// Prices in centavos of metical (MT 149.00 / MT 299.00 monthly).
pub fn default_plan_offers() -> Vec<PlanOffer> {
    vec![
        PlanOffer {
            id: PlanId::Premium,
            display_name: "Premium".to_string(),
            monthly_price: 14_900,
            description: "Gated posts, premium events and early releases".to_string(),
        },
        PlanOffer {
            id: PlanId::Vip,
            display_name: "VIP".to_string(),
            monthly_price: 29_900,
            description: "Everything in Premium plus VIP-only communities".to_string(),
        },
    ]
}
