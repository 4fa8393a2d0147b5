//! Subscription tier model
//!
//! Defines the ordered set of subscription tiers and the comparison rules
//! the access gate builds on. The ordering is total: free < premium < vip,
//! compared by integer rank.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subscription tier levels
///
/// Declaration order defines the access hierarchy; `Ord` and `rank()` agree
/// by construction. Content gated at a tier is visible to that tier and
/// every tier above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Public content, never gated
    Free,
    /// Paid entry tier
    Premium,
    /// Top tier, sees everything
    Vip,
}

impl Tier {
    /// Integer rank used for access comparison: free=0, premium=1, vip=2
    pub fn rank(self) -> u8 {
        match self {
            Tier::Free => 0,
            Tier::Premium => 1,
            Tier::Vip => 2,
        }
    }

    /// True when `self` meets or exceeds `required`
    pub fn at_least(self, required: Tier) -> bool {
        self.rank() >= required.rank()
    }

    /// Parse a tier value coming from the database or an external collaborator.
    ///
    /// Fail-closed: anything unrecognized maps to `Free`, so a corrupt or
    /// future tier value denies gated content rather than leaking it.
    pub fn from_db_value(value: &str) -> Tier {
        value.parse().unwrap_or(Tier::Free)
    }

    /// Canonical lowercase string form (matches serde representation)
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Premium => "premium",
            Tier::Vip => "vip",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = Error;

    /// Strict parse for API input; unknown values are an error here.
    /// Use [`Tier::from_db_value`] at the database boundary instead.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "free" => Ok(Tier::Free),
            "premium" => Ok(Tier::Premium),
            "vip" => Ok(Tier::Vip),
            other => Err(Error::InvalidInput(format!("Unknown tier: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_defines_total_order() {
        assert!(Tier::Free.rank() < Tier::Premium.rank());
        assert!(Tier::Premium.rank() < Tier::Vip.rank());
        assert!(Tier::Free < Tier::Premium);
        assert!(Tier::Premium < Tier::Vip);
    }

    #[test]
    fn every_tier_meets_free() {
        for tier in [Tier::Free, Tier::Premium, Tier::Vip] {
            assert!(tier.at_least(Tier::Free));
        }
    }

    #[test]
    fn at_least_matches_rank_comparison() {
        let tiers = [Tier::Free, Tier::Premium, Tier::Vip];
        for a in tiers {
            for b in tiers {
                assert_eq!(a.at_least(b), a.rank() >= b.rank());
            }
        }
    }

    #[test]
    fn db_parse_fails_closed() {
        assert_eq!(Tier::from_db_value("vip"), Tier::Vip);
        assert_eq!(Tier::from_db_value("premium"), Tier::Premium);
        assert_eq!(Tier::from_db_value("platinum"), Tier::Free);
        assert_eq!(Tier::from_db_value(""), Tier::Free);
        assert_eq!(Tier::from_db_value("VIP"), Tier::Free);
    }

    #[test]
    fn strict_parse_rejects_unknown() {
        assert!("gold".parse::<Tier>().is_err());
        assert_eq!("vip".parse::<Tier>().unwrap(), Tier::Vip);
    }

    #[test]
    fn serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Tier::Vip).unwrap(), "\"vip\"");
        let t: Tier = serde_json::from_str("\"premium\"").unwrap();
        assert_eq!(t, Tier::Premium);
    }
}
