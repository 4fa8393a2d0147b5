//! Access evaluation for tier-gated resources
//!
//! Pure decision functions over already-fetched data: no I/O, no shared
//! state, safe to call from any handler. The one policy decision that
//! matters lives here: an inactive or expired subscription is treated as
//! free tier, so lapsed premium/vip subscribers never retain gated access.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use timbila_common::Tier;

/// Minimum tier attached to a content resource (post, event, gallery
/// item, member list)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequirement {
    pub required_tier: Tier,
}

impl AccessRequirement {
    pub fn new(required_tier: Tier) -> Self {
        Self { required_tier }
    }

    /// Events above free tier are presented as "exclusive"
    pub fn is_exclusive(&self) -> bool {
        self.required_tier != Tier::Free
    }
}

/// A viewer's subscription as recorded by the billing collaborator.
///
/// Read-only to this service; refreshed on login or subscription change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerSubscription {
    pub tier: Tier,
    pub active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ViewerSubscription {
    /// True when the subscription is usable at `now`
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        if !self.active {
            return false;
        }
        match self.expires_at {
            Some(expires_at) => expires_at > now,
            None => true,
        }
    }

    /// Tier this subscription actually grants at `now`.
    ///
    /// Fail-closed: inactive or expired folds to free regardless of the
    /// stored tier value.
    pub fn effective_tier(&self, now: DateTime<Utc>) -> Tier {
        if self.is_active_at(now) {
            self.tier
        } else {
            Tier::Free
        }
    }
}

/// Decide whether a viewer may see a gated resource.
///
/// Free-tier requirements are always allowed, including for anonymous
/// viewers (`None`) and inactive subscriptions: public content is never
/// gated. Everything else requires an active subscription whose effective
/// tier meets the requirement.
pub fn can_access(
    viewer: Option<&ViewerSubscription>,
    requirement: &AccessRequirement,
    now: DateTime<Utc>,
) -> bool {
    if requirement.required_tier == Tier::Free {
        return true;
    }
    match viewer {
        None => false,
        Some(sub) => sub.effective_tier(now).at_least(requirement.required_tier),
    }
}
