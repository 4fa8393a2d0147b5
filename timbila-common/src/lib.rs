//! # Timbila Common Library
//!
//! Shared code for the Timbila access and checkout services including:
//! - Subscription tier model and ordering
//! - Plan catalog and payment-method fee policies
//! - Money arithmetic (integer centavos)
//! - Common error types
//! - Configuration loading
//! - Database initialization
//! - API authentication helpers

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod money;
pub mod plan;
pub mod tier;

pub use error::{Error, Result};
pub use money::{Centavos, FeePolicy};
pub use plan::{PaymentMethodId, PlanId, PlanOffer};
pub use tier::Tier;
