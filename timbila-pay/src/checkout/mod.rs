//! Checkout session state machine
//!
//! A linear wizard: methods -> form -> confirmation, then processing once
//! the buyer confirms, ending in done or failed. Transitions are the only
//! mutators; every other call is an illegal transition that leaves the
//! session untouched. Sessions live in memory only and are discarded on
//! completion or cancel.

pub mod validate;

pub use validate::{CardDetails, PaymentDetails};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use timbila_common::{Centavos, PaymentMethodId, PlanOffer};
use uuid::Uuid;

use crate::error::{PayError, Result};

/// Where a checkout session currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    /// Choosing a payment method
    Methods,
    /// Entering method-specific details
    Form,
    /// Reviewing plan, method, and total before paying
    Confirmation,
    /// Payment handed to the gateway
    Processing,
    /// Terminal: payment settled
    Done,
    /// Terminal: payment rejected
    Failed,
}

impl CheckoutStep {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckoutStep::Methods => "methods",
            CheckoutStep::Form => "form",
            CheckoutStep::Confirmation => "confirmation",
            CheckoutStep::Processing => "processing",
            CheckoutStep::Done => "done",
            CheckoutStep::Failed => "failed",
        }
    }

    /// Terminal steps accept no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, CheckoutStep::Done | CheckoutStep::Failed)
    }
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of the external payment gateway call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Success { transaction_ref: String },
    Failure { reason: String },
}

/// One in-progress checkout, owned by a single buyer interaction.
///
/// Step invariants hold by construction:
/// - form, confirmation, processing, done imply a selected method
/// - confirmation, processing, done imply stored details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: Uuid,
    pub plan: PlanOffer,
    pub method: Option<PaymentMethodId>,
    pub details: Option<PaymentDetails>,
    pub step: CheckoutStep,
    pub transaction_ref: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CheckoutSession {
    /// Start a new session in the methods step
    pub fn new(plan: PlanOffer) -> Self {
        Self {
            id: Uuid::new_v4(),
            plan,
            method: None,
            details: None,
            step: CheckoutStep::Methods,
            transaction_ref: None,
            failure_reason: None,
            created_at: Utc::now(),
        }
    }

    fn illegal(&self, action: &str) -> PayError {
        PayError::IllegalTransition {
            from: self.step.to_string(),
            action: action.to_string(),
        }
    }

    /// methods -> form, recording the chosen method
    pub fn select_method(&mut self, method: PaymentMethodId) -> Result<()> {
        if self.step != CheckoutStep::Methods {
            return Err(self.illegal("select method"));
        }
        self.method = Some(method);
        self.step = CheckoutStep::Form;
        Ok(())
    }

    /// form -> confirmation, validating the payload first.
    ///
    /// On a validation error nothing is stored and the step stays form.
    pub fn submit(&mut self, details: PaymentDetails) -> Result<()> {
        if self.step != CheckoutStep::Form {
            return Err(self.illegal("submit details"));
        }
        let method = self.method.ok_or_else(|| self.illegal("submit details"))?;
        validate::validate_details(method, &details)?;
        self.details = Some(details);
        self.step = CheckoutStep::Confirmation;
        Ok(())
    }

    /// form -> methods (clearing the method and any stale details) or
    /// confirmation -> form (retaining details for editing)
    pub fn back(&mut self) -> Result<()> {
        match self.step {
            CheckoutStep::Form => {
                self.method = None;
                self.details = None;
                self.step = CheckoutStep::Methods;
                Ok(())
            }
            CheckoutStep::Confirmation => {
                self.step = CheckoutStep::Form;
                Ok(())
            }
            _ => Err(self.illegal("go back")),
        }
    }

    /// confirmation -> processing; the caller then runs the gateway and
    /// reports back via [`CheckoutSession::complete`]
    pub fn confirm(&mut self) -> Result<()> {
        if self.step != CheckoutStep::Confirmation {
            return Err(self.illegal("confirm"));
        }
        self.step = CheckoutStep::Processing;
        Ok(())
    }

    /// processing -> done or failed, as the gateway decided
    pub fn complete(&mut self, outcome: PaymentOutcome) -> Result<()> {
        if self.step != CheckoutStep::Processing {
            return Err(self.illegal("complete"));
        }
        match outcome {
            PaymentOutcome::Success { transaction_ref } => {
                self.transaction_ref = Some(transaction_ref);
                self.step = CheckoutStep::Done;
            }
            PaymentOutcome::Failure { reason } => {
                self.failure_reason = Some(reason);
                self.step = CheckoutStep::Failed;
            }
        }
        Ok(())
    }

    /// Surcharge for the selected method; None before a method is chosen
    pub fn fee(&self) -> Result<Option<Centavos>> {
        match self.method {
            Some(method) => {
                let fee = timbila_common::plan::compute_fee(self.plan.monthly_price, method)
                    .map_err(PayError::Common)?;
                Ok(Some(fee))
            }
            None => Ok(None),
        }
    }

    /// Total due for the selected method; None before a method is chosen
    pub fn total(&self) -> Result<Option<Centavos>> {
        match self.method {
            Some(method) => {
                let total = timbila_common::plan::compute_total(self.plan.monthly_price, method)
                    .map_err(PayError::Common)?;
                Ok(Some(total))
            }
            None => Ok(None),
        }
    }
}
