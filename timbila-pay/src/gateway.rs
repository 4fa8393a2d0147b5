//! Payment gateway seam
//!
//! The real M-Pesa/PayPal processing happens in an external collaborator;
//! this service only needs its verdict. The trait keeps the state machine
//! testable with scripted outcomes, and the in-process gateway gives the
//! binary a deterministic default.

use async_trait::async_trait;

use crate::checkout::{CheckoutSession, PaymentOutcome};

/// External payment processing collaborator
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Submit a confirmed session for settlement.
    ///
    /// Only called with sessions in the processing step. The gateway owns
    /// its own timeouts and retries; a verdict always comes back.
    async fn submit_payment(&self, session: &CheckoutSession) -> PaymentOutcome;
}

/// Deterministic in-process gateway used by the binary and most tests:
/// every payment settles, with a reference derived from the session id.
#[derive(Debug, Default, Clone)]
pub struct InProcessGateway;

#[async_trait]
impl PaymentGateway for InProcessGateway {
    async fn submit_payment(&self, session: &CheckoutSession) -> PaymentOutcome {
        PaymentOutcome::Success {
            transaction_ref: format!("TX-{}", session.id.simple()),
        }
    }
}

/// Gateway that always rejects; for exercising the failed path in tests
#[derive(Debug, Clone)]
pub struct RejectingGateway {
    pub reason: String,
}

#[async_trait]
impl PaymentGateway for RejectingGateway {
    async fn submit_payment(&self, _session: &CheckoutSession) -> PaymentOutcome {
        PaymentOutcome::Failure {
            reason: self.reason.clone(),
        }
    }
}
