//! Checkout field validation
//!
//! Each payment method requires its own form fields. Validation runs on
//! submit, before the session advances to confirmation; a failure leaves
//! the session in the form step with nothing stored.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use timbila_common::PaymentMethodId;

use crate::error::{PayError, Result};

/// Mozambican mobile number: optional 258 country code, then a 9-digit
/// msisdn starting 82-87. No spaces or punctuation; "84 123 4567" is
/// rejected as entered.
static MSISDN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+?258)?8[2-7][0-9]{7}$").unwrap());

/// Minimal local@domain.tld shape; full RFC 5322 is the gateway's problem
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Card expiry as MM/YY
static EXPIRY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(0[1-9]|1[0-2])/[0-9]{2}$").unwrap());

/// Method-specific form payload collected in the form step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum PaymentDetails {
    Mpesa {
        phone: String,
    },
    Paypal {
        email: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        card: Option<CardDetails>,
    },
}

impl PaymentDetails {
    /// The method this payload belongs to
    pub fn method(&self) -> PaymentMethodId {
        match self {
            PaymentDetails::Mpesa { .. } => PaymentMethodId::Mpesa,
            PaymentDetails::Paypal { .. } => PaymentMethodId::Paypal,
        }
    }
}

/// Card fields for card-funded PayPal checkouts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetails {
    pub number: String,
    /// MM/YY
    pub expiry: String,
    pub cvv: String,
    pub holder: String,
}

/// Validate a submitted payload against the selected method.
///
/// The payload variant must match the method chosen in the methods step;
/// submitting M-Pesa details on a PayPal checkout is a validation error,
/// not an illegal transition.
pub fn validate_details(selected: PaymentMethodId, details: &PaymentDetails) -> Result<()> {
    if details.method() != selected {
        return Err(PayError::validation(
            "method",
            format!(
                "Details are for {} but {} was selected",
                details.method(),
                selected
            ),
        ));
    }

    match details {
        PaymentDetails::Mpesa { phone } => validate_msisdn(phone),
        PaymentDetails::Paypal { email, card } => {
            validate_email(email)?;
            if let Some(card) = card {
                validate_card(card)?;
            }
            Ok(())
        }
    }
}

fn validate_msisdn(phone: &str) -> Result<()> {
    if phone.trim().is_empty() {
        return Err(PayError::validation("phone", "Phone number is required"));
    }
    if !MSISDN_RE.is_match(phone) {
        return Err(PayError::validation(
            "phone",
            "Must be a Mozambican mobile number (8XXXXXXXX, optional 258 prefix, no spaces)",
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(PayError::validation("email", "Email is required"));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(PayError::validation("email", "Not a valid email address"));
    }
    Ok(())
}

fn validate_card(card: &CardDetails) -> Result<()> {
    let digits: String = card.number.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.is_empty() {
        return Err(PayError::validation("card.number", "Card number is required"));
    }
    if !(13..=19).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(PayError::validation(
            "card.number",
            "Card number must be 13-19 digits",
        ));
    }

    if !EXPIRY_RE.is_match(&card.expiry) {
        return Err(PayError::validation("card.expiry", "Expiry must be MM/YY"));
    }

    if !(3..=4).contains(&card.cvv.len()) || !card.cvv.chars().all(|c| c.is_ascii_digit()) {
        return Err(PayError::validation("card.cvv", "CVV must be 3 or 4 digits"));
    }

    if card.holder.trim().is_empty() {
        return Err(PayError::validation("card.holder", "Card holder is required"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mpesa(phone: &str) -> PaymentDetails {
        PaymentDetails::Mpesa {
            phone: phone.to_string(),
        }
    }

    fn paypal(email: &str, card: Option<CardDetails>) -> PaymentDetails {
        PaymentDetails::Paypal {
            email: email.to_string(),
            card,
        }
    }

    fn card() -> CardDetails {
        CardDetails {
            number: "4111 1111 1111 1111".to_string(),
            expiry: "09/27".to_string(),
            cvv: "123".to_string(),
            holder: "Ana Macamo".to_string(),
        }
    }

    #[test]
    fn accepts_valid_msisdns() {
        for phone in ["841234567", "871234567", "258841234567", "+258841234567"] {
            assert!(
                validate_details(PaymentMethodId::Mpesa, &mpesa(phone)).is_ok(),
                "{} should be accepted",
                phone
            );
        }
    }

    #[test]
    fn rejects_spaced_msisdn() {
        let err = validate_details(PaymentMethodId::Mpesa, &mpesa("84 123 4567")).unwrap_err();
        assert!(matches!(err, PayError::Validation { ref field, .. } if field == "phone"));
    }

    #[test]
    fn rejects_malformed_msisdns() {
        for phone in ["", "84123456", "8412345678", "941234567", "811234567", "phone"] {
            assert!(
                validate_details(PaymentMethodId::Mpesa, &mpesa(phone)).is_err(),
                "{} should be rejected",
                phone
            );
        }
    }

    #[test]
    fn paypal_requires_plausible_email() {
        assert!(validate_details(PaymentMethodId::Paypal, &paypal("ana@example.com", None)).is_ok());
        for email in ["", "ana", "ana@", "@example.com", "ana example@x.com", "ana@nodot"] {
            assert!(
                validate_details(PaymentMethodId::Paypal, &paypal(email, None)).is_err(),
                "{} should be rejected",
                email
            );
        }
    }

    #[test]
    fn card_fields_all_required_when_present() {
        assert!(validate_details(PaymentMethodId::Paypal, &paypal("a@b.co", Some(card()))).is_ok());

        let mut bad = card();
        bad.number = "4111".to_string();
        assert!(validate_details(PaymentMethodId::Paypal, &paypal("a@b.co", Some(bad))).is_err());

        let mut bad = card();
        bad.expiry = "13/27".to_string();
        assert!(validate_details(PaymentMethodId::Paypal, &paypal("a@b.co", Some(bad))).is_err());

        let mut bad = card();
        bad.cvv = "12".to_string();
        assert!(validate_details(PaymentMethodId::Paypal, &paypal("a@b.co", Some(bad))).is_err());

        let mut bad = card();
        bad.holder = "  ".to_string();
        assert!(validate_details(PaymentMethodId::Paypal, &paypal("a@b.co", Some(bad))).is_err());
    }

    #[test]
    fn mismatched_method_is_validation_error() {
        let err = validate_details(PaymentMethodId::Paypal, &mpesa("841234567")).unwrap_err();
        assert!(matches!(err, PayError::Validation { ref field, .. } if field == "method"));
    }

    #[test]
    fn details_deserialize_by_method_tag() {
        let details: PaymentDetails =
            serde_json::from_str(r#"{"method":"mpesa","phone":"841234567"}"#).unwrap();
        assert_eq!(details.method(), PaymentMethodId::Mpesa);

        let details: PaymentDetails =
            serde_json::from_str(r#"{"method":"paypal","email":"ana@example.com"}"#).unwrap();
        assert_eq!(details.method(), PaymentMethodId::Paypal);
    }
}
