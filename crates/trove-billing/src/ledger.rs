//! Credit ledger adapter.
//!
//! The ledger is an external service: atomic debit, success/failure plus an
//! optional new balance. A declined debit is NOT an error at this seam — it
//! is a normal [`DeductOutcome`] with `success = false`; errors are reserved
//! for transport and protocol failures.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::LedgerError;

/// One debit request against an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeductRequest {
    pub account_id: String,
    /// Amount in cents (1 credit = 1 cent).
    pub amount_cents: u64,
    /// Short human-readable description shown on the ledger statement.
    pub description: String,
    /// Ledger usage category, e.g. `"usage"`.
    pub usage_type: String,
    /// Conversation/thread the charge is attributed to, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
}

/// Result of a debit attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeductOutcome {
    pub success: bool,
    /// New balance in dollars, when the ledger reports one. Observability
    /// only; callers never block on it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Seam over the external credit ledger. Implemented over HTTP in production
/// and by in-memory fakes in workflow tests.
pub trait CreditLedger {
    /// Attempt an atomic debit.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] only for transport or protocol failures; a
    /// declined debit is a successful call with `outcome.success == false`.
    fn deduct(
        &self,
        request: &DeductRequest,
    ) -> impl Future<Output = Result<DeductOutcome, LedgerError>> + Send;
}

/// HTTP implementation against the internal ledger service.
pub struct HttpCreditLedger {
    http: reqwest::Client,
    base_url: String,
    service_token: String,
}

impl HttpCreditLedger {
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(base_url: impl Into<String>, service_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent("trove/0.1")
                .timeout(Duration::from_secs(10))
                .build()
                .expect("reqwest client should build"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_token: service_token.into(),
        }
    }
}

impl CreditLedger for HttpCreditLedger {
    async fn deduct(&self, request: &DeductRequest) -> Result<DeductOutcome, LedgerError> {
        let resp = self
            .http
            .post(format!("{}/credits/deduct", self.base_url))
            .bearer_auth(&self.service_token)
            .json(request)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LedgerError::Api {
                status: status.as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }
        let outcome: DeductOutcome = resp.json().await?;
        if outcome.success {
            if let Some(balance) = outcome.new_balance {
                tracing::info!(
                    account_id = %request.account_id,
                    amount_cents = request.amount_cents,
                    new_balance = balance,
                    "credits deducted"
                );
            }
        } else {
            tracing::warn!(
                account_id = %request.account_id,
                amount_cents = request.amount_cents,
                error = outcome.error.as_deref().unwrap_or("unknown"),
                "credit deduction declined"
            );
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_wire_shape() {
        let request = DeductRequest {
            account_id: "acct_1".to_string(),
            amount_cents: 75,
            description: "Webset creation: 10 results requested".to_string(),
            usage_type: "usage".to_string(),
            context_id: None,
        };
        let wire = serde_json::to_value(&request).unwrap();
        assert_eq!(wire["amount_cents"], 75);
        assert!(wire.get("context_id").is_none());
    }

    #[test]
    fn outcome_parses_with_balance() {
        let outcome: DeductOutcome =
            serde_json::from_str(r#"{"success": true, "new_balance": 12.5}"#).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.new_balance, Some(12.5));
    }

    #[test]
    fn outcome_parses_decline() {
        let outcome: DeductOutcome =
            serde_json::from_str(r#"{"success": false, "error": "insufficient balance"}"#).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("insufficient balance"));
    }
}
