//! Metered operation workflow.
//!
//! Couples a billable action to a credit debit. Rollback applies only to
//! webset creation: a freshly-created webset is safe to delete, but a search
//! or enrichment already dispatched for processing is not torn down over a
//! billing race — for those the failure is reported and the remote state
//! persists.

use trove_billing::{BillableOperation, CreditLedger, DeductRequest, pricing};
use trove_config::BillingMode;
use trove_core::ScopeContext;

use crate::backend::WebsetBackend;
use crate::error::WebsetsError;

/// How a billable action resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum ChargeOutcome {
    /// Ledger debited. Cost label for tool output.
    Charged { cost_label: String },
    /// Privileged mode: nothing debited, would-be cost annotated.
    Unmetered { cost_label: String },
    /// Ledger declined (or failed). Caller decides whether to roll back.
    Declined { required_credits: u64 },
}

impl ChargeOutcome {
    /// The cost string for tool output. Declines have none; they become
    /// failures before any output is built.
    #[must_use]
    pub fn cost_label(&self) -> Option<&str> {
        match self {
            Self::Charged { cost_label } | Self::Unmetered { cost_label } => Some(cost_label),
            Self::Declined { .. } => None,
        }
    }
}

/// Charge for one operation. A ledger transport failure counts as a decline:
/// usage must not proceed unbilled.
pub async fn charge<L: CreditLedger>(
    ledger: &L,
    mode: BillingMode,
    scope: &ScopeContext,
    operation: BillableOperation,
    description: String,
) -> ChargeOutcome {
    let credits = operation.credits();
    if mode == BillingMode::Unmetered {
        tracing::info!(credits, "unmetered mode, skipping ledger");
        return ChargeOutcome::Unmetered {
            cost_label: pricing::cost_label(credits, false),
        };
    }
    if credits == 0 {
        return ChargeOutcome::Charged {
            cost_label: pricing::cost_label(0, true),
        };
    }

    let request = DeductRequest {
        account_id: scope.owner_id.clone(),
        amount_cents: operation.cents(),
        description,
        usage_type: "usage".to_string(),
        context_id: Some(scope.scope_id.clone()),
    };
    match ledger.deduct(&request).await {
        Ok(outcome) if outcome.success => ChargeOutcome::Charged {
            cost_label: pricing::cost_label(credits, true),
        },
        Ok(_) => ChargeOutcome::Declined {
            required_credits: credits,
        },
        Err(e) => {
            tracing::error!(%e, "ledger call failed, treating as declined");
            ChargeOutcome::Declined {
                required_credits: credits,
            }
        }
    }
}

/// Charge for a webset creation; on decline, delete the just-created webset
/// (best-effort, its own failure swallowed) and fail with
/// [`WebsetsError::InsufficientCredits`].
///
/// # Errors
///
/// Returns [`WebsetsError::InsufficientCredits`] when the ledger declines.
pub async fn charge_for_creation<B: WebsetBackend, L: CreditLedger>(
    backend: &B,
    ledger: &L,
    mode: BillingMode,
    scope: &ScopeContext,
    webset_id: &str,
    requested_count: u64,
) -> Result<String, WebsetsError> {
    let outcome = charge(
        ledger,
        mode,
        scope,
        BillableOperation::Search { requested_count },
        format!("Webset creation: {requested_count} results requested"),
    )
    .await;
    match outcome {
        ChargeOutcome::Charged { cost_label } | ChargeOutcome::Unmetered { cost_label } => {
            Ok(cost_label)
        }
        ChargeOutcome::Declined { required_credits } => {
            if let Err(e) = backend.delete(webset_id).await {
                tracing::warn!(webset_id, %e, "rollback deletion failed");
            }
            Err(WebsetsError::InsufficientCredits {
                required: required_credits,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use trove_billing::{DeductOutcome, LedgerError};
    use trove_provider::{CreateWebsetParams, ProviderError, Webset, WebsetList};

    struct FakeLedger {
        accept: bool,
        calls: Mutex<u32>,
    }

    impl FakeLedger {
        fn new(accept: bool) -> Self {
            Self {
                accept,
                calls: Mutex::new(0),
            }
        }
    }

    impl CreditLedger for FakeLedger {
        async fn deduct(&self, _request: &DeductRequest) -> Result<DeductOutcome, LedgerError> {
            *self.calls.lock().unwrap() += 1;
            Ok(DeductOutcome {
                success: self.accept,
                new_balance: self.accept.then_some(10.0),
                error: (!self.accept).then(|| "insufficient balance".to_string()),
            })
        }
    }

    #[derive(Default)]
    struct DeleteRecorder {
        deleted: Mutex<Vec<String>>,
    }

    impl WebsetBackend for DeleteRecorder {
        async fn create(&self, _: &CreateWebsetParams) -> Result<Webset, ProviderError> {
            unreachable!("create not used by charge workflow")
        }
        async fn list(&self) -> Result<WebsetList, ProviderError> {
            unreachable!("list not used by charge workflow")
        }
        async fn get_expanded(&self, _: &str) -> Result<Webset, ProviderError> {
            unreachable!("get not used by charge workflow")
        }
        async fn delete(&self, id: &str) -> Result<(), ProviderError> {
            self.deleted.lock().unwrap().push(id.to_string());
            Ok(())
        }
    }

    fn scope() -> ScopeContext {
        ScopeContext::new("thread-1", "acct-1")
    }

    #[tokio::test]
    async fn successful_charge_reports_cost() {
        let ledger = FakeLedger::new(true);
        let outcome = charge(
            &ledger,
            BillingMode::Metered,
            &scope(),
            BillableOperation::Search { requested_count: 10 },
            "test".to_string(),
        )
        .await;
        assert_eq!(outcome.cost_label(), Some("75 credits"));
        assert_eq!(*ledger.calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn unmetered_mode_never_touches_ledger() {
        let ledger = FakeLedger::new(false);
        let outcome = charge(
            &ledger,
            BillingMode::Unmetered,
            &scope(),
            BillableOperation::Search { requested_count: 10 },
            "test".to_string(),
        )
        .await;
        assert_eq!(
            outcome.cost_label(),
            Some("75 credits (unmetered - not charged)")
        );
        assert_eq!(*ledger.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn declined_creation_rolls_back_remote_webset() {
        let ledger = FakeLedger::new(false);
        let backend = DeleteRecorder::default();
        let err = charge_for_creation(
            &backend,
            &ledger,
            BillingMode::Metered,
            &scope(),
            "ws_1",
            10,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            WebsetsError::InsufficientCredits { required: 75 }
        ));
        assert_eq!(*backend.deleted.lock().unwrap(), vec!["ws_1".to_string()]);
    }

    #[tokio::test]
    async fn accepted_creation_does_not_delete() {
        let ledger = FakeLedger::new(true);
        let backend = DeleteRecorder::default();
        let label = charge_for_creation(
            &backend,
            &ledger,
            BillingMode::Metered,
            &scope(),
            "ws_1",
            10,
        )
        .await
        .unwrap();
        assert_eq!(label, "75 credits");
        assert!(backend.deleted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn ledger_transport_failure_counts_as_decline() {
        struct BrokenLedger;
        impl CreditLedger for BrokenLedger {
            async fn deduct(&self, _: &DeductRequest) -> Result<DeductOutcome, LedgerError> {
                Err(LedgerError::Api {
                    status: 502,
                    message: "bad gateway".to_string(),
                })
            }
        }
        let outcome = charge(
            &BrokenLedger,
            BillingMode::Metered,
            &scope(),
            BillableOperation::Enrichment { item_count: 7 },
            "test".to_string(),
        )
        .await;
        assert_eq!(
            outcome,
            ChargeOutcome::Declined {
                required_credits: 70
            }
        );
    }
}
