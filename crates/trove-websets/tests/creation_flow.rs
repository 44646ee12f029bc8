//! End-to-end creation flow over in-memory fakes:
//! - accepted charge: webset tracked in the scope document, nothing deleted
//! - declined charge: remote webset rolled back, scope document untouched

use std::collections::BTreeMap;
use std::sync::Mutex;

use pretty_assertions::assert_eq;
use trove_billing::{CreditLedger, DeductOutcome, DeductRequest, LedgerError};
use trove_config::BillingMode;
use trove_core::{ScopeContext, TrackedWebset, WebsetsState};
use trove_provider::{CreateSearchParams, CreateWebsetParams, ProviderError, Webset, WebsetList};
use trove_state::StateStore;
use trove_websets::{WebsetBackend, WebsetsError, charge_for_creation, create_with_dedup};

#[derive(Default)]
struct FakeBackend {
    deleted: Mutex<Vec<String>>,
}

impl WebsetBackend for FakeBackend {
    async fn create(&self, params: &CreateWebsetParams) -> Result<Webset, ProviderError> {
        Ok(Webset {
            id: "ws_flow".to_string(),
            external_id: params.external_id.clone(),
            ..Webset::default()
        })
    }

    async fn list(&self) -> Result<WebsetList, ProviderError> {
        Ok(WebsetList::default())
    }

    async fn get_expanded(&self, id: &str) -> Result<Webset, ProviderError> {
        Ok(Webset {
            id: id.to_string(),
            ..Webset::default()
        })
    }

    async fn delete(&self, id: &str) -> Result<(), ProviderError> {
        self.deleted.lock().unwrap().push(id.to_string());
        Ok(())
    }
}

struct FakeLedger {
    accept: bool,
}

impl CreditLedger for FakeLedger {
    async fn deduct(&self, _request: &DeductRequest) -> Result<DeductOutcome, LedgerError> {
        Ok(DeductOutcome {
            success: self.accept,
            new_balance: self.accept.then_some(10.0),
            error: (!self.accept).then(|| "insufficient balance".to_string()),
        })
    }
}

fn creation_params() -> CreateWebsetParams {
    CreateWebsetParams {
        search: CreateSearchParams {
            query: "AI startups".to_string(),
            count: 10,
            entity: None,
            criteria: None,
            recall: true,
            behavior: None,
        },
        enrichments: None,
        external_id: Some("leads".to_string()),
        metadata: BTreeMap::new(),
    }
}

/// The creation sequence as the tool runs it: create remotely, charge, and
/// only after an accepted charge track the webset in the scope document.
async fn create_charge_track(
    backend: &FakeBackend,
    ledger: &FakeLedger,
    store: &StateStore,
    scope: &ScopeContext,
) -> Result<String, WebsetsError> {
    let outcome = create_with_dedup(backend, creation_params()).await?;
    let cost = charge_for_creation(
        backend,
        ledger,
        BillingMode::Metered,
        scope,
        &outcome.webset.id,
        10,
    )
    .await?;

    let mut state = store.load_websets_state_or_default(&scope.scope_id).await;
    state.websets.insert(
        outcome.webset.id.clone(),
        TrackedWebset {
            id: outcome.webset.id.clone(),
            external_id: outcome.final_external_id,
            query: "AI startups".to_string(),
            entity_type: String::new(),
            status: None,
            item_count: 0,
            requested_count: 10,
            created_at: "2026-08-01T09:00:00Z".to_string(),
            updated_at: None,
            metadata: BTreeMap::new(),
        },
    );
    store.save_websets_state(&scope.scope_id, &state).await?;
    Ok(cost)
}

#[tokio::test]
async fn declined_creation_rolls_back_and_tracks_nothing() {
    let backend = FakeBackend::default();
    let ledger = FakeLedger { accept: false };
    let store = StateStore::open_local(":memory:").await.unwrap();
    let scope = ScopeContext::new("thread-1", "acct-1");

    let err = create_charge_track(&backend, &ledger, &store, &scope)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WebsetsError::InsufficientCredits { required: 75 }
    ));

    // The remote webset was deleted and nothing was tracked locally.
    assert_eq!(*backend.deleted.lock().unwrap(), vec!["ws_flow".to_string()]);
    let state = store.load_websets_state("thread-1").await.unwrap();
    assert_eq!(state, WebsetsState::default());
}

#[tokio::test]
async fn accepted_creation_is_tracked_and_not_rolled_back() {
    let backend = FakeBackend::default();
    let ledger = FakeLedger { accept: true };
    let store = StateStore::open_local(":memory:").await.unwrap();
    let scope = ScopeContext::new("thread-1", "acct-1");

    let cost = create_charge_track(&backend, &ledger, &store, &scope)
        .await
        .unwrap();
    assert_eq!(cost, "75 credits");

    assert!(backend.deleted.lock().unwrap().is_empty());
    let state = store.load_websets_state("thread-1").await.unwrap();
    assert!(state.websets.contains_key("ws_flow"));
}
