//! Creation-with-dedup workflow.
//!
//! Creates a remote webset keyed by a caller-supplied alias, tolerating the
//! case where that alias already exists remotely. No side effects until a
//! resource object is obtained; no partial local state is written on failure.

use chrono::Utc;
use trove_provider::{CreateWebsetParams, ProviderError, Webset};

use crate::backend::WebsetBackend;
use crate::error::WebsetsError;

/// Total attempts (initial create included) before giving up.
pub const MAX_CREATE_ATTEMPTS: u32 = 3;

/// Result of the workflow.
#[derive(Debug)]
pub struct CreationOutcome {
    pub webset: Webset,
    /// Alias the resource actually ended up under (the original, or a
    /// suffixed variant after a list miss).
    pub final_external_id: Option<String>,
    /// True when an existing resource was recovered instead of created.
    /// Callers decide what that means for charging.
    pub recovered: bool,
}

/// Create a webset, recovering from alias conflicts.
///
/// On a conflict with an alias supplied: list remote websets and linear-scan
/// for the alias (first match wins, no ordering assumed); if found, fetch it
/// expanded and treat it as the created resource; if not found, retry with
/// the alias suffixed by current unix time and a 4-digit random number.
///
/// # Errors
///
/// - [`WebsetsError::CreationExhausted`] after [`MAX_CREATE_ATTEMPTS`]
///   attempts with no resource obtained.
/// - Any non-conflict provider error, immediately. A conflict without an
///   alias also escalates: there is nothing to dedup against.
pub async fn create_with_dedup<B: WebsetBackend>(
    backend: &B,
    mut params: CreateWebsetParams,
) -> Result<CreationOutcome, WebsetsError> {
    let original_alias = params.external_id.clone();

    for attempt in 1..=MAX_CREATE_ATTEMPTS {
        match backend.create(&params).await {
            Ok(webset) => {
                tracing::info!(webset_id = %webset.id, attempt, "webset created");
                return Ok(CreationOutcome {
                    webset,
                    final_external_id: params.external_id,
                    recovered: false,
                });
            }
            Err(ProviderError::Conflict { .. }) if params.external_id.is_some() => {
                let current = params.external_id.clone().unwrap_or_default();
                tracing::info!(
                    alias = %current,
                    attempt,
                    max = MAX_CREATE_ATTEMPTS,
                    "webset alias already exists, attempting recovery"
                );

                match recover_existing(backend, &current).await {
                    Ok(Some(webset)) => {
                        tracing::info!(webset_id = %webset.id, alias = %current, "recovered existing webset");
                        return Ok(CreationOutcome {
                            webset,
                            final_external_id: Some(current),
                            recovered: true,
                        });
                    }
                    Ok(None) => {}
                    Err(e) => {
                        // Race or pagination miss; fall through to suffixing.
                        tracing::warn!(alias = %current, %e, "could not retrieve existing webset");
                    }
                }

                if attempt < MAX_CREATE_ATTEMPTS {
                    let base = original_alias.as_deref().unwrap_or(&current);
                    let suffixed = unique_alias(base);
                    tracing::info!(alias = %suffixed, "retrying with unique alias");
                    params.external_id = Some(suffixed);
                }
            }
            Err(other) => return Err(other.into()),
        }
    }

    Err(WebsetsError::CreationExhausted {
        attempts: MAX_CREATE_ATTEMPTS,
        last_alias: params.external_id.unwrap_or_default(),
    })
}

/// List remote websets and fetch the first one matching `alias`, expanded.
async fn recover_existing<B: WebsetBackend>(
    backend: &B,
    alias: &str,
) -> Result<Option<Webset>, ProviderError> {
    let listing = backend.list().await?;
    let Some(existing) = listing
        .data
        .iter()
        .find(|ws| ws.external_id.as_deref() == Some(alias))
    else {
        return Ok(None);
    };
    backend.get_expanded(&existing.id).await.map(Some)
}

/// Derive a fresh alias from `base`: unix seconds plus a 4-digit random
/// suffix.
fn unique_alias(base: &str) -> String {
    let ts = Utc::now().timestamp();
    let mut buf = [0u8; 2];
    let rand = getrandom::fill(&mut buf).map_or(0, |()| u16::from_le_bytes(buf));
    let digits = 1000 + rand % 9000;
    format!("{base}_{ts}_{digits}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use trove_provider::{CreateSearchParams, WebsetList};

    /// Scripted fake backend: counts calls, replays canned responses.
    #[derive(Default)]
    struct FakeBackend {
        create_calls: Mutex<u32>,
        /// Conflicts to emit before the first successful create.
        conflicts_before_success: u32,
        /// Websets visible through `list`.
        listed: Vec<Webset>,
        deleted: Mutex<Vec<String>>,
    }

    impl WebsetBackend for FakeBackend {
        async fn create(&self, params: &CreateWebsetParams) -> Result<Webset, ProviderError> {
            let mut calls = self.create_calls.lock().unwrap();
            *calls += 1;
            if *calls <= self.conflicts_before_success {
                return Err(ProviderError::Conflict {
                    external_id: params.external_id.clone().unwrap_or_default(),
                });
            }
            Ok(Webset {
                id: format!("ws_new_{}", *calls),
                external_id: params.external_id.clone(),
                ..Webset::default()
            })
        }

        async fn list(&self) -> Result<WebsetList, ProviderError> {
            Ok(WebsetList {
                data: self.listed.clone(),
                ..WebsetList::default()
            })
        }

        async fn get_expanded(&self, id: &str) -> Result<Webset, ProviderError> {
            self.listed
                .iter()
                .find(|ws| ws.id == id)
                .cloned()
                .ok_or(ProviderError::NotFound {
                    message: id.to_string(),
                })
        }

        async fn delete(&self, id: &str) -> Result<(), ProviderError> {
            self.deleted.lock().unwrap().push(id.to_string());
            Ok(())
        }
    }

    fn params(alias: Option<&str>) -> CreateWebsetParams {
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
            external_id: alias.map(String::from),
            metadata: BTreeMap::new(),
        }
    }

    fn existing(id: &str, alias: &str) -> Webset {
        Webset {
            id: id.to_string(),
            external_id: Some(alias.to_string()),
            ..Webset::default()
        }
    }

    #[tokio::test]
    async fn clean_create_is_one_attempt() {
        let backend = FakeBackend::default();
        let outcome = create_with_dedup(&backend, params(Some("leads"))).await.unwrap();
        assert!(!outcome.recovered);
        assert_eq!(outcome.final_external_id.as_deref(), Some("leads"));
        assert_eq!(*backend.create_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn conflict_recovers_existing_resource() {
        let backend = FakeBackend {
            conflicts_before_success: u32::MAX,
            listed: vec![existing("ws_prior", "leads")],
            ..FakeBackend::default()
        };
        let outcome = create_with_dedup(&backend, params(Some("leads"))).await.unwrap();
        assert!(outcome.recovered);
        assert_eq!(outcome.webset.id, "ws_prior");
        // Dedup idempotence: a second call recovers the same id.
        let again = create_with_dedup(&backend, params(Some("leads"))).await.unwrap();
        assert_eq!(again.webset.id, "ws_prior");
    }

    #[tokio::test]
    async fn list_miss_retries_with_suffixed_alias() {
        let backend = FakeBackend {
            conflicts_before_success: 1,
            ..FakeBackend::default()
        };
        let outcome = create_with_dedup(&backend, params(Some("leads"))).await.unwrap();
        assert!(!outcome.recovered);
        let final_alias = outcome.final_external_id.unwrap();
        assert!(final_alias.starts_with("leads_"), "got '{final_alias}'");
        assert_ne!(final_alias, "leads");
        assert_eq!(*backend.create_calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn perpetual_conflict_exhausts_after_exactly_three_attempts() {
        let backend = FakeBackend {
            conflicts_before_success: u32::MAX,
            ..FakeBackend::default()
        };
        let err = create_with_dedup(&backend, params(Some("leads"))).await.unwrap_err();
        assert!(matches!(
            err,
            WebsetsError::CreationExhausted { attempts: 3, ref last_alias } if last_alias.starts_with("leads_")
        ));
        assert_eq!(*backend.create_calls.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn conflict_without_alias_escalates() {
        let backend = FakeBackend {
            conflicts_before_success: u32::MAX,
            ..FakeBackend::default()
        };
        let err = create_with_dedup(&backend, params(None)).await.unwrap_err();
        assert!(matches!(
            err,
            WebsetsError::Provider(ProviderError::Conflict { .. })
        ));
        assert_eq!(*backend.create_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn non_conflict_error_escalates_immediately() {
        struct AuthFailBackend;
        impl WebsetBackend for AuthFailBackend {
            async fn create(&self, _: &CreateWebsetParams) -> Result<Webset, ProviderError> {
                Err(ProviderError::Auth {
                    message: "bad key".to_string(),
                })
            }
            async fn list(&self) -> Result<WebsetList, ProviderError> {
                unreachable!("list must not be called")
            }
            async fn get_expanded(&self, _: &str) -> Result<Webset, ProviderError> {
                unreachable!("get must not be called")
            }
            async fn delete(&self, _: &str) -> Result<(), ProviderError> {
                unreachable!("delete must not be called")
            }
        }
        let err = create_with_dedup(&AuthFailBackend, params(Some("leads"))).await.unwrap_err();
        assert!(matches!(err, WebsetsError::Provider(ProviderError::Auth { .. })));
    }

    #[test]
    fn unique_alias_shape() {
        let alias = unique_alias("leads");
        let parts: Vec<&str> = alias.split('_').collect();
        assert_eq!(parts[0], "leads");
        assert!(parts[1].parse::<i64>().is_ok());
        let digits: u16 = parts[2].parse().unwrap();
        assert!((1000..10000).contains(&digits));
    }
}
