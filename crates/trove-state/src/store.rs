//! Scope document store over libSQL.

use chrono::Utc;
use trove_core::WebsetsState;

use crate::error::StateError;

/// Reserved document type for the websets state document.
pub const WEBSET_STATE_DOC_TYPE: &str = "webset_state";

/// One stored document row.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeDocument {
    pub scope_id: String,
    pub doc_type: String,
    pub content: serde_json::Value,
    pub created_at: String,
    pub updated_at: String,
}

/// Document store handle. One JSON document per `(scope_id, doc_type)`.
pub struct StateStore {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl StateStore {
    /// Open a local-only database at the given path (`":memory:"` for tests).
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the database cannot be opened or migrations
    /// fail.
    pub async fn open_local(path: &str) -> Result<Self, StateError> {
        let db = libsql::Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        let store = Self { db, conn };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StateError> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS scope_documents (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    scope_id TEXT NOT NULL,
                    doc_type TEXT NOT NULL,
                    content TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )",
                (),
            )
            .await
            .map_err(|e| StateError::Migration(format!("scope_documents: {e}")))?;
        self.conn
            .execute(
                "CREATE INDEX IF NOT EXISTS idx_scope_documents_lookup
                 ON scope_documents (scope_id, doc_type, created_at)",
                (),
            )
            .await
            .map_err(|e| StateError::Migration(format!("idx_scope_documents_lookup: {e}")))?;
        Ok(())
    }

    /// Fetch the most-recently-created document of `doc_type` for a scope.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the query fails or the stored content is not
    /// valid JSON.
    pub async fn find_latest(
        &self,
        scope_id: &str,
        doc_type: &str,
    ) -> Result<Option<ScopeDocument>, StateError> {
        let mut rows = self
            .conn
            .query(
                "SELECT scope_id, doc_type, content, created_at, updated_at
                 FROM scope_documents
                 WHERE scope_id = ?1 AND doc_type = ?2
                 ORDER BY created_at DESC, id DESC
                 LIMIT 1",
                [scope_id, doc_type],
            )
            .await?;
        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        let raw: String = row.get(2)?;
        let content =
            serde_json::from_str(&raw).map_err(|e| StateError::CorruptDocument {
                scope_id: scope_id.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Some(ScopeDocument {
            scope_id: row.get(0)?,
            doc_type: row.get(1)?,
            content,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        }))
    }

    /// Write a document for a scope: overwrite the existing document of that
    /// type in place, or insert a new one. Last-writer-wins.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if serialization or the write fails.
    pub async fn upsert(
        &self,
        scope_id: &str,
        doc_type: &str,
        content: &serde_json::Value,
    ) -> Result<(), StateError> {
        let now = Utc::now().to_rfc3339();
        let raw = content.to_string();
        let updated = self
            .conn
            .execute(
                "UPDATE scope_documents SET content = ?1, updated_at = ?2
                 WHERE id = (
                     SELECT id FROM scope_documents
                     WHERE scope_id = ?3 AND doc_type = ?4
                     ORDER BY created_at DESC, id DESC
                     LIMIT 1
                 )",
                libsql::params![raw.as_str(), now.as_str(), scope_id, doc_type],
            )
            .await?;
        if updated == 0 {
            self.conn
                .execute(
                    "INSERT INTO scope_documents (scope_id, doc_type, content, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    libsql::params![scope_id, doc_type, raw.as_str(), now.as_str(), now.as_str()],
                )
                .await?;
        }
        Ok(())
    }

    /// Load the websets state document for a scope; empty default if none
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the read fails or the document cannot be
    /// decoded.
    pub async fn load_websets_state(&self, scope_id: &str) -> Result<WebsetsState, StateError> {
        match self.find_latest(scope_id, WEBSET_STATE_DOC_TYPE).await? {
            Some(doc) => serde_json::from_value(doc.content).map_err(|e| {
                StateError::CorruptDocument {
                    scope_id: scope_id.to_string(),
                    reason: e.to_string(),
                }
            }),
            None => Ok(WebsetsState::default()),
        }
    }

    /// Load the websets state, degrading read failures to an empty default
    /// document with a warning. Write failures still propagate from
    /// [`Self::save_websets_state`].
    pub async fn load_websets_state_or_default(&self, scope_id: &str) -> WebsetsState {
        match self.load_websets_state(scope_id).await {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(scope_id, %e, "failed to load websets state, using empty default");
                WebsetsState::default()
            }
        }
    }

    /// Persist the websets state document for a scope.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if serialization or the write fails.
    pub async fn save_websets_state(
        &self,
        scope_id: &str,
        state: &WebsetsState,
    ) -> Result<(), StateError> {
        let content = serde_json::to_value(state)
            .map_err(|e| StateError::Query(format!("serialize websets state: {e}")))?;
        self.upsert(scope_id, WEBSET_STATE_DOC_TYPE, &content).await
    }
}
