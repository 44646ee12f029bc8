//! # trove-state
//!
//! libSQL-backed scope document store.
//!
//! Locally-tracked resources (websets, monitors) are persisted as a single
//! JSON document per conversation scope, not as relational rows. The protocol
//! is read-modify-write with last-writer-wins semantics: no version token, no
//! merge. Callers that care about concurrent writers must serialize writes
//! per scope themselves.

mod error;
mod store;

pub use error::StateError;
pub use store::{ScopeDocument, StateStore, WEBSET_STATE_DOC_TYPE};
