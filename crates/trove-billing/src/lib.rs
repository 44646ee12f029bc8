//! # trove-billing
//!
//! Pricing schedule and credit ledger adapter.
//!
//! Credits are the platform's internal billing unit, fixed at $0.01 (one
//! cent). Costs are computed from fixed formulas in [`pricing`] and debited
//! through the [`CreditLedger`] seam; the ledger's own atomicity is trusted,
//! this crate treats it as a black box returning success/failure plus an
//! optional new balance.

mod error;
mod ledger;
pub mod pricing;

pub use error::LedgerError;
pub use ledger::{CreditLedger, DeductOutcome, DeductRequest, HttpCreditLedger};
pub use pricing::BillableOperation;
