//! Per-payer points ledger.
//!
//! Points arrive as dated transactions from named payers and are spent oldest
//! first, across payers, without ever letting a single payer's balance go
//! negative. The crate is split into:
//!
//! * [`ledger`] — the transaction log, balances and running total, plus the
//!   ordering rules in [`ledger::ordering`].
//! * [`store`] — a cloneable handle that serializes access to one ledger.
//! * [`date`] — parsing of caller-supplied transaction dates.
//! * [`api`] — the axum router exposing record / spend / balance over HTTP.
//! * [`config`] and [`observability`] — process settings and logging.
//!
//! State lives in memory for the life of the process.

pub mod api;
pub mod config;
pub mod date;
pub mod ledger;
pub mod observability;
pub mod store;

pub use ledger::{Deduction, LedgerError, LedgerState, RejectReason};
pub use store::SharedLedger;
