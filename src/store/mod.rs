use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::ledger::{
    Deduction, LedgerError, LedgerSnapshot, LedgerState, PayerId, Points, Timestamp,
};

/// Process-wide handle to the ledger.
///
/// Every operation runs start to finish under one lock, so a spend walk can
/// never interleave with a record or another spend. Clones share the same
/// ledger.
#[derive(Clone, Default)]
pub struct SharedLedger {
    inner: Arc<Mutex<LedgerState>>,
}

impl SharedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, payer: &str, points: i64, timestamp: Timestamp) -> Result<(), LedgerError> {
        self.inner.lock().record(payer, points, timestamp)
    }

    pub fn spend(&self, amount: Points) -> Result<Vec<Deduction>, LedgerError> {
        self.inner.lock().spend(amount)
    }

    pub fn balances(&self) -> BTreeMap<PayerId, Points> {
        self.inner.lock().balances()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.inner.lock().snapshot()
    }
}
