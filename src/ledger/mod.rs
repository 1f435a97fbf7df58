use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub mod ordering;

pub type PayerId = String;
pub type Points = u64;
pub type Timestamp = DateTime<Utc>;

/// Upper bound on the running total, so every balance and deduction fits an `i64`.
pub const MAX_TOTAL: Points = i64::MAX as Points;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RejectReason {
    UnknownPayer,
    WouldGoNegative { balance: Points },
    Overflow,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::UnknownPayer => write!(f, "unknown payer with negative opening transaction"),
            RejectReason::WouldGoNegative { balance } => {
                write!(f, "would drive payer negative (balance {balance})")
            }
            RejectReason::Overflow => write!(f, "total points would overflow"),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("transaction of {points} points for payer {payer} rejected: {reason}")]
    RejectedTransaction {
        payer: PayerId,
        points: i64,
        reason: RejectReason,
    },
    #[error("insufficient points: requested {requested}, available {available}")]
    InsufficientPoints { requested: Points, available: Points },
}

/// One active ledger entry. `points` is what is still unspent.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub payer: PayerId,
    pub points: Points,
    pub timestamp: Timestamp,
}

/// Points taken from one payer by a spend, expressed as a negative number.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deduction {
    pub payer: PayerId,
    pub points: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub entries: Vec<Transaction>,
    pub balances: BTreeMap<PayerId, Points>,
    pub total: Points,
}

#[derive(Default)]
pub struct LedgerState {
    entries: Vec<Transaction>,
    balances: BTreeMap<PayerId, Points>,
    total: Points,
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> Points {
        self.total
    }

    /// Applies a signed transaction for `payer`.
    ///
    /// Positive points become a new entry at their chronological position.
    /// Negative points are taken back from the payer's most recent entries and
    /// are rejected when the payer is unknown or holds too little. Zero is a
    /// no-op. Nothing changes on rejection.
    pub fn record(
        &mut self,
        payer: &str,
        points: i64,
        timestamp: Timestamp,
    ) -> Result<(), LedgerError> {
        match points.cmp(&0) {
            Ordering::Equal => {
                debug!(payer, "ignoring zero-point transaction");
                Ok(())
            }
            Ordering::Greater => self.credit(payer, points, timestamp),
            Ordering::Less => self.debit(payer, points),
        }
    }

    fn credit(&mut self, payer: &str, points: i64, timestamp: Timestamp) -> Result<(), LedgerError> {
        let amount = points.unsigned_abs();
        let total = match self.total.checked_add(amount) {
            Some(total) if total <= MAX_TOTAL => total,
            _ => return Err(self.reject(payer, points, RejectReason::Overflow)),
        };

        let at = ordering::insert_position(&self.entries, &timestamp);
        self.entries.insert(
            at,
            Transaction {
                payer: payer.to_owned(),
                points: amount,
                timestamp,
            },
        );
        *self.balances.entry(payer.to_owned()).or_insert(0) += amount;
        self.total = total;
        info!(payer, points, %timestamp, total = self.total, "recorded credit");
        Ok(())
    }

    fn debit(&mut self, payer: &str, points: i64) -> Result<(), LedgerError> {
        let amount = points.unsigned_abs();
        let balance = match self.balances.get(payer) {
            Some(balance) => *balance,
            None => return Err(self.reject(payer, points, RejectReason::UnknownPayer)),
        };
        if balance < amount {
            return Err(self.reject(payer, points, RejectReason::WouldGoNegative { balance }));
        }

        let (entries, unabsorbed) =
            ordering::merge_negative(std::mem::take(&mut self.entries), payer, amount);
        debug_assert_eq!(unabsorbed, 0, "payer entries must cover the payer balance");
        self.entries = entries;
        self.balances.insert(payer.to_owned(), balance - amount);
        self.total -= amount;
        info!(payer, points, total = self.total, "recorded debit");
        Ok(())
    }

    fn reject(&self, payer: &str, points: i64, reason: RejectReason) -> LedgerError {
        warn!(payer, points, %reason, "transaction rejected");
        LedgerError::RejectedTransaction {
            payer: payer.to_owned(),
            points,
            reason,
        }
    }

    /// Spends `amount` points oldest first across all payers.
    pub fn spend(&mut self, amount: Points) -> Result<Vec<Deduction>, LedgerError> {
        if amount > self.total {
            warn!(requested = amount, available = self.total, "spend rejected");
            return Err(LedgerError::InsufficientPoints {
                requested: amount,
                available: self.total,
            });
        }

        let drawn = ordering::consume_oldest(&mut self.entries, amount);
        for (payer, points) in &drawn {
            if let Some(balance) = self.balances.get_mut(payer) {
                *balance -= points;
            }
        }
        self.total -= amount;
        info!(amount, payers = drawn.len(), total = self.total, "spent points");

        Ok(drawn
            .into_iter()
            .map(|(payer, points)| Deduction {
                payer,
                points: -(points as i64),
            })
            .collect())
    }

    /// Positive balances per payer.
    pub fn balances(&self) -> BTreeMap<PayerId, Points> {
        self.balances
            .iter()
            .filter(|(_, points)| **points > 0)
            .map(|(payer, points)| (payer.clone(), *points))
            .collect()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            entries: self.entries.clone(),
            balances: self.balances(),
            total: self.total,
        }
    }
}
