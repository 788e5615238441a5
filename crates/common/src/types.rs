//! Core Types for the Accelera Core
//!
//! Snapshot and output records shared by the governance and
//! interest-rate crates. Every snapshot is produced by an external data
//! source (chain reads or the indexer) and is immutable once captured.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::dnum::Dnum;

/// Type alias for EVM account and contract addresses
pub type Address = [u8; 20];

/// Type alias for governance initiative addresses
pub type InitiativeId = Address;

// ============ Governance Types ============

/// Staked amount and decay offset as of the last stake mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct StakeSnapshot {
    /// Staked ACCEL (never negative)
    pub staked_amount: Dnum,
    /// Offset accumulator subtracted from `staked_amount * t`
    pub offset: Dnum,
    /// Seconds since the protocol epoch when this snapshot was captured
    pub as_of_timestamp: u64,
}

impl StakeSnapshot {
    /// Creates a snapshot from raw 18-decimal contract values
    pub fn new(staked_amount: Dnum, offset: Dnum, as_of_timestamp: u64) -> Self {
        Self {
            staked_amount,
            offset,
            as_of_timestamp,
        }
    }

    /// Empty snapshot (nothing staked)
    pub fn empty(as_of_timestamp: u64) -> Self {
        Self::new(Dnum::zero18(), Dnum::zero18(), as_of_timestamp)
    }

    /// Returns true if no stake is recorded
    pub fn is_empty(&self) -> bool {
        self.staked_amount.is_zero()
    }
}

/// A point in time at which voting power is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct VotingPowerQuery {
    /// Seconds since the protocol epoch
    pub timestamp_in_seconds: u64,
}

// ============ Interest Rate Types ============

/// Debt borrowed at exactly one interest rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct RateDebtBracket {
    /// Annual interest rate (e.g. 0.05 = 5%)
    pub rate: Dnum,
    /// Total debt at that rate
    pub total_debt: Dnum,
}

impl RateDebtBracket {
    /// Creates a bracket
    pub fn new(rate: Dnum, total_debt: Dnum) -> Self {
        Self { rate, total_debt }
    }
}

/// One bar of the interest rate chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct RateChartBucket {
    /// Lowest rate covered by this bucket
    pub rate_lower_bound: Dnum,
    /// Debt of every bracket inside the bucket
    pub aggregated_debt: Dnum,
    /// Debt of every bucket below this one (redeemed first)
    pub debt_in_front: Dnum,
    /// `aggregated_debt / highest_debt`, display only
    pub relative_size: f64,
}
