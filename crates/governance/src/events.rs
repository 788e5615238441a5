//! Governance Events
//!
//! Events emitted by the Governance contract, as delivered by the indexer.
//! The stake ledger replays them to rebuild stake and offset snapshots.

use accelera_common::{Address, Dnum, InitiativeId};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Event types for indexing and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EventType {
    // Stake Events (0x01 - 0x0F)
    DepositAccel = 0x01,
    WithdrawAccel = 0x02,
    AllocateAccel = 0x03,

    // Initiative Events (0x10 - 0x1F)
    RegisterInitiative = 0x10,
    UnregisterInitiative = 0x11,
    SnapshotVotesForInitiative = 0x12,
    ClaimForInitiative = 0x13,
}

/// Governance contract event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum GovernanceEvent {
    // ============ Stake Events ============

    /// ACCEL deposited into the user's proxy
    DepositAccel {
        user: Address,
        amount: Dnum,
        timestamp: u64,
    },

    /// ACCEL withdrawn from the user's proxy
    WithdrawAccel {
        user: Address,
        received: Dnum,
        timestamp: u64,
    },

    /// Votes and vetoes (re)allocated to an initiative; deltas may be negative
    AllocateAccel {
        user: Address,
        initiative: InitiativeId,
        delta_vote: Dnum,
        delta_veto: Dnum,
        at_epoch: u64,
        timestamp: u64,
    },

    // ============ Initiative Events ============

    /// A new initiative was registered
    RegisterInitiative {
        initiative: InitiativeId,
        registrant: Address,
        at_epoch: u64,
        timestamp: u64,
    },

    /// An initiative was unregistered
    UnregisterInitiative {
        initiative: InitiativeId,
        at_epoch: u64,
        timestamp: u64,
    },

    /// Votes for an initiative were snapshotted for an epoch
    SnapshotVotesForInitiative {
        initiative: InitiativeId,
        votes: Dnum,
        for_epoch: u64,
        timestamp: u64,
    },

    /// An initiative claimed its share of an epoch
    ClaimForInitiative {
        initiative: InitiativeId,
        for_epoch: u64,
        timestamp: u64,
    },
}

impl GovernanceEvent {
    /// Get the event type
    pub fn event_type(&self) -> EventType {
        match self {
            Self::DepositAccel { .. } => EventType::DepositAccel,
            Self::WithdrawAccel { .. } => EventType::WithdrawAccel,
            Self::AllocateAccel { .. } => EventType::AllocateAccel,
            Self::RegisterInitiative { .. } => EventType::RegisterInitiative,
            Self::UnregisterInitiative { .. } => EventType::UnregisterInitiative,
            Self::SnapshotVotesForInitiative { .. } => EventType::SnapshotVotesForInitiative,
            Self::ClaimForInitiative { .. } => EventType::ClaimForInitiative,
        }
    }

    /// Block timestamp of the event
    pub fn timestamp(&self) -> u64 {
        match self {
            Self::DepositAccel { timestamp, .. }
            | Self::WithdrawAccel { timestamp, .. }
            | Self::AllocateAccel { timestamp, .. }
            | Self::RegisterInitiative { timestamp, .. }
            | Self::UnregisterInitiative { timestamp, .. }
            | Self::SnapshotVotesForInitiative { timestamp, .. }
            | Self::ClaimForInitiative { timestamp, .. } => *timestamp,
        }
    }

    /// Serialize event to bytes for storage/transmission
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_default()
    }

    /// Deserialize event from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        borsh::from_slice(bytes).ok()
    }
}
