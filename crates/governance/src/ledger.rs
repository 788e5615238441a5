//! Stake Ledger
//!
//! Rebuilds governance stake and offset state by replaying contract
//! events, the same accounting the indexer performs.
//!
//! ## Offset accounting
//!
//! - **Deposit** of `amount` at time `t` adds `amount * t` to the offset,
//!   so the new stake starts with zero voting power.
//! - **Partial withdrawal** removes offset pro rata:
//!   `offset * received / staked`.
//! - **Full withdrawal** removes the user's whole offset.
//!
//! Amounts are unsigned on chain; negative deposits and withdrawals are
//! ignored.
//!
//! Per-user and global totals are updated together, so the global
//! snapshot always equals the sum of the user snapshots.

use std::collections::BTreeMap;

use accelera_common::{Address, Dnum, InitiativeId, StakeSnapshot};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::events::GovernanceEvent;
use crate::voting_power::voting_power;

// ============================================================================
// Types
// ============================================================================

/// Global staking totals
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct GovernanceStats {
    /// Total ACCEL staked
    pub total_staked: Dnum,
    /// Sum of every user's offset
    pub total_offset: Dnum,
    /// Initiatives currently registered
    pub total_initiatives: u32,
}

/// Stake state of one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct GovernanceUser {
    /// User address
    pub id: Address,
    /// ACCEL staked
    pub staked: Dnum,
    /// Offset of the staked ACCEL
    pub staked_offset: Dnum,
    /// ACCEL allocated across all initiatives (votes plus vetoes)
    pub allocated: Dnum,
    /// Initiatives the user currently allocates to, in allocation order
    pub allocated_initiatives: Vec<InitiativeId>,
}

impl GovernanceUser {
    /// Create an empty user
    pub fn new(id: Address) -> Self {
        Self {
            id,
            staked: Dnum::zero18(),
            staked_offset: Dnum::zero18(),
            allocated: Dnum::zero18(),
            allocated_initiatives: Vec::new(),
        }
    }
}

/// One user's allocation to one initiative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct GovernanceAllocation {
    /// Allocating user
    pub user: Address,
    /// Target initiative
    pub initiative: InitiativeId,
    /// ACCEL voting for the initiative
    pub vote: Dnum,
    /// ACCEL vetoing the initiative
    pub veto: Dnum,
    /// Epoch of the last change
    pub at_epoch: u64,
}

impl GovernanceAllocation {
    fn new(user: Address, initiative: InitiativeId) -> Self {
        Self {
            user,
            initiative,
            vote: Dnum::zero18(),
            veto: Dnum::zero18(),
            at_epoch: 0,
        }
    }

    /// Returns true if any vote or veto is allocated
    pub fn is_allocated(&self) -> bool {
        let zero = Dnum::zero18();
        self.vote > zero || self.veto > zero
    }
}

/// Registration record of an initiative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct InitiativeRecord {
    /// Initiative address
    pub id: InitiativeId,
    /// Who registered it
    pub registrant: Address,
    /// Registration timestamp
    pub registered_at: u64,
    /// Registration epoch
    pub registered_at_epoch: u64,
    /// Unregistration timestamp, if unregistered
    pub unregistered_at: Option<u64>,
    /// Unregistration epoch, if unregistered
    pub unregistered_at_epoch: Option<u64>,
    /// Epoch of the last vote snapshot
    pub last_vote_snapshot_epoch: Option<u64>,
    /// Votes recorded by the last snapshot
    pub last_vote_snapshot_votes: Option<Dnum>,
    /// Last epoch the initiative claimed for
    pub last_claim_epoch: Option<u64>,
}

// ============================================================================
// Ledger
// ============================================================================

/// Event-sourced governance stake state
#[derive(Debug, Clone, Default, BorshSerialize, BorshDeserialize)]
pub struct StakeLedger {
    /// Global totals
    pub stats: GovernanceStats,
    users: BTreeMap<Address, GovernanceUser>,
    initiatives: BTreeMap<InitiativeId, InitiativeRecord>,
    allocations: BTreeMap<(InitiativeId, Address), GovernanceAllocation>,
}

impl StakeLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay a batch of events in order
    pub fn apply_all<'a>(&mut self, events: impl IntoIterator<Item = &'a GovernanceEvent>) {
        for event in events {
            self.apply(event);
        }
    }

    /// Apply one event
    pub fn apply(&mut self, event: &GovernanceEvent) {
        match event {
            GovernanceEvent::DepositAccel { user, amount, timestamp } => {
                self.deposit(*user, *amount, *timestamp)
            }
            GovernanceEvent::WithdrawAccel { user, received, .. } => self.withdraw(*user, *received),
            GovernanceEvent::AllocateAccel {
                user,
                initiative,
                delta_vote,
                delta_veto,
                at_epoch,
                ..
            } => self.allocate(*user, *initiative, *delta_vote, *delta_veto, *at_epoch),
            GovernanceEvent::RegisterInitiative {
                initiative,
                registrant,
                at_epoch,
                timestamp,
            } => self.register_initiative(*initiative, *registrant, *at_epoch, *timestamp),
            GovernanceEvent::UnregisterInitiative {
                initiative,
                at_epoch,
                timestamp,
            } => {
                if let Some(record) = self.initiatives.get_mut(initiative) {
                    if record.unregistered_at.is_none() {
                        self.stats.total_initiatives = self.stats.total_initiatives.saturating_sub(1);
                    }
                    record.unregistered_at = Some(*timestamp);
                    record.unregistered_at_epoch = Some(*at_epoch);
                }
            }
            GovernanceEvent::SnapshotVotesForInitiative {
                initiative,
                votes,
                for_epoch,
                ..
            } => {
                if let Some(record) = self.initiatives.get_mut(initiative) {
                    record.last_vote_snapshot_epoch = Some(*for_epoch);
                    record.last_vote_snapshot_votes = Some(*votes);
                }
            }
            GovernanceEvent::ClaimForInitiative { initiative, for_epoch, .. } => {
                if let Some(record) = self.initiatives.get_mut(initiative) {
                    record.last_claim_epoch = Some(*for_epoch);
                }
            }
        }
    }

    fn deposit(&mut self, user: Address, amount: Dnum, timestamp: u64) {
        if amount.is_negative() {
            warn!(amount = %amount, "negative deposit ignored");
            return;
        }

        let t = accelera_common::I256::new(i128::from(timestamp));
        let offset_increase = Dnum::new(amount.value.saturating_mul(t), amount.decimals);

        let entry = self.users.entry(user).or_insert_with(|| GovernanceUser::new(user));
        entry.staked_offset = entry.staked_offset + offset_increase;
        entry.staked = entry.staked + amount;

        self.stats.total_offset = self.stats.total_offset + offset_increase;
        self.stats.total_staked = self.stats.total_staked + amount;

        debug!(amount = %amount, timestamp, total_staked = %self.stats.total_staked, "stake deposited");
    }

    fn withdraw(&mut self, user: Address, received: Dnum) {
        if received.is_negative() {
            warn!(received = %received, "negative withdrawal ignored");
            return;
        }
        let Some(entry) = self.users.get_mut(&user) else {
            debug!("withdrawal for unknown user ignored");
            return;
        };

        let offset_decrease = if received < entry.staked && !entry.staked.is_zero() {
            // pro rata: offset * received / staked, on mantissas at the stake's scale
            let received_raw = received
                .set_decimals(entry.staked.decimals)
                .map_or(entry.staked.value, |r| r.value);
            let value = entry.staked_offset.value.saturating_mul(received_raw) / entry.staked.value;
            Dnum::new(value, entry.staked_offset.decimals)
        } else {
            entry.staked_offset
        };
        entry.staked_offset = entry.staked_offset - offset_decrease;
        self.stats.total_offset = self.stats.total_offset - offset_decrease;

        if received > entry.staked {
            warn!(
                received = %received,
                staked = %entry.staked,
                "withdrawal exceeds recorded stake, clamping to zero"
            );
        }
        let removed = received.min(entry.staked);
        entry.staked = entry.staked - removed;
        self.stats.total_staked = (self.stats.total_staked - removed).clamp_non_negative();

        debug!(received = %received, total_staked = %self.stats.total_staked, "stake withdrawn");
    }

    fn allocate(
        &mut self,
        user: Address,
        initiative: InitiativeId,
        delta_vote: Dnum,
        delta_veto: Dnum,
        at_epoch: u64,
    ) {
        if !self.initiatives.contains_key(&initiative) {
            debug!("allocation to unknown initiative ignored");
            return;
        }
        let Some(entry) = self.users.get_mut(&user) else {
            debug!("allocation by unknown user ignored");
            return;
        };

        let allocation = self
            .allocations
            .entry((initiative, user))
            .or_insert_with(|| GovernanceAllocation::new(user, initiative));

        let was_allocated = allocation.is_allocated();

        allocation.vote = allocation.vote + delta_vote;
        allocation.veto = allocation.veto + delta_veto;
        entry.allocated = entry.allocated + delta_vote + delta_veto;
        allocation.at_epoch = at_epoch;

        let is_allocated = allocation.is_allocated();
        let listed = entry.allocated_initiatives.contains(&initiative);

        if !was_allocated && is_allocated && !listed {
            entry.allocated_initiatives.push(initiative);
        } else if was_allocated && !is_allocated && listed {
            entry.allocated_initiatives.retain(|id| *id != initiative);
        }

        debug!(at_epoch, allocated = %entry.allocated, "allocation updated");
    }

    fn register_initiative(
        &mut self,
        initiative: InitiativeId,
        registrant: Address,
        at_epoch: u64,
        timestamp: u64,
    ) {
        let record = InitiativeRecord {
            id: initiative,
            registrant,
            registered_at: timestamp,
            registered_at_epoch: at_epoch,
            unregistered_at: None,
            unregistered_at_epoch: None,
            last_vote_snapshot_epoch: None,
            last_vote_snapshot_votes: None,
            last_claim_epoch: None,
        };
        let replaced = self.initiatives.insert(initiative, record);
        if replaced.map_or(true, |old| old.unregistered_at.is_some()) {
            self.stats.total_initiatives = self.stats.total_initiatives.saturating_add(1);
        }
    }

    // ============ Queries ============

    /// Get a user's state
    pub fn user(&self, user: &Address) -> Option<&GovernanceUser> {
        self.users.get(user)
    }

    /// Get an initiative's registration record
    pub fn initiative(&self, initiative: &InitiativeId) -> Option<&InitiativeRecord> {
        self.initiatives.get(initiative)
    }

    /// Get a user's allocation to an initiative
    pub fn allocation(&self, initiative: &InitiativeId, user: &Address) -> Option<&GovernanceAllocation> {
        self.allocations.get(&(*initiative, *user))
    }

    /// Number of users ever seen
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Stake snapshot of one user, `None` if the user never deposited
    pub fn user_snapshot(&self, user: &Address, as_of_timestamp: u64) -> Option<StakeSnapshot> {
        self.users
            .get(user)
            .map(|u| StakeSnapshot::new(u.staked, u.staked_offset, as_of_timestamp))
    }

    /// Global stake snapshot
    pub fn global_snapshot(&self, as_of_timestamp: u64) -> StakeSnapshot {
        StakeSnapshot::new(self.stats.total_staked, self.stats.total_offset, as_of_timestamp)
    }

    /// Voting power of a user at `timestamp_in_seconds`, clamped for display
    pub fn user_voting_power(&self, user: &Address, timestamp_in_seconds: u64) -> Option<Dnum> {
        self.users.get(user).map(|u| {
            voting_power(u.staked, u.staked_offset, timestamp_in_seconds).clamp_non_negative()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: Address = [1u8; 20];
    const BOB: Address = [2u8; 20];
    const INITIATIVE: InitiativeId = [9u8; 20];

    fn accel(s: &str) -> Dnum {
        Dnum::parse(s, 18).unwrap()
    }

    fn deposit(user: Address, amount: &str, timestamp: u64) -> GovernanceEvent {
        GovernanceEvent::DepositAccel {
            user,
            amount: accel(amount),
            timestamp,
        }
    }

    fn withdraw(user: Address, received: &str, timestamp: u64) -> GovernanceEvent {
        GovernanceEvent::WithdrawAccel {
            user,
            received: accel(received),
            timestamp,
        }
    }

    fn register(timestamp: u64) -> GovernanceEvent {
        GovernanceEvent::RegisterInitiative {
            initiative: INITIATIVE,
            registrant: BOB,
            at_epoch: 1,
            timestamp,
        }
    }

    fn allocate(user: Address, vote: &str, veto: &str) -> GovernanceEvent {
        GovernanceEvent::AllocateAccel {
            user,
            initiative: INITIATIVE,
            delta_vote: accel(vote),
            delta_veto: accel(veto),
            at_epoch: 2,
            timestamp: 500,
        }
    }

    #[test]
    fn test_empty_ledger_snapshot() {
        let ledger = StakeLedger::new();
        let snapshot = ledger.global_snapshot(5);
        assert_eq!(snapshot, StakeSnapshot::empty(5));
        assert!(snapshot.is_empty());
        assert_eq!(ledger.user_snapshot(&ALICE, 5), None);
    }

    #[test]
    fn test_deposit_offsets() {
        let mut ledger = StakeLedger::new();
        ledger.apply(&deposit(ALICE, "10", 100));
        ledger.apply(&deposit(ALICE, "5", 200));

        let alice = ledger.user(&ALICE).unwrap();
        assert_eq!(alice.staked, accel("15"));
        // 10 * 100 + 5 * 200 = 2000 ACCEL-seconds
        assert_eq!(alice.staked_offset, accel("2000"));
        assert_eq!(ledger.stats.total_offset, accel("2000"));

        // at t=300: 15 * 300 - 2000 = 2500
        assert_eq!(ledger.user_voting_power(&ALICE, 300), Some(accel("2500")));
    }

    #[test]
    fn test_fresh_deposit_has_no_voting_power() {
        let mut ledger = StakeLedger::new();
        ledger.apply(&deposit(ALICE, "42", 1_700_000_000));
        assert_eq!(ledger.user_voting_power(&ALICE, 1_700_000_000), Some(Dnum::zero18()));
    }

    #[test]
    fn test_partial_withdraw_removes_offset_pro_rata() {
        let mut ledger = StakeLedger::new();
        ledger.apply(&deposit(ALICE, "10", 100));
        ledger.apply(&withdraw(ALICE, "4", 300));

        let alice = ledger.user(&ALICE).unwrap();
        assert_eq!(alice.staked, accel("6"));
        // offset 1000 * 4 / 10 = 400 removed
        assert_eq!(alice.staked_offset, accel("600"));
        assert_eq!(ledger.stats.total_staked, accel("6"));
        assert_eq!(ledger.stats.total_offset, accel("600"));
    }

    #[test]
    fn test_full_withdraw_clears_offset() {
        let mut ledger = StakeLedger::new();
        ledger.apply(&deposit(ALICE, "10", 100));
        ledger.apply(&deposit(BOB, "5", 150));
        ledger.apply(&withdraw(ALICE, "10", 300));

        let alice = ledger.user(&ALICE).unwrap();
        assert!(alice.staked.is_zero());
        assert!(alice.staked_offset.is_zero());
        assert_eq!(ledger.global_snapshot(300), ledger.user_snapshot(&BOB, 300).unwrap());
    }

    #[test]
    fn test_over_withdraw_clamps_stake() {
        let mut ledger = StakeLedger::new();
        ledger.apply(&deposit(ALICE, "10", 100));
        ledger.apply(&withdraw(ALICE, "12", 300));

        let alice = ledger.user(&ALICE).unwrap();
        assert!(alice.staked.is_zero());
        assert!(alice.staked_offset.is_zero());
        assert!(ledger.stats.total_staked.is_zero());
    }

    #[test]
    fn test_negative_amounts_ignored() {
        let mut ledger = StakeLedger::new();
        ledger.apply(&deposit(ALICE, "-5", 100));
        assert!(ledger.user(&ALICE).is_none());
        assert!(ledger.stats.total_staked.is_zero());

        ledger.apply(&deposit(ALICE, "10", 100));
        ledger.apply(&withdraw(ALICE, "10", 200));
        ledger.apply(&withdraw(ALICE, "-1", 300));

        let alice = ledger.user(&ALICE).unwrap();
        assert!(alice.staked.is_zero());
        assert!(alice.staked_offset.is_zero());
        assert!(ledger.stats.total_offset.is_zero());

        ledger.apply(&deposit(ALICE, "2", 400));
        ledger.apply(&withdraw(ALICE, "-1", 500));
        assert_eq!(ledger.user(&ALICE).unwrap().staked, accel("2"));
        assert_eq!(ledger.stats.total_offset, accel("800"));
    }

    #[test]
    fn test_withdraw_unknown_user_ignored() {
        let mut ledger = StakeLedger::new();
        ledger.apply(&withdraw(ALICE, "1", 10));
        assert_eq!(ledger.user_count(), 0);
        assert!(ledger.stats.total_staked.is_zero());
    }

    #[test]
    fn test_allocation_tracks_initiatives() {
        let mut ledger = StakeLedger::new();
        ledger.apply_all(&[register(10), deposit(ALICE, "10", 100)]);

        ledger.apply(&allocate(ALICE, "6", "0"));
        let alice = ledger.user(&ALICE).unwrap();
        assert_eq!(alice.allocated, accel("6"));
        assert_eq!(alice.allocated_initiatives, vec![INITIATIVE]);

        ledger.apply(&allocate(ALICE, "0", "2"));
        let allocation = ledger.allocation(&INITIATIVE, &ALICE).unwrap();
        assert_eq!(allocation.vote, accel("6"));
        assert_eq!(allocation.veto, accel("2"));
        assert_eq!(ledger.user(&ALICE).unwrap().allocated, accel("8"));

        ledger.apply(&allocate(ALICE, "-6", "-2"));
        let alice = ledger.user(&ALICE).unwrap();
        assert!(alice.allocated.is_zero());
        assert!(alice.allocated_initiatives.is_empty());
    }

    #[test]
    fn test_allocation_requires_known_user_and_initiative() {
        let mut ledger = StakeLedger::new();
        ledger.apply(&deposit(ALICE, "10", 100));
        ledger.apply(&allocate(ALICE, "6", "0"));
        assert!(ledger.allocation(&INITIATIVE, &ALICE).is_none());

        ledger.apply(&register(10));
        ledger.apply(&allocate(BOB, "1", "0"));
        assert!(ledger.allocation(&INITIATIVE, &BOB).is_none());
    }

    #[test]
    fn test_initiative_lifecycle() {
        let mut ledger = StakeLedger::new();
        ledger.apply(&register(10));
        assert_eq!(ledger.stats.total_initiatives, 1);

        ledger.apply(&GovernanceEvent::SnapshotVotesForInitiative {
            initiative: INITIATIVE,
            votes: accel("1234"),
            for_epoch: 3,
            timestamp: 20,
        });
        ledger.apply(&GovernanceEvent::ClaimForInitiative {
            initiative: INITIATIVE,
            for_epoch: 3,
            timestamp: 21,
        });
        ledger.apply(&GovernanceEvent::UnregisterInitiative {
            initiative: INITIATIVE,
            at_epoch: 5,
            timestamp: 30,
        });

        let record = ledger.initiative(&INITIATIVE).unwrap();
        assert_eq!(record.registrant, BOB);
        assert_eq!(record.last_vote_snapshot_epoch, Some(3));
        assert_eq!(record.last_vote_snapshot_votes, Some(accel("1234")));
        assert_eq!(record.last_claim_epoch, Some(3));
        assert_eq!(record.unregistered_at_epoch, Some(5));
        assert_eq!(ledger.stats.total_initiatives, 0);
    }
}
