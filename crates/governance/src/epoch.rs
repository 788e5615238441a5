//! Governance epoch state derived from contract reads.

use accelera_common::constants::governance;
use accelera_common::{AcceleraError, AcceleraResult};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Status of an initiative as reported by the Governance contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum InitiativeStatus {
    /// Not registered
    #[default]
    Nonexistent,
    /// Registered in the current epoch, not votable yet
    WarmUp,
    /// Not enough votes to claim this epoch
    Skip,
    /// Can claim for the previous epoch
    Claimable,
    /// Already claimed for the previous epoch
    Claimed,
    /// Disabled after being unregistered
    Disabled,
    /// Can be unregistered
    Unregisterable,
}

impl InitiativeStatus {
    /// Decode the contract's numeric status; unknown values map to `Nonexistent`
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::WarmUp,
            2 => Self::Skip,
            3 => Self::Claimable,
            4 => Self::Claimed,
            5 => Self::Disabled,
            6 => Self::Unregisterable,
            _ => Self::Nonexistent,
        }
    }

    /// Whether the initiative can still receive allocations
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Nonexistent | Self::Disabled | Self::Unregisterable)
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Nonexistent => "nonexistent",
            Self::WarmUp => "warm up",
            Self::Skip => "skip",
            Self::Claimable => "claimable",
            Self::Claimed => "claimed",
            Self::Disabled => "disabled",
            Self::Unregisterable => "unregisterable",
        }
    }
}

impl From<u8> for InitiativeStatus {
    fn from(code: u8) -> Self {
        Self::from_code(code)
    }
}

/// Epoch timing parameters (`EPOCH_DURATION`, `EPOCH_VOTING_CUTOFF`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct EpochParams {
    /// Epoch length in seconds
    pub duration: u64,
    /// Seconds into the epoch after which only vetoes are accepted
    pub voting_cutoff: u64,
}

impl Default for EpochParams {
    fn default() -> Self {
        Self {
            duration: governance::EPOCH_DURATION,
            voting_cutoff: governance::EPOCH_VOTING_CUTOFF,
        }
    }
}

impl EpochParams {
    /// Requires a positive duration and a cutoff inside the epoch
    pub fn validate(&self) -> AcceleraResult<()> {
        if self.duration == 0 {
            return Err(AcceleraError::InvalidConfig {
                param: "duration",
                reason: "must be positive",
            });
        }
        if self.voting_cutoff > self.duration {
            return Err(AcceleraError::InvalidConfig {
                param: "voting_cutoff",
                reason: "must not exceed duration",
            });
        }
        Ok(())
    }
}

/// Voting period within an epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum VotingPeriod {
    Voting,
    Cutoff,
}

/// Coarse remaining time, largest unit first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRemaining {
    Days(u64),
    Hours(u64),
    Minutes(u64),
}

/// Snapshot of the current epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct EpochState {
    /// Current epoch number
    pub epoch: u64,
    /// Epoch start timestamp
    pub epoch_start: u64,
    /// Epoch end timestamp (`epoch_start + duration`)
    pub epoch_end: u64,
    /// Timestamp after which only vetoes are accepted
    pub cutoff_start: u64,
    /// Seconds elapsed since `epoch_start`
    pub seconds_within_epoch: u64,
    /// Voting or cutoff
    pub period: VotingPeriod,
    /// Fractional days left, display only
    pub days_left: f64,
    /// `days_left` rounded up
    pub days_left_rounded: u64,
}

impl EpochState {
    /// Build the epoch state from the contract's `epoch`, `epochStart` and
    /// `secondsWithinEpoch` reads
    pub fn from_reads(epoch: u64, epoch_start: u64, seconds_within_epoch: u64, params: &EpochParams) -> Self {
        let period = if seconds_within_epoch > params.voting_cutoff {
            VotingPeriod::Cutoff
        } else {
            VotingPeriod::Voting
        };

        let seconds_left = params.duration as f64 - seconds_within_epoch as f64;
        let days_left = seconds_left / governance::SECONDS_PER_DAY as f64;
        let days_left_rounded = days_left.ceil().max(0.0) as u64;

        Self {
            epoch,
            epoch_start,
            epoch_end: epoch_start.saturating_add(params.duration),
            cutoff_start: epoch_start.saturating_add(params.voting_cutoff),
            seconds_within_epoch,
            period,
            days_left,
            days_left_rounded,
        }
    }

    /// Returns true once the voting cutoff has passed
    pub fn is_cutoff(&self) -> bool {
        self.period == VotingPeriod::Cutoff
    }

    /// Remaining time in days above one day, hours above one hour, else minutes
    pub fn time_remaining(&self) -> TimeRemaining {
        let days = self.days_left.max(0.0);
        if days > 1.0 {
            TimeRemaining::Days(days.ceil() as u64)
        } else if days > 1.0 / 24.0 {
            TimeRemaining::Hours((days * 24.0).ceil() as u64)
        } else {
            TimeRemaining::Minutes((days * 24.0 * 60.0).ceil() as u64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: u64 = governance::SECONDS_PER_DAY;

    #[test]
    fn test_status_codes() {
        assert_eq!(InitiativeStatus::from_code(1), InitiativeStatus::WarmUp);
        assert_eq!(InitiativeStatus::from_code(6), InitiativeStatus::Unregisterable);
        assert_eq!(InitiativeStatus::from(42), InitiativeStatus::Nonexistent);
        assert_eq!(InitiativeStatus::WarmUp.label(), "warm up");
    }

    #[test]
    fn test_status_active() {
        let active: Vec<u8> = (0..=6).filter(|c| InitiativeStatus::from_code(*c).is_active()).collect();
        assert_eq!(active, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_params_validate() {
        assert!(EpochParams::default().validate().is_ok());
        let bad = EpochParams { duration: DAY, voting_cutoff: 2 * DAY };
        assert_eq!(bad.validate().unwrap_err().code(), "E030_INVALID_CONFIG");
        assert!(EpochParams { duration: 0, voting_cutoff: 0 }.validate().is_err());
    }

    #[test]
    fn test_voting_period() {
        let params = EpochParams::default();
        let state = EpochState::from_reads(3, 1_000, DAY, &params);
        assert_eq!(state.period, VotingPeriod::Voting);
        assert_eq!(state.cutoff_start, 1_000 + 6 * DAY);
        assert_eq!(state.epoch_end, 1_000 + 7 * DAY);
        assert_eq!(state.days_left, 6.0);
        assert_eq!(state.days_left_rounded, 6);

        // exactly at the cutoff is still voting
        assert!(!EpochState::from_reads(3, 1_000, 6 * DAY, &params).is_cutoff());
        assert!(EpochState::from_reads(3, 1_000, 6 * DAY + 1, &params).is_cutoff());
    }

    #[test]
    fn test_days_left_rounds_up() {
        let state = EpochState::from_reads(1, 0, DAY / 2, &EpochParams::default());
        assert_eq!(state.days_left, 6.5);
        assert_eq!(state.days_left_rounded, 7);
    }

    #[test]
    fn test_time_remaining() {
        let params = EpochParams::default();
        let at = |secs| EpochState::from_reads(1, 0, secs, &params).time_remaining();
        assert_eq!(at(0), TimeRemaining::Days(7));
        assert_eq!(at(6 * DAY), TimeRemaining::Hours(24));
        assert_eq!(at(7 * DAY - 150), TimeRemaining::Minutes(3));
        assert_eq!(at(7 * DAY - 90), TimeRemaining::Minutes(2));
    }
}
