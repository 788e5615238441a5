//! Protocol Constants
//!
//! Default values for the Accelera core. Every value here is a default
//! only: the embedding application passes its own configuration at call
//! time (see `RateChartConfig`, `UpdateCadence`, `EpochParams`).

/// Token Metadata
pub mod token {
    /// Decimal places used by ACCEL, USDX and every rate value
    pub const DECIMALS: u8 = 18;
    /// One unit with decimals (1 ACCEL = 1e18 base units)
    pub const ONE: i128 = 1_000_000_000_000_000_000;
    /// Governance staking token symbol
    pub const STAKE_SYMBOL: &str = "ACCEL";
    /// Stablecoin symbol
    pub const STABLE_SYMBOL: &str = "USDX";
}

/// Interest rate chart window (all values in 18-decimal base units)
pub mod interest_rate {
    /// First rate shown on the chart (0.5%)
    pub const START: i128 = 5_000_000_000_000_000;
    /// Last rate shown on the chart, inclusive (25%)
    pub const END: i128 = 250_000_000_000_000_000;
    /// Fine increments are used below this rate (10%)
    pub const PRECISE_UNTIL: i128 = 100_000_000_000_000_000;
    /// Fine step, also the spacing of raw brackets (0.1%)
    pub const INCREMENT_PRECISE: i128 = 1_000_000_000_000_000;
    /// Coarse step above `PRECISE_UNTIL` (0.5%)
    pub const INCREMENT_NORMAL: i128 = 5_000_000_000_000_000;
}

/// Governance timing
pub mod governance {
    /// Default number of live voting share samples per second
    pub const UPDATES_PER_SECOND: u32 = 30;
    /// Seconds in a day
    pub const SECONDS_PER_DAY: u64 = 24 * 60 * 60;
    /// Default epoch duration (7 days)
    pub const EPOCH_DURATION: u64 = 7 * SECONDS_PER_DAY;
    /// Default offset into the epoch after which voting is cut off (6 days)
    pub const EPOCH_VOTING_CUTOFF: u64 = 6 * SECONDS_PER_DAY;
}

/// Precision constants
pub mod precision {
    /// Largest decimal scale accepted by `Dnum`.
    /// Leaves room for a full mantissa times 10^decimals inside 256 bits.
    pub const MAX_DECIMALS: u8 = 36;

    /// Sub-second progress is expressed as an integer fraction of this
    pub const PROGRESS_SCALE: u64 = 1_000;

    /// Milliseconds per second
    pub const MILLIS_PER_SECOND: u64 = 1_000;
}
