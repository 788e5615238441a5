//! Accelera Interest Rates
//!
//! Borrowers choose their own interest rate, and redemptions hit the
//! lowest rates first. This crate turns the per-rate debt brackets read
//! from the chain into:
//!
//! - **Chart buckets** (`chart`): fixed-resolution debt distribution with
//!   the debt in front of each bucket
//! - **Redemption position** (`redemption`): debt ahead of a given rate
//!   and closest-rate lookup
//! - **Average rate** (`average`): debt-weighted mean rate

pub mod average;
pub mod chart;
pub mod config;
pub mod redemption;


// Re-exports for convenience
pub use average::average_interest_rate;
pub use chart::interest_rate_chart;
pub use config::RateChartConfig;
pub use redemption::{
    debt_before_index, debt_before_rate_bucket_index, find_closest_rate_index, redemption_position,
};
