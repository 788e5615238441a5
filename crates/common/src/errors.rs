//! Error Types for the Accelera Core
//!
//! Typed errors shared by every crate in the workspace. Transient
//! "data not loaded yet" states are modelled with `Option`, not with
//! these variants: an `AcceleraError` always means a caller or
//! configuration mistake.

use thiserror::Error;

/// Result type alias for Accelera operations
pub type AcceleraResult<T> = Result<T, AcceleraError>;

/// Main error enum for all Accelera core errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AcceleraError {
    // ============ Math Errors ============
    /// Arithmetic overflow occurred
    #[error("arithmetic overflow")]
    Overflow,

    /// Arithmetic underflow occurred
    #[error("arithmetic underflow")]
    Underflow,

    /// Division by zero
    #[error("division by zero")]
    DivisionByZero,

    // ============ Fixed-Point Errors ============
    /// A decimal string could not be parsed
    #[error("invalid decimal value: {input:?}")]
    InvalidDecimal { input: String },

    /// Decimal scale beyond what a 256-bit mantissa can carry safely
    #[error("decimals {decimals} exceed the maximum of {maximum}")]
    DecimalsOutOfRange { decimals: u8, maximum: u8 },

    // ============ Interest Rate Errors ============
    /// A rate lookup was asked to search an empty rate list
    #[error("rates array is empty")]
    EmptyRates,

    // ============ Input Validation Errors ============
    /// Invalid configuration parameter
    #[error("invalid config `{param}`: {reason}")]
    InvalidConfig {
        param: &'static str,
        reason: &'static str,
    },

    /// Invalid input parameter
    #[error("invalid input `{param}`: {reason}")]
    InvalidInput {
        param: &'static str,
        reason: &'static str,
    },
}

impl AcceleraError {
    /// Returns a human-readable error code for logging/debugging
    pub fn code(&self) -> &'static str {
        match self {
            Self::Overflow => "E001_OVERFLOW",
            Self::Underflow => "E002_UNDERFLOW",
            Self::DivisionByZero => "E003_DIV_ZERO",
            Self::InvalidDecimal { .. } => "E010_INVALID_DECIMAL",
            Self::DecimalsOutOfRange { .. } => "E011_DECIMALS_RANGE",
            Self::EmptyRates => "E020_EMPTY_RATES",
            Self::InvalidConfig { .. } => "E030_INVALID_CONFIG",
            Self::InvalidInput { .. } => "E031_INVALID_INPUT",
        }
    }

    /// Returns true if the caller can fix the problem by changing its input
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidDecimal { .. } | Self::InvalidInput { .. } | Self::InvalidConfig { .. }
        )
    }
}
