//! Fixed-Point Decimal Numbers
//!
//! `Dnum` is a `(mantissa, decimals)` pair representing
//! `mantissa / 10^decimals` exactly. Mantissas are signed 256-bit
//! integers so that `amount * timestamp` products of 18-decimal token
//! amounts never leave integer arithmetic.
//!
//! ## Arithmetic rules
//!
//! - Addition, subtraction and comparison align both operands to the
//!   larger scale first, so they are exact.
//! - Multiplication and division keep the scale of the left operand and
//!   truncate toward zero.
//! - Equality and ordering are numeric: `0.5` at 1 decimal equals `0.50`
//!   at 2 decimals.
//!
//! The JSON form is the pair `["<mantissa>", <decimals>]`, which is also
//! the canonical key used for exact-match rate lookups.

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, Neg, Sub};

use borsh::{BorshDeserialize, BorshSerialize};
use ethnum::I256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{precision::MAX_DECIMALS, token};
use crate::errors::{AcceleraError, AcceleraResult};

/// Fixed-point decimal value
#[derive(Debug, Clone, Copy)]
pub struct Dnum {
    /// Raw integer mantissa
    pub value: I256,
    /// Number of decimal places in `value`
    pub decimals: u8,
}

/// `10^exp`, saturating at `I256::MAX`
fn pow10_saturating(exp: u32) -> I256 {
    (0..exp).fold(I256::ONE, |acc, _| acc.saturating_mul(I256::new(10)))
}

/// `10^decimals` for a validated scale
pub fn pow10(decimals: u8) -> AcceleraResult<I256> {
    if decimals > MAX_DECIMALS {
        return Err(AcceleraError::DecimalsOutOfRange {
            decimals,
            maximum: MAX_DECIMALS,
        });
    }
    Ok(pow10_saturating(u32::from(decimals)))
}

/// Moves a mantissa from one scale to another, truncating when scaling down
fn rescale(value: I256, from: u8, to: u8) -> I256 {
    match to.cmp(&from) {
        Ordering::Equal => value,
        Ordering::Greater => value.saturating_mul(pow10_saturating(u32::from(to - from))),
        Ordering::Less => value / pow10_saturating(u32::from(from - to)),
    }
}

impl Dnum {
    /// Creates a value from a raw mantissa and scale
    pub const fn new(value: I256, decimals: u8) -> Self {
        Self { value, decimals }
    }

    /// Wraps a raw 18-decimal mantissa, as read from a contract
    pub const fn from_raw18(value: I256) -> Self {
        Self::new(value, token::DECIMALS)
    }

    /// Wraps a raw 18-decimal mantissa given as `i128`
    pub const fn from_i128_raw18(value: i128) -> Self {
        Self::from_raw18(I256::new(value))
    }

    /// Zero at the given scale
    pub const fn zero(decimals: u8) -> Self {
        Self::new(I256::ZERO, decimals)
    }

    /// Zero at 18 decimals
    pub const fn zero18() -> Self {
        Self::zero(token::DECIMALS)
    }

    /// Creates a whole-number value, e.g. `from_int(175, 18)` is `175.0`
    pub fn from_int(value: i128, decimals: u8) -> AcceleraResult<Self> {
        let scaled = I256::new(value)
            .checked_mul(pow10(decimals)?)
            .ok_or(AcceleraError::Overflow)?;
        Ok(Self::new(scaled, decimals))
    }

    /// Parses a decimal string such as `"0.005"` or `"-12.5"`.
    ///
    /// Fraction digits beyond `decimals` are truncated.
    pub fn parse(input: &str, decimals: u8) -> AcceleraResult<Self> {
        pow10(decimals)?;
        let invalid = || AcceleraError::InvalidDecimal {
            input: input.to_string(),
        };

        let trimmed = input.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (unsigned, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(invalid());
        }

        let scale = usize::from(decimals);
        let mut digits = String::with_capacity(int_part.len() + scale + 1);
        digits.push_str(if int_part.is_empty() { "0" } else { int_part });
        let kept = &frac_part[..frac_part.len().min(scale)];
        digits.push_str(kept);
        digits.extend(core::iter::repeat('0').take(scale - kept.len()));

        let magnitude = I256::from_str_radix(&digits, 10).map_err(|_| invalid())?;
        let value = if negative { -magnitude } else { magnitude };
        Ok(Self::new(value, decimals))
    }

    /// Returns true if the value is exactly zero
    pub fn is_zero(&self) -> bool {
        self.value == I256::ZERO
    }

    /// Returns true if the value is below zero
    pub fn is_negative(&self) -> bool {
        self.value < I256::ZERO
    }

    /// Returns the same value at another scale (truncating when reducing)
    pub fn set_decimals(self, decimals: u8) -> AcceleraResult<Self> {
        pow10(decimals)?;
        Ok(Self::new(rescale(self.value, self.decimals, decimals), decimals))
    }

    /// Exact addition at the larger of both scales
    pub fn checked_add(self, other: Self) -> AcceleraResult<Self> {
        let decimals = self.decimals.max(other.decimals);
        let a = rescale(self.value, self.decimals, decimals);
        let b = rescale(other.value, other.decimals, decimals);
        let value = a.checked_add(b).ok_or(AcceleraError::Overflow)?;
        Ok(Self::new(value, decimals))
    }

    /// Exact subtraction at the larger of both scales
    pub fn checked_sub(self, other: Self) -> AcceleraResult<Self> {
        let decimals = self.decimals.max(other.decimals);
        let a = rescale(self.value, self.decimals, decimals);
        let b = rescale(other.value, other.decimals, decimals);
        let value = a.checked_sub(b).ok_or(AcceleraError::Underflow)?;
        Ok(Self::new(value, decimals))
    }

    /// `self * other`, kept at `self`'s scale
    pub fn checked_mul(self, other: Self) -> AcceleraResult<Self> {
        let value = self
            .value
            .checked_mul(other.value)
            .ok_or(AcceleraError::Overflow)?
            / pow10(other.decimals)?;
        Ok(Self::new(value, self.decimals))
    }

    /// `self / other`, kept at `self`'s scale
    pub fn checked_div(self, other: Self) -> AcceleraResult<Self> {
        if other.is_zero() {
            return Err(AcceleraError::DivisionByZero);
        }
        let value = self
            .value
            .checked_mul(pow10(other.decimals)?)
            .ok_or(AcceleraError::Overflow)?
            .checked_div(other.value)
            .ok_or(AcceleraError::Overflow)?;
        Ok(Self::new(value, self.decimals))
    }

    /// Negative values become zero; used before displaying magnitudes
    pub fn clamp_non_negative(self) -> Self {
        if self.is_negative() {
            Self::zero(self.decimals)
        } else {
            self
        }
    }

    /// Canonical JSON form, `["<mantissa>",<decimals>]`
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Lossy conversion for display-only ratios
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(0.0)
    }
}

impl Default for Dnum {
    fn default() -> Self {
        Self::zero18()
    }
}

impl PartialEq for Dnum {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Dnum {}

impl PartialOrd for Dnum {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Dnum {
    fn cmp(&self, other: &Self) -> Ordering {
        let decimals = self.decimals.max(other.decimals);
        rescale(self.value, self.decimals, decimals)
            .cmp(&rescale(other.value, other.decimals, decimals))
    }
}

/// Saturating addition; use `checked_add` where overflow must be reported
impl Add for Dnum {
    type Output = Dnum;

    fn add(self, other: Dnum) -> Dnum {
        let decimals = self.decimals.max(other.decimals);
        let a = rescale(self.value, self.decimals, decimals);
        let b = rescale(other.value, other.decimals, decimals);
        Dnum::new(a.saturating_add(b), decimals)
    }
}

/// Saturating subtraction; use `checked_sub` where underflow must be reported
impl Sub for Dnum {
    type Output = Dnum;

    fn sub(self, other: Dnum) -> Dnum {
        let decimals = self.decimals.max(other.decimals);
        let a = rescale(self.value, self.decimals, decimals);
        let b = rescale(other.value, other.decimals, decimals);
        Dnum::new(a.saturating_sub(b), decimals)
    }
}

impl Neg for Dnum {
    type Output = Dnum;

    fn neg(self) -> Dnum {
        Dnum::new(-self.value, self.decimals)
    }
}

impl core::iter::Sum for Dnum {
    fn sum<I: Iterator<Item = Dnum>>(iter: I) -> Dnum {
        iter.fold(Dnum::zero18(), Add::add)
    }
}

impl fmt::Display for Dnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let negative = self.is_negative();
        let magnitude = if negative { -self.value } else { self.value };
        let scale = pow10_saturating(u32::from(self.decimals));
        let int_part = magnitude / scale;
        let frac_part = magnitude % scale;

        if negative {
            f.write_str("-")?;
        }
        write!(f, "{}", int_part)?;
        if frac_part != I256::ZERO {
            let padded = format!(
                "{:0>width$}",
                frac_part.to_string(),
                width = usize::from(self.decimals)
            );
            write!(f, ".{}", padded.trim_end_matches('0'))?;
        }
        Ok(())
    }
}

impl Serialize for Dnum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&(self.value.to_string(), self.decimals), serializer)
    }
}

impl<'de> Deserialize<'de> for Dnum {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (value, decimals) = <(String, u8) as Deserialize>::deserialize(deserializer)?;
        let value = I256::from_str_radix(&value, 10).map_err(serde::de::Error::custom)?;
        Ok(Self::new(value, decimals))
    }
}

impl BorshSerialize for Dnum {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.value.to_le_bytes())?;
        BorshSerialize::serialize(&self.decimals, writer)
    }
}

impl BorshDeserialize for Dnum {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
        let mut bytes = [0u8; 32];
        reader.read_exact(&mut bytes)?;
        let decimals = u8::deserialize_reader(reader)?;
        Ok(Self::new(I256::from_le_bytes(bytes), decimals))
    }
}
