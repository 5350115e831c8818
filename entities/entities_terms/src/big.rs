//! Big Integer Module
//!
//! Provides the arbitrary-precision integer carried by big-integer terms.
//!
//! This module uses the `malachite` crate for arbitrary-precision
//! arithmetic. The wire format stores a sign byte followed by the magnitude
//! as little-endian base-256 digits, so the conversions here speak that
//! digit order directly.

use malachite::base::num::arithmetic::traits::UnsignedAbs;
use malachite::base::num::conversion::traits::PowerOf2Digits;
use malachite::{Integer, Natural};

use std::fmt;

/// Arbitrary-precision integer backed by malachite's `Integer`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BigInt {
    value: Integer,
}

impl BigInt {
    pub fn from_i64(value: i64) -> Self {
        Self {
            value: Integer::from(value),
        }
    }

    /// Build a value from a sign flag and little-endian base-256 magnitude
    /// digits: `sign * sum(digit[i] * 256^i)`.
    pub fn from_le_digits(negative: bool, digits: &[u8]) -> Self {
        let mut magnitude = Natural::from(0u32);
        let mut multiplier = Natural::from(1u32);
        for &digit in digits {
            magnitude = magnitude + Natural::from(digit) * &multiplier;
            multiplier = multiplier * Natural::from(256u32);
        }
        Self {
            value: Integer::from_sign_and_abs(!negative, magnitude),
        }
    }

    /// Decompose into a sign flag and little-endian base-256 magnitude
    /// digits. Zero yields an empty digit sequence.
    pub fn to_sign_le_digits(&self) -> (bool, Vec<u8>) {
        let magnitude: Natural = (&self.value).unsigned_abs();
        let digits = PowerOf2Digits::<u8>::to_power_of_2_digits_asc(&magnitude, 8);
        (self.is_negative(), digits)
    }

    /// Convert to i64, or `None` if the value is out of range.
    pub fn to_i64(&self) -> Option<i64> {
        let s = self.value.to_string();
        s.parse::<i64>().ok()
    }

    pub fn is_negative(&self) -> bool {
        self.value < 0
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    /// Get the internal Integer value (for advanced use)
    pub fn as_integer(&self) -> &Integer {
        &self.value
    }

    /// Create from Integer (for advanced use)
    pub fn from_integer(value: Integer) -> Self {
        Self { value }
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl From<i64> for BigInt {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}
