//! # Unit Types
//!
//! Lightweight wrappers for the two ways a rate shows up in pricing:
//! as a percentage typed by the user (`15.0` for 15 %) and as the
//! fraction the arithmetic actually uses (`0.15`). Both serialize as
//! plain numbers.
//!
//! Currency amounts stay plain `f64`: every amount in a breakdown is in
//! the same (unspecified) currency and no conversion ever happens.
//!
//! ## Example
//!
//! ```rust
//! use pricing_core::units::{Fraction, Percent};
//!
//! let commission = Percent(15.0);
//! assert_eq!(commission.of(150.0), 22.5);
//!
//! let fraction: Fraction = commission.into();
//! assert_eq!(fraction.0, 0.15);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A rate expressed in percent (0-100 for ordinary fees and taxes)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(pub f64);

/// A rate expressed as a fraction of one (0.15 == 15 %)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fraction(pub f64);

impl Percent {
    /// Amount this percentage represents of `base`.
    pub fn of(self, base: f64) -> f64 {
        base * (self.0 / 100.0)
    }

    /// Whether the value lies in the inclusive 0-100 range.
    pub fn is_bounded(self) -> bool {
        (0.0..=100.0).contains(&self.0)
    }
}

impl Fraction {
    /// What remains of one after this fraction is taken out.
    pub fn complement(self) -> f64 {
        1.0 - self.0
    }
}

impl From<Percent> for Fraction {
    fn from(pct: Percent) -> Self {
        Fraction(pct.0 / 100.0)
    }
}

impl From<Fraction> for Percent {
    fn from(fraction: Fraction) -> Self {
        Percent(fraction.0 * 100.0)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }
    };
}

impl_arithmetic!(Percent);
impl_arithmetic!(Fraction);

/// Round a currency amount to cents, for display and export only.
///
/// Never feed the rounded value back into a calculation.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
