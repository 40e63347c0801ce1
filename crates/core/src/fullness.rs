//! Cargo and power fill levels
//!
//! A [`Fill`] is a summed `current / max` pair over every block of a group.
//! Hosts that expose inventory volume as fixed-point integers (microlitres)
//! can build one with [`Fill::from_raw`] so the sum is exact before the
//! single division.

use core::iter::Sum;
use core::ops::Add;

/// Raw fixed-point units per whole unit (microlitres per litre)
pub const RAW_UNITS_PER_UNIT: i64 = 1_000_000;

/// Summed current and maximum amount of a block group
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Fill {
    pub current: f64,
    pub max: f64,
}

impl Fill {
    /// Nothing stored, no capacity
    pub const EMPTY: Self = Self {
        current: 0.0,
        max: 0.0,
    };

    pub fn new(current: f64, max: f64) -> Self {
        Self { current, max }
    }

    /// Build from fixed-point raw amounts (see [`RAW_UNITS_PER_UNIT`])
    pub fn from_raw(current_raw: i64, max_raw: i64) -> Self {
        Self {
            current: current_raw as f64 / RAW_UNITS_PER_UNIT as f64,
            max: max_raw as f64 / RAW_UNITS_PER_UNIT as f64,
        }
    }

    /// Fill ratio, `None` when the group has no capacity
    pub fn ratio(&self) -> Option<f32> {
        if self.max > 0.0 {
            Some((self.current / self.max) as f32)
        } else {
            None
        }
    }
}

impl Add for Fill {
    type Output = Fill;

    fn add(self, rhs: Fill) -> Fill {
        Fill {
            current: self.current + rhs.current,
            max: self.max + rhs.max,
        }
    }
}

impl Sum for Fill {
    fn sum<I: Iterator<Item = Fill>>(iter: I) -> Fill {
        iter.fold(Fill::EMPTY, Add::add)
    }
}
