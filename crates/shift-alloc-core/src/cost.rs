// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Cost Arithmetic
//!
//! Pattern costs and cost improvements are real-valued: a move's aggregate
//! improvement is a sum of per-slot unit-cost differences, and selection
//! compares those sums strictly against zero. `Cost` wraps an `f64` so the
//! rest of the crate cannot confuse a cost with a load or a plain counter,
//! and `PatternCostTable` maps the nine pattern codes of one side to their
//! unit costs.

use crate::pattern::{PATTERN_CODE_COUNT, PatternCode};
use num_traits::Zero;
use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

/// A cost amount or cost difference, in the judge's cost units.
///
/// # Examples
///
/// ```
/// use shift_alloc_core::cost::Cost;
///
/// let a = Cost::new(300.0);
/// let b = Cost::new(100.0);
/// assert_eq!((a - b).value(), 200.0);
/// assert!((a - b).is_gain());
/// ```
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
pub struct Cost(f64);

impl Cost {
    #[inline]
    pub const fn new(value: f64) -> Self {
        Cost(value)
    }

    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Whether this value, read as a cost improvement, is a strict gain.
    ///
    /// The selection rule is strict: a zero or negative improvement is
    /// never worth applying.
    #[inline]
    pub fn is_gain(self) -> bool {
        self.0 > 0.0
    }
}

impl Display for Cost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cost({})", self.0)
    }
}

impl Add for Cost {
    type Output = Cost;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Cost(self.0 + rhs.0)
    }
}

impl AddAssign for Cost {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Cost {
    type Output = Cost;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Cost(self.0 - rhs.0)
    }
}

impl SubAssign for Cost {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Cost {
    type Output = Cost;

    #[inline]
    fn neg(self) -> Self::Output {
        Cost(-self.0)
    }
}

impl Sum for Cost {
    #[inline]
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Cost::zero(), |a, b| a + b)
    }
}

impl<'a> Sum<&'a Cost> for Cost {
    #[inline]
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Cost::zero(), |a, b| a + *b)
    }
}

impl Zero for Cost {
    #[inline]
    fn zero() -> Self {
        Cost(0.0)
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

impl From<i64> for Cost {
    #[inline]
    fn from(value: i64) -> Self {
        Cost(value as f64)
    }
}

/// Unit costs of the nine pattern codes of one side of a machine.
///
/// Provided once by the judge at initialization, in ascending pattern-code
/// order, and never mutated. The table is expected to be monotone
/// non-decreasing in the pattern code (a lower code costs no more than a
/// higher one); validation happens where the table is read off the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternCostTable([Cost; PATTERN_CODE_COUNT]);

impl PatternCostTable {
    #[inline]
    pub const fn new(costs: [Cost; PATTERN_CODE_COUNT]) -> Self {
        PatternCostTable(costs)
    }

    /// The unit cost of running one week under `code`.
    #[inline]
    pub fn cost(&self, code: PatternCode) -> Cost {
        self.0[code.table_index()]
    }

    /// Cost improvement of rewriting a slot from `from` to `to`.
    ///
    /// Positive when `to` is the cheaper code.
    #[inline]
    pub fn improvement(&self, from: PatternCode, to: PatternCode) -> Cost {
        self.cost(from) - self.cost(to)
    }

    /// Whether the table is monotone non-decreasing in the pattern code.
    pub fn is_monotone(&self) -> bool {
        self.0.windows(2).all(|w| w[0] <= w[1])
    }

    /// Whether every entry is non-negative.
    pub fn is_non_negative(&self) -> bool {
        self.0.iter().all(|c| c.value() >= 0.0)
    }

    #[inline]
    pub fn costs(&self) -> &[Cost; PATTERN_CODE_COUNT] {
        &self.0
    }
}
