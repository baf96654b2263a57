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

//! # Problem Definition
//!
//! Everything the judge states once at initialization and never changes:
//! the horizon in weeks, the fleet size, the global change budget, the
//! number of interactions, and one pair of unit-cost tables per machine.

use crate::err::{
    CostTableNotMonotoneError, NegativeCostError, ProblemBuildError, ZeroDimensionError,
};
use shift_alloc_core::{
    cost::PatternCostTable,
    index::MachineIndex,
    pattern::Side,
};

/// The two unit-cost tables of one machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachineCosts {
    weekday: PatternCostTable,
    weekend: PatternCostTable,
}

impl MachineCosts {
    #[inline]
    pub const fn new(weekday: PatternCostTable, weekend: PatternCostTable) -> Self {
        Self { weekday, weekend }
    }

    #[inline]
    pub fn table(&self, side: Side) -> &PatternCostTable {
        match side {
            Side::Weekday => &self.weekday,
            Side::Weekend => &self.weekend,
        }
    }
}

/// The immutable contest instance as stated by the judge's header.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    weeks: usize,
    max_changes: usize,
    interactions: usize,
    machines: Vec<MachineCosts>,
}

impl Problem {
    /// Validates and assembles a problem.
    ///
    /// Dimensions must be non-zero and every cost table must be
    /// non-negative and monotone non-decreasing in the pattern code.
    pub fn new(
        weeks: usize,
        max_changes: usize,
        interactions: usize,
        machines: Vec<MachineCosts>,
    ) -> Result<Self, ProblemBuildError> {
        if weeks == 0 {
            return Err(ZeroDimensionError::new("weeks").into());
        }
        if interactions == 0 {
            return Err(ZeroDimensionError::new("interactions").into());
        }
        if machines.is_empty() {
            return Err(ZeroDimensionError::new("machines").into());
        }

        for (i, costs) in machines.iter().enumerate() {
            let machine = MachineIndex::new(i);
            for side in Side::BOTH {
                let table = costs.table(side);
                if !table.is_non_negative() {
                    return Err(NegativeCostError::new(machine, side).into());
                }
                if !table.is_monotone() {
                    return Err(CostTableNotMonotoneError::new(machine, side).into());
                }
            }
        }

        Ok(Self {
            weeks,
            max_changes,
            interactions,
            machines,
        })
    }

    /// Horizon length in weeks.
    #[inline]
    pub fn weeks(&self) -> usize {
        self.weeks
    }

    /// Global budget of adjacent-week pattern changes, summed over both
    /// sides of every machine.
    #[inline]
    pub fn max_changes(&self) -> usize {
        self.max_changes
    }

    /// Total number of request/feedback rounds.
    #[inline]
    pub fn interactions(&self) -> usize {
        self.interactions
    }

    #[inline]
    pub fn machine_count(&self) -> usize {
        self.machines.len()
    }

    #[inline]
    pub fn costs(&self, machine: MachineIndex) -> &MachineCosts {
        &self.machines[machine.value()]
    }

    /// Machine indices in fleet order.
    pub fn machine_indices(&self) -> impl Iterator<Item = MachineIndex> + use<> {
        (0..self.machines.len()).map(MachineIndex::new)
    }
}
