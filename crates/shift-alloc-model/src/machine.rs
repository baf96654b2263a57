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

//! # Machine
//!
//! One resource of the fleet: two per-week pattern series (weekday and
//! weekend side), the unit-cost tables for both sides, and the load/delay
//! feedback of the most recent interaction. Pattern slots start at the
//! richest code and are mutated only through move apply/undo; feedback
//! arrays are overwritten whole after every judge reply.

use crate::problem::MachineCosts;
use shift_alloc_core::{
    cost::PatternCostTable,
    pattern::{PatternCode, Side},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Machine {
    weekday: Vec<PatternCode>,
    weekend: Vec<PatternCode>,
    costs: MachineCosts,
    loads: Vec<f64>,
    delays: Vec<u32>,
}

impl Machine {
    /// A fresh machine: every slot of both sides at the richest (safest)
    /// pattern, no feedback yet.
    pub fn new(weeks: usize, costs: MachineCosts) -> Self {
        Self {
            weekday: vec![PatternCode::RICHEST; weeks],
            weekend: vec![PatternCode::RICHEST; weeks],
            costs,
            loads: vec![0.0; weeks],
            delays: vec![0; weeks],
        }
    }

    #[inline]
    pub fn weeks(&self) -> usize {
        self.weekday.len()
    }

    #[inline]
    pub fn patterns(&self, side: Side) -> &[PatternCode] {
        match side {
            Side::Weekday => &self.weekday,
            Side::Weekend => &self.weekend,
        }
    }

    #[inline]
    pub fn pattern(&self, side: Side, week: usize) -> PatternCode {
        self.patterns(side)[week]
    }

    #[inline]
    pub fn set_pattern(&mut self, side: Side, week: usize, code: PatternCode) {
        match side {
            Side::Weekday => self.weekday[week] = code,
            Side::Weekend => self.weekend[week] = code,
        }
    }

    #[inline]
    pub fn unit_costs(&self, side: Side) -> &PatternCostTable {
        self.costs.table(side)
    }

    #[inline]
    pub fn loads(&self) -> &[f64] {
        &self.loads
    }

    #[inline]
    pub fn load(&self, week: usize) -> f64 {
        self.loads[week]
    }

    #[inline]
    pub fn delay(&self, week: usize) -> u32 {
        self.delays[week]
    }

    /// Replaces both feedback arrays with the latest judge block.
    pub fn set_feedback(&mut self, loads: Vec<f64>, delays: Vec<u32>) {
        debug_assert_eq!(loads.len(), self.weeks());
        debug_assert_eq!(delays.len(), self.weeks());
        self.loads = loads;
        self.delays = delays;
    }

    /// Number of adjacent-week pattern changes on one side.
    pub fn changes(&self, side: Side) -> usize {
        count_changes(self.patterns(side))
    }

    /// Change budget left on this machine: `max_changes` minus the change
    /// counts of both sides. Negative only transiently inside move
    /// generation, never on an emitted grid.
    pub fn remaining_changes(&self, max_changes: usize) -> i64 {
        max_changes as i64 - self.changes(Side::Weekday) as i64 - self.changes(Side::Weekend) as i64
    }

    /// The greatest week whose slot on `side` is operating (code != 1), or
    /// `None` if the whole side is shut down.
    pub fn last_operating_week(&self, side: Side) -> Option<usize> {
        self.patterns(side)
            .iter()
            .rposition(|code| !code.is_shutdown())
    }

    /// Mean load over the side's operating prefix `0..=last`, or `None`
    /// if the side has no operating week.
    pub fn operating_prefix_mean_load(&self, side: Side) -> Option<f64> {
        let last = self.last_operating_week(side)?;
        let sum: f64 = self.loads[..=last].iter().sum();
        Some(sum / (last + 1) as f64)
    }

    /// Whether the side's pattern is constant over `0..=last`.
    pub fn is_constant_through(&self, side: Side, last: usize) -> bool {
        let patterns = self.patterns(side);
        patterns[..=last].iter().all(|code| *code == patterns[0])
    }
}

/// Adjacent-week inequalities in a pattern series.
pub fn count_changes(patterns: &[PatternCode]) -> usize {
    patterns.windows(2).filter(|w| w[0] != w[1]).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::MachineCosts;
    use shift_alloc_core::cost::{Cost, PatternCostTable};
    use shift_alloc_core::pattern::PATTERN_CODE_COUNT;

    fn code(v: u8) -> PatternCode {
        PatternCode::new(v).unwrap()
    }

    fn linear_costs() -> MachineCosts {
        let mut costs = [Cost::new(0.0); PATTERN_CODE_COUNT];
        for (i, c) in costs.iter_mut().enumerate() {
            *c = Cost::new(100.0 * (i as f64 + 1.0));
        }
        let table = PatternCostTable::new(costs);
        MachineCosts::new(table, table)
    }

    fn machine_with_weekday(patterns: &[u8]) -> Machine {
        let mut machine = Machine::new(patterns.len(), linear_costs());
        for (week, v) in patterns.iter().enumerate() {
            machine.set_pattern(Side::Weekday, week, code(*v));
        }
        machine
    }

    #[test]
    fn test_new_machine_is_all_richest() {
        let machine = Machine::new(4, linear_costs());
        for side in Side::BOTH {
            assert!(
                machine
                    .patterns(side)
                    .iter()
                    .all(|c| *c == PatternCode::RICHEST)
            );
        }
        assert!(machine.loads().iter().all(|l| *l == 0.0));
    }

    #[test]
    fn test_count_changes() {
        assert_eq!(count_changes(&[code(9), code(9), code(9)]), 0);
        assert_eq!(count_changes(&[code(9), code(8), code(8)]), 1);
        assert_eq!(count_changes(&[code(9), code(8), code(9)]), 2);
        assert_eq!(count_changes(&[code(9)]), 0);
    }

    #[test]
    fn test_remaining_changes_sums_both_sides() {
        let mut machine = machine_with_weekday(&[9, 8, 8, 9]);
        machine.set_pattern(Side::Weekend, 1, code(7));
        // weekday: 2 changes, weekend: 2 changes
        assert_eq!(machine.remaining_changes(20), 16);
        assert_eq!(machine.remaining_changes(3), -1);
    }

    #[test]
    fn test_last_operating_week_skips_shutdown_suffix() {
        let machine = machine_with_weekday(&[9, 9, 1, 1]);
        assert_eq!(machine.last_operating_week(Side::Weekday), Some(1));
        assert_eq!(machine.last_operating_week(Side::Weekend), Some(3));

        let machine = machine_with_weekday(&[1, 1, 1, 1]);
        assert_eq!(machine.last_operating_week(Side::Weekday), None);
    }

    #[test]
    fn test_operating_prefix_mean_load() {
        let mut machine = machine_with_weekday(&[9, 9, 1, 1]);
        machine.set_feedback(vec![0.4, 0.2, 0.0, 0.0], vec![0; 4]);
        let mean = machine.operating_prefix_mean_load(Side::Weekday).unwrap();
        assert!((mean - 0.3).abs() < 1e-12);

        let machine = machine_with_weekday(&[1, 1, 1, 1]);
        assert!(machine.operating_prefix_mean_load(Side::Weekday).is_none());
    }

    #[test]
    fn test_is_constant_through() {
        let machine = machine_with_weekday(&[9, 9, 8, 1]);
        assert!(machine.is_constant_through(Side::Weekday, 1));
        assert!(!machine.is_constant_through(Side::Weekday, 2));
    }

    #[test]
    fn test_set_feedback_overwrites_whole_arrays() {
        let mut machine = Machine::new(2, linear_costs());
        machine.set_feedback(vec![0.5, 0.0], vec![0, 3]);
        machine.set_feedback(vec![0.1, 0.2], vec![0, 0]);
        assert_eq!(machine.load(0), 0.1);
        assert_eq!(machine.delay(1), 0);
    }
}
