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

//! # Solver State
//!
//! The fleet of machines plus the scalar feedback of the most recent
//! interaction. Higher score is better; it is the judge's own
//! cost-denominated figure and the solver never recomputes it locally.

use crate::{judge::Feedback, machine::Machine, problem::Problem};
use shift_alloc_core::index::MachineIndex;

#[derive(Debug, Clone, PartialEq)]
pub struct State {
    machines: Vec<Machine>,
    score: i64,
    no_violations: u32,
    no_delays: u32,
}

impl State {
    /// The state emitted on the very first interaction: every slot of
    /// every machine at the richest pattern, no feedback.
    pub fn initial(problem: &Problem) -> Self {
        let machines = problem
            .machine_indices()
            .map(|m| Machine::new(problem.weeks(), *problem.costs(m)))
            .collect();
        Self {
            machines,
            score: 0,
            no_violations: 0,
            no_delays: 0,
        }
    }

    #[inline]
    pub fn machines(&self) -> &[Machine] {
        &self.machines
    }

    #[inline]
    pub fn machine(&self, index: MachineIndex) -> &Machine {
        &self.machines[index.value()]
    }

    #[inline]
    pub fn machine_mut(&mut self, index: MachineIndex) -> &mut Machine {
        &mut self.machines[index.value()]
    }

    #[inline]
    pub fn score(&self) -> i64 {
        self.score
    }

    #[inline]
    pub fn no_violations(&self) -> u32 {
        self.no_violations
    }

    /// Total delay count over all machines and weeks, as reported by the
    /// judge.
    #[inline]
    pub fn no_delays(&self) -> u32 {
        self.no_delays
    }

    /// Absorbs one judge feedback block.
    pub fn apply_feedback(&mut self, feedback: Feedback) {
        let (score, no_violations, no_delays, blocks) = feedback.into_parts();
        self.score = score;
        self.no_violations = no_violations;
        self.no_delays = no_delays;
        for (machine, block) in self.machines.iter_mut().zip(blocks) {
            let (loads, delays) = block.into_parts();
            machine.set_feedback(loads, delays);
        }
    }

    /// Change count over both sides of every machine.
    pub fn total_changes(&self) -> usize {
        use shift_alloc_core::pattern::Side;
        self.machines
            .iter()
            .map(|m| m.changes(Side::Weekday) + m.changes(Side::Weekend))
            .sum()
    }
}
