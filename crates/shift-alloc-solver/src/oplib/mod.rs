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

//! # Move-Operator Library
//!
//! Each operator enumerates one family of candidate moves for a single
//! machine. Enumeration is exhaustive and deterministic, and candidate
//! order is the tie-breaking order during selection, so
//! [`generate_candidates`] fixes it canonically: machine by machine, the
//! reduce family, then the weekday split pair, then the weekend split
//! pair; after the last machine the fleet-wide compound reduction; the
//! terminal shutdown last.

pub mod create_split;
pub mod improve_split;
pub mod reduce;
pub mod shutdown;

use crate::{
    engine::config::SolverConfig,
    moves::{Move, MoveLabel, MovePart},
};
use shift_alloc_core::{index::MachineIndex, pattern::Side};
use shift_alloc_model::{problem::Problem, state::State};

pub mod prelude {
    pub use super::{
        GenerationContext, Operator, create_split::CreateSplitOperator, generate_candidates,
        improve_split::ImproveSplitOperator, op_list, reduce::ReduceOperator,
    };
}

/// Read-only view of everything an operator may consult.
pub struct GenerationContext<'a> {
    state: &'a State,
    problem: &'a Problem,
    upcoming_interaction: usize,
    reduce_global_failed: bool,
    config: &'a SolverConfig,
}

impl<'a> GenerationContext<'a> {
    pub fn new(
        state: &'a State,
        problem: &'a Problem,
        upcoming_interaction: usize,
        reduce_global_failed: bool,
        config: &'a SolverConfig,
    ) -> Self {
        Self {
            state,
            problem,
            upcoming_interaction,
            reduce_global_failed,
            config,
        }
    }

    #[inline]
    pub fn state(&self) -> &'a State {
        self.state
    }

    #[inline]
    pub fn problem(&self) -> &'a Problem {
        self.problem
    }

    /// 1-based index of the interaction the generated reply is for.
    #[inline]
    pub fn upcoming_interaction(&self) -> usize {
        self.upcoming_interaction
    }

    /// Whether the fleet-wide compound reduction has already been tried
    /// and reverted.
    #[inline]
    pub fn reduce_global_failed(&self) -> bool {
        self.reduce_global_failed
    }

    #[inline]
    pub fn config(&self) -> &'a SolverConfig {
        self.config
    }

    /// Whether load guards are waived for this instance (the long-run
    /// interaction count).
    #[inline]
    pub fn load_guards_waived(&self) -> bool {
        self.problem.interactions() == self.config.load_free_interaction_count
    }
}

/// One family of per-machine candidate moves.
pub trait Operator {
    fn name(&self) -> &'static str;

    /// Appends this family's candidates for `machine` to `out`.
    fn generate(&self, ctx: &GenerationContext<'_>, machine: MachineIndex, out: &mut Vec<Move>);
}

/// The per-machine operator list in canonical generation order.
pub fn op_list() -> Vec<Box<dyn Operator + Send + Sync>> {
    vec![
        Box::new(reduce::ReduceOperator),
        Box::new(improve_split::ImproveSplitOperator::new(Side::Weekday)),
        Box::new(create_split::CreateSplitOperator::new(Side::Weekday)),
        Box::new(improve_split::ImproveSplitOperator::new(Side::Weekend)),
        Box::new(create_split::CreateSplitOperator::new(Side::Weekend)),
    ]
}

/// Enumerates every candidate for the round in canonical generation
/// order: the operator list machine by machine, then the fleet-wide
/// compound reduction, then the terminal shutdown.
pub fn generate_candidates(
    ctx: &GenerationContext<'_>,
    operators: &[Box<dyn Operator + Send + Sync>],
) -> Vec<Move> {
    let mut out = Vec::new();

    for machine in ctx.problem().machine_indices() {
        for operator in operators {
            operator.generate(ctx, machine, &mut out);
        }
    }

    // The fleet-wide compound carries every part of every per-machine
    // combined reduction, in machine order.
    if !ctx.load_guards_waived() && !ctx.reduce_global_failed() {
        let fleet_parts: Vec<MovePart> = out
            .iter()
            .filter(|mv| matches!(mv.label(), MoveLabel::ReduceGlobal(_)))
            .flat_map(|mv| mv.parts().iter().cloned())
            .collect();
        if !fleet_parts.is_empty() {
            out.push(Move::new(MoveLabel::ReduceGlobalFleet, fleet_parts));
        }
    }

    shutdown::append_shutdown(ctx, &mut out);
    out
}

#[cfg(test)]
pub(crate) mod testutil {
    use shift_alloc_core::cost::{Cost, PatternCostTable};
    use shift_alloc_core::index::MachineIndex;
    use shift_alloc_core::pattern::{PATTERN_CODE_COUNT, PatternCode, Side};
    use shift_alloc_model::problem::{MachineCosts, Problem};
    use shift_alloc_model::state::State;

    /// 100, 200, .., 900 for both sides.
    pub fn linear_costs() -> MachineCosts {
        let mut costs = [Cost::new(0.0); PATTERN_CODE_COUNT];
        for (i, c) in costs.iter_mut().enumerate() {
            *c = Cost::new(100.0 * (i as f64 + 1.0));
        }
        let table = PatternCostTable::new(costs);
        MachineCosts::new(table, table)
    }

    pub fn problem(weeks: usize, machines: usize, max_changes: usize, interactions: usize) -> Problem {
        Problem::new(
            weeks,
            max_changes,
            interactions,
            vec![linear_costs(); machines],
        )
        .unwrap()
    }

    pub fn code(v: u8) -> PatternCode {
        PatternCode::new(v).unwrap()
    }

    /// Overwrites one side of one machine with the given codes.
    pub fn set_patterns(state: &mut State, machine: usize, side: Side, codes: &[u8]) {
        let machine = state.machine_mut(MachineIndex::new(machine));
        for (week, v) in codes.iter().enumerate() {
            machine.set_pattern(side, week, code(*v));
        }
    }

    pub fn set_loads(state: &mut State, machine: usize, loads: &[f64]) {
        let weeks = loads.len();
        let machine = state.machine_mut(MachineIndex::new(machine));
        machine.set_feedback(loads.to_vec(), vec![0; weeks]);
    }
}
