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

//! Split creation: walk back from the side's last operating week while
//! the running mean load stays low, lowering each included week by one.
//! This may introduce a new run boundary against the untouched prefix,
//! so the candidate is emitted only if the post-move change count still
//! fits the global budget. The other side's count is taken pre-move; a
//! candidate never touches both sides.

use crate::{
    moves::{Move, MoveLabel, MovePart},
    oplib::{GenerationContext, Operator},
};
use shift_alloc_core::{index::MachineIndex, pattern::Side};
use shift_alloc_model::machine::count_changes;

pub struct CreateSplitOperator {
    side: Side,
}

impl CreateSplitOperator {
    pub fn new(side: Side) -> Self {
        Self { side }
    }
}

impl Operator for CreateSplitOperator {
    fn name(&self) -> &'static str {
        match self.side {
            Side::Weekday => "CreateSplitWeekDay",
            Side::Weekend => "CreateSplitWeekEnd",
        }
    }

    fn generate(&self, ctx: &GenerationContext<'_>, machine_index: MachineIndex, out: &mut Vec<Move>) {
        let state = ctx.state();
        let max_load = ctx.config().create_split_max_load;

        let machine = state.machine(machine_index);
        let Some(last) = machine.last_operating_week(self.side) else {
            return;
        };

        let mut reduced = machine.patterns(self.side).to_vec();
        let mut parts = Vec::new();
        let mut load_sum = 0.0;

        for week in (0..=last).rev() {
            load_sum += machine.load(week);
            let span = (last - week + 1) as f64;
            if load_sum / span > max_load {
                break;
            }
            let Some(to) = machine.pattern(self.side, week).prev() else {
                break;
            };
            parts.push(MovePart::reduction(state, machine_index, week, self.side, to));
            reduced[week] = to;
        }

        if parts.is_empty() {
            return;
        }

        let new_changes = count_changes(&reduced) as i64;
        let other_changes = machine.changes(self.side.opposite()) as i64;
        let remaining = ctx.problem().max_changes() as i64 - new_changes - other_changes;
        if remaining >= 0 {
            out.push(Move::new(
                MoveLabel::CreateSplit(machine_index, self.side),
                parts,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::SolverConfig;
    use crate::oplib::testutil::{code, problem, set_loads, set_patterns};
    use shift_alloc_model::state::State;

    fn generate(side: Side, ctx: &GenerationContext<'_>) -> Vec<Move> {
        let mut out = Vec::new();
        CreateSplitOperator::new(side).generate(ctx, MachineIndex::new(0), &mut out);
        out
    }

    #[test]
    fn test_suffix_grows_while_running_mean_stays_low() {
        let problem = problem(4, 1, 20, 10);
        let config = SolverConfig::default();
        let mut state = State::initial(&problem);
        // Week 0 is busy, the tail idles: the walk includes weeks 3, 2, 1
        // and stops when week 0 pushes the mean over the threshold.
        set_loads(&mut state, 0, &[0.9, 0.3, 0.2, 0.1]);

        let ctx = GenerationContext::new(&state, &problem, 2, false, &config);
        let moves = generate(Side::Weekday, &ctx);
        assert_eq!(moves.len(), 1);
        let weeks: Vec<usize> = moves[0].parts().iter().map(|p| p.week()).collect();
        assert_eq!(weeks, vec![3, 2, 1]);
        assert!(moves[0].parts().iter().all(|p| p.to() == code(8)));
    }

    #[test]
    fn test_no_move_when_first_week_is_already_loaded() {
        let problem = problem(4, 1, 20, 10);
        let config = SolverConfig::default();
        let mut state = State::initial(&problem);
        set_loads(&mut state, 0, &[0.9, 0.9, 0.9, 0.5]);

        let ctx = GenerationContext::new(&state, &problem, 2, false, &config);
        assert!(generate(Side::Weekday, &ctx).is_empty());
    }

    #[test]
    fn test_budget_ceiling_suppresses_the_split() {
        // Three operating weeks with identical pattern; the new boundary
        // would be the budget's second change.
        let problem_tight = problem(3, 1, 1, 10);
        let config = SolverConfig::default();
        let mut state = State::initial(&problem_tight);
        set_patterns(&mut state, 0, Side::Weekend, &[9, 8, 8]);
        set_loads(&mut state, 0, &[0.9, 0.3, 0.2]);

        let ctx = GenerationContext::new(&state, &problem_tight, 2, false, &config);
        assert!(generate(Side::Weekday, &ctx).is_empty());

        // The same state under a wider budget emits the split.
        let problem_wide = problem(3, 1, 2, 10);
        let ctx = GenerationContext::new(&state, &problem_wide, 2, false, &config);
        assert_eq!(generate(Side::Weekday, &ctx).len(), 1);
    }

    #[test]
    fn test_uniform_reduction_needs_no_budget() {
        // All weeks idle enough: the whole prefix is included, so no new
        // boundary appears and a zero budget still admits the move.
        let problem = problem(3, 1, 0, 10);
        let config = SolverConfig::default();
        let mut state = State::initial(&problem);
        set_loads(&mut state, 0, &[0.1, 0.1, 0.1]);

        let ctx = GenerationContext::new(&state, &problem, 2, false, &config);
        let moves = generate(Side::Weekday, &ctx);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].parts().len(), 3);
    }

    #[test]
    fn test_walk_stops_at_shutdown_code() {
        let problem = problem(4, 1, 20, 10);
        let config = SolverConfig::default();
        let mut state = State::initial(&problem);
        // An interior shut-down week ends the walk; nothing below code 1.
        set_patterns(&mut state, 0, Side::Weekday, &[9, 1, 2, 2]);
        set_loads(&mut state, 0, &[0.0; 4]);

        let ctx = GenerationContext::new(&state, &problem, 2, false, &config);
        let moves = generate(Side::Weekday, &ctx);
        assert_eq!(moves.len(), 1);
        let weeks: Vec<usize> = moves[0].parts().iter().map(|p| p.week()).collect();
        assert_eq!(weeks, vec![3, 2]);
        assert!(moves[0].parts().iter().all(|p| p.to() == code(1)));
    }

    #[test]
    fn test_weekend_walk_uses_weekend_horizon() {
        // Weekend operates through week 1 only; the walk and its mean
        // divisor follow the weekend's own last operating week.
        let problem = problem(4, 1, 20, 10);
        let config = SolverConfig::default();
        let mut state = State::initial(&problem);
        set_patterns(&mut state, 0, Side::Weekend, &[9, 9, 1, 1]);
        set_loads(&mut state, 0, &[0.3, 0.5, 0.0, 0.0]);

        let ctx = GenerationContext::new(&state, &problem, 2, false, &config);
        let moves = generate(Side::Weekend, &ctx);
        // Week 1 alone has mean 0.5 > 0.4, so the walk stops immediately.
        assert!(moves.is_empty());
    }
}
