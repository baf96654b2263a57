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

//! Terminal shutdown: on the last outgoing grid there is no feedback
//! left to validate against, so trailing zero-load weeks are set to the
//! shutdown code outright, spending whatever change budget remains. With
//! exactly one change left only one side can afford a new boundary; the
//! side with the greater aggregate saving wins. The whole fleet's
//! shutdown is one compound move, appended after every other candidate.

use crate::{
    moves::{Move, MoveLabel, MovePart},
    oplib::GenerationContext,
};
use shift_alloc_core::{
    cost::Cost,
    pattern::{PatternCode, Side},
};

/// Appends the terminal shutdown compound, on the final interaction
/// only. Always the last candidate of the round.
pub fn append_shutdown(ctx: &GenerationContext<'_>, out: &mut Vec<Move>) {
    if ctx.upcoming_interaction() != ctx.problem().interactions() {
        return;
    }

    let state = ctx.state();
    let max_changes = ctx.problem().max_changes();
    let mut parts = Vec::new();

    for machine_index in ctx.problem().machine_indices() {
        let machine = state.machine(machine_index);
        let remaining = machine.remaining_changes(max_changes);
        if remaining <= 0 {
            continue;
        }

        let start = match (
            machine.last_operating_week(Side::Weekday),
            machine.last_operating_week(Side::Weekend),
        ) {
            (Some(a), Some(b)) => a.max(b),
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => continue,
        };

        let mut both = Vec::new();
        let mut weekday_only = Vec::new();
        let mut weekend_only = Vec::new();

        for week in (0..=start).rev() {
            if machine.load(week) > 0.0 {
                break;
            }
            let weekday = MovePart::reduction(
                state,
                machine_index,
                week,
                Side::Weekday,
                PatternCode::SHUTDOWN,
            );
            let weekend = MovePart::reduction(
                state,
                machine_index,
                week,
                Side::Weekend,
                PatternCode::SHUTDOWN,
            );
            both.push(weekday.clone());
            both.push(weekend.clone());
            weekday_only.push(weekday);
            weekend_only.push(weekend);
        }

        if remaining == 1 {
            let weekday_gain: Cost = weekday_only.iter().map(|p| p.improvement()).sum();
            let weekend_gain: Cost = weekend_only.iter().map(|p| p.improvement()).sum();
            if weekday_gain > weekend_gain {
                parts.extend(weekday_only);
            } else {
                parts.extend(weekend_only);
            }
        } else {
            parts.extend(both);
        }
    }

    if !parts.is_empty() {
        out.push(Move::new(MoveLabel::Shutdown, parts));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::SolverConfig;
    use crate::oplib::testutil::{code, problem, set_loads, set_patterns};
    use shift_alloc_model::state::State;

    fn generate(ctx: &GenerationContext<'_>) -> Vec<Move> {
        let mut out = Vec::new();
        append_shutdown(ctx, &mut out);
        out
    }

    #[test]
    fn test_only_fires_on_the_final_interaction() {
        let problem = problem(4, 1, 20, 3);
        let config = SolverConfig::default();
        let mut state = State::initial(&problem);
        set_loads(&mut state, 0, &[0.5, 0.3, 0.0, 0.0]);

        let ctx = GenerationContext::new(&state, &problem, 2, false, &config);
        assert!(generate(&ctx).is_empty());

        let ctx = GenerationContext::new(&state, &problem, 3, false, &config);
        assert_eq!(generate(&ctx).len(), 1);
    }

    #[test]
    fn test_shuts_down_trailing_zero_load_weeks_on_both_sides() {
        let problem = problem(4, 2, 20, 3);
        let config = SolverConfig::default();
        let mut state = State::initial(&problem);
        set_loads(&mut state, 0, &[0.5; 4]);
        set_loads(&mut state, 1, &[0.5, 0.3, 0.0, 0.0]);

        let ctx = GenerationContext::new(&state, &problem, 3, false, &config);
        let moves = generate(&ctx);
        assert_eq!(moves.len(), 1);
        let mv = &moves[0];
        assert_eq!(mv.label(), MoveLabel::Shutdown);
        // Machine 0 has no idle tail; machine 1 contributes weeks 3 and 2
        // on both sides.
        assert_eq!(mv.parts().len(), 4);
        assert!(mv.parts().iter().all(|p| p.machine().value() == 1));
        assert!(mv.parts().iter().all(|p| p.to() == code(1)));
        let weeks: Vec<usize> = mv.parts().iter().map(|p| p.week()).collect();
        assert_eq!(weeks, vec![3, 3, 2, 2]);
    }

    #[test]
    fn test_walk_stops_at_first_working_week() {
        let problem = problem(5, 1, 20, 2);
        let config = SolverConfig::default();
        let mut state = State::initial(&problem);
        set_loads(&mut state, 0, &[0.0, 0.4, 0.0, 0.0, 0.0]);

        let ctx = GenerationContext::new(&state, &problem, 2, false, &config);
        let moves = generate(&ctx);
        // Weeks 4, 3, 2 idle; week 1 worked, so week 0 is out of reach.
        let weeks: Vec<usize> = moves[0].parts().iter().map(|p| p.week()).collect();
        assert_eq!(weeks, vec![4, 4, 3, 3, 2, 2]);
    }

    #[test]
    fn test_single_change_left_picks_the_better_side() {
        let problem = problem(4, 1, 5, 2);
        let config = SolverConfig::default();
        let mut state = State::initial(&problem);
        // Weekday 9s vs weekend 8s: shutting down weekday weeks saves
        // more. Both sides carry two boundaries already, one change left.
        set_patterns(&mut state, 0, Side::Weekday, &[9, 8, 9, 9]);
        set_patterns(&mut state, 0, Side::Weekend, &[8, 7, 8, 8]);
        set_loads(&mut state, 0, &[0.5, 0.5, 0.0, 0.0]);

        let ctx = GenerationContext::new(&state, &problem, 2, false, &config);
        let moves = generate(&ctx);
        assert_eq!(moves.len(), 1);
        let mv = &moves[0];
        assert_eq!(mv.parts().len(), 2);
        assert!(mv.parts().iter().all(|p| p.side() == Side::Weekday));
        let weeks: Vec<usize> = mv.parts().iter().map(|p| p.week()).collect();
        assert_eq!(weeks, vec![3, 2]);
    }

    #[test]
    fn test_exhausted_budget_excludes_the_machine() {
        let problem = problem(4, 1, 4, 2);
        let config = SolverConfig::default();
        let mut state = State::initial(&problem);
        // Two boundaries per side: the whole budget is spent.
        set_patterns(&mut state, 0, Side::Weekday, &[9, 8, 9, 9]);
        set_patterns(&mut state, 0, Side::Weekend, &[9, 8, 9, 9]);
        set_loads(&mut state, 0, &[0.5, 0.5, 0.0, 0.0]);

        let ctx = GenerationContext::new(&state, &problem, 2, false, &config);
        assert!(generate(&ctx).is_empty());
    }

    #[test]
    fn test_fully_idle_machine_shuts_down_completely() {
        let problem = problem(3, 1, 20, 2);
        let config = SolverConfig::default();
        let mut state = State::initial(&problem);
        set_loads(&mut state, 0, &[0.0; 3]);

        let ctx = GenerationContext::new(&state, &problem, 2, false, &config);
        let moves = generate(&ctx);
        assert_eq!(moves[0].parts().len(), 6);
    }
}
