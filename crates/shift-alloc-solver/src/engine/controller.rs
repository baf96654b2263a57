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

//! # Hill-Climb Controller
//!
//! One refine step per interaction: fold the latest feedback into the
//! best-so-far, revert the previous move if the judge punished it (in
//! full, or partially when only a few slots caused delays), then
//! enumerate candidates and apply the best strict improvement that is
//! not blacklisted. A reverted move's identity is blacklisted forever;
//! the fleet-wide compound reduction additionally latches a failure flag
//! that suppresses it for the rest of the session.

use crate::{
    engine::config::SolverConfig,
    moves::{Move, MoveId, MoveLabel},
    oplib::{self, GenerationContext, Operator},
};
use shift_alloc_model::{problem::Problem, state::State};
use std::collections::HashSet;
use tracing::debug;

pub struct HillClimber {
    config: SolverConfig,
    operators: Vec<Box<dyn Operator + Send + Sync>>,
    best_score: i64,
    last_move: Option<Move>,
    bad_moves: HashSet<MoveId>,
    reduce_global_failed: bool,
    is_repairing: bool,
}

impl HillClimber {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            operators: oplib::op_list(),
            best_score: 0,
            last_move: None,
            bad_moves: HashSet::new(),
            reduce_global_failed: false,
            is_repairing: false,
        }
    }

    /// Maximum score observed so far; never decreases.
    #[inline]
    pub fn best_score(&self) -> i64 {
        self.best_score
    }

    /// One step of the climb, preparing the reply for
    /// `upcoming_interaction` (1-based) from the feedback already folded
    /// into `state`.
    pub fn refine(&mut self, state: &mut State, problem: &Problem, upcoming_interaction: usize) {
        if state.score() > self.best_score {
            self.best_score = state.score();
        }

        if let Some(last) = self.last_move.take() {
            if state.no_delays() > 0 || state.score() < self.best_score {
                if self.try_repair(&last, state, problem) {
                    debug!(
                        "optimization {} caused delays, repaired in place",
                        last.label()
                    );
                    // The repaired remainder goes out as-is; it is still
                    // the move under validation.
                    self.last_move = Some(last);
                    return;
                }

                debug!("optimization {} does not work, reverting", last.label());
                last.undo(state);
                self.bad_moves.insert(last.id().clone());
                if last.label() == MoveLabel::ReduceGlobalFleet {
                    self.reduce_global_failed = true;
                }
                self.is_repairing = false;
            } else {
                debug!("optimization {} works", last.label());
            }
        }

        let mut candidates = {
            let ctx = GenerationContext::new(
                state,
                problem,
                upcoming_interaction,
                self.reduce_global_failed,
                &self.config,
            );
            oplib::generate_candidates(&ctx, &self.operators)
        };

        let mut best: Option<usize> = None;
        for (i, candidate) in candidates.iter().enumerate() {
            if !candidate.improvement().is_gain() {
                continue;
            }
            if self.bad_moves.contains(candidate.id()) {
                continue;
            }
            let better = match best {
                None => true,
                Some(j) => candidate.improvement() > candidates[j].improvement(),
            };
            if better {
                best = Some(i);
            }
        }

        self.last_move = best.map(|i| {
            let chosen = candidates.swap_remove(i);
            debug!(
                "trying optimization {} (cost improvement: {})",
                chosen.label(),
                chosen.improvement()
            );
            chosen.apply(state);
            chosen
        });
        if self.last_move.is_none() {
            debug!("no optimizations to try");
        }
    }

    /// Attempts a partial revert: undo only the parts of `last` touching
    /// slots the judge reported delays on. Keeps the result only if every
    /// machine still fits the change budget; otherwise reports failure
    /// and leaves the full revert to the caller (a later full undo
    /// restores every slot regardless of the partial undo).
    fn try_repair(&mut self, last: &Move, state: &mut State, problem: &Problem) -> bool {
        if self.is_repairing {
            return false;
        }
        if state.no_delays() == 0 || state.no_delays() > self.config.repair_max_delays {
            return false;
        }
        self.is_repairing = true;

        for machine_index in problem.machine_indices() {
            for week in 0..problem.weeks() {
                if state.machine(machine_index).delay(week) == 0 {
                    continue;
                }
                for part in last.parts() {
                    if part.machine() == machine_index && part.week() == week {
                        part.undo(state);
                    }
                }
            }
        }

        problem
            .machine_indices()
            .all(|m| state.machine(m).remaining_changes(problem.max_changes()) >= 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oplib::testutil::{problem, set_patterns};
    use shift_alloc_core::{
        index::MachineIndex,
        pattern::{PatternCode, Side},
    };
    use shift_alloc_model::judge::{Feedback, MachineFeedback};
    use static_assertions::assert_impl_all;

    assert_impl_all!(HillClimber: Send);

    fn feedback(score: i64, blocks: Vec<(Vec<f64>, Vec<u32>)>) -> Feedback {
        let no_delays = blocks
            .iter()
            .flat_map(|(_, delays)| delays.iter())
            .sum::<u32>();
        let machines = blocks
            .into_iter()
            .map(|(loads, delays)| MachineFeedback::new(loads, delays))
            .collect();
        Feedback::new(score, 0, no_delays, machines)
    }

    fn quiet(weeks: usize, machines: usize, load: f64, score: i64) -> Feedback {
        feedback(score, vec![(vec![load; weeks], vec![0; weeks]); machines])
    }

    fn all_codes_are(state: &State, machine: usize, value: u8) -> bool {
        let machine = state.machine(MachineIndex::new(machine));
        Side::BOTH.iter().all(|side| {
            machine
                .patterns(*side)
                .iter()
                .all(|c| c.value() == value)
        })
    }

    #[test]
    fn test_applies_the_largest_strict_improvement() {
        let problem = problem(4, 2, 20, 10);
        let mut state = State::initial(&problem);
        let mut climber = HillClimber::new(SolverConfig::default());

        state.apply_feedback(quiet(4, 2, 0.2, 100));
        climber.refine(&mut state, &problem, 2);

        // The fleet-wide compound dominates every per-machine candidate.
        assert_eq!(
            climber.last_move.as_ref().map(|m| m.label()),
            Some(MoveLabel::ReduceGlobalFleet)
        );
        assert!(all_codes_are(&state, 0, 8));
        assert!(all_codes_are(&state, 1, 8));
        assert_eq!(climber.best_score(), 100);
    }

    #[test]
    fn test_best_score_is_non_decreasing() {
        let problem = problem(4, 1, 20, 10);
        let mut state = State::initial(&problem);
        let mut climber = HillClimber::new(SolverConfig::default());

        state.apply_feedback(quiet(4, 1, 0.2, 100));
        climber.refine(&mut state, &problem, 2);
        assert_eq!(climber.best_score(), 100);

        state.apply_feedback(quiet(4, 1, 0.2, 40));
        climber.refine(&mut state, &problem, 3);
        assert_eq!(climber.best_score(), 100);

        state.apply_feedback(quiet(4, 1, 0.2, 160));
        climber.refine(&mut state, &problem, 4);
        assert_eq!(climber.best_score(), 160);
    }

    #[test]
    fn test_score_drop_reverts_and_blacklists() {
        let problem = problem(4, 2, 20, 10);
        let mut state = State::initial(&problem);
        let mut climber = HillClimber::new(SolverConfig::default());

        state.apply_feedback(quiet(4, 2, 0.2, 100));
        climber.refine(&mut state, &problem, 2);
        let applied = climber.last_move.clone().unwrap();
        assert_eq!(applied.label(), MoveLabel::ReduceGlobalFleet);

        state.apply_feedback(quiet(4, 2, 0.2, 50));
        climber.refine(&mut state, &problem, 3);

        // The compound was rolled back and latched as failed; the climb
        // falls back to the best per-machine candidate.
        assert!(climber.bad_moves.contains(applied.id()));
        assert!(climber.reduce_global_failed);
        assert_eq!(
            climber.last_move.as_ref().map(|m| m.label()),
            Some(MoveLabel::ReduceGlobal(MachineIndex::new(0)))
        );
        assert!(all_codes_are(&state, 0, 8));
        assert!(all_codes_are(&state, 1, 9));
    }

    #[test]
    fn test_blacklisted_identity_is_never_reapplied() {
        let problem = problem(2, 1, 20, 10);
        let mut state = State::initial(&problem);
        let mut climber = HillClimber::new(SolverConfig::default());
        // Leave only the weekday side in play, loaded enough that split
        // creation is out: every remaining candidate shares one identity.
        set_patterns(&mut state, 0, Side::Weekend, &[1, 1]);

        state.apply_feedback(feedback(100, vec![(vec![0.5, 0.5], vec![0, 0])]));
        climber.refine(&mut state, &problem, 2);
        assert!(climber.last_move.is_some());

        state.apply_feedback(feedback(50, vec![(vec![0.5, 0.5], vec![0, 0])]));
        climber.refine(&mut state, &problem, 3);

        // The identical re-enumerated candidates are all blacklisted.
        assert!(climber.last_move.is_none());
        let machine = state.machine(MachineIndex::new(0));
        assert!(
            machine
                .patterns(Side::Weekday)
                .iter()
                .all(|c| *c == PatternCode::RICHEST)
        );
    }

    #[test]
    fn test_delays_trigger_revert_even_when_score_improves() {
        let problem = problem(4, 1, 20, 10);
        let mut state = State::initial(&problem);
        let mut climber = HillClimber::new(SolverConfig::default());

        state.apply_feedback(quiet(4, 1, 0.2, 100));
        climber.refine(&mut state, &problem, 2);
        let applied = climber.last_move.clone().unwrap();

        // Six delays: beyond repair, reverted despite the higher score.
        state.apply_feedback(feedback(
            200,
            vec![(vec![0.2; 4], vec![6, 0, 0, 0])],
        ));
        climber.refine(&mut state, &problem, 3);

        assert!(climber.bad_moves.contains(applied.id()));
        assert_eq!(climber.best_score(), 200);
    }

    #[test]
    fn test_localized_delays_are_repaired_in_place() {
        let problem = problem(4, 3, 20, 10);
        let mut state = State::initial(&problem);
        let mut climber = HillClimber::new(SolverConfig::default());

        state.apply_feedback(quiet(4, 3, 0.2, 100));
        climber.refine(&mut state, &problem, 2);
        assert_eq!(
            climber.last_move.as_ref().map(|m| m.label()),
            Some(MoveLabel::ReduceGlobalFleet)
        );

        // Two delays localized to machine 0, week 1.
        state.apply_feedback(feedback(
            90,
            vec![
                (vec![0.2; 4], vec![0, 2, 0, 0]),
                (vec![0.2; 4], vec![0; 4]),
                (vec![0.2; 4], vec![0; 4]),
            ],
        ));
        climber.refine(&mut state, &problem, 3);

        // Only the delayed slot was restored; the rest of the move
        // stands, and the move is still under validation.
        let repaired = state.machine(MachineIndex::new(0));
        assert_eq!(repaired.pattern(Side::Weekday, 1), PatternCode::RICHEST);
        assert_eq!(repaired.pattern(Side::Weekend, 1), PatternCode::RICHEST);
        assert_eq!(repaired.pattern(Side::Weekday, 0).value(), 8);
        assert!(all_codes_are(&state, 1, 8));
        assert!(all_codes_are(&state, 2, 8));
        assert!(climber.is_repairing);
        assert!(climber.last_move.is_some());
        assert!(
            problem
                .machine_indices()
                .all(|m| state.machine(m).remaining_changes(problem.max_changes()) >= 0)
        );

        // Still regressing on the next reply: the repaired move goes
        // through the full revert, restoring the pre-move grid.
        state.apply_feedback(feedback(
            80,
            vec![
                (vec![0.2; 4], vec![0, 1, 0, 0]),
                (vec![0.2; 4], vec![0; 4]),
                (vec![0.2; 4], vec![0; 4]),
            ],
        ));
        climber.refine(&mut state, &problem, 4);
        assert!(!climber.is_repairing);
        assert!(climber.reduce_global_failed);
        // A fresh move may already be applied on top of the reverted
        // grid; the reverted compound itself is blacklisted.
        assert_eq!(climber.bad_moves.len(), 1);
    }

    #[test]
    fn test_no_candidates_leaves_patterns_untouched() {
        let problem = problem(4, 1, 20, 10);
        let mut state = State::initial(&problem);
        let mut climber = HillClimber::new(SolverConfig::default());

        state.apply_feedback(quiet(4, 1, 0.95, 100));
        climber.refine(&mut state, &problem, 2);

        assert!(climber.last_move.is_none());
        assert!(all_codes_are(&state, 0, 9));
    }

    #[test]
    fn test_fleet_compound_not_regenerated_after_failure() {
        let problem = problem(4, 1, 20, 10);
        let mut state = State::initial(&problem);
        let mut climber = HillClimber::new(SolverConfig::default());
        climber.reduce_global_failed = true;

        state.apply_feedback(quiet(4, 1, 0.2, 100));
        climber.refine(&mut state, &problem, 2);

        // The best remaining candidate is the per-machine compound.
        assert_eq!(
            climber.last_move.as_ref().map(|m| m.label()),
            Some(MoveLabel::ReduceGlobal(MachineIndex::new(0)))
        );
    }
}
