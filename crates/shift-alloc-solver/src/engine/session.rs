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

//! # Interactive Session
//!
//! The full request/response protocol against a judge channel: read the
//! header once, then alternate grid emission and feedback absorption for
//! `N` interactions, refining between rounds. After the final feedback
//! there is nothing left to refine; the loop ends and the final state is
//! returned. A judge that closes the stream early ends the session
//! cleanly.

use crate::engine::{config::SolverConfig, controller::HillClimber};
use shift_alloc_model::{
    judge::{JudgeChannel, ProtocolError},
    state::State,
};
use std::io::{BufRead, Write};
use tracing::{debug, info};

pub struct Session<R, W> {
    channel: JudgeChannel<R, W>,
    config: SolverConfig,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(channel: JudgeChannel<R, W>, config: SolverConfig) -> Self {
        Self { channel, config }
    }

    #[inline]
    pub fn channel(&self) -> &JudgeChannel<R, W> {
        &self.channel
    }

    /// Runs the whole session and returns the final state.
    pub fn run(&mut self) -> Result<State, ProtocolError> {
        let problem = self.channel.read_problem()?;
        info!(
            weeks = problem.weeks(),
            machines = problem.machine_count(),
            max_changes = problem.max_changes(),
            interactions = problem.interactions(),
            "judge parameters"
        );

        let mut state = State::initial(&problem);
        let mut climber = HillClimber::new(self.config.clone());

        for interaction in 1..=problem.interactions() {
            debug!(interaction, "interaction");
            self.channel.send_grid(&state)?;

            match self.channel.read_feedback(&problem)? {
                Some(feedback) => state.apply_feedback(feedback),
                None => {
                    debug!("judge closed the stream, ending session");
                    break;
                }
            }
            debug!(
                score = state.score(),
                no_violations = state.no_violations(),
                no_delays = state.no_delays(),
                "feedback"
            );

            if interaction == problem.interactions() {
                break;
            }
            climber.refine(&mut state, &problem, interaction + 1);
        }

        Ok(state)
    }
}
