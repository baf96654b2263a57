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

//! # Judge Wire Protocol
//!
//! The blocking request/response channel to the contest judge. The judge
//! writes a header once (`W M maxChanges N` plus nine cost pairs per
//! machine), then the solver and judge alternate: the solver emits one
//! line of `2·W` pattern digits per machine, the judge replies with
//! `score noViolations noDelays` followed by `W` lines of `load delay`
//! per machine.
//!
//! [`JudgeChannel`] is generic over `BufRead`/`Write`, so tests drive the
//! solver with scripted judges while the binary wires up locked
//! stdin/stdout. Tokens are read whitespace-insensitively across line
//! boundaries, the way the judge's own scanners consume them. An EOF at a
//! feedback-block boundary means the judge closed the session and is
//! reported as a clean end; an EOF anywhere else is a protocol error.

use crate::{
    err::ProblemBuildError,
    problem::{MachineCosts, Problem},
    state::State,
};
use shift_alloc_core::{
    cost::{Cost, PatternCostTable},
    pattern::{PATTERN_CODE_COUNT, Side},
};
use std::{
    fmt::Display,
    io::{BufRead, Write},
    str::FromStr,
};

/// Failures on the judge channel.
#[derive(Debug)]
pub enum ProtocolError {
    /// The underlying stream failed.
    Io(std::io::Error),
    /// The stream ended where more data was required.
    UnexpectedEof { expected: &'static str },
    /// A token could not be parsed as the expected quantity.
    Malformed { token: String, expected: &'static str },
    /// The header parsed but described an invalid problem.
    Build(ProblemBuildError),
}

impl Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolError::Io(e) => write!(f, "judge channel I/O failure: {}", e),
            ProtocolError::UnexpectedEof { expected } => {
                write!(f, "judge stream ended while expecting {}", expected)
            }
            ProtocolError::Malformed { token, expected } => {
                write!(f, "malformed judge token {:?} while expecting {}", token, expected)
            }
            ProtocolError::Build(e) => write!(f, "invalid problem header: {}", e),
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProtocolError::Io(e) => Some(e),
            ProtocolError::Build(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ProtocolError {
    fn from(e: std::io::Error) -> Self {
        ProtocolError::Io(e)
    }
}

impl From<ProblemBuildError> for ProtocolError {
    fn from(e: ProblemBuildError) -> Self {
        ProtocolError::Build(e)
    }
}

/// One machine's block of a feedback reply.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineFeedback {
    loads: Vec<f64>,
    delays: Vec<u32>,
}

impl MachineFeedback {
    #[inline]
    pub fn new(loads: Vec<f64>, delays: Vec<u32>) -> Self {
        Self { loads, delays }
    }

    #[inline]
    pub fn loads(&self) -> &[f64] {
        &self.loads
    }

    #[inline]
    pub fn delays(&self) -> &[u32] {
        &self.delays
    }

    #[inline]
    pub fn into_parts(self) -> (Vec<f64>, Vec<u32>) {
        (self.loads, self.delays)
    }
}

/// One full judge reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    score: i64,
    no_violations: u32,
    no_delays: u32,
    machines: Vec<MachineFeedback>,
}

impl Feedback {
    #[inline]
    pub fn new(
        score: i64,
        no_violations: u32,
        no_delays: u32,
        machines: Vec<MachineFeedback>,
    ) -> Self {
        Self {
            score,
            no_violations,
            no_delays,
            machines,
        }
    }

    #[inline]
    pub fn score(&self) -> i64 {
        self.score
    }

    #[inline]
    pub fn no_delays(&self) -> u32 {
        self.no_delays
    }

    #[inline]
    pub fn into_parts(self) -> (i64, u32, u32, Vec<MachineFeedback>) {
        (self.score, self.no_violations, self.no_delays, self.machines)
    }
}

/// Whitespace-token scanner over a buffered reader.
struct TokenReader<R> {
    inner: R,
    line: String,
    pos: usize,
}

impl<R: BufRead> TokenReader<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            line: String::new(),
            pos: 0,
        }
    }

    /// The next whitespace-delimited token, or `None` at end of stream.
    fn try_token(&mut self) -> Result<Option<&str>, ProtocolError> {
        loop {
            let bytes = self.line.as_bytes();
            while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.pos >= self.line.len() {
                self.line.clear();
                self.pos = 0;
                if self.inner.read_line(&mut self.line)? == 0 {
                    return Ok(None);
                }
                continue;
            }
            let start = self.pos;
            let bytes = self.line.as_bytes();
            while self.pos < bytes.len() && !bytes[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            return Ok(Some(&self.line[start..self.pos]));
        }
    }

    /// Parses the next token, treating end of stream as a protocol error.
    fn next<T: FromStr>(&mut self, expected: &'static str) -> Result<T, ProtocolError> {
        match self.try_token()? {
            Some(token) => token.parse::<T>().map_err(|_| ProtocolError::Malformed {
                token: token.to_string(),
                expected,
            }),
            None => Err(ProtocolError::UnexpectedEof { expected }),
        }
    }

    /// Parses the next token, reporting a clean end of stream as `None`.
    fn try_next<T: FromStr>(
        &mut self,
        expected: &'static str,
    ) -> Result<Option<T>, ProtocolError> {
        match self.try_token()? {
            Some(token) => token
                .parse::<T>()
                .map(Some)
                .map_err(|_| ProtocolError::Malformed {
                    token: token.to_string(),
                    expected,
                }),
            None => Ok(None),
        }
    }
}

/// The request/response channel to the judge.
pub struct JudgeChannel<R, W> {
    reader: TokenReader<R>,
    writer: W,
}

impl<R: BufRead, W: Write> JudgeChannel<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: TokenReader::new(reader),
            writer,
        }
    }

    /// The write half, for inspecting what was emitted.
    #[inline]
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Reads the initialization header: `W M maxChanges N`, then nine
    /// `(weekday, weekend)` unit-cost pairs per machine in ascending
    /// pattern-code order.
    pub fn read_problem(&mut self) -> Result<Problem, ProtocolError> {
        let weeks: usize = self.reader.next("week count")?;
        let machine_count: usize = self.reader.next("machine count")?;
        let max_changes: usize = self.reader.next("change budget")?;
        let interactions: usize = self.reader.next("interaction count")?;

        let mut machines = Vec::with_capacity(machine_count);
        for _ in 0..machine_count {
            let mut weekday = [Cost::new(0.0); PATTERN_CODE_COUNT];
            let mut weekend = [Cost::new(0.0); PATTERN_CODE_COUNT];
            for index in 0..PATTERN_CODE_COUNT {
                let wd: i64 = self.reader.next("weekday unit cost")?;
                let we: i64 = self.reader.next("weekend unit cost")?;
                weekday[index] = Cost::from(wd);
                weekend[index] = Cost::from(we);
            }
            machines.push(MachineCosts::new(
                PatternCostTable::new(weekday),
                PatternCostTable::new(weekend),
            ));
        }

        Ok(Problem::new(weeks, max_changes, interactions, machines)?)
    }

    /// Emits the current pattern grid: one line of `2·W` digits per
    /// machine, weekday digit then weekend digit per week.
    pub fn send_grid(&mut self, state: &State) -> Result<(), ProtocolError> {
        let mut line = String::new();
        for machine in state.machines() {
            line.clear();
            for week in 0..machine.weeks() {
                line.push(machine.pattern(Side::Weekday, week).as_digit());
                line.push(machine.pattern(Side::Weekend, week).as_digit());
            }
            writeln!(self.writer, "{}", line)?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Reads one feedback block. Returns `None` if the judge closed the
    /// stream instead of sending another block.
    pub fn read_feedback(&mut self, problem: &Problem) -> Result<Option<Feedback>, ProtocolError> {
        let Some(score) = self.reader.try_next::<i64>("score")? else {
            return Ok(None);
        };
        let no_violations: u32 = self.reader.next("violation count")?;
        let no_delays: u32 = self.reader.next("delay count")?;

        let mut machines = Vec::with_capacity(problem.machine_count());
        for _ in 0..problem.machine_count() {
            let mut loads = Vec::with_capacity(problem.weeks());
            let mut delays = Vec::with_capacity(problem.weeks());
            for _ in 0..problem.weeks() {
                loads.push(self.reader.next::<f64>("load")?);
                delays.push(self.reader.next::<u32>("delay")?);
            }
            machines.push(MachineFeedback::new(loads, delays));
        }

        Ok(Some(Feedback::new(score, no_violations, no_delays, machines)))
    }
}
