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

//! # Move Model
//!
//! A [`MovePart`] rewrites one `(machine, week, side)` slot and knows how
//! to undo itself; a [`Move`] is an ordered, atomically applied group of
//! parts with a stable structural identity and an aggregate cost
//! improvement. The identity string doubles as the blacklist key: two
//! candidates with the same parts in the same order are the same move,
//! whatever operator produced them.

use num_traits::Zero;
use shift_alloc_core::{
    cost::Cost,
    index::MachineIndex,
    pattern::{PatternCode, Side},
};
use shift_alloc_model::state::State;
use std::fmt::{Display, Write as _};

/// A single slot rewrite, with enough context to undo it exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct MovePart {
    machine: MachineIndex,
    week: usize,
    side: Side,
    from: PatternCode,
    to: PatternCode,
    improvement: Cost,
}

impl MovePart {
    /// Snapshots the slot's current code as `from` and records `to`,
    /// deriving the cost improvement from the side's unit-cost table.
    pub fn reduction(
        state: &State,
        machine: MachineIndex,
        week: usize,
        side: Side,
        to: PatternCode,
    ) -> Self {
        let m = state.machine(machine);
        let from = m.pattern(side, week);
        let improvement = m.unit_costs(side).improvement(from, to);
        Self {
            machine,
            week,
            side,
            from,
            to,
            improvement,
        }
    }

    #[inline]
    pub fn machine(&self) -> MachineIndex {
        self.machine
    }

    #[inline]
    pub fn week(&self) -> usize {
        self.week
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn from(&self) -> PatternCode {
        self.from
    }

    #[inline]
    pub fn to(&self) -> PatternCode {
        self.to
    }

    #[inline]
    pub fn improvement(&self) -> Cost {
        self.improvement
    }

    #[inline]
    pub fn apply(&self, state: &mut State) {
        state
            .machine_mut(self.machine)
            .set_pattern(self.side, self.week, self.to);
    }

    #[inline]
    pub fn undo(&self, state: &mut State) {
        state
            .machine_mut(self.machine)
            .set_pattern(self.side, self.week, self.from);
    }

    fn write_identity(&self, out: &mut String) {
        // The write! impl for String is infallible.
        let _ = write!(
            out,
            "{}-{}-{}-{}-{}",
            self.machine,
            self.week,
            self.side.wire_code(),
            self.from,
            self.to
        );
    }
}

/// Structural identity of a move; the blacklist key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MoveId(String);

impl MoveId {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for MoveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Symbolic name of a move, rendered to the operator-family labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveLabel {
    /// Both sides of one machine reduced across the common operating
    /// prefix.
    ReduceGlobal(MachineIndex),
    /// Every eligible machine's combined reduction in a single compound.
    ReduceGlobalFleet,
    /// One side of one machine reduced across its operating prefix.
    ReduceSide(MachineIndex, Side),
    /// One existing run of equal codes lowered by one.
    ImproveSplit(MachineIndex, Side),
    /// A trailing low-load suffix lowered by one, creating a new run
    /// boundary.
    CreateSplit(MachineIndex, Side),
    /// Trailing zero-load weeks shut down on the final interaction.
    Shutdown,
}

impl Display for MoveLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveLabel::ReduceGlobal(m) => write!(f, "ReduceGlobal{}", m),
            MoveLabel::ReduceGlobalFleet => f.write_str("ReduceGlobal"),
            MoveLabel::ReduceSide(m, side) => write!(f, "ReduceGlobal{}{}", side.label(), m),
            MoveLabel::ImproveSplit(m, side) => write!(f, "ImproveSplit{}{}", side.label(), m),
            MoveLabel::CreateSplit(m, side) => write!(f, "CreateSplit{}{}", side.label(), m),
            MoveLabel::Shutdown => f.write_str("Shutdown"),
        }
    }
}

/// An ordered group of parts applied and undone atomically.
#[derive(Debug, Clone, PartialEq)]
pub struct Move {
    label: MoveLabel,
    id: MoveId,
    improvement: Cost,
    parts: Vec<MovePart>,
}

impl Move {
    /// Builds a move over `parts`, deriving identity and aggregate
    /// improvement. Part order is significant and preserved.
    pub fn new(label: MoveLabel, parts: Vec<MovePart>) -> Self {
        let mut id = String::new();
        let mut improvement = Cost::zero();
        for (i, part) in parts.iter().enumerate() {
            if i != 0 {
                id.push('_');
            }
            part.write_identity(&mut id);
            improvement += part.improvement();
        }
        Self {
            label,
            id: MoveId(id),
            improvement,
            parts,
        }
    }

    #[inline]
    pub fn label(&self) -> MoveLabel {
        self.label
    }

    #[inline]
    pub fn id(&self) -> &MoveId {
        &self.id
    }

    #[inline]
    pub fn improvement(&self) -> Cost {
        self.improvement
    }

    #[inline]
    pub fn parts(&self) -> &[MovePart] {
        &self.parts
    }

    pub fn apply(&self, state: &mut State) {
        for part in &self.parts {
            part.apply(state);
        }
    }

    pub fn undo(&self, state: &mut State) {
        for part in &self.parts {
            part.undo(state);
        }
    }
}
