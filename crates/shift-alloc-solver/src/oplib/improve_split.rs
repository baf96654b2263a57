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

//! Split improvement: lower one existing run of equal codes by one,
//! scanning runs from the end of the operating prefix and taking the
//! first run that is fully operating and lightly loaded. Lowering a run
//! never adds a boundary, so no budget check is needed here.

use crate::{
    moves::{Move, MoveLabel, MovePart},
    oplib::{GenerationContext, Operator},
};
use shift_alloc_core::{index::MachineIndex, pattern::Side};

pub struct ImproveSplitOperator {
    side: Side,
}

impl ImproveSplitOperator {
    pub fn new(side: Side) -> Self {
        Self { side }
    }
}

impl Operator for ImproveSplitOperator {
    fn name(&self) -> &'static str {
        match self.side {
            Side::Weekday => "ImproveSplitWeekDay",
            Side::Weekend => "ImproveSplitWeekEnd",
        }
    }

    fn generate(&self, ctx: &GenerationContext<'_>, machine_index: MachineIndex, out: &mut Vec<Move>) {
        let state = ctx.state();
        let max_load = ctx.config().improve_split_max_load;

        let machine = state.machine(machine_index);
        let Some(last) = machine.last_operating_week(self.side) else {
            return;
        };
        let patterns = machine.patterns(self.side);

        let mut runs: Vec<(usize, usize)> = vec![(0, 1)];
        for week in 1..=last {
            if patterns[week] != patterns[week - 1] {
                runs.push((week, 1));
            } else if let Some(run) = runs.last_mut() {
                run.1 += 1;
            }
        }

        // At most one improvement per machine: the last eligible run.
        for &(start, len) in runs.iter().rev() {
            let run = &patterns[start..start + len];
            if run.iter().any(|code| code.is_shutdown()) {
                continue;
            }
            let mean: f64 = machine.loads()[start..start + len].iter().sum::<f64>() / len as f64;
            if mean > max_load {
                continue;
            }

            let mut parts = Vec::with_capacity(len);
            for week in start..start + len {
                let Some(to) = patterns[week].prev() else {
                    continue;
                };
                parts.push(MovePart::reduction(state, machine_index, week, self.side, to));
            }
            out.push(Move::new(
                MoveLabel::ImproveSplit(machine_index, self.side),
                parts,
            ));
            break;
        }
    }
}
