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

//! Global reductions: lower a machine's whole operating prefix by one
//! code, per side and for both sides together. A side qualifies only
//! while its pattern is still constant over the operating prefix; once a
//! split exists, the split operators take over. The per-machine combined
//! moves are also what the fleet-wide compound is assembled from, after
//! every machine has generated.

use crate::{
    moves::{Move, MoveLabel, MovePart},
    oplib::{GenerationContext, Operator},
};
use shift_alloc_core::{index::MachineIndex, pattern::Side};
use shift_alloc_model::machine::Machine;

/// The operating prefix `0..=last` of `side`, if the side is reducible as
/// a whole: operating, constant, and under the load threshold (unless
/// waived for the long-run interaction count).
fn reducible_prefix(
    machine: &Machine,
    side: Side,
    load_guards_waived: bool,
    max_load: f64,
) -> Option<usize> {
    let last = machine.last_operating_week(side)?;
    if !machine.is_constant_through(side, last) {
        return None;
    }
    if !load_guards_waived {
        let mean = machine.operating_prefix_mean_load(side)?;
        if mean > max_load {
            return None;
        }
    }
    Some(last)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReduceOperator;

impl Operator for ReduceOperator {
    fn name(&self) -> &'static str {
        "Reduce"
    }

    fn generate(&self, ctx: &GenerationContext<'_>, machine_index: MachineIndex, out: &mut Vec<Move>) {
        let state = ctx.state();
        let waived = ctx.load_guards_waived();
        let max_load = ctx.config().reduce_global_max_load;
        let machine = state.machine(machine_index);

        let weekday = reducible_prefix(machine, Side::Weekday, waived, max_load);
        let weekend = reducible_prefix(machine, Side::Weekend, waived, max_load);

        if let (Some(last_wd), Some(last_we)) = (weekday, weekend) {
            let mut parts = Vec::new();
            for week in 0..=last_wd.min(last_we) {
                for side in Side::BOTH {
                    // The prefix is constant and operating, so a lower
                    // code always exists.
                    let Some(to) = machine.pattern(side, week).prev() else {
                        continue;
                    };
                    parts.push(MovePart::reduction(state, machine_index, week, side, to));
                }
            }
            out.push(Move::new(MoveLabel::ReduceGlobal(machine_index), parts));
        }

        for (side, last) in [(Side::Weekday, weekday), (Side::Weekend, weekend)] {
            let Some(last) = last else { continue };
            let mut parts = Vec::with_capacity(last + 1);
            for week in 0..=last {
                let Some(to) = machine.pattern(side, week).prev() else {
                    continue;
                };
                parts.push(MovePart::reduction(state, machine_index, week, side, to));
            }
            out.push(Move::new(MoveLabel::ReduceSide(machine_index, side), parts));
        }
    }
}
