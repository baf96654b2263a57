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

/// Tuning knobs of the hill climber. The defaults are the canonical
/// constants; instances are expected to run with them.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Upper bound on the mean operating-prefix load for a side to be
    /// globally reducible.
    pub reduce_global_max_load: f64,
    /// Upper bound on the mean load of a run for split improvement.
    pub improve_split_max_load: f64,
    /// Upper bound on the running mean load while extending a
    /// split-creation suffix.
    pub create_split_max_load: f64,
    /// Largest total delay count a partial revert will attempt to fix;
    /// anything above it goes straight to a full revert.
    pub repair_max_delays: u32,
    /// Interaction count at which the load guards are waived and the
    /// fleet-wide compound reduction is suppressed.
    pub load_free_interaction_count: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            reduce_global_max_load: 0.6,
            improve_split_max_load: 0.9,
            create_split_max_load: 0.4,
            repair_max_delays: 5,
            load_free_interaction_count: 300,
        }
    }
}
