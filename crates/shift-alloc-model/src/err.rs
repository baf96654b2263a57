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

use shift_alloc_core::{index::MachineIndex, pattern::Side};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZeroDimensionError {
    dimension: &'static str,
}

impl ZeroDimensionError {
    #[inline]
    pub fn new(dimension: &'static str) -> Self {
        Self { dimension }
    }

    #[inline]
    pub fn dimension(&self) -> &'static str {
        self.dimension
    }
}

impl Display for ZeroDimensionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Problem dimension {} must be at least 1", self.dimension)
    }
}

impl std::error::Error for ZeroDimensionError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CostTableNotMonotoneError {
    machine: MachineIndex,
    side: Side,
}

impl CostTableNotMonotoneError {
    #[inline]
    pub fn new(machine: MachineIndex, side: Side) -> Self {
        Self { machine, side }
    }

    #[inline]
    pub fn machine(&self) -> MachineIndex {
        self.machine
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }
}

impl Display for CostTableNotMonotoneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Machine {} {} cost table is not monotone non-decreasing in the pattern code",
            self.machine, self.side
        )
    }
}

impl std::error::Error for CostTableNotMonotoneError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NegativeCostError {
    machine: MachineIndex,
    side: Side,
}

impl NegativeCostError {
    #[inline]
    pub fn new(machine: MachineIndex, side: Side) -> Self {
        Self { machine, side }
    }

    #[inline]
    pub fn machine(&self) -> MachineIndex {
        self.machine
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }
}

impl Display for NegativeCostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Machine {} {} cost table contains a negative unit cost",
            self.machine, self.side
        )
    }
}

impl std::error::Error for NegativeCostError {}

/// Initialization-time validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemBuildError {
    ZeroDimension(ZeroDimensionError),
    NotMonotone(CostTableNotMonotoneError),
    NegativeCost(NegativeCostError),
}

impl Display for ProblemBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProblemBuildError::ZeroDimension(e) => Display::fmt(e, f),
            ProblemBuildError::NotMonotone(e) => Display::fmt(e, f),
            ProblemBuildError::NegativeCost(e) => Display::fmt(e, f),
        }
    }
}

impl std::error::Error for ProblemBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProblemBuildError::ZeroDimension(e) => Some(e),
            ProblemBuildError::NotMonotone(e) => Some(e),
            ProblemBuildError::NegativeCost(e) => Some(e),
        }
    }
}

impl From<ZeroDimensionError> for ProblemBuildError {
    fn from(e: ZeroDimensionError) -> Self {
        ProblemBuildError::ZeroDimension(e)
    }
}

impl From<CostTableNotMonotoneError> for ProblemBuildError {
    fn from(e: CostTableNotMonotoneError) -> Self {
        ProblemBuildError::NotMonotone(e)
    }
}

impl From<NegativeCostError> for ProblemBuildError {
    fn from(e: NegativeCostError) -> Self {
        ProblemBuildError::NegativeCost(e)
    }
}
