//! Grid-based neighbour lookup.
//!
//! A read-only analysis path over a fabric that has already been laid out
//! as rows of stitch ids. It is independent of the streaming builder: given
//! a position and the edge descriptors of the stitch worked there, it finds
//! the stitch behind, the stitch below and the stitches the work bumps off
//! the needle.
//!
//! Positions outside the grid and positions without a stitch both read as
//! "no stitch".

use serde::{Deserialize, Serialize};

use crate::types::StitchId;

/// Direction of a declared edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Parse the single-letter code used in stitch descriptors (`h` / `v`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "h" => Some(Orientation::Horizontal),
            "v" => Some(Orientation::Vertical),
            _ => None,
        }
    }
}

/// Whether the stitch an edge reaches is bumped off the needle or kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Retention {
    Bump,
    Keep,
}

impl Retention {
    /// Parse the single-letter code used in stitch descriptors (`b` / `k`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "b" => Some(Retention::Bump),
            "k" => Some(Retention::Keep),
            _ => None,
        }
    }
}

/// One declared edge of a stitch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSpec {
    /// Column offset of the stitch reached, relative to the row below.
    pub offset: isize,
    pub orientation: Orientation,
    pub retention: Retention,
    pub length: usize,
}

impl EdgeSpec {
    pub fn new(offset: isize, orientation: Orientation, retention: Retention) -> Self {
        Self {
            offset,
            orientation,
            retention,
            length: 1,
        }
    }
}

/// Direction the current row is worked in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Progression {
    #[default]
    Forward,
    Backward,
}

impl Progression {
    /// Column shift into the row below.
    fn below_shift(self) -> isize {
        match self {
            Progression::Forward => 1,
            Progression::Backward => 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridPosition {
    pub row: usize,
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Rows of stitch ids, possibly ragged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StitchGrid {
    rows: Vec<Vec<StitchId>>,
}

impl StitchGrid {
    pub fn new(rows: Vec<Vec<StitchId>>) -> Self {
        Self { rows }
    }

    pub fn push_row(&mut self, row: Vec<StitchId>) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Vec<StitchId>] {
        &self.rows
    }

    /// Stitch at `position` shifted by the given offsets, if any.
    pub fn stitch_at(
        &self,
        position: GridPosition,
        row_offset: isize,
        col_offset: isize,
    ) -> Option<StitchId> {
        let row = position.row as isize + row_offset;
        let col = position.col as isize + col_offset;
        if row < 0 || col < 0 {
            return None;
        }
        self.rows.get(row as usize)?.get(col as usize).copied()
    }
}

/// Neighbours of a stitch as found by [`neighbor_edges`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NeighborSets {
    pub behind: Vec<StitchId>,
    pub below: Vec<StitchId>,
    pub kill: Vec<StitchId>,
    pub edges: Vec<(StitchId, StitchId)>,
}

/// Resolve the declared edges of the stitch `current` worked at `position`.
pub fn neighbor_edges(
    grid: &StitchGrid,
    specs: &[EdgeSpec],
    position: GridPosition,
    progression: Progression,
    current: StitchId,
) -> NeighborSets {
    let mut sets = NeighborSets::default();
    let shift = progression.below_shift();

    for spec in specs {
        match spec.orientation {
            Orientation::Horizontal => {
                if let Some(behind) = grid.stitch_at(position, 0, -1) {
                    sets.behind.push(behind);
                    sets.edges.push((current, behind));
                }
            }
            Orientation::Vertical => {
                if let Some(below) = grid.stitch_at(position, -1, shift) {
                    sets.below.push(below);
                    // The previous stitch is already linked horizontally.
                    if current.checked_sub(1) != Some(below) {
                        sets.edges.push((current, below));
                    }
                }
            }
        }

        if spec.retention == Retention::Bump {
            if let Some(bumped) = grid.stitch_at(position, -1, shift + spec.offset) {
                sets.kill.push(bumped);
            }
        }
    }

    sets
}
