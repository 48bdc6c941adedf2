//! Cable crossings.
//!
//! A cable token `c<N><letter>` works a block of `N` stitches out of order:
//! the first `N/2` parents are held aside, the next `N/2` are worked, and
//! then the held ones are worked. Held stitches come back in pop order, so
//! the first stitches taken off the needle end up on the far side of the
//! block. That reordering is the crossing.
//!
//! The letter (front/back cross and similar variants) does not change the
//! topology.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::builder::NeedleState;
use crate::error::Result;
use crate::types::{EdgeWeights, Token};

static CABLE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^c(\d+)([A-Za-z])$").unwrap());

/// Parsed cable token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CableSpec {
    /// Total stitches in the crossing. Always even and positive.
    pub width: usize,
    pub variant: char,
}

impl CableSpec {
    /// Parse a cable token. Returns `None` unless the symbol is cable-shaped
    /// with an even, positive width.
    pub fn parse(symbol: &str) -> Option<Self> {
        let caps = CABLE_TOKEN.captures(symbol)?;
        let width: usize = caps[1].parse().ok()?;
        if width == 0 || width % 2 != 0 {
            return None;
        }
        let variant = caps[2].chars().next()?;
        Some(Self { width, variant })
    }

    pub fn half(&self) -> usize {
        self.width / 2
    }
}

/// Whether a symbol is a well-formed cable token.
pub fn is_cable(symbol: &str) -> bool {
    CableSpec::parse(symbol).is_some()
}

/// Apply a cable crossing to the needles.
pub(crate) fn apply(
    state: &mut NeedleState,
    spec: CableSpec,
    token: &Token,
    weights: &EdgeWeights,
) -> Result<()> {
    state.begin_token();

    let held = (0..spec.half())
        .map(|_| state.require_parent(token))
        .collect::<Result<Vec<_>>>()?;

    for _ in 0..spec.half() {
        let id = state.allocate();
        match state.take_parent() {
            Some(parent) => {
                state.link_vertical(parent, id, weights);
                state.link_horizontal(id, weights);
            }
            None => state.skip_horizontal(),
        }
    }

    for parent in held {
        let id = state.allocate();
        state.link_vertical(parent, id, weights);
        state.link_horizontal(id, weights);
    }

    Ok(())
}
