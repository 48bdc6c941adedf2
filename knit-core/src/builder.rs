//! Two-needle stitch interpreter.
//!
//! The builder walks pattern tokens and simulates the needles:
//!
//! ```text
//! left needle   [parents still to be worked]  --pop-->  kill
//! right needle  [stitches made this pass]     <--push-- add
//! ```
//!
//! Every allocated stitch gets the next id from a global counter. Technique
//! applications link each consumed parent to every stitch they created, and
//! consecutive stitches on the same pass are linked horizontally. Turning the
//! work swaps the needles and suppresses the horizontal link of the next
//! stitch, since a row start has no neighbour behind it.
//!
//! State lives in [`NeedleState`] and is owned by one build, so independent
//! patterns can be built concurrently without sharing anything.

use tracing::{debug, trace};

use crate::cable::{self, CableSpec};
use crate::error::{KnitError, Result};
use crate::pattern;
use crate::technique::TechniqueTable;
use crate::types::{Edge, EdgeWeights, StitchGraph, StitchId, Technique, Token};

/// Needles, counter and edges of a single pattern build.
#[derive(Clone, Debug)]
pub struct NeedleState {
    left: Vec<StitchId>,
    right: Vec<StitchId>,
    count: usize,
    edge_flag: bool,
    edges: Vec<Edge>,
    /// Stitches at the bottom of the right needle that predate the token
    /// being applied. These are the only ones a round continuation may move.
    carried: usize,
}

impl Default for NeedleState {
    fn default() -> Self {
        Self::new()
    }
}

impl NeedleState {
    pub fn new() -> Self {
        Self {
            left: Vec::new(),
            right: Vec::new(),
            count: 0,
            edge_flag: true,
            edges: Vec::new(),
            carried: 0,
        }
    }

    pub fn left(&self) -> &[StitchId] {
        &self.left
    }

    pub fn right(&self) -> &[StitchId] {
        &self.right
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Whether the next allocated stitch will skip its horizontal link.
    pub fn edge_flag(&self) -> bool {
        self.edge_flag
    }

    pub fn into_graph(self) -> StitchGraph {
        StitchGraph::new(self.count, self.edges)
    }

    pub(crate) fn turn(&mut self) {
        std::mem::swap(&mut self.left, &mut self.right);
        self.edge_flag = true;
    }

    pub(crate) fn begin_token(&mut self) {
        self.carried = self.right.len();
    }

    pub(crate) fn allocate(&mut self) -> StitchId {
        let id = self.count;
        self.count += 1;
        self.right.push(id);
        id
    }

    pub(crate) fn link_horizontal(&mut self, id: StitchId, weights: &EdgeWeights) {
        if self.edge_flag {
            self.edge_flag = false;
            return;
        }
        if id > 0 {
            self.edges.push(Edge::horizontal(id, id - 1, weights));
        }
    }

    /// Mark that a stitch was allocated without a horizontal link.
    pub(crate) fn skip_horizontal(&mut self) {
        self.edge_flag = false;
    }

    pub(crate) fn link_vertical(&mut self, parent: StitchId, child: StitchId, weights: &EdgeWeights) {
        self.edges.push(Edge::vertical(parent, child, weights));
    }

    /// Pop the next parent, continuing in the round when the left needle is
    /// exhausted.
    pub(crate) fn take_parent(&mut self) -> Option<StitchId> {
        if self.left.is_empty() && self.carried > 0 {
            self.continue_round();
        }
        self.left.pop()
    }

    /// Pop the next parent or fail the build.
    pub(crate) fn require_parent(&mut self, token: &Token) -> Result<StitchId> {
        self.take_parent().ok_or_else(|| KnitError::Consumption {
            symbol: token.symbol.clone(),
            line: token.line,
        })
    }

    /// Move the previous pass onto the left needle, oldest stitch on top.
    fn continue_round(&mut self) {
        let carried = self.carried.min(self.right.len());
        let previous: Vec<StitchId> = self.right.drain(..carried).collect();
        self.carried = 0;
        debug!("Continuing in the round with {} stitches", previous.len());
        self.left.extend(previous.into_iter().rev());
    }
}

/// Builds stitch graphs from tokens against a technique table.
#[derive(Clone, Debug)]
pub struct GraphBuilder<'t> {
    techniques: &'t TechniqueTable,
    weights: EdgeWeights,
}

impl<'t> GraphBuilder<'t> {
    pub fn new(techniques: &'t TechniqueTable) -> Self {
        Self {
            techniques,
            weights: EdgeWeights::default(),
        }
    }

    pub fn with_weights(mut self, weights: EdgeWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn weights(&self) -> &EdgeWeights {
        &self.weights
    }

    /// Build a whole pattern. The first unknown symbol or empty-needle
    /// consumption aborts the build and no partial graph is returned.
    pub fn build(&self, tokens: &[Token]) -> Result<StitchGraph> {
        let mut state = NeedleState::new();
        for token in tokens {
            self.process_token(&mut state, token)?;
        }
        debug!(
            "Built graph with {} stitches and {} edges",
            state.count(),
            state.edges().len()
        );
        Ok(state.into_graph())
    }

    /// Tokenize and build pattern text.
    pub fn build_text(&self, text: &str) -> Result<StitchGraph> {
        self.build(&pattern::tokenize(text))
    }

    /// Apply one token to the given state.
    pub fn process_token(&self, state: &mut NeedleState, token: &Token) -> Result<()> {
        trace!("Token '{}' (line {})", token.symbol, token.line);

        if let Some(technique) = self.techniques.get(&token.symbol) {
            self.apply_technique(state, technique, token)
        } else if let Some(spec) = CableSpec::parse(&token.symbol) {
            cable::apply(state, spec, token, &self.weights)
        } else {
            Err(KnitError::UnknownSymbol {
                symbol: token.symbol.clone(),
                line: token.line,
            })
        }
    }

    fn apply_technique(
        &self,
        state: &mut NeedleState,
        technique: &Technique,
        token: &Token,
    ) -> Result<()> {
        if technique.cursor_dir {
            state.turn();
        }
        state.begin_token();

        let mut added = Vec::new();
        for _ in 0..technique.add {
            let id = state.allocate();
            state.link_horizontal(id, &self.weights);
            added.push(id);
        }

        for _ in 0..technique.kill {
            let parent = state.require_parent(token)?;
            for &child in &added {
                state.link_vertical(parent, child, &self.weights);
            }
        }

        Ok(())
    }
}
