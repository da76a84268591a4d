//! Traffic-light controller.
//!
//! Lights gate *departure*: a car standing on a light's cell may only commit
//! a move while the light is open.  Entering the light's own cell is always
//! permitted — the protected region is the junction downstream of the light,
//! not the light cell itself.

use rustc_hash::FxHashMap;

use ct_core::{NodeId, Tick};
use ct_grid::{TileGrid, TileKind};
use ct_spatial::RoadGraph;

struct Light {
    node:   NodeId,
    open:   bool,
    period: u32,
}

/// All traffic lights of one simulation, in grid scan order.
#[derive(Default)]
pub struct LightBank {
    lights:  Vec<Light>,
    by_node: FxHashMap<NodeId, usize>,
}

impl LightBank {
    /// Collect every `TrafficLight` tile of `grid`, resolved to its graph
    /// node.
    pub fn from_grid(grid: &TileGrid, graph: &RoadGraph) -> Self {
        let mut bank = LightBank::default();
        for (pos, kind) in grid.iter_tiles() {
            let TileKind::TrafficLight { open, period } = kind else {
                continue;
            };
            let Some(node) = graph.node_at(pos) else { continue };
            bank.by_node.insert(node, bank.lights.len());
            bank.lights.push(Light { node, open, period });
        }
        bank
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Toggle every light whose period divides the current tick.
    ///
    /// Runs at tick 0 too, so a light's first observable state is the
    /// opposite of its configured initial one.
    pub fn advance(&mut self, now: Tick) {
        for light in &mut self.lights {
            if now.0.is_multiple_of(light.period as u64) {
                light.open = !light.open;
            }
        }
    }

    /// `true` if departure from `node` is currently permitted.
    ///
    /// Nodes without a light are always open.
    #[inline]
    pub fn is_open(&self, node: NodeId) -> bool {
        match self.by_node.get(&node) {
            Some(&i) => self.lights[i].open,
            None => true,
        }
    }

    /// Iterate `(node, open)` pairs in grid scan order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, bool)> + '_ {
        self.lights.iter().map(|l| (l.node, l.open))
    }
}
