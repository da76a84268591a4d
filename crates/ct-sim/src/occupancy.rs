//! Start-of-tick occupancy snapshot.
//!
//! Every movement decision within a tick is judged against this frozen
//! view, never against live positions.  A cell vacated mid-tick therefore
//! stays "occupied" until the next tick, and two cars can never swap cells
//! or chain into the same tick's vacancies.

use rustc_hash::FxHashSet;

use ct_core::NodeId;

use crate::car::CarRegistry;

/// The set of nodes holding a car at the start of the current tick.
pub struct OccupancyIndex {
    nodes: FxHashSet<NodeId>,
}

impl OccupancyIndex {
    /// Freeze the current car positions.  O(car count).
    pub fn capture(cars: &CarRegistry) -> Self {
        Self {
            nodes: cars.iter().map(|c| c.node).collect(),
        }
    }

    #[inline]
    pub fn is_occupied(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// The raw occupied-node set, as consumed by the congestion sweep.
    #[inline]
    pub fn nodes(&self) -> &FxHashSet<NodeId> {
        &self.nodes
    }
}
