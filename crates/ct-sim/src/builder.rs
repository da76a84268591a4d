//! Validating constructor for a [`Sim`].

use ct_core::{SimConfig, SimRng, Tick};
use ct_grid::TileGrid;
use ct_spatial::{RoadGraphBuilder, Router};

use crate::car::CarRegistry;
use crate::lights::LightBank;
use crate::{Sim, SimResult};

/// Builder for [`Sim<R>`].
///
/// Checks the configuration knobs, derives the road graph from the grid
/// (fatal on an unusable corner), and collects the traffic lights.
///
/// # Example
///
/// ```rust,ignore
/// let symbols = load_symbols_file(Path::new("symbols.json"))?;
/// let grid = load_map_str(&map_text, &symbols)?;
/// let mut sim = SimBuilder::new(SimConfig::default(), grid, AStarRouter).build()?;
/// sim.run(&mut NoopObserver);
/// ```
pub struct SimBuilder<R: Router> {
    config: SimConfig,
    grid:   TileGrid,
    router: R,
}

impl<R: Router> SimBuilder<R> {
    pub fn new(config: SimConfig, grid: TileGrid, router: R) -> Self {
        Self { config, grid, router }
    }

    /// Validate inputs, derive the road graph, and return a ready-to-run
    /// [`Sim`] at tick 0 with no cars.
    pub fn build(self) -> SimResult<Sim<R>> {
        self.config.validate()?;
        let graph = RoadGraphBuilder::from_grid(&self.grid)?;
        let lights = LightBank::from_grid(&self.grid, &graph);
        let rng = SimRng::new(self.config.seed);

        Ok(Sim {
            config: self.config,
            tick:   Tick::ZERO,
            grid:   self.grid,
            graph,
            lights,
            cars:   CarRegistry::new(),
            router: self.router,
            rng,
            arrived_total: 0,
        })
    }
}
