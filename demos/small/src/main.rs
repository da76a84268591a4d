//! small — smallest runnable demo of the city-traffic workspace.
//!
//! An 8×6 one-way ring road with two destinations tucked behind the inner
//! block and a pair of traffic lights on the ring.  Cars spawn at the four
//! corners every ten ticks, route around the ring, and despawn on arrival.
//! Swap in a bigger map text to run at city scale.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use ct_core::{CarId, NodeId, SimConfig, Tick};
use ct_grid::{load_map_str, load_symbols_reader};
use ct_sim::{SimBuilder, SimObserver, WorldSnapshot};
use ct_spatial::AStarRouter;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:        u64 = 42;
const TOTAL_TICKS: u64 = 300;

// ── Embedded map ──────────────────────────────────────────────────────────────

// Double-hash delimiters: the dictionary itself contains a `"#` sequence.
const SYMBOLS_JSON: &str = r##"{
    ">": { "kind": "road", "heading": "right" },
    "<": { "kind": "road", "heading": "left" },
    "^": { "kind": "road", "heading": "up" },
    "v": { "kind": "road", "heading": "down" },
    "S": { "kind": "light", "period": 10 },
    "s": { "kind": "light", "period": 7, "open": true },
    "#": { "kind": "obstacle" },
    "D": { "kind": "destination" }
}"##;

// Counter-clockwise ring; first text line is the top row.
const MAP: &str = "\
v<<s<<<<\n\
v######^\n\
vD#####^\n\
v#####D^\n\
v######^\n\
>>>>S>>^";

// ── Observer ──────────────────────────────────────────────────────────────────

/// Tallies traffic flow and prints a progress line every 50 ticks.
#[derive(Default)]
struct FlowStats {
    spawned:  u64,
    arrived:  u64,
    moves:    u64,
    no_route: u64,
}

impl SimObserver for FlowStats {
    fn on_tick_end(&mut self, tick: Tick, moved: usize) {
        self.moves += moved as u64;
        if tick.0 > 0 && tick.0 % 50 == 0 {
            println!(
                "{tick}: {} spawned, {} arrived, {} moves so far",
                self.spawned, self.arrived, self.moves
            );
        }
    }

    fn on_car_spawned(&mut self, _tick: Tick, _car: CarId, _at: NodeId, _dest: NodeId) {
        self.spawned += 1;
    }

    fn on_car_arrived(&mut self, _tick: Tick, _car: CarId, _at: NodeId) {
        self.arrived += 1;
    }

    fn on_no_route(&mut self, _tick: Tick, _car: CarId) {
        self.no_route += 1;
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== small — city-traffic demo ===");
    println!("Ticks: {TOTAL_TICKS}  |  Seed: {SEED}");
    println!();

    // 1. Load the grid from the embedded symbol dictionary and map text.
    let symbols = load_symbols_reader(SYMBOLS_JSON.as_bytes())?;
    let grid = load_map_str(MAP, &symbols)?;
    println!("Grid: {}×{} tiles", grid.width(), grid.height());

    // 2. Sim config.
    let config = SimConfig {
        seed: SEED,
        total_ticks: TOTAL_TICKS,
        ..SimConfig::default()
    };

    // 3. Build the sim (derives the road graph, fatal on a bad map).
    let mut sim = SimBuilder::new(config, grid, AStarRouter).build()?;
    println!(
        "Road graph: {} nodes, {} edges, {} destinations",
        sim.graph().node_count(),
        sim.graph().edge_count(),
        sim.graph().destinations().len()
    );
    println!();

    // 4. Run.
    let mut stats = FlowStats::default();
    let t0 = Instant::now();
    sim.run(&mut stats);
    let elapsed = t0.elapsed();

    // 5. Summary.
    println!();
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  cars spawned : {}", stats.spawned);
    println!("  cars arrived : {}", stats.arrived);
    println!("  still driving: {}", sim.car_count());
    println!("  total moves  : {}", stats.moves);
    println!("  route misses : {}", stats.no_route);
    println!();

    // 6. Final car positions table.
    println!("{:<8} {:<10} {:<10}", "Car", "Position", "Goal");
    println!("{}", "-".repeat(30));
    for car in sim.cars() {
        let pos = sim.graph().pos_of(car.node);
        let goal = sim.graph().pos_of(car.destination);
        println!("{:<8} {:<10} {:<10}", car.id, pos.to_string(), goal.to_string());
    }

    // 7. Write the final world snapshot for external viewers.
    let snapshot: WorldSnapshot = sim.snapshot();
    std::fs::create_dir_all("output/small")?;
    let path = Path::new("output/small/final_snapshot.json");
    std::fs::write(path, serde_json::to_string_pretty(&snapshot)?)?;
    println!();
    println!("Final snapshot written to {}", path.display());

    Ok(())
}
