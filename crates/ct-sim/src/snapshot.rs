//! Serializable world views for external renderers.
//!
//! Grid `y` maps to the viewer's ground-plane `z`; renderers pick their own
//! vertical axis.  The static views (roads, destinations, obstacles) repeat
//! in every snapshot so a consumer can join late and still draw the map.

use serde::Serialize;

/// A car's position and goal at snapshot time.
#[derive(Clone, Debug, Serialize)]
pub struct CarView {
    pub id: u32,
    pub x:  i32,
    pub z:  i32,
    pub destination: CellView,
}

/// A traffic light's position and current phase.
#[derive(Clone, Debug, Serialize)]
pub struct LightView {
    pub id:   u32,
    pub x:    i32,
    pub z:    i32,
    pub open: bool,
}

/// One road cell and the direction it carries traffic.
#[derive(Clone, Debug, Serialize)]
pub struct RoadView {
    pub x: i32,
    pub z: i32,
    pub heading: ct_core::Heading,
}

/// A bare grid cell (destinations and obstacles).
#[derive(Clone, Debug, Serialize)]
pub struct CellView {
    pub x: i32,
    pub z: i32,
}

/// Full world state at one tick, built by
/// [`Sim::snapshot`][crate::Sim::snapshot].
#[derive(Clone, Debug, Serialize)]
pub struct WorldSnapshot {
    pub tick:    u64,
    pub arrived: u64,
    pub cars:    Vec<CarView>,
    pub lights:  Vec<LightView>,
    pub roads:   Vec<RoadView>,
    pub destinations: Vec<CellView>,
    pub obstacles:    Vec<CellView>,
}
