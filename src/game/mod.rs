/// Game orchestration: session flow, shared counters, and the per-level
/// runtime driven by the animation loop.

pub mod counter;
pub mod flow;
pub mod level;
pub mod world;
