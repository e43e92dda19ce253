//! Sand Sim - a deterministic falling-sand cellular automaton
//!
//! Core modules:
//! - `element`: packed head/tail cell encoding
//! - `area`: the element grid with chunk change tracking
//! - `sim`: the chunked processor and per-cell behaviours
//! - `entity`: state-machine creatures painted into the grid
//! - `extensions`: per-tick world hooks (vegetation, spawning, steering)
//! - `persistence`: snapshots
//! - `game`: the facade tying it all together
//!
//! Given the same seed, snapshot and inputs, every tick produces bit-identical
//! grids.

pub mod area;
pub mod brush;
pub mod chunks;
pub mod defaults;
pub mod driver;
pub mod element;
pub mod entity;
pub mod extensions;
pub mod flood_fill;
pub mod game;
pub mod graphics;
pub mod persistence;
pub mod random;
pub mod settings;
pub mod sim;

pub use area::ElementArea;
pub use driver::FixedStepDriver;
pub use element::Element;
pub use game::SandGame;
pub use random::DeterministicRandom;
pub use settings::{BoundaryMode, Settings};

/// Simulation configuration constants
pub mod consts {
    /// Physics ticks per second
    pub const CYCLES_PER_SECOND: u32 = 120;
    /// Render callbacks per second
    pub const FRAMES_PER_SECOND: u32 = 60;
    /// Maximum ticks per driver update to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame gap the driver catches up on (seconds)
    pub const MAX_FRAME_TIME: f64 = 0.1;

    /// Edge length of a scheduling chunk
    pub const DEFAULT_CHUNK_SIZE: usize = 16;
}
