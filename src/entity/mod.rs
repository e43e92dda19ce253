//! State-machine entities living on top of the grid
//!
//! - `state_definition`: cyclic pose tables
//! - `species`: bird, butterfly and fish strategy tables
//! - `record`: JSON records used by snapshots and insertion
//! - `agent`: the per-entity state machine
//! - `manager`: ownership, lifecycle and position lookup

mod agent;
mod lookup;
mod manager;
mod record;
mod species;
mod state_definition;

pub use agent::{Entity, STATE_DEAD};
pub use lookup::EntityPositionLookup;
pub use manager::EntityManager;
pub use record::SerializedEntity;
pub use species::{EntityKind, Locomotion, Species};
pub use state_definition::{Offset, PartMove, StateDefinition};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EntityError {
    #[error("unknown entity kind: {0}")]
    UnknownKind(String),
    #[error("malformed entity record: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("{kind} has no pose {state}")]
    InvalidState { kind: EntityKind, state: i32 },
    #[error("entity anchor ({x}, {y}) lies outside the grid")]
    OutOfBounds { x: i32, y: i32 },
}
