//! Deterministic simulation module
//!
//! The processor and the per-cell behaviour modules it dispatches to.
//! Everything here is pure with respect to its inputs:
//! - the grid and the random generator are passed in explicitly
//! - stable visiting order (bottom-to-top, precomputed column permutations)
//! - no rendering or platform dependencies

mod entity_cells;
mod fire;
mod fluid;
mod growth;
mod heat;
mod powder;
pub mod processor;
mod solid_body;

pub use growth::can_grow_up_here;
pub use processor::Processor;
