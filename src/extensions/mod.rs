//! World extensions
//!
//! Hooks run once per tick after the processor and the entities. They
//! populate the world (grass, trees, animals) and steer entity groups.
//! Every random draw goes through the game generator, so extensions stay
//! deterministic.

mod birds;
mod butterflies;
mod fish;
mod grass;
mod trees;
mod waypoints;

pub use birds::SpawnBirds;
pub use butterflies::SpawnButterflies;
pub use fish::SpawnFish;
pub use grass::SpawnGrass;
pub use trees::SpawnTrees;
pub use waypoints::GenWaypoints;

use crate::area::ElementArea;
use crate::defaults::ProcessorDefaults;
use crate::element::{Behaviour, TypeClass, head};
use crate::entity::{EntityKind, EntityManager, SerializedEntity};
use crate::random::DeterministicRandom;
use crate::settings::ExtensionSettings;

/// Everything an extension may touch during its run
pub struct ExtensionContext<'a> {
    pub area: &'a mut ElementArea,
    pub random: &'a mut DeterministicRandom,
    pub defaults: &'a ProcessorDefaults,
    pub entities: &'a mut EntityManager,
    /// Processor iteration after the tick that just finished
    pub iteration: u64,
}

impl ExtensionContext<'_> {
    /// Insert a fresh entity anchored at `(x, y)`
    pub fn spawn(&mut self, kind: EntityKind, x: i32, y: i32) {
        let record = SerializedEntity::new(kind, x, y);
        match self.entities.add_record(&record, self.area, self.random) {
            Ok(()) => self.area.trigger(x, y),
            Err(err) => log::warn!("failed to spawn {kind} at ({x}, {y}): {err}"),
        }
    }
}

/// Per-tick world hook
pub trait Extension: std::fmt::Debug {
    fn name(&self) -> &'static str;

    fn run(&mut self, ctx: &mut ExtensionContext);
}

/// Extensions enabled by `settings`, in run order
pub fn create_extensions(settings: &ExtensionSettings) -> Vec<Box<dyn Extension>> {
    let mut extensions: Vec<Box<dyn Extension>> = Vec::new();
    if settings.grass {
        extensions.push(Box::new(SpawnGrass));
    }
    if settings.trees {
        extensions.push(Box::new(SpawnTrees));
    }
    if settings.fish {
        extensions.push(Box::new(SpawnFish));
    }
    if settings.birds {
        extensions.push(Box::new(SpawnBirds));
    }
    if settings.butterflies {
        extensions.push(Box::new(SpawnButterflies));
    }
    if settings.waypoints {
        extensions.push(Box::new(GenWaypoints));
    }
    extensions
}

/// Minimum run of air above a perch before a flyer spawns there
const PERCH_AIR_COLUMN: u32 = 15;
const PERCH_CLEARANCE_HALF_WIDTH: i32 = 5;

/// Scan column `x` top-down for the first `perch` cell with a tall run of
/// air above it. Returns the spawn row `lift` cells above the perch when a
/// cold box reaching `clearance_top` rows above the spawn row is free.
fn find_perch_spawn(area: &ElementArea, x: i32, perch: Behaviour, lift: i32, clearance_top: i32) -> Option<i32> {
    let mut air_count = 0;
    for y in 0..area.height() {
        let element_head = area.head(x, y);
        if head::type_class(element_head) == TypeClass::Air {
            air_count += 1;
        } else if head::behaviour(element_head) == perch {
            let spawn_y = y - lift;
            return (air_count >= PERCH_AIR_COLUMN && is_cold_air_box(area, x, spawn_y, clearance_top))
                .then_some(spawn_y);
        } else {
            air_count = 0;
        }
    }
    None
}

fn is_cold_air_box(area: &ElementArea, x: i32, y: i32, clearance_top: i32) -> bool {
    (-clearance_top..=2).all(|dy| {
        (-PERCH_CLEARANCE_HALF_WIDTH..=PERCH_CLEARANCE_HALF_WIDTH).all(|dx| {
            area.head_or_none(x + dx, y + dy)
                .is_some_and(|h| head::type_class(h) == TypeClass::Air && head::temperature(h) == 0)
        })
    })
}
