use super::{Extension, ExtensionContext, find_perch_spawn};
use crate::element::Behaviour;
use crate::entity::EntityKind;

const PERIOD: u64 = 1000;
const PHASE: u64 = 500;
const MAX_BUTTERFLIES: usize = 3;

/// Releases a butterfly above open grass now and then
#[derive(Debug, Default)]
pub struct SpawnButterflies;

impl Extension for SpawnButterflies {
    fn name(&self) -> &'static str {
        "spawn-butterflies"
    }

    fn run(&mut self, ctx: &mut ExtensionContext) {
        if (ctx.iteration + PHASE) % PERIOD != 0 || ctx.area.width() <= 20 {
            return;
        }
        if ctx.entities.count_entities(EntityKind::Butterfly) > MAX_BUTTERFLIES {
            return;
        }
        let x = ctx.random.next_int((ctx.area.width() - 20) as u32) as i32 + 10;
        if let Some(y) = find_perch_spawn(ctx.area, x, Behaviour::Grass, 4, 5) {
            ctx.spawn(EntityKind::Butterfly, x, y);
        }
    }
}
