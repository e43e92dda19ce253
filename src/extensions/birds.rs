use super::{Extension, ExtensionContext, find_perch_spawn};
use crate::element::Behaviour;
use crate::entity::EntityKind;

const PERIOD: u64 = 1000;
const PHASE: u64 = 700;
const MAX_BIRDS: usize = 4;

/// Releases a bird above a tree crown now and then
#[derive(Debug, Default)]
pub struct SpawnBirds;

impl Extension for SpawnBirds {
    fn name(&self) -> &'static str {
        "spawn-birds"
    }

    fn run(&mut self, ctx: &mut ExtensionContext) {
        if (ctx.iteration + PHASE) % PERIOD != 0 || ctx.area.width() <= 20 {
            return;
        }
        if ctx.entities.count_entities(EntityKind::Bird) > MAX_BIRDS {
            return;
        }
        let x = ctx.random.next_int((ctx.area.width() - 20) as u32) as i32 + 10;
        if let Some(y) = find_perch_spawn(ctx.area, x, Behaviour::TreeLeaf, 5, 6) {
            ctx.spawn(EntityKind::Bird, x, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::tests::{context_parts, fill_rect};

    #[test]
    fn test_bird_spawns_over_canopy() {
        let (mut area, mut random, defaults, mut entities) = context_parts(40, 40);
        fill_rect(&mut area, &defaults.tree_leaf, 0, 30, 39, 32);

        let mut ctx = ExtensionContext {
            area: &mut area,
            random: &mut random,
            defaults: &defaults,
            entities: &mut entities,
            iteration: 300,
        };
        SpawnBirds.run(&mut ctx);

        assert_eq!(entities.count_entities(EntityKind::Bird), 1);
        assert_eq!(entities.entities()[0].y(), 25);
    }

    #[test]
    fn test_population_cap() {
        let (mut area, mut random, defaults, mut entities) = context_parts(40, 40);
        fill_rect(&mut area, &defaults.tree_leaf, 0, 30, 39, 32);

        for iteration in (300..20_000).step_by(1000) {
            let mut ctx = ExtensionContext {
                area: &mut area,
                random: &mut random,
                defaults: &defaults,
                entities: &mut entities,
                iteration,
            };
            SpawnBirds.run(&mut ctx);
        }
        // spawning stops once more than four birds exist
        assert!(entities.count_entities(EntityKind::Bird) <= MAX_BIRDS + 1);
    }
}
