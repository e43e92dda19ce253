use super::{Extension, ExtensionContext};
use crate::area::ElementArea;
use crate::element::{TypeClass, head};
use crate::entity::EntityKind;

const PERIOD: u64 = 9;
const MAX_FISH: usize = 4;

/// Water cells around a spawn point `(x, y)` that must all be fluid
const WATER_AROUND: [(i32, i32); 8] = [(0, 0), (-1, 0), (1, 0), (2, 0), (1, 1), (2, 1), (1, -1), (2, -1)];

/// Spawns fish into cold water pockets over a sandy bottom
#[derive(Debug, Default)]
pub struct SpawnFish;

impl Extension for SpawnFish {
    fn name(&self) -> &'static str {
        "spawn-fish"
    }

    fn run(&mut self, ctx: &mut ExtensionContext) {
        if ctx.iteration % PERIOD != 0 || ctx.area.width() < 3 || ctx.area.height() < 3 {
            return;
        }
        if ctx.entities.count_entities(EntityKind::Fish) > MAX_FISH {
            return;
        }
        let x = ctx.random.next_int((ctx.area.width() - 2) as u32) as i32 + 1;
        let y = ctx.random.next_int((ctx.area.height() - 2) as u32) as i32 + 1;
        if could_spawn_here(ctx.area, x, y) {
            ctx.spawn(EntityKind::Fish, x, y);
        }
    }
}

pub fn could_spawn_here(area: &ElementArea, x: i32, y: i32) -> bool {
    if x < 1 || y < 1 || x + 1 >= area.width() || y + 1 >= area.height() {
        return false;
    }
    if head::temperature(area.head(x, y)) > 0 {
        return false;
    }
    if !WATER_AROUND.iter().all(|&(dx, dy)| is_class_at(area, x + dx, y + dy, |c| c == TypeClass::Fluid)) {
        return false;
    }
    is_class_at(area, x, y + 2, TypeClass::is_powder) || is_class_at(area, x + 1, y + 2, TypeClass::is_powder)
}

fn is_class_at(area: &ElementArea, x: i32, y: i32, test: impl Fn(TypeClass) -> bool) -> bool {
    area.head_or_none(x, y).is_some_and(|h| test(head::type_class(h)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::tests::{context_parts, fill_rect};

    #[test]
    fn test_could_spawn_here() {
        let (mut area, _, defaults, _) = context_parts(10, 10);
        fill_rect(&mut area, &defaults.water, 0, 4, 9, 7);
        fill_rect(&mut area, &defaults.sand, 0, 8, 9, 9);

        assert!(could_spawn_here(&area, 3, 6));
        // bottom two cells away
        assert!(!could_spawn_here(&area, 3, 5));
        // surface row needs water above
        assert!(!could_spawn_here(&area, 3, 4));
        // the tail needs room on the right
        assert!(!could_spawn_here(&area, 8, 6));

        let warm = head::set_temperature(area.head(3, 6), 5);
        area.set_head(3, 6, warm);
        assert!(!could_spawn_here(&area, 3, 6));
    }

    #[test]
    fn test_fish_populate_lake() {
        let (mut area, mut random, defaults, mut entities) = context_parts(30, 12);
        fill_rect(&mut area, &defaults.water, 0, 2, 29, 9);
        fill_rect(&mut area, &defaults.sand, 0, 10, 29, 11);

        for iteration in (0..9 * 2000).step_by(9) {
            let mut ctx = ExtensionContext {
                area: &mut area,
                random: &mut random,
                defaults: &defaults,
                entities: &mut entities,
                iteration,
            };
            SpawnFish.run(&mut ctx);
        }
        let fish = entities.count_entities(EntityKind::Fish);
        assert!(fish >= 1 && fish <= MAX_FISH + 1, "fish = {fish}");
        assert!(entities.entities().iter().all(|e| e.y() == 8));
    }
}
