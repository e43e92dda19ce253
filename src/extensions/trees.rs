use super::{Extension, ExtensionContext};
use crate::area::ElementArea;
use crate::element::{Behaviour, TypeClass, head};

/// Trees only start spawning once the landscape had time to settle
const WARMUP_ITERATIONS: u64 = 1000;
const PERIOD: u64 = 4;
const TRUNK_CLEARANCE: i32 = 18;
const NEIGHBOUR_TREE_DISTANCE: i32 = 15;
const CROWN_SIDE_OFFSET: i32 = 8;

/// Plants tree seeds into open grassland
#[derive(Debug, Default)]
pub struct SpawnTrees;

impl Extension for SpawnTrees {
    fn name(&self) -> &'static str {
        "spawn-trees"
    }

    fn run(&mut self, ctx: &mut ExtensionContext) {
        if ctx.iteration <= WARMUP_ITERATIONS || ctx.iteration % PERIOD != 0 {
            return;
        }
        if ctx.area.width() <= 12 || ctx.area.height() <= 16 {
            return;
        }
        let x = ctx.random.next_int((ctx.area.width() - 12) as u32) as i32 + 6;
        let y = ctx.random.next_int((ctx.area.height() - 16) as u32) as i32 + 15;

        if could_grow_up_here(ctx.area, x, y) {
            if let Some(element) = ctx.defaults.tree.apply_new(x, y, ctx.random) {
                log::debug!("planting tree at ({x}, {y})");
                ctx.area.set_element(x, y, element);
                ctx.area.trigger(x, y);
            }
        }
    }
}

/// Cold grass on cold soil, a free column above and no other tree nearby
pub fn could_grow_up_here(area: &ElementArea, x: i32, y: i32) -> bool {
    if x < 0 || y < 12 || x > area.width() - 5 || y > area.height() - 2 {
        return false;
    }
    let ground = area.head(x, y);
    if head::behaviour(ground) != Behaviour::Grass || head::temperature(ground) > 0 {
        return false;
    }
    let below = area.head(x, y + 1);
    if head::behaviour(below) != Behaviour::Soil || head::temperature(below) > 0 {
        return false;
    }

    if !(1..TRUNK_CLEARANCE).all(|dy| is_space_here(area, x, y - dy)) {
        return false;
    }
    if (-NEIGHBOUR_TREE_DISTANCE..NEIGHBOUR_TREE_DISTANCE).any(|dx| is_other_tree_there(area, x + dx, y - 4)) {
        return false;
    }
    (10..15).all(|dy| {
        is_space_here(area, x - CROWN_SIDE_OFFSET, y - dy) && is_space_here(area, x + CROWN_SIDE_OFFSET, y - dy)
    })
}

fn is_space_here(area: &ElementArea, x: i32, y: i32) -> bool {
    area.head_or_none(x, y).is_some_and(|h| {
        head::type_class(h) == TypeClass::Air || head::behaviour(h) == Behaviour::Grass
    })
}

fn is_other_tree_there(area: &ElementArea, x: i32, y: i32) -> bool {
    area.head_or_none(x, y)
        .is_some_and(|h| matches!(head::behaviour(h), Behaviour::TreeTrunk | Behaviour::Tree))
}
