use super::{Extension, ExtensionContext};
use crate::sim::can_grow_up_here;

const PERIOD: u64 = 3;

/// Seeds grass on random bare soil
#[derive(Debug, Default)]
pub struct SpawnGrass;

impl Extension for SpawnGrass {
    fn name(&self) -> &'static str {
        "spawn-grass"
    }

    fn run(&mut self, ctx: &mut ExtensionContext) {
        if ctx.iteration % PERIOD != 0 || ctx.area.height() < 4 {
            return;
        }
        let x = ctx.random.next_int(ctx.area.width() as u32) as i32;
        let y = ctx.random.next_int((ctx.area.height() - 3) as u32) as i32 + 2;

        if can_grow_up_here(ctx.area, x, y) {
            if let Some(element) = ctx.defaults.grass.apply_new(x, y, ctx.random) {
                ctx.area.set_element(x, y, element);
                ctx.area.trigger(x, y);
            }
        }
    }
}
