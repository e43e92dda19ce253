//! Fluid and gas movement
//!
//! Fluids fall, slide diagonally and then spread sideways up to their
//! dispersion. Gases do the same upwards, gated on row parity so a gas
//! cell rises at most one row per tick.

use super::processor::{Step, TickContext};
use crate::element::{TypeClass, head};

pub(crate) fn step(t: &mut TickContext, x: i32, y: i32, element_head: u32) -> Step {
    let weight = TypeClass::Fluid.weight();
    let below = y + 1;
    let at_bottom = below >= t.area.height();

    if at_bottom {
        let exit = t.leave_bottom(x, y, weight);
        if exit != Step::Stay {
            return exit;
        }
    } else if t.is_lighter(x, below, weight) {
        t.area.swap(x, y, x, below);
        return Step::Moved(x, below);
    }

    let dir = if t.random.next_bool() { 1 } else { -1 };
    if !at_bottom {
        for dx in [dir, -dir] {
            let nx = x + dx;
            if t.is_lighter(nx, below, weight) && t.is_lighter(nx, y, weight) {
                t.area.swap(x, y, nx, below);
                return Step::Moved(nx, below);
            }
        }
    }

    spread(t, x, y, dir, head::fluid_dispersion(element_head), weight, 1)
}

pub(crate) fn gas_step(t: &mut TickContext, x: i32, y: i32, element_head: u32) -> Step {
    if (t.iteration + y as u64) % 2 != 0 {
        t.area.trigger(x, y);
        return Step::Stay;
    }

    let weight = TypeClass::Gas.weight();
    let above = y - 1;
    if t.is_lighter(x, above, weight) {
        t.area.swap(x, y, x, above);
        return Step::Moved(x, above);
    }

    let dir = if t.random.next_bool() { 1 } else { -1 };
    for dx in [dir, -dir] {
        let nx = x + dx;
        if t.is_lighter(nx, above, weight) && t.is_lighter(nx, y, weight) {
            t.area.swap(x, y, nx, above);
            return Step::Moved(nx, above);
        }
    }

    spread(t, x, y, dir, head::fluid_dispersion(element_head), weight, -1)
}

/// Sideways flow along row `y`, stopping early next to a gap in the `flow` direction
fn spread(t: &mut TickContext, x: i32, y: i32, dir: i32, dispersion: u32, weight: u32, flow: i32) -> Step {
    let reach = dispersion.max(1) as i32;
    for dx in [dir, -dir] {
        let mut target = None;
        for k in 1..=reach {
            let nx = x + dx * k;
            if !t.is_lighter(nx, y, weight) {
                break;
            }
            target = Some(nx);
            if t.is_lighter(nx, y + flow, weight) {
                break;
            }
        }
        if let Some(nx) = target {
            t.area.swap(x, y, nx, y);
            return Step::Moved(nx, y);
        }
    }
    Step::Stay
}

#[cfg(test)]
mod tests {
    use crate::area::ElementArea;
    use crate::defaults::ProcessorDefaults;
    use crate::element::{Element, TypeClass, head, tail};
    use crate::random::DeterministicRandom;
    use crate::sim::Processor;

    fn fluid(dispersion: u32) -> Element {
        Element::new(head::of(head::type8_fluid(head::TYPE_FLUID, dispersion), 0, 0), tail::rgb(0, 0, 255))
    }

    fn gas() -> Element {
        Element::new(head::of(head::type8_fluid(head::TYPE_GAS, 2), 0, 0), tail::rgb(200, 200, 200))
    }

    fn run(area: &mut ElementArea, ticks: usize) {
        let mut processor = Processor::new(16, ProcessorDefaults::default());
        let mut random = DeterministicRandom::new(3);
        for _ in 0..ticks {
            processor.next(area, &mut random);
        }
    }

    #[test]
    fn test_spread_moves_once_per_tick() {
        for seed in 0..50 {
            let mut area = ElementArea::with_chunk_size(64, 1, 4, ProcessorDefaults::air_element());
            area.set_element(30, 0, fluid(4));
            let mut processor = Processor::new(4, ProcessorDefaults::default());
            processor.next(&mut area, &mut DeterministicRandom::new(seed));
            let x = (0..64).find(|&x| !area.element(x, 0).is_air());
            assert!(matches!(x, Some(26..=34)), "seed {seed}: fluid at {x:?}");
        }
    }

    #[test]
    fn test_fluid_levels_out() {
        let mut area = ElementArea::new(20, 10, ProcessorDefaults::air_element());
        for y in 0..10 {
            area.set_element(10, y, fluid(4));
        }
        run(&mut area, 200);
        let bottom_filled = (0..20).filter(|&x| !area.element(x, 9).is_air()).count();
        assert_eq!(bottom_filled, 10);
        assert_eq!(area.count_non_air(), 10);
    }

    #[test]
    fn test_gas_rises_one_row_per_tick() {
        let mut area = ElementArea::new(5, 12, ProcessorDefaults::air_element());
        area.set_element(2, 11, gas());
        let mut processor = Processor::new(16, ProcessorDefaults::default());
        let mut random = DeterministicRandom::new(0);
        for _ in 0..6 {
            processor.next(&mut area, &mut random);
        }
        let row = (0..12)
            .find(|&y| (0..5).any(|x| area.element(x, y).type_class() == TypeClass::Gas))
            .unwrap();
        assert!(row >= 5, "gas reached row {row}");
        assert!(row < 11);
    }

    #[test]
    fn test_gas_collects_at_ceiling() {
        let mut area = ElementArea::new(6, 8, ProcessorDefaults::air_element());
        for x in 0..6 {
            area.set_element(x, 7, gas());
        }
        run(&mut area, 60);
        for x in 0..6 {
            assert_eq!(area.element(x, 0).type_class(), TypeClass::Gas, "x = {x}");
        }
    }
}
