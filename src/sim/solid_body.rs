//! Rigid solid bodies
//!
//! Static cells with a non-zero body id form a body together with their
//! connected neighbours of the same id. The body falls one row per tick as
//! a whole while every cell has a member, a fluid or something lighter
//! below it. Each body is evaluated once per tick.

use std::collections::HashSet;

use super::processor::{Step, TickContext};
use crate::element::{TypeClass, head};
use crate::flood_fill::{FloodFillPainter, Neighbourhood};

const BODY_FILL: FloodFillPainter = FloodFillPainter::new(Neighbourhood::SolidBody);

pub(crate) fn step(t: &mut TickContext, x: i32, y: i32) -> Step {
    let width = t.area.width();
    let index = |px: i32, py: i32| (py * width + px) as usize;
    if t.solid_visited.contains(&index(x, y)) {
        return Step::Stay;
    }

    let mut cells = BODY_FILL.collect(t.area, x, y);
    t.solid_visited.extend(cells.iter().map(|&(px, py)| index(px, py)));

    let members: HashSet<usize> = cells.iter().map(|&(px, py)| index(px, py)).collect();
    let free = cells.iter().all(|&(px, py)| {
        members.contains(&index(px, py + 1))
            || t
                .area
                .head_or_none(px, py + 1)
                .is_some_and(|below| head::type_class(below) <= TypeClass::Fluid)
    });
    if !free {
        return Step::Stay;
    }

    // lowest rows first so every cell moves into space already vacated
    cells.sort_by(|a, b| b.1.cmp(&a.1));
    for &(px, py) in &cells {
        t.area.swap(px, py, px, py + 1);
        t.solid_visited.insert(index(px, py + 1));
    }
    Step::Moved(x, y + 1)
}

#[cfg(test)]
mod tests {
    use crate::area::ElementArea;
    use crate::defaults::ProcessorDefaults;
    use crate::element::{Element, TypeClass, head, tail};
    use crate::random::DeterministicRandom;
    use crate::sim::Processor;

    fn body(id: u32) -> Element {
        Element::new(head::of(head::type8_solid(id, 0), 0, 0), tail::rgb(120, 80, 40))
    }

    fn run(area: &mut ElementArea, ticks: usize) {
        let mut processor = Processor::new(16, ProcessorDefaults::default());
        let mut random = DeterministicRandom::new(6);
        for _ in 0..ticks {
            processor.next(area, &mut random);
        }
    }

    #[test]
    fn test_body_falls_as_a_whole() {
        let mut area = ElementArea::new(8, 10, ProcessorDefaults::air_element());
        area.set_element(3, 2, body(1));
        area.set_element(4, 2, body(1));
        area.set_element(4, 1, body(1));

        run(&mut area, 1);
        assert_eq!(area.element(3, 3), body(1));
        assert_eq!(area.element(4, 3), body(1));
        assert_eq!(area.element(4, 2), body(1));
        assert!(area.element(4, 1).is_air());

        run(&mut area, 20);
        assert_eq!(area.element(3, 9), body(1));
        assert_eq!(area.element(4, 9), body(1));
        assert_eq!(area.element(4, 8), body(1));
        assert_eq!(area.count_non_air(), 3);
    }

    #[test]
    fn test_body_hangs_on_a_single_support() {
        let mut area = ElementArea::new(8, 10, ProcessorDefaults::air_element());
        for x in 2..6 {
            area.set_element(x, 4, body(2));
        }
        // one wall cell under one end holds the whole body
        area.set_element(2, 5, Element::new(head::of(head::type8(head::TYPE_STATIC), 0, 0), 0));
        run(&mut area, 10);
        for x in 2..6 {
            assert_eq!(area.element(x, 4), body(2), "x = {x}");
        }
    }

    #[test]
    fn test_body_sinks_through_water() {
        let defaults = ProcessorDefaults::default();
        let mut random = DeterministicRandom::new(1);
        let mut area = ElementArea::new(3, 6, ProcessorDefaults::air_element());
        for y in 3..6 {
            for x in 0..3 {
                let water = defaults.water.apply_new(x, y, &mut random).unwrap();
                area.set_element(x, y, water);
            }
        }
        area.set_element(1, 0, body(1));
        run(&mut area, 15);
        assert_eq!(area.element(1, 5), body(1));
        let water_cells = area.heads().iter().filter(|&&h| head::type_class(h) == TypeClass::Fluid).count();
        assert_eq!(water_cells, 9);
    }
}
