//! Powder movement: fall, keep momentum, slide off slopes

use super::processor::{Step, TickContext};
use crate::element::{TypeClass, head};

pub(crate) fn step(t: &mut TickContext, x: i32, y: i32, element_head: u32) -> Step {
    let class = head::type_class(element_head);
    let weight = class.weight();
    let below = y + 1;
    if below >= t.area.height() {
        return t.leave_bottom(x, y, weight);
    }

    let momentum = head::powder_momentum(element_head);
    if t.is_lighter(x, below, weight) {
        if momentum < head::MOMENTUM_MAX {
            t.area.set_head(x, y, head::set_powder_momentum(element_head, momentum + 1));
        }
        t.area.swap(x, y, x, below);
        return Step::Moved(x, below);
    }

    // wet powder sticks together
    let sliding = match class {
        TypeClass::PowderWet => head::powder_sliding(element_head) / 2,
        _ => head::powder_sliding(element_head),
    };
    let slide = momentum > 0 || (sliding > 0 && t.random.next_int(8) < sliding);
    if slide {
        let dir = if t.random.next_bool() { 1 } else { -1 };
        for dx in [dir, -dir] {
            let nx = x + dx;
            if t.is_lighter(nx, below, weight) && t.is_lighter(nx, y, weight) {
                t.area.set_head(x, y, head::set_powder_momentum(element_head, 0));
                t.area.swap(x, y, nx, below);
                return Step::Moved(nx, below);
            }
        }
    }

    if momentum > 0 {
        t.area.set_head(x, y, head::set_powder_momentum(element_head, 0));
    } else if !slide && sliding > 0 && can_slide(t, x, y, weight) {
        // lost the roll on a slope; roll again next tick
        t.area.trigger(x, y);
    }
    Step::Stay
}

fn can_slide(t: &TickContext, x: i32, y: i32, weight: u32) -> bool {
    [-1, 1]
        .into_iter()
        .any(|dx| t.is_lighter(x + dx, y + 1, weight) && t.is_lighter(x + dx, y, weight))
}

#[cfg(test)]
mod tests {
    use crate::area::ElementArea;
    use crate::defaults::ProcessorDefaults;
    use crate::element::{Element, TypeClass, head, tail};
    use crate::random::DeterministicRandom;
    use crate::sim::Processor;

    fn powder(class: u32, sliding: u32) -> Element {
        Element::new(head::of(head::type8_powder(class, sliding), 0, 0), tail::rgb(200, 200, 100))
    }

    fn water() -> Element {
        Element::new(
            head::of(head::type8_fluid(head::TYPE_FLUID, 4), head::behaviour8(head::BEHAVIOUR_WATER, 0), 0),
            tail::rgb(0, 0, 200),
        )
    }

    fn run(area: &mut ElementArea, ticks: usize) {
        let mut processor = Processor::new(16, ProcessorDefaults::default());
        let mut random = DeterministicRandom::new(11);
        for _ in 0..ticks {
            processor.next(area, &mut random);
        }
    }

    #[test]
    fn test_column_collapses_into_pile() {
        let mut area = ElementArea::new(21, 12, ProcessorDefaults::air_element());
        for y in 0..8 {
            area.set_element(10, y, powder(head::TYPE_POWDER, 7));
        }
        run(&mut area, 60);
        // bottom row spread sideways
        let bottom = (0..21).filter(|&x| !area.element(x, 11).is_air()).count();
        assert!(bottom >= 3, "bottom row holds {bottom}");
        assert_eq!(area.count_non_air(), 8);
    }

    #[test]
    fn test_resting_non_sliding_column_stays() {
        let mut area = ElementArea::new(9, 9, ProcessorDefaults::air_element());
        for y in 5..9 {
            area.set_element(4, y, powder(head::TYPE_POWDER, 0));
        }
        run(&mut area, 30);
        for y in 5..9 {
            assert!(area.element(4, y).type_class().is_powder(), "y = {y}");
        }
    }

    #[test]
    fn test_grain_on_pillar_always_slides_off() {
        let wall = Element::new(head::of(head::type8(head::TYPE_STATIC), 0, 0), 0);
        for seed in 0..20 {
            let mut area = ElementArea::new(5, 5, ProcessorDefaults::air_element());
            area.set_element(2, 4, wall);
            area.set_element(2, 3, powder(head::TYPE_POWDER, 3));
            let mut processor = Processor::new(16, ProcessorDefaults::default());
            let mut random = DeterministicRandom::new(seed);
            for _ in 0..500 {
                processor.next(&mut area, &mut random);
            }
            assert!(area.element(2, 3).is_air(), "seed {seed}: grain still perched");
            assert!(
                area.element(1, 4).type_class().is_powder() || area.element(3, 4).type_class().is_powder(),
                "seed {seed}"
            );
            assert_eq!(area.count_non_air(), 2);
        }
    }

    #[test]
    fn test_powder_sinks_through_water() {
        let mut area = ElementArea::new(3, 6, ProcessorDefaults::air_element());
        area.set_element(1, 0, powder(head::TYPE_POWDER_WET, 0));
        for y in 1..6 {
            area.set_element(1, y, water());
        }
        for y in 0..6 {
            area.set_element(0, y, Element::new(head::of(head::type8(head::TYPE_STATIC), 0, 0), 0));
            area.set_element(2, y, Element::new(head::of(head::type8(head::TYPE_STATIC), 0, 0), 0));
        }
        run(&mut area, 10);
        assert_eq!(area.element(1, 5).type_class(), TypeClass::PowderWet);
        assert_eq!(area.element(1, 0).type_class(), TypeClass::Fluid);
    }
}
