//! Abandoned entity body cells
//!
//! A live entity resets the special field of its parts every tick. The
//! processor counts up in between, so a part nobody refreshes anymore turns
//! into plain powder after a few ticks.

use super::processor::TickContext;
use crate::element::head;

const ABANDON_AFTER: u32 = 5;
const DRY_CHANCE_PERCENT: u32 = 20;
const REMAINS_SLIDING: u32 = 4;

pub(crate) fn step(t: &mut TickContext, x: i32, y: i32, element_head: u32) {
    let counter = head::special(element_head);
    if counter < ABANDON_AFTER {
        t.area.set_head(x, y, head::set_special(element_head, counter + 1));
        return;
    }

    let class = if t.random.next_int(100) < DRY_CHANCE_PERCENT {
        head::TYPE_POWDER
    } else {
        head::TYPE_POWDER_WET
    };
    let remains = head::set_type(element_head, head::type8_powder(class, REMAINS_SLIDING));
    let remains = head::set_special(head::set_behaviour(remains, head::BEHAVIOUR_NONE), 0);
    t.area.set_head(x, y, remains);
}

#[cfg(test)]
mod tests {
    use crate::area::ElementArea;
    use crate::defaults::ProcessorDefaults;
    use crate::element::{Behaviour, Element, head, tail};
    use crate::random::DeterministicRandom;
    use crate::sim::Processor;

    #[test]
    fn test_unrefreshed_part_turns_into_powder() {
        let part = Element::new(
            head::of(head::type8(head::TYPE_STATIC), head::behaviour8(head::BEHAVIOUR_ENTITY, 0), 0),
            tail::rgb(0, 0, 0),
        );
        let mut area = ElementArea::new(3, 3, ProcessorDefaults::air_element());
        area.set_element(1, 2, part);
        let mut processor = Processor::new(16, ProcessorDefaults::default());
        let mut random = DeterministicRandom::new(0);

        for tick in 1..=5 {
            processor.next(&mut area, &mut random);
            assert_eq!(head::special(area.head(1, 2)), tick, "tick {tick}");
            assert_eq!(area.element(1, 2).behaviour(), Behaviour::Entity);
        }
        processor.next(&mut area, &mut random);
        let remains = area.element(1, 2);
        assert_eq!(remains.behaviour(), Behaviour::None);
        assert!(remains.type_class().is_powder());
        assert_eq!(remains.tail, part.tail);
    }
}
