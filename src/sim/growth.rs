//! Vegetation: grass, trees and leaves
//!
//! Grass and tree cells keep their chunk scheduled so they get another
//! chance on the next gated tick. The special field is the remaining
//! height for both.

use super::processor::TickContext;
use crate::area::ElementArea;
use crate::brush::burn_step;
use crate::element::{Behaviour, Element, TypeClass, head};

const GRASS_PERIOD: u64 = 8;
const GRASS_MAX_TEMPERATURE: u32 = 40;
const TREE_PERIOD: u64 = 16;
const LEAF_WITHER_TEMPERATURE: u32 = 60;
const CROWN_RADIUS: i32 = 3;

fn is_cold_air(area: &ElementArea, x: i32, y: i32) -> bool {
    area.head_or_none(x, y)
        .is_some_and(|h| head::type_class(h) == TypeClass::Air && head::temperature(h) == 0)
}

/// A cold air cell resting on cold soil with cold air above it
pub fn can_grow_up_here(area: &ElementArea, x: i32, y: i32) -> bool {
    let soil_below = area
        .head_or_none(x, y + 1)
        .is_some_and(|h| head::behaviour(h) == Behaviour::Soil && head::temperature(h) == 0);
    soil_below && is_cold_air(area, x, y) && is_cold_air(area, x, y - 1)
}

pub(crate) fn grass(t: &mut TickContext, x: i32, y: i32, element_head: u32) {
    if t.iteration % GRASS_PERIOD != 0 {
        t.area.trigger(x, y);
        return;
    }

    let below = t.area.head_or_none(x, y + 1).map(head::behaviour);
    let rooted = matches!(below, Some(Behaviour::Soil | Behaviour::Grass));
    if !rooted || head::temperature(element_head) > GRASS_MAX_TEMPERATURE {
        let dead_head = head::set_special(head::set_behaviour(element_head, head::BEHAVIOUR_NONE), 0);
        let dead = Element::new(dead_head, t.area.tail(x, y));
        t.area.set_element(x, y, burn_step(dead).unwrap_or(dead));
        return;
    }
    t.area.trigger(x, y);

    let special = head::special(element_head);
    if special > 1 && t.random.next_int(8) == 0 && is_cold_air(t.area, x, y - 1) {
        let tail = t.area.tail(x, y);
        t.area.set_head_and_tail(x, y - 1, head::set_special(element_head, special - 1), tail);
    }

    if below == Some(Behaviour::Soil) && t.random.next_int(16) == 0 {
        let dx = if t.random.next_bool() { 1 } else { -1 };
        let dy = t.random.next_int(3) as i32 - 1;
        let (nx, ny) = (x + dx, y + dy);
        if can_grow_up_here(t.area, nx, ny) {
            let defaults = t.defaults;
            t.paint(nx, ny, &defaults.grass);
        }
    }
}

pub(crate) fn tree(t: &mut TickContext, x: i32, y: i32, element_head: u32) {
    if t.iteration % TREE_PERIOD != 0 || t.random.next_int(4) != 0 {
        t.area.trigger(x, y);
        return;
    }
    let defaults = t.defaults;

    let below = t.area.head_or_none(x, y + 1).map(head::behaviour);
    if matches!(below, Some(Behaviour::Soil | Behaviour::Grass)) {
        t.paint(x, y + 1, &defaults.tree_root);
    }

    let special = head::special(element_head);
    let room_above = t
        .area
        .head_or_none(x, y - 1)
        .is_some_and(|h| head::type_class(h) <= TypeClass::Gas);
    if special > 0 && room_above {
        let tail = t.area.tail(x, y);
        t.area.set_head_and_tail(x, y - 1, head::set_special(element_head, special - 1), tail);
        t.paint(x, y, &defaults.tree_wood);
        return;
    }

    // fully grown
    t.paint(x, y, &defaults.tree_wood);
    for dy in -CROWN_RADIUS..=CROWN_RADIUS {
        let reach = CROWN_RADIUS - dy.abs();
        for dx in -reach..=reach {
            let (lx, ly) = (x + dx, y + dy);
            let is_air = t
                .area
                .head_or_none(lx, ly)
                .is_some_and(|h| head::type_class(h) == TypeClass::Air);
            if is_air {
                t.paint(lx, ly, &defaults.tree_leaf);
            }
        }
    }
}

pub(crate) fn leaf(t: &mut TickContext, x: i32, y: i32, element_head: u32) {
    let temperature = head::temperature(element_head);
    if temperature <= LEAF_WITHER_TEMPERATURE || head::special(element_head) == head::SPECIAL_MAX {
        return;
    }
    let defaults = t.defaults;
    t.paint(x, y, &defaults.tree_leaf_dead);
    let dead = t.area.head(x, y);
    t.area.set_head(x, y, head::set_temperature(dead, temperature));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::ProcessorDefaults;
    use crate::random::DeterministicRandom;
    use crate::sim::Processor;

    fn soil_bed(width: usize, height: usize, depth: i32, random: &mut DeterministicRandom) -> ElementArea {
        let defaults = ProcessorDefaults::default();
        let mut area = ElementArea::new(width, height, ProcessorDefaults::air_element());
        for y in (height as i32 - depth)..height as i32 {
            for x in 0..width as i32 {
                let soil = defaults.soil.apply_new(x, y, random).unwrap();
                area.set_element(x, y, soil);
            }
        }
        area
    }

    fn count(area: &ElementArea, behaviour: Behaviour) -> usize {
        area.heads().iter().filter(|&&h| head::behaviour(h) == behaviour).count()
    }

    #[test]
    fn test_can_grow_up_here() {
        let mut random = DeterministicRandom::new(0);
        let mut area = soil_bed(5, 5, 2, &mut random);
        assert!(can_grow_up_here(&area, 2, 2));
        // soil itself is not a spot
        assert!(!can_grow_up_here(&area, 2, 3));
        // floating
        assert!(!can_grow_up_here(&area, 2, 1));
        // top row has nothing above
        let shallow = soil_bed(5, 2, 1, &mut random);
        assert!(!can_grow_up_here(&shallow, 2, 0));

        area.set_head(2, 1, head::set_temperature(0, 50));
        assert!(!can_grow_up_here(&area, 2, 2));
    }

    #[test]
    fn test_grass_spreads_over_soil() {
        let mut random = DeterministicRandom::new(17);
        let mut area = soil_bed(20, 8, 2, &mut random);
        let defaults = ProcessorDefaults::default();
        let grass = defaults.grass.apply_new(10, 5, &mut random).unwrap();
        area.set_element(10, 5, grass);

        let mut processor = Processor::new(16, defaults);
        for _ in 0..2000 {
            processor.next(&mut area, &mut random);
        }
        assert!(count(&area, Behaviour::Grass) > 1);
    }

    #[test]
    fn test_grass_dies_without_soil() {
        let mut area = ElementArea::new(3, 3, ProcessorDefaults::air_element());
        let defaults = ProcessorDefaults::default();
        let mut random = DeterministicRandom::new(2);
        let wall = defaults.wall.apply_new(1, 2, &mut random).unwrap();
        area.set_element(1, 2, wall);
        let grass = defaults.grass.apply_new(1, 1, &mut random).unwrap();
        area.set_element(1, 1, grass);

        let mut processor = Processor::new(16, defaults);
        processor.next(&mut area, &mut random);
        assert_eq!(count(&area, Behaviour::Grass), 0);
        assert_eq!(area.count_non_air(), 2);
    }

    #[test]
    fn test_tree_grows_trunk_and_crown() {
        let mut random = DeterministicRandom::new(5);
        let mut area = soil_bed(21, 20, 2, &mut random);
        let defaults = ProcessorDefaults::default();
        let seed = defaults.tree.apply_new(10, 17, &mut random).unwrap();
        area.set_element(10, 17, seed);

        let mut processor = Processor::new(16, defaults);
        for _ in 0..3000 {
            processor.next(&mut area, &mut random);
        }
        assert_eq!(count(&area, Behaviour::Tree), 0, "tree never finished");
        assert!(count(&area, Behaviour::TreeTrunk) >= 4);
        assert!(count(&area, Behaviour::TreeLeaf) > 0);
        assert_eq!(area.element(10, 18).behaviour(), Behaviour::TreeRoot);
    }

    #[test]
    fn test_hot_leaf_withers() {
        let defaults = ProcessorDefaults::default();
        let mut random = DeterministicRandom::new(0);
        let leaf = defaults.tree_leaf.apply_new(0, 0, &mut random).unwrap();
        let mut area = ElementArea::new(1, 1, ProcessorDefaults::air_element());
        area.set_element(0, 0, Element::new(head::set_temperature(leaf.head, 70), leaf.tail));

        let mut processor = Processor::new(16, defaults);
        processor.next(&mut area, &mut random);
        let withered = area.head(0, 0);
        assert_eq!(head::behaviour(withered), Behaviour::TreeLeaf);
        assert_eq!(head::special(withered), head::SPECIAL_MAX);
        assert!(head::temperature(withered) > 60);
    }
}
