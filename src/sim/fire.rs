//! Fire cells: decay, spread heat, burn out
//!
//! The special field of a fire head carries the burnable type of the
//! element that ignited, which controls how fast the flame dies and
//! whether it leaves ash behind.

use super::processor::TickContext;
use crate::element::{Behaviour, TypeClass, head};

const EXTINGUISH_TEMPERATURE: u32 = 20;
const WATER_QUENCH_HEAT: u32 = 40;

const NEIGHBOURS: [(i32, i32); 8] = [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)];

pub(crate) fn step(t: &mut TickContext, x: i32, y: i32, element_head: u32) {
    let temperature = head::temperature(element_head);
    let fuel = head::special(element_head);
    let defaults = t.defaults;

    if temperature < EXTINGUISH_TEMPERATURE {
        let leftover = if fuel != head::BURNABLE_TYPE_NEVER && t.random.next_int(4) == 0 {
            t.produce(x, y, &defaults.ash)
        } else {
            defaults.default_element()
        };
        t.area.set_element(x, y, leftover);
        return;
    }

    let decay = match fuel {
        head::BURNABLE_TYPE_FAST => t.random.next_int(4),
        head::BURNABLE_TYPE_MEDIUM => t.random.next_int(3),
        head::BURNABLE_TYPE_SLOW => t.random.next_int(2),
        _ => t.random.next_int(6),
    };
    let temperature = temperature.saturating_sub(decay);
    t.area.set_head(x, y, head::set_temperature(element_head, temperature));
    if decay == 0 {
        // nothing written, keep the chunk awake
        t.area.trigger(x, y);
    }

    let (dx, dy) = NEIGHBOURS[t.random.next_int(8) as usize];
    let (nx, ny) = (x + dx, y + dy);
    let Some(neighbour) = t.area.head_or_none(nx, ny) else {
        return;
    };
    let neighbour_temperature = head::temperature(neighbour);

    if head::behaviour(neighbour) == Behaviour::Water {
        t.area.set_element(x, y, defaults.default_element());
        let heated = (neighbour_temperature + WATER_QUENCH_HEAT).min(255);
        t.area.set_head(nx, ny, head::set_temperature(neighbour, heated));
        return;
    }

    if temperature <= neighbour_temperature {
        return;
    }
    let gain = if head::flammable_type(neighbour) != head::FLAMMABLE_TYPE_NEVER {
        (temperature - neighbour_temperature) / 4
    } else if head::type_class(neighbour) != TypeClass::Air {
        (temperature - neighbour_temperature) / 8
    } else {
        0
    };
    if gain > 0 {
        t.area.set_head(nx, ny, head::set_temperature(neighbour, neighbour_temperature + gain));
    }
}
