//! Temperature field
//!
//! A hot cell pushes heat into one random cardinal neighbour per tick,
//! cools passively and converts once it crosses a material threshold
//! (ignition, melting, solidification). Water changes phase on its own
//! schedule in `water_phase`.

use super::processor::TickContext;
use crate::brush::{burn_step, molten};
use crate::element::{Behaviour, Element, TypeClass, head, tail};

const CARDINAL: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Air and gas shed `1 + t / AIR_COOLING_DIVISOR` per tick
const AIR_COOLING_DIVISOR: u32 = 64;
/// Everything else loses one degree every `SOLID_COOLING_PERIOD` ticks
const SOLID_COOLING_PERIOD: u64 = 4;

const BURN_MARK_TEMPERATURE: u32 = 100;
const WATER_BOILING_TEMPERATURE: u32 = 120;
const STEAM_CONDENSATION_TEMPERATURE: u32 = 30;

pub(crate) fn step(t: &mut TickContext, x: i32, y: i32) {
    let element_head = t.area.head(x, y);
    let mut temperature = head::temperature(element_head);

    let (dx, dy) = CARDINAL[t.random.next_int(4) as usize];
    let (nx, ny) = (x + dx, y + dy);
    if let Some(neighbour) = t.area.head_or_none(nx, ny) {
        let neighbour_temperature = head::temperature(neighbour);
        if temperature > neighbour_temperature {
            let k = head::hmi_conductivity(head::heat_mod_index(element_head))
                .min(head::hmi_conductivity(head::heat_mod_index(neighbour)));
            let transfer = (temperature - neighbour_temperature) * k / 16;
            if transfer > 0 {
                temperature -= transfer;
                t.area.set_head(nx, ny, head::set_temperature(neighbour, neighbour_temperature + transfer));
            }
        }
    }

    temperature = match head::type_class(element_head) {
        TypeClass::Air | TypeClass::Gas => temperature.saturating_sub(1 + temperature / AIR_COOLING_DIVISOR),
        _ if t.iteration % SOLID_COOLING_PERIOD == 0 => temperature.saturating_sub(1),
        _ => temperature,
    };

    let element_head = head::set_temperature(element_head, temperature);
    t.area.set_head(x, y, element_head);
    if temperature == 0 {
        return;
    }
    // stay scheduled until cold
    t.area.trigger(x, y);
    thresholds(t, x, y, element_head);
}

fn thresholds(t: &mut TickContext, x: i32, y: i32, element_head: u32) {
    let temperature = head::temperature(element_head);
    let class = head::type_class(element_head);
    let behaviour = head::behaviour(element_head);
    let hmi = head::heat_mod_index(element_head);

    if behaviour != Behaviour::Fire
        && head::ignition_temperature(head::flammable_type(element_head)).is_some_and(|ignition| temperature >= ignition)
    {
        ignite(t, x, y, element_head);
        return;
    }

    if class == TypeClass::Static
        && behaviour != Behaviour::Entity
        && head::hmi_melting_temperature(hmi).is_some_and(|melting| temperature >= melting)
    {
        let element = molten(t.area.element(x, y));
        t.area.set_element(x, y, element);
        return;
    }

    if class == TypeClass::Fluid
        && behaviour == Behaviour::None
        && head::hmi_solidification_temperature(hmi).is_some_and(|solid| temperature < solid)
    {
        let solid_head = head::set_type(element_head, head::type8_solid(0, 0));
        let solid_tail = tail::set_blur_type(t.area.tail(x, y), tail::BLUR_TYPE_NONE);
        t.area.set_head_and_tail(x, y, solid_head, solid_tail);
        return;
    }

    if temperature >= BURN_MARK_TEMPERATURE && t.random.next_int(16) == 0 {
        if let Some(burnt) = burn_step(t.area.element(x, y)) {
            t.area.set_element(x, y, burnt);
        }
    }
}

/// Replace the element with fire; the burnable type rides along as fuel
pub(crate) fn ignite(t: &mut TickContext, x: i32, y: i32, element_head: u32) {
    let flame = head::flame_temperature(head::flame_heat_type(element_head));
    let fuel = head::burnable_type(element_head);
    let fire_head = head::of(
        head::type8(head::TYPE_EFFECT),
        head::behaviour8(head::BEHAVIOUR_FIRE, fuel),
        0,
    );
    let defaults = t.defaults;
    let fire_tail = t.produce(x, y, &defaults.fire).tail;
    t.area.set_element(x, y, Element::new(head::set_temperature(fire_head, flame), fire_tail));
}

/// Boiling and condensation of water
pub(crate) fn water_phase(t: &mut TickContext, x: i32, y: i32, element_head: u32) {
    let temperature = head::temperature(element_head);
    let defaults = t.defaults;
    match head::type_class(element_head) {
        TypeClass::Fluid if temperature >= WATER_BOILING_TEMPERATURE => {
            let steam = t.produce(x, y, &defaults.steam);
            t.area.set_element(x, y, Element::new(head::set_temperature(steam.head, temperature), steam.tail));
        }
        TypeClass::Gas if temperature < STEAM_CONDENSATION_TEMPERATURE => {
            if t.random.next_int(16) == 0 {
                let water = t.produce(x, y, &defaults.water);
                t.area.set_element(x, y, Element::new(head::set_temperature(water.head, temperature), water.tail));
            } else {
                t.area.trigger(x, y);
            }
        }
        _ => {}
    }
}
