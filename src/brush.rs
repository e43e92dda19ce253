//! Element factories
//!
//! A brush turns a position (and optionally the element already there) into
//! the element to write. Effect brushes only modify the old element and
//! return `None` when they do not apply.

use crate::element::{Element, head, tail};
use crate::random::DeterministicRandom;

/// `(x, y, random, old) -> element`
pub type BrushFn = fn(i32, i32, &mut DeterministicRandom, Option<Element>) -> Option<Element>;

#[derive(Debug, Clone)]
pub enum Brush {
    /// One of the listed elements, uniformly
    Random(Vec<Element>),
    Custom(BrushFn),
    /// Recolor the inner brush output with a palette entry
    Palette {
        palette: &'static [[u8; 3]],
        inner: Box<Brush>,
    },
    /// Set the temperature of the old element
    Temperature(u32),
    /// Darken the old element one burn step
    Burnt,
    /// Turn the inner brush output into its molten form when it can melt
    Melting(Box<Brush>),
}

impl Brush {
    pub fn solid(element: Element) -> Self {
        Brush::Random(vec![element])
    }

    pub fn palette(palette: &'static [[u8; 3]], inner: Brush) -> Self {
        Brush::Palette {
            palette,
            inner: Box::new(inner),
        }
    }

    pub fn melting(inner: Brush) -> Self {
        Brush::Melting(Box::new(inner))
    }

    /// Produce the element for `(x, y)`; `None` means leave the cell alone
    pub fn apply(
        &self,
        x: i32,
        y: i32,
        random: &mut DeterministicRandom,
        old: Option<Element>,
    ) -> Option<Element> {
        match self {
            Brush::Random(elements) => match elements.len() {
                0 => None,
                1 => Some(elements[0]),
                n => Some(elements[random.next_int(n as u32) as usize]),
            },
            Brush::Custom(f) => f(x, y, random, old),
            Brush::Palette { palette, inner } => {
                let element = inner.apply(x, y, random, old)?;
                if palette.is_empty() {
                    return Some(element);
                }
                let [r, g, b] = palette[random.next_int(palette.len() as u32) as usize];
                let recolored = tail::set_color(element.tail, r as u32, g as u32, b as u32);
                Some(Element::new(element.head, recolored))
            }
            Brush::Temperature(temperature) => {
                let old = old?;
                Some(Element::new(head::set_temperature(old.head, *temperature), old.tail))
            }
            Brush::Burnt => burn_step(old?),
            Brush::Melting(inner) => {
                let element = inner.apply(x, y, random, old)?;
                Some(molten(element))
            }
        }
    }

    /// Apply to a fresh cell, ignoring the old element
    pub fn apply_new(&self, x: i32, y: i32, random: &mut DeterministicRandom) -> Option<Element> {
        self.apply(x, y, random, None)
    }
}

/// Air, gas and effects never show burn marks
pub fn is_visual_burn_applicable(element_head: u32) -> bool {
    head::type_class_bits(element_head) > head::TYPE_FLUID && head::type_class_bits(element_head) != head::TYPE_EFFECT
}

/// One burn mark; `None` once the element is fully burnt
pub fn burn_step(element: Element) -> Option<Element> {
    if !is_visual_burn_applicable(element.head) || tail::burnt_level(element.tail) >= tail::BURNT_LEVEL_MAX {
        return None;
    }
    Some(Element::new(element.head, tail::visual_burn(element.tail)))
}

/// Molten variant of a meltable element, at least at its melting point.
/// Other elements are returned unchanged.
pub fn molten(element: Element) -> Element {
    if head::type_class_bits(element.head) != head::TYPE_STATIC {
        return element;
    }
    let Some(melting) = head::hmi_melting_temperature(head::heat_mod_index(element.head)) else {
        return element;
    };
    let temperature = head::temperature(element.head).max(melting);
    let new_head = head::set_type(element.head, head::type8_fluid(head::TYPE_FLUID, 2));
    let new_head = head::set_temperature(new_head, temperature);
    let new_head = head::set_behaviour(new_head, head::BEHAVIOUR_NONE);
    let new_tail = tail::set_blur_type(element.tail, tail::BLUR_TYPE_1);
    Element::new(new_head, new_tail)
}
