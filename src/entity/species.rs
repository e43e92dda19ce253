//! Entity kinds and their strategy tables
//!
//! Species differ only in their pose cycle, the brush used for painting and
//! the locomotion predicate deciding which cells count as free space.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use super::EntityError;
use super::state_definition::StateDefinition;
use crate::area::ElementArea;
use crate::brush::BrushFn;
use crate::element::{Behaviour, Element, TypeClass, head, tail};
use crate::random::DeterministicRandom;

/// Average part temperature above which an entity dies
const MAX_AVG_TEMPERATURE: u32 = 10;
/// Failed pose transitions in a row before an entity dies
const MAX_STUCK_COUNT: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Bird,
    Butterfly,
    Fish,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Bird, EntityKind::Butterfly, EntityKind::Fish];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Bird => "bird",
            EntityKind::Butterfly => "butterfly",
            EntityKind::Fish => "fish",
        }
    }

    pub fn species(&self) -> &'static Species {
        match self {
            EntityKind::Bird => &*BIRD,
            EntityKind::Butterfly => &*BUTTERFLY,
            EntityKind::Fish => &*FISH,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bird" => Ok(EntityKind::Bird),
            "butterfly" => Ok(EntityKind::Butterfly),
            "fish" => Ok(EntityKind::Fish),
            other => Err(EntityError::UnknownKind(other.to_string())),
        }
    }
}

/// What an entity can move through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locomotion {
    /// Air and gas, never fire
    Flying,
    /// Fluids only
    Swimming,
}

impl Locomotion {
    pub fn is_space(&self, area: &ElementArea, x: i32, y: i32) -> bool {
        let Some(target) = area.head_or_none(x, y) else {
            return false;
        };
        match self {
            Locomotion::Flying => {
                head::type_class(target) <= TypeClass::Gas && head::behaviour(target) != Behaviour::Fire
            }
            Locomotion::Swimming => head::type_class(target) == TypeClass::Fluid,
        }
    }

    /// Whether the body gets dragged down given what is above and below it
    pub fn is_falling(&self, heavy_above: bool, light_below: bool) -> bool {
        match self {
            Locomotion::Flying => heavy_above,
            Locomotion::Swimming => heavy_above || light_below,
        }
    }
}

/// Powder, or a solid body that is not part of an entity
pub fn is_falling_heavy_at(area: &ElementArea, x: i32, y: i32) -> bool {
    let Some(element_head) = area.head_or_none(x, y) else {
        return false;
    };
    match head::type_class(element_head) {
        TypeClass::Powder | TypeClass::PowderWet => true,
        TypeClass::Static => {
            head::behaviour(element_head) != Behaviour::Entity && head::solid_body_id(element_head) > 0
        }
        _ => false,
    }
}

pub fn is_light_at(area: &ElementArea, x: i32, y: i32) -> bool {
    area.head_or_none(x, y)
        .is_some_and(|h| head::type_class(h) <= TypeClass::Gas)
}

#[derive(Debug)]
pub struct Species {
    pub kind: EntityKind,
    pub locomotion: Locomotion,
    pub states: StateDefinition,
    /// Called with the part offset instead of a grid position
    pub brush: BrushFn,
    /// Extra rows/columns probed around the body when looking ahead
    pub vision: i32,
    pub max_avg_temperature: u32,
    pub max_stuck: u32,
}

impl Species {
    /// Keep-out margin from the world edges for random walks
    pub fn area_boundary(&self) -> i32 {
        2 * ((self.states.min_x() - self.states.max_x()).abs() + 1)
    }
}

const fn part_head() -> u32 {
    head::of(
        head::type8(head::TYPE_STATIC),
        head::behaviour8(head::BEHAVIOUR_ENTITY, 0),
        head::modifiers8(0, 0, 0, head::HMI_CONDUCTIVE_1),
    )
}

fn bird_part(dx: i32, _dy: i32, _random: &mut DeterministicRandom, _old: Option<Element>) -> Option<Element> {
    // wing tips blur
    let blur = if dx.abs() < 2 { tail::BLUR_TYPE_NONE } else { tail::BLUR_TYPE_1 };
    Some(Element::new(part_head(), tail::of(0, 0, 0, blur, tail::HEAT_EFFECT_NONE, 0)))
}

fn butterfly_part(dx: i32, _dy: i32, _random: &mut DeterministicRandom, _old: Option<Element>) -> Option<Element> {
    let (red, blur) = if dx == 0 { (0, tail::BLUR_TYPE_NONE) } else { (200, tail::BLUR_TYPE_1) };
    Some(Element::new(part_head(), tail::of(red, 0, 0, blur, tail::HEAT_EFFECT_NONE, 0)))
}

fn fish_part(_dx: i32, _dy: i32, _random: &mut DeterministicRandom, _old: Option<Element>) -> Option<Element> {
    Some(Element::new(part_head(), tail::of(0, 0, 0, tail::BLUR_TYPE_NONE, tail::HEAT_EFFECT_NONE, 0)))
}

static BIRD: LazyLock<Species> = LazyLock::new(|| Species {
    kind: EntityKind::Bird,
    locomotion: Locomotion::Flying,
    states: StateDefinition::cyclic(&[
        &[(0, 0), (1, -1), (-1, -1), (2, -1), (-2, -1), (3, -1), (-3, -1)],
        &[(0, 0), (1, -1), (-1, -1), (2, -1), (-2, -1), (3, -2), (-3, -2)],
        &[(0, 0), (1, -1), (-1, -1), (2, -2), (-2, -2), (3, -2), (-3, -2)],
        &[(0, 0), (1, -1), (-1, -1), (2, -2), (-2, -2), (3, -1), (-3, -1)],
        &[(0, 0), (1, -1), (-1, -1), (2, -1), (-2, -1), (3, -1), (-3, -1)],
        &[(0, 0), (1, -1), (-1, -1), (2, 0), (-2, 0), (3, 0), (-3, 0)],
        &[(0, 0), (1, -1), (-1, -1), (2, 0), (-2, 0), (3, 1), (-3, 1)],
        &[(0, 0), (1, -1), (-1, -1), (2, 0), (-2, 0), (3, 0), (-3, 0)],
    ]),
    brush: bird_part,
    vision: 2,
    max_avg_temperature: MAX_AVG_TEMPERATURE,
    max_stuck: MAX_STUCK_COUNT,
});

static BUTTERFLY: LazyLock<Species> = LazyLock::new(|| Species {
    kind: EntityKind::Butterfly,
    locomotion: Locomotion::Flying,
    states: StateDefinition::cyclic(&[
        &[(0, 0), (1, -1), (-1, -1)],
        &[(0, 0), (1, -1), (-1, -1)],
        &[(0, 0), (1, 0), (-1, 0)],
        &[(0, 0), (1, 1), (-1, 1)],
        &[(0, 0), (1, 1), (-1, 1)],
    ]),
    brush: butterfly_part,
    vision: 2,
    max_avg_temperature: MAX_AVG_TEMPERATURE,
    max_stuck: MAX_STUCK_COUNT,
});

static FISH: LazyLock<Species> = LazyLock::new(|| Species {
    kind: EntityKind::Fish,
    locomotion: Locomotion::Swimming,
    states: StateDefinition::cyclic(&[&[(0, 0), (1, 0)]]),
    brush: fish_part,
    vision: 1,
    max_avg_temperature: MAX_AVG_TEMPERATURE,
    max_stuck: MAX_STUCK_COUNT,
});
