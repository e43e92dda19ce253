//! Element head codec
//!
//! The head word carries everything the physics needs. Layout (LSB first):
//!
//! ```text
//!  0..3   type class
//!  3..8   type modifiers (class specific)
//!  8..13  behaviour
//! 13..16  special (behaviour scratch)
//! 16..18  flammable type
//! 18..20  flame heat type
//! 20..22  burnable type
//! 22..24  heat-modifier index
//! 24..32  temperature
//! ```
//!
//! The layout is part of the snapshot format. Setters mask their input, so
//! out-of-range values are truncated rather than rejected.

const FIELD_TYPE_CLASS_SHIFT: u32 = 0;
const FIELD_TYPE_CLASS_MASK: u32 = 0b111;

const FIELD_TYPE_SHIFT: u32 = 0;
const FIELD_TYPE_MASK: u32 = 0xFF;

// powder
const FIELD_POWDER_MOMENTUM_SHIFT: u32 = 3;
const FIELD_POWDER_MOMENTUM_MASK: u32 = 0b11;
const FIELD_POWDER_SLIDING_SHIFT: u32 = 5;
const FIELD_POWDER_SLIDING_MASK: u32 = 0b111;

// fluid & gas
const FIELD_FLUID_DISPERSION_SHIFT: u32 = 5;
const FIELD_FLUID_DISPERSION_MASK: u32 = 0b111;

// static
const FIELD_SOLID_NEIGHBOURHOOD_SHIFT: u32 = 3;
const FIELD_SOLID_NEIGHBOURHOOD_MASK: u32 = 0b11;
const FIELD_SOLID_BODY_ID_SHIFT: u32 = 5;
const FIELD_SOLID_BODY_ID_MASK: u32 = 0b111;

const FIELD_BEHAVIOUR_SHIFT: u32 = 8;
const FIELD_BEHAVIOUR_MASK: u32 = 0b1_1111;
const FIELD_SPECIAL_SHIFT: u32 = 13;
const FIELD_SPECIAL_MASK: u32 = 0b111;

const FIELD_FLAMMABLE_SHIFT: u32 = 16;
const FIELD_FLAME_HEAT_SHIFT: u32 = 18;
const FIELD_BURNABLE_SHIFT: u32 = 20;
const FIELD_HEAT_MOD_INDEX_SHIFT: u32 = 22;
const FIELD_2BIT_MASK: u32 = 0b11;

const FIELD_TEMPERATURE_SHIFT: u32 = 24;
const FIELD_TEMPERATURE_MASK: u32 = 0xFF;

/// Largest value the special field can hold
pub const SPECIAL_MAX: u32 = FIELD_SPECIAL_MASK;
/// Largest value the sliding modifier can hold
pub const SLIDING_MAX: u32 = FIELD_POWDER_SLIDING_MASK;
/// Largest powder momentum
pub const MOMENTUM_MAX: u32 = FIELD_POWDER_MOMENTUM_MASK;

// type classes

pub const TYPE_AIR: u32 = 0;
pub const TYPE_GAS: u32 = 1;
pub const TYPE_FLUID: u32 = 2;
pub const TYPE_POWDER: u32 = 3;
pub const TYPE_POWDER_WET: u32 = 4;
pub const TYPE_STATIC: u32 = 5;
pub const TYPE_EFFECT: u32 = 6;

// behaviours

pub const BEHAVIOUR_NONE: u32 = 0;
pub const BEHAVIOUR_SOIL: u32 = 1;
pub const BEHAVIOUR_GRASS: u32 = 2;
pub const BEHAVIOUR_TREE: u32 = 3;
pub const BEHAVIOUR_TREE_ROOT: u32 = 4;
pub const BEHAVIOUR_TREE_TRUNK: u32 = 5;
pub const BEHAVIOUR_TREE_LEAF: u32 = 6;
pub const BEHAVIOUR_FIRE: u32 = 7;
pub const BEHAVIOUR_WATER: u32 = 8;
pub const BEHAVIOUR_ENTITY: u32 = 9;

// modifiers

pub const FLAMMABLE_TYPE_NEVER: u32 = 0;
pub const FLAMMABLE_TYPE_FAST: u32 = 1;
pub const FLAMMABLE_TYPE_MEDIUM: u32 = 2;
pub const FLAMMABLE_TYPE_SLOW: u32 = 3;

pub const FLAME_HEAT_TYPE_NONE: u32 = 0;
pub const FLAME_HEAT_TYPE_MEDIUM: u32 = 1;
pub const FLAME_HEAT_TYPE_HIGH: u32 = 2;
pub const FLAME_HEAT_TYPE_EXTREME: u32 = 3;

pub const BURNABLE_TYPE_NEVER: u32 = 0;
pub const BURNABLE_TYPE_FAST: u32 = 1;
pub const BURNABLE_TYPE_MEDIUM: u32 = 2;
pub const BURNABLE_TYPE_SLOW: u32 = 3;

pub const HMI_DEFAULT: u32 = 0;
pub const HMI_CONDUCTIVE_1: u32 = 1;
pub const HMI_CONDUCTIVE_2: u32 = 2;
pub const HMI_CONDUCTIVE_3: u32 = 3;

/// Density/mobility class of an element, ordered from lightest to heaviest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum TypeClass {
    Air = 0,
    Gas = 1,
    Fluid = 2,
    Powder = 3,
    PowderWet = 4,
    Static = 5,
    Effect = 6,
}

impl TypeClass {
    /// Decode the 3-bit class field. The unused value 7 decodes as `Effect`.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        match bits & FIELD_TYPE_CLASS_MASK {
            TYPE_AIR => TypeClass::Air,
            TYPE_GAS => TypeClass::Gas,
            TYPE_FLUID => TypeClass::Fluid,
            TYPE_POWDER => TypeClass::Powder,
            TYPE_POWDER_WET => TypeClass::PowderWet,
            TYPE_STATIC => TypeClass::Static,
            _ => TypeClass::Effect,
        }
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Weight used for displacement; wet and dry powder weigh the same
    #[inline]
    pub const fn weight(self) -> u32 {
        match self {
            TypeClass::PowderWet => TYPE_POWDER,
            other => other as u32,
        }
    }

    pub fn is_powder(self) -> bool {
        matches!(self, TypeClass::Powder | TypeClass::PowderWet)
    }
}

/// Physics/growth module selector, independent of the type class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Behaviour {
    None = 0,
    Soil = 1,
    Grass = 2,
    Tree = 3,
    TreeRoot = 4,
    TreeTrunk = 5,
    TreeLeaf = 6,
    Fire = 7,
    Water = 8,
    Entity = 9,
}

impl Behaviour {
    /// Decode the 5-bit behaviour field. Unassigned values decode as `None`.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        match bits & FIELD_BEHAVIOUR_MASK {
            BEHAVIOUR_SOIL => Behaviour::Soil,
            BEHAVIOUR_GRASS => Behaviour::Grass,
            BEHAVIOUR_TREE => Behaviour::Tree,
            BEHAVIOUR_TREE_ROOT => Behaviour::TreeRoot,
            BEHAVIOUR_TREE_TRUNK => Behaviour::TreeTrunk,
            BEHAVIOUR_TREE_LEAF => Behaviour::TreeLeaf,
            BEHAVIOUR_FIRE => Behaviour::Fire,
            BEHAVIOUR_WATER => Behaviour::Water,
            BEHAVIOUR_ENTITY => Behaviour::Entity,
            _ => Behaviour::None,
        }
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self as u32
    }
}

#[inline]
const fn get(head: u32, shift: u32, mask: u32) -> u32 {
    (head >> shift) & mask
}

#[inline]
const fn set(head: u32, shift: u32, mask: u32, value: u32) -> u32 {
    (head & !(mask << shift)) | ((value & mask) << shift)
}

// composers

/// Assemble a head from its three bytes and a temperature of zero
#[inline]
pub const fn of(type8: u32, behaviour8: u32, modifiers8: u32) -> u32 {
    (type8 & 0xFF) | ((behaviour8 & 0xFF) << 8) | ((modifiers8 & 0xFF) << 16)
}

/// Type byte with no modifiers
#[inline]
pub const fn type8(type_class: u32) -> u32 {
    type_class & FIELD_TYPE_CLASS_MASK
}

/// Type byte for powders
#[inline]
pub const fn type8_powder(type_class: u32, sliding: u32) -> u32 {
    let value = type8(type_class);
    set(value, FIELD_POWDER_SLIDING_SHIFT, FIELD_POWDER_SLIDING_MASK, sliding)
}

/// Type byte for fluids and gases
#[inline]
pub const fn type8_fluid(type_class: u32, dispersion: u32) -> u32 {
    let value = type8(type_class);
    set(value, FIELD_FLUID_DISPERSION_SHIFT, FIELD_FLUID_DISPERSION_MASK, dispersion)
}

/// Type byte for static elements
#[inline]
pub const fn type8_solid(body_id: u32, neighbourhood: u32) -> u32 {
    let value = type8(TYPE_STATIC);
    let value = set(value, FIELD_SOLID_NEIGHBOURHOOD_SHIFT, FIELD_SOLID_NEIGHBOURHOOD_MASK, neighbourhood);
    set(value, FIELD_SOLID_BODY_ID_SHIFT, FIELD_SOLID_BODY_ID_MASK, body_id)
}

/// Behaviour byte
#[inline]
pub const fn behaviour8(behaviour: u32, special: u32) -> u32 {
    (behaviour & FIELD_BEHAVIOUR_MASK) | ((special & FIELD_SPECIAL_MASK) << 5)
}

/// Modifiers byte
#[inline]
pub const fn modifiers8(flammable: u32, flame_heat: u32, burnable: u32, heat_mod_index: u32) -> u32 {
    (flammable & FIELD_2BIT_MASK)
        | ((flame_heat & FIELD_2BIT_MASK) << 2)
        | ((burnable & FIELD_2BIT_MASK) << 4)
        | ((heat_mod_index & FIELD_2BIT_MASK) << 6)
}

// getters

#[inline]
pub const fn type_class(head: u32) -> TypeClass {
    TypeClass::from_bits(get(head, FIELD_TYPE_CLASS_SHIFT, FIELD_TYPE_CLASS_MASK))
}

#[inline]
pub const fn type_class_bits(head: u32) -> u32 {
    get(head, FIELD_TYPE_CLASS_SHIFT, FIELD_TYPE_CLASS_MASK)
}

#[inline]
pub const fn type8_of(head: u32) -> u32 {
    get(head, FIELD_TYPE_SHIFT, FIELD_TYPE_MASK)
}

#[inline]
pub const fn powder_momentum(head: u32) -> u32 {
    get(head, FIELD_POWDER_MOMENTUM_SHIFT, FIELD_POWDER_MOMENTUM_MASK)
}

#[inline]
pub const fn powder_sliding(head: u32) -> u32 {
    get(head, FIELD_POWDER_SLIDING_SHIFT, FIELD_POWDER_SLIDING_MASK)
}

#[inline]
pub const fn fluid_dispersion(head: u32) -> u32 {
    get(head, FIELD_FLUID_DISPERSION_SHIFT, FIELD_FLUID_DISPERSION_MASK)
}

#[inline]
pub const fn solid_neighbourhood(head: u32) -> u32 {
    get(head, FIELD_SOLID_NEIGHBOURHOOD_SHIFT, FIELD_SOLID_NEIGHBOURHOOD_MASK)
}

#[inline]
pub const fn solid_body_id(head: u32) -> u32 {
    get(head, FIELD_SOLID_BODY_ID_SHIFT, FIELD_SOLID_BODY_ID_MASK)
}

#[inline]
pub const fn behaviour(head: u32) -> Behaviour {
    Behaviour::from_bits(get(head, FIELD_BEHAVIOUR_SHIFT, FIELD_BEHAVIOUR_MASK))
}

#[inline]
pub const fn behaviour_bits(head: u32) -> u32 {
    get(head, FIELD_BEHAVIOUR_SHIFT, FIELD_BEHAVIOUR_MASK)
}

#[inline]
pub const fn special(head: u32) -> u32 {
    get(head, FIELD_SPECIAL_SHIFT, FIELD_SPECIAL_MASK)
}

#[inline]
pub const fn flammable_type(head: u32) -> u32 {
    get(head, FIELD_FLAMMABLE_SHIFT, FIELD_2BIT_MASK)
}

#[inline]
pub const fn flame_heat_type(head: u32) -> u32 {
    get(head, FIELD_FLAME_HEAT_SHIFT, FIELD_2BIT_MASK)
}

#[inline]
pub const fn burnable_type(head: u32) -> u32 {
    get(head, FIELD_BURNABLE_SHIFT, FIELD_2BIT_MASK)
}

#[inline]
pub const fn heat_mod_index(head: u32) -> u32 {
    get(head, FIELD_HEAT_MOD_INDEX_SHIFT, FIELD_2BIT_MASK)
}

#[inline]
pub const fn temperature(head: u32) -> u32 {
    get(head, FIELD_TEMPERATURE_SHIFT, FIELD_TEMPERATURE_MASK)
}

// setters

#[inline]
pub const fn set_type_class(head: u32, type_class: u32) -> u32 {
    set(head, FIELD_TYPE_CLASS_SHIFT, FIELD_TYPE_CLASS_MASK, type_class)
}

/// Replace the whole type byte (class and modifiers)
#[inline]
pub const fn set_type(head: u32, type8: u32) -> u32 {
    set(head, FIELD_TYPE_SHIFT, FIELD_TYPE_MASK, type8)
}

#[inline]
pub const fn set_powder_momentum(head: u32, momentum: u32) -> u32 {
    set(head, FIELD_POWDER_MOMENTUM_SHIFT, FIELD_POWDER_MOMENTUM_MASK, momentum)
}

#[inline]
pub const fn set_powder_sliding(head: u32, sliding: u32) -> u32 {
    set(head, FIELD_POWDER_SLIDING_SHIFT, FIELD_POWDER_SLIDING_MASK, sliding)
}

#[inline]
pub const fn set_solid_body_id(head: u32, body_id: u32) -> u32 {
    set(head, FIELD_SOLID_BODY_ID_SHIFT, FIELD_SOLID_BODY_ID_MASK, body_id)
}

#[inline]
pub const fn set_behaviour(head: u32, behaviour: u32) -> u32 {
    set(head, FIELD_BEHAVIOUR_SHIFT, FIELD_BEHAVIOUR_MASK, behaviour)
}

#[inline]
pub const fn set_special(head: u32, special: u32) -> u32 {
    set(head, FIELD_SPECIAL_SHIFT, FIELD_SPECIAL_MASK, special)
}

#[inline]
pub const fn set_flammable_type(head: u32, flammable: u32) -> u32 {
    set(head, FIELD_FLAMMABLE_SHIFT, FIELD_2BIT_MASK, flammable)
}

#[inline]
pub const fn set_flame_heat_type(head: u32, flame_heat: u32) -> u32 {
    set(head, FIELD_FLAME_HEAT_SHIFT, FIELD_2BIT_MASK, flame_heat)
}

#[inline]
pub const fn set_burnable_type(head: u32, burnable: u32) -> u32 {
    set(head, FIELD_BURNABLE_SHIFT, FIELD_2BIT_MASK, burnable)
}

#[inline]
pub const fn set_heat_mod_index(head: u32, heat_mod_index: u32) -> u32 {
    set(head, FIELD_HEAT_MOD_INDEX_SHIFT, FIELD_2BIT_MASK, heat_mod_index)
}

#[inline]
pub const fn set_temperature(head: u32, temperature: u32) -> u32 {
    set(head, FIELD_TEMPERATURE_SHIFT, FIELD_TEMPERATURE_MASK, temperature)
}

// heat modifier tables

/// Conductivity in sixteenths; heat moved per exchange is `diff * k / 16`
pub const fn hmi_conductivity(heat_mod_index: u32) -> u32 {
    match heat_mod_index & FIELD_2BIT_MASK {
        HMI_DEFAULT => 3,
        HMI_CONDUCTIVE_1 => 5,
        HMI_CONDUCTIVE_2 => 7,
        _ => 10,
    }
}

/// Temperature at which a static element of this class melts, if any
pub const fn hmi_melting_temperature(heat_mod_index: u32) -> Option<u32> {
    match heat_mod_index & FIELD_2BIT_MASK {
        HMI_CONDUCTIVE_3 => Some(220),
        _ => None,
    }
}

/// Temperature below which a molten element solidifies again, if meltable
pub const fn hmi_solidification_temperature(heat_mod_index: u32) -> Option<u32> {
    match heat_mod_index & FIELD_2BIT_MASK {
        HMI_CONDUCTIVE_3 => Some(150),
        _ => None,
    }
}

/// Ignition temperature for a flammable type (`None` for non-flammable)
pub const fn ignition_temperature(flammable: u32) -> Option<u32> {
    match flammable & FIELD_2BIT_MASK {
        FLAMMABLE_TYPE_FAST => Some(90),
        FLAMMABLE_TYPE_MEDIUM => Some(130),
        FLAMMABLE_TYPE_SLOW => Some(180),
        _ => None,
    }
}

/// Fire temperature produced when an element of this flame heat type ignites
pub const fn flame_temperature(flame_heat: u32) -> u32 {
    match flame_heat & FIELD_2BIT_MASK {
        FLAME_HEAT_TYPE_NONE => 150,
        FLAME_HEAT_TYPE_MEDIUM => 200,
        FLAME_HEAT_TYPE_HIGH => 230,
        _ => 255,
    }
}
