//! Element tail codec
//!
//! The tail word is render-only state: RGB color, blur style, burnt level and
//! heat visual effect. Layout (LSB first): red 0..8, green 8..16, blue 16..24,
//! blur type 24..26, burnt level 26..28, heat effect 28..31.

const FIELD_RED_SHIFT: u32 = 0;
const FIELD_GREEN_SHIFT: u32 = 8;
const FIELD_BLUE_SHIFT: u32 = 16;
const FIELD_COLOR_MASK: u32 = 0xFF;

const FIELD_BLUR_TYPE_SHIFT: u32 = 24;
const FIELD_BLUR_TYPE_MASK: u32 = 0b11;
const FIELD_BURNT_LEVEL_SHIFT: u32 = 26;
const FIELD_BURNT_LEVEL_MASK: u32 = 0b11;
const FIELD_HEAT_EFFECT_SHIFT: u32 = 28;
const FIELD_HEAT_EFFECT_MASK: u32 = 0b111;

pub const BLUR_TYPE_NONE: u32 = 0;
pub const BLUR_TYPE_1: u32 = 1;
pub const BLUR_TYPE_BACKGROUND: u32 = 2;

pub const HEAT_EFFECT_NONE: u32 = 0;
pub const HEAT_EFFECT_1: u32 = 1;
pub const HEAT_EFFECT_2: u32 = 2;
pub const HEAT_EFFECT_3: u32 = 3;

pub const BURNT_LEVEL_MAX: u32 = FIELD_BURNT_LEVEL_MASK;

#[inline]
const fn get(tail: u32, shift: u32, mask: u32) -> u32 {
    (tail >> shift) & mask
}

#[inline]
const fn set(tail: u32, shift: u32, mask: u32, value: u32) -> u32 {
    (tail & !(mask << shift)) | ((value & mask) << shift)
}

/// Assemble a tail
#[inline]
pub const fn of(r: u32, g: u32, b: u32, blur_type: u32, heat_effect: u32, burnt_level: u32) -> u32 {
    let tail = (r & FIELD_COLOR_MASK) | ((g & FIELD_COLOR_MASK) << 8) | ((b & FIELD_COLOR_MASK) << 16);
    let tail = set(tail, FIELD_BLUR_TYPE_SHIFT, FIELD_BLUR_TYPE_MASK, blur_type);
    let tail = set(tail, FIELD_HEAT_EFFECT_SHIFT, FIELD_HEAT_EFFECT_MASK, heat_effect);
    set(tail, FIELD_BURNT_LEVEL_SHIFT, FIELD_BURNT_LEVEL_MASK, burnt_level)
}

/// Plain color, no effects
#[inline]
pub const fn rgb(r: u32, g: u32, b: u32) -> u32 {
    of(r, g, b, BLUR_TYPE_NONE, HEAT_EFFECT_NONE, 0)
}

#[inline]
pub const fn red(tail: u32) -> u32 {
    get(tail, FIELD_RED_SHIFT, FIELD_COLOR_MASK)
}

#[inline]
pub const fn green(tail: u32) -> u32 {
    get(tail, FIELD_GREEN_SHIFT, FIELD_COLOR_MASK)
}

#[inline]
pub const fn blue(tail: u32) -> u32 {
    get(tail, FIELD_BLUE_SHIFT, FIELD_COLOR_MASK)
}

#[inline]
pub const fn blur_type(tail: u32) -> u32 {
    get(tail, FIELD_BLUR_TYPE_SHIFT, FIELD_BLUR_TYPE_MASK)
}

#[inline]
pub const fn burnt_level(tail: u32) -> u32 {
    get(tail, FIELD_BURNT_LEVEL_SHIFT, FIELD_BURNT_LEVEL_MASK)
}

#[inline]
pub const fn heat_effect(tail: u32) -> u32 {
    get(tail, FIELD_HEAT_EFFECT_SHIFT, FIELD_HEAT_EFFECT_MASK)
}

#[inline]
pub const fn set_color(tail: u32, r: u32, g: u32, b: u32) -> u32 {
    let tail = set(tail, FIELD_RED_SHIFT, FIELD_COLOR_MASK, r);
    let tail = set(tail, FIELD_GREEN_SHIFT, FIELD_COLOR_MASK, g);
    set(tail, FIELD_BLUE_SHIFT, FIELD_COLOR_MASK, b)
}

#[inline]
pub const fn set_blur_type(tail: u32, blur_type: u32) -> u32 {
    set(tail, FIELD_BLUR_TYPE_SHIFT, FIELD_BLUR_TYPE_MASK, blur_type)
}

#[inline]
pub const fn set_burnt_level(tail: u32, burnt_level: u32) -> u32 {
    set(tail, FIELD_BURNT_LEVEL_SHIFT, FIELD_BURNT_LEVEL_MASK, burnt_level)
}

#[inline]
pub const fn set_heat_effect(tail: u32, heat_effect: u32) -> u32 {
    set(tail, FIELD_HEAT_EFFECT_SHIFT, FIELD_HEAT_EFFECT_MASK, heat_effect)
}

/// Darken the color one burn step and bump the burnt level (saturating)
pub const fn visual_burn(tail: u32) -> u32 {
    let level = burnt_level(tail);
    if level >= BURNT_LEVEL_MAX {
        return tail;
    }
    let r = red(tail) * 3 / 4;
    let g = green(tail) * 3 / 4;
    let b = blue(tail) * 3 / 4;
    set_burnt_level(set_color(tail, r, g, b), level + 1)
}
