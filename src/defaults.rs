//! Built-in materials
//!
//! `ProcessorDefaults` bundles the brushes the behaviour modules and
//! extensions need (water/steam for phase changes, tree parts for growth,
//! ash for burn-out...). Extra materials are reachable by code name.

use crate::brush::Brush;
use crate::element::{Element, head, tail};
use crate::random::DeterministicRandom;

const PALETTE_SAND: &[[u8; 3]] = &[[214, 212, 154], [225, 217, 171], [203, 201, 142], [213, 207, 169], [206, 198, 154]];
const PALETTE_SOIL: &[[u8; 3]] = &[[142, 104, 72], [142, 104, 72], [114, 81, 58], [71, 52, 33], [135, 102, 70]];
const PALETTE_GRAVEL: &[[u8; 3]] = &[[110, 110, 110], [128, 124, 120], [94, 92, 90], [140, 136, 130]];
const PALETTE_ASH: &[[u8; 3]] = &[[131, 131, 131], [135, 135, 135], [145, 145, 145], [148, 148, 148], [160, 160, 160]];
const PALETTE_WATER: &[[u8; 3]] = &[[4, 135, 186], [5, 138, 189]];
const PALETTE_STEAM: &[[u8; 3]] = &[[172, 199, 222], [186, 207, 226], [160, 190, 215]];
const PALETTE_WALL: &[[u8; 3]] = &[[55, 55, 55], [57, 56, 54], [68, 66, 62], [60, 59, 56]];
const PALETTE_ROCK: &[[u8; 3]] = &[[97, 94, 88], [111, 103, 94], [83, 81, 75], [120, 113, 105]];
const PALETTE_METAL: &[[u8; 3]] = &[[151, 157, 162], [139, 145, 150], [170, 175, 178]];
const PALETTE_WOOD: &[[u8; 3]] = &[[96, 50, 14], [115, 64, 21], [84, 47, 17]];
const PALETTE_WOOD_DARK: &[[u8; 3]] = &[[70, 36, 10], [65, 34, 9], [80, 41, 13]];
const PALETTE_ROOT: &[[u8; 3]] = &[[96, 50, 14], [78, 43, 14], [104, 57, 18]];
const PALETTE_LEAF: &[[u8; 3]] = &[[0, 129, 73], [0, 105, 59], [31, 143, 75], [0, 115, 65]];
const PALETTE_LEAF_DEAD: &[[u8; 3]] = &[[150, 69, 41], [155, 79, 27], [140, 61, 29]];

fn sand(_x: i32, _y: i32, random: &mut DeterministicRandom, _old: Option<Element>) -> Option<Element> {
    let class = if random.next_int(100) < 60 { head::TYPE_POWDER } else { head::TYPE_POWDER_WET };
    Some(Element::new(
        head::of(head::type8_powder(class, 6), head::behaviour8(head::BEHAVIOUR_NONE, 0), head::modifiers8(0, 0, 0, head::HMI_CONDUCTIVE_2)),
        tail::of(0, 0, 0, tail::BLUR_TYPE_1, tail::HEAT_EFFECT_2, 0),
    ))
}

fn soil(_x: i32, _y: i32, random: &mut DeterministicRandom, _old: Option<Element>) -> Option<Element> {
    let class = if random.next_int(100) < 40 { head::TYPE_POWDER } else { head::TYPE_POWDER_WET };
    Some(Element::new(
        head::of(head::type8_powder(class, 5), head::behaviour8(head::BEHAVIOUR_SOIL, 0), head::modifiers8(0, 0, 0, head::HMI_CONDUCTIVE_1)),
        tail::of(0, 0, 0, tail::BLUR_TYPE_1, tail::HEAT_EFFECT_1, 0),
    ))
}

fn gravel(_x: i32, _y: i32, random: &mut DeterministicRandom, _old: Option<Element>) -> Option<Element> {
    let class = if random.next_int(100) < 20 { head::TYPE_POWDER } else { head::TYPE_POWDER_WET };
    Some(Element::new(
        head::of(head::type8_powder(class, 3), head::behaviour8(head::BEHAVIOUR_NONE, 0), head::modifiers8(0, 0, 0, head::HMI_CONDUCTIVE_2)),
        tail::of(0, 0, 0, tail::BLUR_TYPE_1, tail::HEAT_EFFECT_2, 0),
    ))
}

fn ash(_x: i32, _y: i32, random: &mut DeterministicRandom, _old: Option<Element>) -> Option<Element> {
    let class = if random.next_int(100) < 80 { head::TYPE_POWDER } else { head::TYPE_POWDER_WET };
    Some(Element::new(
        head::of(head::type8_powder(class, 6), head::behaviour8(head::BEHAVIOUR_NONE, 0), head::modifiers8(0, 0, 0, head::HMI_CONDUCTIVE_2)),
        tail::of(0, 0, 0, tail::BLUR_TYPE_1, tail::HEAT_EFFECT_2, tail::BURNT_LEVEL_MAX),
    ))
}

/// Tree seed; special holds the remaining trunk height
fn tree(_x: i32, _y: i32, random: &mut DeterministicRandom, _old: Option<Element>) -> Option<Element> {
    let height = 4 + random.next_int(4);
    Some(Element::new(
        head::of(
            head::type8(head::TYPE_STATIC),
            head::behaviour8(head::BEHAVIOUR_TREE, height),
            head::modifiers8(head::FLAMMABLE_TYPE_SLOW, head::FLAME_HEAT_TYPE_MEDIUM, head::BURNABLE_TYPE_SLOW, head::HMI_DEFAULT),
        ),
        tail::of(0, 0, 0, tail::BLUR_TYPE_NONE, tail::HEAT_EFFECT_1, 0),
    ))
}

fn static_element(behaviour8: u32, modifiers8: u32, heat_effect: u32) -> Element {
    Element::new(
        head::of(head::type8(head::TYPE_STATIC), behaviour8, modifiers8),
        tail::of(0, 0, 0, tail::BLUR_TYPE_NONE, heat_effect, 0),
    )
}

fn fire_element(temperature: u32) -> Element {
    let fire_head = head::of(head::type8(head::TYPE_EFFECT), head::behaviour8(head::BEHAVIOUR_FIRE, 0), 0);
    Element::new(head::set_temperature(fire_head, temperature), tail::rgb(249, 219, 30))
}

fn grass_element(special: u32, r: u32, g: u32, b: u32) -> Element {
    Element::new(
        head::of(
            head::type8_powder(head::TYPE_POWDER, 0),
            head::behaviour8(head::BEHAVIOUR_GRASS, special),
            head::modifiers8(head::FLAMMABLE_TYPE_MEDIUM, head::FLAME_HEAT_TYPE_MEDIUM, head::BURNABLE_TYPE_FAST, head::HMI_DEFAULT),
        ),
        tail::of(r, g, b, tail::BLUR_TYPE_1, tail::HEAT_EFFECT_1, 0),
    )
}

#[derive(Debug, Clone)]
pub struct ProcessorDefaults {
    pub air: Brush,
    pub sand: Brush,
    pub soil: Brush,
    pub gravel: Brush,
    pub wall: Brush,
    pub rock: Brush,
    pub metal: Brush,
    pub water: Brush,
    pub steam: Brush,
    pub grass: Brush,
    pub tree: Brush,
    pub tree_wood: Brush,
    pub tree_wood_dark: Brush,
    pub tree_root: Brush,
    pub tree_leaf: Brush,
    pub tree_leaf_dead: Brush,
    pub fire: Brush,
    pub ash: Brush,
}

impl Default for ProcessorDefaults {
    fn default() -> Self {
        let wood_modifiers = head::modifiers8(
            head::FLAMMABLE_TYPE_SLOW,
            head::FLAME_HEAT_TYPE_MEDIUM,
            head::BURNABLE_TYPE_SLOW,
            head::HMI_DEFAULT,
        );
        let leaf_modifiers = head::modifiers8(
            head::FLAMMABLE_TYPE_MEDIUM,
            head::FLAME_HEAT_TYPE_MEDIUM,
            head::BURNABLE_TYPE_MEDIUM,
            head::HMI_DEFAULT,
        );
        let dead_leaf_modifiers = head::modifiers8(
            head::FLAMMABLE_TYPE_FAST,
            head::FLAME_HEAT_TYPE_MEDIUM,
            head::BURNABLE_TYPE_MEDIUM,
            head::HMI_DEFAULT,
        );

        Self {
            air: Brush::solid(Self::air_element()),
            sand: Brush::palette(PALETTE_SAND, Brush::Custom(sand)),
            soil: Brush::palette(PALETTE_SOIL, Brush::Custom(soil)),
            gravel: Brush::palette(PALETTE_GRAVEL, Brush::Custom(gravel)),
            wall: Brush::palette(
                PALETTE_WALL,
                Brush::solid(static_element(0, head::modifiers8(0, 0, 0, head::HMI_CONDUCTIVE_1), tail::HEAT_EFFECT_2)),
            ),
            rock: Brush::palette(
                PALETTE_ROCK,
                Brush::solid(static_element(0, head::modifiers8(0, 0, 0, head::HMI_CONDUCTIVE_1), tail::HEAT_EFFECT_2)),
            ),
            metal: Brush::palette(
                PALETTE_METAL,
                Brush::solid(static_element(0, head::modifiers8(0, 0, 0, head::HMI_CONDUCTIVE_3), tail::HEAT_EFFECT_3)),
            ),
            water: Brush::palette(
                PALETTE_WATER,
                Brush::solid(Element::new(
                    head::of(
                        head::type8_fluid(head::TYPE_FLUID, 5),
                        head::behaviour8(head::BEHAVIOUR_WATER, 0),
                        head::modifiers8(0, 0, 0, head::HMI_CONDUCTIVE_3),
                    ),
                    tail::of(0, 0, 0, tail::BLUR_TYPE_1, tail::HEAT_EFFECT_NONE, 0),
                )),
            ),
            steam: Brush::palette(
                PALETTE_STEAM,
                Brush::solid(Element::new(
                    head::of(
                        head::type8_fluid(head::TYPE_GAS, 3),
                        head::behaviour8(head::BEHAVIOUR_WATER, 0),
                        head::modifiers8(0, 0, 0, head::HMI_CONDUCTIVE_3),
                    ),
                    tail::of(0, 0, 0, tail::BLUR_TYPE_1, tail::HEAT_EFFECT_NONE, 0),
                )),
            ),
            grass: Brush::Random(vec![
                grass_element(5, 56, 126, 38),
                grass_element(3, 46, 102, 31),
                grass_element(4, 72, 130, 70),
            ]),
            tree: Brush::palette(PALETTE_WOOD_DARK, Brush::Custom(tree)),
            tree_wood: Brush::palette(
                PALETTE_WOOD,
                Brush::solid(static_element(head::behaviour8(head::BEHAVIOUR_TREE_TRUNK, 0), wood_modifiers, tail::HEAT_EFFECT_1)),
            ),
            tree_wood_dark: Brush::palette(
                PALETTE_WOOD_DARK,
                Brush::solid(static_element(head::behaviour8(head::BEHAVIOUR_TREE_TRUNK, 0), wood_modifiers, tail::HEAT_EFFECT_1)),
            ),
            tree_root: Brush::palette(
                PALETTE_ROOT,
                Brush::solid(static_element(head::behaviour8(head::BEHAVIOUR_TREE_ROOT, 0), wood_modifiers, tail::HEAT_EFFECT_1)),
            ),
            tree_leaf: Brush::palette(
                PALETTE_LEAF,
                Brush::solid(static_element(head::behaviour8(head::BEHAVIOUR_TREE_LEAF, 0), leaf_modifiers, tail::HEAT_EFFECT_1)),
            ),
            tree_leaf_dead: Brush::palette(
                PALETTE_LEAF_DEAD,
                Brush::solid(static_element(
                    head::behaviour8(head::BEHAVIOUR_TREE_LEAF, head::SPECIAL_MAX),
                    dead_leaf_modifiers,
                    tail::HEAT_EFFECT_1,
                )),
            ),
            fire: Brush::Random(vec![fire_element(255), fire_element(255), fire_element(120)]),
            ash: Brush::palette(PALETTE_ASH, Brush::Custom(ash)),
        }
    }
}

impl ProcessorDefaults {
    /// The background element every grid starts with
    pub const fn air_element() -> Element {
        Element::new(
            head::of(head::type8(head::TYPE_AIR), 0, 0),
            tail::of(255, 255, 255, tail::BLUR_TYPE_BACKGROUND, tail::HEAT_EFFECT_NONE, 0),
        )
    }

    pub fn default_element(&self) -> Element {
        Self::air_element()
    }

    /// Look a brush up by its code name (`"sand"`, `"effect_temp_200"`...)
    pub fn by_code_name(&self, code_name: &str) -> Option<Brush> {
        let brush = match code_name {
            "air" => self.air.clone(),
            "ash" => self.ash.clone(),
            "sand" => self.sand.clone(),
            "soil" => self.soil.clone(),
            "gravel" => self.gravel.clone(),
            "wall" => self.wall.clone(),
            "rock" => self.rock.clone(),
            "metal" => self.metal.clone(),
            "metal_molten" => Brush::melting(self.metal.clone()),
            "wood" => self.tree_wood.clone(),
            "water" => self.water.clone(),
            "steam" => self.steam.clone(),
            "grass" => self.grass.clone(),
            "tree" => self.tree.clone(),
            "fire" => self.fire.clone(),
            "effect_burnt" => Brush::Burnt,
            "effect_temp_0" => Brush::Temperature(0),
            "effect_temp_127" => Brush::Temperature(127),
            "effect_temp_200" => Brush::Temperature(200),
            "effect_temp_255" => Brush::Temperature(255),
            _ => return None,
        };
        Some(brush)
    }
}
