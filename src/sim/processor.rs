//! Chunked tick scheduler
//!
//! One tick:
//! 1. take the chunks marked dirty since the previous tick
//! 2. walk rows bottom-to-top
//! 3. per row, visit active chunks with a column order drawn from one of
//!    the precomputed permutation tables
//! 4. dispatch each cell on its behaviour and type class
//!
//! The changed-chunk bitmap is left for the renderer to acknowledge.

use std::collections::HashSet;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use super::{entity_cells, fire, fluid, growth, heat, powder, solid_body};
use crate::area::ElementArea;
use crate::brush::Brush;
use crate::defaults::ProcessorDefaults;
use crate::element::{Behaviour, Element, TypeClass, head};
use crate::random::DeterministicRandom;

const SHUFFLE_TABLE_COUNT: usize = 64;
const SHUFFLE_SEED: u64 = 0x5A4D_0001_C0FF_EE00;

/// Outcome of a movement module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Stay,
    Moved(i32, i32),
    /// The element left the grid
    Gone,
}

/// Mutable view handed to behaviour modules for the duration of a tick
pub(crate) struct TickContext<'a> {
    pub area: &'a mut ElementArea,
    pub random: &'a mut DeterministicRandom,
    pub defaults: &'a ProcessorDefaults,
    pub iteration: u64,
    pub fall_through: bool,
    pub erasing: bool,
    pub solid_visited: &'a mut HashSet<usize>,
    /// Cells whose element already moved this tick and sits where the walk
    /// has not been yet
    pub arrived: &'a mut HashSet<usize>,
}

impl TickContext<'_> {
    /// Overwrite `(x, y)` with the brush output (the old element is passed along)
    pub fn paint(&mut self, x: i32, y: i32, brush: &Brush) {
        let old = self.area.element(x, y);
        if let Some(element) = brush.apply(x, y, self.random, Some(old)) {
            self.area.set_element(x, y, element);
        }
    }

    /// Fresh brush output, falling back to air
    pub fn produce(&mut self, x: i32, y: i32, brush: &Brush) -> Element {
        brush
            .apply(x, y, self.random, None)
            .unwrap_or_else(ProcessorDefaults::air_element)
    }

    #[inline]
    pub fn is_lighter(&self, x: i32, y: i32, weight: u32) -> bool {
        self.area
            .head_or_none(x, y)
            .is_some_and(|target| head::type_class(target).weight() < weight)
    }

    /// Movement off the bottom row under the active boundary mode
    pub fn leave_bottom(&mut self, x: i32, y: i32, weight: u32) -> Step {
        if self.erasing {
            self.area.set_element(x, y, self.defaults.default_element());
            return Step::Gone;
        }
        if self.fall_through && y != 0 && self.is_lighter(x, 0, weight) {
            self.area.swap(x, y, x, 0);
            return Step::Moved(x, 0);
        }
        Step::Stay
    }
}

/// Build the column permutations; identical on every run
fn shuffle_tables(chunk_size: usize) -> Vec<Vec<usize>> {
    let mut rng = Pcg32::seed_from_u64(SHUFFLE_SEED);
    (0..SHUFFLE_TABLE_COUNT)
        .map(|_| {
            let mut table: Vec<usize> = (0..chunk_size).collect();
            table.shuffle(&mut rng);
            table
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct Processor {
    chunk_size: usize,
    iteration: u64,
    fall_through: bool,
    erasing: bool,
    defaults: ProcessorDefaults,
    shuffle_tables: Vec<Vec<usize>>,
    active: Vec<bool>,
    active_chunk_count: usize,
    solid_visited: HashSet<usize>,
    arrived: HashSet<usize>,
}

impl Processor {
    pub fn new(chunk_size: usize, defaults: ProcessorDefaults) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            iteration: 0,
            fall_through: false,
            erasing: false,
            defaults,
            shuffle_tables: shuffle_tables(chunk_size),
            active: Vec::new(),
            active_chunk_count: 0,
            solid_visited: HashSet::new(),
            arrived: HashSet::new(),
        }
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Restore the tick counter, e.g. from a snapshot
    pub fn set_iteration(&mut self, iteration: u64) {
        self.iteration = iteration;
    }

    pub fn defaults(&self) -> &ProcessorDefaults {
        &self.defaults
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn is_fall_through_enabled(&self) -> bool {
        self.fall_through
    }

    pub fn set_fall_through_enabled(&mut self, enabled: bool) {
        self.fall_through = enabled;
    }

    pub fn is_erasing_enabled(&self) -> bool {
        self.erasing
    }

    pub fn set_erasing_enabled(&mut self, enabled: bool) {
        self.erasing = enabled;
    }

    /// Chunks visited by the last tick
    pub fn active_chunk_count(&self) -> usize {
        self.active_chunk_count
    }

    /// Advance the grid by one tick
    pub fn next(&mut self, area: &mut ElementArea, random: &mut DeterministicRandom) {
        debug_assert_eq!(area.chunk_size(), self.chunk_size, "grid and processor chunk sizes differ");

        area.chunks_mut().take_dirty(&mut self.active);
        self.active_chunk_count = self.active.iter().filter(|&&a| a).count();
        self.solid_visited.clear();
        self.arrived.clear();

        let cols = area.chunks().cols();
        let rows = area.chunks().rows();
        let width = area.width();
        let height = area.height() as usize;
        let size = self.chunk_size;

        let Processor {
            iteration,
            fall_through,
            erasing,
            defaults,
            shuffle_tables,
            active,
            solid_visited,
            arrived,
            ..
        } = self;

        let mut tick = TickContext {
            area,
            random,
            defaults,
            iteration: *iteration,
            fall_through: *fall_through,
            erasing: *erasing,
            solid_visited,
            arrived,
        };

        for cy in (0..rows).rev() {
            let row = &active[cy * cols..(cy + 1) * cols];
            if !row.iter().any(|&a| a) {
                continue;
            }
            let y_start = cy * size;
            let y_end = (y_start + size).min(height);
            for y in (y_start..y_end).rev() {
                let table = &shuffle_tables[tick.random.next_int(SHUFFLE_TABLE_COUNT as u32) as usize];
                for (cx, _) in row.iter().enumerate().filter(|(_, a)| **a) {
                    let x_base = (cx * size) as i32;
                    for &offset in table {
                        let x = x_base + offset as i32;
                        if x < width {
                            process_cell(&mut tick, x, y as i32);
                        }
                    }
                }
            }
        }

        *iteration += 1;
    }
}

/// Per-cell dispatch
#[inline]
fn process_cell(t: &mut TickContext, x: i32, y: i32) {
    let width = t.area.width();
    if !t.arrived.is_empty() && t.arrived.remove(&((y * width + x) as usize)) {
        return;
    }
    let mut element_head = t.area.head(x, y);
    if element_head == 0 {
        // cold air with no payload
        return;
    }

    match head::behaviour(element_head) {
        Behaviour::Entity => {
            entity_cells::step(t, x, y, element_head);
            return;
        }
        Behaviour::Fire => {
            fire::step(t, x, y, element_head);
            return;
        }
        Behaviour::Grass => growth::grass(t, x, y, element_head),
        Behaviour::Tree => growth::tree(t, x, y, element_head),
        Behaviour::TreeLeaf => growth::leaf(t, x, y, element_head),
        Behaviour::Water => heat::water_phase(t, x, y, element_head),
        _ => {}
    }
    // behaviour modules may have converted the cell
    element_head = t.area.head(x, y);

    let step = match head::type_class(element_head) {
        TypeClass::Powder | TypeClass::PowderWet => powder::step(t, x, y, element_head),
        TypeClass::Fluid => fluid::step(t, x, y, element_head),
        TypeClass::Gas => fluid::gas_step(t, x, y, element_head),
        TypeClass::Static if head::solid_body_id(element_head) > 0 => solid_body::step(t, x, y),
        _ => Step::Stay,
    };

    let (hx, hy) = match step {
        Step::Stay => (x, y),
        Step::Moved(nx, ny) => {
            // rows are walked bottom-up: sideways and upward moves land on
            // cells still ahead in this tick
            if ny <= y {
                t.arrived.insert((ny * width + nx) as usize);
            }
            (nx, ny)
        }
        Step::Gone => return,
    };
    if head::temperature(t.area.head(hx, hy)) > 0 {
        heat::step(t, hx, hy);
    }
}
