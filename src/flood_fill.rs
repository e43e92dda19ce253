//! Connected-region fill over packed heads
//!
//! Two cells belong to the same region when their normalized heads agree on
//! the match mask. Wet and dry powder are treated as the same material.
//! Traversal is iterative with an explicit stack and a visited set, and the
//! visitor runs before the cell's neighbours are expanded. The visitor may
//! rewrite tails but must not change anything covered by the match mask.

use std::borrow::Borrow;
use std::collections::HashSet;

use crate::area::ElementArea;
use crate::brush::Brush;
use crate::element::head;
use crate::random::DeterministicRandom;

/// Type class, upper type modifiers and behaviour
const MASK_DEFAULT: u32 = 0b1_1111_1110_0111;
/// Type class and solid body id
const MASK_SOLID_BODY: u32 = 0b1110_0111;

const CARDINAL: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
const DIAGONAL: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Neighbourhood {
    /// 4-connected
    #[default]
    VonNeumann,
    /// 8-connected
    Moore,
    /// 8-connected only from cells without a solid neighbourhood type
    SolidBody,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FloodFillPainter {
    neighbourhood: Neighbourhood,
}

#[inline]
fn normalize(element_head: u32) -> u32 {
    if head::type_class_bits(element_head) == head::TYPE_POWDER_WET {
        head::set_type_class(element_head, head::TYPE_POWDER)
    } else {
        element_head
    }
}

impl FloodFillPainter {
    pub const fn new(neighbourhood: Neighbourhood) -> Self {
        Self { neighbourhood }
    }

    fn mask(&self) -> u32 {
        match self.neighbourhood {
            Neighbourhood::SolidBody => MASK_SOLID_BODY,
            _ => MASK_DEFAULT,
        }
    }

    fn extends_diagonally(&self, element_head: u32) -> bool {
        match self.neighbourhood {
            Neighbourhood::VonNeumann => false,
            Neighbourhood::Moore => true,
            Neighbourhood::SolidBody => head::solid_neighbourhood(element_head) == 0,
        }
    }

    /// Walk the region containing `(x, y)`, calling `visit` once per cell
    fn traverse<G, F>(&self, mut grid: G, x: i32, y: i32, mut visit: F)
    where
        G: Borrow<ElementArea>,
        F: FnMut(&mut G, i32, i32),
    {
        let mask = self.mask();
        let (width, matcher) = {
            let area: &ElementArea = grid.borrow();
            if !area.is_valid_position(x, y) {
                return;
            }
            (area.width(), normalize(area.head(x, y)) & mask)
        };

        let mut visited: HashSet<usize> = HashSet::new();
        let mut stack: Vec<(i32, i32)> = vec![(x, y)];

        while let Some((cx, cy)) = stack.pop() {
            let index = (cy * width + cx) as usize;
            if !visited.insert(index) {
                continue;
            }

            visit(&mut grid, cx, cy);

            let area: &ElementArea = grid.borrow();
            let mut push = |dx: i32, dy: i32| {
                let (nx, ny) = (cx + dx, cy + dy);
                let Some(neighbour) = area.head_or_none(nx, ny) else {
                    return;
                };
                if normalize(neighbour) & mask != matcher {
                    return;
                }
                if !visited.contains(&((ny * width + nx) as usize)) {
                    stack.push((nx, ny));
                }
            };
            for (dx, dy) in CARDINAL {
                push(dx, dy);
            }
            if self.extends_diagonally(area.head(cx, cy)) {
                for (dx, dy) in DIAGONAL {
                    push(dx, dy);
                }
            }
        }
    }

    /// Positions of the region containing `(x, y)` in visit order
    pub fn collect(&self, area: &ElementArea, x: i32, y: i32) -> Vec<(i32, i32)> {
        let mut points = Vec::new();
        self.traverse(area, x, y, |_, px, py| points.push((px, py)));
        points
    }

    /// Run `visit` on every cell of the region; the visitor may write tails
    pub fn fill<F>(&self, area: &mut ElementArea, x: i32, y: i32, mut visit: F)
    where
        F: FnMut(&mut ElementArea, i32, i32),
    {
        self.traverse(area, x, y, |grid, px, py| visit(grid, px, py));
    }

    /// Apply `brush` to every cell of the region
    pub fn paint(&self, area: &mut ElementArea, x: i32, y: i32, brush: &Brush, random: &mut DeterministicRandom) {
        self.fill(area, x, y, |grid, px, py| {
            let old = grid.element(px, py);
            if let Some(element) = brush.apply(px, py, random, Some(old)) {
                grid.set_element(px, py, element);
            }
        });
    }
}
