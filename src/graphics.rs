//! Drawing surface over a running game
//!
//! Every operation applies a brush cell by cell with the game generator and
//! marks the touched chunks, so drawn material starts moving on the next
//! tick. Positions outside the grid are ignored.

use glam::IVec2;
use serde_json::Value;

use crate::area::ElementArea;
use crate::brush::Brush;
use crate::entity::{EntityError, EntityManager, SerializedEntity};
use crate::flood_fill::{FloodFillPainter, Neighbourhood};
use crate::random::DeterministicRandom;

pub struct Graphics<'a> {
    area: &'a mut ElementArea,
    random: &'a mut DeterministicRandom,
    entities: &'a mut EntityManager,
}

impl<'a> Graphics<'a> {
    pub fn new(area: &'a mut ElementArea, random: &'a mut DeterministicRandom, entities: &'a mut EntityManager) -> Self {
        Self { area, random, entities }
    }

    /// Apply `brush` at one cell
    pub fn draw(&mut self, x: i32, y: i32, brush: &Brush) {
        let Some(old) = self.area.element_or_none(x, y) else {
            return;
        };
        if let Some(element) = brush.apply(x, y, self.random, Some(old)) {
            self.area.set_element(x, y, element);
        }
    }

    /// Fill the inclusive rectangle spanned by two corners
    pub fn draw_rectangle(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, brush: &Brush) {
        let min_x = x1.min(x2).max(0);
        let max_x = x1.max(x2).min(self.area.width() - 1);
        let min_y = y1.min(y2).max(0);
        let max_y = y1.max(y2).min(self.area.height() - 1);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                self.draw(x, y, brush);
            }
        }
    }

    /// Stroke a line `size` cells thick
    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, size: u32, brush: &Brush) {
        let radius = (size.max(1) as i32 - 1) / 2;
        for point in line_points(IVec2::new(x1, y1), IVec2::new(x2, y2)) {
            self.stamp(point, radius, brush);
        }
    }

    fn stamp(&mut self, center: IVec2, radius: i32, brush: &Brush) {
        if radius == 0 {
            self.draw(center.x, center.y, brush);
            return;
        }
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.draw(center.x + dx, center.y + dy, brush);
                }
            }
        }
    }

    /// Apply `brush` to the whole grid
    pub fn fill(&mut self, brush: &Brush) {
        let (width, height) = (self.area.width(), self.area.height());
        self.draw_rectangle(0, 0, width - 1, height - 1, brush);
    }

    /// Apply `brush` to the connected region at `(x, y)`
    pub fn flood_fill(&mut self, x: i32, y: i32, brush: &Brush, neighbourhood: Neighbourhood) {
        if !self.area.is_valid_position(x, y) {
            return;
        }
        FloodFillPainter::new(neighbourhood).paint(self.area, x, y, brush, self.random);
    }

    /// Insert an entity from its JSON record and paint its body
    pub fn insert_entity(&mut self, value: &Value) -> Result<(), EntityError> {
        let record = SerializedEntity::from_value(value)?;
        if !self.area.is_valid_position(record.x, record.y) {
            return Err(EntityError::OutOfBounds { x: record.x, y: record.y });
        }
        self.entities.add_record(&record, self.area, self.random)?;
        self.area.trigger(record.x, record.y);
        Ok(())
    }

    pub fn assign_waypoint(&mut self, x: i32, y: i32) {
        self.entities.assign_waypoint(x, y);
    }
}

/// Bresenham cells from `from` to `to`, both ends included
fn line_points(from: IVec2, to: IVec2) -> Vec<IVec2> {
    let delta = (to - from).abs();
    let step = (to - from).signum();
    let mut error = delta.x - delta.y;
    let mut point = from;
    let mut points = Vec::with_capacity(delta.max_element() as usize + 1);
    loop {
        points.push(point);
        if point == to {
            return points;
        }
        let doubled = 2 * error;
        if doubled > -delta.y {
            error -= delta.y;
            point.x += step.x;
        }
        if doubled < delta.x {
            error += delta.x;
            point.y += step.y;
        }
    }
}
