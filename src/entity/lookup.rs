//! Position index over live entities

use std::collections::HashMap;

use super::agent::Entity;

/// Maps a grid cell to the indices of entities anchored there.
///
/// Built on demand from a snapshot of the entity list; stale as soon as any
/// entity moves.
#[derive(Debug, Default)]
pub struct EntityPositionLookup {
    table: HashMap<usize, Vec<usize>>,
    width: i32,
    height: i32,
}

impl EntityPositionLookup {
    pub fn new(entities: &[Entity], width: i32, height: i32) -> Self {
        let mut table: HashMap<usize, Vec<usize>> = HashMap::new();
        for (index, entity) in entities.iter().enumerate() {
            if !entity.is_active() {
                continue;
            }
            let (x, y) = (entity.x(), entity.y());
            if x < 0 || y < 0 || x >= width || y >= height {
                continue;
            }
            table.entry((y * width + x) as usize).or_default().push(index);
        }
        Self { table, width, height }
    }

    /// Entity indices anchored at `(x, y)`; empty outside the grid
    pub fn get_at(&self, x: i32, y: i32) -> &[usize] {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return &[];
        }
        self.table
            .get(&((y * self.width + x) as usize))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
