//! The simulation facade
//!
//! `SandGame` owns the grid, the random generator, the processor, the
//! entities and the extensions. One call to `do_processing` is one tick.

use serde_json::{Value, json};

use crate::area::{AreaError, ElementArea};
use crate::defaults::ProcessorDefaults;
use crate::element::head;
use crate::entity::EntityManager;
use crate::extensions::{Extension, ExtensionContext, create_extensions};
use crate::graphics::Graphics;
use crate::persistence::{Snapshot, SnapshotError, SnapshotMetadata};
use crate::random::DeterministicRandom;
use crate::settings::{BoundaryMode, Settings};
use crate::sim::Processor;

pub struct SandGame {
    area: ElementArea,
    random: DeterministicRandom,
    processor: Processor,
    entities: EntityManager,
    extensions: Vec<Box<dyn Extension>>,
}

impl SandGame {
    /// Empty world of the configured size
    pub fn new(settings: &Settings) -> Result<Self, AreaError> {
        let (width, height) = (settings.width, settings.height);
        if width == 0 || height == 0 {
            return Err(AreaError::InvalidDimensions { width, height });
        }
        let area = ElementArea::with_chunk_size(width, height, settings.chunk_size, ProcessorDefaults::air_element());
        let game = Self::assemble(area, DeterministicRandom::new(settings.seed), settings);
        log::info!(
            "Created {}x{} world (seed {}, boundary {})",
            width,
            height,
            settings.seed,
            settings.boundary.as_str()
        );
        Ok(game)
    }

    /// Continue from a snapshot; the boundary mode comes from the snapshot
    pub fn from_snapshot(snapshot: &Snapshot, settings: &Settings) -> Result<Self, SnapshotError> {
        let area = snapshot.to_area(settings.chunk_size)?;
        let metadata = &snapshot.metadata;
        let mut game = Self::assemble(area, DeterministicRandom::new(metadata.random), settings);
        game.processor.set_iteration(metadata.iteration);
        game.processor.set_fall_through_enabled(metadata.fall_through_enabled);
        game.processor.set_erasing_enabled(metadata.erasing_enabled);
        game.entities
            .restore_entities(&snapshot.serialized_entities, &mut game.random);
        log::info!(
            "Restored {}x{} world at iteration {} with {} entities",
            metadata.width,
            metadata.height,
            metadata.iteration,
            game.entities.len()
        );
        Ok(game)
    }

    fn assemble(area: ElementArea, random: DeterministicRandom, settings: &Settings) -> Self {
        let mut processor = Processor::new(area.chunk_size(), ProcessorDefaults::default());
        let entities = EntityManager::new(area.width(), area.height());
        apply_boundary(&mut processor, settings.boundary);
        Self {
            area,
            random,
            processor,
            entities,
            extensions: create_extensions(&settings.extensions),
        }
    }

    /// Run one tick: entities, grid, entities again, then extensions
    pub fn do_processing(&mut self) {
        self.entities.perform_before_processing();
        self.processor.next(&mut self.area, &mut self.random);
        self.entities
            .perform_after_processing(&mut self.area, &mut self.random);

        let mut ctx = ExtensionContext {
            area: &mut self.area,
            random: &mut self.random,
            defaults: self.processor.defaults(),
            entities: &mut self.entities,
            iteration: self.processor.iteration(),
        };
        for extension in &mut self.extensions {
            extension.run(&mut ctx);
        }
    }

    pub fn create_snapshot(&self) -> Result<Snapshot, SnapshotError> {
        let metadata = SnapshotMetadata {
            random: self.random.state(),
            iteration: self.processor.iteration(),
            fall_through_enabled: self.processor.is_fall_through_enabled(),
            erasing_enabled: self.processor.is_erasing_enabled(),
            ..SnapshotMetadata::now(self.area.width() as u32, self.area.height() as u32)
        };
        let entities = self
            .entities
            .serialize_entities()
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Snapshot::capture(metadata, &self.area, entities))
    }

    /// Rebuild the world at a new size, keeping the bottom rows aligned
    pub fn resize(&mut self, width: usize, height: usize, settings: &Settings) -> Result<(), SnapshotError> {
        let resized = self
            .create_snapshot()?
            .resize_into(width, height, ProcessorDefaults::air_element())?;
        let mut game = Self::from_snapshot(&resized, settings)?;
        game.extensions = std::mem::take(&mut self.extensions);
        *self = game;
        Ok(())
    }

    pub fn graphics(&mut self) -> Graphics<'_> {
        Graphics::new(&mut self.area, &mut self.random, &mut self.entities)
    }

    pub fn boundary(&self) -> BoundaryMode {
        if self.processor.is_erasing_enabled() {
            BoundaryMode::Erasing
        } else if self.processor.is_fall_through_enabled() {
            BoundaryMode::FallThrough
        } else {
            BoundaryMode::Boxed
        }
    }

    pub fn set_boundary(&mut self, mode: BoundaryMode) {
        apply_boundary(&mut self.processor, mode);
    }

    pub fn area(&self) -> &ElementArea {
        &self.area
    }

    pub fn area_mut(&mut self) -> &mut ElementArea {
        &mut self.area
    }

    pub fn random(&self) -> &DeterministicRandom {
        &self.random
    }

    pub fn processor(&self) -> &Processor {
        &self.processor
    }

    pub fn entities(&self) -> &EntityManager {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut EntityManager {
        &mut self.entities
    }

    pub fn width(&self) -> i32 {
        self.area.width()
    }

    pub fn height(&self) -> i32 {
        self.area.height()
    }

    pub fn iteration(&self) -> u64 {
        self.processor.iteration()
    }

    /// Wake the chunk containing `(x, y)`
    pub fn trigger(&mut self, x: i32, y: i32) {
        self.area.trigger(x, y);
    }

    /// Chunks written since the last `clean_changed_chunks`, row-major
    pub fn changed_chunks(&self) -> &[bool] {
        self.area.changed_chunks()
    }

    pub fn clean_changed_chunks(&mut self) {
        self.area.clean_changed_chunks();
    }

    /// Decoded view of one cell for inspection tools
    pub fn debug_element_at(&self, x: i32, y: i32) -> Option<Value> {
        let element = self.area.element_or_none(x, y)?;
        let entities: Vec<Value> = self
            .entities
            .get_at(x, y)
            .into_iter()
            .filter_map(|entity| {
                serde_json::to_value(entity.serialize())
                    .inspect_err(|err| log::warn!("cannot encode {} at ({x}, {y}): {err}", entity.kind()))
                    .ok()
            })
            .collect();
        Some(json!({
            "x": x,
            "y": y,
            "head": format!("{:#010x}", element.head),
            "tail": format!("{:#010x}", element.tail),
            "typeClass": format!("{:?}", element.type_class()),
            "behaviour": format!("{:?}", element.behaviour()),
            "special": head::special(element.head),
            "temperature": head::temperature(element.head),
            "entities": entities,
        }))
    }
}

fn apply_boundary(processor: &mut Processor, mode: BoundaryMode) {
    processor.set_fall_through_enabled(mode == BoundaryMode::FallThrough);
    processor.set_erasing_enabled(mode == BoundaryMode::Erasing);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Behaviour, TypeClass};
    use crate::entity::EntityKind;
    use crate::settings::ExtensionSettings;

    fn settings(width: usize, height: usize, seed: u32) -> Settings {
        Settings {
            width,
            height,
            seed,
            ..Settings::default()
        }
    }

    fn bare_settings(width: usize, height: usize) -> Settings {
        Settings {
            extensions: ExtensionSettings::none(),
            ..settings(width, height, 0)
        }
    }

    /// Sand pile, a pond and a bird
    fn populated(seed: u32) -> SandGame {
        let mut game = SandGame::new(&settings(64, 48, seed)).unwrap();
        let defaults = ProcessorDefaults::default();
        let mut graphics = game.graphics();
        graphics.draw_rectangle(0, 40, 63, 47, &defaults.soil);
        graphics.draw_rectangle(10, 5, 20, 12, &defaults.sand);
        graphics.draw_rectangle(40, 20, 55, 30, &defaults.water);
        graphics
            .insert_entity(&json!({"entity": "bird", "x": 30, "y": 15}))
            .unwrap();
        game
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(matches!(
            SandGame::new(&bare_settings(0, 10)),
            Err(AreaError::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_powder_reaches_floor_in_nine_ticks() {
        let mut game = SandGame::new(&bare_settings(10, 10)).unwrap();
        let sand = ProcessorDefaults::default().sand;
        game.graphics().draw(5, 0, &sand);
        for _ in 0..9 {
            game.do_processing();
        }
        assert!(game.area().element(5, 9).type_class().is_powder());
        assert_eq!(game.area().count_non_air(), 1);
        assert_eq!(game.iteration(), 9);
    }

    #[test]
    fn test_identical_seeds_give_identical_worlds() {
        let mut a = populated(7);
        let mut b = populated(7);
        for _ in 0..300 {
            a.do_processing();
            b.do_processing();
        }
        assert_eq!(a.area().heads(), b.area().heads());
        assert_eq!(a.area().tails(), b.area().tails());
        assert_eq!(a.random(), b.random());
        assert_eq!(a.entities().serialize_entities(), b.entities().serialize_entities());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut game = populated(3);
        game.set_boundary(BoundaryMode::Erasing);
        for _ in 0..40 {
            game.do_processing();
        }
        let snapshot = game.create_snapshot().unwrap();
        assert_eq!(snapshot.metadata.iteration, 40);
        assert!(snapshot.metadata.erasing_enabled);

        let json = snapshot.to_json().unwrap();
        let restored = SandGame::from_snapshot(&Snapshot::from_json(&json).unwrap(), &settings(1, 1, 99)).unwrap();
        assert_eq!(restored.area().heads(), game.area().heads());
        assert_eq!(restored.area().tails(), game.area().tails());
        assert_eq!(restored.random(), game.random());
        assert_eq!(restored.iteration(), 40);
        assert_eq!(restored.boundary(), BoundaryMode::Erasing);
        assert_eq!(restored.entities().serialize_entities(), game.entities().serialize_entities());
    }

    #[test]
    fn test_malformed_entities_are_skipped_on_restore() {
        let game = populated(1);
        let mut snapshot = game.create_snapshot().unwrap();
        snapshot
            .serialized_entities
            .push(json!({"entity": "dragon", "x": 1, "y": 1}));
        snapshot.serialized_entities.push(json!(42));
        let restored = SandGame::from_snapshot(&snapshot, &Settings::default()).unwrap();
        assert_eq!(restored.entities().len(), 1);
        assert_eq!(restored.entities().count_entities(EntityKind::Bird), 1);
    }

    #[test]
    fn test_buffer_mismatch_aborts_restore() {
        let mut snapshot = populated(1).create_snapshot().unwrap();
        snapshot.data_heads.pop();
        assert!(matches!(
            SandGame::from_snapshot(&snapshot, &Settings::default()),
            Err(SnapshotError::BufferSizeMismatch { name: "heads", .. })
        ));
    }

    #[test]
    fn test_boundary_modes() {
        let mut game = SandGame::new(&bare_settings(8, 8)).unwrap();
        assert_eq!(game.boundary(), BoundaryMode::Boxed);
        for mode in [BoundaryMode::FallThrough, BoundaryMode::Erasing, BoundaryMode::Boxed] {
            game.set_boundary(mode);
            assert_eq!(game.boundary(), mode);
        }
    }

    #[test]
    fn test_resize_keeps_floor() {
        let mut game = SandGame::new(&bare_settings(10, 10)).unwrap();
        let wall = ProcessorDefaults::default().wall;
        game.graphics().draw_rectangle(0, 9, 9, 9, &wall);
        game.resize(20, 15, &bare_settings(1, 1)).unwrap();
        assert_eq!((game.width(), game.height()), (20, 15));
        assert_eq!(game.area().element(5, 14).type_class(), TypeClass::Static);
        assert_eq!(game.area().element(4, 14).type_class(), TypeClass::Air);
        assert_eq!(game.area().count_non_air(), 10);
    }

    #[test]
    fn test_debug_element_at() {
        let game = populated(5);
        let info = game.debug_element_at(30, 15).unwrap();
        assert_eq!(info["typeClass"], "Static");
        assert_eq!(info["behaviour"], format!("{:?}", Behaviour::Entity));
        assert_eq!(info["entities"][0]["entity"], "bird");
        assert!(game.debug_element_at(-1, 0).is_none());
    }

    #[test]
    fn test_changed_chunks_track_drawing() {
        let mut game = SandGame::new(&bare_settings(64, 64)).unwrap();
        game.clean_changed_chunks();
        assert!(game.changed_chunks().iter().all(|&changed| !changed));
        let sand = ProcessorDefaults::default().sand;
        game.graphics().draw(40, 40, &sand);
        assert!(game.changed_chunks().iter().any(|&changed| changed));
    }
}
