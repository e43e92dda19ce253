//! Entity ownership and lifecycle

use std::cell::OnceCell;

use serde_json::Value;

use super::EntityError;
use super::agent::Entity;
use super::lookup::EntityPositionLookup;
use super::record::SerializedEntity;
use super::species::EntityKind;
use crate::area::ElementArea;
use crate::element::{Element, PositionedElement};
use crate::random::DeterministicRandom;

/// Owns every entity of a game.
///
/// Dead entities are dropped before and after each tick; removal never
/// happens while the list is being walked.
#[derive(Debug)]
pub struct EntityManager {
    entities: Vec<Entity>,
    lookup: OnceCell<EntityPositionLookup>,
    width: i32,
    height: i32,
}

impl EntityManager {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            entities: Vec::new(),
            lookup: OnceCell::new(),
            width,
            height,
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        self.lookup.take();
        &mut self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Create an entity from its JSON record and paint it into the grid
    pub fn add_serialized_entity(
        &mut self,
        value: &Value,
        area: &mut ElementArea,
        random: &mut DeterministicRandom,
    ) -> Result<(), EntityError> {
        SerializedEntity::from_value(value)
            .and_then(|record| self.add_record(&record, area, random))
            .inspect_err(|err| log::warn!("rejected entity record {value}: {err}"))
    }

    pub fn add_record(
        &mut self,
        record: &SerializedEntity,
        area: &mut ElementArea,
        random: &mut DeterministicRandom,
    ) -> Result<(), EntityError> {
        let entity = Entity::from_record(record, random)?;
        entity.paint(area, random)?;
        log::debug!("spawned {} at ({}, {})", entity.kind(), entity.x(), entity.y());
        self.push(entity);
        Ok(())
    }

    /// Recreate entities from a snapshot whose grid already holds their
    /// bodies. Bad records are skipped.
    pub fn restore_entities(&mut self, values: &[Value], random: &mut DeterministicRandom) {
        for value in values {
            let entity = SerializedEntity::from_value(value).and_then(|record| Entity::from_record(&record, random));
            match entity {
                Ok(entity) => self.push(entity),
                Err(err) => log::warn!("skipping entity record {value}: {err}"),
            }
        }
    }

    fn push(&mut self, entity: Entity) {
        self.lookup.take();
        self.entities.push(entity);
    }

    pub fn perform_before_processing(&mut self) {
        let before = self.entities.len();
        self.entities.retain(|entity| entity.perform_before_processing());
        if self.entities.len() != before {
            self.lookup.take();
        }
    }

    pub fn perform_after_processing(&mut self, area: &mut ElementArea, random: &mut DeterministicRandom) {
        if self.entities.is_empty() {
            return;
        }
        self.lookup.take();

        let mut dead = Vec::new();
        for (index, entity) in self.entities.iter_mut().enumerate() {
            match entity.perform_after_processing(area, random) {
                Ok(true) => {}
                Ok(false) => dead.push(index),
                Err(err) => {
                    log::warn!("removing faulty {} at ({}, {}): {err}", entity.kind(), entity.x(), entity.y());
                    entity.force_kill(area);
                    dead.push(index);
                }
            }
        }
        for index in dead.into_iter().rev() {
            self.entities.remove(index);
        }
    }

    /// Records of all live entities
    pub fn serialize_entities(&self) -> Vec<SerializedEntity> {
        self.entities
            .iter()
            .filter(|entity| entity.is_active())
            .map(Entity::serialize)
            .collect()
    }

    fn lookup(&self) -> &EntityPositionLookup {
        self.lookup
            .get_or_init(|| EntityPositionLookup::new(&self.entities, self.width, self.height))
    }

    /// Live entities anchored at `(x, y)`
    pub fn get_at(&self, x: i32, y: i32) -> Vec<&Entity> {
        self.lookup()
            .get_at(x, y)
            .iter()
            .map(|&index| &self.entities[index])
            .filter(|entity| entity.is_active())
            .collect()
    }

    pub fn count_entities(&self, kind: EntityKind) -> usize {
        self.entities
            .iter()
            .filter(|entity| entity.is_active() && entity.kind() == kind)
            .count()
    }

    /// Steer every live entity towards `(x, y)`
    pub fn assign_waypoint(&mut self, x: i32, y: i32) {
        for entity in self.entities.iter_mut().filter(|entity| entity.is_active()) {
            entity.assign_waypoint(x, y);
        }
    }

    /// Cut the entities anchored at `(x, y)` out of the grid.
    ///
    /// Each removed entity yields its record (relative to `rx, ry`) and its
    /// body parts; the vacated cells are set to `default`.
    pub fn extract_at(
        &mut self,
        x: i32,
        y: i32,
        area: &mut ElementArea,
        default: Element,
        rx: i32,
        ry: i32,
    ) -> Vec<(SerializedEntity, Vec<PositionedElement>)> {
        let indices = self.lookup().get_at(x, y).to_vec();
        let mut extracted = Vec::new();
        for &index in &indices {
            let entity = &mut self.entities[index];
            if entity.is_active() {
                extracted.push(entity.extract(area, default, rx, ry));
            }
        }
        for &index in indices.iter().rev() {
            self.entities.remove(index);
        }
        self.lookup.take();
        extracted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::ProcessorDefaults;
    use crate::element::{Behaviour, head};
    use serde_json::json;

    fn setup() -> (EntityManager, ElementArea, DeterministicRandom) {
        (
            EntityManager::new(60, 60),
            ElementArea::new(60, 60, ProcessorDefaults::air_element()),
            DeterministicRandom::new(5),
        )
    }

    #[test]
    fn test_add_and_query() {
        let (mut manager, mut area, mut random) = setup();
        manager
            .add_serialized_entity(&json!({"entity": "bird", "x": 30, "y": 30}), &mut area, &mut random)
            .unwrap();
        assert_eq!(manager.count_entities(EntityKind::Bird), 1);
        assert_eq!(manager.count_entities(EntityKind::Fish), 0);
        assert_eq!(manager.get_at(30, 30).len(), 1);
        assert!(manager.get_at(31, 30).is_empty());
        assert_eq!(head::behaviour(area.head(30, 30)), Behaviour::Entity);
    }

    #[test]
    fn test_malformed_record_is_rejected() {
        let (mut manager, mut area, mut random) = setup();
        let result = manager.add_serialized_entity(&json!({"entity": "dragon", "x": 1, "y": 1}), &mut area, &mut random);
        assert!(matches!(result, Err(EntityError::UnknownKind(_))));
        assert!(manager.is_empty());
        assert_eq!(area.count_non_air(), 0);

        manager.restore_entities(
            &[
                json!({"entity": "fish", "x": 4}),
                json!({"entity": "fish", "x": 4, "y": 4, "state": 0}),
                json!("bird"),
            ],
            &mut random,
        );
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.entities()[0].kind(), EntityKind::Fish);
    }

    #[test]
    fn test_overwritten_entity_dies_and_is_removed() {
        let (mut manager, mut area, mut random) = setup();
        manager
            .add_serialized_entity(&json!({"entity": "bird", "x": 30, "y": 30, "state": 0}), &mut area, &mut random)
            .unwrap();
        assert_eq!(manager.get_at(30, 30).len(), 1);

        area.set_element(30, 30, ProcessorDefaults::air_element());
        manager.perform_before_processing();
        manager.perform_after_processing(&mut area, &mut random);

        assert!(manager.is_empty());
        assert!(manager.get_at(30, 30).is_empty());
        assert!(manager.serialize_entities().is_empty());
    }

    #[test]
    fn test_invalid_pose_is_removed() {
        let (mut manager, mut area, mut random) = setup();
        manager.restore_entities(&[json!({"entity": "bird", "x": 30, "y": 30, "state": 99})], &mut random);
        assert_eq!(manager.len(), 1);
        manager.perform_after_processing(&mut area, &mut random);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_extract_and_serialize() {
        let (mut manager, mut area, mut random) = setup();
        for x in [20, 40] {
            manager
                .add_serialized_entity(&json!({"entity": "fish", "x": x, "y": 10, "state": 0}), &mut area, &mut random)
                .unwrap();
        }
        let records = manager.serialize_entities();
        assert_eq!(records.len(), 2);
        assert_eq!((records[1].x, records[1].y), (40, 10));

        let extracted = manager.extract_at(20, 10, &mut area, ProcessorDefaults::air_element(), 0, 0);
        assert_eq!(extracted.len(), 1);
        assert_eq!(extracted[0].1.len(), 2);
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.entities()[0].x(), 40);
        assert_eq!(area.count_non_air(), 2);
    }

    #[test]
    fn test_waypoint_reaches_every_entity() {
        let (mut manager, mut area, mut random) = setup();
        for x in [15, 45] {
            manager
                .add_serialized_entity(&json!({"entity": "butterfly", "x": x, "y": 20}), &mut area, &mut random)
                .unwrap();
        }
        manager.assign_waypoint(30, 30);
        assert!(manager.entities().iter().all(|e| e.waypoint() == Some((30, 30))));
    }
}
