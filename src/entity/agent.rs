//! Live entity state machine
//!
//! An entity owns no grid memory. It paints its current pose as regular
//! elements tagged with the entity behaviour and re-reads them every tick:
//! a lost, foreign or overheated part kills it, leaving the body behind as
//! an inert solid.
//!
//! Per tick, after the processor ran:
//! 1. integrity check, refresh of the part counters, fall detection
//! 2. movement every 11th iteration (or every tick while falling)
//! 3. pose transition every 10th iteration

use super::EntityError;
use super::record::SerializedEntity;
use super::species::{EntityKind, Locomotion, Species, is_falling_heavy_at, is_light_at};
use super::state_definition::Offset;
use crate::area::ElementArea;
use crate::element::{Behaviour, Element, PositionedElement, TypeClass, head};
use crate::random::DeterministicRandom;

/// Pose index of a dead entity
pub const STATE_DEAD: i32 = -1;

const MOVE_PERIOD: u64 = 11;
const POSE_PERIOD: u64 = 10;
/// Cells probed ahead of the body when walking
const LOOK_AHEAD: i32 = 5;
/// Body id given to the remains so they fall as one piece
const REMAINS_BODY_ID: u32 = 4;

#[derive(Debug, Clone)]
pub struct Entity {
    species: &'static Species,
    x: i32,
    y: i32,
    state: i32,
    iteration: u64,
    stuck: u32,
    waypoint: Option<(i32, i32)>,
}

impl Entity {
    /// Build an entity from its record. Missing iteration and pose are drawn
    /// from `random`, in that order.
    pub fn from_record(record: &SerializedEntity, random: &mut DeterministicRandom) -> Result<Self, EntityError> {
        let species = record.kind()?.species();
        let count = species.states.states_count() as u32;
        let iteration = match record.iteration {
            Some(iteration) => iteration,
            // desynchronize co-spawned entities
            None => random.next_int(count) as u64,
        };
        let state = match record.state {
            Some(state) => state,
            None => random.next_int(count) as i32,
        };
        Ok(Self {
            species,
            x: record.x,
            y: record.y,
            state,
            iteration,
            stuck: record.stuck.unwrap_or(0),
            waypoint: record.waypoint.map(|[wx, wy]| (wx, wy)),
        })
    }

    pub fn serialize(&self) -> SerializedEntity {
        SerializedEntity {
            entity: self.kind().as_str().to_string(),
            x: self.x,
            y: self.y,
            state: Some(self.state),
            iteration: Some(self.iteration),
            stuck: Some(self.stuck),
            waypoint: self.waypoint.map(|(wx, wy)| [wx, wy]),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.species.kind
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn state(&self) -> i32 {
        self.state
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn stuck(&self) -> u32 {
        self.stuck
    }

    pub fn waypoint(&self) -> Option<(i32, i32)> {
        self.waypoint
    }

    pub fn is_active(&self) -> bool {
        self.state != STATE_DEAD
    }

    /// Walks steer towards `(x, y)` until the entity gets there
    pub fn assign_waypoint(&mut self, x: i32, y: i32) {
        self.waypoint = Some((x, y));
    }

    /// Bounding box of the species over all poses
    pub fn max_boundaries(&self) -> (i32, i32) {
        self.species.states.max_boundaries()
    }

    fn pose(&self) -> Result<&'static [Offset], EntityError> {
        usize::try_from(self.state)
            .ok()
            .and_then(|state| self.species.states.pose(state))
            .ok_or(EntityError::InvalidState {
                kind: self.kind(),
                state: self.state,
            })
    }

    /// Paint the current pose at `(x, y)`; parts outside the grid are skipped
    pub fn paint(&self, area: &mut ElementArea, random: &mut DeterministicRandom) -> Result<(), EntityError> {
        for &(dx, dy) in self.pose()? {
            let (ex, ey) = (self.x + dx, self.y + dy);
            if !area.is_valid_position(ex, ey) {
                continue;
            }
            if let Some(element) = (self.species.brush)(dx, dy, random, None) {
                area.set_element(ex, ey, element);
            }
        }
        Ok(())
    }

    pub fn perform_before_processing(&self) -> bool {
        self.is_active()
    }

    /// Returns whether the entity is still alive
    pub fn perform_after_processing(
        &mut self,
        area: &mut ElementArea,
        random: &mut DeterministicRandom,
    ) -> Result<bool, EntityError> {
        self.iteration += 1;
        if !self.is_active() {
            return Ok(false);
        }
        let pose = self.pose()?;

        let Some(falling) = self.check_state(area, pose) else {
            return Ok(false);
        };

        if falling || self.iteration % MOVE_PERIOD == 0 {
            match (self.species.locomotion, falling) {
                (Locomotion::Flying, true) => {
                    let dx = random.next_int(3) as i32 - 1;
                    self.move_forced(area, pose, dx, 1);
                }
                (Locomotion::Swimming, true) => {
                    self.move_forced(area, pose, 0, 1);
                }
                (_, false) => {
                    self.move_random(area, random, pose);
                }
            }
        }

        if self.species.states.states_count() > 1 && self.iteration % POSE_PERIOD == 0 {
            self.increment_state(area)?;
        }
        Ok(true)
    }

    /// Integrity pass over the body. `None` when the entity died, otherwise
    /// whether it is falling.
    fn check_state(&mut self, area: &mut ElementArea, pose: &[Offset]) -> Option<bool> {
        let mut heavy_above = false;
        let mut light_below = true;
        let mut total_temperature = 0;

        for &(dx, dy) in pose {
            let (ex, ey) = (self.x + dx, self.y + dy);
            let Some(element_head) = area.head_or_none(ex, ey) else {
                log::debug!("{} at ({}, {}) lost a part off the grid", self.kind(), self.x, self.y);
                self.kill(area, pose);
                return None;
            };
            if head::behaviour(element_head) != Behaviour::Entity {
                log::debug!("{} at ({}, {}) lost a part", self.kind(), self.x, self.y);
                self.kill(area, pose);
                return None;
            }
            total_temperature += head::temperature(element_head);

            // reset the abandonment counter
            area.set_head(ex, ey, head::set_special(element_head, 0));

            heavy_above = heavy_above || is_falling_heavy_at(area, ex, ey - 1);
            light_below = light_below && is_light_at(area, ex, ey + 1);
        }

        if total_temperature > self.species.max_avg_temperature * pose.len() as u32 {
            log::debug!("{} at ({}, {}) overheated", self.kind(), self.x, self.y);
            self.kill(area, pose);
            return None;
        }
        if self.stuck > self.species.max_stuck {
            log::debug!("{} at ({}, {}) got stuck", self.kind(), self.x, self.y);
            self.kill(area, pose);
            return None;
        }
        Some(self.species.locomotion.is_falling(heavy_above, light_below))
    }

    fn is_space(&self, area: &ElementArea, x: i32, y: i32) -> bool {
        self.species.locomotion.is_space(area, x, y)
    }

    fn increment_state(&mut self, area: &mut ElementArea) -> Result<(), EntityError> {
        let state = self.state as usize;
        let transition = self.species.states.transition(state).ok_or(EntityError::InvalidState {
            kind: self.kind(),
            state: self.state,
        })?;
        let (x, y) = (self.x, self.y);

        let allowed = transition
            .iter()
            .all(|&((fx, fy), (tx, ty))| area.is_valid_position(x + fx, y + fy) && self.is_space(area, x + tx, y + ty));
        if !allowed {
            self.stuck += 1;
            return Ok(());
        }

        for &((fx, fy), (tx, ty)) in transition {
            area.swap(x + fx, y + fy, x + tx, y + ty);
        }
        self.stuck = 0;
        self.state = ((state + 1) % self.species.states.states_count()) as i32;
        Ok(())
    }

    fn move_random(&mut self, area: &mut ElementArea, random: &mut DeterministicRandom, pose: &[Offset]) -> bool {
        let mut dx = random.next_int(3) as i32 - 1;
        let mut dy = random.next_int(3) as i32 - 1;
        if let Some((wx, wy)) = self.waypoint {
            if (wx - self.x).abs() <= 1 && (wy - self.y).abs() <= 1 {
                self.waypoint = None;
            } else {
                dx = (wx - self.x).signum();
                dy = (wy - self.y).signum();
            }
        }

        match self.walk_target(area, pose, dx, dy) {
            Some((nx, ny)) => {
                self.relocate(area, pose, nx, ny);
                true
            }
            None => false,
        }
    }

    /// Destination of a random walk step after boundary and vision checks
    fn walk_target(&self, area: &ElementArea, pose: &[Offset], mut dx: i32, mut dy: i32) -> Option<(i32, i32)> {
        let (x, y) = (self.x, self.y);
        let boundary = self.species.area_boundary();
        let states = &self.species.states;
        let vision = self.species.vision;

        if dx < 0 && x + dx < boundary {
            dx = 0;
        }
        if dx > 0 && x + dx > area.width() - boundary {
            dx = 0;
        }
        if dy < 0 && y + dy < boundary {
            dy = 0;
        }
        if dy > 0 && y + dy > area.height() - boundary {
            dy = 0;
        }
        if dx == 0 && dy == 0 {
            return None;
        }

        // look ahead
        if dx != 0 {
            let blocked = (states.min_y() - vision..=states.max_y() + vision)
                .any(|yy| !self.is_space(area, x + dx * LOOK_AHEAD, y + dy + yy));
            if blocked {
                dx = 0;
            }
        }
        if dy != 0 {
            let blocked = (states.min_x() - vision..=states.max_x() + vision)
                .any(|xx| !self.is_space(area, x + dx + xx, y + dy * LOOK_AHEAD));
            if blocked {
                dy = 0;
            }
        }
        if dx == 0 && dy == 0 {
            return None;
        }

        // cells the body itself vacates during the move count as free
        pose.iter()
            .all(|&(px, py)| {
                pose.contains(&(px + dx, py + dy)) || self.is_space(area, x + dx + px, y + dy + py)
            })
            .then_some((x + dx, y + dy))
    }

    fn move_forced(&mut self, area: &mut ElementArea, pose: &[Offset], mut dx: i32, mut dy: i32) -> bool {
        let (x, y) = (self.x, self.y);
        if dx < 0 && x + dx < 0 {
            dx = 0;
        }
        if dx > 0 && x + dx >= area.width() {
            dx = 0;
        }
        if dy < 0 && y + dy < 0 {
            dy = 0;
        }
        if dy > 0 && y + dy >= area.height() {
            dy = 0;
        }
        if dx == 0 && dy == 0 {
            return false;
        }

        // own parts and anything up to fluid make way
        let free = pose.iter().all(|&(px, py)| {
            area.head_or_none(x + px + dx, y + py + dy).is_some_and(|target| {
                head::behaviour(target) == Behaviour::Entity || head::type_class(target) <= TypeClass::Fluid
            })
        });
        if !free {
            return false;
        }
        self.relocate(area, pose, x + dx, y + dy);
        true
    }

    /// Move every part by the same offset, leading edge first so no part
    /// lands on a cell another part still has to leave
    fn relocate(&mut self, area: &mut ElementArea, pose: &[Offset], nx: i32, ny: i32) {
        let (x, y) = (self.x, self.y);
        let mut parts = pose.to_vec();
        if nx > x {
            parts.sort_by(|a, b| b.0.cmp(&a.0));
        } else if nx < x {
            parts.sort_by(|a, b| a.0.cmp(&b.0));
        }
        if ny > y {
            parts.sort_by(|a, b| b.1.cmp(&a.1));
        } else if ny < y {
            parts.sort_by(|a, b| a.1.cmp(&b.1));
        }
        for (dx, dy) in parts {
            area.swap(x + dx, y + dy, nx + dx, ny + dy);
        }
        self.x = nx;
        self.y = ny;
    }

    /// Turn the remaining parts into an inert solid body and mark dead
    fn kill(&mut self, area: &mut ElementArea, pose: &[Offset]) {
        for &(dx, dy) in pose {
            let (ex, ey) = (self.x + dx, self.y + dy);
            let Some(element_head) = area.head_or_none(ex, ey) else {
                continue;
            };
            if head::behaviour(element_head) != Behaviour::Entity {
                continue;
            }
            let remains = head::set_type(element_head, head::type8_solid(REMAINS_BODY_ID, 0));
            let remains = head::set_special(head::set_behaviour(remains, head::BEHAVIOUR_NONE), 0);
            area.set_head(ex, ey, remains);
        }
        self.state = STATE_DEAD;
    }

    /// Kill without a usable pose; orphaned parts decay on their own
    pub fn force_kill(&mut self, area: &mut ElementArea) {
        match self.pose() {
            Ok(pose) => self.kill(area, pose),
            Err(_) => self.state = STATE_DEAD,
        }
    }

    /// Remove the body from the grid, replacing parts with `default`.
    ///
    /// Returns the record with its position relative to `(rx, ry)` and the
    /// removed parts. The entity is dead afterwards.
    pub fn extract(
        &mut self,
        area: &mut ElementArea,
        default: Element,
        rx: i32,
        ry: i32,
    ) -> (SerializedEntity, Vec<PositionedElement>) {
        let mut parts = Vec::new();
        if let Ok(pose) = self.pose() {
            for &(dx, dy) in pose {
                let (ex, ey) = (self.x + dx, self.y + dy);
                let Some(element) = area.element_or_none(ex, ey) else {
                    continue;
                };
                if element.behaviour() != Behaviour::Entity {
                    continue;
                }
                parts.push(PositionedElement::new(ex, ey, element));
                area.set_element(ex, ey, default);
            }
        }

        let mut record = self.serialize();
        record.x -= rx;
        record.y -= ry;
        self.state = STATE_DEAD;
        (record, parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::ProcessorDefaults;

    fn bird_record(x: i32, y: i32) -> SerializedEntity {
        let mut record = SerializedEntity::new(EntityKind::Bird, x, y);
        record.state = Some(0);
        record.iteration = Some(1);
        record
    }

    fn spawn(area: &mut ElementArea, record: &SerializedEntity) -> Entity {
        let mut random = DeterministicRandom::new(1);
        let entity = Entity::from_record(record, &mut random).unwrap();
        entity.paint(area, &mut random).unwrap();
        entity
    }

    fn count_parts(area: &ElementArea) -> usize {
        area.heads()
            .iter()
            .filter(|&&h| head::behaviour(h) == Behaviour::Entity)
            .count()
    }

    #[test]
    fn test_missing_fields_are_drawn() {
        let mut random = DeterministicRandom::new(42);
        let record = SerializedEntity::new(EntityKind::Bird, 5, 5);
        let entity = Entity::from_record(&record, &mut random).unwrap();
        assert!((0..8).contains(&entity.state()));
        assert!(entity.iteration() < 8);

        let mut expected = DeterministicRandom::new(42);
        assert_eq!(entity.iteration(), expected.next_int(8) as u64);
        assert_eq!(entity.state(), expected.next_int(8) as i32);
        assert_eq!(random.state(), expected.state());
    }

    #[test]
    fn test_paint_and_serialize() {
        let mut area = ElementArea::new(40, 40, ProcessorDefaults::air_element());
        let entity = spawn(&mut area, &bird_record(20, 20));
        assert_eq!(count_parts(&area), 7);
        let record = entity.serialize();
        assert_eq!(record.entity, "bird");
        assert_eq!((record.x, record.y, record.state), (20, 20, Some(0)));
        assert_eq!(record.stuck, Some(0));
    }

    #[test]
    fn test_overwritten_part_kills() {
        let mut area = ElementArea::new(40, 40, ProcessorDefaults::air_element());
        let mut entity = spawn(&mut area, &bird_record(20, 20));
        let mut random = DeterministicRandom::new(0);
        area.set_element(23, 19, Element::new(head::of(head::type8_powder(head::TYPE_POWDER, 3), 0, 0), 0));

        assert!(!entity.perform_after_processing(&mut area, &mut random).unwrap());
        assert_eq!(entity.state(), STATE_DEAD);
        assert!(!entity.is_active());
        // remains are an inert solid body
        assert_eq!(count_parts(&area), 0);
        assert_eq!(head::solid_body_id(area.head(20, 20)), REMAINS_BODY_ID);
        assert_eq!(area.element(20, 20).type_class(), TypeClass::Static);
    }

    #[test]
    fn test_hot_body_kills() {
        let mut area = ElementArea::new(40, 40, ProcessorDefaults::air_element());
        let mut entity = spawn(&mut area, &bird_record(20, 20));
        let hot = head::set_temperature(area.head(20, 20), 200);
        area.set_head(20, 20, hot);
        let mut random = DeterministicRandom::new(0);
        assert!(!entity.perform_after_processing(&mut area, &mut random).unwrap());
    }

    #[test]
    fn test_invalid_state_is_an_error() {
        let mut area = ElementArea::new(40, 40, ProcessorDefaults::air_element());
        let mut record = bird_record(20, 20);
        record.state = Some(42);
        let mut random = DeterministicRandom::new(0);
        let mut entity = Entity::from_record(&record, &mut random).unwrap();
        assert!(matches!(entity.paint(&mut area, &mut random), Err(EntityError::InvalidState { state: 42, .. })));
        assert!(matches!(
            entity.perform_after_processing(&mut area, &mut random),
            Err(EntityError::InvalidState { .. })
        ));
        entity.force_kill(&mut area);
        assert!(!entity.is_active());
    }

    #[test]
    fn test_bird_falls_under_sand() {
        let mut area = ElementArea::new(40, 40, ProcessorDefaults::air_element());
        let mut entity = spawn(&mut area, &bird_record(20, 20));
        // sand resting on the head
        area.set_element(20, 19, Element::new(head::of(head::type8_powder(head::TYPE_POWDER, 3), 0, 0), 0));
        let mut random = DeterministicRandom::new(3);
        assert!(entity.perform_after_processing(&mut area, &mut random).unwrap());
        assert_eq!(entity.y(), 21);
        assert!((19..=21).contains(&entity.x()));
        assert_eq!(count_parts(&area), 7);
    }

    #[test]
    fn test_walks_within_open_space() {
        let mut area = ElementArea::new(60, 60, ProcessorDefaults::air_element());
        let mut entity = spawn(&mut area, &bird_record(30, 30));
        let mut random = DeterministicRandom::new(9);
        for _ in 0..500 {
            assert!(entity.perform_after_processing(&mut area, &mut random).unwrap());
        }
        assert_eq!(count_parts(&area), 7);
        let boundary = EntityKind::Bird.species().area_boundary();
        assert!(entity.x() >= boundary - 1 && entity.x() <= 60 - boundary + 1);
        assert!(entity.y() >= boundary - 1 && entity.y() <= 60 - boundary + 1);
        assert!(entity.stuck() <= 15);
    }

    #[test]
    fn test_waypoint_attracts_and_clears() {
        let mut area = ElementArea::new(80, 60, ProcessorDefaults::air_element());
        let mut entity = spawn(&mut area, &bird_record(25, 30));
        entity.assign_waypoint(45, 30);
        let mut random = DeterministicRandom::new(2);
        for _ in 0..11 * 40 {
            entity.perform_after_processing(&mut area, &mut random).unwrap();
            if entity.waypoint().is_none() {
                break;
            }
        }
        assert_eq!(entity.waypoint(), None);
        // one random step may follow the arrival
        assert!((entity.x() - 45).abs() <= 2, "x = {}", entity.x());
        assert!((entity.y() - 30).abs() <= 1, "y = {}", entity.y());
    }

    #[test]
    fn test_extract_clears_body() {
        let mut area = ElementArea::new(40, 40, ProcessorDefaults::air_element());
        let mut entity = spawn(&mut area, &bird_record(20, 20));
        let (record, parts) = entity.extract(&mut area, ProcessorDefaults::air_element(), 10, 5);
        assert_eq!(parts.len(), 7);
        assert_eq!((record.x, record.y), (10, 15));
        assert_eq!(count_parts(&area), 0);
        assert_eq!(area.count_non_air(), 0);
        assert!(!entity.is_active());
    }
}
