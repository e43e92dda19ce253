//! Serialized entity records
//!
//! JSON shape: `{"entity": "bird", "x": 10, "y": 20, "state": 3,
//! "iteration": 120, "stuck": 0, "waypoint": [40, 12]}`. Everything after
//! `y` is optional and drawn or defaulted when missing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::EntityError;
use super::species::EntityKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedEntity {
    pub entity: String,
    pub x: i32,
    pub y: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iteration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stuck: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waypoint: Option<[i32; 2]>,
}

impl SerializedEntity {
    /// Fresh record; pose and iteration get drawn on creation
    pub fn new(kind: EntityKind, x: i32, y: i32) -> Self {
        Self {
            entity: kind.as_str().to_string(),
            x,
            y,
            state: None,
            iteration: None,
            stuck: None,
            waypoint: None,
        }
    }

    pub fn from_value(value: &Value) -> Result<Self, EntityError> {
        Ok(Self::deserialize(value)?)
    }

    pub fn kind(&self) -> Result<EntityKind, EntityError> {
        self.entity.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_record() {
        let record = SerializedEntity::from_value(&json!({"entity": "fish", "x": 3, "y": 4})).unwrap();
        assert_eq!(record, SerializedEntity::new(EntityKind::Fish, 3, 4));
        assert_eq!(record.kind().unwrap(), EntityKind::Fish);
    }

    #[test]
    fn test_json_shape() {
        let fresh = serde_json::to_value(SerializedEntity::new(EntityKind::Bird, 10, 20)).unwrap();
        assert_eq!(fresh, json!({"entity": "bird", "x": 10, "y": 20}));

        let mut record = SerializedEntity::new(EntityKind::Bird, 10, 20);
        record.state = Some(3);
        record.iteration = Some(99);
        record.stuck = Some(1);
        record.waypoint = Some([5, 6]);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["waypoint"], json!([5, 6]));
        assert_eq!(SerializedEntity::from_value(&value).unwrap(), record);
    }

    #[test]
    fn test_malformed_records() {
        assert!(matches!(
            SerializedEntity::from_value(&json!({"entity": "bird", "x": 1})),
            Err(EntityError::Malformed(_))
        ));
        assert!(matches!(
            SerializedEntity::from_value(&json!(["bird", 1, 2])),
            Err(EntityError::Malformed(_))
        ));
        let unknown = SerializedEntity::from_value(&json!({"entity": "dragon", "x": 1, "y": 2})).unwrap();
        assert!(matches!(unknown.kind(), Err(EntityError::UnknownKind(_))));
    }
}
