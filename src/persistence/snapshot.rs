//! Snapshot model and byte layout
//!
//! Heads and tails are stored as row-major little-endian `u32` words,
//! `width * height * 4` bytes per buffer. Entities travel as their JSON
//! records so unknown or broken records survive a round trip untouched.

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::area::{AreaError, ElementArea};
use crate::element::Element;

pub const CURRENT_FORMAT_VERSION: u32 = 1;

const WORD_SIZE: usize = std::mem::size_of::<u32>();

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("{name} buffer holds {actual} bytes, expected {expected}")]
    BufferSizeMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("unsupported snapshot format version {0}")]
    UnsupportedVersion(u32),
    #[error(transparent)]
    Area(#[from] AreaError),
    #[error("failed to (de)serialize snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to access snapshot file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    pub format_version: u32,
    /// Creation time in milliseconds since the Unix epoch
    pub created: u64,
    pub width: u32,
    pub height: u32,
    /// Random generator state
    pub random: u32,
    pub iteration: u64,
    pub fall_through_enabled: bool,
    pub erasing_enabled: bool,
}

impl SnapshotMetadata {
    /// Metadata stamped with the current time and format version
    pub fn now(width: u32, height: u32) -> Self {
        let created = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            format_version: CURRENT_FORMAT_VERSION,
            created,
            width,
            height,
            random: 0,
            iteration: 0,
            fall_through_enabled: false,
            erasing_enabled: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub metadata: SnapshotMetadata,
    pub data_heads: Vec<u8>,
    pub data_tails: Vec<u8>,
    #[serde(default)]
    pub serialized_entities: Vec<Value>,
}

/// `u32` words to little-endian bytes
fn encode_words(words: &[u32]) -> Vec<u8> {
    let le: Vec<u32> = words.iter().map(|w| w.to_le()).collect();
    bytemuck::cast_slice::<u32, u8>(&le).to_vec()
}

/// Little-endian bytes to `u32` words; the length must be a multiple of four
fn decode_words(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(WORD_SIZE)
        .map(|word| u32::from_le(bytemuck::pod_read_unaligned(word)))
        .collect()
}

impl Snapshot {
    /// Capture `area` with the given metadata; width and height are taken
    /// from the grid
    pub fn capture(mut metadata: SnapshotMetadata, area: &ElementArea, serialized_entities: Vec<Value>) -> Self {
        metadata.width = area.width() as u32;
        metadata.height = area.height() as u32;
        Self {
            metadata,
            data_heads: encode_words(area.heads()),
            data_tails: encode_words(area.tails()),
            serialized_entities,
        }
    }

    fn expected_buffer_len(&self) -> usize {
        self.metadata.width as usize * self.metadata.height as usize * WORD_SIZE
    }

    /// Check the format version and both buffer sizes against the metadata
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.metadata.format_version > CURRENT_FORMAT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.metadata.format_version));
        }
        let expected = self.expected_buffer_len();
        for (name, buffer) in [("heads", &self.data_heads), ("tails", &self.data_tails)] {
            if buffer.len() != expected {
                return Err(SnapshotError::BufferSizeMismatch {
                    name,
                    expected,
                    actual: buffer.len(),
                });
            }
        }
        Ok(())
    }

    /// Rebuild the grid
    pub fn to_area(&self, chunk_size: usize) -> Result<ElementArea, SnapshotError> {
        self.validate()?;
        let area = ElementArea::from_buffers(
            self.metadata.width as usize,
            self.metadata.height as usize,
            chunk_size,
            decode_words(&self.data_heads),
            decode_words(&self.data_tails),
        )?;
        Ok(area)
    }

    /// Copy into a snapshot of another size.
    ///
    /// The bottom rows stay aligned and columns are centred; entity records
    /// are shifted along. Uncovered cells get `fill`.
    pub fn resize_into(&self, width: usize, height: usize, fill: Element) -> Result<Snapshot, SnapshotError> {
        if width == 0 || height == 0 {
            return Err(AreaError::InvalidDimensions { width, height }.into());
        }
        let area = self.to_area(crate::consts::DEFAULT_CHUNK_SIZE)?;
        let offset_x = (width as i32 - area.width()) / 2;
        let offset_y = height as i32 - area.height();
        let resized = area.resized(width, height, offset_x, fill);

        let entities = self
            .serialized_entities
            .iter()
            .map(|value| shift_entity(value, offset_x, offset_y))
            .collect();
        Ok(Snapshot::capture(self.metadata.clone(), &resized, entities))
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Snapshot saved to {}", path.as_ref().display());
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let json = fs::read_to_string(path.as_ref())?;
        let snapshot = Self::from_json(&json)?;
        log::info!(
            "Snapshot loaded from {} ({}x{}, iteration {})",
            path.as_ref().display(),
            snapshot.metadata.width,
            snapshot.metadata.height,
            snapshot.metadata.iteration
        );
        Ok(snapshot)
    }
}

/// Move a record by `(dx, dy)`; records without numeric coordinates pass
/// through unchanged
fn shift_entity(value: &Value, dx: i32, dy: i32) -> Value {
    let mut shifted = value.clone();
    if let Some(record) = shifted.as_object_mut() {
        for (key, delta) in [("x", dx), ("y", dy)] {
            if let Some(position) = record.get(key).and_then(Value::as_i64) {
                record.insert(key.to_string(), Value::from(position + i64::from(delta)));
            }
        }
    }
    shifted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{head, tail};
    use serde_json::json;

    fn sample_area() -> ElementArea {
        let mut area = ElementArea::new(4, 3, Element::default());
        let sand = Element::new(head::of(head::type8_powder(head::TYPE_POWDER, 5), 0, 0), tail::rgb(200, 180, 120));
        area.set_element(1, 2, sand);
        area.set_element(3, 0, Element::new(0x0102_0304, 0xA0B0_C0D0));
        area
    }

    #[test]
    fn test_buffers_are_little_endian() {
        let area = sample_area();
        let snapshot = Snapshot::capture(SnapshotMetadata::now(0, 0), &area, Vec::new());
        assert_eq!(snapshot.metadata.width, 4);
        assert_eq!(snapshot.data_heads.len(), 4 * 3 * 4);
        assert_eq!(&snapshot.data_heads[12..16], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&snapshot.data_tails[12..16], &[0xD0, 0xC0, 0xB0, 0xA0]);
    }

    #[test]
    fn test_area_round_trip() {
        let area = sample_area();
        let snapshot = Snapshot::capture(SnapshotMetadata::now(0, 0), &area, Vec::new());
        let restored = snapshot.to_area(16).unwrap();
        assert_eq!(restored.heads(), area.heads());
        assert_eq!(restored.tails(), area.tails());
    }

    #[test]
    fn test_json_keeps_camel_case_names() {
        let snapshot = Snapshot::capture(
            SnapshotMetadata::now(0, 0),
            &sample_area(),
            vec![json!({"entity": "fish", "x": 1, "y": 1})],
        );
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"formatVersion\":1"));
        assert!(json.contains("\"fallThroughEnabled\":false"));
        assert!(json.contains("\"serializedEntities\""));
        assert_eq!(Snapshot::from_json(&json).unwrap(), snapshot);
    }

    #[test]
    fn test_buffer_mismatch_is_fatal() {
        let mut snapshot = Snapshot::capture(SnapshotMetadata::now(0, 0), &sample_area(), Vec::new());
        snapshot.data_tails.truncate(8);
        assert!(matches!(
            snapshot.to_area(16),
            Err(SnapshotError::BufferSizeMismatch { name: "tails", expected: 48, actual: 8 })
        ));

        let mut snapshot = Snapshot::capture(SnapshotMetadata::now(0, 0), &sample_area(), Vec::new());
        snapshot.metadata.height = 4;
        assert!(matches!(snapshot.validate(), Err(SnapshotError::BufferSizeMismatch { name: "heads", .. })));
    }

    #[test]
    fn test_newer_format_is_rejected() {
        let mut snapshot = Snapshot::capture(SnapshotMetadata::now(0, 0), &sample_area(), Vec::new());
        snapshot.metadata.format_version = CURRENT_FORMAT_VERSION + 1;
        assert!(matches!(snapshot.validate(), Err(SnapshotError::UnsupportedVersion(2))));
    }

    #[test]
    fn test_resize_keeps_bottom_aligned() {
        let snapshot = Snapshot::capture(
            SnapshotMetadata::now(0, 0),
            &sample_area(),
            vec![json!({"entity": "bird", "x": 1, "y": 2}), json!("opaque")],
        );
        let resized = snapshot.resize_into(8, 5, Element::default()).unwrap();
        assert_eq!((resized.metadata.width, resized.metadata.height), (8, 5));

        let area = resized.to_area(16).unwrap();
        // (1, 2) moves by (+2, +2)
        assert_eq!(area.element(3, 4).tail, tail::rgb(200, 180, 120));
        assert_eq!(area.element(5, 2), Element::new(0x0102_0304, 0xA0B0_C0D0));
        assert_eq!(resized.serialized_entities[0], json!({"entity": "bird", "x": 3, "y": 4}));
        assert_eq!(resized.serialized_entities[1], json!("opaque"));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("sand-sim-snapshot-{}.json", std::process::id()));
        let snapshot = Snapshot::capture(SnapshotMetadata::now(0, 0), &sample_area(), Vec::new());
        snapshot.save(&path).unwrap();
        assert_eq!(Snapshot::load(&path).unwrap(), snapshot);
        fs::remove_file(&path).unwrap();
        assert!(matches!(Snapshot::load(&path), Err(SnapshotError::Io(_))));
    }
}
