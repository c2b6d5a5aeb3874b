// src/types.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub video: VideoConfig,
    pub tracker: TrackerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    pub input_dir: String,
    pub output_dir: String,
    pub target_fps: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub tracker_type: String,
    /// Absent means sampling only: observations are emitted for every
    /// sampled frame but carry no boxes and no tracker is created.
    #[serde(default)]
    pub initial_box: Option<BoundingBox>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

fn default_confidence() -> f32 {
    1.0
}

fn default_class_name() -> String {
    "object".to_string()
}

/// Axis-aligned box in frame coordinates, origin top-left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    #[serde(default = "default_class_name")]
    pub class_name: String,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            confidence: default_confidence(),
            class_name: default_class_name(),
        }
    }
}

/// Decoded pixel buffer, 3-channel BGR in decoder byte order.
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

/// One sampled frame's worth of output. The core emits zero or one box
/// per observation; the Vec leaves room for multi-object extensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameObservation {
    pub frame_index: u64,
    pub timestamp_seconds: f64,
    pub boxes: Vec<BoundingBox>,
}

/// Complete output of one tracking run over one video. Immutable once
/// returned; `observations` is strictly ascending in `frame_index`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResult {
    pub source_id: String,
    pub observations: Vec<FrameObservation>,
    pub total_frame_count: u64,
    pub source_duration_seconds: f64,
    /// Sampled frames processed per wall-clock second of the loop.
    pub achieved_sample_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_defaults() {
        let bbox = BoundingBox::new(10, 20, 30, 40);
        assert_eq!(bbox.confidence, 1.0);
        assert_eq!(bbox.class_name, "object");
    }

    #[test]
    fn test_bounding_box_deserialize_applies_defaults() {
        let bbox: BoundingBox =
            serde_json::from_str(r#"{"x":1,"y":2,"width":3,"height":4}"#).unwrap();
        assert_eq!(bbox.confidence, 1.0);
        assert_eq!(bbox.class_name, "object");
        assert_eq!(bbox, BoundingBox::new(1, 2, 3, 4));
    }

    #[test]
    fn test_tracker_config_initial_box_optional() {
        let config: TrackerConfig = serde_yaml::from_str("tracker_type: csrt\n").unwrap();
        assert!(config.initial_box.is_none());
    }
}
