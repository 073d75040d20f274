//! Object-detection output types.
//!
//! One `Detection` is a single labeled, boxed, confidence-scored object
//! found by the object-detection service in one frame. Labels outside the
//! closed set the classifier understands collapse into `Other` and are
//! ignored downstream.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in frame-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box covering an entire `width` x `height` frame.
    pub fn full_frame(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }
}

/// Closed set of object labels the classifier understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionLabel {
    Person,
    CellPhone,
    Book,
    Laptop,
    Other,
}

impl DetectionLabel {
    /// Map a raw class string from a COCO-trained detector onto the closed
    /// label set. Anything unrecognized becomes `Other`.
    pub fn from_model_class(class: &str) -> Self {
        match class {
            "person" => Self::Person,
            "cell phone" => Self::CellPhone,
            "book" => Self::Book,
            "laptop" => Self::Laptop,
            _ => Self::Other,
        }
    }

    /// Human-readable label text, used for snapshot annotations.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::CellPhone => "cell phone",
            Self::Book => "book",
            Self::Laptop => "laptop",
            Self::Other => "other",
        }
    }
}

/// One labeled, boxed, confidence-scored object found in a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: DetectionLabel,
    pub bbox: BoundingBox,
    pub confidence: f32,
}

impl Detection {
    pub fn new(label: DetectionLabel, bbox: BoundingBox, confidence: f32) -> Self {
        Self {
            label,
            bbox,
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_class_mapping() {
        assert_eq!(
            DetectionLabel::from_model_class("person"),
            DetectionLabel::Person
        );
        assert_eq!(
            DetectionLabel::from_model_class("cell phone"),
            DetectionLabel::CellPhone
        );
        assert_eq!(
            DetectionLabel::from_model_class("book"),
            DetectionLabel::Book
        );
        assert_eq!(
            DetectionLabel::from_model_class("laptop"),
            DetectionLabel::Laptop
        );
    }

    #[test]
    fn test_unknown_classes_collapse_to_other() {
        for class in ["tv", "remote", "dog", ""] {
            assert_eq!(DetectionLabel::from_model_class(class), DetectionLabel::Other);
        }
    }

    #[test]
    fn test_detection_roundtrip() {
        let detection = Detection::new(
            DetectionLabel::CellPhone,
            BoundingBox::new(12.0, 30.5, 80.0, 120.0),
            0.87,
        );
        let json = serde_json::to_string(&detection).unwrap();
        let parsed: Detection = serde_json::from_str(&json).unwrap();
        assert_eq!(detection, parsed);
    }

    #[test]
    fn test_full_frame_box() {
        let bbox = BoundingBox::full_frame(640, 480);
        assert_eq!(bbox, BoundingBox::new(0.0, 0.0, 640.0, 480.0));
    }
}
