//! Invigil Data Model
//!
//! Core data types shared across the proctoring pipeline: object
//! detections, pose landmarks, suspicious-activity events, and the
//! configuration primitives (image encodings, annotation colors) the
//! monitor validates.
//!
//! This crate is pure data — no I/O, no runtime dependencies. Everything
//! derives serde so payloads can cross the handler boundary as JSON.

pub mod detection;
pub mod encoding;
pub mod event;
pub mod pose;

pub use detection::{BoundingBox, Detection, DetectionLabel};
pub use encoding::{AnnotationColor, ImageEncoding, InvalidColor, UnsupportedEncoding};
pub use event::{BatchKind, DetectionType, EventBatch, EventData, MonitorSignal, ProctorEvent};
pub use pose::{head_landmarks, HeadLandmarks, Landmark, LandmarkName, Point};
