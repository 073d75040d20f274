//! Invigil Vision Seams
//!
//! Everything the monitor needs from the outside world, behind traits:
//! the frame source, the object-detection and pose-estimation services,
//! plus the snapshot capturer that annotates and encodes evidence frames.
//!
//! Real inference engines and camera stacks live outside this repository;
//! the `stub` module provides scripted implementations for tests and the
//! demo CLI.

pub mod frame;
pub mod service;
pub mod snapshot;
pub mod stub;

pub use frame::VideoFrame;
pub use service::{FrameSource, ObjectDetector, PoseEstimator};
pub use snapshot::SnapshotCapturer;
pub use stub::{ScriptedDetector, ScriptedPoseEstimator, StaticFrameSource};
