//! Invigil Monitor
//!
//! The proctoring core: fixed-rate frame sampling, event classification,
//! and immediate-or-batched event dispatch.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │                  ProctorMonitor                   │
//! │   repaint tick ──► RateGate ──► sample frame      │
//! │         ┌───────────────┴──────────────┐          │
//! │         ▼                              ▼          │
//! │   ObjectDetector                 PoseEstimator    │
//! │         └───────────┬──────────────────┘          │
//! │                     ▼                             │
//! │             EventClassifier ──► SnapshotCapturer  │
//! │                     ▼                             │
//! │             EventDispatcher ──► caller's sink     │
//! │              (immediate │ queue + flush timer)    │
//! └───────────────────────────────────────────────────┘
//! ```
//!
//! Frame processing is serialized inside the sampling task: a detection
//! pass that outlives the sampling interval delays the next frame instead
//! of overlapping it, and missed intervals are skipped, never queued.

pub mod classifier;
pub mod config;
pub mod dispatcher;
pub mod monitor;

pub use classifier::{classify, FrameObservation, NO_PERSON_CONFIDENCE};
pub use config::{ConfigError, MonitorConfig};
pub use dispatcher::{EventDispatcher, EventSink, FlushTimer};
pub use monitor::{MonitorState, ProctorMonitor};
