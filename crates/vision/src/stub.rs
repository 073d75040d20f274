//! Scripted stand-ins for the external collaborators.
//!
//! Tests and the demo CLI run the full monitor against these: a fixed-size
//! frame source and detection services that replay one scripted response
//! per sampled frame, falling back to a quiet response once the script is
//! exhausted.

use std::collections::VecDeque;

use async_trait::async_trait;
use tracing::debug;

use invigil_common::error::InvigilResult;
use invigil_model::{Detection, Landmark, LandmarkName};

use crate::frame::VideoFrame;
use crate::service::{FrameSource, ObjectDetector, PoseEstimator};

/// Build the five head landmarks with the given confidence scores,
/// positioned for a nominal 640x480 frame.
pub fn head_pose(nose: f32, left_eye: f32, right_eye: f32, left_ear: f32, right_ear: f32) -> Vec<Landmark> {
    vec![
        Landmark::new(LandmarkName::Nose, 320.0, 180.0, nose),
        Landmark::new(LandmarkName::LeftEye, 300.0, 160.0, left_eye),
        Landmark::new(LandmarkName::RightEye, 340.0, 160.0, right_eye),
        Landmark::new(LandmarkName::LeftEar, 280.0, 170.0, left_ear),
        Landmark::new(LandmarkName::RightEar, 360.0, 170.0, right_ear),
    ]
}

/// A confident, screen-facing pose that triggers no gaze-family events.
pub fn attentive_pose() -> Vec<Landmark> {
    head_pose(0.95, 0.9, 0.9, 0.85, 0.85)
}

/// Frame source returning the same solid-color frame forever.
pub struct StaticFrameSource {
    width: u32,
    height: u32,
    fill: [u8; 3],
}

impl StaticFrameSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_fill(width, height, [32, 32, 32])
    }

    pub fn with_fill(width: u32, height: u32, fill: [u8; 3]) -> Self {
        Self {
            width,
            height,
            fill,
        }
    }
}

#[async_trait]
impl FrameSource for StaticFrameSource {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    async fn current_frame(&mut self) -> InvigilResult<VideoFrame> {
        Ok(VideoFrame::solid(self.width, self.height, self.fill))
    }
}

/// Object detector replaying scripted per-frame detection lists; an empty
/// list once the script runs out.
pub struct ScriptedDetector {
    script: VecDeque<Vec<Detection>>,
}

impl ScriptedDetector {
    pub fn new(script: Vec<Vec<Detection>>) -> Self {
        Self {
            script: script.into(),
        }
    }

    /// A detector that never sees anything.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl ObjectDetector for ScriptedDetector {
    async fn warm_up(&mut self) -> InvigilResult<()> {
        debug!(service = self.name(), "warm-up complete");
        Ok(())
    }

    async fn detect(&mut self, _frame: &VideoFrame) -> InvigilResult<Vec<Detection>> {
        Ok(self.script.pop_front().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "scripted-detector"
    }
}

/// Pose estimator replaying scripted per-frame landmark lists; an attentive
/// pose once the script runs out.
pub struct ScriptedPoseEstimator {
    script: VecDeque<Vec<Landmark>>,
}

impl ScriptedPoseEstimator {
    pub fn new(script: Vec<Vec<Landmark>>) -> Self {
        Self {
            script: script.into(),
        }
    }

    /// An estimator that always reports an attentive candidate.
    pub fn attentive() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl PoseEstimator for ScriptedPoseEstimator {
    async fn warm_up(&mut self) -> InvigilResult<()> {
        debug!(service = self.name(), "warm-up complete");
        Ok(())
    }

    async fn estimate(&mut self, _frame: &VideoFrame) -> InvigilResult<Vec<Landmark>> {
        Ok(self.script.pop_front().unwrap_or_else(attentive_pose))
    }

    fn name(&self) -> &str {
        "scripted-pose-estimator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invigil_model::{BoundingBox, DetectionLabel};

    #[tokio::test]
    async fn test_scripted_detector_replays_then_goes_quiet() {
        let mut detector = ScriptedDetector::new(vec![vec![Detection::new(
            DetectionLabel::Person,
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            0.9,
        )]]);
        let frame = VideoFrame::solid(4, 4, [0, 0, 0]);

        detector.warm_up().await.unwrap();
        assert_eq!(detector.detect(&frame).await.unwrap().len(), 1);
        assert!(detector.detect(&frame).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scripted_estimator_falls_back_to_attentive() {
        let mut estimator = ScriptedPoseEstimator::new(vec![head_pose(0.1, 0.1, 0.1, 0.1, 0.1)]);
        let frame = VideoFrame::solid(4, 4, [0, 0, 0]);

        estimator.warm_up().await.unwrap();
        let first = estimator.estimate(&frame).await.unwrap();
        assert!(first[0].score < 0.2);
        let second = estimator.estimate(&frame).await.unwrap();
        assert!(second[0].score > 0.9);
    }
}
