//! Trait seams for the external media and inference collaborators.
//!
//! The detection models are black boxes to the monitor: fixed input/output
//! contracts, readiness reported through `warm_up`, internals out of scope.

use async_trait::async_trait;

use invigil_common::error::InvigilResult;
use invigil_model::{Detection, Landmark};

use crate::frame::VideoFrame;

/// Supplies the current visual frame on demand.
#[async_trait]
pub trait FrameSource: Send {
    /// Frame dimensions in pixels, fixed for the life of the source.
    fn dimensions(&self) -> (u32, u32);

    /// The most recent frame.
    async fn current_frame(&mut self) -> InvigilResult<VideoFrame>;
}

/// Object-detection service: frame in, labeled boxes out.
#[async_trait]
pub trait ObjectDetector: Send {
    /// Load/prepare the model. Sampling does not start until this returns.
    async fn warm_up(&mut self) -> InvigilResult<()>;

    /// Detect objects in `frame`, in model output order.
    async fn detect(&mut self, frame: &VideoFrame) -> InvigilResult<Vec<Detection>>;

    /// Service name for logging.
    fn name(&self) -> &str;
}

/// Single-person pose-estimation service: frame in, ordered landmarks out.
#[async_trait]
pub trait PoseEstimator: Send {
    /// Load/prepare the model. Sampling does not start until this returns.
    async fn warm_up(&mut self) -> InvigilResult<()>;

    /// Estimate the single most prominent pose; landmarks come back in the
    /// model's fixed keypoint order, head first.
    async fn estimate(&mut self, frame: &VideoFrame) -> InvigilResult<Vec<Landmark>>;

    /// Service name for logging.
    fn name(&self) -> &str;
}
