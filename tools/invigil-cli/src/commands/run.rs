//! Run a synthetic proctoring session against the stub services.
//!
//! Delivered signals are printed as JSON lines, one per delivery, so the
//! output can be piped into jq or a log collector.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use invigil_model::{BoundingBox, Detection, DetectionLabel, Landmark, MonitorSignal};
use invigil_monitor::{EventSink, MonitorConfig, ProctorMonitor};
use invigil_vision::stub::{
    attentive_pose, head_pose, ScriptedDetector, ScriptedPoseEstimator, StaticFrameSource,
};

pub async fn run(
    fps: u32,
    gaze_sensitivity: u32,
    encoding: &str,
    color: &str,
    queue: bool,
    flush_period: Option<u64>,
    duration: u64,
) -> anyhow::Result<()> {
    let config =
        MonitorConfig::from_options(fps, encoding, color, gaze_sensitivity, queue, flush_period)
            .context("invalid monitor configuration")?;

    let source = StaticFrameSource::new(640, 480);
    let detector = ScriptedDetector::new(demo_detection_script());
    let estimator = ScriptedPoseEstimator::new(demo_pose_script());

    let sink: EventSink = Arc::new(|signal: MonitorSignal| match serde_json::to_string(&signal) {
        Ok(line) => println!("{line}"),
        Err(err) => warn!(error = %err, "failed to serialize signal"),
    });

    let mut monitor = ProctorMonitor::start(
        Box::new(source),
        Box::new(detector),
        Box::new(estimator),
        sink,
        config,
    )
    .await
    .context("failed to start monitor")?;

    info!(duration, "demo session running");
    tokio::time::sleep(Duration::from_secs(duration)).await;

    let frames = monitor
        .stop()
        .await
        .context("monitor stopped with an error")?;
    info!(frames, "demo session finished");
    Ok(())
}

/// A scripted scene: a second person wanders in, then a phone appears, then
/// a book and a laptop show up together.
fn demo_detection_script() -> Vec<Vec<Detection>> {
    let candidate = Detection::new(
        DetectionLabel::Person,
        BoundingBox::new(220.0, 60.0, 180.0, 300.0),
        0.94,
    );
    vec![
        vec![candidate],
        vec![
            candidate,
            Detection::new(
                DetectionLabel::Person,
                BoundingBox::new(20.0, 80.0, 160.0, 280.0),
                0.81,
            ),
        ],
        vec![
            candidate,
            Detection::new(
                DetectionLabel::CellPhone,
                BoundingBox::new(300.0, 260.0, 60.0, 90.0),
                0.77,
            ),
        ],
        vec![
            candidate,
            Detection::new(
                DetectionLabel::Book,
                BoundingBox::new(80.0, 320.0, 140.0, 60.0),
                0.72,
            ),
            Detection::new(
                DetectionLabel::Laptop,
                BoundingBox::new(360.0, 240.0, 220.0, 160.0),
                0.88,
            ),
        ],
    ]
}

/// The candidate looks away to the left partway through the scene.
fn demo_pose_script() -> Vec<Vec<Landmark>> {
    vec![
        attentive_pose(),
        attentive_pose(),
        head_pose(0.9, 0.85, 0.85, 0.05, 0.8),
        attentive_pose(),
    ]
}
