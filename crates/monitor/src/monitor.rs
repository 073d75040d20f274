//! Monitor lifecycle and the frame-sampling loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use invigil_common::clock::{MonitorClock, RateGate};
use invigil_common::error::{InvigilError, InvigilResult};
use invigil_vision::{FrameSource, ObjectDetector, PoseEstimator, SnapshotCapturer};

use crate::classifier::{classify, FrameObservation};
use crate::config::MonitorConfig;
use crate::dispatcher::{EventDispatcher, EventSink, FlushTimer};

/// Repaint cadence driving the sampling loop; the rate gate decides which
/// repaint ticks become sampled frames.
const REPAINT_INTERVAL: Duration = Duration::from_millis(16);

/// Lifecycle state of a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// Services ready, sampling loop running.
    Sampling,
    /// Stopped; no further ticks or flushes fire.
    Stopped,
}

/// A running proctoring monitor.
///
/// Constructed active: `start` validates the configuration, waits for both
/// detection services to report ready, then begins sampling. `stop` halts
/// scheduling and the flush timer and is idempotent.
#[derive(Debug)]
pub struct ProctorMonitor {
    state: MonitorState,
    clock: MonitorClock,
    stop_flag: Arc<AtomicBool>,
    shutdown: watch::Sender<bool>,
    sampler: Option<JoinHandle<InvigilResult<u64>>>,
    flush_timer: Option<FlushTimer>,
    frames_sampled: u64,
}

/// Everything the sampling task owns.
struct SamplerContext {
    frame_source: Box<dyn FrameSource>,
    object_detector: Box<dyn ObjectDetector>,
    pose_estimator: Box<dyn PoseEstimator>,
    capturer: SnapshotCapturer,
    dispatcher: EventDispatcher,
    min_gaze_confidence: f32,
}

impl ProctorMonitor {
    /// Validate `config`, wait for the detection services, then start
    /// sampling.
    ///
    /// Validation is synchronous and happens before any async work; any
    /// failure aborts construction entirely and no partial monitor exists.
    /// The snapshot surface is allocated synchronously; model readiness is
    /// awaited before the first frame is sampled.
    pub async fn start(
        frame_source: Box<dyn FrameSource>,
        mut object_detector: Box<dyn ObjectDetector>,
        mut pose_estimator: Box<dyn PoseEstimator>,
        sink: EventSink,
        config: MonitorConfig,
    ) -> InvigilResult<Self> {
        config.validate()?;

        let (width, height) = frame_source.dimensions();
        let capturer =
            SnapshotCapturer::new(width, height, config.image_encoding, config.annotation_color);

        object_detector.warm_up().await?;
        pose_estimator.warm_up().await?;
        info!(
            object_detector = object_detector.name(),
            pose_estimator = pose_estimator.name(),
            "detection services ready"
        );

        let (dispatcher, flush_timer) =
            match (config.queueing_enabled, config.queue_flush_period_secs) {
                (true, Some(secs)) => {
                    let (dispatcher, timer) =
                        EventDispatcher::queued(sink, Duration::from_secs(secs));
                    (dispatcher, Some(timer))
                }
                _ => (EventDispatcher::immediate(sink), None),
            };

        let stop_flag = Arc::new(AtomicBool::new(false));
        let (shutdown, shutdown_rx) = watch::channel(false);
        let clock = MonitorClock::start();

        let context = SamplerContext {
            frame_source,
            object_detector,
            pose_estimator,
            capturer,
            dispatcher,
            min_gaze_confidence: config.min_gaze_confidence(),
        };
        let sampler = tokio::spawn(sampling_loop(
            context,
            config.sampling_rate_hz,
            stop_flag.clone(),
            shutdown_rx,
        ));

        info!(
            rate_hz = config.sampling_rate_hz,
            queueing = config.queueing_enabled,
            epoch_wall = %clock.epoch_wall(),
            "monitor started"
        );

        Ok(Self {
            state: MonitorState::Sampling,
            clock,
            stop_flag,
            shutdown,
            sampler: Some(sampler),
            flush_timer,
            frames_sampled: 0,
        })
    }

    /// Halt scheduling and the flush timer. Idempotent.
    ///
    /// Returns the number of frames sampled. A detection-service failure
    /// that terminated the sampling loop surfaces here; an in-flight frame
    /// finishes (and delivers its events) before this returns, but no new
    /// ticks or flushes fire afterwards.
    pub async fn stop(&mut self) -> InvigilResult<u64> {
        if self.state == MonitorState::Stopped {
            return Ok(self.frames_sampled);
        }
        self.state = MonitorState::Stopped;

        self.stop_flag.store(true, Ordering::SeqCst);
        let _ = self.shutdown.send(true);

        let mut loop_error = None;
        if let Some(sampler) = self.sampler.take() {
            match sampler.await {
                Ok(Ok(frames)) => {
                    self.frames_sampled = frames;
                    info!(
                        frames,
                        duration_secs = self.clock.elapsed_secs(),
                        "sampling loop stopped"
                    );
                }
                Ok(Err(err)) => loop_error = Some(err),
                Err(err) => {
                    loop_error = Some(InvigilError::Other(anyhow::anyhow!(
                        "sampling task join failed: {err}"
                    )));
                }
            }
        }

        if let Some(mut timer) = self.flush_timer.take() {
            timer.halt().await;
        }

        match loop_error {
            Some(err) => Err(err),
            None => Ok(self.frames_sampled),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == MonitorState::Sampling
    }

    /// Seconds since the monitor started.
    pub fn elapsed_secs(&self) -> f64 {
        self.clock.elapsed_secs()
    }
}

/// Drive frame sampling until stopped.
///
/// Runs at repaint cadence; the rate gate turns repaint ticks into sampled
/// frames at the configured Hz. Frame processing is awaited inline, so a
/// slow detection pass delays the next frame instead of overlapping it —
/// missed intervals are skipped, never queued.
async fn sampling_loop(
    mut context: SamplerContext,
    rate_hz: u32,
    stop_flag: Arc<AtomicBool>,
    mut shutdown: watch::Receiver<bool>,
) -> InvigilResult<u64> {
    // The gate runs on the runtime clock, the same one driving the ticker.
    let epoch = tokio::time::Instant::now();
    let mut gate = RateGate::new(rate_hz, 0);
    let mut ticker = tokio::time::interval(REPAINT_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut frames: u64 = 0;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if stop_flag.load(Ordering::Relaxed) {
                    break;
                }
                if !gate.should_fire(epoch.elapsed().as_nanos() as u64) {
                    continue;
                }
                match process_frame(&mut context).await {
                    Ok(produced) => {
                        frames += 1;
                        if produced > 0 {
                            debug!(frame = frames, events = produced, "suspicious activity detected");
                        }
                    }
                    Err(err) => {
                        error!(error = %err, "frame processing failed; sampling loop terminating");
                        return Err(err);
                    }
                }
            }
            _ = shutdown.changed() => break,
        }
    }

    debug!(frames, "sampling loop exited");
    Ok(frames)
}

/// Sample one frame: joint detection pass, classification, dispatch.
async fn process_frame(context: &mut SamplerContext) -> InvigilResult<usize> {
    let SamplerContext {
        frame_source,
        object_detector,
        pose_estimator,
        capturer,
        dispatcher,
        min_gaze_confidence,
    } = context;

    let frame = frame_source.current_frame().await?;

    let (detections, landmarks) = tokio::join!(
        object_detector.detect(&frame),
        pose_estimator.estimate(&frame),
    );
    let observation = FrameObservation {
        detections: detections?,
        landmarks: landmarks?,
    };

    let events = classify(&observation, &frame, *min_gaze_confidence, capturer)?;
    let produced = events.len();
    for event in events {
        dispatcher.dispatch(event);
    }
    Ok(produced)
}
