//! Event classification rules.
//!
//! Turns the joined output of one object-detection pass and one
//! pose-estimation pass into zero or more suspicious-activity events. The
//! object rules and the gaze rules are pure functions over model output;
//! `classify` stitches their findings together with snapshots and
//! timestamps.

use tracing::debug;

use invigil_common::error::InvigilResult;
use invigil_model::{
    head_landmarks, BoundingBox, Detection, DetectionLabel, DetectionType, Landmark, ProctorEvent,
};
use invigil_vision::{SnapshotCapturer, VideoFrame};

/// Fixed presence threshold for the no-person rule, independent of the
/// configured gaze sensitivity.
pub const NO_PERSON_CONFIDENCE: f32 = 0.3;

/// Margin subtracted from the frame width when framing gaze-family
/// snapshots.
const GAZE_REGION_MARGIN_X: u32 = 40;
/// Margin subtracted from the frame height when framing gaze-family
/// snapshots.
const GAZE_REGION_MARGIN_Y: u32 = 80;

/// Joined model output for one sampled frame.
#[derive(Debug, Clone, Default)]
pub struct FrameObservation {
    pub detections: Vec<Detection>,
    pub landmarks: Vec<Landmark>,
}

/// One rule hit, before snapshot and timestamp are attached.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Finding {
    pub(crate) detection_type: DetectionType,
    pub(crate) region: BoundingBox,
    pub(crate) label: DetectionLabel,
    pub(crate) message: &'static str,
}

/// Apply the object rules to a frame's detections, in model output order.
///
/// The first person in a frame is expected; the 2nd and every subsequent
/// person-detection is a hit of its own. Phones, books, and laptops hit on
/// every occurrence. Everything else is ignored.
pub(crate) fn object_findings(detections: &[Detection]) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut person_count = 0u32;

    for detection in detections {
        match detection.label {
            DetectionLabel::Person => {
                person_count += 1;
                if person_count > 1 {
                    findings.push(Finding {
                        detection_type: DetectionType::MultipleFace,
                        region: detection.bbox,
                        label: detection.label,
                        message: "found more than one person in frame",
                    });
                }
            }
            DetectionLabel::CellPhone => findings.push(Finding {
                detection_type: DetectionType::Mobile,
                region: detection.bbox,
                label: detection.label,
                message: "found use of a mobile phone in frame",
            }),
            DetectionLabel::Book => findings.push(Finding {
                detection_type: DetectionType::Book,
                region: detection.bbox,
                label: detection.label,
                message: "found use of a book in frame",
            }),
            DetectionLabel::Laptop => findings.push(Finding {
                detection_type: DetectionType::Laptop,
                region: detection.bbox,
                label: detection.label,
                message: "found use of a laptop in frame",
            }),
            DetectionLabel::Other => {}
        }
    }

    findings
}

/// Apply the gaze/presence rules to a frame's pose estimate.
///
/// At most one finding per frame; the presence check always takes priority
/// over the directional checks, and the left ear is checked before the
/// right.
pub(crate) fn gaze_finding(
    landmarks: &[Landmark],
    min_confidence: f32,
    frame_width: u32,
    frame_height: u32,
) -> Option<Finding> {
    let Some(head) = head_landmarks(landmarks) else {
        debug!(count = landmarks.len(), "pose estimate too short for gaze rules");
        return None;
    };

    let region = BoundingBox::new(
        0.0,
        0.0,
        frame_width.saturating_sub(GAZE_REGION_MARGIN_X) as f32,
        frame_height.saturating_sub(GAZE_REGION_MARGIN_Y) as f32,
    );

    let eyes_lost = head.left_eye.score < NO_PERSON_CONFIDENCE
        && head.right_eye.score < NO_PERSON_CONFIDENCE;
    if eyes_lost || head.nose.score < NO_PERSON_CONFIDENCE {
        return Some(Finding {
            detection_type: DetectionType::NoPerson,
            region,
            label: DetectionLabel::Person,
            message: "unable to find any person in frame",
        });
    }
    if head.left_ear.score < min_confidence {
        return Some(Finding {
            detection_type: DetectionType::Gaze,
            region,
            label: DetectionLabel::Person,
            message: "looked away from the screen (to the left)",
        });
    }
    if head.right_ear.score < min_confidence {
        return Some(Finding {
            detection_type: DetectionType::Gaze,
            region,
            label: DetectionLabel::Person,
            message: "looked away from the screen (to the right)",
        });
    }
    None
}

/// Classify one frame: object findings first (in detection order), then the
/// at-most-one gaze finding; each finding gets its own annotated snapshot.
pub fn classify(
    observation: &FrameObservation,
    frame: &VideoFrame,
    min_gaze_confidence: f32,
    capturer: &mut SnapshotCapturer,
) -> InvigilResult<Vec<ProctorEvent>> {
    let mut findings = object_findings(&observation.detections);
    if let Some(finding) = gaze_finding(
        &observation.landmarks,
        min_gaze_confidence,
        frame.width(),
        frame.height(),
    ) {
        findings.push(finding);
    }

    let mut events = Vec::with_capacity(findings.len());
    for finding in findings {
        let screen_shot = capturer.capture(frame, &finding.region, finding.label.as_str())?;
        events.push(ProctorEvent::now(
            finding.detection_type,
            screen_shot,
            finding.message,
        ));
    }
    Ok(events)
}
