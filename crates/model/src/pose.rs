//! Pose-estimation output types.
//!
//! The pose service runs a single-person model: one ordered list of named,
//! confidence-scored keypoints per frame, head keypoints first. The gaze
//! rules only ever consume the first five.

use serde::{Deserialize, Serialize};

/// 2D position in frame-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Named body keypoints in the order the pose model emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkName {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

/// One named, confidence-scored body keypoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub name: LandmarkName,
    pub position: Point,
    /// Keypoint confidence in [0, 1].
    pub score: f32,
}

impl Landmark {
    pub fn new(name: LandmarkName, x: f32, y: f32, score: f32) -> Self {
        Self {
            name,
            position: Point { x, y },
            score,
        }
    }
}

/// The five head keypoints the gaze rules consume.
#[derive(Debug, Clone, Copy)]
pub struct HeadLandmarks<'a> {
    pub nose: &'a Landmark,
    pub left_eye: &'a Landmark,
    pub right_eye: &'a Landmark,
    pub left_ear: &'a Landmark,
    pub right_ear: &'a Landmark,
}

/// Extract the head keypoints from a pose estimate. Keypoints arrive in the
/// model's fixed order with the head first; estimates shorter than five
/// entries yield `None`.
pub fn head_landmarks(landmarks: &[Landmark]) -> Option<HeadLandmarks<'_>> {
    match landmarks {
        [nose, left_eye, right_eye, left_ear, right_ear, ..] => Some(HeadLandmarks {
            nose,
            left_eye,
            right_eye,
            left_ear,
            right_ear,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head(scores: [f32; 5]) -> Vec<Landmark> {
        vec![
            Landmark::new(LandmarkName::Nose, 320.0, 180.0, scores[0]),
            Landmark::new(LandmarkName::LeftEye, 300.0, 160.0, scores[1]),
            Landmark::new(LandmarkName::RightEye, 340.0, 160.0, scores[2]),
            Landmark::new(LandmarkName::LeftEar, 280.0, 170.0, scores[3]),
            Landmark::new(LandmarkName::RightEar, 360.0, 170.0, scores[4]),
        ]
    }

    #[test]
    fn test_head_landmarks_extraction() {
        let landmarks = head([0.9, 0.8, 0.7, 0.6, 0.5]);
        let head = head_landmarks(&landmarks).unwrap();
        assert_eq!(head.nose.name, LandmarkName::Nose);
        assert_eq!(head.right_ear.name, LandmarkName::RightEar);
        assert!((head.left_ear.score - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_short_estimate_yields_none() {
        let mut landmarks = head([0.9; 5]);
        landmarks.truncate(4);
        assert!(head_landmarks(&landmarks).is_none());
        assert!(head_landmarks(&[]).is_none());
    }

    #[test]
    fn test_landmark_names_serialize_snake_case() {
        let json = serde_json::to_string(&LandmarkName::LeftEye).unwrap();
        assert_eq!(json, "\"left_eye\"");
    }

    #[test]
    fn test_landmark_roundtrip() {
        let landmark = Landmark::new(LandmarkName::RightEar, 360.0, 170.5, 0.42);
        let json = serde_json::to_string(&landmark).unwrap();
        let parsed: Landmark = serde_json::from_str(&json).unwrap();
        assert_eq!(landmark, parsed);
    }
}
