//! Suspicious-activity event types delivered to the caller's handler.
//!
//! A single `ProctorEvent` is delivered as-is in immediate mode; queued
//! mode wraps everything produced since the last flush in an `EventBatch`
//! tagged `QUEUE_EVENTS`. Field names follow the handler wire contract:
//! `{ detectionType, timestamp, screenShot, data }`.

use serde::{Deserialize, Serialize};

/// Discriminant of a suspicious-activity event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectionType {
    MultipleFace,
    Mobile,
    Laptop,
    Book,
    NoPerson,
    Gaze,
}

/// Free-form event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventData {
    pub message: String,
}

/// One suspicious-activity event with its annotated snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProctorEvent {
    pub detection_type: DetectionType,

    /// Wall-clock epoch milliseconds at detection time.
    pub timestamp: i64,

    /// Annotated snapshot of the triggering frame, as a data URL.
    pub screen_shot: String,

    pub data: EventData,
}

impl ProctorEvent {
    /// Create an event stamped with the current wall-clock time.
    pub fn now(
        detection_type: DetectionType,
        screen_shot: String,
        message: impl Into<String>,
    ) -> Self {
        Self {
            detection_type,
            timestamp: chrono::Utc::now().timestamp_millis(),
            screen_shot,
            data: EventData {
                message: message.into(),
            },
        }
    }
}

/// Tag carried by batched deliveries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchKind {
    #[serde(rename = "QUEUE_EVENTS")]
    QueueEvents,
}

/// A batch of events flushed from the queue, in production order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventBatch {
    #[serde(rename = "type")]
    pub kind: BatchKind,
    pub events: Vec<ProctorEvent>,
}

impl EventBatch {
    pub fn new(events: Vec<ProctorEvent>) -> Self {
        Self {
            kind: BatchKind::QueueEvents,
            events,
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// What the caller's handler receives: a single event or a flushed batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MonitorSignal {
    Batch(EventBatch),
    Event(ProctorEvent),
}

impl MonitorSignal {
    /// The events carried by this signal, in delivery order.
    pub fn events(&self) -> &[ProctorEvent] {
        match self {
            Self::Batch(batch) => &batch.events,
            Self::Event(event) => std::slice::from_ref(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event(detection_type: DetectionType, message: &str) -> ProctorEvent {
        ProctorEvent {
            detection_type,
            timestamp: 1_723_000_000_000,
            screen_shot: "data:image/jpeg;base64,AAAA".to_string(),
            data: EventData {
                message: message.to_string(),
            },
        }
    }

    #[test]
    fn test_event_json_matches_handler_contract() {
        let event = sample_event(DetectionType::MultipleFace, "found more than one person in frame");
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"detectionType\":\"MULTIPLE_FACE\""));
        assert!(json.contains("\"timestamp\":1723000000000"));
        assert!(json.contains("\"screenShot\":\"data:image/jpeg;base64,AAAA\""));
        assert!(json.contains("\"data\":{\"message\":"));
    }

    #[test]
    fn test_detection_types_serialize_screaming_snake() {
        for (detection_type, wire) in [
            (DetectionType::MultipleFace, "\"MULTIPLE_FACE\""),
            (DetectionType::Mobile, "\"MOBILE\""),
            (DetectionType::Laptop, "\"LAPTOP\""),
            (DetectionType::Book, "\"BOOK\""),
            (DetectionType::NoPerson, "\"NO_PERSON\""),
            (DetectionType::Gaze, "\"GAZE\""),
        ] {
            assert_eq!(serde_json::to_string(&detection_type).unwrap(), wire);
        }
    }

    #[test]
    fn test_event_roundtrip() {
        let event = sample_event(DetectionType::Gaze, "looked away from the screen (to the left)");
        let json = serde_json::to_string(&event).unwrap();
        let parsed: ProctorEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, parsed);
    }

    #[test]
    fn test_batch_json_carries_queue_events_tag() {
        let batch = EventBatch::new(vec![sample_event(DetectionType::Mobile, "phone")]);
        let json = serde_json::to_string(&batch).unwrap();
        assert!(json.contains("\"type\":\"QUEUE_EVENTS\""));
        assert!(json.contains("\"events\":["));
    }

    #[test]
    fn test_signal_deserializes_batch_vs_event() {
        let batch_json = serde_json::to_string(&EventBatch::new(vec![sample_event(
            DetectionType::Book,
            "book",
        )]))
        .unwrap();
        let signal: MonitorSignal = serde_json::from_str(&batch_json).unwrap();
        assert!(matches!(signal, MonitorSignal::Batch(_)));

        let event_json =
            serde_json::to_string(&sample_event(DetectionType::NoPerson, "nobody")).unwrap();
        let signal: MonitorSignal = serde_json::from_str(&event_json).unwrap();
        assert!(matches!(signal, MonitorSignal::Event(_)));
    }

    #[test]
    fn test_signal_events_accessor() {
        let event = sample_event(DetectionType::Laptop, "laptop");
        let single = MonitorSignal::Event(event.clone());
        assert_eq!(single.events().len(), 1);

        let batch = MonitorSignal::Batch(EventBatch::new(vec![event.clone(), event]));
        assert_eq!(batch.events().len(), 2);
    }
}
