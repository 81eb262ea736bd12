use serde::{Deserialize, Serialize};

/// Compact event record carried by `EVENT_UPSERT` push frames.
///
/// Produced by the server-side aggregation pipeline; the client treats it
/// as read-only. Every non-key field defaults so a frame missing an
/// optional field still parses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    /// Stable event identifier. Empty when the server omitted it; such
    /// frames never become alerts.
    #[serde(default)]
    pub event_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub province: String,
    /// Disaster category as a lowercase string (e.g. "flood", "storm").
    /// `"unknown"` and `"other"` are catch-all buckets, not real categories.
    #[serde(default)]
    pub disaster_type: String,
    /// Aggregation confidence in 0..=1.
    #[serde(default)]
    pub confidence: f64,
    /// 1 while the event is still awaiting manual verification, 0 once
    /// verified. Kept as the wire integer rather than a bool.
    #[serde(default)]
    pub needs_verification: u8,
    /// Number of independent source articles backing this event.
    #[serde(default)]
    pub sources_count: u32,
}

/// Frames received on the push channel.
///
/// Tagged on `"type"`. Unrecognized tags deserialize to [`Unknown`] so new
/// server-side message kinds never break an older client; the connection
/// manager drops them silently.
///
/// [`Unknown`]: PushMessage::Unknown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PushMessage {
    #[serde(rename = "EVENT_UPSERT")]
    EventUpsert { data: EventSummary },
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_upsert() {
        let raw = r#"{
            "type": "EVENT_UPSERT",
            "data": {
                "event_id": "ev-17",
                "title": "Flooding in Chiang Rai",
                "province": "Chiang Rai",
                "disaster_type": "flood",
                "confidence": 0.92,
                "needs_verification": 0,
                "sources_count": 4
            }
        }"#;

        let msg: PushMessage = serde_json::from_str(raw).unwrap();
        let PushMessage::EventUpsert { data } = msg else {
            panic!("expected EventUpsert");
        };
        assert_eq!(data.event_id, "ev-17");
        assert_eq!(data.disaster_type, "flood");
        assert_eq!(data.sources_count, 4);
    }

    #[test]
    fn test_missing_fields_default() {
        let raw = r#"{"type": "EVENT_UPSERT", "data": {"event_id": "ev-1"}}"#;
        let msg: PushMessage = serde_json::from_str(raw).unwrap();
        let PushMessage::EventUpsert { data } = msg else {
            panic!("expected EventUpsert");
        };
        assert_eq!(data.title, "");
        assert_eq!(data.confidence, 0.0);
        assert_eq!(data.needs_verification, 0);
    }

    #[test]
    fn test_unknown_type_ignored() {
        let raw = r#"{"type": "HEARTBEAT", "data": {"ts": 123}}"#;
        let msg: PushMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(msg, PushMessage::Unknown);
    }

    #[test]
    fn test_malformed_frame_fails_parse() {
        assert!(serde_json::from_str::<PushMessage>("not json").is_err());
        assert!(serde_json::from_str::<PushMessage>(r#"{"data": {}}"#).is_err());
    }
}
