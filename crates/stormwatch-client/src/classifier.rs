use stormwatch_protocol::{is_visible, PushMessage};

/// An event update that passed classification and is waiting to be queued
/// as a toast. Carries only what the toast renders; the queue assigns the
/// display id on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastCandidate {
    pub event_id: String,
    pub title: String,
    pub province: String,
}

/// Decide whether a push frame becomes an on-screen alert for this viewer.
///
/// Pure function: only `EVENT_UPSERT` frames with a present `event_id` are
/// considered, and rejection has no side effect — not even a log line.
pub fn classify(msg: &PushMessage, role: Option<&str>) -> Option<ToastCandidate> {
    let PushMessage::EventUpsert { data } = msg else {
        return None;
    };
    if data.event_id.is_empty() {
        return None;
    }
    if !is_visible(role, data) {
        return None;
    }
    Some(ToastCandidate {
        event_id: data.event_id.clone(),
        title: data.title.clone(),
        province: data.province.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stormwatch_protocol::EventSummary;

    fn upsert(event_id: &str, disaster_type: &str, confidence: f64) -> PushMessage {
        PushMessage::EventUpsert {
            data: EventSummary {
                event_id: event_id.into(),
                title: "Flash flood warning".into(),
                province: "Nan".into(),
                disaster_type: disaster_type.into(),
                confidence,
                needs_verification: 1,
                sources_count: 1,
            },
        }
    }

    #[test]
    fn test_accepts_visible_upsert() {
        let candidate = classify(&upsert("ev-1", "flood", 0.9), Some("guest")).unwrap();
        assert_eq!(candidate.event_id, "ev-1");
        assert_eq!(candidate.province, "Nan");
    }

    #[test]
    fn test_rejects_invisible_upsert() {
        assert!(classify(&upsert("ev-1", "flood", 0.3), Some("guest")).is_none());
        assert!(classify(&upsert("ev-1", "unknown", 0.9), Some("guest")).is_none());
    }

    #[test]
    fn test_admin_bypasses_quality_rules() {
        assert!(classify(&upsert("ev-1", "unknown", 0.1), Some("admin")).is_some());
    }

    #[test]
    fn test_rejects_missing_event_id() {
        assert!(classify(&upsert("", "flood", 0.9), Some("admin")).is_none());
    }

    #[test]
    fn test_ignores_non_upsert_frames() {
        assert!(classify(&PushMessage::Unknown, Some("admin")).is_none());
    }
}
