use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted per-user notification, owned by the server.
///
/// The client only reads these and flips `is_read`; creation and deletion
/// happen server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboxNotification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Response body of the unread-count probe endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UnreadCount {
    pub count: u64,
}
