use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;

use crate::classifier::ToastCandidate;

/// A live transient alert. `id` is unique per insertion
/// (`"{event_id}-{receipt_millis}"`); dedup runs on `event_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToastAlert {
    pub id: String,
    pub event_id: String,
    pub title: String,
    pub province: String,
}

/// Bounded, deduplicated, self-expiring queue of transient alerts.
///
/// Clones share the same queue. Each successful insert spawns its own
/// expiry task; a task firing after the alert was already dismissed finds
/// nothing to remove and is a no-op, so removal never needs coordination
/// with the timers.
#[derive(Clone)]
pub struct ToastQueue {
    entries: Arc<Mutex<VecDeque<ToastAlert>>>,
    capacity: usize,
    ttl: Duration,
}

impl ToastQueue {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::new())),
            capacity,
            ttl,
        }
    }

    /// Insert an accepted candidate at the front of the queue.
    ///
    /// No-op (returns `false`) while an alert for the same `event_id` is
    /// live — first-seen wins, the original's TTL is not reset. At capacity
    /// the single oldest entry is evicted before the new one goes in.
    ///
    /// Must be called from within a tokio runtime (the expiry task is
    /// spawned here).
    pub fn push(&self, candidate: ToastCandidate) -> bool {
        let id = {
            let mut entries = self.entries.lock();
            if entries.iter().any(|a| a.event_id == candidate.event_id) {
                return false;
            }
            if entries.len() >= self.capacity {
                entries.pop_back();
            }
            let id = format!(
                "{}-{}",
                candidate.event_id,
                chrono::Utc::now().timestamp_millis()
            );
            entries.push_front(ToastAlert {
                id: id.clone(),
                event_id: candidate.event_id,
                title: candidate.title,
                province: candidate.province,
            });
            id
        };

        // Independent expiry per entry; dismissing this alert early does not
        // touch any other entry's timer.
        let queue = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(queue.ttl).await;
            queue.dismiss(&id);
        });
        true
    }

    /// Remove an alert by display id. Idempotent: removing an id that
    /// already expired or was dismissed is a no-op.
    pub fn dismiss(&self, id: &str) {
        let mut entries = self.entries.lock();
        if let Some(pos) = entries.iter().position(|a| a.id == id) {
            entries.remove(pos);
        }
    }

    /// Snapshot of the live alerts, newest first.
    pub fn alerts(&self) -> Vec<ToastAlert> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
