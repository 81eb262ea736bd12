use std::sync::Arc;

use crate::classifier::classify;
use crate::config::ClientConfig;
use crate::connection::{ConnectionManager, ConnectionState, MessageSink};
use crate::session::SessionProvider;
use crate::toasts::ToastQueue;

/// Composition root of the live feed: one push-channel connection feeding
/// one toast queue, filtered by the viewer's role.
///
/// This is the object an owning view holds for its lifetime; `start` on
/// mount, `stop` on teardown. The inbox is a separate surface and shares
/// nothing with the feed except the session.
pub struct EventFeed {
    connection: ConnectionManager,
    toasts: ToastQueue,
    session: Arc<dyn SessionProvider>,
}

impl EventFeed {
    pub fn new(config: &ClientConfig, session: Arc<dyn SessionProvider>) -> Self {
        Self {
            connection: ConnectionManager::new(config),
            toasts: ToastQueue::new(config.toast_capacity, config.toast_ttl),
            session,
        }
    }

    /// Connect and start turning accepted event updates into toasts.
    pub fn start(&mut self) {
        let toasts = self.toasts.clone();
        let session = Arc::clone(&self.session);
        // The role is read fresh per frame: login/logout between two frames
        // changes what the viewer is alerted to.
        let sink: MessageSink = Arc::new(move |msg| {
            let role = session.current_role();
            if let Some(candidate) = classify(&msg, role.as_deref()) {
                toasts.push(candidate);
            }
        });
        self.connection.start(sink);
    }

    /// Teardown: closes the connection and cancels any pending reconnect.
    /// Live toasts keep their own expiry timers; the queue simply stops
    /// growing.
    pub async fn stop(&mut self) {
        self.connection.stop().await;
    }

    /// The queue backing the toast area. Clone it into the render layer;
    /// clones share the same entries.
    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }
}
