use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::mpsc;
use url::Url;

use stormwatch_protocol::{InboxNotification, UnreadCount};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session::SessionProvider;

/// Local view of the persisted inbox.
///
/// `loaded` stays false until the first successful list fetch, so the UI
/// can tell "empty inbox" apart from "never fetched". Later refetch
/// failures keep the previous list — stale data beats a blank view.
#[derive(Debug, Clone, Default)]
pub struct InboxSnapshot {
    pub notifications: Vec<InboxNotification>,
    pub unread: u64,
    pub loaded: bool,
}

/// The server-persisted notification inbox: bulk fetch on open, a
/// background unread-count probe while the view is closed, and optimistic
/// read-state mutations.
///
/// Every operation is a no-op when the session has no viewer, and every
/// REST failure is logged and absorbed; this surface never shows an error.
pub struct InboxService {
    inner: Arc<InboxInner>,
    poll_interval: Duration,
    poll_shutdown_tx: Option<mpsc::Sender<()>>,
    poll_task: Option<tokio::task::JoinHandle<()>>,
}

struct InboxInner {
    http: reqwest::Client,
    api_base: Url,
    session: Arc<dyn SessionProvider>,
    state: RwLock<InboxSnapshot>,
    /// True while the inbox view is on screen; suspends the probe.
    view_open: AtomicBool,
}

impl InboxService {
    pub fn new(config: &ClientConfig, session: Arc<dyn SessionProvider>) -> Self {
        Self {
            inner: Arc::new(InboxInner {
                http: reqwest::Client::new(),
                api_base: config.api_base.clone(),
                session,
                state: RwLock::new(InboxSnapshot::default()),
                view_open: AtomicBool::new(false),
            }),
            poll_interval: config.unread_poll_interval,
            poll_shutdown_tx: None,
            poll_task: None,
        }
    }

    pub fn snapshot(&self) -> InboxSnapshot {
        self.inner.state.read().clone()
    }

    /// The inbox view came on screen: suspend the probe and fetch a fresh
    /// list and count. On failure the previous state stays visible.
    pub async fn open(&self) {
        self.inner.view_open.store(true, Ordering::Relaxed);
        if self.inner.session.current_role().is_none() {
            return;
        }

        match self.inner.fetch_notifications().await {
            Ok(notifications) => {
                let mut state = self.inner.state.write();
                state.notifications = notifications;
                state.loaded = true;
            }
            Err(e) => tracing::warn!(error = %e, "inbox list fetch failed, keeping stale list"),
        }
        match self.inner.fetch_unread_count().await {
            Ok(count) => self.inner.state.write().unread = count,
            Err(e) => tracing::warn!(error = %e, "unread count fetch failed"),
        }
    }

    /// The inbox view left the screen: the background probe takes over.
    pub fn close(&self) {
        self.inner.view_open.store(false, Ordering::Relaxed);
    }

    /// Mark one notification read. The local flip and the counter decrement
    /// (floored at zero) happen before the server answers; a failed PATCH
    /// is logged but never rolled back.
    pub async fn mark_read(&self, id: &str) {
        if self.inner.session.current_role().is_none() {
            return;
        }

        {
            let mut state = self.inner.state.write();
            if let Some(item) = state.notifications.iter_mut().find(|n| n.id == id) {
                if !item.is_read {
                    item.is_read = true;
                    state.unread = state.unread.saturating_sub(1);
                }
            }
        }

        if let Err(e) = self.inner.send_mark_read(id).await {
            tracing::warn!(id, error = %e, "mark-read request failed, keeping optimistic state");
        }
    }

    /// Mark everything read: flip every item, zero the counter, then tell
    /// the server. Same eventual-consistency stance as [`mark_read`].
    ///
    /// [`mark_read`]: InboxService::mark_read
    pub async fn mark_all_read(&self) {
        if self.inner.session.current_role().is_none() {
            return;
        }

        {
            let mut state = self.inner.state.write();
            for item in &mut state.notifications {
                item.is_read = true;
            }
            state.unread = 0;
        }

        if let Err(e) = self.inner.send_mark_all_read().await {
            tracing::warn!(error = %e, "mark-all-read request failed, keeping optimistic state");
        }
    }

    /// Spawn the background unread-count probe at the configured interval.
    /// No-op if already running.
    pub fn start_polling(&mut self) {
        if self.poll_task.is_some() {
            return;
        }
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        self.poll_shutdown_tx = Some(shutdown_tx);
        self.poll_task = Some(tokio::spawn(unread_poll_loop(
            Arc::clone(&self.inner),
            self.poll_interval,
            shutdown_rx,
        )));
    }

    /// Stop the probe and wait for it to finish; no tick fires afterwards.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.poll_shutdown_tx.take() {
            let _ = tx.send(()).await;
        }
        if let Some(task) = self.poll_task.take() {
            let _ = task.await;
        }
    }
}

/// Unread-count probe: ticks while the inbox view is closed, skips while it
/// is open (opening already fetched a fresh count), and exits on shutdown.
async fn unread_poll_loop(
    inbox: Arc<InboxInner>,
    period: Duration,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    let mut interval = tokio::time::interval(period);
    // Skip the first tick (fires immediately) — the count at startup comes
    // from the first open() or the first real tick.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if inbox.view_open.load(Ordering::Relaxed) {
                    continue;
                }
                if inbox.session.current_role().is_none() {
                    continue;
                }
                match inbox.fetch_unread_count().await {
                    // Last-write-wins against open(); both run on the same
                    // event loop so there is nothing to lock.
                    Ok(count) => inbox.state.write().unread = count,
                    Err(e) => tracing::warn!(error = %e, "unread count probe failed"),
                }
            }
            _ = shutdown_rx.recv() => {
                tracing::debug!("unread poll loop shutting down");
                break;
            }
        }
    }
}

impl InboxInner {
    fn endpoint(&self, path: &str) -> Url {
        // api_base is a valid absolute URL, so joining a fixed path cannot fail
        self.api_base.join(path).unwrap_or_else(|_| self.api_base.clone())
    }

    async fn fetch_notifications(&self) -> Result<Vec<InboxNotification>, ClientError> {
        let url = self.endpoint("/api/user/notifications");
        let list = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<InboxNotification>>()
            .await?;
        Ok(list)
    }

    async fn fetch_unread_count(&self) -> Result<u64, ClientError> {
        let url = self.endpoint("/api/user/notifications/unread-count");
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<UnreadCount>()
            .await?;
        Ok(body.count)
    }

    async fn send_mark_read(&self, id: &str) -> Result<(), ClientError> {
        let url = self.endpoint(&format!("/api/user/notifications/{id}/read"));
        self.http.patch(url).send().await?.error_for_status()?;
        Ok(())
    }

    async fn send_mark_all_read(&self) -> Result<(), ClientError> {
        let url = self.endpoint("/api/user/notifications/read-all");
        self.http.patch(url).send().await?.error_for_status()?;
        Ok(())
    }
}
