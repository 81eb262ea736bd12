use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use stormwatch_protocol::PushMessage;

use crate::config::ClientConfig;

/// Callback receiving every successfully parsed push frame, in receipt
/// order. Runs on the connection task; keep it cheap.
pub type MessageSink = Arc<dyn Fn(PushMessage) + Send + Sync>;

/// Push-channel lifecycle state. Owned exclusively by the connection task;
/// reads are for display and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not started, or torn down. Terminal after [`ConnectionManager::stop`].
    Idle,
    Connecting,
    Open,
    /// Lost the connection; a reconnect is pending.
    Closed,
}

/// Maintains exactly one logical push-channel connection, reconnecting
/// forever after any failure.
///
/// The whole lifecycle lives in a single spawned task, so there can never
/// be two overlapping connections or two pending reconnect timers no matter
/// how failures interleave. `stop` closes the socket, cancels any pending
/// reconnect and ends the task; nothing fires after it returns.
pub struct ConnectionManager {
    ws_url: Url,
    reconnect_delay: Duration,
    state: Arc<RwLock<ConnectionState>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl ConnectionManager {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            ws_url: config.ws_url(),
            reconnect_delay: config.reconnect_delay,
            state: Arc::new(RwLock::new(ConnectionState::Idle)),
            shutdown_tx: None,
            task: None,
        }
    }

    /// Spawn the connection task, delivering parsed frames to `sink`.
    /// No-op if already started.
    pub fn start(&mut self, sink: MessageSink) {
        if self.task.is_some() {
            tracing::debug!("connection manager already started");
            return;
        }
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        self.shutdown_tx = Some(shutdown_tx);
        self.task = Some(tokio::spawn(run_loop(
            self.ws_url.clone(),
            self.reconnect_delay,
            Arc::clone(&self.state),
            sink,
            shutdown_rx,
        )));
    }

    /// Tear down: close the active connection, cancel a pending reconnect,
    /// and wait for the task to finish. Terminal — `start` may be called
    /// again, but nothing from the old lifecycle fires afterwards.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(()).await;
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }
}

async fn run_loop(
    ws_url: Url,
    reconnect_delay: Duration,
    state: Arc<RwLock<ConnectionState>>,
    sink: MessageSink,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    loop {
        *state.write() = ConnectionState::Connecting;
        tracing::debug!(url = %ws_url, "connecting to push channel");

        let connect = tokio::select! {
            r = tokio_tungstenite::connect_async(ws_url.to_string()) => r,
            _ = shutdown_rx.recv() => break,
        };

        match connect {
            Ok((mut ws, _)) => {
                *state.write() = ConnectionState::Open;
                tracing::info!("push channel open");

                loop {
                    tokio::select! {
                        frame = ws.next() => match frame {
                            Some(Ok(Message::Text(text))) => dispatch_frame(&text, &sink),
                            Some(Ok(Message::Close(_))) | None => {
                                tracing::info!("push channel closed by server");
                                break;
                            }
                            // Binary/ping/pong frames are not part of the contract
                            Some(Ok(_)) => {}
                            Some(Err(e)) => {
                                tracing::warn!(error = %e, "push channel transport error");
                                break;
                            }
                        },
                        _ = shutdown_rx.recv() => {
                            let _ = ws.close(None).await;
                            *state.write() = ConnectionState::Idle;
                            return;
                        }
                    }
                }
                *state.write() = ConnectionState::Closed;
            }
            Err(e) => {
                tracing::warn!(error = %e, "push channel connect failed");
                *state.write() = ConnectionState::Closed;
            }
        }

        // The only place a retry is scheduled, and this task is the only
        // writer of the state — duplicate close events cannot stack timers.
        tokio::select! {
            () = tokio::time::sleep(reconnect_delay) => {}
            _ = shutdown_rx.recv() => break,
        }
    }
    *state.write() = ConnectionState::Idle;
}

/// Parse one text frame and hand it to the sink. Malformed frames are
/// logged and dropped; unrecognized message types are dropped silently.
fn dispatch_frame(text: &str, sink: &MessageSink) {
    match serde_json::from_str::<PushMessage>(text) {
        Ok(PushMessage::Unknown) => {}
        Ok(msg) => sink(msg),
        Err(e) => tracing::warn!(error = %e, "dropping malformed push frame"),
    }
}
