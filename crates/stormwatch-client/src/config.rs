use std::time::Duration;

use url::Url;

/// Delay before retrying a failed or dropped push-channel connection.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// How long a toast stays on screen before expiring on its own.
pub const TOAST_TTL: Duration = Duration::from_secs(8);

/// Maximum number of toasts on screen at once; the oldest is evicted first.
pub const TOAST_CAPACITY: usize = 3;

/// Interval between unread-count probes while the inbox view is closed.
pub const UNREAD_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Client configuration.
///
/// The push-channel endpoint is always derived from `api_base` (see
/// [`ws_url`]), never configured separately, so the live feed and the REST
/// client cannot point at different backends. The timing knobs exist for
/// tests; production uses the module constants.
///
/// [`ws_url`]: ClientConfig::ws_url
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// HTTP base of the dashboard API, e.g. `https://api.stormwatch.example`.
    pub api_base: Url,
    pub reconnect_delay: Duration,
    pub toast_ttl: Duration,
    pub toast_capacity: usize,
    pub unread_poll_interval: Duration,
}

impl ClientConfig {
    pub fn new(api_base: Url) -> Self {
        Self {
            api_base,
            reconnect_delay: RECONNECT_DELAY,
            toast_ttl: TOAST_TTL,
            toast_capacity: TOAST_CAPACITY,
            unread_poll_interval: UNREAD_POLL_INTERVAL,
        }
    }

    /// Push-channel endpoint: the API base with its scheme swapped for the
    /// WebSocket equivalent and the path set to `/ws`.
    pub fn ws_url(&self) -> Url {
        let mut url = self.api_base.clone();
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        // set_scheme only rejects changes across the special/non-special
        // scheme boundary; http(s) -> ws(s) stays within it.
        let _ = url.set_scheme(scheme);
        url.set_path("/ws");
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_url_from_http() {
        let config = ClientConfig::new(Url::parse("http://localhost:8000").unwrap());
        assert_eq!(config.ws_url().as_str(), "ws://localhost:8000/ws");
    }

    #[test]
    fn test_ws_url_from_https() {
        let config = ClientConfig::new(Url::parse("https://api.stormwatch.example").unwrap());
        assert_eq!(config.ws_url().as_str(), "wss://api.stormwatch.example/ws");
    }

    #[test]
    fn test_ws_url_replaces_base_path() {
        let config = ClientConfig::new(Url::parse("http://localhost:8000/api").unwrap());
        assert_eq!(config.ws_url().as_str(), "ws://localhost:8000/ws");
    }
}
