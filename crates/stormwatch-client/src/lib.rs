//! Real-time event notification pipeline for the Stormwatch dashboard.
//!
//! Two independent notification surfaces share only the session:
//!
//! - the **live feed**: a [`ConnectionManager`] keeps one push-channel
//!   connection alive (reconnecting forever on failure), the classifier
//!   filters incoming event updates by the viewer's role and the event's
//!   quality, and accepted updates land in a bounded, deduplicated,
//!   self-expiring [`ToastQueue`];
//! - the **inbox**: an [`InboxService`] fetches the server-persisted
//!   notification list on demand, probes the unread count in the
//!   background while the inbox view is closed, and applies read-state
//!   mutations optimistically.
//!
//! Nothing in this crate surfaces a transport or fetch failure to the
//! host UI; degraded connectivity only shows up as delayed or absent
//! notifications.

pub mod classifier;
pub mod config;
pub mod connection;
pub mod error;
pub mod feed;
pub mod inbox;
pub mod session;
pub mod toasts;

pub use classifier::{classify, ToastCandidate};
pub use config::ClientConfig;
pub use connection::{ConnectionManager, ConnectionState, MessageSink};
pub use error::ClientError;
pub use feed::EventFeed;
pub use inbox::{InboxService, InboxSnapshot};
pub use session::{SessionProvider, SharedSession, StaticSession};
pub use toasts::{ToastAlert, ToastQueue};
