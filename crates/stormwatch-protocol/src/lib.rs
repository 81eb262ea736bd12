//! Wire types shared between the Stormwatch dashboard client and its backend.
//!
//! Covers the two surfaces the client talks to: the push channel (live
//! `EVENT_UPSERT` frames over WebSocket) and the persisted per-user
//! notification inbox (REST). Also hosts the stateless visibility policy
//! that decides which event updates a given viewer should be alerted to.

pub mod event;
pub mod notification;
pub mod visibility;

pub use event::{EventSummary, PushMessage};
pub use notification::{InboxNotification, UnreadCount};
pub use visibility::{is_high_quality, is_known_type, is_visible};
