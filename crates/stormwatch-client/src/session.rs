use std::sync::Arc;

use parking_lot::RwLock;

/// Read-only view of the current session, injected wherever a role check
/// happens so the pipeline never reaches into ambient storage.
///
/// Implementations must answer synchronously; the role is looked up fresh
/// per classification decision because login/logout can happen between two
/// push frames.
pub trait SessionProvider: Send + Sync {
    /// Current viewer role, or `None` when nobody is signed in.
    fn current_role(&self) -> Option<String>;
}

/// Fixed-role session for tests and demos.
pub struct StaticSession(Option<String>);

impl StaticSession {
    pub fn new(role: impl Into<String>) -> Self {
        Self(Some(role.into()))
    }

    /// A session with nobody signed in.
    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl SessionProvider for StaticSession {
    fn current_role(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Mutable session handle for host applications: the auth layer writes the
/// role on login/logout, the pipeline only reads it.
#[derive(Clone, Default)]
pub struct SharedSession {
    role: Arc<RwLock<Option<String>>>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_role(&self, role: Option<String>) {
        *self.role.write() = role;
    }
}

impl SessionProvider for SharedSession {
    fn current_role(&self) -> Option<String> {
        self.role.read().clone()
    }
}
