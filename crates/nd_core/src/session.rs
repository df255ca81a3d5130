use std::sync::RwLock;

use crate::types::Session;

/// Session capability every data-fetching handler reads right before
/// issuing a request. Views depend on this trait, never on a concrete
/// identity provider, so tests can substitute their own.
pub trait SessionStore: Send + Sync {
    fn session(&self) -> Option<Session>;

    fn set(&self, session: Session);

    fn clear(&self);

    fn access_token(&self) -> Option<String> {
        self.session().map(|s| s.access_token)
    }

    fn user_id(&self) -> Option<String> {
        self.session().map(|s| s.user.id)
    }
}

/// Process-local session holder.
#[derive(Default)]
pub struct MemorySession {
    inner: RwLock<Option<Session>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySession {
    fn session(&self) -> Option<Session> {
        self.inner.read().ok().and_then(|guard| guard.clone())
    }

    fn set(&self, session: Session) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = Some(session);
        }
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = None;
        }
    }
}
