use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

/// A transient user-facing message, the TUI's equivalent of a toast.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    expires_at: Instant,
}

pub struct Notifier {
    notices: Vec<Notice>,
    ttl: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self {
            notices: Vec::new(),
            ttl: Duration::from_secs(4),
        }
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message);
    }

    fn push(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            message: message.into(),
            expires_at: Instant::now() + self.ttl,
        });
    }

    pub fn prune(&mut self, now: Instant) {
        self.notices.retain(|n| n.expires_at > now);
    }

    pub fn active(&self) -> &[Notice] {
        &self.notices
    }
}
