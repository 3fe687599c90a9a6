//! User-facing notice bus.
//!
//! Transient notifications (transport failures, stream-level errors, info
//! hints) fan out over a broadcast channel. Consumers subscribe
//! independently; emitting with no subscribers is fine.

use tokio::sync::broadcast;

use pagechat_core::defaults::NOTICE_BUS_CAPACITY;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// One transient user-facing notification.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Broadcast bus for notices.
#[derive(Debug, Clone)]
pub struct NoticeBus {
    tx: broadcast::Sender<Notice>,
}

impl NoticeBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(NOTICE_BUS_CAPACITY);
        Self { tx }
    }

    /// Subscribe to notices emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }

    pub fn emit(&self, level: NoticeLevel, message: impl Into<String>) {
        // Send fails only when there are no subscribers; that is not an error.
        let _ = self.tx.send(Notice {
            level,
            message: message.into(),
        });
    }

    pub fn info(&self, message: impl Into<String>) {
        self.emit(NoticeLevel::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.emit(NoticeLevel::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(NoticeLevel::Error, message);
    }
}

impl Default for NoticeBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_notice() {
        let bus = NoticeBus::new();
        let mut rx = bus.subscribe();

        bus.info("hello");

        let notice = rx.recv().await.unwrap();
        assert_eq!(notice.level, NoticeLevel::Info);
        assert_eq!(notice.message, "hello");
    }

    #[test]
    fn test_emit_without_subscribers_is_ok() {
        let bus = NoticeBus::new();
        bus.error("nobody listening");
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let bus = NoticeBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        bus.success("done");

        assert_eq!(a.recv().await.unwrap().message, "done");
        assert_eq!(b.recv().await.unwrap().message, "done");
    }
}
