//! # Notifications
//!
//! `Notifier` that logs each notice through `tracing` and queues it for the
//! console.

use metaval_core::{Notice, NoticeBuffer, NoticeLevel, Notifier};

#[derive(Debug, Default)]
pub struct TracingNotifier {
    queued: NoticeBuffer,
}

impl TracingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received since the last call, oldest first.
    pub fn take(&mut self) -> Vec<Notice> {
        self.queued.drain()
    }
}

impl Notifier for TracingNotifier {
    fn notify(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => tracing::warn!(level = notice.level.as_str(), "{}", notice.message),
            NoticeLevel::Success | NoticeLevel::Info => {
                tracing::info!(level = notice.level.as_str(), "{}", notice.message);
            }
        }
        self.queued.notify(notice);
    }
}
