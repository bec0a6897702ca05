use serde::Serialize;
use tracing::{info, warn};

use crate::error::SessionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A short user-facing message, e.g. a toast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Notices waiting for the host to display them. Everything pushed here is
/// also logged.
#[derive(Debug, Default)]
pub(crate) struct NoticeQueue {
    pending: Vec<Notice>,
}

impl NoticeQueue {
    pub fn success(&mut self, message: &str) {
        info!(notice = message);
        self.pending.push(Notice::success(message));
    }

    pub fn failure(&mut self, err: &SessionError) {
        let notice = err.notice();
        warn!(error = %err, notice = %notice.message, "recovered session error");
        self.pending.push(notice);
    }

    pub fn take(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_drains_in_order() {
        let mut queue = NoticeQueue::default();
        queue.success("Adjustments reset");
        queue.failure(&SessionError::NoImage);
        let notices = queue.take();
        assert_eq!(
            notices,
            vec![
                Notice::success("Adjustments reset"),
                Notice::error("No image to download"),
            ]
        );
        assert!(queue.take().is_empty());
    }

    #[test]
    fn serializes_for_the_ui() {
        let json = serde_json::to_string(&Notice::error("boom")).unwrap();
        assert_eq!(json, r#"{"level":"error","message":"boom"}"#);
    }
}
