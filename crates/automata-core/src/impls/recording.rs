//! RecordingPlatform - 呼び出しを記録するだけの Platform
//!
//! テストと headless 実行用。Mutex で保護した Vec に追記する。

use std::sync::{Arc, Mutex, MutexGuard};

use crate::ports::Platform;

/// One recorded platform call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    MessageBox {
        title: String,
        message: String,
        /// `Display` of the attached error, if any.
        error: Option<String>,
    },
    Notify(String),
}

#[derive(Debug, Clone, Default)]
pub struct RecordingPlatform {
    calls: Arc<Mutex<Vec<PlatformCall>>>,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every call so far, in order.
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.lock().clone()
    }

    pub fn message_boxes(&self) -> Vec<PlatformCall> {
        self.lock()
            .iter()
            .filter(|c| matches!(c, PlatformCall::MessageBox { .. }))
            .cloned()
            .collect()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|c| match c {
                PlatformCall::Notify(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PlatformCall>> {
        // 記録だけなので poison されても中身はそのまま使う
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Platform for RecordingPlatform {
    fn message_box(&self, title: &str, message: &str, error: Option<&anyhow::Error>) {
        self.lock().push(PlatformCall::MessageBox {
            title: title.to_string(),
            message: message.to_string(),
            error: error.map(|e| e.to_string()),
        });
    }

    fn notify(&self, message: &str) {
        self.lock().push(PlatformCall::Notify(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_in_order() {
        let platform = RecordingPlatform::new();
        let err = anyhow::anyhow!("boom");

        platform.notify("first");
        platform.message_box("Title", "body", Some(&err));
        platform.notify("second");

        assert_eq!(
            platform.calls(),
            vec![
                PlatformCall::Notify("first".into()),
                PlatformCall::MessageBox {
                    title: "Title".into(),
                    message: "body".into(),
                    error: Some("boom".into()),
                },
                PlatformCall::Notify("second".into()),
            ]
        );
        assert_eq!(platform.message_boxes().len(), 1);
        assert_eq!(platform.notifications(), vec!["first", "second"]);
    }

    #[test]
    fn clones_share_the_log() {
        let platform = RecordingPlatform::new();
        let clone = platform.clone();
        clone.notify("hi");
        assert_eq!(platform.notifications(), vec!["hi"]);
    }
}
