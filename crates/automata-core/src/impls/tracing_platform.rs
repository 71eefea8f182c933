//! TracingPlatform - ダイアログの代わりにログへ出す Platform
//!
//! CLI や端末の無い環境で使う。

use crate::ports::Platform;

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPlatform;

impl TracingPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl Platform for TracingPlatform {
    fn message_box(&self, title: &str, message: &str, error: Option<&anyhow::Error>) {
        match error {
            Some(err) => tracing::error!(title, body = message, error = %err, "message box"),
            None => tracing::warn!(title, body = message, "message box"),
        }
    }

    fn notify(&self, message: &str) {
        tracing::info!(body = message, "notification");
    }
}
