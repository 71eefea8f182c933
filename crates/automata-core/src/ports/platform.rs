//! Platform port - ホスト側の通知手段
//!
//! 実機ではダイアログとシステム通知。ここでは trait だけを定義し、
//! 実装は `impls` に置く。

/// Host collaborator that surfaces script terminations to the user.
///
/// どちらも fire-and-forget。戻り値は無い。
pub trait Platform: Send + Sync {
    /// Shows a blocking-style message box. `error` is attached for the unexpected-error path.
    fn message_box(&self, title: &str, message: &str, error: Option<&anyhow::Error>);

    /// Posts a short notification.
    fn notify(&self, message: &str);
}
