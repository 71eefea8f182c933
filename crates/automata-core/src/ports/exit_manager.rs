//! ExitManager - 協調的キャンセルのシグナル
//!
//! # 学習ポイント
//! - `tokio::sync::watch` で「一度立ったら戻らないフラグ」を共有する
//! - script 側はポーリング（`check()`）でも待機（`wait()` / `exited()`）でも観測できる
//!
//! 強制終了の仕組みは無い。script が観測して `ScriptAbort` を返すまで走り続ける。

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::domain::{ScriptAbort, ScriptError};

/// Shared cancellation signal.
///
/// Clone すると同じシグナルへのハンドルになる。
#[derive(Debug, Clone)]
pub struct ExitManager {
    tx: Arc<watch::Sender<bool>>,
}

impl ExitManager {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Requests the script to stop. Calling it again has no further effect.
    pub fn exit(&self) {
        // send_replace は receiver が居なくても値を更新する
        self.tx.send_replace(true);
    }

    pub fn is_exit_requested(&self) -> bool {
        *self.tx.borrow()
    }

    /// Fails with the user-abort signal once an exit was requested.
    pub fn check(&self) -> Result<(), ScriptError> {
        if self.is_exit_requested() {
            return Err(ScriptAbort::new().into());
        }
        Ok(())
    }

    /// Sleeps for `duration`, waking early with the user-abort signal on `exit()`.
    pub async fn wait(&self, duration: Duration) -> Result<(), ScriptError> {
        self.check()?;
        tokio::select! {
            _ = self.exited() => Err(ScriptAbort::new().into()),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }

    /// Completes once an exit was requested.
    pub async fn exited(&self) {
        let mut rx = self.tx.subscribe();
        // Sender は self が保持しているので wait_for はエラーにならない
        let _ = rx.wait_for(|requested| *requested).await;
    }
}

impl Default for ExitManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[test]
    fn check_passes_until_exit() {
        let exit = ExitManager::new();
        assert!(exit.check().is_ok());

        exit.exit();
        assert!(exit.is_exit_requested());
        assert!(matches!(exit.check(), Err(ScriptError::Abort(_))));
    }

    #[test]
    fn exit_is_idempotent_and_shared_by_clones() {
        let exit = ExitManager::new();
        let other = exit.clone();

        other.exit();
        other.exit();
        assert!(exit.is_exit_requested());
    }

    #[tokio::test]
    async fn wait_returns_early_on_exit() {
        let exit = ExitManager::new();
        let trigger = exit.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.exit();
        });

        let start = Instant::now();
        let result = exit.wait(Duration::from_secs(10)).await;
        assert!(matches!(result, Err(ScriptError::Abort(_))));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn wait_completes_without_exit() {
        let exit = ExitManager::new();
        assert!(exit.wait(Duration::from_millis(10)).await.is_ok());
    }

    #[tokio::test]
    async fn exited_resolves_if_already_requested() {
        let exit = ExitManager::new();
        exit.exit();
        exit.exited().await;
    }
}
