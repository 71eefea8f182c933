//! EntryPoint - script mode のライフサイクル
//!
//! # 状態遷移
//! Idle → Running → {StoppedByUser | ExitedNormally | Failed}
//!
//! - `run()` は script を新しい tokio task で起動してすぐ戻る
//! - `stop()` は ExitManager に停止要求を出すだけ（強制終了はしない）
//! - 1 インスタンスにつき `run()` は 1 回。2 回目は `AlreadyStarted`

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};

use super::builder::EntryPointBuilder;
use super::runner::ScriptRunner;
use crate::domain::{RunId, RunState, ScriptOutcome};
use crate::ports::{ExitManager, Platform, Script};

#[derive(Debug, thiserror::Error)]
pub enum EntryPointError {
    #[error("script {0} was already started; build a new EntryPoint to run again")]
    AlreadyStarted(RunId),

    #[error("run() must be called from within a tokio runtime")]
    NoRuntime,

    #[error("script task did not complete: {0}")]
    Join(#[from] JoinError),
}

pub struct EntryPoint {
    run_id: RunId,
    script: Mutex<Option<Box<dyn Script>>>,
    exit: ExitManager,
    runner: Arc<ScriptRunner>,
    state_tx: Arc<watch::Sender<RunState>>,
}

impl EntryPoint {
    /// Starts building an entry point for `script`.
    pub fn builder<S: Script>(script: S, platform: Arc<dyn Platform>) -> EntryPointBuilder {
        EntryPointBuilder::new(script, platform)
    }

    pub(crate) fn from_parts(
        script: Box<dyn Script>,
        exit: ExitManager,
        runner: ScriptRunner,
    ) -> Self {
        let (state_tx, _rx) = watch::channel(RunState::Idle);
        Self {
            run_id: RunId::generate(),
            script: Mutex::new(Some(script)),
            exit,
            runner: Arc::new(runner),
            state_tx: Arc::new(state_tx),
        }
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn exit_manager(&self) -> &ExitManager {
        &self.exit
    }

    pub fn state(&self) -> RunState {
        *self.state_tx.borrow()
    }

    /// Starts the script on a new task and returns immediately.
    pub fn run(&self) -> Result<ScriptHandle, EntryPointError> {
        let rt = tokio::runtime::Handle::try_current().map_err(|_| EntryPointError::NoRuntime)?;

        let script = self
            .script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
            .ok_or(EntryPointError::AlreadyStarted(self.run_id))?;

        let run_id = self.run_id;
        let exit = self.exit.clone();
        let runner = Arc::clone(&self.runner);
        let state_tx = Arc::clone(&self.state_tx);

        state_tx.send_replace(RunState::Running);
        tracing::info!(%run_id, "script started");

        // task が途中で unwind / cancel されても（未 poll のまま drop されても）
        // 終端状態は必ず公開される
        let mut terminal = TerminalState {
            tx: state_tx,
            state: RunState::Failed,
        };
        let join = rt.spawn(async move {
            let outcome = runner.run(run_id, script, exit).await;
            // 通知が終わってから終端状態を公開する（drop 時）
            terminal.state = outcome.state();
            outcome
        });

        Ok(ScriptHandle {
            run_id,
            exit: self.exit.clone(),
            join,
        })
    }

    /// Asks the script to stop. Safe to call at any time, from any thread.
    pub fn stop(&self) {
        tracing::debug!(run_id = %self.run_id, "stop requested");
        self.exit.exit();
    }

    /// Waits until the run reaches a terminal state.
    ///
    /// まだ `run()` されていない（または `NoRuntime` で失敗した）ときは
    /// 待たずに `Idle` を返す。
    pub async fn wait_terminal(&self) -> RunState {
        let mut rx = self.state_tx.subscribe();
        if *rx.borrow_and_update() == RunState::Idle {
            return RunState::Idle;
        }
        match rx.wait_for(|s| s.is_terminal()).await {
            Ok(state) => *state,
            Err(_) => self.state(),
        }
    }
}

/// Publishes `state` when dropped.
struct TerminalState {
    tx: Arc<watch::Sender<RunState>>,
    state: RunState,
}

impl Drop for TerminalState {
    fn drop(&mut self) {
        self.tx.send_replace(self.state);
    }
}

/// Handle to a started run.
#[derive(Debug)]
pub struct ScriptHandle {
    run_id: RunId,
    exit: ExitManager,
    join: JoinHandle<ScriptOutcome>,
}

impl ScriptHandle {
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Same as `EntryPoint::stop`.
    pub fn stop(&self) {
        self.exit.exit();
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Waits for the terminal outcome.
    pub async fn join(self) -> Result<ScriptOutcome, EntryPointError> {
        Ok(self.join.await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScriptError;
    use crate::impls::RecordingPlatform;
    use async_trait::async_trait;
    use std::convert::Infallible;
    use std::time::Duration;

    struct WaitForStop;

    #[async_trait]
    impl Script for WaitForStop {
        async fn script(&mut self, exit: &ExitManager) -> Result<Infallible, ScriptError> {
            loop {
                exit.wait(Duration::from_millis(10)).await?;
            }
        }
    }

    fn entry_point() -> (EntryPoint, RecordingPlatform) {
        let platform = RecordingPlatform::new();
        let entry = EntryPoint::builder(WaitForStop, Arc::new(platform.clone())).build();
        (entry, platform)
    }

    #[tokio::test]
    async fn state_moves_from_idle_to_stopped() {
        let (entry, _platform) = entry_point();
        assert_eq!(entry.state(), RunState::Idle);

        let handle = entry.run().unwrap();
        assert_eq!(entry.state(), RunState::Running);

        entry.stop();
        assert_eq!(entry.wait_terminal().await, RunState::StoppedByUser);
        assert!(handle.join().await.unwrap().is_stopped_by_user());
    }

    #[tokio::test]
    async fn second_run_is_rejected() {
        let (entry, _platform) = entry_point();
        let handle = entry.run().unwrap();

        let err = entry.run().unwrap_err();
        assert!(matches!(err, EntryPointError::AlreadyStarted(id) if id == entry.run_id()));

        handle.stop();
        handle.join().await.unwrap();
    }

    #[test]
    fn run_outside_runtime_is_an_error() {
        let (entry, _platform) = entry_point();
        assert!(matches!(entry.run(), Err(EntryPointError::NoRuntime)));
        // script は消費されていない
        assert_eq!(entry.state(), RunState::Idle);
    }

    #[tokio::test]
    async fn wait_terminal_before_run_returns_idle() {
        let (entry, _platform) = entry_point();
        let state = tokio::time::timeout(Duration::from_secs(1), entry.wait_terminal())
            .await
            .expect("wait_terminal should not block when idle");
        assert_eq!(state, RunState::Idle);
    }

    #[tokio::test]
    async fn terminal_state_is_published_when_run_task_is_aborted() {
        let (entry, _platform) = entry_point();
        let handle = entry.run().unwrap();
        handle.join.abort();

        let state = tokio::time::timeout(Duration::from_secs(5), entry.wait_terminal())
            .await
            .expect("terminal state should be published");
        assert_eq!(state, RunState::Failed);
    }

    #[tokio::test]
    async fn stop_before_run_aborts_on_first_check() {
        let (entry, platform) = entry_point();
        entry.stop();

        let outcome = entry.run().unwrap().join().await.unwrap();
        assert!(outcome.is_stopped_by_user());
        assert_eq!(platform.notifications().len(), 1);
    }

    #[tokio::test]
    async fn stop_after_termination_is_harmless() {
        let (entry, _platform) = entry_point();
        let handle = entry.run().unwrap();
        entry.stop();
        handle.join().await.unwrap();

        entry.stop();
        assert_eq!(entry.state(), RunState::StoppedByUser);
    }
}
