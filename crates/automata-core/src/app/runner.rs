//! ScriptRunner - script 本体を包む失敗境界
//!
//! # フロー
//! 1. script を内側の task で実行（panic も JoinError として受け取る）
//! 2. 結果を `ScriptOutcome` に変換
//! 3. 終わり方に応じて Platform / exit listener に通知
//!
//! ここから先へはエラーを一切伝播させない。リトライもしない。
//! listener と Platform の呼び出しも 1 回ずつ `catch_unwind` で包み、
//! どちらかが panic しても残りの通知と終端状態の公開は続ける。

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tokio::task::JoinError;

use crate::config::Messages;
use crate::domain::{RunId, ScriptOutcome, non_blank};
use crate::ports::{ExitManager, Platform, Script};

use super::panic_site::{self, PanicSite, PanicSlot};

/// Callback invoked once per run for defined exits and unexpected failures.
///
/// user abort では呼ばれない。
pub type ExitListener = Arc<dyn Fn(&ScriptOutcome) + Send + Sync>;

pub(crate) struct ScriptRunner {
    pub(crate) platform: Arc<dyn Platform>,
    pub(crate) listener: Option<ExitListener>,
    pub(crate) messages: Messages,
}

impl ScriptRunner {
    pub(crate) async fn run(
        &self,
        run_id: RunId,
        mut script: Box<dyn Script>,
        exit: ExitManager,
    ) -> ScriptOutcome {
        let slot = PanicSlot::default();
        let body = tokio::spawn(panic_site::capture(Arc::clone(&slot), async move {
            script.script(&exit).await
        }));

        let outcome = match body.await {
            Ok(Err(err)) => ScriptOutcome::from(err),
            Ok(Ok(never)) => match never {},
            Err(join_err) => {
                let site = panic_site::take(&slot);
                ScriptOutcome::Failed(Arc::new(join_error_to_anyhow(join_err, site)))
            }
        };

        self.report(run_id, &outcome);
        outcome
    }

    /// Converts one terminal outcome into platform calls and the listener call.
    pub(crate) fn report(&self, run_id: RunId, outcome: &ScriptOutcome) {
        let m = &self.messages;
        match outcome {
            ScriptOutcome::StoppedByUser(abort) => {
                tracing::info!(%run_id, "script stopped by user");

                if let Some(message) = non_blank(abort.message()) {
                    self.guarded(run_id, "message_box", || {
                        self.platform.message_box(&m.exit_title, message, None)
                    });
                }
                self.guarded(run_id, "notify", || self.platform.notify(&m.stopped_by_user));
            }
            ScriptOutcome::Exited(exit) => {
                tracing::info!(%run_id, reason = ?exit.message(), "script exited");

                self.invoke_listener(run_id, outcome);

                // メッセージがあるときだけ表示する
                if let Some(message) = non_blank(exit.message()) {
                    self.guarded(run_id, "message_box", || {
                        self.platform.message_box(&m.exit_title, message, None)
                    });
                    self.guarded(run_id, "notify", || self.platform.notify(&m.exited));
                }
            }
            ScriptOutcome::Failed(err) => {
                // {:?} はエラーチェーンと、取得できていればバックトレースを含む
                let detail = format!("{err:?}");
                tracing::error!(
                    %run_id,
                    error = %err,
                    chain = %detail,
                    backtrace = %err.backtrace(),
                    "script failed unexpectedly"
                );

                self.invoke_listener(run_id, outcome);

                self.guarded(run_id, "message_box", || {
                    self.platform
                        .message_box(&m.unexpected_error, &detail, Some(&**err))
                });
                self.guarded(run_id, "notify", || self.platform.notify(&m.unexpected_error));
            }
        }
    }

    fn invoke_listener(&self, run_id: RunId, outcome: &ScriptOutcome) {
        if let Some(listener) = &self.listener {
            self.guarded(run_id, "exit listener", || listener(outcome));
        }
    }

    /// Runs one collaborator call, logging instead of unwinding if it panics.
    fn guarded(&self, run_id: RunId, what: &'static str, call: impl FnOnce()) {
        if let Err(payload) = catch_unwind(AssertUnwindSafe(call)) {
            tracing::error!(
                %run_id,
                callee = what,
                panic = panic_message(payload.as_ref()),
                "collaborator panicked while reporting termination"
            );
        }
    }
}

fn join_error_to_anyhow(err: JoinError, site: Option<PanicSite>) -> anyhow::Error {
    match err.try_into_panic() {
        Ok(payload) => {
            let message = panic_message(payload.as_ref());
            let Some(site) = site else {
                return anyhow::anyhow!("script panicked: {message}");
            };
            let headline = match &site.location {
                Some(location) => format!("script panicked at {location}: {message}"),
                None => format!("script panicked: {message}"),
            };
            // バックトレースは cause 側に置き、Display は 1 行のままにする
            match site.backtrace {
                Some(backtrace) => anyhow::anyhow!("panic backtrace:\n{backtrace}").context(headline),
                None => anyhow::anyhow!(headline),
            }
        }
        Err(err) => anyhow::anyhow!("script task was cancelled: {err}"),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}
