//! Termination - script の終わり方
//!
//! script 本体は正常 return しない。止まるときは必ず次のどれかを返す:
//! - [`ScriptAbort`]: ユーザーが停止を要求した
//! - [`ScriptExit`]: script が定義済みの終了条件に到達した
//! - それ以外の失敗（`anyhow::Error`）
//!
//! runner はこれを [`ScriptOutcome`] に変換して呼び出し側へ渡す。

use std::sync::Arc;

use thiserror::Error;

use super::state::RunState;

/// Returns the message only if it has visible content.
pub fn non_blank(message: Option<&str>) -> Option<&str> {
    message.filter(|m| !m.trim().is_empty())
}

/// User-requested stop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("script aborted by user")]
pub struct ScriptAbort {
    message: Option<String>,
}

impl ScriptAbort {
    pub fn new() -> Self {
        Self { message: None }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Planned stop, e.g. "out of AP" or "run count reached".
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("script exited")]
pub struct ScriptExit {
    message: Option<String>,
}

impl ScriptExit {
    pub fn new() -> Self {
        Self { message: None }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// What a script body yields when it stops.
///
/// `?` で `anyhow::Error` からも変換できるので、script 側は
/// `exit.check()?` と `something().context("...")?` を同じように書ける。
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error(transparent)]
    Abort(#[from] ScriptAbort),

    #[error(transparent)]
    Exit(#[from] ScriptExit),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ScriptError {
    pub fn abort() -> Self {
        ScriptError::Abort(ScriptAbort::new())
    }

    pub fn exit(message: impl Into<String>) -> Self {
        ScriptError::Exit(ScriptExit::with_message(message))
    }

    pub fn unexpected<E>(error: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        ScriptError::Unexpected(error.into())
    }
}

/// Terminal result of one run.
#[derive(Debug, Clone)]
pub enum ScriptOutcome {
    StoppedByUser(ScriptAbort),
    Exited(ScriptExit),
    Failed(Arc<anyhow::Error>),
}

impl ScriptOutcome {
    /// The terminal `RunState` this outcome corresponds to.
    pub fn state(&self) -> RunState {
        match self {
            ScriptOutcome::StoppedByUser(_) => RunState::StoppedByUser,
            ScriptOutcome::Exited(_) => RunState::ExitedNormally,
            ScriptOutcome::Failed(_) => RunState::Failed,
        }
    }

    pub fn is_stopped_by_user(&self) -> bool {
        matches!(self, ScriptOutcome::StoppedByUser(_))
    }

    pub fn is_exited(&self) -> bool {
        matches!(self, ScriptOutcome::Exited(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ScriptOutcome::Failed(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ScriptOutcome::StoppedByUser(abort) => abort.message(),
            ScriptOutcome::Exited(exit) => exit.message(),
            ScriptOutcome::Failed(_) => None,
        }
    }
}

impl From<ScriptError> for ScriptOutcome {
    fn from(error: ScriptError) -> Self {
        match error {
            ScriptError::Abort(abort) => ScriptOutcome::StoppedByUser(abort),
            ScriptError::Exit(exit) => ScriptOutcome::Exited(exit),
            ScriptError::Unexpected(err) => ScriptOutcome::Failed(Arc::new(err)),
        }
    }
}
