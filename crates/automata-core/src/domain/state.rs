//! RunState - EntryPoint の状態
//!
//! # 状態遷移
//! - Idle → Running（`run()`）
//! - Running → StoppedByUser | ExitedNormally | Failed（終端）
//!
//! `stop()` は状態を直接変えない。script が exit 要求を観測して abort したときに
//! StoppedByUser へ遷移する。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Idle,
    Running,
    StoppedByUser,
    ExitedNormally,
    Failed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::StoppedByUser | RunState::ExitedNormally | RunState::Failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::idle(RunState::Idle, false)]
    #[case::running(RunState::Running, false)]
    #[case::stopped(RunState::StoppedByUser, true)]
    #[case::exited(RunState::ExitedNormally, true)]
    #[case::failed(RunState::Failed, true)]
    fn terminal_states(#[case] state: RunState, #[case] terminal: bool) {
        assert_eq!(state.is_terminal(), terminal);
    }

    #[test]
    fn default_is_idle() {
        assert_eq!(RunState::default(), RunState::Idle);
    }
}
