//! EntryPointBuilder - EntryPoint の構築とワイヤリング
//!
//! exit listener はここで一度だけ渡す。実行中に差し替える口は無い。

use std::sync::Arc;

use super::entry_point::EntryPoint;
use super::runner::{ExitListener, ScriptRunner};
use crate::config::RunnerConfig;
use crate::domain::ScriptOutcome;
use crate::ports::{ExitManager, Platform, Script};

/// # 使用例
/// ```ignore
/// let entry = EntryPoint::builder(Battle::new(), platform)
///     .on_exit(|outcome| println!("finished: {outcome:?}"))
///     .config(config)
///     .build();
/// let handle = entry.run()?;
/// ```
pub struct EntryPointBuilder {
    script: Box<dyn Script>,
    platform: Arc<dyn Platform>,
    exit: Option<ExitManager>,
    listener: Option<ExitListener>,
    config: RunnerConfig,
}

impl EntryPointBuilder {
    pub fn new<S: Script>(script: S, platform: Arc<dyn Platform>) -> Self {
        Self {
            script: Box::new(script),
            platform,
            exit: None,
            listener: None,
            config: RunnerConfig::default(),
        }
    }

    /// Shares an existing exit signal instead of creating a fresh one.
    pub fn exit_manager(mut self, exit: ExitManager) -> Self {
        self.exit = Some(exit);
        self
    }

    /// Sets the listener called for defined exits and unexpected failures.
    pub fn on_exit<F>(mut self, listener: F) -> Self
    where
        F: Fn(&ScriptOutcome) + Send + Sync + 'static,
    {
        self.listener = Some(Arc::new(listener));
        self
    }

    pub fn config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> EntryPoint {
        let runner = ScriptRunner {
            platform: self.platform,
            listener: self.listener,
            messages: self.config.messages,
        };
        EntryPoint::from_parts(self.script, self.exit.unwrap_or_default(), runner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RunState, ScriptError};
    use crate::impls::RecordingPlatform;
    use async_trait::async_trait;
    use std::convert::Infallible;

    struct ExitImmediately;

    #[async_trait]
    impl Script for ExitImmediately {
        async fn script(&mut self, _exit: &ExitManager) -> Result<Infallible, ScriptError> {
            Err(ScriptError::exit("Done"))
        }
    }

    #[test]
    fn shared_exit_manager_is_used() {
        let exit = ExitManager::new();
        let entry = EntryPoint::builder(ExitImmediately, Arc::new(RecordingPlatform::new()))
            .exit_manager(exit.clone())
            .build();

        exit.exit();
        assert!(entry.exit_manager().is_exit_requested());
        assert_eq!(entry.state(), RunState::Idle);
    }

    #[tokio::test]
    async fn custom_messages_reach_the_platform() {
        let platform = RecordingPlatform::new();
        let config = RunnerConfig::from_toml_str(
            r#"
            [messages]
            exited = "Finished"
            "#,
        )
        .unwrap();

        let entry = EntryPoint::builder(ExitImmediately, Arc::new(platform.clone()))
            .config(config)
            .build();
        entry.run().unwrap().join().await.unwrap();

        assert_eq!(platform.notifications(), vec!["Finished"]);
    }
}
