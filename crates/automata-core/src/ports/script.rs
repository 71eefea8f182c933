//! Script port - script mode の本体
//!
//! Battle, Lottery, Summoning などの script mode はこの trait を実装する。

use std::convert::Infallible;

use async_trait::async_trait;

use super::exit_manager::ExitManager;
use crate::domain::ScriptError;

/// Main logic of a script mode.
///
/// 戻り値の `Ok` 側は `Infallible` なので、正常 return はできない。
/// ループの中で `exit.check()?` や `exit.wait(..).await?` を呼び、
/// 停止要求・終了条件・想定外エラーのいずれかで抜ける。
///
/// # 使用例
/// ```ignore
/// struct Lottery;
///
/// #[async_trait]
/// impl Script for Lottery {
///     async fn script(&mut self, exit: &ExitManager) -> Result<Infallible, ScriptError> {
///         loop {
///             exit.check()?;
///             spin()?;
///             exit.wait(Duration::from_millis(500)).await?;
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Script: Send + 'static {
    async fn script(&mut self, exit: &ExitManager) -> Result<Infallible, ScriptError>;
}
