//! automata-core
//!
//! Script mode の実行基盤。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（card_priority, termination, state, ids）
//! - **ports**: 抽象化レイヤー（Script, Platform, ExitManager）
//! - **app**: アプリケーションロジック（builder, entry_point, runner）
//! - **impls**: Platform の実装（RecordingPlatform, TracingPlatform）
//! - **config**: ユーザー向け文言の設定

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{EntryPoint, EntryPointBuilder, EntryPointError, ExitListener, ScriptHandle};
pub use config::{ConfigError, RunnerConfig};
pub use domain::{
    CardPriority, CardPriorityListItem, CardScore, RunId, RunState, ScriptAbort, ScriptError,
    ScriptExit, ScriptOutcome,
};
pub use ports::{ExitManager, Platform, Script};
