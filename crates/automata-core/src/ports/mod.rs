//! Ports - 外部とのインターフェース
//!
//! script 本体・ホストプラットフォーム・キャンセルシグナルの 3 つ。

pub mod exit_manager;
pub mod platform;
pub mod script;

pub use self::exit_manager::ExitManager;
pub use self::platform::Platform;
pub use self::script::Script;
