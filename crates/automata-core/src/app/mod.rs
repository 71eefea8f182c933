//! App - アプリケーション層
//!
//! # 主要コンポーネント
//! - **EntryPointBuilder**: EntryPoint の構築とワイヤリング
//! - **EntryPoint**: run / stop と状態管理
//! - **ScriptRunner**: script の終わり方を Platform と listener へ振り分ける失敗境界

pub mod builder;
pub mod entry_point;
mod panic_site;
pub mod runner;

pub use self::builder::EntryPointBuilder;
pub use self::entry_point::{EntryPoint, EntryPointError, ScriptHandle};
pub use self::runner::ExitListener;
