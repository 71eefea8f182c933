//! Impls - Platform の実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - **RecordingPlatform**: 呼び出しを記録する（テスト用）
//! - **TracingPlatform**: `tracing` に出力する（CLI 用）

pub mod recording;
pub mod tracing_platform;

pub use self::recording::{PlatformCall, RecordingPlatform};
pub use self::tracing_platform::TracingPlatform;
