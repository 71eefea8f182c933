//! PanicSite - script task 内で起きた panic の発生箇所
//!
//! `JoinError` の payload には発生箇所もバックトレースも入っていない。
//! そこで panic hook を一度だけ差し込み、script task の中で起きた panic に限って
//! location とバックトレースを task-local のスロットに書き込む。
//! それ以外の panic は元の hook にそのまま渡す。

use std::backtrace::{Backtrace, BacktraceStatus};
use std::future::Future;
use std::sync::{Arc, Mutex, Once};

/// Where a script panicked.
#[derive(Debug, Clone)]
pub(crate) struct PanicSite {
    pub(crate) location: Option<String>,
    /// Only present when `RUST_BACKTRACE` / `RUST_LIB_BACKTRACE` enables capture.
    pub(crate) backtrace: Option<String>,
}

pub(crate) type PanicSlot = Arc<Mutex<Option<PanicSite>>>;

tokio::task_local! {
    static PANIC_SLOT: PanicSlot;
}

static INSTALL_HOOK: Once = Once::new();

fn install_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            // script task の外では try_with が失敗するので何もしない
            let _ = PANIC_SLOT.try_with(|slot| {
                let backtrace = Backtrace::capture();
                let site = PanicSite {
                    location: info.location().map(|l| l.to_string()),
                    backtrace: (backtrace.status() == BacktraceStatus::Captured)
                        .then(|| backtrace.to_string()),
                };
                let mut guard = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                guard.get_or_insert(site);
            });
            previous(info);
        }));
    });
}

/// Runs `fut` with panic-site capture enabled; the site is written into `slot`.
pub(crate) async fn capture<F: Future>(slot: PanicSlot, fut: F) -> F::Output {
    install_hook();
    PANIC_SLOT.scope(slot, fut).await
}

pub(crate) fn take(slot: &PanicSlot) -> Option<PanicSite> {
    slot.lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .take()
}
