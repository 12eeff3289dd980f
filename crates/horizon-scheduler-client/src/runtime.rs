//! Shared tokio runtime backing the blocking transport.

use std::sync::OnceLock;

use tokio::runtime::Runtime;

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Initialize the shared runtime.
///
/// Called implicitly on first use; call it explicitly to control when the
/// worker threads are spawned.
pub fn init() -> &'static Runtime {
    RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime")
    })
}

/// Get a reference to the shared runtime, initializing it if needed.
pub fn get() -> &'static Runtime {
    init()
}

/// Block on a future using the shared runtime.
///
/// # Warning
///
/// Do not call this from within an async context, as it will block the
/// current thread.
pub fn block_on<F: std::future::Future>(future: F) -> F::Output {
    get().block_on(future)
}
