//! Runtime management for async operations.
//!
//! Hosts that already run inside tokio keep using their own runtime; hosts
//! that don't (a plain GUI event loop, say) get a small process-wide runtime
//! created on first use.

use std::sync::OnceLock;

use tokio::runtime::{Handle, Runtime};
use tokio::task::JoinHandle;

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Initialize the global async runtime.
///
/// If not called explicitly, the runtime is created on first use.
pub fn init() -> &'static Runtime {
    RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("horizon-lookup-io")
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime")
    })
}

/// Get a reference to the global async runtime.
pub fn get() -> &'static Runtime {
    init()
}

/// Block on a future using the global runtime.
///
/// # Warning
///
/// Do not call this from within an async context or the GUI event loop,
/// as it will block the current thread.
pub fn block_on<F: std::future::Future>(future: F) -> F::Output {
    get().block_on(future)
}

/// Spawn a future on the global runtime.
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: std::future::Future + Send + 'static,
    F::Output: Send + 'static,
{
    get().spawn(future)
}

/// Spawn a future on the runtime the caller is running in, falling back to
/// the global runtime outside of tokio.
pub fn spawn_detached<F>(future: F) -> JoinHandle<F::Output>
where
    F: std::future::Future + Send + 'static,
    F::Output: Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) => handle.spawn(future),
        Err(_) => spawn(future),
    }
}
