//! Shared Runtime
//!
//! The crawl itself is strictly sequential; async I/O (the HTTP driver) is
//! driven to completion on one lazily built runtime.

use once_cell::sync::Lazy;
use tokio::runtime::{Builder, Runtime};

static RUNTIME: Lazy<Runtime> = Lazy::new(|| {
    Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("failed to build global runtime")
});

/// Block the calling thread on `future`.
///
/// Must not be called from inside an async context.
pub fn block_on<F>(future: F) -> F::Output
where
    F: std::future::Future,
{
    RUNTIME.block_on(future)
}
