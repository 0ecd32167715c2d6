//! # Runtime
//!
//! The cooperative event loop the page behaviors run on.
//!
//! * [`EventLoop`]: fire-once timers on a virtual clock. Tests move time explicitly with
//!   [`EventLoop::advance`]; apps wait for real with [`EventLoop::run_realtime`].
//! * [`build_runtime`]: the single-threaded [Tokio](https://tokio.rs) runtime apps drive the
//!   loop with. Page scripts never need more than one thread.
//!
//! ## Example
//!
//! ```rust
//! use folio_runtime::EventLoop;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::time::Duration;
//!
//! let event_loop = EventLoop::new();
//! let fired = Arc::new(AtomicBool::new(false));
//! let flag = Arc::clone(&fired);
//! event_loop.set_timeout(Duration::from_millis(500), move || flag.store(true, Ordering::SeqCst));
//!
//! event_loop.advance(Duration::from_millis(499)).unwrap();
//! assert!(!fired.load(Ordering::SeqCst));
//! event_loop.advance(Duration::from_millis(1)).unwrap();
//! assert!(fired.load(Ordering::SeqCst));
//! ```

mod error;
mod event_loop;

pub use error::{RuntimeError, RuntimeErrorExt};
pub use event_loop::{DEFAULT_MAX_STEPS, EventLoop, TimerCallback, TimerId};

use tokio::runtime::{Builder, Runtime};
use tracing::debug;

/// Builds a current-thread Tokio runtime with timers enabled.
///
/// # Errors
/// Returns [`RuntimeError::Build`] if the OS refuses to set up the runtime.
pub fn build_runtime() -> Result<Runtime, RuntimeError> {
    debug!("Building current-thread tokio runtime");
    Builder::new_current_thread()
        .thread_name("folio-main")
        .enable_time()
        .build()
        .context("Failed to initialize runtime")
}
