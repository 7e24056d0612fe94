//! Process-wide registry of pending cleanup callbacks
//!
//! Sessions register their teardown here when they are created. The
//! registry is drained by the interrupt handler, by [`ExitGuard`] when
//! `main` returns, and entries are removed again when a session cleans up
//! on its own.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{LazyLock, Mutex, MutexGuard, Once, PoisonError};
use tracing::{debug, warn};

/// Exit status used after an interrupt, matching shells' 128 + SIGINT
pub const INTERRUPT_EXIT_CODE: i32 = 130;

type Callback = Box<dyn FnOnce() + Send>;

static PENDING: LazyLock<Mutex<Vec<(HookId, Callback)>>> = LazyLock::new(|| Mutex::new(Vec::new()));
static NEXT_ID: AtomicU64 = AtomicU64::new(1);
static HANDLER: Once = Once::new();

/// Handle identifying one registered callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

fn pending() -> MutexGuard<'static, Vec<(HookId, Callback)>> {
    // A panicking callback must not disable teardown for everyone else
    PENDING.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Register a callback to run on interrupt or at exit
///
/// Registration never replaces earlier entries.
#[inline]
pub fn register<F>(callback: F) -> HookId
where
    F: FnOnce() + Send + 'static,
{
    let id = HookId(NEXT_ID.fetch_add(1, Ordering::Relaxed));
    pending().push((id, Box::new(callback)));
    debug!("Registered cleanup hook {}", id.0);
    id
}

/// Remove a callback without running it
///
/// Returns `false` if the callback already ran or was never registered.
#[inline]
pub fn unregister(id: HookId) -> bool {
    let mut hooks = pending();
    let before = hooks.len();
    hooks.retain(|(hook_id, _)| *hook_id != id);
    before != hooks.len()
}

/// Number of callbacks still waiting to run
#[must_use]
#[inline]
pub fn pending_count() -> usize {
    pending().len()
}

/// Drain the registry and run every pending callback in registration order
///
/// Returns the number of callbacks run. The lock is released before any
/// callback runs, so callbacks may register or unregister freely.
#[inline]
pub fn run_pending() -> usize {
    let hooks = core::mem::take(&mut *pending());
    let count = hooks.len();
    for (id, callback) in hooks {
        debug!("Running cleanup hook {}", id.0);
        callback();
    }
    count
}

/// Install the process-wide Ctrl-C / termination handler
///
/// Only the first call does anything. If another component already owns the
/// handler, a warning is logged and that component is expected to call
/// [`run_pending`] from its own handler.
#[inline]
pub fn install_interrupt_handler() {
    HANDLER.call_once(|| {
        let installed = ctrlc::set_handler(|| {
            // A git child still writing into a work dir is not waited for; any
            // files it adds after removal stay behind.
            let count = run_pending();
            debug!("Interrupted, ran {count} cleanup hooks");
            std::process::exit(INTERRUPT_EXIT_CODE);
        });

        match installed {
            Ok(()) => debug!("Interrupt handler installed"),
            Err(err) => warn!(
                "Could not install interrupt handler ({err}); temporary directories will only be removed on normal exit"
            ),
        }
    });
}

/// Runs every pending cleanup when dropped
///
/// Hold one in `main` so that sessions still alive when the program
/// finishes are removed before the process exits.
#[derive(Debug, Default)]
#[must_use = "the guard runs pending cleanups when it is dropped"]
pub struct ExitGuard {
    _private: (),
}

impl ExitGuard {
    #[inline]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        let count = run_pending();
        if count > 0 {
            debug!("Exit guard ran {count} cleanup hooks");
        }
    }
}
