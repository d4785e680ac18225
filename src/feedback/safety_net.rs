//! Process-wide cursor restoration.
//!
//! Every spinner registers itself here when it is constructed. If the process
//! ends while a spinner still has the cursor hidden (Ctrl+C, a panic, or an
//! early return out of `main`), [`restore_all`] walks the registry and forces
//! each instance to stop animating, clear its line and show the cursor again.
//!
//! State lifecycle:
//!
//! - **Init**: the registry starts empty and is created lazily on first use.
//! - **Normal operation**: instances are appended as they are created. Entries
//!   are held weakly; dead ones are pruned on the next registration and
//!   skipped by [`restore_all`].
//! - **Teardown**: [`restore_all`] is idempotent and best-effort. An error from
//!   one instance never prevents the others from being restored.
//!
//! The hooks that call [`restore_all`] are installed once by the binary via
//! [`install_hooks`]. Library users that never call it still get a clean
//! terminal as long as their spinners are stopped or dropped.

use std::io;
use std::sync::{Arc, Mutex, Once, OnceLock, PoisonError, Weak};

/// Exit code used when the process is interrupted with Ctrl+C.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Something that owns a hidden-cursor request and can revert it.
pub trait CursorRestore: Send + Sync {
    /// Leave the terminal clean if this instance hid the cursor.
    ///
    /// A running spinner stops drawing, blanks its line and shows the cursor.
    fn restore_cursor(&self) -> io::Result<()>;
}

type Registry = Mutex<Vec<Weak<dyn CursorRestore>>>;

static REGISTRY: OnceLock<Registry> = OnceLock::new();
static HOOKS: Once = Once::new();

fn registry() -> &'static Registry {
    REGISTRY.get_or_init(|| Mutex::new(Vec::new()))
}

/// Add an instance to the registry, dropping entries whose owner is gone.
pub fn register(instance: Weak<dyn CursorRestore>) {
    let mut entries = registry().lock().unwrap_or_else(PoisonError::into_inner);
    entries.retain(|entry| entry.strong_count() > 0);
    entries.push(instance);
}

/// Number of registered instances that are still alive.
pub fn live_instances() -> usize {
    registry()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .filter(|entry| entry.strong_count() > 0)
        .count()
}

/// Force every live instance to clear its line and show the cursor.
///
/// Returns how many instances were visited. Errors are logged and discarded.
pub fn restore_all() -> usize {
    // Upgrade under the lock, restore outside it.
    let live = upgrade_live(&registry().lock().unwrap_or_else(PoisonError::into_inner));
    restore_each(&live)
}

fn upgrade_live(entries: &[Weak<dyn CursorRestore>]) -> Vec<Arc<dyn CursorRestore>> {
    entries.iter().filter_map(Weak::upgrade).collect()
}

fn restore_each(instances: &[Arc<dyn CursorRestore>]) -> usize {
    for instance in instances {
        if let Err(e) = instance.restore_cursor() {
            log::debug!("failed to restore cursor: {e}");
        }
    }
    instances.len()
}

/// Install the Ctrl+C handler and panic hook that restore the cursor.
///
/// Safe to call more than once; the hooks are only installed the first time.
/// The returned guard restores every instance when dropped, so holding it for
/// the lifetime of `main` covers early returns as well.
pub fn install_hooks() -> ExitGuard {
    HOOKS.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_all();
            previous(info);
        }));

        let handler_result = ctrlc::set_handler(|| {
            restore_all();
            std::process::exit(INTERRUPTED_EXIT_CODE);
        });
        if let Err(e) = handler_result {
            // Non-fatal: the exit guard and panic hook still apply
            log::warn!("could not set up Ctrl+C handler: {e}");
        }
    });

    ExitGuard { _private: () }
}

/// Restores every registered cursor when dropped.
///
/// # Example
///
/// ```ignore
/// fn main() {
///     let _restore = safety_net::install_hooks();
///     // ... spinners may be running when we return ...
/// }
/// ```
#[must_use = "the cursor is restored when the guard is dropped"]
pub struct ExitGuard {
    _private: (),
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        restore_all();
    }
}
