//! Process-wide last-error cell.
//!
//! Every gateway wrapper writes this cell: cleared on success, set to the
//! translated code on failure, so it always reflects exactly the most
//! recently completed fallible call. Control flow never reads it; callers
//! branch on the returned `Result` and use this cell only for reporting.

use core::sync::atomic::{AtomicI32, Ordering};

use husk_abi::Errno;

static LAST_ERROR: AtomicI32 = AtomicI32::new(0);

#[inline]
pub(crate) fn record_failure(err: Errno) {
    LAST_ERROR.store(err.raw(), Ordering::Relaxed);
}

#[inline]
pub(crate) fn record_success() {
    LAST_ERROR.store(0, Ordering::Relaxed);
}

/// Outcome code of the most recent fallible gateway call, `None` after a
/// success.
pub fn last_error() -> Option<Errno> {
    match LAST_ERROR.load(Ordering::Relaxed) {
        0 => None,
        code => Some(Errno::from_raw(code)),
    }
}

/// Raw cell value; zero after a success.
pub fn last_error_raw() -> i32 {
    LAST_ERROR.load(Ordering::Relaxed)
}

/// The cell and the child table are process-wide; tests that issue
/// gateway calls serialize on this so their observations stay coherent
/// under the threaded test harness.
#[cfg(test)]
pub(crate) static TEST_SERIAL: std::sync::Mutex<()> = std::sync::Mutex::new(());
