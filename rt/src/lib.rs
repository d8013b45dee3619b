//! Runtime core: the syscall gateway and the services built directly on it.
//!
//! Layering, bottom up: `syscall` turns raw kernel entry points into typed
//! operations that report failures both as returned `Errno` values and
//! through the process-wide last-error cell in `errno`; `env` views the
//! environment block captured at bootstrap; `process` provides
//! spawn / replace-image / reap; `rtlog` is the diagnostics channel and
//! deliberately bypasses both the buffered streams and the error cell.

#![cfg_attr(not(test), no_std)]
#![allow(unsafe_op_in_unsafe_fn)]

pub mod env;
pub mod errno;
pub mod process;
pub mod rtlog;
pub mod syscall;

pub use errno::{last_error, last_error_raw};
pub use process::{Spawned, reap, replace_image, resolve_in_path, spawn};
pub use rtlog::Level;
pub use syscall::exit;
