//! Kernel ABI constants shared by every husk crate.
//!
//! This crate is the single source of truth for the raw numbers the runtime
//! exchanges with the kernel: call numbers, error codes, flag words, and
//! wait-status encodings. Nothing here performs a call; it only names bits.

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]

pub mod error;
pub mod flags;
pub mod nr;
pub mod wait;

pub use error::Errno;
pub use flags::{AccessMode, OpenFlags};
pub use wait::{WaitOptions, WaitStatus};

/// Process identifier as the kernel reports it.
pub type Pid = i32;

/// Wildcard identifier accepted by the reap operation: any child.
pub const ANY_CHILD: Pid = -1;

/// Conventional standard descriptors, bound by bootstrap.
pub const STDIN_FD: i32 = 0;
pub const STDOUT_FD: i32 = 1;
pub const STDERR_FD: i32 = 2;

/// Sleep interval as the kernel expects it. Field width follows the
/// architecture's `long`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct Timespec {
    pub seconds: isize,
    pub nanos: isize,
}
