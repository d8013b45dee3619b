//! The three standard streams.
//!
//! Bound once by bootstrap before the hosted program's entry point runs.
//! Each slot hands out its guard; a stream handle is exclusively owned by
//! whoever holds the guard, which is the single-flow discipline the
//! design assumes made enforceable.

use spin::{Mutex, MutexGuard};

use husk_abi::{STDERR_FD, STDIN_FD, STDOUT_FD};

use crate::stream::{Direction, Stream};

static STDIN: Mutex<Stream> = Mutex::new(Stream::unbound(Direction::Input));
static STDOUT: Mutex<Stream> = Mutex::new(Stream::unbound(Direction::Output));
static STDERR: Mutex<Stream> = Mutex::new(Stream::unbound(Direction::Output));

/// Bind the conventional descriptors: 0 for input, 1 and 2 for output.
pub fn bind_standard() {
    *STDIN.lock() = Stream::from_fd(STDIN_FD, Direction::Input);
    *STDOUT.lock() = Stream::from_fd(STDOUT_FD, Direction::Output);
    *STDERR.lock() = Stream::from_fd(STDERR_FD, Direction::Output);
}

pub fn stdin() -> MutexGuard<'static, Stream> {
    STDIN.lock()
}

pub fn stdout() -> MutexGuard<'static, Stream> {
    STDOUT.lock()
}

pub fn stderr() -> MutexGuard<'static, Stream> {
    STDERR.lock()
}
