#![allow(dead_code)]

//! Kernel call numbers, selected at build time by target architecture.
//!
//! Only the calls the runtime actually issues are listed. Adding an entry
//! here requires a matching typed wrapper in `husk-rt`.

#[cfg(target_arch = "x86_64")]
mod table {
    pub const READ: usize = 0;
    pub const WRITE: usize = 1;
    pub const OPEN: usize = 2;
    pub const CLOSE: usize = 3;
    pub const BRK: usize = 12;
    pub const ACCESS: usize = 21;
    pub const NANOSLEEP: usize = 35;
    pub const FORK: usize = 57;
    pub const EXECVE: usize = 59;
    pub const EXIT: usize = 60;
    pub const WAIT4: usize = 61;
    pub const CHDIR: usize = 80;
}

#[cfg(target_arch = "arm")]
mod table {
    pub const READ: usize = 3;
    pub const WRITE: usize = 4;
    pub const OPEN: usize = 5;
    pub const CLOSE: usize = 6;
    pub const BRK: usize = 0x2d;
    pub const ACCESS: usize = 0x21;
    pub const NANOSLEEP: usize = 162;
    pub const FORK: usize = 2;
    pub const EXECVE: usize = 11;
    pub const EXIT: usize = 1;
    pub const WAIT4: usize = 0x72;
    pub const CHDIR: usize = 12;
}

pub use table::*;
