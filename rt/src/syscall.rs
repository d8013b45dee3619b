//! Typed gateway over the raw kernel entry points.
//!
//! Each wrapper takes the same arguments as the kernel operation. A
//! negative raw return is translated: the last-error cell receives the
//! absolute code and the caller gets `Err(Errno)`; on success the cell is
//! cleared and the raw result is returned. No wrapper retries — whether an
//! interrupted call is worth reissuing is the caller's decision.

use core::convert::Infallible;
use core::ffi::{CStr, c_char};
use core::hint::spin_loop;

use husk_abi::{AccessMode, Errno, OpenFlags, Pid, Timespec, WaitOptions, WaitStatus, nr};

use crate::errno;

#[cfg(target_arch = "x86_64")]
mod arch {
    use core::arch::asm;

    #[inline(always)]
    pub(super) unsafe fn syscall0(num: usize) -> isize {
        let ret: isize;
        asm!(
            "syscall",
            in("rax") num,
            lateout("rax") ret,
            out("rcx") _,
            out("r11") _,
            options(nostack),
        );
        ret
    }

    #[inline(always)]
    pub(super) unsafe fn syscall1(num: usize, a0: usize) -> isize {
        let ret: isize;
        asm!(
            "syscall",
            in("rax") num,
            in("rdi") a0,
            lateout("rax") ret,
            out("rcx") _,
            out("r11") _,
            options(nostack),
        );
        ret
    }

    #[inline(always)]
    pub(super) unsafe fn syscall2(num: usize, a0: usize, a1: usize) -> isize {
        let ret: isize;
        asm!(
            "syscall",
            in("rax") num,
            in("rdi") a0,
            in("rsi") a1,
            lateout("rax") ret,
            out("rcx") _,
            out("r11") _,
            options(nostack),
        );
        ret
    }

    #[inline(always)]
    pub(super) unsafe fn syscall3(num: usize, a0: usize, a1: usize, a2: usize) -> isize {
        let ret: isize;
        asm!(
            "syscall",
            in("rax") num,
            in("rdi") a0,
            in("rsi") a1,
            in("rdx") a2,
            lateout("rax") ret,
            out("rcx") _,
            out("r11") _,
            options(nostack),
        );
        ret
    }

    #[inline(always)]
    pub(super) unsafe fn syscall4(num: usize, a0: usize, a1: usize, a2: usize, a3: usize) -> isize {
        let ret: isize;
        asm!(
            "syscall",
            in("rax") num,
            in("rdi") a0,
            in("rsi") a1,
            in("rdx") a2,
            in("r10") a3,
            lateout("rax") ret,
            out("rcx") _,
            out("r11") _,
            options(nostack),
        );
        ret
    }
}

#[cfg(target_arch = "arm")]
mod arch {
    use core::arch::asm;

    #[inline(always)]
    pub(super) unsafe fn syscall0(num: usize) -> isize {
        let ret: isize;
        asm!(
            "svc 0",
            in("r7") num,
            lateout("r0") ret,
            options(nostack),
        );
        ret
    }

    #[inline(always)]
    pub(super) unsafe fn syscall1(num: usize, a0: usize) -> isize {
        let ret: isize;
        asm!(
            "svc 0",
            in("r7") num,
            inlateout("r0") a0 => ret,
            options(nostack),
        );
        ret
    }

    #[inline(always)]
    pub(super) unsafe fn syscall2(num: usize, a0: usize, a1: usize) -> isize {
        let ret: isize;
        asm!(
            "svc 0",
            in("r7") num,
            inlateout("r0") a0 => ret,
            in("r1") a1,
            options(nostack),
        );
        ret
    }

    #[inline(always)]
    pub(super) unsafe fn syscall3(num: usize, a0: usize, a1: usize, a2: usize) -> isize {
        let ret: isize;
        asm!(
            "svc 0",
            in("r7") num,
            inlateout("r0") a0 => ret,
            in("r1") a1,
            in("r2") a2,
            options(nostack),
        );
        ret
    }

    #[inline(always)]
    pub(super) unsafe fn syscall4(num: usize, a0: usize, a1: usize, a2: usize, a3: usize) -> isize {
        let ret: isize;
        asm!(
            "svc 0",
            in("r7") num,
            inlateout("r0") a0 => ret,
            in("r1") a1,
            in("r2") a2,
            in("r3") a3,
            options(nostack),
        );
        ret
    }
}

/// Translate a raw return: negative becomes `Err` plus a last-error
/// record, anything else clears the cell and passes through.
#[inline]
fn check(raw: isize) -> Result<usize, Errno> {
    if raw < 0 {
        let err = Errno::from_raw(-(raw as i32));
        errno::record_failure(err);
        Err(err)
    } else {
        errno::record_success();
        Ok(raw as usize)
    }
}

pub fn read(fd: i32, buf: &mut [u8]) -> Result<usize, Errno> {
    check(unsafe { arch::syscall3(nr::READ, fd as usize, buf.as_mut_ptr() as usize, buf.len()) })
}

pub fn write(fd: i32, buf: &[u8]) -> Result<usize, Errno> {
    check(unsafe { arch::syscall3(nr::WRITE, fd as usize, buf.as_ptr() as usize, buf.len()) })
}

/// Write that bypasses the last-error cell, for diagnostics sinks.
pub(crate) fn write_untracked(fd: i32, buf: &[u8]) -> isize {
    unsafe { arch::syscall3(nr::WRITE, fd as usize, buf.as_ptr() as usize, buf.len()) }
}

pub fn open(path: &CStr, flags: OpenFlags) -> Result<i32, Errno> {
    // Creation mode is left wide; the process umask narrows it.
    let raw = unsafe {
        arch::syscall3(nr::OPEN, path.as_ptr() as usize, flags.bits() as usize, 0o777)
    };
    check(raw).map(|fd| fd as i32)
}

pub fn close(fd: i32) -> Result<(), Errno> {
    check(unsafe { arch::syscall1(nr::CLOSE, fd as usize) }).map(|_| ())
}

pub fn access(path: &CStr, mode: AccessMode) -> Result<(), Errno> {
    let raw =
        unsafe { arch::syscall2(nr::ACCESS, path.as_ptr() as usize, mode.bits() as usize) };
    check(raw).map(|_| ())
}

pub fn chdir(path: &CStr) -> Result<(), Errno> {
    check(unsafe { arch::syscall1(nr::CHDIR, path.as_ptr() as usize) }).map(|_| ())
}

pub fn nanosleep(interval: &Timespec) -> Result<(), Errno> {
    let raw = unsafe {
        arch::syscall2(nr::NANOSLEEP, interval as *const Timespec as usize, 0)
    };
    check(raw).map(|_| ())
}

pub fn sleep(seconds: usize) -> Result<(), Errno> {
    let interval = Timespec {
        seconds: seconds as isize,
        nanos: 0,
    };
    nanosleep(&interval)
}

pub fn fork() -> Result<Pid, Errno> {
    check(unsafe { arch::syscall0(nr::FORK) }).map(|pid| pid as Pid)
}

/// Replace the calling process image. `argv` is a null-terminated pointer
/// array; `envp` may be null for an empty environment.
///
/// Returns only on failure.
pub fn execve(
    path: &CStr,
    argv: *const *const c_char,
    envp: *const *const c_char,
) -> Result<Infallible, Errno> {
    let raw = unsafe {
        arch::syscall3(
            nr::EXECVE,
            path.as_ptr() as usize,
            argv as usize,
            envp as usize,
        )
    };
    check(raw)?;
    unreachable!("a successful replace-image does not return");
}

/// Block until `pid` (or any child, for the wildcard) changes state.
pub fn wait4(pid: Pid, options: WaitOptions) -> Result<(Pid, WaitStatus), Errno> {
    let mut status: i32 = 0;
    let raw = unsafe {
        arch::syscall4(
            nr::WAIT4,
            pid as isize as usize,
            &mut status as *mut i32 as usize,
            options.bits() as usize,
            0,
        )
    };
    check(raw).map(|child| (child as Pid, WaitStatus::from_raw(status)))
}

/// Current program break. The break call never fails when queried.
pub fn current_break() -> usize {
    unsafe { arch::syscall1(nr::BRK, 0) as usize }
}

/// Region-growth primitive: extend the break by exactly `delta` bytes and
/// return the old break (the start of the new region). A grant of
/// anything but the exact requested extension is a failure; partially
/// granted regions are not usable.
pub fn grow_break(delta: usize) -> Result<*mut u8, Errno> {
    let old = current_break();
    let wanted = old.wrapping_add(delta);
    let granted = unsafe { arch::syscall1(nr::BRK, wanted) as usize };
    if granted != wanted {
        errno::record_failure(Errno::NOMEM);
        return Err(Errno::NOMEM);
    }
    errno::record_success();
    Ok(old as *mut u8)
}

/// Terminate the process with `status`. Never returns.
pub fn exit(status: i32) -> ! {
    unsafe {
        arch::syscall1(nr::EXIT, status as usize);
    }
    // The terminate call does not return; satisfy the signature anyway.
    loop {
        spin_loop();
    }
}
