//! Process control: duplicate, replace-image, reap.

use core::convert::Infallible;
use core::ffi::{CStr, c_char};

use husk_abi::{AccessMode, Errno, Pid, WaitOptions, WaitStatus};
use husk_lib::string::{find_byte, tokens};

use crate::{env, errno, syscall};

/// Search-path list used when the environment does not provide one.
pub const DEFAULT_SEARCH_PATH: &[u8] = b"/bin:/usr/bin";

/// Longest resolvable candidate path, separator and terminator included.
const CANDIDATE_MAX: usize = 512;

/// Which side of a duplicate the caller is on.
///
/// Both sides observe a single spawn call; the kernel's raw return-value
/// branching is folded into this variant so callers match instead of
/// comparing magic values.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Spawned {
    /// The original process; carries the duplicate's identifier.
    Parent(Pid),
    /// The duplicate.
    Child,
}

/// Duplicate the calling process.
pub fn spawn() -> Result<Spawned, Errno> {
    syscall::fork().map(|pid| {
        if pid == 0 {
            Spawned::Child
        } else {
            Spawned::Parent(pid)
        }
    })
}

/// Block until the identified child (or any child, for
/// [`husk_abi::ANY_CHILD`]) changes state; returns its identifier and
/// decoded status.
pub fn reap(pid: Pid, options: WaitOptions) -> Result<(Pid, WaitStatus), Errno> {
    syscall::wait4(pid, options)
}

/// Resolve an unqualified executable name against a colon-delimited
/// directory list. The winning candidate is materialized in `buf`;
/// entries whose joined path would not fit are skipped.
pub fn resolve_in_path<'a>(name: &[u8], list: &[u8], buf: &'a mut [u8]) -> Option<&'a CStr> {
    let mut found = 0usize;
    for dir in tokens(list, b":") {
        let total = dir.len() + 1 + name.len() + 1;
        if total > buf.len() {
            continue;
        }
        buf[..dir.len()].copy_from_slice(dir);
        buf[dir.len()] = b'/';
        buf[dir.len() + 1..dir.len() + 1 + name.len()].copy_from_slice(name);
        buf[total - 1] = 0;

        let candidate = CStr::from_bytes_with_nul(&buf[..total]).ok()?;
        if syscall::access(candidate, AccessMode::EXEC).is_ok() {
            found = total;
            break;
        }
    }
    if found == 0 {
        return None;
    }
    CStr::from_bytes_with_nul(&buf[..found]).ok()
}

/// Replace the calling process image.
///
/// A path containing a separator is used as given; otherwise the
/// colon-delimited `PATH` environment value (or the fixed default list)
/// is searched for an executable match. On success the calling process's
/// code, memory, and control flow are gone; on failure the error state
/// is set and the caller decides what to do.
///
/// `argv` must end with a null pointer.
pub fn replace_image(path: &CStr, argv: &[*const c_char]) -> Result<Infallible, Errno> {
    debug_assert!(matches!(argv.last(), Some(p) if p.is_null()));

    let name = path.to_bytes();
    if find_byte(name, b'/').is_some() {
        return syscall::execve(path, argv.as_ptr(), env::raw_block());
    }

    let list = env::get(b"PATH").unwrap_or(DEFAULT_SEARCH_PATH);
    let mut buf = [0u8; CANDIDATE_MAX];
    match resolve_in_path(name, list, &mut buf) {
        Some(candidate) => syscall::execve(candidate, argv.as_ptr(), env::raw_block()),
        None => {
            errno::record_failure(Errno::NOENT);
            Err(Errno::NOENT)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use husk_abi::ANY_CHILD;
    use std::ffi::CString;
    use std::os::unix::fs::PermissionsExt;

    // Children are process-wide: a wildcard reap in one test would
    // otherwise steal another test's child. One fork at a time.
    use crate::errno::TEST_SERIAL as FORK_LOCK;

    fn scratch_dir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("husk-rt-{}-{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn place_executable(dir: &std::path::Path, name: &str) {
        let path = dir.join(name);
        std::fs::write(&path, b"#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn resolves_first_matching_list_entry() {
        let _serial = FORK_LOCK.lock().unwrap();
        let empty = scratch_dir("empty");
        let bindir = scratch_dir("bin");
        place_executable(&bindir, "tool");

        let list = format!("{}:{}", empty.display(), bindir.display());
        let mut buf = [0u8; 512];
        let hit = resolve_in_path(b"tool", list.as_bytes(), &mut buf).unwrap();
        assert_eq!(
            hit.to_bytes(),
            format!("{}/tool", bindir.display()).as_bytes()
        );

        let mut buf = [0u8; 512];
        assert!(resolve_in_path(b"no-such-tool", list.as_bytes(), &mut buf).is_none());
    }

    #[test]
    fn resolution_skips_non_executable_matches() {
        let _serial = FORK_LOCK.lock().unwrap();
        let dir = scratch_dir("plain");
        let path = dir.join("data");
        std::fs::write(&path, b"not a program").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let list = dir.display().to_string();
        let mut buf = [0u8; 512];
        assert!(resolve_in_path(b"data", list.as_bytes(), &mut buf).is_none());
    }

    #[test]
    fn spawn_and_reap_round_trip() {
        let _serial = FORK_LOCK.lock().unwrap();
        match spawn().unwrap() {
            Spawned::Child => {
                // Leave the test harness immediately; only the parent
                // may keep running assertions.
                syscall::exit(7);
            }
            Spawned::Parent(child) => {
                let (reaped, status) = reap(child, WaitOptions::empty()).unwrap();
                assert_eq!(reaped, child);
                assert!(status.exited());
                assert_eq!(status.exit_code(), 7);
            }
        }
    }

    #[test]
    fn replace_image_in_child_runs_external_program() {
        let _serial = FORK_LOCK.lock().unwrap();
        let dir = scratch_dir("exec");
        place_executable(&dir, "runme");
        let name = CString::new("runme").unwrap();

        match spawn().unwrap() {
            Spawned::Child => {
                // Resolve through an explicit list rather than the global
                // env view so the test controls the search order.
                let list = dir.display().to_string();
                let mut buf = [0u8; 512];
                let status = match resolve_in_path(b"runme", list.as_bytes(), &mut buf) {
                    Some(candidate) => {
                        let argv = [name.as_ptr(), core::ptr::null()];
                        let _ = syscall::execve(candidate, argv.as_ptr(), core::ptr::null());
                        86 // replace failed
                    }
                    None => 87, // resolution failed
                };
                syscall::exit(status);
            }
            Spawned::Parent(child) => {
                let (_, status) = reap(child, WaitOptions::empty()).unwrap();
                assert!(status.exited());
                assert_eq!(status.exit_code(), 0);
            }
        }
    }

    #[test]
    fn reap_wildcard_accepts_any_child() {
        let _serial = FORK_LOCK.lock().unwrap();
        match spawn().unwrap() {
            Spawned::Child => syscall::exit(3),
            Spawned::Parent(child) => {
                let (reaped, status) = reap(ANY_CHILD, WaitOptions::empty()).unwrap();
                assert_eq!(reaped, child);
                assert_eq!(status.exit_code(), 3);
            }
        }
    }
}
