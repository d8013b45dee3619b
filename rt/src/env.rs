//! Read-only view over the process environment block.
//!
//! The block is a pointer-terminated sequence of `key=value` strings
//! sitting immediately after the argument vector in the initial memory
//! image. Bootstrap installs it exactly once; it lives for the whole
//! process and is never mutated.

use core::ffi::c_char;

use spin::Once;

use husk_lib::string::{cstr_bytes, find_byte};

struct EnvBlock(*const *const c_char);

// SAFETY: the block is written once before any lookup and read-only
// afterwards; the pointed-to strings live for the whole process.
unsafe impl Send for EnvBlock {}
unsafe impl Sync for EnvBlock {}

static ENV: Once<EnvBlock> = Once::new();

/// Install the environment block. Later calls are ignored; the first
/// installation wins for the life of the process.
///
/// # Safety
/// `envp` must be null or point to a null-terminated array of
/// null-terminated strings that outlive the process.
pub unsafe fn init(envp: *const *const c_char) {
    ENV.call_once(|| EnvBlock(envp));
}

/// Raw block pointer for handing to replace-image; null when bootstrap
/// has not run.
pub fn raw_block() -> *const *const c_char {
    match ENV.get() {
        Some(block) => block.0,
        None => core::ptr::null(),
    }
}

/// Like [`get`], but as a null-terminated string view — the value runs to
/// the end of its entry, so the entry's own terminator serves.
pub fn get_cstr(name: &[u8]) -> Option<&'static core::ffi::CStr> {
    let value = get(name)?;
    unsafe { Some(core::ffi::CStr::from_ptr(value.as_ptr() as *const c_char)) }
}

/// Value segment of the first `key=value` entry whose key equals `name`.
pub fn get(name: &[u8]) -> Option<&'static [u8]> {
    let block = ENV.get()?;
    let mut ptr = block.0;
    if ptr.is_null() {
        return None;
    }
    unsafe {
        while !(*ptr).is_null() {
            let entry = cstr_bytes(*ptr);
            if let Some(eq) = find_byte(entry, b'=')
                && &entry[..eq] == name
            {
                return Some(&entry[eq + 1..]);
            }
            ptr = ptr.add(1);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn looks_up_values_by_exact_key() {
        // Build a block shaped like the kernel's and leak it so the
        // process-lifetime contract of `init` holds.
        let strings: Vec<CString> = ["HOME=/root", "PATH=/bin:/usr/bin", "EMPTY=", "PATHX=no"]
            .iter()
            .map(|s| CString::new(*s).unwrap())
            .collect();
        let strings = Box::leak(strings.into_boxed_slice());
        let mut ptrs: Vec<*const c_char> = strings.iter().map(|s| s.as_ptr()).collect();
        ptrs.push(core::ptr::null());
        let block = Box::leak(ptrs.into_boxed_slice());

        unsafe { init(block.as_ptr()) };

        assert_eq!(get(b"HOME"), Some(&b"/root"[..]));
        assert_eq!(get(b"PATH"), Some(&b"/bin:/usr/bin"[..]));
        assert_eq!(get(b"EMPTY"), Some(&b""[..]));
        // Exact key match: no prefix confusion in either direction.
        assert_eq!(get(b"PATHX"), Some(&b"no"[..]));
        assert_eq!(get(b"PAT"), None);
        assert_eq!(get(b"MISSING"), None);
        assert_eq!(get_cstr(b"HOME").unwrap().to_bytes(), b"/root");
        assert_eq!(get_cstr(b"EMPTY").unwrap().to_bytes(), b"");
        assert!(!raw_block().is_null());
    }
}
