use core::ffi::{CStr, c_char};
use core::ptr;

/// Decoded view of the kernel's initial stack image.
pub struct StackImage {
    pub argc: usize,
    pub argv: *const *const c_char,
    pub envp: *const *const c_char,
}

/// Decode the initial stack image.
///
/// # Safety
/// `stack` must point at a System V style process stack: the argument
/// count, then `argc` argument pointers, a null terminator, and the
/// pointer-terminated environment block, all living for the whole
/// process.
pub unsafe fn parse_stack(stack: *const usize) -> StackImage {
    let argc = *stack;
    let argv = stack.add(1) as *const *const c_char;
    let envp = argv.add(argc + 1);
    StackImage { argc, argv, envp }
}

/// Read-only view of the argument vector handed to the entry function.
#[derive(Clone, Copy)]
pub struct Args {
    count: usize,
    vector: *const *const c_char,
}

impl Args {
    /// No arguments at all, for hosted starts that have no raw vector.
    pub const fn empty() -> Self {
        Args {
            count: 0,
            vector: ptr::null(),
        }
    }

    /// # Safety
    /// `vector` must hold at least `count` valid string pointers that
    /// live for the whole process.
    pub unsafe fn new(count: usize, vector: *const *const c_char) -> Self {
        Args { count, vector }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn get(&self, index: usize) -> Option<&'static CStr> {
        if index >= self.count || self.vector.is_null() {
            return None;
        }
        unsafe {
            let ptr = *self.vector.add(index);
            if ptr.is_null() {
                None
            } else {
                Some(CStr::from_ptr(ptr))
            }
        }
    }

    pub fn iter(&self) -> ArgsIter {
        ArgsIter {
            args: *self,
            next: 0,
        }
    }
}

pub struct ArgsIter {
    args: Args,
    next: usize,
}

impl Iterator for ArgsIter {
    type Item = &'static CStr;

    fn next(&mut self) -> Option<&'static CStr> {
        let item = self.args.get(self.next)?;
        self.next += 1;
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn parses_argc_argv_and_adjacent_env_block() {
        let strings: Vec<CString> = ["prog", "first", "HOME=/root", "TERM=dumb"]
            .iter()
            .map(|s| CString::new(*s).unwrap())
            .collect();
        let strings = Box::leak(strings.into_boxed_slice());

        // [argc][argv0][argv1][NULL][env0][env1][NULL]
        let image: Vec<usize> = vec![
            2,
            strings[0].as_ptr() as usize,
            strings[1].as_ptr() as usize,
            0,
            strings[2].as_ptr() as usize,
            strings[3].as_ptr() as usize,
            0,
        ];
        let image = Box::leak(image.into_boxed_slice());

        let parsed = unsafe { parse_stack(image.as_ptr()) };
        assert_eq!(parsed.argc, 2);

        let args = unsafe { Args::new(parsed.argc, parsed.argv) };
        assert_eq!(args.len(), 2);
        assert_eq!(args.get(0).unwrap().to_bytes(), b"prog");
        assert_eq!(args.get(1).unwrap().to_bytes(), b"first");
        assert!(args.get(2).is_none());

        let collected: Vec<&[u8]> = args.iter().map(|a| a.to_bytes()).collect();
        assert_eq!(collected, [&b"prog"[..], &b"first"[..]]);

        // The environment block sits one slot past the argv terminator.
        unsafe {
            assert_eq!(
                CStr::from_ptr(*parsed.envp).to_bytes(),
                b"HOME=/root"
            );
            assert_eq!(
                CStr::from_ptr(*parsed.envp.add(1)).to_bytes(),
                b"TERM=dumb"
            );
            assert!((*parsed.envp.add(2)).is_null());
        }
    }

    #[test]
    fn empty_args_yield_nothing() {
        let args = Args::empty();
        assert!(args.is_empty());
        assert!(args.get(0).is_none());
        assert_eq!(args.iter().count(), 0);
    }
}
