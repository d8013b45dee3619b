use core::ffi::c_char;

use crate::stack::{Args, StackImage};

/// One-time start sequence: install the environment view, bind the three
/// standard streams, run the entry function, and terminate the process
/// with its return value. Pending stream output is not flushed here; a
/// program that buffers output flushes before returning.
pub fn start(image: &StackImage, entry_fn: fn(&Args) -> i32) -> ! {
    unsafe {
        husk_rt::env::init(image.envp);
    }
    husk_io::stdio::bind_standard();
    let args = unsafe { Args::new(image.argc, image.argv) };
    let code = entry_fn(&args);
    husk_rt::exit(code)
}

/// Runtime initialization for a process started by a host C runtime
/// instead of `entry!`: install the given environment block and bind the
/// standard streams. The raw argument vector is not recoverable on this
/// path; callers get [`Args::empty`].
pub fn init_hosted(envp: *const *const c_char) {
    unsafe {
        husk_rt::env::init(envp);
    }
    husk_io::stdio::bind_standard();
}

/// Panic fallback for freestanding binaries: one diagnostic line, then
/// terminate. The buffered streams are deliberately not touched.
pub fn panic_exit() -> ! {
    husk_rt::rtlog_error!("panic in hosted program, terminating");
    husk_rt::exit(101)
}

/// Emit the freestanding process entry for the given function.
///
/// Expands to the architecture `_start` shim (stack pointer handed over
/// in the first argument register), the Rust trampoline, and a panic
/// handler. Use from exactly one binary crate built without the host C
/// runtime.
#[macro_export]
macro_rules! entry {
    ($entry_fn:path) => {
        #[cfg(target_arch = "x86_64")]
        ::core::arch::global_asm!(
            ".global _start",
            "_start:",
            "xor ebp, ebp",
            "mov rdi, rsp",
            "and rsp, -16",
            "call __husk_start",
        );

        #[cfg(target_arch = "arm")]
        ::core::arch::global_asm!(
            ".global _start",
            "_start:",
            "mov fp, #0",
            "mov r0, sp",
            "bl __husk_start",
        );

        #[unsafe(no_mangle)]
        extern "C" fn __husk_start(stack: *const usize) -> ! {
            let image = unsafe { $crate::stack::parse_stack(stack) };
            $crate::entry::start(&image, $entry_fn)
        }

        #[panic_handler]
        fn panic(_info: &::core::panic::PanicInfo) -> ! {
            $crate::entry::panic_exit()
        }
    };
}
