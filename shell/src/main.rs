//! hush — the thin consumer of the husk runtime contract.
//!
//! With the `standalone` feature the binary carries its own `_start` and
//! runs without any host C runtime (link with `-C
//! link-arg=-nostartfiles`). The default build starts through the host C
//! runtime instead and hands the runtime its environment block, so the
//! same shell runs and tests without special linker flags.

#![cfg_attr(feature = "standalone", no_std)]
#![cfg_attr(feature = "standalone", no_main)]

mod repl;

#[cfg(feature = "standalone")]
husk_boot::entry!(repl::shell_main);

#[cfg(not(feature = "standalone"))]
fn main() {
    unsafe extern "C" {
        // The host C runtime's environment block, named as libc names it.
        #[allow(non_upper_case_globals)]
        static environ: *const *const core::ffi::c_char;
    }
    husk_boot::init_hosted(unsafe { environ });
    let code = repl::shell_main(&husk_boot::Args::empty());
    std::process::exit(code);
}
