use bitflags::bitflags;

bitflags! {
    /// Options accepted by the reap call.
    #[repr(transparent)]
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct WaitOptions: u32 {
        const NOHANG    = 1;
        const UNTRACED  = 2;
    }
}

/// Raw wait status word, decoded with the kernel's bit layout.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct WaitStatus(i32);

impl WaitStatus {
    #[inline]
    pub const fn from_raw(status: i32) -> Self {
        WaitStatus(status)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// The child terminated normally through the exit call.
    #[inline]
    pub const fn exited(self) -> bool {
        self.0 & 0x7f == 0
    }

    /// Exit status passed to the exit call; meaningful only when `exited`.
    #[inline]
    pub const fn exit_code(self) -> i32 {
        (self.0 >> 8) & 0xff
    }

    /// The child was terminated by a signal.
    #[inline]
    pub const fn signaled(self) -> bool {
        let sig = self.0 & 0x7f;
        sig != 0 && sig != 0x7f
    }

    /// Terminating signal number; meaningful only when `signaled`.
    #[inline]
    pub const fn term_signal(self) -> i32 {
        self.0 & 0x7f
    }
}
