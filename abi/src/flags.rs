use bitflags::bitflags;

bitflags! {
    /// Flags accepted by the open call.
    ///
    /// Read-only access is the zero word, as the kernel defines it.
    #[repr(transparent)]
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct OpenFlags: u32 {
        const RDONLY   = 0o0;
        const WRONLY   = 0o1;
        const RDWR     = 0o2;
        const CREAT    = 0o100;
        const EXCL     = 0o200;
        const NOCTTY   = 0o400;
        const TRUNC    = 0o1000;
        const APPEND   = 0o2000;
        const NONBLOCK = 0o4000;
    }
}

bitflags! {
    /// Permission mask for the access-check call.
    ///
    /// The zero word tests bare existence.
    #[repr(transparent)]
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct AccessMode: u32 {
        const EXEC  = 1;
        const WRITE = 2;
        const READ  = 4;
    }
}

impl AccessMode {
    /// Existence test, no permission bits.
    pub const EXISTS: AccessMode = AccessMode::empty();
}
