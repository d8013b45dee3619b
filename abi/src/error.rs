//! POSIX-style error codes and their fixed descriptions.

use core::fmt;

/// A positive kernel error code.
///
/// The kernel reports failures as negated codes; the gateway negates them
/// back before constructing an `Errno`. Codes beyond the description table
/// are still representable and display as `Error N`.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Errno(i32);

/// Define the named codes together with their description table.
///
/// Generates the associated constants on `Errno` and the
/// `DESCRIPTIONS` table, keeping the two permanently in sync.
macro_rules! errno_table {
    ($(($num:literal, $name:ident, $desc:literal)),* $(,)?) => {
        impl Errno {
            $(pub const $name: Errno = Errno($num);)*
        }

        /// Description texts indexed by code; slot 0 is the no-error text.
        pub const DESCRIPTIONS: &[&str] = &[
            "No error",
            $($desc,)*
        ];
    };
}

errno_table! {
    (1,  PERM,    "Operation not permitted"),
    (2,  NOENT,   "No such file or directory"),
    (3,  SRCH,    "No such process"),
    (4,  INTR,    "Interrupted system call"),
    (5,  IO,      "I/O error"),
    (6,  NXIO,    "No such device or address"),
    (7,  TOO_BIG, "Argument list too long"),
    (8,  NOEXEC,  "Exec format error"),
    (9,  BADF,    "Bad file number"),
    (10, CHILD,   "No child processes"),
    (11, AGAIN,   "Try again"),
    (12, NOMEM,   "Out of memory"),
    (13, ACCES,   "Permission denied"),
    (14, FAULT,   "Bad address"),
    (15, NOTBLK,  "Block device required"),
    (16, BUSY,    "Device or resource busy"),
    (17, EXIST,   "File exists"),
    (18, XDEV,    "Cross-device link"),
    (19, NODEV,   "No such device"),
    (20, NOTDIR,  "Not a directory"),
    (21, ISDIR,   "Is a directory"),
    (22, INVAL,   "Invalid argument"),
    (23, NFILE,   "File table overflow"),
    (24, MFILE,   "Too many open files"),
    (25, NOTTY,   "Not a typewriter"),
    (26, TXTBSY,  "Text file busy"),
    (27, FBIG,    "File too large"),
    (28, NOSPC,   "No space left on device"),
    (29, SPIPE,   "Illegal seek"),
    (30, ROFS,    "Read-only file system"),
    (31, MLINK,   "Too many links"),
    (32, PIPE,    "Broken pipe"),
    (33, DOM,     "Math argument out of domain of func"),
    (34, RANGE,   "Math result not representable"),
}

impl Errno {
    /// Build from a positive kernel code.
    #[inline]
    pub const fn from_raw(code: i32) -> Self {
        Errno(code)
    }

    /// The positive kernel code.
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Fixed description, or `None` for codes beyond the table.
    pub fn description(self) -> Option<&'static str> {
        if self.0 <= 0 {
            return None;
        }
        DESCRIPTIONS.get(self.0 as usize).copied()
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.description() {
            Some(text) => f.write_str(text),
            None => write!(f, "Error {}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_the_posix_range() {
        assert_eq!(DESCRIPTIONS.len(), 35);
        assert_eq!(Errno::PERM.description(), Some("Operation not permitted"));
        assert_eq!(
            Errno::RANGE.description(),
            Some("Math result not representable")
        );
        assert_eq!(Errno::NOENT.raw(), 2);
    }

    #[test]
    fn out_of_table_codes_render_generically() {
        let unknown = Errno::from_raw(99);
        assert_eq!(unknown.description(), None);
        assert_eq!(unknown.to_string(), "Error 99");
        assert_eq!(Errno::PIPE.to_string(), "Broken pipe");
    }
}
