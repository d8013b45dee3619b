use core::ffi::CStr;
use core::fmt;

use husk_abi::{Errno, OpenFlags};
use husk_lib::string::find_byte;
use husk_rt::syscall;

/// Fixed buffer capacity of every stream.
pub const STREAM_CAPACITY: usize = 4096;

/// A stream moves bytes one way only; there are no bidirectional streams.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Input,
    Output,
}

/// Buffering state of a stream.
///
/// `Filled(n)` holds `0 < n <= STREAM_CAPACITY` buffered bytes.
/// `AtEndOfInput` means no further bytes will ever arrive and the buffer
/// is empty; it is distinct from `Errored`, which is entered only when an
/// operation against the underlying descriptor fails. Once `Errored`, the
/// buffer content is indeterminate and every further transfer reports an
/// I/O fault; the failing operation itself returned the precise code.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum State {
    Idle,
    Filled(usize),
    AtEndOfInput,
    Errored,
}

/// A descriptor wrapped with a fixed-size buffer and a direction.
///
/// The handle exclusively owns its descriptor: dropping it flushes (for
/// output) and closes, and [`Stream::close`] consumes the handle so
/// use-after-close cannot be expressed.
pub struct Stream {
    fd: i32,
    dir: Direction,
    state: State,
    buf: [u8; STREAM_CAPACITY],
}

impl Stream {
    /// A stream bound to no descriptor. Transfers fail against the
    /// invalid descriptor until bootstrap rebinds the slot.
    pub const fn unbound(dir: Direction) -> Self {
        Stream {
            fd: -1,
            dir,
            state: State::Idle,
            buf: [0; STREAM_CAPACITY],
        }
    }

    /// Bind an already-open descriptor.
    pub fn from_fd(fd: i32, dir: Direction) -> Self {
        Stream {
            fd,
            dir,
            state: State::Idle,
            buf: [0; STREAM_CAPACITY],
        }
    }

    /// Open `path` for the given direction: read-only for input,
    /// create-or-truncate for output.
    pub fn open(path: &CStr, dir: Direction) -> Result<Self, Errno> {
        let flags = match dir {
            Direction::Input => OpenFlags::RDONLY,
            Direction::Output => OpenFlags::WRONLY | OpenFlags::CREAT | OpenFlags::TRUNC,
        };
        Self::open_with_flags(path, flags, dir)
    }

    /// Open with explicit flags for callers that need append or
    /// exclusive-create semantics.
    pub fn open_with_flags(path: &CStr, flags: OpenFlags, dir: Direction) -> Result<Self, Errno> {
        let fd = syscall::open(path, flags)?;
        Ok(Self::from_fd(fd, dir))
    }

    pub fn fd(&self) -> i32 {
        self.fd
    }

    pub fn direction(&self) -> Direction {
        self.dir
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Bytes currently buffered.
    pub fn buffered(&self) -> usize {
        match self.state {
            State::Filled(n) => n,
            _ => 0,
        }
    }

    /// No further input will ever arrive.
    pub fn at_end(&self) -> bool {
        self.state == State::AtEndOfInput
    }

    /// A prior operation against the descriptor failed.
    pub fn is_errored(&self) -> bool {
        self.state == State::Errored
    }

    /// Top up the buffer with one underlying read. A zero-length result
    /// against an empty buffer is end of input; a failure is sticky.
    fn fill(&mut self) -> Result<usize, Errno> {
        let n = self.buffered();
        match syscall::read(self.fd, &mut self.buf[n..]) {
            Err(err) => {
                self.state = State::Errored;
                Err(err)
            }
            Ok(0) => {
                if n == 0 {
                    self.state = State::AtEndOfInput;
                }
                Ok(0)
            }
            Ok(got) => {
                self.state = State::Filled(n + got);
                Ok(got)
            }
        }
    }

    /// Drop `count` bytes off the front of the buffer, shifting the rest
    /// left. This is the O(n) compaction the simple layout costs.
    fn consume(&mut self, count: usize) {
        if let State::Filled(n) = self.state {
            self.buf.copy_within(count..n, 0);
            self.state = if n == count {
                State::Idle
            } else {
                State::Filled(n - count)
            };
        }
    }

    /// Read one byte; `Ok(None)` at end of input.
    pub fn read_byte(&mut self) -> Result<Option<u8>, Errno> {
        if self.dir != Direction::Input {
            return Err(Errno::INVAL);
        }
        loop {
            match self.state {
                State::Errored => return Err(Errno::IO),
                State::AtEndOfInput => return Ok(None),
                State::Filled(_) => {
                    let byte = self.buf[0];
                    self.consume(1);
                    return Ok(Some(byte));
                }
                State::Idle => {
                    self.fill()?;
                }
            }
        }
    }

    /// Read one line into `out`, null-terminating it, and return the
    /// copied byte count; `Ok(None)` at clean end of input.
    ///
    /// A found terminator copies at most `out.len() - 2` bytes (the
    /// terminator included when it fits); an over-long line continues on
    /// the next call. At end of input, residual buffered bytes are
    /// flushed as a final unterminated line.
    pub fn read_line(&mut self, out: &mut [u8]) -> Result<Option<usize>, Errno> {
        if self.dir != Direction::Input {
            return Err(Errno::INVAL);
        }
        if out.len() < 2 {
            return Err(Errno::INVAL);
        }
        loop {
            match self.state {
                State::Errored => return Err(Errno::IO),
                State::AtEndOfInput => return Ok(None),
                State::Idle => {
                    self.fill()?;
                }
                State::Filled(n) => {
                    if let Some(at) = find_byte(&self.buf[..n], b'\n') {
                        let tocopy = (at + 1).min(out.len() - 2);
                        out[..tocopy].copy_from_slice(&self.buf[..tocopy]);
                        out[tocopy] = 0;
                        self.consume(tocopy);
                        return Ok(Some(tocopy));
                    }
                    if n == self.buf.len() {
                        // No terminator fits anymore; hand the buffer
                        // over as an unterminated line.
                        return self.take_residue(out, n);
                    }
                    if self.fill()? == 0 {
                        // End of input with residue.
                        return self.take_residue(out, n);
                    }
                }
            }
        }
    }

    fn take_residue(&mut self, out: &mut [u8], n: usize) -> Result<Option<usize>, Errno> {
        let tocopy = n.min(out.len() - 1);
        out[..tocopy].copy_from_slice(&self.buf[..tocopy]);
        out[tocopy] = 0;
        self.consume(tocopy);
        Ok(Some(tocopy))
    }

    /// Read whole fixed-size records straight from the descriptor.
    ///
    /// Exactly one underlying read of `record_size * (out.len() /
    /// record_size)` bytes is issued — short reads are not retried, and a
    /// trailing partial record is truncated from the count. Buffered
    /// bytes are not consulted.
    pub fn read_records(&mut self, out: &mut [u8], record_size: usize) -> Result<usize, Errno> {
        if self.dir != Direction::Input || record_size == 0 {
            return Err(Errno::INVAL);
        }
        if self.state == State::Errored {
            return Err(Errno::IO);
        }
        let want = (out.len() / record_size) * record_size;
        match syscall::read(self.fd, &mut out[..want]) {
            Err(err) => {
                self.state = State::Errored;
                Err(err)
            }
            Ok(0) => {
                self.state = State::AtEndOfInput;
                Ok(0)
            }
            Ok(got) => Ok(got / record_size),
        }
    }

    /// Append one byte, flushing synchronously when the buffer fills.
    pub fn write_byte(&mut self, byte: u8) -> Result<(), Errno> {
        self.write_bytes(&[byte])
    }

    /// Append bytes, flushing synchronously whenever the buffer reaches
    /// capacity.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Errno> {
        if self.dir != Direction::Output {
            return Err(Errno::INVAL);
        }
        for &byte in bytes {
            if self.state == State::Errored {
                return Err(Errno::IO);
            }
            let n = self.buffered();
            self.buf[n] = byte;
            self.state = State::Filled(n + 1);
            if n + 1 == self.buf.len() {
                self.flush()?;
            }
        }
        Ok(())
    }

    /// Buffer fixed-size records, one buffered write per record; returns
    /// the count of records fully accepted. A fault leaves the stream
    /// `Errored` with a short count rather than failing the whole call.
    pub fn write_records(&mut self, data: &[u8], record_size: usize) -> Result<usize, Errno> {
        if self.dir != Direction::Output || record_size == 0 {
            return Err(Errno::INVAL);
        }
        let mut accepted = 0usize;
        for record in data.chunks_exact(record_size) {
            if self.write_bytes(record).is_err() {
                break;
            }
            accepted += 1;
        }
        Ok(accepted)
    }

    /// Output: write the buffered bytes in one operation and reset the
    /// cursor. Input: discard buffered bytes; the descriptor is not
    /// repositioned, so the discarded bytes are simply gone.
    pub fn flush(&mut self) -> Result<(), Errno> {
        match self.dir {
            Direction::Input => {
                if let State::Filled(_) = self.state {
                    self.state = State::Idle;
                }
                Ok(())
            }
            Direction::Output => {
                let n = self.buffered();
                if n == 0 {
                    return Ok(());
                }
                match syscall::write(self.fd, &self.buf[..n]) {
                    Err(err) => {
                        self.state = State::Errored;
                        Err(err)
                    }
                    Ok(written) if written != n => {
                        self.state = State::Errored;
                        Err(Errno::IO)
                    }
                    Ok(_) => {
                        self.state = State::Idle;
                        Ok(())
                    }
                }
            }
        }
    }

    /// Flush pending output, close the descriptor, and consume the
    /// handle. Both the flush and the close must succeed for an `Ok`.
    pub fn close(mut self) -> Result<(), Errno> {
        let flushed = match self.dir {
            Direction::Output => self.flush(),
            Direction::Input => Ok(()),
        };
        let fd = self.fd;
        self.fd = -1; // disarm Drop
        let closed = syscall::close(fd);
        flushed.and(closed)
    }
}

impl Drop for Stream {
    fn drop(&mut self) {
        if self.fd < 0 {
            return;
        }
        if self.dir == Direction::Output {
            let _ = self.flush();
        }
        let _ = syscall::close(self.fd);
    }
}

impl fmt::Write for Stream {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes()).map_err(|_| fmt::Error)
    }
}
