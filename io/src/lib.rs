//! Buffered character-stream I/O over raw descriptors.
//!
//! A [`Stream`] multiplexes unbuffered read/write kernel calls into
//! byte-, line-, and block-oriented operations through a fixed buffer and
//! an explicit fill/drain state machine. The three standard streams live
//! in [`stdio`] and are bound by bootstrap before the hosted program runs.

#![cfg_attr(not(test), no_std)]

pub mod stdio;
pub mod stream;

pub use stream::{Direction, STREAM_CAPACITY, State, Stream};
