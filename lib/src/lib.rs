//! Pure utility routines shared by the husk runtime crates.
//!
//! Everything here is allocation-free and makes no kernel calls, so the
//! other crates can use it from any context, including before the heap
//! or the standard streams exist.

#![cfg_attr(not(test), no_std)]

pub mod alignment;
pub mod numfmt;
pub mod string;

pub use alignment::{align_down_usize, align_up_usize};
pub use numfmt::{format_int, reverse};
pub use string::{Tokens, compare, compare_n, cstr_bytes, cstr_len, find_any, find_byte, span, tokens};
