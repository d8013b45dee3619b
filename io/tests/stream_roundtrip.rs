//! End-to-end stream behavior against real descriptors.

use std::ffi::CString;
use std::fmt::Write as _;
use std::io::Write as _;

use husk_io::{Direction, STREAM_CAPACITY, Stream};

fn scratch(tag: &str) -> (std::path::PathBuf, CString) {
    let path = std::env::temp_dir().join(format!("husk-io-it-{}-{}", tag, std::process::id()));
    let cpath = CString::new(path.to_str().unwrap()).unwrap();
    (path, cpath)
}

fn scratch_with(tag: &str, content: &[u8]) -> CString {
    let (path, cpath) = scratch(tag);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(content).unwrap();
    cpath
}

#[test]
fn line_reads_then_clean_end_of_file() {
    let path = scratch_with("lines", b"ab\ncd\n");
    let mut s = Stream::open(&path, Direction::Input).unwrap();
    let mut line = [0u8; 64];

    assert_eq!(s.read_line(&mut line).unwrap(), Some(3));
    assert_eq!(&line[..4], b"ab\n\0");

    assert_eq!(s.read_line(&mut line).unwrap(), Some(3));
    assert_eq!(&line[..4], b"cd\n\0");

    // Third call reports end of file — and a clean one: reaching the end
    // of input is not an error condition on this stream.
    assert_eq!(s.read_line(&mut line).unwrap(), None);
    assert!(s.at_end());
    assert!(!s.is_errored());
}

#[test]
fn final_unterminated_line_is_flushed() {
    let path = scratch_with("residue", b"one\ntail");
    let mut s = Stream::open(&path, Direction::Input).unwrap();
    let mut line = [0u8; 64];

    assert_eq!(s.read_line(&mut line).unwrap(), Some(4));
    assert_eq!(&line[..5], b"one\n\0");

    assert_eq!(s.read_line(&mut line).unwrap(), Some(4));
    assert_eq!(&line[..5], b"tail\0");

    assert_eq!(s.read_line(&mut line).unwrap(), None);
}

#[test]
fn overlong_line_continues_across_calls() {
    let path = scratch_with("overlong", b"abcdefgh\n");
    let mut s = Stream::open(&path, Direction::Input).unwrap();

    // Capacity minus two bytes per call, terminator included only when
    // it fits.
    let mut small = [0u8; 6];
    assert_eq!(s.read_line(&mut small).unwrap(), Some(4));
    assert_eq!(&small[..5], b"abcd\0");
    assert_eq!(s.read_line(&mut small).unwrap(), Some(4));
    assert_eq!(&small[..5], b"efgh\0");
    assert_eq!(s.read_line(&mut small).unwrap(), Some(1));
    assert_eq!(&small[..2], b"\n\0");
    assert_eq!(s.read_line(&mut small).unwrap(), None);
}

#[test]
fn write_flush_round_trip_preserves_order() {
    let (path, cpath) = scratch("write");
    let mut s = Stream::open(&cpath, Direction::Output).unwrap();

    s.write_bytes(b"hello, ").unwrap();
    s.write_bytes(b"stream").unwrap();
    // Nothing reaches the descriptor before the flush.
    assert_eq!(std::fs::read(&path).unwrap(), b"");

    s.flush().unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"hello, stream");

    s.write_byte(b'!').unwrap();
    s.close().unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"hello, stream!");
}

#[test]
fn full_buffer_flushes_synchronously() {
    let (path, cpath) = scratch("auto");
    let mut s = Stream::open(&cpath, Direction::Output).unwrap();

    let payload: Vec<u8> = (0..STREAM_CAPACITY + 100).map(|i| (i % 251) as u8).collect();
    s.write_bytes(&payload).unwrap();

    // The capacity-sized prefix was flushed by the buffer-full rule; the
    // remainder is still pending.
    assert_eq!(std::fs::read(&path).unwrap(), &payload[..STREAM_CAPACITY]);
    s.flush().unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), payload);
    s.close().unwrap();
}

#[test]
fn drop_flushes_pending_output() {
    let (path, cpath) = scratch("drop");
    {
        let mut s = Stream::open(&cpath, Direction::Output).unwrap();
        s.write_bytes(b"flushed on drop").unwrap();
    }
    assert_eq!(std::fs::read(&path).unwrap(), b"flushed on drop");
}

#[test]
fn formatted_writes_go_through_the_buffer() {
    let (path, cpath) = scratch("fmt");
    let mut s = Stream::open(&cpath, Direction::Output).unwrap();
    write!(s, "{} + {} = {}", 2, 2, 2 + 2).unwrap();
    s.close().unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"2 + 2 = 4");
}

#[test]
fn record_reads_truncate_partials_in_one_call() {
    let path = scratch_with("records", &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    let mut s = Stream::open(&path, Direction::Input).unwrap();

    let mut out = [0u8; 12];
    // Ten bytes arrive in the single underlying read: two whole records,
    // the partial third is truncated from the count.
    assert_eq!(s.read_records(&mut out, 4).unwrap(), 2);
    assert_eq!(&out[..10], &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);

    assert_eq!(s.read_records(&mut out, 4).unwrap(), 0);
    assert!(s.at_end());
}

#[test]
fn record_writes_buffer_per_record() {
    let (path, cpath) = scratch("recw");
    let mut s = Stream::open(&cpath, Direction::Output).unwrap();

    let data: Vec<u8> = (0u8..14).collect();
    // chunks of four: three whole records, the trailing two bytes are
    // not a record and are not written.
    assert_eq!(s.write_records(&data, 4).unwrap(), 3);
    s.close().unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), &data[..12]);
}
