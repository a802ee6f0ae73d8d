//! End-to-end tests of the COPY stream framing.

use pqbin_copy::{
    CopyFrame, CopyOptions, CopySink, CopyWriter, MemorySink, COPY_HEADER_LEN, COPY_SIGNATURE,
};
use pqbin_core::{Error, Result};
use proptest::prelude::*;

fn frame(columns: usize, capacity: usize) -> CopyFrame<MemorySink> {
    let config = CopyOptions::new(columns)
        .buffer_capacity(capacity)
        .build()
        .unwrap();
    CopyFrame::new(MemorySink::new(), config)
}

#[test]
fn test_fourth_field_starts_new_tuple() {
    let mut f = frame(3, 1024);
    f.put_column(Some(b"a")).unwrap();
    f.put_column(None).unwrap();
    f.put_column(Some(b"")).unwrap();
    assert_eq!(f.column_position(), 3);
    f.put_column(Some(b"b")).unwrap();
    assert_eq!(f.column_position(), 1);
    f.finish().unwrap();

    let stream = f.into_sink().concat();
    assert_eq!(&stream[..11], &COPY_SIGNATURE[..]);
    let body = &stream[COPY_HEADER_LEN..];
    assert_eq!(
        body,
        &[
            0, 3, // tuple
            0, 0, 0, 1, b'a', //
            0xFF, 0xFF, 0xFF, 0xFF, //
            0, 0, 0, 0, //
            0, 3, // tuple
            0, 0, 0, 1, b'b',
        ][..]
    );
}

#[test]
fn test_flushes_stay_within_capacity() {
    let capacity = 64;
    let mut f = frame(2, capacity);
    let payload = [0xAB; 40];
    for _ in 0..10 {
        f.put_column(Some(&payload)).unwrap();
        f.put_column(None).unwrap();
    }
    // header 19 + 10 tuples of (2 + 4 + 40 + 4)
    let total = 19 + 10 * 50;
    assert_eq!(f.flushes(), total / capacity);
    assert_eq!(f.buffered(), total % capacity);

    f.finish().unwrap();
    let sink = f.into_sink();
    assert!(sink.is_ended());
    let chunks = sink.chunks();
    assert_eq!(chunks.len(), total / capacity + 1);
    assert!(chunks[..chunks.len() - 1].iter().all(|c| c.len() == capacity));
    assert_eq!(chunks[chunks.len() - 1].len(), total % capacity);
    assert_eq!(sink.concat().len(), total);
}

#[test]
fn test_field_larger_than_buffer() {
    let mut f = frame(1, 32);
    let big = vec![7u8; 100];
    f.put_column(Some(&big)).unwrap();
    f.finish().unwrap();
    let sink = f.into_sink();
    assert!(sink.chunks().iter().all(|c| c.len() <= 32));
    let stream = sink.concat();
    assert_eq!(stream.len(), 19 + 2 + 4 + 100);
    assert_eq!(&stream[19..25], &[0, 1, 0, 0, 0, 100]);
    assert!(stream[25..].iter().all(|b| *b == 7));
}

#[test]
fn test_finish_without_rows() {
    let mut f = frame(1, 8192);
    f.finish().unwrap();
    let sink = f.into_sink();
    assert_eq!(sink.chunks().len(), 1);
    assert_eq!(sink.chunks()[0].len(), COPY_HEADER_LEN);
}

#[test]
fn test_writer_rows() {
    let config = CopyOptions::new(2).buffer_capacity(19).build().unwrap();
    let mut w = CopyWriter::new(MemorySink::new(), config);
    for i in 0..100 {
        w.write_i64(i).unwrap();
        w.write_text(&format!("row {}", i)).unwrap();
        w.end_row().unwrap();
    }
    w.finish().unwrap();
    assert_eq!(w.rows(), 100);
    let sink = w.into_sink();
    assert!(sink.chunks().iter().all(|c| c.len() <= 19));
    assert_eq!(&sink.concat()[..11], &COPY_SIGNATURE[..]);
}

struct ClosedSink;

impl CopySink for ClosedSink {
    fn send(&mut self, _bytes: &[u8]) -> Result<()> {
        Err(Error::transport("server closed the connection"))
    }

    fn end(&mut self) -> Result<()> {
        Err(Error::transport("server closed the connection"))
    }
}

#[test]
fn test_transport_error_surfaces() {
    let config = CopyOptions::new(1).buffer_capacity(19).build().unwrap();
    let mut f = CopyFrame::new(ClosedSink, config);
    assert!(matches!(
        f.put_column(None),
        Err(Error::Transport { .. })
    ));
    assert_eq!(f.buffered(), 19);
    assert!(matches!(f.finish(), Err(Error::Transport { .. })));
    assert!(!f.is_finished());
}

#[test]
fn test_borrowed_sink() {
    let mut sink = MemorySink::new();
    {
        let config = CopyOptions::new(1).build().unwrap();
        let mut f = CopyFrame::new(&mut sink, config);
        f.put_column(Some(b"x")).unwrap();
        f.finish().unwrap();
    }
    assert!(sink.is_ended());
    assert_eq!(sink.concat().len(), 19 + 2 + 4 + 1);
}

proptest! {
    #[test]
    fn stream_is_split_but_never_altered(
        capacity in 19usize..200,
        fields in prop::collection::vec(prop::option::of(prop::collection::vec(any::<u8>(), 0..64)), 1..40),
    ) {
        let mut reference = frame(3, 1 << 16);
        let mut split = frame(3, capacity);
        for field in &fields {
            reference.put_column(field.as_deref()).unwrap();
            split.put_column(field.as_deref()).unwrap();
        }
        reference.finish().unwrap();
        split.finish().unwrap();

        let reference = reference.into_sink();
        let split = split.into_sink();
        prop_assert_eq!(reference.chunks().len(), 1);
        prop_assert!(split.chunks().iter().all(|c| !c.is_empty() && c.len() <= capacity));
        prop_assert_eq!(split.concat(), reference.concat());
    }
}
