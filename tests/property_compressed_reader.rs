//! Property-based tests for random access over embedded files
//!
//! Every sequence of seeks and reads on an embedded handle must observe exactly
//! what the same sequence observes on an in-memory cursor over the original bytes.

use cartridge_embed::source::MemorySource;
use cartridge_embed::{CompressionConfig, EmbeddedFs, Handle, SnapshotBuilder, Storage};
use proptest::prelude::*;
use std::io::{self, Cursor, Read, Seek, SeekFrom};

#[derive(Debug, Clone)]
enum Op {
    Start(u64),
    Current(i64),
    End(i64),
    Read(usize),
}

fn op_strategy(len: u64) -> impl Strategy<Value = Op> {
    let len_i = len as i64;
    prop_oneof![
        (0..=len + 16).prop_map(Op::Start),
        (-len_i..=len_i).prop_map(Op::Current),
        (-len_i..=16i64).prop_map(Op::End),
        (0usize..512).prop_map(Op::Read),
    ]
}

/// Repetitive enough that every method stores it compressed
fn text(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| b"abcdefgh"[(i / 7 + seed as usize) % 8])
        .collect()
}

fn embed(data: &[u8], config: CompressionConfig) -> EmbeddedFs {
    let source = MemorySource::new().with_file("/doc.txt", data.to_vec());
    EmbeddedFs::new(SnapshotBuilder::new().compression(config).build(&source).unwrap())
}

fn apply<R: Read + Seek>(target: &mut R, op: &Op) -> Result<Vec<u8>, io::ErrorKind> {
    let position = |p: u64| p.to_le_bytes().to_vec();
    let result = match *op {
        Op::Start(n) => target.seek(SeekFrom::Start(n)).map(position),
        Op::Current(n) => target.seek(SeekFrom::Current(n)).map(position),
        Op::End(n) => target.seek(SeekFrom::End(n)).map(position),
        Op::Read(n) => {
            let mut buf = Vec::with_capacity(n);
            target.take(n as u64).read_to_end(&mut buf).map(|_| buf)
        }
    };
    result.map_err(|e| e.kind())
}

fn scenario() -> impl Strategy<Value = (Vec<u8>, Vec<Op>)> {
    (256usize..8192, any::<u8>()).prop_flat_map(|(len, seed)| {
        let data = text(len, seed);
        let ops = prop::collection::vec(op_strategy(len as u64), 1..40);
        (Just(data), ops)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_zstd_handle_matches_cursor((data, ops) in scenario()) {
        let fs = embed(&data, CompressionConfig::zstd());
        let mut handle = fs.open("/doc.txt").unwrap();
        prop_assert!(handle.is_compressed());

        let mut oracle = Cursor::new(data.clone());
        for op in &ops {
            prop_assert_eq!(apply(&mut handle, op), apply(&mut oracle, op), "op {:?}", op);
        }
    }

    #[test]
    fn prop_lz4_handle_matches_cursor((data, ops) in scenario()) {
        let fs = embed(&data, CompressionConfig::lz4());
        let mut handle = fs.open("/doc.txt").unwrap();
        prop_assert!(handle.is_compressed());

        let mut oracle = Cursor::new(data.clone());
        for op in &ops {
            prop_assert_eq!(apply(&mut handle, op), apply(&mut oracle, op), "op {:?}", op);
        }
    }

    #[test]
    fn prop_seek_then_read_is_repeatable(
        (data, offset, len) in (256usize..8192, any::<u8>())
            .prop_flat_map(|(size, seed)| (Just(text(size, seed)), 0..size, 1usize..256))
    ) {
        let fs = embed(&data, CompressionConfig::zstd());
        let mut handle = fs.open("/doc.txt").unwrap();
        let end = (offset + len).min(data.len());

        let mut first = vec![0u8; end - offset];
        handle.seek(SeekFrom::Start(offset as u64)).unwrap();
        handle.read_exact(&mut first).unwrap();

        let mut second = vec![0u8; end - offset];
        handle.seek(SeekFrom::Start(offset as u64)).unwrap();
        handle.read_exact(&mut second).unwrap();

        let mut fresh = fs.open("/doc.txt").unwrap();
        let mut third = vec![0u8; end - offset];
        fresh.seek(SeekFrom::Start(offset as u64)).unwrap();
        fresh.read_exact(&mut third).unwrap();

        prop_assert_eq!(&first, &data[offset..end]);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first, &third);
    }
}

#[test]
fn test_backward_seek_reopens_decoder() {
    let data = text(20_000, 3);
    let fs = embed(&data, CompressionConfig::zstd());

    let mut file = match fs.open("/doc.txt").unwrap() {
        Handle::Compressed(file) => file,
        other => panic!("expected a compressed handle, got {other:?}"),
    };

    let mut buf = [0u8; 32];
    file.seek(SeekFrom::Start(15_000)).unwrap();
    file.read_exact(&mut buf).unwrap();
    assert_eq!(&buf[..], &data[15_000..15_032]);

    file.seek(SeekFrom::Start(100)).unwrap();
    file.read_exact(&mut buf).unwrap();
    assert_eq!(&buf[..], &data[100..132]);
    assert_eq!(file.position(), 132);
}

#[test]
fn test_compressed_bytes_decode_to_content() {
    let data = text(10_000, 0);
    let fs = embed(&data, CompressionConfig::zstd());
    let handle = fs.open("/doc.txt").unwrap();

    let stored = handle.compressed_bytes().unwrap();
    assert!(stored.len() < data.len());
    assert_eq!(zstd::stream::decode_all(stored).unwrap(), data);

    match fs.snapshot().get("/doc.txt").unwrap() {
        cartridge_embed::Record::File(record) => match &record.storage {
            Storage::Compressed { content, .. } => assert_eq!(&content[..], stored),
            Storage::Raw { .. } => panic!("expected compressed storage"),
        },
        cartridge_embed::Record::Dir(_) => panic!("expected a file"),
    }
}
